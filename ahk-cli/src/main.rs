//! Command-line interface for ahk
//! This binary renders declarative script manifests into AutoHotkey scripts.
//!
//! Usage:
//!   ahk build `<manifest>` [-o `<out>`] [-c `<config>`] [--set key=value]  - Render a manifest
//!   ahk operations [--json]                                            - List known operations

use ahk::script::operations::OPERATIONS;
use ahk::{Param, ScriptManifest};
use ahk_config::Loader;
use clap::{Arg, ArgAction, ArgMatches, Command};
use std::fmt::Display;
use std::path::Path;
use tracing_subscriber::EnvFilter;

/// Configuration file picked up from the working directory when `--config` is absent
const LOCAL_CONFIG: &str = "ahk.toml";

fn cli() -> Command {
    Command::new("ahk")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Build AutoHotkey scripts from declarative manifests")
        .arg_required_else_help(true)
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Log debug output to stderr")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand(
            Command::new("build")
                .about("Render a YAML or JSON manifest to a script")
                .arg(
                    Arg::new("manifest")
                        .help("Path to the manifest (.yaml, .yml or .json)")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .help("Write the script to this path instead of stdout"),
                )
                .arg(
                    Arg::new("config")
                        .long("config")
                        .short('c')
                        .help("Configuration file layered over the defaults"),
                )
                .arg(
                    Arg::new("set")
                        .long("set")
                        .value_name("KEY=VALUE")
                        .help("Override a configuration value (e.g. output.indent_unit=\"\\t\")")
                        .action(ArgAction::Append),
                ),
        )
        .subcommand(
            Command::new("operations")
                .about("List the operations known to the builder")
                .arg(
                    Arg::new("json")
                        .long("json")
                        .help("Print the operation table as JSON")
                        .action(ArgAction::SetTrue),
                ),
        )
}

fn main() {
    let matches = cli().get_matches();
    init_tracing(matches.get_flag("verbose"));

    match matches.subcommand() {
        Some(("build", sub)) => handle_build_command(sub),
        Some(("operations", sub)) => handle_operations_command(sub.get_flag("json")),
        _ => {
            let _ = cli().print_help();
            std::process::exit(2);
        }
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Print `context: err` and exit with a failure status
fn fail(context: &str, err: impl Display) -> ! {
    eprintln!("{context}: {err}");
    std::process::exit(1);
}

/// Handle the build command
fn handle_build_command(matches: &ArgMatches) {
    let mut loader = match matches.get_one::<String>("config") {
        Some(path) => Loader::new().with_file(path),
        None => Loader::new().with_optional_file(LOCAL_CONFIG),
    };
    for setting in matches.get_many::<String>("set").into_iter().flatten() {
        loader = loader
            .set_assignment(setting)
            .unwrap_or_else(|e| fail("Invalid --set", e));
    }
    let config = loader
        .build()
        .unwrap_or_else(|e| fail("Configuration error", e));
    let options = config
        .script_options()
        .unwrap_or_else(|e| fail("Library error", e));

    let Some(manifest_path) = matches.get_one::<String>("manifest") else {
        fail("Missing argument", "a manifest path is required");
    };
    let manifest =
        ScriptManifest::from_path(manifest_path).unwrap_or_else(|e| fail("Manifest error", e));
    let script = manifest
        .to_script(options)
        .unwrap_or_else(|e| fail("Build error", e));

    match matches.get_one::<String>("output") {
        Some(out) => {
            let written = script
                .to_file(Path::new(out))
                .unwrap_or_else(|e| fail("Output error", e));
            eprintln!("Wrote {}", written.display());
        }
        None => {
            let text = script.render().unwrap_or_else(|e| fail("Build error", e));
            print!("{text}");
        }
    }
}

/// Handle the operations command
fn handle_operations_command(json: bool) {
    if json {
        let listing = serde_json::to_string_pretty(OPERATIONS)
            .unwrap_or_else(|e| fail("Error formatting operations", e));
        println!("{listing}");
        return;
    }

    println!("Available operations:\n");
    for operation in OPERATIONS {
        println!("  {} ({}, {})", operation.name, operation.category, operation.method);
        for shape in operation.shapes {
            println!("    {}", signature(operation.name, shape));
        }
        println!();
    }
}

fn signature(name: &str, shape: &[Param]) -> String {
    let params: Vec<String> = shape
        .iter()
        .map(|param| match param {
            Param::Text => "<text>".to_string(),
            Param::Number => "<number>".to_string(),
            Param::OneOf(choices) => choices.join("|"),
        })
        .collect();
    if params.is_empty() {
        name.to_string()
    } else {
        format!("{name} {}", params.join(", "))
    }
}
