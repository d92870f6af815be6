//! Property-based tests for the script builder
//!
//! These check the ordering, deduplication, indentation and idempotence laws over arbitrary
//! call sequences.

use ahk::{InlineLibraries, Script};
use proptest::prelude::*;

fn library_source(name: &str) -> String {
    format!("{name}(){{\nreturn\n}}")
}

fn libraries(names: &[&str]) -> InlineLibraries {
    names
        .iter()
        .map(|name| (name.to_string(), library_source(name)))
        .collect()
}

/// Single-line text without anything that would be read as markup by the assertions
fn line() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 ,;{}]{0,12}"
}

/// Build nested bindings: one level per entry in `lines`, putting that line at its level
fn nest(script: &mut Script, lines: &[String]) -> ahk::Result<()> {
    let Some((first, rest)) = lines.split_first() else {
        return Ok(());
    };
    script.bind_with("k", |s| {
        s.put(first.clone());
        nest(s, rest)
    })?;
    Ok(())
}

proptest! {
    #[test]
    fn fragments_follow_call_order(lines in prop::collection::vec(line(), 0..20)) {
        let mut script = Script::new();
        for line in &lines {
            script.put(format!("{line}\n"));
        }

        let expected: String = lines.iter().map(|line| format!("{line}\n")).collect();
        prop_assert_eq!(script.render().unwrap(), format!("\n{expected}\n"));
    }

    #[test]
    fn each_dependency_is_inlined_once(
        picks in prop::collection::vec(prop::sample::select(vec!["alpha", "beta", "gamma", "delta"]), 0..16)
    ) {
        let mut script = Script::with_libraries(libraries(&["alpha", "beta", "gamma", "delta"]));
        for name in &picks {
            script.dependency(name);
        }
        let rendered = script.render().unwrap();

        for name in ["alpha", "beta", "gamma", "delta"] {
            let expected = usize::from(picks.contains(&name));
            prop_assert_eq!(rendered.matches(&library_source(name)).count(), expected);
        }
        prop_assert_eq!(
            rendered.matches("; ---- inline libraries ----").count(),
            usize::from(!picks.is_empty())
        );
    }

    #[test]
    fn dependencies_keep_first_declaration_order(
        picks in prop::collection::vec(prop::sample::select(vec!["alpha", "beta", "gamma"]), 1..12)
    ) {
        let mut script = Script::with_libraries(libraries(&["alpha", "beta", "gamma"]));
        for name in &picks {
            script.dependency(name);
        }

        let mut first_seen: Vec<&str> = Vec::new();
        for name in &picks {
            if !first_seen.contains(name) {
                first_seen.push(*name);
            }
        }
        let rendered = script.render().unwrap();
        let positions: Vec<usize> = first_seen
            .iter()
            .map(|name| rendered.find(&library_source(name)).unwrap())
            .collect();
        prop_assert!(positions.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn depth_k_fragments_carry_k_indent_units(lines in prop::collection::vec(line(), 1..6)) {
        let mut script = Script::new();
        nest(&mut script, &lines).unwrap();
        prop_assert_eq!(script.depth(), 0);

        let fragments = script.fragments();
        for (depth, line) in lines.iter().enumerate() {
            let expected = format!("{}{line}", "  ".repeat(depth + 1));
            prop_assert!(
                fragments.contains(&expected),
                "missing {:?} in {:?}",
                expected,
                fragments
            );
        }
    }

    #[test]
    fn render_is_idempotent(lines in prop::collection::vec(line(), 0..8), with_dependency: bool) {
        let mut script = Script::with_libraries(libraries(&["alpha"]));
        if with_dependency {
            script.dependency("alpha");
        }
        for line in &lines {
            script.bind("F1", format!("Send{line}").trim_end().to_string()).unwrap();
        }

        let first = script.render().unwrap();
        prop_assert_eq!(first, script.render().unwrap());
    }
}
