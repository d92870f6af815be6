//! Declarative script manifests
//!
//!     A manifest describes a script as data instead of method calls, in YAML or JSON:
//!
//!         dependencies: [add]
//!         tray_icon: { file: shell32.dll, index: 46 }
//!         globals:
//!           - Persistent
//!           - [SendMode, Input]
//!           - [IfWinActive, ahk_class, Notepad]
//!         bindings:
//!           - key: CapsLock
//!             target: Esc
//!           - key: ^j
//!             body:
//!               - function: [add, 2, 3]
//!               - op: [Send, "{Space}"]
//!               - bind: { key: a, target: b }
//!
//!     Applying a manifest replays it against a [`Script`] in a fixed order: dependencies,
//!     tray icon, globals, bindings. Globals and `op` statements go through
//!     [`Script::invoke`], so their arguments are checked against the operation table.

use super::args::Arg;
use super::builder::{Script, ScriptOptions};
use super::error::{Result, ScriptError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// A whole script described as data
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScriptManifest {
    #[serde(default)]
    pub dependencies: Vec<String>,
    #[serde(default)]
    pub tray_icon: Option<TrayIcon>,
    #[serde(default)]
    pub globals: Vec<Call>,
    #[serde(default)]
    pub bindings: Vec<BindingSpec>,
}

/// Tray icon taken from an icon resource file; defaults to `shell32.dll`, icon 46
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrayIcon {
    #[serde(default = "TrayIcon::default_file")]
    pub file: String,
    #[serde(default = "TrayIcon::default_index")]
    pub index: i64,
}

impl TrayIcon {
    fn default_file() -> String {
        "shell32.dll".to_string()
    }

    fn default_index() -> i64 {
        46
    }
}

impl Default for TrayIcon {
    fn default() -> Self {
        TrayIcon {
            file: Self::default_file(),
            index: Self::default_index(),
        }
    }
}

/// A call written either as a bare name or as `[name, args...]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Call {
    Bare(String),
    List(Vec<Arg>),
}

impl Call {
    /// Split into name and arguments
    pub fn parts(&self) -> Result<(&str, &[Arg])> {
        match self {
            Call::Bare(name) => Ok((name.as_str(), &[][..])),
            Call::List(items) => match items.split_first() {
                Some((Arg::Text(name), args)) => Ok((name.as_str(), args)),
                Some((other, _)) => Err(ScriptError::Manifest(format!(
                    "call name must be text, got '{other}'"
                ))),
                None => Err(ScriptError::Manifest("empty call".to_string())),
            },
        }
    }
}

/// One key binding: either a literal `target` or a `body` of statements
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BindingSpec {
    pub key: String,
    #[serde(default)]
    pub target: Option<String>,
    #[serde(default)]
    pub body: Option<Vec<Statement>>,
}

impl BindingSpec {
    pub fn apply(&self, script: &mut Script) -> Result<()> {
        match (&self.target, &self.body) {
            (Some(target), None) => {
                script.bind(&self.key, target.as_str())?;
            }
            (None, Some(body)) => {
                script.bind_with(&self.key, |s| {
                    body.iter().try_for_each(|statement| statement.apply(s))
                })?;
            }
            (Some(_), Some(_)) => {
                return Err(ScriptError::invalid_binding(
                    &self.key,
                    "binding has both a target and a body",
                ))
            }
            (None, None) => {
                return Err(ScriptError::invalid_binding(
                    &self.key,
                    "binding has neither a target nor a body",
                ))
            }
        }
        Ok(())
    }
}

/// A statement inside a binding body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Statement {
    /// Declare an inline library
    Dependency(String),
    /// Table operation, checked against its argument shapes
    Op(Call),
    Function(Call),
    Command(Call),
    Directive(Call),
    /// Raw text, appended as is
    Raw(String),
    Bind(BindingSpec),
}

impl Statement {
    pub fn apply(&self, script: &mut Script) -> Result<()> {
        match self {
            Statement::Dependency(name) => {
                script.dependency(name);
            }
            Statement::Op(call) => {
                let (name, args) = call.parts()?;
                script.invoke(name, args)?;
            }
            Statement::Function(call) => {
                let (name, args) = call.parts()?;
                script.put_function(name, args)?;
            }
            Statement::Command(call) => {
                let (name, args) = call.parts()?;
                script.put_command(name, args)?;
            }
            Statement::Directive(call) => {
                let (name, args) = call.parts()?;
                script.put_directive(name, args)?;
            }
            Statement::Raw(text) => {
                script.put(text.as_str());
            }
            Statement::Bind(binding) => binding.apply(script)?,
        }
        Ok(())
    }
}

impl ScriptManifest {
    /// Parse a YAML manifest
    ///
    /// Statements are written as single-key maps (`- op: [Send, a]`) at any nesting depth.
    pub fn from_yaml_str(source: &str) -> Result<Self> {
        serde_yaml::with::singleton_map_recursive::deserialize(serde_yaml::Deserializer::from_str(
            source,
        ))
        .map_err(|e| ScriptError::Manifest(e.to_string()))
    }

    pub fn from_json_str(source: &str) -> Result<Self> {
        serde_json::from_str(source).map_err(|e| ScriptError::Manifest(e.to_string()))
    }

    /// Load a manifest, choosing the format from the file extension
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|e| ScriptError::io(path, e))?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json_str(&source),
            Some("yaml") | Some("yml") => Self::from_yaml_str(&source),
            other => Err(ScriptError::Manifest(format!(
                "unsupported manifest extension: {}",
                other.unwrap_or("<none>")
            ))),
        }
    }

    /// Replay the manifest against `script`
    pub fn apply(&self, script: &mut Script) -> Result<()> {
        for name in &self.dependencies {
            script.dependency(name);
        }
        if let Some(icon) = &self.tray_icon {
            script.tray_icon(&icon.file, icon.index)?;
        }
        for call in &self.globals {
            let (name, args) = call.parts()?;
            script.invoke(name, args)?;
        }
        for binding in &self.bindings {
            binding.apply(script)?;
        }
        Ok(())
    }

    /// Build a fresh script from this manifest
    pub fn to_script(&self, options: ScriptOptions) -> Result<Script> {
        let mut script = Script::with_options(options);
        self.apply(&mut script)?;
        Ok(script)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::dependencies::InlineLibraries;

    const MANIFEST: &str = r#"
dependencies: [add]
tray_icon: { file: shell32.dll, index: 46 }
globals:
  - Persistent
  - [SendMode, Input]
  - [IfWinActive, ahk_class, Notepad]
bindings:
  - key: CapsLock
    target: Esc
  - key: ^j
    body:
      - function: [add, 2, 3]
      - op: [Send, "{Space}"]
"#;

    fn options() -> ScriptOptions {
        ScriptOptions {
            inline_libraries: InlineLibraries::new().with("add", "add(a,b){\nreturn a+b\n}"),
            ..ScriptOptions::default()
        }
    }

    #[test]
    fn test_parse_yaml() {
        let manifest = ScriptManifest::from_yaml_str(MANIFEST).unwrap();
        assert_eq!(manifest.dependencies, vec!["add"]);
        assert_eq!(manifest.globals.len(), 3);
        assert_eq!(manifest.globals[0], Call::Bare("Persistent".to_string()));
        assert_eq!(manifest.bindings.len(), 2);
        assert_eq!(
            manifest.bindings[1].body.as_ref().unwrap()[0],
            Statement::Function(Call::List(vec![
                Arg::from("add"),
                Arg::Int(2),
                Arg::Int(3)
            ]))
        );
    }

    #[test]
    fn test_apply_builds_script() {
        let manifest = ScriptManifest::from_yaml_str(MANIFEST).unwrap();
        let script = manifest.to_script(options()).unwrap();

        assert_eq!(
            script.fragments(),
            &[
                "Menu, Tray, Icon, shell32.dll, 46\n",
                "#Persistent\n",
                "SendMode, Input\n",
                "#IfWinActive, ahk_class, Notepad\n",
                "CapsLock::",
                "Esc\n",
                "^j::",
                "\n",
                "  add(2, 3)",
                "  Send, {Space}\n",
                "\nReturn\n",
            ]
        );
        assert_eq!(script.dependencies().len(), 1);
    }

    #[test]
    fn test_yaml_statements_at_every_depth() {
        let manifest = ScriptManifest::from_yaml_str(
            "bindings:\n  - key: a\n    body:\n      - dependency: add\n      - command: [Menu, Tray, NoIcon]\n      - directive: [Warn]\n      - bind:\n          key: b\n          body:\n            - op: Reload\n            - bind: { key: c, target: d }\n",
        )
        .unwrap();
        let script = manifest.to_script(options()).unwrap();

        assert_eq!(
            script.fragments(),
            &[
                "a::",
                "\n",
                "  Menu, Tray, NoIcon\n",
                "  #Warn\n",
                "  b::",
                "  \n",
                "    Reload\n",
                "    c::",
                "    d\n",
                "  \nReturn\n",
                "\nReturn\n",
            ]
        );
        assert_eq!(script.dependencies().iter().collect::<Vec<_>>(), vec!["add"]);
    }

    #[test]
    fn test_tray_icon_defaults() {
        let manifest = ScriptManifest::from_yaml_str("tray_icon: {}\n").unwrap();
        assert_eq!(manifest.tray_icon, Some(TrayIcon::default()));

        let script = manifest.to_script(ScriptOptions::default()).unwrap();
        assert_eq!(script.fragments(), &["Menu, Tray, Icon, shell32.dll, 46\n"]);

        let manifest = ScriptManifest::from_yaml_str("tray_icon: { index: 3 }\n").unwrap();
        assert_eq!(
            manifest.tray_icon,
            Some(TrayIcon {
                file: "shell32.dll".to_string(),
                index: 3
            })
        );
    }

    #[test]
    fn test_yaml_non_finite_numbers_rejected() {
        let manifest = ScriptManifest::from_yaml_str("globals:\n  - [Sleep, .nan]\n").unwrap();
        assert!(matches!(
            manifest.to_script(ScriptOptions::default()),
            Err(ScriptError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn test_parse_json() {
        let manifest = ScriptManifest::from_json_str(
            r#"{"globals": [["Sleep", 100]], "bindings": [{"key": "a", "target": "b"}]}"#,
        )
        .unwrap();
        let script = manifest.to_script(ScriptOptions::default()).unwrap();
        assert_eq!(script.fragments(), &["Sleep, 100\n", "a::", "b\n"]);
    }

    #[test]
    fn test_globals_are_checked() {
        let manifest = ScriptManifest::from_yaml_str("globals:\n  - [Sleep, soon]\n").unwrap();
        let result = manifest.to_script(ScriptOptions::default());
        assert!(matches!(result, Err(ScriptError::InvalidArgument { .. })));
    }

    #[test]
    fn test_binding_without_target_or_body() {
        let manifest = ScriptManifest::from_yaml_str("bindings:\n  - key: x\n").unwrap();
        match manifest.to_script(ScriptOptions::default()) {
            Err(ScriptError::InvalidBindingTarget { key, .. }) => assert_eq!(key, "x"),
            other => panic!("Expected InvalidBindingTarget, got {other:?}"),
        }
    }

    #[test]
    fn test_binding_with_target_and_body() {
        let manifest =
            ScriptManifest::from_yaml_str("bindings:\n  - key: x\n    target: y\n    body: []\n")
                .unwrap();
        assert!(matches!(
            manifest.to_script(ScriptOptions::default()),
            Err(ScriptError::InvalidBindingTarget { .. })
        ));
    }

    #[test]
    fn test_nested_binding_statements() {
        let manifest = ScriptManifest::from_yaml_str(
            "bindings:\n  - key: a\n    body:\n      - raw: \"; inner\\n\"\n      - bind: { key: b, target: c }\n",
        )
        .unwrap();
        let script = manifest.to_script(ScriptOptions::default()).unwrap();
        assert_eq!(
            script.fragments(),
            &["a::", "\n", "  ; inner\n", "  b::", "  c\n", "\nReturn\n"]
        );
    }

    #[test]
    fn test_call_name_must_be_text() {
        let call = Call::List(vec![Arg::Int(1)]);
        assert!(matches!(call.parts(), Err(ScriptError::Manifest(_))));
        assert!(matches!(Call::List(vec![]).parts(), Err(ScriptError::Manifest(_))));
    }

    #[test]
    fn test_unknown_fields_rejected() {
        let result = ScriptManifest::from_yaml_str("globalz: []\n");
        assert!(matches!(result, Err(ScriptError::Manifest(_))));
    }

    #[test]
    fn test_from_path_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let yaml = dir.path().join("script.yml");
        let toml = dir.path().join("script.toml");
        fs::write(&yaml, "globals: [Reload]\n").unwrap();
        fs::write(&toml, "").unwrap();

        let manifest = ScriptManifest::from_path(&yaml).unwrap();
        assert_eq!(manifest.globals, vec![Call::Bare("Reload".to_string())]);
        assert!(matches!(
            ScriptManifest::from_path(&toml),
            Err(ScriptError::Manifest(_))
        ));
    }
}
