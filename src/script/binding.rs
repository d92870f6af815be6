//! Key bindings
//!
//!     A binding maps a trigger key combination to an action. The action is either a literal
//!     remap target, written on the same line:
//!
//!         CapsLock::Esc
//!
//!     or a callback that builds the hotkey body with the same builder, one indentation level
//!     deeper, closed by an explicit `Return`:
//!
//!         ^j::
//!           Send, {Space}
//!         Return
//!
//!     Callbacks may bind again; every nested callback adds its own indentation level.

use super::builder::Script;
use super::error::{Result, ScriptError};

type BindingCallback<'a> = Box<dyn FnOnce(&mut Script) -> Result<()> + 'a>;

/// What a trigger key is bound to
pub enum BindTarget<'a> {
    /// Single-line remap to another key
    Literal(String),
    /// Hotkey body built by a callback
    Callback(BindingCallback<'a>),
}

impl<'a> BindTarget<'a> {
    pub fn literal(target: impl Into<String>) -> Self {
        BindTarget::Literal(target.into())
    }

    pub fn callback<F>(f: F) -> Self
    where
        F: FnOnce(&mut Script) -> Result<()> + 'a,
    {
        BindTarget::Callback(Box::new(f))
    }
}

impl std::fmt::Debug for BindTarget<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BindTarget::Literal(target) => f.debug_tuple("Literal").field(target).finish(),
            BindTarget::Callback(_) => f.write_str("Callback(..)"),
        }
    }
}

impl From<&str> for BindTarget<'_> {
    fn from(target: &str) -> Self {
        BindTarget::literal(target)
    }
}

impl From<String> for BindTarget<'_> {
    fn from(target: String) -> Self {
        BindTarget::Literal(target)
    }
}

impl Script {
    /// Bind `key` to `target`
    ///
    /// Literal targets must be a single non-empty line. A failing callback leaves the
    /// transform stack as it was and its error is returned as is; no `Return` is emitted
    /// in that case.
    pub fn bind<'a>(&mut self, key: &str, target: impl Into<BindTarget<'a>>) -> Result<&mut Self> {
        check_trigger(key)?;

        match target.into() {
            BindTarget::Literal(target) => {
                if target.trim().is_empty() {
                    return Err(ScriptError::invalid_binding(key, "target is empty"));
                }
                if target.contains(['\n', '\r']) {
                    return Err(ScriptError::invalid_binding(
                        key,
                        "a literal target must fit on one line",
                    ));
                }
                self.put(format!("{key}::"));
                self.put(format!("{target}\n"));
            }
            BindTarget::Callback(callback) => {
                self.put(format!("{key}::"));
                self.put("\n");
                self.indented(callback)?;
                self.put("\nReturn\n");
            }
        }
        Ok(self)
    }

    /// Bind `key` to a hotkey body built by `f`
    pub fn bind_with<F>(&mut self, key: &str, f: F) -> Result<&mut Self>
    where
        F: FnOnce(&mut Script) -> Result<()>,
    {
        self.bind(key, BindTarget::callback(f))
    }
}

fn check_trigger(key: &str) -> Result<()> {
    let reason = if key.trim().is_empty() {
        "trigger key is empty"
    } else if key.contains(['\n', '\r']) {
        "trigger key contains a line break"
    } else if key.contains("::") {
        "trigger key contains '::'"
    } else {
        return Ok(());
    };
    Err(ScriptError::invalid_argument("bind", format!("{reason}: {key:?}")))
}
