//! # ahk
//!
//! A fluent builder for AutoHotkey scripts.
//!
//! Scripts are assembled from typed method calls (directives, commands,
//! function calls and key bindings) and rendered to a single text document.
//! Named inline libraries can be declared as dependencies and are spliced in
//! ahead of the script body when the document is rendered.
//!
//! ```rust,ignore
//! use ahk::{InlineLibraries, Script};
//!
//! let libraries = InlineLibraries::new().with("add", "add(a,b){\nreturn a+b\n}");
//! let mut script = Script::with_libraries(libraries);
//! script
//!     .if_win_active(("ahk_class", "Notepad"))?
//!     .persistent()?
//!     .bind_with("x", |s| {
//!         s.dependency("add");
//!         s.put_function("add", (2, 3))?;
//!         Ok(())
//!     })?;
//!
//! let text = script.render()?;
//! ```
//!
//! See the [script module](script) for the building blocks.

pub mod script;

pub use script::args::{Arg, IntoArgs, Param};
pub use script::binding::BindTarget;
pub use script::builder::{Script, ScriptOptions};
pub use script::dependencies::InlineLibraries;
pub use script::error::{Result, ScriptError};
pub use script::keys::{KeyEvent, KeyState};
pub use script::manifest::ScriptManifest;
pub use script::operations::{EmissionCategory, Operation};
