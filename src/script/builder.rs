//! The script builder
//!
//! [`Script`] owns the text stack, the transform stack and the declared dependency set.
//! Every method appends zero or more fragments and returns the builder again so calls can be
//! chained; fallible methods return `Result<&mut Script>` and validate their input before
//! anything is appended.
//!
//! The low level API is `put` (raw text), `put_function`, `put_command`, `put_directive` and
//! `invoke` (table lookup with argument-shape checking). The generated convenience methods
//! (`send`, `persistent`, `if_win_active`, ...) live next to the operation table in
//! [`operations`](super::operations), key bindings in [`binding`](super::binding).

use super::args::{Arg, IntoArgs};
use super::dependencies::{DependencySet, InlineLibraries};
use super::error::{Result, ScriptError};
use super::operations::{self, EmissionCategory};
use super::text_stack::TextStack;
use super::transforms::{TextTransform, TransformStack};
use once_cell::sync::Lazy;
use regex::Regex;
use std::ops::{Deref, DerefMut};
use std::path::PathBuf;

/// Indentation added per nested binding level
pub const DEFAULT_INDENT: &str = "  ";

static IDENTIFIER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_@#$][A-Za-z0-9_@#$]*$").expect("valid identifier regex"));

/// Construction options for a [`Script`]
#[derive(Debug, Clone)]
pub struct ScriptOptions {
    /// Libraries that can be declared as dependencies
    pub inline_libraries: InlineLibraries,
    /// Prefix added to every fragment per binding depth
    pub indent_unit: String,
    /// Directory that relative output paths are resolved against
    pub root_dir: PathBuf,
}

impl Default for ScriptOptions {
    fn default() -> Self {
        ScriptOptions {
            inline_libraries: InlineLibraries::new(),
            indent_unit: DEFAULT_INDENT.to_string(),
            root_dir: PathBuf::from("."),
        }
    }
}

/// Fluent AutoHotkey script builder
#[derive(Debug)]
pub struct Script {
    options: ScriptOptions,
    text: TextStack,
    transforms: TransformStack,
    dependencies: DependencySet,
}

impl Script {
    /// An empty script without inline libraries
    pub fn new() -> Self {
        Self::with_options(ScriptOptions::default())
    }

    pub fn with_libraries(inline_libraries: InlineLibraries) -> Self {
        Self::with_options(ScriptOptions {
            inline_libraries,
            ..ScriptOptions::default()
        })
    }

    pub fn with_options(options: ScriptOptions) -> Self {
        Script {
            options,
            text: TextStack::new(),
            transforms: TransformStack::new(),
            dependencies: DependencySet::new(),
        }
    }

    pub fn options(&self) -> &ScriptOptions {
        &self.options
    }

    pub fn libraries(&self) -> &InlineLibraries {
        &self.options.inline_libraries
    }

    /// Fragments emitted so far, already transformed
    pub fn fragments(&self) -> &[String] {
        self.text.fragments()
    }

    pub(crate) fn text(&self) -> &TextStack {
        &self.text
    }

    pub fn dependencies(&self) -> &DependencySet {
        &self.dependencies
    }

    /// Number of transforms currently active
    pub fn depth(&self) -> usize {
        self.transforms.depth()
    }

    /// Append raw text, passed through the active transforms
    pub fn put(&mut self, text: impl Into<String>) -> &mut Self {
        let fragment = self.transforms.apply(text.into());
        self.text.push(fragment);
        self
    }

    /// Append `name(args...)` as a single fragment, without a line break
    pub fn put_function(&mut self, name: &str, args: impl IntoArgs) -> Result<&mut Self> {
        self.put_category(EmissionCategory::Function, name, args)
    }

    /// Append `name, args...` followed by a line break
    pub fn put_command(&mut self, name: &str, args: impl IntoArgs) -> Result<&mut Self> {
        self.put_category(EmissionCategory::Command, name, args)
    }

    /// Append `#name, args...` followed by a line break
    pub fn put_directive(&mut self, name: &str, args: impl IntoArgs) -> Result<&mut Self> {
        self.put_category(EmissionCategory::Directive, name, args)
    }

    fn put_category(
        &mut self,
        category: EmissionCategory,
        name: &str,
        args: impl IntoArgs,
    ) -> Result<&mut Self> {
        if !IDENTIFIER.is_match(name) {
            return Err(ScriptError::invalid_argument(
                name,
                format!("'{name}' is not a valid {category} name"),
            ));
        }
        if category == EmissionCategory::Directive && name.starts_with('#') {
            return Err(ScriptError::invalid_argument(
                name,
                "directive names are written without the leading '#'",
            ));
        }
        let args = args.into_args();
        check_single_line(name, &args)?;
        Ok(self.put(operations::emit(category, name, &args)))
    }

    /// Call a table operation by canonical name
    ///
    /// The arguments are checked against the operation's declared shapes before anything is
    /// appended. Functions get a trailing newline fragment so they read as statements.
    pub fn invoke(&mut self, name: &str, args: impl IntoArgs) -> Result<&mut Self> {
        let operation =
            operations::lookup(name).ok_or_else(|| ScriptError::UnknownOperation(name.to_string()))?;
        let args = args.into_args();
        operation.check(&args)?;
        check_single_line(name, &args)?;

        self.put(operation.emit(&args));
        if operation.category == EmissionCategory::Function {
            self.put("\n");
        }
        Ok(self)
    }

    /// Set the tray icon: `Menu, Tray, Icon, <file>, <index>`
    pub fn tray_icon(&mut self, file: &str, index: i64) -> Result<&mut Self> {
        self.put_command("Menu", ("Tray", "Icon", file, index))
    }

    /// Declare an inline library dependency
    ///
    /// Nothing is emitted; the library text is resolved when the script is rendered.
    /// Declaring the same name again has no effect.
    pub fn dependency(&mut self, name: &str) -> &mut Self {
        self.dependencies.declare(name);
        self
    }

    /// Run `f` with `transform` active
    ///
    /// The transform stack is restored to its previous depth when `f` returns, fails or
    /// panics.
    pub fn scoped<T>(&mut self, transform: TextTransform, f: impl FnOnce(&mut Script) -> T) -> T {
        let depth = self.transforms.depth();
        tracing::trace!(depth, transform = transform.name(), "entering transform scope");
        self.transforms.push(transform);

        let mut scope = TransformScope {
            script: self,
            depth,
        };
        f(&mut *scope)
    }

    /// Run `f` one indentation level deeper
    pub fn indented<T>(&mut self, f: impl FnOnce(&mut Script) -> T) -> T {
        let transform = TextTransform::indent(self.options.indent_unit.clone());
        self.scoped(transform, f)
    }
}

impl Default for Script {
    fn default() -> Self {
        Self::new()
    }
}

/// Restores the transform stack depth on drop
struct TransformScope<'a> {
    script: &'a mut Script,
    depth: usize,
}

impl Deref for TransformScope<'_> {
    type Target = Script;

    fn deref(&self) -> &Script {
        &*self.script
    }
}

impl DerefMut for TransformScope<'_> {
    fn deref_mut(&mut self) -> &mut Script {
        &mut *self.script
    }
}

impl Drop for TransformScope<'_> {
    fn drop(&mut self) {
        self.script.transforms.truncate(self.depth);
        tracing::trace!(depth = self.depth, "left transform scope");
    }
}

fn check_single_line(operation: &str, args: &[Arg]) -> Result<()> {
    match args
        .iter()
        .position(|arg| arg.as_text().is_some_and(|text| text.contains(['\n', '\r'])))
    {
        Some(index) => Err(ScriptError::invalid_argument(
            operation,
            format!("argument {} contains a line break", index + 1),
        )),
        None => Ok(()),
    }
}
