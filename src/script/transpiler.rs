//! Final document assembly
//!
//!     Rendering is read-only over the builder state and happens in one pass:
//!
//!     1. Resolve every declared dependency, in first-declaration order. A missing library
//!        aborts the whole render; no partial document is produced.
//!     2. If any dependency was declared, emit the header marker, each library's raw text
//!        preceded by a blank line, a blank line and the footer marker.
//!     3. One blank line.
//!     4. The text stack, in push order.
//!     5. One trailing blank line.
//!
//!     An empty builder therefore renders to exactly "\n\n".

use super::builder::Script;
use super::dependencies::{DependencySet, InlineLibraries};
use super::error::Result;
use super::text_stack::TextStack;

/// First line of the inline library block
pub const LIBRARIES_HEADER: &str = "; ---- inline libraries ----";
/// Last line of the inline library block
pub const LIBRARIES_FOOTER: &str = "; ---- end inline libraries ----";

/// Assemble the final document
pub fn transpile(
    dependencies: &DependencySet,
    libraries: &InlineLibraries,
    body: &TextStack,
) -> Result<String> {
    let sources = dependencies.resolve(libraries)?;

    let mut fragments: Vec<&str> = Vec::new();
    if !sources.is_empty() {
        fragments.push(LIBRARIES_HEADER);
        fragments.push("\n");
        for source in &sources {
            fragments.push("\n");
            fragments.push(source);
            fragments.push("\n");
        }
        fragments.push("\n");
        fragments.push(LIBRARIES_FOOTER);
        fragments.push("\n");
    }
    fragments.push("\n");
    fragments.extend(body.fragments().iter().map(String::as_str));
    fragments.push("\n");

    let document = fragments.concat();
    tracing::debug!(
        dependencies = sources.len(),
        fragments = body.len(),
        bytes = document.len(),
        "rendered script"
    );
    Ok(document)
}

impl Script {
    /// Render the script to its final text
    ///
    /// Fails with [`DependencyNotFound`](super::error::ScriptError::DependencyNotFound) when
    /// a declared dependency has no inline library. Rendering does not change the builder, so
    /// rendering twice gives identical output.
    pub fn render(&self) -> Result<String> {
        transpile(self.dependencies(), self.libraries(), self.text())
    }
}
