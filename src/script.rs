//! Script building
//!
//!     The builder keeps three pieces of mutable state: an ordered stack of emitted text
//!     fragments, a stack of scoped text transforms (indentation for nested bindings) and
//!     the set of declared inline-library dependencies. Nothing is assembled until the
//!     script is rendered, at which point the transpiler resolves the dependencies and
//!     stitches everything into one document.
//!
//!     .
//!     ├── args.rs           # Argument values and per-operation shape contracts
//!     ├── binding.rs        # Key bindings (literal remaps and nested callbacks)
//!     ├── builder.rs        # The `Script` aggregate and its low level put* API
//!     ├── dependencies.rs   # Inline libraries and the declared dependency set
//!     ├── error.rs
//!     ├── keys.rs           # `{Key State}` key events
//!     ├── manifest.rs       # Declarative YAML/JSON script descriptions
//!     ├── operations.rs     # The global operation table and generated methods
//!     ├── output.rs         # Atomic file output
//!     ├── text_stack.rs     # Ordered fragment storage
//!     ├── transforms.rs     # Scoped transform stack
//!     └── transpiler.rs     # Final document assembly

pub mod args;
pub mod binding;
pub mod builder;
pub mod dependencies;
pub mod error;
pub mod keys;
pub mod manifest;
pub mod operations;
pub mod output;
pub mod text_stack;
pub mod transforms;
pub mod transpiler;
