//! Markdown to Typst conversion
//!
//!     This crate turns Markdown documents (GFM tables, strikethrough, dollar math, YAML
//!     frontmatter and Mermaid diagram blocks) into Typst markup, and optionally drives the
//!     `typst` compiler to produce a PDF.
//!
//!     This is a pure lib, that is, it powers mdtype-cli but is shell agnostic: no code here
//!     prints to stdout. Progress is reported through [`publish::PublishEvent`] and problems
//!     through `tracing`.
//!
//! Architecture
//!
//!     Parsing is delegated to comrak, whose arena AST is adapted into the crate's own closed
//!     document tree (./ir/nodes.rs). The Typst side only ever sees that tree, the
//!     [`frontmatter::DocumentConfig`] read from the frontmatter, and the list of rendered
//!     diagrams.
//!
//!     The file structure :
//!     .
//!     ├── error.rs
//!     ├── frontmatter.rs          # DocumentConfig and its defaulting rules
//!     ├── assets.rs               # Deferred file copies (logos)
//!     ├── paths.rs
//!     ├── diagram                 # Diagram blocks, mermaid renderer
//!     ├── compile.rs              # typst compiler
//!     ├── publish.rs              # File-to-file pipeline
//!     ├── formats
//!     │   ├── markdown            # comrak → document tree
//!     │   └── typst               # document tree → Typst markup
//!     └── ir                      # Document tree
//!
//! Testing
//!     tests
//!     └── <area>
//!         ├── <testname>.rs
//!         └── fixtures
//!
//!     Note that rust does not by default discover tests in subdirectories, so we need to include these
//!     in the mod.
//!
//! External Tools
//!
//!     Rendering diagrams and compiling PDFs shell out to `mmdc` and `typst`. Both are behind the
//!     `native-export` feature (on by default). Each binary is looked up from an environment
//!     variable first (`MDTYPE_MMDC_BIN`, `MDTYPE_TYPST_BIN`), then the configured path, then `PATH`.
//!
pub mod assets;
pub mod diagram;
pub mod error;
pub mod formats;
pub mod frontmatter;
pub mod ir;
pub mod paths;

#[cfg(feature = "native-export")]
pub mod compile;
#[cfg(feature = "native-export")]
pub mod publish;

pub use error::ConvertError;
pub use formats::{convert_to_typst, parse_markdown, Conversion, ConvertContext};
pub use frontmatter::DocumentConfig;

/// Converts Markdown text to Typst markup without rendering diagrams.
///
/// Diagram blocks produce no output and image paths are relative to the current directory. Use
/// [`convert_to_typst`] with a [`ConvertContext`] for anything else.
pub fn convert_markdown(source: &str) -> Result<Conversion, ConvertError> {
    let parsed = parse_markdown(source)?;
    let context = ConvertContext {
        config: DocumentConfig::from_frontmatter(parsed.frontmatter.as_deref()),
        ..ConvertContext::default()
    };
    Ok(convert_to_typst(&parsed.document, &context))
}
