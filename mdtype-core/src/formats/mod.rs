//! Format implementations
//!
//! Markdown is the only input and Typst the only output. Both sides go through the document
//! tree in [`crate::ir`], so neither module knows about the other.

pub mod markdown;
pub mod typst;

pub use markdown::{parse_markdown, ParsedMarkdown};
pub use typst::{convert_to_typst, Conversion, ConvertContext};
