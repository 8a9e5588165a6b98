//! Diagram blocks and their rendered images.
//!
//! The Markdown adapter extracts every fenced block tagged [`DIAGRAM_LANGUAGE`] as a
//! [`DiagramBlock`]. A renderer turns the blocks into images and reports one
//! [`RenderedDiagram`] per success; failed diagrams are simply missing from its output.
//!
//! The converter consumes rendered diagrams by position, not by id: the Nth diagram block in
//! the document gets the Nth rendered image. When a diagram in the middle fails, every later
//! block therefore shows the image of the diagram after it. This is a known limitation.

#[cfg(feature = "native-export")]
pub mod mermaid;

use std::path::PathBuf;

/// Info-string tag marking a code block as a diagram description.
pub const DIAGRAM_LANGUAGE: &str = "mermaid";

/// A diagram description extracted from the document.
#[derive(Debug, Clone, PartialEq)]
pub struct DiagramBlock {
    /// Stable id assigned in document order (`diagram-0`, `diagram-1`, ...).
    pub id: String,
    pub source: String,
}

impl DiagramBlock {
    pub fn new(index: usize, source: impl Into<String>) -> Self {
        Self {
            id: format!("diagram-{index}"),
            source: source.into(),
        }
    }
}

/// A successfully rendered diagram.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedDiagram {
    pub id: String,
    pub image_path: PathBuf,
}
