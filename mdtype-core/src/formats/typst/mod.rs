//! Typst output.
//!
//! A conversion is the preamble followed by the translated body:
//!
//! - [`preamble`]: global `#set`/`#show` rules derived from the [`DocumentConfig`], including the
//!   page header and footer built by [`placeholder`].
//! - [`serializer`]: the stateful block traversal (page breaks, keep-together groups, diagrams).
//! - [`inline`]: phrasing content.
//!
//! Conversion never touches the filesystem. Files a conversion depends on (header/footer logos)
//! are returned as [`AssetCopy`] entries for the caller to perform once the output is written.

pub mod inline;
pub mod placeholder;
pub mod preamble;
pub mod serializer;

use crate::assets::AssetCopy;
use crate::diagram::RenderedDiagram;
use crate::frontmatter::DocumentConfig;
use crate::ir::nodes::Document;
use placeholder::PlaceholderContext;
use std::path::PathBuf;
use tracing::debug;

/// Default name of the directory, inside the output directory, holding diagrams and logos.
pub const DEFAULT_ASSET_DIR: &str = "diagrams";

/// Everything a conversion needs besides the document itself.
#[derive(Debug, Clone)]
pub struct ConvertContext {
    /// Directory the Typst file is written to. Image paths are made relative to it.
    pub output_dir: PathBuf,
    /// Directory of the Markdown source.
    pub source_dir: PathBuf,
    /// Name of the asset directory inside `output_dir`.
    pub asset_dir: String,
    /// Rendered diagrams, in document order. Failed diagrams are absent.
    pub diagrams: Vec<RenderedDiagram>,
    pub config: DocumentConfig,
}

impl Default for ConvertContext {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            source_dir: PathBuf::from("."),
            asset_dir: DEFAULT_ASSET_DIR.to_string(),
            diagrams: Vec::new(),
            config: DocumentConfig::default(),
        }
    }
}

impl ConvertContext {
    fn placeholders(&self) -> PlaceholderContext<'_> {
        PlaceholderContext {
            output_dir: &self.output_dir,
            source_dir: &self.source_dir,
            asset_dir: &self.asset_dir,
        }
    }
}

/// The result of a conversion.
#[derive(Debug, Clone, PartialEq)]
pub struct Conversion {
    pub markup: String,
    /// Copies to perform after `markup` has been written.
    pub assets: Vec<AssetCopy>,
}

/// Convert a document to Typst markup.
pub fn convert_to_typst(document: &Document, context: &ConvertContext) -> Conversion {
    let title_mode = context.config.title_mode_for(document);
    debug!(title_mode, diagrams = context.diagrams.len(), "converting to typst");

    let (mut markup, assets) =
        preamble::generate_preamble(&context.config, title_mode, &context.placeholders());
    let mut translator = serializer::Translator::new(context, title_mode);
    markup.push_str(&translator.translate_document(document));

    Conversion { markup, assets }
}
