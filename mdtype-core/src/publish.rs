//! Document publishing pipeline.
//!
//! Runs a full conversion from a Markdown file on disk:
//!
//! 1. read the input and parse it
//! 2. render diagrams into the asset directory (failures are reported and skipped)
//! 3. convert to Typst and write the `.typ` file
//! 4. perform the asset copies the conversion queued
//! 5. optionally compile to PDF
//!
//! Steps 1 and 3 are fatal. A compile failure is reported after the `.typ` file is written, and
//! the file stays on disk.
//!
//! Progress is reported through [`PublishEvent`]s rather than printed, so callers decide how
//! (and whether) to show it. Each phase is announced before it starts.

use crate::assets;
use crate::compile::TypstCompiler;
use crate::diagram::mermaid::{MermaidRenderer, RenderOptions};
use crate::diagram::{DiagramBlock, RenderedDiagram};
use crate::error::ConvertError;
use crate::formats::markdown::parse_markdown;
use crate::formats::typst::{convert_to_typst, ConvertContext, DEFAULT_ASSET_DIR};
use crate::frontmatter::DocumentConfig;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Specifies how to publish a document.
///
/// ```ignore
/// let spec = PublishSpec::new("notes.md", "notes.typ")
///     .with_pdf("notes.pdf")
///     .with_asset_dir("assets");
/// ```
#[derive(Debug, Clone)]
pub struct PublishSpec {
    /// The Markdown source.
    pub input: PathBuf,
    /// Where the Typst markup is written.
    pub output: PathBuf,
    /// When set, the markup is compiled to this PDF.
    pub pdf: Option<PathBuf>,
    /// Name of the asset directory, created next to `output`.
    pub asset_dir: String,
    /// Renderer settings, or `None` to leave diagram blocks out.
    pub diagrams: Option<RenderOptions>,
    /// Configured `typst` binary.
    pub typst: Option<PathBuf>,
}

impl PublishSpec {
    pub fn new(input: impl AsRef<Path>, output: impl AsRef<Path>) -> Self {
        Self {
            input: input.as_ref().to_path_buf(),
            output: output.as_ref().to_path_buf(),
            pdf: None,
            asset_dir: DEFAULT_ASSET_DIR.to_string(),
            diagrams: Some(RenderOptions::default()),
            typst: None,
        }
    }

    /// Compile the written markup to `path`.
    pub fn with_pdf(mut self, path: impl AsRef<Path>) -> Self {
        self.pdf = Some(path.as_ref().to_path_buf());
        self
    }

    pub fn with_asset_dir(mut self, name: impl Into<String>) -> Self {
        self.asset_dir = name.into();
        self
    }

    pub fn with_render_options(mut self, options: RenderOptions) -> Self {
        self.diagrams = Some(options);
        self
    }

    /// Skip diagram rendering; diagram blocks produce no output.
    pub fn without_diagrams(mut self) -> Self {
        self.diagrams = None;
        self
    }

    pub fn with_typst(mut self, program: impl AsRef<Path>) -> Self {
        self.typst = Some(program.as_ref().to_path_buf());
        self
    }

    fn output_dir(&self) -> PathBuf {
        parent_dir(&self.output)
    }
}

/// Progress notifications emitted while publishing.
#[derive(Debug)]
pub enum PublishEvent<'a> {
    /// Parsing is about to start.
    Parsing(&'a Path),
    /// The input was parsed.
    Parsed {
        diagrams: usize,
        has_page_bands: bool,
    },
    /// Diagram rendering is about to start.
    Rendering {
        count: usize,
    },
    DiagramRendered(&'a RenderedDiagram),
    DiagramFailed {
        block: &'a DiagramBlock,
        error: &'a ConvertError,
    },
    /// Diagram rendering was skipped entirely, e.g. because no renderer was found.
    DiagramsSkipped {
        count: usize,
        reason: &'a ConvertError,
    },
    /// Every diagram has been attempted.
    RenderFinished {
        rendered: usize,
        total: usize,
    },
    /// Conversion to Typst is about to start.
    Converting,
    /// The Typst file was written.
    Written(&'a Path),
    Compiling(&'a Path),
    Compiled(&'a Path),
}

/// Result of a successful publish operation.
#[derive(Debug, Clone, PartialEq)]
pub struct PublishResult {
    pub typst_path: PathBuf,
    pub pdf_path: Option<PathBuf>,
    pub diagrams_rendered: usize,
    pub diagrams_total: usize,
    /// Queued asset copies that failed (each one was logged).
    pub asset_failures: usize,
}

/// Publishes a document as described by `spec`.
///
/// # Errors
///
/// Returns [`ConvertError`] if:
/// - the input cannot be read, or parsing fails
/// - the output cannot be written
/// - compilation was requested and `typst` is missing or fails
pub fn publish(
    spec: &PublishSpec,
    mut observer: impl FnMut(PublishEvent<'_>),
) -> Result<PublishResult, ConvertError> {
    let source = fs::read_to_string(&spec.input).map_err(|e| ConvertError::io(&spec.input, e))?;
    observer(PublishEvent::Parsing(&spec.input));
    let parsed = parse_markdown(&source)?;
    let config = DocumentConfig::from_frontmatter(parsed.frontmatter.as_deref());
    observer(PublishEvent::Parsed {
        diagrams: parsed.diagrams.len(),
        has_page_bands: config.has_page_bands(),
    });

    let output_dir = spec.output_dir();
    let diagrams = render(spec, &parsed.diagrams, &output_dir, &mut observer);
    let diagrams_rendered = diagrams.len();

    observer(PublishEvent::Converting);
    let context = ConvertContext {
        output_dir,
        source_dir: parent_dir(&spec.input),
        asset_dir: spec.asset_dir.clone(),
        diagrams,
        config,
    };
    let conversion = convert_to_typst(&parsed.document, &context);

    fs::write(&spec.output, &conversion.markup).map_err(|e| ConvertError::io(&spec.output, e))?;
    info!(path = %spec.output.display(), "wrote typst file");
    observer(PublishEvent::Written(&spec.output));

    let asset_failures = conversion.assets.len() - assets::perform_all(&conversion.assets);

    if let Some(pdf) = &spec.pdf {
        observer(PublishEvent::Compiling(pdf));
        let compiler = TypstCompiler::discover(spec.typst.as_deref())?;
        compiler.compile(&spec.output, pdf)?;
        observer(PublishEvent::Compiled(pdf));
    }

    Ok(PublishResult {
        typst_path: spec.output.clone(),
        pdf_path: spec.pdf.clone(),
        diagrams_rendered,
        diagrams_total: parsed.diagrams.len(),
        asset_failures,
    })
}

fn render(
    spec: &PublishSpec,
    blocks: &[DiagramBlock],
    output_dir: &Path,
    observer: &mut impl FnMut(PublishEvent<'_>),
) -> Vec<RenderedDiagram> {
    let Some(options) = &spec.diagrams else {
        return Vec::new();
    };
    if blocks.is_empty() {
        return Vec::new();
    }

    observer(PublishEvent::Rendering {
        count: blocks.len(),
    });
    let rendered = match MermaidRenderer::discover(options.clone()) {
        Ok(renderer) => {
            let diagram_dir = output_dir.join(&spec.asset_dir);
            renderer.render_all(blocks, &diagram_dir, |block, outcome| match outcome {
                Ok(diagram) => observer(PublishEvent::DiagramRendered(diagram)),
                Err(error) => {
                    warn!(id = %block.id, "Failed to render diagram: {error}");
                    observer(PublishEvent::DiagramFailed { block, error });
                }
            })
        }
        Err(err) => {
            warn!("Skipping {} diagram(s): {err}", blocks.len());
            observer(PublishEvent::DiagramsSkipped {
                count: blocks.len(),
                reason: &err,
            });
            Vec::new()
        }
    };

    observer(PublishEvent::RenderFinished {
        rendered: rendered.len(),
        total: blocks.len(),
    });
    rendered
}

/// The directory containing `path`, or `.` for a bare file name.
fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}
