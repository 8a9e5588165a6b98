//! Mermaid rendering through the Mermaid CLI (`mmdc`).
//!
//! Each diagram is written to `<id>.mmd` inside the asset directory and rendered to `<id>.png`
//! next to it. PNG is used instead of SVG because Typst does not render the `foreignObject`
//! text that Mermaid puts in its SVG output.

use super::{DiagramBlock, RenderedDiagram};
use crate::error::ConvertError;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::debug;
use which::which;

/// Environment variable overriding the renderer command.
pub const MMDC_ENV_VAR: &str = "MDTYPE_MMDC_BIN";

const PUPPETEER_ARGS: &str = "--no-sandbox --disable-setuid-sandbox";

/// Knobs forwarded to `mmdc`.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOptions {
    /// Command used to run the renderer (e.g. `mmdc` or `npx -y mmdc`). Discovered when unset.
    pub command: Option<String>,
    /// Background color passed with `-b`.
    pub background: String,
    /// Scale factor passed with `-s`.
    pub scale: u32,
    /// Optional puppeteer configuration file passed with `-p`.
    pub puppeteer_config: Option<PathBuf>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            command: None,
            background: "white".to_string(),
            scale: 2,
            puppeteer_config: None,
        }
    }
}

/// A resolved Mermaid CLI invocation.
#[derive(Debug, Clone)]
pub struct MermaidRenderer {
    program: PathBuf,
    prefix_args: Vec<String>,
    options: RenderOptions,
}

impl MermaidRenderer {
    /// Locate the renderer binary.
    ///
    /// Lookup order: `MDTYPE_MMDC_BIN`, the configured command, `mmdc` on `PATH`, then
    /// `npx -y mmdc`.
    pub fn discover(options: RenderOptions) -> Result<Self, ConvertError> {
        let (program, prefix_args) = resolve_mmdc_command(options.command.as_deref())?;
        Ok(Self {
            program,
            prefix_args,
            options,
        })
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Render a single diagram into `diagram_dir`.
    pub fn render(
        &self,
        block: &DiagramBlock,
        diagram_dir: &Path,
    ) -> Result<RenderedDiagram, ConvertError> {
        fs::create_dir_all(diagram_dir).map_err(|e| ConvertError::io(diagram_dir, e))?;

        let source_path = diagram_dir.join(format!("{}.mmd", block.id));
        let image_path = diagram_dir.join(format!("{}.png", block.id));
        fs::write(&source_path, &block.source).map_err(|e| ConvertError::io(&source_path, e))?;

        let mut command = Command::new(&self.program);
        command
            .args(&self.prefix_args)
            .arg("-i")
            .arg(&source_path)
            .arg("-o")
            .arg(&image_path)
            .arg("-b")
            .arg(&self.options.background)
            .arg("-s")
            .arg(self.options.scale.to_string())
            .env("PUPPETEER_ARGS", PUPPETEER_ARGS);
        if let Some(config) = &self.options.puppeteer_config {
            command.arg("-p").arg(config);
        }

        debug!(id = %block.id, program = %self.program.display(), "rendering diagram");
        let output = command.output().map_err(|e| {
            ConvertError::RenderError(format!(
                "Failed to launch {} ({}): {e}",
                self.program.display(),
                block.id
            ))
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ConvertError::RenderError(format!(
                "{} exited with status {}: {}",
                block.id,
                output.status,
                stderr.trim()
            )));
        }

        if !image_path.exists() {
            return Err(ConvertError::RenderError(format!(
                "{} produced no image at {}",
                block.id,
                image_path.display()
            )));
        }

        Ok(RenderedDiagram {
            id: block.id.clone(),
            image_path,
        })
    }

    /// Render every block in order, reporting each outcome to `on_outcome`.
    ///
    /// A failing diagram does not stop the others; only successes are returned.
    pub fn render_all(
        &self,
        blocks: &[DiagramBlock],
        diagram_dir: &Path,
        mut on_outcome: impl FnMut(&DiagramBlock, &Result<RenderedDiagram, ConvertError>),
    ) -> Vec<RenderedDiagram> {
        let mut rendered = Vec::with_capacity(blocks.len());
        for block in blocks {
            let outcome = self.render(block, diagram_dir);
            on_outcome(block, &outcome);
            if let Ok(diagram) = outcome {
                rendered.push(diagram);
            }
        }
        rendered
    }
}

fn resolve_mmdc_command(configured: Option<&str>) -> Result<(PathBuf, Vec<String>), ConvertError> {
    if let Some(command) = env::var_os(MMDC_ENV_VAR) {
        if !command.is_empty() {
            return Ok((PathBuf::from(command), Vec::new()));
        }
    }

    if let Some(command) = configured {
        let mut parts = command.split_whitespace();
        if let Some(program) = parts.next() {
            return Ok((PathBuf::from(program), parts.map(str::to_string).collect()));
        }
    }

    if let Ok(path) = which("mmdc") {
        return Ok((path, Vec::new()));
    }

    if let Ok(npx) = which("npx") {
        return Ok((npx, vec!["-y".to_string(), "mmdc".to_string()]));
    }

    Err(ConvertError::ToolNotFound(format!(
        "Unable to locate the Mermaid CLI (mmdc). Install @mermaid-js/mermaid-cli or set {MMDC_ENV_VAR}."
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configured_command_is_split_into_program_and_arguments() {
        if env::var_os(MMDC_ENV_VAR).is_some() {
            return;
        }
        let options = RenderOptions {
            command: Some("npx -y mmdc".to_string()),
            ..RenderOptions::default()
        };
        let renderer = MermaidRenderer::discover(options).unwrap();
        assert_eq!(renderer.program(), Path::new("npx"));
        assert_eq!(renderer.prefix_args, vec!["-y", "mmdc"]);
    }

    #[test]
    fn no_blocks_render_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = MermaidRenderer {
            program: PathBuf::from("mmdc"),
            prefix_args: Vec::new(),
            options: RenderOptions::default(),
        };
        let mut outcomes = 0;
        let rendered = renderer.render_all(&[], &dir.path().join("diagrams"), |_, _| outcomes += 1);
        assert!(rendered.is_empty());
        assert_eq!(outcomes, 0);
        assert!(!dir.path().join("diagrams").exists());
    }

    #[cfg(unix)]
    #[test]
    fn failures_are_skipped_and_successes_kept() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        // Fails for diagram-1, otherwise copies the source to the output path.
        let stub = dir.path().join("mmdc");
        fs::write(
            &stub,
            "#!/bin/sh\ncase \"$2\" in *diagram-1*) exit 1;; esac\ncp \"$2\" \"$4\"\n",
        )
        .unwrap();
        let mut perms = fs::metadata(&stub).unwrap().permissions();
        perms.set_mode(0o755);
        fs::set_permissions(&stub, perms).unwrap();

        let renderer = MermaidRenderer {
            program: stub,
            prefix_args: Vec::new(),
            options: RenderOptions::default(),
        };
        let blocks: Vec<DiagramBlock> = (0..3)
            .map(|index| DiagramBlock::new(index, "graph TD; A-->B"))
            .collect();
        let out = dir.path().join("diagrams");

        let mut failures = Vec::new();
        let rendered = renderer.render_all(&blocks, &out, |block, outcome| {
            if outcome.is_err() {
                failures.push(block.id.clone());
            }
        });

        let ids: Vec<&str> = rendered.iter().map(|diagram| diagram.id.as_str()).collect();
        assert_eq!(ids, vec!["diagram-0", "diagram-2"]);
        assert_eq!(failures, vec!["diagram-1"]);
        assert!(out.join("diagram-1.mmd").exists());
        assert!(out.join("diagram-2.png").exists());
    }

    #[test]
    fn default_options_match_mmdc_invocation() {
        let options = RenderOptions::default();
        assert_eq!(options.background, "white");
        assert_eq!(options.scale, 2);
        assert!(options.puppeteer_config.is_none());
    }
}
