//! PDF compilation through the `typst` binary.

use crate::error::ConvertError;
use std::env;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::debug;
use which::which;

/// Environment variable overriding the `typst` binary.
pub const TYPST_ENV_VAR: &str = "MDTYPE_TYPST_BIN";

/// A located `typst` binary.
#[derive(Debug, Clone)]
pub struct TypstCompiler {
    program: PathBuf,
}

impl TypstCompiler {
    /// Lookup order: `MDTYPE_TYPST_BIN`, the configured path, then `typst` on `PATH`.
    pub fn discover(configured: Option<&Path>) -> Result<Self, ConvertError> {
        if let Some(path) = env::var_os(TYPST_ENV_VAR) {
            if !path.is_empty() {
                return Ok(Self::new(path));
            }
        }

        if let Some(path) = configured {
            return Ok(Self::new(path));
        }

        which("typst").map(Self::new).map_err(|_| {
            ConvertError::ToolNotFound(format!(
                "Unable to locate the typst compiler. Install typst or set {TYPST_ENV_VAR}."
            ))
        })
    }

    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Run `typst compile <input> <output>`.
    pub fn compile(&self, input: &Path, output: &Path) -> Result<(), ConvertError> {
        debug!(program = %self.program.display(), input = %input.display(), "compiling");
        let result = Command::new(&self.program)
            .arg("compile")
            .arg(input)
            .arg(output)
            .output()
            .map_err(|e| {
                ConvertError::CompileError(format!(
                    "Failed to launch typst ({}): {e}",
                    self.program.display()
                ))
            })?;

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            return Err(ConvertError::CompileError(format!(
                "typst exited with status {}: {}",
                result.status,
                stderr.trim()
            )));
        }
        Ok(())
    }
}
