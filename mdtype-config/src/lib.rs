//! Shared configuration loader for the mdtype toolchain.
//!
//! `defaults/mdtype.default.toml` is embedded into every binary so that docs and
//! runtime behavior stay in sync. Applications layer user-specific files on top
//! of those defaults via [`Loader`] before deserializing into [`MdtypeConfig`].
//!
//! This covers how mdtype runs (external tools, output layout). How a document looks is
//! configured in its frontmatter, see [`mdtype_core::frontmatter`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, File, FileFormat, ValueKind};
use mdtype_core::diagram::mermaid::RenderOptions;
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub use config::ConfigError;

const DEFAULT_TOML: &str = include_str!("../defaults/mdtype.default.toml");

/// Name of the optional configuration file looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "mdtype.toml";

/// Top-level configuration consumed by mdtype applications.
#[derive(Debug, Clone, Deserialize)]
pub struct MdtypeConfig {
    pub diagrams: DiagramsConfig,
    pub compile: CompileConfig,
    pub output: OutputConfig,
}

/// Mermaid CLI settings.
#[derive(Debug, Clone, Deserialize)]
pub struct DiagramsConfig {
    pub enabled: bool,
    #[serde(default)]
    pub command: Option<String>,
    pub background: String,
    pub scale: u32,
    #[serde(default)]
    pub puppeteer_config: Option<PathBuf>,
}

impl From<&DiagramsConfig> for RenderOptions {
    fn from(config: &DiagramsConfig) -> Self {
        RenderOptions {
            command: config.command.clone(),
            background: config.background.clone(),
            scale: config.scale,
            puppeteer_config: config.puppeteer_config.clone(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CompileConfig {
    #[serde(default)]
    pub typst: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    pub asset_dir: String,
    pub progress: bool,
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Apply a single key/value override (useful for CLI settings).
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder and deserialize the resulting configuration.
    pub fn build(self) -> Result<MdtypeConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<MdtypeConfig, ConfigError> {
    Loader::new().build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn loads_default_config() {
        let config = load_defaults().expect("defaults to deserialize");
        assert!(config.diagrams.enabled);
        assert_eq!(config.diagrams.command, None);
        assert_eq!(config.diagrams.background, "white");
        assert_eq!(config.diagrams.scale, 2);
        assert_eq!(config.compile.typst, None);
        assert_eq!(config.output.asset_dir, "diagrams");
        assert!(config.output.progress);
    }

    #[test]
    fn supports_overrides() {
        let config = Loader::new()
            .set_override("output.asset_dir", "assets")
            .expect("override to apply")
            .set_override("diagrams.enabled", false)
            .expect("override to apply")
            .build()
            .expect("config to build");
        assert_eq!(config.output.asset_dir, "assets");
        assert!(!config.diagrams.enabled);
    }

    #[test]
    fn files_layer_over_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("mdtype.toml");
        fs::write(
            &path,
            "[diagrams]\ncommand = \"npx -y mmdc\"\nscale = 3\n\n[compile]\ntypst = \"/opt/typst\"\n",
        )
        .unwrap();

        let config = Loader::new().with_file(&path).build().expect("config to build");
        assert_eq!(config.diagrams.command.as_deref(), Some("npx -y mmdc"));
        assert_eq!(config.diagrams.scale, 3);
        assert_eq!(config.diagrams.background, "white");
        assert_eq!(config.compile.typst, Some(PathBuf::from("/opt/typst")));
    }

    #[test]
    fn missing_required_file_is_an_error() {
        let dir = tempdir().unwrap();
        let result = Loader::new().with_file(dir.path().join("absent.toml")).build();
        assert!(result.is_err());
    }

    #[test]
    fn missing_optional_file_is_ignored() {
        let dir = tempdir().unwrap();
        let config = Loader::new()
            .with_optional_file(dir.path().join(LOCAL_CONFIG_FILE))
            .build()
            .expect("config to build");
        assert_eq!(config.output.asset_dir, "diagrams");
    }

    #[test]
    fn diagrams_config_converts_to_render_options() {
        let config = load_defaults().expect("defaults to deserialize");
        let options: RenderOptions = (&config.diagrams).into();
        assert_eq!(options, RenderOptions::default());
    }
}
