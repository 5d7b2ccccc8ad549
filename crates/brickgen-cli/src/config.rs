//! Tool configuration (`brickgen.toml`)

use anyhow::{Context, Result};
use brickgen_core::Language;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub generator: GeneratorConfig,
    #[serde(default)]
    pub zip: ZipConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Repository root holding `configs/` and one dir per bindings language
    #[serde(default = "default_root")]
    pub root: PathBuf,
    /// Device config dir, `<root>/configs` when unset
    #[serde(default)]
    pub configs_dir: Option<PathBuf>,
    /// Language of generated documentation
    #[serde(default)]
    pub doc_language: Language,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            configs_dir: None,
            doc_language: Language::default(),
        }
    }
}

fn default_root() -> PathBuf {
    PathBuf::from(".")
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ZipConfig {
    /// Staging dir, `<root>/<bindings>/generator_tmp` when unset
    #[serde(default)]
    pub tmp_dir: Option<PathBuf>,
}

impl Config {
    pub fn configs_dir(&self) -> PathBuf {
        match &self.generator.configs_dir {
            Some(dir) => dir.clone(),
            None => self.generator.root.join("configs"),
        }
    }
}

/// Load the configuration, falling back to defaults when the file is missing
pub fn load_config(path: &Path) -> Result<Config> {
    if path.exists() {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        info!(path = %path.display(), "Loaded configuration");
        Ok(config)
    } else {
        info!(
            path = %path.display(),
            "Configuration file not found, using defaults"
        );
        Ok(Config::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let config = load_config(&dir.path().join("brickgen.toml")).unwrap();

        assert_eq!(config.generator.root, PathBuf::from("."));
        assert_eq!(config.generator.doc_language, Language::En);
        assert_eq!(config.configs_dir(), PathBuf::from("./configs"));
        assert!(config.zip.tmp_dir.is_none());
    }

    #[test]
    fn test_partial_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("brickgen.toml");
        std::fs::write(
            &path,
            r#"
[generator]
root = "/srv/generators"
doc_language = "de"
"#,
        )
        .unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.generator.root, PathBuf::from("/srv/generators"));
        assert_eq!(config.generator.doc_language, Language::De);
        assert_eq!(config.configs_dir(), PathBuf::from("/srv/generators/configs"));
        assert!(config.zip.tmp_dir.is_none());
    }

    #[test]
    fn test_full_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("brickgen.toml");
        std::fs::write(
            &path,
            r#"
[generator]
configs_dir = "/data/devices"

[zip]
tmp_dir = "/tmp/brickgen"
"#,
        )
        .unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.configs_dir(), PathBuf::from("/data/devices"));
        assert_eq!(config.zip.tmp_dir, Some(PathBuf::from("/tmp/brickgen")));
    }

    #[test]
    fn test_invalid_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("brickgen.toml");
        std::fs::write(&path, "[generator]\ndoc_language = \"fr\"\n").unwrap();

        assert!(load_config(&path).is_err());
    }
}
