//! Generator lifecycle and the paths every generator writes to
//!
//! A run is `prepare`, then `generate` once per matching device in registry
//! order, then `finish`. The first error aborts the run; nothing is rolled
//! back.

use brickgen_core::{Device, DeviceRegistry, Language};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

use crate::changelog::Changelog;

#[derive(Error, Debug)]
pub enum GeneratorError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("ZIP error: {0}")]
    ZipError(#[from] zip::result::ZipError),
    #[error("Directory walk error: {0}")]
    WalkError(#[from] walkdir::Error),
    #[error("Missing file: {0}")]
    MissingFile(PathBuf),
    #[error("Invalid changelog: {0}")]
    Changelog(String),
}

/// Paths and settings shared by all generators of one bindings language
#[derive(Debug, Clone)]
pub struct GeneratorContext {
    root: PathBuf,
    bindings_name: String,
    language: Language,
    configs_dir: Option<PathBuf>,
    tmp_dir: Option<PathBuf>,
    generated_on: NaiveDate,
}

impl GeneratorContext {
    pub fn new(root: impl Into<PathBuf>, bindings_name: &str, language: Language) -> Self {
        Self {
            root: root.into(),
            bindings_name: bindings_name.to_string(),
            language,
            configs_dir: None,
            tmp_dir: None,
            generated_on: chrono::Local::now().date_naive(),
        }
    }

    /// Read device configs and the license from somewhere other than `<root>/configs`
    pub fn with_configs_dir(mut self, configs_dir: impl Into<PathBuf>) -> Self {
        self.configs_dir = Some(configs_dir.into());
        self
    }

    /// Stage archives somewhere other than `<bindings>/generator_tmp`
    pub fn with_tmp_dir(mut self, tmp_dir: impl Into<PathBuf>) -> Self {
        self.tmp_dir = Some(tmp_dir.into());
        self
    }

    /// Date written into generated file headers
    pub fn with_generated_on(mut self, date: NaiveDate) -> Self {
        self.generated_on = date;
        self
    }

    pub fn bindings_name(&self) -> &str {
        &self.bindings_name
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn generated_on(&self) -> NaiveDate {
        self.generated_on
    }

    pub fn root_dir(&self) -> &Path {
        &self.root
    }

    pub fn configs_dir(&self) -> PathBuf {
        match &self.configs_dir {
            Some(dir) => dir.clone(),
            None => self.root.join("configs"),
        }
    }

    /// `<root>/<bindings>`, holding changelog, readme and all output
    pub fn bindings_root_dir(&self) -> PathBuf {
        self.root.join(&self.bindings_name)
    }

    pub fn bindings_dir(&self) -> PathBuf {
        self.bindings_root_dir().join("bindings")
    }

    pub fn examples_dir(&self) -> PathBuf {
        self.bindings_root_dir().join("examples")
    }

    pub fn doc_dir(&self) -> PathBuf {
        self.bindings_root_dir()
            .join("doc")
            .join(self.language.as_str())
    }

    pub fn tmp_dir(&self) -> PathBuf {
        match &self.tmp_dir {
            Some(dir) => dir.clone(),
            None => self.bindings_root_dir().join("generator_tmp"),
        }
    }

    pub fn released_files_path(&self) -> PathBuf {
        self.bindings_root_dir()
            .join(format!("{}_released_files.json", self.bindings_name))
    }

    pub fn released_examples_path(&self) -> PathBuf {
        self.bindings_root_dir()
            .join(format!("{}_released_examples.json", self.bindings_name))
    }

    pub fn changelog_path(&self) -> PathBuf {
        self.bindings_root_dir().join("changelog.txt")
    }

    pub fn readme_path(&self) -> PathBuf {
        self.bindings_root_dir().join("readme.txt")
    }

    pub fn license_path(&self) -> PathBuf {
        self.configs_dir().join("license.txt")
    }

    /// Newest version of the changelog, `None` without a changelog
    pub fn bindings_version(&self) -> Result<Option<semver::Version>, GeneratorError> {
        let path = self.changelog_path();
        if !path.exists() {
            return Ok(None);
        }
        let changelog = Changelog::from_file(&path)?;
        Ok(changelog.latest().map(|entry| entry.version.clone()))
    }
}

/// A single output stage, driven by [`run`]
pub trait Generator {
    /// Short name for logging
    fn name(&self) -> &'static str;

    fn prepare(&mut self, _ctx: &GeneratorContext) -> Result<(), GeneratorError> {
        Ok(())
    }

    fn is_matching(&self, _device: &Device) -> bool {
        true
    }

    fn generate(&mut self, ctx: &GeneratorContext, device: &Device) -> Result<(), GeneratorError>;

    fn finish(&mut self, _ctx: &GeneratorContext) -> Result<(), GeneratorError> {
        Ok(())
    }
}

/// Outcome of a generator run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GenerateSummary {
    pub generated: usize,
    pub skipped: usize,
}

/// Run a generator over every device of the registry
pub fn run(
    ctx: &GeneratorContext,
    registry: &DeviceRegistry,
    generator: &mut dyn Generator,
) -> Result<GenerateSummary, GeneratorError> {
    info!(
        generator = generator.name(),
        bindings = %ctx.bindings_name(),
        "Starting generator"
    );

    generator.prepare(ctx)?;

    let mut summary = GenerateSummary::default();
    for device in registry.devices() {
        if !generator.is_matching(device) {
            debug!(device = %device.long_display_name(), "Skipping device");
            summary.skipped += 1;
            continue;
        }

        debug!(device = %device.long_display_name(), "Generating device");
        generator.generate(ctx, device)?;
        summary.generated += 1;
    }

    generator.finish(ctx)?;

    info!(
        generator = generator.name(),
        generated = summary.generated,
        skipped = summary.skipped,
        "Generator finished"
    );
    Ok(summary)
}

/// Files produced for released devices, relative to their output dir
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReleasedFiles {
    files: Vec<String>,
}

impl ReleasedFiles {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, file: impl Into<String>) {
        self.files.push(file.into());
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.files.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Load a manifest; a missing file is an error
    pub fn from_file(path: &Path) -> Result<Self, GeneratorError> {
        if !path.exists() {
            return Err(GeneratorError::MissingFile(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save(&self, path: &Path) -> Result<(), GeneratorError> {
        let content = serde_json::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        debug!(path = %path.display(), files = self.len(), "Saved released files");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_context_paths() {
        let ctx = GeneratorContext::new("/repo", "csharp", Language::De);
        assert_eq!(ctx.configs_dir(), PathBuf::from("/repo/configs"));
        assert_eq!(ctx.bindings_dir(), PathBuf::from("/repo/csharp/bindings"));
        assert_eq!(ctx.examples_dir(), PathBuf::from("/repo/csharp/examples"));
        assert_eq!(ctx.doc_dir(), PathBuf::from("/repo/csharp/doc/de"));
        assert_eq!(ctx.tmp_dir(), PathBuf::from("/repo/csharp/generator_tmp"));
        assert_eq!(
            ctx.released_files_path(),
            PathBuf::from("/repo/csharp/csharp_released_files.json")
        );
        assert_eq!(
            ctx.released_examples_path(),
            PathBuf::from("/repo/csharp/csharp_released_examples.json")
        );
        assert_eq!(ctx.license_path(), PathBuf::from("/repo/configs/license.txt"));

        let ctx = ctx
            .with_tmp_dir("/tmp/staging")
            .with_configs_dir("/devices");
        assert_eq!(ctx.tmp_dir(), PathBuf::from("/tmp/staging"));
        assert_eq!(ctx.license_path(), PathBuf::from("/devices/license.txt"));
    }

    #[test]
    fn test_bindings_version() {
        let dir = TempDir::new().unwrap();
        let ctx = GeneratorContext::new(dir.path(), "json", Language::En);
        assert_eq!(ctx.bindings_version().unwrap(), None);

        std::fs::create_dir_all(ctx.bindings_root_dir()).unwrap();
        std::fs::write(
            ctx.changelog_path(),
            "2017-05-10: 2.0.0 (12345678)\n- Initial version\n\n\
             2017-07-26: 2.0.1 (abcdef01)\n- Fix typos\n",
        )
        .unwrap();
        assert_eq!(
            ctx.bindings_version().unwrap(),
            Some(semver::Version::new(2, 0, 1))
        );
    }

    #[test]
    fn test_released_files_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("released.json");

        let mut files = ReleasedFiles::new();
        files.push("BrickletPiezoBuzzer.cs");
        files.push("BrickDC.cs");
        files.save(&path).unwrap();

        let loaded = ReleasedFiles::from_file(&path).unwrap();
        assert_eq!(loaded, files);
        assert_eq!(loaded.iter().collect::<Vec<_>>(), vec!["BrickletPiezoBuzzer.cs", "BrickDC.cs"]);
    }

    #[test]
    fn test_released_files_missing() {
        let dir = TempDir::new().unwrap();
        let result = ReleasedFiles::from_file(&dir.path().join("none.json"));
        assert!(matches!(result, Err(GeneratorError::MissingFile(_))));
    }

    struct Counting {
        calls: Vec<String>,
    }

    impl Generator for Counting {
        fn name(&self) -> &'static str {
            "counting"
        }

        fn prepare(&mut self, _ctx: &GeneratorContext) -> Result<(), GeneratorError> {
            self.calls.push("prepare".to_string());
            Ok(())
        }

        fn is_matching(&self, device: &Device) -> bool {
            device.released
        }

        fn generate(
            &mut self,
            _ctx: &GeneratorContext,
            device: &Device,
        ) -> Result<(), GeneratorError> {
            self.calls.push(device.name.under());
            Ok(())
        }

        fn finish(&mut self, _ctx: &GeneratorContext) -> Result<(), GeneratorError> {
            self.calls.push("finish".to_string());
            Ok(())
        }
    }

    fn registry() -> DeviceRegistry {
        let device = |identifier: u16, name: &str, released: bool| {
            brickgen_core::DeviceConfig::from_toml(&format!(
                r#"
author = "Test"
api_version = [2, 0, 0]
category = "Bricklet"
device_identifier = {identifier}
name = "{name}"
display_name = "{name}"
released = {released}
features = ["device"]
description = {{ en = "", de = "" }}
"#
            ))
            .unwrap()
            .into_device()
            .unwrap()
        };
        DeviceRegistry::from_devices(vec![
            device(2, "Moisture", true),
            device(1, "Analog In", false),
            device(3, "Barometer", true),
        ])
        .unwrap()
    }

    #[test]
    fn test_run_lifecycle() {
        let ctx = GeneratorContext::new("/unused", "json", Language::En);
        let mut generator = Counting { calls: Vec::new() };

        let summary = run(&ctx, &registry(), &mut generator).unwrap();
        assert_eq!(summary, GenerateSummary { generated: 2, skipped: 1 });
        assert_eq!(generator.calls, vec!["prepare", "barometer", "moisture", "finish"]);
    }

    struct Failing;

    impl Generator for Failing {
        fn name(&self) -> &'static str {
            "failing"
        }

        fn generate(
            &mut self,
            _ctx: &GeneratorContext,
            device: &Device,
        ) -> Result<(), GeneratorError> {
            Err(GeneratorError::MissingFile(PathBuf::from(device.name.under())))
        }

        fn finish(&mut self, _ctx: &GeneratorContext) -> Result<(), GeneratorError> {
            panic!("finish must not run after a failure");
        }
    }

    #[test]
    fn test_run_aborts_on_error() {
        let ctx = GeneratorContext::new("/unused", "json", Language::En);
        let result = run(&ctx, &registry(), &mut Failing);
        assert!(matches!(
            result,
            Err(GeneratorError::MissingFile(path)) if path == PathBuf::from("analog_in")
        ));
    }
}
