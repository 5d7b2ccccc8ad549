//! Release archive packaging
//!
//! The staging dir is recreated on every run and filled with the released
//! bindings files (`source/`), released examples (`examples/`) and the
//! changelog, readme and license. It is then compressed into
//! `<bindings>/tinkerforge_<bindings>_bindings_<x>_<y>_<z>.zip` with a
//! `sha256sum` compatible checksum file next to it.

use brickgen_core::Device;
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::changelog::Changelog;
use crate::fs;
use crate::generator::{Generator, GeneratorContext, GeneratorError, ReleasedFiles};

#[derive(Debug, Default)]
pub struct ZipGenerator {
    archive: Option<PathBuf>,
}

impl ZipGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Path of the archive written by the last finished run
    pub fn archive(&self) -> Option<&Path> {
        self.archive.as_deref()
    }
}

/// `tinkerforge_csharp_bindings_2_1_33.zip`
pub fn archive_name(bindings_name: &str, version: &semver::Version) -> String {
    format!(
        "tinkerforge_{}_bindings_{}_{}_{}.zip",
        bindings_name, version.major, version.minor, version.patch
    )
}

/// Compress every file below `dir` into `archive`, entries in sorted order
pub fn create_zip_file(dir: &Path, archive: &Path) -> Result<usize, GeneratorError> {
    let files = fs::list_files(dir)?;

    let file = File::create(archive)?;
    let mut zip = ZipWriter::new(file);
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .compression_level(Some(6));

    for relative in &files {
        let entry = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        zip.start_file(entry.as_str(), options)?;
        zip.write_all(&std::fs::read(dir.join(relative))?)?;
        debug!(entry = %entry, "Added archive entry");
    }

    zip.finish()?;
    Ok(files.len())
}

/// Write `<archive>.sha256` in `sha256sum` format and return the digest
pub fn write_checksum(archive: &Path) -> Result<String, GeneratorError> {
    let mut hasher = Sha256::new();
    hasher.update(std::fs::read(archive)?);
    let digest = hex::encode(hasher.finalize());

    let file_name = archive
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let mut checksum_path = archive.as_os_str().to_owned();
    checksum_path.push(".sha256");
    std::fs::write(PathBuf::from(checksum_path), format!("{}  {}\n", digest, file_name))?;

    Ok(digest)
}

impl Generator for ZipGenerator {
    fn name(&self) -> &'static str {
        "zip"
    }

    fn prepare(&mut self, ctx: &GeneratorContext) -> Result<(), GeneratorError> {
        let tmp_dir = ctx.tmp_dir();
        fs::recreate_dir(&tmp_dir)?;
        std::fs::create_dir_all(tmp_dir.join("source"))?;
        self.archive = None;
        Ok(())
    }

    fn is_matching(&self, device: &Device) -> bool {
        device.released
    }

    fn generate(
        &mut self,
        _ctx: &GeneratorContext,
        _device: &Device,
    ) -> Result<(), GeneratorError> {
        Ok(())
    }

    fn finish(&mut self, ctx: &GeneratorContext) -> Result<(), GeneratorError> {
        let tmp_dir = ctx.tmp_dir();
        let source_dir = tmp_dir.join("source");

        for file in ReleasedFiles::from_file(&ctx.released_files_path())?.iter() {
            fs::copy_into(&ctx.bindings_dir().join(file), &source_dir)?;
        }

        let examples_manifest = ctx.released_examples_path();
        if examples_manifest.exists() {
            for example in ReleasedFiles::from_file(&examples_manifest)?.iter() {
                fs::copy_file(
                    &ctx.examples_dir().join(example),
                    &tmp_dir.join("examples").join(example),
                )?;
            }
        }

        fs::copy_into(&ctx.changelog_path(), &tmp_dir)?;
        fs::copy_into(&ctx.readme_path(), &tmp_dir)?;
        fs::copy_into(&ctx.license_path(), &tmp_dir)?;

        let changelog = Changelog::from_file(&ctx.changelog_path())?;
        let version = changelog
            .latest()
            .map(|entry| entry.version.clone())
            .ok_or_else(|| GeneratorError::Changelog("no entries".to_string()))?;

        let archive = ctx
            .bindings_root_dir()
            .join(archive_name(ctx.bindings_name(), &version));
        let entries = create_zip_file(&tmp_dir, &archive)?;
        let digest = write_checksum(&archive)?;

        info!(
            archive = %archive.display(),
            entries,
            sha256 = %digest,
            "Archive written"
        );
        self.archive = Some(archive);
        Ok(())
    }
}
