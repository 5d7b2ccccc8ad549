//! File helpers for generator output and archive staging

use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

use crate::generator::GeneratorError;

/// Remove a directory with all of its content if present, then create it empty
pub fn recreate_dir(path: &Path) -> Result<(), GeneratorError> {
    if path.exists() {
        debug!(path = %path.display(), "Removing directory");
        std::fs::remove_dir_all(path)?;
    }
    std::fs::create_dir_all(path)?;
    Ok(())
}

/// Copy a file to `dest`, creating missing parent directories
pub fn copy_file(src: &Path, dest: &Path) -> Result<(), GeneratorError> {
    if !src.is_file() {
        return Err(GeneratorError::MissingFile(src.to_path_buf()));
    }
    if let Some(parent) = dest.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::copy(src, dest)?;
    Ok(())
}

/// Copy a file into a directory, keeping its file name
pub fn copy_into(src: &Path, dir: &Path) -> Result<PathBuf, GeneratorError> {
    let file_name = src
        .file_name()
        .ok_or_else(|| GeneratorError::MissingFile(src.to_path_buf()))?;
    let dest = dir.join(file_name);
    copy_file(src, &dest)?;
    Ok(dest)
}

/// Write a generated file, creating missing parent directories
pub fn write_file(path: &Path, content: &str) -> Result<(), GeneratorError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, content)?;
    debug!(path = %path.display(), bytes = content.len(), "Wrote file");
    Ok(())
}

/// All regular files below `dir`, as sorted paths relative to it.
/// Symlinks are neither followed nor listed.
pub fn list_files(dir: &Path) -> Result<Vec<PathBuf>, GeneratorError> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        if let Ok(relative) = entry.path().strip_prefix(dir) {
            files.push(relative.to_path_buf());
        }
    }
    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_recreate_dir_clears_content() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("staging");
        std::fs::create_dir_all(target.join("old")).unwrap();
        std::fs::write(target.join("old").join("stale.txt"), "stale").unwrap();

        recreate_dir(&target).unwrap();
        assert!(target.is_dir());
        assert_eq!(std::fs::read_dir(&target).unwrap().count(), 0);

        let fresh = dir.path().join("fresh");
        recreate_dir(&fresh).unwrap();
        assert!(fresh.is_dir());
    }

    #[test]
    fn test_copy_into() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("readme.txt");
        std::fs::write(&src, "hello").unwrap();

        let dest = copy_into(&src, &dir.path().join("out")).unwrap();
        assert_eq!(dest, dir.path().join("out").join("readme.txt"));
        assert_eq!(std::fs::read_to_string(dest).unwrap(), "hello");
    }

    #[test]
    fn test_copy_missing_source() {
        let dir = TempDir::new().unwrap();
        let result = copy_into(&dir.path().join("missing.txt"), dir.path());
        assert!(matches!(result, Err(GeneratorError::MissingFile(_))));
    }

    #[test]
    fn test_list_files_sorted_and_relative() {
        let dir = TempDir::new().unwrap();
        write_file(&dir.path().join("source").join("b.cs"), "b").unwrap();
        write_file(&dir.path().join("source").join("a.cs"), "a").unwrap();
        write_file(&dir.path().join("changelog.txt"), "c").unwrap();

        let files = list_files(dir.path()).unwrap();
        assert_eq!(
            files,
            vec![
                PathBuf::from("changelog.txt"),
                PathBuf::from("source").join("a.cs"),
                PathBuf::from("source").join("b.cs"),
            ]
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_list_files_skips_symlinks() {
        let dir = TempDir::new().unwrap();
        let staging = dir.path().join("staging");
        write_file(&staging.join("source").join("a.cs"), "a").unwrap();
        std::os::unix::fs::symlink(&staging, staging.join("source").join("loop")).unwrap();
        std::os::unix::fs::symlink(
            staging.join("source").join("a.cs"),
            staging.join("link.cs"),
        )
        .unwrap();

        let files = list_files(&staging).unwrap();
        assert_eq!(files, vec![PathBuf::from("source").join("a.cs")]);
    }
}
