//! Bindings changelog parsing
//!
//! Entries start with a `YYYY-MM-DD: x.y.z` line, optionally followed by a
//! parenthesized commit, and carry the note lines up to the next entry:
//!
//! ```text
//! 2017-05-10: 2.0.0 (a1b2c3d)
//! - Initial version
//! ```

use chrono::NaiveDate;
use regex::Regex;
use semver::Version;
use std::path::Path;
use std::sync::OnceLock;

use crate::generator::GeneratorError;
use crate::text;

static HEADER: OnceLock<Regex> = OnceLock::new();

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangelogEntry {
    pub date: NaiveDate,
    pub version: Version,
    pub notes: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct Changelog {
    entries: Vec<ChangelogEntry>,
}

impl Changelog {
    pub fn parse(content: &str) -> Result<Self, GeneratorError> {
        let header = text::cached_regex(&HEADER, r"^(\d{4}-\d{2}-\d{2}):\s+(\d+\.\d+\.\d+)\b")
            .map_err(|e| GeneratorError::Changelog(e.to_string()))?;

        let mut entries: Vec<ChangelogEntry> = Vec::new();
        for (index, line) in content.lines().enumerate() {
            let line = line.trim_end();
            if line.is_empty() {
                continue;
            }

            if let Some(captures) = header.captures(line) {
                let date = NaiveDate::parse_from_str(&captures[1], "%Y-%m-%d").map_err(|e| {
                    GeneratorError::Changelog(format!("line {}: {}", index + 1, e))
                })?;
                let version = Version::parse(&captures[2]).map_err(|e| {
                    GeneratorError::Changelog(format!("line {}: {}", index + 1, e))
                })?;

                if let Some(previous) = entries.last() {
                    if version <= previous.version {
                        return Err(GeneratorError::Changelog(format!(
                            "line {}: version {} does not follow {}",
                            index + 1,
                            version,
                            previous.version
                        )));
                    }
                }

                entries.push(ChangelogEntry {
                    date,
                    version,
                    notes: Vec::new(),
                });
                continue;
            }

            match entries.last_mut() {
                Some(entry) => entry.notes.push(line.trim().to_string()),
                None => {
                    return Err(GeneratorError::Changelog(format!(
                        "line {}: text before the first entry",
                        index + 1
                    )))
                }
            }
        }

        Ok(Self { entries })
    }

    pub fn from_file(path: &Path) -> Result<Self, GeneratorError> {
        if !path.exists() {
            return Err(GeneratorError::MissingFile(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn entries(&self) -> &[ChangelogEntry] {
        &self.entries
    }

    /// The newest entry, entries being in ascending version order
    pub fn latest(&self) -> Option<&ChangelogEntry> {
        self.entries.last()
    }
}
