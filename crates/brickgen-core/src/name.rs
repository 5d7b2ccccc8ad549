//! Identifier names and their per-language flavors
//!
//! Every identifier in a device config is written once in its space-separated
//! form ("Get Distance"). Generators render it in whatever flavor the target
//! language needs (`GetDistance`, `get_distance`, `GET_DISTANCE`, ...).

use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum NameError {
    #[error("Name is empty")]
    Empty,
    #[error("Invalid word {word:?} in name {name:?}")]
    InvalidWord { name: String, word: String },
}

/// A space-separated identifier, e.g. "Set Distance Callback Period"
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Name(String);

impl Name {
    /// Create a name from its space form, normalizing runs of whitespace
    pub fn new(space: &str) -> Result<Self, NameError> {
        let words: Vec<&str> = space.split_whitespace().collect();
        if words.is_empty() {
            return Err(NameError::Empty);
        }

        for word in &words {
            if !word.chars().all(|c| c.is_ascii_alphanumeric()) {
                return Err(NameError::InvalidWord {
                    name: space.to_string(),
                    word: word.to_string(),
                });
            }
        }

        Ok(Self(words.join(" ")))
    }

    /// Wrap a literal that is already a valid, normalized name
    pub(crate) fn from_static(space: &'static str) -> Self {
        debug_assert!(Name::new(space).map(|n| n.0 == space).unwrap_or(false));
        Self(space.to_string())
    }

    fn words(&self) -> impl Iterator<Item = &str> {
        self.0.split(' ')
    }

    /// "Get Distance"
    pub fn space(&self) -> &str {
        &self.0
    }

    /// "GetDistance"
    pub fn camel(&self) -> String {
        self.words().map(capitalize).collect()
    }

    /// "getDistance"
    pub fn headless(&self) -> String {
        let camel = self.camel();
        let mut chars = camel.chars();
        match chars.next() {
            Some(first) => first.to_lowercase().chain(chars).collect(),
            None => camel,
        }
    }

    /// "get_distance"
    pub fn under(&self) -> String {
        self.lower().replace(' ', "_")
    }

    /// "GET_DISTANCE"
    pub fn upper(&self) -> String {
        self.under().to_uppercase()
    }

    /// "get-distance"
    pub fn dash(&self) -> String {
        self.lower().replace(' ', "-")
    }

    /// "get distance"
    pub fn lower(&self) -> String {
        self.0.to_lowercase()
    }

    /// Lowercased initials, or the whole word for single-word names ("pb", "dc")
    pub fn initials(&self) -> String {
        let words: Vec<&str> = self.words().collect();
        if words.len() == 1 {
            return words[0].to_lowercase();
        }
        words
            .iter()
            .filter_map(|w| w.chars().next())
            .flat_map(char::to_lowercase)
            .collect()
    }

    /// Case-insensitive comparison against a space-form string
    pub fn matches(&self, other: &str) -> bool {
        let other: Vec<&str> = other.split_whitespace().collect();
        self.0.eq_ignore_ascii_case(&other.join(" "))
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

impl std::fmt::Display for Name {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<&str> for Name {
    type Error = NameError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flavors() {
        let name = Name::new("Get Distance").unwrap();
        assert_eq!(name.space(), "Get Distance");
        assert_eq!(name.camel(), "GetDistance");
        assert_eq!(name.headless(), "getDistance");
        assert_eq!(name.under(), "get_distance");
        assert_eq!(name.upper(), "GET_DISTANCE");
        assert_eq!(name.dash(), "get-distance");
        assert_eq!(name.lower(), "get distance");
    }

    #[test]
    fn test_flavors_with_digits() {
        let name = Name::new("0 To 5V").unwrap();
        assert_eq!(name.camel(), "0To5V");
        assert_eq!(name.under(), "0_to_5v");
        assert_eq!(name.upper(), "0_TO_5V");

        let name = Name::new("Velocity Max 13ms").unwrap();
        assert_eq!(name.upper(), "VELOCITY_MAX_13MS");
        assert_eq!(name.camel(), "VelocityMax13ms");
    }

    #[test]
    fn test_camel_keeps_inner_case() {
        let name = Name::new("AI 4U 4I").unwrap();
        assert_eq!(name.camel(), "AI4U4I");
        assert_eq!(name.headless(), "aI4U4I");
        assert_eq!(name.under(), "ai_4u_4i");
    }

    #[test]
    fn test_initials() {
        assert_eq!(Name::new("Piezo Buzzer").unwrap().initials(), "pb");
        assert_eq!(Name::new("DC").unwrap().initials(), "dc");
        assert_eq!(Name::new("Laser Range Finder").unwrap().initials(), "lrf");
    }

    #[test]
    fn test_whitespace_normalized() {
        let name = Name::new("  Set   Mode ").unwrap();
        assert_eq!(name.space(), "Set Mode");
        assert!(name.matches("set mode"));
        assert!(name.matches("SET  MODE"));
        assert!(!name.matches("Get Mode"));
    }

    #[test]
    fn test_invalid_names() {
        assert_eq!(Name::new("   "), Err(NameError::Empty));
        assert!(matches!(
            Name::new("Get-Distance"),
            Err(NameError::InvalidWord { .. })
        ));
        assert!(Name::new("Größe").is_err());
    }
}
