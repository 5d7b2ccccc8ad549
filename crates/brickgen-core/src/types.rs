//! Primitive types shared by configs and the device model

use serde::{Deserialize, Serialize};

/// Primitive type of a packet element or constant group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementType {
    Int8,
    Uint8,
    Int16,
    Uint16,
    Int32,
    Uint32,
    Int64,
    Uint64,
    Float,
    Bool,
    Char,
    String,
}

impl ElementType {
    pub const ALL: [ElementType; 12] = [
        Self::Int8,
        Self::Uint8,
        Self::Int16,
        Self::Uint16,
        Self::Int32,
        Self::Uint32,
        Self::Int64,
        Self::Uint64,
        Self::Float,
        Self::Bool,
        Self::Char,
        Self::String,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Int8 => "int8",
            Self::Uint8 => "uint8",
            Self::Int16 => "int16",
            Self::Uint16 => "uint16",
            Self::Int32 => "int32",
            Self::Uint32 => "uint32",
            Self::Int64 => "int64",
            Self::Uint64 => "uint64",
            Self::Float => "float",
            Self::Bool => "bool",
            Self::Char => "char",
            Self::String => "string",
        }
    }

    /// Wire size of a single item in bytes
    pub fn item_size(&self) -> usize {
        match self {
            Self::Int8 | Self::Uint8 | Self::Bool | Self::Char | Self::String => 1,
            Self::Int16 | Self::Uint16 => 2,
            Self::Int32 | Self::Uint32 | Self::Float => 4,
            Self::Int64 | Self::Uint64 => 8,
        }
    }

    pub fn is_integer(&self) -> bool {
        matches!(
            self,
            Self::Int8
                | Self::Uint8
                | Self::Int16
                | Self::Uint16
                | Self::Int32
                | Self::Uint32
                | Self::Int64
                | Self::Uint64
        )
    }

    /// Integer and float types can carry a scale and a unit
    pub fn is_numeric(&self) -> bool {
        self.is_integer() || *self == Self::Float
    }

    /// Inclusive value bounds, `None` for float and string
    pub fn bounds(&self) -> Option<(i128, i128)> {
        match self {
            Self::Int8 => Some((i8::MIN as i128, i8::MAX as i128)),
            Self::Uint8 | Self::Char => Some((0, u8::MAX as i128)),
            Self::Int16 => Some((i16::MIN as i128, i16::MAX as i128)),
            Self::Uint16 => Some((0, u16::MAX as i128)),
            Self::Int32 => Some((i32::MIN as i128, i32::MAX as i128)),
            Self::Uint32 => Some((0, u32::MAX as i128)),
            Self::Int64 => Some((i64::MIN as i128, i64::MAX as i128)),
            Self::Uint64 => Some((0, u64::MAX as i128)),
            Self::Bool => Some((0, 1)),
            Self::Float | Self::String => None,
        }
    }

    /// Check whether a literal is a valid value of this type
    pub fn accepts(&self, value: &Value) -> bool {
        match (self, value) {
            (Self::Bool, Value::Bool(_)) => true,
            (Self::Char, Value::Text(text)) => text.chars().count() == 1,
            (Self::String, Value::Text(_)) => true,
            (Self::Float, Value::Float(_) | Value::Integer(_)) => true,
            (t, Value::Integer(v)) if t.is_integer() => match t.bounds() {
                Some((min, max)) => (min..=max).contains(&(*v as i128)),
                None => false,
            },
            _ => false,
        }
    }
}

impl std::fmt::Display for ElementType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Data direction of an element, seen from the device user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    In,
    Out,
}

/// Kind of a packet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PacketType {
    Function,
    Callback,
}

/// Documentation category of a packet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocType {
    /// Basic function
    Bf,
    /// Advanced function
    Af,
    /// Callback configuration function
    Ccf,
    /// Low-level function
    Llf,
    /// Callback
    C,
}

/// A literal value from a config (default, constant or example argument)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Bool(v) => write!(f, "{}", v),
            Value::Integer(v) => write!(f, "{}", v),
            Value::Float(v) => write!(f, "{}", v),
            Value::Text(v) => write!(f, "{}", v),
        }
    }
}

/// Fixed-point scale of an element, `numerator / denominator` units per raw step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "(u64, u64)", into = "(u64, u64)")]
pub struct Scale {
    pub numerator: u64,
    pub denominator: u64,
}

impl Scale {
    pub fn is_identity(&self) -> bool {
        self.numerator == self.denominator
    }

    pub fn factor(&self) -> f64 {
        self.numerator as f64 / self.denominator as f64
    }
}

impl TryFrom<(u64, u64)> for Scale {
    type Error = String;

    fn try_from((numerator, denominator): (u64, u64)) -> Result<Self, Self::Error> {
        if numerator == 0 || denominator == 0 {
            return Err(format!("invalid scale ({}, {})", numerator, denominator));
        }
        Ok(Self {
            numerator,
            denominator,
        })
    }
}

impl From<Scale> for (u64, u64) {
    fn from(scale: Scale) -> Self {
        (scale.numerator, scale.denominator)
    }
}

/// Inclusive value range of an element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "(i64, i64)", into = "(i64, i64)")]
pub struct ValueRange {
    pub min: i64,
    pub max: i64,
}

impl ValueRange {
    pub fn contains(&self, value: i64) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

impl TryFrom<(i64, i64)> for ValueRange {
    type Error = String;

    fn try_from((min, max): (i64, i64)) -> Result<Self, Self::Error> {
        if min > max {
            return Err(format!("invalid range ({}, {})", min, max));
        }
        Ok(Self { min, max })
    }
}

impl From<ValueRange> for (i64, i64) {
    fn from(range: ValueRange) -> Self {
        (range.min, range.max)
    }
}

/// Documentation language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    En,
    De,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::En => "en",
            Self::De => "de",
        }
    }
}

impl Default for Language {
    fn default() -> Self {
        Self::En
    }
}

impl std::str::FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "en" => Ok(Self::En),
            "de" => Ok(Self::De),
            other => Err(format!("unsupported language: {}", other)),
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Text given in every documentation language
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LocalizedText {
    pub en: String,
    pub de: String,
}

impl LocalizedText {
    pub fn get(&self, language: Language) -> &str {
        match language {
            Language::En => &self.en,
            Language::De => &self.de,
        }
    }

    /// Strip the blank lines that multi-line TOML strings carry
    pub fn trimmed(&self) -> Self {
        Self {
            en: self.en.trim().to_string(),
            de: self.de.trim().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_sizes() {
        assert_eq!(ElementType::Uint8.item_size(), 1);
        assert_eq!(ElementType::Int16.item_size(), 2);
        assert_eq!(ElementType::Float.item_size(), 4);
        assert_eq!(ElementType::Uint64.item_size(), 8);
    }

    #[test]
    fn test_accepts() {
        assert!(ElementType::Uint8.accepts(&Value::Integer(255)));
        assert!(!ElementType::Uint8.accepts(&Value::Integer(256)));
        assert!(!ElementType::Uint16.accepts(&Value::Integer(-1)));
        assert!(ElementType::Int16.accepts(&Value::Integer(-32768)));
        assert!(ElementType::Char.accepts(&Value::Text("x".to_string())));
        assert!(!ElementType::Char.accepts(&Value::Text("xy".to_string())));
        assert!(ElementType::Float.accepts(&Value::Integer(3)));
        assert!(ElementType::Bool.accepts(&Value::Bool(false)));
        assert!(!ElementType::Bool.accepts(&Value::Integer(0)));
        assert!(!ElementType::String.accepts(&Value::Integer(0)));
    }

    #[test]
    fn test_scale_and_range_from_arrays() {
        #[derive(Deserialize)]
        struct Meta {
            scale: Scale,
            range: ValueRange,
        }

        let meta: Meta = toml::from_str("scale = [1, 1000]\nrange = [-12800, 12700]").unwrap();
        assert_eq!(meta.scale.denominator, 1000);
        assert_eq!(meta.range.min, -12800);
        assert!(meta.range.contains(0));

        assert!(toml::from_str::<Meta>("scale = [0, 1]\nrange = [0, 1]").is_err());
        assert!(toml::from_str::<Meta>("scale = [1, 1]\nrange = [5, 1]").is_err());
    }

    #[test]
    fn test_value_untagged() {
        #[derive(Deserialize)]
        struct Holder {
            values: Vec<Value>,
        }

        let holder: Holder = toml::from_str(r#"values = [true, 3, 1.5, "x"]"#).unwrap();
        assert_eq!(
            holder.values,
            vec![
                Value::Bool(true),
                Value::Integer(3),
                Value::Float(1.5),
                Value::Text("x".to_string()),
            ]
        );
    }

    #[test]
    fn test_language_parse() {
        assert_eq!("DE".parse::<Language>().unwrap(), Language::De);
        assert!("fr".parse::<Language>().is_err());
    }
}
