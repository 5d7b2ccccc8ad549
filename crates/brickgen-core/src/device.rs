//! Device descriptions as seen by the generators

use serde::{Deserialize, Serialize};

use crate::name::Name;
use crate::packet::{ConstantGroup, Packet};
use crate::types::{LocalizedText, Value};

/// Hardware family of a device
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    Brick,
    Bricklet,
    #[serde(rename = "TNG")]
    Tng,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Brick => "Brick",
            Self::Bricklet => "Bricklet",
            Self::Tng => "TNG",
        }
    }

    /// Category as a name, for rendering in every flavor
    pub fn name(&self) -> Name {
        Name::from_static(self.as_str())
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How an example step uses the device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExampleKind {
    Getter,
    Setter,
    Callback,
    /// Period of the periodic callback of a value
    CallbackPeriod,
    /// Threshold of the reached callback of a value
    CallbackThreshold,
    DebouncePeriod,
    Sleep,
}

impl ExampleKind {
    /// Function a configuration step calls, `subject` is the configured value
    pub fn configuration_function(&self, subject: Option<&Name>) -> Option<String> {
        match (self, subject) {
            (Self::CallbackPeriod, Some(subject)) => {
                Some(format!("Set {} Callback Period", subject))
            }
            (Self::CallbackThreshold, Some(subject)) => {
                Some(format!("Set {} Callback Threshold", subject))
            }
            (Self::DebouncePeriod, _) => Some("Set Debounce Period".to_string()),
            _ => None,
        }
    }
}

/// One step of an example program
#[derive(Debug, Clone, Serialize)]
pub struct ExampleFunction {
    pub kind: ExampleKind,
    /// Packet used by getters, setters and callbacks; the configured value
    /// of callback periods and thresholds; unset otherwise
    #[serde(skip_serializing_if = "Option::is_none")]
    pub packet: Option<Name>,
    pub arguments: Vec<Value>,
    /// Sleep duration, callback period or debounce period
    #[serde(skip_serializing_if = "Option::is_none")]
    pub milliseconds: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

/// An example program for a device
#[derive(Debug, Clone, Serialize)]
pub struct Example {
    pub name: Name,
    pub functions: Vec<ExampleFunction>,
    /// Steps run after the user pressed enter, before disconnecting
    pub cleanups: Vec<ExampleFunction>,
}

/// A hardware module description
#[derive(Debug, Clone, Serialize)]
pub struct Device {
    pub identifier: u16,
    pub category: Category,
    pub name: Name,
    pub display_name: String,
    pub manufacturer: String,
    pub author: String,
    pub api_version: [u8; 3],
    pub description: LocalizedText,
    pub released: bool,
    pub documented: bool,
    pub discontinued: bool,
    pub features: Vec<String>,
    pub constant_groups: Vec<ConstantGroup>,
    pub packets: Vec<Packet>,
    pub examples: Vec<Example>,
}

impl Device {
    /// "Piezo Buzzer Bricklet", "DC Brick", "TNG DI8"
    pub fn long_display_name(&self) -> String {
        match self.category {
            Category::Tng => format!("TNG {}", self.display_name),
            category => format!("{} {}", self.display_name, category),
        }
    }

    pub fn has_feature(&self, feature: &str) -> bool {
        self.features.iter().any(|f| f == feature)
    }

    pub fn packet(&self, name: &str) -> Option<&Packet> {
        self.packets.iter().find(|p| p.name.matches(name))
    }

    pub fn constant_group(&self, name: &str) -> Option<&ConstantGroup> {
        self.constant_groups.iter().find(|g| g.name.matches(name))
    }

    pub fn functions(&self) -> impl Iterator<Item = &Packet> {
        self.packets.iter().filter(|p| p.is_function())
    }

    pub fn callbacks(&self) -> impl Iterator<Item = &Packet> {
        self.packets.iter().filter(|p| p.is_callback())
    }

    pub fn api_version_string(&self) -> String {
        let [major, minor, patch] = self.api_version;
        format!("{}.{}.{}", major, minor, patch)
    }
}
