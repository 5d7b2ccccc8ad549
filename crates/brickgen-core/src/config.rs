//! TOML device config format and its conversion into the device model
//!
//! A config file describes exactly one device. Parsing rejects unknown keys
//! and unknown primitive types; `DeviceConfig::into_device` then checks the
//! structural invariants (unique names, constant group references, defaults
//! inside their ranges, payload limits, ...) and assigns function IDs.

use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

use crate::common::{self, BASE_FEATURE, IDENTITY_FEATURES};
use crate::device::{Category, Device, Example, ExampleFunction, ExampleKind};
use crate::name::Name;
use crate::packet::{Constant, ConstantGroup, Element, Packet, PacketDoc, MAX_PAYLOAD_SIZE};
use crate::types::{
    Direction, DocType, ElementType, LocalizedText, PacketType, Scale, Value, ValueRange,
};
use crate::unit::Unit;

/// Function IDs 1..=254 are available for declared packets
const MAX_PACKETS: usize = 254;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read device config: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse device config: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Invalid device config {device}: {reason}")]
    ValidationError { device: String, reason: String },
}

/// Top-level table of a device config file
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeviceConfig {
    pub author: String,
    pub api_version: [u8; 3],
    pub category: Category,
    pub device_identifier: u16,
    pub name: String,
    pub display_name: String,
    #[serde(default = "default_manufacturer")]
    pub manufacturer: String,
    pub description: LocalizedText,
    #[serde(default)]
    pub released: bool,
    #[serde(default)]
    pub documented: bool,
    #[serde(default)]
    pub discontinued: bool,
    pub features: Vec<String>,
    /// Shared constant groups pulled in by name
    #[serde(default)]
    pub common_constant_groups: Vec<String>,
    #[serde(default)]
    pub constant_groups: Vec<ConstantGroupConfig>,
    #[serde(default)]
    pub packets: Vec<PacketConfig>,
    #[serde(default)]
    pub examples: Vec<ExampleConfig>,
}

fn default_manufacturer() -> String {
    "Tinkerforge".to_string()
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConstantGroupConfig {
    pub name: String,
    #[serde(rename = "type")]
    pub element_type: ElementType,
    pub constants: Vec<ConstantConfig>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConstantConfig {
    pub name: String,
    pub value: Value,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PacketConfig {
    #[serde(rename = "type")]
    pub packet_type: PacketType,
    pub name: String,
    #[serde(default)]
    pub elements: Vec<ElementConfig>,
    pub since_firmware: [u8; 3],
    pub doc_type: DocType,
    pub doc: LocalizedText,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ElementConfig {
    pub name: String,
    #[serde(rename = "type")]
    pub element_type: ElementType,
    #[serde(default = "default_cardinality")]
    pub cardinality: u16,
    pub direction: Direction,
    #[serde(default)]
    pub scale: Option<Scale>,
    #[serde(default)]
    pub unit: Option<Unit>,
    #[serde(default)]
    pub range: Option<ValueRange>,
    #[serde(default)]
    pub default: Option<Value>,
    #[serde(default)]
    pub constant_group: Option<String>,
}

fn default_cardinality() -> u16 {
    1
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExampleConfig {
    pub name: String,
    pub functions: Vec<ExampleFunctionConfig>,
    #[serde(default)]
    pub cleanups: Vec<ExampleFunctionConfig>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExampleFunctionConfig {
    pub kind: ExampleKind,
    #[serde(default)]
    pub packet: Option<String>,
    #[serde(default)]
    pub arguments: Vec<Value>,
    #[serde(default)]
    pub milliseconds: Option<u32>,
    #[serde(default)]
    pub comment: Option<String>,
}

/// Collects validation failures under the device they belong to
struct Validator {
    device: String,
}

impl Validator {
    fn error(&self, reason: impl Into<String>) -> ConfigError {
        ConfigError::ValidationError {
            device: self.device.clone(),
            reason: reason.into(),
        }
    }

    fn name(&self, what: &str, raw: &str) -> Result<Name, ConfigError> {
        Name::new(raw).map_err(|e| self.error(format!("{} name: {}", what, e)))
    }

    /// A name rendered without prefix in generated code cannot start with a digit
    fn identifier(&self, what: &str, raw: &str) -> Result<Name, ConfigError> {
        let name = self.name(what, raw)?;
        if name.space().starts_with(|c: char| c.is_ascii_digit()) {
            return Err(self.error(format!("{} name {} starts with a digit", what, name)));
        }
        Ok(name)
    }

    fn constant_group(&self, config: &ConstantGroupConfig) -> Result<ConstantGroup, ConfigError> {
        let name = self.identifier("constant group", &config.name)?;

        if !(config.element_type.is_integer() || config.element_type == ElementType::Char) {
            return Err(self.error(format!(
                "constant group {} has unsupported type {}",
                name, config.element_type
            )));
        }

        if config.constants.is_empty() {
            return Err(self.error(format!("constant group {} is empty", name)));
        }

        let mut seen = HashSet::new();
        let mut constants = Vec::with_capacity(config.constants.len());
        for constant in &config.constants {
            let constant_name = self.name("constant", &constant.name)?;
            if !seen.insert(constant_name.lower()) {
                return Err(self.error(format!(
                    "duplicate constant {} in group {}",
                    constant_name, name
                )));
            }
            if !config.element_type.accepts(&constant.value) {
                return Err(self.error(format!(
                    "constant {} of group {} has value {} not valid for {}",
                    constant_name, name, constant.value, config.element_type
                )));
            }
            constants.push(Constant {
                name: constant_name,
                value: constant.value.clone(),
            });
        }

        Ok(ConstantGroup {
            name,
            element_type: config.element_type,
            constants,
        })
    }

    fn element(
        &self,
        packet: &Name,
        config: &ElementConfig,
        groups: &[ConstantGroup],
    ) -> Result<Element, ConfigError> {
        let name = self.identifier("element", &config.name)?;
        let context = format!("element {} of packet {}", name, packet);
        let element_type = config.element_type;

        if config.cardinality == 0 {
            return Err(self.error(format!("{} has cardinality 0", context)));
        }

        if (config.scale.is_some() || config.unit.is_some()) && !element_type.is_numeric() {
            return Err(self.error(format!(
                "{} of type {} cannot have a scale or unit",
                context, element_type
            )));
        }

        if let Some(range) = config.range {
            let Some((min, max)) = element_type.bounds() else {
                return Err(self.error(format!(
                    "{} of type {} cannot have a range",
                    context, element_type
                )));
            };
            if (range.min as i128) < min || (range.max as i128) > max {
                return Err(self.error(format!(
                    "{} has range ({}, {}) outside of {}",
                    context, range.min, range.max, element_type
                )));
            }
        }

        if let Some(default) = &config.default {
            if !element_type.accepts(default) {
                return Err(self.error(format!(
                    "{} has default {} not valid for {}",
                    context, default, element_type
                )));
            }
            if let (Value::Integer(value), Some(range)) = (default, config.range) {
                if !range.contains(*value) {
                    return Err(self.error(format!(
                        "{} has default {} outside of its range",
                        context, value
                    )));
                }
            }
        }

        let constant_group = match &config.constant_group {
            Some(group_name) => {
                let group = groups
                    .iter()
                    .find(|g| g.name.matches(group_name))
                    .ok_or_else(|| {
                        self.error(format!(
                            "{} references unknown constant group {}",
                            context, group_name
                        ))
                    })?;
                if group.element_type != element_type {
                    return Err(self.error(format!(
                        "{} has type {} but constant group {} is {}",
                        context, element_type, group.name, group.element_type
                    )));
                }
                Some(group.name.clone())
            }
            None => None,
        };

        Ok(Element {
            name,
            element_type,
            cardinality: config.cardinality,
            direction: config.direction,
            scale: config.scale,
            unit: config.unit,
            range: config.range,
            default: config.default.clone(),
            constant_group,
        })
    }

    fn packet(
        &self,
        function_id: u8,
        config: &PacketConfig,
        groups: &[ConstantGroup],
    ) -> Result<Packet, ConfigError> {
        let name = self.identifier("packet", &config.name)?;

        match (config.packet_type, config.doc_type) {
            (PacketType::Callback, DocType::C) => {}
            (PacketType::Function, doc_type) if doc_type != DocType::C => {}
            (packet_type, doc_type) => {
                return Err(self.error(format!(
                    "packet {} of type {:?} cannot use doc type {:?}",
                    name, packet_type, doc_type
                )))
            }
        }

        let mut seen = HashSet::new();
        let mut elements = Vec::with_capacity(config.elements.len());
        for element_config in &config.elements {
            let element = self.element(&name, element_config, groups)?;
            if !seen.insert(element.name.lower()) {
                return Err(self.error(format!(
                    "duplicate element {} in packet {}",
                    element.name, name
                )));
            }
            if config.packet_type == PacketType::Callback && element.direction == Direction::In {
                return Err(self.error(format!(
                    "callback {} has input element {}",
                    name, element.name
                )));
            }
            elements.push(element);
        }

        let packet = Packet {
            name,
            packet_type: config.packet_type,
            function_id,
            elements,
            since_firmware: config.since_firmware,
            doc: PacketDoc {
                doc_type: config.doc_type,
                text: config.doc.trimmed(),
            },
        };

        for direction in [Direction::In, Direction::Out] {
            let size = packet.payload_size(direction);
            if size > MAX_PAYLOAD_SIZE {
                return Err(self.error(format!(
                    "packet {} has a {:?} payload of {} bytes, maximum is {}",
                    packet.name, direction, size, MAX_PAYLOAD_SIZE
                )));
            }
        }

        Ok(packet)
    }

    fn example(&self, config: &ExampleConfig, packets: &[Packet]) -> Result<Example, ConfigError> {
        let name = self.identifier("example", &config.name)?;

        let functions = config
            .functions
            .iter()
            .map(|step| self.example_step(&name, step, packets))
            .collect::<Result<Vec<_>, _>>()?;

        let mut cleanups = Vec::with_capacity(config.cleanups.len());
        for step in &config.cleanups {
            if !matches!(step.kind, ExampleKind::Setter | ExampleKind::Sleep) {
                return Err(self.error(format!(
                    "example {} has a {:?} cleanup, only setters and sleeps are allowed",
                    name, step.kind
                )));
            }
            cleanups.push(self.example_step(&name, step, packets)?);
        }

        Ok(Example {
            name,
            functions,
            cleanups,
        })
    }

    fn example_step(
        &self,
        example: &Name,
        config: &ExampleFunctionConfig,
        packets: &[Packet],
    ) -> Result<ExampleFunction, ConfigError> {
        let kind = config.kind;

        let takes_packet = !matches!(kind, ExampleKind::Sleep | ExampleKind::DebouncePeriod);
        let subject = match &config.packet {
            Some(packet) if takes_packet => Some(self.name("example packet", packet)?),
            None if !takes_packet => None,
            Some(packet) => {
                return Err(self.error(format!(
                    "example {} names packet {} in a {:?} step",
                    example, packet, kind
                )))
            }
            None => {
                return Err(self.error(format!(
                    "example {} has a {:?} step without packet",
                    example, kind
                )))
            }
        };

        let takes_milliseconds = matches!(
            kind,
            ExampleKind::Sleep | ExampleKind::CallbackPeriod | ExampleKind::DebouncePeriod
        );
        match (config.milliseconds, takes_milliseconds) {
            (Some(_), false) => {
                return Err(self.error(format!(
                    "example {} sets milliseconds in a {:?} step",
                    example, kind
                )))
            }
            (None, true) => {
                return Err(self.error(format!(
                    "example {} has a {:?} step without milliseconds",
                    example, kind
                )))
            }
            _ => {}
        }

        let find = |name: &str| {
            packets
                .iter()
                .find(|p| p.name.matches(name))
                .ok_or_else(|| {
                    self.error(format!(
                        "example {} references unknown packet {}",
                        example, name
                    ))
                })
        };

        let (packet, target) = match (kind, &subject) {
            (ExampleKind::Sleep, _) => (None, None),
            (ExampleKind::Getter | ExampleKind::Setter | ExampleKind::Callback, Some(subject)) => {
                let packet = find(subject.space())?;
                if (kind == ExampleKind::Callback) != packet.is_callback() {
                    return Err(self.error(format!(
                        "example {} uses packet {} as {:?}",
                        example, packet.name, kind
                    )));
                }
                (Some(packet.name.clone()), Some(packet))
            }
            (kind, subject) => {
                let function = kind
                    .configuration_function(subject.as_ref())
                    .ok_or_else(|| {
                        self.error(format!("example {} has an incomplete {:?} step", example, kind))
                    })?;
                (subject.clone(), Some(find(&function)?))
            }
        };

        if takes_milliseconds && !config.arguments.is_empty() {
            return Err(self.error(format!(
                "example {} passes arguments to a {:?} step",
                example, kind
            )));
        }

        if let Some(target) = target {
            let arguments = match config.milliseconds {
                Some(period) if kind != ExampleKind::Sleep => vec![Value::Integer(period.into())],
                _ => config.arguments.clone(),
            };
            self.example_arguments(example, target, &arguments)?;
        }

        Ok(ExampleFunction {
            kind,
            packet,
            arguments: config.arguments.clone(),
            milliseconds: config.milliseconds,
            comment: config.comment.clone(),
        })
    }

    fn example_arguments(
        &self,
        example: &Name,
        packet: &Packet,
        arguments: &[Value],
    ) -> Result<(), ConfigError> {
        let inputs: Vec<&Element> = packet.elements(Direction::In).collect();
        if inputs.len() != arguments.len() {
            return Err(self.error(format!(
                "example {} passes {} arguments to {}, expected {}",
                example,
                arguments.len(),
                packet.name,
                inputs.len()
            )));
        }
        for (element, argument) in inputs.iter().zip(arguments) {
            if !element.element_type.accepts(argument) {
                return Err(self.error(format!(
                    "example {} passes {} for element {} of type {}",
                    example, argument, element.name, element.element_type
                )));
            }
        }
        Ok(())
    }
}

impl DeviceConfig {
    /// Parse a device config from a TOML string
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: DeviceConfig = toml::from_str(content)?;
        Ok(config)
    }

    /// Parse a device config from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Validate the config and build the device model
    pub fn into_device(self) -> Result<Device, ConfigError> {
        let validator = Validator {
            device: format!("{} {}", self.name, self.category),
        };
        let name = validator.name("device", &self.name)?;

        if !self.features.iter().any(|f| f == BASE_FEATURE) {
            return Err(validator.error(format!("missing feature {:?}", BASE_FEATURE)));
        }

        let mut constant_groups = Vec::new();
        for group_name in &self.common_constant_groups {
            let group = common::common_constant_group(group_name).ok_or_else(|| {
                validator.error(format!("unknown common constant group {}", group_name))
            })?;
            constant_groups.push(group);
        }
        for group_config in &self.constant_groups {
            constant_groups.push(validator.constant_group(group_config)?);
        }
        let mut seen = HashSet::new();
        for group in &constant_groups {
            if !seen.insert(group.name.lower()) {
                return Err(validator.error(format!("duplicate constant group {}", group.name)));
            }
        }

        if self.packets.len() > MAX_PACKETS {
            return Err(validator.error(format!(
                "{} packets declared, maximum is {}",
                self.packets.len(),
                MAX_PACKETS
            )));
        }

        let mut packets = Vec::with_capacity(self.packets.len() + 1);
        let mut seen = HashSet::new();
        for (index, packet_config) in self.packets.iter().enumerate() {
            // Fits: the packet count was checked against MAX_PACKETS above
            let function_id = (index + 1) as u8;
            let packet = validator.packet(function_id, packet_config, &constant_groups)?;
            if !seen.insert(packet.name.lower()) {
                return Err(validator.error(format!("duplicate packet {}", packet.name)));
            }
            packets.push(packet);
        }

        if self.features.iter().any(|f| IDENTITY_FEATURES.contains(&f.as_str())) {
            let identity = common::identity_packet([1, 0, 0]);
            if !seen.insert(identity.name.lower()) {
                return Err(validator.error(format!(
                    "packet {} is provided by the identity feature",
                    identity.name
                )));
            }
            packets.push(identity);
        }

        let examples = self
            .examples
            .iter()
            .map(|example| validator.example(example, &packets))
            .collect::<Result<Vec<_>, _>>()?;

        debug!(
            device = %name,
            packets = packets.len(),
            constant_groups = constant_groups.len(),
            "Validated device config"
        );

        Ok(Device {
            identifier: self.device_identifier,
            category: self.category,
            name,
            display_name: self.display_name,
            manufacturer: self.manufacturer,
            author: self.author,
            api_version: self.api_version,
            description: self.description.trimmed(),
            released: self.released,
            documented: self.documented,
            discontinued: self.discontinued,
            features: self.features,
            constant_groups,
            packets,
            examples,
        })
    }
}

/// Load and validate a single device config file
pub fn load_device(path: &Path) -> Result<Device, ConfigError> {
    DeviceConfig::from_file(path)?.into_device()
}
