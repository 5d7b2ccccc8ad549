//! Brickgen Core - Device descriptions, config loading, and device registry
//!
//! This crate provides the foundational types for the brickgen generators:
//! - Name flavors used to render identifiers in every target language
//! - The device model (devices, packets, elements, constant groups, examples)
//! - TOML device config parsing and structural validation
//! - A device registry that loads a whole config directory once per run

pub mod common;
pub mod config;
pub mod device;
pub mod name;
pub mod packet;
pub mod registry;
pub mod types;
pub mod unit;

pub use config::{load_device, ConfigError, DeviceConfig};
pub use device::{Category, Device, Example, ExampleFunction, ExampleKind};
pub use name::{Name, NameError};
pub use packet::{
    Constant, ConstantGroup, Element, Packet, PacketDoc, HEADER_SIZE, MAX_PAYLOAD_SIZE,
};
pub use registry::{DeviceRegistry, RegistryError};
pub use types::{
    Direction, DocType, ElementType, Language, LocalizedText, PacketType, Scale, Value, ValueRange,
};
pub use unit::{format_scaled_unit, Unit};
