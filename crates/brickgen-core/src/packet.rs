//! Packets, their typed elements, and constant groups

use serde::Serialize;

use crate::name::Name;
use crate::types::{
    Direction, DocType, ElementType, LocalizedText, PacketType, Scale, Value, ValueRange,
};
use crate::unit::Unit;

/// Size of the packet header preceding every payload
pub const HEADER_SIZE: usize = 8;

/// Maximum payload of a single request or response
pub const MAX_PAYLOAD_SIZE: usize = 64;

/// A typed field of a packet's input or output signature
#[derive(Debug, Clone, Serialize)]
pub struct Element {
    pub name: Name,
    #[serde(rename = "type")]
    pub element_type: ElementType,
    /// Item count; for strings the maximum length
    pub cardinality: u16,
    pub direction: Direction,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale: Option<Scale>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<Unit>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<ValueRange>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub constant_group: Option<Name>,
}

impl Element {
    /// Wire size in bytes; bool arrays are bit-packed
    pub fn size(&self) -> usize {
        let cardinality = self.cardinality as usize;
        match self.element_type {
            ElementType::String => cardinality,
            ElementType::Bool if cardinality > 1 => cardinality.div_ceil(8),
            t => t.item_size() * cardinality,
        }
    }

    /// Strings are a single value regardless of their length
    pub fn is_array(&self) -> bool {
        self.cardinality > 1 && self.element_type != ElementType::String
    }

    /// Explicit range if given, otherwise the bounds of the element type
    pub fn effective_range(&self) -> Option<(i128, i128)> {
        match self.range {
            Some(range) => Some((range.min as i128, range.max as i128)),
            None => self.element_type.bounds(),
        }
    }
}

/// Documentation of a packet
#[derive(Debug, Clone, Serialize)]
pub struct PacketDoc {
    #[serde(rename = "type")]
    pub doc_type: DocType,
    pub text: LocalizedText,
}

/// A function or callback of a device
#[derive(Debug, Clone, Serialize)]
pub struct Packet {
    pub name: Name,
    #[serde(rename = "type")]
    pub packet_type: PacketType,
    pub function_id: u8,
    pub elements: Vec<Element>,
    pub since_firmware: [u8; 3],
    pub doc: PacketDoc,
}

impl Packet {
    pub fn is_function(&self) -> bool {
        self.packet_type == PacketType::Function
    }

    pub fn is_callback(&self) -> bool {
        self.packet_type == PacketType::Callback
    }

    /// The standard identity function injected by device features
    pub fn is_identity(&self) -> bool {
        self.function_id == crate::common::IDENTITY_FUNCTION_ID
    }

    /// Elements with the given direction, in declaration order
    pub fn elements(&self, direction: Direction) -> impl Iterator<Item = &Element> {
        self.elements
            .iter()
            .filter(move |element| element.direction == direction)
    }

    pub fn payload_size(&self, direction: Direction) -> usize {
        self.elements(direction).map(Element::size).sum()
    }

    /// Full request length including the header
    pub fn request_size(&self) -> usize {
        HEADER_SIZE + self.payload_size(Direction::In)
    }

    /// Full response length including the header
    pub fn response_size(&self) -> usize {
        HEADER_SIZE + self.payload_size(Direction::Out)
    }

    pub fn since_firmware_string(&self) -> String {
        let [major, minor, patch] = self.since_firmware;
        format!("{}.{}.{}", major, minor, patch)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Constant {
    pub name: Name,
    pub value: Value,
}

/// Named set of symbolic values for an element
#[derive(Debug, Clone, Serialize)]
pub struct ConstantGroup {
    pub name: Name,
    #[serde(rename = "type")]
    pub element_type: ElementType,
    pub constants: Vec<Constant>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn element(element_type: ElementType, cardinality: u16, direction: Direction) -> Element {
        Element {
            name: Name::new("Value").unwrap(),
            element_type,
            cardinality,
            direction,
            scale: None,
            unit: None,
            range: None,
            default: None,
            constant_group: None,
        }
    }

    #[test]
    fn test_element_sizes() {
        assert_eq!(element(ElementType::Uint16, 1, Direction::In).size(), 2);
        assert_eq!(element(ElementType::Int32, 4, Direction::In).size(), 16);
        assert_eq!(element(ElementType::String, 60, Direction::In).size(), 60);
        assert_eq!(element(ElementType::Bool, 1, Direction::In).size(), 1);
        assert_eq!(element(ElementType::Bool, 8, Direction::In).size(), 1);
        assert_eq!(element(ElementType::Bool, 9, Direction::In).size(), 2);
    }

    #[test]
    fn test_is_array() {
        assert!(element(ElementType::Uint8, 3, Direction::Out).is_array());
        assert!(!element(ElementType::String, 8, Direction::Out).is_array());
        assert!(!element(ElementType::Uint8, 1, Direction::Out).is_array());
    }

    #[test]
    fn test_effective_range() {
        let mut e = element(ElementType::Uint16, 1, Direction::In);
        assert_eq!(e.effective_range(), Some((0, 65535)));
        e.range = Some(ValueRange { min: 0, max: 4000 });
        assert_eq!(e.effective_range(), Some((0, 4000)));
        assert_eq!(element(ElementType::Float, 1, Direction::In).effective_range(), None);
    }

    #[test]
    fn test_packet_sizes() {
        let packet = Packet {
            name: Name::new("Get Selected Value").unwrap(),
            packet_type: PacketType::Function,
            function_id: 2,
            elements: vec![
                element(ElementType::Uint8, 1, Direction::In),
                element(ElementType::Uint64, 1, Direction::Out),
                element(ElementType::Bool, 1, Direction::Out),
            ],
            since_firmware: [1, 0, 0],
            doc: PacketDoc {
                doc_type: DocType::Bf,
                text: LocalizedText::default(),
            },
        };

        assert_eq!(packet.request_size(), 9);
        assert_eq!(packet.response_size(), 17);
        assert_eq!(packet.elements(Direction::Out).count(), 2);
        assert_eq!(packet.since_firmware_string(), "1.0.0");
        assert!(!packet.is_identity());
    }
}
