//! Shared definitions that device configs pull in by reference
//!
//! - Common constant groups (`common_constant_groups = ["Threshold Option"]`)
//! - The standard identity function injected by the `*_get_identity` features

use crate::name::Name;
use crate::packet::{Constant, ConstantGroup, Element, Packet, PacketDoc};
use crate::types::{Direction, DocType, ElementType, LocalizedText, PacketType, Value};

/// Function ID reserved for the identity function
pub const IDENTITY_FUNCTION_ID: u8 = 255;

/// Features that add the identity function to a device
pub const IDENTITY_FEATURES: [&str; 2] = ["bricklet_get_identity", "brick_get_identity"];

/// Every device config must declare this feature
pub const BASE_FEATURE: &str = "device";

/// Look up a common constant group by name
pub fn common_constant_group(name: &str) -> Option<ConstantGroup> {
    let threshold = Name::from_static("Threshold Option");
    if threshold.matches(name) {
        return Some(threshold_option_group(threshold));
    }
    None
}

fn threshold_option_group(name: Name) -> ConstantGroup {
    let constant = |name: &'static str, value: &str| Constant {
        name: Name::from_static(name),
        value: Value::Text(value.to_string()),
    };

    ConstantGroup {
        name,
        element_type: ElementType::Char,
        constants: vec![
            constant("Off", "x"),
            constant("Outside", "o"),
            constant("Inside", "i"),
            constant("Smaller", "<"),
            constant("Greater", ">"),
        ],
    }
}

fn out_element(name: &'static str, element_type: ElementType, cardinality: u16) -> Element {
    Element {
        name: Name::from_static(name),
        element_type,
        cardinality,
        direction: Direction::Out,
        scale: None,
        unit: None,
        range: None,
        default: None,
        constant_group: None,
    }
}

/// The standard Get Identity function
pub fn identity_packet(since_firmware: [u8; 3]) -> Packet {
    Packet {
        name: Name::from_static("Get Identity"),
        packet_type: PacketType::Function,
        function_id: IDENTITY_FUNCTION_ID,
        elements: vec![
            out_element("Uid", ElementType::String, 8),
            out_element("Connected Uid", ElementType::String, 8),
            out_element("Position", ElementType::Char, 1),
            out_element("Hardware Version", ElementType::Uint8, 3),
            out_element("Firmware Version", ElementType::Uint8, 3),
            out_element("Device Identifier", ElementType::Uint16, 1),
        ],
        since_firmware,
        doc: PacketDoc {
            doc_type: DocType::Af,
            text: LocalizedText {
                en: "Returns the UID, the UID where the device is connected to, \
the position, the hardware and firmware version as well as the \
device identifier."
                    .to_string(),
                de: "Gibt die UID, die UID zu der das Gerät verbunden ist, die \
Position, die Hard- und Firmware Version sowie den Device Identifier \
zurück."
                    .to_string(),
            },
        },
    }
}
