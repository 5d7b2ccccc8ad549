//! Mapping of the device model onto a target language
//!
//! Implemented once per bindings language. Generators that only need names,
//! types and signatures (documentation) are written against this trait.

use brickgen_core::{Constant, ConstantGroup, Device, Element, ElementType, Example, Packet, Value};
use tracing::warn;

use crate::text::{self, ReferenceKind};

pub trait LanguageTrait {
    /// Directory and archive name, e.g. `csharp`
    fn bindings_name(&self) -> &'static str;

    /// Human readable name, e.g. `C#`
    fn bindings_display_name(&self) -> &'static str;

    /// Suffix of documentation file names, e.g. `CSharp`
    fn doc_suffix(&self) -> &'static str;

    fn type_name(&self, element_type: ElementType, cardinality: u16) -> String;

    /// Render a literal of the given type
    fn format_value(&self, element_type: ElementType, value: &Value) -> String;

    fn class_name(&self, device: &Device) -> String;

    fn function_name(&self, packet: &Packet) -> String;

    fn callback_name(&self, packet: &Packet) -> String;

    fn constant_name(&self, group: &ConstantGroup, constant: &Constant) -> String;

    fn parameter_name(&self, element: &Element) -> String;

    /// Full declaration of a function or the handler of a callback
    fn function_signature(&self, device: &Device, packet: &Packet) -> String;

    /// File name of an example program, `None` if the language has none
    fn example_file_name(&self, device: &Device, example: &Example) -> Option<String>;

    fn element_type_name(&self, element: &Element) -> String {
        self.type_name(element.element_type, element.cardinality)
    }

    /// Name of a packet as used in the bindings
    fn packet_name(&self, packet: &Packet) -> String {
        if packet.is_callback() {
            self.callback_name(packet)
        } else {
            self.function_name(packet)
        }
    }

    /// reStructuredText reference to a packet of the device
    fn doc_reference(&self, device: &Device, packet: &Packet) -> String {
        let role = if packet.is_callback() { "cb" } else { "func" };
        let name = self.packet_name(packet);
        format!(
            ":{}:{}:`{} <{}.{}>`",
            self.bindings_name(),
            role,
            name,
            self.class_name(device),
            name
        )
    }

    /// Rewrite `:func:` and `:cb:` references of a documentation text
    fn rewrite_doc_text(&self, device: &Device, text: &str) -> String {
        text::rewrite_references(text, |kind, name| {
            let packet = device
                .packet(name)
                .filter(|p| p.is_callback() == (kind == ReferenceKind::Callback));
            match packet {
                Some(packet) => self.doc_reference(device, packet),
                None => {
                    warn!(
                        device = %device.long_display_name(),
                        reference = name,
                        "Unresolved documentation reference"
                    );
                    format!("``{}``", name)
                }
            }
        })
    }
}
