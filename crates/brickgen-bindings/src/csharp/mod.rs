//! C# bindings language
//!
//! Type mapping follows the .NET bindings conventions: unsigned wire types
//! widen to the next signed C# type, arrays append `[]`, and all wire access
//! goes through the little-endian converter of the bindings runtime.

pub mod bindings;
pub mod examples;

use brickgen_core::{
    Constant, ConstantGroup, Device, Direction, Element, ElementType, Example, Packet, Value,
};

use crate::generator::GeneratorContext;
use crate::language::LanguageTrait;
use crate::text;

pub use bindings::CSharpBindingsGenerator;
pub use examples::CSharpExamplesGenerator;

/// C# implementation of [`LanguageTrait`]
#[derive(Debug, Clone, Copy, Default)]
pub struct CSharp;

pub(crate) fn csharp_type(element_type: ElementType) -> &'static str {
    match element_type {
        ElementType::Int8 => "short",
        ElementType::Uint8 => "byte",
        ElementType::Int16 => "short",
        ElementType::Uint16 => "int",
        ElementType::Int32 => "int",
        ElementType::Uint32 => "long",
        ElementType::Int64 => "long",
        ElementType::Uint64 => "long",
        ElementType::Float => "float",
        ElementType::Bool => "bool",
        ElementType::Char => "char",
        ElementType::String => "string",
    }
}

/// Type the converter writes for an element type
pub(crate) fn le_converter_type(element_type: ElementType) -> &'static str {
    match element_type {
        ElementType::Int8 | ElementType::Uint8 => "byte",
        ElementType::Int16 | ElementType::Uint16 => "short",
        ElementType::Int32 | ElementType::Uint32 => "int",
        ElementType::Int64 | ElementType::Uint64 => "long",
        ElementType::Float => "float",
        ElementType::Bool => "bool",
        ElementType::Char => "char",
        ElementType::String => "string",
    }
}

/// Converter read method, `ByteFrom` or `ByteArrayFrom` for arrays
pub(crate) fn le_converter_from_method(element: &Element) -> String {
    let method = match element.element_type {
        ElementType::Int8 => "SByteFrom",
        ElementType::Uint8 => "ByteFrom",
        ElementType::Int16 => "ShortFrom",
        ElementType::Uint16 => "UShortFrom",
        ElementType::Int32 => "IntFrom",
        ElementType::Uint32 => "UIntFrom",
        ElementType::Int64 => "LongFrom",
        ElementType::Uint64 => "ULongFrom",
        ElementType::Float => "FloatFrom",
        ElementType::Bool => "BoolFrom",
        ElementType::Char => "CharFrom",
        ElementType::String => "StringFrom",
    };

    if element.is_array() {
        method.replace("From", "ArrayFrom")
    } else {
        method.to_string()
    }
}

/// Parameter list of a packet; out elements of functions become `out`
/// parameters unless there is exactly one, which is returned instead
pub(crate) fn parameters(packet: &Packet, with_types: bool) -> Vec<String> {
    let out_count = packet.elements(Direction::Out).count();
    let language = CSharp;

    packet
        .elements
        .iter()
        .filter_map(|element| {
            let is_out = element.direction == Direction::Out && packet.is_function();
            if is_out && out_count == 1 {
                return None;
            }

            let mut parameter = String::new();
            if is_out {
                parameter.push_str("out ");
            }
            if with_types {
                parameter.push_str(&language.element_type_name(element));
                parameter.push(' ');
            }
            parameter.push_str(&language.parameter_name(element));
            Some(parameter)
        })
        .collect()
}

/// The single returned element of a function, if any
pub(crate) fn return_element(packet: &Packet) -> Option<&Element> {
    let mut outputs = packet.elements(Direction::Out);
    match (outputs.next(), outputs.next()) {
        (Some(element), None) if packet.is_function() => Some(element),
        _ => None,
    }
}

/// Boxed comment heading every generated C# file
pub(crate) fn file_header(ctx: &GeneratorContext, version: Option<&semver::Version>) -> String {
    let mut lines = vec![
        format!(
            "This file was automatically generated on {}.",
            ctx.generated_on().format("%Y-%m-%d")
        ),
        String::new(),
    ];
    if let Some(version) = version {
        lines.push(format!("C# Bindings Version {}", version));
        lines.push(String::new());
    }
    lines.push("If you have a bugfix for this file and want to commit it,".to_string());
    lines.push("please fix the bug in the generator.".to_string());

    let mut header = format!("/* {}\n", "*".repeat(59));
    for line in lines {
        header.push_str(&format!(" * {:<57} *\n", line));
    }
    header.push_str(&format!(" {}/\n", "*".repeat(60)));
    header
}

impl LanguageTrait for CSharp {
    fn bindings_name(&self) -> &'static str {
        "csharp"
    }

    fn bindings_display_name(&self) -> &'static str {
        "C#"
    }

    fn doc_suffix(&self) -> &'static str {
        "CSharp"
    }

    fn type_name(&self, element_type: ElementType, cardinality: u16) -> String {
        let name = csharp_type(element_type);
        if cardinality != 1 && element_type != ElementType::String {
            format!("{}[]", name)
        } else {
            name.to_string()
        }
    }

    fn format_value(&self, element_type: ElementType, value: &Value) -> String {
        match (element_type, value) {
            (ElementType::Float, Value::Float(v)) => format!("{}f", text::format_float(*v)),
            (ElementType::Float, Value::Integer(v)) => {
                format!("{}f", text::format_float(*v as f64))
            }
            (ElementType::Char, Value::Text(v)) => format!("'{}'", v.replace('\'', "\\'")),
            (ElementType::String, Value::Text(v)) => format!("\"{}\"", v.replace('"', "\\\"")),
            (_, value) => value.to_string(),
        }
    }

    fn class_name(&self, device: &Device) -> String {
        format!("{}{}", device.category.name().camel(), device.name.camel())
    }

    fn function_name(&self, packet: &Packet) -> String {
        packet.name.camel()
    }

    fn callback_name(&self, packet: &Packet) -> String {
        format!("{}Callback", packet.name.camel())
    }

    fn constant_name(&self, group: &ConstantGroup, constant: &Constant) -> String {
        format!("{}_{}", group.name.upper(), constant.name.upper())
    }

    fn parameter_name(&self, element: &Element) -> String {
        element.name.headless()
    }

    fn function_signature(&self, device: &Device, packet: &Packet) -> String {
        if packet.is_callback() {
            let mut params = vec![format!("{} sender", self.class_name(device))];
            params.extend(parameters(packet, true));
            return format!(
                "public delegate void {}EventHandler({})",
                packet.name.camel(),
                params.join(", ")
            );
        }

        let return_type = return_element(packet)
            .map(|element| self.element_type_name(element))
            .unwrap_or_else(|| "void".to_string());
        let modifier = if packet.is_identity() { "override " } else { "" };

        format!(
            "public {}{} {}({})",
            modifier,
            return_type,
            self.function_name(packet),
            parameters(packet, true).join(", ")
        )
    }

    fn example_file_name(&self, _device: &Device, example: &Example) -> Option<String> {
        Some(format!("Example{}.cs", example.name.camel()))
    }
}
