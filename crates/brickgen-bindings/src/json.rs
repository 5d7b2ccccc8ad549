//! JSON bindings: the validated device model as one document per device

use brickgen_core::{
    Constant, ConstantGroup, Device, Direction, Element, ElementType, Example, Packet, Value,
};
use serde::Serialize;
use tracing::info;

use crate::fs;
use crate::generator::{Generator, GeneratorContext, GeneratorError, ReleasedFiles};
use crate::language::LanguageTrait;

/// JSON implementation of [`LanguageTrait`]
#[derive(Debug, Clone, Copy, Default)]
pub struct Json;

impl Json {
    fn element_list(&self, packet: &Packet, direction: Direction) -> String {
        packet
            .elements(direction)
            .map(|element| {
                format!(
                    "{}: {}",
                    self.parameter_name(element),
                    self.element_type_name(element)
                )
            })
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl LanguageTrait for Json {
    fn bindings_name(&self) -> &'static str {
        "json"
    }

    fn bindings_display_name(&self) -> &'static str {
        "JSON"
    }

    fn doc_suffix(&self) -> &'static str {
        "JSON"
    }

    fn type_name(&self, element_type: ElementType, cardinality: u16) -> String {
        if cardinality != 1 && element_type != ElementType::String {
            format!("{}[{}]", element_type, cardinality)
        } else {
            element_type.to_string()
        }
    }

    fn format_value(&self, _element_type: ElementType, value: &Value) -> String {
        serde_json::to_string(value).unwrap_or_else(|_| value.to_string())
    }

    fn class_name(&self, device: &Device) -> String {
        format!("{}_{}", device.category.name().under(), device.name.under())
    }

    fn function_name(&self, packet: &Packet) -> String {
        packet.name.under()
    }

    fn callback_name(&self, packet: &Packet) -> String {
        packet.name.under()
    }

    fn constant_name(&self, group: &ConstantGroup, constant: &Constant) -> String {
        format!("{}_{}", group.name.under(), constant.name.under())
    }

    fn parameter_name(&self, element: &Element) -> String {
        element.name.under()
    }

    fn function_signature(&self, _device: &Device, packet: &Packet) -> String {
        let outputs = self.element_list(packet, Direction::Out);
        if packet.is_callback() {
            return format!("{} -> ({})", self.callback_name(packet), outputs);
        }
        format!(
            "{}({}) -> ({})",
            self.function_name(packet),
            self.element_list(packet, Direction::In),
            outputs
        )
    }

    fn example_file_name(&self, _device: &Device, _example: &Example) -> Option<String> {
        None
    }
}

#[derive(Serialize)]
struct DeviceDocument<'a> {
    bindings_version: Option<String>,
    device: &'a Device,
}

/// Render the JSON document of a device
pub fn render(
    device: &Device,
    version: Option<&semver::Version>,
) -> Result<String, GeneratorError> {
    let document = DeviceDocument {
        bindings_version: version.map(ToString::to_string),
        device,
    };
    Ok(serde_json::to_string_pretty(&document)?)
}

/// Writes `bindings/{category}_{device}.json` for every device
#[derive(Debug, Default)]
pub struct JsonBindingsGenerator {
    released_files: ReleasedFiles,
    version: Option<semver::Version>,
}

impl JsonBindingsGenerator {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Generator for JsonBindingsGenerator {
    fn name(&self) -> &'static str {
        "json-bindings"
    }

    fn prepare(&mut self, ctx: &GeneratorContext) -> Result<(), GeneratorError> {
        fs::recreate_dir(&ctx.bindings_dir())?;
        self.version = ctx.bindings_version()?;
        self.released_files = ReleasedFiles::new();
        Ok(())
    }

    fn generate(&mut self, ctx: &GeneratorContext, device: &Device) -> Result<(), GeneratorError> {
        let file_name = format!("{}.json", Json.class_name(device));
        let content = render(device, self.version.as_ref())?;
        fs::write_file(&ctx.bindings_dir().join(&file_name), &content)?;

        if device.released {
            self.released_files.push(file_name);
        }
        Ok(())
    }

    fn finish(&mut self, ctx: &GeneratorContext) -> Result<(), GeneratorError> {
        self.released_files.save(&ctx.released_files_path())?;
        info!(
            released = self.released_files.len(),
            dir = %ctx.bindings_dir().display(),
            "JSON bindings written"
        );
        Ok(())
    }
}
