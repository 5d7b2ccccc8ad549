//! reStructuredText API documentation, shared by all bindings languages

use brickgen_core::{format_scaled_unit, Device, Direction, DocType, Element, Language, Packet};
use tracing::info;

use crate::fs;
use crate::generator::{Generator, GeneratorContext, GeneratorError};
use crate::language::LanguageTrait;

fn localized(language: Language, en: &'static str, de: &'static str) -> &'static str {
    match language {
        Language::En => en,
        Language::De => de,
    }
}

/// Packet sections in document order
const SECTIONS: [(DocType, &str, &str); 5] = [
    (DocType::Bf, "Basic Functions", "Grundfunktionen"),
    (DocType::Af, "Advanced Functions", "Fortgeschrittene Funktionen"),
    (DocType::Llf, "Low-Level Functions", "Low-Level Funktionen"),
    (
        DocType::Ccf,
        "Callback Configuration Functions",
        "Konfigurationsfunktionen für Callbacks",
    ),
    (DocType::C, "Callbacks", "Callbacks"),
];

/// Writes `doc/<lang>/{Name}_{Category}_{Suffix}.rst` for documented devices
#[derive(Debug, Default)]
pub struct DocGenerator<L> {
    language: L,
}

impl<L: LanguageTrait> DocGenerator<L> {
    pub fn new(language: L) -> Self {
        Self { language }
    }

    pub fn file_name(&self, device: &Device) -> String {
        format!(
            "{}_{}_{}.rst",
            device.name.camel(),
            device.category,
            self.language.doc_suffix()
        )
    }

    fn heading(out: &mut String, title: &str, underline: char) {
        out.push_str(title);
        out.push('\n');
        out.push_str(&underline.to_string().repeat(title.chars().count()));
        out.push_str("\n\n");
    }

    fn element_lines(&self, device: &Device, element: &Element, language: Language) -> Vec<String> {
        let role = match element.direction {
            Direction::In => "param",
            Direction::Out => "returns",
        };
        let mut lines = vec![format!(
            ":{} {}: {}",
            role,
            self.language.parameter_name(element),
            self.language.element_type_name(element)
        )];

        if let Some(unit) = format_scaled_unit(element.scale, element.unit) {
            lines.push(format!("  * {}: {}", localized(language, "Unit", "Einheit"), unit));
        }
        let range = match element.range {
            Some(range) => Some((range.min as i128, range.max as i128)),
            None if element.element_type.is_integer() => element.effective_range(),
            None => None,
        };
        if let Some((min, max)) = range {
            lines.push(format!(
                "  * {}: [{} {} {}]",
                localized(language, "Range", "Wertebereich"),
                min,
                localized(language, "to", "bis"),
                max
            ));
        }
        if let Some(default) = &element.default {
            lines.push(format!(
                "  * {}: {}",
                localized(language, "Default", "Standardwert"),
                self.language.format_value(element.element_type, default)
            ));
        }
        if let Some(group) = element
            .constant_group
            .as_ref()
            .and_then(|name| device.constant_group(name.space()))
        {
            let constants: Vec<String> = group
                .constants
                .iter()
                .map(|constant| {
                    format!(
                        "``{}`` = {}",
                        self.language.constant_name(group, constant),
                        self.language.format_value(group.element_type, &constant.value)
                    )
                })
                .collect();
            lines.push(format!(
                "  * {}: {}",
                localized(language, "Constants", "Konstanten"),
                constants.join(", ")
            ));
        }
        lines
    }

    fn write_packet(&self, out: &mut String, device: &Device, packet: &Packet, language: Language) {
        let directive = if packet.is_callback() { "callback" } else { "function" };
        out.push_str(&format!(
            ".. {}:{}:: {}\n\n",
            self.language.bindings_name(),
            directive,
            self.language.function_signature(device, packet)
        ));

        for element in &packet.elements {
            for line in self.element_lines(device, element, language) {
                out.push(' ');
                out.push_str(&line);
                out.push('\n');
            }
        }
        if !packet.elements.is_empty() {
            out.push('\n');
        }

        let text = self
            .language
            .rewrite_doc_text(device, packet.doc.text.get(language));
        for line in text.lines() {
            if line.is_empty() {
                out.push('\n');
            } else {
                out.push(' ');
                out.push_str(line);
                out.push('\n');
            }
        }
        if !text.is_empty() {
            out.push('\n');
        }
    }

    fn write_constants(&self, out: &mut String, device: &Device, language: Language) {
        Self::heading(out, localized(language, "Constants", "Konstanten"), '^');
        out.push_str(&format!(
            ".. {}:member:: {}.DEVICE_IDENTIFIER = {}\n\n",
            self.language.bindings_name(),
            self.language.class_name(device),
            device.identifier
        ));
        out.push_str(&format!(
            ".. {}:member:: {}.DEVICE_DISPLAY_NAME = \"{}\"\n\n",
            self.language.bindings_name(),
            self.language.class_name(device),
            device.long_display_name()
        ));

        for group in &device.constant_groups {
            for constant in &group.constants {
                out.push_str(&format!(
                    ".. {}:member:: {}.{} = {}\n\n",
                    self.language.bindings_name(),
                    self.language.class_name(device),
                    self.language.constant_name(group, constant),
                    self.language.format_value(group.element_type, &constant.value)
                ));
            }
        }
    }

    /// Render the documentation page of a device
    pub fn render(&self, device: &Device, language: Language) -> String {
        let mut out = String::new();
        let display_name = device.long_display_name();

        out.push_str(&format!(
            ".. _{}_{}_{}:\n\n",
            device.name.under(),
            device.category.name().under(),
            self.language.bindings_name()
        ));
        Self::heading(
            &mut out,
            &format!("{} - {}", self.language.bindings_display_name(), display_name),
            '=',
        );

        let intro = match language {
            Language::En => format!(
                "This is the description of the {} API bindings for the {}.",
                self.language.bindings_display_name(),
                display_name
            ),
            Language::De => format!(
                "Dies ist die Beschreibung der {} API Bindings für das {}.",
                self.language.bindings_display_name(),
                display_name
            ),
        };
        out.push_str(&intro);
        out.push_str("\n\n");

        let description = device.description.get(language);
        if !description.is_empty() {
            out.push_str(description);
            out.push_str("\n\n");
        }

        Self::heading(&mut out, "API", '-');
        for (doc_type, en, de) in SECTIONS {
            let packets: Vec<&Packet> = device
                .packets
                .iter()
                .filter(|p| p.doc.doc_type == doc_type)
                .collect();
            if packets.is_empty() {
                continue;
            }

            Self::heading(&mut out, localized(language, en, de), '^');
            for packet in packets {
                self.write_packet(&mut out, device, packet, language);
            }
        }

        self.write_constants(&mut out, device, language);

        let examples: Vec<(String, String)> = device
            .examples
            .iter()
            .filter_map(|example| {
                self.language
                    .example_file_name(device, example)
                    .map(|file| (example.name.to_string(), file))
            })
            .collect();
        if !examples.is_empty() {
            Self::heading(&mut out, localized(language, "Examples", "Beispiele"), '-');
            for (name, file) in examples {
                out.push_str(&format!("* {} (``{}``)\n", name, file));
            }
            out.push('\n');
        }

        out
    }
}

impl<L: LanguageTrait> Generator for DocGenerator<L> {
    fn name(&self) -> &'static str {
        "doc"
    }

    fn prepare(&mut self, ctx: &GeneratorContext) -> Result<(), GeneratorError> {
        fs::recreate_dir(&ctx.doc_dir())
    }

    fn is_matching(&self, device: &Device) -> bool {
        device.documented
    }

    fn generate(&mut self, ctx: &GeneratorContext, device: &Device) -> Result<(), GeneratorError> {
        let content = self.render(device, ctx.language());
        fs::write_file(&ctx.doc_dir().join(self.file_name(device)), &content)
    }

    fn finish(&mut self, ctx: &GeneratorContext) -> Result<(), GeneratorError> {
        info!(
            bindings = self.language.bindings_name(),
            dir = %ctx.doc_dir().display(),
            "Documentation written"
        );
        Ok(())
    }
}
