//! C# bindings source generator, one class file per device

use brickgen_core::{Device, Direction, Element, ElementType, Packet, HEADER_SIZE};
use std::borrow::Cow;
use tracing::info;

use super::{
    csharp_type, file_header, le_converter_from_method, le_converter_type, return_element, CSharp,
};
use crate::fs;
use crate::generator::{Generator, GeneratorContext, GeneratorError, ReleasedFiles};
use crate::language::LanguageTrait;
use crate::text::{self, CodeWriter, ReferenceKind};

/// Writes `bindings/{Category}{Name}.cs` for every device
#[derive(Debug, Default)]
pub struct CSharpBindingsGenerator {
    released_files: ReleasedFiles,
    version: Option<semver::Version>,
}

impl CSharpBindingsGenerator {
    pub fn new() -> Self {
        Self::default()
    }
}

/// XML doc comment body: escaped text with references turned into `<see>` tags
fn doc_comment(writer: &mut CodeWriter, device: &Device, doc: &str) {
    let class = CSharp.class_name(device);
    let escaped: Cow<'_, str> = quick_xml::escape::escape(doc);
    let body = text::rewrite_references(&escaped, |kind, name| match device.packet(name) {
        Some(packet) => {
            let member = match kind {
                ReferenceKind::Function => CSharp.function_name(packet),
                ReferenceKind::Callback => CSharp.callback_name(packet),
            };
            format!("<see cref=\"Tinkerforge.{}.{}\"/>", class, member)
        }
        None => name.to_string(),
    });

    writer.line("/// <summary>");
    for line in body.lines() {
        writer.line(format!("///  {}", line).trim_end());
    }
    writer.line("/// </summary>");
}

/// Statement storing an input element into the request at `offset`
fn write_element(element: &Element, offset: usize) -> String {
    let name = CSharp.parameter_name(element);
    if element.element_type == ElementType::String || element.is_array() {
        return format!(
            "LEConverter.To({}, {}, {}, request);",
            name, offset, element.cardinality
        );
    }

    let converter = le_converter_type(element.element_type);
    if converter == csharp_type(element.element_type) {
        format!("LEConverter.To({}, {}, request);", name, offset)
    } else {
        format!("LEConverter.To(({}){}, {}, request);", converter, name, offset)
    }
}

/// Expression reading an output element from `buffer` at `offset`
fn read_element(element: &Element, offset: usize, buffer: &str) -> String {
    let method = le_converter_from_method(element);
    let value = if element.element_type == ElementType::String || element.is_array() {
        format!("LEConverter.{}({}, {}, {})", method, offset, buffer, element.cardinality)
    } else {
        format!("LEConverter.{}({}, {})", method, offset, buffer)
    };

    // ulong does not convert implicitly to long
    match element.element_type {
        ElementType::Uint64 if !element.is_array() => {
            format!("({}){}", csharp_type(element.element_type), value)
        }
        _ => value,
    }
}

/// Output elements with their offsets in the response
fn output_offsets(packet: &Packet) -> Vec<(&Element, usize)> {
    let mut offset = HEADER_SIZE;
    packet
        .elements(Direction::Out)
        .map(|element| {
            let current = offset;
            offset += element.size();
            (element, current)
        })
        .collect()
}

fn write_constants(writer: &mut CodeWriter, device: &Device) {
    let class = CSharp.class_name(device);

    writer.line("/// <summary>");
    writer.line("///  Used to identify this device type in");
    writer.line("///  <see cref=\"Tinkerforge.IPConnection.EnumerateCallback\"/>");
    writer.line("/// </summary>");
    writer.line(format!("public static int DEVICE_IDENTIFIER = {};", device.identifier));
    writer.blank();
    writer.line("/// <summary>");
    writer.line(format!(
        "///  Used in combination with <see cref=\"Tinkerforge.{}\"/>",
        class
    ));
    writer.line("/// </summary>");
    writer.line(format!(
        "public static string DEVICE_DISPLAY_NAME = \"{}\";",
        device.long_display_name()
    ));
    writer.blank();

    for packet in device.functions() {
        writer.line("/// <summary>");
        writer.line("/// </summary>");
        writer.line(format!(
            "public const byte FUNCTION_{} = {};",
            packet.name.upper(),
            packet.function_id
        ));
    }
    for packet in device.callbacks() {
        writer.line(format!(
            "protected const int CALLBACK_{} = {};",
            packet.name.upper(),
            packet.function_id
        ));
    }
    writer.blank();

    for group in &device.constant_groups {
        for constant in &group.constants {
            writer.line("/// <summary>");
            writer.line("/// </summary>");
            writer.line(format!(
                "public const {} {} = {};",
                csharp_type(group.element_type),
                CSharp.constant_name(group, constant),
                CSharp.format_value(group.element_type, &constant.value)
            ));
        }
    }
    if !device.constant_groups.is_empty() {
        writer.blank();
    }
}

fn write_callback_declarations(writer: &mut CodeWriter, device: &Device) {
    for packet in device.callbacks() {
        writer.line("/// <summary>");
        writer.line("/// </summary>");
        writer.line(format!("{};", CSharp.function_signature(device, packet)));
        doc_comment(writer, device, &packet.doc.text.en);
        writer.line(format!(
            "public event {}EventHandler {};",
            packet.name.camel(),
            CSharp.callback_name(packet)
        ));
        writer.blank();
    }
}

fn write_constructor(writer: &mut CodeWriter, device: &Device) {
    let class = CSharp.class_name(device);
    let [major, minor, patch] = device.api_version;

    writer.line("/// <summary>");
    writer.line("///  Creates an object with the unique device ID <c>uid</c> and adds it to");
    writer.line("///  the IP Connection <c>ipcon</c>.");
    writer.line("/// </summary>");
    writer.line(format!(
        "public {}(string uid, IPConnection ipcon) : base(uid, ipcon, DEVICE_IDENTIFIER, DEVICE_DISPLAY_NAME)",
        class
    ));
    writer.open();
    writer.line(format!("apiVersion[0] = {};", major));
    writer.line(format!("apiVersion[1] = {};", minor));
    writer.line(format!("apiVersion[2] = {};", patch));
    writer.blank();

    for packet in device.functions() {
        let flag = if packet.elements(Direction::Out).next().is_some() {
            "ALWAYS_TRUE"
        } else {
            "FALSE"
        };
        writer.line(format!(
            "responseExpected[FUNCTION_{}] = ResponseExpectedFlag.{};",
            packet.name.upper(),
            flag
        ));
    }

    if device.callbacks().next().is_some() {
        writer.blank();
    }
    for packet in device.callbacks() {
        writer.line(format!(
            "callbackWrappers[CALLBACK_{}] = new CallbackWrapper(On{});",
            packet.name.upper(),
            CSharp.callback_name(packet)
        ));
    }

    writer.blank();
    writer.line("ipcon.AddDevice(this);");
    writer.close();
    writer.blank();
}

fn write_method(writer: &mut CodeWriter, device: &Device, packet: &Packet) {
    doc_comment(writer, device, &packet.doc.text.en);
    writer.line(CSharp.function_signature(device, packet));
    writer.open();
    writer.line(format!(
        "byte[] request = CreateRequestPacket({}, FUNCTION_{});",
        packet.request_size(),
        packet.name.upper()
    ));

    let mut offset = HEADER_SIZE;
    for element in packet.elements(Direction::In) {
        writer.line(write_element(element, offset));
        offset += element.size();
    }
    writer.blank();

    let outputs = output_offsets(packet);
    if outputs.is_empty() {
        writer.line("SendRequest(request, 0);");
    } else {
        writer.line(format!(
            "byte[] response = SendRequest(request, {});",
            packet.response_size()
        ));
        writer.blank();

        if return_element(packet).is_some() {
            let (element, offset) = outputs[0];
            writer.line(format!("return {};", read_element(element, offset, "response")));
        } else {
            for (element, offset) in outputs {
                writer.line(format!(
                    "{} = {};",
                    CSharp.parameter_name(element),
                    read_element(element, offset, "response")
                ));
            }
        }
    }
    writer.close();
    writer.blank();
}

fn write_callback_handler(writer: &mut CodeWriter, packet: &Packet) {
    let event = CSharp.callback_name(packet);
    let outputs = output_offsets(packet);

    writer.line("/// <summary>");
    writer.line("/// </summary>");
    writer.line(format!("protected void On{}(byte[] response)", event));
    writer.open();
    for (element, offset) in &outputs {
        writer.line(format!(
            "{} {} = {};",
            CSharp.element_type_name(element),
            CSharp.parameter_name(element),
            read_element(element, *offset, "response")
        ));
    }
    writer.line(format!("var handler = {};", event));
    writer.blank();
    writer.line("if (handler != null)");
    writer.open();

    let mut arguments = vec!["this".to_string()];
    arguments.extend(outputs.iter().map(|(element, _)| CSharp.parameter_name(element)));
    writer.line(format!("handler({});", arguments.join(", ")));
    writer.close();
    writer.close();
    writer.blank();
}

/// Render the complete class file of a device
pub fn render(
    ctx: &GeneratorContext,
    device: &Device,
    version: Option<&semver::Version>,
) -> String {
    let mut writer = CodeWriter::new("\t");
    let class = CSharp.class_name(device);

    writer.line("using System;");
    writer.blank();
    writer.line("namespace Tinkerforge");
    writer.open();
    doc_comment(&mut writer, device, &device.description.en);
    writer.line(format!("public class {} : Device", class));
    writer.open();

    write_constants(&mut writer, device);
    write_callback_declarations(&mut writer, device);
    write_constructor(&mut writer, device);
    for packet in device.functions() {
        write_method(&mut writer, device, packet);
    }
    for packet in device.callbacks() {
        write_callback_handler(&mut writer, packet);
    }

    writer.close();
    writer.close();

    format!("{}\n{}", file_header(ctx, version), writer.finish())
}

impl Generator for CSharpBindingsGenerator {
    fn name(&self) -> &'static str {
        "csharp-bindings"
    }

    fn prepare(&mut self, ctx: &GeneratorContext) -> Result<(), GeneratorError> {
        fs::recreate_dir(&ctx.bindings_dir())?;
        self.version = ctx.bindings_version()?;
        self.released_files = ReleasedFiles::new();
        Ok(())
    }

    fn generate(&mut self, ctx: &GeneratorContext, device: &Device) -> Result<(), GeneratorError> {
        let file_name = format!("{}.cs", CSharp.class_name(device));
        let source = render(ctx, device, self.version.as_ref());
        fs::write_file(&ctx.bindings_dir().join(&file_name), &source)?;

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
            "C# bindings written"
        );
        Ok(())
    }
}
