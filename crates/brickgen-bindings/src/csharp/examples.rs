//! C# example program generator
//!
//! Writes `examples/{category}/{device}/Example{Name}.cs` for every example
//! of a device. Getter results are printed in the base unit of their scale.

use brickgen_core::{
    Device, Direction, Element, Example, ExampleFunction, ExampleKind, Name, Packet, Value,
};
use std::collections::HashSet;
use tracing::info;

use super::{return_element, CSharp};
use crate::fs;
use crate::generator::{Generator, GeneratorContext, GeneratorError, ReleasedFiles};
use crate::language::LanguageTrait;
use crate::text::CodeWriter;

#[derive(Debug, Default)]
pub struct CSharpExamplesGenerator {
    released_examples: ReleasedFiles,
}

impl CSharpExamplesGenerator {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Example path relative to the examples dir, always `/`-separated
pub fn example_path(device: &Device, example: &Example) -> String {
    format!(
        "{}/{}/Example{}.cs",
        device.category.name().under(),
        device.name.under(),
        example.name.camel()
    )
}

/// Expression printing an element value in its base unit
fn print_value(element: &Element, variable: &str) -> String {
    if element.is_array() {
        return format!(
            "Console.WriteLine(\"{}: \" + String.Join(\", \", {}));",
            element.name, variable
        );
    }

    let value = match element.scale {
        Some(scale) if !scale.is_identity() && scale.numerator == 1 => {
            format!("{}/{}.0", variable, scale.denominator)
        }
        Some(scale) if !scale.is_identity() => {
            format!("{}*{}/{}.0", variable, scale.numerator, scale.denominator)
        }
        _ => variable.to_string(),
    };

    match element.unit {
        Some(unit) => format!(
            "Console.WriteLine(\"{}: \" + {} + \" {}\");",
            element.name,
            value,
            unit.symbol()
        ),
        None => format!("Console.WriteLine(\"{}: \" + {});", element.name, value),
    }
}

fn handler_name(packet: &Packet) -> String {
    format!("{}CB", packet.name.camel())
}

fn write_callback_handler(writer: &mut CodeWriter, device: &Device, packet: &Packet) {
    let mut params = vec![format!("{} sender", CSharp.class_name(device))];
    params.extend(super::parameters(packet, true));

    writer.line(format!("// Callback function for {} callback", packet.name.lower()));
    writer.line(format!("static void {}({})", handler_name(packet), params.join(", ")));
    writer.open();

    let outputs: Vec<&Element> = packet.elements(Direction::Out).collect();
    if outputs.is_empty() {
        writer.line(format!("Console.WriteLine(\"{}\");", packet.name));
    }
    for element in outputs {
        writer.line(print_value(element, &CSharp.parameter_name(element)));
    }
    writer.close();
    writer.blank();
}

fn format_arguments(packet: &Packet, arguments: &[Value]) -> Vec<String> {
    packet
        .elements(Direction::In)
        .zip(arguments)
        .map(|(element, value)| CSharp.format_value(element.element_type, value))
        .collect()
}

/// "0.2s", "1s", "10s"
fn seconds(milliseconds: u32) -> String {
    format!("{}s", f64::from(milliseconds) / 1000.0)
}

fn threshold_phrase(arguments: &[Value]) -> String {
    let at = |index: usize| arguments.get(index).map(ToString::to_string).unwrap_or_default();
    match at(0).as_str() {
        ">" => format!("greater than {}", at(1)),
        "<" => format!("smaller than {}", at(1)),
        "i" => format!("between {} and {}", at(1), at(2)),
        "o" => format!("outside of {} and {}", at(1), at(2)),
        _ => "off".to_string(),
    }
}

fn write_invocation(writer: &mut CodeWriter, variable: &str, packet: &Packet, arguments: &[Value]) {
    writer.line(format!(
        "{}.{}({});",
        variable,
        CSharp.function_name(packet),
        format_arguments(packet, arguments).join(", ")
    ));
}

fn write_getter(writer: &mut CodeWriter, variable: &str, packet: &Packet, arguments: &[Value]) {
    let method = CSharp.function_name(packet);
    let arguments = format_arguments(packet, arguments);

    match return_element(packet) {
        Some(element) => {
            let name = CSharp.parameter_name(element);
            writer.line(format!(
                "{} {} = {}.{}({});",
                CSharp.element_type_name(element),
                name,
                variable,
                method,
                arguments.join(", ")
            ));
            writer.line(print_value(element, &name));
        }
        None => {
            let outputs: Vec<&Element> = packet.elements(Direction::Out).collect();
            for element in &outputs {
                writer.line(format!(
                    "{} {};",
                    CSharp.element_type_name(element),
                    CSharp.parameter_name(element)
                ));
            }

            let mut call_arguments = arguments;
            call_arguments.extend(
                outputs
                    .iter()
                    .map(|element| format!("out {}", CSharp.parameter_name(element))),
            );
            writer.line(format!("{}.{}({});", variable, method, call_arguments.join(", ")));
            writer.blank();
            for element in outputs {
                writer.line(print_value(element, &CSharp.parameter_name(element)));
            }
        }
    }
}

fn write_step(
    writer: &mut CodeWriter,
    device: &Device,
    variable: &str,
    function: &ExampleFunction,
) {
    let subject = function.packet.as_ref();
    let packet = match function.kind {
        ExampleKind::Sleep => None,
        ExampleKind::Getter | ExampleKind::Setter | ExampleKind::Callback => {
            subject.and_then(|name| device.packet(name.space()))
        }
        kind => kind
            .configuration_function(subject)
            .and_then(|name| device.packet(&name)),
    };
    let subject_lower = subject.map(Name::lower).unwrap_or_default();

    match (function.kind, packet, function.milliseconds) {
        (ExampleKind::Sleep, _, Some(milliseconds)) => {
            if let Some(comment) = &function.comment {
                writer.line(format!("// {}", comment));
            }
            writer.line(format!("System.Threading.Thread.Sleep({});", milliseconds));
        }
        (ExampleKind::Setter, Some(packet), _) => {
            writer.line(format!("// {}", comment_or(function, || packet.name.to_string())));
            write_invocation(writer, variable, packet, &function.arguments);
        }
        (ExampleKind::Getter, Some(packet), _) => {
            writer.line(format!(
                "// {}",
                comment_or(function, || format!("Get current {}", packet.name.lower()))
            ));
            write_getter(writer, variable, packet, &function.arguments);
        }
        (ExampleKind::Callback, Some(packet), _) => {
            writer.line(format!(
                "// {}",
                comment_or(function, || format!(
                    "Register {} callback to function {}",
                    packet.name.lower(),
                    handler_name(packet)
                ))
            ));
            writer.line(format!(
                "{}.{} += {};",
                variable,
                CSharp.callback_name(packet),
                handler_name(packet)
            ));
        }
        (ExampleKind::CallbackPeriod, Some(setter), Some(milliseconds)) => {
            writer.line(format!(
                "// {}",
                comment_or(function, || format!(
                    "Set period for {} callback to {} ({}ms)",
                    subject_lower,
                    seconds(milliseconds),
                    milliseconds
                ))
            ));
            write_invocation(writer, variable, setter, &[Value::Integer(milliseconds.into())]);
        }
        (ExampleKind::DebouncePeriod, Some(setter), Some(milliseconds)) => {
            writer.line(format!(
                "// {}",
                comment_or(function, || format!(
                    "Get threshold callbacks with a debounce time of {} ({}ms)",
                    seconds(milliseconds),
                    milliseconds
                ))
            ));
            write_invocation(writer, variable, setter, &[Value::Integer(milliseconds.into())]);
        }
        (ExampleKind::CallbackThreshold, Some(setter), _) => {
            writer.line(format!(
                "// {}",
                comment_or(function, || format!(
                    "Configure threshold for {} \"{}\"",
                    subject_lower,
                    threshold_phrase(&function.arguments)
                ))
            ));
            write_invocation(writer, variable, setter, &function.arguments);
        }
        _ => return,
    }
    writer.blank();
}

fn comment_or(function: &ExampleFunction, fallback: impl FnOnce() -> String) -> String {
    function.comment.clone().unwrap_or_else(fallback)
}

/// Render a complete example program
pub fn render(device: &Device, example: &Example) -> String {
    let class = CSharp.class_name(device);
    let variable = device.name.initials();
    let mut writer = CodeWriter::new("\t");

    writer.line("using System;");
    writer.line("using Tinkerforge;");
    writer.blank();
    writer.line("class Example");
    writer.open();
    writer.line("private static string HOST = \"localhost\";");
    writer.line("private static int PORT = 4223;");
    writer.line(format!(
        "private static string UID = \"XYZ\"; // Change XYZ to the UID of your {}",
        device.long_display_name()
    ));
    writer.blank();

    let mut handlers = HashSet::new();
    for function in &example.functions {
        if function.kind != ExampleKind::Callback {
            continue;
        }
        let Some(packet) = function.packet.as_ref().and_then(|name| device.packet(name.space()))
        else {
            continue;
        };
        if handlers.insert(packet.function_id) {
            write_callback_handler(&mut writer, device, packet);
        }
    }

    writer.line("static void Main()");
    writer.open();
    writer.line("IPConnection ipcon = new IPConnection(); // Create IP connection");
    writer.line(format!(
        "{} {} = new {}(UID, ipcon); // Create device object",
        class, variable, class
    ));
    writer.blank();
    writer.line("ipcon.Connect(HOST, PORT); // Connect to brickd");
    writer.line("// Don't use device before ipcon is connected");
    writer.blank();

    for function in &example.functions {
        write_step(&mut writer, device, &variable, function);
    }

    writer.line("Console.WriteLine(\"Press enter to exit\");");
    writer.line("Console.ReadLine();");
    writer.blank();

    for cleanup in &example.cleanups {
        write_step(&mut writer, device, &variable, cleanup);
    }

    writer.line("ipcon.Disconnect();");
    writer.close();
    writer.close();

    writer.finish()
}

impl Generator for CSharpExamplesGenerator {
    fn name(&self) -> &'static str {
        "csharp-examples"
    }

    fn prepare(&mut self, ctx: &GeneratorContext) -> Result<(), GeneratorError> {
        fs::recreate_dir(&ctx.examples_dir())?;
        self.released_examples = ReleasedFiles::new();
        Ok(())
    }

    fn is_matching(&self, device: &Device) -> bool {
        !device.examples.is_empty()
    }

    fn generate(&mut self, ctx: &GeneratorContext, device: &Device) -> Result<(), GeneratorError> {
        for example in &device.examples {
            let relative = example_path(device, example);
            fs::write_file(&ctx.examples_dir().join(&relative), &render(device, example))?;

            if device.released {
                self.released_examples.push(relative);
            }
        }
        Ok(())
    }

    fn finish(&mut self, ctx: &GeneratorContext) -> Result<(), GeneratorError> {
        self.released_examples.save(&ctx.released_examples_path())?;
        info!(
            released = self.released_examples.len(),
            dir = %ctx.examples_dir().display(),
            "C# examples written"
        );
        Ok(())
    }
}
