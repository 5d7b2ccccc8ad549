//! Shared device fixtures for unit tests

use brickgen_core::{Device, DeviceConfig};

pub(crate) const DISTANCE_SENSOR: &str = r#"
author = "Test Author <test@example.com>"
api_version = [2, 0, 1]
category = "Bricklet"
device_identifier = 9001
name = "Distance Sensor"
display_name = "Distance Sensor"
released = true
documented = true
features = ["device", "bricklet_get_identity"]
common_constant_groups = ["Threshold Option"]
description = { en = "Measures distance & more", de = "Misst Distanzen" }

[[constant_groups]]
name = "Mode"
type = "uint8"
constants = [
    { name = "Normal", value = 0 },
    { name = "Fast", value = 1 },
]

[[packets]]
type = "function"
name = "Set Mode"
since_firmware = [1, 0, 0]
doc_type = "bf"
elements = [{ name = "Mode", type = "uint8", direction = "in", constant_group = "Mode", default = 0 }]
doc = { en = "Sets the mode. See :func:`Get Distance`.", de = "Setzt den Modus." }

[[packets]]
type = "function"
name = "Get Distance"
since_firmware = [1, 0, 0]
doc_type = "bf"
elements = [{ name = "Distance", type = "uint16", direction = "out", scale = [1, 100], unit = "Meter", range = [0, 4000] }]
doc = { en = "Returns the distance <in cm>.", de = "Gibt die Distanz zurück." }

[[packets]]
type = "function"
name = "Get Status"
since_firmware = [1, 1, 0]
doc_type = "af"
elements = [
    { name = "Enabled", type = "bool", direction = "out" },
    { name = "State", type = "char", direction = "out" },
    { name = "Levels", type = "uint8", cardinality = 3, direction = "out" },
]
doc = { en = "Returns the status.", de = "Gibt den Status zurück." }

[[packets]]
type = "function"
name = "Set Label"
since_firmware = [1, 1, 0]
doc_type = "af"
elements = [
    { name = "Label", type = "string", cardinality = 16, direction = "in" },
    { name = "Gain", type = "float", direction = "in", default = 1.5 },
]
doc = { en = "Sets a label.", de = "Setzt ein Label." }

[[packets]]
type = "function"
name = "Set Distance Callback Threshold"
since_firmware = [1, 0, 0]
doc_type = "ccf"
elements = [
    { name = "Option", type = "char", direction = "in", constant_group = "Threshold Option", default = "x" },
    { name = "Min", type = "uint16", direction = "in", scale = [1, 100], unit = "Meter", default = 0 },
    { name = "Max", type = "uint16", direction = "in", scale = [1, 100], unit = "Meter", default = 0 },
]
doc = { en = "Sets the threshold for :cb:`Distance Reached`.", de = "Setzt den Schwellwert." }

[[packets]]
type = "callback"
name = "Distance"
since_firmware = [1, 0, 0]
doc_type = "c"
elements = [{ name = "Distance", type = "uint16", direction = "out", scale = [1, 100], unit = "Meter" }]
doc = { en = "Triggered periodically.", de = "Wird periodisch ausgelöst." }

[[packets]]
type = "callback"
name = "Distance Reached"
since_firmware = [1, 0, 0]
doc_type = "c"
doc = { en = "Triggered when the threshold is met.", de = "Wird ausgelöst." }

[[examples]]
name = "Simple"
functions = [{ kind = "getter", packet = "Get Distance", comment = "Get current distance" }]

[[examples]]
name = "Callback"
functions = [
    { kind = "setter", packet = "Set Mode", arguments = [1], comment = "Use fast mode" },
    { kind = "callback", packet = "Distance" },
]
"#;

pub(crate) fn distance_sensor() -> Device {
    DeviceConfig::from_toml(DISTANCE_SENSOR)
        .and_then(DeviceConfig::into_device)
        .unwrap_or_else(|e| panic!("invalid fixture: {e}"))
}

/// Same sensor as an unreleased, undocumented TNG module without examples
pub(crate) fn tng_module() -> Device {
    let config = DISTANCE_SENSOR
        .replace(r#"category = "Bricklet""#, r#"category = "TNG""#)
        .replace("device_identifier = 9001", "device_identifier = 9002")
        .replace("released = true", "released = false")
        .replace("documented = true", "documented = false")
        .replace(r#""bricklet_get_identity""#, r#""tng""#);
    let config = match config.find("[[examples]]") {
        Some(index) => config[..index].to_string(),
        None => config,
    };

    DeviceConfig::from_toml(&config)
        .and_then(DeviceConfig::into_device)
        .unwrap_or_else(|e| panic!("invalid fixture: {e}"))
}
