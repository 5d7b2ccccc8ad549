//! Registry of all validated devices of a config directory
//!
//! Loaded once per run, read-only afterwards. Devices are kept ordered by
//! category (Brick, Bricklet, TNG) and then by name so every generator visits
//! them in the same order.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

use crate::config::{load_device, ConfigError};
use crate::device::Device;

#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to load {path}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: ConfigError,
    },
    #[error("Duplicate device identifier {0}")]
    DuplicateIdentifier(u16),
    #[error("Duplicate device {0}")]
    DuplicateName(String),
}

#[derive(Debug, Clone, Default)]
pub struct DeviceRegistry {
    devices: Vec<Device>,
}

impl DeviceRegistry {
    /// Load every `*.toml` file of a directory, in file name order
    pub fn load_dir(dir: &Path) -> Result<Self, RegistryError> {
        let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "toml"))
            .collect();
        paths.sort();

        let mut devices = Vec::with_capacity(paths.len());
        for path in paths {
            debug!(path = %path.display(), "Loading device config");
            let device = load_device(&path).map_err(|source| RegistryError::Config {
                path: path.clone(),
                source,
            })?;
            devices.push(device);
        }

        let registry = Self::from_devices(devices)?;
        info!(
            dir = %dir.display(),
            devices = registry.len(),
            "Loaded device registry"
        );
        Ok(registry)
    }

    /// Build a registry from already validated devices
    pub fn from_devices(mut devices: Vec<Device>) -> Result<Self, RegistryError> {
        let mut identifiers = HashSet::new();
        let mut names = HashSet::new();
        for device in &devices {
            if !identifiers.insert(device.identifier) {
                return Err(RegistryError::DuplicateIdentifier(device.identifier));
            }
            if !names.insert((device.category, device.name.lower())) {
                return Err(RegistryError::DuplicateName(device.long_display_name()));
            }
        }

        devices.sort_by(|a, b| {
            a.category
                .cmp(&b.category)
                .then_with(|| a.name.space().cmp(b.name.space()))
        });

        Ok(Self { devices })
    }

    pub fn by_identifier(&self, identifier: u16) -> Option<&Device> {
        self.devices.iter().find(|d| d.identifier == identifier)
    }

    /// Case-insensitive lookup; ambiguous across categories, first match wins
    pub fn by_name(&self, name: &str) -> Option<&Device> {
        self.devices.iter().find(|d| d.name.matches(name))
    }

    pub fn devices(&self) -> impl Iterator<Item = &Device> {
        self.devices.iter()
    }

    pub fn released(&self) -> impl Iterator<Item = &Device> {
        self.devices.iter().filter(|d| d.released)
    }

    pub fn documented(&self) -> impl Iterator<Item = &Device> {
        self.devices.iter().filter(|d| d.documented)
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn device_toml(identifier: u16, category: &str, name: &str, released: bool) -> String {
        format!(
            r#"
author = "Test"
api_version = [2, 0, 0]
category = "{category}"
device_identifier = {identifier}
name = "{name}"
display_name = "{name}"
released = {released}
features = ["device"]
description = {{ en = "Test", de = "Test" }}
"#
        )
    }

    fn write(dir: &TempDir, file: &str, content: &str) {
        std::fs::write(dir.path().join(file), content).unwrap();
    }

    #[test]
    fn test_load_dir_orders_devices() {
        let dir = TempDir::new().unwrap();
        write(&dir, "a.toml", &device_toml(3, "TNG", "DI8", false));
        write(&dir, "b.toml", &device_toml(2, "Bricklet", "Piezo Buzzer", true));
        write(&dir, "c.toml", &device_toml(1, "Brick", "DC", true));
        write(&dir, "d.toml", &device_toml(4, "Bricklet", "Analog In", false));
        write(&dir, "license.txt", "not a device");

        let registry = DeviceRegistry::load_dir(dir.path()).unwrap();
        let names: Vec<String> = registry.devices().map(|d| d.long_display_name()).collect();
        assert_eq!(
            names,
            vec![
                "DC Brick",
                "Analog In Bricklet",
                "Piezo Buzzer Bricklet",
                "TNG DI8",
            ]
        );
        assert_eq!(registry.released().count(), 2);
        assert_eq!(registry.by_identifier(2).unwrap().name.space(), "Piezo Buzzer");
        assert!(registry.by_name("piezo buzzer").is_some());
        assert!(registry.by_identifier(99).is_none());
    }

    #[test]
    fn test_duplicate_identifier() {
        let dir = TempDir::new().unwrap();
        write(&dir, "a.toml", &device_toml(7, "Bricklet", "One", true));
        write(&dir, "b.toml", &device_toml(7, "Bricklet", "Two", true));

        let result = DeviceRegistry::load_dir(dir.path());
        assert!(matches!(result, Err(RegistryError::DuplicateIdentifier(7))));
    }

    #[test]
    fn test_duplicate_name() {
        let dir = TempDir::new().unwrap();
        write(&dir, "a.toml", &device_toml(1, "Bricklet", "Temperature", true));
        write(&dir, "b.toml", &device_toml(2, "Bricklet", "temperature", true));

        let result = DeviceRegistry::load_dir(dir.path());
        assert!(matches!(result, Err(RegistryError::DuplicateName(_))));
    }

    #[test]
    fn test_same_name_different_category() {
        let dir = TempDir::new().unwrap();
        write(&dir, "a.toml", &device_toml(1, "Brick", "DC", true));
        write(&dir, "b.toml", &device_toml(2, "Bricklet", "DC", true));

        let registry = DeviceRegistry::load_dir(dir.path()).unwrap();
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_invalid_config_names_path() {
        let dir = TempDir::new().unwrap();
        write(&dir, "broken.toml", "name = ");

        match DeviceRegistry::load_dir(dir.path()) {
            Err(RegistryError::Config { path, .. }) => {
                assert!(path.ends_with("broken.toml"))
            }
            other => panic!("expected config error, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_dir() {
        let dir = TempDir::new().unwrap();
        let registry = DeviceRegistry::load_dir(dir.path()).unwrap();
        assert!(registry.is_empty());
    }
}
