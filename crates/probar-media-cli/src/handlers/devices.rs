//! Devices command handler

use crate::commands::DevicesArgs;
use jugar_probar_media::{DeviceCatalog, DevicePreset};
use serde::Serialize;

/// One listed device
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeviceRow {
    /// Preset name
    pub name: String,
    /// Width in CSS pixels
    pub width: u32,
    /// Height in CSS pixels
    pub height: u32,
    /// Device pixel ratio
    pub device_scale_factor: f64,
    /// Whether the device is mobile
    pub is_mobile: bool,
}

impl From<&DevicePreset> for DeviceRow {
    fn from(preset: &DevicePreset) -> Self {
        Self {
            name: preset.name.clone(),
            width: preset.width,
            height: preset.height,
            device_scale_factor: preset.device_scale_factor,
            is_mobile: preset.is_mobile,
        }
    }
}

/// Result of the devices command
#[derive(Debug, Clone, Serialize)]
pub struct DevicesReport {
    /// Devices in name order
    pub devices: Vec<DeviceRow>,
}

/// List catalog presets
#[must_use]
pub fn execute_devices(args: &DevicesArgs) -> DevicesReport {
    let catalog = DeviceCatalog::new();
    let devices = catalog
        .presets()
        .filter(|preset| !args.mobile || preset.is_mobile)
        .map(DeviceRow::from)
        .collect();
    DevicesReport { devices }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_lists_all() {
        let report = execute_devices(&DevicesArgs { mobile: false });
        assert_eq!(report.devices.len(), DeviceCatalog::new().len());
        assert!(report.devices.iter().any(|d| d.name == "Desktop 4K"));
    }

    #[test]
    fn test_mobile_filter() {
        let report = execute_devices(&DevicesArgs { mobile: true });
        assert!(!report.devices.is_empty());
        assert!(report.devices.iter().all(|d| d.is_mobile));
    }
}
