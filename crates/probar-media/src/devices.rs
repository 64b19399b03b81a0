//! Device Presets
//!
//! Named viewport presets for common phones, tablets and desktops, so a test
//! can write `catalog.get("iPhone 14")` instead of spelling out every feature.

use crate::viewport::{MediaFeature, ViewportDescription};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A device's screen geometry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DevicePreset {
    /// Device name (e.g., "iPhone 14")
    pub name: String,
    /// Viewport width in CSS pixels
    pub width: u32,
    /// Viewport height in CSS pixels
    pub height: u32,
    /// Device pixel ratio (e.g., 2.0 for Retina, 3.0 for iPhone)
    pub device_scale_factor: f64,
    /// Whether the device is mobile
    pub is_mobile: bool,
}

impl DevicePreset {
    /// Create a preset with a 1x pixel ratio
    #[must_use]
    pub fn new(name: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            name: name.into(),
            width,
            height,
            device_scale_factor: 1.0,
            is_mobile: false,
        }
    }

    /// Set device scale factor
    #[must_use]
    pub const fn with_device_scale_factor(mut self, factor: f64) -> Self {
        self.device_scale_factor = factor;
        self
    }

    /// Set mobile mode
    #[must_use]
    pub const fn with_mobile(mut self, is_mobile: bool) -> Self {
        self.is_mobile = is_mobile;
        self
    }

    /// Landscape version of this preset
    #[must_use]
    pub fn landscape(self) -> Self {
        if self.width >= self.height {
            self
        } else {
            self.rotated()
        }
    }

    /// Portrait version of this preset
    #[must_use]
    pub fn portrait(self) -> Self {
        if self.height >= self.width {
            self
        } else {
            self.rotated()
        }
    }

    fn rotated(self) -> Self {
        Self {
            width: self.height,
            height: self.width,
            ..self
        }
    }

    /// Check if the preset is wider than it is tall
    #[must_use]
    pub const fn is_landscape(&self) -> bool {
        self.width > self.height
    }

    /// Media feature values for this device
    #[must_use]
    pub fn viewport(&self) -> ViewportDescription {
        let orientation = if self.is_landscape() {
            "landscape"
        } else {
            "portrait"
        };
        let ratio = format!("{}/{}", self.width, self.height);

        ViewportDescription::new()
            .with_media_type("screen")
            .width(format!("{}px", self.width))
            .height(format!("{}px", self.height))
            .with(MediaFeature::DeviceWidth, format!("{}px", self.width))
            .with(MediaFeature::DeviceHeight, format!("{}px", self.height))
            .orientation(orientation)
            .with(
                MediaFeature::Resolution,
                format!("{}dppx", self.device_scale_factor),
            )
            .with(MediaFeature::AspectRatio, ratio.clone())
            .with(MediaFeature::DeviceAspectRatio, ratio)
            .with(MediaFeature::Color, 8_u32)
    }
}

/// Registry of named device presets
///
/// Lookups ignore case and treat `-`/`_` as spaces, so `iphone-14` finds
/// "iPhone 14".
#[derive(Debug, Clone, Default)]
pub struct DeviceCatalog {
    presets: BTreeMap<String, DevicePreset>,
}

impl DeviceCatalog {
    /// Create a catalog with the built-in presets
    #[must_use]
    pub fn new() -> Self {
        let mut catalog = Self::default();

        catalog.register(Self::iphone_14());
        catalog.register(Self::iphone_14_pro_max());
        catalog.register(Self::pixel_7());
        catalog.register(Self::ipad_mini());
        catalog.register(Self::ipad_pro());
        catalog.register(Self::desktop_1080p());
        catalog.register(Self::desktop_1440p());
        catalog.register(Self::desktop_4k());

        catalog
    }

    /// Create a catalog with no presets
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Register a preset, replacing any preset with the same name
    pub fn register(&mut self, preset: DevicePreset) {
        let _ = self.presets.insert(normalize(&preset.name), preset);
    }

    /// Look up a preset by name
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&DevicePreset> {
        self.presets.get(&normalize(name))
    }

    /// Preset names, sorted
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.presets.values().map(|p| p.name.as_str()).collect();
        names.sort_unstable();
        names
    }

    /// All presets, in name order
    pub fn presets(&self) -> impl Iterator<Item = &DevicePreset> {
        let mut presets: Vec<&DevicePreset> = self.presets.values().collect();
        presets.sort_by(|a, b| a.name.cmp(&b.name));
        presets.into_iter()
    }

    /// Number of presets
    #[must_use]
    pub fn len(&self) -> usize {
        self.presets.len()
    }

    /// Check if the catalog has no presets
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.presets.is_empty()
    }

    // ========================================================================
    // Phones
    // ========================================================================

    /// iPhone 14
    #[must_use]
    pub fn iphone_14() -> DevicePreset {
        DevicePreset::new("iPhone 14", 390, 844)
            .with_device_scale_factor(3.0)
            .with_mobile(true)
    }

    /// iPhone 14 Pro Max
    #[must_use]
    pub fn iphone_14_pro_max() -> DevicePreset {
        DevicePreset::new("iPhone 14 Pro Max", 430, 932)
            .with_device_scale_factor(3.0)
            .with_mobile(true)
    }

    /// Google Pixel 7
    #[must_use]
    pub fn pixel_7() -> DevicePreset {
        DevicePreset::new("Pixel 7", 412, 915)
            .with_device_scale_factor(2.625)
            .with_mobile(true)
    }

    // ========================================================================
    // Tablets
    // ========================================================================

    /// iPad Mini
    #[must_use]
    pub fn ipad_mini() -> DevicePreset {
        DevicePreset::new("iPad Mini", 768, 1024)
            .with_device_scale_factor(2.0)
            .with_mobile(true)
    }

    /// iPad Pro 12.9"
    #[must_use]
    pub fn ipad_pro() -> DevicePreset {
        DevicePreset::new("iPad Pro", 1024, 1366)
            .with_device_scale_factor(2.0)
            .with_mobile(true)
    }

    // ========================================================================
    // Desktops
    // ========================================================================

    /// 1920x1080 desktop
    #[must_use]
    pub fn desktop_1080p() -> DevicePreset {
        DevicePreset::new("Desktop 1080p", 1920, 1080)
    }

    /// 2560x1440 desktop
    #[must_use]
    pub fn desktop_1440p() -> DevicePreset {
        DevicePreset::new("Desktop 1440p", 2560, 1440)
    }

    /// 4K desktop at 2x scaling
    #[must_use]
    pub fn desktop_4k() -> DevicePreset {
        DevicePreset::new("Desktop 4K", 1920, 1080).with_device_scale_factor(2.0)
    }
}

fn normalize(name: &str) -> String {
    name.trim()
        .chars()
        .map(|c| match c {
            '-' | '_' => ' ',
            c => c.to_ascii_lowercase(),
        })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
