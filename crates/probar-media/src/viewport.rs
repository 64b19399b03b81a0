//! Viewport Descriptions
//!
//! The simulated set of media feature values a query is evaluated against.
//! Descriptions are partial: any subset of the recognized features may be
//! present, and absent features never match.
//!
//! Descriptions can be built in code or loaded from YAML/JSON files:
//!
//! ```yaml
//! type: screen
//! width: 320px
//! height: 640px
//! orientation: portrait
//! prefers-color-scheme: dark
//! ```

use crate::result::{MediaMockError, MediaMockResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;

/// Media features recognized by the mock
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MediaFeature {
    /// `orientation` (portrait | landscape)
    Orientation,
    /// `scan` (interlace | progressive)
    Scan,
    /// `width` of the viewport
    Width,
    /// `height` of the viewport
    Height,
    /// `device-width`
    DeviceWidth,
    /// `device-height`
    DeviceHeight,
    /// `resolution`
    Resolution,
    /// `aspect-ratio`
    AspectRatio,
    /// `device-aspect-ratio`
    DeviceAspectRatio,
    /// `grid`
    Grid,
    /// `color` bits per component
    Color,
    /// `color-index`
    ColorIndex,
    /// `monochrome` bits per pixel
    Monochrome,
    /// `prefers-color-scheme` (light | dark)
    PrefersColorScheme,
}

/// How a feature's values are compared
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeatureKind {
    /// Case-insensitive keyword, no range prefixes
    Keyword,
    /// CSS length, normalized to px
    Length,
    /// Resolution, normalized to dpi
    Resolution,
    /// Ratio such as `16/9`
    Ratio,
    /// Plain integer
    Integer,
}

impl MediaFeature {
    /// Every recognized feature
    pub const ALL: [Self; 14] = [
        Self::Orientation,
        Self::Scan,
        Self::Width,
        Self::Height,
        Self::DeviceWidth,
        Self::DeviceHeight,
        Self::Resolution,
        Self::AspectRatio,
        Self::DeviceAspectRatio,
        Self::Grid,
        Self::Color,
        Self::ColorIndex,
        Self::Monochrome,
        Self::PrefersColorScheme,
    ];

    /// CSS spelling of the feature
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Orientation => "orientation",
            Self::Scan => "scan",
            Self::Width => "width",
            Self::Height => "height",
            Self::DeviceWidth => "device-width",
            Self::DeviceHeight => "device-height",
            Self::Resolution => "resolution",
            Self::AspectRatio => "aspect-ratio",
            Self::DeviceAspectRatio => "device-aspect-ratio",
            Self::Grid => "grid",
            Self::Color => "color",
            Self::ColorIndex => "color-index",
            Self::Monochrome => "monochrome",
            Self::PrefersColorScheme => "prefers-color-scheme",
        }
    }

    /// Look up a feature by its CSS spelling (case-insensitive)
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|feature| feature.name().eq_ignore_ascii_case(name.trim()))
    }

    /// Value comparison class of this feature
    #[must_use]
    pub const fn kind(self) -> FeatureKind {
        match self {
            Self::Orientation | Self::Scan | Self::PrefersColorScheme => FeatureKind::Keyword,
            Self::Width | Self::Height | Self::DeviceWidth | Self::DeviceHeight => {
                FeatureKind::Length
            }
            Self::Resolution => FeatureKind::Resolution,
            Self::AspectRatio | Self::DeviceAspectRatio => FeatureKind::Ratio,
            Self::Grid | Self::Color | Self::ColorIndex | Self::Monochrome => FeatureKind::Integer,
        }
    }
}

impl fmt::Display for MediaFeature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A described feature value: a bare number or a CSS text value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MediaValue {
    /// Unitless number (lengths are taken as px)
    Number(f64),
    /// Text value such as `"320px"`, `"16/9"` or `"dark"`
    Text(String),
}

impl MediaValue {
    /// Text form of the value as it would appear in CSS
    #[must_use]
    pub fn as_css(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for MediaValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => write!(f, "{}", *n as i64),
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for MediaValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for MediaValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<f64> for MediaValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<u32> for MediaValue {
    fn from(value: u32) -> Self {
        Self::Number(f64::from(value))
    }
}

/// Snapshot of the simulated viewport
///
/// Replaced wholesale by [`crate::MatchMediaMock::set`]; fields absent from a
/// new description are absent, never inherited from the previous one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ViewportDescription {
    /// Media type (`screen`, `print`, ...); evaluators treat `None` as `screen`
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    media_type: Option<String>,
    #[serde(flatten)]
    features: BTreeMap<MediaFeature, MediaValue>,
}

impl ViewportDescription {
    /// Create an empty description
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a feature value
    #[must_use]
    pub fn with(mut self, feature: MediaFeature, value: impl Into<MediaValue>) -> Self {
        self.insert(feature, value);
        self
    }

    /// Set the media type
    #[must_use]
    pub fn with_media_type(mut self, media_type: impl Into<String>) -> Self {
        self.media_type = Some(media_type.into());
        self
    }

    /// Set `width`
    #[must_use]
    pub fn width(self, value: impl Into<MediaValue>) -> Self {
        self.with(MediaFeature::Width, value)
    }

    /// Set `height`
    #[must_use]
    pub fn height(self, value: impl Into<MediaValue>) -> Self {
        self.with(MediaFeature::Height, value)
    }

    /// Set `orientation`
    #[must_use]
    pub fn orientation(self, value: impl Into<MediaValue>) -> Self {
        self.with(MediaFeature::Orientation, value)
    }

    /// Set `prefers-color-scheme`
    #[must_use]
    pub fn prefers_color_scheme(self, value: impl Into<MediaValue>) -> Self {
        self.with(MediaFeature::PrefersColorScheme, value)
    }

    /// Insert or replace a feature value in place
    pub fn insert(&mut self, feature: MediaFeature, value: impl Into<MediaValue>) {
        let _ = self.features.insert(feature, value.into());
    }

    /// Remove a feature, returning its previous value
    pub fn remove(&mut self, feature: MediaFeature) -> Option<MediaValue> {
        self.features.remove(&feature)
    }

    /// Get a feature value
    #[must_use]
    pub fn get(&self, feature: MediaFeature) -> Option<&MediaValue> {
        self.features.get(&feature)
    }

    /// Media type, if described
    #[must_use]
    pub fn media_type(&self) -> Option<&str> {
        self.media_type.as_deref()
    }

    /// Iterate described features in a stable order
    pub fn features(&self) -> impl Iterator<Item = (MediaFeature, &MediaValue)> {
        self.features.iter().map(|(feature, value)| (*feature, value))
    }

    /// Number of described features
    #[must_use]
    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// True when no feature and no media type is described
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.features.is_empty() && self.media_type.is_none()
    }

    /// Parse a `feature=value` assignment (as accepted on the command line)
    pub fn parse_assignment(&mut self, assignment: &str) -> MediaMockResult<()> {
        let (key, value) = assignment.split_once('=').ok_or_else(|| {
            MediaMockError::config(format!("expected feature=value, got '{assignment}'"))
        })?;
        let key = key.trim();
        let value = value.trim();
        if key.eq_ignore_ascii_case("type") {
            self.media_type = Some(value.to_string());
            return Ok(());
        }
        let feature = MediaFeature::from_name(key)
            .ok_or_else(|| MediaMockError::config(format!("unknown media feature '{key}'")))?;
        self.insert(feature, value);
        Ok(())
    }

    /// Parse a description from YAML
    pub fn from_yaml_str(yaml: &str) -> MediaMockResult<Self> {
        Ok(serde_yaml_ng::from_str(yaml)?)
    }

    /// Parse a description from JSON
    pub fn from_json_str(json: &str) -> MediaMockResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a description from a `.yaml`, `.yml` or `.json` file
    pub fn load(path: impl AsRef<Path>) -> MediaMockResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml" | "yml") => Self::from_yaml_str(&content),
            Some("json") => Self::from_json_str(&content),
            _ => Err(MediaMockError::config(format!(
                "unsupported viewport file '{}': expected .yaml, .yml or .json",
                path.display()
            ))),
        }
    }

    /// Serialize to YAML
    pub fn to_yaml(&self) -> MediaMockResult<String> {
        Ok(serde_yaml_ng::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_feature_names_round_trip() {
        for feature in MediaFeature::ALL {
            assert_eq!(MediaFeature::from_name(feature.name()), Some(feature));
        }
        assert_eq!(
            MediaFeature::from_name(" Prefers-Color-Scheme "),
            Some(MediaFeature::PrefersColorScheme)
        );
        assert_eq!(MediaFeature::from_name("hover"), None);
    }

    #[test]
    fn test_feature_kinds() {
        assert_eq!(MediaFeature::Width.kind(), FeatureKind::Length);
        assert_eq!(MediaFeature::Orientation.kind(), FeatureKind::Keyword);
        assert_eq!(MediaFeature::AspectRatio.kind(), FeatureKind::Ratio);
        assert_eq!(MediaFeature::Resolution.kind(), FeatureKind::Resolution);
        assert_eq!(MediaFeature::ColorIndex.kind(), FeatureKind::Integer);
    }

    #[test]
    fn test_builder() {
        let viewport = ViewportDescription::new()
            .width("320px")
            .height(640_u32)
            .orientation("portrait")
            .with_media_type("screen");

        assert_eq!(viewport.len(), 3);
        assert_eq!(viewport.media_type(), Some("screen"));
        assert_eq!(
            viewport.get(MediaFeature::Width),
            Some(&MediaValue::Text("320px".to_string()))
        );
        assert_eq!(viewport.get(MediaFeature::Height), Some(&MediaValue::Number(640.0)));
        assert!(viewport.get(MediaFeature::Color).is_none());
    }

    #[test]
    fn test_empty_and_remove() {
        let mut viewport = ViewportDescription::new();
        assert!(viewport.is_empty());

        viewport.insert(MediaFeature::Grid, 0_u32);
        assert!(!viewport.is_empty());
        assert_eq!(viewport.remove(MediaFeature::Grid), Some(MediaValue::Number(0.0)));
        assert!(viewport.is_empty());
    }

    #[test]
    fn test_value_display() {
        assert_eq!(MediaValue::Number(320.0).to_string(), "320");
        assert_eq!(MediaValue::Number(1.5).to_string(), "1.5");
        assert_eq!(MediaValue::from("16/9").as_css(), "16/9");
    }

    #[test]
    fn test_parse_assignment() {
        let mut viewport = ViewportDescription::new();
        viewport.parse_assignment("width=1024px").unwrap();
        viewport.parse_assignment("type = print").unwrap();

        assert_eq!(viewport.get(MediaFeature::Width), Some(&MediaValue::from("1024px")));
        assert_eq!(viewport.media_type(), Some("print"));

        assert!(matches!(
            viewport.parse_assignment("width"),
            Err(MediaMockError::Config { .. })
        ));
        assert!(matches!(
            viewport.parse_assignment("hover=none"),
            Err(MediaMockError::Config { .. })
        ));
    }

    #[test]
    fn test_from_yaml() {
        let yaml = "type: screen\nwidth: 320px\ncolor: 8\nprefers-color-scheme: dark\n";
        let viewport = ViewportDescription::from_yaml_str(yaml).unwrap();

        assert_eq!(viewport.media_type(), Some("screen"));
        assert_eq!(viewport.get(MediaFeature::Width), Some(&MediaValue::from("320px")));
        assert_eq!(viewport.get(MediaFeature::Color), Some(&MediaValue::Number(8.0)));
        assert_eq!(
            viewport.get(MediaFeature::PrefersColorScheme),
            Some(&MediaValue::from("dark"))
        );
    }

    #[test]
    fn test_from_json() {
        let viewport =
            ViewportDescription::from_json_str(r#"{"width": 1440, "orientation": "landscape"}"#)
                .unwrap();
        assert_eq!(viewport.get(MediaFeature::Width), Some(&MediaValue::Number(1440.0)));
        assert_eq!(
            viewport.get(MediaFeature::Orientation),
            Some(&MediaValue::from("landscape"))
        );
    }

    #[test]
    fn test_unknown_key_rejected() {
        let result = ViewportDescription::from_yaml_str("width: 320px\nhover: none\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_load_by_extension() {
        let dir = tempfile::tempdir().unwrap();

        let yaml_path = dir.path().join("mobile.yaml");
        let mut file = fs::File::create(&yaml_path).unwrap();
        writeln!(file, "width: 375px\norientation: portrait").unwrap();
        let viewport = ViewportDescription::load(&yaml_path).unwrap();
        assert_eq!(viewport.len(), 2);

        let json_path = dir.path().join("desktop.json");
        fs::write(&json_path, r#"{"width": "1920px"}"#).unwrap();
        let viewport = ViewportDescription::load(&json_path).unwrap();
        assert_eq!(viewport.get(MediaFeature::Width), Some(&MediaValue::from("1920px")));

        let txt_path = dir.path().join("viewport.txt");
        fs::write(&txt_path, "width: 1px").unwrap();
        assert!(matches!(
            ViewportDescription::load(&txt_path),
            Err(MediaMockError::Config { .. })
        ));

        assert!(matches!(
            ViewportDescription::load(dir.path().join("missing.yaml")),
            Err(MediaMockError::Io(_))
        ));
    }

    #[test]
    fn test_yaml_round_trip_preserves_description() {
        let viewport = ViewportDescription::new()
            .width("768px")
            .prefers_color_scheme("light")
            .with_media_type("screen");
        let yaml = viewport.to_yaml().unwrap();
        assert_eq!(ViewportDescription::from_yaml_str(&yaml).unwrap(), viewport);
    }
}
