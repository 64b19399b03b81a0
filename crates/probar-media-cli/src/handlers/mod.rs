//! Command handlers - extracted from main.rs for testability
//!
//! Each handler builds a serializable report; rendering lives in
//! [`crate::output`].

pub mod devices;
pub mod eval;
pub mod transition;

pub use devices::{execute_devices, DeviceRow, DevicesReport};
pub use eval::{execute_eval, EvalReport, QueryResult};
pub use transition::{execute_transition, Notification, QueryTransition, TransitionReport};

use crate::error::{CliError, CliResult};
use jugar_probar_media::{DeviceCatalog, ViewportDescription};
use std::path::Path;

/// Resolve a viewport source: an existing description file, else a device preset
pub fn resolve_viewport(source: &str, catalog: &DeviceCatalog) -> CliResult<ViewportDescription> {
    let path = Path::new(source);
    if path.is_file() {
        return Ok(ViewportDescription::load(path)?);
    }
    if let Some(preset) = catalog.get(source) {
        return Ok(preset.viewport());
    }
    if looks_like_file(path) {
        return Err(CliError::config(format!(
            "viewport file '{source}' does not exist"
        )));
    }
    Err(CliError::invalid_argument(format!(
        "'{source}' is neither a viewport file nor a known device (see `probador-media devices`)"
    )))
}

fn looks_like_file(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|ext| ext.to_str()),
        Some("yaml" | "yml" | "json")
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use jugar_probar_media::MediaFeature;
    use std::fs;

    #[test]
    fn test_resolve_device_name() {
        let viewport = resolve_viewport("iphone-14", &DeviceCatalog::new()).unwrap();
        assert_eq!(
            viewport.get(MediaFeature::Width).unwrap().as_css(),
            "390px"
        );
    }

    #[test]
    fn test_resolve_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tablet.yaml");
        fs::write(&path, "width: 800px\norientation: landscape\n").unwrap();

        let viewport = resolve_viewport(path.to_str().unwrap(), &DeviceCatalog::new()).unwrap();
        assert_eq!(viewport.len(), 2);
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let err = resolve_viewport("nowhere/desktop.yaml", &DeviceCatalog::new()).unwrap_err();
        assert!(matches!(err, CliError::Config { .. }));
    }

    #[test]
    fn test_unknown_source() {
        let err = resolve_viewport("Nokia 3310", &DeviceCatalog::new()).unwrap_err();
        assert!(matches!(err, CliError::InvalidArgument { .. }));
        assert!(err.to_string().contains("Nokia 3310"));
    }
}
