//! Page rotation configuration
//!
//! This module re-exports the raw config types from carousel-types, adds
//! loading for them, and sanitizes them into the immutable [`Settings`]
//! the scheduler runs on.

mod error;
mod settings;

pub use carousel_types::{PageBounds, PagesConfig, TimingsConfig, WidgetConfig};
pub use error::ConfigError;
pub use settings::Settings;
pub(crate) use settings::clamp_millis;

use std::path::Path;
use tracing::warn;

const APP_NAME: &str = "carousel";
const CONFIG_NAME: &str = "config";

// ─────────────────────────────────────────────────────────────────────────────
// PagesConfig Extensions
// ─────────────────────────────────────────────────────────────────────────────

/// Extension trait for PagesConfig loading
pub trait PagesConfigExt: Sized {
    /// Load from the platform config location, falling back to defaults.
    fn load() -> Self;
    fn try_load() -> Result<Self, ConfigError>;
    /// Load a TOML file at an explicit path.
    fn load_from(path: &Path) -> Result<Self, ConfigError>;
    fn settings(&self) -> Settings;
}

impl PagesConfigExt for PagesConfig {
    fn load() -> Self {
        Self::try_load().unwrap_or_else(|err| {
            warn!(error = %err, "using default page configuration");
            Self::default()
        })
    }

    fn try_load() -> Result<Self, ConfigError> {
        Ok(confy::load(APP_NAME, CONFIG_NAME)?)
    }

    fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::ParseToml {
            path: path.to_path_buf(),
            source,
        })
    }

    fn settings(&self) -> Settings {
        Settings::from_config(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn temp_file(name: &str, content: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("carousel-{}-{name}", std::process::id()));
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn load_from_reads_toml() {
        let path = temp_file(
            "valid.toml",
            r#"
            pages = [["clock"], ["news"]]
            home_page = 1
            [timings]
            default = 5000
            "#,
        );
        let config = PagesConfig::load_from(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(config.pages.len(), 2);
        assert_eq!(config.home_page, 1);
        assert_eq!(config.timings.default, 5000);
    }

    #[test]
    fn load_from_missing_file_reports_path() {
        let path = std::env::temp_dir().join("carousel-definitely-missing.toml");
        let err = PagesConfig::load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::ReadFile { .. }));
        assert!(err.to_string().contains("carousel-definitely-missing.toml"));
    }

    #[test]
    fn load_from_rejects_malformed_toml() {
        let path = temp_file("broken.toml", "pages = [[\"clock\"");
        let err = PagesConfig::load_from(&path).unwrap_err();
        std::fs::remove_file(&path).ok();
        assert!(matches!(err, ConfigError::ParseToml { .. }));
    }
}
