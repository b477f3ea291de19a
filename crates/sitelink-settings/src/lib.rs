//! # sitelink-settings
//!
//! Configuration management with layered sources for the Sitelink sync engine.
//!
//! Settings are loaded from three layers (in priority order):
//! 1. **Compiled defaults** — [`SitelinkSettings::default()`]
//! 2. **User file** — `~/.sitelink/settings.json` (deep-merged over defaults)
//! 3. **Environment variables** — `SITELINK_*` overrides (highest priority)

#![deny(unsafe_code)]

pub mod errors;
pub mod loader;
pub mod types;

pub use errors::{Result, SettingsError};
pub use loader::{deep_merge, load_settings, load_settings_from_path, settings_path};
pub use types::{
    LoggingSettings, QueueSettings, SitelinkSettings, SyncSettings, TransportSettings,
};

use std::sync::OnceLock;

/// Global settings singleton.
///
/// Initialized on first access via [`get_settings`]. The settings are loaded
/// from `~/.sitelink/settings.json` with env var overrides, or fall back to
/// compiled defaults if loading fails.
static SETTINGS: OnceLock<SitelinkSettings> = OnceLock::new();

/// Get the global settings instance.
///
/// On first call, loads settings from `~/.sitelink/settings.json` with env
/// var overrides. On subsequent calls, returns the cached value. If loading
/// fails, returns compiled defaults.
pub fn get_settings() -> &'static SitelinkSettings {
    SETTINGS.get_or_init(|| load_settings().unwrap_or_default())
}

/// Initialize the global settings with a specific value.
///
/// # Errors
///
/// Returns the provided settings back if the global was already initialized.
#[allow(clippy::result_large_err)]
pub fn init_settings(settings: SitelinkSettings) -> std::result::Result<(), SitelinkSettings> {
    SETTINGS.set(settings)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn re_exports_work() {
        let _settings = SitelinkSettings::default();
        let _path = settings_path();
    }

    #[test]
    fn deep_merge_re_exported() {
        let a = serde_json::json!({"x": 1});
        let b = serde_json::json!({"y": 2});
        let merged = deep_merge(a, b);
        assert_eq!(merged["x"], 1);
        assert_eq!(merged["y"], 2);
    }

    #[test]
    fn default_settings_are_valid() {
        let settings = SitelinkSettings::default();
        assert_eq!(settings.name, "sitelink");
        assert_eq!(settings.sync.connectivity_probe_secs, 30);
        assert_eq!(settings.sync.session_probe_secs, 60);
        assert_eq!(settings.sync.drain_batch, 50);
        assert_eq!(settings.sync.feed_capacity, 50);
    }
}
