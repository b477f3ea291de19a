//! # sitelink-logging
//!
//! Structured logging with `tracing` for the Sitelink sync engine.
//!
//! Installs an [`EnvFilter`]-driven `tracing-subscriber` formatter. The
//! default directive comes from settings (`logging.level`); `RUST_LOG`
//! always wins when set. Output is pretty text by default, JSON when
//! `logging.json` is enabled.

#![deny(unsafe_code)]

use sitelink_settings::LoggingSettings;
use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber from logging settings.
///
/// Safe to call once per process; subsequent calls return `false` and
/// leave the existing subscriber in place (useful in tests, where a
/// subscriber may already be installed).
pub fn init_logging(settings: &LoggingSettings) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(settings.level.clone()));

    let result = if settings.json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .try_init()
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .try_init()
    };

    match result {
        Ok(()) => true,
        Err(_) => {
            tracing::debug!("tracing subscriber already installed");
            false
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_is_idempotent() {
        let settings = LoggingSettings::default();
        // First call may succeed or fail depending on test ordering across
        // the workspace; the second call must report already-installed.
        let _ = init_logging(&settings);
        assert!(!init_logging(&settings));
    }

    #[test]
    fn json_settings_accepted() {
        let settings = LoggingSettings {
            level: "debug".into(),
            json: true,
        };
        // Must not panic even when a subscriber is already installed.
        let _ = init_logging(&settings);
    }
}
