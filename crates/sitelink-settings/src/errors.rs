//! Error types for settings loading.

use thiserror::Error;

/// Errors that can occur while loading settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// Settings file could not be read.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Settings file contained invalid JSON or mismatched types.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias for settings results.
pub type Result<T> = std::result::Result<T, SettingsError>;

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_error_display() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err = SettingsError::Io(io);
        assert!(err.to_string().contains("io error"));
    }

    #[test]
    fn json_error_display() {
        let json = serde_json::from_str::<String>("nope").unwrap_err();
        let err: SettingsError = json.into();
        assert!(err.to_string().contains("json error"));
    }
}
