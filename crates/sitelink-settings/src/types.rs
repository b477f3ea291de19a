//! Settings type definitions with compiled defaults.
//!
//! The JSON field names are camelCase to match `~/.sitelink/settings.json`.

use serde::{Deserialize, Serialize};

/// Root settings object.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SitelinkSettings {
    /// Settings schema version.
    pub version: String,
    /// Product name, used in log output.
    pub name: String,
    /// Sync engine tunables.
    pub sync: SyncSettings,
    /// Transport adapter tunables.
    pub transport: TransportSettings,
    /// Offline queue tunables.
    pub queue: QueueSettings,
    /// Logging tunables.
    pub logging: LoggingSettings,
}

impl Default for SitelinkSettings {
    fn default() -> Self {
        Self {
            version: "0.1.0".into(),
            name: "sitelink".into(),
            sync: SyncSettings::default(),
            transport: TransportSettings::default(),
            queue: QueueSettings::default(),
            logging: LoggingSettings::default(),
        }
    }
}

/// Sync engine tunables: probe cadence, drain policy, feed bounds.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SyncSettings {
    /// Connectivity probe interval in seconds.
    pub connectivity_probe_secs: u64,
    /// Session validity probe interval in seconds.
    pub session_probe_secs: u64,
    /// Safety-net drain interval in seconds.
    pub drain_interval_secs: u64,
    /// Maximum offline queue entries delivered per drain pass.
    pub drain_batch: usize,
    /// Live feed ring buffer capacity per dashboard.
    pub feed_capacity: usize,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            connectivity_probe_secs: 30,
            session_probe_secs: 60,
            drain_interval_secs: 300,
            drain_batch: 50,
            feed_capacity: 50,
        }
    }
}

/// Transport adapter tunables.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TransportSettings {
    /// WebSocket endpoint of the remote sync service.
    pub ws_url: String,
    /// Connection establishment timeout in milliseconds.
    pub connect_timeout_ms: u64,
}

impl Default for TransportSettings {
    fn default() -> Self {
        Self {
            ws_url: "wss://sync.sitelink.app/v1/stream".into(),
            connect_timeout_ms: 10_000,
        }
    }
}

/// Offline queue tunables.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QueueSettings {
    /// Path to the durable queue database. Empty means
    /// `~/.sitelink/queue.db`, resolved at open time.
    pub db_path: String,
}

impl Default for QueueSettings {
    fn default() -> Self {
        Self {
            db_path: String::new(),
        }
    }
}

impl QueueSettings {
    /// Resolve the effective database path.
    #[must_use]
    pub fn resolved_db_path(&self) -> std::path::PathBuf {
        if self.db_path.is_empty() {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            std::path::PathBuf::from(home)
                .join(".sitelink")
                .join("queue.db")
        } else {
            std::path::PathBuf::from(&self.db_path)
        }
    }
}

/// Logging tunables.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoggingSettings {
    /// Default log level directive (overridden by `RUST_LOG`).
    pub level: String,
    /// Emit JSON-formatted log lines instead of pretty text.
    pub json: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".into(),
            json: false,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
