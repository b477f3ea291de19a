//! Settings loading with deep merge and environment variable overrides.
//!
//! Loading flow:
//! 1. Start with compiled [`SitelinkSettings::default()`]
//! 2. If `~/.sitelink/settings.json` exists, deep-merge user values over defaults
//! 3. Apply `SITELINK_*` environment variable overrides (highest priority)
//!
//! Deep merge rules:
//! - Objects are merged recursively (source overrides target per-key)
//! - Arrays and primitives are replaced entirely by source
//! - Null values in source are skipped (preserving target)

use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::debug;

use crate::errors::Result;
use crate::types::SitelinkSettings;

/// Resolve the path to the settings file (`~/.sitelink/settings.json`).
pub fn settings_path() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
    PathBuf::from(home).join(".sitelink").join("settings.json")
}

/// Load settings from the default path with env var overrides.
pub fn load_settings() -> Result<SitelinkSettings> {
    load_settings_from_path(&settings_path())
}

/// Load settings from a specific path with env var overrides.
///
/// If the file does not exist, returns defaults. If the file contains
/// invalid JSON, returns an error.
pub fn load_settings_from_path(path: &Path) -> Result<SitelinkSettings> {
    let defaults = serde_json::to_value(SitelinkSettings::default())?;

    let merged = if path.exists() {
        debug!(?path, "loading settings from file");
        let content = std::fs::read_to_string(path)?;
        let user: Value = serde_json::from_str(&content)?;
        deep_merge(defaults, user)
    } else {
        debug!(?path, "settings file not found, using defaults");
        defaults
    };

    let mut settings: SitelinkSettings = serde_json::from_value(merged)?;
    apply_env_overrides(&mut settings);
    Ok(settings)
}

/// Recursive deep merge of two JSON values.
///
/// - Objects are merged recursively (source overrides target per-key)
/// - Arrays and primitives are replaced entirely by source
/// - Null values in source are skipped (preserving target)
pub fn deep_merge(target: Value, source: Value) -> Value {
    match (target, source) {
        (Value::Object(mut target_map), Value::Object(source_map)) => {
            for (key, source_val) in source_map {
                if source_val.is_null() {
                    continue;
                }
                let merged = if let Some(target_val) = target_map.remove(&key) {
                    deep_merge(target_val, source_val)
                } else {
                    source_val
                };
                let _ = target_map.insert(key, merged);
            }
            Value::Object(target_map)
        }
        (_, source) => source,
    }
}

/// Apply environment variable overrides to loaded settings.
///
/// Each env var has strict parsing rules; invalid values are ignored with
/// a warning, falling back to the file/default value.
pub fn apply_env_overrides(settings: &mut SitelinkSettings) {
    // ── Sync settings ───────────────────────────────────────────────
    if let Some(v) = read_env_u64("SITELINK_CONNECTIVITY_PROBE_SECS", 1, 3600) {
        settings.sync.connectivity_probe_secs = v;
    }
    if let Some(v) = read_env_u64("SITELINK_SESSION_PROBE_SECS", 1, 3600) {
        settings.sync.session_probe_secs = v;
    }
    if let Some(v) = read_env_u64("SITELINK_DRAIN_INTERVAL_SECS", 1, 86_400) {
        settings.sync.drain_interval_secs = v;
    }
    if let Some(v) = read_env_usize("SITELINK_DRAIN_BATCH", 1, 10_000) {
        settings.sync.drain_batch = v;
    }
    if let Some(v) = read_env_usize("SITELINK_FEED_CAPACITY", 1, 10_000) {
        settings.sync.feed_capacity = v;
    }

    // ── Transport settings ──────────────────────────────────────────
    if let Some(v) = read_env_string("SITELINK_WS_URL") {
        settings.transport.ws_url = v;
    }
    if let Some(v) = read_env_u64("SITELINK_CONNECT_TIMEOUT_MS", 100, 600_000) {
        settings.transport.connect_timeout_ms = v;
    }

    // ── Queue settings ──────────────────────────────────────────────
    if let Some(v) = read_env_string("SITELINK_QUEUE_DB") {
        settings.queue.db_path = v;
    }

    // ── Logging settings ────────────────────────────────────────────
    if let Some(v) = read_env_string("SITELINK_LOG_LEVEL") {
        settings.logging.level = v;
    }
    if let Some(v) = read_env_bool("SITELINK_LOG_JSON") {
        settings.logging.json = v;
    }
}

// ── Pure parsing functions (testable without env vars) ──────────────────────

/// Parse a string as a boolean.
///
/// Accepts (case-insensitive): `true`/`1`/`yes`/`on` or `false`/`0`/`no`/`off`.
pub fn parse_bool(val: &str) -> Option<bool> {
    match val.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Parse a string as a `u64` within a range.
pub fn parse_u64_range(val: &str, min: u64, max: u64) -> Option<u64> {
    let n: u64 = val.parse().ok()?;
    (n >= min && n <= max).then_some(n)
}

/// Parse a string as a `usize` within a range.
pub fn parse_usize_range(val: &str, min: usize, max: usize) -> Option<usize> {
    let n: usize = val.parse().ok()?;
    (n >= min && n <= max).then_some(n)
}

// ── Env var readers (thin wrappers) ─────────────────────────────────────────

fn read_env_string(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

fn read_env_bool(name: &str) -> Option<bool> {
    let val = std::env::var(name).ok()?;
    let result = parse_bool(&val);
    if result.is_none() {
        tracing::warn!(key = name, value = %val, "invalid boolean env var, ignoring");
    }
    result
}

fn read_env_u64(name: &str, min: u64, max: u64) -> Option<u64> {
    let val = std::env::var(name).ok()?;
    let result = parse_u64_range(&val, min, max);
    if result.is_none() {
        tracing::warn!(key = name, value = %val, "invalid u64 env var, ignoring");
    }
    result
}

fn read_env_usize(name: &str, min: usize, max: usize) -> Option<usize> {
    let val = std::env::var(name).ok()?;
    let result = parse_usize_range(&val, min, max);
    if result.is_none() {
        tracing::warn!(key = name, value = %val, "invalid usize env var, ignoring");
    }
    result
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
