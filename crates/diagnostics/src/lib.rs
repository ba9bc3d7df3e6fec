// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Structured event logging for the sansthan-seo tools.
//!
//! Every record is written to stderr as a single JSON object:
//!
//! ```text
//! {"timestamp":"2026-02-15T10:00:00.000Z","level":"INFO","event":"sitemap-verify-start", ...}
//! ```
//!
//! Usage:
//! - Set SEO_LOG=info (default) - start/summary/success events
//! - Set SEO_LOG=debug - per-file diagnostics
//! - Set SEO_LOG=warn / error / off - quieter runs

use std::collections::BTreeSet;
use std::io::Write;
use std::sync::Once;

use chrono::{SecondsFormat, Utc};
use serde_json::{Map, Value};

// Re-exported so the event macros resolve from any crate.
pub use log::{Level, LevelFilter};
pub use serde_json;

/// Log target used for records that are already rendered JSON events.
pub const EVENT_TARGET: &str = "seo-event";

/// Environment variable controlling the minimum level.
pub const LOG_ENV: &str = "SEO_LOG";

static INIT: Once = Once::new();

/// Initialize the logger from `SEO_LOG`.
///
/// Safe to call multiple times; only the first call installs the logger.
pub fn init_diagnostics() {
    INIT.call_once(|| {
        let requested = std::env::var(LOG_ENV).unwrap_or_else(|_| "info".to_string());
        let parsed = parse_level(&requested);

        let mut builder = env_logger::Builder::new();
        _ = builder
            .filter_level(parsed.unwrap_or(LevelFilter::Info))
            .target(env_logger::Target::Stderr)
            .format(|buf, record| writeln!(buf, "{}", render_record(record)))
            .try_init();

        if parsed.is_none() {
            emit_event(
                Level::Warn,
                "diagnostics-unknown-level",
                serde_json::json!({ "requested": requested, "using": "info" }),
            );
        }
    });
}

/// Re-export the init function for convenience
pub use init_diagnostics as init;

fn parse_level(value: &str) -> Option<LevelFilter> {
    match value.trim().to_ascii_lowercase().as_str() {
        "off" => Some(LevelFilter::Off),
        "error" => Some(LevelFilter::Error),
        "warn" => Some(LevelFilter::Warn),
        "info" => Some(LevelFilter::Info),
        "debug" => Some(LevelFilter::Debug),
        "trace" => Some(LevelFilter::Trace),
        _ => None,
    }
}

fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn render_record(record: &log::Record<'_>) -> String {
    if record.target() == EVENT_TARGET {
        return record.args().to_string();
    }
    serde_json::json!({
        "timestamp": now_timestamp(),
        "level": record.level().as_str(),
        "event": "log",
        "target": record.target(),
        "message": record.args().to_string(),
    })
    .to_string()
}

/// Build one event line. Object fields are flattened next to `event`;
/// any other value is nested under `"fields"`.
pub fn event_line(level: Level, event: &str, fields: Value, timestamp: &str) -> String {
    let mut object = Map::new();
    _ = object.insert("timestamp".into(), Value::String(timestamp.to_string()));
    _ = object.insert("level".into(), Value::String(level.as_str().to_string()));
    _ = object.insert("event".into(), Value::String(event.to_string()));
    match fields {
        Value::Object(map) => {
            for (key, value) in map {
                if !object.contains_key(&key) {
                    _ = object.insert(key, value);
                }
            }
        }
        Value::Null => {}
        other => {
            _ = object.insert("fields".into(), other);
        }
    }
    Value::Object(object).to_string()
}

/// Emit a named structured event at `level`.
pub fn emit_event(level: Level, event: &str, fields: Value) {
    if !log::log_enabled!(target: EVENT_TARGET, level) {
        return;
    }
    let line = event_line(level, event, fields, &now_timestamp());
    log::log!(target: EVENT_TARGET, level, "{line}");
}

/// Emit an info-level event: `info_event!("name", { "key": value })`
#[macro_export]
macro_rules! info_event {
    ($event:expr) => {
        $crate::emit_event($crate::Level::Info, $event, $crate::serde_json::Value::Null)
    };
    ($event:expr, { $($fields:tt)* }) => {
        $crate::emit_event($crate::Level::Info, $event, $crate::serde_json::json!({ $($fields)* }))
    };
}

/// Emit a debug-level event.
#[macro_export]
macro_rules! debug_event {
    ($event:expr) => {
        $crate::emit_event($crate::Level::Debug, $event, $crate::serde_json::Value::Null)
    };
    ($event:expr, { $($fields:tt)* }) => {
        $crate::emit_event($crate::Level::Debug, $event, $crate::serde_json::json!({ $($fields)* }))
    };
}

/// Emit a warn-level event.
#[macro_export]
macro_rules! warn_event {
    ($event:expr) => {
        $crate::emit_event($crate::Level::Warn, $event, $crate::serde_json::Value::Null)
    };
    ($event:expr, { $($fields:tt)* }) => {
        $crate::emit_event($crate::Level::Warn, $event, $crate::serde_json::json!({ $($fields)* }))
    };
}

/// Emit an error-level event.
#[macro_export]
macro_rules! error_event {
    ($event:expr) => {
        $crate::emit_event($crate::Level::Error, $event, $crate::serde_json::Value::Null)
    };
    ($event:expr, { $($fields:tt)* }) => {
        $crate::emit_event($crate::Level::Error, $event, $crate::serde_json::json!({ $($fields)* }))
    };
}

/// Remembers which warnings were already emitted during one run.
///
/// Owned by whoever produces the warnings (the post inventory, the site URL
/// resolver) and passed by `&mut`, so two independent runs in one process
/// never share state.
#[derive(Debug, Default)]
pub struct WarnOnce {
    emitted: BTreeSet<String>,
}

impl WarnOnce {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true the first time `key` is seen.
    pub fn first(&mut self, key: &str) -> bool {
        self.emitted.insert(key.to_string())
    }

    /// Emit a warn-level event unless `key` was already reported.
    pub fn warn(&mut self, key: &str, event: &str, fields: Value) -> bool {
        if !self.first(key) {
            return false;
        }
        emit_event(Level::Warn, event, fields);
        true
    }

    pub fn len(&self) -> usize {
        self.emitted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.emitted.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_is_safe_to_call_multiple_times() {
        init_diagnostics();
        init_diagnostics();
        init();
    }

    #[test]
    fn test_macros_compile() {
        info_event!("test-start");
        debug_event!("test-debug", { "value": 42 });
        warn_event!("test-warning", { "file": "a.md", "warnings": ["thin"] });
        error_event!("test-error", { "reason": "boom" });
    }

    #[test]
    fn test_event_line_flattens_object_fields() {
        let line = event_line(
            Level::Info,
            "sitemap-verify-success",
            serde_json::json!({ "urlCount": 12, "event": "ignored" }),
            "2026-02-15T00:00:00.000Z",
        );
        let parsed: Value = serde_json::from_str(&line).unwrap();
        assert_eq!(parsed["event"], "sitemap-verify-success");
        assert_eq!(parsed["level"], "INFO");
        assert_eq!(parsed["urlCount"], 12);
        assert_eq!(parsed["timestamp"], "2026-02-15T00:00:00.000Z");
    }

    #[test]
    fn test_event_line_nests_non_object_fields() {
        let line = event_line(Level::Error, "x", serde_json::json!(["a"]), "t");
        let parsed: Value = serde_json::from_str(&line).unwrap();
        assert_eq!(parsed["fields"][0], "a");
    }

    #[test]
    fn test_warn_once_reports_each_key_once() {
        let mut once = WarnOnce::new();
        assert!(once.warn("fallback", "site-url-fallback", Value::Null));
        assert!(!once.warn("fallback", "site-url-fallback", Value::Null));
        assert!(once.first("other"));
        assert_eq!(once.len(), 2);

        let fresh = WarnOnce::new();
        assert!(fresh.is_empty());
    }

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("DEBUG"), Some(LevelFilter::Debug));
        assert_eq!(parse_level("off"), Some(LevelFilter::Off));
        assert_eq!(parse_level("loud"), None);
    }
}
