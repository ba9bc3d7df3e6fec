// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Batch findings for one verifier run.

use diagnostics::{Level, emit_event};
use serde::Serialize;
use serde_json::{Map, Value};

/// Findings beyond this many are counted but not logged one by one.
pub const MAX_LOGGED_FINDINGS: usize = 25;

/// One failed or suspicious check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    pub check: String,
    pub reason: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
}

impl Finding {
    pub fn new(check: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            check: check.into(),
            reason: reason.into(),
            file: None,
            slug: None,
        }
    }

    #[must_use]
    pub fn file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }

    #[must_use]
    pub fn slug(mut self, slug: impl Into<String>) -> Self {
        let slug = slug.into();
        if !slug.is_empty() {
            self.slug = Some(slug);
        }
        self
    }
}

/// Everything a verifier found, plus the numbers it wants in its summary.
///
/// A report with any failure means the process must exit non-zero.
#[derive(Debug, Clone)]
pub struct Report {
    event_prefix: &'static str,
    failures: Vec<Finding>,
    warnings: Vec<Finding>,
    details: Map<String, Value>,
}

impl Report {
    /// `event_prefix` names the log events, e.g. `sitemap-verify` gives
    /// `sitemap-verify-failure` and `sitemap-verify-summary`.
    pub fn new(event_prefix: &'static str) -> Self {
        Self {
            event_prefix,
            failures: Vec::new(),
            warnings: Vec::new(),
            details: Map::new(),
        }
    }

    pub fn event_prefix(&self) -> &'static str {
        self.event_prefix
    }

    pub fn fail(&mut self, check: impl Into<String>, reason: impl Into<String>) {
        self.failures.push(Finding::new(check, reason));
    }

    pub fn push(&mut self, finding: Finding) {
        self.failures.push(finding);
    }

    pub fn warn(&mut self, finding: Finding) {
        self.warnings.push(finding);
    }

    /// Record a summary value. Values that fail to serialize are dropped.
    pub fn detail(&mut self, key: &str, value: impl Serialize) {
        if let Ok(value) = serde_json::to_value(value) {
            _ = self.details.insert(key.to_string(), value);
        }
    }

    /// Strict mode: every warning becomes a failure.
    pub fn promote_warnings(&mut self) {
        self.failures.append(&mut self.warnings);
    }

    pub fn failures(&self) -> &[Finding] {
        &self.failures
    }

    pub fn warnings(&self) -> &[Finding] {
        &self.warnings
    }

    pub fn details(&self) -> &Map<String, Value> {
        &self.details
    }

    pub fn passed(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn has_failure(&self, check: &str) -> bool {
        self.failures.iter().any(|f| f.check == check)
    }

    pub fn has_warning(&self, check: &str) -> bool {
        self.warnings.iter().any(|f| f.check == check)
    }

    /// Emit the per-finding events and the final summary.
    pub fn log(&self) {
        let prefix = self.event_prefix;
        for warning in self.warnings.iter().take(MAX_LOGGED_FINDINGS) {
            emit_event(Level::Warn, &format!("{prefix}-warning"), finding_fields(warning));
        }
        for failure in self.failures.iter().take(MAX_LOGGED_FINDINGS) {
            emit_event(Level::Error, &format!("{prefix}-failure"), finding_fields(failure));
        }

        let mut summary = self.details.clone();
        let status = if self.passed() { "passed" } else { "failed" };
        _ = summary.insert("status".into(), Value::from(status));
        _ = summary.insert("failureCount".into(), Value::from(self.failures.len()));
        _ = summary.insert("warningCount".into(), Value::from(self.warnings.len()));
        let level = if self.passed() { Level::Info } else { Level::Error };
        emit_event(level, &format!("{prefix}-summary"), Value::Object(summary));
    }
}

fn finding_fields(finding: &Finding) -> Value {
    serde_json::to_value(finding).unwrap_or(Value::Null)
}
