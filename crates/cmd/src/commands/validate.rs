// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use anyhow::Result;
use verify::Report;
use verify::content::{strict_requested, validate_content};

use crate::common::SeoContext;
use crate::error_utils::ErrorContext;

pub use verify::content::EVENT_PREFIX;

/// Validate every post under the blog root. `strict` is also switched on
/// by `BLOG_VALIDATE_STRICT_WARNINGS`.
pub fn validate_content_command(ctx: &SeoContext, strict: bool) -> Result<Report> {
    let ws = ctx.workspace()?;
    let strict = strict_requested(strict, |name| std::env::var(name).ok());
    let report = validate_content(&ws, strict).verify_context("Content")?;
    report.log();
    Ok(report)
}
