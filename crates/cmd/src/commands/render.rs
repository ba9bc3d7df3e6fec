// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use std::path::Path;

use anyhow::Result;
use verify::{Artifacts, write_artifacts};

use crate::common::{SeoContext, resolve_under};
use crate::error_utils::ErrorContext;

/// Event prefix for renderer failures.
pub const EVENT_PREFIX: &str = "seo-artifacts";

/// Write the sitemap, robots and feed bodies for the corpus into `out_dir`.
pub fn render_command(ctx: &SeoContext, out_dir: &Path) -> Result<Artifacts> {
    let ws = ctx.workspace()?;
    let out_dir = resolve_under(&ctx.root, out_dir);
    write_artifacts(&ws.blog_root, &ws.site, &out_dir)
        .file_context("render SEO artifacts into", &out_dir.display().to_string())
}
