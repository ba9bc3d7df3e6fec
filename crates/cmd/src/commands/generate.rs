// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use std::path::PathBuf;

use anyhow::Result;
use cluster::{GenerationSummary, Generator, validate_config};

use crate::common::SeoContext;
use crate::error_utils::ErrorContext;

/// Event prefix for generator failures.
pub const EVENT_PREFIX: &str = "seo-blog-generator";

/// Regenerate the cluster under the resolved blog root.
pub fn generate_command(ctx: &SeoContext, blog_root: Option<PathBuf>) -> Result<GenerationSummary> {
    validate_config().with_context_msg("Cluster configuration is inconsistent")?;
    let blog_root = ctx.generator_root(blog_root)?;
    Generator::new(blog_root).run().generator_context("write")
}
