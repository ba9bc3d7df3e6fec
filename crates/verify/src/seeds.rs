// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Hand-written anchor posts that generated posts link to.

use std::collections::BTreeSet;

use cluster::config::MANUAL_SEED_POST_PATHS;
use corpus::links::{LinkShape, extract_internal_links};
use corpus::parse_document;
use diagnostics::info_event;
use serde_json::Value;

use crate::manifest::normalize_entry;
use crate::workspace::read_optional;
use crate::{Finding, Report, VerifyError, Workspace};

pub fn verify_manual_seeds(ws: &Workspace) -> Result<Report, VerifyError> {
    info_event!("manual-seed-verify-start", {
        "blogRoot": ws.blog_root.display().to_string(),
        "manualSeedCount": MANUAL_SEED_POST_PATHS.len(),
    });
    let mut report = Report::new("manual-seed-verify");

    let manifest_path = ws.manifest_path();
    let Some(raw) = read_optional(&manifest_path)? else {
        report.fail(
            "manifest-exists",
            "Generated manifest is missing. Run the generator first.",
        );
        return Ok(report);
    };
    let manifest: Value = serde_json::from_str(&raw).map_err(|source| VerifyError::Json {
        path: manifest_path.clone(),
        source,
    })?;
    let generated: BTreeSet<String> = manifest
        .get("generatedFiles")
        .and_then(Value::as_array)
        .map(|entries| {
            entries
                .iter()
                .filter_map(Value::as_str)
                .map(normalize_entry)
                .collect()
        })
        .unwrap_or_default();

    let mut validated = 0usize;
    for seed in MANUAL_SEED_POST_PATHS {
        let seed = normalize_entry(seed);
        let Some(content) = read_optional(&ws.blog_root.join(&seed))? else {
            report.push(
                Finding::new("seed-file-exists", format!("Manual seed file does not exist: {seed}"))
                    .file(seed.clone()),
            );
            continue;
        };
        let fail = |check: &str, reason: String| Finding::new(check, reason).file(seed.clone());

        if generated.contains(&seed) {
            report.push(fail(
                "seed-not-generated",
                format!("Manual seed file is unexpectedly tracked in generated manifest: {seed}"),
            ));
        }

        let document = match parse_document(&content) {
            Ok(document) => document,
            Err(e) => {
                report.push(fail("seed-frontmatter", format!("Invalid frontmatter: {e}")));
                continue;
            }
        };
        let slug = document.frontmatter.slug().unwrap_or_default();
        let file_name = seed.rsplit('/').next().unwrap_or(&seed);
        let expected_slug = file_name.strip_suffix(".md").unwrap_or(file_name);
        if slug != expected_slug {
            report.push(fail(
                "seed-slug-match",
                format!("Manual seed \"{seed}\" slug \"{slug}\" does not match expected \"{expected_slug}\"."),
            ));
        }
        if document.frontmatter.category().is_none() {
            report.push(fail("seed-category", format!("Manual seed \"{seed}\" is missing category.")));
        }

        let shape = LinkShape::of(&extract_internal_links(&document.body));
        if shape.total < 3 {
            report.push(fail(
                "seed-internal-link-count",
                format!("Manual seed \"{seed}\" has only {} internal links.", shape.total),
            ));
        }
        if !shape.is_complete() {
            report.push(fail(
                "seed-internal-link-intent",
                format!("Manual seed \"{seed}\" must include /locations, /booking|/contact, and /blog links."),
            ));
        }
        validated += 1;
    }

    report.detail("validatedSeedCount", validated);
    Ok(report)
}
