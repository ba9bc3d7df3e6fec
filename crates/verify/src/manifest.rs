// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Generated-cluster manifest: structure, on-disk integrity and per-cluster
//! distribution.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use std::sync::LazyLock;

use cluster::config::{CLUSTER_TARGETS, MANIFEST_VERSION};
use cluster::{EXPECTED_GENERATED_TOTAL, config_fingerprint, sha256_hex};
use corpus::{markdown_files, parse_document};
use diagnostics::info_event;
use regex::Regex;
use serde_json::Value;

use crate::workspace::read_optional;
use crate::{Finding, Report, VerifyError, Workspace};

const SLUG_SEGMENT: &str = "[a-z0-9]+(?:-[a-z0-9]+)*";

/// `locations/<key>/<slug>.md`, `guides/<slug>.md`, ... and nothing else.
static ENTRY_PATH_POLICY: LazyLock<Regex> = LazyLock::new(|| {
    let alternatives: Vec<String> = CLUSTER_TARGETS
        .iter()
        .map(|target| format!("{}{SLUG_SEGMENT}\\.md", regex::escape(&target.namespace())))
        .collect();
    Regex::new(&format!("^(?:{})$", alternatives.join("|"))).expect("valid path policy regex")
});

static SHA256_HEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-fA-F0-9]{64}$").expect("valid checksum regex"));

pub fn normalize_entry(entry: &str) -> String {
    entry.trim().replace('\\', "/")
}

pub fn entry_follows_path_policy(entry: &str) -> bool {
    ENTRY_PATH_POLICY.is_match(entry)
}

/// Cluster key owning `entry`, by namespace prefix.
pub fn cluster_of(entry: &str) -> Option<&'static str> {
    CLUSTER_TARGETS
        .iter()
        .find(|target| entry.starts_with(&target.namespace()))
        .map(|target| target.key)
}

fn expected_category(entry: &str) -> Option<&'static str> {
    CLUSTER_TARGETS
        .iter()
        .find(|target| entry.starts_with(&target.namespace()))
        .map(|target| target.kind.category())
}

/// Parsed manifest JSON, or a failure recorded in `report`.
fn load_manifest(path: &Path, report: &mut Report) -> Result<Option<Value>, VerifyError> {
    let Some(raw) = read_optional(path)? else {
        report.fail(
            "manifest-exists",
            "Missing generated cluster manifest. Run the generator first.",
        );
        return Ok(None);
    };
    match serde_json::from_str(&raw) {
        Ok(value) => Ok(Some(value)),
        Err(e) => {
            report.fail("manifest-parse", format!("Unable to parse manifest JSON: {e}"));
            Ok(None)
        }
    }
}

pub fn verify_manifest(ws: &Workspace) -> Result<Report, VerifyError> {
    let manifest_path = ws.manifest_path();
    let fingerprint = config_fingerprint()?;
    info_event!("generator-manifest-verify-start", {
        "manifestPath": manifest_path.display().to_string(),
        "expectedConfigFingerprint": fingerprint,
    });

    let mut report = Report::new("generator-manifest-verify");
    let Some(parsed) = load_manifest(&manifest_path, &mut report)? else {
        return Ok(report);
    };

    let raw_entries: Vec<&Value> = parsed
        .get("generatedFiles")
        .and_then(Value::as_array)
        .map(|entries| entries.iter().collect())
        .unwrap_or_default();
    let normalized: Vec<String> = raw_entries
        .iter()
        .filter_map(|entry| entry.as_str())
        .map(normalize_entry)
        .filter(|entry| !entry.is_empty())
        .collect();
    let mut entries: Vec<String> = Vec::with_capacity(normalized.len());
    for entry in &normalized {
        if !entries.contains(entry) {
            entries.push(entry.clone());
        }
    }

    check_structure(&parsed, raw_entries.len(), &normalized, &entries, &fingerprint, &mut report);

    let checksums = parsed
        .get("generatedFileChecksums")
        .and_then(Value::as_object);
    if let Some(checksums) = checksums {
        check_checksum_keys(checksums, &entries, &mut report);
    } else {
        report.fail(
            "manifest-checksum-map",
            "Manifest is missing generatedFileChecksums map. Run the generator.",
        );
    }

    if entries.len() != EXPECTED_GENERATED_TOTAL {
        report.fail(
            "generated-total",
            format!(
                "Manifest entries count {} does not match expected {EXPECTED_GENERATED_TOTAL}.",
                entries.len()
            ),
        );
    }
    if let Some(count) = parsed.get("generatedFileCount").and_then(Value::as_u64) {
        if count != entries.len() as u64 {
            report.fail(
                "manifest-count-match",
                format!(
                    "manifest generatedFileCount {count} does not equal entries length {}.",
                    entries.len()
                ),
            );
        }
    }

    let mut distribution: BTreeMap<&str, usize> =
        CLUSTER_TARGETS.iter().map(|target| (target.key, 0)).collect();
    let mut frontmatter_checked = 0usize;
    let mut checksums_validated = 0usize;
    for entry in &entries {
        if entry.split('/').any(|segment| segment == "..") || entry.starts_with('/') {
            report.fail(
                "generated-entry-traversal",
                format!("Generated manifest entry escapes the blog root: {entry}"),
            );
            continue;
        }
        if !entry_follows_path_policy(entry) {
            report.fail(
                "generated-entry-path-policy",
                format!("Generated manifest entry violates path policy: {entry}"),
            );
            continue;
        }

        let path = ws.blog_root.join(entry);
        let Some(content) = read_optional(&path)? else {
            report.fail("manifest-file-exists", format!("Manifest entry missing on disk: {entry}"));
            continue;
        };

        let recorded = checksums
            .and_then(|map| map.get(entry.as_str()))
            .and_then(Value::as_str);
        match recorded {
            None => report.fail(
                "generated-file-checksum-missing",
                format!("Manifest checksum is missing for generated entry: {entry}"),
            ),
            Some(checksum) if !SHA256_HEX.is_match(checksum) => report.fail(
                "generated-file-checksum-format",
                format!("Manifest checksum for {entry} is not a valid SHA-256 hex digest."),
            ),
            Some(checksum) if checksum != sha256_hex(content.as_bytes()) => report.fail(
                "generated-file-checksum-mismatch",
                format!(
                    "Checksum mismatch for generated entry {entry}. Regenerate the cluster to realign output."
                ),
            ),
            Some(_) => checksums_validated += 1,
        }

        check_generated_frontmatter(entry, &content, &mut report);
        frontmatter_checked += 1;

        if let Some(key) = cluster_of(entry) {
            *distribution.entry(key).or_default() += 1;
        }
    }

    for target in &CLUSTER_TARGETS {
        let observed = distribution.get(target.key).copied().unwrap_or_default();
        if observed != target.expected {
            let check = if target.is_location() {
                "location-cluster-target"
            } else {
                "non-location-cluster-target"
            };
            report.fail(
                check,
                format!(
                    "Cluster \"{}\" count {observed} does not match expected {}.",
                    target.key, target.expected
                ),
            );
        }
    }

    report.detail("expectedTotal", EXPECTED_GENERATED_TOTAL);
    report.detail("configFingerprint", &fingerprint);
    report.detail("frontmatterCheckCount", frontmatter_checked);
    report.detail("checksumValidatedCount", checksums_validated);
    report.detail("observedDistribution", &distribution);
    Ok(report)
}

fn check_structure(
    parsed: &Value,
    raw_count: usize,
    normalized: &[String],
    entries: &[String],
    fingerprint: &str,
    report: &mut Report,
) {
    let mut sorted = entries.to_vec();
    sorted.sort();
    if sorted != entries {
        report.fail(
            "manifest-generated-files-sorted",
            "Manifest generatedFiles[] entries must be lexicographically sorted for deterministic diffs.",
        );
    }
    if normalized.len() != raw_count {
        report.fail(
            "manifest-generated-files-normalized",
            "Manifest generatedFiles[] contains empty or non-normalized path entries.",
        );
    }
    if normalized.len() != entries.len() {
        report.fail(
            "manifest-generated-files-duplicate",
            format!(
                "Manifest generatedFiles[] lists {} duplicate entries.",
                normalized.len() - entries.len()
            ),
        );
    }

    let version = parsed.get("manifestVersion").and_then(Value::as_u64);
    if version != Some(MANIFEST_VERSION) {
        let shown = version.map_or_else(|| "missing".to_string(), |v| v.to_string());
        report.fail(
            "manifest-version",
            format!(
                "Manifest version \"{shown}\" does not match expected \"{MANIFEST_VERSION}\". Run the generator."
            ),
        );
    }
    if parsed.get("timestamp").is_some() {
        report.fail(
            "manifest-volatile-timestamp",
            "Manifest should not contain volatile \"timestamp\". Regenerate with the deterministic manifest format.",
        );
    }
    let recorded = parsed.get("configFingerprint").and_then(Value::as_str);
    if recorded != Some(fingerprint) {
        report.fail(
            "manifest-config-fingerprint",
            format!(
                "Manifest config fingerprint \"{}\" does not match expected \"{fingerprint}\". Run the generator.",
                recorded.unwrap_or("missing")
            ),
        );
    }
}

fn check_checksum_keys(
    checksums: &serde_json::Map<String, Value>,
    entries: &[String],
    report: &mut Report,
) {
    let keys: Vec<String> = checksums
        .keys()
        .map(|key| normalize_entry(key))
        .filter(|key| !key.is_empty())
        .collect();
    let key_set: BTreeSet<&str> = keys.iter().map(String::as_str).collect();
    let entry_set: BTreeSet<&str> = entries.iter().map(String::as_str).collect();

    if key_set.len() != keys.len() {
        report.fail(
            "manifest-checksum-duplicate-keys",
            "Manifest checksum map contains duplicate/normalized-colliding keys.",
        );
    }
    let missing: Vec<&str> = entry_set.difference(&key_set).take(5).copied().collect();
    if !missing.is_empty() {
        report.fail(
            "manifest-checksum-missing-entries",
            format!("Manifest checksum map is missing generated entries: {}", missing.join(", ")),
        );
    }
    let extra: Vec<&str> = key_set.difference(&entry_set).take(5).copied().collect();
    if !extra.is_empty() {
        report.fail(
            "manifest-checksum-extra-entries",
            format!("Manifest checksum map has unexpected entries: {}", extra.join(", ")),
        );
    }
}

fn check_generated_frontmatter(entry: &str, content: &str, report: &mut Report) {
    let document = match parse_document(content) {
        Ok(document) => document,
        Err(e) => {
            report.push(
                Finding::new("generated-frontmatter-parse", format!("Invalid frontmatter: {e}"))
                    .file(entry),
            );
            return;
        }
    };
    let fm = &document.frontmatter;
    let file_name = entry.rsplit('/').next().unwrap_or(entry);
    let expected_slug = file_name.strip_suffix(".md").unwrap_or(file_name);
    let slug = fm.slug().unwrap_or_default();
    let category = fm.category().unwrap_or_default();
    let expected_category = expected_category(entry).unwrap_or_default();

    if slug != expected_slug {
        report.fail(
            "generated-frontmatter-slug",
            format!("Generated entry {entry} has slug \"{slug}\" but expected \"{expected_slug}\"."),
        );
    }
    if category != expected_category {
        report.fail(
            "generated-frontmatter-category",
            format!(
                "Generated entry {entry} has category \"{category}\" but expected \"{expected_category}\"."
            ),
        );
    }
    if fm.related_slugs.len() < 3 {
        report.fail(
            "generated-related-slugs-minimum",
            format!(
                "Generated entry {entry} has only {} relatedSlugs; minimum expected is 3.",
                fm.related_slugs.len()
            ),
        );
    }
    let has_brand = fm.keywords.iter().any(|keyword| {
        let keyword = keyword.to_lowercase();
        keyword.contains("sansthan") || keyword.contains("sanstan")
    });
    if !has_brand {
        report.fail(
            "generated-keyword-brand-fragment",
            format!("Generated entry {entry} is missing sansthan/sanstan keyword fragments."),
        );
    }

    if let Some(location_key) = entry.strip_prefix("locations/").and_then(|rest| rest.split('/').next()) {
        if !slug.is_empty() && !slug.starts_with(&format!("{location_key}-")) {
            report.fail(
                "generated-location-slug-prefix",
                format!("Location entry {entry} slug \"{slug}\" does not start with \"{location_key}-\"."),
            );
        }
        if fm.location_ids.is_empty() {
            report.fail(
                "generated-location-ids",
                format!("Location entry {entry} is missing locationIds."),
            );
        }
    }
}

/// Count markdown files per cluster namespace on disk and compare each
/// count with its declared target.
pub fn verify_distribution(ws: &Workspace) -> Result<Report, VerifyError> {
    info_event!("generator-distribution-verify-start", {
        "blogRoot": ws.blog_root.display().to_string(),
        "expectedTotal": EXPECTED_GENERATED_TOTAL,
    });
    let mut report = Report::new("generator-distribution-verify");

    let mut observed: BTreeMap<&str, usize> = BTreeMap::new();
    let mut total = 0;
    for target in &CLUSTER_TARGETS {
        let count = markdown_files(&ws.blog_root.join(target.namespace()))?.len();
        total += count;
        _ = observed.insert(target.key, count);
        if count != target.expected {
            report.push(
                Finding::new(
                    "cluster-distribution",
                    format!(
                        "Cluster \"{}\" has {count} posts under {} but the config declares {}.",
                        target.key,
                        target.namespace(),
                        target.expected
                    ),
                )
                .file(target.namespace()),
            );
        }
    }
    if total != EXPECTED_GENERATED_TOTAL {
        report.fail(
            "cluster-distribution-total",
            format!("Clusters hold {total} posts but the config declares {EXPECTED_GENERATED_TOTAL}."),
        );
    }

    report.detail("observedDistribution", &observed);
    report.detail("observedTotal", total);
    Ok(report)
}
