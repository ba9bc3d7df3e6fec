// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Broken manifests, drifted clusters, damaged seed posts and a generator
//! that no longer reproduces the live manifest.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use cluster::config::{MANIFEST_RELATIVE_PATH, MANIFEST_VERSION};
use cluster::{Generator, Manifest, sha256_hex};
use corpus::frontmatter::render_document;
use corpus::{Frontmatter, parse_document};
use serde_json::{Map, Value};
use verify::determinism::verify_determinism;
use verify::manifest::{verify_distribution, verify_manifest};
use verify::seeds::verify_manual_seeds;
use verify::{GeneratorRunner, InProcessRunner, Report, VerifyError, Workspace};

const SEEDS: [(&str, &str); 5] = [
    ("welcome-to-sansthan.md", include_str!("../../../content/blog/welcome-to-sansthan.md")),
    ("shegaon-travel-guide.md", include_str!("../../../content/blog/shegaon-travel-guide.md")),
    (
        "shegaon-accommodation-guide.md",
        include_str!("../../../content/blog/shegaon-accommodation-guide.md"),
    ),
    (
        "nearby-places-from-shegaon.md",
        include_str!("../../../content/blog/nearby-places-from-shegaon.md"),
    ),
    (
        "omkareshwar-darshan-timings.md",
        include_str!("../../../content/blog/omkareshwar-darshan-timings.md"),
    ),
];

const BROKEN_FRONTMATTER: &str = "---\ntitle: [unclosed\n---\nBody.\n";

fn generated_workspace() -> Result<(tempfile::TempDir, Workspace)> {
    let dir = tempfile::tempdir()?;
    let ws = Workspace::new(dir.path());
    fs::create_dir_all(&ws.blog_root)?;
    for (name, content) in SEEDS {
        fs::write(ws.blog_root.join(name), content)?;
    }
    _ = Generator::new(&ws.blog_root).run()?;
    Ok((dir, ws))
}

fn failing_checks(report: &Report) -> Vec<&str> {
    report.failures().iter().map(|f| f.check.as_str()).collect()
}

fn failing_files<'a>(report: &'a Report, check: &str) -> Vec<&'a str> {
    report
        .failures()
        .iter()
        .filter(|f| f.check == check)
        .filter_map(|f| f.file.as_deref())
        .collect()
}

fn live_manifest(ws: &Workspace) -> Result<Manifest> {
    Manifest::read(&ws.manifest_path())?.context("live manifest")
}

/// Generated entries under `prefix`, in manifest order.
fn entries_under(ws: &Workspace, prefix: &str) -> Result<Vec<PathBuf>> {
    Ok(live_manifest(ws)?
        .generated_files
        .iter()
        .filter(|entry| entry.starts_with(prefix))
        .map(|entry| ws.blog_root.join(entry))
        .collect())
}

fn edit_frontmatter(path: &Path, edit: impl FnOnce(&mut Frontmatter)) -> Result<()> {
    let mut document = parse_document(&fs::read_to_string(path)?)?;
    edit(&mut document.frontmatter);
    fs::write(path, render_document(&document.frontmatter, &document.body)?)?;
    Ok(())
}

fn files(manifest: &mut Map<String, Value>) -> &mut Vec<Value> {
    manifest
        .get_mut("generatedFiles")
        .and_then(Value::as_array_mut)
        .expect("generatedFiles array")
}

fn checksums(manifest: &mut Map<String, Value>) -> &mut Map<String, Value> {
    manifest
        .get_mut("generatedFileChecksums")
        .and_then(Value::as_object_mut)
        .expect("generatedFileChecksums map")
}

fn first_entry(manifest: &mut Map<String, Value>) -> String {
    files(manifest)[0].as_str().expect("string entry").to_string()
}

type ManifestEdit = fn(&mut Map<String, Value>);

const MANIFEST_EDITS: &[(&str, ManifestEdit)] = &[
    ("manifest-generated-files-sorted", |m| files(m).swap(0, 1)),
    ("manifest-generated-files-duplicate", |m| {
        let first = files(m)[0].clone();
        files(m).insert(1, first);
    }),
    ("manifest-generated-files-normalized", |m| files(m).push(Value::from("   "))),
    ("manifest-version", |m| {
        _ = m.insert("manifestVersion".into(), Value::from(MANIFEST_VERSION + 1));
    }),
    ("manifest-volatile-timestamp", |m| {
        _ = m.insert("timestamp".into(), Value::from("2026-01-01T00:00:00Z"));
    }),
    ("manifest-config-fingerprint", |m| {
        _ = m.insert("configFingerprint".into(), Value::from("0123456789abcdef"));
    }),
    ("manifest-count-match", |m| {
        let count = files(m).len() as u64 + 1;
        _ = m.insert("generatedFileCount".into(), Value::from(count));
    }),
    ("generated-entry-traversal", |m| files(m).push(Value::from("guides/../../outside.md"))),
    ("generated-entry-path-policy", |m| files(m).push(Value::from("guides/Not-Lower-Case.md"))),
    ("manifest-checksum-map", |m| {
        _ = m.remove("generatedFileChecksums");
    }),
    ("manifest-checksum-missing-entries", |m| {
        let first = first_entry(m);
        _ = checksums(m).remove(&first);
    }),
    ("generated-file-checksum-missing", |m| {
        let first = first_entry(m);
        _ = checksums(m).remove(&first);
    }),
    ("manifest-checksum-extra-entries", |m| {
        _ = checksums(m).insert("guides/unlisted-entry.md".into(), Value::from(sha256_hex(b"unlisted")));
    }),
    ("manifest-checksum-duplicate-keys", |m| {
        let first = first_entry(m);
        let sum = checksums(m).get(&first).cloned().expect("checksum for first entry");
        _ = checksums(m).insert(format!(" {first}"), sum);
    }),
    ("generated-file-checksum-format", |m| {
        let first = first_entry(m);
        _ = checksums(m).insert(first, Value::from("not-a-digest"));
    }),
    ("generated-file-checksum-mismatch", |m| {
        let first = first_entry(m);
        _ = checksums(m).insert(first, Value::from("0".repeat(64)));
    }),
    ("generated-total", |m| {
        _ = files(m).pop();
    }),
    // Entries are sorted, so the last one belongs to the spiritual cluster.
    ("non-location-cluster-target", |m| {
        _ = files(m).pop();
    }),
    ("location-cluster-target", |m| {
        let at = files(m)
            .iter()
            .position(|entry| entry.as_str().is_some_and(|e| e.starts_with("locations/")))
            .expect("a location entry");
        _ = files(m).remove(at);
    }),
];

#[test]
fn test_manifest_edits_fail_their_checks() -> Result<()> {
    let (_dir, ws) = generated_workspace()?;
    let manifest_path = ws.manifest_path();
    let original = fs::read_to_string(&manifest_path)?;
    assert!(verify_manifest(&ws)?.passed());

    for (check, edit) in MANIFEST_EDITS {
        let mut parsed: Map<String, Value> = serde_json::from_str(&original)?;
        edit(&mut parsed);
        fs::write(&manifest_path, serde_json::to_string_pretty(&parsed)?)?;

        let report = verify_manifest(&ws)?;
        assert!(report.has_failure(check), "{check}: {:?}", failing_checks(&report));
    }
    Ok(())
}

#[test]
fn test_missing_or_unreadable_manifest() -> Result<()> {
    let (_dir, ws) = generated_workspace()?;
    fs::write(ws.manifest_path(), "{ \"generatedFiles\": [")?;
    let report = verify_manifest(&ws)?;
    assert_eq!(failing_checks(&report), vec!["manifest-parse"]);

    fs::remove_file(ws.manifest_path())?;
    let report = verify_manifest(&ws)?;
    assert_eq!(failing_checks(&report), vec!["manifest-exists"]);
    Ok(())
}

#[test]
fn test_generated_file_removed_from_disk() -> Result<()> {
    let (_dir, ws) = generated_workspace()?;
    let victim = ws.blog_root.join("events/ram-navami-devotee-planning-guide.md");
    fs::remove_file(&victim)?;

    let report = verify_manifest(&ws)?;
    assert!(report.has_failure("manifest-file-exists"));
    assert!(report.failures().iter().any(|f| f.reason.contains("ram-navami-devotee-planning-guide.md")));
    Ok(())
}

#[test]
fn test_generated_frontmatter_damage() -> Result<()> {
    let (_dir, ws) = generated_workspace()?;
    let guides = entries_under(&ws, "guides/")?;
    let spiritual = entries_under(&ws, "spiritual/")?;
    let locations = entries_under(&ws, "locations/")?;

    edit_frontmatter(&ws.blog_root.join("events/ram-navami-devotee-planning-guide.md"), |fm| {
        fm.category = Some("guides".into());
    })?;
    edit_frontmatter(&guides[0], |fm| fm.slug = Some("renamed-by-hand".into()))?;
    edit_frontmatter(&guides[1], |fm| fm.related_slugs.truncate(2))?;
    edit_frontmatter(&spiritual[0], |fm| {
        fm.keywords.retain(|k| {
            let k = k.to_lowercase();
            !k.contains("sansthan") && !k.contains("sanstan")
        });
    })?;
    edit_frontmatter(&locations[0], |fm| fm.location_ids.clear())?;
    edit_frontmatter(&locations[1], |fm| fm.slug = Some("detached-from-location".into()))?;
    fs::write(&spiritual[1], BROKEN_FRONTMATTER)?;

    let report = verify_manifest(&ws)?;
    for check in [
        "generated-frontmatter-category",
        "generated-frontmatter-slug",
        "generated-related-slugs-minimum",
        "generated-keyword-brand-fragment",
        "generated-location-ids",
        "generated-location-slug-prefix",
        "generated-frontmatter-parse",
        "generated-file-checksum-mismatch",
    ] {
        assert!(report.has_failure(check), "{check}: {:?}", failing_checks(&report));
    }
    Ok(())
}

#[test]
fn test_cluster_distribution_drift() -> Result<()> {
    let (_dir, ws) = generated_workspace()?;
    assert!(verify_distribution(&ws)?.passed());

    let guides = entries_under(&ws, "guides/")?;
    fs::remove_file(&guides[0])?;
    let report = verify_distribution(&ws)?;
    assert_eq!(failing_files(&report, "cluster-distribution"), vec!["guides/"]);
    assert!(report.has_failure("cluster-distribution-total"));

    // Same total, different shape.
    fs::write(ws.blog_root.join("locations/shegaon/shegaon-extra-notes.md"), "---\nslug: x\n---\n")?;
    let report = verify_distribution(&ws)?;
    let drifted: BTreeSet<&str> = failing_files(&report, "cluster-distribution").into_iter().collect();
    assert_eq!(drifted, BTreeSet::from(["guides/", "locations/shegaon/"]));
    assert!(!report.has_failure("cluster-distribution-total"));
    Ok(())
}

#[test]
fn test_manual_seed_damage() -> Result<()> {
    let (_dir, ws) = generated_workspace()?;
    assert!(verify_manual_seeds(&ws)?.passed());

    fs::remove_file(ws.blog_root.join("shegaon-travel-guide.md"))?;
    edit_frontmatter(&ws.blog_root.join("nearby-places-from-shegaon.md"), |fm| {
        fm.slug = Some("nearby-places".into());
    })?;
    edit_frontmatter(&ws.blog_root.join("shegaon-accommodation-guide.md"), |fm| fm.category = None)?;
    fs::write(
        ws.blog_root.join("omkareshwar-darshan-timings.md"),
        "---\nslug: omkareshwar-darshan-timings\ncategory: guides\n---\nPlan ahead and [book](/booking).\n",
    )?;
    let manifest_path = ws.manifest_path();
    let mut parsed: Map<String, Value> = serde_json::from_str(&fs::read_to_string(&manifest_path)?)?;
    files(&mut parsed).push(Value::from("welcome-to-sansthan.md"));
    fs::write(&manifest_path, serde_json::to_string_pretty(&parsed)?)?;

    let report = verify_manual_seeds(&ws)?;
    assert_eq!(failing_files(&report, "seed-file-exists"), vec!["shegaon-travel-guide.md"]);
    assert_eq!(failing_files(&report, "seed-slug-match"), vec!["nearby-places-from-shegaon.md"]);
    assert_eq!(failing_files(&report, "seed-category"), vec!["shegaon-accommodation-guide.md"]);
    assert_eq!(
        failing_files(&report, "seed-internal-link-count"),
        vec!["omkareshwar-darshan-timings.md"]
    );
    assert_eq!(
        failing_files(&report, "seed-internal-link-intent"),
        vec!["omkareshwar-darshan-timings.md"]
    );
    assert_eq!(failing_files(&report, "seed-not-generated"), vec!["welcome-to-sansthan.md"]);

    fs::write(ws.blog_root.join("welcome-to-sansthan.md"), BROKEN_FRONTMATTER)?;
    let report = verify_manual_seeds(&ws)?;
    assert_eq!(failing_files(&report, "seed-frontmatter"), vec!["welcome-to-sansthan.md"]);

    fs::remove_file(&manifest_path)?;
    let report = verify_manual_seeds(&ws)?;
    assert_eq!(failing_checks(&report), vec!["manifest-exists"]);
    Ok(())
}

/// Runs the real generator, then rewrites the manifest it produced.
struct DriftingRunner(fn(&mut Manifest));

impl GeneratorRunner for DriftingRunner {
    fn generate(&self, blog_root: &Path) -> Result<(), VerifyError> {
        InProcessRunner.generate(blog_root)?;
        let path = blog_root.join(MANIFEST_RELATIVE_PATH);
        let Some(mut manifest) = Manifest::read(&path)? else {
            return Err(VerifyError::Generator("generator wrote no manifest".into()));
        };
        (self.0)(&mut manifest);
        manifest.write(&path)?;
        Ok(())
    }
}

/// Exits cleanly without producing anything.
struct SilentRunner;

impl GeneratorRunner for SilentRunner {
    fn generate(&self, _blog_root: &Path) -> Result<(), VerifyError> {
        Ok(())
    }
}

const MANIFEST_DRIFTS: &[(&str, fn(&mut Manifest))] = &[
    ("manifest-version", |m| m.manifest_version += 1),
    ("config-fingerprint", |m| m.config_fingerprint = "0123456789abcdef".into()),
    ("generated-file-count", |m| m.generated_file_count += 1),
    ("generated-file-list", |m| {
        _ = m.generated_files.pop();
    }),
    ("checksum-map-missing-keys", |m| {
        if let Some(last) = m.generated_files.last() {
            _ = m.generated_file_checksums.remove(last);
        }
    }),
    ("checksum-map-extra-keys", |m| {
        _ = m
            .generated_file_checksums
            .insert("guides/unlisted-entry.md".into(), sha256_hex(b"unlisted"));
    }),
    ("checksum-map-mismatch", |m| {
        if let Some(sum) = m.generated_file_checksums.values_mut().next() {
            *sum = sha256_hex(b"drifted");
        }
    }),
];

#[test]
fn test_determinism_detects_drifting_generator() -> Result<()> {
    let (_dir, ws) = generated_workspace()?;
    assert!(verify_determinism(&ws, &InProcessRunner)?.passed());

    for (check, drift) in MANIFEST_DRIFTS {
        let report = verify_determinism(&ws, &DriftingRunner(*drift))?;
        assert!(report.has_failure(check), "{check}: {:?}", failing_checks(&report));
    }

    let report = verify_determinism(&ws, &SilentRunner)?;
    assert_eq!(failing_checks(&report), vec!["temp-manifest-exists"]);

    fs::remove_file(ws.manifest_path())?;
    let report = verify_determinism(&ws, &InProcessRunner)?;
    assert_eq!(failing_checks(&report), vec!["live-manifest-exists"]);
    Ok(())
}
