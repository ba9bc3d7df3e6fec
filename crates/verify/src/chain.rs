// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Guards on the repository wiring: the `seo:check` npm chains, the CI
//! quality gate workflow and the blog README.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::LazyLock;

use cluster::Manifest;
use corpus::markdown_files;
use diagnostics::info_event;
use regex::Regex;
use serde_json::Value;

use crate::workspace::read_optional;
use crate::{Finding, Report, VerifyError, Workspace};

pub const SEO_CHECK_SCRIPT: &str = "seo:check";
pub const SEO_CHECK_STRICT_SCRIPT: &str = "seo:check:strict";
pub const SEO_CHAIN_SCRIPT: &str = "verify:seo-chain";

/// Steps shared by both chains, in order.
pub const SEO_CHAIN_PREFIX: [&str; 16] = [
    "npm run lint",
    "npm run verify:seo-chain",
    "npm run verify:ci-gate",
    "npm run verify:generator",
    "npm run verify:manual-seeds",
    "npm run verify:generator:determinism",
    "npm run verify:docs-sync",
    "npm run build",
    "npm run verify:canonical",
    "npm run verify:robots",
    "npm run verify:locations",
    "npm run verify:taxonomy",
    "npm run verify:sitemap",
    "npm run verify:pagination",
    "npm run verify:rss",
    "npm run verify:seo-build",
];

pub const SEO_CHECK_FINAL_STEP: &str = "npm run validate:blog";
pub const SEO_STRICT_FINAL_STEP: &str = "npm run validate:blog:strict";

/// Expected `seo:check` or `seo:check:strict` steps.
pub fn expected_chain(strict: bool) -> Vec<&'static str> {
    let mut steps = SEO_CHAIN_PREFIX.to_vec();
    steps.push(if strict { SEO_STRICT_FINAL_STEP } else { SEO_CHECK_FINAL_STEP });
    steps
}

/// Split an npm script on `&&` into trimmed, non-empty steps.
pub fn split_chain(command: &str) -> Vec<&str> {
    command.split("&&").map(str::trim).filter(|s| !s.is_empty()).collect()
}

/// One position where two chains disagree (1-based).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepDiff {
    pub position: usize,
    pub expected: String,
    pub actual: String,
}

pub fn diff_chains(actual: &[&str], expected: &[&str]) -> Vec<StepDiff> {
    let len = actual.len().max(expected.len());
    (0..len)
        .filter(|&i| actual.get(i) != expected.get(i))
        .map(|i| StepDiff {
            position: i + 1,
            expected: expected.get(i).copied().unwrap_or("(none)").to_string(),
            actual: actual.get(i).copied().unwrap_or("(none)").to_string(),
        })
        .collect()
}

static NPM_RUN_STEP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^npm run ([a-z0-9:-]+)$").expect("valid npm run regex"));

/// Script name of an `npm run <name>` step.
pub fn npm_script_name(step: &str) -> Option<&str> {
    NPM_RUN_STEP
        .captures(step)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

fn duplicate_steps<'a>(steps: &[&'a str]) -> Vec<(&'a str, usize)> {
    let mut counts: BTreeMap<&'a str, usize> = BTreeMap::new();
    for step in steps {
        *counts.entry(*step).or_default() += 1;
    }
    counts.into_iter().filter(|(_, n)| *n > 1).collect()
}

fn describe_diffs(diffs: &[StepDiff]) -> String {
    diffs
        .iter()
        .take(5)
        .map(|d| format!("#{}: expected \"{}\", found \"{}\"", d.position, d.expected, d.actual))
        .collect::<Vec<_>>()
        .join("; ")
}

fn npm_script<'p>(package: &'p Value, name: &str) -> Option<&'p str> {
    package["scripts"][name].as_str()
}

/// `package.json` defines both chains in the expected order and every
/// script they call.
pub fn verify_command_chain(ws: &Workspace) -> Result<Report, VerifyError> {
    info_event!("seo-command-chain-verify-start", {
        "packageJsonPath": ws.package_json.display().to_string(),
    });
    let mut report = Report::new("seo-command-chain-verify");
    let Some(raw) = read_optional(&ws.package_json)? else {
        report.fail("package-json-exists", "package.json not found in workspace root.");
        return Ok(report);
    };
    let package: Value = serde_json::from_str(&raw).map_err(|source| VerifyError::Json {
        path: ws.package_json.clone(),
        source,
    })?;

    if npm_script(&package, SEO_CHAIN_SCRIPT).is_none() {
        report.fail("verify-seo-chain-script", "Missing \"verify:seo-chain\" npm script.");
    }
    let check = npm_script(&package, SEO_CHECK_SCRIPT);
    if check.is_none() {
        report.fail("seo-check-script", "Missing \"seo:check\" npm script.");
    }
    let strict = npm_script(&package, SEO_CHECK_STRICT_SCRIPT);
    if strict.is_none() {
        report.fail("seo-check-strict-script", "Missing \"seo:check:strict\" npm script.");
    }
    let (Some(check), Some(strict), true) = (check, strict, report.passed()) else {
        return Ok(report);
    };

    let check_chain = split_chain(check);
    let strict_chain = split_chain(strict);

    for (name, chain, expected) in [
        ("seo:check", &check_chain, expected_chain(false)),
        ("seo:check:strict", &strict_chain, expected_chain(true)),
    ] {
        let diffs = diff_chains(chain, &expected);
        if !diffs.is_empty() {
            let check_name = if name == SEO_CHECK_SCRIPT {
                "seo-check-chain-order"
            } else {
                "seo-check-strict-chain-order"
            };
            report.fail(
                check_name,
                format!(
                    "{name} command chain does not match expected order. {}",
                    describe_diffs(&diffs)
                ),
            );
        }
    }

    let all_steps: Vec<&str> = check_chain.iter().chain(strict_chain.iter()).copied().collect();
    let malformed: BTreeSet<&str> = all_steps
        .iter()
        .copied()
        .filter(|step| !step.starts_with("npm run "))
        .collect();
    if !malformed.is_empty() {
        report.fail(
            "command-step-format",
            format!(
                "All SEO chain steps must start with \"npm run\". Invalid steps: {}",
                malformed.into_iter().take(5).collect::<Vec<_>>().join(", ")
            ),
        );
    }

    for (name, chain, check_name) in [
        ("seo:check", &check_chain, "seo-check-duplicate-steps"),
        ("seo:check:strict", &strict_chain, "seo-check-strict-duplicate-steps"),
    ] {
        let duplicates = duplicate_steps(chain);
        if !duplicates.is_empty() {
            let listed: Vec<String> = duplicates
                .iter()
                .map(|(step, count)| format!("{step} (x{count})"))
                .collect();
            report.fail(
                check_name,
                format!("{name} contains duplicate steps: {}", listed.join(", ")),
            );
        }
    }

    let shared = check_chain.len().saturating_sub(1);
    let parity_breaks = (0..shared)
        .filter(|&i| strict_chain.get(i) != check_chain.get(i))
        .count();
    if parity_breaks > 0 {
        report.fail(
            "seo-check-strict-parity",
            "seo:check and seo:check:strict should differ only in final validation step.",
        );
    }

    let referenced: BTreeSet<&str> = all_steps
        .iter()
        .filter_map(|step| npm_script_name(*step))
        .filter(|name| *name != SEO_CHECK_SCRIPT && *name != SEO_CHECK_STRICT_SCRIPT)
        .collect();
    for &name in &referenced {
        if npm_script(&package, name).is_none() {
            report.push(Finding::new(
                "referenced-script-exists",
                format!("Command chain references missing npm script \"{name}\"."),
            ));
        }
    }

    report.detail("seoCheckStepCount", check_chain.len());
    report.detail("seoCheckStrictStepCount", strict_chain.len());
    report.detail("referencedScriptCount", referenced.len());
    Ok(report)
}

pub const CI_REQUIRED_SNIPPETS: [&str; 8] = [
    "name: SEO Quality Gate",
    "pull_request:",
    "push:",
    "cursor/**",
    "timeout-minutes: 20",
    "uses: actions/setup-node@v4",
    "node-version: \"20\"",
    "run: npm run seo:check:strict",
];

static STRICT_GATE_RUN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"run:\s*npm run seo:check:strict").expect("valid strict gate regex")
});

/// The CI workflow runs the strict chain exactly once.
pub fn verify_ci_gate(ws: &Workspace) -> Result<Report, VerifyError> {
    info_event!("ci-seo-gate-verify-start", {
        "workflowPath": ws.ci_workflow.display().to_string(),
    });
    let mut report = Report::new("ci-seo-gate-verify");
    let Some(content) = read_optional(&ws.ci_workflow)? else {
        report.fail("workflow-exists", "SEO quality gate workflow file is missing.");
        return Ok(report);
    };

    for snippet in CI_REQUIRED_SNIPPETS {
        if !content.contains(snippet) {
            report.fail(
                "workflow-snippet",
                format!("Missing required workflow snippet: \"{snippet}\""),
            );
        }
    }
    let runs = STRICT_GATE_RUN.find_iter(&content).count();
    if runs != 1 {
        report.fail(
            "strict-gate-run-count",
            format!("Expected exactly one strict gate run command, found {runs}."),
        );
    }

    report.detail("strictGateRunMatches", runs);
    report.detail("checkedSnippetCount", CI_REQUIRED_SNIPPETS.len());
    Ok(report)
}

pub const README_RELATIVE: &str = "README.md";

/// Snippets the blog README must mention besides the post count.
pub const README_REQUIRED_SNIPPETS: [&str; 7] = [
    "npm run verify:generator",
    "npm run verify:generator:determinism",
    "npm run verify:seo-chain",
    "npm run verify:ci-gate",
    "npm run verify:docs-sync",
    "manifestVersion",
    "manual seed anchors",
];

/// The post-count line the README must carry.
pub fn post_count_snippet(count: usize) -> String {
    format!("Total publishable posts: **{count}**")
}

/// The blog README and CI workflow agree with the live corpus.
pub fn verify_docs_sync(ws: &Workspace) -> Result<Report, VerifyError> {
    let publishable = markdown_files(&ws.blog_root)?.len();
    let manifest_path = ws.manifest_path();
    let manifest = Manifest::read(&manifest_path)?
        .ok_or_else(|| VerifyError::missing("Generated cluster manifest", &manifest_path))?;
    info_event!("seo-docs-sync-verify-start", {
        "publishablePostCount": publishable,
        "generatedPostCount": manifest.generated_files.len(),
    });

    let mut report = Report::new("seo-docs-sync-verify");
    let readme_path = ws.blog_root.join(README_RELATIVE);
    let readme = crate::workspace::read_required("Blog README", &readme_path)?;
    let workflow = crate::workspace::read_required("SEO quality gate workflow", &ws.ci_workflow)?;

    let count_line = post_count_snippet(publishable);
    let expectations = std::iter::once(count_line.as_str()).chain(README_REQUIRED_SNIPPETS);
    for snippet in expectations {
        if !readme.contains(snippet) {
            report.push(
                Finding::new("doc-snippet", format!("Missing required snippet: \"{snippet}\""))
                    .file("content/blog/README.md"),
            );
        }
    }
    if !workflow.contains("npm run seo:check:strict") {
        report.push(
            Finding::new(
                "doc-snippet",
                "Missing required snippet: \"npm run seo:check:strict\"",
            )
            .file(".github/workflows/seo-quality-gate.yml"),
        );
    }

    report.detail("publishablePostCount", publishable);
    report.detail("generatedPostCount", manifest.generated_files.len());
    Ok(report)
}
