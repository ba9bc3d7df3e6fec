// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Run the quality gate in process, one `npm run` step at a time.

use anyhow::{Result, anyhow};
use diagnostics::{error_event, info_event};
use verify::chain::{SEO_CHECK_SCRIPT, SEO_CHECK_STRICT_SCRIPT, expected_chain, npm_script_name};
use verify::content::validate_content;
use verify::{GeneratorRunner, Report, VerifyError, Workspace};

use super::verify::{VerifyTarget, run_verifier};
use crate::common::SeoContext;
use crate::error_utils::ErrorContext;

/// Event prefix for the chain runner.
pub const EVENT_PREFIX: &str = "seo-check";

/// What one `npm run` step does when run by this tool.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CheckStep {
    /// Handled by the web toolchain (`lint`, `build`); skipped here.
    External,
    Verify(&'static [VerifyTarget]),
    ValidateContent { strict: bool },
}

/// Map a package script name to its step.
pub fn check_step(script: &str) -> Option<CheckStep> {
    use VerifyTarget as T;
    let step = match script {
        "lint" | "build" => CheckStep::External,
        "verify:seo-chain" => CheckStep::Verify(&[T::CommandChain]),
        "verify:ci-gate" => CheckStep::Verify(&[T::CiGate]),
        "verify:generator" => CheckStep::Verify(&[T::Manifest, T::Distribution]),
        "verify:manual-seeds" => CheckStep::Verify(&[T::ManualSeeds]),
        "verify:generator:determinism" => CheckStep::Verify(&[T::Determinism]),
        "verify:docs-sync" => CheckStep::Verify(&[T::DocsSync]),
        "verify:canonical" => CheckStep::Verify(&[T::Canonical]),
        "verify:robots" => CheckStep::Verify(&[T::Robots]),
        "verify:locations" => CheckStep::Verify(&[T::Locations]),
        "verify:taxonomy" => CheckStep::Verify(&[T::Taxonomy]),
        "verify:sitemap" => CheckStep::Verify(&[T::Sitemap]),
        "verify:pagination" => CheckStep::Verify(&[T::Pagination]),
        "verify:rss" => CheckStep::Verify(&[T::Rss]),
        "verify:seo-build" => CheckStep::Verify(&[T::SeoBuild]),
        "verify:blog-posts" => CheckStep::Verify(&[T::BlogPosts]),
        "verify:live-redirects" => CheckStep::Verify(&[T::LiveRedirects]),
        "validate:blog" => CheckStep::ValidateContent { strict: false },
        "validate:blog:strict" => CheckStep::ValidateContent { strict: true },
        _ => return None,
    };
    Some(step)
}

/// Result of one chain run.
#[derive(Debug, Clone, Default)]
pub struct CheckOutcome {
    /// Scripts that ran and passed, in order.
    pub passed: Vec<String>,
    /// Scripts left to the web toolchain.
    pub skipped: Vec<String>,
    /// The script that stopped the run.
    pub failed: Option<String>,
}

impl CheckOutcome {
    pub fn succeeded(&self) -> bool {
        self.failed.is_none()
    }
}

fn run_step(ws: &Workspace, step: CheckStep, runner: &dyn GeneratorRunner) -> Result<Vec<Report>, VerifyError> {
    match step {
        CheckStep::External => Ok(Vec::new()),
        CheckStep::Verify(targets) => {
            let mut reports = Vec::with_capacity(targets.len());
            for &target in targets {
                let report = run_verifier(ws, target, runner)?;
                report.log();
                let passed = report.passed();
                reports.push(report);
                if !passed {
                    break;
                }
            }
            Ok(reports)
        }
        CheckStep::ValidateContent { strict } => {
            let report = validate_content(ws, strict)?;
            report.log();
            Ok(vec![report])
        }
    }
}

/// Run `seo:check` (or `seo:check:strict`) step by step, stopping at the
/// first failing step.
pub fn check_command(ctx: &SeoContext, strict: bool, runner: &dyn GeneratorRunner) -> Result<CheckOutcome> {
    let ws = ctx.workspace()?;
    let chain = expected_chain(strict);
    let script = if strict { SEO_CHECK_STRICT_SCRIPT } else { SEO_CHECK_SCRIPT };
    info_event!("seo-check-start", {
        "script": script,
        "stepCount": chain.len(),
    });

    let mut outcome = CheckOutcome::default();
    for command in chain {
        let name = npm_script_name(command).ok_or_else(|| anyhow!("Unsupported step \"{command}\""))?;
        let step = check_step(name).ok_or_else(|| anyhow!("No runner for script \"{name}\""))?;
        if step == CheckStep::External {
            info_event!("seo-check-step-skipped", {
                "step": name,
                "reason": format!("Run \"npm run {name}\" through the web toolchain."),
            });
            outcome.skipped.push(name.to_string());
            continue;
        }

        let reports = run_step(&ws, step, runner).verify_context(name)?;
        if reports.iter().all(Report::passed) {
            outcome.passed.push(name.to_string());
            continue;
        }
        error_event!("seo-check-step-failed", { "step": name });
        outcome.failed = Some(name.to_string());
        break;
    }

    let status = if outcome.succeeded() { "passed" } else { "failed" };
    info_event!("seo-check-summary", {
        "script": script,
        "status": status,
        "passedSteps": outcome.passed,
        "skippedSteps": outcome.skipped,
        "failedStep": outcome.failed,
    });
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_chain_step_has_a_runner() {
        for strict in [false, true] {
            for command in expected_chain(strict) {
                let name = npm_script_name(command).unwrap();
                assert!(check_step(name).is_some(), "no runner for {name}");
            }
        }
    }

    #[test]
    fn test_generator_step_runs_both_verifiers() {
        assert_eq!(
            check_step("verify:generator"),
            Some(CheckStep::Verify(&[VerifyTarget::Manifest, VerifyTarget::Distribution]))
        );
        assert_eq!(check_step("build"), Some(CheckStep::External));
        assert_eq!(
            check_step("validate:blog:strict"),
            Some(CheckStep::ValidateContent { strict: true })
        );
        assert_eq!(check_step("deploy"), None);
    }
}
