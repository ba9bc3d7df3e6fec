// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Re-run the generator into a scratch root and compare its manifest with
//! the live one.

use std::path::{Path, PathBuf};
use std::process::Command;

use cluster::config::MANIFEST_RELATIVE_PATH;
use cluster::{Generator, Manifest};
use corpus::site::BLOG_ROOT_RELATIVE;
use diagnostics::{debug_event, info_event};

use crate::{Report, VerifyError, Workspace};

/// Environment variable the generator honours for its output root.
pub const GENERATOR_ROOT_ENV: &str = "SEO_BLOG_GENERATOR_ROOT";

/// Produces a generator run into a given blog root.
pub trait GeneratorRunner {
    fn generate(&self, blog_root: &Path) -> Result<(), VerifyError>;
}

/// Runs the generator library in this process.
#[derive(Debug, Default, Clone, Copy)]
pub struct InProcessRunner;

impl GeneratorRunner for InProcessRunner {
    fn generate(&self, blog_root: &Path) -> Result<(), VerifyError> {
        _ = Generator::new(blog_root).run()?;
        Ok(())
    }
}

/// Runs `<program> generate` as a child process with the output root in
/// `SEO_BLOG_GENERATOR_ROOT`, blocking until it exits.
#[derive(Debug, Clone)]
pub struct SubprocessRunner {
    program: PathBuf,
    working_dir: PathBuf,
}

impl SubprocessRunner {
    pub fn new(program: impl Into<PathBuf>, working_dir: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            working_dir: working_dir.into(),
        }
    }

    /// The currently running executable.
    pub fn current_exe(working_dir: impl Into<PathBuf>) -> Result<Self, VerifyError> {
        let program = std::env::current_exe().map_err(|e| VerifyError::io("current executable", e))?;
        Ok(Self::new(program, working_dir))
    }
}

impl GeneratorRunner for SubprocessRunner {
    fn generate(&self, blog_root: &Path) -> Result<(), VerifyError> {
        let output = Command::new(&self.program)
            .arg("generate")
            .env(GENERATOR_ROOT_ENV, blog_root)
            .current_dir(&self.working_dir)
            .output()
            .map_err(|e| VerifyError::io(&self.program, e))?;
        if output.status.success() {
            return Ok(());
        }
        let stderr = String::from_utf8_lossy(&output.stderr);
        let tail: Vec<&str> = stderr.lines().rev().take(5).collect();
        Err(VerifyError::Generator(format!(
            "{} exited with {}: {}",
            self.program.display(),
            output.status,
            tail.into_iter().rev().collect::<Vec<_>>().join(" | ")
        )))
    }
}

pub fn verify_determinism(ws: &Workspace, runner: &dyn GeneratorRunner) -> Result<Report, VerifyError> {
    let live_path = ws.manifest_path();
    info_event!("generator-determinism-verify-start", {
        "liveManifestPath": live_path.display().to_string(),
    });
    let mut report = Report::new("generator-determinism-verify");

    let Some(live) = Manifest::read(&live_path)? else {
        report.fail(
            "live-manifest-exists",
            "Live generated manifest missing. Run the generator first.",
        );
        return Ok(report);
    };

    let scratch = tempfile::Builder::new()
        .prefix("seo-generator-determinism-")
        .tempdir()
        .map_err(|e| VerifyError::io(std::env::temp_dir(), e))?;
    let scratch_blog_root = scratch.path().join(BLOG_ROOT_RELATIVE);
    debug_event!("generator-determinism-scratch", {
        "blogRoot": scratch_blog_root.display().to_string(),
    });
    runner.generate(&scratch_blog_root)?;

    let Some(fresh) = Manifest::read(&scratch_blog_root.join(MANIFEST_RELATIVE_PATH))? else {
        report.fail(
            "temp-manifest-exists",
            "Temporary generator run did not produce a manifest.",
        );
        return Ok(report);
    };

    let diff = fresh.diff(&live);
    if let Some((fresh_version, live_version)) = diff.version {
        report.fail(
            "manifest-version",
            format!("Temporary manifest version {fresh_version} does not match live {live_version}."),
        );
    }
    if let Some((fresh_fp, live_fp)) = &diff.fingerprint {
        report.fail(
            "config-fingerprint",
            format!("Temporary fingerprint {fresh_fp} does not match live {live_fp}."),
        );
    }
    if let Some((fresh_count, live_count)) = diff.file_count {
        report.fail(
            "generated-file-count",
            format!("Temporary generatedFileCount {fresh_count} does not match live {live_count}."),
        );
    }
    if diff.file_list_differs {
        report.fail(
            "generated-file-list",
            "Temporary generated file inventory differs from live manifest inventory.",
        );
    }
    for (check, label, keys) in [
        ("checksum-map-missing-keys", "Temporary checksum map missing keys", &diff.missing_keys),
        ("checksum-map-extra-keys", "Temporary checksum map has unexpected keys", &diff.extra_keys),
        ("checksum-map-mismatch", "Checksum mismatch for generated entries", &diff.checksum_mismatches),
    ] {
        if !keys.is_empty() {
            let sample: Vec<&str> = keys.iter().take(5).map(String::as_str).collect();
            report.fail(check, format!("{label}: {}", sample.join(", ")));
        }
    }

    report.detail("comparedGeneratedFiles", live.generated_files.len());
    Ok(report)
}
