// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Build-output verification against the production origin while a preview
//! deployment environment is active. Kept in its own test binary because it
//! sets process environment variables.

use std::fs;

use anyhow::Result;
use cmd::commands::{VerifyTarget, verify_command};
use cmd::common::SeoContext;
use corpus::CANONICAL_ORIGIN;
use corpus::site::BUILD_APP_RELATIVE;
use verify::InProcessRunner;

const PREVIEW_HOST: &str = "my-preview.vercel.app";

fn page(canonical: &str) -> String {
    format!(
        r#"<html><head><meta name="keywords" content="sansthan shegaon"/><link rel="canonical" href="{canonical}"/></head></html>"#
    )
}

#[test]
fn test_deploy_environment_does_not_change_canonical_origin() -> Result<()> {
    // SAFETY: This is safe in tests as we control the execution environment
    unsafe {
        std::env::set_var("VERCEL_URL", PREVIEW_HOST);
        std::env::set_var("NEXT_PUBLIC_SITE_URL", format!("https://{PREVIEW_HOST}"));
    }

    let dir = tempfile::tempdir()?;
    let build = dir.path().join(BUILD_APP_RELATIVE);
    fs::create_dir_all(&build)?;
    fs::write(build.join("index.html"), page(&format!("https://{PREVIEW_HOST}/")))?;

    let ctx = SeoContext::new(dir.path());
    assert_eq!(ctx.workspace()?.origin(), CANONICAL_ORIGIN);

    let report = verify_command(&ctx, VerifyTarget::Canonical, &InProcessRunner)?;
    assert!(!report.passed());
    assert!(report.has_failure("canonical-origin"));

    fs::write(build.join("index.html"), page(&format!("{CANONICAL_ORIGIN}/")))?;
    let report = verify_command(&ctx, VerifyTarget::Canonical, &InProcessRunner)?;
    assert!(report.passed(), "{:?}", report.failures());

    // An explicit settings origin is the only override.
    fs::write(
        dir.path().join("seo.yaml"),
        "site:\n  canonical_origin: https://staging.example.org\n",
    )?;
    assert_eq!(ctx.workspace()?.origin(), "https://staging.example.org");
    let report = verify_command(&ctx, VerifyTarget::Canonical, &InProcessRunner)?;
    assert!(report.has_failure("canonical-origin"));
    Ok(())
}
