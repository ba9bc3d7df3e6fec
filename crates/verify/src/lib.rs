// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! # Verify: the SEO quality gate
//!
//! Each verifier checks one narrow property of the corpus, the generator
//! output, the repository wiring or the prerendered build, and returns a
//! [`Report`]. Content problems are findings in the report; only missing
//! inputs and I/O failures are [`VerifyError`]s.
//!
//! | verifier | reads |
//! |---|---|
//! | [`content::validate_content`] | markdown corpus |
//! | [`manifest::verify_manifest`], [`manifest::verify_distribution`] | manifest + generated tree |
//! | [`determinism::verify_determinism`] | a scratch generator run |
//! | [`seeds::verify_manual_seeds`] | hand-written anchor posts |
//! | [`surfaces`], [`routes`], [`crawl`] | prerendered build output |
//! | [`redirects::verify_live_redirects`] | the deployed site (opt-in) |
//! | [`chain`] | `package.json`, CI workflow, blog README |

pub mod chain;
pub mod content;
pub mod crawl;
pub mod determinism;
mod error;
pub mod html;
pub mod manifest;
pub mod redirects;
pub mod render;
pub mod report;
pub mod routes;
pub mod seeds;
pub mod surfaces;
pub mod workspace;

pub use determinism::{GeneratorRunner, InProcessRunner, SubprocessRunner};
pub use error::VerifyError;
pub use redirects::{HopFetcher, HttpHopFetcher};
pub use render::{Artifacts, write_artifacts};
pub use report::{Finding, Report};
pub use workspace::Workspace;

const TRUTHY_VALUES: [&str; 4] = ["1", "true", "yes", "on"];

/// Whether an environment flag is set to `1`, `true`, `yes` or `on`.
pub fn is_truthy(value: Option<&str>) -> bool {
    value.is_some_and(|v| {
        let v = v.trim().to_ascii_lowercase();
        TRUTHY_VALUES.contains(&v.as_str())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_truthy() {
        assert!(is_truthy(Some("true")));
        assert!(is_truthy(Some(" YES ")));
        assert!(is_truthy(Some("1")));
        assert!(!is_truthy(Some("0")));
        assert!(!is_truthy(Some("")));
        assert!(!is_truthy(None));
    }
}
