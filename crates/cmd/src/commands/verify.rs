// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use anyhow::Result;
use clap::ValueEnum;
use verify::chain::{verify_ci_gate, verify_command_chain, verify_docs_sync};
use verify::crawl::{verify_robots, verify_rss};
use verify::determinism::verify_determinism;
use verify::manifest::{verify_distribution, verify_manifest};
use verify::redirects::verify_live_redirects;
use verify::routes::{verify_pagination, verify_sitemap, verify_taxonomy};
use verify::seeds::verify_manual_seeds;
use verify::surfaces::{verify_blog_posts, verify_canonical, verify_locations, verify_seo_build};
use verify::{GeneratorRunner, HttpHopFetcher, Report, VerifyError, Workspace};

use crate::common::SeoContext;
use crate::error_utils::ErrorContext;

/// One named verifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum VerifyTarget {
    /// Live manifest structure and the generated files it lists
    Manifest,
    /// Generated files per cluster against the configured targets
    Distribution,
    /// A fresh generator run reproduces the live manifest
    Determinism,
    /// Hand-written anchor posts
    ManualSeeds,
    /// Canonical links on every prerendered SEO page
    Canonical,
    /// Signals and structured data on the key routes
    SeoBuild,
    /// Prerendered surface of every blog post
    BlogPosts,
    /// Location pages carry canonical, geo meta and schema types
    Locations,
    /// Tag, category and pagination archives were prerendered
    Taxonomy,
    /// Sitemap lists every expected URL
    Sitemap,
    /// Blog index and page archives link to each other
    Pagination,
    /// RSS feed structure and item count
    Rss,
    /// robots.txt policy
    Robots,
    /// Deployed host redirects (opt-in)
    LiveRedirects,
    /// package.json quality gate chains
    CommandChain,
    /// CI workflow runs the strict gate
    CiGate,
    /// Blog README matches the corpus
    DocsSync,
}

impl VerifyTarget {
    /// Event prefix of the verifier's report.
    pub fn event_prefix(self) -> &'static str {
        match self {
            Self::Manifest => "generator-manifest-verify",
            Self::Distribution => "generator-distribution-verify",
            Self::Determinism => "generator-determinism-verify",
            Self::ManualSeeds => "manual-seed-verify",
            Self::Canonical => "canonical-verify",
            Self::SeoBuild => "seo-build-verify",
            Self::BlogPosts => "blog-post-surfaces-verify",
            Self::Locations => "location-seo-verify",
            Self::Taxonomy => "taxonomy-verify",
            Self::Sitemap => "sitemap-verify",
            Self::Pagination => "blog-pagination-verify",
            Self::Rss => "rss-verify",
            Self::Robots => "robots-verify",
            Self::LiveRedirects => "live-redirect-verify",
            Self::CommandChain => "seo-command-chain-verify",
            Self::CiGate => "ci-seo-gate-verify",
            Self::DocsSync => "seo-docs-sync-verify",
        }
    }

    /// Command line name, e.g. `manual-seeds`.
    pub fn name(self) -> String {
        self.to_possible_value()
            .map(|value| value.get_name().to_string())
            .unwrap_or_else(|| format!("{self:?}"))
    }
}

/// Run one verifier against `ws`. Only `Determinism` uses `runner`.
pub fn run_verifier(
    ws: &Workspace,
    target: VerifyTarget,
    runner: &dyn GeneratorRunner,
) -> Result<Report, VerifyError> {
    match target {
        VerifyTarget::Manifest => verify_manifest(ws),
        VerifyTarget::Distribution => verify_distribution(ws),
        VerifyTarget::Determinism => verify_determinism(ws, runner),
        VerifyTarget::ManualSeeds => verify_manual_seeds(ws),
        VerifyTarget::Canonical => verify_canonical(ws),
        VerifyTarget::SeoBuild => verify_seo_build(ws),
        VerifyTarget::BlogPosts => verify_blog_posts(ws),
        VerifyTarget::Locations => verify_locations(ws),
        VerifyTarget::Taxonomy => verify_taxonomy(ws),
        VerifyTarget::Sitemap => verify_sitemap(ws),
        VerifyTarget::Pagination => verify_pagination(ws),
        VerifyTarget::Rss => verify_rss(ws),
        VerifyTarget::Robots => verify_robots(ws),
        VerifyTarget::LiveRedirects => verify_live_redirects(|name| std::env::var(name).ok(), HttpHopFetcher::new),
        VerifyTarget::CommandChain => verify_command_chain(ws),
        VerifyTarget::CiGate => verify_ci_gate(ws),
        VerifyTarget::DocsSync => verify_docs_sync(ws),
    }
}

/// Run and log one verifier.
pub fn verify_command(
    ctx: &SeoContext,
    target: VerifyTarget,
    runner: &dyn GeneratorRunner,
) -> Result<Report> {
    let ws = ctx.workspace()?;
    let report = run_verifier(&ws, target, runner).verify_context(&target.name())?;
    report.log();
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_names_are_kebab_case() {
        assert_eq!(VerifyTarget::ManualSeeds.name(), "manual-seeds");
        assert_eq!(VerifyTarget::SeoBuild.name(), "seo-build");
        assert_eq!(VerifyTarget::CiGate.name(), "ci-gate");
        assert_eq!(
            VerifyTarget::from_str("live-redirects", false).unwrap(),
            VerifyTarget::LiveRedirects
        );
    }

    #[test]
    fn test_every_target_has_a_distinct_prefix() {
        let prefixes: std::collections::BTreeSet<&str> = VerifyTarget::value_variants()
            .iter()
            .map(|target| target.event_prefix())
            .collect();
        assert_eq!(prefixes.len(), VerifyTarget::value_variants().len());
        assert!(prefixes.iter().all(|p| p.ends_with("-verify")));
    }
}
