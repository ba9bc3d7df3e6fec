// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! # Cluster: deterministic SEO content generation
//!
//! [`config`] is the single point of truth for how many posts each cluster
//! holds. [`Generator`] turns that contract plus the topic tables into
//! markdown files under the blog root and records exactly what it wrote in
//! a [`Manifest`], so the next run can remove its own output and the
//! verifiers can check the tree against it.

pub mod config;
mod error;
pub mod generator;
pub mod manifest;
pub mod related;
pub mod templates;
pub mod topics;

pub use config::{
    CLUSTER_TARGETS, ClusterKind, ClusterTarget, EXPECTED_GENERATED_TOTAL, config_fingerprint,
};
pub use error::ClusterError;
pub use generator::{GeneratedPost, GenerationSummary, Generator, plan_posts, validate_config};
pub use manifest::{Manifest, ManifestDiff, sha256_hex};
