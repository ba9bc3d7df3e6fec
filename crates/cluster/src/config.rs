// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Cluster sizing contract shared by the generator and every verifier.
//!
//! Change cluster sizes here first. The fingerprint recorded in the
//! manifest is derived from these numbers, so a resized cluster makes the
//! old manifest fail verification until the generator is re-run.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::ClusterError;
use crate::manifest::sha256_hex;

/// What a cluster's posts are about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ClusterKind {
    Location,
    Guides,
    Spiritual,
    Events,
}

impl ClusterKind {
    /// Frontmatter category shared by every post in the cluster.
    pub fn category(self) -> &'static str {
        match self {
            ClusterKind::Location => "locations",
            ClusterKind::Guides => "guides",
            ClusterKind::Spiritual => "spiritual",
            ClusterKind::Events => "events",
        }
    }
}

/// A named bucket of generated posts and its exact expected size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClusterTarget {
    pub key: &'static str,
    pub kind: ClusterKind,
    pub expected: usize,
}

impl ClusterTarget {
    const fn location(key: &'static str, expected: usize) -> Self {
        Self {
            key,
            kind: ClusterKind::Location,
            expected,
        }
    }

    /// Directory under the blog root, with a trailing slash.
    pub fn namespace(&self) -> String {
        match self.kind {
            ClusterKind::Location => format!("locations/{}/", self.key),
            other => format!("{}/", other.category()),
        }
    }

    pub fn is_location(&self) -> bool {
        self.kind == ClusterKind::Location
    }
}

pub const LOCATION_CLUSTER_TARGETS: [ClusterTarget; 4] = [
    ClusterTarget::location("shegaon", 30),
    ClusterTarget::location("omkareshwar", 20),
    ClusterTarget::location("pandharpur", 15),
    ClusterTarget::location("trimbakeshwar", 15),
];

pub const NON_LOCATION_CLUSTER_TARGETS: [ClusterTarget; 3] = [
    ClusterTarget {
        key: "guides",
        kind: ClusterKind::Guides,
        expected: 15,
    },
    ClusterTarget {
        key: "spiritual",
        kind: ClusterKind::Spiritual,
        expected: 5,
    },
    ClusterTarget {
        key: "events",
        kind: ClusterKind::Events,
        expected: 5,
    },
];

/// Every cluster, locations first, in generation order.
pub const CLUSTER_TARGETS: [ClusterTarget; 7] = [
    LOCATION_CLUSTER_TARGETS[0],
    LOCATION_CLUSTER_TARGETS[1],
    LOCATION_CLUSTER_TARGETS[2],
    LOCATION_CLUSTER_TARGETS[3],
    NON_LOCATION_CLUSTER_TARGETS[0],
    NON_LOCATION_CLUSTER_TARGETS[1],
    NON_LOCATION_CLUSTER_TARGETS[2],
];

const fn sum_targets(targets: &[ClusterTarget]) -> usize {
    let mut total = 0;
    let mut i = 0;
    while i < targets.len() {
        total += targets[i].expected;
        i += 1;
    }
    total
}

pub const EXPECTED_GENERATED_TOTAL: usize = sum_targets(&CLUSTER_TARGETS);

/// Manifest schema version written and accepted.
pub const MANIFEST_VERSION: u64 = 2;

/// Manifest location relative to the blog root.
pub const MANIFEST_RELATIVE_PATH: &str = "_ops/generated-seo-cluster-manifest.json";

/// Hand-authored anchor posts at the blog root. The generator never owns them.
pub const MANUAL_SEED_POST_PATHS: [&str; 5] = [
    "shegaon-travel-guide.md",
    "shegaon-accommodation-guide.md",
    "nearby-places-from-shegaon.md",
    "omkareshwar-darshan-timings.md",
    "welcome-to-sansthan.md",
];

/// Minimum publishable posts the content validator accepts.
pub const MIN_PUBLISHABLE_POSTS: usize = 100;

pub fn location_target(key: &str) -> Option<&'static ClusterTarget> {
    LOCATION_CLUSTER_TARGETS.iter().find(|target| target.key == key)
}

pub fn target(key: &str) -> Option<&'static ClusterTarget> {
    CLUSTER_TARGETS.iter().find(|target| target.key == key)
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FingerprintPayload {
    location_cluster_targets: BTreeMap<&'static str, usize>,
    non_location_cluster_targets: BTreeMap<&'static str, usize>,
    expected_generated_total: usize,
}

/// SHA-256 (hex, first 16 chars) of the full target payload.
pub fn config_fingerprint() -> Result<String, ClusterError> {
    let payload = FingerprintPayload {
        location_cluster_targets: LOCATION_CLUSTER_TARGETS
            .iter()
            .map(|t| (t.key, t.expected))
            .collect(),
        non_location_cluster_targets: NON_LOCATION_CLUSTER_TARGETS
            .iter()
            .map(|t| (t.key, t.expected))
            .collect(),
        expected_generated_total: EXPECTED_GENERATED_TOTAL,
    };
    let json = serde_json::to_string(&payload)?;
    let mut digest = sha256_hex(json.as_bytes());
    digest.truncate(16);
    Ok(digest)
}
