// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! The generator's record of exactly which files it owns.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::config::{MANIFEST_VERSION, config_fingerprint};
use crate::ClusterError;

pub fn sha256_hex(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

/// `content/blog/_ops/generated-seo-cluster-manifest.json`
///
/// No timestamp: two runs with the same configuration must produce the
/// same bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    pub manifest_version: u64,
    pub config_fingerprint: String,
    pub generated_file_count: usize,
    /// Sorted, deduplicated paths relative to the blog root.
    pub generated_files: Vec<String>,
    pub generated_file_checksums: BTreeMap<String, String>,
}

impl Manifest {
    /// Build a manifest for the current configuration from path -> checksum.
    pub fn from_checksums(checksums: BTreeMap<String, String>) -> Result<Self, ClusterError> {
        let generated_files: Vec<String> = checksums.keys().cloned().collect();
        Ok(Self {
            manifest_version: MANIFEST_VERSION,
            config_fingerprint: config_fingerprint()?,
            generated_file_count: generated_files.len(),
            generated_files,
            generated_file_checksums: checksums,
        })
    }

    /// Read a manifest; `Ok(None)` when the file does not exist.
    pub fn read(path: &Path) -> Result<Option<Self>, ClusterError> {
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(ClusterError::io(path, e)),
        };
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|source| ClusterError::ManifestParse {
                path: path.to_path_buf(),
                source,
            })
    }

    pub fn to_json(&self) -> Result<String, ClusterError> {
        Ok(format!("{}\n", serde_json::to_string_pretty(self)?))
    }

    pub fn write(&self, path: &Path) -> Result<(), ClusterError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ClusterError::io(parent, e))?;
        }
        std::fs::write(path, self.to_json()?).map_err(|e| ClusterError::io(path, e))
    }

    /// Compare `self` (a fresh run) against `expected` (the live manifest).
    pub fn diff(&self, expected: &Manifest) -> ManifestDiff {
        let mut sorted_self = self.generated_files.clone();
        sorted_self.sort();
        let mut sorted_expected = expected.generated_files.clone();
        sorted_expected.sort();

        let missing_keys = expected
            .generated_file_checksums
            .keys()
            .filter(|key| !self.generated_file_checksums.contains_key(*key))
            .cloned()
            .collect();
        let extra_keys = self
            .generated_file_checksums
            .keys()
            .filter(|key| !expected.generated_file_checksums.contains_key(*key))
            .cloned()
            .collect();
        let checksum_mismatches = self
            .generated_file_checksums
            .iter()
            .filter(|(key, sum)| {
                expected
                    .generated_file_checksums
                    .get(*key)
                    .is_some_and(|other| other != *sum)
            })
            .map(|(key, _)| key.clone())
            .collect();

        ManifestDiff {
            version: (self.manifest_version != expected.manifest_version)
                .then_some((self.manifest_version, expected.manifest_version)),
            fingerprint: (self.config_fingerprint != expected.config_fingerprint).then(|| {
                (
                    self.config_fingerprint.clone(),
                    expected.config_fingerprint.clone(),
                )
            }),
            file_count: (self.generated_file_count != expected.generated_file_count)
                .then_some((self.generated_file_count, expected.generated_file_count)),
            file_list_differs: sorted_self != sorted_expected,
            missing_keys,
            extra_keys,
            checksum_mismatches,
        }
    }
}

/// Differences between two manifests, as `(actual, expected)` pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManifestDiff {
    pub version: Option<(u64, u64)>,
    pub fingerprint: Option<(String, String)>,
    pub file_count: Option<(usize, usize)>,
    pub file_list_differs: bool,
    /// Keys in the expected checksum map but not the actual one.
    pub missing_keys: Vec<String>,
    pub extra_keys: Vec<String>,
    pub checksum_mismatches: Vec<String>,
}

impl ManifestDiff {
    pub fn is_identical(&self) -> bool {
        self.version.is_none()
            && self.fingerprint.is_none()
            && self.file_count.is_none()
            && !self.file_list_differs
            && self.missing_keys.is_empty()
            && self.extra_keys.is_empty()
            && self.checksum_mismatches.is_empty()
    }
}
