// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use std::path::PathBuf;

use cluster::ClusterError;
use corpus::CorpusError;

/// Conditions that stop a verifier outright. Content problems are never
/// errors; they are collected as [`crate::Finding`]s.
#[derive(Debug, thiserror::Error)]
pub enum VerifyError {
    #[error("{what} not found at {path}. Run the build first.")]
    ArtifactMissing { what: &'static str, path: PathBuf },

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("request to {url} failed: {reason}")]
    Http { url: String, reason: String },

    #[error("generator run failed: {0}")]
    Generator(String),

    #[error(transparent)]
    Corpus(#[from] CorpusError),

    #[error(transparent)]
    Cluster(#[from] ClusterError),
}

impl VerifyError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn missing(what: &'static str, path: impl Into<PathBuf>) -> Self {
        Self::ArtifactMissing {
            what,
            path: path.into(),
        }
    }
}
