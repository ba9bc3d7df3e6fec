// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use std::path::PathBuf;

use corpus::CorpusError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClusterError {
    #[error("Cluster configuration contract violated: {0}")]
    ConfigContract(String),

    #[error("Cluster \"{cluster}\" produced {actual} posts, expected {expected}")]
    ClusterCount {
        cluster: String,
        expected: usize,
        actual: usize,
    },

    #[error("Generated total {actual} does not match expected {expected}")]
    TotalMismatch { expected: usize, actual: usize },

    #[error("Manifest entry escapes the blog root: {0}")]
    PathEscape(String),

    #[error("Unable to parse manifest {path}: {source}")]
    ManifestParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{0}")]
    Template(String),

    #[error("IO error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Corpus(#[from] CorpusError),
}

impl ClusterError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
