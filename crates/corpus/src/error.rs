// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("IO error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Directory walk failed: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("Unterminated frontmatter block (missing closing ---)")]
    UnterminatedFrontmatter,

    #[error("Malformed frontmatter: {0}")]
    Frontmatter(#[from] serde_yaml_ng::Error),

    #[error("Malformed frontmatter in {path}: {reason}")]
    InvalidPost { path: String, reason: String },
}

impl CorpusError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
