// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Where the verifiers look for their inputs.

use std::path::{Path, PathBuf};

use corpus::SiteUrl;
use corpus::site::{BLOG_ROOT_RELATIVE, BUILD_APP_RELATIVE};

use crate::VerifyError;

pub const PACKAGE_JSON_RELATIVE: &str = "package.json";
pub const CI_WORKFLOW_RELATIVE: &str = ".github/workflows/seo-quality-gate.yml";

/// Resolved locations of the blog, the build output and the repository
/// files the verifiers read, plus the origin every URL must live under.
#[derive(Debug, Clone)]
pub struct Workspace {
    pub root: PathBuf,
    pub blog_root: PathBuf,
    pub build_dir: PathBuf,
    pub package_json: PathBuf,
    pub ci_workflow: PathBuf,
    pub site: SiteUrl,
}

impl Workspace {
    /// Default layout under `root`, with the production origin.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            blog_root: root.join(BLOG_ROOT_RELATIVE),
            build_dir: root.join(BUILD_APP_RELATIVE),
            package_json: root.join(PACKAGE_JSON_RELATIVE),
            ci_workflow: root.join(CI_WORKFLOW_RELATIVE),
            site: SiteUrl::canonical(),
            root,
        }
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.blog_root.join(cluster::config::MANIFEST_RELATIVE_PATH)
    }

    pub fn origin(&self) -> &str {
        self.site.origin()
    }

    /// Path of a build artifact relative to the build directory.
    pub fn build_path(&self, relative: &str) -> PathBuf {
        self.build_dir.join(relative)
    }

    /// Fail unless the build directory exists.
    pub fn require_build(&self) -> Result<(), VerifyError> {
        if self.build_dir.is_dir() {
            Ok(())
        } else {
            Err(VerifyError::missing("Build output directory", &self.build_dir))
        }
    }

    /// Read a build artifact that must exist.
    pub fn read_artifact(&self, what: &'static str, relative: &str) -> Result<String, VerifyError> {
        read_required(what, &self.build_path(relative))
    }
}

pub(crate) fn read_required(what: &'static str, path: &Path) -> Result<String, VerifyError> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(content),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(VerifyError::missing(what, path)),
        Err(e) => Err(VerifyError::io(path, e)),
    }
}

/// Read a file, treating absence as `None`.
pub(crate) fn read_optional(path: &Path) -> Result<Option<String>, VerifyError> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(VerifyError::io(path, e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_layout() {
        let ws = Workspace::new("/repo");
        assert_eq!(ws.blog_root, PathBuf::from("/repo/content/blog"));
        assert_eq!(ws.build_dir, PathBuf::from("/repo/.next/server/app"));
        assert_eq!(
            ws.manifest_path(),
            PathBuf::from("/repo/content/blog/_ops/generated-seo-cluster-manifest.json")
        );
        assert_eq!(ws.origin(), "https://www.shrigajananmaharajsanstan.com");
    }

    #[test]
    fn test_missing_build_is_actionable() {
        let dir = tempfile::tempdir().unwrap();
        let ws = Workspace::new(dir.path());
        let err = ws.require_build().unwrap_err();
        assert!(err.to_string().contains("Run the build first"));
        assert!(matches!(
            ws.read_artifact("Sitemap XML body", "sitemap.xml.body"),
            Err(VerifyError::ArtifactMissing { .. })
        ));
    }
}
