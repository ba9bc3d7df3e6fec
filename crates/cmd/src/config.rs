// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Optional repository settings, parsed from `seo.yaml` at the workspace root.

use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::error_utils::ErrorContext;

/// Default settings file name, looked up under the workspace root.
pub const SETTINGS_FILE: &str = "seo.yaml";

/// Repository settings.
///
/// ```yaml
/// site:
///   canonical_origin: "https://www.shrigajananmaharajsanstan.com"
///
/// paths:
///   blog_root: "content/blog"
///   build_dir: ".next/server/app"
///   package_json: "package.json"
///   ci_workflow: ".github/workflows/seo-quality-gate.yml"
/// ```
///
/// Every key is optional. Relative paths resolve against the workspace root.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SeoSettings {
    #[serde(default)]
    pub site: SiteSettings,
    #[serde(default)]
    pub paths: PathSettings,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SiteSettings {
    #[serde(default)]
    pub canonical_origin: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PathSettings {
    #[serde(default)]
    pub blog_root: Option<PathBuf>,
    #[serde(default)]
    pub build_dir: Option<PathBuf>,
    #[serde(default)]
    pub package_json: Option<PathBuf>,
    #[serde(default)]
    pub ci_workflow: Option<PathBuf>,
}

impl SeoSettings {
    pub fn parse(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml_ng::from_str(yaml).with_context_msg("Invalid SEO settings")
    }

    /// Read `path`. A missing file is only an error when `required`.
    pub fn load(path: &Path, required: bool) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(raw) => {
                log::debug!("loaded SEO settings from {}", path.display());
                Self::parse(&raw).with_context_fmt("Failed to parse", &path.display())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound && !required => Ok(Self::default()),
            Err(e) => Err(e).file_context("read settings", &path.display().to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_full_settings() {
        let yaml = r#"
site:
  canonical_origin: "https://staging.example.org/"

paths:
  blog_root: "content/blog"
  build_dir: "out/app"
  package_json: "web/package.json"
  ci_workflow: ".github/workflows/seo.yml"
"#;
        let settings = SeoSettings::parse(yaml).unwrap();
        assert_eq!(
            settings.site.canonical_origin.as_deref(),
            Some("https://staging.example.org/")
        );
        assert_eq!(settings.paths.build_dir, Some(PathBuf::from("out/app")));
        assert_eq!(settings.paths.package_json, Some(PathBuf::from("web/package.json")));
    }

    #[test]
    fn parse_empty_settings() {
        assert_eq!(SeoSettings::parse("").unwrap(), SeoSettings::default());
        let settings = SeoSettings::parse("paths:\n  build_dir: build\n").unwrap();
        assert!(settings.site.canonical_origin.is_none());
        assert_eq!(settings.paths.build_dir, Some(PathBuf::from("build")));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = SeoSettings::parse("paths:\n  blog: content\n").unwrap_err();
        assert!(err.to_string().contains("Invalid SEO settings"));
    }

    #[test]
    fn missing_file_is_optional_unless_required() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE);
        assert_eq!(SeoSettings::load(&path, false).unwrap(), SeoSettings::default());
        assert!(SeoSettings::load(&path, true).is_err());
    }
}
