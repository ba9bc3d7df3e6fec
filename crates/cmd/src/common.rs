// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use std::env;
use std::path::{Path, PathBuf};

use anyhow::Result;
use corpus::SiteUrl;
use verify::Workspace;

use crate::config::{SETTINGS_FILE, SeoSettings};
use crate::error_utils::ErrorContext;

/// Get the workspace root with an optional override, falling back to the current directory
pub fn get_root_with_override(override_path: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(path) = override_path {
        return Ok(path);
    }
    env::current_dir().with_context_msg("Failed to determine current directory")
}

/// Resolve `path` against `root` unless it is already absolute.
pub fn resolve_under(root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}

/// Global command line settings shared by every command.
#[derive(Debug, Clone)]
pub struct SeoContext {
    pub root: PathBuf,
    pub build_dir: Option<PathBuf>,
    pub config: Option<PathBuf>,
}

impl SeoContext {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            build_dir: None,
            config: None,
        }
    }

    pub fn from_args(
        root: Option<PathBuf>,
        build_dir: Option<PathBuf>,
        config: Option<PathBuf>,
    ) -> Result<Self> {
        Ok(Self {
            root: get_root_with_override(root)?,
            build_dir,
            config,
        })
    }

    /// Settings from `--config`, or `seo.yaml` under the root when present.
    pub fn settings(&self) -> Result<SeoSettings> {
        match &self.config {
            Some(path) => SeoSettings::load(&resolve_under(&self.root, path), true),
            None => SeoSettings::load(&self.root.join(SETTINGS_FILE), false),
        }
    }

    /// Blog root for the generator: `flag` (which also carries
    /// `SEO_BLOG_GENERATOR_ROOT`), then settings, then the default layout.
    pub fn generator_root(&self, flag: Option<PathBuf>) -> Result<PathBuf> {
        if let Some(path) = flag {
            return Ok(resolve_under(&self.root, &path));
        }
        Ok(self.workspace()?.blog_root)
    }

    /// Build the verifier workspace. Command line flags win over settings,
    /// which win over the default layout.
    ///
    /// The origin is `site.canonical_origin` or the production origin. The
    /// deploy environment (`NEXT_PUBLIC_SITE_URL`, `VERCEL_URL`) is never
    /// consulted: a preview host must not pass as canonical.
    pub fn workspace(&self) -> Result<Workspace> {
        let settings = self.settings()?;
        let mut ws = Workspace::new(&self.root);

        let paths = &settings.paths;
        if let Some(path) = &paths.blog_root {
            ws.blog_root = resolve_under(&self.root, path);
        }
        if let Some(path) = &paths.build_dir {
            ws.build_dir = resolve_under(&self.root, path);
        }
        if let Some(path) = &paths.package_json {
            ws.package_json = resolve_under(&self.root, path);
        }
        if let Some(path) = &paths.ci_workflow {
            ws.ci_workflow = resolve_under(&self.root, path);
        }
        if let Some(path) = &self.build_dir {
            ws.build_dir = resolve_under(&self.root, path);
        }

        ws.site = settings
            .site
            .canonical_origin
            .as_deref()
            .filter(|origin| !origin.trim().is_empty())
            .map_or_else(SiteUrl::canonical, SiteUrl::new);
        Ok(ws)
    }
}
