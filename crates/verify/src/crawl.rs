// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Crawler-facing artifacts: the RSS feed and the robots policy.

use corpus::PostInventory;
use diagnostics::{WarnOnce, info_event};
use serde::Deserialize;

use crate::workspace::read_optional;
use crate::{Report, VerifyError, Workspace};

pub const FEED_BODY_RELATIVE: &str = "feed.xml.body";
pub const FEED_META_RELATIVE: &str = "feed.xml.meta";
pub const ROBOTS_BODY_RELATIVE: &str = "robots.txt.body";

/// Response metadata the build writes next to a prerendered route body.
#[derive(Debug, Clone, Deserialize)]
pub struct RouteMeta {
    #[serde(default)]
    pub status: Option<u16>,
}

/// The feed is RSS 2.0, links to itself and carries one item per post.
pub fn verify_rss(ws: &Workspace) -> Result<Report, VerifyError> {
    info_event!("rss-verify-start", {
        "blogRoot": ws.blog_root.display().to_string(),
        "feedPath": ws.build_path(FEED_BODY_RELATIVE).display().to_string(),
    });

    let mut warnings = WarnOnce::new();
    let expected = PostInventory::load(&ws.blog_root, &mut warnings)?.len();
    let xml = ws.read_artifact("Prerendered feed body", FEED_BODY_RELATIVE)?;
    let mut report = Report::new("rss-verify");

    let meta_path = ws.build_path(FEED_META_RELATIVE);
    if let Some(raw) = read_optional(&meta_path)? {
        let meta: RouteMeta = serde_json::from_str(&raw).map_err(|source| VerifyError::Json {
            path: meta_path.clone(),
            source,
        })?;
        let status = meta.status.unwrap_or(200);
        if status != 200 {
            report.fail(
                "feed-status",
                format!("Expected HTTP status 200 from feed handler, received {status}"),
            );
        }
    }

    if !xml.contains("<rss version=\"2.0\"") {
        report.fail("rss-root", "Missing RSS root element with version 2.0.");
    }
    if !xml.contains("<channel>") {
        report.fail("rss-channel", "Missing channel element in RSS feed.");
    }
    let self_link = ws.site.join("/feed.xml");
    if !xml.contains(&self_link) {
        report.fail(
            "atom-self-link",
            format!("Missing self-referencing atom link to {self_link}"),
        );
    }
    let items = xml.matches("<item>").count();
    if items != expected {
        report.fail(
            "item-count",
            format!("Feed item count mismatch. Expected {expected} items, found {items}."),
        );
    }

    report.detail("expectedPostCount", expected);
    report.detail("itemCount", items);
    Ok(report)
}

/// Directives every robots policy must contain for `origin`.
pub fn required_robots_lines(origin: &str) -> Vec<String> {
    vec![
        "User-Agent: *".into(),
        "Allow: /".into(),
        "Disallow: /api/".into(),
        "Disallow: /admin/".into(),
        "User-Agent: Googlebot-Image".into(),
        "Allow: /images/".into(),
        "Allow: /gallery/".into(),
        format!("Host: {origin}"),
        format!("Sitemap: {origin}/sitemap.xml"),
    ]
}

pub fn verify_robots(ws: &Workspace) -> Result<Report, VerifyError> {
    let path = ws.build_path(ROBOTS_BODY_RELATIVE);
    info_event!("robots-verify-start", { "robotsPath": path.display().to_string() });
    let content = ws.read_artifact("robots.txt build artifact", ROBOTS_BODY_RELATIVE)?;
    let lines: Vec<&str> = content.lines().map(str::trim).filter(|l| !l.is_empty()).collect();

    let mut report = Report::new("robots-verify");
    for required in required_robots_lines(ws.origin()) {
        if !lines.contains(&required.as_str()) {
            report.fail(
                "required-directive",
                format!("Missing required robots directive: \"{required}\""),
            );
        }
    }
    for (prefix, name) in [("Host: ", "Host"), ("Sitemap: ", "Sitemap")] {
        let count = lines.iter().filter(|line| line.starts_with(prefix)).count();
        if count != 1 {
            report.fail(
                "single-directive",
                format!("Expected exactly one {name} directive but found {count}."),
            );
        }
    }

    report.detail("directiveCount", lines.len());
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn workspace_with(files: &[(&str, &str)]) -> (tempfile::TempDir, Workspace) {
        let dir = tempfile::tempdir().unwrap();
        let ws = Workspace::new(dir.path());
        std::fs::create_dir_all(&ws.build_dir).unwrap();
        std::fs::create_dir_all(&ws.blog_root).unwrap();
        for (name, content) in files {
            std::fs::write(ws.build_path(name), content).unwrap();
        }
        (dir, ws)
    }

    fn robots(origin: &str) -> String {
        let mut text = required_robots_lines(origin).join("\n");
        text.push_str("\nDisallow: /_next/\n");
        text
    }

    #[test]
    fn test_robots_passes_with_required_lines() {
        let origin = corpus::CANONICAL_ORIGIN;
        let (_dir, ws) = workspace_with(&[(ROBOTS_BODY_RELATIVE, &robots(origin))]);
        let report = verify_robots(&ws).unwrap();
        assert!(report.passed(), "{:?}", report.failures());
    }

    #[test]
    fn test_robots_rejects_duplicate_host() {
        let origin = corpus::CANONICAL_ORIGIN;
        let body = format!("{}\nHost: https://example.com\n", robots(origin));
        let (_dir, ws) = workspace_with(&[(ROBOTS_BODY_RELATIVE, &body)]);
        let report = verify_robots(&ws).unwrap();
        assert!(report.has_failure("single-directive"));
        assert!(!report.has_failure("required-directive"));
    }

    #[test]
    fn test_rss_counts_items_and_status() {
        let body = format!(
            "<rss version=\"2.0\"><channel><atom:link href=\"{}/feed.xml\"/></channel></rss>",
            corpus::CANONICAL_ORIGIN
        );
        let (_dir, ws) = workspace_with(&[
            (FEED_BODY_RELATIVE, &body),
            (FEED_META_RELATIVE, r#"{"status":500,"headers":{}}"#),
        ]);
        let report = verify_rss(&ws).unwrap();
        assert!(report.has_failure("feed-status"));
        assert!(!report.has_failure("item-count"));
        assert!(!report.has_failure("atom-self-link"));
    }

    #[test]
    fn test_rss_missing_feed_is_fatal() {
        let (_dir, ws) = workspace_with(&[]);
        assert!(matches!(verify_rss(&ws), Err(VerifyError::ArtifactMissing { .. })));
    }
}
