// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Editorial and SEO checks over the markdown corpus.
//!
//! Per-post checks look at one file at a time; corpus checks (reference
//! closure, cluster sizes, brand coverage, keyword reuse) run once every
//! post has been read.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::LazyLock;

use cluster::config::{LOCATION_CLUSTER_TARGETS, MIN_PUBLISHABLE_POSTS};
use corpus::frontmatter::Frontmatter;
use corpus::inventory::parse_post_date;
use corpus::links::{
    LinkShape, blog_link_slug, extract_internal_links, location_link_id,
};
use corpus::site::{VALID_CATEGORIES, is_known_location};
use corpus::{markdown_files, parse_document, relative_slash_path};
use diagnostics::info_event;
use regex::Regex;

use crate::{Finding, Report, VerifyError, Workspace};

pub const EVENT_PREFIX: &str = "blog-validation";

/// Setting this to a truthy value turns warnings into failures.
pub const STRICT_ENV: &str = "BLOG_VALIDATE_STRICT_WARNINGS";

/// Brand spellings that must each appear in at least one keyword.
pub const BRAND_KEYWORD_FRAGMENTS: [&str; 3] = [
    "shri gajanan maharaj sansthan",
    "shree gajanan maharaj sansthan",
    "sri gajanan maharaj sansthan",
];

const MIN_BODY_CHARS: usize = 900;
const MIN_INTERNAL_LINKS: usize = 3;

static SLUG_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9]+(-[a-z0-9]+)*$").expect("valid slug regex"));

pub fn is_valid_slug(slug: &str) -> bool {
    SLUG_PATTERN.is_match(slug)
}

/// Strict when the flag is given or `BLOG_VALIDATE_STRICT_WARNINGS` is truthy.
pub fn strict_requested<F>(flag: bool, lookup: F) -> bool
where
    F: Fn(&str) -> Option<String>,
{
    flag || crate::is_truthy(lookup(STRICT_ENV).as_deref())
}

/// A post that parsed, kept for the corpus checks.
struct CheckedPost {
    relative_path: String,
    slug: String,
    frontmatter: Frontmatter,
    links: Vec<String>,
}

pub fn validate_content(ws: &Workspace, strict: bool) -> Result<Report, VerifyError> {
    let mut report = Report::new(EVENT_PREFIX);
    let files = markdown_files(&ws.blog_root)?;
    info_event!("blog-validation-start", {
        "blogRoot": ws.blog_root.display().to_string(),
        "markdownFileCount": files.len(),
        "strict": strict,
    });

    if files.is_empty() {
        report.fail("markdown-files", "No markdown files found under content/blog");
        return Ok(report);
    }

    let mut slug_registry: BTreeMap<String, String> = BTreeMap::new();
    let mut posts = Vec::with_capacity(files.len());
    for path in &files {
        let relative_path = relative_slash_path(&ws.blog_root, path);
        let raw = std::fs::read_to_string(path).map_err(|e| VerifyError::io(path, e))?;
        match parse_document(&raw) {
            Ok(document) => {
                let post = CheckedPost {
                    slug: document.frontmatter.slug().unwrap_or_default().to_string(),
                    links: extract_internal_links(&document.body),
                    relative_path,
                    frontmatter: document.frontmatter,
                };
                check_post(&post, &document.body, &mut slug_registry, &mut report);
                posts.push(post);
            }
            Err(e) => report.push(
                Finding::new("frontmatter-parse", format!("Invalid frontmatter: {e}"))
                    .file(relative_path),
            ),
        }
    }

    check_corpus(&posts, &slug_registry, &mut report);

    let mut category_counts: BTreeMap<String, usize> = BTreeMap::new();
    for post in &posts {
        let key = post.frontmatter.category().unwrap_or("uncategorized");
        *category_counts.entry(key.to_string()).or_default() += 1;
    }
    report.detail("totalPosts", posts.len());
    report.detail("categoryCounts", &category_counts);
    report.detail("strict", strict);

    if strict {
        report.promote_warnings();
    }
    Ok(report)
}

fn check_post(
    post: &CheckedPost,
    body: &str,
    slug_registry: &mut BTreeMap<String, String>,
    report: &mut Report,
) {
    let fm = &post.frontmatter;
    let error = |check: &str, reason: String| {
        Finding::new(check, reason)
            .file(post.relative_path.clone())
            .slug(post.slug.clone())
    };
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    for (field, value) in [
        ("title", fm.title()),
        ("description", fm.description()),
        ("slug", fm.slug()),
        ("date", fm.date()),
        ("category", fm.category()),
    ] {
        if value.is_none() {
            errors.push(error("frontmatter-field", format!("Missing frontmatter.{field}")));
        }
    }

    if let Some(slug) = fm.slug() {
        if !is_valid_slug(slug) {
            errors.push(error(
                "slug-format",
                format!("Invalid slug format \"{slug}\" (use lowercase kebab-case only)"),
            ));
        }
        match slug_registry.get(slug) {
            Some(existing) => errors.push(error(
                "slug-duplicate",
                format!("Duplicate slug \"{slug}\" also used in {existing}"),
            )),
            None => {
                _ = slug_registry.insert(slug.to_string(), post.relative_path.clone());
            }
        }
    }

    if let Some(date) = fm.date().filter(|date| parse_post_date(date).is_none()) {
        errors.push(error("date-format", format!("Invalid date format \"{date}\"")));
    }

    if fm.keywords.len() < 3 {
        warnings.push(error("keywords", "keywords should include at least 3 phrases".into()));
    }
    if fm.tags.len() < 2 {
        warnings.push(error("tags", "tags should include at least 2 entries".into()));
    }
    if let Some(category) = fm.category().filter(|c| !VALID_CATEGORIES.contains(c)) {
        warnings.push(error(
            "category",
            format!("category \"{category}\" not in recommended set"),
        ));
    }
    if fm.location_ids.is_empty() {
        warnings.push(error(
            "location-ids",
            "locationIds missing (recommended for location-intent SEO)".into(),
        ));
    }
    for id in &fm.location_ids {
        if !is_known_location(id) {
            errors.push(error("location-id-known", format!("Unknown locationId \"{id}\"")));
        }
    }
    if fm.related_slugs.len() < 2 {
        warnings.push(error(
            "related-slugs",
            "relatedSlugs should include at least 2 internal post slugs".into(),
        ));
    }
    if body.trim().chars().count() < MIN_BODY_CHARS {
        warnings.push(error(
            "thin-content",
            "content appears thin (<900 chars). Consider richer details.".into(),
        ));
    }

    let shape = LinkShape::of(&post.links);
    if shape.total < MIN_INTERNAL_LINKS {
        errors.push(error("internal-link-count", "At least 3 internal links are required".into()));
    }
    if shape.location == 0 {
        errors.push(error("location-link", "Missing required link to a /locations/* page".into()));
    }
    if shape.intent == 0 {
        errors.push(error("intent-link", "Missing required booking/contact intent link".into()));
    }
    if shape.blog == 0 {
        errors.push(error(
            "blog-link",
            "Missing required internal link to another /blog/* post".into(),
        ));
    }

    for finding in errors {
        report.push(finding);
    }
    for finding in warnings {
        report.warn(finding);
    }
}

fn check_corpus(posts: &[CheckedPost], slug_registry: &BTreeMap<String, String>, report: &mut Report) {
    let known_slugs: BTreeSet<&str> = slug_registry.keys().map(String::as_str).collect();

    for post in posts {
        let finding = |check: &str, reason: String| {
            Finding::new(check, reason)
                .file(post.relative_path.clone())
                .slug(post.slug.clone())
        };
        for related in &post.frontmatter.related_slugs {
            if !known_slugs.contains(related.as_str()) {
                report.push(finding(
                    "related-slug-resolves",
                    format!("relatedSlugs entry \"{related}\" does not match any post"),
                ));
            }
        }
        for link in &post.links {
            if blog_link_slug(link).is_some_and(|t| !known_slugs.contains(t)) {
                report.push(finding(
                    "blog-link-resolves",
                    format!("Internal blog link {link} does not match any post"),
                ));
            }
            if location_link_id(link).is_some_and(|id| !is_known_location(id)) {
                report.push(finding(
                    "location-link-known",
                    format!("Location link {link} does not match a known location page"),
                ));
            }
        }
    }

    if posts.len() < MIN_PUBLISHABLE_POSTS {
        report.fail(
            "publishable-count",
            format!(
                "Expected at least {MIN_PUBLISHABLE_POSTS} publishable posts but found {}",
                posts.len()
            ),
        );
    }

    for target in &LOCATION_CLUSTER_TARGETS {
        let namespace = target.namespace();
        let count = posts
            .iter()
            .filter(|post| post.relative_path.starts_with(&namespace))
            .count();
        if count == 0 {
            report.fail(
                "location-cluster-present",
                format!("Location cluster \"{}\" has no posts", target.key),
            );
        } else if count < target.expected {
            report.fail(
                "location-cluster-minimum",
                format!(
                    "Location cluster \"{}\" has {count} posts; minimum is {}",
                    target.key, target.expected
                ),
            );
        }
    }

    let keywords: Vec<String> = posts
        .iter()
        .flat_map(|post| post.frontmatter.keywords.iter())
        .map(|keyword| keyword.to_lowercase())
        .collect();
    for fragment in BRAND_KEYWORD_FRAGMENTS {
        if !keywords.iter().any(|keyword| keyword.contains(fragment)) {
            report.fail(
                "brand-keyword-coverage",
                format!("No post keyword contains the brand phrase \"{fragment}\""),
            );
        }
    }

    let mut primary: BTreeMap<String, Vec<&str>> = BTreeMap::new();
    for post in posts {
        if let Some(first) = post.frontmatter.keywords.first() {
            primary
                .entry(first.trim().to_lowercase())
                .or_default()
                .push(&post.relative_path);
        }
    }
    for (keyword, files) in primary.iter().filter(|(_, files)| files.len() > 1) {
        report.warn(Finding::new(
            "keyword-cannibalization",
            format!(
                "Primary keyword \"{keyword}\" is shared by {} posts: {}",
                files.len(),
                files.join(", ")
            ),
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug_pattern() {
        assert!(is_valid_slug("shegaon-travel-guide"));
        assert!(is_valid_slug("a1"));
        assert!(!is_valid_slug("Shegaon"));
        assert!(!is_valid_slug("double--dash"));
        assert!(!is_valid_slug("-leading"));
        assert!(!is_valid_slug(""));
    }

    #[test]
    fn test_strict_requested() {
        assert!(strict_requested(true, |_| None));
        assert!(strict_requested(false, |_| Some("TRUE".into())));
        assert!(!strict_requested(false, |_| Some("0".into())));
        assert!(!strict_requested(false, |_| None));
    }
}
