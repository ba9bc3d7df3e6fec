// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! The set of publishable posts, as the site sees it.

use std::collections::BTreeSet;
use std::path::Path;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use diagnostics::WarnOnce;

use crate::frontmatter::{Frontmatter, parse_document};
use crate::site::paginated_page_count;
use crate::taxonomy::{fallback_slug, taxonomy_slug, title_case};
use crate::walk::{markdown_files, relative_slash_path};
use crate::CorpusError;

/// Parse the date formats accepted in frontmatter: `YYYY-MM-DD`,
/// RFC 3339, or `YYYY-MM-DD HH:MM:SS`.
pub fn parse_post_date(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0);
    }
    if let Ok(stamp) = DateTime::parse_from_rfc3339(value) {
        return Some(stamp.naive_utc());
    }
    NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S").ok()
}

/// One markdown post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    /// Path under the blog root with `/` separators.
    pub relative_path: String,
    /// Frontmatter slug, or the path-derived fallback.
    pub slug: String,
    pub frontmatter: Frontmatter,
    pub body: String,
}

impl Post {
    pub fn read(blog_root: &Path, path: &Path) -> Result<Self, CorpusError> {
        let relative_path = relative_slash_path(blog_root, path);
        let raw = std::fs::read_to_string(path).map_err(|e| CorpusError::io(path, e))?;
        let document = parse_document(&raw).map_err(|e| CorpusError::InvalidPost {
            path: relative_path.clone(),
            reason: e.to_string(),
        })?;
        let slug = document
            .frontmatter
            .slug()
            .map(str::to_string)
            .unwrap_or_else(|| fallback_slug(&relative_path));
        Ok(Self {
            relative_path,
            slug,
            frontmatter: document.frontmatter,
            body: document.body,
        })
    }

    pub fn title(&self) -> String {
        self.frontmatter
            .title()
            .map(str::to_string)
            .unwrap_or_else(|| title_case(&self.slug))
    }

    pub fn description(&self) -> String {
        if let Some(description) = self.frontmatter.description() {
            return description.to_string();
        }
        let flattened = self
            .body
            .replace(['#', '>', '*', '_', '`', '~', '-'], " ")
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ");
        flattened.chars().take(160).collect()
    }

    pub fn published(&self) -> Option<NaiveDateTime> {
        self.frontmatter.date().and_then(parse_post_date)
    }

    /// File stem of the relative path.
    pub fn file_stem(&self) -> &str {
        let name = self.relative_path.rsplit('/').next().unwrap_or(&self.relative_path);
        name.strip_suffix(".md").unwrap_or(name)
    }
}

/// All publishable posts, newest first.
#[derive(Debug, Clone, Default)]
pub struct PostInventory {
    posts: Vec<Post>,
}

impl PostInventory {
    /// Load every markdown post under `blog_root`. Posts whose frontmatter
    /// fails to parse are skipped and reported once through `warnings`.
    pub fn load(blog_root: &Path, warnings: &mut WarnOnce) -> Result<Self, CorpusError> {
        if !blog_root.exists() {
            _ = warnings.warn(
                "blog-root-missing",
                "blog-seo-warning",
                serde_json::json!({
                    "message": "Blog content directory missing",
                    "directoryPath": blog_root.display().to_string(),
                }),
            );
            return Ok(Self::default());
        }

        let mut posts = Vec::new();
        for path in markdown_files(blog_root)? {
            match Post::read(blog_root, &path) {
                Ok(post) => posts.push(post),
                Err(CorpusError::InvalidPost { path, reason }) => {
                    _ = warnings.warn(
                        &format!("invalid-post:{path}"),
                        "blog-seo-warning",
                        serde_json::json!({
                            "message": "Skipping post with malformed frontmatter",
                            "file": path,
                            "reason": reason,
                        }),
                    );
                }
                Err(other) => return Err(other),
            }
        }
        Ok(Self::from_posts(posts))
    }

    pub fn from_posts(mut posts: Vec<Post>) -> Self {
        posts.sort_by(|a, b| {
            b.published()
                .cmp(&a.published())
                .then_with(|| a.slug.cmp(&b.slug))
        });
        Self { posts }
    }

    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    pub fn slugs(&self) -> BTreeSet<String> {
        self.posts.iter().map(|post| post.slug.clone()).collect()
    }

    /// Archive slugs for every tag in the corpus.
    pub fn tag_slugs(&self) -> BTreeSet<String> {
        self.posts
            .iter()
            .flat_map(|post| post.frontmatter.tags.iter())
            .map(|tag| taxonomy_slug(tag))
            .filter(|slug| !slug.is_empty())
            .collect()
    }

    /// Archive slugs for every category in the corpus.
    pub fn category_slugs(&self) -> BTreeSet<String> {
        self.posts
            .iter()
            .filter_map(|post| post.frontmatter.category())
            .map(taxonomy_slug)
            .filter(|slug| !slug.is_empty())
            .collect()
    }

    pub fn paginated_page_count(&self) -> usize {
        paginated_page_count(self.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(slug: &str, date: &str, tags: &[&str], category: &str) -> Post {
        Post {
            relative_path: format!("guides/{slug}.md"),
            slug: slug.to_string(),
            frontmatter: Frontmatter {
                date: Some(date.to_string()),
                tags: tags.iter().map(|t| t.to_string()).collect(),
                category: Some(category.to_string()),
                ..Default::default()
            },
            body: "## Hello - world".to_string(),
        }
    }

    #[test]
    fn test_parse_post_date() {
        assert!(parse_post_date("2026-02-15").is_some());
        assert!(parse_post_date("2026-02-15T10:00:00Z").is_some());
        assert!(parse_post_date("2026-02-15 10:00:00").is_some());
        assert!(parse_post_date("15/02/2026").is_none());
        assert!(parse_post_date("2026-02-30").is_none());
    }

    #[test]
    fn test_newest_first_then_slug() {
        let inventory = PostInventory::from_posts(vec![
            post("b", "2026-01-01", &[], "guides"),
            post("a", "2026-01-01", &[], "guides"),
            post("c", "2026-02-01", &[], "guides"),
        ]);
        let order: Vec<&str> = inventory.posts().iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(order, vec!["c", "a", "b"]);
    }

    #[test]
    fn test_taxonomy_sets() {
        let inventory = PostInventory::from_posts(vec![
            post("a", "2026-01-01", &["Shegaon", "Travel & Stay"], "Guides"),
            post("b", "2026-01-02", &["shegaon"], "events"),
        ]);
        let tags: Vec<String> = inventory.tag_slugs().into_iter().collect();
        assert_eq!(tags, vec!["shegaon", "travel-and-stay"]);
        let categories: Vec<String> = inventory.category_slugs().into_iter().collect();
        assert_eq!(categories, vec!["events", "guides"]);
    }

    #[test]
    fn test_fallbacks() {
        let p = post("devotee-faqs", "2026-01-01", &[], "guides");
        assert_eq!(p.title(), "Devotee Faqs");
        assert_eq!(p.description(), "Hello world");
        assert_eq!(p.file_stem(), "devotee-faqs");
    }
}
