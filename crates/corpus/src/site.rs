// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Site-wide constants and canonical URL resolution.

/// The single authoritative scheme+host for canonical links.
pub const CANONICAL_ORIGIN: &str = "https://www.shrigajananmaharajsanstan.com";

/// Blog root relative to the workspace.
pub const BLOG_ROOT_RELATIVE: &str = "content/blog";

/// Prerendered app output relative to the workspace.
pub const BUILD_APP_RELATIVE: &str = ".next/server/app";

pub const BLOG_POSTS_PER_PAGE: usize = 24;

/// Top-level routes listed in the sitemap before locations and posts.
pub const STATIC_ROUTES: [&str; 10] = [
    "/",
    "/booking",
    "/locations",
    "/blog",
    "/about",
    "/contact",
    "/privacy-policy",
    "/terms-conditions",
    "/refund-policy",
    "/disclaimer",
];

pub const STATIC_ROUTE_COUNT: usize = STATIC_ROUTES.len();

/// Sansthan location pages, in listing order.
pub const KNOWN_LOCATION_IDS: [&str; 6] = [
    "shegaon-bhakt-niwas",
    "shegaon-anand-vihar",
    "shegaon-visawa",
    "pandharpur-math",
    "trimbakeshwar",
    "omkareshwar",
];

pub const LOCATION_ROUTE_COUNT: usize = KNOWN_LOCATION_IDS.len();

pub const VALID_CATEGORIES: [&str; 4] = ["locations", "guides", "spiritual", "events"];

pub fn is_known_location(id: &str) -> bool {
    KNOWN_LOCATION_IDS.contains(&id)
}

/// Number of listing pages for `post_count` posts (the index counts as page 1).
pub fn listing_page_count(post_count: usize) -> usize {
    post_count.div_ceil(BLOG_POSTS_PER_PAGE).max(1)
}

/// Listing pages beyond the index: `/blog/page/2 ..= /blog/page/N`.
pub fn paginated_page_count(post_count: usize) -> usize {
    post_count.div_ceil(BLOG_POSTS_PER_PAGE).saturating_sub(1)
}

/// Add `https://` when no scheme is given and drop trailing slashes.
pub fn normalize_origin(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    let with_scheme = if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    };
    Some(with_scheme.trim_end_matches('/').to_string())
}

/// Resolved public origin of the site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteUrl {
    origin: String,
}

impl SiteUrl {
    pub fn new(origin: &str) -> Self {
        Self {
            origin: normalize_origin(origin).unwrap_or_else(|| CANONICAL_ORIGIN.to_string()),
        }
    }

    pub fn canonical() -> Self {
        Self::new(CANONICAL_ORIGIN)
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Absolute URL for a root-relative `path`.
    pub fn join(&self, path: &str) -> String {
        if path.is_empty() || path == "/" {
            return format!("{}/", self.origin);
        }
        if path.starts_with('/') {
            format!("{}{}", self.origin, path)
        } else {
            format!("{}/{}", self.origin, path)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_counts() {
        assert_eq!(paginated_page_count(0), 0);
        assert_eq!(paginated_page_count(24), 0);
        assert_eq!(paginated_page_count(25), 1);
        assert_eq!(paginated_page_count(110), 4);
        assert_eq!(listing_page_count(0), 1);
        assert_eq!(listing_page_count(110), 5);
    }

    #[test]
    fn test_normalize_origin() {
        assert_eq!(normalize_origin("example.org/"), Some("https://example.org".into()));
        assert_eq!(normalize_origin(" http://a.test// "), Some("http://a.test".into()));
        assert_eq!(normalize_origin("   "), None);
    }

    #[test]
    fn test_join() {
        let url = SiteUrl::canonical();
        assert_eq!(url.join("/"), format!("{CANONICAL_ORIGIN}/"));
        assert_eq!(url.join("/blog/a"), format!("{CANONICAL_ORIGIN}/blog/a"));
        assert_eq!(url.join("feed.xml"), format!("{CANONICAL_ORIGIN}/feed.xml"));
    }
}
