// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Internal markdown links (`[label](/path)`) and their classification.

use std::sync::LazyLock;

use regex::Regex;

static INTERNAL_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[[^\]]+\]\((/[^)]+)\)").expect("internal link pattern"));

/// `/blog/<x>` segments that are archive routes, not posts.
pub const BLOG_PSEUDO_NAMESPACES: [&str; 3] = ["tag", "category", "page"];

/// Every root-relative link target in `body`, in order of appearance.
pub fn extract_internal_links(body: &str) -> Vec<String> {
    INTERNAL_LINK
        .captures_iter(body)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .collect()
}

pub fn is_location_link(link: &str) -> bool {
    link.starts_with("/locations/")
}

/// Booking or contact intent.
pub fn is_intent_link(link: &str) -> bool {
    link.starts_with("/booking") || link.starts_with("/contact")
}

pub fn is_blog_link(link: &str) -> bool {
    link.starts_with("/blog/")
}

fn first_segment(rest: &str) -> &str {
    let end = rest.find(['/', '?', '#']).unwrap_or(rest.len());
    &rest[..end]
}

/// Post slug targeted by a `/blog/<slug>` link. `None` for non-blog links,
/// the bare index, and the tag/category/page archives.
pub fn blog_link_slug(link: &str) -> Option<&str> {
    let rest = link.strip_prefix("/blog/")?;
    let segment = first_segment(rest);
    if segment.is_empty() || BLOG_PSEUDO_NAMESPACES.contains(&segment) {
        return None;
    }
    Some(segment)
}

/// Location id targeted by a `/locations/<id>` link.
pub fn location_link_id(link: &str) -> Option<&str> {
    let rest = link.strip_prefix("/locations/")?;
    let segment = first_segment(rest);
    (!segment.is_empty()).then_some(segment)
}

/// Counts of the three mandatory link classes in one body.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LinkShape {
    pub total: usize,
    pub location: usize,
    pub intent: usize,
    pub blog: usize,
}

impl LinkShape {
    pub fn of(links: &[String]) -> Self {
        let mut shape = Self {
            total: links.len(),
            ..Self::default()
        };
        for link in links {
            if is_location_link(link) {
                shape.location += 1;
            }
            if is_intent_link(link) {
                shape.intent += 1;
            }
            if is_blog_link(link) {
                shape.blog += 1;
            }
        }
        shape
    }

    pub fn is_complete(&self) -> bool {
        self.location > 0 && self.intent > 0 && self.blog > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BODY: &str = "See [Shegaon](/locations/shegaon-bhakt-niwas), \
        [book](/booking), [guide](/blog/shegaon-travel-guide#stay), \
        [external](https://example.com) and [tag](/blog/tag/shegaon).";

    #[test]
    fn test_extract_internal_links() {
        assert_eq!(
            extract_internal_links(BODY),
            vec![
                "/locations/shegaon-bhakt-niwas",
                "/booking",
                "/blog/shegaon-travel-guide#stay",
                "/blog/tag/shegaon",
            ]
        );
    }

    #[test]
    fn test_link_shape() {
        let shape = LinkShape::of(&extract_internal_links(BODY));
        assert_eq!(shape.total, 4);
        assert_eq!(shape.location, 1);
        assert_eq!(shape.intent, 1);
        assert_eq!(shape.blog, 2);
        assert!(shape.is_complete());

        let partial = LinkShape::of(&["/contact".to_string()]);
        assert!(!partial.is_complete());
    }

    #[test]
    fn test_blog_link_slug() {
        assert_eq!(blog_link_slug("/blog/shegaon-travel-guide#stay"), Some("shegaon-travel-guide"));
        assert_eq!(blog_link_slug("/blog/tag/shegaon"), None);
        assert_eq!(blog_link_slug("/blog/page/2"), None);
        assert_eq!(blog_link_slug("/blog/"), None);
        assert_eq!(blog_link_slug("/locations/x"), None);
    }

    #[test]
    fn test_location_link_id() {
        assert_eq!(location_link_id("/locations/omkareshwar?x=1"), Some("omkareshwar"));
        assert_eq!(location_link_id("/locations/"), None);
        assert_eq!(location_link_id("/locations"), None);
    }
}
