// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Regex matchers over prerendered HTML and XML bodies.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

static CANONICAL_HREF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<link[^>]+rel="canonical"[^>]+href="([^"]+)""#).expect("valid canonical regex")
});

static KEYWORDS_PRESENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<meta[^>]+name="keywords"[^>]+content="[^"]{2,}""#).expect("valid keywords regex")
});

static KEYWORDS_RICH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<meta[^>]+name="keywords"[^>]+content="[^"]{10,}""#).expect("valid keywords regex")
});

static OG_TITLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<meta[^>]+property="og:title"[^>]+content="[^"]+""#).expect("valid og:title regex")
});

static JSON_LD_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)<script[^>]+type="application/ld\+json"[^>]*>(.*?)</script>"#)
        .expect("valid json-ld regex")
});

static SITEMAP_LOC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<loc>(.*?)</loc>").expect("valid loc regex"));

/// Every canonical `href` in document order.
pub fn canonical_hrefs(html: &str) -> Vec<String> {
    CANONICAL_HREF
        .captures_iter(html)
        .map(|caps| caps[1].to_string())
        .collect()
}

/// A keywords meta tag with any real content. Pages carrying one are
/// treated as SEO pages.
pub fn has_keywords_meta(html: &str) -> bool {
    KEYWORDS_PRESENT.is_match(html)
}

/// A keywords meta tag with at least ten characters of content.
pub fn has_rich_keywords_meta(html: &str) -> bool {
    KEYWORDS_RICH.is_match(html)
}

pub fn has_og_title(html: &str) -> bool {
    OG_TITLE.is_match(html)
}

pub fn has_json_ld(html: &str) -> bool {
    JSON_LD_BLOCK.is_match(html)
}

/// `<meta name="{name}" content="...">` with non-empty content.
pub fn has_meta_name(html: &str, name: &str) -> bool {
    let pattern = format!(
        r#"<meta[^>]+name="{}"[^>]+content="[^"]+""#,
        regex::escape(name)
    );
    Regex::new(&pattern).is_ok_and(|re| re.is_match(html))
}

/// Literal `href="{href}"` anywhere in the page.
pub fn has_href(html: &str, href: &str) -> bool {
    html.contains(&format!("href=\"{href}\""))
}

/// `<loc>` values of a sitemap body, trimmed.
pub fn sitemap_locs(xml: &str) -> Vec<String> {
    SITEMAP_LOC
        .captures_iter(xml)
        .map(|caps| caps[1].trim().to_string())
        .collect()
}

/// `@type` values found in the inline JSON-LD blocks of a page.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct JsonLdTypes {
    pub types: BTreeSet<String>,
    /// Blocks that were not valid JSON.
    pub malformed_blocks: usize,
}

impl JsonLdTypes {
    pub fn extract(html: &str) -> Self {
        let mut found = Self::default();
        for caps in JSON_LD_BLOCK.captures_iter(html) {
            match serde_json::from_str::<Value>(&caps[1]) {
                Ok(value) => collect_types(&value, &mut found.types),
                Err(_) => found.malformed_blocks += 1,
            }
        }
        found
    }

    pub fn contains(&self, schema_type: &str) -> bool {
        self.types.contains(schema_type)
    }
}

fn collect_types(value: &Value, types: &mut BTreeSet<String>) {
    match value {
        Value::Array(items) => {
            for item in items {
                collect_types(item, types);
            }
        }
        Value::Object(map) => {
            if let Some(Value::String(schema_type)) = map.get("@type") {
                _ = types.insert(schema_type.clone());
            }
            for child in map.values() {
                collect_types(child, types);
            }
        }
        _ => {}
    }
}
