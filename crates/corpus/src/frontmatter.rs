// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Typed frontmatter boundary.
//!
//! A post is `---\n<yaml>\n---\n<markdown body>`. The YAML block is
//! deserialized straight into [`Frontmatter`]; anything that does not fit
//! (a mapping where a string belongs, numbers inside a list) is rejected
//! with [`CorpusError::Frontmatter`] instead of being coerced.

use serde::{Deserialize, Deserializer, Serialize};

use crate::CorpusError;

/// Post frontmatter as written by the generator and by hand.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Frontmatter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, deserialize_with = "string_list")]
    pub keywords: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, deserialize_with = "string_list")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "string_list")]
    pub location_ids: Vec<String>,
    #[serde(default, deserialize_with = "string_list")]
    pub related_slugs: Vec<String>,
}

/// Trimmed, non-empty value of an optional text field.
pub fn text(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

impl Frontmatter {
    pub fn title(&self) -> Option<&str> {
        text(&self.title)
    }

    pub fn description(&self) -> Option<&str> {
        text(&self.description)
    }

    pub fn date(&self) -> Option<&str> {
        text(&self.date)
    }

    pub fn slug(&self) -> Option<&str> {
        text(&self.slug)
    }

    pub fn category(&self) -> Option<&str> {
        text(&self.category)
    }

    pub fn author(&self) -> Option<&str> {
        text(&self.author)
    }
}

/// Lists accept either a YAML sequence of strings or one comma-separated string.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawList {
    Items(Vec<String>),
    Joined(String),
}

fn string_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawList>::deserialize(deserializer)?;
    let items = match raw {
        None => Vec::new(),
        Some(RawList::Items(items)) => items,
        Some(RawList::Joined(joined)) => joined.split(',').map(str::to_string).collect(),
    };
    Ok(items
        .into_iter()
        .map(|item| item.trim().to_string())
        .filter(|item| !item.is_empty())
        .collect())
}

/// A markdown file split into typed frontmatter and body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MarkdownDocument {
    pub frontmatter: Frontmatter,
    pub body: String,
}

/// Split `raw` into the YAML block and the body. Files without a leading
/// `---` line have no frontmatter.
pub fn split_document(raw: &str) -> Result<(Option<&str>, &str), CorpusError> {
    let raw = raw.strip_prefix('\u{feff}').unwrap_or(raw);
    let Some(after_open) = strip_delimiter_line(raw) else {
        return Ok((None, raw));
    };

    let mut offset = 0;
    for line in after_open.split_inclusive('\n') {
        if line.trim_end_matches(['\r', '\n']) == "---" {
            let yaml = &after_open[..offset];
            let body = &after_open[offset + line.len()..];
            return Ok((Some(yaml), body));
        }
        offset += line.len();
    }
    Err(CorpusError::UnterminatedFrontmatter)
}

fn strip_delimiter_line(raw: &str) -> Option<&str> {
    let rest = raw.strip_prefix("---")?;
    rest.strip_prefix("\r\n").or_else(|| rest.strip_prefix('\n'))
}

/// Parse a whole markdown file.
pub fn parse_document(raw: &str) -> Result<MarkdownDocument, CorpusError> {
    let (yaml, body) = split_document(raw)?;
    let frontmatter = match yaml {
        Some(yaml) if !yaml.trim().is_empty() => serde_yaml_ng::from_str(yaml)?,
        _ => Frontmatter::default(),
    };
    Ok(MarkdownDocument {
        frontmatter,
        body: body.to_string(),
    })
}

/// Render frontmatter and body back into a markdown file.
pub fn render_document(frontmatter: &Frontmatter, body: &str) -> Result<String, CorpusError> {
    let yaml = serde_yaml_ng::to_string(frontmatter)?;
    Ok(format!("---\n{yaml}---\n\n{body}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sequence_and_comma_lists() {
        let raw = r#"---
title: "Shegaon Travel Guide"
slug: shegaon-travel-guide
date: 2026-02-10
keywords:
  - "shegaon travel"
  - " shegaon stay "
tags: shegaon, travel,
locationIds: []
---
# Body
"#;
        let doc = parse_document(raw).unwrap();
        let fm = doc.frontmatter;
        assert_eq!(fm.title(), Some("Shegaon Travel Guide"));
        assert_eq!(fm.slug(), Some("shegaon-travel-guide"));
        assert_eq!(fm.date(), Some("2026-02-10"));
        assert_eq!(fm.keywords, vec!["shegaon travel", "shegaon stay"]);
        assert_eq!(fm.tags, vec!["shegaon", "travel"]);
        assert!(fm.location_ids.is_empty());
        assert!(fm.related_slugs.is_empty());
        assert_eq!(doc.body, "# Body\n");
    }

    #[test]
    fn test_no_frontmatter() {
        let doc = parse_document("just text\n").unwrap();
        assert_eq!(doc.frontmatter, Frontmatter::default());
        assert_eq!(doc.body, "just text\n");
    }

    #[test]
    fn test_malformed_list_is_rejected() {
        let raw = "---\ntags:\n  - nested: map\n---\nbody";
        assert!(matches!(parse_document(raw), Err(CorpusError::Frontmatter(_))));
    }

    #[test]
    fn test_mapping_title_is_rejected() {
        let raw = "---\ntitle:\n  en: Hello\n---\nbody";
        assert!(parse_document(raw).is_err());
    }

    #[test]
    fn test_unterminated_block() {
        let raw = "---\ntitle: x\nbody without close";
        assert!(matches!(
            parse_document(raw),
            Err(CorpusError::UnterminatedFrontmatter)
        ));
    }

    #[test]
    fn test_blank_fields_read_as_missing() {
        let raw = "---\ntitle: \"  \"\ncategory: guides\n---\n";
        let fm = parse_document(raw).unwrap().frontmatter;
        assert_eq!(fm.title(), None);
        assert_eq!(fm.category(), Some("guides"));
    }

    #[test]
    fn test_render_then_parse_keeps_fields() {
        let fm = Frontmatter {
            title: Some("A: B".into()),
            slug: Some("a-b".into()),
            related_slugs: vec!["x".into(), "y".into()],
            ..Default::default()
        };
        let rendered = render_document(&fm, "# A\n").unwrap();
        assert!(rendered.starts_with("---\n"));
        assert!(rendered.contains("relatedSlugs:"));
        let parsed = parse_document(&rendered).unwrap();
        assert_eq!(parsed.frontmatter, fm);
        assert_eq!(parsed.body, "\n# A\n");
    }
}
