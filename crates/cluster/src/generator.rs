// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Deterministic content-cluster generator.
//!
//! A run is:
//! 1. [`validate_config`]: topic supply covers every cluster target.
//! 2. [`plan_posts`]: build every post in memory, cluster by cluster.
//! 3. Remove the files listed by the previous manifest (each entry must
//!    resolve inside the blog root).
//! 4. Write the posts, check the grand total, write the new manifest.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::{Days, NaiveDate};
use corpus::frontmatter::{Frontmatter, render_document};
use corpus::taxonomy::title_case;
use corpus::walk::resolve_within;
use diagnostics::{debug_event, info_event};
use tera::Context;

use crate::config::{
    ClusterKind, ClusterTarget, EXPECTED_GENERATED_TOTAL, LOCATION_CLUSTER_TARGETS,
    MANIFEST_RELATIVE_PATH, NON_LOCATION_CLUSTER_TARGETS, config_fingerprint,
};
use crate::manifest::{Manifest, sha256_hex};
use crate::related::{CORE_RELATED_COUNT, related_slugs};
use crate::templates::{self, RelatedLink};
use crate::topics::{
    CORE_RELATED_SLUGS, CROSS_LOCATION_GUIDE_VARIANTS, EVENT_POST_VARIANTS, LOCATION_PROFILES,
    LOCATION_TOPIC_VARIANTS, LocationProfile, SPIRITUAL_POST_VARIANTS, TERTIARY_PILLAR_SLUGS,
    intent_focus, location_profile,
};
use crate::ClusterError;

const AUTHOR_NAME: &str = "Sansthan";

/// Newest generated date; every later post is one or more days older.
const BASE_DATE: (i32, u32, u32) = (2026, 2, 15);

/// Date offsets where the non-location clusters start.
const GUIDES_DATE_OFFSET: u64 = 120;
const SPIRITUAL_DATE_OFFSET: u64 = 160;
const EVENTS_DATE_OFFSET: u64 = 180;

/// `BASE_DATE` minus `offset` days, as `YYYY-MM-DD`.
pub fn date_by_offset(offset: u64) -> Result<String, ClusterError> {
    let (year, month, day) = BASE_DATE;
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|base| base.checked_sub_days(Days::new(offset)))
        .map(|date| date.format("%Y-%m-%d").to_string())
        .ok_or_else(|| ClusterError::ConfigContract(format!("date offset {offset} is out of range")))
}

/// One post ready to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedPost {
    /// Cluster key (`shegaon`, `guides`, ...).
    pub cluster: &'static str,
    pub relative_path: String,
    pub frontmatter: Frontmatter,
    pub body: String,
}

impl GeneratedPost {
    pub fn slug(&self) -> &str {
        self.frontmatter.slug().unwrap_or_default()
    }

    pub fn to_markdown(&self) -> Result<String, ClusterError> {
        Ok(render_document(&self.frontmatter, &self.body)?)
    }
}

/// Check that the topic tables can satisfy every cluster target.
pub fn validate_config() -> Result<(), ClusterError> {
    let mut problems = Vec::new();

    for target in &LOCATION_CLUSTER_TARGETS {
        if target.expected > LOCATION_TOPIC_VARIANTS.len() {
            problems.push(format!(
                "location \"{}\" needs {} topic variants but only {} exist",
                target.key,
                target.expected,
                LOCATION_TOPIC_VARIANTS.len()
            ));
        }
        if location_profile(target.key).is_none() {
            problems.push(format!("location \"{}\" has no location profile", target.key));
        }
    }
    for profile in &LOCATION_PROFILES {
        if !LOCATION_CLUSTER_TARGETS.iter().any(|t| t.key == profile.key) {
            problems.push(format!("location profile \"{}\" has no cluster target", profile.key));
        }
    }

    for target in &NON_LOCATION_CLUSTER_TARGETS {
        let supply = non_location_variants(target.kind).len();
        if supply != target.expected {
            problems.push(format!(
                "cluster \"{}\" declares {} posts but has {} variants",
                target.key, target.expected, supply
            ));
        }
    }

    if problems.is_empty() {
        Ok(())
    } else {
        Err(ClusterError::ConfigContract(problems.join("; ")))
    }
}

fn non_location_variants(kind: ClusterKind) -> &'static [&'static str] {
    match kind {
        ClusterKind::Guides => &CROSS_LOCATION_GUIDE_VARIANTS,
        ClusterKind::Spiritual => &SPIRITUAL_POST_VARIANTS,
        ClusterKind::Events => &EVENT_POST_VARIANTS,
        ClusterKind::Location => &[],
    }
}

/// Link label for any slug a generated post may point at.
fn label_for(slug: &str) -> String {
    if let Some((_, label)) = CORE_RELATED_SLUGS.iter().find(|(core, _)| *core == slug) {
        return (*label).to_string();
    }
    for profile in &LOCATION_PROFILES {
        let Some(suffix) = slug.strip_prefix(profile.key).and_then(|s| s.strip_prefix('-')) else {
            continue;
        };
        if let Some(topic) = LOCATION_TOPIC_VARIANTS.iter().find(|t| t.suffix == suffix) {
            return format!("{} {}", profile.city, topic.title);
        }
    }
    title_case(slug)
}

fn related_links(slugs: &[String]) -> Vec<RelatedLink> {
    slugs
        .iter()
        .map(|slug| RelatedLink {
            slug: slug.clone(),
            label: label_for(slug),
        })
        .collect()
}

fn core_slugs() -> impl Iterator<Item = &'static str> {
    CORE_RELATED_SLUGS
        .iter()
        .take(CORE_RELATED_COUNT)
        .map(|(slug, _)| *slug)
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

fn plan_location_cluster(
    target: &ClusterTarget,
    profile: &LocationProfile,
    date_offset: &mut u64,
) -> Result<Vec<GeneratedPost>, ClusterError> {
    let topics = LOCATION_TOPIC_VARIANTS.get(..target.expected).ok_or_else(|| {
        ClusterError::ConfigContract(format!("not enough topic variants for \"{}\"", target.key))
    })?;
    let slugs: Vec<String> = topics
        .iter()
        .map(|topic| format!("{}-{}", profile.key, topic.suffix))
        .collect();
    let extra: Vec<&str> = core_slugs()
        .chain(profile.pillar_slugs)
        .chain(TERTIARY_PILLAR_SLUGS)
        .collect();
    let city_lower = profile.city.to_lowercase();

    let mut posts = Vec::with_capacity(topics.len());
    for (index, topic) in topics.iter().enumerate() {
        let slug = &slugs[index];
        let related = related_slugs(&slugs, index, &extra);
        let topic_lower = topic.title.to_lowercase();

        let mut keywords = vec![format!("{city_lower} {topic_lower}")];
        keywords.extend(strings(&profile.keyword_seed));
        keywords.push(format!("{city_lower} pilgrimage planning"));
        keywords.push(format!("{city_lower} accommodation booking"));

        let frontmatter = Frontmatter {
            title: Some(format!(
                "{} {} | Shri Gajanan Maharaj Sansthan",
                title_case(profile.key),
                topic.title
            )),
            description: Some(format!(
                "Detailed {city_lower} {topic_lower} for devotees searching Shri/Shree/Sri Gajanan Maharaj Sansthan {}. Includes booking links, travel tips, and internal route guidance.",
                profile.city
            )),
            date: Some(date_by_offset(*date_offset)?),
            slug: Some(slug.clone()),
            image: Some(profile.image.to_string()),
            keywords,
            author: Some(AUTHOR_NAME.to_string()),
            tags: strings(&[profile.key, topic.intent, "sansthan-seo", "pilgrimage-guide"]),
            category: Some(ClusterKind::Location.category().to_string()),
            location_ids: strings(profile.location_ids),
            related_slugs: related.clone(),
        };
        *date_offset += 1;

        let mut context = Context::new();
        context.insert("city", profile.city);
        context.insert("topic_title", topic.title);
        context.insert("focus", intent_focus(topic.intent));
        context.insert("location_page", profile.location_page);
        context.insert("related", &related_links(&related));
        let body = templates::render(slug, templates::LOCATION_POST_TEMPLATE, &context)?;

        posts.push(GeneratedPost {
            cluster: target.key,
            relative_path: format!("{}{slug}.md", target.namespace()),
            frontmatter,
            body,
        });
    }
    Ok(posts)
}

/// Fixed per-cluster wording for guides, spiritual and event posts.
struct ClusterStyle {
    title_suffix: &'static str,
    description: &'static str,
    keywords: [&'static str; 3],
    tags: [&'static str; 4],
    location_ids: &'static [&'static str],
    date_offset: u64,
    template: &'static str,
    focus_keyword: &'static str,
    heading_label: &'static str,
}

fn cluster_style(kind: ClusterKind) -> Option<ClusterStyle> {
    match kind {
        ClusterKind::Guides => Some(ClusterStyle {
            title_suffix: "Shri Gajanan Maharaj Sansthan",
            description: "Cross-location pilgrimage planning guide for devotees searching Shegaon, Omkareshwar, Pandharpur, and Trimbakeshwar accommodation and route support.",
            keywords: [
                "shri gajanan maharaj sansthan travel guide",
                "shree gajanan maharaj sansthan pilgrimage",
                "sri gajanan maharaj sansthan route planning",
            ],
            tags: ["guides", "multi-location", "travel-planning", "sansthan-seo"],
            location_ids: &["shegaon-bhakt-niwas", "omkareshwar", "pandharpur-math", "trimbakeshwar"],
            date_offset: GUIDES_DATE_OFFSET,
            template: templates::CROSS_LOCATION_GUIDE_TEMPLATE,
            focus_keyword: "",
            heading_label: "",
        }),
        ClusterKind::Spiritual => Some(ClusterStyle {
            title_suffix: "Spiritual Guidance",
            description: "Spiritual and practical devotional guidance for Sansthan devotees planning darshan and accommodation with discipline.",
            keywords: [
                "shri gajanan maharaj teachings",
                "shree gajanan maharaj spiritual guidance",
                "sansthan devotional discipline",
            ],
            tags: ["spiritual", "teachings", "devotion", "sansthan-seo"],
            location_ids: &["shegaon-bhakt-niwas"],
            date_offset: SPIRITUAL_DATE_OFFSET,
            template: templates::SPIRITUAL_OR_EVENT_TEMPLATE,
            focus_keyword: "Shri Gajanan Maharaj spiritual planning",
            heading_label: "Spiritual preparation insights",
        }),
        ClusterKind::Events => Some(ClusterStyle {
            title_suffix: "Devotee Event Guide",
            description: "Festival/event support guide for devotees searching Sansthan darshan timing and accommodation planning during high-rush periods.",
            keywords: [
                "shri gajanan maharaj sansthan festival guide",
                "shree gajanan maharaj sansthan event planning",
                "sri gajanan maharaj darshan festival season",
            ],
            tags: ["events", "festival", "darshan", "sansthan-seo"],
            location_ids: &["shegaon-bhakt-niwas"],
            date_offset: EVENTS_DATE_OFFSET,
            template: templates::SPIRITUAL_OR_EVENT_TEMPLATE,
            focus_keyword: "Sansthan festival darshan planning",
            heading_label: "Festival and event planning insights",
        }),
        ClusterKind::Location => None,
    }
}

fn plan_topic_cluster(target: &ClusterTarget) -> Result<Vec<GeneratedPost>, ClusterError> {
    let style = cluster_style(target.kind).ok_or_else(|| {
        ClusterError::ConfigContract(format!("cluster \"{}\" has no post style", target.key))
    })?;
    let variants = non_location_variants(target.kind);
    let extra: Vec<&str> = core_slugs().collect();

    let mut posts = Vec::with_capacity(variants.len());
    for (index, slug) in variants.iter().enumerate() {
        let related = related_slugs(variants, index, &extra);
        let heading = title_case(slug);
        let title = format!("{heading} | {}", style.title_suffix);

        let mut keywords = vec![heading.to_lowercase()];
        keywords.extend(strings(&style.keywords));

        let frontmatter = Frontmatter {
            title: Some(title.clone()),
            description: Some(style.description.to_string()),
            date: Some(date_by_offset(style.date_offset + index as u64)?),
            slug: Some((*slug).to_string()),
            image: Some("/images/shegaon-temple.jpg".to_string()),
            keywords,
            author: Some(AUTHOR_NAME.to_string()),
            tags: strings(&style.tags),
            category: Some(target.kind.category().to_string()),
            location_ids: strings(style.location_ids),
            related_slugs: related.clone(),
        };

        let mut context = Context::new();
        context.insert("title", &title);
        context.insert("focus_keyword", style.focus_keyword);
        context.insert("heading_label", style.heading_label);
        context.insert("related", &related_links(&related));
        let body = templates::render(slug, style.template, &context)?;

        posts.push(GeneratedPost {
            cluster: target.key,
            relative_path: format!("{}{slug}.md", target.namespace()),
            frontmatter,
            body,
        });
    }
    Ok(posts)
}

fn check_cluster_count(target: &ClusterTarget, actual: usize) -> Result<(), ClusterError> {
    if actual == target.expected {
        Ok(())
    } else {
        Err(ClusterError::ClusterCount {
            cluster: target.key.to_string(),
            expected: target.expected,
            actual,
        })
    }
}

/// Every post of every cluster, in generation order. Pure: touches no files.
pub fn plan_posts() -> Result<Vec<GeneratedPost>, ClusterError> {
    validate_config()?;

    let mut posts = Vec::with_capacity(EXPECTED_GENERATED_TOTAL);
    let mut date_offset = 0;
    for target in &LOCATION_CLUSTER_TARGETS {
        let profile = location_profile(target.key).ok_or_else(|| {
            ClusterError::ConfigContract(format!("location \"{}\" has no location profile", target.key))
        })?;
        let cluster = plan_location_cluster(target, profile, &mut date_offset)?;
        check_cluster_count(target, cluster.len())?;
        posts.extend(cluster);
    }
    for target in &NON_LOCATION_CLUSTER_TARGETS {
        let cluster = plan_topic_cluster(target)?;
        check_cluster_count(target, cluster.len())?;
        posts.extend(cluster);
    }
    Ok(posts)
}

/// Outcome of one generator run.
#[derive(Debug, Clone)]
pub struct GenerationSummary {
    pub manifest: Manifest,
    /// Files from the previous manifest that were removed before writing.
    pub removed_count: usize,
    /// Posts written per cluster key.
    pub distribution: BTreeMap<String, usize>,
}

/// Writes the generated clusters under one blog root.
#[derive(Debug, Clone)]
pub struct Generator {
    blog_root: PathBuf,
}

impl Generator {
    pub fn new(blog_root: impl Into<PathBuf>) -> Self {
        Self {
            blog_root: blog_root.into(),
        }
    }

    pub fn blog_root(&self) -> &Path {
        &self.blog_root
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.blog_root.join(MANIFEST_RELATIVE_PATH)
    }

    pub fn run(&self) -> Result<GenerationSummary, ClusterError> {
        let fingerprint = config_fingerprint()?;
        info_event!("seo-blog-generator-start", {
            "blogRoot": self.blog_root.display().to_string(),
            "configFingerprint": fingerprint,
            "expectedTotal": EXPECTED_GENERATED_TOTAL,
        });

        let posts = plan_posts()?;
        std::fs::create_dir_all(&self.blog_root).map_err(|e| ClusterError::io(&self.blog_root, e))?;
        let removed_count = self.remove_previous_output()?;

        let mut checksums = BTreeMap::new();
        let mut distribution: BTreeMap<String, usize> = BTreeMap::new();
        for post in &posts {
            let content = post.to_markdown()?;
            let path = self.blog_root.join(&post.relative_path);
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent).map_err(|e| ClusterError::io(parent, e))?;
            }
            std::fs::write(&path, &content).map_err(|e| ClusterError::io(&path, e))?;
            debug_event!("seo-blog-generator-write", { "file": post.relative_path });

            _ = checksums.insert(post.relative_path.clone(), sha256_hex(content.as_bytes()));
            *distribution.entry(post.cluster.to_string()).or_default() += 1;
        }

        if checksums.len() != EXPECTED_GENERATED_TOTAL {
            return Err(ClusterError::TotalMismatch {
                expected: EXPECTED_GENERATED_TOTAL,
                actual: checksums.len(),
            });
        }

        let manifest = Manifest::from_checksums(checksums)?;
        manifest.write(&self.manifest_path())?;

        info_event!("seo-blog-generator-complete", {
            "generatedTotal": manifest.generated_file_count,
            "removedPreviousFiles": removed_count,
            "distribution": distribution,
            "manifestPath": self.manifest_path().display().to_string(),
        });

        Ok(GenerationSummary {
            manifest,
            removed_count,
            distribution,
        })
    }

    /// Paths listed in the previous manifest, normalized to `/` separators.
    fn previous_entries(&self) -> Result<Vec<String>, ClusterError> {
        let path = self.manifest_path();
        let raw = match std::fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(ClusterError::io(&path, e)),
        };
        let parsed: serde_json::Value =
            serde_json::from_str(&raw).map_err(|source| ClusterError::ManifestParse {
                path: path.clone(),
                source,
            })?;
        Ok(parsed
            .get("generatedFiles")
            .and_then(|files| files.as_array())
            .map(|files| {
                files
                    .iter()
                    .filter_map(|entry| entry.as_str())
                    .map(|entry| entry.trim().replace('\\', "/"))
                    .filter(|entry| !entry.is_empty())
                    .collect()
            })
            .unwrap_or_default())
    }

    /// Delete every file the previous run recorded. All entries are checked
    /// for containment before anything is removed.
    fn remove_previous_output(&self) -> Result<usize, ClusterError> {
        let entries = self.previous_entries()?;
        let mut targets = Vec::with_capacity(entries.len());
        for entry in &entries {
            match resolve_within(&self.blog_root, entry) {
                Some(path) if path != self.blog_root => targets.push(path),
                _ => return Err(ClusterError::PathEscape(entry.clone())),
            }
        }

        let mut removed = 0;
        for path in targets {
            if path.is_file() {
                std::fs::remove_file(&path).map_err(|e| ClusterError::io(&path, e))?;
                removed += 1;
            }
        }
        debug_event!("seo-blog-generator-cleanup", {
            "listedEntries": entries.len(),
            "removedFiles": removed,
        });
        Ok(removed)
    }
}
