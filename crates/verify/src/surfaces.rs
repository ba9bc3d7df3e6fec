// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! SEO signals on prerendered HTML: canonical links, keywords, Open Graph,
//! JSON-LD schema types and geo meta.

use std::collections::BTreeMap;

use corpus::walk::ignore_nothing;
use corpus::{PostInventory, collect_files, relative_slash_path, taxonomy_slug};
use diagnostics::{WarnOnce, info_event, warn_event};

use crate::html::{
    JsonLdTypes, canonical_hrefs, has_json_ld, has_keywords_meta, has_meta_name, has_og_title,
    has_rich_keywords_meta,
};
use crate::{Finding, Report, VerifyError, Workspace};

/// Whether `href` lives under the canonical origin. A bare `/` is accepted.
pub fn is_canonical_href(href: &str, origin: &str) -> bool {
    if href == "/" {
        return true;
    }
    href == origin || href.strip_prefix(origin).is_some_and(|rest| rest.starts_with('/'))
}

/// Every page with a keywords meta tag must carry exactly one canonical
/// link inside the canonical origin.
pub fn verify_canonical(ws: &Workspace) -> Result<Report, VerifyError> {
    info_event!("canonical-verify-start", {
        "appServerDir": ws.build_dir.display().to_string(),
        "canonicalOrigin": ws.origin(),
    });
    ws.require_build()?;
    let mut report = Report::new("canonical-verify");

    let mut seo_pages = 0usize;
    for path in collect_files(&ws.build_dir, "html", ignore_nothing)? {
        let html = std::fs::read_to_string(&path).map_err(|e| VerifyError::io(&path, e))?;
        if !has_keywords_meta(&html) {
            continue;
        }
        seo_pages += 1;
        let file = relative_slash_path(&ws.build_dir, &path);
        let hrefs = canonical_hrefs(&html);
        match hrefs.as_slice() {
            [] => report.push(
                Finding::new("canonical-presence", "Missing canonical tag on SEO page.").file(file),
            ),
            [href] if !is_canonical_href(href, ws.origin()) => report.push(
                Finding::new(
                    "canonical-origin",
                    format!("Canonical href \"{href}\" is outside canonical origin."),
                )
                .file(file),
            ),
            [_] => {}
            many => report.push(
                Finding::new(
                    "canonical-singleton",
                    format!("Expected one canonical tag but found {}.", many.len()),
                )
                .file(file),
            ),
        }
    }

    report.detail("seoPageCount", seo_pages);
    Ok(report)
}

/// A signal a key route must carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteSignal {
    Canonical,
    Keywords,
    OgTitle,
    JsonLd,
}

impl RouteSignal {
    pub fn name(self) -> &'static str {
        match self {
            RouteSignal::Canonical => "canonical",
            RouteSignal::Keywords => "keywords",
            RouteSignal::OgTitle => "ogTitle",
            RouteSignal::JsonLd => "jsonLd",
        }
    }

    fn present(self, html: &str, origin: &str) -> bool {
        match self {
            RouteSignal::Canonical => canonical_hrefs(html)
                .iter()
                .any(|href| href == "/" || is_canonical_href(href, origin)),
            RouteSignal::Keywords => has_rich_keywords_meta(html),
            RouteSignal::OgTitle => has_og_title(html),
            RouteSignal::JsonLd => has_json_ld(html),
        }
    }
}

/// A prerendered route and what it must contain.
#[derive(Debug, Clone, Copy)]
pub struct KeyRoute {
    pub id: &'static str,
    pub file: &'static str,
    pub signals: &'static [RouteSignal],
    pub schema_types: &'static [&'static str],
}

use RouteSignal::{Canonical, JsonLd, Keywords, OgTitle};

pub const KEY_ROUTES: [KeyRoute; 9] = [
    KeyRoute {
        id: "home",
        file: "index.html",
        signals: &[Canonical, Keywords, OgTitle, JsonLd],
        schema_types: &["Organization", "WebSite"],
    },
    KeyRoute {
        id: "booking",
        file: "booking.html",
        signals: &[Canonical, Keywords, JsonLd],
        schema_types: &["FAQPage", "BreadcrumbList"],
    },
    KeyRoute {
        id: "locations-index",
        file: "locations.html",
        signals: &[Canonical, Keywords],
        schema_types: &[],
    },
    KeyRoute {
        id: "location-shegaon-bhakt-niwas",
        file: "locations/shegaon-bhakt-niwas.html",
        signals: &[Canonical, Keywords, JsonLd],
        schema_types: &["PlaceOfWorship", "LocalBusiness", "LodgingBusiness"],
    },
    KeyRoute {
        id: "blog-index",
        file: "blog.html",
        signals: &[Canonical, Keywords, JsonLd],
        schema_types: &["CollectionPage"],
    },
    KeyRoute {
        id: "blog-post-shegaon-travel-guide",
        file: "blog/shegaon-travel-guide.html",
        signals: &[Canonical, Keywords, OgTitle, JsonLd],
        schema_types: &["BlogPosting", "BreadcrumbList"],
    },
    KeyRoute {
        id: "blog-category-locations",
        file: "blog/category/locations.html",
        signals: &[Canonical, Keywords, JsonLd],
        schema_types: &["CollectionPage", "BreadcrumbList"],
    },
    KeyRoute {
        id: "blog-tag-shegaon",
        file: "blog/tag/shegaon.html",
        signals: &[Canonical, Keywords, JsonLd],
        schema_types: &["CollectionPage", "BreadcrumbList"],
    },
    KeyRoute {
        id: "contact",
        file: "contact.html",
        signals: &[Canonical, Keywords],
        schema_types: &[],
    },
];

pub fn verify_seo_build(ws: &Workspace) -> Result<Report, VerifyError> {
    info_event!("seo-build-verify-start", {
        "appServerDir": ws.build_dir.display().to_string(),
        "routeCount": KEY_ROUTES.len(),
    });
    ws.require_build()?;
    let mut report = Report::new("seo-build-verify");

    for route in &KEY_ROUTES {
        let path = ws.build_path(route.file);
        let finding = |check: &str, reason: String| Finding::new(check, reason).file(route.file).slug(route.id);
        let html = match std::fs::read_to_string(&path) {
            Ok(html) => html,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                report.push(finding("file-exists", "Expected prerendered HTML file is missing.".into()));
                continue;
            }
            Err(e) => return Err(VerifyError::io(&path, e)),
        };
        for signal in route.signals {
            if !signal.present(&html, ws.origin()) {
                report.push(finding(
                    signal.name(),
                    format!("Missing required SEO signal: {}", signal.name()),
                ));
            }
        }
        if !route.schema_types.is_empty() {
            let found = schema_types(&html, "seo-build-verify-warning", route.file);
            for schema_type in route.schema_types {
                if !found.contains(schema_type) {
                    report.push(finding(
                        "schema-type",
                        format!("Missing required schema @type: {schema_type}"),
                    ));
                }
            }
        }
    }

    report.detail("checkedRoutes", KEY_ROUTES.len());
    Ok(report)
}

fn schema_types(html: &str, warning_event: &str, file: &str) -> JsonLdTypes {
    let found = JsonLdTypes::extract(html);
    if found.malformed_blocks > 0 {
        warn_event!(warning_event, {
            "file": file,
            "warning": "failed-json-ld-parse",
            "malformedBlocks": found.malformed_blocks,
        });
    }
    found
}

pub const BLOG_POST_SCHEMA_TYPES: [&str; 2] = ["BlogPosting", "BreadcrumbList"];

/// Canonical link for one blog post, with an optional trailing slash.
fn has_post_canonical(html: &str, origin: &str, slug: &str) -> bool {
    let expected = format!("{origin}/blog/{slug}");
    canonical_hrefs(html)
        .iter()
        .any(|href| href == &expected || href.strip_suffix('/') == Some(expected.as_str()))
}

/// Every markdown post has a prerendered page with its own canonical URL,
/// keywords, og:title and the post schema types.
pub fn verify_blog_posts(ws: &Workspace) -> Result<Report, VerifyError> {
    let blog_build = ws.build_path("blog");
    if !blog_build.is_dir() {
        return Err(VerifyError::missing("Blog build output directory", blog_build));
    }

    let mut warnings = WarnOnce::new();
    let inventory = PostInventory::load(&ws.blog_root, &mut warnings)?;
    info_event!("blog-post-surfaces-verify-start", {
        "expectedPostCount": inventory.len(),
        "buildDirectory": blog_build.display().to_string(),
    });
    let mut report = Report::new("blog-post-surfaces-verify");

    let mut sources: BTreeMap<String, &str> = BTreeMap::new();
    for post in inventory.posts() {
        let slug = taxonomy_slug(&post.slug);
        if let Some(first) = sources.get(&slug) {
            report.push(
                Finding::new(
                    "duplicate-slug",
                    format!("Duplicate slug \"{slug}\" found in {first} and {}", post.relative_path),
                )
                .slug(slug.clone()),
            );
            continue;
        }
        _ = sources.insert(slug, &post.relative_path);
    }

    for (slug, source) in &sources {
        let file = format!("blog/{slug}.html");
        let finding = |check: &str, reason: &str| Finding::new(check, reason).file(file.clone()).slug(slug.clone());
        let path = ws.build_path(&file);
        let html = match std::fs::read_to_string(&path) {
            Ok(html) => html,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                report.push(finding(
                    "prerendered-file-exists",
                    &format!("Missing prerendered blog HTML file for {source}."),
                ));
                continue;
            }
            Err(e) => return Err(VerifyError::io(&path, e)),
        };

        if !has_post_canonical(&html, ws.origin(), slug) {
            report.push(finding("canonical", "Missing or invalid canonical link for blog post."));
        }
        if !has_rich_keywords_meta(&html) {
            report.push(finding("keywords-meta", "Missing keywords meta tag on blog post page."));
        }
        if !has_og_title(&html) {
            report.push(finding("og-title", "Missing og:title meta tag on blog post page."));
        }
        let found = schema_types(&html, "blog-post-surfaces-verify-warning", &file);
        for schema_type in BLOG_POST_SCHEMA_TYPES {
            if !found.contains(schema_type) {
                report.push(finding(
                    "schema-type",
                    &format!("Missing required schema @type \"{schema_type}\""),
                ));
            }
        }
    }

    report.detail("validatedPostCount", sources.len());
    Ok(report)
}

pub const LOCATION_SCHEMA_TYPES: [&str; 3] = ["PlaceOfWorship", "LocalBusiness", "LodgingBusiness"];
pub const LOCATION_GEO_META: [&str; 4] = ["geo.position", "geo.placename", "geo.region", "ICBM"];

/// Every prerendered location detail page carries a location canonical,
/// keywords, geo meta and the place schema types.
pub fn verify_locations(ws: &Workspace) -> Result<Report, VerifyError> {
    let location_dir = ws.build_path("locations");
    info_event!("location-seo-verify-start", {
        "locationDir": location_dir.display().to_string(),
    });

    let mut pages = Vec::new();
    if location_dir.is_dir() {
        let entries = std::fs::read_dir(&location_dir).map_err(|e| VerifyError::io(&location_dir, e))?;
        for entry in entries {
            let entry = entry.map_err(|e| VerifyError::io(&location_dir, e))?;
            let name = entry.file_name().to_string_lossy().into_owned();
            let is_file = entry.file_type().is_ok_and(|t| t.is_file());
            if is_file && name.ends_with(".html") && name != "index.html" && name != "locations.html" {
                pages.push(name);
            }
        }
    }
    pages.sort();
    if pages.is_empty() {
        return Err(VerifyError::missing("Prerendered location detail pages", location_dir));
    }

    let mut report = Report::new("location-seo-verify");
    let canonical_prefix = format!("{}/locations/", ws.origin());
    for name in &pages {
        let path = location_dir.join(name);
        let html = std::fs::read_to_string(&path).map_err(|e| VerifyError::io(&path, e))?;
        let file = format!("locations/{name}");
        let finding = |check: &str, reason: String| Finding::new(check, reason).file(file.clone());

        let has_canonical = canonical_hrefs(&html)
            .iter()
            .any(|href| href.len() > canonical_prefix.len() && href.starts_with(&canonical_prefix));
        if !has_canonical {
            report.push(finding("canonical", "Missing or invalid location canonical URL.".into()));
        }
        if !has_rich_keywords_meta(&html) {
            report.push(finding("keywords", "Missing keywords meta tag on location page.".into()));
        }
        for name in LOCATION_GEO_META {
            if !has_meta_name(&html, name) {
                report.push(finding("geo-meta", format!("Missing geo meta tag \"{name}\"")));
            }
        }
        let found = JsonLdTypes::extract(&html);
        for schema_type in LOCATION_SCHEMA_TYPES {
            if !found.contains(schema_type) {
                report.push(finding(
                    "schema-type",
                    format!("Missing required schema @type \"{schema_type}\""),
                ));
            }
        }
    }

    report.detail("locationCount", pages.len());
    Ok(report)
}
