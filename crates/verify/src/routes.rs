// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Route coverage: the prerendered listing, tag and category pages, the
//! sitemap and the pagination links all follow from the post inventory.

use std::collections::BTreeSet;
use std::path::Path;

use corpus::PostInventory;
use corpus::site::{LOCATION_ROUTE_COUNT, STATIC_ROUTE_COUNT};
use diagnostics::{WarnOnce, info_event};

use crate::html::{has_href, sitemap_locs};
use crate::{Finding, Report, VerifyError, Workspace};

/// Route slugs the site must serve for one corpus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteInventory {
    pub post_slugs: Vec<String>,
    pub tag_slugs: BTreeSet<String>,
    pub category_slugs: BTreeSet<String>,
    pub paginated_page_count: usize,
}

impl RouteInventory {
    pub fn from_posts(inventory: &PostInventory) -> Self {
        Self {
            post_slugs: inventory.posts().iter().map(|post| post.slug.clone()).collect(),
            tag_slugs: inventory.tag_slugs(),
            category_slugs: inventory.category_slugs(),
            paginated_page_count: inventory.paginated_page_count(),
        }
    }

    pub fn load(blog_root: &Path) -> Result<Self, VerifyError> {
        let mut warnings = WarnOnce::new();
        let inventory = PostInventory::load(blog_root, &mut warnings)?;
        Ok(Self::from_posts(&inventory))
    }

    /// Listing pages after the index, `2 ..= N`.
    pub fn paginated_pages(&self) -> std::ops::RangeInclusive<usize> {
        2..=self.paginated_page_count + 1
    }

    pub fn expected_sitemap_url_count(&self) -> usize {
        STATIC_ROUTE_COUNT
            + LOCATION_ROUTE_COUNT
            + self.post_slugs.len()
            + self.paginated_page_count
            + self.tag_slugs.len()
            + self.category_slugs.len()
    }
}

/// Every listing page, tag archive and category archive is prerendered.
pub fn verify_taxonomy(ws: &Workspace) -> Result<Report, VerifyError> {
    info_event!("taxonomy-verify-start", {
        "blogRoot": ws.blog_root.display().to_string(),
        "appServerDir": ws.build_dir.display().to_string(),
    });
    ws.require_build()?;
    let routes = RouteInventory::load(&ws.blog_root)?;
    let mut report = Report::new("taxonomy-verify");

    let mut expect_file = |relative: String, check: &str| {
        if !ws.build_path(&relative).exists() {
            report.push(Finding::new(check, "Expected prerendered file does not exist.").file(relative));
        }
    };

    expect_file("blog.html".to_string(), "blog-index-prerender");
    for page in routes.paginated_pages() {
        expect_file(format!("blog/page/{page}.html"), "blog-pagination-prerender");
    }
    for tag in &routes.tag_slugs {
        expect_file(format!("blog/tag/{tag}.html"), "blog-tag-prerender");
    }
    for category in &routes.category_slugs {
        expect_file(format!("blog/category/{category}.html"), "blog-category-prerender");
    }

    report.detail("postCount", routes.post_slugs.len());
    report.detail("tagCount", routes.tag_slugs.len());
    report.detail("categoryCount", routes.category_slugs.len());
    report.detail("paginationPagesChecked", routes.paginated_page_count);
    Ok(report)
}

/// The sitemap lists exactly the expected number of URLs and every post,
/// listing page, tag and category route is among them.
pub fn verify_sitemap(ws: &Workspace) -> Result<Report, VerifyError> {
    let routes = RouteInventory::load(&ws.blog_root)?;
    let xml = ws.read_artifact("Sitemap XML body", "sitemap.xml.body")?;
    let urls = sitemap_locs(&xml);
    let url_set: BTreeSet<&str> = urls.iter().map(String::as_str).collect();
    let expected = routes.expected_sitemap_url_count();

    info_event!("sitemap-verify-start", {
        "sitemapPath": ws.build_path("sitemap.xml.body").display().to_string(),
        "blogPostCount": routes.post_slugs.len(),
        "tagCount": routes.tag_slugs.len(),
        "categoryCount": routes.category_slugs.len(),
        "paginatedPageCount": routes.paginated_page_count,
        "expectedUrlCount": expected,
        "actualUrlCount": urls.len(),
    });

    let mut report = Report::new("sitemap-verify");
    if urls.len() != expected {
        report.fail(
            "url-count",
            format!("Expected {expected} URLs but found {}", urls.len()),
        );
    }

    let mut expect_url = |path: String, check: &str| {
        let url = ws.site.join(&path);
        if !url_set.contains(url.as_str()) {
            report.fail(check, format!("Missing sitemap URL: {url}"));
        }
    };
    for slug in &routes.post_slugs {
        expect_url(format!("/blog/{slug}"), "blog-post-route");
    }
    for page in routes.paginated_pages() {
        expect_url(format!("/blog/page/{page}"), "blog-pagination-route");
    }
    for tag in &routes.tag_slugs {
        expect_url(format!("/blog/tag/{tag}"), "blog-tag-route");
    }
    for category in &routes.category_slugs {
        expect_url(format!("/blog/category/{category}"), "blog-category-route");
    }

    report.detail("checkedUrls", urls.len());
    Ok(report)
}

/// Page numbers of the prerendered `blog/page/<n>.html` files, ascending.
pub fn prerendered_page_numbers(page_dir: &Path) -> Result<Vec<usize>, VerifyError> {
    if !page_dir.is_dir() {
        return Ok(Vec::new());
    }
    let mut pages = Vec::new();
    for entry in std::fs::read_dir(page_dir).map_err(|e| VerifyError::io(page_dir, e))? {
        let entry = entry.map_err(|e| VerifyError::io(page_dir, e))?;
        if !entry.file_type().is_ok_and(|t| t.is_file()) {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        let page = name
            .strip_suffix(".html")
            .and_then(|stem| stem.parse::<usize>().ok())
            .filter(|page| *page >= 2);
        if let Some(page) = page {
            pages.push(page);
        }
    }
    pages.sort_unstable();
    Ok(pages)
}

/// The index links to page 2 and every listing page links to its
/// neighbours.
pub fn verify_pagination(ws: &Workspace) -> Result<Report, VerifyError> {
    info_event!("blog-pagination-verify-start", {
        "appServerDir": ws.build_dir.display().to_string(),
    });
    ws.require_build()?;
    let index_html = ws.read_artifact("Prerendered /blog HTML file", "blog.html")?;

    let mut report = Report::new("blog-pagination-verify");
    let pages = prerendered_page_numbers(&ws.build_path("blog/page"))?;
    let Some(&max_page) = pages.last() else {
        report.detail("paginatedPageCount", 0);
        report.detail(
            "message",
            "No paginated blog pages detected; pagination link checks skipped.",
        );
        return Ok(report);
    };

    if !has_href(&index_html, "/blog/page/2") {
        report.push(
            Finding::new(
                "index-to-page-2-link",
                "Expected /blog to include link href=\"/blog/page/2\".",
            )
            .file("blog.html"),
        );
    }

    for &page in &pages {
        let relative = format!("blog/page/{page}.html");
        let path = ws.build_path(&relative);
        let html = std::fs::read_to_string(&path).map_err(|e| VerifyError::io(&path, e))?;

        let previous = if page == 2 {
            "/blog".to_string()
        } else {
            format!("/blog/page/{}", page - 1)
        };
        if !has_href(&html, &previous) {
            report.push(
                Finding::new(
                    "previous-link",
                    format!("Missing previous-page link href=\"{previous}\"."),
                )
                .file(relative.clone()),
            );
        }
        if page < max_page {
            let next = format!("/blog/page/{}", page + 1);
            if !has_href(&html, &next) {
                report.push(
                    Finding::new("next-link", format!("Missing next-page link href=\"{next}\"."))
                        .file(relative.clone()),
                );
            }
        }
    }

    report.detail("paginatedPageCount", pages.len());
    report.detail("maxPage", max_page);
    Ok(report)
}
