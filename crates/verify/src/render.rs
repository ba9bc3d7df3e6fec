// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Renders the crawler artifacts for a corpus: `sitemap.xml.body`,
//! `robots.txt.body`, `feed.xml.body` and `feed.xml.meta`, in the same
//! shape the site's own routes produce.

use std::fmt::Write as _;
use std::path::Path;

use corpus::site::{KNOWN_LOCATION_IDS, STATIC_ROUTES};
use corpus::{Post, PostInventory, SiteUrl};
use diagnostics::info_event;

use crate::crawl::{FEED_BODY_RELATIVE, FEED_META_RELATIVE, ROBOTS_BODY_RELATIVE};
use crate::routes::RouteInventory;
use crate::VerifyError;

pub const SITEMAP_BODY_RELATIVE: &str = "sitemap.xml.body";

pub const FEED_TITLE: &str = "Gajanan Maharaj Sansthan Blog";
pub const FEED_DESCRIPTION: &str = "Latest updates and articles from Gajanan Maharaj Sansthan";

/// Escape the five XML special characters.
pub fn escape_xml(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            '\'' => out.push_str("&apos;"),
            '"' => out.push_str("&quot;"),
            other => out.push(other),
        }
    }
    out
}

/// Rendered artifact bodies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifacts {
    pub sitemap: String,
    pub robots: String,
    pub feed: String,
    pub feed_meta: String,
}

impl Artifacts {
    pub fn render(inventory: &PostInventory, site: &SiteUrl) -> Self {
        Self {
            sitemap: render_sitemap(inventory, site),
            robots: render_robots(site),
            feed: render_feed(inventory, site),
            feed_meta: serde_json::json!({
                "status": 200,
                "headers": { "content-type": "text/xml" },
            })
            .to_string(),
        }
    }

    /// Write every artifact under `out_dir`, creating it if needed.
    pub fn write(&self, out_dir: &Path) -> Result<(), VerifyError> {
        std::fs::create_dir_all(out_dir).map_err(|e| VerifyError::io(out_dir, e))?;
        for (name, body) in [
            (SITEMAP_BODY_RELATIVE, &self.sitemap),
            (ROBOTS_BODY_RELATIVE, &self.robots),
            (FEED_BODY_RELATIVE, &self.feed),
            (FEED_META_RELATIVE, &self.feed_meta),
        ] {
            let path = out_dir.join(name);
            std::fs::write(&path, body).map_err(|e| VerifyError::io(&path, e))?;
        }
        Ok(())
    }
}

fn push_url(xml: &mut String, loc: &str, lastmod: Option<String>) {
    xml.push_str("<url>\n");
    _ = writeln!(xml, "<loc>{}</loc>", escape_xml(loc));
    if let Some(lastmod) = lastmod {
        _ = writeln!(xml, "<lastmod>{lastmod}</lastmod>");
    }
    xml.push_str("</url>\n");
}

fn post_lastmod(post: &Post) -> Option<String> {
    post.published().map(|date| date.format("%Y-%m-%d").to_string())
}

/// Static routes, location pages, posts, listing pages, tag and category
/// archives.
pub fn render_sitemap(inventory: &PostInventory, site: &SiteUrl) -> String {
    let routes = RouteInventory::from_posts(inventory);
    let mut xml = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n",
    );
    for route in STATIC_ROUTES {
        push_url(&mut xml, &site.join(route), None);
    }
    for id in KNOWN_LOCATION_IDS {
        push_url(&mut xml, &site.join(&format!("/locations/{id}")), None);
    }
    for post in inventory.posts() {
        push_url(&mut xml, &site.join(&format!("/blog/{}", post.slug)), post_lastmod(post));
    }
    for page in routes.paginated_pages() {
        push_url(&mut xml, &site.join(&format!("/blog/page/{page}")), None);
    }
    for tag in &routes.tag_slugs {
        push_url(&mut xml, &site.join(&format!("/blog/tag/{tag}")), None);
    }
    for category in &routes.category_slugs {
        push_url(&mut xml, &site.join(&format!("/blog/category/{category}")), None);
    }
    xml.push_str("</urlset>\n");
    xml
}

pub fn render_robots(site: &SiteUrl) -> String {
    let origin = site.origin();
    format!(
        "User-Agent: *\n\
         Allow: /\n\
         Disallow: /api/\n\
         Disallow: /_next/\n\
         Disallow: /admin/\n\
         \n\
         User-Agent: Googlebot-Image\n\
         Allow: /images/\n\
         Allow: /gallery/\n\
         \n\
         Host: {origin}\n\
         Sitemap: {origin}/sitemap.xml\n"
    )
}

/// RSS 2.0 with one item per post, newest first. `lastBuildDate` is the
/// newest post date so the output only changes with the corpus.
pub fn render_feed(inventory: &PostInventory, site: &SiteUrl) -> String {
    let newest = inventory
        .posts()
        .iter()
        .filter_map(Post::published)
        .max()
        .map(|date| date.and_utc().to_rfc2822())
        .unwrap_or_default();

    let mut xml = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\" ?>\n");
    xml.push_str("<rss version=\"2.0\" xmlns:atom=\"http://www.w3.org/2005/Atom\">\n<channel>\n");
    _ = writeln!(xml, "<title>{}</title>", escape_xml(FEED_TITLE));
    _ = writeln!(xml, "<link>{}</link>", site.origin());
    _ = writeln!(xml, "<description>{}</description>", escape_xml(FEED_DESCRIPTION));
    xml.push_str("<language>en-us</language>\n");
    _ = writeln!(xml, "<lastBuildDate>{newest}</lastBuildDate>");
    _ = writeln!(
        xml,
        "<atom:link href=\"{}\" rel=\"self\" type=\"application/rss+xml\" />",
        site.join("/feed.xml")
    );

    for post in inventory.posts() {
        let link = site.join(&format!("/blog/{}", post.slug));
        xml.push_str("<item>\n");
        _ = writeln!(xml, "<title>{}</title>", escape_xml(&post.title()));
        _ = writeln!(xml, "<link>{link}</link>");
        _ = writeln!(xml, "<description>{}</description>", escape_xml(&post.description()));
        if let Some(date) = post.published() {
            _ = writeln!(xml, "<pubDate>{}</pubDate>", date.and_utc().to_rfc2822());
        }
        _ = writeln!(xml, "<guid>{link}</guid>");
        if let Some(author) = post.frontmatter.author() {
            _ = writeln!(xml, "<author>{}</author>", escape_xml(author));
        }
        for tag in &post.frontmatter.tags {
            _ = writeln!(xml, "<category>{}</category>", escape_xml(tag));
        }
        xml.push_str("</item>\n");
    }
    xml.push_str("</channel>\n</rss>\n");
    xml
}

/// Render the artifacts for the corpus under `blog_root` into `out_dir`.
pub fn write_artifacts(blog_root: &Path, site: &SiteUrl, out_dir: &Path) -> Result<Artifacts, VerifyError> {
    let mut warnings = diagnostics::WarnOnce::new();
    let inventory = PostInventory::load(blog_root, &mut warnings)?;
    let artifacts = Artifacts::render(&inventory, site);
    artifacts.write(out_dir)?;
    info_event!("seo-artifacts-rendered", {
        "outDir": out_dir.display().to_string(),
        "postCount": inventory.len(),
        "sitemapUrlCount": RouteInventory::from_posts(&inventory).expected_sitemap_url_count(),
    });
    Ok(artifacts)
}
