// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Surface verifiers over hand-written prerendered HTML trees.

use std::fs;
use std::path::Path;

use anyhow::Result;
use corpus::CANONICAL_ORIGIN;
use verify::surfaces::{KEY_ROUTES, verify_blog_posts, verify_canonical, verify_locations, verify_seo_build};
use verify::{Report, Workspace};

const KEYWORDS: &str = r#"<meta name="keywords" content="shegaon, gajanan maharaj, darshan"/>"#;
const OG_TITLE: &str = r#"<meta property="og:title" content="Shri Gajanan Maharaj Sansthan"/>"#;
const GEO_META: &str = concat!(
    r#"<meta name="geo.position" content="20.7930;76.6990"/>"#,
    r#"<meta name="geo.placename" content="Shegaon"/>"#,
    r#"<meta name="geo.region" content="IN-MH"/>"#,
    r#"<meta name="ICBM" content="20.7930, 76.6990"/>"#,
);

fn canonical(href: &str) -> String {
    format!(r#"<link rel="canonical" href="{href}"/>"#)
}

fn json_ld(types: &[&str]) -> String {
    let graph: Vec<_> = types.iter().map(|t| serde_json::json!({ "@type": t })).collect();
    let block = serde_json::json!({ "@context": "https://schema.org", "@graph": graph });
    format!(r#"<script type="application/ld+json">{block}</script>"#)
}

fn page(head: &[&str]) -> String {
    format!("<html><head>{}</head><body></body></html>", head.concat())
}

fn write_page(build_dir: &Path, relative: &str, html: &str) -> Result<()> {
    let path = build_dir.join(relative);
    fs::create_dir_all(path.parent().unwrap_or(build_dir))?;
    fs::write(path, html)?;
    Ok(())
}

fn build_workspace() -> Result<(tempfile::TempDir, Workspace)> {
    let dir = tempfile::tempdir()?;
    let ws = Workspace::new(dir.path());
    fs::create_dir_all(&ws.build_dir)?;
    Ok((dir, ws))
}

fn failing_slugs(report: &Report, check: &str) -> Vec<String> {
    report
        .failures()
        .iter()
        .filter(|f| f.check == check)
        .filter_map(|f| f.slug.clone().or_else(|| f.file.clone()))
        .collect()
}

#[test]
fn test_canonical_presence_singleton_and_origin() -> Result<()> {
    let (_dir, ws) = build_workspace()?;
    let good = canonical(&format!("{CANONICAL_ORIGIN}/contact"));
    write_page(&ws.build_dir, "contact.html", &page(&[KEYWORDS, &good]))?;
    write_page(&ws.build_dir, "not-seo.html", &page(&[]))?;

    let report = verify_canonical(&ws)?;
    assert!(report.passed(), "{:?}", report.failures());
    assert_eq!(report.details()["seoPageCount"], 1);

    write_page(&ws.build_dir, "booking.html", &page(&[KEYWORDS]))?;
    write_page(&ws.build_dir, "blog.html", &page(&[KEYWORDS, &good, &good]))?;
    let preview = canonical("https://my-preview.vercel.app/locations");
    write_page(&ws.build_dir, "locations.html", &page(&[KEYWORDS, &preview]))?;

    let report = verify_canonical(&ws)?;
    assert_eq!(failing_slugs(&report, "canonical-presence"), vec!["booking.html"]);
    assert_eq!(failing_slugs(&report, "canonical-singleton"), vec!["blog.html"]);
    assert_eq!(failing_slugs(&report, "canonical-origin"), vec!["locations.html"]);
    assert_eq!(report.details()["seoPageCount"], 4);
    Ok(())
}

/// Every key route with exactly the signals and schema types it needs.
fn write_key_routes(build_dir: &Path) -> Result<()> {
    for route in &KEY_ROUTES {
        let href = canonical(&format!("{CANONICAL_ORIGIN}/{}", route.file.trim_end_matches(".html")));
        let ld = json_ld(route.schema_types);
        write_page(build_dir, route.file, &page(&[KEYWORDS, OG_TITLE, &href, &ld]))?;
    }
    Ok(())
}

#[test]
fn test_seo_build_key_routes_pass() -> Result<()> {
    let (_dir, ws) = build_workspace()?;
    write_key_routes(&ws.build_dir)?;
    let report = verify_seo_build(&ws)?;
    assert!(report.passed(), "{:?}", report.failures());
    assert_eq!(report.details()["checkedRoutes"], KEY_ROUTES.len());
    Ok(())
}

#[test]
fn test_seo_build_reports_missing_signals_per_route() -> Result<()> {
    let (_dir, ws) = build_workspace()?;
    write_key_routes(&ws.build_dir)?;

    let home_canonical = canonical(&format!("{CANONICAL_ORIGIN}/"));
    let home_ld = json_ld(&["Organization", "WebSite"]);
    write_page(&ws.build_dir, "index.html", &page(&[KEYWORDS, &home_canonical, &home_ld]))?;

    let booking_canonical = canonical(&format!("{CANONICAL_ORIGIN}/booking"));
    write_page(&ws.build_dir, "booking.html", &page(&[KEYWORDS, &booking_canonical]))?;

    let post_canonical = canonical(&format!("{CANONICAL_ORIGIN}/blog/shegaon-travel-guide"));
    let post_ld = json_ld(&["BlogPosting"]);
    write_page(
        &ws.build_dir,
        "blog/shegaon-travel-guide.html",
        &page(&[KEYWORDS, OG_TITLE, &post_canonical, &post_ld]),
    )?;
    fs::remove_file(ws.build_path("contact.html"))?;

    let report = verify_seo_build(&ws)?;
    assert_eq!(failing_slugs(&report, "ogTitle"), vec!["home"]);
    assert_eq!(failing_slugs(&report, "jsonLd"), vec!["booking"]);
    assert_eq!(
        failing_slugs(&report, "schema-type"),
        vec!["booking", "booking", "blog-post-shegaon-travel-guide"]
    );
    assert_eq!(failing_slugs(&report, "file-exists"), vec!["contact"]);
    Ok(())
}

fn write_blog_post(blog_root: &Path, slug: &str) -> Result<()> {
    fs::create_dir_all(blog_root)?;
    let post = format!(
        "---\ntitle: \"{slug}\"\ndescription: \"d\"\ndate: \"2026-01-01\"\nslug: \"{slug}\"\ncategory: \"guides\"\n---\nBody.\n"
    );
    fs::write(blog_root.join(format!("{slug}.md")), post)?;
    Ok(())
}

#[test]
fn test_blog_post_pages_need_post_schema_types() -> Result<()> {
    let (_dir, ws) = build_workspace()?;
    write_blog_post(&ws.blog_root, "shegaon-travel-guide")?;
    write_blog_post(&ws.blog_root, "darshan-timings")?;

    let full = |slug: &str, types: &[&str]| {
        let href = canonical(&format!("{CANONICAL_ORIGIN}/blog/{slug}/"));
        page(&[KEYWORDS, OG_TITLE, &href, &json_ld(types)])
    };
    write_page(
        &ws.build_dir,
        "blog/shegaon-travel-guide.html",
        &full("shegaon-travel-guide", &["BlogPosting", "BreadcrumbList"]),
    )?;
    write_page(
        &ws.build_dir,
        "blog/darshan-timings.html",
        &full("darshan-timings", &["BlogPosting", "BreadcrumbList"]),
    )?;
    let report = verify_blog_posts(&ws)?;
    assert!(report.passed(), "{:?}", report.failures());
    assert_eq!(report.details()["validatedPostCount"], 2);

    write_page(
        &ws.build_dir,
        "blog/darshan-timings.html",
        &full("darshan-timings", &["BreadcrumbList"]),
    )?;
    write_page(
        &ws.build_dir,
        "blog/shegaon-travel-guide.html",
        &full("shegaon-travel-guide", &["BlogPosting"]),
    )?;
    let report = verify_blog_posts(&ws)?;
    assert_eq!(
        failing_slugs(&report, "schema-type"),
        vec!["darshan-timings", "shegaon-travel-guide"]
    );
    assert!(report.failures().iter().any(|f| f.reason.contains("\"BlogPosting\"")));
    assert!(report.failures().iter().any(|f| f.reason.contains("\"BreadcrumbList\"")));

    fs::remove_file(ws.build_path("blog/darshan-timings.html"))?;
    let report = verify_blog_posts(&ws)?;
    assert_eq!(failing_slugs(&report, "prerendered-file-exists"), vec!["darshan-timings"]);
    Ok(())
}

fn location_page(slug: &str, geo: &str, types: &[&str]) -> String {
    let href = canonical(&format!("{CANONICAL_ORIGIN}/locations/{slug}"));
    page(&[KEYWORDS, &href, geo, &json_ld(types)])
}

#[test]
fn test_location_pages_need_lodging_schema_and_geo_meta() -> Result<()> {
    let (_dir, ws) = build_workspace()?;
    let all_types = ["PlaceOfWorship", "LocalBusiness", "LodgingBusiness"];
    write_page(
        &ws.build_dir,
        "locations/shegaon-bhakt-niwas.html",
        &location_page("shegaon-bhakt-niwas", GEO_META, &all_types),
    )?;
    write_page(&ws.build_dir, "locations/index.html", &page(&[]))?;
    let report = verify_locations(&ws)?;
    assert!(report.passed(), "{:?}", report.failures());
    assert_eq!(report.details()["locationCount"], 1);

    write_page(
        &ws.build_dir,
        "locations/omkareshwar.html",
        &location_page("omkareshwar", GEO_META, &["PlaceOfWorship", "LocalBusiness"]),
    )?;
    let partial_geo = GEO_META.replace(r#"<meta name="ICBM" content="20.7930, 76.6990"/>"#, "");
    write_page(
        &ws.build_dir,
        "locations/shegaon-bhakt-niwas.html",
        &location_page("shegaon-bhakt-niwas", &partial_geo, &all_types),
    )?;

    let report = verify_locations(&ws)?;
    assert_eq!(failing_slugs(&report, "schema-type"), vec!["locations/omkareshwar.html"]);
    assert_eq!(
        failing_slugs(&report, "geo-meta"),
        vec!["locations/shegaon-bhakt-niwas.html"]
    );
    assert!(report.failures().iter().any(|f| f.reason.contains("\"LodgingBusiness\"")));
    assert!(report.failures().iter().any(|f| f.reason.contains("\"ICBM\"")));
    assert_eq!(report.details()["locationCount"], 2);
    Ok(())
}
