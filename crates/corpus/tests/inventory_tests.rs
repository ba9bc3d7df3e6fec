// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use std::fs;

use anyhow::Result;
use corpus::{PostInventory, links::extract_internal_links};
use diagnostics::WarnOnce;

const GOOD: &str = r#"---
title: "Shegaon Travel Guide"
slug: "shegaon-travel-guide"
date: "2026-02-10"
tags: ["shegaon", "travel"]
category: "guides"
---
Visit [Shegaon](/locations/shegaon-bhakt-niwas), [book](/booking) and [more](/blog/welcome-to-sansthan).
"#;

const BROKEN: &str = "---\ntags:\n  - nested: map\n---\nbody\n";

#[test]
fn test_inventory_skips_malformed_and_ignored_files() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let root = dir.path();
    fs::create_dir_all(root.join("guides"))?;
    fs::create_dir_all(root.join("_ops"))?;
    fs::write(root.join("guides/shegaon-travel-guide.md"), GOOD)?;
    fs::write(root.join("broken.md"), BROKEN)?;
    fs::write(root.join("untitled post.md"), "plain body\n")?;
    fs::write(root.join("README.md"), GOOD)?;
    fs::write(root.join("_ops/notes.md"), GOOD)?;

    let mut warnings = WarnOnce::new();
    let inventory = PostInventory::load(root, &mut warnings)?;

    let slugs: Vec<String> = inventory.slugs().into_iter().collect();
    assert_eq!(slugs, vec!["shegaon-travel-guide", "untitled-post"]);
    assert_eq!(warnings.len(), 1);

    let post = &inventory.posts()[0];
    assert_eq!(post.relative_path, "guides/shegaon-travel-guide.md");
    assert_eq!(extract_internal_links(&post.body).len(), 3);
    Ok(())
}

#[test]
fn test_missing_blog_root_is_empty() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let mut warnings = WarnOnce::new();
    let inventory = PostInventory::load(&dir.path().join("content/blog"), &mut warnings)?;
    assert!(inventory.is_empty());
    assert_eq!(inventory.paginated_page_count(), 0);
    Ok(())
}
