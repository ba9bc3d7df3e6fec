// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! One directory traversal for every reader of the blog root and the build tree.

use std::path::{Component, Path, PathBuf};

use walkdir::WalkDir;

use crate::CorpusError;

/// Names skipped while walking the blog root: underscore-prefixed entries
/// (`_ops/`, drafts) and README files.
pub fn is_ignored_content_name(name: &str) -> bool {
    name.starts_with('_') || name.eq_ignore_ascii_case("readme.md")
}

/// Never skip anything.
pub fn ignore_nothing(_name: &str) -> bool {
    false
}

/// Recursively collect regular files under `root` whose extension matches
/// `extension` (case-insensitive, without the dot).
///
/// Directories and files for which `ignore` returns true are pruned. The
/// result is sorted by path so every caller sees the same order. A missing
/// root yields an empty list.
pub fn collect_files<F>(root: &Path, extension: &str, ignore: F) -> Result<Vec<PathBuf>, CorpusError>
where
    F: Fn(&str) -> bool,
{
    if !root.exists() {
        return Ok(Vec::new());
    }

    let mut files = Vec::new();
    let walker = WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || !ignore(&entry.file_name().to_string_lossy()));

    for entry in walker {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let matches = entry
            .path()
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case(extension));
        if matches {
            files.push(entry.into_path());
        }
    }

    files.sort();
    Ok(files)
}

/// Markdown posts under the blog root.
pub fn markdown_files(blog_root: &Path) -> Result<Vec<PathBuf>, CorpusError> {
    collect_files(blog_root, "md", is_ignored_content_name)
}

/// `path` relative to `root`, with `/` separators regardless of platform.
pub fn relative_slash_path(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Lexically resolve `relative` under `root`.
///
/// Returns `None` when the result would leave `root` (absolute paths,
/// prefixes, or `..` climbing above it). Nothing is touched on disk.
pub fn resolve_within(root: &Path, relative: &str) -> Option<PathBuf> {
    let mut parts: Vec<&std::ffi::OsStr> = Vec::new();
    for component in Path::new(relative).components() {
        match component {
            Component::Normal(part) => parts.push(part),
            Component::CurDir => {}
            Component::ParentDir => {
                parts.pop()?;
            }
            Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    let mut resolved = root.to_path_buf();
    for part in parts {
        resolved.push(part);
    }
    Some(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_ignore_predicate() {
        assert!(is_ignored_content_name("_ops"));
        assert!(is_ignored_content_name("README.md"));
        assert!(is_ignored_content_name("readme.md"));
        assert!(!is_ignored_content_name("shegaon-travel-guide.md"));
    }

    #[test]
    fn test_collect_markdown_skips_ignored_entries() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("locations/shegaon")).unwrap();
        fs::create_dir_all(root.join("_ops")).unwrap();
        fs::write(root.join("locations/shegaon/b.md"), "b").unwrap();
        fs::write(root.join("a.MD"), "a").unwrap();
        fs::write(root.join("README.md"), "docs").unwrap();
        fs::write(root.join("_draft.md"), "draft").unwrap();
        fs::write(root.join("_ops/manifest.md"), "ops").unwrap();
        fs::write(root.join("notes.txt"), "txt").unwrap();

        let files = markdown_files(root).unwrap();
        let relative: Vec<String> = files.iter().map(|p| relative_slash_path(root, p)).collect();
        assert_eq!(relative, vec!["a.MD", "locations/shegaon/b.md"]);
    }

    #[test]
    fn test_missing_root_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let files = collect_files(&dir.path().join("nope"), "html", ignore_nothing).unwrap();
        assert!(files.is_empty());
    }

    #[test]
    fn test_resolve_within() {
        let root = Path::new("/site/content/blog");
        assert_eq!(
            resolve_within(root, "guides/a.md"),
            Some(PathBuf::from("/site/content/blog/guides/a.md"))
        );
        assert_eq!(
            resolve_within(root, "guides/../events/b.md"),
            Some(PathBuf::from("/site/content/blog/events/b.md"))
        );
        assert_eq!(resolve_within(root, "../../etc/passwd"), None);
        assert_eq!(resolve_within(root, "/etc/passwd"), None);
    }
}
