// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

/// Slug used for tag and category archive routes.
///
/// Lowercases, trims, spells `&` as `and`, drops everything outside
/// `[a-z0-9]`, whitespace and `-`, then turns whitespace runs into single
/// hyphens and collapses repeated hyphens.
pub fn taxonomy_slug(value: &str) -> String {
    let lowered = value.to_lowercase();
    let spelled = lowered.trim().replace('&', " and ");

    let mut slug = String::with_capacity(spelled.len());
    let mut pending_space = false;
    for ch in spelled.chars() {
        if ch.is_whitespace() {
            pending_space = true;
            continue;
        }
        if !(ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '-') {
            continue;
        }
        if pending_space {
            push_hyphen(&mut slug);
            pending_space = false;
        }
        if ch == '-' {
            push_hyphen(&mut slug);
        } else {
            slug.push(ch);
        }
    }
    if pending_space {
        push_hyphen(&mut slug);
    }
    slug
}

fn push_hyphen(slug: &mut String) {
    if !slug.ends_with('-') {
        slug.push('-');
    }
}

/// `darshan-timing-guide` -> `Darshan Timing Guide`.
pub fn title_case(value: &str) -> String {
    value
        .split('-')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Fallback slug for a post without one: relative path without `.md`,
/// separators turned into hyphens, then taxonomy-slugged.
pub fn fallback_slug(relative_path: &str) -> String {
    let stem = relative_path
        .strip_suffix(".md")
        .or_else(|| relative_path.strip_suffix(".MD"))
        .unwrap_or(relative_path);
    taxonomy_slug(&stem.replace(['/', '\\'], "-"))
}
