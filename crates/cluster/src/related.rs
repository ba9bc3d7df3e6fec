// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Related-post selection ("extended neighbor" policy).
//!
//! A post links to the posts two before and two after it in its own
//! cluster, wrapping around, then to fixed slugs supplied by the caller.
//! The window width and the cap are fixed numbers with no deeper meaning;
//! keep them as they are so regenerated output stays byte-identical.

/// Offsets from the current index, in link order.
const NEIGHBOR_OFFSETS: [isize; 4] = [-2, -1, 1, 2];

pub const RELATED_SLUG_CAP: usize = 10;

/// Core seed slugs every generated post links to.
pub const CORE_RELATED_COUNT: usize = 3;

/// Indices `i-2, i-1, i+1, i+2` modulo `len`, skipping `index` itself and repeats.
pub fn neighbor_indices(index: usize, len: usize) -> Vec<usize> {
    let mut indices = Vec::with_capacity(NEIGHBOR_OFFSETS.len());
    if len == 0 {
        return indices;
    }
    let len_signed = len as isize;
    for offset in NEIGHBOR_OFFSETS {
        let candidate = (index as isize + offset).rem_euclid(len_signed) as usize;
        if candidate != index && !indices.contains(&candidate) {
            indices.push(candidate);
        }
    }
    indices
}

/// Related slugs for `cluster[index]`: neighbors first, then `extra` in
/// order, deduplicated, never the post itself, at most [`RELATED_SLUG_CAP`].
pub fn related_slugs<S: AsRef<str>>(cluster: &[S], index: usize, extra: &[&str]) -> Vec<String> {
    let own = cluster.get(index).map(|s| s.as_ref());
    let neighbors = neighbor_indices(index, cluster.len())
        .into_iter()
        .filter_map(|i| cluster.get(i).map(|s| s.as_ref()));

    let mut related: Vec<String> = Vec::new();
    for slug in neighbors.chain(extra.iter().copied()) {
        if related.len() == RELATED_SLUG_CAP {
            break;
        }
        if Some(slug) == own || related.iter().any(|existing| existing == slug) {
            continue;
        }
        related.push(slug.to_string());
    }
    related
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_neighbor_window_wraps() {
        assert_eq!(neighbor_indices(0, 30), vec![28, 29, 1, 2]);
        assert_eq!(neighbor_indices(29, 30), vec![27, 28, 0, 1]);
        assert_eq!(neighbor_indices(2, 5), vec![0, 1, 3, 4]);
    }

    #[test]
    fn test_small_clusters() {
        assert!(neighbor_indices(0, 1).is_empty());
        assert_eq!(neighbor_indices(0, 2), vec![1]);
        assert_eq!(neighbor_indices(1, 3), vec![2, 0]);
        assert!(neighbor_indices(0, 0).is_empty());
    }

    #[test]
    fn test_related_union_dedupe_and_cap() {
        let cluster: Vec<String> = (0..6).map(|i| format!("p{i}")).collect();
        let extra = ["core-a", "p1", "core-b", "core-c", "pillar-a", "pillar-b", "tertiary-a", "tertiary-b"];
        let related = related_slugs(&cluster, 0, &extra);
        assert_eq!(
            related,
            vec!["p4", "p5", "p1", "p2", "core-a", "core-b", "core-c", "pillar-a", "pillar-b", "tertiary-a"]
        );
        assert_eq!(related.len(), RELATED_SLUG_CAP);
    }

    #[test]
    fn test_related_never_contains_self() {
        let cluster = ["only-guide"];
        let related = related_slugs(&cluster, 0, &["only-guide", "core-a"]);
        assert_eq!(related, vec!["core-a"]);
    }
}
