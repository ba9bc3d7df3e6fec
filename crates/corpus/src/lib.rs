// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! # Corpus: the markdown blog as data
//!
//! Everything that reads `content/blog` goes through this crate: the shared
//! directory traversal, the typed frontmatter boundary, internal link
//! extraction, taxonomy slugs and the post inventory used by the renderer
//! and the build-output verifiers. Site-wide constants (canonical origin,
//! known locations, page size) live in [`site`].

mod error;
pub mod frontmatter;
pub mod inventory;
pub mod links;
pub mod site;
pub mod taxonomy;
pub mod walk;

pub use error::CorpusError;
pub use frontmatter::{Frontmatter, MarkdownDocument, parse_document};
pub use inventory::{Post, PostInventory};
pub use site::{CANONICAL_ORIGIN, SiteUrl};
pub use taxonomy::{taxonomy_slug, title_case};
pub use walk::{collect_files, markdown_files, relative_slash_path};
