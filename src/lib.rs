//! Content core of a bilingual (Russian and English) renovation blog.
//!
//! Posts are markdown files with TOML frontmatter under `<root>/posts`,
//! English ones under `posts/en`. Loading resolves each file's locale, slug
//! and URL, estimates reading time, and pulls out headings and FAQ blocks.
//! [`content::ContentSet::validate`] reports every problem in one pass and
//! [`metadata`] builds the SEO metadata for a page. [`calc`] holds the
//! paint, tile, wallpaper and budget calculators.

pub mod calc;
pub mod compat;
pub mod config;
pub mod content;
pub mod error;
pub mod locale;
pub mod markdown;
pub mod metadata;
pub mod page;
pub mod server;
pub mod store;
