//! Posts: loading, derived fields, translation pairing, listings and validation.

pub mod entry;
pub mod faq;
pub mod headings;
pub mod listing;
pub mod reading;
pub mod source;
pub mod validate;

use indexmap::IndexMap;

pub use entry::{ContentEntry, Frontmatter};
pub use validate::{AssetStore, PublicDir, ValidationError};

use crate::locale::Locale;

/// The counterpart of `entry` in the other locale.
///
/// An explicit `translation_of` on `entry` wins; otherwise the first entry of
/// the other locale whose `translation_of` names `entry` is used.
pub fn find_translation<'a>(entry: &ContentEntry, entries: &'a [ContentEntry]) -> Option<&'a ContentEntry> {
    let other = entry.locale.opposite();

    match &entry.translation_of {
        Some(target) => entries
            .iter()
            .find(|candidate| candidate.locale == other && &candidate.slug == target),
        None => entries
            .iter()
            .find(|candidate| candidate.locale == other && candidate.translation_of.as_deref() == Some(entry.slug.as_str())),
    }
}

/// Every loaded post, read-only for the lifetime of the process.
#[derive(Debug, Default)]
pub struct ContentSet {
    entries: Vec<ContentEntry>,
    by_url: IndexMap<String, usize>,
}

impl ContentSet {
    pub fn new(entries: Vec<ContentEntry>) -> Self {
        let mut by_url = IndexMap::with_capacity(entries.len());
        for (index, entry) in entries.iter().enumerate() {
            // first entry wins; duplicates are a validation error
            by_url.entry(entry.url.clone()).or_insert(index);
        }
        ContentSet { entries, by_url }
    }

    pub fn entries(&self) -> &[ContentEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn by_url(&self, url: &str) -> Option<&ContentEntry> {
        let url = match url.trim_end_matches('/') {
            "" => "/",
            trimmed => trimmed,
        };
        self.by_url.get(url).map(|&index| &self.entries[index])
    }

    /// Like [`ContentSet::by_url`], but drafts are treated as absent.
    pub fn published_by_url(&self, url: &str) -> Option<&ContentEntry> {
        self.by_url(url).filter(|entry| entry.is_published())
    }

    pub fn translation_of(&self, entry: &ContentEntry) -> Option<&ContentEntry> {
        find_translation(entry, &self.entries)
    }

    pub fn published(&self, locale: Option<Locale>) -> Vec<&ContentEntry> {
        listing::published_posts(&self.entries, locale)
    }

    pub fn validate(&self, assets: &dyn AssetStore) -> Vec<ValidationError> {
        validate::validate_content_set(&self.entries, assets)
    }
}
