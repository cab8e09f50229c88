use std::cmp::{Ordering, Reverse};

use indexmap::IndexMap;
use serde::Serialize;

use super::entry::ContentEntry;
use crate::locale::Locale;

fn newest_first(a: &ContentEntry, b: &ContentEntry) -> Ordering {
    // `None` sorts below any date, so undated posts end up last
    b.date.cmp(&a.date).then_with(|| a.slug.cmp(&b.slug))
}

/// Date descending, undated posts last, ties broken by slug.
pub fn sort_posts(posts: &mut [&ContentEntry]) {
    posts.sort_by(|a, b| newest_first(a, b));
}

/// Non-draft entries, optionally of one locale, newest first.
pub fn published_posts<'a>(entries: &'a [ContentEntry], locale: Option<Locale>) -> Vec<&'a ContentEntry> {
    let mut posts: Vec<_> = entries
        .iter()
        .filter(|e| e.is_published())
        .filter(|e| locale.map_or(true, |locale| e.locale == locale))
        .collect();
    sort_posts(&mut posts);
    posts
}

/// Published posts of the same locale sharing at least one tag with `entry`,
/// most shared tags first.
pub fn related_posts<'a>(entry: &ContentEntry, entries: &'a [ContentEntry], limit: usize) -> Vec<&'a ContentEntry> {
    let mut scored: Vec<(usize, &ContentEntry)> = published_posts(entries, Some(entry.locale))
        .into_iter()
        .filter(|candidate| candidate.url != entry.url)
        .map(|candidate| {
            let shared = candidate.tags.iter().filter(|tag| entry.tags.contains(tag)).count();
            (shared, candidate)
        })
        .filter(|(shared, _)| *shared > 0)
        .collect();

    // stable sort keeps the newest-first order among equal scores
    scored.sort_by_key(|(shared, _)| Reverse(*shared));
    scored.into_iter().take(limit).map(|(_, post)| post).collect()
}

#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct TagSummary {
    pub name: String,
    pub slug: String,
    pub count: usize,
}

/// Tags of published posts, keyed by their URL slug, in order of first use
/// by the newest posts.
pub fn tag_index(entries: &[ContentEntry], locale: Locale) -> IndexMap<String, TagSummary> {
    let mut tags: IndexMap<String, TagSummary> = IndexMap::new();

    for post in published_posts(entries, Some(locale)) {
        for tag in &post.tags {
            let slug = slug::slugify(tag);
            if slug.is_empty() {
                continue;
            }
            tags.entry(slug.clone())
                .or_insert_with(|| TagSummary {
                    name: tag.clone(),
                    slug,
                    count: 0,
                })
                .count += 1;
        }
    }

    tags
}
