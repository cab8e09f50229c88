use std::collections::{HashMap, HashSet};
use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

use super::entry::ContentEntry;
use super::find_translation;
use crate::locale::Locale;
use crate::markdown::{self, MarkdownIssue};

/// Existence check for files under the public directory.
pub trait AssetStore {
    fn asset_exists(&self, path: &str) -> bool;
}

impl<F> AssetStore for F
where
    F: Fn(&str) -> bool,
{
    fn asset_exists(&self, path: &str) -> bool {
        self(path)
    }
}

/// Assets served from a directory on disk; `/images/a.jpg` maps to
/// `<root>/images/a.jpg`.
#[derive(Debug, Clone)]
pub struct PublicDir(pub PathBuf);

impl AssetStore for PublicDir {
    fn asset_exists(&self, path: &str) -> bool {
        let relative = path.split(['?', '#']).next().unwrap_or(path);
        let relative = relative.trim_start_matches('/');
        if relative.is_empty() || relative.split('/').any(|segment| segment == "..") {
            return false;
        }
        self.0.join(relative).is_file()
    }
}

#[derive(Error, Serialize, Clone, Debug, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ValidationError {
    #[error("{path}: missing required field `{field}`")]
    MissingField { path: String, field: &'static str },

    #[error("{path}: frontmatter cannot be parsed: {reason}")]
    MalformedFrontmatter { path: String, reason: String },

    #[error("{path}: `{value}` is not a YYYY-MM-DD date")]
    InvalidDate { path: String, value: String },

    #[error("duplicate slug `{slug}` for locale `{locale}` in {paths:?}")]
    DuplicateSlug {
        locale: Locale,
        slug: String,
        paths: Vec<String>,
    },

    #[error("duplicate url `{url}` in {paths:?}")]
    DuplicateUrl { url: String, paths: Vec<String> },

    #[error("{path}: referenced asset `{asset}` does not exist")]
    MissingAsset { path: String, asset: String },

    #[error("{path}: translation_of `{translation_of}` matches no {expected} entry")]
    UnresolvedTranslation {
        path: String,
        translation_of: String,
        expected: Locale,
    },

    #[error("{path}: link to `{target}` matches no entry")]
    BrokenInternalLink { path: String, target: String },

    #[error("{path}: {issue:?}")]
    Markdown { path: String, issue: MarkdownIssue },
}

impl ValidationError {
    pub fn code(&self) -> &'static str {
        match self {
            ValidationError::MissingField { .. } => "MISSING_FIELD",
            ValidationError::MalformedFrontmatter { .. } => "MALFORMED_FRONTMATTER",
            ValidationError::InvalidDate { .. } => "INVALID_DATE",
            ValidationError::DuplicateSlug { .. } => "DUPLICATE_SLUG",
            ValidationError::DuplicateUrl { .. } => "DUPLICATE_URL",
            ValidationError::MissingAsset { .. } => "MISSING_ASSET",
            ValidationError::UnresolvedTranslation { .. } => "UNRESOLVED_TRANSLATION",
            ValidationError::BrokenInternalLink { .. } => "BROKEN_INTERNAL_LINK",
            ValidationError::Markdown { .. } => "MARKDOWN",
        }
    }
}

fn is_remote(asset: &str) -> bool {
    asset.starts_with("http://") || asset.starts_with("https://") || asset.starts_with("//") || asset.starts_with("data:")
}

fn required_fields(entry: &ContentEntry, errors: &mut Vec<ValidationError>) {
    let missing = [
        ("title", entry.title.is_none()),
        ("description", entry.description.is_none()),
        ("date", entry.date.is_none()),
        ("slug", entry.slug.is_empty()),
        ("cover", entry.cover.is_none()),
    ];

    for (field, is_missing) in missing {
        if is_missing {
            errors.push(ValidationError::MissingField {
                path: entry.source_path.clone(),
                field,
            });
        }
    }
}

fn duplicates<'a, K, F>(entries: &'a [ContentEntry], key: F) -> Vec<(K, Vec<String>)>
where
    K: std::hash::Hash + Eq + Clone,
    F: Fn(&'a ContentEntry) -> K,
{
    let mut order = Vec::new();
    let mut groups: HashMap<K, Vec<String>> = HashMap::new();

    for entry in entries {
        let k = key(entry);
        let paths = groups.entry(k.clone()).or_default();
        if paths.is_empty() {
            order.push(k);
        }
        paths.push(entry.source_path.clone());
    }

    order
        .into_iter()
        .filter_map(|k| {
            let paths = groups.remove(&k)?;
            (paths.len() > 1).then_some((k, paths))
        })
        .collect()
}

/// Every problem in the content set, in a stable order: per-entry checks in
/// entry order, then duplicate slugs, then duplicate URLs.
pub fn validate_content_set(entries: &[ContentEntry], assets: &dyn AssetStore) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let urls: HashSet<&str> = entries.iter().map(|e| e.url.as_str()).collect();

    for entry in entries {
        required_fields(entry, &mut errors);

        if let Some(cover) = &entry.cover {
            if !is_remote(cover) && !assets.asset_exists(cover) {
                errors.push(ValidationError::MissingAsset {
                    path: entry.source_path.clone(),
                    asset: cover.clone(),
                });
            }
        }

        if let Some(translation_of) = &entry.translation_of {
            if find_translation(entry, entries).is_none() {
                errors.push(ValidationError::UnresolvedTranslation {
                    path: entry.source_path.clone(),
                    translation_of: translation_of.clone(),
                    expected: entry.locale.opposite(),
                });
            }
        }

        let (rendered, issues) = markdown::render(&entry.body);

        for image in rendered.images.iter().filter(|image| !is_remote(image)) {
            if !assets.asset_exists(image) {
                errors.push(ValidationError::MissingAsset {
                    path: entry.source_path.clone(),
                    asset: image.clone(),
                });
            }
        }

        for target in rendered.internal_links {
            let is_post_link = target.starts_with("/posts/") || target.starts_with("/en/posts/");
            if is_post_link && !urls.contains(target.as_str()) {
                errors.push(ValidationError::BrokenInternalLink {
                    path: entry.source_path.clone(),
                    target,
                });
            }
        }

        errors.extend(issues.into_iter().map(|issue| ValidationError::Markdown {
            path: entry.source_path.clone(),
            issue,
        }));
    }

    for ((locale, slug), paths) in duplicates(entries, |e| (e.locale, e.slug.as_str())) {
        errors.push(ValidationError::DuplicateSlug {
            locale,
            slug: slug.to_string(),
            paths,
        });
    }

    for (url, paths) in duplicates(entries, |e| e.url.as_str()) {
        errors.push(ValidationError::DuplicateUrl {
            url: url.to_string(),
            paths,
        });
    }

    errors
}
