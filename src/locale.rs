//! Locale, slug and URL derivation for content entries and static pages.
//!
//! Every other module goes through these functions; nothing else inspects a
//! source path to decide which language it belongs to.

use serde::{Deserialize, Serialize};
use std::fmt;

const POSTS_PREFIX: &str = "posts/";
const MARKDOWN_EXTENSIONS: [&str; 2] = [".md", ".mdx"];

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    Ru,
    En,
}

impl Locale {
    pub const ALL: [Locale; 2] = [Locale::Ru, Locale::En];

    /// The hreflang / `lang` attribute value.
    pub fn tag(self) -> &'static str {
        match self {
            Locale::Ru => "ru",
            Locale::En => "en",
        }
    }

    /// Open Graph locale (`og:locale`).
    pub fn og_locale(self) -> &'static str {
        match self {
            Locale::Ru => "ru_RU",
            Locale::En => "en_US",
        }
    }

    pub fn opposite(self) -> Locale {
        match self {
            Locale::Ru => Locale::En,
            Locale::En => Locale::Ru,
        }
    }

    /// Path prefix in front of every URL of this locale. Russian is the
    /// default locale and is served unprefixed.
    pub fn url_prefix(self) -> &'static str {
        match self {
            Locale::Ru => "",
            Locale::En => "/en",
        }
    }

    pub fn is_default(self) -> bool {
        self == Locale::Ru
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

fn normalize(source_path: &str) -> String {
    let path = source_path.replace('\\', "/");
    let path = path.trim_start_matches("./").trim_start_matches('/');
    path.to_string()
}

/// `en` if any segment of the path is exactly `en`, otherwise `ru`.
pub fn resolve_locale(source_path: &str) -> Locale {
    if normalize(source_path).split('/').any(|segment| segment == "en") {
        Locale::En
    } else {
        Locale::Ru
    }
}

/// Path-derived identifier: strips `posts/`, the `en/` segment of English
/// entries, and a markdown extension.
pub fn resolve_slug(source_path: &str) -> String {
    let path = normalize(source_path);
    let mut slug = path.strip_prefix(POSTS_PREFIX).unwrap_or(&path);

    if resolve_locale(source_path) == Locale::En {
        slug = slug.strip_prefix("en/").unwrap_or(slug);
    }

    for extension in MARKDOWN_EXTENSIONS {
        if let Some(stripped) = slug.strip_suffix(extension) {
            slug = stripped;
            break;
        }
    }

    slug.trim_matches('/').to_string()
}

pub fn resolve_url(locale: Locale, slug: &str) -> String {
    format!("{}/posts/{}", locale.url_prefix(), slug)
}

/// URL of a locale-neutral static page path (`/`, `/about`, `/calculators/paint`).
pub fn localized_path(locale: Locale, path: &str) -> String {
    let path = if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{path}")
    };

    match (locale, path.as_str()) {
        (Locale::En, "/") => "/en".to_string(),
        _ => format!("{}{}", locale.url_prefix(), path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_locale() {
        assert_eq!(resolve_locale("posts/en/kitchen.md"), Locale::En);
        assert_eq!(resolve_locale("posts\\en\\kitchen.md"), Locale::En);
        assert_eq!(resolve_locale("posts/kitchen.md"), Locale::Ru);
        assert_eq!(resolve_locale("posts/english-tiles.md"), Locale::Ru);
        assert_eq!(resolve_locale("posts/guides/en"), Locale::En);
    }

    #[test]
    fn test_resolve_slug() {
        assert_eq!(resolve_slug("posts/kitchen.md"), "kitchen");
        assert_eq!(resolve_slug("posts/en/kitchen.md"), "kitchen");
        assert_eq!(resolve_slug("posts\\en\\kitchen"), "kitchen");
        assert_eq!(resolve_slug("./posts/guides/tile.mdx"), "guides/tile");
        // only the leading `en/` of an English path is stripped
        assert_eq!(resolve_slug("posts/en/en/x.md"), "en/x");
    }

    #[test]
    fn test_resolve_url() {
        assert_eq!(resolve_url(Locale::Ru, "kitchen"), "/posts/kitchen");
        assert_eq!(resolve_url(Locale::En, "kitchen"), "/en/posts/kitchen");
    }

    #[test]
    fn test_derivation_is_stable() {
        for path in ["posts/en/paint.md", "posts/paint.md", "posts\\en\\a\\b.md"] {
            let first = resolve_url(resolve_locale(path), &resolve_slug(path));
            let second = resolve_url(resolve_locale(path), &resolve_slug(path));
            assert_eq!(first, second);
        }
    }

    #[test]
    fn test_localized_path() {
        assert_eq!(localized_path(Locale::Ru, "/"), "/");
        assert_eq!(localized_path(Locale::En, "/"), "/en");
        assert_eq!(localized_path(Locale::En, "calculators/paint"), "/en/calculators/paint");
        assert_eq!(localized_path(Locale::Ru, "/about"), "/about");
    }

    #[test]
    fn test_locale_serde() {
        assert_eq!(serde_json::to_string(&Locale::En).unwrap(), "\"en\"");
        let locale: Locale = serde_json::from_str("\"ru\"").unwrap();
        assert_eq!(locale, Locale::Ru);
    }
}
