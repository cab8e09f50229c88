//! SEO metadata for post and static pages: canonical URL, hreflang
//! alternates, Open Graph and Twitter cards, and schema.org JSON-LD.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::content::faq::FaqItem;
use crate::content::{find_translation, ContentEntry};
use crate::locale::{self, Locale};

pub const X_DEFAULT: &str = "x-default";

/// Site-wide values every page's metadata is built from.
#[derive(Deserialize, Clone, Debug)]
pub struct SiteMeta {
    /// Scheme and host, e.g. `https://example.com`.
    #[serde(skip)]
    pub base_url: String,
    pub name: String,
    #[serde(default = "SiteMeta::default_cover")]
    pub default_cover: String,
    #[serde(default)]
    pub twitter_site: Option<String>,
    /// Home page description per locale.
    #[serde(default)]
    pub description: Localized,
}

#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct Localized {
    #[serde(default)]
    pub ru: String,
    #[serde(default)]
    pub en: String,
}

impl Localized {
    pub fn get(&self, locale: Locale) -> &str {
        match locale {
            Locale::Ru => &self.ru,
            Locale::En => &self.en,
        }
    }
}

impl SiteMeta {
    fn default_cover() -> String {
        "/images/og-default.jpg".to_string()
    }

    pub fn absolute(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        let base = self.base_url.trim_end_matches('/');
        if path.starts_with('/') {
            format!("{base}{path}")
        } else {
            format!("{base}/{path}")
        }
    }
}

/// A page that is not a post, e.g. the home page or a calculator.
#[derive(Clone, Debug)]
pub struct StaticPage {
    pub locale: Locale,
    /// Locale-neutral path: `/`, `/about`, `/calculators/paint`.
    pub path: String,
    pub title: String,
    pub description: String,
    /// Whether the page exists in the other locale as well.
    pub translated: bool,
}

#[derive(Clone, Debug, Default)]
pub struct MetadataOverrides {
    pub title: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
}

pub enum MetadataSubject<'a> {
    Post {
        entry: &'a ContentEntry,
        entries: &'a [ContentEntry],
    },
    Page(&'a StaticPage),
}

#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OpenGraphKind {
    Article,
    Website,
}

#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct OpenGraph {
    #[serde(rename = "type")]
    pub kind: OpenGraphKind,
    pub title: String,
    pub description: String,
    pub url: String,
    pub site_name: String,
    pub locale: String,
    pub alternate_locales: Vec<String>,
    pub images: Vec<String>,
    pub published_time: Option<String>,
    pub tags: Vec<String>,
}

#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct Twitter {
    pub card: String,
    pub site: Option<String>,
    pub title: String,
    pub description: String,
    pub images: Vec<String>,
}

#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct PageMetadata {
    pub title: String,
    pub description: String,
    pub canonical_url: String,
    /// hreflang tag → absolute URL, `x-default` last
    pub languages: IndexMap<String, String>,
    pub keywords: Vec<String>,
    pub open_graph: OpenGraph,
    pub twitter: Twitter,
}

/// Site-relative URLs of a page per locale; the page's own locale first.
fn alternates(subject: &MetadataSubject<'_>) -> (Locale, String, Vec<(Locale, String)>) {
    match subject {
        MetadataSubject::Post { entry, entries } => {
            let mut urls = vec![(entry.locale, entry.url.clone())];
            if let Some(translation) = find_translation(entry, entries).filter(|t| t.is_published()) {
                urls.push((translation.locale, translation.url.clone()));
            }
            (entry.locale, entry.url.clone(), urls)
        }
        MetadataSubject::Page(page) => {
            let own = locale::localized_path(page.locale, &page.path);
            let mut urls = vec![(page.locale, own.clone())];
            if page.translated {
                let other = page.locale.opposite();
                urls.push((other, locale::localized_path(other, &page.path)));
            }
            (page.locale, own, urls)
        }
    }
}

pub fn build_page_metadata(
    subject: &MetadataSubject<'_>,
    site: &SiteMeta,
    overrides: &MetadataOverrides,
) -> PageMetadata {
    let (current, url, urls) = alternates(subject);
    let canonical_url = site.absolute(&url);

    let mut languages = IndexMap::new();
    for (locale, url) in &urls {
        languages.insert(locale.tag().to_string(), site.absolute(url));
    }
    let default_url = urls
        .iter()
        .find(|(locale, _)| locale.is_default())
        .map_or(&url, |(_, url)| url);
    languages.insert(X_DEFAULT.to_string(), site.absolute(default_url));

    let (title, description, image, keywords, article) = match subject {
        MetadataSubject::Post { entry, .. } => (
            entry.display_title().to_string(),
            entry.display_description().to_string(),
            entry.cover_or(&site.default_cover).to_string(),
            if entry.keywords.is_empty() {
                entry.tags.clone()
            } else {
                entry.keywords.clone()
            },
            Some(*entry),
        ),
        MetadataSubject::Page(page) => (
            page.title.clone(),
            page.description.clone(),
            site.default_cover.clone(),
            Vec::new(),
            None,
        ),
    };

    let title = overrides.title.clone().unwrap_or(title);
    let description = overrides.description.clone().unwrap_or(description);
    let image = site.absolute(overrides.image.as_deref().unwrap_or(&image));

    let open_graph = OpenGraph {
        kind: if article.is_some() {
            OpenGraphKind::Article
        } else {
            OpenGraphKind::Website
        },
        title: title.clone(),
        description: description.clone(),
        url: canonical_url.clone(),
        site_name: site.name.clone(),
        locale: current.og_locale().to_string(),
        alternate_locales: urls
            .iter()
            .skip(1)
            .map(|(locale, _)| locale.og_locale().to_string())
            .collect(),
        images: vec![image.clone()],
        published_time: article.and_then(|e| e.date).map(|date| date.to_string()),
        tags: article.map(|e| e.tags.clone()).unwrap_or_default(),
    };

    let twitter = Twitter {
        card: "summary_large_image".to_string(),
        site: site.twitter_site.clone(),
        title: title.clone(),
        description: description.clone(),
        images: vec![image],
    };

    PageMetadata {
        title,
        description,
        canonical_url,
        languages,
        keywords,
        open_graph,
        twitter,
    }
}

/// schema.org `BlogPosting` for a post.
pub fn article_json_ld(entry: &ContentEntry, site: &SiteMeta) -> serde_json::Value {
    let mut article = json!({
        "@context": "https://schema.org",
        "@type": "BlogPosting",
        "headline": entry.display_title(),
        "description": entry.display_description(),
        "inLanguage": entry.locale.tag(),
        "mainEntityOfPage": site.absolute(&entry.url),
        "image": site.absolute(entry.cover_or(&site.default_cover)),
        "publisher": { "@type": "Organization", "name": site.name },
    });

    if let Some(date) = entry.date {
        article["datePublished"] = json!(date.to_string());
    }
    if let Some(author) = &entry.author {
        article["author"] = json!({ "@type": "Person", "name": author });
    }
    if !entry.keywords.is_empty() {
        article["keywords"] = json!(entry.keywords.join(", "));
    }

    article
}

/// schema.org `FAQPage`, or `None` when there are no questions.
pub fn faq_json_ld(items: &[FaqItem]) -> Option<serde_json::Value> {
    if items.is_empty() {
        return None;
    }

    let questions: Vec<_> = items
        .iter()
        .map(|item| {
            json!({
                "@type": "Question",
                "name": item.question,
                "acceptedAnswer": { "@type": "Answer", "text": item.answer },
            })
        })
        .collect();

    Some(json!({
        "@context": "https://schema.org",
        "@type": "FAQPage",
        "mainEntity": questions,
    }))
}
