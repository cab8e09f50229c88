use indexmap::IndexMap;
use serde::Serialize;
use time::Date;

use crate::content::faq::{extract_faq, strip_faq, FaqItem};
use crate::content::headings::Heading;
use crate::content::listing::related_posts;
use crate::content::{ContentEntry, ContentSet};
use crate::locale::Locale;
use crate::markdown::{self, Html};
use crate::metadata::{
    article_json_ld, build_page_metadata, faq_json_ld, MetadataOverrides, MetadataSubject, PageMetadata, SiteMeta,
};

const RELATED_LIMIT: usize = 3;

/// JSON that can sit inside a `<script>` element.
fn script_safe(value: &serde_json::Value) -> String {
    value.to_string().replace("</", "<\\/")
}

#[derive(Serialize, Clone, Debug)]
pub struct PostSummary {
    pub url: String,
    pub title: String,
    pub description: String,
    pub date: Option<Date>,
    pub cover: String,
    pub reading_time: u32,
    pub tags: Vec<String>,
}

impl PostSummary {
    pub fn new(entry: &ContentEntry, site: &SiteMeta) -> Self {
        PostSummary {
            url: entry.url.clone(),
            title: entry.display_title().to_string(),
            description: entry.display_description().to_string(),
            date: entry.date,
            cover: entry.cover_or(&site.default_cover).to_string(),
            reading_time: entry.reading_time,
            tags: entry.tags.clone(),
        }
    }
}

#[derive(Serialize, Clone, Debug)]
pub struct TranslationLink {
    pub locale: Locale,
    pub url: String,
    pub title: String,
}

/// Everything a post template needs.
#[derive(Serialize, Clone, Debug)]
pub struct PostView {
    pub locale: Locale,
    pub summary: PostSummary,
    pub author: Option<String>,
    pub toc: Vec<Heading>,
    pub content: Html,
    pub footnotes: IndexMap<String, Html>,
    pub faq: Vec<FaqItem>,
    pub translation: Option<TranslationLink>,
    pub related: Vec<PostSummary>,
    pub metadata: PageMetadata,
    /// Serialized JSON-LD documents for `<script type="application/ld+json">`
    pub json_ld: Vec<String>,
}

impl PostView {
    pub fn new(entry: &ContentEntry, set: &ContentSet, site: &SiteMeta) -> Self {
        let faq = extract_faq(&entry.body);
        let body = strip_faq(&entry.body);
        // lint issues surface through validation, not at render time
        let (rendered, _) = markdown::render(&body);

        let metadata = build_page_metadata(
            &MetadataSubject::Post {
                entry,
                entries: set.entries(),
            },
            site,
            &MetadataOverrides::default(),
        );

        let translation = set
            .translation_of(entry)
            .filter(|translation| translation.is_published())
            .map(|translation| TranslationLink {
                locale: translation.locale,
                url: translation.url.clone(),
                title: translation.display_title().to_string(),
            });

        let mut json_ld = vec![script_safe(&article_json_ld(entry, site))];
        if let Some(faq_page) = faq_json_ld(&faq) {
            json_ld.push(script_safe(&faq_page));
        }

        PostView {
            locale: entry.locale,
            summary: PostSummary::new(entry, site),
            author: entry.author.clone(),
            toc: rendered.headings,
            content: rendered.html,
            footnotes: rendered.footnotes,
            faq,
            translation,
            related: related_posts(entry, set.entries(), RELATED_LIMIT)
                .into_iter()
                .map(|post| PostSummary::new(post, site))
                .collect(),
            metadata,
            json_ld,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::entry::parse_document;
    use crate::content::reading::ReadingSpeed;

    fn site() -> SiteMeta {
        SiteMeta {
            base_url: "https://remont.example".to_string(),
            name: "Remont".to_string(),
            default_cover: "/images/og-default.jpg".to_string(),
            twitter_site: None,
            description: Default::default(),
        }
    }

    fn entry(path: &str, doc: &str) -> ContentEntry {
        let (frontmatter, body) = parse_document(path, doc).unwrap();
        ContentEntry::new(path, frontmatter, body, &ReadingSpeed::default())
    }

    #[test]
    fn test_post_view() {
        let set = ContentSet::new(vec![
            entry(
                "posts/plitka.md",
                "+++\ntitle = \"Плитка\"\ntags = [\"плитка\"]\n+++\n## Раскладка\nТекст.\n\n## FAQ\n### Сколько клея?\nМешок на 5 м².\n",
            ),
            entry("posts/en/tiles.md", "+++\ntitle = \"Tiles\"\ntranslation_of = \"plitka\"\n+++\nText\n"),
            entry("posts/zatirka.md", "+++\ntitle = \"Затирка\"\ntags = [\"плитка\"]\n+++\n"),
            entry("posts/chernovik.md", "+++\ntags = [\"плитка\"]\ndraft = true\n+++\n"),
        ]);

        let view = PostView::new(&set.entries()[0], &set, &site());

        assert_eq!(view.summary.title, "Плитка");
        assert_eq!(view.summary.cover, "/images/og-default.jpg");
        assert_eq!(view.toc.len(), 1);
        assert!(view.content.0.contains("id=\"раскладка\""));
        assert!(!view.content.0.contains("Сколько клея"));
        assert_eq!(view.faq.len(), 1);
        assert_eq!(view.json_ld.len(), 2);
        assert_eq!(view.translation.as_ref().map(|t| t.url.as_str()), Some("/en/posts/tiles"));
        assert_eq!(view.related.len(), 1);
        assert_eq!(view.related[0].url, "/posts/zatirka");
        assert_eq!(view.metadata.languages.len(), 3);
    }

    #[test]
    fn test_toc_anchors_exist_in_content() {
        let set = ContentSet::new(vec![entry(
            "posts/zatirka.md",
            "+++\ntitle = \"Затирка\"\n+++\n## См. [гайд](/posts/plitka)\n\nШвы\n---\n\n## Швы\n",
        )]);
        let view = PostView::new(&set.entries()[0], &set, &site());

        assert_eq!(view.toc[0].text, "См. гайд");
        assert_eq!(view.toc.len(), 3);
        for heading in &view.toc {
            assert!(view.content.0.contains(&format!("id=\"{}\"", heading.slug)));
        }
    }
}
