use indexmap::{IndexMap, IndexSet};
use pulldown_cmark::{
    BrokenLink, CowStr, Event, HeadingLevel, LinkType, Options, Parser, Tag, TagEnd,
};
use serde::Serialize;

use crate::content::headings::{Heading, HeadingSlugger};

#[derive(Serialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(transparent)]
pub struct Html(pub String);

#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
#[serde(tag = "kind", content = "name")]
pub enum MarkdownIssue {
    UnknownFootnote(String),
    UnreferencedFootnote(String),
    UnknownLink(String),
}

#[derive(Debug, Default)]
pub struct Rendered {
    pub html: Html,
    pub footnotes: IndexMap<String, Html>,
    /// `src` of every image, in document order
    pub images: Vec<String>,
    /// Site-relative link targets (`/...`), fragment and query removed
    pub internal_links: Vec<String>,
    /// `<h2>`/`<h3>` headings with the ids they were rendered with
    pub headings: Vec<Heading>,
}

fn unresolved_reference(link: BrokenLink<'_>) -> Option<(CowStr<'_>, CowStr<'_>)> {
    Some((link.reference, CowStr::Borrowed("")))
}

fn is_anchored_heading(level: HeadingLevel) -> bool {
    matches!(level, HeadingLevel::H2 | HeadingLevel::H3)
}

fn site_path(dest_url: &str) -> Option<String> {
    if !dest_url.starts_with('/') || dest_url.starts_with("//") {
        return None;
    }
    let end = dest_url.find(['#', '?']).unwrap_or(dest_url.len());
    Some(dest_url[..end].trim_end_matches('/').to_string()).filter(|p| !p.is_empty())
}

/// Markdown body to HTML.
///
/// `<h2>`/`<h3>` get slug ids unless they carry an explicit `{#id}`; both
/// end up in [`Rendered::headings`]. Footnote definitions are pulled out of the main flow and
/// rendered on their own, referenced ones first.
pub fn render(source: &str) -> (Rendered, Vec<MarkdownIssue>) {
    let mut errors = Vec::new();
    let mut rendered = Rendered::default();

    let mut slugger = HeadingSlugger::new();
    let mut heading: Option<Vec<Event>> = None;

    let mut footnote_references = IndexSet::new();
    let mut in_footnotes: Vec<(String, Vec<Event>)> = Vec::new();
    let mut footnote_events = IndexMap::new();

    let parser = Parser::new_with_broken_link_callback(
        source,
        Options::all(),
        Some(unresolved_reference),
    );

    let mut events = Vec::new();
    for event in parser {
        match &event {
            Event::Start(Tag::Link {
                link_type,
                dest_url,
                ..
            }) => {
                if matches!(
                    link_type,
                    LinkType::CollapsedUnknown | LinkType::ReferenceUnknown | LinkType::ShortcutUnknown
                ) {
                    errors.push(MarkdownIssue::UnknownLink(dest_url.to_string()));
                } else if let Some(path) = site_path(dest_url) {
                    rendered.internal_links.push(path);
                }
            }

            Event::Start(Tag::Image { dest_url, .. }) => {
                rendered.images.push(dest_url.to_string());
            }

            Event::FootnoteReference(name) => {
                footnote_references.insert(name.to_string());
            }

            _ => {}
        }

        match event {
            Event::Start(Tag::FootnoteDefinition(ref name)) => {
                in_footnotes.push((name.to_string(), vec![event]));
            }

            Event::End(TagEnd::FootnoteDefinition) => {
                if let Some((name, mut footnote)) = in_footnotes.pop() {
                    footnote.push(event);
                    footnote_events.insert(name, footnote);
                }
            }

            _ if !in_footnotes.is_empty() => {
                if let Some((_, footnote)) = in_footnotes.last_mut() {
                    footnote.push(event);
                }
            }

            Event::Start(Tag::Heading { level, .. }) if is_anchored_heading(level) => {
                heading = Some(vec![event]);
            }

            Event::End(TagEnd::Heading(level)) if is_anchored_heading(level) => {
                let Some(mut buffered) = heading.take() else {
                    events.push(event);
                    continue;
                };

                let text: String = buffered
                    .iter()
                    .filter_map(|e| match e {
                        Event::Text(text) | Event::Code(text) => Some(&**text),
                        _ => None,
                    })
                    .collect();
                let text = text.trim().to_string();

                let slug = match buffered.first_mut() {
                    Some(Event::Start(Tag::Heading { id: Some(id), .. })) => {
                        slugger.claim(id);
                        id.to_string()
                    }
                    Some(Event::Start(Tag::Heading { id, .. })) => {
                        let slug = slugger.slug(&text);
                        if !slug.is_empty() {
                            *id = Some(CowStr::from(slug.clone()));
                        }
                        slug
                    }
                    _ => slugger.slug(&text),
                };

                if !slug.is_empty() {
                    rendered.headings.push(Heading {
                        level: if level == HeadingLevel::H2 { 2 } else { 3 },
                        text,
                        slug,
                    });
                }

                events.extend(buffered);
                events.push(event);
            }

            _ => match heading.as_mut() {
                Some(buffered) => buffered.push(event),
                None => events.push(event),
            },
        }
    }

    pulldown_cmark::html::push_html(&mut rendered.html.0, events.into_iter());

    for reference in footnote_references {
        let Some(events) = footnote_events.shift_remove(&reference) else {
            errors.push(MarkdownIssue::UnknownFootnote(reference));
            continue;
        };

        let mut footnote_html = String::new();
        pulldown_cmark::html::push_html(&mut footnote_html, events.into_iter());
        rendered.footnotes.insert(reference, Html(footnote_html));
    }

    for (name, events) in footnote_events {
        errors.push(MarkdownIssue::UnreferencedFootnote(name.clone()));

        let mut footnote_html = String::new();
        pulldown_cmark::html::push_html(&mut footnote_html, events.into_iter());
        rendered.footnotes.insert(name, Html(footnote_html));
    }

    (rendered, errors)
}
