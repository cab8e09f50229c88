use std::collections::{HashMap, HashSet};

use serde::Serialize;
use unicode_normalization::{char::is_combining_mark, UnicodeNormalization};

#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct Heading {
    pub level: u8,
    pub text: String,
    pub slug: String,
}

/// Anchor slug for a heading. Letters of any script are kept; accents are
/// stripped through NFD decomposition.
pub fn slugify_heading(text: &str) -> String {
    let cleaned: String = text
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .filter(|c| c.is_alphanumeric() || c.is_whitespace() || *c == '-')
        .collect();

    cleaned.split_whitespace().collect::<Vec<_>>().join("-")
}

/// Hands out heading slugs for one document. A repeated slug gets `-1`,
/// `-2`, ... appended in order of appearance.
#[derive(Default, Debug)]
pub struct HeadingSlugger {
    seen: HashSet<String>,
    counters: HashMap<String, usize>,
}

impl HeadingSlugger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn slug(&mut self, text: &str) -> String {
        let base = slugify_heading(text);
        let mut candidate = base.clone();

        if self.seen.contains(&candidate) {
            let counter = self.counters.entry(base.clone()).or_insert(0);
            loop {
                *counter += 1;
                candidate = format!("{base}-{counter}");
                if !self.seen.contains(&candidate) {
                    break;
                }
            }
        }

        self.seen.insert(candidate.clone());
        candidate
    }

    /// Marks an id given explicitly in the document as taken.
    pub fn claim(&mut self, id: &str) {
        self.seen.insert(id.to_string());
    }
}

pub(crate) fn is_fence(line: &str) -> bool {
    let trimmed = line.trim_start();
    trimmed.starts_with("```") || trimmed.starts_with("~~~")
}

/// ATX heading level and text of a line, if it is one.
pub(crate) fn heading_of(line: &str) -> Option<(u8, &str)> {
    let hashes = line.chars().take_while(|c| *c == '#').count();
    if hashes == 0 || hashes > 6 {
        return None;
    }

    let rest = &line[hashes..];
    if !rest.is_empty() && !rest.starts_with([' ', '\t']) {
        return None;
    }

    let text = rest.trim().trim_end_matches('#').trim_end();
    u8::try_from(hashes).ok().map(|level| (level, text))
}

/// Level-2 and level-3 headings of a markdown body, in document order.
///
/// Headings are read from the rendered markdown, so the text has inline
/// markup removed and every slug is the id the heading is rendered with.
pub fn extract_headings(body: &str) -> Vec<Heading> {
    crate::markdown::render(body).0.headings
}
