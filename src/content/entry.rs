use serde::{Deserialize, Serialize};
use time::{Date, Month};

use super::headings::{extract_headings, Heading};
use super::reading::{estimate_reading_time, ReadingSpeed};
use super::validate::ValidationError;
use crate::locale::{self, Locale};

const FRONTMATTER_DELIMITER: &str = "+++";

/// A date as written in frontmatter: either a quoted string or a bare TOML date.
fn date_text(value: &toml::Value) -> String {
    match value {
        toml::Value::String(text) => text.clone(),
        toml::Value::Datetime(datetime) => datetime.to_string(),
        other => other.to_string(),
    }
}

#[derive(Deserialize, Debug, Default)]
struct RawFrontmatter {
    title: Option<String>,
    description: Option<String>,
    date: Option<toml::Value>,
    #[serde(default)]
    tags: Vec<String>,
    cover: Option<String>,
    author: Option<String>,
    #[serde(default)]
    draft: bool,
    #[serde(alias = "translationOf")]
    translation_of: Option<String>,
    #[serde(default)]
    keywords: Vec<String>,
}

#[derive(Serialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct Frontmatter {
    pub title: Option<String>,
    pub description: Option<String>,
    pub date: Option<Date>,
    pub tags: Vec<String>,
    pub cover: Option<String>,
    pub author: Option<String>,
    pub draft: bool,
    pub translation_of: Option<String>,
    pub keywords: Vec<String>,
}

/// Quoted dates must be exactly `YYYY-MM-DD`; bare TOML datetimes contribute their date part.
fn parse_date(value: &toml::Value) -> Option<Date> {
    match value {
        toml::Value::String(text) => {
            let format = time::format_description::parse("[year]-[month]-[day]").ok()?;
            Date::parse(text, &format).ok()
        }
        toml::Value::Datetime(datetime) => {
            let date = datetime.date?;
            let month = Month::try_from(date.month).ok()?;
            Date::from_calendar_date(i32::from(date.year), month, date.day).ok()
        }
        _ => None,
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Splits a document into its `+++` TOML frontmatter and markdown body.
///
/// Returns the parsed frontmatter and the body, or the problem as a
/// [`ValidationError`] attributed to `source_path`.
pub fn parse_document<'a>(
    source_path: &str,
    text: &'a str,
) -> Result<(Frontmatter, &'a str), ValidationError> {
    let malformed = |reason: String| ValidationError::MalformedFrontmatter {
        path: source_path.to_string(),
        reason,
    };

    let text = text.trim_start_matches('\u{feff}');
    let Some(rest) = text
        .strip_prefix(FRONTMATTER_DELIMITER)
        .and_then(|rest| rest.strip_prefix('\n').or_else(|| rest.strip_prefix("\r\n")))
    else {
        return Err(malformed("missing opening `+++` line".to_string()));
    };

    let mut offset = 0;
    let mut header_end = None;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == FRONTMATTER_DELIMITER {
            header_end = Some((offset, offset + line.len()));
            break;
        }
        offset += line.len();
    }

    let Some((header_len, body_start)) = header_end else {
        return Err(malformed("missing closing `+++` line".to_string()));
    };

    let raw: RawFrontmatter =
        toml::from_str(&rest[..header_len]).map_err(|err| malformed(err.message().to_string()))?;

    let date = match raw.date {
        Some(raw_date) => Some(parse_date(&raw_date).ok_or_else(|| ValidationError::InvalidDate {
            path: source_path.to_string(),
            value: date_text(&raw_date),
        })?),
        None => None,
    };

    let frontmatter = Frontmatter {
        title: non_empty(raw.title),
        description: non_empty(raw.description),
        date,
        tags: raw.tags,
        cover: non_empty(raw.cover),
        author: non_empty(raw.author),
        draft: raw.draft,
        translation_of: non_empty(raw.translation_of),
        keywords: raw.keywords,
    };

    Ok((frontmatter, &rest[body_start..]))
}

/// One post. Locale, slug and URL come from the source path; reading time and
/// headings from the body.
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct ContentEntry {
    pub source_path: String,
    pub locale: Locale,
    pub slug: String,
    pub url: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub date: Option<Date>,
    pub tags: Vec<String>,
    pub cover: Option<String>,
    pub author: Option<String>,
    pub draft: bool,
    pub translation_of: Option<String>,
    pub keywords: Vec<String>,
    pub reading_time: u32,
    pub headings: Vec<Heading>,
    #[serde(skip)]
    pub body: String,
}

impl ContentEntry {
    pub fn new(source_path: &str, frontmatter: Frontmatter, body: &str, speed: &ReadingSpeed) -> Self {
        let source_path = source_path.replace('\\', "/");
        let locale = locale::resolve_locale(&source_path);
        let slug = locale::resolve_slug(&source_path);
        let url = locale::resolve_url(locale, &slug);

        ContentEntry {
            locale,
            url,
            reading_time: estimate_reading_time(body, speed.for_locale(locale)),
            headings: extract_headings(body),
            body: body.to_string(),
            slug,
            source_path,
            title: frontmatter.title,
            description: frontmatter.description,
            date: frontmatter.date,
            tags: frontmatter.tags,
            cover: frontmatter.cover,
            author: frontmatter.author,
            draft: frontmatter.draft,
            translation_of: frontmatter.translation_of,
            keywords: frontmatter.keywords,
        }
    }

    /// Title, or the slug for entries that are missing one.
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.slug)
    }

    pub fn display_description(&self) -> &str {
        self.description.as_deref().unwrap_or("")
    }

    pub fn cover_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.cover.as_deref().unwrap_or(fallback)
    }

    pub fn is_published(&self) -> bool {
        !self.draft
    }
}
