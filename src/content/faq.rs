//! FAQ blocks inside post bodies.
//!
//! A FAQ block starts at a level-2 heading named like "FAQ" or "Частые
//! вопросы" and runs until the next heading of level 1 or 2. Every `###`
//! heading inside it is a question and the text below it is the answer.
//! Detection is line based; fenced code is copied through untouched.

use serde::Serialize;

use super::headings::{heading_of, is_fence};

const FAQ_TITLES: [&str; 6] = [
    "faq",
    "частые вопросы",
    "часто задаваемые вопросы",
    "вопросы и ответы",
    "frequently asked questions",
    "questions and answers",
];

#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct FaqItem {
    pub question: String,
    pub answer: String,
}

fn is_faq_title(text: &str) -> bool {
    let title = text.trim().trim_end_matches(':').trim().to_lowercase();
    FAQ_TITLES.contains(&title.as_str())
}

/// Byte range of the FAQ block, heading line included.
fn faq_span(body: &str) -> Option<(usize, usize)> {
    let mut in_fence = false;
    let mut start = None;
    let mut offset = 0;

    for line in body.split_inclusive('\n') {
        let line_start = offset;
        offset += line.len();

        if is_fence(line) {
            in_fence = !in_fence;
            continue;
        }
        if in_fence {
            continue;
        }

        let Some((level, text)) = heading_of(line.trim_end_matches(['\r', '\n'])) else {
            continue;
        };

        match start {
            None if level == 2 && is_faq_title(text) => start = Some(line_start),
            Some(begin) if level <= 2 => return Some((begin, line_start)),
            _ => {}
        }
    }

    start.map(|begin| (begin, body.len()))
}

fn flush(question: Option<String>, answer: &mut Vec<&str>, items: &mut Vec<FaqItem>) {
    let text = answer.join("\n").trim().to_string();
    answer.clear();

    if let Some(question) = question {
        if !text.is_empty() {
            items.push(FaqItem {
                question,
                answer: text,
            });
        }
    }
}

pub fn extract_faq(body: &str) -> Vec<FaqItem> {
    let Some((start, end)) = faq_span(body) else {
        return Vec::new();
    };

    let mut items = Vec::new();
    let mut question: Option<String> = None;
    let mut answer = Vec::new();
    let mut in_fence = false;

    // first line is the FAQ heading itself
    for line in body[start..end].lines().skip(1) {
        if is_fence(line) {
            in_fence = !in_fence;
        }

        match heading_of(line) {
            Some((3, text)) if !in_fence => {
                flush(question.take(), &mut answer, &mut items);
                question = Some(text.to_string());
            }
            _ if question.is_some() => answer.push(line),
            _ => {}
        }
    }

    flush(question, &mut answer, &mut items);
    items
}

/// The body with its FAQ block removed, or unchanged when there is none.
pub fn strip_faq(body: &str) -> String {
    match faq_span(body) {
        Some((start, end)) => {
            let mut stripped = body[..start].to_string();
            stripped.push_str(&body[end..]);
            stripped
        }
        None => body.to_string(),
    }
}
