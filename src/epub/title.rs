//! Chapter title detection.
//!
//! Strategies run in order over the parsed content document and the first
//! one producing a usable title wins. The href-derived fallback always
//! succeeds, so detection never fails.

use crate::dom;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html};

/// Common chapter-title markup, most specific first.
pub const TITLE_SELECTORS: &[&str] = &[
    ".chapter-title",
    ".title-chapter",
    ".chaptertitle",
    ".chapter-heading",
    ".chapter h1",
    ".chapter h2",
    ".chapter h3",
    r#"section[epub\:type~="chapter"] h1"#,
    r#"section[epub\:type~="chapter"] h2"#,
    r#"[epub\:type~="chapter"] .title"#,
];

/// Generic sweep used when removing the detected title from the body. The
/// invisible `<title>` goes last so a matching visible heading is preferred.
pub const HEADING_SELECTORS: &[&str] = &["h1", "h2", "h3", "h4", "h5", "h6", "title"];

const ANY_HEADING: &str = "h1, h2, h3, h4, h5, h6";
const CHAPTER_TITLE_HEADING: &str = "h1.chapter-title, h2.chapter-title, h3.chapter-title, \
     h4.chapter-title, h5.chapter-title, h6.chapter-title";
const NUMBER_CANDIDATES: &str = "h1, h2, h3, h4, h5, h6, p, div, span";

static RE_BOOK_SECTION_WORD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(foreword|afterword|introduction|preface|appendix|index|glossary)$").unwrap()
});
static RE_BOILERPLATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)(copyright|©|\(c\)\s*\d{4}|all rights reserved|published by|publisher|publishing|isbn|author of|a novel by)",
    )
    .unwrap()
});
static RE_NUMERIC: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[\d\s.,]+$").unwrap());
static RE_CHAPTER_NUMBER: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)^(chapter|chap\.?)?\s*\d+$",
        r"^\d+$",
        r"(?i)^chapter\s+\d+\s*:?$",
        r"(?i)^part\s+\d+$",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).unwrap())
    .collect()
});
static RE_NUMBER_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(chapter\s+\d+\s*:?|prologue)$").unwrap());
static RE_MULTI_SPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r" {2,}").unwrap());

/// Whether `text` reads like a book-level heading rather than a chapter title.
pub fn is_likely_book_title(text: &str) -> bool {
    let text = text.trim();
    let len = text.chars().count();
    len < 3
        || len > 100
        || RE_BOOK_SECTION_WORD.is_match(text)
        || RE_BOILERPLATE.is_match(text)
        || RE_NUMERIC.is_match(text)
        || text.eq_ignore_ascii_case("chapter")
        || text.eq_ignore_ascii_case("part")
}

/// Whether `text` is only a chapter/part number with no name.
pub fn is_chapter_number(text: &str) -> bool {
    let text = text.trim();
    RE_CHAPTER_NUMBER.iter().any(|re| re.is_match(text))
}

/// Trim, turn non-breaking spaces into spaces, collapse runs of spaces, and
/// strip punctuation from both ends.
pub fn clean_title(raw: &str) -> String {
    let text = raw
        .replace("&nbsp;", " ")
        .replace("&#160;", " ")
        .replace("&#xa0;", " ")
        .replace('\u{a0}', " ")
        .replace(['\n', '\r', '\t'], " ");
    let text = RE_MULTI_SPACE.replace_all(text.trim(), " ");
    text.trim_matches(|c: char| is_title_punctuation(c) || c.is_whitespace())
        .to_string()
}

fn is_title_punctuation(c: char) -> bool {
    c.is_ascii_punctuation()
        || matches!(
            c,
            '\u{2013}' | '\u{2014}' | '\u{2018}' | '\u{2019}' | '\u{201c}' | '\u{201d}'
                | '\u{2026}' | '\u{00b7}' | '\u{2022}'
        )
}

fn usable(text: String) -> Option<String> {
    (!text.is_empty() && !is_likely_book_title(&text)).then_some(text)
}

fn element_title(el: ElementRef<'_>) -> String {
    clean_title(&dom::element_text(el))
}

type TitleStrategy = fn(&Html) -> Option<String>;

/// Document-based strategies in priority order.
const STRATEGIES: &[(&str, TitleStrategy)] = &[
    ("selector", from_title_selectors),
    ("chapter-number", from_chapter_number),
    ("heading", from_first_heading),
    ("title-tag", from_title_tag),
];

/// Detect a title for the document, falling back to the href's file stem.
pub fn detect_title(doc: &Html, href: &str) -> String {
    STRATEGIES
        .iter()
        .find_map(|(name, strategy)| {
            strategy(doc).map(|title| {
                tracing::trace!(strategy = *name, %title, "Title detected");
                title
            })
        })
        .unwrap_or_else(|| title_from_href(href))
}

fn from_title_selectors(doc: &Html) -> Option<String> {
    TITLE_SELECTORS.iter().find_map(|selector| {
        dom::select_all(doc, selector)
            .into_iter()
            .find_map(|el| usable(element_title(el)))
    })
}

/// A "CHAPTER 12" or "Prologue" marker; the real title is the heading right
/// after it, or any heading classed `chapter-title`.
fn from_chapter_number(doc: &Html) -> Option<String> {
    let marker = dom::select_all(doc, NUMBER_CANDIDATES)
        .into_iter()
        .find(|el| RE_NUMBER_MARKER.is_match(&element_title(*el)))?;

    if element_title(marker).to_lowercase().contains("prologue") {
        return Some("Prologue".to_string());
    }

    let next_heading = marker
        .next_siblings()
        .filter_map(ElementRef::wrap)
        .next()
        .filter(|el| is_heading(el.value().name()))
        .map(element_title)
        .filter(|title| !is_chapter_number(title))
        .and_then(usable);

    next_heading.or_else(|| {
        dom::select_all(doc, CHAPTER_TITLE_HEADING)
            .into_iter()
            .find_map(|el| usable(element_title(el)))
    })
}

fn from_first_heading(doc: &Html) -> Option<String> {
    dom::select_all(doc, ANY_HEADING).into_iter().find_map(|el| {
        let title = element_title(el);
        if title.to_lowercase().contains("prologue") {
            return Some("Prologue".to_string());
        }
        if is_chapter_number(&title) {
            return None;
        }
        usable(title)
    })
}

fn from_title_tag(doc: &Html) -> Option<String> {
    dom::select_first(doc, "title").and_then(|el| usable(element_title(el)))
}

fn is_heading(name: &str) -> bool {
    matches!(name, "h1" | "h2" | "h3" | "h4" | "h5" | "h6")
}

/// File name without directories or extension, or "Chapter".
pub fn title_from_href(href: &str) -> String {
    let file = href.rsplit('/').next().unwrap_or(href);
    let stem = file.rsplit_once('.').map_or(file, |(stem, _)| stem);
    if stem.trim().is_empty() {
        "Chapter".to_string()
    } else {
        stem.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detect(markup: &str) -> String {
        detect_title(&dom::parse(markup), "OEBPS/chapter_07.xhtml")
    }

    #[test]
    fn book_title_filter_rejects_front_matter_words() {
        for word in ["Foreword", "preface", "APPENDIX", "Index", "glossary"] {
            assert!(is_likely_book_title(word), "{word}");
        }
        assert!(is_likely_book_title("12"));
        assert!(is_likely_book_title("ab"));
        assert!(is_likely_book_title(&"x".repeat(101)));
        assert!(is_likely_book_title("Chapter"));
        assert!(is_likely_book_title("Copyright 2020 Penguin"));
        assert!(!is_likely_book_title("The Long Walk Home"));
    }

    #[test]
    fn bare_numbers_are_detected() {
        for text in ["CHAPTER 3", "Chap 4", "Chap. 4", "17", "Chapter 2:", "Part 1"] {
            assert!(is_chapter_number(text), "{text}");
        }
        assert!(!is_chapter_number("Chapter 2: The Return"));
        assert!(!is_chapter_number("Partial Eclipse"));
    }

    #[test]
    fn cleanup_normalises_spacing_and_punctuation() {
        assert_eq!(clean_title("  The&nbsp;Storm  \n Breaks... "), "The Storm Breaks");
        assert_eq!(clean_title("\u{201c}Quoted\u{201d}"), "Quoted");
        assert_eq!(clean_title("- 1 -"), "1");
    }

    #[test]
    fn selector_strategy_comes_first() {
        let title = detect(
            r#"<html><head><title>Book</title></head><body>
               <h1>Big Heading</h1><p class="chapter-title">The Real One</p></body></html>"#,
        );
        assert_eq!(title, "The Real One");
    }

    #[test]
    fn chapter_number_then_sibling_heading() {
        let title = detect(
            r#"<body><p>CHAPTER 4</p><h2>Into the Woods</h2><p>Text.</p></body>"#,
        );
        assert_eq!(title, "Into the Woods");
    }

    #[test]
    fn prologue_marker_is_literal() {
        assert_eq!(detect("<body><h2>PROLOGUE</h2><p>Long ago.</p></body>"), "Prologue");
        assert_eq!(
            detect("<body><h1>Prologue: The Fall</h1><p>x</p></body>"),
            "Prologue"
        );
    }

    #[test]
    fn first_heading_skips_numbers_and_book_titles() {
        let title = detect(
            r#"<body><h1>Preface</h1><h2>7</h2><h3>A Quiet Morning</h3></body>"#,
        );
        assert_eq!(title, "A Quiet Morning");
    }

    #[test]
    fn title_tag_then_href_fallback() {
        assert_eq!(
            detect("<html><head><title>Interlude</title></head><body><p>x</p></body></html>"),
            "Interlude"
        );
        assert_eq!(detect("<body><p>No headings here.</p></body>"), "chapter_07");
        assert_eq!(title_from_href(".xhtml"), "Chapter");
        assert_eq!(title_from_href("Text/part.one.html"), "part.one");
    }
}
