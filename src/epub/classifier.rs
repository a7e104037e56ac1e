//! Per-document verdicts for the spine walk: skip it, fold it into the
//! previous chapter, or start a new chapter.

use super::package::SpineEntry;
use super::title::{self, HEADING_SELECTORS, TITLE_SELECTORS};
use crate::config::ExtractConfig;
use crate::dom;
use crate::error::Result;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

static RE_IMAGE_SUFFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)[^a-z0-9]+image$").unwrap());

static SHARED: Lazy<Classifier> = Lazy::new(|| {
    Classifier::from_config(&ExtractConfig::default()).expect("built-in patterns compile")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Href or declared title looks like navigation or front matter.
    Navigation,
    /// The detected title names a contents page, insert, credits and so on.
    NonContentTitle,
    /// Nothing left once the title is removed.
    EmptyBody,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    Skip(SkipReason),
    Continuation { title: String, body: String },
    NewChapter { title: String, body: String },
}

/// Compiled classification rules. Built once and shared read-only.
#[derive(Debug, Clone)]
pub struct Classifier {
    navigation: Vec<Regex>,
    title_skip: Vec<Regex>,
    continuation_href: Option<Regex>,
}

impl Default for Classifier {
    fn default() -> Self {
        Classifier::clone(&SHARED)
    }
}

impl Classifier {
    pub fn from_config(config: &ExtractConfig) -> Result<Self> {
        let compile = |patterns: &[String]| -> Result<Vec<Regex>> {
            patterns
                .iter()
                .map(|pattern| Regex::new(pattern).map_err(Into::into))
                .collect()
        };
        let continuation_href = match config.continuation_href_pattern.trim() {
            "" => None,
            pattern => Some(Regex::new(pattern)?),
        };
        Ok(Self {
            navigation: compile(&config.navigation_patterns)?,
            title_skip: compile(&config.title_skip_patterns)?,
            continuation_href,
        })
    }

    /// Classifier built from the default configuration.
    pub fn shared() -> &'static Classifier {
        &SHARED
    }

    /// Step one: decided from the manifest alone, before the content is read.
    pub fn is_navigation(&self, entry: &SpineEntry) -> bool {
        let title = entry.declared_title.as_deref().unwrap_or("");
        self.navigation
            .iter()
            .any(|re| re.is_match(&entry.href) || (!title.is_empty() && re.is_match(title)))
    }

    pub fn classify(
        &self,
        entry: &SpineEntry,
        markup: &str,
        seen_titles: &HashSet<String>,
    ) -> Classification {
        if self.is_navigation(entry) {
            return Classification::Skip(SkipReason::Navigation);
        }

        let mut doc = dom::parse(markup);
        dom::remove_matching(&mut doc, "script");
        dom::remove_matching(&mut doc, "style");

        let title = title::detect_title(&doc, &entry.href);
        if self
            .title_skip
            .iter()
            .any(|re| re.is_match(&title) || re.is_match(&entry.href))
        {
            return Classification::Skip(SkipReason::NonContentTitle);
        }

        let selectors: Vec<&str> = TITLE_SELECTORS
            .iter()
            .chain(HEADING_SELECTORS)
            .copied()
            .collect();
        dom::remove_first_where(&mut doc, &selectors, |text| {
            title::clean_title(text) == title
        });

        let body = dom::visible_text(&doc).trim().to_string();
        if body.is_empty() {
            return Classification::Skip(SkipReason::EmptyBody);
        }

        if self.is_continuation(&entry.href, &title, seen_titles) {
            Classification::Continuation { title, body }
        } else {
            Classification::NewChapter { title, body }
        }
    }

    /// A structural split of the previous chapter rather than a chapter of
    /// its own. Coincidentally repeated titles are merged too.
    pub fn is_continuation(&self, href: &str, title: &str, seen_titles: &HashSet<String>) -> bool {
        if self
            .continuation_href
            .as_ref()
            .is_some_and(|re| re.is_match(href))
        {
            return true;
        }
        if seen_titles.contains(title) {
            return true;
        }
        let stripped = RE_IMAGE_SUFFIX.replace(title, "");
        stripped != title && seen_titles.contains(stripped.as_ref())
    }
}
