//! Running state threaded through the spine walk.

use crate::reader::{Chapter, ExtractionResult};
use crate::words;
use std::collections::HashSet;

/// Full text so far, chapters recorded so far, titles already used, and the
/// word count that the next chapter will start at.
#[derive(Debug, Default)]
pub struct ChapterAccumulator {
    full_text: String,
    chapters: Vec<Chapter>,
    seen_titles: HashSet<String>,
    word_count: usize,
}

impl ChapterAccumulator {
    pub fn seen_titles(&self) -> &HashSet<String> {
        &self.seen_titles
    }

    pub fn word_count(&self) -> usize {
        self.word_count
    }

    pub fn chapter_count(&self) -> usize {
        self.chapters.len()
    }

    /// Record a chapter starting at the current word position, then append its body.
    pub fn push_chapter(&mut self, title: String, href: &str, body: &str) {
        self.chapters.push(Chapter {
            title: title.clone(),
            start_position: self.word_count,
            href: href.to_string(),
        });
        self.seen_titles.insert(title);
        self.append(body);
    }

    /// Append to the previous chapter. With no chapter yet there is nothing to
    /// continue, so the body opens a chapter instead.
    pub fn push_continuation(&mut self, title: String, href: &str, body: &str) {
        if self.chapters.is_empty() {
            self.push_chapter(title, href, body);
        } else {
            self.append(body);
        }
    }

    fn append(&mut self, body: &str) {
        if !self.full_text.is_empty() {
            self.full_text.push_str("\n\n");
        }
        self.full_text.push_str(body);
        self.word_count += words::count_words(body);
    }

    pub fn finish(self) -> ExtractionResult {
        ExtractionResult {
            full_text: self.full_text,
            chapters: self.chapters,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chapters_start_at_running_word_count() {
        let mut acc = ChapterAccumulator::default();
        acc.push_chapter("One".into(), "ch1.xhtml", "Hello world");
        acc.push_chapter("Two".into(), "ch2.xhtml", "Goodbye now");
        let result = acc.finish();
        assert_eq!(result.full_text, "Hello world\n\nGoodbye now");
        let starts: Vec<usize> = result.chapters.iter().map(|c| c.start_position).collect();
        assert_eq!(starts, [0, 2]);
    }

    #[test]
    fn continuation_advances_words_without_a_chapter() {
        let mut acc = ChapterAccumulator::default();
        acc.push_chapter("One".into(), "ch1.xhtml", "a b c");
        acc.push_continuation("One".into(), "ch1b.xhtml", "d e");
        assert_eq!(acc.chapter_count(), 1);
        assert_eq!(acc.word_count(), 5);
        acc.push_chapter("Two".into(), "ch2.xhtml", "f");
        let result = acc.finish();
        assert_eq!(result.chapters[1].start_position, 5);
        assert_eq!(result.word_count(), 6);
    }

    #[test]
    fn leading_continuation_opens_a_chapter() {
        let mut acc = ChapterAccumulator::default();
        acc.push_continuation("Part".into(), "text/a.xhtml", "x y");
        assert_eq!(acc.chapter_count(), 1);
        assert!(acc.seen_titles().contains("Part"));
    }
}
