use crate::error::Result;
use crate::words;
use serde::{Deserialize, Serialize};

/// One navigable unit of a book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chapter {
    pub title: String,
    /// Zero-based word index into the full text where this chapter begins.
    pub start_position: usize,
    /// Href of the content document the chapter came from, for diagnostics.
    pub href: String,
}

/// Text and outline produced by importing an EPUB.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionResult {
    /// Chapter bodies in reading order, separated by a blank line.
    pub full_text: String,
    /// Ordered by strictly increasing `start_position`.
    pub chapters: Vec<Chapter>,
}

impl ExtractionResult {
    pub fn word_count(&self) -> usize {
        words::count_words(&self.full_text)
    }

    /// The chapter containing `word_index`, if any chapter starts at or before it.
    pub fn chapter_at(&self, word_index: usize) -> Option<&Chapter> {
        let idx = self
            .chapters
            .partition_point(|chapter| chapter.start_position <= word_index);
        idx.checked_sub(1).map(|i| &self.chapters[i])
    }
}

/// Serialize a chapter list for storage next to the material's text.
pub fn encode_chapters(chapters: &[Chapter]) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec(chapters)?)
}

pub fn decode_chapters(blob: &[u8]) -> Result<Vec<Chapter>> {
    Ok(serde_json::from_slice(blob)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ExtractionResult {
        ExtractionResult {
            full_text: "One two three\n\nFour five\n\nSix".to_string(),
            chapters: vec![
                Chapter {
                    title: "Opening".into(),
                    start_position: 0,
                    href: "ch1.xhtml".into(),
                },
                Chapter {
                    title: "Middle".into(),
                    start_position: 3,
                    href: "ch2.xhtml".into(),
                },
                Chapter {
                    title: "End".into(),
                    start_position: 5,
                    href: "ch3.xhtml".into(),
                },
            ],
        }
    }

    #[test]
    fn chapter_blob_survives_storage() {
        let result = sample();
        let blob = encode_chapters(&result.chapters).unwrap();
        let restored = decode_chapters(&blob).unwrap();
        assert_eq!(restored, result.chapters);
    }

    #[test]
    fn blob_uses_stable_field_names() {
        let blob = encode_chapters(&sample().chapters[..1]).unwrap();
        let json: serde_json::Value = serde_json::from_slice(&blob).unwrap();
        assert_eq!(json[0]["title"], "Opening");
        assert_eq!(json[0]["start_position"], 0);
        assert_eq!(json[0]["href"], "ch1.xhtml");
    }

    #[test]
    fn garbage_blob_is_an_error() {
        assert!(decode_chapters(b"not json").is_err());
    }

    #[test]
    fn chapter_lookup_by_word_index() {
        let result = sample();
        assert_eq!(result.word_count(), 6);
        assert_eq!(result.chapter_at(0).unwrap().title, "Opening");
        assert_eq!(result.chapter_at(2).unwrap().title, "Opening");
        assert_eq!(result.chapter_at(3).unwrap().title, "Middle");
        assert_eq!(result.chapter_at(99).unwrap().title, "End");
        assert!(ExtractionResult::default().chapter_at(0).is_none());
    }
}
