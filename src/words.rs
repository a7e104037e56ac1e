//! The one word-splitting rule shared by chapter positions and playback.
//!
//! Chapter start positions are word indices, so anything that walks the
//! extracted text word by word must split it exactly this way.

/// Words of `text`: split on whitespace and newlines, empty tokens dropped.
pub fn split_words(text: &str) -> impl Iterator<Item = &str> {
    text.split_whitespace()
}

pub fn count_words(text: &str) -> usize {
    split_words(text).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_across_lines_and_runs_of_space() {
        assert_eq!(count_words("Hello world"), 2);
        assert_eq!(count_words("  one\n\ntwo\tthree  \r\n"), 3);
        assert_eq!(count_words(""), 0);
        assert_eq!(count_words(" \n\t "), 0);
    }

    #[test]
    fn split_matches_count() {
        let text = "Call me Ishmael.\n\nSome years ago";
        let words: Vec<&str> = split_words(text).collect();
        assert_eq!(words, ["Call", "me", "Ishmael.", "Some", "years", "ago"]);
        assert_eq!(words.len(), count_words(text));
    }
}
