//! Document ingestion for a word-by-word reader.
//!
//! Turns EPUB, DOCX, ODT, FB2, RTF, PDF, HTML and plain text files into one
//! flat text stream. EPUB imports also get a chapter outline whose entries
//! point at word positions in that stream, counted with [`words::count_words`].

pub mod config;
pub mod container;
pub mod dom;
pub mod epub;
pub mod error;
pub mod extract;
pub mod formats;
pub mod metadata;
pub mod reader;
pub mod words;

pub use epub::Classifier;
pub use error::{ExtractError, Result};
pub use extract::{extract_book, extract_path, extract_reader, Extracted};
pub use formats::Format;
pub use reader::{decode_chapters, encode_chapters, Chapter, ExtractionResult};
