//! EPUB import: spine walk, chapter classification and word positions.
//!
//! Whole-file problems (no container descriptor, no package document) fail
//! the import. A content document that cannot be found or read is logged and
//! skipped so one broken chapter does not cost the rest of the book.

pub mod accumulator;
pub mod classifier;
pub mod package;
pub mod title;

pub use accumulator::ChapterAccumulator;
pub use classifier::{Classification, Classifier, SkipReason};
pub use package::{Package, SpineEntry};

use crate::container::Archive;
use crate::error::Result;
use crate::reader::ExtractionResult;
use std::io::{Read, Seek};
use tracing::{debug, info, warn};

/// Walk the spine strictly in order; positions depend on every earlier entry.
pub fn extract<R: Read + Seek>(
    archive: &mut Archive<R>,
    classifier: &Classifier,
) -> Result<ExtractionResult> {
    let package = package::read_package(archive)?;
    let mut acc = ChapterAccumulator::default();

    for entry in &package.spine {
        if classifier.is_navigation(entry) {
            debug!(href = %entry.href, "Skipping navigation entry");
            continue;
        }

        let Some(markup) = read_content(archive, entry) else {
            continue;
        };

        match classifier.classify(entry, &markup, acc.seen_titles()) {
            Classification::Skip(reason) => {
                debug!(href = %entry.href, ?reason, "Skipping entry");
            }
            Classification::Continuation { title, body } => {
                debug!(href = %entry.href, %title, "Appending continuation");
                acc.push_continuation(title, &entry.href, &body);
            }
            Classification::NewChapter { title, body } => {
                debug!(
                    href = %entry.href,
                    %title,
                    start = acc.word_count(),
                    "New chapter"
                );
                acc.push_chapter(title, &entry.href, &body);
            }
        }
    }

    info!(
        spine = package.spine.len(),
        chapters = acc.chapter_count(),
        words = acc.word_count(),
        "Finished EPUB spine"
    );
    Ok(acc.finish())
}

fn read_content<R: Read + Seek>(archive: &mut Archive<R>, entry: &SpineEntry) -> Option<String> {
    let Some(name) = archive.find_entry(&entry.path) else {
        warn!(href = %entry.href, path = %entry.path, "Content document missing from archive");
        return None;
    };
    match archive.read_entry_string(&name) {
        Ok(markup) => Some(markup),
        Err(err) => {
            warn!(href = %entry.href, "Failed to read content document: {err}");
            None
        }
    }
}
