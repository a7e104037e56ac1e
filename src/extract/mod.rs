//! Format dispatch: open a document and turn it into text.
//!
//! Extraction is all-or-nothing per file. EPUB additionally yields a chapter
//! outline; every other format yields plain text only.

pub mod docx;
pub mod fb2;
pub mod html;
pub mod odt;
pub mod pdf;
pub mod plain;
pub mod rtf;
mod xml;

use crate::container::Container;
use crate::epub::{self, Classifier};
use crate::error::{ExtractError, Result};
use crate::formats::Format;
use crate::reader::{Chapter, ExtractionResult};
use std::io::{Read, Seek};
use std::path::Path;
use tracing::info;

/// Output of one import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extracted {
    Text(String),
    Book(ExtractionResult),
}

impl Extracted {
    pub fn full_text(&self) -> &str {
        match self {
            Extracted::Text(text) => text,
            Extracted::Book(book) => &book.full_text,
        }
    }

    /// Empty for everything but EPUB.
    pub fn chapters(&self) -> &[Chapter] {
        match self {
            Extracted::Text(_) => &[],
            Extracted::Book(book) => &book.chapters,
        }
    }

    pub fn into_result(self) -> ExtractionResult {
        match self {
            Extracted::Text(full_text) => ExtractionResult {
                full_text,
                chapters: Vec::new(),
            },
            Extracted::Book(book) => book,
        }
    }
}

/// Detect the format from the file name and extract it.
pub fn extract_path(path: &Path, classifier: &Classifier) -> Result<Extracted> {
    let format = format_of(path)?;
    info!(path = %path.display(), %format, "Extracting document");
    let mut container = Container::open(path, format)?;
    let extracted = extract_container(format, &mut container, classifier)?;
    info!(
        path = %path.display(),
        chapters = extracted.chapters().len(),
        chars = extracted.full_text().len(),
        "Finished extraction"
    );
    Ok(extracted)
}

/// Extract from any seekable source whose format is already known.
pub fn extract_reader<R: Read + Seek>(
    format: Format,
    reader: R,
    classifier: &Classifier,
) -> Result<Extracted> {
    let mut container = Container::from_reader(format, reader)?;
    extract_container(format, &mut container, classifier)
}

/// EPUB-only entry point; any other format is `UnsupportedFormat`.
pub fn extract_book(path: &Path, classifier: &Classifier) -> Result<ExtractionResult> {
    let format = format_of(path)?;
    if format != Format::Epub {
        return Err(ExtractError::UnsupportedFormat(format!(
            "{} is {format}, not EPUB",
            path.display()
        )));
    }
    match extract_path(path, classifier)? {
        Extracted::Book(book) => Ok(book),
        Extracted::Text(_) => Err(ExtractError::UnsupportedFormat(format.to_string())),
    }
}

fn format_of(path: &Path) -> Result<Format> {
    Format::from_path(path).ok_or_else(|| {
        let ext = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("unknown");
        ExtractError::UnsupportedFormat(format!(".{ext}"))
    })
}

fn extract_container<R: Read + Seek>(
    format: Format,
    container: &mut Container<R>,
    classifier: &Classifier,
) -> Result<Extracted> {
    match container {
        Container::Raw(data) => {
            let data = std::mem::take(data);
            let text = match format {
                Format::Txt => plain::extract(data),
                Format::Rtf => rtf::extract(&data)?,
                Format::Pdf => pdf::extract(&data)?,
                Format::Html => html::extract(&data),
                Format::Fb2 => fb2::extract(&data)?,
                Format::Docx | Format::Epub | Format::Odt => {
                    return Err(ExtractError::bad_archive(format!(
                        "{format} requires a ZIP container"
                    )))
                }
            };
            Ok(Extracted::Text(text))
        }
        Container::Archive(archive) => match format {
            Format::Epub => Ok(Extracted::Book(epub::extract(archive, classifier)?)),
            Format::Docx => Ok(Extracted::Text(docx::extract(archive)?)),
            Format::Odt => Ok(Extracted::Text(odt::extract(archive)?)),
            other => Err(ExtractError::NotYetSupported(other)),
        },
    }
}
