use crate::formats::Format;
use anyhow::{Context, Result};
use docx_rust::DocxFile;
use rbook::prelude::*;
// the local `Metadata` struct shadows the trait of the same name
use rbook::prelude::Metadata as _;
use rbook::Epub;
use std::path::Path;
use tracing::debug;

/// Descriptive metadata, where the format carries any.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metadata {
    pub title: Option<String>,
    pub authors: Vec<String>,
    pub publisher: Option<String>,
    pub language: Option<String>,
    pub description: Option<String>,
}

impl Metadata {
    pub fn is_empty(&self) -> bool {
        self == &Metadata::default()
    }
}

/// Best effort: an unreadable file or a format without metadata gives an
/// empty `Metadata`, never an error.
pub fn read_metadata(path: &Path, format: Format) -> Metadata {
    let result = match format {
        Format::Epub => epub_metadata(path),
        Format::Docx => docx_metadata(path),
        _ => Ok(Metadata::default()),
    };
    result.unwrap_or_else(|err| {
        debug!(path = %path.display(), "No metadata: {err:#}");
        Metadata::default()
    })
}

fn epub_metadata(path: &Path) -> Result<Metadata> {
    let epub = Epub::options()
        .strict(false)
        .open(path)
        .with_context(|| format!("Failed to open EPUB: {}", path.display()))?;
    let metadata = epub.metadata();

    let book = Metadata {
        title: metadata.title().map(|t| t.value().to_string()),
        authors: metadata
            .creators()
            .map(|creator| creator.value().to_string())
            .collect(),
        publisher: metadata.publishers().next().map(|p| p.value().to_string()),
        language: metadata.languages().next().map(|l| l.value().to_string()),
        description: metadata
            .descriptions()
            .next()
            .map(|d| d.value().to_string()),
    };
    Ok(book)
}

fn docx_metadata(path: &Path) -> Result<Metadata> {
    let file = DocxFile::from_file(path)
        .map_err(|e| anyhow::anyhow!("{}", e))
        .with_context(|| format!("Failed to open DOCX: {}", path.display()))?;
    let docx = file
        .parse()
        .map_err(|e| anyhow::anyhow!("{}", e))
        .context("Failed to parse DOCX content")?;

    // Core and App each come in two namespace variants with identical fields
    let (title, creator, language, description) = match &docx.core {
        Some(docx_rust::core::Core::CoreNamespace(c)) => (
            c.title.as_deref().map(|s| s.to_string()),
            c.creator.as_deref().map(|s| s.to_string()),
            c.language.as_deref().map(|s| s.to_string()),
            c.description.as_deref().map(|s| s.to_string()),
        ),
        Some(docx_rust::core::Core::CoreNoNamespace(c)) => (
            c.title.as_deref().map(|s| s.to_string()),
            c.creator.as_deref().map(|s| s.to_string()),
            c.language.as_deref().map(|s| s.to_string()),
            c.description.as_deref().map(|s| s.to_string()),
        ),
        None => (None, None, None, None),
    };

    let company = match &docx.app {
        Some(docx_rust::app::App::AppNoApNamespace(a)) => a.company.as_deref().map(|s| s.to_string()),
        Some(docx_rust::app::App::AppWithApNamespace(a)) => {
            a.company.as_deref().map(|s| s.to_string())
        }
        None => None,
    };

    Ok(Metadata {
        title: title.filter(|t| !t.trim().is_empty()),
        authors: creator.into_iter().filter(|a| !a.trim().is_empty()).collect(),
        publisher: company,
        language,
        description,
    })
}

/// Plain-text header: title, then labelled author/publisher/language lines.
pub fn format_metadata(metadata: &Metadata) -> String {
    let mut lines = Vec::new();

    if let Some(title) = &metadata.title {
        lines.push(title.clone());
        lines.push("=".repeat(title.chars().count().min(72)));
    }

    if !metadata.authors.is_empty() {
        lines.push(format!("Author: {}", metadata.authors.join(", ")));
    }

    if let Some(publisher) = &metadata.publisher {
        lines.push(format!("Publisher: {}", publisher));
    }

    if let Some(language) = &metadata.language {
        lines.push(format!("Language: {}", language));
    }

    if let Some(description) = &metadata.description {
        lines.push(String::new());
        lines.push(description.clone());
    }

    if lines.is_empty() {
        String::new()
    } else {
        lines.join("\n") + "\n"
    }
}
