//! Registry of the document formats the extractor understands.
//!
//! The table is built once and only ever read. Lookups are case-insensitive
//! and an unknown extension is an ordinary `None`, not an error.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    Txt,
    Rtf,
    Docx,
    Epub,
    Pdf,
    Html,
    Fb2,
    Odt,
}

/// Canonical extension order, used for every user-facing listing.
pub const SUPPORTED_EXTENSIONS: &[&str] = &[
    "txt", "rtf", "docx", "epub", "pdf", "html", "htm", "fb2", "odt",
];

static REGISTRY: Lazy<HashMap<&'static str, Format>> = Lazy::new(|| {
    SUPPORTED_EXTENSIONS
        .iter()
        .filter_map(|ext| Format::for_extension_uncached(ext).map(|format| (*ext, format)))
        .collect()
});

impl Format {
    fn for_extension_uncached(ext: &str) -> Option<Self> {
        match ext {
            "txt" => Some(Format::Txt),
            "rtf" => Some(Format::Rtf),
            "docx" => Some(Format::Docx),
            "epub" => Some(Format::Epub),
            "pdf" => Some(Format::Pdf),
            "html" | "htm" => Some(Format::Html),
            "fb2" => Some(Format::Fb2),
            "odt" => Some(Format::Odt),
            _ => None,
        }
    }

    /// Look up a bare extension such as `"EPUB"` or `".txt"`.
    pub fn from_extension(ext: &str) -> Option<Self> {
        let ext = ext.trim().trim_start_matches('.').to_ascii_lowercase();
        REGISTRY.get(ext.as_str()).copied()
    }

    /// Look up the format of a file name or path by its extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }

    /// ZIP-based formats are read entry by entry; everything else as one blob.
    pub fn is_archive(self) -> bool {
        matches!(self, Format::Docx | Format::Epub | Format::Odt)
    }

    pub fn extensions(self) -> Vec<&'static str> {
        SUPPORTED_EXTENSIONS
            .iter()
            .copied()
            .filter(|ext| REGISTRY.get(*ext) == Some(&self))
            .collect()
    }

    pub fn label(self) -> &'static str {
        match self {
            Format::Txt => "plain text",
            Format::Rtf => "RTF",
            Format::Docx => "DOCX",
            Format::Epub => "EPUB",
            Format::Pdf => "PDF",
            Format::Html => "HTML",
            Format::Fb2 => "FB2",
            Format::Odt => "ODT",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

fn dotted() -> Vec<String> {
    SUPPORTED_EXTENSIONS
        .iter()
        .map(|ext| format!(".{ext}"))
        .collect()
}

/// Supported extensions split across two roughly equal lines for display.
pub fn supported_extensions_lines() -> String {
    let exts = dotted();
    let split = exts.len().div_ceil(2);
    let (first, second) = exts.split_at(split);
    format!("{}\n{}", first.join(", "), second.join(", "))
}

/// Supported extensions as prose: ".txt, .rtf, ... or .odt".
pub fn supported_extensions_sentence() -> String {
    let exts = dotted();
    match exts.split_last() {
        None => String::new(),
        Some((last, [])) => last.clone(),
        Some((last, rest)) => format!("{}, or {}", rest.join(", "), last),
    }
}
