//! Raw access to a document file.
//!
//! ZIP-based formats (EPUB, DOCX, ODT) are opened as an [`Archive`] and read
//! entry by entry; everything else is read whole into memory. The underlying
//! file handle lives exactly as long as the container.

use crate::error::{ExtractError, Result};
use crate::formats::Format;
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;
use tracing::debug;
use zip::ZipArchive;

pub struct Archive<R> {
    zip: ZipArchive<R>,
}

impl Archive<BufReader<File>> {
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        let zip = ZipArchive::new(BufReader::new(file)).map_err(|err| {
            ExtractError::bad_archive(format!("{}: {err}", path.display()))
        })?;
        Ok(Self { zip })
    }
}

impl<R: Read + Seek> Archive<R> {
    pub fn from_reader(reader: R) -> Result<Self> {
        let zip = ZipArchive::new(reader)?;
        Ok(Self { zip })
    }

    pub fn entry_names(&self) -> impl Iterator<Item = &str> {
        self.zip.file_names()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.zip.index_for_name(name).is_some()
    }

    /// Full decompressed contents of the entry at exactly `name`.
    pub fn read_entry(&mut self, name: &str) -> Result<Vec<u8>> {
        let mut entry = self
            .zip
            .by_name(name)
            .map_err(|err| ExtractError::bad_archive(format!("missing entry {name}: {err}")))?;
        let mut data = Vec::with_capacity(entry.size() as usize);
        entry.read_to_end(&mut data)?;
        Ok(data)
    }

    /// Entry contents as text; invalid UTF-8 is replaced rather than rejected.
    pub fn read_entry_string(&mut self, name: &str) -> Result<String> {
        let data = self.read_entry(name)?;
        Ok(match String::from_utf8(data) {
            Ok(text) => text,
            Err(err) => String::from_utf8_lossy(err.as_bytes()).into_owned(),
        })
    }

    /// Resolve `path` to a real entry name.
    ///
    /// Exact match first; otherwise scan every entry for a case-insensitive
    /// match or one whose path ends with `path`.
    pub fn find_entry(&self, path: &str) -> Option<String> {
        if self.contains(path) {
            return Some(path.to_string());
        }
        let wanted = path.trim_start_matches('/').to_ascii_lowercase();
        if wanted.is_empty() {
            return None;
        }
        let suffix = format!("/{wanted}");
        let found = self
            .entry_names()
            .find(|name| {
                let lower = name.to_ascii_lowercase();
                lower == wanted || lower.ends_with(&suffix)
            })
            .map(str::to_string);
        if let Some(name) = &found {
            debug!(requested = path, resolved = %name, "Resolved archive entry by scan");
        }
        found
    }
}

/// A document opened for extraction.
pub enum Container<R = BufReader<File>> {
    Archive(Archive<R>),
    Raw(Vec<u8>),
}

impl Container {
    pub fn open(path: &Path, format: Format) -> Result<Self> {
        if format.is_archive() {
            Ok(Container::Archive(Archive::open(path)?))
        } else {
            Ok(Container::Raw(std::fs::read(path)?))
        }
    }
}

impl<R: Read + Seek> Container<R> {
    pub fn from_reader(format: Format, mut reader: R) -> Result<Self> {
        if format.is_archive() {
            Ok(Container::Archive(Archive::from_reader(reader)?))
        } else {
            let mut data = Vec::new();
            reader.read_to_end(&mut data)?;
            Ok(Container::Raw(data))
        }
    }
}
