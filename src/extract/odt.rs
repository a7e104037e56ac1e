use super::xml::{self, XmlHandler};
use crate::container::Archive;
use crate::error::{ExtractError, Result};
use std::io::{Read, Seek};
use tracing::debug;

const CONTENT_XML: &str = "content.xml";

/// Trimmed, non-empty `text:p`/`text:h` paragraphs of `content.xml`.
pub fn extract<R: Read + Seek>(archive: &mut Archive<R>) -> Result<String> {
    let xml_data = archive.read_entry(CONTENT_XML)?;
    let mut state = OdtText::default();
    xml::stream(&xml_data, &mut state)?;
    debug!(paragraphs = state.paragraphs.len(), "Parsed ODT content");
    if state.paragraphs.is_empty() {
        return Err(ExtractError::bad_archive("ODT document has no paragraphs"));
    }
    Ok(state.paragraphs.join("\n\n"))
}

#[derive(Default)]
struct OdtText {
    paragraphs: Vec<String>,
    current: String,
    /// Paragraphs nest inside notes and frames; text belongs to the outermost.
    depth: usize,
}

impl XmlHandler for OdtText {
    fn start(&mut self, local_name: &[u8]) {
        match local_name {
            b"p" | b"h" => {
                if self.depth == 0 {
                    self.current.clear();
                }
                self.depth += 1;
            }
            b"s" if self.depth > 0 => self.current.push(' '),
            b"tab" if self.depth > 0 => self.current.push('\t'),
            b"line-break" if self.depth > 0 => self.current.push('\n'),
            _ => {}
        }
    }

    fn end(&mut self, local_name: &[u8]) {
        if matches!(local_name, b"p" | b"h") && self.depth > 0 {
            self.depth -= 1;
            if self.depth == 0 {
                let text = self.current.trim();
                if !text.is_empty() {
                    self.paragraphs.push(text.to_string());
                }
                self.current.clear();
            }
        }
    }

    fn text(&mut self, text: &str) {
        if self.depth > 0 {
            self.current.push_str(text);
        }
    }
}
