use super::xml::{self, XmlHandler};
use crate::error::{ExtractError, Result};
use tracing::debug;

/// FictionBook text grouped by section, sections separated by a blank line.
pub fn extract(data: &[u8]) -> Result<String> {
    let mut state = Fb2Text::default();
    xml::stream(data, &mut state)?;
    state.flush_section();
    debug!(sections = state.sections.len(), "Parsed FB2 body");
    if state.sections.is_empty() {
        return Err(ExtractError::bad_archive("FB2 document has no sections"));
    }
    Ok(state.sections.join("\n\n"))
}

/// Only paragraphs under `<body>` count; `<description>` annotations and
/// `<binary>` payloads never reach the output.
#[derive(Default)]
struct Fb2Text {
    sections: Vec<String>,
    paragraphs: Vec<String>,
    current: String,
    body_depth: usize,
    paragraph_depth: usize,
}

impl Fb2Text {
    fn flush_section(&mut self) {
        if !self.paragraphs.is_empty() {
            self.sections.push(self.paragraphs.join("\n"));
            self.paragraphs.clear();
        }
    }
}

fn is_paragraph(local_name: &[u8]) -> bool {
    matches!(local_name, b"p" | b"v" | b"subtitle")
}

impl XmlHandler for Fb2Text {
    fn start(&mut self, local_name: &[u8]) {
        match local_name {
            b"body" => {
                self.flush_section();
                self.body_depth += 1;
            }
            b"section" => self.flush_section(),
            name if is_paragraph(name) && self.body_depth > 0 => {
                if self.paragraph_depth == 0 {
                    self.current.clear();
                }
                self.paragraph_depth += 1;
            }
            _ => {}
        }
    }

    fn end(&mut self, local_name: &[u8]) {
        match local_name {
            b"body" => {
                self.flush_section();
                self.body_depth = self.body_depth.saturating_sub(1);
            }
            b"section" => self.flush_section(),
            name if is_paragraph(name) && self.paragraph_depth > 0 => {
                self.paragraph_depth -= 1;
                if self.paragraph_depth == 0 {
                    let text = self.current.trim();
                    if !text.is_empty() {
                        self.paragraphs.push(text.to_string());
                    }
                    self.current.clear();
                }
            }
            _ => {}
        }
    }

    fn text(&mut self, text: &str) {
        if self.paragraph_depth > 0 {
            self.current.push_str(text);
        }
    }
}
