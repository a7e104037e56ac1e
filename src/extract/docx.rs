use super::xml::{self, XmlHandler};
use crate::container::Archive;
use crate::error::Result;
use std::io::{Read, Seek};
use tracing::debug;

const DOCUMENT_XML: &str = "word/document.xml";

/// Paragraph text of `word/document.xml`, paragraphs separated by a blank line.
pub fn extract<R: Read + Seek>(archive: &mut Archive<R>) -> Result<String> {
    let xml_data = archive.read_entry(DOCUMENT_XML)?;
    let mut state = DocxText::default();
    xml::stream(&xml_data, &mut state)?;
    debug!(paragraphs = state.paragraphs.len(), "Parsed DOCX body");
    Ok(state.finish())
}

/// Tracks `w:p` paragraphs; only `w:t` runs contribute characters.
#[derive(Default)]
struct DocxText {
    paragraphs: Vec<String>,
    current: String,
    /// Text boxes and content controls nest `w:p` inside a paragraph; their
    /// text joins the outermost one.
    paragraph_depth: usize,
    run_depth: usize,
    in_text: bool,
}

impl DocxText {
    fn flush(&mut self) {
        let text = self.current.trim();
        if !text.is_empty() {
            self.paragraphs.push(text.to_string());
        }
        self.current.clear();
    }

    fn finish(mut self) -> String {
        self.flush();
        self.paragraphs.join("\n\n")
    }
}

impl XmlHandler for DocxText {
    fn start(&mut self, local_name: &[u8]) {
        match local_name {
            b"p" => {
                if self.paragraph_depth == 0 {
                    self.flush();
                } else if !self.current.ends_with(char::is_whitespace) {
                    self.current.push(' ');
                }
                self.paragraph_depth += 1;
            }
            b"r" => self.run_depth += 1,
            b"t" => self.in_text = true,
            // tab stops in paragraph properties are also `w:tab`; only runs count
            b"tab" if self.run_depth > 0 => self.current.push('\t'),
            b"br" | b"cr" if self.run_depth > 0 => self.current.push('\n'),
            _ => {}
        }
    }

    fn end(&mut self, local_name: &[u8]) {
        match local_name {
            b"p" => {
                self.paragraph_depth = self.paragraph_depth.saturating_sub(1);
                if self.paragraph_depth == 0 {
                    self.flush();
                } else if !self.current.ends_with(char::is_whitespace) {
                    self.current.push(' ');
                }
            }
            b"r" => self.run_depth = self.run_depth.saturating_sub(1),
            b"t" => self.in_text = false,
            _ => {}
        }
    }

    fn text(&mut self, text: &str) {
        if self.paragraph_depth > 0 && self.in_text {
            self.current.push_str(text);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(body: &str) -> String {
        let doc = format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{body}</w:body></w:document>"#
        );
        let mut state = DocxText::default();
        xml::stream(doc.as_bytes(), &mut state).unwrap();
        state.finish()
    }

    #[test]
    fn runs_join_within_paragraph() {
        let text = parse(
            r#"<w:p><w:r><w:t>Hello</w:t></w:r><w:r><w:t xml:space="preserve"> world</w:t></w:r></w:p>
               <w:p><w:r><w:t>Second &amp; last</w:t></w:r></w:p>"#,
        );
        assert_eq!(text, "Hello world\n\nSecond & last");
    }

    #[test]
    fn tab_stops_are_not_text_but_run_tabs_are() {
        let text = parse(
            r#"<w:p><w:pPr><w:tabs><w:tab w:val="left" w:pos="720"/></w:tabs></w:pPr>
               <w:r><w:t>A</w:t><w:tab/><w:t>B</w:t></w:r></w:p>"#,
        );
        assert_eq!(text, "A\tB");
    }

    #[test]
    fn text_box_keeps_the_rest_of_its_paragraph() {
        let text = parse(
            r#"<w:p><w:r><w:t>Before</w:t></w:r>
               <w:r><w:pict><w:txbxContent><w:p><w:r><w:t>Box</w:t></w:r></w:p></w:txbxContent></w:pict></w:r>
               <w:r><w:t>After text</w:t></w:r></w:p>
               <w:p><w:r><w:t>Next</w:t></w:r></w:p>"#,
        );
        assert_eq!(text, "Before Box After text\n\nNext");
    }

    #[test]
    fn empty_paragraphs_are_skipped() {
        let text = parse(r#"<w:p/><w:p><w:r><w:t>Only</w:t></w:r></w:p><w:p></w:p>"#);
        assert_eq!(text, "Only");
    }

    #[test]
    fn field_instructions_are_excluded() {
        let text = parse(
            r#"<w:p><w:r><w:instrText> PAGE </w:instrText></w:r><w:r><w:t>Body</w:t></w:r></w:p>"#,
        );
        assert_eq!(text, "Body");
    }
}
