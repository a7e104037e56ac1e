use crate::error::{ExtractError, Result};
use crate::formats::Format;
use rtf_parser::document::RtfDocument;

/// De-style RTF: control words, groups and header tables go, body text stays.
pub fn extract(data: &[u8]) -> Result<String> {
    let source = String::from_utf8_lossy(data);
    let document = RtfDocument::try_from(source.as_ref())
        .map_err(|err| ExtractError::malformed(Format::Rtf, format!("{err:?}")))?;
    Ok(document.get_text())
}
