use crate::error::{ExtractError, Result};
use crate::formats::Format;
use tracing::debug;

/// Page separator `pdf-extract` emits between pages.
const PAGE_BREAK: char = '\x0C';

/// Page text in page order, blank line between pages, empty pages dropped.
pub fn extract(data: &[u8]) -> Result<String> {
    // pdf-extract can panic on malformed fonts
    let result = std::panic::catch_unwind(|| pdf_extract::extract_text_from_mem(data));
    let text = match result {
        Ok(Ok(text)) => text,
        Ok(Err(err)) => return Err(ExtractError::malformed(Format::Pdf, err)),
        Err(_) => {
            return Err(ExtractError::malformed(
                Format::Pdf,
                "PDF extraction panicked (malformed file)",
            ))
        }
    };
    Ok(join_pages(&text))
}

fn join_pages(text: &str) -> String {
    let pages: Vec<&str> = text
        .split(PAGE_BREAK)
        .map(str::trim)
        .filter(|page| !page.is_empty())
        .collect();
    debug!(pages = pages.len(), "Collected PDF pages with text");
    pages.join("\n\n").trim().to_string()
}
