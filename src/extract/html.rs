use crate::dom;

/// Elements dropped before flattening: code, styling and page chrome.
const STRIPPED: &[&str] = &["script", "style", "nav", "header", "footer"];

pub fn extract(data: &[u8]) -> String {
    let markup = String::from_utf8_lossy(data);
    let mut doc = dom::parse(&markup);
    for tag in STRIPPED {
        dom::remove_matching(&mut doc, tag);
    }
    dom::visible_text(&doc)
}
