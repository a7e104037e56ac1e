//! Small helpers over `scraper` documents: element removal and visible text.

use scraper::{ElementRef, Html, Node, Selector};

/// Elements whose contents are never reader-visible text.
const INVISIBLE: &[&str] = &["script", "style", "head", "template", "noscript"];

const BLOCK_ELEMENTS: &[&str] = &[
    "address", "article", "aside", "blockquote", "br", "dd", "div", "dl", "dt",
    "figcaption", "figure", "footer", "h1", "h2", "h3", "h4", "h5", "h6", "header",
    "hr", "li", "main", "nav", "ol", "p", "pre", "section", "table", "td", "th",
    "tr", "ul",
];

pub fn parse(markup: &str) -> Html {
    Html::parse_document(markup)
}

/// Detach every element matching `selector`. Unparseable selectors match nothing.
pub fn remove_matching(doc: &mut Html, selector: &str) -> usize {
    let Ok(selector) = Selector::parse(selector) else {
        return 0;
    };
    let ids: Vec<_> = doc.select(&selector).map(|el| el.id()).collect();
    for id in &ids {
        if let Some(mut node) = doc.tree.get_mut(*id) {
            node.detach();
        }
    }
    ids.len()
}

/// Detach the first element, trying `selectors` in order, whose text satisfies
/// `predicate`. Returns whether anything was removed.
pub fn remove_first_where<F>(doc: &mut Html, selectors: &[&str], predicate: F) -> bool
where
    F: Fn(&str) -> bool,
{
    let found = selectors.iter().find_map(|selector| {
        let selector = Selector::parse(selector).ok()?;
        doc.select(&selector)
            .find(|el| predicate(&element_text(*el)))
            .map(|el| el.id())
    });
    match found.and_then(|id| doc.tree.get_mut(id)) {
        Some(mut node) => {
            node.detach();
            true
        }
        None => false,
    }
}

/// Text of one element on a single line, whitespace collapsed.
pub fn element_text(el: ElementRef<'_>) -> String {
    let mut raw = String::new();
    collect_text(el, &mut raw);
    collapse_whitespace(&raw)
}

/// First element matching `selector`, if the selector parses and anything matches.
pub fn select_first<'a>(doc: &'a Html, selector: &str) -> Option<ElementRef<'a>> {
    let selector = Selector::parse(selector).ok()?;
    doc.select(&selector).next()
}

pub fn select_all<'a>(doc: &'a Html, selector: &str) -> Vec<ElementRef<'a>> {
    match Selector::parse(selector) {
        Ok(selector) => doc.select(&selector).collect(),
        Err(_) => Vec::new(),
    }
}

/// Reader-visible text of the document body in document order.
///
/// Block elements break paragraphs; paragraphs are separated by a blank line
/// and whitespace inside a paragraph is collapsed.
pub fn visible_text(doc: &Html) -> String {
    let mut raw = String::new();
    match select_first(doc, "body") {
        Some(body) => collect_text(body, &mut raw),
        None => collect_text(doc.root_element(), &mut raw),
    }
    raw.split('\n')
        .map(collapse_whitespace)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn collect_text(el: ElementRef<'_>, out: &mut String) {
    for child in el.children() {
        if let Some(child_el) = ElementRef::wrap(child) {
            let name = child_el.value().name();
            if INVISIBLE.contains(&name) {
                continue;
            }
            let block = BLOCK_ELEMENTS.contains(&name);
            if block {
                out.push('\n');
            }
            collect_text(child_el, out);
            if block {
                out.push('\n');
            }
        } else if let Node::Text(text) = child.value() {
            for ch in text.chars() {
                out.push(if ch == '\n' || ch == '\r' { ' ' } else { ch });
            }
        }
    }
}

pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paragraphs_become_blank_line_separated() {
        let doc = parse("<html><body><p>One\n  two</p><div>Three</div></body></html>");
        assert_eq!(visible_text(&doc), "One two\n\nThree");
    }

    #[test]
    fn inline_markup_does_not_split_words() {
        let doc = parse("<p>Ch<em>a</em>pter <b>bold</b></p>");
        assert_eq!(visible_text(&doc), "Chapter bold");
    }

    #[test]
    fn removal_detaches_all_matches() {
        let mut doc = parse("<body><script>x</script><p>Keep</p><script>y</script></body>");
        assert_eq!(remove_matching(&mut doc, "script"), 2);
        assert_eq!(visible_text(&doc), "Keep");
    }

    #[test]
    fn remove_first_where_stops_after_one() {
        let mut doc = parse("<body><h2>Same</h2><p>Body</p><h2>Same</h2></body>");
        assert!(remove_first_where(&mut doc, &["h1", "h2"], |t| t == "Same"));
        assert_eq!(visible_text(&doc), "Body\n\nSame");
        assert!(!remove_first_where(&mut doc, &["h1"], |t| t == "Same"));
    }

    #[test]
    fn bad_selector_matches_nothing() {
        let mut doc = parse("<p>text</p>");
        assert_eq!(remove_matching(&mut doc, "p[["), 0);
        assert!(select_first(&doc, "::::").is_none());
    }
}
