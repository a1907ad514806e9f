//! Visible-text extraction from HTML documents.

use scraper::{ElementRef, Html, Node};

/// Elements whose content is never rendered as text.
///
/// `noscript` content is a raw text node when parsed with scripting enabled,
/// so it would otherwise leak literal markup.
const SKIPPED: &[&str] = &["script", "style", "noscript", "template"];

/// Elements that break the text flow; their boundaries count as whitespace.
const BLOCK: &[&str] = &[
    "address", "article", "aside", "blockquote", "br", "dd", "div", "dl", "dt", "fieldset",
    "figcaption", "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6", "header",
    "hr", "li", "main", "nav", "ol", "p", "pre", "section", "table", "td", "th", "title", "tr",
    "ul",
];

/// Extract the visible text of an HTML document.
///
/// Script, style, noscript and template content is dropped, runs of whitespace collapse to a
/// single space, and the result is trimmed.
pub fn visible_text(html: &str) -> String {
    let document = Html::parse_document(html);

    let mut raw = String::new();
    collect_text(document.root_element(), &mut raw);

    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn collect_text(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => out.push_str(text),
            Node::Element(el) => {
                let name = el.name();
                if SKIPPED.contains(&name) {
                    continue;
                }
                let Some(child_el) = ElementRef::wrap(child) else {
                    continue;
                };
                let block = BLOCK.contains(&name);
                if block {
                    out.push(' ');
                }
                collect_text(child_el, out);
                if block {
                    out.push(' ');
                }
            }
            _ => {}
        }
    }
}
