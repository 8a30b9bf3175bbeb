//! Plain-text rendering of the HTML fragments found in Lords division notes.

use scraper::{ElementRef, Html, Node};

/// Elements that end a line of text.
const BLOCK_TAGS: [&str; 14] = [
    "p", "div", "li", "ul", "ol", "blockquote", "tr", "table", "h1", "h2", "h3", "h4", "h5", "h6",
];

/// Elements whose contents are never text.
const SKIP_TAGS: [&str; 2] = ["script", "style"];

fn collect_text(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => out.push_str(text),
            Node::Element(el) => {
                let name = el.name();
                if name == "br" {
                    out.push('\n');
                    continue;
                }
                if SKIP_TAGS.contains(&name) {
                    continue;
                }
                if let Some(child_el) = ElementRef::wrap(child) {
                    collect_text(child_el, out);
                }
                if BLOCK_TAGS.contains(&name) {
                    out.push('\n');
                }
            }
            _ => {}
        }
    }
}

/// Trailing spaces dropped, at most one blank line in a row, outer whitespace trimmed.
fn tidy(text: &str) -> String {
    let mut lines: Vec<&str> = Vec::new();
    let mut previous_blank = false;
    for line in text.lines() {
        let line = line.trim_end();
        let blank = line.is_empty();
        if blank && previous_blank {
            continue;
        }
        previous_blank = blank;
        lines.push(line);
    }
    lines.join("\n").trim().to_string()
}

/// Strip tags and decode entities, keeping paragraph and line breaks.
pub fn strip_html(input: &str) -> String {
    let fragment = Html::parse_fragment(input);
    let mut text = String::with_capacity(input.len());
    collect_text(fragment.root_element(), &mut text);
    tidy(&text.replace('\u{a0}', " "))
}
