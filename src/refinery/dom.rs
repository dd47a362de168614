// * Text helpers shared by the extractors.

use scraper::node::Element;
use scraper::{ElementRef, Node};

/// Visible text of an element: every text node, whitespace collapsed to single spaces
pub fn visible_text(element: &ElementRef) -> String {
    collapse_whitespace(&element.text().collect::<String>())
}

// * Children that start a new visual line inside an inline element
const LINE_BREAK_TAGS: &[&str] = &["br", "div", "p"];
const ANNOTATION_CLASS: &str = "smaller";

fn is_annotation(el: &Element) -> bool {
    el.classes().any(|c| c == ANNOTATION_CLASS)
}

fn breaks_line(el: &Element) -> bool {
    LINE_BREAK_TAGS.contains(&el.name()) || is_annotation(el)
}

/// First non-empty line of an element's text.
///
/// Inline markup (`<b>`, `<span>`) stays part of the line; a newline, a block
/// child (`<div>`, `<br>`, `<p>`) or a `.smaller` annotation ends it.
/// Annotation text never becomes part of the label.
pub fn first_line(element: &ElementRef) -> String {
    let mut line = String::new();

    for node in element.descendants().skip(1) {
        let text = match node.value() {
            Node::Element(el) => {
                if breaks_line(el) {
                    let collapsed = collapse_whitespace(&line);
                    if !collapsed.is_empty() {
                        return collapsed;
                    }
                }
                continue;
            }
            Node::Text(text) => text,
            _ => continue,
        };

        let inside_annotation = node
            .ancestors()
            .take_while(|a| a.id() != element.id())
            .any(|a| a.value().as_element().is_some_and(is_annotation));
        if inside_annotation {
            continue;
        }

        let mut segments = text.split('\n').peekable();
        while let Some(segment) = segments.next() {
            line.push_str(segment);
            if segments.peek().is_none() {
                break;
            }
            let collapsed = collapse_whitespace(&line);
            if !collapsed.is_empty() {
                return collapsed;
            }
            line.clear();
        }
    }

    collapse_whitespace(&line)
}

pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
