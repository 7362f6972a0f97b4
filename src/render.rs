//! HTML rendering of an in-memory page.
//!
//! Produces a standalone document showing the page as the behaviors left
//! it: current classes and attributes, `display` overrides as inline style,
//! and typed form values. Text and attribute values are escaped by maud;
//! tag and attribute names that are not plain identifiers are dropped.

use crate::dom::{Document, MemoryDocument, Node};
use crate::selector::Subject;
use crate::types::ElementId;
use maud::{DOCTYPE, Markup, PreEscaped, html};

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// Render the whole page.
pub fn render_document(doc: &MemoryDocument) -> Markup {
    let body = doc.body();
    let body_class = doc.attribute(body, "class").filter(|c| !c.is_empty());
    let content = render_children(doc, body);
    base_document(doc.title(), body_class.as_deref(), content)
}

fn base_document(title: &str, body_class: Option<&str>, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
            }
            body class=[body_class] {
                (content)
            }
        }
    }
}

fn render_children(doc: &MemoryDocument, parent: ElementId) -> Markup {
    let mut out = String::new();
    for &child in doc.node(parent).children() {
        out.push_str(&render_element(doc, child).into_string());
    }
    PreEscaped(out)
}

/// Render one element and its subtree.
pub fn render_element(doc: &MemoryDocument, el: ElementId) -> Markup {
    let node = doc.node(el);
    let tag = node.tag();
    if !is_plain_name(tag) {
        return render_children(doc, el);
    }

    let mut out = format!("<{tag}");
    for (name, value) in attributes(node) {
        out.push_str(&format!(" {name}=\"{}\"", escape(&value)));
    }
    out.push('>');
    if VOID_ELEMENTS.contains(&tag) {
        return PreEscaped(out);
    }

    let text = if tag == "textarea" {
        Some(node.current_value())
    } else {
        node.text().map(str::to_string)
    };
    if let Some(text) = text {
        out.push_str(&escape(&text));
    }
    out.push_str(&render_children(doc, el).into_string());
    out.push_str(&format!("</{tag}>"));
    PreEscaped(out)
}

/// Attributes as rendered: inline `display` merged into `style`, and the
/// current value of inputs in place of their default.
fn attributes(node: &Node) -> Vec<(String, String)> {
    let mut attrs: Vec<(String, String)> = node
        .attrs()
        .iter()
        .filter(|(name, _)| is_plain_name(name))
        .cloned()
        .collect();

    if let Some(display) = node.display() {
        let rule = format!("display: {};", display.as_css());
        match attrs.iter_mut().find(|(name, _)| name == "style") {
            Some((_, style)) => {
                let existing = style.trim_end().trim_end_matches(';');
                *style = if existing.is_empty() {
                    rule
                } else {
                    format!("{existing}; {rule}")
                };
            }
            None => attrs.push(("style".to_string(), rule)),
        }
    }

    if node.tag() == "input" {
        let value = node.current_value();
        match attrs.iter_mut().find(|(name, _)| name == "value") {
            Some((_, v)) => *v = value,
            None if !value.is_empty() => attrs.push(("value".to_string(), value)),
            None => {}
        }
    }
    attrs
}

fn escape(text: &str) -> String {
    html! { (text) }.into_string()
}

fn is_plain_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == ':')
}
