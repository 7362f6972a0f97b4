//! The document port and its in-memory implementation.
//!
//! [`Document`] is the narrow surface every behavior reads from and the
//! effect adapter writes to: selector queries, attributes, classes, layout
//! boxes, the viewport, and a handful of writes. Anything that can answer
//! these questions (a browser binding, a test double, the simulator) can host
//! the behaviors.
//!
//! [`MemoryDocument`] is a small element tree built from a JSON page
//! description ([`PageSpec`]). Layout is not computed: each element carries
//! the document-space [`Rect`] it was described with.

use crate::effect::ScrollBehavior;
use crate::selector::{Selector, Subject};
use crate::types::{Display, ElementId, Rect, Viewport};
use serde::{Deserialize, Serialize};

/// Read/write access to a live page.
pub trait Document {
    /// Every element matching `selector`, in document order.
    fn query_all(&self, selector: &Selector) -> Vec<ElementId>;

    /// First match in document order.
    fn query(&self, selector: &Selector) -> Option<ElementId> {
        self.query_all(selector).into_iter().next()
    }

    fn element_by_id(&self, id: &str) -> Option<ElementId>;
    fn body(&self) -> ElementId;
    fn attribute(&self, el: ElementId, name: &str) -> Option<String>;
    fn has_class(&self, el: ElementId, class: &str) -> bool;
    fn rect(&self, el: ElementId) -> Rect;
    fn viewport(&self) -> Viewport;

    /// Named, submittable controls inside a form, in document order.
    fn form_fields(&self, form: ElementId) -> Vec<(String, String)>;

    fn add_class(&mut self, el: ElementId, class: &str);
    fn remove_class(&mut self, el: ElementId, class: &str);
    fn set_attribute(&mut self, el: ElementId, name: &str, value: &str);
    fn set_text(&mut self, el: ElementId, text: &str);
    fn set_display(&mut self, el: ElementId, display: Display);
    fn scroll_into_view(&mut self, el: ElementId, behavior: ScrollBehavior);
    fn reset_form(&mut self, form: ElementId);
    fn alert(&mut self, message: &str);
}

// ============================================================================
// Page description
// ============================================================================

/// JSON description of a page: a viewport plus the children of `<body>`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PageSpec {
    /// Document title, used when rendering.
    pub title: Option<String>,
    pub viewport: Viewport,
    /// Space-separated classes already on `<body>`.
    pub body_class: Option<String>,
    pub elements: Vec<ElementSpec>,
}

/// One element in a page description.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ElementSpec {
    pub tag: String,
    pub id: Option<String>,
    /// Space-separated class list.
    pub class: Option<String>,
    /// Any other attributes (`href`, `data-filter`, `name`, ...).
    pub attrs: Vec<(String, String)>,
    pub text: Option<String>,
    pub rect: Option<Rect>,
    pub children: Vec<ElementSpec>,
}

impl Default for ElementSpec {
    fn default() -> Self {
        Self {
            tag: "div".to_string(),
            id: None,
            class: None,
            attrs: Vec::new(),
            text: None,
            rect: None,
            children: Vec::new(),
        }
    }
}

impl ElementSpec {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            ..Self::default()
        }
    }

    pub fn with_id(mut self, id: &str) -> Self {
        self.id = Some(id.to_string());
        self
    }

    pub fn with_class(mut self, class: &str) -> Self {
        self.class = Some(class.to_string());
        self
    }

    pub fn with_attr(mut self, name: &str, value: &str) -> Self {
        self.attrs.push((name.to_string(), value.to_string()));
        self
    }

    pub fn with_text(mut self, text: &str) -> Self {
        self.text = Some(text.to_string());
        self
    }

    pub fn with_rect(mut self, top: f64, height: f64) -> Self {
        self.rect = Some(Rect::new(top, height));
        self
    }

    pub fn with_child(mut self, child: ElementSpec) -> Self {
        self.children.push(child);
        self
    }
}

// ============================================================================
// In-memory document
// ============================================================================

#[derive(Debug, Clone)]
pub struct Node {
    tag: String,
    /// Attributes in insertion order; `id` and `class` live here too.
    attrs: Vec<(String, String)>,
    text: Option<String>,
    rect: Rect,
    /// Current form-control value, distinct from the `value` attribute
    /// (which is the default the control resets to).
    value: Option<String>,
    display: Option<Display>,
    children: Vec<ElementId>,
}

impl Node {
    fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            attrs: Vec::new(),
            text: None,
            rect: Rect::default(),
            value: None,
            display: None,
            children: Vec::new(),
        }
    }

    pub fn attrs(&self) -> &[(String, String)] {
        &self.attrs
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn children(&self) -> &[ElementId] {
        &self.children
    }

    pub fn display(&self) -> Option<Display> {
        self.display
    }

    /// The control's current value: what the user typed, else its default.
    pub fn current_value(&self) -> String {
        self.value
            .clone()
            .unwrap_or_else(|| self.default_value())
    }

    fn default_value(&self) -> String {
        if self.tag == "textarea" {
            self.text.clone().unwrap_or_default()
        } else if self.is_checkable() {
            self.attribute("value").unwrap_or("on").to_string()
        } else {
            self.attribute("value").unwrap_or_default().to_string()
        }
    }

    fn set_attr(&mut self, name: &str, value: &str) {
        match self.attrs.iter_mut().find(|(k, _)| k == name) {
            Some((_, v)) => *v = value.to_string(),
            None => self.attrs.push((name.to_string(), value.to_string())),
        }
    }

    fn remove_attr(&mut self, name: &str) {
        self.attrs.retain(|(k, _)| k != name);
    }

    fn class_list(&self) -> Vec<String> {
        self.attribute("class")
            .map(|c| c.split_whitespace().map(str::to_string).collect())
            .unwrap_or_default()
    }

    fn is_form_control(&self) -> bool {
        matches!(self.tag.as_str(), "input" | "textarea" | "select")
    }

    fn is_checkable(&self) -> bool {
        self.tag == "input" && matches!(self.attribute("type"), Some("checkbox" | "radio"))
    }

    /// Buttons never contribute to a form's data set, nor do unchecked
    /// checkboxes and radios.
    fn is_submittable(&self) -> bool {
        self.is_form_control()
            && !matches!(
                self.attribute("type"),
                Some("submit" | "button" | "reset" | "image")
            )
            && (!self.is_checkable() || self.attribute("checked").is_some())
    }
}

impl Subject for Node {
    fn tag(&self) -> &str {
        &self.tag
    }

    fn attribute(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Element tree held in memory, rooted at `<body>`.
#[derive(Debug, Clone)]
pub struct MemoryDocument {
    title: String,
    nodes: Vec<Node>,
    body: ElementId,
    viewport: Viewport,
    alerts: Vec<String>,
    scrolls: Vec<(ElementId, ScrollBehavior)>,
}

impl MemoryDocument {
    pub fn from_spec(spec: &PageSpec) -> Self {
        let mut body = Node::new("body");
        if let Some(class) = &spec.body_class {
            body.set_attr("class", class);
        }
        let mut doc = Self {
            title: spec.title.clone().unwrap_or_else(|| "Portfolio".to_string()),
            nodes: vec![body],
            body: ElementId(0),
            viewport: spec.viewport,
            alerts: Vec::new(),
            scrolls: Vec::new(),
        };
        for child in &spec.elements {
            doc.append_child(doc.body, child);
        }
        doc
    }

    /// Insert `spec` (and its subtree) as the last child of `parent`.
    pub fn append_child(&mut self, parent: ElementId, spec: &ElementSpec) -> ElementId {
        let mut node = Node::new(&spec.tag);
        if let Some(id) = &spec.id {
            node.set_attr("id", id);
        }
        if let Some(class) = &spec.class {
            node.set_attr("class", class);
        }
        for (k, v) in &spec.attrs {
            node.set_attr(&k.to_ascii_lowercase(), v);
        }
        node.text = spec.text.clone();
        node.rect = spec.rect.unwrap_or_default();

        let id = ElementId(self.nodes.len());
        self.nodes.push(node);
        self.nodes[parent.0].children.push(id);
        for child in &spec.children {
            self.append_child(id, child);
        }
        id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn node(&self, el: ElementId) -> &Node {
        &self.nodes[el.0]
    }

    /// Alerts shown so far, oldest first.
    pub fn alerts(&self) -> &[String] {
        &self.alerts
    }

    /// Scroll-into-view requests received so far.
    pub fn scrolls(&self) -> &[(ElementId, ScrollBehavior)] {
        &self.scrolls
    }

    pub fn text(&self, el: ElementId) -> Option<&str> {
        self.nodes[el.0].text.as_deref()
    }

    pub fn display(&self, el: ElementId) -> Option<Display> {
        self.nodes[el.0].display
    }

    pub fn value(&self, el: ElementId) -> String {
        self.nodes[el.0].current_value()
    }

    /// Simulate typing into a form control.
    pub fn set_value(&mut self, el: ElementId, value: &str) {
        self.nodes[el.0].value = Some(value.to_string());
    }

    pub fn remove_attribute(&mut self, el: ElementId, name: &str) {
        self.nodes[el.0].remove_attr(name);
    }

    /// `window.scrollTo(0, y)`, clamped to the scrollable range.
    pub fn scroll_to(&mut self, y: f64) {
        self.viewport.scroll_y = self.clamp_scroll(y);
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.viewport.width = width;
        self.viewport.height = height;
        self.viewport.scroll_y = self.clamp_scroll(self.viewport.scroll_y);
    }

    /// Bottom edge of the lowest element.
    pub fn content_height(&self) -> f64 {
        self.nodes
            .iter()
            .map(|n| n.rect.bottom())
            .fold(0.0, f64::max)
    }

    fn clamp_scroll(&self, y: f64) -> f64 {
        let max = (self.content_height() - self.viewport.height).max(0.0);
        y.clamp(0.0, max)
    }

    /// Pre-order walk of the subtree under `root`, excluding `root`.
    pub fn descendants(&self, root: ElementId) -> Vec<ElementId> {
        let mut out = Vec::new();
        let mut stack: Vec<ElementId> = self.nodes[root.0].children.iter().rev().copied().collect();
        while let Some(el) = stack.pop() {
            out.push(el);
            stack.extend(self.nodes[el.0].children.iter().rev().copied());
        }
        out
    }

    fn contains(&self, el: ElementId) -> bool {
        el.0 < self.nodes.len()
    }
}

impl Document for MemoryDocument {
    fn query_all(&self, selector: &Selector) -> Vec<ElementId> {
        std::iter::once(self.body)
            .chain(self.descendants(self.body))
            .filter(|el| selector.matches(&self.nodes[el.0]))
            .collect()
    }

    fn element_by_id(&self, id: &str) -> Option<ElementId> {
        if id.is_empty() {
            return None;
        }
        std::iter::once(self.body)
            .chain(self.descendants(self.body))
            .find(|el| self.nodes[el.0].attribute("id") == Some(id))
    }

    fn body(&self) -> ElementId {
        self.body
    }

    fn attribute(&self, el: ElementId, name: &str) -> Option<String> {
        self.nodes
            .get(el.0)
            .and_then(|n| n.attribute(name))
            .map(str::to_string)
    }

    fn has_class(&self, el: ElementId, class: &str) -> bool {
        self.nodes.get(el.0).is_some_and(|n| n.has_class(class))
    }

    fn rect(&self, el: ElementId) -> Rect {
        self.nodes.get(el.0).map(|n| n.rect).unwrap_or_default()
    }

    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn form_fields(&self, form: ElementId) -> Vec<(String, String)> {
        if !self.contains(form) {
            return Vec::new();
        }
        self.descendants(form)
            .into_iter()
            .map(|el| &self.nodes[el.0])
            .filter(|n| n.is_submittable())
            .filter_map(|n| {
                n.attribute("name")
                    .filter(|name| !name.is_empty())
                    .map(|name| (name.to_string(), n.current_value()))
            })
            .collect()
    }

    fn add_class(&mut self, el: ElementId, class: &str) {
        let Some(node) = self.nodes.get_mut(el.0) else {
            return;
        };
        let mut classes = node.class_list();
        if !classes.iter().any(|c| c == class) {
            classes.push(class.to_string());
            node.set_attr("class", &classes.join(" "));
        }
    }

    fn remove_class(&mut self, el: ElementId, class: &str) {
        let Some(node) = self.nodes.get_mut(el.0) else {
            return;
        };
        let classes = node.class_list();
        if classes.iter().any(|c| c == class) {
            let kept: Vec<String> = classes.into_iter().filter(|c| c != class).collect();
            node.set_attr("class", &kept.join(" "));
        }
    }

    fn set_attribute(&mut self, el: ElementId, name: &str, value: &str) {
        if let Some(node) = self.nodes.get_mut(el.0) {
            node.set_attr(&name.to_ascii_lowercase(), value);
        }
    }

    fn set_text(&mut self, el: ElementId, text: &str) {
        if let Some(node) = self.nodes.get_mut(el.0) {
            node.text = Some(text.to_string());
            node.children.clear();
        }
    }

    fn set_display(&mut self, el: ElementId, display: Display) {
        if let Some(node) = self.nodes.get_mut(el.0) {
            node.display = Some(display);
        }
    }

    fn scroll_into_view(&mut self, el: ElementId, behavior: ScrollBehavior) {
        if !self.contains(el) {
            return;
        }
        self.scrolls.push((el, behavior));
        // The animation is not modelled; the viewport lands on the target.
        let top = self.nodes[el.0].rect.top;
        self.scroll_to(top);
    }

    fn reset_form(&mut self, form: ElementId) {
        if !self.contains(form) {
            return;
        }
        for el in self.descendants(form) {
            let node = &mut self.nodes[el.0];
            if node.is_form_control() {
                node.value = None;
            }
        }
    }

    fn alert(&mut self, message: &str) {
        self.alerts.push(message.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sel(s: &str) -> Selector {
        Selector::parse(s).unwrap()
    }

    fn sample() -> MemoryDocument {
        let page = PageSpec {
            viewport: Viewport {
                scroll_y: 0.0,
                width: 1000.0,
                height: 500.0,
            },
            elements: vec![
                ElementSpec::new("nav").with_child(
                    ElementSpec::new("a")
                        .with_class("nav-link")
                        .with_attr("href", "#about"),
                ),
                ElementSpec::new("section").with_id("about").with_rect(0.0, 800.0),
                ElementSpec::new("section").with_id("work").with_rect(800.0, 700.0),
                ElementSpec::new("form")
                    .with_class("contact-form")
                    .with_child(ElementSpec::new("input").with_attr("name", "name"))
                    .with_child(
                        ElementSpec::new("input")
                            .with_attr("name", "topic")
                            .with_attr("value", "hello"),
                    )
                    .with_child(ElementSpec::new("textarea").with_attr("name", "message"))
                    .with_child(
                        ElementSpec::new("button")
                            .with_attr("type", "submit")
                            .with_attr("name", "send"),
                    ),
            ],
            ..PageSpec::default()
        };
        MemoryDocument::from_spec(&page)
    }

    #[test]
    fn query_all_returns_document_order() {
        let doc = sample();
        let sections = doc.query_all(&sel("section[id]"));
        assert_eq!(sections.len(), 2);
        assert_eq!(doc.attribute(sections[0], "id").as_deref(), Some("about"));
        assert_eq!(doc.attribute(sections[1], "id").as_deref(), Some("work"));
    }

    #[test]
    fn query_finds_nested_elements() {
        let doc = sample();
        let link = doc.query(&sel(r##"a[href^="#"]"##)).unwrap();
        assert!(doc.has_class(link, "nav-link"));
    }

    #[test]
    fn element_by_id_rejects_empty() {
        let doc = sample();
        assert!(doc.element_by_id("").is_none());
        assert!(doc.element_by_id("about").is_some());
        assert!(doc.element_by_id("missing").is_none());
    }

    #[test]
    fn add_class_is_idempotent() {
        let mut doc = sample();
        let about = doc.element_by_id("about").unwrap();
        doc.add_class(about, "animate-fade-in");
        doc.add_class(about, "animate-fade-in");
        assert_eq!(
            doc.attribute(about, "class").as_deref(),
            Some("animate-fade-in")
        );
        doc.remove_class(about, "animate-fade-in");
        assert!(!doc.has_class(about, "animate-fade-in"));
    }

    #[test]
    fn form_fields_skip_buttons_and_use_current_values() {
        let mut doc = sample();
        let form = doc.query(&sel(".contact-form")).unwrap();
        let name_input = doc.query(&sel("input[name=name]")).unwrap();
        doc.set_value(name_input, "Ada");
        let fields = doc.form_fields(form);
        assert_eq!(
            fields,
            vec![
                ("name".to_string(), "Ada".to_string()),
                ("topic".to_string(), "hello".to_string()),
                ("message".to_string(), String::new()),
            ]
        );
    }

    #[test]
    fn form_fields_include_only_checked_boxes() {
        let doc = MemoryDocument::from_spec(&PageSpec {
            elements: vec![
                ElementSpec::new("form")
                    .with_id("signup")
                    .with_child(
                        ElementSpec::new("input")
                            .with_attr("type", "checkbox")
                            .with_attr("name", "newsletter")
                            .with_attr("value", "yes"),
                    )
                    .with_child(
                        ElementSpec::new("input")
                            .with_attr("type", "checkbox")
                            .with_attr("name", "terms")
                            .with_attr("checked", ""),
                    )
                    .with_child(
                        ElementSpec::new("input")
                            .with_attr("type", "radio")
                            .with_attr("name", "plan")
                            .with_attr("value", "free"),
                    )
                    .with_child(
                        ElementSpec::new("input")
                            .with_attr("type", "radio")
                            .with_attr("name", "plan")
                            .with_attr("value", "pro")
                            .with_attr("checked", ""),
                    ),
            ],
            ..PageSpec::default()
        });
        let form = doc.element_by_id("signup").unwrap();
        assert_eq!(
            doc.form_fields(form),
            vec![
                ("terms".to_string(), "on".to_string()),
                ("plan".to_string(), "pro".to_string()),
            ]
        );
    }

    #[test]
    fn reset_form_restores_defaults() {
        let mut doc = sample();
        let form = doc.query(&sel(".contact-form")).unwrap();
        let topic = doc.query(&sel("input[name=topic]")).unwrap();
        doc.set_value(topic, "changed");
        doc.reset_form(form);
        assert_eq!(doc.value(topic), "hello");
    }

    #[test]
    fn scroll_into_view_moves_viewport_and_clamps() {
        let mut doc = sample();
        let work = doc.element_by_id("work").unwrap();
        doc.scroll_into_view(work, ScrollBehavior::Smooth);
        // content height 1500, viewport 500 => max scroll 1000
        assert_eq!(doc.viewport().scroll_y, 800.0);
        doc.scroll_to(5000.0);
        assert_eq!(doc.viewport().scroll_y, 1000.0);
        doc.scroll_to(-20.0);
        assert_eq!(doc.viewport().scroll_y, 0.0);
        assert_eq!(doc.scrolls(), [(work, ScrollBehavior::Smooth)]);
    }

    #[test]
    fn body_class_from_spec() {
        let page = PageSpec {
            body_class: Some("home".into()),
            ..PageSpec::default()
        };
        let doc = MemoryDocument::from_spec(&page);
        assert!(doc.has_class(doc.body(), "home"));
    }

    #[test]
    fn page_spec_parses_from_json() {
        let json = r##"{
            "viewport": {"height": 600},
            "elements": [
                {"tag": "a", "attrs": [["href", "#top"]], "text": "Top"},
                {"tag": "section", "id": "top", "rect": {"top": 0, "height": 900}}
            ]
        }"##;
        let spec: PageSpec = serde_json::from_str(json).unwrap();
        let doc = MemoryDocument::from_spec(&spec);
        assert_eq!(doc.viewport().height, 600.0);
        assert_eq!(doc.viewport().width, 1280.0);
        let top = doc.element_by_id("top").unwrap();
        assert_eq!(doc.rect(top).height, 900.0);
    }

    #[test]
    fn page_spec_rejects_unknown_fields() {
        let json = r#"{"elements": [{"tag": "div", "colour": "red"}]}"#;
        assert!(serde_json::from_str::<PageSpec>(json).is_err());
    }
}
