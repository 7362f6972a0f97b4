//! Shared test utilities for the folio-ui test suite.
//!
//! Provides a portfolio page fixture plus lookup helpers and bulk extractors
//! that work against [`MemoryDocument`].
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let mut doc = portfolio_page();
//! let toggle = find(&doc, ".nav-toggle");
//! assert_eq!(active_links(&doc), Vec::<String>::new());
//! ```
//!
//! # Page layout
//!
//! Viewport 1280x800. Sections, top to bottom:
//!
//! | id         | top  | height |
//! |------------|------|--------|
//! | `home`     | 0    | 800    |
//! | `about`    | 800  | 600    |
//! | `projects` | 1400 | 700    |
//! | `contact`  | 2100 | 600    |
//!
//! followed by a 100px footer, so the page is 2800px tall. The projects
//! section holds four cards: `shop` and `portfolio` (web), `tetris` (games)
//! and `notes` (no category).

use crate::config::UiConfig;
use crate::dom::{Document, ElementSpec, MemoryDocument, PageSpec};
use crate::selector::{Selector, Subject};
use crate::types::{Display, ElementId};

// =========================================================================
// Fixture setup
// =========================================================================

/// The portfolio page description behind [`portfolio_page`].
pub fn portfolio_spec() -> PageSpec {
    let link = |fragment: &str| {
        ElementSpec::new("li").with_child(
            ElementSpec::new("a")
                .with_class("nav-link")
                .with_attr("href", &format!("#{fragment}"))
                .with_text(fragment),
        )
    };
    let filter_button = |value: &str| {
        ElementSpec::new("button")
            .with_class("filter-btn")
            .with_attr("data-filter", value)
            .with_text(value)
    };
    let card = |id: &str, category: Option<&str>, top: f64| {
        let card = ElementSpec::new("article")
            .with_id(id)
            .with_class("project-card")
            .with_rect(top, 250.0);
        match category {
            Some(c) => card.with_attr("data-category", c),
            None => card,
        }
    };

    PageSpec {
        title: Some("Jane Doe | Portfolio".to_string()),
        body_class: None,
        viewport: Default::default(),
        elements: vec![
            ElementSpec::new("header").with_child(
                ElementSpec::new("nav")
                    .with_class("navbar")
                    .with_child(
                        ElementSpec::new("a")
                            .with_class("logo")
                            .with_attr("href", "#")
                            .with_text("JD"),
                    )
                    .with_child(
                        ElementSpec::new("button")
                            .with_class("nav-toggle")
                            .with_attr("aria-label", "Toggle navigation"),
                    )
                    .with_child(
                        ElementSpec::new("ul")
                            .with_class("nav-menu")
                            .with_child(link("home"))
                            .with_child(link("about"))
                            .with_child(link("projects"))
                            .with_child(link("contact")),
                    )
                    .with_child(ElementSpec::new("button").with_class("dark-mode-toggle")),
            ),
            ElementSpec::new("section")
                .with_id("home")
                .with_class("hero")
                .with_rect(0.0, 800.0)
                .with_child(ElementSpec::new("h1").with_text("Jane Doe")),
            ElementSpec::new("section")
                .with_id("about")
                .with_rect(800.0, 600.0)
                .with_child(
                    ElementSpec::new("div")
                        .with_class("card")
                        .with_rect(900.0, 300.0),
                ),
            ElementSpec::new("section")
                .with_id("projects")
                .with_rect(1400.0, 700.0)
                .with_child(filter_button("all"))
                .with_child(filter_button("web"))
                .with_child(filter_button("games"))
                .with_child(card("shop", Some("web"), 1500.0))
                .with_child(card("tetris", Some("games"), 1500.0))
                .with_child(card("portfolio", Some("web"), 1800.0))
                .with_child(card("notes", None, 1800.0)),
            ElementSpec::new("section")
                .with_id("contact")
                .with_rect(2100.0, 600.0)
                .with_child(
                    ElementSpec::new("form")
                        .with_class("contact-form")
                        .with_child(ElementSpec::new("input").with_attr("name", "name"))
                        .with_child(
                            ElementSpec::new("input")
                                .with_attr("name", "email")
                                .with_attr("type", "email"),
                        )
                        .with_child(ElementSpec::new("textarea").with_attr("name", "message"))
                        .with_child(
                            ElementSpec::new("button")
                                .with_attr("type", "submit")
                                .with_text("Send"),
                        ),
                ),
            ElementSpec::new("footer").with_rect(2700.0, 100.0).with_child(
                ElementSpec::new("p")
                    .with_text("© ")
                    .with_child(ElementSpec::new("span").with_id("current-year").with_text("2020")),
            ),
        ],
    }
}

/// A fresh in-memory portfolio page.
pub fn portfolio_page() -> MemoryDocument {
    MemoryDocument::from_spec(&portfolio_spec())
}

/// Stock config with the optional theme and filter behaviors switched on.
pub fn all_enabled_config() -> UiConfig {
    let mut config = UiConfig::default();
    config.theme.enabled = true;
    config.filter.enabled = true;
    config
}

// =========================================================================
// Lookups: panic with a clear message on miss
// =========================================================================

/// First element matching `selector`. Panics if the selector is invalid or
/// nothing matches.
pub fn find(doc: &MemoryDocument, selector: &str) -> ElementId {
    let parsed = Selector::parse(selector)
        .unwrap_or_else(|e| panic!("invalid selector '{selector}': {e}"));
    doc.query(&parsed)
        .unwrap_or_else(|| panic!("no element matches '{selector}'"))
}

/// Element by id. Panics if not found.
pub fn by_id(doc: &MemoryDocument, id: &str) -> ElementId {
    doc.element_by_id(id)
        .unwrap_or_else(|| panic!("element '#{id}' not found"))
}

// =========================================================================
// Bulk extractors
// =========================================================================

/// `href` of every nav link carrying the `active` class, in document order.
pub fn active_links(doc: &MemoryDocument) -> Vec<String> {
    let links = Selector::parse(".nav-link").unwrap();
    doc.query_all(&links)
        .into_iter()
        .filter(|&el| doc.has_class(el, "active"))
        .filter_map(|el| doc.attribute(el, "href"))
        .collect()
}

/// Ids of project cards not hidden by `display: none`, in document order.
pub fn visible_projects(doc: &MemoryDocument) -> Vec<String> {
    let cards = Selector::parse(".project-card").unwrap();
    doc.query_all(&cards)
        .into_iter()
        .filter(|&el| doc.display(el) != Some(Display::None))
        .filter_map(|el| doc.attribute(el, "id"))
        .collect()
}

/// Ids of elements carrying `class`, in document order. Elements without an
/// id are listed by their tag.
pub fn ids_with_class(doc: &MemoryDocument, class: &str) -> Vec<String> {
    std::iter::once(doc.body())
        .chain(doc.descendants(doc.body()))
        .filter(|&el| doc.has_class(el, class))
        .map(|el| {
            doc.attribute(el, "id")
                .unwrap_or_else(|| doc.node(el).tag().to_string())
        })
        .collect()
}
