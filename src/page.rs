//! Page lifecycle: copyright year and the `loaded` marker.

use crate::dom::Document;
use crate::effect::Effect;
use crate::selector::Selector;
use crate::types::ElementId;
use chrono::Datelike;

/// Facts about the host environment that behaviors cannot read from the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Environment {
    pub current_year: i32,
    /// `prefers-color-scheme: dark`.
    pub prefers_dark: bool,
}

impl Environment {
    /// Current local year; no dark-scheme preference.
    pub fn detect() -> Self {
        Self {
            current_year: chrono::Local::now().year(),
            prefers_dark: false,
        }
    }
}

/// Effect that writes `year` into the year element, if the page has one.
pub fn copyright_year<D: Document + ?Sized>(
    doc: &D,
    year_selector: &Selector,
    year: i32,
) -> Option<Effect> {
    let target = doc.query(year_selector)?;
    Some(Effect::SetText {
        target,
        text: year.to_string(),
    })
}

/// Marks `<body>` once the page and all its resources have loaded.
#[derive(Debug, Clone)]
pub struct LoadMarker {
    body: ElementId,
    class: String,
}

impl LoadMarker {
    pub fn bind<D: Document + ?Sized>(doc: &D, class: &str) -> Self {
        Self {
            body: doc.body(),
            class: class.to_string(),
        }
    }

    pub fn on_load(&self) -> Vec<Effect> {
        vec![Effect::add_class(self.body, &self.class)]
    }
}
