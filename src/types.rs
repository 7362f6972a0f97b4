//! Shared geometry and handle types used by every behavior.
//!
//! These types cross the boundary between the pure behavior code and the
//! [`Document`](crate::dom::Document) port, and are serialized in page
//! descriptions and simulator output.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque handle to a node inside a [`Document`](crate::dom::Document).
///
/// Handles are only meaningful for the document that issued them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ElementId(pub usize);

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Document-space vertical extent of an element.
///
/// `top` plays the role of `offsetTop`, `height` of `offsetHeight`. Pages
/// are laid out as a single scrolling column, so horizontal geometry is not
/// tracked.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Rect {
    pub top: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(top: f64, height: f64) -> Self {
        Self { top, height }
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }
}

/// The visible window onto the document.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Viewport {
    /// Current vertical scroll offset (`pageYOffset`).
    pub scroll_y: f64,
    pub width: f64,
    pub height: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            scroll_y: 0.0,
            width: 1280.0,
            height: 800.0,
        }
    }
}

impl Viewport {
    /// The viewport as a document-space rectangle.
    pub fn rect(&self) -> Rect {
        Rect::new(self.scroll_y, self.height)
    }
}

/// Inline `display` value written by the category filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Display {
    Block,
    None,
}

impl Display {
    pub fn as_css(self) -> &'static str {
        match self {
            Display::Block => "block",
            Display::None => "none",
        }
    }
}
