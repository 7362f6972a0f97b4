//! Reveal-on-scroll animations.
//!
//! Sections and cards fade in the first time they scroll into view. The
//! engine models an intersection observer with two options:
//!
//! - **threshold**: the fraction of the element that must be visible
//!   (default 0.1);
//! - **bottom margin**: pixels shaved off the bottom of the viewport
//!   (default 50), so an element counts as visible only once it has cleared
//!   the bottom edge by that much.
//!
//! Each observed element moves `Unrevealed → Revealed` exactly once. On the
//! transition the revealed class is added and the element leaves the
//! observation set, so scrolling away and back changes nothing.
//!
//! The observation set is captured at setup. Elements inserted later are
//! never observed.

use crate::dom::Document;
use crate::effect::Effect;
use crate::selector::Selector;
use crate::types::{ElementId, Rect, Viewport};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RevealOptions {
    pub threshold: f64,
    pub bottom_margin: f64,
}

impl Default for RevealOptions {
    fn default() -> Self {
        Self {
            threshold: 0.1,
            bottom_margin: 50.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealState {
    Unrevealed,
    Revealed,
}

/// Visibility of one observed element against the observer root.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntersectionEntry {
    pub target: ElementId,
    pub is_intersecting: bool,
    pub ratio: f64,
}

/// The observer root: the viewport with the bottom margin removed.
pub fn root_rect(viewport: &Viewport, options: &RevealOptions) -> Rect {
    Rect::new(
        viewport.scroll_y,
        (viewport.height - options.bottom_margin).max(0.0),
    )
}

/// Compute how much of `target` lies inside `root`.
///
/// Touching edges count as intersecting. A zero-height target that touches
/// the root is fully visible (ratio 1).
pub fn intersect(target: ElementId, rect: Rect, root: Rect) -> IntersectionEntry {
    let top = rect.top.max(root.top);
    let bottom = rect.bottom().min(root.bottom());
    if top > bottom {
        return IntersectionEntry {
            target,
            is_intersecting: false,
            ratio: 0.0,
        };
    }
    let ratio = if rect.height <= 0.0 {
        1.0
    } else {
        ((bottom - top) / rect.height).clamp(0.0, 1.0)
    };
    IntersectionEntry {
        target,
        is_intersecting: true,
        ratio,
    }
}

#[derive(Debug, Clone)]
pub struct RevealEngine {
    options: RevealOptions,
    class: String,
    /// Still waiting to be revealed, in document order.
    observed: Vec<ElementId>,
    revealed: Vec<ElementId>,
}

impl RevealEngine {
    pub fn new(options: RevealOptions, class: &str) -> Self {
        Self {
            options,
            class: class.to_string(),
            observed: Vec::new(),
            revealed: Vec::new(),
        }
    }

    /// Observe every element currently matching `targets`.
    pub fn observe_all<D: Document + ?Sized>(&mut self, doc: &D, targets: &Selector) {
        for el in doc.query_all(targets) {
            self.observe(el);
        }
    }

    /// Start observing `el`. Already-observed and already-revealed elements
    /// are ignored.
    pub fn observe(&mut self, el: ElementId) {
        if !self.observed.contains(&el) && !self.revealed.contains(&el) {
            self.observed.push(el);
        }
    }

    pub fn observed(&self) -> &[ElementId] {
        &self.observed
    }

    pub fn revealed(&self) -> &[ElementId] {
        &self.revealed
    }

    /// `None` for elements that were never observed.
    pub fn state(&self, el: ElementId) -> Option<RevealState> {
        if self.revealed.contains(&el) {
            Some(RevealState::Revealed)
        } else if self.observed.contains(&el) {
            Some(RevealState::Unrevealed)
        } else {
            None
        }
    }

    /// Measure every observed element against the current viewport.
    pub fn entries<D: Document + ?Sized>(&self, doc: &D) -> Vec<IntersectionEntry> {
        let root = root_rect(&doc.viewport(), &self.options);
        self.observed
            .iter()
            .map(|&el| intersect(el, doc.rect(el), root))
            .collect()
    }

    /// Re-evaluate after the viewport moved or resized.
    pub fn on_viewport_change<D: Document + ?Sized>(&mut self, doc: &D) -> Vec<Effect> {
        let entries = self.entries(doc);
        self.on_entries(&entries)
    }

    /// Apply a batch of observer entries. Entries for elements no longer
    /// observed are ignored.
    pub fn on_entries(&mut self, entries: &[IntersectionEntry]) -> Vec<Effect> {
        let mut effects = Vec::new();
        for entry in entries {
            if !entry.is_intersecting || entry.ratio < self.options.threshold {
                continue;
            }
            let Some(pos) = self.observed.iter().position(|&el| el == entry.target) else {
                continue;
            };
            self.observed.remove(pos);
            self.revealed.push(entry.target);
            effects.push(Effect::add_class(entry.target, &self.class));
        }
        effects
    }
}
