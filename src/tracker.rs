//! Active-section highlighting.
//!
//! On each sampled scroll position, every tracked section (`section[id]`) is
//! tested independently:
//!
//! ```text
//! sectionTop    = offsetTop - look_ahead
//! sectionBottom = sectionTop + offsetHeight
//! active        = sectionTop < scrollY <= sectionBottom
//! ```
//!
//! The nav link pointing at the section (`a[href="#<id>"]`) gets the active
//! class when the section is active and loses it otherwise. Sections without
//! a link are skipped.
//!
//! Sections are not made mutually exclusive: if two ranges overlap at some
//! scroll position, both links are marked. Offsets are re-read on every
//! evaluation, so layout changes are picked up without re-binding.

use crate::config::ScrollSampling;
use crate::dom::Document;
use crate::effect::Effect;
use crate::selector::Selector;
use crate::types::ElementId;

/// A section's position as measured on one scroll tick.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackedSection {
    pub id: String,
    pub offset_top: f64,
    pub offset_height: f64,
    /// Nav link targeting this section, if any.
    pub link: Option<ElementId>,
}

impl TrackedSection {
    pub fn range(&self, look_ahead: f64) -> (f64, f64) {
        let top = self.offset_top - look_ahead;
        (top, top + self.offset_height)
    }

    pub fn is_active(&self, scroll_y: f64, look_ahead: f64) -> bool {
        let (top, bottom) = self.range(look_ahead);
        scroll_y > top && scroll_y <= bottom
    }
}

/// Link-marking effects for one scroll position.
pub fn evaluate(
    sections: &[TrackedSection],
    scroll_y: f64,
    look_ahead: f64,
    active_class: &str,
) -> Vec<Effect> {
    sections
        .iter()
        .filter_map(|section| {
            let link = section.link?;
            Some(Effect::set_class(
                link,
                active_class,
                section.is_active(scroll_y, look_ahead),
            ))
        })
        .collect()
}

/// Decides which scroll notifications are evaluated.
#[derive(Debug, Clone)]
pub struct ScrollSampler {
    policy: ScrollSampling,
    last: Option<(f64, Option<u64>)>,
}

impl ScrollSampler {
    pub fn new(policy: ScrollSampling) -> Self {
        Self { policy, last: None }
    }

    /// Returns true (and records the sample) if this notification should be
    /// evaluated. The first notification always is.
    pub fn sample(&mut self, y: f64, at_ms: Option<u64>) -> bool {
        let take = match (self.policy, self.last) {
            (_, None) | (ScrollSampling::Every {}, _) => true,
            (ScrollSampling::MinDelta { pixels }, Some((last_y, _))) => (y - last_y).abs() >= pixels,
            (ScrollSampling::Throttle { interval_ms }, Some((_, last_at))) => {
                match (at_ms, last_at) {
                    (Some(now), Some(then)) => now.saturating_sub(then) >= interval_ms,
                    _ => true,
                }
            }
        };
        if take {
            self.last = Some((y, at_ms));
        }
        take
    }
}

#[derive(Debug, Clone)]
pub struct SectionTracker {
    sections: Vec<ElementId>,
    look_ahead: f64,
    active_class: String,
    sampler: ScrollSampler,
}

impl SectionTracker {
    /// Returns `None` when the page has no tracked sections.
    pub fn bind<D: Document + ?Sized>(
        doc: &D,
        sections: &Selector,
        look_ahead: f64,
        active_class: &str,
        sampling: ScrollSampling,
    ) -> Option<Self> {
        let sections = doc.query_all(sections);
        if sections.is_empty() {
            return None;
        }
        Some(Self {
            sections,
            look_ahead,
            active_class: active_class.to_string(),
            sampler: ScrollSampler::new(sampling),
        })
    }

    /// Measure every tracked section and find its nav link.
    pub fn measure<D: Document + ?Sized>(&self, doc: &D) -> Vec<TrackedSection> {
        self.sections
            .iter()
            .filter_map(|&el| {
                let id = doc.attribute(el, "id").filter(|id| !id.is_empty())?;
                let rect = doc.rect(el);
                let link = doc.query(&Selector::link_to_fragment(&id));
                Some(TrackedSection {
                    id,
                    offset_top: rect.top,
                    offset_height: rect.height,
                    link,
                })
            })
            .collect()
    }

    /// Handle a scroll notification. Returns no effects when the sampler
    /// skips the notification.
    pub fn on_scroll<D: Document + ?Sized>(
        &mut self,
        doc: &D,
        scroll_y: f64,
        at_ms: Option<u64>,
    ) -> Vec<Effect> {
        if !self.sampler.sample(scroll_y, at_ms) {
            return Vec::new();
        }
        evaluate(
            &self.measure(doc),
            scroll_y,
            self.look_ahead,
            &self.active_class,
        )
    }
}
