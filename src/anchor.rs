//! Smooth scrolling for in-page links.
//!
//! Every internal anchor (`a[href^="#"]`) is intercepted: the jump is
//! suppressed and, when the fragment names an element, that element is
//! scrolled smoothly to the top of the viewport. A fragment that resolves to
//! nothing (`#`, `#missing`) still has its jump suppressed and does nothing
//! else.
//!
//! Following a link also closes the mobile menu if it is open, so the
//! target is not hidden behind it.

use crate::dom::Document;
use crate::effect::{Effect, Outcome, ScrollBehavior};
use crate::nav::{MenuState, NavToggle};
use crate::selector::Selector;
use crate::types::ElementId;

/// The set of intercepted anchors, captured at setup.
#[derive(Debug, Clone)]
pub struct AnchorRouter {
    anchors: Vec<ElementId>,
}

impl AnchorRouter {
    /// Returns `None` when the page has no internal anchors.
    pub fn bind<D: Document + ?Sized>(doc: &D, anchors: &Selector) -> Option<Self> {
        let anchors = doc.query_all(anchors);
        if anchors.is_empty() {
            None
        } else {
            Some(Self { anchors })
        }
    }

    pub fn anchors(&self) -> &[ElementId] {
        &self.anchors
    }

    pub fn handles(&self, el: ElementId) -> bool {
        self.anchors.contains(&el)
    }

    /// Handle a click on `anchor`. `nav` and `menu` describe the mobile menu,
    /// if one is bound; the returned state is the menu state after the click.
    pub fn on_click<D: Document + ?Sized>(
        &self,
        doc: &D,
        anchor: ElementId,
        nav: Option<&NavToggle>,
        menu: MenuState,
    ) -> (MenuState, Outcome) {
        let mut outcome = Outcome::prevented();
        let Some(target) = resolve_fragment(doc, anchor) else {
            return (menu, outcome);
        };
        outcome.effects.push(Effect::ScrollIntoView {
            target,
            behavior: ScrollBehavior::Smooth,
        });
        let menu = match nav {
            Some(nav) => {
                let (next, effects) = nav.close(menu);
                outcome.effects.extend(effects);
                next
            }
            None => menu,
        };
        (menu, outcome)
    }
}

/// The element named by the anchor's `href` fragment.
fn resolve_fragment<D: Document + ?Sized>(doc: &D, anchor: ElementId) -> Option<ElementId> {
    let href = doc.attribute(anchor, "href")?;
    let fragment = href.strip_prefix('#')?;
    doc.element_by_id(fragment)
}
