//! Mobile navigation toggle.
//!
//! A button (`.nav-toggle`) opens and closes the nav menu (`.nav-menu`).
//! The open state lives in [`MenuState`] and is mirrored two ways: the open
//! class on the menu, and `aria-expanded` on the toggle button.

use crate::dom::Document;
use crate::effect::Effect;
use crate::selector::Selector;
use crate::types::ElementId;

pub const ARIA_EXPANDED: &str = "aria-expanded";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MenuState {
    pub open: bool,
}

impl MenuState {
    /// String form written to `aria-expanded`.
    pub fn aria_expanded(self) -> &'static str {
        if self.open { "true" } else { "false" }
    }

    pub fn toggled(self) -> Self {
        Self { open: !self.open }
    }
}

/// A bound toggle button and the menu it controls.
#[derive(Debug, Clone)]
pub struct NavToggle {
    toggle: ElementId,
    menu: ElementId,
    open_class: String,
}

impl NavToggle {
    /// Locate the toggle and menu. Both must be present.
    pub fn bind<D: Document + ?Sized>(
        doc: &D,
        toggle: &Selector,
        menu: &Selector,
        open_class: &str,
    ) -> Option<Self> {
        Some(Self {
            toggle: doc.query(toggle)?,
            menu: doc.query(menu)?,
            open_class: open_class.to_string(),
        })
    }

    pub fn toggle_control(&self) -> ElementId {
        self.toggle
    }

    pub fn menu(&self) -> ElementId {
        self.menu
    }

    /// The menu is open if it already carries the open class.
    pub fn read_state<D: Document + ?Sized>(&self, doc: &D) -> MenuState {
        MenuState {
            open: doc.has_class(self.menu, &self.open_class),
        }
    }

    /// Make `aria-expanded` agree with `state`.
    pub fn sync(&self, state: MenuState) -> Vec<Effect> {
        vec![Effect::set_attribute(
            self.toggle,
            ARIA_EXPANDED,
            state.aria_expanded(),
        )]
    }

    pub fn on_click(&self, state: MenuState) -> (MenuState, Vec<Effect>) {
        let next = state.toggled();
        (next, self.render(next))
    }

    /// Close the menu if it is open; nothing to do otherwise.
    pub fn close(&self, state: MenuState) -> (MenuState, Vec<Effect>) {
        if !state.open {
            return (state, Vec::new());
        }
        let next = MenuState { open: false };
        (next, self.render(next))
    }

    fn render(&self, state: MenuState) -> Vec<Effect> {
        vec![
            Effect::set_class(self.menu, &self.open_class, state.open),
            Effect::set_attribute(self.toggle, ARIA_EXPANDED, state.aria_expanded()),
        ]
    }
}
