//! Optional project category filter.
//!
//! Filter buttons carry `data-filter`, project cards carry `data-category`.
//! Clicking a button makes it the only active button and shows the cards
//! whose category equals the filter, or every card for the "all" filter.
//! Attributes are compared as present-or-absent values: a button without
//! `data-filter` shows exactly the cards without `data-category`.

use crate::dom::Document;
use crate::effect::Effect;
use crate::selector::Selector;
use crate::types::{Display, ElementId};

pub const FILTER_ATTR: &str = "data-filter";
pub const CATEGORY_ATTR: &str = "data-category";

/// Should an item with `category` be visible under `filter`?
pub fn is_visible(filter: Option<&str>, category: Option<&str>, all_value: &str) -> bool {
    filter == Some(all_value) || filter == category
}

#[derive(Debug, Clone)]
pub struct CategoryFilter {
    buttons: Vec<ElementId>,
    items: Vec<ElementId>,
    active_class: String,
    all_value: String,
    selection: Option<String>,
}

impl CategoryFilter {
    /// Returns `None` when the page has no filter buttons.
    pub fn bind<D: Document + ?Sized>(
        doc: &D,
        buttons: &Selector,
        items: &Selector,
        active_class: &str,
        all_value: &str,
    ) -> Option<Self> {
        let buttons = doc.query_all(buttons);
        if buttons.is_empty() {
            return None;
        }
        Some(Self {
            buttons,
            items: doc.query_all(items),
            active_class: active_class.to_string(),
            all_value: all_value.to_string(),
            selection: Some(all_value.to_string()),
        })
    }

    pub fn handles(&self, el: ElementId) -> bool {
        self.buttons.contains(&el)
    }

    /// The active filter value; `None` after clicking a button without one.
    pub fn selection(&self) -> Option<&str> {
        self.selection.as_deref()
    }

    pub fn on_click<D: Document + ?Sized>(&mut self, doc: &D, button: ElementId) -> Vec<Effect> {
        let filter = doc.attribute(button, FILTER_ATTR);
        let mut effects: Vec<Effect> = self
            .buttons
            .iter()
            .map(|&b| Effect::remove_class(b, &self.active_class))
            .collect();
        effects.push(Effect::add_class(button, &self.active_class));

        for &item in &self.items {
            let category = doc.attribute(item, CATEGORY_ATTR);
            let display = if is_visible(filter.as_deref(), category.as_deref(), &self.all_value) {
                Display::Block
            } else {
                Display::None
            };
            effects.push(Effect::SetDisplay {
                target: item,
                display,
            });
        }
        self.selection = filter;
        effects
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{ElementSpec, MemoryDocument, PageSpec};
    use crate::effect::apply;
    use crate::store::MemoryStore;

    fn page() -> MemoryDocument {
        let button = |id: &str, filter: Option<&str>| {
            let b = ElementSpec::new("button").with_id(id).with_class("filter-btn");
            match filter {
                Some(f) => b.with_attr(FILTER_ATTR, f),
                None => b,
            }
        };
        let card = |id: &str, category: Option<&str>| {
            let c = ElementSpec::new("article").with_id(id).with_class("project-card");
            match category {
                Some(cat) => c.with_attr(CATEGORY_ATTR, cat),
                None => c,
            }
        };
        MemoryDocument::from_spec(&PageSpec {
            elements: vec![
                button("all", Some("all")),
                button("web", Some("web")),
                button("bare", None),
                card("shop", Some("web")),
                card("game", Some("games")),
                card("blog", Some("web")),
                card("misc", None),
            ],
            ..PageSpec::default()
        })
    }

    fn bind(doc: &MemoryDocument) -> CategoryFilter {
        CategoryFilter::bind(
            doc,
            &Selector::parse(".filter-btn").unwrap(),
            &Selector::parse(".project-card").unwrap(),
            "active",
            "all",
        )
        .unwrap()
    }

    fn click(doc: &mut MemoryDocument, filter: &mut CategoryFilter, id: &str) {
        let button = doc.element_by_id(id).unwrap();
        let effects = filter.on_click(&*doc, button);
        apply(doc, &mut MemoryStore::new(), &effects);
    }

    fn visible(doc: &MemoryDocument) -> Vec<String> {
        ["shop", "game", "blog", "misc"]
            .into_iter()
            .filter(|id| doc.display(doc.element_by_id(id).unwrap()) == Some(Display::Block))
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn web_filter_shows_only_web_items() {
        let mut doc = page();
        let mut filter = bind(&doc);
        click(&mut doc, &mut filter, "web");
        assert_eq!(visible(&doc), vec!["shop", "blog"]);
        assert_eq!(filter.selection(), Some("web"));
    }

    #[test]
    fn all_filter_shows_everything() {
        let mut doc = page();
        let mut filter = bind(&doc);
        click(&mut doc, &mut filter, "web");
        click(&mut doc, &mut filter, "all");
        assert_eq!(visible(&doc), vec!["shop", "game", "blog", "misc"]);
    }

    #[test]
    fn only_clicked_button_is_active() {
        let mut doc = page();
        let mut filter = bind(&doc);
        click(&mut doc, &mut filter, "all");
        click(&mut doc, &mut filter, "web");
        let active: Vec<_> = ["all", "web", "bare"]
            .into_iter()
            .filter(|id| doc.has_class(doc.element_by_id(id).unwrap(), "active"))
            .collect();
        assert_eq!(active, vec!["web"]);
    }

    #[test]
    fn button_without_filter_matches_uncategorized_items() {
        let mut doc = page();
        let mut filter = bind(&doc);
        click(&mut doc, &mut filter, "bare");
        assert_eq!(visible(&doc), vec!["misc"]);
        assert_eq!(filter.selection(), None);
    }

    #[test]
    fn default_selection_is_all() {
        let doc = page();
        assert_eq!(bind(&doc).selection(), Some("all"));
    }

    #[test]
    fn visibility_rule() {
        assert!(is_visible(Some("all"), Some("web"), "all"));
        assert!(is_visible(Some("all"), None, "all"));
        assert!(is_visible(Some("web"), Some("web"), "all"));
        assert!(!is_visible(Some("web"), Some("games"), "all"));
        assert!(!is_visible(Some("web"), None, "all"));
    }
}
