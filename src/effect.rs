//! UI effects and the adapter that applies them.
//!
//! Behaviors never touch the document directly. Each event handler reads
//! what it needs and returns an [`Outcome`]: whether the browser's default
//! action is suppressed, plus an ordered list of [`Effect`]s. [`apply`] is the
//! only place effects meet a [`Document`] and a [`KeyValueStore`], which keeps
//! every behavior testable as a plain function of its inputs.

use crate::dom::Document;
use crate::store::KeyValueStore;
use crate::types::{Display, ElementId};
use std::collections::BTreeMap;
use tracing::{info, warn};

/// How a scroll-into-view should animate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollBehavior {
    Smooth,
}

/// One observable change requested by a behavior.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    AddClass {
        target: ElementId,
        class: String,
    },
    RemoveClass {
        target: ElementId,
        class: String,
    },
    SetAttribute {
        target: ElementId,
        name: String,
        value: String,
    },
    SetText {
        target: ElementId,
        text: String,
    },
    SetDisplay {
        target: ElementId,
        display: Display,
    },
    /// Align the target's top with the top of the viewport.
    ScrollIntoView {
        target: ElementId,
        behavior: ScrollBehavior,
    },
    ResetForm {
        target: ElementId,
    },
    Persist {
        key: String,
        value: String,
    },
    LogSubmission {
        fields: BTreeMap<String, String>,
    },
    /// Blocking acknowledgement dialog.
    Alert {
        message: String,
    },
}

impl Effect {
    pub fn add_class(target: ElementId, class: &str) -> Self {
        Effect::AddClass {
            target,
            class: class.to_string(),
        }
    }

    pub fn remove_class(target: ElementId, class: &str) -> Self {
        Effect::RemoveClass {
            target,
            class: class.to_string(),
        }
    }

    /// `AddClass` when `on`, `RemoveClass` otherwise.
    pub fn set_class(target: ElementId, class: &str, on: bool) -> Self {
        if on {
            Self::add_class(target, class)
        } else {
            Self::remove_class(target, class)
        }
    }

    pub fn set_attribute(target: ElementId, name: &str, value: &str) -> Self {
        Effect::SetAttribute {
            target,
            name: name.to_string(),
            value: value.to_string(),
        }
    }

    /// The element this effect writes to, if it writes to one.
    pub fn target(&self) -> Option<ElementId> {
        match self {
            Effect::AddClass { target, .. }
            | Effect::RemoveClass { target, .. }
            | Effect::SetAttribute { target, .. }
            | Effect::SetText { target, .. }
            | Effect::SetDisplay { target, .. }
            | Effect::ScrollIntoView { target, .. }
            | Effect::ResetForm { target } => Some(*target),
            Effect::Persist { .. } | Effect::LogSubmission { .. } | Effect::Alert { .. } => None,
        }
    }
}

/// Result of handling one event.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Outcome {
    /// The event's default action (navigation, form post) is suppressed.
    pub default_prevented: bool,
    pub effects: Vec<Effect>,
}

impl Outcome {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn prevented() -> Self {
        Self {
            default_prevented: true,
            effects: Vec::new(),
        }
    }

    pub fn with_effects(effects: Vec<Effect>) -> Self {
        Self {
            default_prevented: false,
            effects,
        }
    }

    pub fn is_empty(&self) -> bool {
        !self.default_prevented && self.effects.is_empty()
    }

    /// Fold another outcome into this one, preserving effect order.
    pub fn merge(&mut self, other: Outcome) {
        self.default_prevented |= other.default_prevented;
        self.effects.extend(other.effects);
    }
}

/// Execute effects in order against a document and a store.
///
/// Store failures are logged and skipped: the visual change has already been
/// applied and there is nothing for the page to do about a full or missing
/// storage backend.
pub fn apply<D, S>(doc: &mut D, store: &mut S, effects: &[Effect])
where
    D: Document + ?Sized,
    S: KeyValueStore + ?Sized,
{
    for effect in effects {
        match effect {
            Effect::AddClass { target, class } => doc.add_class(*target, class),
            Effect::RemoveClass { target, class } => doc.remove_class(*target, class),
            Effect::SetAttribute {
                target,
                name,
                value,
            } => doc.set_attribute(*target, name, value),
            Effect::SetText { target, text } => doc.set_text(*target, text),
            Effect::SetDisplay { target, display } => doc.set_display(*target, *display),
            Effect::ScrollIntoView { target, behavior } => {
                doc.scroll_into_view(*target, *behavior)
            }
            Effect::ResetForm { target } => doc.reset_form(*target),
            Effect::Persist { key, value } => {
                if let Err(e) = store.set(key, value) {
                    warn!(key = %key, error = %e, "failed to persist preference");
                }
            }
            Effect::LogSubmission { fields } => {
                info!(fields = ?fields, "Form submitted");
            }
            Effect::Alert { message } => doc.alert(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{ElementSpec, MemoryDocument, PageSpec};
    use crate::store::{MemoryStore, StoreError};

    fn doc_with_card() -> (MemoryDocument, ElementId) {
        let page = PageSpec {
            elements: vec![ElementSpec::new("div").with_id("card").with_class("card")],
            ..PageSpec::default()
        };
        let doc = MemoryDocument::from_spec(&page);
        let card = doc.element_by_id("card").unwrap();
        (doc, card)
    }

    #[test]
    fn apply_class_effects_in_order() {
        let (mut doc, card) = doc_with_card();
        let mut store = MemoryStore::new();
        apply(
            &mut doc,
            &mut store,
            &[
                Effect::add_class(card, "active"),
                Effect::remove_class(card, "card"),
            ],
        );
        assert!(doc.has_class(card, "active"));
        assert!(!doc.has_class(card, "card"));
    }

    #[test]
    fn apply_persist_writes_store() {
        let (mut doc, _) = doc_with_card();
        let mut store = MemoryStore::new();
        apply(
            &mut doc,
            &mut store,
            &[Effect::Persist {
                key: "theme".into(),
                value: "dark".into(),
            }],
        );
        assert_eq!(store.get("theme").as_deref(), Some("dark"));
    }

    struct FailingStore;

    impl KeyValueStore for FailingStore {
        fn get(&self, _key: &str) -> Option<String> {
            None
        }

        fn set(&mut self, _key: &str, _value: &str) -> Result<(), StoreError> {
            Err(StoreError::Io(std::io::Error::other("quota exceeded")))
        }
    }

    #[test]
    fn store_failure_does_not_stop_later_effects() {
        let (mut doc, card) = doc_with_card();
        apply(
            &mut doc,
            &mut FailingStore,
            &[
                Effect::Persist {
                    key: "theme".into(),
                    value: "dark".into(),
                },
                Effect::add_class(card, "after"),
            ],
        );
        assert!(doc.has_class(card, "after"));
    }

    #[test]
    fn apply_alert_is_recorded() {
        let (mut doc, _) = doc_with_card();
        apply(
            &mut doc,
            &mut MemoryStore::new(),
            &[Effect::Alert {
                message: "Thanks".into(),
            }],
        );
        assert_eq!(doc.alerts(), ["Thanks".to_string()]);
    }

    #[test]
    fn outcome_merge_keeps_prevention_and_order() {
        let mut a = Outcome::with_effects(vec![Effect::add_class(ElementId(1), "x")]);
        let mut b = Outcome::prevented();
        b.effects.push(Effect::add_class(ElementId(2), "y"));
        a.merge(b);
        assert!(a.default_prevented);
        assert_eq!(a.effects[1].target(), Some(ElementId(2)));
    }

    #[test]
    fn set_class_picks_direction() {
        assert!(matches!(
            Effect::set_class(ElementId(0), "a", true),
            Effect::AddClass { .. }
        ));
        assert!(matches!(
            Effect::set_class(ElementId(0), "a", false),
            Effect::RemoveClass { .. }
        ));
    }
}
