//! Replay scripted visitor events against an in-memory page.
//!
//! A [`Session`] owns a [`MemoryDocument`], a store and a bound
//! [`Interactivity`] controller. Script events name their targets by
//! selector. The session turns each one into a [`PageEvent`], performs the
//! host-side part (moving the viewport, typing into fields) and dispatches
//! it. When handling an event moves the viewport (a smooth scroll to an
//! anchor target), the session delivers the scroll notification the browser
//! would send, as a follow-up.
//!
//! ## Script format
//!
//! A JSON array of events, each tagged by `type`:
//!
//! ```json
//! [
//!   { "type": "load" },
//!   { "type": "click", "target": ".nav-toggle" },
//!   { "type": "scroll", "y": 900, "at_ms": 1200 },
//!   { "type": "resize", "width": 390, "height": 844 },
//!   { "type": "submit", "target": ".contact-form", "fields": { "name": "A" } }
//! ]
//! ```

use crate::config::{ConfigError, UiConfig};
use crate::dom::{Document, MemoryDocument, PageSpec};
use crate::effect::{Effect, Outcome};
use crate::interactivity::{Behavior, BehaviorHandle, Interactivity, PageEvent};
use crate::page::Environment;
use crate::selector::{Selector, SelectorError, Subject};
use crate::store::KeyValueStore;
use crate::theme::Theme;
use crate::types::ElementId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid selector: {0}")]
    Selector(#[from] SelectorError),
    #[error("no element matches '{0}'")]
    UnknownTarget(String),
    #[error("form '{form}' has no field named '{field}'")]
    UnknownField { form: String, field: String },
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// One entry of an event script.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScriptEvent {
    Click {
        target: String,
    },
    Scroll {
        y: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        at_ms: Option<u64>,
    },
    Resize {
        width: f64,
        height: f64,
    },
    Load,
    Submit {
        target: String,
        /// Values typed into named fields before submitting.
        #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
        fields: BTreeMap<String, String>,
    },
}

impl fmt::Display for ScriptEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScriptEvent::Click { target } => write!(f, "click {target}"),
            ScriptEvent::Scroll { y, at_ms: None } => write!(f, "scroll to {y}"),
            ScriptEvent::Scroll { y, at_ms: Some(t) } => write!(f, "scroll to {y} at {t}ms"),
            ScriptEvent::Resize { width, height } => write!(f, "resize to {width}x{height}"),
            ScriptEvent::Load => f.write_str("load"),
            ScriptEvent::Submit { target, .. } => write!(f, "submit {target}"),
        }
    }
}

pub fn load_page(path: &Path) -> Result<PageSpec, PageError> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

pub fn load_script(path: &Path) -> Result<Vec<ScriptEvent>, PageError> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// What one script event did.
#[derive(Debug, Clone)]
pub struct Step {
    pub event: ScriptEvent,
    pub outcome: Outcome,
    /// Outcome of the scroll notification caused by the event, if any.
    pub follow_up: Option<Outcome>,
    /// Viewport scroll position once the event was handled.
    pub scroll_y: f64,
}

impl Step {
    /// Effects of the event followed by those of its follow-up.
    pub fn effects(&self) -> impl Iterator<Item = &Effect> {
        self.outcome
            .effects
            .iter()
            .chain(self.follow_up.iter().flat_map(|o| o.effects.iter()))
    }
}

/// Observable page state after a run.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub bound: Vec<Behavior>,
    pub scroll_y: f64,
    /// `None` when the nav toggle is not bound.
    pub menu_open: Option<bool>,
    /// Ids of tracked sections whose nav link is marked active.
    pub active_sections: Vec<String>,
    pub revealed: usize,
    pub pending_reveal: usize,
    pub theme: Option<Theme>,
    pub filter: Option<String>,
    pub alerts: Vec<String>,
}

pub struct Session {
    doc: MemoryDocument,
    store: Box<dyn KeyValueStore>,
    ui: Interactivity,
    handles: Vec<BehaviorHandle>,
    link_active_class: String,
    initial: Outcome,
}

impl Session {
    /// Build the page, bind behaviors and apply the setup effects.
    pub fn start(
        page: &PageSpec,
        mut store: Box<dyn KeyValueStore>,
        config: &UiConfig,
        env: &Environment,
    ) -> Result<Self, PageError> {
        let mut doc = MemoryDocument::from_spec(page);
        let setup = Interactivity::setup(&doc, store.as_ref(), config, env)?;
        crate::effect::apply(&mut doc, store.as_mut(), &setup.initial.effects);
        Ok(Self {
            doc,
            store,
            ui: setup.controller,
            handles: setup.handles,
            link_active_class: config.classes.link_active.clone(),
            initial: setup.initial,
        })
    }

    pub fn document(&self) -> &MemoryDocument {
        &self.doc
    }

    pub fn store(&self) -> &dyn KeyValueStore {
        self.store.as_ref()
    }

    pub fn controller(&self) -> &Interactivity {
        &self.ui
    }

    pub fn handles(&self) -> &[BehaviorHandle] {
        &self.handles
    }

    /// Effects applied during setup.
    pub fn initial(&self) -> &Outcome {
        &self.initial
    }

    /// Detach every behavior of the given kind.
    pub fn dispose(&mut self, behavior: Behavior) -> bool {
        let mut any = false;
        for handle in self.handles.iter().filter(|h| h.behavior() == behavior) {
            any |= self.ui.dispose(*handle);
        }
        any
    }

    pub fn play(&mut self, event: &ScriptEvent) -> Result<Step, PageError> {
        let scroll_before = self.doc.viewport().scroll_y;
        let outcome = match event {
            ScriptEvent::Click { target } => {
                let el = self.resolve(target)?;
                self.dispatch(&PageEvent::Click(el))
            }
            ScriptEvent::Scroll { y, at_ms } => {
                self.doc.scroll_to(*y);
                let y = self.doc.viewport().scroll_y;
                self.dispatch(&PageEvent::Scroll { y, at_ms: *at_ms })
            }
            ScriptEvent::Resize { width, height } => {
                self.doc.resize(*width, *height);
                self.dispatch(&PageEvent::Resize)
            }
            ScriptEvent::Load => self.dispatch(&PageEvent::Load),
            ScriptEvent::Submit { target, fields } => {
                let form = self.resolve(target)?;
                self.fill(form, target, fields)?;
                self.dispatch(&PageEvent::Submit(form))
            }
        };

        let moved = !matches!(event, ScriptEvent::Scroll { .. })
            && self.doc.viewport().scroll_y != scroll_before;
        let follow_up = moved.then(|| {
            let y = self.doc.viewport().scroll_y;
            self.dispatch(&PageEvent::Scroll { y, at_ms: None })
        });

        Ok(Step {
            event: event.clone(),
            outcome,
            follow_up,
            scroll_y: self.doc.viewport().scroll_y,
        })
    }

    pub fn run(&mut self, script: &[ScriptEvent]) -> Result<Vec<Step>, PageError> {
        script.iter().map(|event| self.play(event)).collect()
    }

    pub fn summary(&self) -> Summary {
        let active_sections = self
            .ui
            .tracker()
            .map(|tracker| {
                tracker
                    .measure(&self.doc)
                    .into_iter()
                    .filter(|s| {
                        s.link
                            .is_some_and(|link| self.doc.has_class(link, &self.link_active_class))
                    })
                    .map(|s| s.id)
                    .collect()
            })
            .unwrap_or_default();
        Summary {
            bound: Behavior::ALL
                .into_iter()
                .filter(|&b| self.ui.is_bound(b))
                .collect(),
            scroll_y: self.doc.viewport().scroll_y,
            menu_open: self
                .ui
                .is_bound(Behavior::NavToggle)
                .then(|| self.ui.menu_state().open),
            active_sections,
            revealed: self.ui.reveal().map_or(0, |r| r.revealed().len()),
            pending_reveal: self.ui.reveal().map_or(0, |r| r.observed().len()),
            theme: self.ui.theme(),
            filter: self.ui.filter_selection().map(str::to_string),
            alerts: self.doc.alerts().to_vec(),
        }
    }

    fn dispatch(&mut self, event: &PageEvent) -> Outcome {
        self.ui.dispatch(&mut self.doc, self.store.as_mut(), event)
    }

    fn resolve(&self, target: &str) -> Result<ElementId, PageError> {
        let selector = Selector::parse(target)?;
        self.doc
            .query(&selector)
            .ok_or_else(|| PageError::UnknownTarget(target.to_string()))
    }

    fn fill(
        &mut self,
        form: ElementId,
        form_selector: &str,
        fields: &BTreeMap<String, String>,
    ) -> Result<(), PageError> {
        for (name, value) in fields {
            let controls: Vec<ElementId> = self
                .doc
                .descendants(form)
                .into_iter()
                .filter(|&el| {
                    let node = self.doc.node(el);
                    matches!(node.tag(), "input" | "textarea" | "select")
                        && node.attribute("name") == Some(name.as_str())
                })
                .collect();
            if controls.is_empty() {
                return Err(PageError::UnknownField {
                    form: form_selector.to_string(),
                    field: name.clone(),
                });
            }
            for el in controls {
                self.doc.set_value(el, value);
            }
        }
        Ok(())
    }
}
