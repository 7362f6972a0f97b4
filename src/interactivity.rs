//! Wiring: bind every behavior to a page and route events to them.
//!
//! [`Interactivity::setup`] inspects a document once, binds each behavior
//! whose elements are present, and returns the controller together with a
//! [`BehaviorHandle`] per bound behavior and the [`Outcome`] the page needs
//! right away (year text, initial theme, first reveal pass).
//!
//! Afterwards the host feeds [`PageEvent`]s to [`Interactivity::handle`],
//! which only reads the document, and applies the returned effects with
//! [`effect::apply`](crate::effect::apply). [`Interactivity::dispatch`] does
//! both in one call.
//!
//! Controllers are plain values: several can drive separate documents side
//! by side, and disposing a handle detaches one behavior from one controller.

use crate::anchor::AnchorRouter;
use crate::config::{ConfigError, UiConfig};
use crate::dom::Document;
use crate::effect::{self, Effect, Outcome};
use crate::filter::CategoryFilter;
use crate::form::ContactForm;
use crate::nav::{MenuState, NavToggle};
use crate::page::{self, Environment, LoadMarker};
use crate::reveal::{RevealEngine, RevealOptions};
use crate::store::KeyValueStore;
use crate::theme::{self, Theme, ThemeToggle};
use crate::tracker::SectionTracker;
use crate::types::ElementId;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

static NEXT_INSTANCE: AtomicU64 = AtomicU64::new(1);

/// The behaviors a page can have.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Behavior {
    NavToggle,
    SmoothScroll,
    CopyrightYear,
    ContactForm,
    Reveal,
    ActiveSection,
    PageLoaded,
    DarkMode,
    ProjectFilter,
}

impl Behavior {
    pub const ALL: [Behavior; 9] = [
        Behavior::NavToggle,
        Behavior::SmoothScroll,
        Behavior::CopyrightYear,
        Behavior::ContactForm,
        Behavior::Reveal,
        Behavior::ActiveSection,
        Behavior::PageLoaded,
        Behavior::DarkMode,
        Behavior::ProjectFilter,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Behavior::NavToggle => "nav toggle",
            Behavior::SmoothScroll => "smooth scroll",
            Behavior::CopyrightYear => "copyright year",
            Behavior::ContactForm => "contact form",
            Behavior::Reveal => "reveal on scroll",
            Behavior::ActiveSection => "active section",
            Behavior::PageLoaded => "page loaded",
            Behavior::DarkMode => "dark mode",
            Behavior::ProjectFilter => "project filter",
        }
    }
}

impl fmt::Display for Behavior {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Disposer for one bound behavior on one controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BehaviorHandle {
    instance: u64,
    behavior: Behavior,
}

impl BehaviorHandle {
    pub fn behavior(&self) -> Behavior {
        self.behavior
    }
}

/// Something that happened on the page.
#[derive(Debug, Clone, PartialEq)]
pub enum PageEvent {
    Click(ElementId),
    /// The page scrolled to `y`. `at_ms` is the event timestamp, used by
    /// time-based scroll sampling.
    Scroll { y: f64, at_ms: Option<u64> },
    /// The viewport changed size.
    Resize,
    /// All resources finished loading.
    Load,
    Submit(ElementId),
}

/// Result of [`Interactivity::setup`].
#[derive(Debug)]
pub struct Setup {
    pub controller: Interactivity,
    pub handles: Vec<BehaviorHandle>,
    /// Effects the page needs immediately.
    pub initial: Outcome,
}

#[derive(Debug)]
pub struct Interactivity {
    instance: u64,
    nav: Option<NavToggle>,
    menu: MenuState,
    router: Option<AnchorRouter>,
    year: bool,
    form: Option<ContactForm>,
    reveal: Option<RevealEngine>,
    tracker: Option<SectionTracker>,
    loaded: Option<LoadMarker>,
    theme: Option<(ThemeToggle, Theme)>,
    filter: Option<CategoryFilter>,
}

impl Interactivity {
    /// Bind every behavior whose elements exist in `doc`.
    ///
    /// Fails only when a configured selector does not parse.
    pub fn setup<D, S>(
        doc: &D,
        store: &S,
        config: &UiConfig,
        env: &Environment,
    ) -> Result<Setup, ConfigError>
    where
        D: Document + ?Sized,
        S: KeyValueStore + ?Sized,
    {
        let selectors = config.selectors.compile()?;
        let classes = &config.classes;
        let mut initial = Outcome::none();

        let nav = NavToggle::bind(doc, &selectors.nav_toggle, &selectors.nav_menu, &classes.menu_open);
        let menu = match &nav {
            Some(nav) => {
                let state = nav.read_state(doc);
                initial.effects.extend(nav.sync(state));
                state
            }
            None => MenuState::default(),
        };

        let router = AnchorRouter::bind(doc, &selectors.internal_anchors);

        let year_effect = page::copyright_year(doc, &selectors.year, env.current_year);
        let year = year_effect.is_some();
        initial.effects.extend(year_effect);

        let form = ContactForm::bind(doc, &selectors.contact_form, &config.form.acknowledgement);

        let reveal = {
            let mut engine = RevealEngine::new(
                RevealOptions {
                    threshold: config.reveal.threshold,
                    bottom_margin: config.reveal.bottom_margin,
                },
                &classes.revealed,
            );
            engine.observe_all(doc, &selectors.reveal_targets);
            if engine.observed().is_empty() {
                None
            } else {
                initial.effects.extend(engine.on_viewport_change(doc));
                Some(engine)
            }
        };

        let tracker = SectionTracker::bind(
            doc,
            &selectors.tracked_sections,
            config.tracking.look_ahead,
            &classes.link_active,
            config.tracking.sampling,
        );

        let loaded = Some(LoadMarker::bind(doc, &classes.loaded));

        let theme = if config.theme.enabled {
            ThemeToggle::bind(
                doc,
                &selectors.theme_toggle,
                &classes.dark_mode,
                &config.theme.storage_key,
            )
            .map(|toggle| {
                let stored = store.get(toggle.storage_key());
                let theme = theme::resolve_initial(stored.as_deref(), env.prefers_dark);
                initial.effects.extend(toggle.apply(theme));
                (toggle, theme)
            })
        } else {
            None
        };

        let filter = if config.filter.enabled {
            CategoryFilter::bind(
                doc,
                &selectors.filter_buttons,
                &selectors.filter_items,
                &classes.filter_active,
                &config.filter.all_value,
            )
        } else {
            None
        };

        let controller = Interactivity {
            instance: NEXT_INSTANCE.fetch_add(1, Ordering::Relaxed),
            nav,
            menu,
            router,
            year,
            form,
            reveal,
            tracker,
            loaded,
            theme,
            filter,
        };
        let handles: Vec<BehaviorHandle> = Behavior::ALL
            .into_iter()
            .filter(|&b| controller.is_bound(b))
            .map(|behavior| BehaviorHandle {
                instance: controller.instance,
                behavior,
            })
            .collect();
        for handle in &handles {
            debug!(behavior = %handle.behavior, "bound");
        }
        Ok(Setup {
            controller,
            handles,
            initial,
        })
    }

    /// [`setup`](Self::setup), then apply the initial effects.
    pub fn install<D, S>(
        doc: &mut D,
        store: &mut S,
        config: &UiConfig,
        env: &Environment,
    ) -> Result<(Interactivity, Vec<BehaviorHandle>), ConfigError>
    where
        D: Document + ?Sized,
        S: KeyValueStore + ?Sized,
    {
        let Setup {
            controller,
            handles,
            initial,
        } = Self::setup(&*doc, &*store, config, env)?;
        effect::apply(doc, store, &initial.effects);
        Ok((controller, handles))
    }

    pub fn is_bound(&self, behavior: Behavior) -> bool {
        match behavior {
            Behavior::NavToggle => self.nav.is_some(),
            Behavior::SmoothScroll => self.router.is_some(),
            Behavior::CopyrightYear => self.year,
            Behavior::ContactForm => self.form.is_some(),
            Behavior::Reveal => self.reveal.is_some(),
            Behavior::ActiveSection => self.tracker.is_some(),
            Behavior::PageLoaded => self.loaded.is_some(),
            Behavior::DarkMode => self.theme.is_some(),
            Behavior::ProjectFilter => self.filter.is_some(),
        }
    }

    /// Detach a behavior. Returns false if the handle belongs to another
    /// controller or the behavior is already detached.
    pub fn dispose(&mut self, handle: BehaviorHandle) -> bool {
        if handle.instance != self.instance || !self.is_bound(handle.behavior) {
            return false;
        }
        match handle.behavior {
            Behavior::NavToggle => self.nav = None,
            Behavior::SmoothScroll => self.router = None,
            Behavior::CopyrightYear => self.year = false,
            Behavior::ContactForm => self.form = None,
            Behavior::Reveal => self.reveal = None,
            Behavior::ActiveSection => self.tracker = None,
            Behavior::PageLoaded => self.loaded = None,
            Behavior::DarkMode => self.theme = None,
            Behavior::ProjectFilter => self.filter = None,
        }
        debug!(behavior = %handle.behavior, "disposed");
        true
    }

    pub fn menu_state(&self) -> MenuState {
        self.menu
    }

    pub fn theme(&self) -> Option<Theme> {
        self.theme.as_ref().map(|(_, theme)| *theme)
    }

    pub fn filter_selection(&self) -> Option<&str> {
        self.filter.as_ref().and_then(|f| f.selection())
    }

    pub fn reveal(&self) -> Option<&RevealEngine> {
        self.reveal.as_ref()
    }

    pub fn tracker(&self) -> Option<&SectionTracker> {
        self.tracker.as_ref()
    }

    /// Compute the outcome of `event` without touching the document.
    pub fn handle<D: Document + ?Sized>(&mut self, doc: &D, event: &PageEvent) -> Outcome {
        match event {
            PageEvent::Click(target) => self.on_click(doc, *target),
            PageEvent::Scroll { y, at_ms } => {
                let mut effects = self.reveal_pass(doc);
                if let Some(tracker) = &mut self.tracker {
                    effects.extend(tracker.on_scroll(doc, *y, *at_ms));
                }
                Outcome::with_effects(effects)
            }
            PageEvent::Resize => Outcome::with_effects(self.reveal_pass(doc)),
            PageEvent::Load => Outcome::with_effects(
                self.loaded.as_ref().map(LoadMarker::on_load).unwrap_or_default(),
            ),
            PageEvent::Submit(target) => match &self.form {
                Some(form) if form.form() == *target => form.on_submit(doc),
                _ => Outcome::none(),
            },
        }
    }

    /// Handle `event` and apply its effects.
    pub fn dispatch<D, S>(&mut self, doc: &mut D, store: &mut S, event: &PageEvent) -> Outcome
    where
        D: Document + ?Sized,
        S: KeyValueStore + ?Sized,
    {
        let outcome = self.handle(&*doc, event);
        effect::apply(doc, store, &outcome.effects);
        outcome
    }

    fn reveal_pass<D: Document + ?Sized>(&mut self, doc: &D) -> Vec<Effect> {
        self.reveal
            .as_mut()
            .map(|engine| engine.on_viewport_change(doc))
            .unwrap_or_default()
    }

    /// Every behavior listening on `target` reacts, in binding order.
    fn on_click<D: Document + ?Sized>(&mut self, doc: &D, target: ElementId) -> Outcome {
        let mut outcome = Outcome::none();

        if let Some(nav) = &self.nav {
            if nav.toggle_control() == target {
                let (menu, effects) = nav.on_click(self.menu);
                self.menu = menu;
                outcome.effects.extend(effects);
            }
        }

        if let Some(router) = &self.router {
            if router.handles(target) {
                let (menu, routed) = router.on_click(doc, target, self.nav.as_ref(), self.menu);
                self.menu = menu;
                outcome.merge(routed);
            }
        }

        if let Some((toggle, theme)) = &mut self.theme {
            if toggle.toggle_control() == target {
                let (next, effects) = toggle.on_click(*theme);
                *theme = next;
                outcome.effects.extend(effects);
            }
        }

        if let Some(filter) = &mut self.filter {
            if filter.handles(target) {
                outcome.effects.extend(filter.on_click(doc, target));
            }
        }

        outcome
    }
}
