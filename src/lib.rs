//! # Folio UI
//!
//! The interactivity layer of a single-page portfolio site, modelled as a
//! headless engine. A portfolio page needs a handful of small behaviors:
//! a mobile nav toggle, smooth scrolling for in-page links, the copyright
//! year, a contact form that only acknowledges, reveal-on-scroll, an
//! active-section marker in the nav, and optionally a dark-mode switch and a
//! project category filter. This crate implements those behaviors against an
//! abstract [`dom::Document`], so they can be driven by a browser binding, a
//! test, or the bundled simulator.
//!
//! # Architecture: Bind, Handle, Apply
//!
//! ```text
//! 1. Setup   Document + config  →  controller, handles, initial effects
//! 2. Handle  controller + event →  Outcome { default_prevented, effects }
//! 3. Apply   effects            →  Document writes, store writes, log lines
//! ```
//!
//! Handling never mutates the document; it only reads it and returns
//! [`effect::Effect`]s. [`effect::apply`] is the single place where effects
//! meet a document and a store. This split exists for two reasons:
//!
//! - **Testability**: every behavior is a plain function of (state, event),
//!   so tests assert on effect lists without a browser.
//! - **Borrowing**: `handle` takes `&D` and `apply` takes `&mut D`, so the
//!   compiler rules out a handler observing its own half-applied writes.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`interactivity`] | Setup, disposal handles, and event routing across all behaviors |
//! | [`nav`] | Mobile menu toggle with `aria-expanded` |
//! | [`anchor`] | Smooth scrolling for `#fragment` links; closes the menu |
//! | [`reveal`] | One-shot reveal-on-scroll with threshold and bottom margin |
//! | [`tracker`] | Active-section marking and scroll sampling policies |
//! | [`theme`] | Optional dark mode with a persisted choice |
//! | [`filter`] | Optional project category filter |
//! | [`form`] | Contact form stub: log, acknowledge, reset |
//! | [`page`] | Copyright year, `loaded` marker, host [`page::Environment`] |
//! | [`effect`] | Effect vocabulary and the apply adapter |
//! | [`dom`] | The `Document` port and the in-memory document |
//! | [`selector`] | Parser and matcher for the CSS selector subset in use |
//! | [`store`] | Key-value persistence: in memory or a JSON file |
//! | [`config`] | `config.toml` loading, merging over stock defaults, validation |
//! | [`simulate`] | Replays JSON event scripts against a JSON page description |
//! | [`render`] | HTML rendering of an in-memory page using Maud |
//! | [`output`] | CLI output formatting for simulate and check |
//! | [`types`] | Element ids, geometry, display values |
//!
//! # Design Decisions
//!
//! ## Explicit Setup Instead of Load-Time Wiring
//!
//! Every behavior binds through [`interactivity::Interactivity::setup`], which
//! returns one [`interactivity::BehaviorHandle`] per bound behavior. Pages
//! that lack a behavior's elements simply get no handle for it. Disposing a
//! handle detaches that behavior; controllers are plain values, so several
//! pages can be driven side by side.
//!
//! ## Selectors Are Configuration
//!
//! Elements are located through selector strings in `config.toml` rather
//! than hard-coded class names. The grammar covers type, class, id,
//! attribute presence, equality and prefix, compounds and lists. It has no
//! combinators, so matching looks at one element at a time.
//!
//! ## Overlapping Sections Stay Overlapping
//!
//! The active-section rule marks a link when the scroll position lies in
//! `(top - look_ahead, top - look_ahead + height]`. Sections are evaluated
//! independently, so overlapping sections can both be active. That matches
//! what the layout says and is left to page authors to avoid.

pub mod anchor;
pub mod config;
pub mod dom;
pub mod effect;
pub mod filter;
pub mod form;
pub mod interactivity;
pub mod nav;
pub mod output;
pub mod page;
pub mod render;
pub mod reveal;
pub mod selector;
pub mod simulate;
pub mod store;
pub mod theme;
pub mod tracker;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
