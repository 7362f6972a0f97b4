//! CLI output formatting for the `simulate` and `check` commands.
//!
//! # Element Display Contract
//!
//! Effects name the element they touch by the shortest stable description:
//! `tag#id` when the element has an id, `tag.first-class` when it has a
//! class, and `tag(#n)` with its internal index otherwise.
//!
//! # Output Format
//!
//! ## Simulate
//!
//! ```text
//! Setup
//!     span#current-year text "2026"
//!     button.nav-toggle aria-expanded="false"
//!     section#home +animate-fade-in
//!
//! 001 click .nav-toggle
//!     ul.nav-menu +active
//!     button.nav-toggle aria-expanded="true"
//! 002 click a[href="#about"] (default prevented)
//!     scroll section#about into view (smooth)
//!     then scroll to 800
//!         a.nav-link +active
//!
//! Summary
//!     Bound: nav toggle, smooth scroll, copyright year
//!     Scroll: 800
//!     Menu: closed
//!     Active section: about
//!     Revealed: 3 (4 pending)
//! ```
//!
//! ## Check
//!
//! ```text
//! Behaviors
//!     nav toggle: bound
//!     dark mode: not bound
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.

use crate::dom::{Document, MemoryDocument};
use crate::effect::{Effect, Outcome, ScrollBehavior};
use crate::interactivity::Behavior;
use crate::selector::Subject;
use crate::simulate::{Step, Summary};
use crate::types::ElementId;

// ============================================================================
// Shared display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Short human label for an element.
///
/// ```text
/// section#about
/// button.nav-toggle
/// li(#7)
/// ```
pub fn describe(doc: &MemoryDocument, el: ElementId) -> String {
    if el == doc.body() {
        return "body".to_string();
    }
    let node = doc.node(el);
    if let Some(id) = node.attribute("id").filter(|id| !id.is_empty()) {
        return format!("{}#{}", node.tag(), id);
    }
    if let Some(class) = node
        .attribute("class")
        .and_then(|c| c.split_whitespace().next())
    {
        return format!("{}.{}", node.tag(), class);
    }
    format!("{}({})", node.tag(), el)
}

/// One effect on one line, without indentation.
pub fn format_effect(doc: &MemoryDocument, effect: &Effect) -> String {
    match effect {
        Effect::AddClass { target, class } => format!("{} +{}", describe(doc, *target), class),
        Effect::RemoveClass { target, class } => {
            format!("{} -{}", describe(doc, *target), class)
        }
        Effect::SetAttribute {
            target,
            name,
            value,
        } => format!("{} {}=\"{}\"", describe(doc, *target), name, value),
        Effect::SetText { target, text } => format!("{} text \"{}\"", describe(doc, *target), text),
        Effect::SetDisplay { target, display } => {
            format!("{} display: {}", describe(doc, *target), display.as_css())
        }
        Effect::ScrollIntoView { target, behavior } => {
            let how = match behavior {
                ScrollBehavior::Smooth => "smooth",
            };
            format!("scroll {} into view ({})", describe(doc, *target), how)
        }
        Effect::ResetForm { target } => format!("reset {}", describe(doc, *target)),
        Effect::Persist { key, value } => format!("store {} = \"{}\"", key, value),
        Effect::LogSubmission { fields } => {
            let pairs: Vec<String> = fields.iter().map(|(k, v)| format!("{k}=\"{v}\"")).collect();
            format!("log submission {{{}}}", pairs.join(", "))
        }
        Effect::Alert { message } => format!("alert \"{}\"", message),
    }
}

fn effect_lines(doc: &MemoryDocument, outcome: &Outcome, depth: usize) -> Vec<String> {
    outcome
        .effects
        .iter()
        .map(|e| format!("{}{}", indent(depth), format_effect(doc, e)))
        .collect()
}

// ============================================================================
// Simulate
// ============================================================================

/// Effects applied while binding behaviors.
pub fn format_setup(doc: &MemoryDocument, initial: &Outcome) -> Vec<String> {
    let mut lines = vec!["Setup".to_string()];
    if initial.effects.is_empty() {
        lines.push(format!("{}(no effects)", indent(1)));
    } else {
        lines.extend(effect_lines(doc, initial, 1));
    }
    lines
}

/// One replayed script event: header, effects, then the follow-up scroll.
pub fn format_step(doc: &MemoryDocument, index: usize, step: &Step) -> Vec<String> {
    let mut header = format!("{} {}", format_index(index), step.event);
    if step.outcome.default_prevented {
        header.push_str(" (default prevented)");
    }
    let mut lines = vec![header];
    lines.extend(effect_lines(doc, &step.outcome, 1));
    if let Some(follow_up) = &step.follow_up {
        lines.push(format!("{}then scroll to {}", indent(1), step.scroll_y));
        lines.extend(effect_lines(doc, follow_up, 2));
    }
    lines
}

pub fn format_summary(summary: &Summary) -> Vec<String> {
    let mut lines = vec!["Summary".to_string()];
    let bound: Vec<&str> = summary.bound.iter().map(|b| b.name()).collect();
    lines.push(format!("{}Bound: {}", indent(1), bound.join(", ")));
    lines.push(format!("{}Scroll: {}", indent(1), summary.scroll_y));
    if let Some(open) = summary.menu_open {
        let state = if open { "open" } else { "closed" };
        lines.push(format!("{}Menu: {}", indent(1), state));
    }
    if summary.bound.contains(&Behavior::ActiveSection) {
        let active = if summary.active_sections.is_empty() {
            "(none)".to_string()
        } else {
            summary.active_sections.join(", ")
        };
        lines.push(format!("{}Active section: {}", indent(1), active));
    }
    if summary.bound.contains(&Behavior::Reveal) {
        lines.push(format!(
            "{}Revealed: {} ({} pending)",
            indent(1),
            summary.revealed,
            summary.pending_reveal
        ));
    }
    if let Some(theme) = summary.theme {
        lines.push(format!("{}Theme: {}", indent(1), theme));
    }
    if summary.bound.contains(&Behavior::ProjectFilter) {
        let filter = summary.filter.as_deref().unwrap_or("(none)");
        lines.push(format!("{}Filter: {}", indent(1), filter));
    }
    for alert in &summary.alerts {
        lines.push(format!("{}Alert: {}", indent(1), alert));
    }
    lines
}

/// Full simulate report: setup, every step, then the summary.
pub fn format_simulation(
    doc: &MemoryDocument,
    initial: &Outcome,
    steps: &[Step],
    summary: &Summary,
) -> Vec<String> {
    let mut lines = format_setup(doc, initial);
    lines.push(String::new());
    for (i, step) in steps.iter().enumerate() {
        lines.extend(format_step(doc, i + 1, step));
    }
    if !steps.is_empty() {
        lines.push(String::new());
    }
    lines.extend(format_summary(summary));
    lines
}

pub fn print_simulation(doc: &MemoryDocument, initial: &Outcome, steps: &[Step], summary: &Summary) {
    for line in format_simulation(doc, initial, steps, summary) {
        println!("{}", line);
    }
}

// ============================================================================
// Check
// ============================================================================

/// Every behavior and whether the page binds it.
pub fn format_check(bound: &[Behavior]) -> Vec<String> {
    let mut lines = vec!["Behaviors".to_string()];
    for behavior in Behavior::ALL {
        let state = if bound.contains(&behavior) {
            "bound"
        } else {
            "not bound"
        };
        lines.push(format!("{}{}: {}", indent(1), behavior, state));
    }
    lines.push(String::new());
    lines.push(format!(
        "{} of {} behaviors bound",
        bound.len(),
        Behavior::ALL.len()
    ));
    lines
}

pub fn print_check(bound: &[Behavior]) {
    for line in format_check(bound) {
        println!("{}", line);
    }
}
