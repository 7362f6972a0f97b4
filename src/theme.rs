//! Optional dark-mode toggle.
//!
//! The initial theme comes from, in order:
//!
//! 1. the user's stored choice (`"dark"` means dark, any other non-empty
//!    value means light);
//! 2. the system `prefers-color-scheme: dark` preference;
//! 3. light.
//!
//! Dark mode is a class on `<body>`. Clicking the toggle flips it and stores
//! the new theme, which from then on overrides the system preference.

use crate::dom::Document;
use crate::effect::Effect;
use crate::selector::Selector;
use crate::types::ElementId;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn is_dark(self) -> bool {
        self == Theme::Dark
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(format!("unknown theme '{other}'")),
        }
    }
}

/// Resolve the starting theme from the stored value and system preference.
pub fn resolve_initial(stored: Option<&str>, system_prefers_dark: bool) -> Theme {
    match stored {
        Some("dark") => Theme::Dark,
        Some(s) if !s.is_empty() => Theme::Light,
        _ if system_prefers_dark => Theme::Dark,
        _ => Theme::Light,
    }
}

#[derive(Debug, Clone)]
pub struct ThemeToggle {
    toggle: ElementId,
    body: ElementId,
    dark_class: String,
    storage_key: String,
}

impl ThemeToggle {
    /// Returns `None` when the page has no toggle control.
    pub fn bind<D: Document + ?Sized>(
        doc: &D,
        toggle: &Selector,
        dark_class: &str,
        storage_key: &str,
    ) -> Option<Self> {
        Some(Self {
            toggle: doc.query(toggle)?,
            body: doc.body(),
            dark_class: dark_class.to_string(),
            storage_key: storage_key.to_string(),
        })
    }

    pub fn toggle_control(&self) -> ElementId {
        self.toggle
    }

    pub fn storage_key(&self) -> &str {
        &self.storage_key
    }

    /// Effects that make the page show `theme`.
    pub fn apply(&self, theme: Theme) -> Vec<Effect> {
        vec![Effect::set_class(self.body, &self.dark_class, theme.is_dark())]
    }

    pub fn on_click(&self, current: Theme) -> (Theme, Vec<Effect>) {
        let next = current.toggled();
        let mut effects = self.apply(next);
        effects.push(Effect::Persist {
            key: self.storage_key.clone(),
            value: next.as_str().to_string(),
        });
        (next, effects)
    }
}
