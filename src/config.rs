//! Behavior configuration module.
//!
//! Handles loading, validating, and merging `config.toml`. Stock defaults
//! reproduce the classic portfolio page wiring; a user config file overrides
//! only the keys it names.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [selectors]
//! nav_toggle = ".nav-toggle"
//! nav_menu = ".nav-menu"
//! internal_anchors = 'a[href^="#"]'
//! year = "#current-year"
//! contact_form = ".contact-form"
//! reveal_targets = "section, .card, .project-card"
//! tracked_sections = "section[id]"
//! theme_toggle = ".dark-mode-toggle"
//! filter_buttons = ".filter-btn"
//! filter_items = ".project-card"
//!
//! [classes]
//! menu_open = "active"
//! link_active = "active"
//! revealed = "animate-fade-in"
//! loaded = "loaded"
//! dark_mode = "dark-mode"
//! filter_active = "active"
//!
//! [reveal]
//! threshold = 0.1           # Visible fraction that triggers a reveal (0-1)
//! bottom_margin = 50.0      # Pixels shaved off the viewport bottom
//!
//! [tracking]
//! look_ahead = 100.0        # Sections count as reached this many px early
//!
//! [tracking.sampling]
//! mode = "every"            # every | min_delta | throttle
//!
//! [theme]
//! enabled = false
//! storage_key = "theme"
//!
//! [filter]
//! enabled = false
//! all_value = "all"
//!
//! [form]
//! acknowledgement = "Thank you for your message! I will get back to you soon."
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::selector::{Selector, SelectorError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
    #[error("Invalid selector for {field}: {source}")]
    Selector {
        field: &'static str,
        #[source]
        source: SelectorError,
    },
}

/// Behavior configuration loaded from `config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UiConfig {
    /// Where each behavior finds its elements.
    pub selectors: SelectorsConfig,
    /// Class names written by behaviors.
    pub classes: ClassesConfig,
    /// Reveal-on-scroll observer options.
    pub reveal: RevealConfig,
    /// Active-section tracking.
    pub tracking: TrackingConfig,
    /// Optional dark-mode toggle.
    pub theme: ThemeConfig,
    /// Optional project category filter.
    pub filter: FilterConfig,
    /// Contact form stub.
    pub form: FormConfig,
}

impl UiConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let threshold = self.reveal.threshold;
        if !(0.0..=1.0).contains(&threshold) {
            return Err(ConfigError::Validation(
                "reveal.threshold must be between 0 and 1".into(),
            ));
        }
        if !self.reveal.bottom_margin.is_finite() || self.reveal.bottom_margin < 0.0 {
            return Err(ConfigError::Validation(
                "reveal.bottom_margin must be a non-negative number".into(),
            ));
        }
        if !self.tracking.look_ahead.is_finite() {
            return Err(ConfigError::Validation(
                "tracking.look_ahead must be a finite number".into(),
            ));
        }
        self.tracking.sampling.validate()?;
        for (field, class) in self.classes.entries() {
            if class.is_empty() || class.chars().any(char::is_whitespace) {
                return Err(ConfigError::Validation(format!(
                    "classes.{field} must be a single non-empty class name"
                )));
            }
        }
        if self.theme.storage_key.is_empty() {
            return Err(ConfigError::Validation(
                "theme.storage_key must not be empty".into(),
            ));
        }
        if self.filter.all_value.is_empty() {
            return Err(ConfigError::Validation(
                "filter.all_value must not be empty".into(),
            ));
        }
        self.selectors.compile()?;
        Ok(())
    }
}

/// Selector strings, one per element role.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SelectorsConfig {
    pub nav_toggle: String,
    pub nav_menu: String,
    pub internal_anchors: String,
    pub year: String,
    pub contact_form: String,
    pub reveal_targets: String,
    pub tracked_sections: String,
    pub theme_toggle: String,
    pub filter_buttons: String,
    pub filter_items: String,
}

impl Default for SelectorsConfig {
    fn default() -> Self {
        Self {
            nav_toggle: ".nav-toggle".to_string(),
            nav_menu: ".nav-menu".to_string(),
            internal_anchors: r##"a[href^="#"]"##.to_string(),
            year: "#current-year".to_string(),
            contact_form: ".contact-form".to_string(),
            reveal_targets: "section, .card, .project-card".to_string(),
            tracked_sections: "section[id]".to_string(),
            theme_toggle: ".dark-mode-toggle".to_string(),
            filter_buttons: ".filter-btn".to_string(),
            filter_items: ".project-card".to_string(),
        }
    }
}

/// Parsed form of [`SelectorsConfig`].
#[derive(Debug, Clone)]
pub struct Selectors {
    pub nav_toggle: Selector,
    pub nav_menu: Selector,
    pub internal_anchors: Selector,
    pub year: Selector,
    pub contact_form: Selector,
    pub reveal_targets: Selector,
    pub tracked_sections: Selector,
    pub theme_toggle: Selector,
    pub filter_buttons: Selector,
    pub filter_items: Selector,
}

impl SelectorsConfig {
    pub fn compile(&self) -> Result<Selectors, ConfigError> {
        let parse = |field: &'static str, text: &str| {
            Selector::parse(text).map_err(|source| ConfigError::Selector { field, source })
        };
        Ok(Selectors {
            nav_toggle: parse("selectors.nav_toggle", &self.nav_toggle)?,
            nav_menu: parse("selectors.nav_menu", &self.nav_menu)?,
            internal_anchors: parse("selectors.internal_anchors", &self.internal_anchors)?,
            year: parse("selectors.year", &self.year)?,
            contact_form: parse("selectors.contact_form", &self.contact_form)?,
            reveal_targets: parse("selectors.reveal_targets", &self.reveal_targets)?,
            tracked_sections: parse("selectors.tracked_sections", &self.tracked_sections)?,
            theme_toggle: parse("selectors.theme_toggle", &self.theme_toggle)?,
            filter_buttons: parse("selectors.filter_buttons", &self.filter_buttons)?,
            filter_items: parse("selectors.filter_items", &self.filter_items)?,
        })
    }
}

/// Class names toggled by behaviors.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClassesConfig {
    /// On the nav menu while it is open.
    pub menu_open: String,
    /// On the nav link of the section in view.
    pub link_active: String,
    /// On elements that have scrolled into view.
    pub revealed: String,
    /// On `<body>` once the page has fully loaded.
    pub loaded: String,
    /// On `<body>` in dark mode.
    pub dark_mode: String,
    /// On the selected filter button.
    pub filter_active: String,
}

impl Default for ClassesConfig {
    fn default() -> Self {
        Self {
            menu_open: "active".to_string(),
            link_active: "active".to_string(),
            revealed: "animate-fade-in".to_string(),
            loaded: "loaded".to_string(),
            dark_mode: "dark-mode".to_string(),
            filter_active: "active".to_string(),
        }
    }
}

impl ClassesConfig {
    fn entries(&self) -> [(&'static str, &str); 6] {
        [
            ("menu_open", self.menu_open.as_str()),
            ("link_active", self.link_active.as_str()),
            ("revealed", self.revealed.as_str()),
            ("loaded", self.loaded.as_str()),
            ("dark_mode", self.dark_mode.as_str()),
            ("filter_active", self.filter_active.as_str()),
        ]
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RevealConfig {
    /// Fraction of an element that must be visible before it is revealed.
    pub threshold: f64,
    /// Pixels removed from the bottom of the viewport when testing visibility.
    pub bottom_margin: f64,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            threshold: 0.1,
            bottom_margin: 50.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TrackingConfig {
    /// A section counts as reached this many pixels before its top.
    pub look_ahead: f64,
    pub sampling: ScrollSampling,
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            look_ahead: 100.0,
            sampling: ScrollSampling::Every {},
        }
    }
}

/// Which scroll notifications the section tracker evaluates.
///
/// `Every` carries braces so that stray keys next to `mode = "every"` are
/// rejected like any other unknown field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case", deny_unknown_fields)]
pub enum ScrollSampling {
    /// Every notification, at the native event rate.
    Every {},
    /// Only after the position moved at least `pixels` since the last evaluation.
    MinDelta { pixels: f64 },
    /// At most one evaluation per `interval_ms` of event time.
    Throttle { interval_ms: u64 },
}

impl Default for ScrollSampling {
    fn default() -> Self {
        ScrollSampling::Every {}
    }
}

impl ScrollSampling {
    fn validate(&self) -> Result<(), ConfigError> {
        match *self {
            ScrollSampling::Every {} => Ok(()),
            ScrollSampling::MinDelta { pixels } if pixels.is_finite() && pixels > 0.0 => Ok(()),
            ScrollSampling::MinDelta { .. } => Err(ConfigError::Validation(
                "tracking.sampling.pixels must be a positive number".into(),
            )),
            ScrollSampling::Throttle { interval_ms } if interval_ms > 0 => Ok(()),
            ScrollSampling::Throttle { .. } => Err(ConfigError::Validation(
                "tracking.sampling.interval_ms must be positive".into(),
            )),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThemeConfig {
    /// Wire up the dark-mode toggle.
    pub enabled: bool,
    /// Store key holding the user's explicit choice.
    pub storage_key: String,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            storage_key: "theme".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FilterConfig {
    /// Wire up the project filter buttons.
    pub enabled: bool,
    /// `data-filter` value that shows every item.
    pub all_value: String,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            all_value: "all".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FormConfig {
    /// Dialog text shown after a submission.
    pub acknowledgement: String,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            acknowledgement: "Thank you for your message! I will get back to you soon."
                .to_string(),
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the canonical representation of all default values, used as the
/// base layer for merging user overrides on top.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(UiConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// Tables merge key-by-key; any other overlay value replaces the base value.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load a `config.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if no `config.toml` exists in the directory.
pub fn load_raw_config(dir: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = dir.join("config.toml");
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<UiConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: UiConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `config.toml` in the given directory, on top of the
/// stock defaults.
pub fn load_config(dir: &Path) -> Result<UiConfig, ConfigError> {
    let base = stock_defaults_value();
    let overlay = load_raw_config(dir)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# folio-ui Configuration
# =======================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys cause an error.

# ---------------------------------------------------------------------------
# Element selectors
# ---------------------------------------------------------------------------
# Supported syntax: type, .class, #id, [attr], [attr="v"], [attr^="v"],
# compounds of those, and comma-separated lists.
[selectors]
nav_toggle = ".nav-toggle"
nav_menu = ".nav-menu"
internal_anchors = 'a[href^="#"]'
year = "#current-year"
contact_form = ".contact-form"
reveal_targets = "section, .card, .project-card"
tracked_sections = "section[id]"
theme_toggle = ".dark-mode-toggle"
filter_buttons = ".filter-btn"
filter_items = ".project-card"

# ---------------------------------------------------------------------------
# Class names written by behaviors
# ---------------------------------------------------------------------------
[classes]
menu_open = "active"          # Nav menu while open
link_active = "active"        # Nav link of the section in view
revealed = "animate-fade-in"  # Elements that scrolled into view
loaded = "loaded"             # <body> after full page load
dark_mode = "dark-mode"       # <body> in dark mode
filter_active = "active"      # Selected filter button

# ---------------------------------------------------------------------------
# Reveal on scroll
# ---------------------------------------------------------------------------
[reveal]
# Fraction of an element (0-1) that must be visible to reveal it.
threshold = 0.1
# Pixels shaved off the bottom of the viewport, so elements reveal slightly
# before they are fully on screen.
bottom_margin = 50.0

# ---------------------------------------------------------------------------
# Active section tracking
# ---------------------------------------------------------------------------
[tracking]
# A section counts as reached this many pixels before its top edge.
look_ahead = 100.0

# Which scroll notifications are evaluated:
#   mode = "every"                            every notification
#   mode = "min_delta", pixels = 10.0         after moving at least N px
#   mode = "throttle", interval_ms = 100      at most once per interval
[tracking.sampling]
mode = "every"

# ---------------------------------------------------------------------------
# Dark mode toggle (optional)
# ---------------------------------------------------------------------------
[theme]
enabled = false
# Store key for the user's explicit choice ("light" or "dark").
storage_key = "theme"

# ---------------------------------------------------------------------------
# Project filter (optional)
# ---------------------------------------------------------------------------
[filter]
enabled = false
# data-filter value that shows every project.
all_value = "all"

# ---------------------------------------------------------------------------
# Contact form
# ---------------------------------------------------------------------------
[form]
acknowledgement = "Thank you for your message! I will get back to you soon."
"##
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_matches_classic_page() {
        let config = UiConfig::default();
        assert_eq!(config.reveal.threshold, 0.1);
        assert_eq!(config.reveal.bottom_margin, 50.0);
        assert_eq!(config.tracking.look_ahead, 100.0);
        assert_eq!(config.tracking.sampling, ScrollSampling::Every {});
        assert_eq!(config.classes.revealed, "animate-fade-in");
        assert!(!config.theme.enabled);
        assert!(!config.filter.enabled);
    }

    #[test]
    fn validate_default_config_passes() {
        assert!(UiConfig::default().validate().is_ok());
    }

    #[test]
    fn parse_partial_config() {
        let toml = r#"
[reveal]
threshold = 0.25
"#;
        let overlay: toml::Value = toml::from_str(toml).unwrap();
        let config = resolve_config(stock_defaults_value(), Some(overlay)).unwrap();
        assert_eq!(config.reveal.threshold, 0.25);
        // Unspecified values keep defaults
        assert_eq!(config.reveal.bottom_margin, 50.0);
        assert_eq!(config.selectors.nav_toggle, ".nav-toggle");
    }

    #[test]
    fn parse_sampling_modes() {
        let toml = r#"
[tracking.sampling]
mode = "min_delta"
pixels = 12.5
"#;
        let overlay: toml::Value = toml::from_str(toml).unwrap();
        let config = resolve_config(stock_defaults_value(), Some(overlay)).unwrap();
        assert_eq!(
            config.tracking.sampling,
            ScrollSampling::MinDelta { pixels: 12.5 }
        );

        let toml = r#"
[tracking.sampling]
mode = "throttle"
interval_ms = 100
"#;
        let overlay: toml::Value = toml::from_str(toml).unwrap();
        let config = resolve_config(stock_defaults_value(), Some(overlay)).unwrap();
        assert_eq!(
            config.tracking.sampling,
            ScrollSampling::Throttle { interval_ms: 100 }
        );
    }

    #[test]
    fn stray_sampling_key_is_rejected() {
        let toml = r#"
[tracking.sampling]
mode = "min_delta"
pixels = 5.0
interval_ms = 100
"#;
        let overlay: toml::Value = toml::from_str(toml).unwrap();
        let err = resolve_config(stock_defaults_value(), Some(overlay)).unwrap_err();
        assert!(err.to_string().contains("interval_ms"), "{err}");
    }

    #[test]
    fn misspelled_key_under_every_is_rejected() {
        let toml = r#"
[tracking.sampling]
mode = "every"
pixles = 5.0
"#;
        let overlay: toml::Value = toml::from_str(toml).unwrap();
        let err = resolve_config(stock_defaults_value(), Some(overlay)).unwrap_err();
        assert!(err.to_string().contains("pixles"), "{err}");
    }

    #[test]
    fn merge_toml_scalar_override() {
        let base: toml::Value = toml::from_str("a = 1\nb = 2").unwrap();
        let overlay: toml::Value = toml::from_str("b = 3").unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged["a"].as_integer(), Some(1));
        assert_eq!(merged["b"].as_integer(), Some(3));
    }

    #[test]
    fn merge_toml_nested_tables() {
        let base: toml::Value = toml::from_str("[t]\nx = 1\ny = 2").unwrap();
        let overlay: toml::Value = toml::from_str("[t]\ny = 5\nz = 6").unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged["t"]["x"].as_integer(), Some(1));
        assert_eq!(merged["t"]["y"].as_integer(), Some(5));
        assert_eq!(merged["t"]["z"].as_integer(), Some(6));
    }

    #[test]
    fn load_config_returns_default_when_no_file() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.theme.storage_key, "theme");
    }

    #[test]
    fn load_config_reads_file() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("config.toml"),
            "[theme]\nenabled = true\nstorage_key = \"site-theme\"\n",
        )
        .unwrap();
        let config = load_config(tmp.path()).unwrap();
        assert!(config.theme.enabled);
        assert_eq!(config.theme.storage_key, "site-theme");
    }

    #[test]
    fn load_config_invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("config.toml"), "this is not toml [").unwrap();
        assert!(matches!(load_config(tmp.path()), Err(ConfigError::Toml(_))));
    }

    #[test]
    fn unknown_key_rejected() {
        let overlay: toml::Value = toml::from_str("[reveal]\nthreshhold = 0.2").unwrap();
        assert!(resolve_config(stock_defaults_value(), Some(overlay)).is_err());
    }

    #[test]
    fn unknown_section_rejected() {
        let overlay: toml::Value = toml::from_str("[analytics]\nid = 1").unwrap();
        assert!(resolve_config(stock_defaults_value(), Some(overlay)).is_err());
    }

    #[test]
    fn validate_threshold_out_of_range() {
        let mut config = UiConfig::default();
        config.reveal.threshold = 1.5;
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
        config.reveal.threshold = 1.0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validate_negative_margin() {
        let mut config = UiConfig::default();
        config.reveal.bottom_margin = -1.0;
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn validate_class_with_whitespace() {
        let mut config = UiConfig::default();
        config.classes.revealed = "fade in".into();
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn validate_bad_selector_names_field() {
        let mut config = UiConfig::default();
        config.selectors.nav_menu = "nav ul".into();
        match config.validate() {
            Err(ConfigError::Selector { field, .. }) => assert_eq!(field, "selectors.nav_menu"),
            other => panic!("expected selector error, got {other:?}"),
        }
    }

    #[test]
    fn validate_zero_sampling_interval() {
        let mut config = UiConfig::default();
        config.tracking.sampling = ScrollSampling::Throttle { interval_ms: 0 };
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn stock_config_toml_roundtrips_to_defaults() {
        let parsed: UiConfig = toml::from_str(stock_config_toml()).unwrap();
        let defaults = UiConfig::default();
        assert_eq!(parsed.selectors.internal_anchors, defaults.selectors.internal_anchors);
        assert_eq!(parsed.selectors.reveal_targets, defaults.selectors.reveal_targets);
        assert_eq!(parsed.classes.revealed, defaults.classes.revealed);
        assert_eq!(parsed.reveal.threshold, defaults.reveal.threshold);
        assert_eq!(parsed.tracking.sampling, defaults.tracking.sampling);
        assert_eq!(parsed.form.acknowledgement, defaults.form.acknowledgement);
    }

    #[test]
    fn stock_defaults_value_has_all_sections() {
        let value = stock_defaults_value();
        let table = value.as_table().unwrap();
        for key in [
            "selectors", "classes", "reveal", "tracking", "theme", "filter", "form",
        ] {
            assert!(table.contains_key(key), "missing section {key}");
        }
    }
}
