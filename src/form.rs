//! Contact form stub.
//!
//! Submitting the contact form never leaves the page: the submission is
//! suppressed, the named fields are collected into a map and logged, the
//! visitor gets an acknowledgement dialog, and the form is reset. No data is
//! sent anywhere.

use crate::dom::Document;
use crate::effect::{Effect, Outcome};
use crate::selector::Selector;
use crate::types::ElementId;
use std::collections::BTreeMap;

/// Collapse form fields into a map. A repeated name keeps its last value.
pub fn collect_fields<I>(fields: I) -> BTreeMap<String, String>
where
    I: IntoIterator<Item = (String, String)>,
{
    fields.into_iter().collect()
}

#[derive(Debug, Clone)]
pub struct ContactForm {
    form: ElementId,
    acknowledgement: String,
}

impl ContactForm {
    /// Returns `None` when the page has no contact form.
    pub fn bind<D: Document + ?Sized>(
        doc: &D,
        form: &Selector,
        acknowledgement: &str,
    ) -> Option<Self> {
        Some(Self {
            form: doc.query(form)?,
            acknowledgement: acknowledgement.to_string(),
        })
    }

    pub fn form(&self) -> ElementId {
        self.form
    }

    pub fn on_submit<D: Document + ?Sized>(&self, doc: &D) -> Outcome {
        let fields = collect_fields(doc.form_fields(self.form));
        Outcome {
            default_prevented: true,
            effects: vec![
                Effect::LogSubmission { fields },
                Effect::Alert {
                    message: self.acknowledgement.clone(),
                },
                Effect::ResetForm { target: self.form },
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{ElementSpec, MemoryDocument, PageSpec};
    use crate::effect::apply;
    use crate::store::MemoryStore;

    fn page() -> MemoryDocument {
        MemoryDocument::from_spec(&PageSpec {
            elements: vec![
                ElementSpec::new("form")
                    .with_class("contact-form")
                    .with_child(ElementSpec::new("input").with_id("name").with_attr("name", "name"))
                    .with_child(
                        ElementSpec::new("input")
                            .with_id("email")
                            .with_attr("name", "email")
                            .with_attr("type", "email"),
                    )
                    .with_child(ElementSpec::new("button").with_attr("type", "submit")),
            ],
            ..PageSpec::default()
        })
    }

    fn bind(doc: &MemoryDocument) -> ContactForm {
        ContactForm::bind(doc, &Selector::parse(".contact-form").unwrap(), "Thanks!").unwrap()
    }

    #[test]
    fn submit_logs_fields_alerts_and_resets() {
        let mut doc = page();
        let form = bind(&doc);
        let name = doc.element_by_id("name").unwrap();
        let email = doc.element_by_id("email").unwrap();
        doc.set_value(name, "A");
        doc.set_value(email, "b@x.com");

        let outcome = form.on_submit(&doc);
        assert!(outcome.default_prevented);
        let expected: BTreeMap<String, String> = [
            ("name".to_string(), "A".to_string()),
            ("email".to_string(), "b@x.com".to_string()),
        ]
        .into_iter()
        .collect();
        assert_eq!(
            outcome.effects[0],
            Effect::LogSubmission { fields: expected }
        );

        apply(&mut doc, &mut MemoryStore::new(), &outcome.effects);
        assert_eq!(doc.alerts(), ["Thanks!".to_string()]);
        assert_eq!(doc.value(name), "");
        assert_eq!(doc.value(email), "");
    }

    #[test]
    fn repeated_names_keep_last_value() {
        let fields = collect_fields(vec![
            ("tag".to_string(), "a".to_string()),
            ("tag".to_string(), "b".to_string()),
        ]);
        assert_eq!(fields.get("tag").map(String::as_str), Some("b"));
        assert_eq!(fields.len(), 1);
    }

    #[test]
    fn empty_form_still_acknowledges() {
        let doc = MemoryDocument::from_spec(&PageSpec {
            elements: vec![ElementSpec::new("form").with_class("contact-form")],
            ..PageSpec::default()
        });
        let outcome = bind(&doc).on_submit(&doc);
        assert_eq!(
            outcome.effects[0],
            Effect::LogSubmission {
                fields: BTreeMap::new()
            }
        );
        assert!(matches!(outcome.effects[1], Effect::Alert { .. }));
    }

    #[test]
    fn missing_form_does_not_bind() {
        let doc = MemoryDocument::from_spec(&PageSpec::default());
        assert!(ContactForm::bind(&doc, &Selector::parse(".contact-form").unwrap(), "x").is_none());
    }
}
