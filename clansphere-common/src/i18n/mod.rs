//! Translation catalogs.
//!
//! A [`Catalog`] is an owned value, installed from a server-exported
//! payload and passed to whatever needs lookups. Lookups never fail:
//! a missing key falls back to the key itself (or to the caller's
//! singular/plural pair), so the UI always has something to render.

use crate::{Error, Result};
use clansphere_api::catalogs::{CatalogPayload, MessageEntry};
use std::collections::HashMap;
use tracing::warn;

pub mod plural;

pub use plural::{PluralError, PluralExpr};

#[derive(Debug, Clone, PartialEq)]
enum Message {
    Singular(String),
    // non-empty, enforced when the payload is installed
    Forms(Vec<String>),
}

#[derive(Debug, Clone)]
pub struct Catalog {
    translations: HashMap<String, Message>,
    plural: PluralExpr,
    locale: String,
}

impl Default for Catalog {
    /// Empty catalog: identity lookups, English-style two-form rule.
    fn default() -> Catalog {
        Catalog {
            translations: HashMap::new(),
            plural: PluralExpr::default(),
            locale: String::from("unknown"),
        }
    }
}

impl Catalog {
    /// Installs a payload as a new catalog.
    ///
    /// A malformed plural expression or an empty plural-form list makes
    /// the whole load fail, rather than producing wrong text at lookup
    /// time.
    pub fn from_payload(payload: CatalogPayload) -> Result<Catalog> {
        let plural = PluralExpr::parse(&payload.plural_expr)?;
        let mut translations = HashMap::with_capacity(payload.messages.len());
        for (key, entry) in payload.messages {
            let message = match entry {
                MessageEntry::Singular(text) => Message::Singular(text),
                MessageEntry::Forms(forms) => {
                    if forms.is_empty() {
                        return Err(Error::EmptyForms(key));
                    }
                    Message::Forms(forms)
                }
            };
            translations.insert(key, message);
        }
        Ok(Catalog {
            translations,
            plural,
            locale: payload.locale,
        })
    }

    /// Replaces this catalog wholesale. On error the previous catalog
    /// stays active.
    pub fn replace(&mut self, payload: CatalogPayload) -> Result<()> {
        *self = Catalog::from_payload(payload)?;
        Ok(())
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    pub fn len(&self) -> usize {
        self.translations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.translations.is_empty()
    }

    /// Returns the translation for `key`, or `key` itself when there is
    /// none.
    pub fn gettext<'a>(&'a self, key: &'a str) -> &'a str {
        match self.translations.get(key) {
            Some(Message::Singular(text)) => text,
            Some(Message::Forms(forms)) => &forms[0],
            None => key,
        }
    }

    /// Returns the plural form of `singular` selected by `n`.
    ///
    /// Without an entry for `singular`, falls back to the argument pair
    /// (`singular` iff `n == 1`). An entry without the selected form
    /// also falls back, with a warning.
    pub fn ngettext<'a>(&'a self, singular: &'a str, plural: &'a str, n: u64) -> &'a str {
        let fallback = || if n == 1 { singular } else { plural };
        match self.translations.get(singular) {
            Some(Message::Forms(forms)) => {
                let index = self.plural.index(n);
                match forms.get(index) {
                    Some(form) => form,
                    None => {
                        warn!(
                            "No plural form {} for '{}' in the {} catalog",
                            index, singular, self.locale
                        );
                        fallback()
                    }
                }
            }
            // a lone string counts as a one-form entry
            Some(Message::Singular(text)) => {
                if self.plural.index(n) == 0 {
                    text
                } else {
                    fallback()
                }
            }
            None => fallback(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload(value: serde_json::Value) -> CatalogPayload {
        serde_json::from_value(value).unwrap()
    }

    fn german() -> CatalogPayload {
        payload(json!({
            "messages": {
                "cat": ["Katze", "Katzen"],
                "Send": "Abschicken"
            },
            "plural_expr": "n != 1",
            "locale": "de"
        }))
    }

    #[test]
    fn unknown_keys_fall_back_to_identity() {
        let catalog = Catalog::default();
        assert_eq!(catalog.gettext("Send"), "Send");
        assert_eq!(catalog.locale(), "unknown");

        let catalog = Catalog::from_payload(german()).unwrap();
        assert_eq!(catalog.gettext("Reply"), "Reply");
    }

    #[test]
    fn default_catalog_uses_two_form_rule() {
        let catalog = Catalog::default();
        for n in 0..10 {
            let expected = if n == 1 { "cat" } else { "cats" };
            assert_eq!(catalog.ngettext("cat", "cats", n), expected);
        }
    }

    #[test]
    fn plural_lookups_use_the_catalog_rule() {
        let catalog = Catalog::from_payload(german()).unwrap();
        assert_eq!(catalog.locale(), "de");
        assert_eq!(catalog.ngettext("cat", "cats", 1), "Katze");
        assert_eq!(catalog.ngettext("cat", "cats", 0), "Katzen");
        assert_eq!(catalog.ngettext("cat", "cats", 5), "Katzen");
        // unknown key, argument pair fallback
        assert_eq!(catalog.ngettext("dog", "dogs", 1), "dog");
        assert_eq!(catalog.ngettext("dog", "dogs", 2), "dogs");
    }

    #[test]
    fn singular_entries_resolve_through_gettext() {
        let catalog = Catalog::from_payload(german()).unwrap();
        assert_eq!(catalog.gettext("Send"), "Abschicken");
        // a plural entry answers gettext with its first form
        assert_eq!(catalog.gettext("cat"), "Katze");
    }

    #[test]
    fn loading_replaces_instead_of_merging() {
        let mut catalog = Catalog::from_payload(german()).unwrap();
        catalog
            .replace(payload(json!({
                "messages": { "Reply": "Répondre" },
                "plural_expr": "n > 1",
                "locale": "fr"
            })))
            .unwrap();

        assert_eq!(catalog.locale(), "fr");
        assert_eq!(catalog.gettext("Reply"), "Répondre");
        // keys from the first load are gone
        assert_eq!(catalog.gettext("Send"), "Send");
        assert_eq!(catalog.ngettext("cat", "cats", 5), "cats");
    }

    #[test]
    fn malformed_plural_expr_keeps_the_previous_catalog() {
        let mut catalog = Catalog::from_payload(german()).unwrap();
        let result = catalog.replace(payload(json!({
            "messages": { "Reply": "Répondre" },
            "plural_expr": "n ==",
            "locale": "fr"
        })));

        assert!(matches!(result, Err(Error::Plural(_))));
        assert_eq!(catalog.locale(), "de");
        assert_eq!(catalog.ngettext("cat", "cats", 1), "Katze");
    }

    #[test]
    fn empty_form_lists_are_rejected() {
        let result = Catalog::from_payload(payload(json!({
            "messages": { "cat": [] },
            "plural_expr": "n != 1",
            "locale": "de"
        })));
        match result {
            Err(Error::EmptyForms(key)) => assert_eq!(key, "cat"),
            other => panic!("expected an EmptyForms error, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn out_of_range_form_falls_back_to_arguments() {
        // three-form rule over a two-form entry
        let catalog = Catalog::from_payload(payload(json!({
            "messages": { "cat": ["kočka", "kočky"] },
            "plural_expr": "(n==1) ? 0 : ((n>=2 && n<=4) ? 1 : 2)",
            "locale": "cs"
        })))
        .unwrap();
        assert_eq!(catalog.ngettext("cat", "cats", 1), "kočka");
        assert_eq!(catalog.ngettext("cat", "cats", 2), "kočky");
        assert_eq!(catalog.ngettext("cat", "cats", 5), "cats");
    }
}
