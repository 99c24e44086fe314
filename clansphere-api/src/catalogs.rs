use std::collections::HashMap;

/// Translation catalog as exported by the server-side i18n layer.
///
/// `plural_expr` is a boolean/arithmetic expression over a single free
/// variable `n` (the count), in the usual gettext plural-forms syntax.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CatalogPayload {
    pub messages: HashMap<String, MessageEntry>,
    pub plural_expr: String,
    pub locale: String,
}

/// Either a single translated string, or the ordered list of plural forms
/// the plural expression indexes into.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageEntry {
    Singular(String),
    Forms(Vec<String>),
}
