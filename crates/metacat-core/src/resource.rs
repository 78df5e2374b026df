//! Indexed-field contract for a searchable resource type.
//!
//! A [`ResourceType`] declares which attributes of a catalogue entity are
//! mirrored into the full-text index, what the index is called, and how
//! index attribute names map back onto the domain representation.

use std::collections::{BTreeMap, BTreeSet};

/// Text fields every index carries, regardless of resource type.
pub const BASE_TEXT_FIELDS: [&str; 3] = ["name", "description_plain", "description_html"];

/// Indexed-field contract for one resource type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceType {
    name: String,
    plural: String,
    index_name: String,
    table: String,
    indexed_fields: BTreeSet<String>,
    key_translations: BTreeMap<String, String>,
}

impl ResourceType {
    /// Create a contract indexing only the base text fields.
    ///
    /// The index name and relational table default to `name`.
    pub fn new(name: impl Into<String>, plural: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            index_name: name.clone(),
            table: name.clone(),
            name,
            plural: plural.into(),
            indexed_fields: BASE_TEXT_FIELDS.iter().map(|f| f.to_string()).collect(),
            key_translations: BTreeMap::new(),
        }
    }

    /// Add extra indexed fields.
    pub fn with_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.indexed_fields.extend(fields.into_iter().map(Into::into));
        self
    }

    /// Replace the indexed fields entirely, dropping the base text fields.
    pub fn with_exact_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.indexed_fields = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Surface index attribute `index_key` as `domain_key` in responses.
    pub fn with_translation(
        mut self,
        index_key: impl Into<String>,
        domain_key: impl Into<String>,
    ) -> Self {
        self.key_translations
            .insert(index_key.into(), domain_key.into());
        self
    }

    /// Override the index name.
    pub fn with_index_name(mut self, index_name: impl Into<String>) -> Self {
        self.index_name = index_name.into();
        self
    }

    /// Override the relational table used for authoritative lookups.
    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = table.into();
        self
    }

    /// Singular resource name, e.g. `dataset`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Plural display name used in endpoint paths, e.g. `datasets`.
    pub fn plural(&self) -> &str {
        &self.plural
    }

    /// Name of the full-text index holding this type's documents.
    pub fn index_name(&self) -> &str {
        &self.index_name
    }

    /// Relational table holding the authoritative records.
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Every field the index was provisioned with for this type.
    ///
    /// These are also the default match fields when a request supplies none.
    pub fn indexed_fields(&self) -> &BTreeSet<String> {
        &self.indexed_fields
    }

    /// Index-name to domain-name translations.
    pub fn key_translations(&self) -> &BTreeMap<String, String> {
        &self.key_translations
    }

    /// Returns `true` if `field` is one of the indexed fields.
    pub fn is_indexed(&self, field: &str) -> bool {
        self.indexed_fields.contains(field)
    }

    /// Indexed fields beyond the base text fields.
    pub fn extra_fields(&self) -> impl Iterator<Item = &str> {
        self.indexed_fields
            .iter()
            .map(String::as_str)
            .filter(|f| !BASE_TEXT_FIELDS.contains(f))
    }
}

/// Returns `true` if `ident` is safe to splice into SQL and index URLs.
pub(crate) fn is_plain_identifier(ident: &str) -> bool {
    !ident.is_empty()
        && ident
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}
