// Federated search filter translation
// Copyright 2025 MinIO, Inc.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Per-attribute capability registry.
//!
//! A source is onboarded by describing, for every canonical attribute it can
//! search, the field name its query language uses and which operators it
//! accepts on that field. Tables are built once and never mutated, so a single
//! table can be shared by any number of concurrent translations.
//!
//! # Example
//!
//! ```
//! use fedsearch::capability::{AttributeCapability, AttributeCapabilityTable};
//!
//! let table = AttributeCapabilityTable::builder()
//!     .entry("title", AttributeCapability::new("title").equal().like().wildcard())
//!     .entry("creator", AttributeCapability::new("creator").equal().like_as_equal())
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(table.get("title").map(|c| c.target_name.as_str()), Some("title"));
//! assert!(table.get("unknown").is_none());
//! ```

use crate::error::TranslationError;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Canonical identifier of the free-text attribute.
pub const ANY_TEXT: &str = "any-text";
/// Canonical identifier of the title attribute.
pub const TITLE: &str = "title";
/// Canonical identifier of the creation date attribute.
pub const CREATED: &str = "created";
/// Canonical identifier of the modification date attribute.
pub const MODIFIED: &str = "modified";
/// Canonical identifier of the creator attribute.
pub const CREATOR: &str = "creator";
/// Canonical identifier of the contributor attribute.
pub const CONTRIBUTOR: &str = "contributor";
/// Canonical identifier of the record id attribute.
pub const ID: &str = "id";
/// Canonical identifier of the content type attribute.
pub const DATATYPE: &str = "datatype";
/// Canonical identifier of the label/keyword attribute.
pub const LABEL: &str = "label";
/// Canonical identifier of the tag attribute used for routing.
pub const TAGS: &str = "tags";

/// What a target query language can do with one attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeCapability {
    /// Field name in the destination query language
    pub target_name: String,
    #[serde(default)]
    pub equal_allowed: bool,
    #[serde(default)]
    pub like_allowed: bool,
    #[serde(default)]
    pub range_allowed: bool,
    #[serde(default)]
    pub wildcard_allowed: bool,
    /// Rewrite a fuzzy match as an exact match instead of dropping it
    #[serde(default)]
    pub like_degrades_to_equal: bool,
}

impl AttributeCapability {
    /// Starts a descriptor for `target_name` with every operator disallowed.
    pub fn new(target_name: impl Into<String>) -> Self {
        AttributeCapability {
            target_name: target_name.into(),
            equal_allowed: false,
            like_allowed: false,
            range_allowed: false,
            wildcard_allowed: false,
            like_degrades_to_equal: false,
        }
    }

    pub fn equal(mut self) -> Self {
        self.equal_allowed = true;
        self
    }

    pub fn like(mut self) -> Self {
        self.like_allowed = true;
        self
    }

    pub fn range(mut self) -> Self {
        self.range_allowed = true;
        self
    }

    pub fn wildcard(mut self) -> Self {
        self.wildcard_allowed = true;
        self
    }

    /// Fuzzy matches on this attribute fall back to exact matches.
    pub fn like_as_equal(mut self) -> Self {
        self.like_degrades_to_equal = true;
        self
    }
}

/// Immutable map from canonical attribute identifier to capability.
///
/// Lookups of unknown attributes return `None`; that is "unsupported", not an
/// error. Entries are kept ordered so iteration is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AttributeCapabilityTable {
    entries: BTreeMap<String, AttributeCapability>,
}

impl AttributeCapabilityTable {
    /// Starts building a table.
    pub fn builder() -> CapabilityTableBuilder {
        CapabilityTableBuilder::default()
    }

    /// Loads a table from its JSON configuration form:
    /// `{"<attribute-id>": {"target_name": "...", "equal_allowed": true, ...}}`.
    ///
    /// # Errors
    ///
    /// Returns [`TranslationError::Json`] when the document does not parse and
    /// [`TranslationError::InvalidCapability`] when an entry is unusable.
    pub fn from_json(json: &str) -> Result<Self, TranslationError> {
        let entries: BTreeMap<String, AttributeCapability> = serde_json::from_str(json)?;
        let table = AttributeCapabilityTable { entries };
        table.validate()?;
        log::debug!("Loaded capability table with {} attributes", table.len());
        Ok(table)
    }

    /// Looks up the capability of a canonical attribute.
    pub fn get(&self, attribute: &str) -> Option<&AttributeCapability> {
        self.entries.get(attribute)
    }

    pub fn contains(&self, attribute: &str) -> bool {
        self.entries.contains_key(attribute)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates entries in attribute order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttributeCapability)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    fn validate(&self) -> Result<(), TranslationError> {
        self.entries
            .iter()
            .try_for_each(|(attribute, capability)| check_entry(attribute, capability))
    }
}

/// Collects entries for an [`AttributeCapabilityTable`].
#[derive(Debug, Default)]
pub struct CapabilityTableBuilder {
    entries: BTreeMap<String, AttributeCapability>,
}

impl CapabilityTableBuilder {
    /// Adds or replaces the capability of `attribute`.
    pub fn entry(mut self, attribute: impl Into<String>, capability: AttributeCapability) -> Self {
        self.entries.insert(attribute.into(), capability);
        self
    }

    /// Validates the entries and freezes the table.
    ///
    /// # Errors
    ///
    /// Returns [`TranslationError::InvalidCapability`] for an empty attribute
    /// identifier or a target name the query language cannot express.
    pub fn build(self) -> Result<AttributeCapabilityTable, TranslationError> {
        let table = AttributeCapabilityTable {
            entries: self.entries,
        };
        table.validate()?;
        Ok(table)
    }
}

/// Returns `true` when `name` can appear bare in a query: a letter or `_`,
/// then letters, digits, `_`, `.` or `-`.
pub fn is_identifier(name: &str) -> bool {
    lazy_static! {
        static ref IDENTIFIER_REGEX: Regex = Regex::new(r"^[A-Za-z_][A-Za-z0-9_.\-]*$").unwrap();
    }

    IDENTIFIER_REGEX.is_match(name)
}

fn check_entry(attribute: &str, capability: &AttributeCapability) -> Result<(), TranslationError> {
    if attribute.trim().is_empty() {
        return Err(TranslationError::InvalidCapability {
            attribute: attribute.to_string(),
            reason: "attribute identifier cannot be empty".to_string(),
        });
    }
    if !is_identifier(&capability.target_name) {
        return Err(TranslationError::InvalidCapability {
            attribute: attribute.to_string(),
            reason: format!("invalid target name '{}'", capability.target_name),
        });
    }
    Ok(())
}

lazy_static! {
    static ref DEFAULT_TABLE: Arc<AttributeCapabilityTable> = Arc::new(AttributeCapabilityTable {
        entries: default_entries(),
    });
}

/// Built-in table for CQL-style endpoints (`text ~ "x"`, `created > "..."`).
///
/// Built on first use; every caller shares the same instance.
pub fn default_table() -> Arc<AttributeCapabilityTable> {
    Arc::clone(&DEFAULT_TABLE)
}

fn default_entries() -> BTreeMap<String, AttributeCapability> {
    [
        (ANY_TEXT, AttributeCapability::new("text").like().wildcard()),
        (
            TITLE,
            AttributeCapability::new("title").equal().like().wildcard(),
        ),
        (CREATED, AttributeCapability::new("created").equal().range()),
        (
            MODIFIED,
            AttributeCapability::new("lastmodified").equal().range(),
        ),
        (
            CREATOR,
            AttributeCapability::new("creator").equal().like_as_equal(),
        ),
        (
            CONTRIBUTOR,
            AttributeCapability::new("contributor")
                .equal()
                .like_as_equal(),
        ),
        (ID, AttributeCapability::new("id").equal()),
        (
            DATATYPE,
            AttributeCapability::new("type").equal().like_as_equal(),
        ),
        (
            LABEL,
            AttributeCapability::new("label").equal().like_as_equal(),
        ),
    ]
    .into_iter()
    .map(|(attribute, capability)| (attribute.to_string(), capability))
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table_is_valid() {
        let table = default_table();
        assert!(table.validate().is_ok());
        assert_eq!(table.get(ANY_TEXT).unwrap().target_name, "text");
        assert_eq!(table.get(MODIFIED).unwrap().target_name, "lastmodified");
        assert!(table.get(TAGS).is_none());
    }

    #[test]
    fn test_default_table_is_shared() {
        assert!(Arc::ptr_eq(&default_table(), &default_table()));
    }

    #[test]
    fn test_builder_sets_flags() {
        let capability = AttributeCapability::new("creator").equal().like_as_equal();
        assert!(capability.equal_allowed);
        assert!(!capability.like_allowed);
        assert!(!capability.range_allowed);
        assert!(!capability.wildcard_allowed);
        assert!(capability.like_degrades_to_equal);
    }

    #[test]
    fn test_unknown_attribute_is_unsupported() {
        let table = AttributeCapabilityTable::builder()
            .entry("title", AttributeCapability::new("title").equal())
            .build()
            .unwrap();
        assert!(table.get("abstract").is_none());
        assert!(!table.contains("abstract"));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_from_json() {
        let table = AttributeCapabilityTable::from_json(
            r#"{
                "title": {"target_name": "title", "equal_allowed": true, "like_allowed": true},
                "created": {"target_name": "created", "range_allowed": true}
            }"#,
        )
        .unwrap();

        let title = table.get("title").unwrap();
        assert!(title.equal_allowed && title.like_allowed);
        assert!(!title.wildcard_allowed);

        let created = table.get("created").unwrap();
        assert!(created.range_allowed);
        assert!(!created.equal_allowed);
    }

    #[test]
    fn test_from_json_rejects_bad_target_name() {
        let err = AttributeCapabilityTable::from_json(
            r#"{"title": {"target_name": "ti tle", "equal_allowed": true}}"#,
        )
        .unwrap_err();
        assert!(matches!(err, TranslationError::InvalidCapability { .. }));
    }

    #[test]
    fn test_from_json_requires_target_name() {
        let err = AttributeCapabilityTable::from_json(r#"{"title": {"equal_allowed": true}}"#)
            .unwrap_err();
        assert!(matches!(err, TranslationError::Json(_)));
    }

    #[test]
    fn test_is_identifier() {
        assert!(is_identifier("scope"));
        assert!(is_identifier("cql.anywhere"));
        assert!(is_identifier("_x-1"));
        assert!(!is_identifier(""));
        assert!(!is_identifier("1abc"));
        assert!(!is_identifier("alpha OR title"));
        assert!(!is_identifier("a\"b"));
    }

    #[test]
    fn test_builder_rejects_empty_attribute() {
        let err = AttributeCapabilityTable::builder()
            .entry("", AttributeCapability::new("title"))
            .build()
            .unwrap_err();
        assert!(matches!(err, TranslationError::InvalidCapability { .. }));
    }

    #[test]
    fn test_iteration_is_ordered() {
        let table = default_table();
        let keys: Vec<&str> = table.iter().map(|(k, _)| k).collect();
        let mut sorted = keys.clone();
        sorted.sort();
        assert_eq!(keys, sorted);
    }
}
