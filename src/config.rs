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

//! Per-source configuration bundle.

use crate::capability::{ANY_TEXT, TAGS, is_identifier};
use crate::error::TranslationError;
use crate::translator::{DEFAULT_EMPTY_NEGATION, EmptyNegation};
use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

/// Tag carried by records any federated source may answer for.
pub const DEFAULT_CROSS_SOURCE_TAG: &str = "resource";
/// Literal meaning "match anything".
pub const DEFAULT_WILDCARD: char = '*';
/// Field name of the fixed scope predicate.
pub const DEFAULT_SCOPE_FIELD: &str = "scope";

/// Settings for one federated source.
///
/// ```
/// use fedsearch::config::SourceConfig;
///
/// let config = SourceConfig::builder()
///     .source_id("wiki")
///     .default_tag("wiki")
///     .fixed_scope("ENG")
///     .build();
/// assert_eq!(config.routing_attribute, "tags");
/// assert_eq!(config.fixed_scope.as_deref(), Some("ENG"));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, TypedBuilder)]
pub struct SourceConfig {
    /// Name of the source, used in logs
    #[builder(setter(into))]
    pub source_id: String,
    /// The tag this source answers for
    #[builder(setter(into))]
    pub default_tag: String,
    /// Tag meaning "any source"
    #[builder(default = DEFAULT_CROSS_SOURCE_TAG.to_string(), setter(into))]
    #[serde(default = "default_cross_source_tag")]
    pub cross_source_tag: String,
    /// Attribute whose literals decide whether this source is asked at all
    #[builder(default = TAGS.to_string(), setter(into))]
    #[serde(default = "default_routing_attribute")]
    pub routing_attribute: String,
    /// Free-text attribute on which a bare wildcard means "fetch everything"
    #[builder(default = ANY_TEXT.to_string(), setter(into))]
    #[serde(default = "default_catch_all_attribute")]
    pub catch_all_attribute: String,
    #[builder(default = DEFAULT_WILDCARD)]
    #[serde(default = "default_wildcard")]
    pub wildcard: char,
    /// Collection every query of this source is confined to
    #[builder(default, setter(strip_option, into))]
    #[serde(default)]
    pub fixed_scope: Option<String>,
    #[builder(default = DEFAULT_SCOPE_FIELD.to_string(), setter(into))]
    #[serde(default = "default_scope_field")]
    pub scope_field: String,
    /// What `NOT` of an untranslatable child means
    #[builder(default = DEFAULT_EMPTY_NEGATION)]
    #[serde(default = "default_empty_negation")]
    pub empty_negation: EmptyNegation,
}

fn default_cross_source_tag() -> String {
    DEFAULT_CROSS_SOURCE_TAG.to_string()
}

fn default_routing_attribute() -> String {
    TAGS.to_string()
}

fn default_catch_all_attribute() -> String {
    ANY_TEXT.to_string()
}

fn default_wildcard() -> char {
    DEFAULT_WILDCARD
}

fn default_scope_field() -> String {
    DEFAULT_SCOPE_FIELD.to_string()
}

fn default_empty_negation() -> EmptyNegation {
    DEFAULT_EMPTY_NEGATION
}

impl SourceConfig {
    /// Parses a configuration from JSON and validates it.
    ///
    /// # Errors
    ///
    /// Returns [`TranslationError::Json`] or [`TranslationError::InvalidConfig`].
    pub fn from_json(json: &str) -> Result<Self, TranslationError> {
        let config: SourceConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that every identifier the engine relies on is usable.
    ///
    /// # Errors
    ///
    /// Returns [`TranslationError::InvalidConfig`] naming the offending field.
    pub fn validate(&self) -> Result<(), TranslationError> {
        let required = [
            ("source_id", &self.source_id),
            ("default_tag", &self.default_tag),
            ("cross_source_tag", &self.cross_source_tag),
            ("routing_attribute", &self.routing_attribute),
            ("catch_all_attribute", &self.catch_all_attribute),
            ("scope_field", &self.scope_field),
        ];
        if let Some((name, _)) = required.iter().find(|(_, v)| v.trim().is_empty()) {
            return Err(TranslationError::InvalidConfig(format!(
                "{name} cannot be empty"
            )));
        }
        if self.wildcard.is_whitespace() {
            return Err(TranslationError::InvalidConfig(
                "wildcard cannot be whitespace".to_string(),
            ));
        }
        if self
            .fixed_scope
            .as_deref()
            .is_some_and(|scope| scope.trim().is_empty())
        {
            return Err(TranslationError::InvalidConfig(
                "fixed_scope cannot be blank when set".to_string(),
            ));
        }
        // both are written into the query unquoted
        if !is_identifier(&self.scope_field) {
            return Err(TranslationError::InvalidConfig(format!(
                "scope_field '{}' is not a plain identifier",
                self.scope_field
            )));
        }
        if let Some(scope) = self.fixed_scope.as_deref().filter(|scope| !is_identifier(scope)) {
            return Err(TranslationError::InvalidConfig(format!(
                "fixed_scope '{scope}' is not a plain identifier"
            )));
        }
        Ok(())
    }
}
