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

//! Post-processing of compiled expressions: fixed scope and sort order.
//!
//! ```text
//! (title ~ "fox") AND scope = alpha order by title ASC
//! └── compiled ──┘ └─── scope ────┘ └───── sort ─────┘
//! ```

use crate::capability::AttributeCapabilityTable;
use crate::config::SourceConfig;
use crate::error::TranslationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    #[serde(alias = "asc")]
    Ascending,
    #[serde(alias = "desc")]
    Descending,
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortDirection::Ascending => write!(f, "ASC"),
            SortDirection::Descending => write!(f, "DESC"),
        }
    }
}

impl FromStr for SortDirection {
    type Err = TranslationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortDirection::Ascending),
            "desc" | "descending" => Ok(SortDirection::Descending),
            _ => Err(TranslationError::malformed(format!(
                "unknown sort direction '{s}'"
            ))),
        }
    }
}

/// Requested result ordering, by canonical attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortBy {
    pub attribute: String,
    #[serde(default)]
    pub direction: SortDirection,
}

impl SortBy {
    pub fn new(attribute: impl Into<String>, direction: SortDirection) -> Self {
        SortBy {
            attribute: attribute.into(),
            direction,
        }
    }

    pub fn ascending(attribute: impl Into<String>) -> Self {
        Self::new(attribute, SortDirection::Ascending)
    }

    pub fn descending(attribute: impl Into<String>) -> Self {
        Self::new(attribute, SortDirection::Descending)
    }
}

/// Something the finisher had to leave out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum FinishWarning {
    /// The sort attribute has no counterpart in the capability table
    UnsupportedSort { attribute: String },
}

impl fmt::Display for FinishWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FinishWarning::UnsupportedSort { attribute } => {
                write!(f, "sort attribute '{attribute}' is not supported; results are unordered")
            }
        }
    }
}

/// Appends the scope predicate and sort clause to a compiled expression.
#[derive(Debug, Clone, Copy)]
pub struct QueryFinisher<'a> {
    table: &'a AttributeCapabilityTable,
    config: &'a SourceConfig,
}

impl<'a> QueryFinisher<'a> {
    pub fn new(table: &'a AttributeCapabilityTable, config: &'a SourceConfig) -> Self {
        QueryFinisher { table, config }
    }

    /// Produces the final query string. An unsupported sort is dropped.
    pub fn finish(&self, compiled: &str, sort: Option<&SortBy>) -> String {
        self.finish_with_diagnostics(compiled, sort).0
    }

    /// Like [`finish`](Self::finish), also reporting what was dropped.
    pub fn finish_with_diagnostics(
        &self,
        compiled: &str,
        sort: Option<&SortBy>,
    ) -> (String, Vec<FinishWarning>) {
        let mut query = compiled.to_string();
        let mut warnings = Vec::new();

        if let Some(scope) = &self.config.fixed_scope {
            if !query.is_empty() {
                query.push_str(" AND ");
            }
            query.push_str(&format!("{} = {scope}", self.config.scope_field));
        }

        if let Some(sort) = sort {
            match self.table.get(&sort.attribute) {
                Some(capability) => {
                    query.push_str(&format!(
                        " order by {} {}",
                        capability.target_name, sort.direction
                    ));
                }
                None => {
                    log::warn!(
                        "Source '{}' cannot sort by '{}'; dropping sort",
                        self.config.source_id,
                        sort.attribute
                    );
                    warnings.push(FinishWarning::UnsupportedSort {
                        attribute: sort.attribute.clone(),
                    });
                }
            }
        }

        (query, warnings)
    }
}
