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

//! Per-translation bookkeeping.

use crate::config::SourceConfig;
use std::collections::BTreeSet;

/// Facts gathered while walking one filter tree.
///
/// A fresh state is created for every top-level translation and is owned by
/// that translation alone. Leaves are recorded whether or not they translate,
/// so routing sees every predicate that was attempted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranslationState {
    leaf_count: usize,
    routing_values: BTreeSet<String>,
    saw_catch_all_wildcard: bool,
    unsatisfiable: bool,
}

impl TranslationState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of leaf predicates visited.
    pub fn leaf_count(&self) -> usize {
        self.leaf_count
    }

    /// Literals seen on the routing attribute.
    pub fn routing_values(&self) -> &BTreeSet<String> {
        &self.routing_values
    }

    /// Whether the catch-all attribute was compared against the wildcard.
    pub fn saw_catch_all_wildcard(&self) -> bool {
        self.saw_catch_all_wildcard
    }

    /// Whether the tree was proven to match nothing.
    pub fn is_unsatisfiable(&self) -> bool {
        self.unsatisfiable
    }

    /// Records one visited leaf and the literal(s) it carries.
    pub(crate) fn observe_leaf(&mut self, attribute: &str, literals: &[&str], config: &SourceConfig) {
        self.leaf_count += 1;

        if attribute == config.routing_attribute {
            self.routing_values
                .extend(literals.iter().map(|literal| literal.to_string()));
        }

        if attribute == config.catch_all_attribute
            && literals.iter().any(|literal| is_sentinel(literal, config.wildcard))
        {
            self.saw_catch_all_wildcard = true;
        }
    }

    pub(crate) fn mark_unsatisfiable(&mut self) {
        self.unsatisfiable = true;
    }
}

/// `true` when `literal` is exactly the wildcard sentinel.
pub(crate) fn is_sentinel(literal: &str, wildcard: char) -> bool {
    let mut chars = literal.chars();
    chars.next() == Some(wildcard) && chars.next().is_none()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> SourceConfig {
        SourceConfig::builder()
            .source_id("wiki")
            .default_tag("wiki")
            .build()
    }

    #[test]
    fn test_counts_every_leaf() {
        let config = config();
        let mut state = TranslationState::new();
        state.observe_leaf("title", &["fox"], &config);
        state.observe_leaf("unknown", &["x"], &config);
        assert_eq!(state.leaf_count(), 2);
        assert!(state.routing_values().is_empty());
        assert!(!state.saw_catch_all_wildcard());
    }

    #[test]
    fn test_collects_routing_values() {
        let config = config();
        let mut state = TranslationState::new();
        state.observe_leaf("tags", &["wiki"], &config);
        state.observe_leaf("tags", &["resource"], &config);
        state.observe_leaf("tags", &["wiki"], &config);
        let values: Vec<&str> = state.routing_values().iter().map(String::as_str).collect();
        assert_eq!(values, vec!["resource", "wiki"]);
    }

    #[test]
    fn test_catch_all_wildcard() {
        let config = config();
        let mut state = TranslationState::new();
        state.observe_leaf("any-text", &["**"], &config);
        assert!(!state.saw_catch_all_wildcard());
        state.observe_leaf("title", &["*"], &config);
        assert!(!state.saw_catch_all_wildcard());
        state.observe_leaf("any-text", &["*"], &config);
        assert!(state.saw_catch_all_wildcard());
    }

    #[test]
    fn test_is_sentinel() {
        assert!(is_sentinel("*", '*'));
        assert!(!is_sentinel("", '*'));
        assert!(!is_sentinel("*a", '*'));
        assert!(is_sentinel("%", '%'));
    }
}
