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

//! Decides whether a source should be asked at all.
//!
//! Skipping is a correctness and performance contract: a query that cannot
//! return anything useful must not cost a network round trip.

use crate::config::SourceConfig;
use crate::translator::TranslationState;
use std::fmt;

/// Outcome of routing one translated query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoutingDecision {
    /// Send the query
    Query,
    /// The query is tagged for other sources only
    NotApplicable,
    /// The filter provably matches nothing
    Unsatisfiable,
    /// Nothing translated and no scoped match-all shortcut applies
    NothingToSearch,
}

impl RoutingDecision {
    pub fn should_query(self) -> bool {
        self == RoutingDecision::Query
    }
}

impl fmt::Display for RoutingDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoutingDecision::Query => write!(f, "query"),
            RoutingDecision::NotApplicable => write!(f, "not applicable to this source"),
            RoutingDecision::Unsatisfiable => write!(f, "filter matches nothing"),
            RoutingDecision::NothingToSearch => write!(f, "nothing to search for"),
        }
    }
}

/// Routing heuristics over a finished [`TranslationState`].
pub struct RoutingDecider;

impl RoutingDecider {
    /// A source is applicable when the query carries no routing predicate, or
    /// names this source's tag or the cross-source tag.
    pub fn is_applicable(state: &TranslationState, config: &SourceConfig) -> bool {
        let tags = state.routing_values();
        tags.is_empty() || tags.contains(&config.default_tag) || tags.contains(&config.cross_source_tag)
    }

    /// Classifies the translated query.
    ///
    /// An empty expression is still worth sending when the source has a fixed
    /// scope and the query was nothing but a catch-all wildcard: that is a
    /// "fetch everything in scope" request, not an empty one.
    pub fn decide(compiled: &str, state: &TranslationState, config: &SourceConfig) -> RoutingDecision {
        if !Self::is_applicable(state, config) {
            return RoutingDecision::NotApplicable;
        }
        if state.is_unsatisfiable() {
            return RoutingDecision::Unsatisfiable;
        }

        let scoped_match_all =
            config.fixed_scope.is_some() && state.saw_catch_all_wildcard() && state.leaf_count() <= 1;

        if !compiled.is_empty() || scoped_match_all {
            RoutingDecision::Query
        } else {
            RoutingDecision::NothingToSearch
        }
    }

    /// Returns `true` when the query should be sent to the source.
    pub fn should_query(compiled: &str, state: &TranslationState, config: &SourceConfig) -> bool {
        Self::decide(compiled, state, config).should_query()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::default_table;
    use crate::filter::{FilterBuilder, FilterNode, and_all};
    use crate::translator::translate;

    fn config() -> SourceConfig {
        SourceConfig::builder()
            .source_id("wiki")
            .default_tag("wiki")
            .build()
    }

    fn scoped_config() -> SourceConfig {
        SourceConfig::builder()
            .source_id("wiki")
            .default_tag("wiki")
            .fixed_scope("alpha")
            .build()
    }

    fn decide(filter: &FilterNode, config: &SourceConfig) -> RoutingDecision {
        let (compiled, state) = translate(filter, &default_table(), config);
        RoutingDecider::decide(&compiled, &state, config)
    }

    #[test]
    fn test_untagged_query_is_applicable() {
        let filter = FilterBuilder::attribute("title").equal("fox");
        assert_eq!(decide(&filter, &config()), RoutingDecision::Query);
    }

    #[test]
    fn test_foreign_tag_is_not_applicable() {
        let filter = and_all(vec![
            FilterBuilder::attribute("tags").equal("workflow"),
            FilterBuilder::attribute("title").equal("fox"),
        ]);
        assert_eq!(decide(&filter, &config()), RoutingDecision::NotApplicable);
    }

    #[test]
    fn test_own_and_cross_source_tags_are_applicable() {
        for tag in ["wiki", "resource"] {
            let filter = and_all(vec![
                FilterBuilder::attribute("tags").equal("workflow"),
                FilterBuilder::attribute("tags").equal(tag),
                FilterBuilder::attribute("title").equal("fox"),
            ]);
            assert_eq!(decide(&filter, &config()), RoutingDecision::Query, "tag {tag}");
        }
    }

    #[test]
    fn test_bare_wildcard_without_scope_is_skipped() {
        let filter = FilterBuilder::attribute("any-text").equal("*");
        assert_eq!(decide(&filter, &config()), RoutingDecision::NothingToSearch);
    }

    #[test]
    fn test_bare_wildcard_with_scope_is_sent() {
        let filter = FilterBuilder::attribute("any-text").equal("*");
        assert_eq!(decide(&filter, &scoped_config()), RoutingDecision::Query);

        let filter = FilterBuilder::attribute("any-text").like("*");
        assert_eq!(decide(&filter, &scoped_config()), RoutingDecision::Query);
    }

    #[test]
    fn test_wildcard_with_other_untranslatable_predicates_is_skipped() {
        let filter = and_all(vec![
            FilterBuilder::attribute("any-text").like("*"),
            FilterBuilder::attribute("abstract").equal("x"),
        ]);
        assert_eq!(
            decide(&filter, &scoped_config()),
            RoutingDecision::NothingToSearch
        );
    }

    #[test]
    fn test_should_query_matches_decision() {
        let config = config();
        let (compiled, state) = translate(
            &FilterBuilder::attribute("title").equal("fox"),
            &default_table(),
            &config,
        );
        assert!(RoutingDecider::should_query(&compiled, &state, &config));
        assert!(!RoutingDecider::should_query("", &state, &config));
    }

    #[test]
    fn test_unsatisfiable_is_skipped() {
        let config = SourceConfig::builder()
            .source_id("wiki")
            .default_tag("wiki")
            .empty_negation(crate::translator::EmptyNegation::MatchNothing)
            .build();
        let filter = !FilterBuilder::attribute("abstract").equal("x");
        assert_eq!(decide(&filter, &config), RoutingDecision::Unsatisfiable);
    }

    #[test]
    fn test_decision_display() {
        assert_eq!(
            RoutingDecision::NotApplicable.to_string(),
            "not applicable to this source"
        );
    }
}
