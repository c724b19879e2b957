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

//! Translation of single comparison predicates.
//!
//! # Output
//!
//! ```text
//! title = "fox"                                  Equal
//! (title ~ "red" OR title ~ "fox")               Like, one clause per word
//! (creator = "alice")                            Like degraded to Equal
//! created > "2024-01-01"                         GreaterThan
//! created < "2024-01-01"                         LessThan
//! created > "2024-01-01" AND created < "2025"    Between
//! ```
//!
//! A predicate the target cannot express is dropped (`None`): the query then
//! narrows less than requested instead of failing.

use super::state::is_sentinel;
use crate::capability::{AttributeCapability, AttributeCapabilityTable};
use crate::filter::CompareOp;

/// Turns one predicate into a target sub-expression, consulting the
/// capability table.
#[derive(Debug, Clone, Copy)]
pub struct LeafTranslator<'a> {
    table: &'a AttributeCapabilityTable,
    wildcard: char,
}

impl<'a> LeafTranslator<'a> {
    pub fn new(table: &'a AttributeCapabilityTable, wildcard: char) -> Self {
        LeafTranslator { table, wildcard }
    }

    /// Translates `attribute op literal`.
    ///
    /// Returns `None` when the attribute is unknown, the operator is not
    /// allowed on it, or the literal breaks the wildcard rules.
    pub fn translate(&self, attribute: &str, op: CompareOp, literal: &str) -> Option<String> {
        let Some(capability) = self.table.get(attribute) else {
            log::debug!("Dropping {} on '{attribute}': attribute not supported", op.as_str());
            return None;
        };

        let translated = match op {
            CompareOp::Equal => {
                if capability.equal_allowed {
                    self.term(capability, "=", literal)
                } else {
                    None
                }
            }
            CompareOp::Like => self.translate_like(capability, literal),
            CompareOp::GreaterThan => self.range_term(capability, ">", literal),
            CompareOp::LessThan => self.range_term(capability, "<", literal),
        };

        if translated.is_none() {
            log::debug!(
                "Dropping {} on '{attribute}' with literal {literal:?}: not expressible",
                op.as_str()
            );
        }
        translated
    }

    /// Translates `lower < attribute < upper`.
    pub fn translate_between(&self, attribute: &str, lower: &str, upper: &str) -> Option<String> {
        let Some(capability) = self.table.get(attribute) else {
            log::debug!("Dropping between on '{attribute}': attribute not supported");
            return None;
        };

        let translated = self
            .range_term(capability, ">", lower)
            .zip(self.range_term(capability, "<", upper))
            .map(|(after, before)| format!("{after} AND {before}"));

        if translated.is_none() {
            log::debug!("Dropping between on '{attribute}' [{lower:?}, {upper:?}]: not expressible");
        }
        translated
    }

    /// Multi-word fuzzy search becomes an OR of single-word matches, since
    /// targets typically only fuzzy-match one token at a time.
    fn translate_like(&self, capability: &AttributeCapability, literal: &str) -> Option<String> {
        let operator = if capability.like_allowed {
            "~"
        } else if capability.like_degrades_to_equal {
            "="
        } else {
            return None;
        };

        let clauses: Vec<String> = literal
            .split_whitespace()
            .filter_map(|token| self.term(capability, operator, token))
            .collect();

        if clauses.is_empty() {
            None
        } else {
            Some(format!("({})", clauses.join(" OR ")))
        }
    }

    fn range_term(&self, capability: &AttributeCapability, operator: &str, literal: &str) -> Option<String> {
        if capability.range_allowed {
            self.term(capability, operator, literal)
        } else {
            None
        }
    }

    fn term(&self, capability: &AttributeCapability, operator: &str, literal: &str) -> Option<String> {
        if !self.wildcard_ok(capability, literal) {
            return None;
        }
        Some(format!(
            "{} {operator} {}",
            capability.target_name,
            quote(literal)
        ))
    }

    /// A bare sentinel never translates; an embedded one only where the
    /// attribute allows wildcards.
    fn wildcard_ok(&self, capability: &AttributeCapability, literal: &str) -> bool {
        if is_sentinel(literal, self.wildcard) {
            return false;
        }
        capability.wildcard_allowed || !literal.contains(self.wildcard)
    }
}

/// Wraps a literal in double quotes, escaping `"` and `\`.
pub(crate) fn quote(literal: &str) -> String {
    let mut quoted = String::with_capacity(literal.len() + 2);
    quoted.push('"');
    for c in literal.chars() {
        if c == '"' || c == '\\' {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted.push('"');
    quoted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::{AttributeCapability, default_table};

    fn table() -> AttributeCapabilityTable {
        AttributeCapabilityTable::builder()
            .entry("title", AttributeCapability::new("title").equal().like().wildcard())
            .entry("creator", AttributeCapability::new("creator").equal().like_as_equal())
            .entry("id", AttributeCapability::new("id").equal())
            .entry("created", AttributeCapability::new("created").range())
            .entry("text", AttributeCapability::new("text").like())
            .build()
            .unwrap()
    }

    #[test]
    fn test_equal() {
        let table = table();
        let leaf = LeafTranslator::new(&table, '*');
        assert_eq!(
            leaf.translate("title", CompareOp::Equal, "fox"),
            Some("title = \"fox\"".to_string())
        );
    }

    #[test]
    fn test_equal_not_allowed() {
        let table = table();
        let leaf = LeafTranslator::new(&table, '*');
        assert_eq!(leaf.translate("created", CompareOp::Equal, "2024"), None);
        assert_eq!(leaf.translate("text", CompareOp::Equal, "fox"), None);
    }

    #[test]
    fn test_unknown_attribute() {
        let table = table();
        let leaf = LeafTranslator::new(&table, '*');
        assert_eq!(leaf.translate("abstract", CompareOp::Equal, "fox"), None);
        assert_eq!(leaf.translate("abstract", CompareOp::Like, "fox"), None);
        assert_eq!(leaf.translate_between("abstract", "a", "b"), None);
    }

    #[test]
    fn test_wildcard_rules() {
        let table = table();
        let leaf = LeafTranslator::new(&table, '*');
        // bare sentinel never translates, even where wildcards are allowed
        assert_eq!(leaf.translate("title", CompareOp::Equal, "*"), None);
        // embedded wildcard only where allowed
        assert_eq!(
            leaf.translate("title", CompareOp::Equal, "fo*"),
            Some("title = \"fo*\"".to_string())
        );
        assert_eq!(leaf.translate("id", CompareOp::Equal, "12*"), None);
    }

    #[test]
    fn test_like_splits_words() {
        let table = table();
        let leaf = LeafTranslator::new(&table, '*');
        assert_eq!(
            leaf.translate("title", CompareOp::Like, "red  fox"),
            Some("(title ~ \"red\" OR title ~ \"fox\")".to_string())
        );
    }

    #[test]
    fn test_like_degrades_to_equal() {
        let table = table();
        let leaf = LeafTranslator::new(&table, '*');
        assert_eq!(
            leaf.translate("creator", CompareOp::Like, "foo"),
            Some("(creator = \"foo\")".to_string())
        );
    }

    #[test]
    fn test_like_without_fallback_is_dropped() {
        let table = table();
        let leaf = LeafTranslator::new(&table, '*');
        assert_eq!(leaf.translate("id", CompareOp::Like, "foo"), None);
    }

    #[test]
    fn test_like_drops_bad_tokens_only() {
        let table = table();
        let leaf = LeafTranslator::new(&table, '*');
        assert_eq!(
            leaf.translate("text", CompareOp::Like, "red * fo*x"),
            Some("(text ~ \"red\")".to_string())
        );
        assert_eq!(leaf.translate("text", CompareOp::Like, "*"), None);
        assert_eq!(leaf.translate("text", CompareOp::Like, "   "), None);
    }

    #[test]
    fn test_range() {
        let table = table();
        let leaf = LeafTranslator::new(&table, '*');
        assert_eq!(
            leaf.translate("created", CompareOp::GreaterThan, "2024-01-01"),
            Some("created > \"2024-01-01\"".to_string())
        );
        assert_eq!(
            leaf.translate("created", CompareOp::LessThan, "2024-01-01"),
            Some("created < \"2024-01-01\"".to_string())
        );
        assert_eq!(leaf.translate("title", CompareOp::GreaterThan, "a"), None);
        assert_eq!(leaf.translate("created", CompareOp::LessThan, "*"), None);
    }

    #[test]
    fn test_between() {
        let table = table();
        let leaf = LeafTranslator::new(&table, '*');
        assert_eq!(
            leaf.translate_between("created", "2024-01-01", "2024-12-31"),
            Some("created > \"2024-01-01\" AND created < \"2024-12-31\"".to_string())
        );
        assert_eq!(leaf.translate_between("created", "2024-01-01", "*"), None);
        assert_eq!(leaf.translate_between("title", "a", "b"), None);
    }

    #[test]
    fn test_bare_sentinel_in_range_on_wildcard_attribute() {
        let table = AttributeCapabilityTable::builder()
            .entry("modified", AttributeCapability::new("lastmodified").range().wildcard())
            .build()
            .unwrap();
        let leaf = LeafTranslator::new(&table, '*');
        assert_eq!(leaf.translate("modified", CompareOp::GreaterThan, "*"), None);
        assert_eq!(leaf.translate("modified", CompareOp::LessThan, "*"), None);
        assert_eq!(leaf.translate_between("modified", "*", "b"), None);
        assert_eq!(leaf.translate_between("modified", "a", "*"), None);
        assert_eq!(
            leaf.translate("modified", CompareOp::GreaterThan, "2024*"),
            Some("lastmodified > \"2024*\"".to_string())
        );
    }

    #[test]
    fn test_quotes_are_escaped() {
        let table = table();
        let leaf = LeafTranslator::new(&table, '*');
        assert_eq!(
            leaf.translate("title", CompareOp::Equal, r#"say "hi" \o/"#),
            Some(r#"title = "say \"hi\" \\o/""#.to_string())
        );
    }

    #[test]
    fn test_custom_sentinel() {
        let table = table();
        let leaf = LeafTranslator::new(&table, '%');
        assert_eq!(leaf.translate("title", CompareOp::Equal, "%"), None);
        assert_eq!(
            leaf.translate("id", CompareOp::Equal, "*"),
            Some("id = \"*\"".to_string())
        );
        assert_eq!(leaf.translate("id", CompareOp::Equal, "1%"), None);
    }

    #[test]
    fn test_default_table_targets() {
        let table = default_table();
        let leaf = LeafTranslator::new(&table, '*');
        assert_eq!(
            leaf.translate("any-text", CompareOp::Like, "fox"),
            Some("(text ~ \"fox\")".to_string())
        );
        assert_eq!(
            leaf.translate("modified", CompareOp::GreaterThan, "2024-01-01"),
            Some("lastmodified > \"2024-01-01\"".to_string())
        );
    }
}
