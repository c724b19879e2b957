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

//! Source-agnostic filter trees.
//!
//! A [`FilterNode`] is what the upstream query parser produces and what every
//! federated source translates into its own query language. Trees can be built
//! in code with [`FilterBuilder`] or parsed from JSON with
//! [`FilterNode::from_json`].
//!
//! # Example
//!
//! ```
//! use fedsearch::filter::{FilterBuilder, and_all};
//!
//! // title ~ "red fox" AND created > "2024-01-01"
//! let filter = and_all(vec![
//!     FilterBuilder::attribute("title").like("red fox"),
//!     FilterBuilder::attribute("created").greater_than("2024-01-01"),
//! ]);
//! assert!(filter.validate().is_ok());
//! ```
//!
//! # JSON format
//!
//! ```text
//! {"type": "and", "children": [...]}
//! {"type": "or", "children": [...]}
//! {"type": "not", "children": [<exactly one node>]}
//! {"type": "compare", "attribute": "title", "op": "like", "literal": "fox", "case_sensitive": false}
//! {"type": "between", "attribute": "created", "lower": "2024-01-01", "upper": "2024-12-31"}
//! ```

use crate::error::TranslationError;
use serde::{Deserialize, Serialize};
use std::ops::Not;

#[cfg(test)]
use quickcheck::Arbitrary;

/// Comparison operators a leaf predicate may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CompareOp {
    /// Exact match
    Equal,
    /// Fuzzy (free-text) match
    Like,
    /// Strictly greater than
    GreaterThan,
    /// Strictly less than
    LessThan,
}

impl CompareOp {
    /// Operator name used in logs and JSON.
    pub fn as_str(self) -> &'static str {
        match self {
            CompareOp::Equal => "equal",
            CompareOp::Like => "like",
            CompareOp::GreaterThan => "greater-than",
            CompareOp::LessThan => "less-than",
        }
    }
}

/// Abstract filter tree.
///
/// `And`/`Or` may have zero children, which means "no constraint". `Not`
/// always wraps exactly one child.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "WireNode", into = "WireNode")]
pub enum FilterNode {
    /// Every child must match
    And(Vec<FilterNode>),
    /// At least one child must match
    Or(Vec<FilterNode>),
    /// The child must not match
    Not(Box<FilterNode>),
    /// attribute op literal
    Compare {
        attribute: String,
        op: CompareOp,
        literal: String,
        case_sensitive: bool,
    },
    /// lower < attribute < upper, bounds already formatted for the target
    Between {
        attribute: String,
        lower: String,
        upper: String,
    },
}

impl FilterNode {
    /// Parses and validates a filter tree from its JSON representation.
    ///
    /// # Errors
    ///
    /// Returns [`TranslationError::Json`] for unparsable input and
    /// [`TranslationError::MalformedFilter`] for structurally invalid trees
    /// (a `not` without exactly one child, a missing literal, an empty
    /// attribute name).
    pub fn from_json(json: &str) -> Result<FilterNode, TranslationError> {
        let wire: WireNode = serde_json::from_str(json)?;
        let node = FilterNode::try_from(wire)?;
        node.validate()?;
        Ok(node)
    }

    /// Serializes the tree to its JSON representation.
    ///
    /// # Errors
    ///
    /// Returns [`TranslationError::Json`] if serialization fails.
    pub fn to_json(&self) -> Result<serde_json::Value, TranslationError> {
        Ok(serde_json::to_value(WireNode::from(self.clone()))?)
    }

    /// Checks the structural invariants an upstream parser must uphold.
    ///
    /// # Errors
    ///
    /// Returns [`TranslationError::MalformedFilter`] naming the first violation.
    pub fn validate(&self) -> Result<(), TranslationError> {
        match self {
            FilterNode::And(children) | FilterNode::Or(children) => {
                children.iter().try_for_each(FilterNode::validate)
            }
            FilterNode::Not(child) => child.validate(),
            FilterNode::Compare { attribute, .. } | FilterNode::Between { attribute, .. } => {
                if attribute.trim().is_empty() {
                    Err(TranslationError::malformed("attribute name is empty"))
                } else {
                    Ok(())
                }
            }
        }
    }

    /// Combines this filter with another using AND.
    pub fn and(self, other: FilterNode) -> FilterNode {
        FilterNode::And(vec![self, other])
    }

    /// Combines this filter with another using OR.
    pub fn or(self, other: FilterNode) -> FilterNode {
        FilterNode::Or(vec![self, other])
    }
}

impl Not for FilterNode {
    type Output = FilterNode;

    /// Negates this filter using the `!` operator.
    fn not(self) -> FilterNode {
        FilterNode::Not(Box::new(self))
    }
}

/// Fluent builder for leaf predicates.
pub struct FilterBuilder {
    attribute: String,
    case_sensitive: bool,
}

impl FilterBuilder {
    /// Starts building a predicate on the given canonical attribute.
    ///
    /// ```
    /// use fedsearch::filter::FilterBuilder;
    ///
    /// let filter = FilterBuilder::attribute("title").equal("Quarterly report");
    /// ```
    pub fn attribute(name: impl Into<String>) -> Self {
        FilterBuilder {
            attribute: name.into(),
            case_sensitive: false,
        }
    }

    /// Marks the predicate as case-sensitive.
    pub fn case_sensitive(mut self) -> Self {
        self.case_sensitive = true;
        self
    }

    fn compare(self, op: CompareOp, literal: impl Into<String>) -> FilterNode {
        FilterNode::Compare {
            attribute: self.attribute,
            op,
            literal: literal.into(),
            case_sensitive: self.case_sensitive,
        }
    }

    /// attribute = literal
    pub fn equal(self, literal: impl Into<String>) -> FilterNode {
        self.compare(CompareOp::Equal, literal)
    }

    /// attribute ~ literal
    pub fn like(self, literal: impl Into<String>) -> FilterNode {
        self.compare(CompareOp::Like, literal)
    }

    /// attribute > literal
    pub fn greater_than(self, literal: impl Into<String>) -> FilterNode {
        self.compare(CompareOp::GreaterThan, literal)
    }

    /// attribute < literal
    pub fn less_than(self, literal: impl Into<String>) -> FilterNode {
        self.compare(CompareOp::LessThan, literal)
    }

    /// lower < attribute < upper, e.g. a "during" date range.
    pub fn between(self, lower: impl Into<String>, upper: impl Into<String>) -> FilterNode {
        FilterNode::Between {
            attribute: self.attribute,
            lower: lower.into(),
            upper: upper.into(),
        }
    }
}

/// Creates an AND of all given filters. An empty list means "no constraint".
pub fn and_all(filters: Vec<FilterNode>) -> FilterNode {
    FilterNode::And(filters)
}

/// Creates an OR of all given filters. An empty list means "no constraint".
pub fn or_all(filters: Vec<FilterNode>) -> FilterNode {
    FilterNode::Or(filters)
}

/// JSON shape of a filter node. Kept separate so structural violations
/// (`not` with several children, null literals) are reported as
/// [`TranslationError::MalformedFilter`] instead of opaque parse errors.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
enum WireNode {
    And {
        #[serde(default)]
        children: Vec<WireNode>,
    },
    Or {
        #[serde(default)]
        children: Vec<WireNode>,
    },
    Not {
        #[serde(default)]
        children: Vec<WireNode>,
    },
    Compare {
        attribute: String,
        op: CompareOp,
        #[serde(default)]
        literal: Option<String>,
        #[serde(default)]
        case_sensitive: bool,
    },
    Between {
        attribute: String,
        #[serde(default)]
        lower: Option<String>,
        #[serde(default)]
        upper: Option<String>,
    },
}

fn convert_children(children: Vec<WireNode>) -> Result<Vec<FilterNode>, TranslationError> {
    children.into_iter().map(FilterNode::try_from).collect()
}

fn required(value: Option<String>, what: &str, attribute: &str) -> Result<String, TranslationError> {
    value.ok_or_else(|| TranslationError::malformed(format!("{what} missing for '{attribute}'")))
}

impl TryFrom<WireNode> for FilterNode {
    type Error = TranslationError;

    fn try_from(wire: WireNode) -> Result<Self, Self::Error> {
        match wire {
            WireNode::And { children } => Ok(FilterNode::And(convert_children(children)?)),
            WireNode::Or { children } => Ok(FilterNode::Or(convert_children(children)?)),
            WireNode::Not { children } => {
                if children.len() != 1 {
                    return Err(TranslationError::malformed(format!(
                        "not expects exactly one child, got {}",
                        children.len()
                    )));
                }
                let child = children.into_iter().next().map(FilterNode::try_from);
                match child {
                    Some(child) => Ok(!child?),
                    None => Err(TranslationError::malformed("not expects exactly one child")),
                }
            }
            WireNode::Compare {
                attribute,
                op,
                literal,
                case_sensitive,
            } => {
                let literal = required(literal, "literal", &attribute)?;
                Ok(FilterNode::Compare {
                    attribute,
                    op,
                    literal,
                    case_sensitive,
                })
            }
            WireNode::Between {
                attribute,
                lower,
                upper,
            } => {
                let lower = required(lower, "lower bound", &attribute)?;
                let upper = required(upper, "upper bound", &attribute)?;
                Ok(FilterNode::Between {
                    attribute,
                    lower,
                    upper,
                })
            }
        }
    }
}

impl From<FilterNode> for WireNode {
    fn from(node: FilterNode) -> Self {
        match node {
            FilterNode::And(children) => WireNode::And {
                children: children.into_iter().map(WireNode::from).collect(),
            },
            FilterNode::Or(children) => WireNode::Or {
                children: children.into_iter().map(WireNode::from).collect(),
            },
            FilterNode::Not(child) => WireNode::Not {
                children: vec![WireNode::from(*child)],
            },
            FilterNode::Compare {
                attribute,
                op,
                literal,
                case_sensitive,
            } => WireNode::Compare {
                attribute,
                op,
                literal: Some(literal),
                case_sensitive,
            },
            FilterNode::Between {
                attribute,
                lower,
                upper,
            } => WireNode::Between {
                attribute,
                lower: Some(lower),
                upper: Some(upper),
            },
        }
    }
}

#[cfg(test)]
impl Arbitrary for FilterNode {
    fn arbitrary(g: &mut quickcheck::Gen) -> Self {
        arbitrary_node(g, 3)
    }
}

#[cfg(test)]
fn arbitrary_node(g: &mut quickcheck::Gen, depth: usize) -> FilterNode {
    const ATTRIBUTES: &[&str] = &["any-text", "title", "created", "creator", "id", "tags", "abstract"];
    const LITERALS: &[&str] = &["*", "fox", "red fox", "fo*", "2024-01-01", "wiki", "say \"hi\""];
    const OPS: &[CompareOp] = &[
        CompareOp::Equal,
        CompareOp::Like,
        CompareOp::GreaterThan,
        CompareOp::LessThan,
    ];

    let pick = |g: &mut quickcheck::Gen, values: &[&str]| -> String {
        g.choose(values).copied().unwrap_or_default().to_string()
    };

    let kind = if depth == 0 { u8::arbitrary(g) % 2 } else { u8::arbitrary(g) % 5 };
    match kind {
        0 => FilterNode::Compare {
            attribute: pick(g, ATTRIBUTES),
            op: g.choose(OPS).copied().unwrap_or(CompareOp::Equal),
            literal: pick(g, LITERALS),
            case_sensitive: bool::arbitrary(g),
        },
        1 => FilterNode::Between {
            attribute: pick(g, ATTRIBUTES),
            lower: pick(g, LITERALS),
            upper: pick(g, LITERALS),
        },
        2 => FilterNode::Not(Box::new(arbitrary_node(g, depth - 1))),
        kind => {
            let width = usize::arbitrary(g) % 4;
            let children = (0..width).map(|_| arbitrary_node(g, depth - 1)).collect();
            if kind == 3 {
                FilterNode::And(children)
            } else {
                FilterNode::Or(children)
            }
        }
    }
}
