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

//! Recursive compilation of filter trees.
//!
//! ```text
//! And([a, b])   -> (a AND b)
//! Or([a, b])    -> (a OR b)
//! Not(a)        -> NOT a
//! And([])       -> ""          no constraint
//! Or([x])       -> ""          when x does not translate
//! ```

use super::leaf::LeafTranslator;
use super::state::TranslationState;
use crate::capability::AttributeCapabilityTable;
use crate::config::SourceConfig;
use crate::filter::FilterNode;
use serde::{Deserialize, Serialize};

/// Meaning of `NOT` applied to a child that compiled to nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EmptyNegation {
    /// There is nothing to negate; the `NOT` adds no constraint.
    Unconstrained,
    /// The child matched everything, so its negation matches nothing. A tree
    /// that can match nothing as a whole is not sent to the source.
    MatchNothing,
}

/// Policy applied when a source does not choose one.
pub const DEFAULT_EMPTY_NEGATION: EmptyNegation = EmptyNegation::Unconstrained;

/// Intermediate result of compiling a subtree.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Fragment {
    /// No constraint: matches everything the source holds
    Unconstrained,
    /// Provably matches nothing
    Unsatisfiable,
    Expr(String),
}

/// Walks a [`FilterNode`] tree and produces the target query expression.
///
/// The compiler itself is immutable and can be reused across translations;
/// all per-translation facts go into the [`TranslationState`] passed in.
#[derive(Debug, Clone, Copy)]
pub struct TreeCompiler<'a> {
    leaf: LeafTranslator<'a>,
    config: &'a SourceConfig,
}

impl<'a> TreeCompiler<'a> {
    pub fn new(table: &'a AttributeCapabilityTable, config: &'a SourceConfig) -> Self {
        TreeCompiler {
            leaf: LeafTranslator::new(table, config.wildcard),
            config,
        }
    }

    /// Compiles `node`, recording leaf facts in `state`.
    ///
    /// Returns the empty string when the tree places no constraint the target
    /// can express.
    pub fn compile(&self, node: &FilterNode, state: &mut TranslationState) -> String {
        match self.compile_node(node, state) {
            Fragment::Expr(expr) => strip_empty_groups(&expr),
            Fragment::Unconstrained => String::new(),
            Fragment::Unsatisfiable => {
                state.mark_unsatisfiable();
                String::new()
            }
        }
    }

    fn compile_node(&self, node: &FilterNode, state: &mut TranslationState) -> Fragment {
        match node {
            FilterNode::Compare {
                attribute,
                op,
                literal,
                ..
            } => {
                state.observe_leaf(attribute, &[literal.as_str()], self.config);
                self.leaf
                    .translate(attribute, *op, literal)
                    .map_or(Fragment::Unconstrained, Fragment::Expr)
            }
            FilterNode::Between {
                attribute,
                lower,
                upper,
            } => {
                state.observe_leaf(attribute, &[lower.as_str(), upper.as_str()], self.config);
                self.leaf
                    .translate_between(attribute, lower, upper)
                    .map_or(Fragment::Unconstrained, Fragment::Expr)
            }
            FilterNode::And(children) => self.compile_and(children, state),
            FilterNode::Or(children) => self.compile_or(children, state),
            FilterNode::Not(child) => match self.compile_node(child, state) {
                Fragment::Expr(expr) => Fragment::Expr(format!("NOT {}", enclose(child, expr))),
                Fragment::Unsatisfiable => Fragment::Unconstrained,
                Fragment::Unconstrained => match self.config.empty_negation {
                    EmptyNegation::Unconstrained => Fragment::Unconstrained,
                    EmptyNegation::MatchNothing => Fragment::Unsatisfiable,
                },
            },
        }
    }

    fn compile_and(&self, children: &[FilterNode], state: &mut TranslationState) -> Fragment {
        let mut parts = Vec::with_capacity(children.len());
        let mut unsatisfiable = false;
        // every child is visited so routing sees all predicates
        for child in children {
            match self.compile_node(child, state) {
                Fragment::Expr(expr) => parts.push(expr),
                Fragment::Unsatisfiable => unsatisfiable = true,
                Fragment::Unconstrained => {}
            }
        }

        if unsatisfiable {
            Fragment::Unsatisfiable
        } else {
            group(parts, " AND ")
        }
    }

    fn compile_or(&self, children: &[FilterNode], state: &mut TranslationState) -> Fragment {
        let mut parts = Vec::with_capacity(children.len());
        let mut unsatisfiable = 0;
        for child in children {
            match self.compile_node(child, state) {
                Fragment::Expr(expr) => parts.push(enclose(child, expr)),
                Fragment::Unsatisfiable => unsatisfiable += 1,
                Fragment::Unconstrained => {}
            }
        }

        if parts.is_empty() && !children.is_empty() && unsatisfiable == children.len() {
            Fragment::Unsatisfiable
        } else {
            group(parts, " OR ")
        }
    }
}

/// A `Between` leaf compiles to two AND-ed terms; keep them together under
/// `NOT` and `OR`.
fn enclose(node: &FilterNode, expr: String) -> String {
    if matches!(node, FilterNode::Between { .. }) {
        format!("({expr})")
    } else {
        expr
    }
}

fn group(parts: Vec<String>, separator: &str) -> Fragment {
    if parts.is_empty() {
        Fragment::Unconstrained
    } else {
        Fragment::Expr(format!("({})", parts.join(separator)))
    }
}

/// Removes `()` / `( )` groups outside quoted literals, together with the
/// `AND` / `OR` / `NOT` that joined them to the rest of the expression.
///
/// Empty groups are never produced by the compiler; this is the final
/// guarantee that none reach the target.
pub(crate) fn strip_empty_groups(expr: &str) -> String {
    let mut out = String::with_capacity(expr.len());
    let mut in_quotes = false;
    let mut escaped = false;
    let mut pos = 0;

    while let Some(c) = expr[pos..].chars().next() {
        pos += c.len_utf8();

        if in_quotes {
            out.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_quotes = false;
            }
            continue;
        }

        match c {
            '"' => {
                in_quotes = true;
                out.push(c);
            }
            ')' => {
                let content_end = out.trim_end().len();
                if !out[..content_end].ends_with('(') {
                    out.push(c);
                    continue;
                }
                let group_start = out[..content_end - 1].trim_end().len();
                out.truncate(group_start);
                if !drop_trailing_operator(&mut out) {
                    // the group led its parent: drop the operator after it
                    pos += leading_operator_len(&expr[pos..]);
                }
            }
            _ => out.push(c),
        }
    }
    out
}

/// Drops trailing `NOT`s and then one trailing `AND` / `OR`. Returns whether
/// an `AND` / `OR` was dropped.
fn drop_trailing_operator(out: &mut String) -> bool {
    while truncate_trailing_word(out, "NOT") {}
    truncate_trailing_word(out, "AND") || truncate_trailing_word(out, "OR")
}

fn truncate_trailing_word(out: &mut String, word: &str) -> bool {
    let trimmed = out.trim_end();
    let Some(before) = trimmed.strip_suffix(word) else {
        return false;
    };
    if !before.is_empty() && !before.ends_with(|c: char| c.is_whitespace() || c == '(') {
        return false;
    }
    let keep = before.trim_end().len();
    out.truncate(keep);
    true
}

/// Length of a leading ` AND ` / ` OR ` in `rest`, or 0.
fn leading_operator_len(rest: &str) -> usize {
    let trimmed = rest.trim_start();
    for word in ["AND", "OR"] {
        if let Some(after) = trimmed.strip_prefix(word) {
            if after.starts_with(char::is_whitespace) {
                return rest.len() - after.trim_start().len();
            }
        }
    }
    0
}
