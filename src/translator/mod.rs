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

//! Filter tree to target query compilation.
//!
//! # Architecture
//!
//! ```text
//! FilterNode tree
//!     ↓
//! TreeCompiler ──→ LeafTranslator ──→ AttributeCapabilityTable
//!     │                  (one per leaf)
//!     ↓
//! compiled expression + TranslationState
//! ```

mod compiler;
mod leaf;
mod state;

pub use compiler::{DEFAULT_EMPTY_NEGATION, EmptyNegation, TreeCompiler};
pub use leaf::LeafTranslator;
pub use state::TranslationState;

use crate::capability::AttributeCapabilityTable;
use crate::config::SourceConfig;
use crate::filter::FilterNode;

/// Compiles `node` with a fresh [`TranslationState`] and returns both.
///
/// ```
/// use fedsearch::capability::default_table;
/// use fedsearch::config::SourceConfig;
/// use fedsearch::filter::FilterBuilder;
/// use fedsearch::translator::translate;
///
/// let config = SourceConfig::builder().source_id("wiki").default_tag("wiki").build();
/// let (compiled, state) = translate(
///     &FilterBuilder::attribute("title").like("red fox"),
///     &default_table(),
///     &config,
/// );
/// assert_eq!(compiled, r#"(title ~ "red" OR title ~ "fox")"#);
/// assert_eq!(state.leaf_count(), 1);
/// ```
pub fn translate(
    node: &FilterNode,
    table: &AttributeCapabilityTable,
    config: &SourceConfig,
) -> (String, TranslationState) {
    let mut state = TranslationState::new();
    let compiled = TreeCompiler::new(table, config).compile(node, &mut state);
    (compiled, state)
}
