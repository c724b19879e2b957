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

//! One federation participant: translation, routing and the call out.
//!
//! # Flow
//!
//! ```text
//! FilterNode ─→ TreeCompiler ─→ RoutingDecider ─┬─ skip ─→ SourceResponse (no call)
//!                                                └─ send ─→ QueryFinisher ─→ SearchTransport
//! ```
//!
//! The transport is the only part that touches the network; everything
//! before it is synchronous and deterministic.

use crate::capability::AttributeCapabilityTable;
use crate::config::SourceConfig;
use crate::error::{TranslationError, TransportError};
use crate::filter::FilterNode;
use crate::finisher::{FinishWarning, QueryFinisher, SortBy};
use crate::routing::{RoutingDecider, RoutingDecision};
use crate::translator::{TranslationState, TreeCompiler};
use serde_json::Value;
use std::sync::Arc;

/// Sends a finished query to a remote endpoint and returns its raw records.
///
/// Implementations own connection handling, retries and response parsing;
/// [`TransportError::is_retryable`] lets callers tell transient failures apart.
#[async_trait::async_trait]
pub trait SearchTransport: Send + Sync {
    /// Runs `query` against the endpoint.
    ///
    /// # Errors
    ///
    /// Returns a [`TransportError`] when the endpoint cannot answer.
    async fn search(&self, query: &str) -> Result<Vec<Value>, TransportError>;
}

#[async_trait::async_trait]
impl<T: SearchTransport + ?Sized> SearchTransport for Arc<T> {
    async fn search(&self, query: &str) -> Result<Vec<Value>, TransportError> {
        (**self).search(query).await
    }
}

/// What to do with one source for one filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryPlan {
    /// Send `query` to the source
    Send {
        query: String,
        warnings: Vec<FinishWarning>,
    },
    /// Do not contact the source
    Skip { reason: RoutingDecision },
}

impl QueryPlan {
    pub fn should_query(&self) -> bool {
        matches!(self, QueryPlan::Send { .. })
    }

    /// The finished query, if the source is to be asked.
    pub fn query(&self) -> Option<&str> {
        match self {
            QueryPlan::Send { query, .. } => Some(query),
            QueryPlan::Skip { .. } => None,
        }
    }
}

/// Result of searching one source.
#[derive(Debug, Clone, Default)]
pub struct SourceResponse {
    /// The query that was sent, `None` when the source was skipped
    pub query: Option<String>,
    /// Raw records returned by the transport
    pub records: Vec<Value>,
    pub warnings: Vec<FinishWarning>,
}

/// A federated source: configuration, capability table and transport.
///
/// Translation state is created per call, so one source can serve concurrent
/// searches through a shared reference.
#[derive(Debug, Clone)]
pub struct FederatedSource<T> {
    config: SourceConfig,
    table: Arc<AttributeCapabilityTable>,
    transport: T,
}

impl<T: SearchTransport> FederatedSource<T> {
    /// Creates a source after validating `config`.
    ///
    /// # Errors
    ///
    /// Returns [`TranslationError::InvalidConfig`] for an unusable configuration.
    pub fn new(
        config: SourceConfig,
        table: Arc<AttributeCapabilityTable>,
        transport: T,
    ) -> Result<Self, TranslationError> {
        config.validate()?;
        Ok(FederatedSource {
            config,
            table,
            transport,
        })
    }

    pub fn config(&self) -> &SourceConfig {
        &self.config
    }

    pub fn table(&self) -> &AttributeCapabilityTable {
        &self.table
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Translates `filter` and decides whether the source should be asked.
    ///
    /// # Errors
    ///
    /// Returns [`TranslationError::MalformedFilter`] when the tree is invalid.
    pub fn plan(&self, filter: &FilterNode, sort: Option<&SortBy>) -> Result<QueryPlan, TranslationError> {
        filter.validate()?;

        let mut state = TranslationState::new();
        let compiled = TreeCompiler::new(&self.table, &self.config).compile(filter, &mut state);
        log::debug!(
            "Source '{}' compiled {} leaves to {compiled:?}",
            self.config.source_id,
            state.leaf_count()
        );

        let decision = RoutingDecider::decide(&compiled, &state, &self.config);
        if !decision.should_query() {
            log::info!("Skipping source '{}': {decision}", self.config.source_id);
            return Ok(QueryPlan::Skip { reason: decision });
        }

        let (query, warnings) =
            QueryFinisher::new(&self.table, &self.config).finish_with_diagnostics(&compiled, sort);
        Ok(QueryPlan::Send { query, warnings })
    }

    /// Plans the query and, unless skipped, runs it through the transport.
    ///
    /// # Errors
    ///
    /// Returns [`TranslationError::MalformedFilter`] for an invalid tree and
    /// [`TranslationError::Transport`] when the endpoint fails.
    pub async fn search(
        &self,
        filter: &FilterNode,
        sort: Option<&SortBy>,
    ) -> Result<SourceResponse, TranslationError> {
        let (query, warnings) = match self.plan(filter, sort)? {
            QueryPlan::Send { query, warnings } => (query, warnings),
            QueryPlan::Skip { .. } => return Ok(SourceResponse::default()),
        };

        log::debug!("Searching source '{}' with {query:?}", self.config.source_id);
        let records = self.transport.search(&query).await?;
        log::debug!(
            "Source '{}' returned {} records",
            self.config.source_id,
            records.len()
        );

        Ok(SourceResponse {
            query: Some(query),
            records,
            warnings,
        })
    }
}
