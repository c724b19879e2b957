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

//! Error definitions for filter translation.
//!
//! Translation itself is best-effort: unsupported attributes, operators and
//! wildcard usages are dropped, never raised. The variants here only cover
//! malformed input at the crate boundary and failures reported by the
//! transport collaborator.

use thiserror::Error;

/// Errors surfaced to callers of the translation engine.
#[derive(Debug, Error)]
pub enum TranslationError {
    /// The filter tree handed in by the upstream parser is structurally invalid
    #[error("malformed filter: {reason}")]
    MalformedFilter {
        /// What was wrong with the tree
        reason: String,
    },

    /// A capability table entry cannot be used
    #[error("invalid capability for attribute '{attribute}': {reason}")]
    InvalidCapability {
        /// Attribute identifier of the offending entry
        attribute: String,
        /// Why the entry was rejected
        reason: String,
    },

    /// The source configuration is unusable
    #[error("invalid source configuration: {0}")]
    InvalidConfig(String),

    /// JSON input could not be parsed
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// The remote endpoint could not be searched
    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl TranslationError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        TranslationError::MalformedFilter {
            reason: reason.into(),
        }
    }
}

/// Failure reported by a [`SearchTransport`](crate::source::SearchTransport).
///
/// Whether a failure is worth retrying is the transport's call; the engine
/// only carries the classification through.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The endpoint could not be reached or timed out
    #[error("endpoint unavailable: {0}")]
    Unavailable(String),

    /// The endpoint answered with a non-success status
    #[error("endpoint returned status {status}: {message}")]
    Status {
        /// Status code returned by the endpoint
        status: u16,
        /// Body or reason phrase
        message: String,
    },

    /// Anything else the transport wants to report
    #[error("{0}")]
    Other(String),
}

impl TransportError {
    /// Returns `true` when the failure is transient and the caller may try again.
    pub fn is_retryable(&self) -> bool {
        match self {
            TransportError::Unavailable(_) => true,
            TransportError::Status { status, .. } => *status == 429 || *status >= 500,
            TransportError::Other(_) => false,
        }
    }
}
