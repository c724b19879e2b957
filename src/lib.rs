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

//! # fedsearch
//!
//! Translates one abstract filter tree into the query language of each
//! federated search endpoint, and decides whether an endpoint should be asked
//! at all.
//!
//! Every source describes what its query language can do per attribute in an
//! [`capability::AttributeCapabilityTable`]. A single generic compiler walks the
//! [`filter::FilterNode`] tree, drops what the source cannot express, and
//! records the facts routing needs in a [`translator::TranslationState`].
//!
//! ## Basic Usage
//!
//! ```
//! use fedsearch::capability::default_table;
//! use fedsearch::config::SourceConfig;
//! use fedsearch::filter::{FilterBuilder, and_all};
//! use fedsearch::finisher::{QueryFinisher, SortBy};
//! use fedsearch::routing::RoutingDecider;
//! use fedsearch::translator::translate;
//!
//! let config = SourceConfig::builder()
//!     .source_id("wiki")
//!     .default_tag("wiki")
//!     .build();
//! let table = default_table();
//!
//! let filter = and_all(vec![
//!     FilterBuilder::attribute("title").like("red fox"),
//!     FilterBuilder::attribute("abstract").equal("ignored"),
//! ]);
//!
//! let (compiled, state) = translate(&filter, &table, &config);
//! assert!(RoutingDecider::should_query(&compiled, &state, &config));
//!
//! let query = QueryFinisher::new(&table, &config)
//!     .finish(&compiled, Some(&SortBy::descending("created")));
//! assert_eq!(
//!     query,
//!     r#"((title ~ "red" OR title ~ "fox")) order by created DESC"#
//! );
//! ```
//!
//! ## Design
//! - Unsupported attributes, operators and wildcards are dropped, never errors
//! - Malformed input fails fast with [`error::TranslationError`]
//! - [`source::FederatedSource`] ties translation, routing and an async
//!   [`source::SearchTransport`] together and never calls the transport for a
//!   skipped query

pub mod capability;
pub mod config;
pub mod error;
pub mod filter;
pub mod finisher;
pub mod routing;
pub mod source;
pub mod translator;

pub use error::{TranslationError, TransportError};

#[cfg(test)]
#[macro_use]
extern crate quickcheck;
