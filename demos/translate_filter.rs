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

//! Prints what a source would be sent for a filter.
//!
//! ```text
//! echo '{"type":"compare","attribute":"title","op":"like","literal":"red fox"}' \
//!     | cargo run --example translate_filter -- --sort created:desc
//! ```

use clap::Parser;
use fedsearch::capability::{AttributeCapabilityTable, default_table};
use fedsearch::config::SourceConfig;
use fedsearch::filter::FilterNode;
use fedsearch::finisher::{SortBy, SortDirection};
use fedsearch::source::{FederatedSource, QueryPlan, SearchTransport};
use fedsearch::TransportError;
use serde_json::Value;
use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;

/// Translate a filter tree for one federated source
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Filter JSON file; reads stdin when omitted
    filter: Option<PathBuf>,

    /// Source configuration JSON file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Capability table JSON file; the built-in table is used when omitted
    #[arg(short = 't', long)]
    capabilities: Option<PathBuf>,

    /// Fixed scope, overriding the configuration
    #[arg(short, long)]
    scope: Option<String>,

    /// Sort as `attribute[:asc|desc]`
    #[arg(long)]
    sort: Option<String>,
}

/// Transport that is never called; the demo only plans.
struct NoTransport;

#[async_trait::async_trait]
impl SearchTransport for NoTransport {
    async fn search(&self, _query: &str) -> Result<Vec<Value>, TransportError> {
        Err(TransportError::Other("demo does not send queries".to_string()))
    }
}

fn parse_sort(value: &str) -> Result<SortBy, fedsearch::TranslationError> {
    match value.split_once(':') {
        Some((attribute, direction)) => Ok(SortBy::new(attribute, direction.parse::<SortDirection>()?)),
        None => Ok(SortBy::ascending(value)),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    env_logger::init(); // Note: set environment variable RUST_LOG="DEBUG" to see dropped predicates
    let args = Args::parse();

    let filter_json = match &args.filter {
        Some(path) => std::fs::read_to_string(path)?,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };
    let filter = FilterNode::from_json(&filter_json)?;

    let mut config = match &args.config {
        Some(path) => SourceConfig::from_json(&std::fs::read_to_string(path)?)?,
        None => SourceConfig::builder()
            .source_id("demo")
            .default_tag("demo")
            .build(),
    };
    if let Some(scope) = args.scope {
        config.fixed_scope = Some(scope);
    }

    let table = match &args.capabilities {
        Some(path) => Arc::new(AttributeCapabilityTable::from_json(&std::fs::read_to_string(path)?)?),
        None => default_table(),
    };

    let sort = args.sort.as_deref().map(parse_sort).transpose()?;

    let source = FederatedSource::new(config, table, NoTransport)?;
    match source.plan(&filter, sort.as_ref())? {
        QueryPlan::Send { query, warnings } => {
            println!("send: {query}");
            for warning in warnings {
                println!("warning: {warning}");
            }
        }
        QueryPlan::Skip { reason } => println!("skip: {reason}"),
    }
    Ok(())
}
