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

//! Common helpers for translation integration tests

use fedsearch::TransportError;
use fedsearch::config::SourceConfig;
use fedsearch::source::SearchTransport;
use serde_json::{Value, json};
use std::sync::Mutex;

/// Configuration of a source tagged `wiki`, without fixed scope
pub fn wiki_config() -> SourceConfig {
    SourceConfig::builder()
        .source_id("wiki")
        .default_tag("wiki")
        .build()
}

/// Configuration of a source tagged `wiki`, confined to scope `alpha`
#[allow(dead_code)]
pub fn scoped_wiki_config() -> SourceConfig {
    SourceConfig::builder()
        .source_id("wiki")
        .default_tag("wiki")
        .fixed_scope("alpha")
        .build()
}

/// Transport that records every query and answers with one record per call
#[allow(dead_code)]
#[derive(Debug, Default)]
pub struct RecordingTransport {
    queries: Mutex<Vec<String>>,
}

#[allow(dead_code)]
impl RecordingTransport {
    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl SearchTransport for RecordingTransport {
    async fn search(&self, query: &str) -> Result<Vec<Value>, TransportError> {
        self.queries.lock().unwrap().push(query.to_string());
        Ok(vec![json!({"id": "record-1", "title": "Red fox"})])
    }
}
