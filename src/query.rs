//! Endpoint-failover table reads
//!
//! A minimal chain query client that implements only the one RPC method the
//! app actually needs (`get_table_rows`), trying each configured endpoint in
//! priority order and returning the first usable response.

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

/// Body of a `POST /v1/chain/get_table_rows` request
#[derive(Debug, Clone, Serialize)]
pub struct TableQuery {
    pub code: String,
    pub scope: String,
    pub table: String,
    pub json: bool,
    pub limit: u32,
}

impl TableQuery {
    pub fn new(code: &str, scope: &str, table: &str) -> Self {
        Self {
            code: code.to_string(),
            scope: scope.to_string(),
            table: table.to_string(),
            json: true,
            limit: 1,
        }
    }
}

/// Chain query client with sequential endpoint failover
#[derive(Debug, Clone)]
pub struct QueryClient {
    endpoints: Vec<String>,
    http: reqwest::Client,
}

impl QueryClient {
    pub fn new(endpoints: Vec<String>) -> Self {
        Self {
            endpoints,
            http: reqwest::Client::new(),
        }
    }

    /// Read table rows, trying each endpoint in order and stopping at the
    /// first transport-successful, well-formed response. Unreachable
    /// endpoints and malformed bodies are skipped. Returns `None` only when
    /// every endpoint is exhausted; callers decide whether that is an error.
    /// An empty `rows` array is a valid response, not a failure.
    pub async fn get_table_rows(&self, query: &TableQuery) -> Option<Vec<Value>> {
        for endpoint in &self.endpoints {
            let url = format!(
                "{}/v1/chain/get_table_rows",
                endpoint.trim_end_matches('/')
            );

            let response = match self.http.post(&url).json(query).send().await {
                Ok(response) => response,
                Err(err) => {
                    debug!(%endpoint, table = %query.table, "endpoint unreachable: {err}");
                    continue;
                }
            };

            if !response.status().is_success() {
                debug!(
                    %endpoint,
                    table = %query.table,
                    status = %response.status(),
                    "endpoint returned non-OK status"
                );
                continue;
            }

            let body: Value = match response.json().await {
                Ok(body) => body,
                Err(err) => {
                    debug!(%endpoint, table = %query.table, "malformed response body: {err}");
                    continue;
                }
            };

            match body.get("rows").and_then(Value::as_array) {
                Some(rows) => return Some(rows.clone()),
                None => {
                    debug!(%endpoint, table = %query.table, "response missing rows field");
                    continue;
                }
            }
        }

        debug!(table = %query.table, "all endpoints exhausted");
        None
    }
}
