//! Druid broker client
//!
//! Executes query bodies against the broker's HTTP endpoint. Two shapes
//! of response are handled: plain groupBy arrays and paginated select
//! result sets. No retries - a failed request fails the calling stage.

use std::time::{Duration, Instant};

use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::error::QueryError;
use crate::result::EventTable;

/// Safety cutoff for paginated result accumulation
///
/// Once the guard column carries more than this many non-null values the
/// pagination loop stops. Results past the cutoff are potentially
/// incomplete; callers must treat them accordingly.
pub const PAGINATION_ROW_LIMIT: usize = 10_000;

/// Druid broker client
pub struct DruidClient {
    client: reqwest::Client,
    endpoint: String,
}

impl DruidClient {
    /// Create a client for the given broker host
    ///
    /// Queries POST to `<host>druid/v2/`.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be constructed.
    pub fn new(host: &str, timeout_secs: u64) -> Result<Self, QueryError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| QueryError::Client(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: format!("{}druid/v2/", host),
        })
    }

    /// POST a query body and return the raw JSON response
    async fn execute(&self, body: &Value) -> Result<Value, QueryError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(body)
            .send()
            .await
            .map_err(|e| QueryError::Connection(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(QueryError::Execution { status, body });
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| QueryError::Parse(e.to_string()))
    }

    /// Execute a groupBy query and flatten its `event` records
    pub async fn group_by(&self, body: &Value) -> Result<EventTable, QueryError> {
        let start = Instant::now();
        let response = self.execute(body).await?;

        let records = response
            .as_array()
            .ok_or_else(|| QueryError::Parse("expected a JSON array of records".into()))?;

        let mut table = EventTable::new();
        for record in records {
            let event = record
                .get("event")
                .and_then(Value::as_object)
                .ok_or_else(|| QueryError::Parse("record missing 'event' object".into()))?;
            table.push(event.clone());
        }

        debug!(
            rows = table.len(),
            time_ms = start.elapsed().as_millis() as u64,
            "groupBy query executed"
        );

        Ok(table)
    }

    /// Execute a select query, following pagination cursors
    ///
    /// Each page's `result.events[*].event` records are accumulated; the
    /// next request echoes back the previous page's
    /// `pagingSpec.pagingIdentifiers`. Terminates on an empty page, or
    /// once `guard_column` carries more than [`PAGINATION_ROW_LIMIT`]
    /// non-null values (safety valve, not a correctness guarantee).
    pub async fn scan_paginated(
        &self,
        body: &Value,
        guard_column: &str,
    ) -> Result<EventTable, QueryError> {
        let mut query = body.clone();
        let mut table = EventTable::new();

        loop {
            let response = self
                .execute(&query)
                .await
                .map_err(|e| QueryError::Pagination(e.to_string()))?;

            let segments = response
                .as_array()
                .ok_or_else(|| QueryError::Pagination("expected a JSON array of segments".into()))?;

            let Some(first) = segments.first() else {
                break;
            };

            if page_events(first)?.is_empty() {
                break;
            }

            for segment in segments {
                for record in page_events(segment)? {
                    let Some(event) = record.get("event").and_then(Value::as_object) else {
                        return Err(QueryError::Pagination("record missing 'event' object".into()));
                    };
                    table.push(strip_timestamp(event));
                }
            }

            if table.non_null_count(guard_column) > PAGINATION_ROW_LIMIT {
                warn!(
                    guard_column,
                    rows = table.len(),
                    "pagination cutoff reached, result may be incomplete"
                );
                return Ok(table);
            }

            let identifiers = first
                .pointer("/result/pagingIdentifiers")
                .cloned()
                .ok_or_else(|| QueryError::Pagination("page missing pagingIdentifiers".into()))?;
            set_paging_identifiers(&mut query, identifiers)?;
        }

        debug!(rows = table.len(), "paginated select completed");
        Ok(table)
    }
}

/// Events array of one response segment
fn page_events(segment: &Value) -> Result<&Vec<Value>, QueryError> {
    segment
        .pointer("/result/events")
        .and_then(Value::as_array)
        .ok_or_else(|| QueryError::Pagination("segment missing result.events".into()))
}

/// Drop the per-event timestamp bookkeeping column
fn strip_timestamp(event: &Map<String, Value>) -> Map<String, Value> {
    let mut row = event.clone();
    row.remove("timestamp");
    row
}

/// Replace the pagination cursor in the query body
fn set_paging_identifiers(query: &mut Value, identifiers: Value) -> Result<(), QueryError> {
    let spec = query
        .get_mut("pagingSpec")
        .and_then(Value::as_object_mut)
        .ok_or_else(|| QueryError::Pagination("query has no pagingSpec".into()))?;
    spec.insert("pagingIdentifiers".to_string(), identifiers);
    Ok(())
}

#[cfg(test)]
#[path = "client_test.rs"]
mod client_test;
