//! Tenant info retrieval
//!
//! Root organisations (channel id → slug) come from the portal's org
//! search API. The result is persisted as the per-day tenant info table
//! the aggregator joins against.

use std::time::Duration;

use serde::Deserialize;
use serde_json::json;
use tracing::info;

use edpulse_store::{push_file, BlobStore, DataStore};

use crate::error::{ExtractError, Result};
use crate::rows::TenantRow;

#[derive(Debug, Deserialize)]
struct OrgSearchResponse {
    result: OrgSearchResult,
}

#[derive(Debug, Deserialize)]
struct OrgSearchResult {
    response: OrgSearchPayload,
}

#[derive(Debug, Deserialize)]
struct OrgSearchPayload {
    #[serde(default)]
    content: Vec<OrgRecord>,
}

#[derive(Debug, Deserialize)]
struct OrgRecord {
    id: String,
    #[serde(default)]
    slug: Option<String>,
}

/// Fetch root organisations and persist the tenant info table
///
/// Writes `textbook_reports/<partition>/tenant_info.csv` and pushes a
/// backup copy to blob storage.
pub async fn fetch_tenant_info(
    org_search: &str,
    timeout_secs: u64,
    store: &DataStore,
    blob: &dyn BlobStore,
    partition: &str,
) -> Result<Vec<TenantRow>> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| ExtractError::OrgSearch(e.to_string()))?;

    let body = json!({
        "request": {
            "filters": { "isRootOrg": true },
            "fields": ["id", "slug"],
            "limit": 10000
        }
    });

    let response = client
        .post(org_search)
        .json(&body)
        .send()
        .await
        .map_err(|e| ExtractError::OrgSearch(e.to_string()))?;

    if !response.status().is_success() {
        return Err(ExtractError::OrgSearch(format!(
            "org search returned status {}",
            response.status().as_u16()
        )));
    }

    let parsed: OrgSearchResponse = response
        .json()
        .await
        .map_err(|e| ExtractError::MalformedResponse(e.to_string()))?;

    let tenants: Vec<TenantRow> = parsed
        .result
        .response
        .content
        .into_iter()
        .map(|org| TenantRow {
            id: org.id,
            slug: org.slug.unwrap_or_default(),
        })
        .collect();

    let path = store.tenant_info_csv(partition);
    edpulse_store::write_rows(&path, &tenants)?;
    push_file(blob, store, &path, true).await?;

    info!(partition, tenants = tenants.len(), "tenant info written");
    Ok(tenants)
}
