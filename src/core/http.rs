//! HTTP client for the catalog API.
//!
//! One capability-scoped client behind a trait: list a page of a catalog
//! resource, delete an entry by id. The base URL and bearer token are
//! injected once at construction; tests substitute a fake.

use reqwest::blocking::Client;
use serde_json::Value;

use crate::catalog::EntryKind;
use crate::config::ApiConfig;
use crate::error::{Error, Result};

/// Narrow interface the pipeline uses to talk to the catalog service.
pub trait CatalogApi {
    /// Fetch one page (1-indexed) of the resource listing.
    fn list_page(&self, kind: EntryKind, page: u32, page_size: u32) -> Result<Vec<Value>>;

    /// Delete an entry by id. Success on 200/204.
    fn delete(&self, kind: EntryKind, id: &str) -> Result<()>;
}

/// Blocking HTTP client for the catalog API.
pub struct CatalogClient {
    client: Client,
    base_url: String,
    token: String,
}

impl CatalogClient {
    pub fn new(config: &ApiConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.base_url.clone(),
            token: config.token.clone(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }
}

impl CatalogApi for CatalogClient {
    fn list_page(&self, kind: EntryKind, page: u32, page_size: u32) -> Result<Vec<Value>> {
        let url = self.url(kind.resource_path());
        let context = format!("list {} page {}", kind.plural(), page);

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.token)
            .query(&[("page", page), ("per_page", page_size)])
            .send()
            .map_err(|e| Error::api_request_failed(None, e.to_string(), Some(context.clone())))?;

        let status = response.status();
        let body = response
            .text()
            .map_err(|e| Error::api_request_failed(None, e.to_string(), Some(context.clone())))?;

        if !status.is_success() {
            return Err(Error::api_request_failed(
                Some(status.as_u16()),
                body.chars().take(200).collect::<String>(),
                Some(context),
            ));
        }

        let value: Value = serde_json::from_str(&body)
            .map_err(|e| Error::api_unexpected_format(context.clone(), Some(e.to_string())))?;

        extract_entries(&value, &context)
    }

    fn delete(&self, kind: EntryKind, id: &str) -> Result<()> {
        let url = format!("{}/{}", self.url(kind.resource_path()), id);
        let context = format!("delete {} {}", kind.singular(), id);

        let response = self
            .client
            .delete(&url)
            .bearer_auth(&self.token)
            .send()
            .map_err(|e| Error::api_request_failed(None, e.to_string(), Some(context.clone())))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(Error::api_request_failed(
                Some(status.as_u16()),
                body.chars().take(200).collect::<String>(),
                Some(context),
            ));
        }

        Ok(())
    }
}

/// Pull the entry array out of a listing payload.
///
/// The service has returned several shapes over time: `{"data": [...]}`,
/// `{"properties": [...]}`, `{"events": [...]}`, `{"results": [...]}`, and a
/// bare array. Anything else is a format error for that page.
pub(crate) fn extract_entries(value: &Value, context: &str) -> Result<Vec<Value>> {
    if let Value::Array(items) = value {
        return Ok(items.clone());
    }

    if let Value::Object(map) = value {
        for key in ["data", "properties", "events", "results"] {
            if let Some(Value::Array(items)) = map.get(key) {
                return Ok(items.clone());
            }
        }
    }

    let snippet = value.to_string().chars().take(200).collect::<String>();
    Err(Error::api_unexpected_format(
        context.to_string(),
        Some(snippet),
    ))
}
