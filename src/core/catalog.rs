//! Catalog entry model and paginated retrieval.
//!
//! `fetch_all` walks the listing endpoint page by page until exhaustion.
//! A failed page ends the fetch and returns everything accumulated so far —
//! callers must treat an incomplete outcome as a partial view, never as
//! "the catalog is empty".

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::http::CatalogApi;

/// Hard ceiling on pages fetched in one run, against endpoints that keep
/// serving the same last page forever.
pub const PAGE_CEILING: u32 = 20;

pub const DEFAULT_PAGE_SIZE: u32 = 50;

/// Which catalog a run operates on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Event,
    Property,
}

impl EntryKind {
    pub fn resource_path(&self) -> &'static str {
        match self {
            EntryKind::Event => "catalog/events",
            EntryKind::Property => "catalog/properties",
        }
    }

    pub fn singular(&self) -> &'static str {
        match self {
            EntryKind::Event => "event",
            EntryKind::Property => "property",
        }
    }

    pub fn plural(&self) -> &'static str {
        match self {
            EntryKind::Event => "events",
            EntryKind::Property => "properties",
        }
    }
}

/// One named event or property definition, as fetched. Immutable within a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogEntry {
    #[serde(alias = "uid")]
    pub id: String,
    #[serde(default, alias = "eventIdentifier")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

/// Result of walking the listing endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct FetchOutcome {
    pub entries: Vec<CatalogEntry>,
    /// Number of page requests issued (including a trailing empty page).
    pub pages_fetched: u32,
    /// False when the fetch stopped early on a failed page or the ceiling.
    pub complete: bool,
    #[serde(skip_serializing_if = "is_zero")]
    pub duplicates_dropped: usize,
}

fn is_zero(v: &usize) -> bool {
    *v == 0
}

/// Fetch every entry of `kind`, page by page.
///
/// Stops when a page comes back empty, shorter than `page_size`, or the
/// page ceiling is hit. A transport or format failure on a page is logged
/// and ends the fetch with whatever was accumulated (no retry).
pub fn fetch_all(api: &dyn CatalogApi, kind: EntryKind, page_size: u32) -> FetchOutcome {
    let mut entries: Vec<CatalogEntry> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();
    let mut duplicates_dropped = 0usize;
    let mut pages_fetched = 0u32;
    let mut complete = true;
    let mut page = 1u32;

    loop {
        if page > PAGE_CEILING {
            log_status!(
                "fetch",
                "Page ceiling ({}) reached for {}; stopping",
                PAGE_CEILING,
                kind.plural()
            );
            complete = false;
            break;
        }

        let raw = match api.list_page(kind, page, page_size) {
            Ok(raw) => {
                pages_fetched += 1;
                raw
            }
            Err(err) => {
                log_status!(
                    "fetch",
                    "Page {} of {} failed ({}); keeping {} entries fetched so far",
                    page,
                    kind.plural(),
                    err,
                    entries.len()
                );
                pages_fetched += 1;
                complete = false;
                break;
            }
        };

        if raw.is_empty() {
            break;
        }

        let page_count = raw.len();
        for value in raw {
            let entry: CatalogEntry = match serde_json::from_value(value) {
                Ok(entry) => entry,
                Err(err) => {
                    log_status!("fetch", "Skipping malformed entry on page {}: {}", page, err);
                    continue;
                }
            };
            if entry.id.is_empty() {
                log_status!("fetch", "Skipping entry without id on page {}", page);
                continue;
            }
            if seen.insert(entry.id.clone()) {
                entries.push(entry);
            } else {
                duplicates_dropped += 1;
            }
        }

        log_status!("fetch", "Page {}: {} {}", page, page_count, kind.plural());

        if (page_count as u32) < page_size {
            break;
        }
        page += 1;
    }

    if duplicates_dropped > 0 {
        log_status!(
            "fetch",
            "Dropped {} duplicate {} across pages",
            duplicates_dropped,
            kind.plural()
        );
    }
    log_status!(
        "fetch",
        "Total {} fetched: {}",
        kind.plural(),
        entries.len()
    );

    FetchOutcome {
        entries,
        pages_fetched,
        complete,
        duplicates_dropped,
    }
}
