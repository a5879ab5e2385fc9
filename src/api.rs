//! Upstream catalog client.
//!
//! Three read-only endpoints are consumed:
//! - `pokemon/?limit=<n>&offset=<m>` - one page of summary references plus the total count
//! - `pokemon/<name-or-id>` - one full record
//! - `type/<name>` - members of a category
//!
//! [`CatalogApi`] is the seam the orchestrator talks to; [`PokeApi`] is the reqwest
//! implementation.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::sync::OnceLock;
use std::time::Duration;

use crate::types::{CategoryRecord, Item, ItemRecord, ListingPage};

pub const DEFAULT_API_URL: &str = "https://pokeapi.co/api/v2/";

#[async_trait]
pub trait CatalogApi: Send + Sync {
    async fn list_page(&self, limit: u64, offset: u64) -> Result<ListingPage>;
    async fn get_item(&self, name: &str) -> Result<Item>;
    async fn list_category(&self, name: &str) -> Result<CategoryRecord>;
}

static HTTP: OnceLock<reqwest::Client> = OnceLock::new();

pub(crate) fn http_client() -> &'static reqwest::Client {
    HTTP.get_or_init(|| {
        reqwest::Client::builder()
            .pool_max_idle_per_host(8)
            .tcp_nodelay(true)
            .build()
            .unwrap_or_else(|e| {
                log::warn!("[api] falling back to default client: {e}");
                reqwest::Client::new()
            })
    })
}

#[derive(Clone, Debug)]
pub struct PokeApi {
    base_url: String,
    timeout_ms: u64,
    retries: u32,
}

impl PokeApi {
    pub fn new(base_url: &str, timeout_ms: u64, retries: u32) -> Self {
        Self {
            base_url: normalize_base(base_url),
            timeout_ms,
            retries,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn listing_url(&self, limit: u64, offset: u64) -> String {
        format!("{}pokemon/?limit={limit}&offset={offset}", self.base_url)
    }

    pub fn item_url(&self, name: &str) -> String {
        format!("{}pokemon/{}", self.base_url, encode_segment(name))
    }

    pub fn category_url(&self, name: &str) -> String {
        format!("{}type/{}", self.base_url, encode_segment(name))
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        log::debug!("[api] GET {url}");
        let request = http_client()
            .get(url)
            .timeout(Duration::from_millis(self.timeout_ms));

        let response = crate::net::send_with_backoff(request, url, self.retries)
            .await
            .map_err(|e| anyhow!("Failed to reach catalog API: {e}"))?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(anyhow!("not found: {url}"));
        }
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(anyhow!("Catalog API error ({status}): {error_text}"));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| anyhow!("Failed to parse catalog response from {url}: {e}"))
    }
}

#[async_trait]
impl CatalogApi for PokeApi {
    async fn list_page(&self, limit: u64, offset: u64) -> Result<ListingPage> {
        let page: ListingPage = self.get_json(&self.listing_url(limit, offset)).await?;
        log::info!(
            "[api] listing offset={offset} limit={limit}: {} refs of {}",
            page.results.len(),
            page.count
        );
        Ok(page)
    }

    async fn get_item(&self, name: &str) -> Result<Item> {
        if name.trim().is_empty() {
            return Err(anyhow!("empty item name"));
        }
        let record: ItemRecord = self.get_json(&self.item_url(name)).await?;
        Ok(record.into())
    }

    async fn list_category(&self, name: &str) -> Result<CategoryRecord> {
        let record: CategoryRecord = self.get_json(&self.category_url(name)).await?;
        log::info!("[api] category {name}: {} members", record.pokemon.len());
        Ok(record)
    }
}

fn normalize_base(url: &str) -> String {
    let trimmed = url.trim();
    if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{trimmed}/")
    }
}

/// Upstream names are lowercase slugs
fn encode_segment(name: &str) -> String {
    urlencoding::encode(&name.trim().to_lowercase()).into_owned()
}
