use std::sync::Arc;

use anyhow::Result;
use tokio::sync::mpsc::UnboundedSender;

use crate::api::CatalogApi;
use crate::hydrate::{hydrate, HydrationPolicy};
use crate::types::{AppEvent, Command, Item};

/// Execute one command and turn its outcome into the completion event.
/// Never fails: upstream errors become `*Failed` events (or a placeholder for searches).
pub async fn run_command(api: &dyn CatalogApi, cmd: Command, policy: HydrationPolicy) -> AppEvent {
    match cmd {
        Command::FetchPage { generation, limit, offset } => {
            match fetch_page(api, limit, offset, policy).await {
                Ok((total, items)) => AppEvent::PageLoaded { generation, total, items },
                Err(e) => {
                    log::warn!("[effects] page offset={offset} limit={limit} failed: {e:#}");
                    AppEvent::PageFailed { generation, error: format!("{e:#}") }
                }
            }
        }
        Command::Search { query } => {
            let result = api.get_item(&query).await.map_err(|e| format!("{e:#}"));
            AppEvent::SearchLoaded { query, result }
        }
        Command::FetchCategory { generation, tag } => {
            match fetch_category(api, &tag, policy).await {
                Ok(items) => AppEvent::CategoryLoaded { generation, tag, items },
                Err(e) => {
                    log::warn!("[effects] category '{tag}' failed: {e:#}");
                    AppEvent::CategoryFailed { generation, tag, error: format!("{e:#}") }
                }
            }
        }
    }
}

async fn fetch_page(
    api: &dyn CatalogApi,
    limit: u64,
    offset: u64,
    policy: HydrationPolicy,
) -> Result<(u64, Vec<Item>)> {
    let page = api.list_page(limit, offset).await?;
    let names: Vec<String> = page.results.into_iter().map(|r| r.name).collect();
    let items = hydrate(api, &names, policy).await?;
    Ok((page.count, items))
}

async fn fetch_category(api: &dyn CatalogApi, tag: &str, policy: HydrationPolicy) -> Result<Vec<Item>> {
    let record = api.list_category(tag).await?;
    hydrate(api, &record.member_names(), policy).await
}

/// Run `cmd` on the tokio runtime and forward the completion to the event loop.
/// Commands are never cancelled; superseded results are filtered by generation in `App`.
pub fn spawn_command(
    api: Arc<dyn CatalogApi>,
    cmd: Command,
    policy: HydrationPolicy,
    tx: UnboundedSender<AppEvent>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let ev = run_command(api.as_ref(), cmd, policy).await;
        if tx.send(ev).is_err() {
            log::debug!("[effects] event loop gone, dropping completion");
        }
    })
}
