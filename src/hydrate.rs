//! Batch hydration: turn summary names into full items.
//!
//! All detail requests of a batch are issued together and joined before anything is
//! returned, so the state machine only ever sees a complete batch.

use anyhow::{anyhow, Result};
use futures::future::join_all;
use std::fmt;

use crate::api::CatalogApi;
use crate::types::Item;

/// What a failed detail fetch does to its batch
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum HydrationPolicy {
    /// One failure fails the whole batch
    #[default]
    AllOrNothing,
    /// Failed entries are dropped, the rest are kept in order
    Partial,
}

impl std::str::FromStr for HydrationPolicy {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "all" | "all-or-nothing" | "strict" => Ok(HydrationPolicy::AllOrNothing),
            "partial" => Ok(HydrationPolicy::Partial),
            _ => Err(anyhow!("Invalid hydration policy '{s}'. Valid options: all, partial")),
        }
    }
}

impl fmt::Display for HydrationPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HydrationPolicy::AllOrNothing => write!(f, "all"),
            HydrationPolicy::Partial => write!(f, "partial"),
        }
    }
}

pub async fn hydrate(
    api: &dyn CatalogApi,
    names: &[String],
    policy: HydrationPolicy,
) -> Result<Vec<Item>> {
    if names.is_empty() {
        return Ok(Vec::new());
    }
    log::debug!("[hydrate] fetching {} details ({policy})", names.len());

    let results = join_all(names.iter().map(|name| api.get_item(name))).await;

    let mut items = Vec::with_capacity(results.len());
    let mut failed = 0usize;
    for (name, res) in names.iter().zip(results) {
        match res {
            Ok(item) => items.push(item),
            Err(e) => match policy {
                HydrationPolicy::AllOrNothing => {
                    return Err(e.context(format!("hydrating '{name}'")));
                }
                HydrationPolicy::Partial => {
                    log::warn!("[hydrate] dropping '{name}': {e}");
                    failed += 1;
                }
            },
        }
    }

    if failed > 0 {
        log::info!("[hydrate] kept {} of {} items", items.len(), names.len());
    }
    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_parse() {
        assert_eq!("all".parse::<HydrationPolicy>().unwrap(), HydrationPolicy::AllOrNothing);
        assert_eq!("Partial".parse::<HydrationPolicy>().unwrap(), HydrationPolicy::Partial);
        assert!("some".parse::<HydrationPolicy>().is_err());
    }

    #[test]
    fn test_policy_display_round_trips_through_parse() {
        for p in [HydrationPolicy::AllOrNothing, HydrationPolicy::Partial] {
            assert_eq!(p.to_string().parse::<HydrationPolicy>().unwrap(), p);
        }
    }
}
