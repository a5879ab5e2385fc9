use serde::Deserialize;
use std::fmt;

use crate::pagination::PageSize;

/// Identity of a catalog entry.
///
/// Upstream records carry a numeric id. Failed searches produce a placeholder that
/// shares the single `NotFound` sentinel, so two failed searches collide under dedup.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ItemId {
    Number(u32),
    NotFound,
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemId::Number(n) => write!(f, "{n}"),
            ItemId::NotFound => write!(f, "not found"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Stat {
    pub name: String,
    pub value: u32,
}

/// One displayed catalog entry
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    pub image: Option<String>,
    pub tags: Vec<String>,
    pub stats: Vec<Stat>,
}

impl Item {
    /// Stand-in shown at the top of the list when a name lookup fails
    pub fn placeholder(query: &str) -> Self {
        Self {
            id: ItemId::NotFound,
            name: format!("{query} not found"),
            image: None,
            tags: Vec::new(),
            stats: Vec::new(),
        }
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    pub fn is_placeholder(&self) -> bool {
        self.id == ItemId::NotFound
    }
}

// ===============================
// Upstream wire shapes
// ===============================

#[derive(Clone, Debug, Default, Deserialize)]
pub struct NamedRef {
    #[serde(default)]
    pub name: String,
}

/// `GET pokemon/?limit=&offset=`
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ListingPage {
    #[serde(default = "default_count")]
    pub count: u64,
    #[serde(default)]
    pub results: Vec<NamedRef>,
}

fn default_count() -> u64 {
    1
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct Sprites {
    #[serde(default)]
    pub front_default: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct TypeSlot {
    #[serde(rename = "type")]
    pub kind: NamedRef,
}

#[derive(Clone, Debug, Deserialize)]
pub struct StatSlot {
    pub stat: NamedRef,
    #[serde(default)]
    pub base_stat: u32,
}

/// `GET pokemon/<name>`
#[derive(Clone, Debug, Deserialize)]
pub struct ItemRecord {
    pub id: u32,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub sprites: Sprites,
    #[serde(default)]
    pub types: Vec<TypeSlot>,
    #[serde(default)]
    pub stats: Vec<StatSlot>,
}

impl From<ItemRecord> for Item {
    fn from(r: ItemRecord) -> Self {
        Item {
            id: ItemId::Number(r.id),
            name: r.name,
            image: r.sprites.front_default,
            tags: r.types.into_iter().map(|t| t.kind.name).collect(),
            stats: r
                .stats
                .into_iter()
                .map(|s| Stat { name: s.stat.name, value: s.base_stat })
                .collect(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct CategoryMember {
    pub pokemon: NamedRef,
}

/// `GET type/<name>`
#[derive(Clone, Debug, Default, Deserialize)]
pub struct CategoryRecord {
    #[serde(default)]
    pub pokemon: Vec<CategoryMember>,
}

impl CategoryRecord {
    pub fn member_names(&self) -> Vec<String> {
        self.pokemon.iter().map(|m| m.pokemon.name.clone()).collect()
    }
}

// ===============================
// Messages
// ===============================

/// Everything that can move the state machine: user actions and network completions.
#[derive(Debug, Clone)]
pub enum AppEvent {
    Init,
    Reload,
    PageChanged(u64),
    PageSizeChanged(PageSize),
    PageLoaded { generation: u64, total: u64, items: Vec<Item> },
    PageFailed { generation: u64, error: String },
    SearchInput(String),
    SearchSubmitted,
    SearchLoaded { query: String, result: Result<Item, String> },
    TagClicked(String),
    CategoryLoaded { generation: u64, tag: String, items: Vec<Item> },
    CategoryFailed { generation: u64, tag: String, error: String },
    TagRemoved(String),
    OpenStats(usize),
    CloseStats,
    Quit,
}

/// Upstream work requested by a transition; executed by `effects`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    FetchPage { generation: u64, limit: u64, offset: u64 },
    Search { query: String },
    FetchCategory { generation: u64, tag: String },
}
