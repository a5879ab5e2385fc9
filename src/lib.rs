//! Pokedex - terminal browser for the Pokémon catalog
//!
//! Pages through the public catalog API, looks entries up by name, filters by type
//! chips and shows per-entry stats.
//!
//! ## Architecture
//!
//! - [`app::App`] owns all UI state. Every user action and every network completion is
//!   an [`types::AppEvent`]; `App::on_event` applies it without I/O and returns the
//!   [`types::Command`]s the runtime should start.
//! - [`effects`] runs commands against a [`api::CatalogApi`] and turns results back into
//!   events. Detail fetches for one batch fan out together ([`hydrate`]).
//! - [`ui`] renders the state with ratatui; the `pokedex` binary owns the terminal and
//!   event loop.
//!
//! ```bash
//! cargo run -- --page-size 20
//! ```

pub mod api;
pub mod app;
pub mod config;
pub mod dedup;
pub mod effects;
pub mod hydrate;
pub mod net;
pub mod pagination;
pub mod theme;
pub mod types;
pub mod ui;

// Re-export commonly used types
pub use app::{App, InputMode};
pub use config::Config;
pub use types::{AppEvent, Command, Item, ItemId};
