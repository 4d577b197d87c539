//! # TeamGames
//!
//! **Store purchase claims for game servers, backed by the
//! [TeamGames](https://teamgames.io) commerce API.**
//!
//! Players type `/claim`; the plugin posts their identifier to the store API,
//! then grants every purchased item the API returns. Administrators rotate the
//! API secret with `/teamgames.secret <secret>`.
//!
//! ## Flow
//!
//! ```text
//! claim -> build payload -> async POST -> (next tick) interpret -> grant / report
//! ```
//!
//! The HTTP call runs on a tokio runtime supplied by the host. Results are
//! handed back through a channel and processed when the host calls
//! [`TeamGamesPlugin::tick`] from its update loop, so chat messages and item
//! grants always happen on the game thread.
//!
//! ## Quickstart
//!
//! ```no_run
//! use teamgames::{Caller, GameHost, Player, PluginSettings, TeamGamesPlugin};
//!
//! struct Server;
//!
//! impl GameHost for Server {
//!     fn send_message(&self, player: &Player, message: &str) {
//!         println!("[{}] {}", player.display_name, message);
//!     }
//!     fn give_item(&self, player: &Player, item_id: u16, amount: u8) {
//!         println!("give {} x{} to {}", item_id, amount, player.display_name);
//!     }
//! }
//!
//! fn main() -> Result<(), teamgames::TeamGamesError> {
//!     let runtime = tokio::runtime::Runtime::new().expect("runtime");
//!     let mut plugin =
//!         TeamGamesPlugin::with_file_store(PluginSettings::default(), Server, runtime.handle().clone())?;
//!     plugin.load()?;
//!
//!     let player = Player::new("76561198000000001", "Nelson");
//!     plugin.dispatch("claim", &Caller::Player(player), &[])?;
//!
//!     // Inside the server's update loop:
//!     for outcome in plugin.tick() {
//!         println!("{:?}", outcome);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Configuration
//!
//! - `StoreSecretKey` — persisted, defaults to `"default-key"`
//! - [`PluginSettings`] — endpoint, optional timeout, optional admin-only
//!   secret rotation

#![warn(missing_docs)]

// Core modules
pub mod config;
pub mod errors;
pub mod host;

// Protocol layer
pub mod protocol;

// Client layer
pub mod client;

// Persistence
pub mod store;

// Response handling
pub mod claim;

// Commands and lifecycle
pub mod commands;
pub mod plugin;

// Re-exports for public API
pub use claim::{ClaimOutcome, TransactionOutcome};
pub use client::http::{ClaimClient, ClaimResponse};
pub use commands::{CommandDispatcher, CommandSpec};
pub use config::{PluginSettings, StoreConfiguration};
pub use errors::TeamGamesError;
pub use host::{Caller, GameHost, Player, PlayerId};
pub use plugin::TeamGamesPlugin;
pub use protocol::models::{build_claim_payload, parse_transactions, Transaction};
pub use store::{file::FileConfigStore, ConfigStore, MemoryConfigStore};

#[cfg(any(test, feature = "test-seams"))]
pub use host::{Grant, RecordingHost};
