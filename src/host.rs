//! Interfaces the game server provides to the plugin.
//!
//! The plugin never touches chat rendering or inventories directly. It talks
//! to the server through [`GameHost`], which keeps the claim logic testable
//! without a running game.

use std::fmt;

/// Stable identifier of a player in the host (e.g. a Steam ID).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PlayerId(pub String);

impl PlayerId {
    /// Borrow the raw identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PlayerId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A connected player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    /// Unique identifier, sent to the store API.
    pub id: PlayerId,
    /// Name shown in chat and logs.
    pub display_name: String,
    /// Whether the host considers this player an administrator.
    pub is_admin: bool,
}

impl Player {
    /// Create a non-admin player.
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: PlayerId(id.into()),
            display_name: display_name.into(),
            is_admin: false,
        }
    }

    /// Mark this player as an administrator.
    pub fn admin(mut self) -> Self {
        self.is_admin = true;
        self
    }
}

/// Who invoked a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Caller {
    /// An in-game player.
    Player(Player),
    /// The server console.
    Console,
}

impl Caller {
    /// Name used in log lines.
    pub fn display_name(&self) -> &str {
        match self {
            Caller::Player(p) => &p.display_name,
            Caller::Console => "Console",
        }
    }

    /// The player behind this caller, if any.
    pub fn player(&self) -> Option<&Player> {
        match self {
            Caller::Player(p) => Some(p),
            Caller::Console => None,
        }
    }
}

/// Game-server side effects available to the plugin.
pub trait GameHost {
    /// Send a chat message to one player.
    fn send_message(&self, player: &Player, message: &str);

    /// Add `amount` units of `item_id` to the player's inventory.
    fn give_item(&self, player: &Player, item_id: u16, amount: u8);
}

/// A recorded item grant.
#[cfg(any(test, feature = "test-seams"))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grant {
    /// Recipient.
    pub player: PlayerId,
    /// Item identifier.
    pub item_id: u16,
    /// Units granted.
    pub amount: u8,
}

/// Host that records every message and grant, for tests.
#[cfg(any(test, feature = "test-seams"))]
#[derive(Debug, Default)]
pub struct RecordingHost {
    messages: std::sync::Mutex<Vec<(PlayerId, String)>>,
    grants: std::sync::Mutex<Vec<Grant>>,
}

#[cfg(any(test, feature = "test-seams"))]
impl RecordingHost {
    /// Create an empty recording host.
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages sent so far, in order.
    pub fn messages(&self) -> Vec<String> {
        self.messages
            .lock()
            .expect("messages lock")
            .iter()
            .map(|(_, m)| m.clone())
            .collect()
    }

    /// Messages sent to a specific player.
    pub fn messages_for(&self, player: &PlayerId) -> Vec<String> {
        self.messages
            .lock()
            .expect("messages lock")
            .iter()
            .filter(|(p, _)| p == player)
            .map(|(_, m)| m.clone())
            .collect()
    }

    /// Grants made so far, in order.
    pub fn grants(&self) -> Vec<Grant> {
        self.grants.lock().expect("grants lock").clone()
    }
}

#[cfg(any(test, feature = "test-seams"))]
impl GameHost for RecordingHost {
    fn send_message(&self, player: &Player, message: &str) {
        self.messages
            .lock()
            .expect("messages lock")
            .push((player.id.clone(), message.to_string()));
    }

    fn give_item(&self, player: &Player, item_id: u16, amount: u8) {
        self.grants.lock().expect("grants lock").push(Grant {
            player: player.id.clone(),
            item_id,
            amount,
        });
    }
}
