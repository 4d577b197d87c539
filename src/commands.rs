//! Command table exposed to the host's dispatcher.
//!
//! Each command declares its name, arity and allowed callers up front. The
//! host registers the specs at startup and routes invocations back through
//! [`TeamGamesPlugin::dispatch`](crate::plugin::TeamGamesPlugin::dispatch).

use crate::host::{Caller, GameHost};
use crate::plugin::TeamGamesPlugin;
use crate::TeamGamesError;

/// How many arguments a command takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    /// Arguments are ignored.
    Any,
    /// Exactly this many arguments.
    Exactly(usize),
}

impl Arity {
    /// Whether `count` arguments satisfy this contract.
    pub fn accepts(self, count: usize) -> bool {
        match self {
            Arity::Any => true,
            Arity::Exactly(n) => n == count,
        }
    }
}

/// Who may invoke a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllowedCallers {
    /// In-game players only.
    Players,
    /// Players and the server console.
    PlayersAndConsole,
}

impl AllowedCallers {
    /// Whether `caller` may invoke the command.
    pub fn permits(self, caller: &Caller) -> bool {
        match self {
            AllowedCallers::Players => caller.player().is_some(),
            AllowedCallers::PlayersAndConsole => true,
        }
    }
}

/// Static description of a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandSpec {
    /// Name typed by the caller, without the leading slash.
    pub name: &'static str,
    /// One-line help text.
    pub help: &'static str,
    /// Usage line shown on an arity mismatch.
    pub usage: &'static str,
    /// Argument contract.
    pub arity: Arity,
    /// Permitted callers.
    pub allowed: AllowedCallers,
}

/// `/claim`: redeem pending store purchases.
pub const CLAIM: CommandSpec = CommandSpec {
    name: "claim",
    help: "Claim your purchases",
    usage: "Usage: /claim",
    arity: Arity::Any,
    allowed: AllowedCallers::Players,
};

/// `/teamgames.secret <secret>`: rotate the store secret key.
pub const SET_SECRET: CommandSpec = CommandSpec {
    name: "teamgames.secret",
    help: "Set the TeamGames secret key",
    usage: "Usage: /teamgames.secret <secret>",
    arity: Arity::Exactly(1),
    allowed: AllowedCallers::PlayersAndConsole,
};

/// Every command this plugin provides.
pub const COMMANDS: &[CommandSpec] = &[CLAIM, SET_SECRET];

/// Host-side registration interface.
pub trait CommandDispatcher {
    /// Register a command so the host routes it to the plugin.
    fn register(&mut self, spec: &'static CommandSpec);
}

/// Handler invoked once a command passed the caller and arity checks.
pub type Handler<H> = fn(&mut TeamGamesPlugin<H>, &Caller, &[String]) -> Result<(), TeamGamesError>;

/// A command spec bound to its handler.
pub struct CommandEntry<H: GameHost> {
    /// Declared contract.
    pub spec: &'static CommandSpec,
    /// Implementation.
    pub handler: Handler<H>,
}

/// Build the name-to-handler table.
pub fn command_table<H: GameHost>() -> Vec<CommandEntry<H>> {
    vec![
        CommandEntry {
            spec: &CLAIM,
            handler: |plugin, caller, _args| {
                if let Some(player) = caller.player() {
                    plugin.claim(player);
                }
                Ok(())
            },
        },
        CommandEntry {
            spec: &SET_SECRET,
            handler: |plugin, caller, args| plugin.set_secret(caller, args),
        },
    ]
}

/// Find a command by name, ignoring ASCII case.
pub fn find_command<'a, H: GameHost>(
    table: &'a [CommandEntry<H>],
    name: &str,
) -> Option<&'a CommandEntry<H>> {
    table
        .iter()
        .find(|entry| entry.spec.name.eq_ignore_ascii_case(name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{Player, RecordingHost};

    #[test]
    fn test_arity() {
        assert!(Arity::Any.accepts(0));
        assert!(Arity::Any.accepts(3));
        assert!(Arity::Exactly(1).accepts(1));
        assert!(!Arity::Exactly(1).accepts(0));
        assert!(!Arity::Exactly(1).accepts(2));
    }

    #[test]
    fn test_allowed_callers() {
        let player = Caller::Player(Player::new("1", "P"));
        assert!(AllowedCallers::Players.permits(&player));
        assert!(!AllowedCallers::Players.permits(&Caller::Console));
        assert!(AllowedCallers::PlayersAndConsole.permits(&Caller::Console));
    }

    #[test]
    fn test_table_matches_specs() {
        let table = command_table::<RecordingHost>();
        let names: Vec<_> = table.iter().map(|e| e.spec.name).collect();
        let spec_names: Vec<_> = COMMANDS.iter().map(|s| s.name).collect();
        assert_eq!(names, spec_names);
    }

    #[test]
    fn test_find_command_ignores_case() {
        let table = command_table::<RecordingHost>();
        let name = |n: &str| find_command(&table, n).map(|e| e.spec.name);
        assert_eq!(name("claim"), Some("claim"));
        assert_eq!(name("TeamGames.Secret"), Some("teamgames.secret"));
        assert_eq!(name("shop"), None);
    }
}
