//! TeamGames plugin - the main public API.
//!
//! `TeamGamesPlugin` owns everything the claim flow needs:
//! - Persisted store configuration and the backend that saves it
//! - The HTTP client and a runtime handle to run requests on
//! - The channel finished requests come back through
//!
//! The host calls [`TeamGamesPlugin::tick`] from its update loop; responses
//! are interpreted there, on the game thread, never on a runtime worker.

use crate::claim::{handle_completion, messages, ClaimOutcome};
use crate::client::http::{ClaimClient, ClaimResponse};
use crate::commands::{command_table, find_command, CommandDispatcher, CommandEntry, COMMANDS};
use crate::config::{PluginSettings, StoreConfiguration};
use crate::host::{Caller, GameHost, Player};
use crate::protocol::models::build_claim_payload;
use crate::store::file::FileConfigStore;
use crate::store::ConfigStore;
use crate::TeamGamesError;
use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

/// A finished request waiting for the next tick.
#[derive(Debug)]
struct ClaimCompletion {
    player: Player,
    result: Result<ClaimResponse, TeamGamesError>,
}

/// The claim plugin.
///
/// Create one instance per server and keep it for the server's lifetime.
pub struct TeamGamesPlugin<H: GameHost> {
    settings: PluginSettings,
    config: StoreConfiguration,
    store: Box<dyn ConfigStore>,
    client: ClaimClient,
    host: H,
    runtime: Handle,
    completions_tx: UnboundedSender<ClaimCompletion>,
    completions_rx: UnboundedReceiver<ClaimCompletion>,
    commands: Vec<CommandEntry<H>>,
    in_flight: usize,
    loaded: bool,
}

impl<H: GameHost> TeamGamesPlugin<H> {
    /// Create a plugin with an explicit configuration store.
    ///
    /// The configuration is not read until [`load`](Self::load).
    ///
    /// # Errors
    /// Returns an error if:
    /// - Settings validation fails
    /// - HTTP client creation fails
    pub fn new(
        settings: PluginSettings,
        host: H,
        store: Box<dyn ConfigStore>,
        runtime: Handle,
    ) -> Result<Self, TeamGamesError> {
        settings.validate()?;
        let client = ClaimClient::new(&settings)?;
        let (completions_tx, completions_rx) = mpsc::unbounded_channel();

        Ok(Self {
            settings,
            config: StoreConfiguration::default(),
            store,
            client,
            host,
            runtime,
            completions_tx,
            completions_rx,
            commands: command_table(),
            in_flight: 0,
            loaded: false,
        })
    }

    /// Create a plugin that keeps its configuration under the platform
    /// config directory.
    pub fn with_file_store(
        settings: PluginSettings,
        host: H,
        runtime: Handle,
    ) -> Result<Self, TeamGamesError> {
        let store = FileConfigStore::new(settings.config_namespace)?;
        Self::new(settings, host, Box::new(store), runtime)
    }

    /// Read the persisted configuration. Call once at startup.
    pub fn load(&mut self) -> Result<(), TeamGamesError> {
        self.config = self.store.load()?;
        if self.completions_tx.is_closed() {
            self.open_channel();
        }
        self.loaded = true;
        tracing::info!("TeamGames plugin has been loaded.");
        Ok(())
    }

    /// Stop the plugin. Requests already issued still run to completion but
    /// their results are dropped.
    pub fn unload(&mut self) {
        if self.in_flight > 0 {
            tracing::info!(in_flight = self.in_flight, "unloading with claims in flight");
        }
        self.completions_rx.close();
        self.loaded = false;
        tracing::info!("TeamGames plugin has been unloaded.");
    }

    fn open_channel(&mut self) {
        let (completions_tx, completions_rx) = mpsc::unbounded_channel();
        self.completions_tx = completions_tx;
        self.completions_rx = completions_rx;
        self.in_flight = 0;
    }

    /// Register every command with the host dispatcher.
    pub fn register_commands(&self, dispatcher: &mut dyn CommandDispatcher) {
        for spec in COMMANDS {
            dispatcher.register(spec);
        }
    }

    /// Route a command invocation from the host.
    ///
    /// Caller and arity checks happen here, before the handler runs.
    pub fn dispatch(
        &mut self,
        name: &str,
        caller: &Caller,
        args: &[String],
    ) -> Result<(), TeamGamesError> {
        let (spec, handler) = find_command(&self.commands, name)
            .map(|entry| (entry.spec, entry.handler))
            .ok_or_else(|| TeamGamesError::UnknownCommand(name.to_string()))?;

        if !spec.allowed.permits(caller) {
            tracing::warn!(
                command = spec.name,
                caller = caller.display_name(),
                "command can only be used by players"
            );
            return Ok(());
        }

        if !spec.arity.accepts(args.len()) {
            self.reply(caller, spec.usage);
            return Ok(());
        }

        handler(self, caller, args)
    }

    /// Start a claim for `player`.
    ///
    /// Sends the in-progress notice and returns immediately; the outcome is
    /// delivered on a later [`tick`](Self::tick).
    pub fn claim(&mut self, player: &Player) {
        let payload = match build_claim_payload(player.id.as_str()) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::error!(player = %player.display_name, error = %e, "failed to build claim payload");
                self.host.send_message(player, messages::PROCESSING_ERROR);
                return;
            }
        };

        tracing::info!(url = self.client.url(), payload = %payload, "sending request to API");
        self.host.send_message(player, messages::PROCESSING);

        let client = self.client.clone();
        let api_key = self.config.store_secret_key.clone();
        let tx = self.completions_tx.clone();
        let player = player.clone();

        self.in_flight += 1;
        self.runtime.spawn(async move {
            let result = client.send_claim(payload, &api_key).await;
            if let Err(unsent) = tx.send(ClaimCompletion { player, result }) {
                tracing::warn!(
                    player = %unsent.0.player.display_name,
                    "claim finished after unload, result dropped"
                );
            }
        });
    }

    /// Rotate the store secret key.
    ///
    /// Expects exactly one argument. Usage and confirmations go to a player
    /// caller's chat, or to the log for the console.
    pub fn set_secret(&mut self, caller: &Caller, args: &[String]) -> Result<(), TeamGamesError> {
        if self.settings.restrict_secret_to_admins {
            if let Caller::Player(player) = caller {
                if !player.is_admin {
                    self.host
                        .send_message(player, "Command Reserved for Administrators");
                    return Ok(());
                }
            }
        }

        let [secret] = args else {
            self.reply(caller, crate::commands::SET_SECRET.usage);
            return Ok(());
        };

        self.config.store_secret_key = secret.clone();
        if let Err(e) = self.store.save(&self.config) {
            tracing::error!(error = %e, "failed to persist store secret key");
            self.reply(caller, "Failed to save the store secret key.");
            return Err(e);
        }

        if let Caller::Player(player) = caller {
            self.host
                .send_message(player, "Store secret key has been updated.");
        }
        tracing::info!(
            "Store secret key has been updated by {}.",
            caller.display_name()
        );
        Ok(())
    }

    /// Deliver finished claims. Call from the host's update loop.
    ///
    /// Returns the outcome of every claim completed since the last tick.
    pub fn tick(&mut self) -> Vec<ClaimOutcome> {
        let mut outcomes = Vec::new();
        while let Ok(completion) = self.completions_rx.try_recv() {
            self.in_flight = self.in_flight.saturating_sub(1);
            outcomes.push(handle_completion(
                &self.host,
                &completion.player,
                completion.result,
            ));
        }
        outcomes
    }

    /// Claims issued but not yet delivered by [`tick`](Self::tick).
    pub fn pending_claims(&self) -> usize {
        self.in_flight
    }

    /// Whether [`load`](Self::load) has run.
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Current store configuration.
    pub fn config(&self) -> &StoreConfiguration {
        &self.config
    }

    /// Runtime settings.
    pub fn settings(&self) -> &PluginSettings {
        &self.settings
    }

    /// The game host.
    pub fn host(&self) -> &H {
        &self.host
    }

    fn reply(&self, caller: &Caller, message: &str) {
        match caller {
            Caller::Player(player) => self.host.send_message(player, message),
            Caller::Console => tracing::info!("{}", message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::CommandSpec;
    use crate::host::RecordingHost;
    use crate::store::MemoryConfigStore;
    use std::time::Duration;
    use tempfile::TempDir;

    fn plugin_with(
        settings: PluginSettings,
        store: Box<dyn ConfigStore>,
    ) -> TeamGamesPlugin<RecordingHost> {
        TeamGamesPlugin::new(settings, RecordingHost::new(), store, Handle::current()).unwrap()
    }

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[derive(Default)]
    struct ListDispatcher(Vec<&'static str>);

    impl CommandDispatcher for ListDispatcher {
        fn register(&mut self, spec: &'static CommandSpec) {
            self.0.push(spec.name);
        }
    }

    #[tokio::test]
    async fn test_invalid_settings_rejected() {
        let settings = PluginSettings {
            api_url: String::new(),
            ..PluginSettings::default()
        };
        let result = TeamGamesPlugin::new(
            settings,
            RecordingHost::new(),
            Box::new(MemoryConfigStore::new()),
            Handle::current(),
        );
        assert!(matches!(result, Err(TeamGamesError::ConfigError(_))));
    }

    #[tokio::test]
    async fn test_load_reads_store() {
        let store = MemoryConfigStore::with_config(StoreConfiguration {
            store_secret_key: "persisted".to_string(),
        });
        let mut plugin = plugin_with(PluginSettings::default(), Box::new(store));
        assert!(!plugin.is_loaded());

        plugin.load().unwrap();
        assert!(plugin.is_loaded());
        assert_eq!(plugin.config().store_secret_key, "persisted");
    }

    #[tokio::test]
    async fn test_register_commands() {
        let plugin = plugin_with(PluginSettings::default(), Box::new(MemoryConfigStore::new()));
        let mut dispatcher = ListDispatcher::default();
        plugin.register_commands(&mut dispatcher);
        assert_eq!(dispatcher.0, vec!["claim", "teamgames.secret"]);
    }

    #[tokio::test]
    async fn test_set_secret_persists() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileConfigStore::with_path(temp_dir.path().to_path_buf()).unwrap();
        let mut plugin = plugin_with(PluginSettings::default(), Box::new(store));
        plugin.load().unwrap();

        let caller = Caller::Player(Player::new("1", "Owner"));
        plugin.set_secret(&caller, &args(&["sk_new"])).unwrap();

        assert_eq!(plugin.config().store_secret_key, "sk_new");
        assert_eq!(
            plugin.host().messages(),
            vec!["Store secret key has been updated."]
        );

        let mut reopened = FileConfigStore::with_path(temp_dir.path().to_path_buf()).unwrap();
        assert_eq!(reopened.load().unwrap().store_secret_key, "sk_new");
    }

    #[tokio::test]
    async fn test_set_secret_wrong_arity_player() {
        let mut plugin = plugin_with(PluginSettings::default(), Box::new(MemoryConfigStore::new()));
        plugin.load().unwrap();
        let caller = Caller::Player(Player::new("1", "Owner"));

        plugin.set_secret(&caller, &args(&[])).unwrap();
        plugin.set_secret(&caller, &args(&["a", "b"])).unwrap();

        assert_eq!(plugin.config().store_secret_key, "default-key");
        assert_eq!(
            plugin.host().messages(),
            vec![
                "Usage: /teamgames.secret <secret>",
                "Usage: /teamgames.secret <secret>"
            ]
        );
    }

    #[tokio::test]
    async fn test_set_secret_from_console() {
        let mut plugin = plugin_with(PluginSettings::default(), Box::new(MemoryConfigStore::new()));
        plugin.load().unwrap();

        plugin.set_secret(&Caller::Console, &args(&[])).unwrap();
        assert_eq!(plugin.config().store_secret_key, "default-key");

        plugin.set_secret(&Caller::Console, &args(&["console-key"])).unwrap();
        assert_eq!(plugin.config().store_secret_key, "console-key");
        // The console has no chat sink.
        assert!(plugin.host().messages().is_empty());
    }

    #[tokio::test]
    async fn test_admin_restriction() {
        let settings = PluginSettings {
            restrict_secret_to_admins: true,
            ..PluginSettings::default()
        };
        let mut plugin = plugin_with(settings, Box::new(MemoryConfigStore::new()));
        plugin.load().unwrap();

        let regular = Caller::Player(Player::new("1", "Regular"));
        plugin.set_secret(&regular, &args(&["nope"])).unwrap();
        assert_eq!(plugin.config().store_secret_key, "default-key");
        assert_eq!(
            plugin.host().messages(),
            vec!["Command Reserved for Administrators"]
        );

        let admin = Caller::Player(Player::new("2", "Admin").admin());
        plugin.set_secret(&admin, &args(&["yes"])).unwrap();
        assert_eq!(plugin.config().store_secret_key, "yes");

        plugin.set_secret(&Caller::Console, &args(&["console"])).unwrap();
        assert_eq!(plugin.config().store_secret_key, "console");
    }

    #[tokio::test]
    async fn test_dispatch_unknown_command() {
        let mut plugin = plugin_with(PluginSettings::default(), Box::new(MemoryConfigStore::new()));
        let result = plugin.dispatch("shop", &Caller::Console, &[]);
        assert!(matches!(result, Err(TeamGamesError::UnknownCommand(_))));
    }

    #[tokio::test]
    async fn test_dispatch_claim_from_console_is_refused() {
        let mut plugin = plugin_with(PluginSettings::default(), Box::new(MemoryConfigStore::new()));
        plugin.dispatch("claim", &Caller::Console, &[]).unwrap();
        assert_eq!(plugin.pending_claims(), 0);
    }

    #[tokio::test]
    async fn test_dispatch_secret_arity() {
        let mut plugin = plugin_with(PluginSettings::default(), Box::new(MemoryConfigStore::new()));
        plugin.load().unwrap();
        let caller = Caller::Player(Player::new("1", "Owner"));

        plugin.dispatch("teamgames.secret", &caller, &args(&["a", "b"])).unwrap();
        assert_eq!(plugin.config().store_secret_key, "default-key");
        assert_eq!(
            plugin.host().messages(),
            vec!["Usage: /teamgames.secret <secret>"]
        );

        plugin.dispatch("teamgames.secret", &caller, &args(&["k"])).unwrap();
        assert_eq!(plugin.config().store_secret_key, "k");
    }

    async fn refused_url() -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        format!("http://{}/update", addr)
    }

    async fn drain(plugin: &mut TeamGamesPlugin<RecordingHost>) -> Vec<ClaimOutcome> {
        let mut outcomes = Vec::new();
        for _ in 0..500 {
            outcomes.extend(plugin.tick());
            if plugin.pending_claims() == 0 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        outcomes
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_claim_after_reload_is_delivered() {
        let settings = PluginSettings {
            api_url: refused_url().await,
            request_timeout: Some(Duration::from_secs(5)),
            ..PluginSettings::default()
        };
        let mut plugin = plugin_with(settings, Box::new(MemoryConfigStore::new()));
        plugin.load().unwrap();
        plugin.unload();
        plugin.load().unwrap();

        let player = Player::new("76561198000000001", "Nelson");
        plugin.claim(&player);
        assert_eq!(plugin.pending_claims(), 1);

        let outcomes = drain(&mut plugin).await;
        assert_eq!(outcomes, vec![ClaimOutcome::TransportFailed]);
        assert_eq!(plugin.pending_claims(), 0);
        assert_eq!(
            plugin.host().messages(),
            vec![messages::PROCESSING, messages::TRANSPORT_ERROR]
        );
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_reload_resets_in_flight_count() {
        let settings = PluginSettings {
            api_url: refused_url().await,
            request_timeout: Some(Duration::from_secs(5)),
            ..PluginSettings::default()
        };
        let mut plugin = plugin_with(settings, Box::new(MemoryConfigStore::new()));
        plugin.load().unwrap();
        plugin.claim(&Player::new("1", "A"));
        plugin.unload();
        plugin.load().unwrap();

        assert_eq!(plugin.pending_claims(), 0);
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(plugin.tick().is_empty());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_claim_transport_failure_reaches_player() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let settings = PluginSettings {
            api_url: format!("http://{}/update", addr),
            request_timeout: Some(Duration::from_secs(5)),
            ..PluginSettings::default()
        };
        let mut plugin = plugin_with(settings, Box::new(MemoryConfigStore::new()));
        plugin.load().unwrap();

        let player = Player::new("76561198000000001", "Nelson");
        plugin.claim(&player);
        assert_eq!(plugin.pending_claims(), 1);
        assert_eq!(plugin.host().messages(), vec![messages::PROCESSING]);

        let mut outcomes = Vec::new();
        for _ in 0..500 {
            outcomes.extend(plugin.tick());
            if plugin.pending_claims() == 0 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }

        assert_eq!(outcomes, vec![ClaimOutcome::TransportFailed]);
        assert_eq!(
            plugin.host().messages(),
            vec![messages::PROCESSING, messages::TRANSPORT_ERROR]
        );
    }
}
