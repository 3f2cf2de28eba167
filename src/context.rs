use std::sync::Arc;

use tokio::sync::Mutex;

use crate::{
    config::{Config, DeviceRegistry},
    error::{FetchError, StartupError},
    info,
    management::{AdminSession, PlaybackState, TokenManager},
    spotify::SpotifyClient,
    types::PlaybackSnapshot,
    warning,
};

/// State shared by the HTTP handlers and the poller.
pub struct AppContext {
    pub config: Config,
    pub spotify: SpotifyClient,
    pub tokens: TokenManager,
    pub playback: PlaybackState,
    pub session: AdminSession,
    pub devices: DeviceRegistry,
    /// Held for the duration of a fetch-and-update cycle so at most one
    /// player fetch for the live token runs at a time.
    pub refresh_gate: Mutex<()>,
}

pub type SharedContext = Arc<AppContext>;

impl AppContext {
    /// Assembles a context from already loaded parts.
    pub fn new(
        config: Config,
        tokens: TokenManager,
        session: AdminSession,
        devices: DeviceRegistry,
    ) -> Result<SharedContext, StartupError> {
        let spotify = SpotifyClient::new(&config)?;

        Ok(Arc::new(Self {
            config,
            spotify,
            tokens,
            playback: PlaybackState::new(),
            session,
            devices,
            refresh_gate: Mutex::new(()),
        }))
    }

    /// Loads the saved refresh token and device list, then builds the context
    /// with a fresh admin session.
    pub async fn initialize(config: Config) -> Result<SharedContext, StartupError> {
        let tokens = TokenManager::load(config.refresh_token_file.clone()).await?;
        if tokens.has_refresh_token().await {
            info!("Loaded refresh token from {}", tokens.path().display());
        } else {
            warning!("No saved refresh token found!");
        }

        let devices = match DeviceRegistry::load(&config.devices_file).await? {
            Some(devices) => {
                info!(
                    "Loaded {} allowed device(s) from {}",
                    devices.len(),
                    config.devices_file.display()
                );
                devices
            }
            None => {
                info!(
                    "No device list at {}, using generic device labels",
                    config.devices_file.display()
                );
                DeviceRegistry::default()
            }
        };

        Self::new(config, tokens, AdminSession::generate(), devices)
    }

    /// Fetches the player state with the live refresh token.
    pub async fn fetch_snapshot(&self) -> Result<Option<PlaybackSnapshot>, FetchError> {
        let access_token = self.tokens.access_token(&self.spotify).await?;
        self.spotify.fetch_now_playing(&access_token).await
    }

    /// Fetches the player state with a refresh token that is not live yet.
    pub async fn fetch_snapshot_with(
        &self,
        refresh_token: &str,
    ) -> Result<Option<PlaybackSnapshot>, FetchError> {
        let access_token = self.spotify.exchange_refresh_token(refresh_token).await?;
        self.spotify.fetch_now_playing(&access_token.token).await
    }
}
