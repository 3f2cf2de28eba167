use std::path::{Path, PathBuf};

use chrono::Utc;
use tokio::sync::{Mutex, RwLock};

use crate::{
    error::{FetchError, PersistenceError},
    spotify::SpotifyClient,
    types::AccessToken,
};

/// Seconds before provider expiry at which a cached access token is renewed.
const EXPIRY_MARGIN_SECS: i64 = 240;

struct CachedAccess {
    refresh_token: String,
    token: AccessToken,
}

/// Owns the live refresh token, its file on disk and the access token
/// minted from it.
pub struct TokenManager {
    path: PathBuf,
    refresh_token: RwLock<Option<String>>,
    access: Mutex<Option<CachedAccess>>,
}

impl TokenManager {
    pub fn new(path: PathBuf, refresh_token: Option<String>) -> Self {
        TokenManager {
            path,
            refresh_token: RwLock::new(refresh_token),
            access: Mutex::new(None),
        }
    }

    /// Loads the refresh token saved at `path`.
    ///
    /// A missing or empty file is a valid state: the service simply has no
    /// token until the admin flow runs.
    pub async fn load(path: PathBuf) -> Result<Self, PersistenceError> {
        let token = match async_fs::read_to_string(&path).await {
            Ok(content) => Some(content.trim().to_string()).filter(|t| !t.is_empty()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(source) => return Err(PersistenceError::Io { path, source }),
        };

        Ok(Self::new(path, token))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn refresh_token(&self) -> Option<String> {
        self.refresh_token.read().await.clone()
    }

    pub async fn has_refresh_token(&self) -> bool {
        self.refresh_token.read().await.is_some()
    }

    /// Persists `token` and makes it the live refresh token.
    ///
    /// The write guard is held across the file write, so readers observe
    /// either the old or the new token. If the write fails, the live token is
    /// left unchanged.
    pub async fn replace(&self, token: String) -> Result<(), PersistenceError> {
        let mut live = self.refresh_token.write().await;
        persist(&self.path, &token).await?;
        *live = Some(token);
        drop(live);

        self.access.lock().await.take();
        Ok(())
    }

    /// Returns a valid access token for the live refresh token.
    ///
    /// A cached token is reused until shortly before it expires.
    pub async fn access_token(&self, client: &SpotifyClient) -> Result<String, FetchError> {
        let refresh_token = self
            .refresh_token()
            .await
            .ok_or(FetchError::MissingRefreshToken)?;

        let mut cache = self.access.lock().await;
        if let Some(cached) = cache.as_ref() {
            if cached.refresh_token == refresh_token && !is_expired(&cached.token) {
                return Ok(cached.token.token.clone());
            }
        }

        let token = client.exchange_refresh_token(&refresh_token).await?;
        let value = token.token.clone();
        *cache = Some(CachedAccess {
            refresh_token,
            token,
        });
        Ok(value)
    }
}

fn is_expired(token: &AccessToken) -> bool {
    let now = Utc::now().timestamp();
    now >= token.obtained_at + token.expires_in as i64 - EXPIRY_MARGIN_SECS
}

async fn persist(path: &Path, token: &str) -> Result<(), PersistenceError> {
    let io_err = |source| PersistenceError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        async_fs::create_dir_all(parent).await.map_err(io_err)?;
    }
    async_fs::write(path, token).await.map_err(io_err)
}
