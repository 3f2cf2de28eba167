use chrono::Utc;
use reqwest::{Url, header};

use crate::{
    error::AuthError,
    spotify::{SCOPE, SpotifyClient, error_message},
    types::{AccessToken, TokenResponse},
};

impl SpotifyClient {
    /// Builds the URL the admin is redirected to for granting consent.
    ///
    /// The `state` parameter is the current unix time in seconds, which makes
    /// every generated URL unique. No network call is made.
    ///
    /// # Example
    ///
    /// ```
    /// let url = client.build_authorization_url("https://example.com/admin/spotify/callback/1");
    /// // https://accounts.spotify.com/authorize?client_id=...&response_type=code&...
    /// ```
    pub fn build_authorization_url(&self, callback_uri: &str) -> String {
        let state = Utc::now().timestamp().to_string();
        let params = [
            ("client_id", self.client_id.as_str()),
            ("response_type", "code"),
            ("redirect_uri", callback_uri),
            ("scope", SCOPE),
            ("state", state.as_str()),
        ];

        match Url::parse_with_params(&self.auth_url, &params) {
            Ok(url) => url.to_string(),
            // the base URL comes from configuration; fall back to plain formatting
            Err(_) => format!(
                "{}?client_id={}&response_type=code&redirect_uri={}&scope={}&state={}",
                self.auth_url, self.client_id, callback_uri, SCOPE, state
            ),
        }
    }

    /// Exchanges an authorization code for a refresh token.
    ///
    /// # Errors
    ///
    /// Returns an [`AuthError`] on network failure, a non-2xx answer, or a
    /// response body without a `refresh_token`.
    pub async fn exchange_authorization_code(
        &self,
        code: &str,
        callback_uri: &str,
    ) -> Result<String, AuthError> {
        let tokens = self
            .token_request(&[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("redirect_uri", callback_uri),
            ])
            .await?;

        tokens
            .refresh_token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AuthError::Decode("response has no refresh_token".to_string()))
    }

    /// Mints a short-lived access token from a refresh token.
    ///
    /// # Errors
    ///
    /// Same failure taxonomy as [`Self::exchange_authorization_code`].
    pub async fn exchange_refresh_token(&self, refresh_token: &str) -> Result<AccessToken, AuthError> {
        let tokens = self
            .token_request(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh_token),
            ])
            .await?;

        let token = tokens
            .access_token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AuthError::Decode("response has no access_token".to_string()))?;

        Ok(AccessToken {
            token,
            expires_in: tokens.expires_in.unwrap_or(3600),
            obtained_at: Utc::now().timestamp(),
        })
    }

    async fn token_request(&self, form: &[(&str, &str)]) -> Result<TokenResponse, AuthError> {
        let res = self
            .http
            .post(&self.token_url)
            .header(header::AUTHORIZATION, &self.basic_auth)
            .form(form)
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            return Err(AuthError::Status {
                status,
                message: error_message(res).await,
            });
        }

        let body = res.text().await?;
        serde_json::from_str::<TokenResponse>(&body).map_err(|e| AuthError::Decode(e.to_string()))
    }
}
