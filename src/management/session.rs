use tokio::sync::RwLock;

use crate::utils;

/// Seconds the admin cookie stays valid in the browser.
pub const COOKIE_MAX_AGE_SECS: u64 = 24 * 60 * 60;

/// Single-slot admin session.
///
/// The path segments and cookie are random per process. Access to the
/// callback additionally requires the caller IP to hash to the one recorded
/// on the last admin visit. This is obscurity plus origin binding, not real
/// authentication.
#[derive(Debug)]
pub struct AdminSession {
    admin_path: String,
    update_path: String,
    cookie_name: String,
    cookie_value: String,
    authorized_ip_hash: RwLock<Option<String>>,
}

impl AdminSession {
    pub fn generate() -> Self {
        Self::new(
            utils::generate_random_string(15),
            utils::generate_random_string(5),
            utils::generate_random_string(10),
            utils::generate_random_string(20),
        )
    }

    pub fn new(
        admin_path: String,
        update_path: String,
        cookie_name: String,
        cookie_value: String,
    ) -> Self {
        Self {
            admin_path,
            update_path,
            cookie_name,
            cookie_value,
            authorized_ip_hash: RwLock::new(None),
        }
    }

    /// Path an admin visits to start the consent flow.
    pub fn login_path(&self) -> String {
        format!("/admin/{}/{}", self.admin_path, self.update_path)
    }

    pub fn cookie_name(&self) -> &str {
        &self.cookie_name
    }

    pub fn cookie_value(&self) -> &str {
        &self.cookie_value
    }

    /// `Set-Cookie` value handed out on an admin visit.
    pub fn set_cookie_header(&self) -> String {
        format!(
            "{}={}; Path=/; Max-Age={}; HttpOnly; SameSite=Lax",
            self.cookie_name, self.cookie_value, COOKIE_MAX_AGE_SECS
        )
    }

    /// Binds the session to the caller IP, replacing any previous binding.
    pub async fn bind_ip(&self, ip: &str) {
        *self.authorized_ip_hash.write().await = Some(utils::hash_ip(ip));
    }

    /// Checks a callback request against the session.
    pub async fn is_authorized(&self, cookie_value: Option<&str>, ip: &str) -> bool {
        if cookie_value != Some(self.cookie_value.as_str()) {
            return false;
        }

        self.authorized_ip_hash
            .read()
            .await
            .as_deref()
            .is_some_and(|hash| hash == utils::hash_ip(ip))
    }
}
