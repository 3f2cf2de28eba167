mod auth;
mod playback;
mod session;

pub use auth::TokenManager;
pub use playback::PlaybackState;
pub use playback::PlaybackView;
pub use session::AdminSession;
pub use session::COOKIE_MAX_AGE_SECS;
