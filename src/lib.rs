//! Spotify Now-Playing Backend Library
//!
//! This library provides everything needed to serve a "now playing" snapshot
//! of a single Spotify user's listening activity. A background poller keeps
//! the snapshot fresh while a small HTTP surface exposes it, together with a
//! minimal admin flow to (re)acquire the OAuth refresh token.
//!
//! # Modules
//!
//! - `api` - HTTP handlers for the public and admin endpoints
//! - `config` - Configuration loading from environment variables and `.env` files
//! - `context` - The shared application context handed to handlers and the poller
//! - `error` - Error types for OAuth, fetching, persistence and configuration
//! - `management` - Shared state holders (tokens, playback, admin session)
//! - `poller` - Background loop that refreshes the playback snapshot
//! - `server` - Router construction and the HTTP server entry point
//! - `spotify` - Spotify accounts and Web API client implementation
//! - `types` - Data structures and type definitions
//! - `utils` - Pure helpers for prediction, staleness, hashing and jitter
//!
//! # Example
//!
//! ```
//! use nowplaying::{config, context::AppContext, poller, server};
//!
//! #[tokio::main]
//! async fn main() {
//!     config::load_env().await;
//!     let cfg = config::Config::from_env().unwrap();
//!     let ctx = AppContext::initialize(cfg).await.unwrap();
//!     tokio::spawn(poller::run(ctx.clone()));
//!     server::start_api_server(ctx).await.unwrap();
//! }
//! ```

use std::sync::atomic::{AtomicBool, Ordering};

pub mod api;
pub mod config;
pub mod context;
pub mod error;
pub mod management;
pub mod poller;
pub mod server;
pub mod spotify;
pub mod types;
pub mod utils;

static VERBOSE: AtomicBool = AtomicBool::new(false);

/// Turns verbose output from the [`debug!`] macro on or off.
pub fn set_verbose(enabled: bool) {
    VERBOSE.store(enabled, Ordering::Relaxed);
}

/// Returns whether verbose output is currently enabled.
pub fn verbose() -> bool {
    VERBOSE.load(Ordering::Relaxed)
}

/// Prints an informational message with a blue bullet point.
///
/// Creates a formatted output line with a distinctive blue "o" indicator
/// followed by the provided message. Used for general information and
/// status updates throughout the application.
///
/// # Example
///
/// ```
/// info!("Loaded refresh token from {}", path.display());
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green checkmark.
///
/// # Example
///
/// ```
/// success!("Listening on {}", addr);
/// ```
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark and exits the program.
///
/// Only meant for startup failures such as missing credentials, where the
/// service cannot do anything useful. Request and poller paths report their
/// failures with [`warning!`] instead and keep running.
///
/// # Example
///
/// ```
/// error!("Missing required environment variable: {}", var_name);
/// // Program exits here - code after this will not execute
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning message with a yellow exclamation mark.
///
/// Used for recoverable issues, e.g. a failed poll cycle or a rejected admin
/// callback.
///
/// # Example
///
/// ```
/// warning!("Failed to update now playing. Err: {}", e);
/// ```
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a dimmed diagnostic message, but only in verbose mode.
///
/// Verbose mode is switched on with [`set_verbose`], which the binary does
/// for `APP_ENV=development`, `VERBOSE=true` or `--verbose`.
///
/// # Example
///
/// ```
/// debug!("Next poll in {:?}", wait);
/// ```
#[macro_export]
macro_rules! debug {
  ($($arg:tt)*) => ({
    if $crate::verbose() {
      use colored::Colorize;
      println!("[{}] {}", "·".dimmed(), std::format_args!($($arg)*));
    }
  })
}
