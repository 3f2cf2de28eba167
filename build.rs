//! Build script for the now-playing backend.
//!
//! Copies the `.env.example` template into the local data directory so a
//! fresh install has a configuration example next to where `config::load_env`
//! looks for the real `.env`.

use std::{env, fs, path::PathBuf};

/// Copies `.env.example` from the crate root to the local data directory.
///
/// # Destination Location
///
/// - Linux: `~/.local/share/nowplaying/.env.example`
/// - macOS: `~/Library/Application Support/nowplaying/.env.example`
/// - Windows: `%LOCALAPPDATA%/nowplaying/.env.example`
///
/// A missing template or an unwritable data directory only produces a
/// cargo warning.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("cargo:rerun-if-changed=.env.example");

    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR")?);
    let env_example_path = manifest_dir.join(".env.example");

    let mut out_dir = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    out_dir.push("nowplaying");
    if env_example_path.is_file() {
        let contents = fs::read_to_string(&env_example_path)?;
        let copied = fs::create_dir_all(&out_dir)
            .and_then(|_| fs::write(out_dir.join(".env.example"), contents));
        if let Err(e) = copied {
            println!("cargo:warning=could not copy .env.example to {}: {e}", out_dir.display());
        }
    } else {
        println!(
            "cargo:warning=.env.example not found at {}",
            env_example_path.display()
        );
    }

    Ok(())
}
