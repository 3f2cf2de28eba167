use std::{net::SocketAddr, path::PathBuf};

use clap::{
    CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};
use colored::Colorize;

use nowplaying::{
    config::{self, Config},
    context::AppContext,
    error, poller, server,
};

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name=env!("CARGO_PKG_NAME"),
  bin_name=env!("CARGO_PKG_NAME"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    /// Address to listen on (overrides SERVER_ADDRESS)
    #[clap(long)]
    addr: Option<SocketAddr>,

    /// File the refresh token is kept in (overrides REFRESH_TOKEN_FILE)
    #[clap(long)]
    token_file: Option<PathBuf>,

    /// JSON file with allowed devices (overrides DEVICES_FILE)
    #[clap(long)]
    devices: Option<PathBuf>,

    /// Print diagnostic output
    #[clap(long, short)]
    verbose: bool,

    #[clap(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Run the backend (default)
    Serve,

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

fn apply_overrides(mut cfg: Config, cli: &Cli) -> Config {
    if let Some(addr) = cli.addr {
        cfg.server_address = addr;
    }
    if let Some(path) = &cli.token_file {
        cfg.refresh_token_file = path.clone();
    }
    if let Some(path) = &cli.devices {
        cfg.devices_file = path.clone();
    }
    cfg.verbose |= cli.verbose;
    cfg
}

fn print_banner(login_path: &str, addr: SocketAddr) {
    const WIDTH: usize = 64;
    let line = |text: String| println!(" │ {:^width$} │", text, width = WIDTH);

    println!(" ┌{}┐", "─".repeat(WIDTH + 2));
    line(format!(
        "{} {}",
        env!("CARGO_PKG_NAME").bold(),
        env!("CARGO_PKG_VERSION")
    ));
    line(format!("Powered by axum on {}", addr));
    line(String::new());
    line(format!("Login Path: {}", login_path.bright_blue()));
    println!(" └{}┘", "─".repeat(WIDTH + 2));
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Some(Command::Completions(opt)) = &cli.command {
        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();
        generate(opt.shell, &mut cmd, name, &mut std::io::stdout());
        return;
    }

    config::load_env().await;
    let cfg = match Config::from_env() {
        Ok(cfg) => apply_overrides(cfg, &cli),
        Err(e) => error!("Cannot load configuration. Err: {}", e),
    };
    nowplaying::set_verbose(cfg.verbose);

    let ctx = match AppContext::initialize(cfg).await {
        Ok(ctx) => ctx,
        Err(e) => error!("Failed to start. Err: {}", e),
    };

    print_banner(&ctx.session.login_path(), ctx.config.server_address);

    tokio::spawn(poller::run(ctx.clone()));

    if let Err(e) = server::start_api_server(ctx).await {
        error!("Server stopped. Err: {}", e);
    }
}
