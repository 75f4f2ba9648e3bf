//! Parish registry server binary.
//!
//! Reads `config.toml` (or the path given with `--config`), layers
//! `BIERZMOWANIE_*` environment variables on top, opens the SQLite store and
//! serves the JSON API over HTTP.
//!
//! # Bootstrapping
//!
//! ```text
//! cargo run -p bierzmowanie-server --bin server -- --create-admin admin
//! cargo run -p bierzmowanie-server --bin server -- --hash-password
//! ```

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use bierzmowanie_core::{
  Role, account::NewAccount, credential::hash_password, store::ParishStore,
};
use bierzmowanie_server::{AppState, ServerConfig};
use bierzmowanie_store_sqlite::SqliteStore;
use clap::Parser;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Parish confirmation registry server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  /// Print the argon2 hash for a password entered on stdin and exit.
  #[arg(long)]
  hash_password: bool,

  /// Create an administrator account with this username, password read
  /// from stdin, and exit.
  #[arg(long, value_name = "USERNAME")]
  create_admin: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  if cli.hash_password {
    let password = read_password()?;
    println!("{}", hash_password(&password)?);
    return Ok(());
  }

  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::with_prefix("BIERZMOWANIE"))
    .build()
    .context("failed to read config file")?;

  let server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;

  let store_path = expand_tilde(&server_cfg.store_path);
  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  if let Some(username) = cli.create_admin {
    return create_admin(&store, username).await;
  }

  let address = format!("{}:{}", server_cfg.host, server_cfg.port);
  let app = bierzmowanie_server::router(AppState::new(store, server_cfg));

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app)
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("server error")?;

  tracing::info!("shut down");
  Ok(())
}

async fn create_admin(store: &SqliteStore, username: String) -> anyhow::Result<()> {
  let password = read_password()?;
  anyhow::ensure!(!password.is_empty(), "password must not be empty");

  let account = store
    .create_account(NewAccount {
      username:      username.clone(),
      password_hash: hash_password(&password)?,
      given_name:    "Administrator".into(),
      family_name:   username,
      birth_date:    None,
      roles:         vec![Role::Administrator],
      email:         None,
      phone:         None,
      address:       None,
    })
    .await
    .context("failed to create administrator")?;

  println!("created administrator {} (id {})", account.username, account.id);
  Ok(())
}

async fn shutdown_signal() {
  if let Err(e) = tokio::signal::ctrl_c().await {
    tracing::error!(error = %e, "failed to listen for ctrl-c");
  }
}

/// Read a password line from stdin.
fn read_password() -> anyhow::Result<String> {
  use std::io::{self, BufRead, Write};
  print!("Password: ");
  io::stdout().flush().ok();
  let mut line = String::new();
  io::stdin().lock().read_line(&mut line)?;
  Ok(line.trim_end_matches(['\n', '\r']).to_string())
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
