mod app;
mod cache;
mod config;
mod db;
mod error;
mod event;
mod roster;
mod server;
mod ui;

use clap::{Parser, Subcommand};
use color_eyre::Result;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "roster")]
#[command(about = "A terminal UI for managing a student roster")]
#[command(version)]
struct Args {
  /// Path to config file (default: $XDG_CONFIG_HOME/roster/config.yaml)
  #[arg(short, long)]
  config: Option<PathBuf>,

  /// Roster service URL the terminal UI connects to
  #[arg(short, long)]
  server: Option<String>,

  #[command(subcommand)]
  command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Run the HTTP service over the roster database
  Serve {
    /// Address to bind (default from config)
    #[arg(short, long)]
    listen: Option<String>,
  },
}

#[tokio::main]
async fn main() -> Result<()> {
  color_eyre::install()?;

  let args = Args::parse();

  // Load configuration
  let mut config = config::Config::load(args.config.as_deref())?;

  // Override service URL if specified on command line
  if let Some(server) = args.server {
    config.server.url = server;
  }

  match args.command {
    Some(Command::Serve { listen }) => {
      init_serve_logging();
      let addr = listen.unwrap_or_else(|| config.server.listen.clone());
      let db = Arc::new(db::StudentDb::new(config.database_path()));
      server::serve(db, &addr).await?;
      Ok(())
    }
    None => {
      // Raw mode owns the terminal, so logs go to a file
      let _guard = init_tui_logging()?;
      let mut app = app::App::new(&config);
      app.run().await
    }
  }
}

fn env_filter() -> EnvFilter {
  EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("roster=info"))
}

fn init_serve_logging() {
  tracing_subscriber::fmt().with_env_filter(env_filter()).init();
}

fn init_tui_logging() -> Result<Option<tracing_appender::non_blocking::WorkerGuard>> {
  let Some(data_dir) = dirs::data_dir() else {
    return Ok(None);
  };

  let log_dir = data_dir.join("roster");
  std::fs::create_dir_all(&log_dir)?;

  let appender = tracing_appender::rolling::never(log_dir, "roster.log");
  let (writer, guard) = tracing_appender::non_blocking(appender);

  tracing_subscriber::fmt()
    .with_writer(writer)
    .with_ansi(false)
    .with_env_filter(env_filter())
    .init();

  Ok(Some(guard))
}
