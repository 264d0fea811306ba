//! Activity session CLI: serve the token relay or run one session setup.

mod connect;

use std::path::PathBuf;

use activity_config_and_utils::{init_logging, Config, Paths};
use clap::{Parser, Subcommand};

/// Activity session command-line interface.
#[derive(Parser)]
#[command(name = "activity-session")]
#[command(about = "Embedded activity session setup and token relay")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, global = true)]
    log_level: Option<String>,

    /// Base directory for config, logs and session scopes. Defaults to ~/.activity-session
    #[arg(long, global = true)]
    base_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve POST /api/token (needs ACTIVITY_CLIENT_SECRET)
    Relay,
    /// Run session setup once and print the resulting context
    Connect {
        /// Launch query string, e.g. "guild_id=g&channel_id=c"; frame_id selects the real host
        #[arg(long, default_value = "")]
        query: String,

        /// Session scope for simulated ids. A fresh scope is used when omitted
        #[arg(long)]
        scope_id: Option<String>,

        /// Only wait for the host; skip the authorization handshake
        #[arg(long)]
        no_auth: bool,

        /// Scopes to request (repeatable). Defaults to identify and guilds
        #[arg(long = "scope")]
        scopes: Vec<String>,

        /// Delete the session scope afterwards
        #[arg(long)]
        end_scope: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let paths = match cli.base_dir {
        Some(base) => Paths::with_base_dir(base),
        None => Paths::new()?,
    };
    paths.ensure_dirs()?;
    let config = Config::load(&paths)?;
    let log_level = cli.log_level.unwrap_or_else(|| config.log_level.clone());

    match cli.command {
        Commands::Relay => {
            init_logging("token-relay", &log_level, &paths);
            config.validate()?;
            token_relay::run(&config).await?;
        }
        Commands::Connect {
            query,
            scope_id,
            no_auth,
            scopes,
            end_scope,
        } => {
            init_logging("activity-session", &log_level, &paths);
            config.validate()?;
            let options = connect::ConnectOptions {
                query,
                scope_id: scope_id.unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
                authenticate: !no_auth,
                scopes: (!scopes.is_empty()).then_some(scopes),
                end_scope,
            };
            let summary = connect::run(&config, &paths, options).await?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
    }

    Ok(())
}
