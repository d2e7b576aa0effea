use std::path::PathBuf;

use clap::{Parser, Subcommand};

use jobportal::config::Config;
use jobportal::{load_with_env, telemetry, PortalError, Principal, PrincipalKind};
use jobportal_server::{listen, AppState, ServerError};

#[derive(Parser)]
#[command(name = "jobportal-server", about = "Job portal application and interview API")]
pub struct Cmd {
    /// Path to a JSON config file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<SubCommandType>,
}

#[derive(Subcommand)]
enum SubCommandType {
    /// Run the HTTP server.
    Listen,
    /// Open the database and apply pending migrations.
    Migrate,
    /// Register a company, user or admin and print a fresh token.
    Register {
        #[arg(long)]
        kind: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
    },
    /// Issue a token for an existing principal.
    Token {
        #[arg(long)]
        kind: String,
        #[arg(long)]
        id: String,
    },
}

fn parse_kind(kind: &str) -> Result<PrincipalKind, PortalError> {
    Ok(kind.to_ascii_lowercase().parse()?)
}

pub async fn run(args: Cmd) -> Result<(), ServerError> {
    let config: Config = load_with_env(args.config.as_deref()).map_err(PortalError::from)?;
    telemetry::init_logging(&config.logging)?;

    match args.command {
        Some(SubCommandType::Listen) => {
            let state = AppState::from_config(&config)?;
            state.tokens.purge_expired().map_err(PortalError::from)?;
            listen(state, &config.server.host, config.server.port).await?;
        }
        Some(SubCommandType::Migrate) => {
            AppState::from_config(&config)?;
            tracing::info!("Migrations applied");
        }
        Some(SubCommandType::Register { kind, name, email }) => {
            let kind = parse_kind(&kind)?;
            let state = AppState::from_config(&config)?;
            let party = state
                .lifecycle
                .register_party(kind, &name, &email)
                .map_err(PortalError::from)?;
            let token = state
                .tokens
                .issue(&Principal::new(kind, party.id.clone()))
                .map_err(PortalError::from)?;
            println!("id: {}", party.id);
            println!("token: {}", token);
        }
        Some(SubCommandType::Token { kind, id }) => {
            let kind = parse_kind(&kind)?;
            let state = AppState::from_config(&config)?;
            let token = state
                .tokens
                .issue(&Principal::new(kind, id))
                .map_err(PortalError::from)?;
            println!("{}", token);
        }
        None => {
            tracing::error!("no subcommand passed");
        }
    }
    Ok(())
}
