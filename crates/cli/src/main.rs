//! Tally CLI - Database migrations and account management.
//!
//! # Usage
//!
//! ```bash
//! # Apply the POS schema
//! tally-cli migrate
//!
//! # Create the default admin and cashier accounts
//! tally-cli seed
//!
//! # Create an account (password read from TALLY_NEW_USER_PASSWORD)
//! TALLY_NEW_USER_PASSWORD=... tally-cli user create -u front-desk -r user
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use tally_core::Role;

mod commands;

#[derive(Parser)]
#[command(name = "tally-cli")]
#[command(author, version, about = "Tally POS CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Create the default admin and cashier accounts if missing
    Seed,
    /// Manage login accounts
    User {
        #[command(subcommand)]
        action: UserAction,
    },
}

#[derive(Subcommand)]
enum UserAction {
    /// Create a new account
    Create {
        /// Login username
        #[arg(short, long)]
        username: String,

        /// Account role (`admin`, `user`)
        #[arg(short, long, default_value = "user")]
        role: Role,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Seed => commands::seed::run().await?,
        Commands::User { action } => match action {
            UserAction::Create { username, role } => {
                commands::user::create(&username, role).await?;
            }
        },
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_user_create() {
        let cli =
            Cli::try_parse_from(["tally-cli", "user", "create", "-u", "till-2", "-r", "admin"])
                .unwrap();
        match cli.command {
            Commands::User {
                action: UserAction::Create { username, role },
            } => {
                assert_eq!(username, "till-2");
                assert_eq!(role, Role::Admin);
            }
            _ => panic!("expected user create"),
        }
    }

    #[test]
    fn test_rejects_unknown_role() {
        assert!(
            Cli::try_parse_from(["tally-cli", "user", "create", "-u", "x", "-r", "owner"]).is_err()
        );
    }
}
