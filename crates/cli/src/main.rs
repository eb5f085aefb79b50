//! Orderdesk CLI - Database migrations and user management.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! orderdesk-cli migrate
//!
//! # Create a regular user
//! orderdesk-cli user create -u alice -p "secret password"
//!
//! # Create a staff superuser (can log in to the admin)
//! orderdesk-cli user create -u admin -p "secret password" --staff --superuser
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `user create` - Create user accounts

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "orderdesk-cli")]
#[command(author, version, about = "Orderdesk CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Manage user accounts
    User {
        #[command(subcommand)]
        action: UserAction,
    },
}

#[derive(Subcommand)]
enum UserAction {
    /// Create a new user account
    Create {
        /// Login username
        #[arg(short, long)]
        username: String,

        /// Password (hashed before storage)
        #[arg(short, long)]
        password: String,

        /// Given name
        #[arg(long, default_value = "")]
        first_name: String,

        /// Family name
        #[arg(long, default_value = "")]
        last_name: String,

        /// Allow the account to log in to the admin
        #[arg(long)]
        staff: bool,

        /// Give the account visibility over all orders
        #[arg(long)]
        superuser: bool,
    },
}

#[tokio::main]
async fn main() {
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
        Commands::User { action } => match action {
            UserAction::Create {
                username,
                password,
                first_name,
                last_name,
                staff,
                superuser,
            } => {
                commands::user::create(
                    &username,
                    &password,
                    &first_name,
                    &last_name,
                    staff,
                    superuser,
                )
                .await?;
            }
        },
    }
    Ok(())
}
