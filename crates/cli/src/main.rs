//! zipgate CLI - Database migrations and allow-list management.
//!
//! # Usage
//!
//! ```bash
//! # Run storefront database migrations
//! zipgate migrate storefront
//!
//! # Run admin database migrations (owns the settings table)
//! zipgate migrate admin
//!
//! # Run all database migrations
//! zipgate migrate all
//!
//! # Print the stored allow-list
//! zipgate zipcodes show
//!
//! # Replace the allow-list (sanitized the same way as the admin form)
//! zipgate zipcodes set "80902, 80903"
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "zipgate")]
#[command(author, version, about = "zipgate CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate {
        #[command(subcommand)]
        target: MigrateTarget,
    },
    /// Manage the ZIP code allow-list
    Zipcodes {
        #[command(subcommand)]
        action: ZipcodesAction,
    },
}

#[derive(Subcommand)]
enum MigrateTarget {
    /// Run storefront database migrations
    Storefront,
    /// Run admin database migrations
    Admin,
    /// Run all database migrations
    All,
}

#[derive(Subcommand)]
enum ZipcodesAction {
    /// Print the stored allow-list and its size
    Show,
    /// Replace the allow-list; invalid entries are dropped
    Set {
        /// Comma-separated 5-digit ZIP codes (empty allows every code)
        raw: String,
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
        Commands::Migrate { target } => match target {
            MigrateTarget::Storefront => commands::migrate::storefront().await?,
            MigrateTarget::Admin => commands::migrate::admin().await?,
            MigrateTarget::All => {
                commands::migrate::admin().await?;
                commands::migrate::storefront().await?;
            }
        },
        Commands::Zipcodes { action } => match action {
            ZipcodesAction::Show => commands::zipcodes::show().await?,
            ZipcodesAction::Set { raw } => commands::zipcodes::set(&raw).await?,
        },
    }
    Ok(())
}
