//! Ninja Training for Cats CLI - database migrations, catalog and cart tools.
//!
//! # Usage
//!
//! ```bash
//! # Run storefront database migrations
//! ninja-cats migrate
//!
//! # List courses, cheapest first
//! ninja-cats catalog --order "price asc" --search stealth
//!
//! # Drive a cart against a running storefront
//! ninja-cats cart add <course-id>
//! ninja-cats cart show
//! ninja-cats cart checkout
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `catalog` - Query the product catalog
//! - `cart` - Show or change the cart bound to a local session file

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use url::Url;

mod commands;

#[derive(Parser)]
#[command(name = "ninja-cats")]
#[command(author, version, about = "Ninja Training for Cats CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run storefront database migrations
    Migrate,
    /// List catalog products
    Catalog {
        /// Only show courses whose title or description contains this text
        #[arg(short, long)]
        search: Option<String>,

        /// Sort order: `title asc`, `title desc`, `price asc` or `price desc`
        #[arg(short, long)]
        order: Option<String>,
    },
    /// Show or change the cart
    Cart {
        /// Storefront base URL
        #[arg(long, default_value = "http://127.0.0.1:3000/")]
        base_url: Url,

        /// File holding the cart session ID between runs
        #[arg(long, default_value = ".ninja-cats-session.json")]
        session_file: PathBuf,

        #[command(subcommand)]
        action: CartAction,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Print the cart contents
    Show,
    /// Add a course to the cart
    Add {
        /// Course document ID
        product_id: String,
    },
    /// Remove a course from the cart
    Remove {
        /// Course document ID
        product_id: String,
    },
    /// Place an order for the cart
    Checkout,
}

#[tokio::main]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ninja_cats=info,ninja_cats_cart=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::storefront().await?,
        Commands::Catalog { search, order } => {
            commands::catalog::list(search.as_deref(), order.as_deref()).await?;
        }
        Commands::Cart {
            base_url,
            session_file,
            action,
        } => {
            let mut cart = commands::cart::open(base_url, session_file).await?;
            match action {
                CartAction::Show => commands::cart::show(&cart),
                CartAction::Add { product_id } => {
                    commands::cart::add(&mut cart, product_id.into()).await?;
                }
                CartAction::Remove { product_id } => {
                    commands::cart::remove(&mut cart, product_id.into()).await?;
                }
                CartAction::Checkout => commands::cart::checkout(&mut cart).await?,
            }
        }
    }
    Ok(())
}
