//! TaskMart CLI - terminal front-end for the TaskMart backend.
//!
//! # Usage
//!
//! ```bash
//! # Sign in and list tasks
//! taskmart auth login -e ada@example.com
//! taskmart tasks list --status pending --search milk
//!
//! # Manage the catalog
//! taskmart products add -t "Mug" -p 9.99 --image mug.jpg
//!
//! # Shop
//! taskmart cart add 3 --qty 2 --var color=Red --var size=M
//! taskmart cart show
//! ```
//!
//! # Commands
//!
//! - `auth` - Register, log in (password or OAuth redirect), log out
//! - `tasks` - List, create, edit, complete, and delete tasks
//! - `products` - Manage the product catalog, including image uploads
//! - `cart` - Inspect and mutate the shopping cart

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

use taskmart_client::{ApiClient, ClientConfig, SessionStore};

mod commands;

use commands::{auth, cart, products, tasks};

#[derive(Parser)]
#[command(name = "taskmart")]
#[command(author, version, about = "TaskMart command-line client")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage the session
    Auth {
        #[command(subcommand)]
        action: auth::AuthAction,
    },
    /// Manage tasks
    Tasks {
        #[command(subcommand)]
        action: tasks::TaskAction,
    },
    /// Manage the product catalog
    Products {
        #[command(subcommand)]
        action: products::ProductAction,
    },
    /// Manage the shopping cart
    Cart {
        #[command(subcommand)]
        action: cart::CartAction,
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
    let config = ClientConfig::from_env()?;
    let client = ApiClient::new(&config)?;

    let mut session = SessionStore::new(client.auth(), client.clone(), config.data_dir.clone());
    session.restore(None)?;

    match cli.command {
        Commands::Auth { action } => auth::dispatch(action, &mut session).await?,
        Commands::Tasks { action } => tasks::dispatch(action, &client, &session).await?,
        Commands::Products { action } => products::dispatch(action, &client).await?,
        Commands::Cart { action } => cart::dispatch(action, &client).await?,
    }
    Ok(())
}
