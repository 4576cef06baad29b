//! Homare CLI - catalog listing and bulk rewrites against a running admin server.
//!
//! # Usage
//!
//! ```bash
//! # List products containing "box" with Latin letters in the title
//! homare products --keyword box --latin-only
//!
//! # Rewrite two products with the alibaba template
//! homare rewrite --template alibaba --cat-big インテリア 123 gid://shopify/Product/456
//! ```
//!
//! # Commands
//!
//! - `products` - List the filtered catalog
//! - `rewrite` - Dispatch a bulk rewrite
//!
//! # Environment Variables
//!
//! - `HOMARE_ADMIN_URL` - Admin server base URL (default: <http://127.0.0.1:3001>)

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

use commands::{AdminServer, products::ProductsArgs, rewrite::RewriteArgs};

#[derive(Parser)]
#[command(name = "homare")]
#[command(author, version, about = "Homare catalog rewrite tools")]
struct Cli {
    /// Admin server base URL
    #[arg(long, env = "HOMARE_ADMIN_URL", default_value = "http://127.0.0.1:3001")]
    server: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List products in the picklist
    Products(ProductsArgs),
    /// Rewrite products and save the results
    Rewrite(RewriteArgs),
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

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
    let server = AdminServer::new(&cli.server);
    match cli.command {
        Commands::Products(args) => commands::products::list(&server, &args).await?,
        Commands::Rewrite(args) => {
            commands::rewrite::dispatch(&server, args).await?;
        }
    }
    Ok(())
}
