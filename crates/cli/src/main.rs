//! Vanilla Connector CLI - product listing and cart from the terminal.
//!
//! # Usage
//!
//! ```bash
//! # List the first page of products
//! vc-cli products
//!
//! # Add one unit of a variant to the cart
//! vc-cli add gid://shopify/ProductVariant/123
//!
//! # Show the stored cart ID
//! vc-cli cart
//! ```
//!
//! The CLI shares the server's configuration and cart store, so a cart created
//! here is the one the storefront page keeps adding to.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use vanilla_connector_storefront::config::StorefrontConfig;

mod commands;

use commands::CommandError;

#[derive(Parser)]
#[command(name = "vc-cli")]
#[command(author, version, about = "Vanilla Connector CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List products with their price and variant ID
    Products,
    /// Add one unit of a product variant to the cart
    Add {
        /// Product variant ID (e.g. `gid://shopify/ProductVariant/123`)
        variant_id: String,
    },
    /// Show the stored cart ID
    Cart,
}

#[tokio::main]
async fn main() -> ExitCode {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "vanilla_connector_storefront=warn".into());
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

async fn run(cli: Cli) -> Result<(), CommandError> {
    let config = StorefrontConfig::from_env()?;
    for warning in config.warnings() {
        tracing::warn!("{warning}");
    }
    match cli.command {
        Commands::Products => commands::products::list(&config).await?,
        Commands::Add { variant_id } => commands::cart::add(&config, &variant_id).await?,
        Commands::Cart => commands::cart::show(&config).await?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_add() {
        let cli = Cli::try_parse_from(["vc-cli", "add", "gid://v1"]);
        assert!(matches!(
            cli.map(|c| c.command),
            Ok(Commands::Add { variant_id }) if variant_id == "gid://v1"
        ));
    }

    #[test]
    fn test_add_requires_variant() {
        assert!(Cli::try_parse_from(["vc-cli", "add"]).is_err());
    }
}
