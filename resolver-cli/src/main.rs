//! Resolver CLI
//!
//! Command-line interface for the currency resolver API.

use anyhow::Result;
use clap::{Parser, Subcommand};

use resolver_client::ResolverClient;

#[derive(Parser)]
#[command(name = "resolver")]
#[command(author, version, about = "Currency resolver API CLI client", long_about = None)]
struct Cli {
    /// Base URL of the resolver API
    #[arg(
        long,
        env = "RESOLVER_API_URL",
        default_value = "http://localhost:3000"
    )]
    api_url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert an amount between two currencies
    Convert {
        /// Source currency symbol
        from: String,
        /// Target currency symbol
        to: String,
        /// Amount of the source currency
        amount: String,
    },
    /// Currency operations
    Currency {
        #[command(subcommand)]
        action: CurrencyCommands,
    },
    /// Rate pair operations
    Rate {
        #[command(subcommand)]
        action: RateCommands,
    },
    /// Check API health
    Health,
}

#[derive(Subcommand)]
enum CurrencyCommands {
    /// List currencies
    List,
    /// Get a currency by symbol
    Get { symbol: String },
    /// Add a currency (no-op if it already exists)
    Add {
        symbol: String,
        #[arg(long, default_value = "")]
        description: String,
    },
    /// Update a currency description
    Update {
        symbol: String,
        #[arg(long)]
        description: String,
    },
    /// Remove a currency and every rate referencing it
    Remove { symbol: String },
}

#[derive(Subcommand)]
enum RateCommands {
    /// List stored rate pairs
    List,
    /// Create a rate and its inverse
    Create {
        #[arg(long)]
        from: String,
        #[arg(long)]
        to: String,
        #[arg(long)]
        rate: f64,
    },
    /// Update a rate and its inverse
    Update {
        #[arg(long)]
        from: String,
        #[arg(long)]
        to: String,
        #[arg(long)]
        rate: f64,
    },
    /// Remove a rate and its inverse
    Remove {
        #[arg(long)]
        from: String,
        #[arg(long)]
        to: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let client = ResolverClient::new(&cli.api_url);

    match cli.command {
        Commands::Health => {
            let healthy = client.health().await?;
            if healthy {
                println!("✓ API is healthy");
            } else {
                println!("✗ API is not healthy");
                std::process::exit(1);
            }
        }

        Commands::Convert { from, to, amount } => {
            let result = client.convert(&from, &to, &amount).await?;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }

        Commands::Currency { action } => match action {
            CurrencyCommands::List => {
                let currencies = client.list_currencies().await?;
                println!("{}", serde_json::to_string_pretty(&currencies)?);
            }
            CurrencyCommands::Get { symbol } => {
                let currency = client.get_currency(&symbol).await?;
                println!("{}", serde_json::to_string_pretty(&currency)?);
            }
            CurrencyCommands::Add {
                symbol,
                description,
            } => {
                let currency = client.add_currency(&symbol, &description).await?;
                println!("{}", serde_json::to_string_pretty(&currency)?);
            }
            CurrencyCommands::Update {
                symbol,
                description,
            } => {
                let currency = client.update_currency(&symbol, &description).await?;
                println!("{}", serde_json::to_string_pretty(&currency)?);
            }
            CurrencyCommands::Remove { symbol } => {
                client.remove_currency(&symbol).await?;
                println!("✓ Currency {} removed", symbol.to_uppercase());
            }
        },

        Commands::Rate { action } => match action {
            RateCommands::List => {
                let rates = client.list_rates().await?;
                println!("{}", serde_json::to_string_pretty(&rates)?);
            }
            RateCommands::Create { from, to, rate } => {
                let pair = client.create_rate(&from, &to, rate).await?;
                println!("{}", serde_json::to_string_pretty(&pair)?);
            }
            RateCommands::Update { from, to, rate } => {
                let pair = client.update_rate(&from, &to, rate).await?;
                println!("{}", serde_json::to_string_pretty(&pair)?);
            }
            RateCommands::Remove { from, to } => {
                client.remove_rate(&from, &to).await?;
                println!(
                    "✓ Rate {} <-> {} removed",
                    from.to_uppercase(),
                    to.to_uppercase()
                );
            }
        },
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_rate_create() {
        let cli = Cli::try_parse_from([
            "resolver", "rate", "create", "--from", "USD", "--to", "BRL", "--rate", "5.0",
        ])
        .unwrap();
        match cli.command {
            Commands::Rate {
                action: RateCommands::Create { from, to, rate },
            } => {
                assert_eq!(from, "USD");
                assert_eq!(to, "BRL");
                assert_eq!(rate, 5.0);
            }
            _ => panic!("expected rate create"),
        }
    }

    #[test]
    fn test_parse_convert() {
        let cli = Cli::try_parse_from(["resolver", "convert", "usd", "brl", "10"]).unwrap();
        assert!(matches!(cli.command, Commands::Convert { ref amount, .. } if amount == "10"));
    }
}
