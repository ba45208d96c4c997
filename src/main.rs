//! modelmux - Multi-provider AI routing and cost accounting
//!
//! A small CLI over the routing library: ask a question, validate a config,
//! or inspect the model catalog.

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use modelmux::catalog::{self, ModelTier};
use modelmux::{Config, Message, ProviderId, RequestOptions, Router};

#[derive(Parser)]
#[command(name = "modelmux")]
#[command(about = "Multi-provider AI routing and cost accounting")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Route a single prompt and print the answer
    Ask {
        /// Path to configuration file (keys fall back to env vars if absent)
        #[arg(short, long)]
        config: Option<String>,

        /// Force a provider instead of consulting the selector
        #[arg(short, long)]
        provider: Option<ProviderId>,

        /// Concrete model override
        #[arg(short, long)]
        model: Option<String>,

        /// System prompt
        #[arg(short, long)]
        system: Option<String>,

        /// Maximum output tokens
        #[arg(long)]
        max_tokens: Option<u32>,

        /// Sampling temperature
        #[arg(long)]
        temperature: Option<f32>,

        /// Print the full response (provider, model, usage, cost) as JSON
        #[arg(long)]
        json: bool,

        /// The prompt text
        prompt: String,
    },

    /// Validate a configuration file and report key sources
    Check {
        /// Path to configuration file
        #[arg(short, long, default_value = "config.toml")]
        config: String,
    },

    /// Show the model tiers and price catalog
    Models,
}

fn load_config(path: Option<&str>) -> anyhow::Result<Config> {
    let (config, key_sources) = match path {
        Some(path) => Config::from_file(path)?,
        None => Config::from_env()?,
    };
    for (provider, source) in &key_sources {
        tracing::debug!(provider = %provider, source = %source, "Resolved API key");
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "modelmux=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Ask {
            config,
            provider,
            model,
            system,
            max_tokens,
            temperature,
            json,
            prompt,
        } => {
            let config = load_config(config.as_deref())?;
            let router = Router::from_config(&config);

            let messages = vec![Message::user(prompt)];
            let options = RequestOptions {
                provider,
                model,
                max_tokens,
                temperature,
                system_prompt: system,
                stream: None,
            };

            let response = router.route(&messages, &options).await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&response)?);
            } else {
                println!("{}", response.content);
                tracing::info!(
                    provider = %response.provider,
                    model = %response.model,
                    input_tokens = response.tokens_used.input,
                    output_tokens = response.tokens_used.output,
                    total_tokens = response.tokens_used.total(),
                    cost_usd = response.cost,
                    "Request complete"
                );
            }
            Ok(())
        }

        Commands::Check { config } => {
            let (_, key_sources) = Config::from_file(&config)?;
            println!("Configuration OK: {}", config);
            for (provider, source) in key_sources {
                println!("  {:<10} key: {}", provider, source);
            }
            Ok(())
        }

        Commands::Models => {
            for provider in ProviderId::ALL {
                println!("{}:", provider);
                for tier in ModelTier::ALL {
                    let model = catalog::tier_model(provider, tier);
                    let price = catalog::resolve_price(provider, model);
                    println!(
                        "  {:<9} {:<28} ${}/M in, ${}/M out",
                        tier.as_str(),
                        model,
                        price.input,
                        price.output
                    );
                }
            }
            Ok(())
        }
    }
}
