use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use contract_tools::config::{model::endpoint_line, resolve_network, ConfigLoader};
use contract_tools::credentials::EnvAccounts;
use contract_tools::error::ExitCode;
use contract_tools::logging::{init_logging, LogFormat};
use contract_tools::{BuildConfiguration, ConfigError, DeploymentTarget};

#[derive(Parser)]
#[command(name = "contract-tools")]
#[command(about = "Build configuration and network tools for contract deployment")]
struct Cli {
    /// Configuration file (.toml or .json); searched in the current directory if omitted
    #[arg(short, long, env = "CONTRACT_TOOLS_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Human, global = true)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate the configuration and print a summary
    Validate,
    /// Print the validated configuration
    Show {
        /// Emit JSON instead of a summary
        #[arg(long)]
        json: bool,
    },
    /// Print one network endpoint
    Network {
        /// Network name as declared under `networks`
        name: String,
    },
    /// Check that a network is ready for deployment
    Preflight {
        /// Network to deploy to
        #[arg(short, long)]
        network: String,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_format, cli.verbose);

    if let Err(err) = run(cli) {
        eprintln!("error: {err:#}");
        let code = err
            .downcast_ref::<ConfigError>()
            .map(ConfigError::exit_code)
            .unwrap_or(ExitCode::ERROR);
        std::process::exit(code);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = load_config(cli.config)?;

    match cli.command {
        Commands::Validate => {
            println!("Configuration is valid");
            print!("{}", config.summary());
        }
        Commands::Show { json } => {
            if json {
                println!("{}", config.to_json()?);
            } else {
                print!("{}", config.summary());
            }
        }
        Commands::Network { name } => {
            let endpoint = resolve_network(&config, &name)?;
            let is_default = config
                .default_network()
                .is_some_and(|d| d.name() == endpoint.name());
            println!("{}", endpoint_line(endpoint, is_default));
        }
        Commands::Preflight { network } => {
            // Load .env file if it exists (non-fatal)
            let _ = dotenvy::dotenv();

            let target = DeploymentTarget::prepare(&config, &network, &EnvAccounts::default())?;
            println!(
                "Network {} is ready: {} (chain {}), {} account(s), solc {}",
                target.network,
                target.url,
                target
                    .chain_id
                    .map(|id| id.to_string())
                    .unwrap_or_else(|| "?".to_string()),
                target.accounts.len(),
                target.compiler_version
            );
        }
    }

    Ok(())
}

fn load_config(path: Option<PathBuf>) -> Result<BuildConfiguration> {
    let path = match path {
        Some(path) => path,
        None => {
            let cwd = std::env::current_dir().context("cannot determine current directory")?;
            ConfigLoader::discover_required(&cwd)?
        }
    };

    Ok(ConfigLoader::from_path(path)?)
}
