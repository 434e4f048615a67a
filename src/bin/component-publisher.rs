//! Component Publisher CLI
//!
//! Packages a local component and publishes it to every configured registry
//! in order.

use anyhow::Result;
use clap::{Parser, Subcommand};
use component_publisher::{
    ConfigLoadOptions, ConfigLoader, ConsoleLogger, DirPackager, HttpTransport,
    InteractiveBroker, PublishOrchestrator, PublishRequest, TarGzCompressor,
};
use secrecy::SecretString;
use std::path::PathBuf;
use std::process;

/// Multi-registry component publishing tool
#[derive(Parser)]
#[command(name = "component-publisher")]
#[command(version = "0.1.0")]
#[command(about = "Multi-registry component publishing tool", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Package a component and publish it to all configured registries
    Publish {
        /// Component path (defaults to current directory)
        #[arg(value_name = "COMPONENT_PATH")]
        component_path: Option<PathBuf>,

        /// Registry username
        #[arg(short, long)]
        username: Option<String>,

        /// Registry password
        #[arg(short, long)]
        password: Option<String>,

        /// Explicit registry configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Show the resolved registry endpoint list
    Registries {
        /// Component path (defaults to current directory)
        #[arg(value_name = "COMPONENT_PATH")]
        component_path: Option<PathBuf>,

        /// Explicit registry configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() {
    let result = run().await;

    match result {
        Ok(exit_code) => process::exit(exit_code),
        Err(e) => {
            eprintln!("\n❌ Error");
            eprintln!("{}", e);
            process::exit(1);
        }
    }
}

async fn run() -> Result<i32> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Publish {
            component_path,
            username,
            password,
            config,
        } => {
            let path = component_path.unwrap_or_else(|| PathBuf::from("."));
            publish_command(path, username, password, config).await
        }
        Commands::Registries {
            component_path,
            config,
        } => {
            let path = component_path.unwrap_or_else(|| PathBuf::from("."));
            registries_command(path, config).await
        }
    }
}

async fn publish_command(
    component_path: PathBuf,
    username: Option<String>,
    password: Option<String>,
    config_file: Option<PathBuf>,
) -> Result<i32> {
    let logger = ConsoleLogger::new();
    let packager = DirPackager::new();
    let compressor = TarGzCompressor::new();
    let transport = HttpTransport::new()?;
    let broker = InteractiveBroker::default();
    let orchestrator =
        PublishOrchestrator::new(&packager, &compressor, &transport, &broker, &logger);

    let mut request = PublishRequest::new(component_path);
    request.username = username;
    request.password = password.map(|p| SecretString::new(p.into()));

    let options =
        ConfigLoadOptions::from_process_env(request.component_path.clone(), config_file);

    match orchestrator.publish(&request, options).await {
        Ok(()) => {
            println!("\n🎉 Published to all configured registries");
            Ok(0)
        }
        Err(error) => {
            eprintln!("\n❌ {} [{}]", error, error.code());
            let actions = error.suggested_actions();
            if !actions.is_empty() {
                eprintln!("\n💡 Suggested actions:");
                for action in actions {
                    eprintln!("  - {}", action);
                }
            }
            Ok(1)
        }
    }
}

async fn registries_command(
    component_path: PathBuf,
    config_file: Option<PathBuf>,
) -> Result<i32> {
    let options = ConfigLoadOptions::from_process_env(component_path, config_file);
    let config = ConfigLoader::load(options).await?;

    println!("Configured registries (in publish order):");
    for registry in &config.registries {
        println!("  - {}", registry);
    }

    Ok(0)
}
