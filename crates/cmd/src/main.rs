// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use anyhow::Result;
use clap::{Parser, Subcommand};
use diagnostics::LogLevel;
use std::path::PathBuf;

mod commands;

use commands::ServeArgs;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(name = "contactd")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Log at debug level regardless of CONTACT_LOG
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve POST /api/contact
    Serve(ServeArgs),
    /// Load the configuration, validate it and print a redacted summary
    Check {
        /// YAML configuration file (environment variables override it)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Write an example configuration file
    Init {
        /// Where to write the file
        #[arg(default_value = "contact.yaml")]
        path: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        diagnostics::init(LogLevel::Debug);
    } else {
        diagnostics::init_from_env(LogLevel::Info);
    }

    match cli.command {
        Commands::Serve(args) => commands::serve_command(&args).await,
        Commands::Check { config } => commands::check_command(config.as_deref()),
        Commands::Init { path } => commands::init_command(&path),
    }
}
