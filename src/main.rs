// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! globload CLI - inspect what the glob loader produces
//!
//! ```bash
//! # Print the module synthesized for a glob import
//! globload synth "./plugins/*.js?glob&eager" --importer src/main.js
//!
//! # Print the URL the resolve hook returns
//! globload resolve "../*.js?glob" --importer src/sub/main.js
//!
//! # Print the data module generated for a YAML or JSON file
//! globload data config/roles.yaml
//! ```

use clap::{Parser, Subcommand};
use globload_loader::{
    GlobError, GlobHooks, LoaderConfig, OsFileSystem, ResolveContext, ResolveOutcome, VERSION,
};
use owo_colors::OwoColorize;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser)]
#[command(
    name = "globload",
    about = "Inspect the virtual modules produced for `?glob` import specifiers",
    version = VERSION,
    author = "Pegasus Heavy Industries"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Host runtime version used to pick JSON import syntax (e.g. v18.19.0)
    #[arg(long, global = true)]
    host_version: Option<String>,

    /// Configuration file with key=value lines
    #[arg(long, global = true, default_value = ".globloadrc")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Print the module synthesized for a glob specifier
    Synth {
        /// Import specifier, e.g. "./plugins/*.js?glob&eager"
        specifier: String,

        /// File containing the import statement
        #[arg(short, long)]
        importer: PathBuf,
    },

    /// Print the URL a glob specifier resolves to
    Resolve {
        /// Import specifier
        specifier: String,

        /// File containing the import statement
        #[arg(short, long)]
        importer: PathBuf,
    },

    /// Print the data module generated for a payload file
    Data {
        /// JSON or YAML file
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}: {:#}", "Error".red().bold(), e);
            return ExitCode::FAILURE;
        }
    };

    // Initialize logging
    let level = if cli.verbose { "debug" } else { config.loglevel.as_str() };
    tracing_subscriber::fmt()
        .with_env_filter(format!("globload={level},globload_loader={level}"))
        .with_writer(std::io::stderr)
        .init();

    match run(cli.command, config).await {
        Ok(output) => {
            print!("{}", output);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{}: {:#}", "Error".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

fn load_config(cli: &Cli) -> anyhow::Result<LoaderConfig> {
    let mut config = LoaderConfig::load(Some(&cli.config))?;
    if let Some(version) = &cli.host_version {
        config.set("host-version", version);
    }
    Ok(config)
}

async fn run(command: Command, config: LoaderConfig) -> anyhow::Result<String> {
    tracing::debug!("Host capabilities: {:?}", config.capabilities());

    let hooks = GlobHooks::from_config(OsFileSystem, &config);

    match command {
        Command::Synth { specifier, importer } => {
            let importer = absolute(&importer)?;
            let module = hooks
                .loader()
                .synthesize_specifier(&specifier, &importer)
                .await?
                .ok_or_else(|| not_glob(&specifier))?;
            Ok(module.source)
        }
        Command::Resolve { specifier, importer } => {
            let importer = absolute(&importer)?;
            let context = ResolveContext {
                parent_url: Some(globload_loader::urls::file_url(&importer.to_string_lossy())),
                ..Default::default()
            };
            let outcome = hooks
                .resolve(&specifier, context, |specifier, _| async move {
                    Err::<ResolveOutcome, _>(GlobError::Host(not_glob(&specifier).to_string()))
                })
                .await?;
            Ok(format!("{}\n", outcome.url))
        }
        Command::Data { file } => {
            let file = absolute(&file)?;
            let module = hooks.loader().load_data_module(&file).await?;
            Ok(module.source)
        }
    }
}

fn absolute(path: &Path) -> anyhow::Result<PathBuf> {
    Ok(std::path::absolute(path)?)
}

fn not_glob(specifier: &str) -> anyhow::Error {
    anyhow::anyhow!(
        "'{}' is not a glob import (expected a `?glob` query, e.g. {})",
        specifier,
        "./dir/*.js?glob".cyan()
    )
}
