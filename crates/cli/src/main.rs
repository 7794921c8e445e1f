//! pipeforge - step-level debuggable pipelines
//!
//! Command-line surface over the PipeForge engine: run pipelines
//! (optionally interactive or in watch mode), validate them, and write
//! starter templates.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod interactive;
mod notify;
mod output;
mod templates;

#[derive(Parser)]
#[command(name = "pipeforge")]
#[command(about = "PipeForge - debuggable local build pipelines")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load and execute a pipeline
    Run {
        /// Pipeline YAML file
        file: PathBuf,
        /// Pause before every step for a debug verdict
        #[arg(long, short = 'i')]
        interactive: bool,
        /// Run once, then re-run on filesystem changes until Ctrl-C
        #[arg(long, short = 'w')]
        watch: bool,
        /// Show all output lines and step descriptions
        #[arg(long, short = 'v')]
        verbose: bool,
        /// Suppress stdout lines (errors and the summary still print)
        #[arg(long, short = 'q')]
        quiet: bool,
        /// Raise a desktop notification when a watch run completes
        #[arg(long)]
        notify: bool,
    },
    /// Statically check a pipeline; exit 0 iff there are no errors
    Validate {
        /// Pipeline YAML file
        file: PathBuf,
    },
    /// Write a starter pipeline template
    Init {
        /// Template name (see `pipeforge templates`)
        template: String,
        /// Output path
        #[arg(long, short = 'o', default_value = "pipeline.yml")]
        output: PathBuf,
    },
    /// List the available templates
    Templates,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let exit_code = match cli.command {
        Commands::Run {
            file,
            interactive,
            watch,
            verbose,
            quiet,
            notify,
        } => {
            commands::run::handle(commands::run::RunArgs {
                file,
                interactive,
                watch,
                verbose,
                quiet,
                notify,
            })
            .await?
        }
        Commands::Validate { file } => commands::validate::handle(&file),
        Commands::Init { template, output } => commands::init::handle(&template, &output)?,
        Commands::Templates => commands::templates::handle(),
    };

    std::process::exit(exit_code);
}
