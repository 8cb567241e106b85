use anyhow::Result;
use clap::Parser;

mod cli;

use cli::{Cli, Commands};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let gazetteer_dir = cli.gazetteer.as_deref();

    match cli.command {
        Commands::Ingest { input, output } => cli::ingest::run(&input, &output, gazetteer_dir),
        Commands::Lookup { command } => cli::lookup::run(&command, gazetteer_dir),
        Commands::Report { command } => cli::report::run(&command, gazetteer_dir),
    }
}
