pub mod ingest;
pub mod lookup;
pub mod report;

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Parser, Subcommand};
use newsatlas_core::GazetteerIndex;

#[derive(Parser)]
#[command(
    name = "natl",
    about = "News coverage geographic analysis",
    version
)]
pub struct Cli {
    /// Directory holding countries.csv and cities.csv; the embedded
    /// reference tables are used when omitted
    #[arg(long, global = true)]
    pub gazetteer: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Normalize an article corpus into an exploded mention table
    Ingest {
        /// Input CSV with title,description columns
        #[arg(short, long)]
        input: PathBuf,
        /// Output CSV (text,countries,nationalities,cities)
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Probe the gazetteer
    Lookup {
        #[command(subcommand)]
        command: LookupCommands,
    },
    /// Aggregate a mention or prediction table for the dashboards
    Report {
        #[command(subcommand)]
        command: ReportCommands,
    },
}

#[derive(Subcommand)]
pub enum LookupCommands {
    /// Resolve a country name, alias, or abbreviation
    Country {
        /// Candidate surface text
        name: String,
    },
    /// Test whether a name is a known city
    City {
        /// Candidate surface text
        name: String,
    },
}

#[derive(Subcommand)]
pub enum ReportCommands {
    /// Country mention counts with ISO3 codes (choropleth input)
    Countries {
        /// Mention table written by `natl ingest`
        #[arg(short, long)]
        mentions: PathBuf,
        /// Emit JSON instead of a text table
        #[arg(long)]
        json: bool,
    },
    /// City mention counts for a selected country, with coordinates
    Cities {
        #[arg(short, long)]
        mentions: PathBuf,
        /// Country selection
        #[arg(short, long)]
        country: String,
        /// Match cities anywhere, not only inside the selected country
        #[arg(long)]
        global: bool,
        #[arg(long)]
        json: bool,
    },
    /// Top identities (nationalities/ideologies) mentioned with a country
    Identities {
        #[arg(short, long)]
        mentions: PathBuf,
        #[arg(short, long)]
        country: String,
        /// Keep only the most frequent entries
        #[arg(long, default_value_t = 20)]
        limit: usize,
        #[arg(long)]
        json: bool,
    },
    /// Nationality and city co-occurrence within a country's rows
    Pairs {
        #[arg(short, long)]
        mentions: PathBuf,
        #[arg(short, long)]
        country: String,
        #[arg(long)]
        json: bool,
    },
    /// Views over the external classifier's prediction table
    Labels {
        /// Prediction CSV (countries,nationalities,cities,predicted_label)
        #[arg(short, long)]
        predictions: PathBuf,
        /// Country prevalence of one predicted label
        #[arg(long)]
        label: Option<String>,
        /// Label distribution for one country
        #[arg(long)]
        country: Option<String>,
        /// Label distribution for one city
        #[arg(long)]
        city: Option<String>,
        /// Label distribution for one nationality
        #[arg(long)]
        nationality: Option<String>,
        #[arg(long)]
        json: bool,
    },
}

/// Build the gazetteer exactly once per invocation; everything downstream
/// borrows it.
pub fn load_gazetteer(dir: Option<&Path>) -> Result<GazetteerIndex> {
    let index = match dir {
        Some(dir) => GazetteerIndex::load_dir(dir)?,
        None => GazetteerIndex::builtin()?,
    };
    Ok(index)
}
