pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
use crate::domain::model::{MAX_SEMESTER, MIN_SEMESTER};
#[cfg(feature = "cli")]
use clap::{Args, Parser, Subcommand};

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "result-extractor")]
#[command(about = "Fetch semester results for a roll range and ask questions about a results CSV")]
pub struct CliConfig {
    #[command(subcommand)]
    pub command: Command,

    /// Path to a TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Override the result-extraction service URL
    #[arg(long, global = true)]
    pub retrieval_endpoint: Option<String>,

    /// Override the CSV analysis service URL
    #[arg(long, global = true)]
    pub analysis_endpoint: Option<String>,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Emit logs as JSON lines")]
    pub json_logs: bool,
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Retrieve results for a roll-number range and save them as CSV
    Fetch(FetchArgs),
    /// Send a CSV and a question to the analysis service
    Analyze(AnalyzeArgs),
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Args)]
pub struct FetchArgs {
    /// Institute code with admission year, e.g. 0818IT22
    #[arg(long)]
    pub institute_code: String,

    /// Starting roll number, e.g. 1001
    #[arg(long)]
    pub roll_start: u32,

    /// Ending roll number, e.g. 1010
    #[arg(long)]
    pub roll_end: u32,

    #[arg(
        long,
        value_parser = clap::value_parser!(u8).range(MIN_SEMESTER as i64..=MAX_SEMESTER as i64)
    )]
    pub semester: u8,

    /// Directory the downloaded file is written to
    #[arg(long)]
    pub output_path: Option<String>,
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Args)]
pub struct AnalyzeArgs {
    /// CSV file to analyze
    #[arg(short, long)]
    pub file: String,

    /// Question, e.g. "Find top 5 performers" or "Average marks in Subject X"
    #[arg(short, long)]
    pub prompt: String,

    /// Also write the result table as HTML to this path
    #[arg(long)]
    pub html: Option<String>,
}
