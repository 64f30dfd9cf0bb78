//! CLI interface for the resume parser

use crate::config::OutputFormat;
use crate::processing::keyword_matcher::MatchMode;
use clap::{ArgGroup, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "resume-parser")]
#[command(about = "Resume field extraction and job description keyword matching")]
#[command(long_about = "Extract contact details, skills and role history from PDF, DOCX and text resumes, \
score them against a job description, and keep a local history of saved results")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Parse a resume and match it against a job description
    #[command(group(ArgGroup::new("job_source").required(true).args(["job", "job_file"])))]
    Parse {
        /// Path to resume file (PDF, DOCX, TXT, MD)
        #[arg(short, long)]
        resume: PathBuf,

        /// Job description text, or a comma separated keyword list in keyword mode
        #[arg(short, long)]
        job: Option<String>,

        /// Read the job description from a file instead
        #[arg(long)]
        job_file: Option<PathBuf>,

        /// Match mode: keyword, frequency
        #[arg(short, long)]
        mode: Option<String>,

        /// Output format: console, json, markdown
        #[arg(short, long)]
        output: Option<String>,

        /// Output detailed analysis
        #[arg(short, long)]
        detailed: bool,

        /// Store the result in the local database
        #[arg(long)]
        save: bool,

        /// Owner recorded with a saved result
        #[arg(long)]
        owner: Option<String>,

        /// Write the rendered report to a file
        #[arg(long)]
        save_report: Option<PathBuf>,
    },

    /// List saved results, newest first
    History {
        /// Only show records for this owner
        #[arg(long)]
        owner: Option<String>,

        /// Maximum number of records
        #[arg(short, long, default_value_t = 20)]
        limit: usize,

        /// Output format: console, json, markdown
        #[arg(short, long)]
        output: Option<String>,

        /// Show keyword lists and timestamps
        #[arg(short, long)]
        detailed: bool,
    },

    /// Show configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Reset configuration to defaults
    Reset,

    /// Print the configuration file location
    Path,
}

/// Parse and validate output format
pub fn parse_output_format(format: &str) -> Result<OutputFormat, String> {
    match format.to_lowercase().as_str() {
        "console" => Ok(OutputFormat::Console),
        "json" => Ok(OutputFormat::Json),
        "markdown" | "md" => Ok(OutputFormat::Markdown),
        _ => Err(format!("Invalid output format: {}. Supported: console, json, markdown", format)),
    }
}

pub fn parse_match_mode(mode: &str) -> Result<MatchMode, String> {
    mode.parse::<MatchMode>().map_err(|e| e.to_string())
}
