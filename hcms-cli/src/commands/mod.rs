//! CLI Commands Module
//!
//! Command definitions for the HCMS CLI.

pub mod report;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// HCMS maintenance points CLI
#[derive(Parser, Debug)]
#[command(name = "hcms")]
#[command(version)]
#[command(about = "HCMS maintenance points command line interface")]
#[command(long_about = "A command-line tool for the HCMS maintenance points engine.\n\n\
    Serve the points API over a fixture, or run balance, eligibility and \
    usage-report queries offline against the same fixture.")]
pub struct Cli {
    /// API endpoint URL
    #[arg(short, long, env = "HCMS_API_URL", default_value = "http://localhost:9011")]
    pub api_url: String,

    /// JSON fixture seeding the in-memory store (env: HCMS_FIXTURE_PATH)
    #[arg(long, env = "HCMS_FIXTURE_PATH")]
    pub fixture: Option<PathBuf>,

    /// Month addition for cycle boundaries: calendar or thirty_day
    #[arg(long, env = "HCMS_MONTH_ARITHMETIC", default_value = "calendar")]
    pub month_arithmetic: String,

    /// Malformed report filters: lenient or strict
    #[arg(long, env = "HCMS_REPORT_FILTER_POLICY", default_value = "lenient")]
    pub filter_policy: String,

    /// Output format (json, table, plain)
    #[arg(short, long, default_value = "table")]
    pub format: OutputFormat,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Output format options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// Table format (human-readable)
    #[default]
    Table,
    /// Plain text
    Plain,
}

/// Company and evaluation date shared by the offline queries
#[derive(clap::Args, Debug, Clone)]
pub struct QueryScope {
    /// Company the query runs for (env: HCMS_COMPANY_ID)
    #[arg(short, long, env = "HCMS_COMPANY_ID")]
    pub company: i64,

    /// Evaluation date (YYYY-MM-DD); defaults to the fixture's `now`, then today
    #[arg(long)]
    pub today: Option<NaiveDate>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HCMS API server over the fixture
    Serve {
        /// Host to bind to (env: HCMS_API_HOST)
        #[arg(short = 'H', long, env = "HCMS_API_HOST", default_value = "0.0.0.0")]
        host: String,
        /// Port to listen on (env: HCMS_API_PORT)
        #[arg(short, long, env = "HCMS_API_PORT", default_value = "9011")]
        port: u16,
    },

    /// Show the current-cycle balance of a project
    Balance {
        #[command(flatten)]
        scope: QueryScope,
        /// Project ID
        #[arg(short, long)]
        project: i64,
    },

    /// Check whether a project may open a new maintenance request
    Eligibility {
        #[command(flatten)]
        scope: QueryScope,
        /// Project ID
        #[arg(short, long)]
        project: i64,
    },

    /// List the company's projects with their availability
    Projects {
        #[command(flatten)]
        scope: QueryScope,
    },

    /// Build the point-usage report
    Report(report::ReportArgs),

    /// Check health of a running HCMS API
    Health,
}
