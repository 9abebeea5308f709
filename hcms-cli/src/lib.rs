//! HCMS CLI - Command Line Interface
//!
//! This crate provides a command-line interface for the HCMS maintenance
//! points engine.
//!
//! # Features
//!
//! - Serve the points API over a JSON fixture
//! - Query balances, eligibility, project availability and usage reports
//!   offline against the same fixture
//! - Check the health of a running API
//!
//! # Usage
//!
//! ```text
//! hcms [OPTIONS] <COMMAND>
//!
//! Commands:
//!   serve        Start the HCMS API server over the fixture
//!   balance      Show the current-cycle balance of a project
//!   eligibility  Check whether a project may open a new maintenance request
//!   projects     List the company's projects with their availability
//!   report       Build the point-usage report
//!   health       Check health of a running HCMS API
//!
//! Options:
//!   -a, --api-url <URL>        API endpoint URL [default: http://localhost:9011]
//!       --fixture <PATH>       JSON fixture seeding the in-memory store
//!       --month-arithmetic     calendar | thirty_day [default: calendar]
//!       --filter-policy        lenient | strict [default: lenient]
//!   -f, --format <FORMAT>      Output format (json, table, plain) [default: table]
//!   -v, --verbose              Enable verbose output
//! ```
//!
//! # Examples
//!
//! ## Remaining points on a given day
//! ```text
//! hcms --fixture fixture.json balance --company 1 --project 10 --today 2024-03-01
//! ```
//!
//! ## Usage report, second page, usage rows only
//! ```text
//! hcms --fixture fixture.json report -c 1 --point-type 2 --page 2
//! ```

pub mod client;
pub mod commands;
pub mod error;
pub mod handler;
pub mod output;

pub use client::HcmsClient;
pub use commands::{Cli, Commands, OutputFormat};
pub use error::{CliError, CliResult};

/// HCMS CLI version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
