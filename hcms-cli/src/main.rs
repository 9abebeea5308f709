//! HCMS CLI Entry Point
//!
//! Configuration is loaded from environment variables (via .env file).
//! Command-line arguments override environment variables.
//!
//! Usage:
//!   hcms serve        - Start the HCMS API server over a fixture
//!   hcms balance      - Current-cycle balance of a project
//!   hcms eligibility  - New-request eligibility of a project
//!   hcms projects     - Company projects with availability
//!   hcms report       - Point-usage report
//!   hcms health       - Check health of a running API

use clap::Parser;
use hcms_cli::{handler, Cli};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // Load .env file (ignore if not found)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    init_logging(cli.verbose);

    if let Err(e) = handler::run(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(e.exit_code());
    }
}

/// Initialize logging with tracing; `RUST_LOG` overrides the default filter
fn init_logging(verbose: bool) {
    let default_filter = if verbose {
        "hcms_cli=debug,hcms_api=debug,hcms_store=debug,hcms_core=debug"
    } else {
        "hcms_cli=info,hcms_api=info,hcms_store=info,hcms_core=warn"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
