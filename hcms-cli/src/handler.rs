//! Command Handlers
//!
//! Handler functions for CLI commands. Balance, eligibility, project and
//! report queries run offline against the fixture through the same
//! [`PointsService`] the API uses.

use crate::client::HcmsClient;
use crate::commands::{report::ReportArgs, Cli, Commands, OutputFormat, QueryScope};
use crate::error::{CliError, CliResult};
use crate::output;
use chrono::{Local, NaiveDate, NaiveDateTime};
use hcms_api::{
    ApiConfig, AppState, AuthConfig, EligibilityResponse, MaintenanceProjectDto, MetricsConfig,
    RemainingPointsResponse,
};
use hcms_core::{BalanceCalculator, CompanyId, FilterPolicy, MonthArithmeticKind, Pagination, ProjectId};
use hcms_store::{Fixture, MemoryStore, PointsService};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Engine settings taken from the command line
#[derive(Debug, Clone, Copy)]
pub struct EngineSettings {
    pub month_arithmetic: MonthArithmeticKind,
    pub filter_policy: FilterPolicy,
}

impl EngineSettings {
    pub fn from_cli(month_arithmetic: &str, filter_policy: &str) -> CliResult<Self> {
        let month_arithmetic = MonthArithmeticKind::from_str(month_arithmetic).ok_or_else(|| {
            CliError::invalid_arg(format!(
                "month arithmetic must be calendar or thirty_day, got {:?}",
                month_arithmetic
            ))
        })?;
        let filter_policy = FilterPolicy::from_str(filter_policy).ok_or_else(|| {
            CliError::invalid_arg(format!(
                "filter policy must be lenient or strict, got {:?}",
                filter_policy
            ))
        })?;
        Ok(Self {
            month_arithmetic,
            filter_policy,
        })
    }
}

/// Fixture-backed points service for offline queries
pub struct OfflineContext {
    pub service: PointsService,
    /// Pinned "now" from the fixture
    pub now: Option<NaiveDateTime>,
}

impl OfflineContext {
    /// Load the fixture and build the service
    pub async fn load(fixture: Option<&Path>, settings: EngineSettings) -> CliResult<Self> {
        let path = fixture.ok_or_else(|| {
            CliError::config("a fixture is required (--fixture or HCMS_FIXTURE_PATH)")
        })?;
        let fixture = Fixture::load(path).await?;
        let now = fixture.now;
        let store = MemoryStore::from_fixture(fixture).await?;

        let calculator = BalanceCalculator::with_months(settings.month_arithmetic.strategy());
        let service = PointsService::new(Arc::new(store), calculator, settings.filter_policy);
        Ok(Self { service, now })
    }

    /// Evaluation date: explicit, then the fixture's, then the local date
    pub fn today(&self, explicit: Option<NaiveDate>) -> NaiveDate {
        explicit
            .or_else(|| self.now.map(|now| now.date()))
            .unwrap_or_else(|| Local::now().date_naive())
    }
}

/// Run the CLI with parsed arguments
pub async fn run(cli: Cli) -> CliResult<()> {
    let settings = EngineSettings::from_cli(&cli.month_arithmetic, &cli.filter_policy)?;
    let Cli {
        api_url,
        fixture,
        format,
        command,
        ..
    } = cli;

    match command {
        Commands::Serve { host, port } => handle_serve(fixture, settings, host, port).await,
        Commands::Health => {
            let client = HcmsClient::new(&api_url)?;
            handle_health(&client, format).await
        }
        Commands::Balance { scope, project } => {
            let ctx = OfflineContext::load(fixture.as_deref(), settings).await?;
            handle_balance(&ctx, &scope, project, format).await
        }
        Commands::Eligibility { scope, project } => {
            let ctx = OfflineContext::load(fixture.as_deref(), settings).await?;
            handle_eligibility(&ctx, &scope, project, format).await
        }
        Commands::Projects { scope } => {
            let ctx = OfflineContext::load(fixture.as_deref(), settings).await?;
            handle_projects(&ctx, &scope, format).await
        }
        Commands::Report(args) => {
            let ctx = OfflineContext::load(fixture.as_deref(), settings).await?;
            handle_report(&ctx, &args, format).await
        }
    }
}

/// Handle starting the API server
async fn handle_serve(
    fixture: Option<PathBuf>,
    settings: EngineSettings,
    host: String,
    port: u16,
) -> CliResult<()> {
    let fixture = match fixture {
        Some(path) => Fixture::load(&path).await?,
        None => {
            tracing::warn!("No fixture configured; serving an empty store");
            Fixture::default()
        }
    };

    let config = ApiConfig {
        listen_addr: format!("{}:{}", host, port),
        month_arithmetic: settings.month_arithmetic,
        filter_policy: settings.filter_policy,
        ..ApiConfig::from_env()
    };

    println!("Starting HCMS API server...");
    println!("  Listen: {}", config.listen_addr);
    println!("  Month arithmetic: {}", config.month_arithmetic.as_str());
    println!("  Filter policy: {}", config.filter_policy.as_str());

    let metrics = hcms_api::init_metrics(&MetricsConfig::from_env()).map_err(CliError::server)?;

    let state = AppState::from_fixture(config, fixture)
        .await
        .map_err(|e| CliError::server(format!("State initialization failed: {}", e)))?
        .with_auth(AuthConfig::from_env())
        .with_metrics(metrics);

    hcms_api::start_server(state)
        .await
        .map_err(|e| CliError::server(format!("Server error: {}", e)))?;

    Ok(())
}

/// Handle health check command
async fn handle_health(client: &HcmsClient, format: OutputFormat) -> CliResult<()> {
    let health = client.health().await?;
    output::print_health(&health, format);
    Ok(())
}

/// Handle balance command
async fn handle_balance(
    ctx: &OfflineContext,
    scope: &QueryScope,
    project: i64,
    format: OutputFormat,
) -> CliResult<()> {
    let project_id = ProjectId(project);
    let balance = ctx
        .service
        .balance(CompanyId(scope.company), project_id, ctx.today(scope.today))
        .await?;
    output::print_balance(&RemainingPointsResponse::new(project_id, balance), format);
    Ok(())
}

/// Handle eligibility command
async fn handle_eligibility(
    ctx: &OfflineContext,
    scope: &QueryScope,
    project: i64,
    format: OutputFormat,
) -> CliResult<()> {
    let project_id = ProjectId(project);
    let eligibility = ctx
        .service
        .eligibility(CompanyId(scope.company), project_id, ctx.today(scope.today))
        .await?;
    output::print_eligibility(&EligibilityResponse::new(project_id, eligibility), format);
    Ok(())
}

/// Handle projects command
async fn handle_projects(
    ctx: &OfflineContext,
    scope: &QueryScope,
    format: OutputFormat,
) -> CliResult<()> {
    let projects: Vec<MaintenanceProjectDto> = ctx
        .service
        .maintenance_projects(CompanyId(scope.company), ctx.today(scope.today))
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    output::print_projects(&projects, format);
    Ok(())
}

/// Handle report command
async fn handle_report(
    ctx: &OfflineContext,
    args: &ReportArgs,
    format: OutputFormat,
) -> CliResult<()> {
    let pagination = Pagination::new(args.page, args.per_page)?;
    let report = ctx
        .service
        .usage_report(
            CompanyId(args.scope.company),
            args.requested_project(),
            args.filters(),
            pagination,
            ctx.today(args.scope.today),
        )
        .await?;
    output::print_report(&report, format);
    Ok(())
}
