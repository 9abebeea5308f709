//! Report Command
//!
//! Arguments of the point-usage report.

use clap::Args;
use hcms_core::{HistoryFilters, ProjectId, DEFAULT_PER_PAGE};

use super::QueryScope;

/// Point-usage report arguments
#[derive(Args, Debug, Clone)]
pub struct ReportArgs {
    #[command(flatten)]
    pub scope: QueryScope,

    /// Project to report on; falls back to the latest active project
    #[arg(short, long)]
    pub project: Option<i64>,

    /// Case-insensitive match on content or ticket title
    #[arg(long)]
    pub search: Option<String>,

    /// First day of the history window (YYYY-MM-DD)
    #[arg(long)]
    pub from: Option<String>,

    /// Last day of the history window (YYYY-MM-DD)
    #[arg(long)]
    pub to: Option<String>,

    /// Ledger kind code (1 = charge, 2 = usage, 3 = accrual pending)
    #[arg(long)]
    pub point_type: Option<String>,

    /// Page number (1-indexed)
    #[arg(long, default_value = "1")]
    pub page: u32,

    /// Page size
    #[arg(short = 's', long, default_value_t = DEFAULT_PER_PAGE)]
    pub per_page: u32,
}

impl ReportArgs {
    pub fn requested_project(&self) -> Option<ProjectId> {
        self.project.map(ProjectId)
    }

    pub fn filters(&self) -> HistoryFilters {
        HistoryFilters {
            search_text: self.search.clone(),
            date_from: self.from.clone(),
            date_to: self.to.clone(),
            point_type: self.point_type.clone(),
        }
    }
}
