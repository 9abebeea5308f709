//! Output Formatting
//!
//! Utilities for formatting CLI output in various formats. JSON output uses
//! the same DTOs the HTTP API returns.

use crate::commands::OutputFormat;
use hcms_api::{EligibilityResponse, HealthResponse, MaintenanceProjectDto, RemainingPointsResponse};
use hcms_core::{CycleStatus, UsageReport};
use serde::Serialize;

/// Print as JSON
pub fn print_json<T: Serialize>(data: &T) {
    match serde_json::to_string_pretty(data) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Error formatting JSON: {}", e),
    }
}

/// Print health response
pub fn print_health(health: &HealthResponse, format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(health),
        OutputFormat::Table | OutputFormat::Plain => {
            println!("HCMS Service Health");
            println!("====================");
            println!("Status:  {}", health.status);
            println!("Version: {}", health.version);
            println!("Uptime:  {}s", health.uptime_secs);
            println!();
            println!("Components:");
            for component in &health.components {
                print!("  - {}: {}", component.name, component.status);
                if let Some(msg) = &component.message {
                    print!(" ({})", msg);
                }
                println!();
            }
        }
    }
}

/// One-line description of a cycle
pub fn describe_cycle(cycle: &CycleStatus) -> String {
    match cycle {
        CycleStatus::Active(c) => {
            let mut text = format!(
                "#{} {} .. {} ({} months)",
                c.index, c.start_date, c.end_date, c.months_in_cycle
            );
            if c.approximate_boundaries {
                text.push_str(" [approximate]");
            }
            text
        }
        CycleStatus::Inactive { reason } => format!("inactive ({:?})", reason),
    }
}

/// Print a project balance
pub fn print_balance(balance: &RemainingPointsResponse, format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(balance),
        OutputFormat::Plain => println!("{}", balance.remaining_points),
        OutputFormat::Table => {
            println!("Point Balance");
            println!("==============");
            print_row("Project:", &balance.project_id.to_string());
            print_row("Cycle:", &describe_cycle(&balance.cycle));
            print_row("Total Points:", &balance.total_points.to_string());
            print_row("Used Points:", &balance.used_points.to_string());
            print_row("Remaining Points:", &balance.remaining_points.to_string());
        }
    }
}

/// Print request eligibility
pub fn print_eligibility(eligibility: &EligibilityResponse, format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(eligibility),
        OutputFormat::Plain => println!("{}", eligibility.eligible),
        OutputFormat::Table => {
            println!("Request Eligibility");
            println!("====================");
            print_row("Project:", &eligibility.project_id.to_string());
            print_row("Eligible:", yes_no(eligibility.eligible));
            print_row("Payment Completed:", yes_no(eligibility.payment_completed));
            print_row("Contract Active:", yes_no(eligibility.contract_active));
            print_row("Remaining Points:", &eligibility.remaining_points.to_string());
            for reason in &eligibility.blocking_reasons {
                println!("  - blocked: {:?}", reason);
            }
        }
    }
}

/// Print the maintenance project listing
pub fn print_projects(projects: &[MaintenanceProjectDto], format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(&projects),
        OutputFormat::Plain => {
            for p in projects {
                println!("{}\t{}\t{}\t{}", p.id, p.permit, p.remaining_points, p.title);
            }
        }
        OutputFormat::Table => {
            println!(
                "{:<8} {:<7} {:>10} {:<9} {:<24} {}",
                "ID", "PERMIT", "REMAINING", "CONTRACT", "PERIOD", "TITLE"
            );
            print_separator();
            for p in projects {
                println!(
                    "{:<8} {:<7} {:>10} {:<9} {:<24} {}",
                    p.id,
                    yes_no(p.permit),
                    p.remaining_points,
                    format!("{:?}", p.contract_status).to_lowercase(),
                    format_period(p.contract_date, p.contract_termination_date),
                    p.title
                );
            }
        }
    }
}

/// Print the point-usage report
pub fn print_report(report: &UsageReport, format: OutputFormat) {
    match format {
        OutputFormat::Json => print_json(report),
        OutputFormat::Table | OutputFormat::Plain => {
            println!("Point Usage Report");
            println!("===================");
            if !report.maintenance_customer {
                println!("No active maintenance contract.");
                return;
            }
            if let Some(project) = &report.current_project {
                print_row("Project:", &format!("{} ({})", project.title, project.id));
            }
            print_row(
                "Period:",
                &format_period(report.period_start, report.period_end),
            );
            print_row("Total Points:", &report.total_points.to_string());
            print_row("Used Points:", &report.used_points.to_string());
            print_row("Remaining Points:", &report.remaining_points.to_string());

            if !report.worker_stats.is_empty() {
                println!();
                println!("Workers:");
                for worker in &report.worker_stats {
                    println!(
                        "  - {} (type {}): {} points over {} entries",
                        worker.name, worker.worker_type, worker.total_used, worker.event_count
                    );
                }
            }

            println!();
            println!("Monthly Usage:");
            for bucket in &report.chart_data {
                println!("  {}  {}", bucket.month, bucket.usage);
            }

            let page = &report.point_histories;
            println!();
            println!(
                "History (page {}/{}, {} entries):",
                page.page, page.total_pages, page.total
            );
            for item in &page.items {
                println!(
                    "  {}  {:>6}  {}  {}",
                    item.occurred_at, item.point, item.content, item.ticket_title
                );
            }

            for ignored in &report.ignored_filters {
                print_warning(&format!(
                    "ignored {} filter {:?}",
                    ignored.field, ignored.value
                ));
            }
        }
    }
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}

fn format_period(start: Option<chrono::NaiveDate>, end: Option<chrono::NaiveDate>) -> String {
    let show = |d: Option<chrono::NaiveDate>| d.map(|d| d.to_string()).unwrap_or_else(|| "-".into());
    format!("{} .. {}", show(start), show(end))
}

/// Print warning message
pub fn print_warning(message: &str) {
    eprintln!("Warning: {}", message);
}

/// Print a table row
pub fn print_row(key: &str, value: &str) {
    println!("{:<20} {}", key, value);
}

/// Print a separator line
pub fn print_separator() {
    println!("{}", "-".repeat(72));
}
