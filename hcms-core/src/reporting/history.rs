//! Usage history pages

use crate::calendar::{start_of_day, DateTimeRange};
use crate::error::{HcmsError, HcmsResult};
use crate::ledger::{effective_worker_type, latest_point_comments};
use crate::types::{
    EntryId, ExecutionState, LedgerFilter, LedgerKind, LedgerScope, MaintenanceComment,
    PointLedgerEntry, TicketId,
};
use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Default page size for usage history
pub const DEFAULT_PER_PAGE: u32 = 20;
/// Largest accepted page size
pub const MAX_PER_PAGE: u32 = 100;

/// Validated page request
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    page: u32,
    per_page: u32,
}

impl Pagination {
    /// `page >= 1` and `1 <= per_page <= 100`
    pub fn new(page: u32, per_page: u32) -> HcmsResult<Self> {
        if page == 0 || per_page == 0 || per_page > MAX_PER_PAGE {
            return Err(HcmsError::InvalidPagination { page, per_page });
        }
        Ok(Self { page, per_page })
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn per_page(&self) -> u32 {
        self.per_page
    }

    pub fn offset(&self) -> usize {
        (self.page as usize - 1).saturating_mul(self.per_page as usize)
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

/// Page count, at least 1 so an empty listing still renders one page
pub fn total_pages(total: u64, per_page: u32) -> u32 {
    let per_page = u64::from(per_page.max(1));
    let pages = total.div_ceil(per_page).max(1);
    u32::try_from(pages).unwrap_or(u32::MAX)
}

/// One page of a listing
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub per_page: u32,
    pub total_pages: u32,
}

impl<T> Page<T> {
    /// Slice the page out of a fully ordered listing
    pub fn from_ordered(all: Vec<T>, pagination: Pagination) -> Self {
        let total = all.len() as u64;
        let items = all
            .into_iter()
            .skip(pagination.offset())
            .take(pagination.per_page() as usize)
            .collect();
        Self {
            items,
            total,
            page: pagination.page(),
            per_page: pagination.per_page(),
            total_pages: total_pages(total, pagination.per_page()),
        }
    }

    pub fn empty(pagination: Pagination) -> Self {
        Self::from_ordered(Vec::new(), pagination)
    }
}

/// How malformed report filters are handled
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterPolicy {
    /// Drop the filter and report it in `ignored`
    #[default]
    Lenient,
    /// Reject with [`HcmsError::InvalidFilter`]
    Strict,
}

impl FilterPolicy {
    /// Parse from string (for environment variables)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "lenient" => Some(Self::Lenient),
            "strict" => Some(Self::Strict),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Lenient => "lenient",
            Self::Strict => "strict",
        }
    }
}

/// Raw history filters as supplied by a caller
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryFilters {
    #[serde(default)]
    pub search_text: Option<String>,
    /// `YYYY-MM-DD`
    #[serde(default)]
    pub date_from: Option<String>,
    /// `YYYY-MM-DD`, inclusive through end of day
    #[serde(default)]
    pub date_to: Option<String>,
    /// Ledger kind code
    #[serde(default)]
    pub point_type: Option<String>,
}

/// Filter that was dropped under the lenient policy
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IgnoredFilter {
    pub field: String,
    pub value: String,
}

/// Parsed history filters
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ParsedFilters {
    /// Lowercased search needle
    pub search_text: Option<String>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub kind: Option<LedgerKind>,
    pub ignored: Vec<IgnoredFilter>,
}

fn present(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

impl HistoryFilters {
    /// Parse raw filters. Blank values count as absent.
    pub fn parse(&self, policy: FilterPolicy) -> HcmsResult<ParsedFilters> {
        let mut parsed = ParsedFilters {
            search_text: present(&self.search_text).map(str::to_lowercase),
            ..Default::default()
        };

        let reject = |field: &str, value: &str, parsed: &mut ParsedFilters| match policy {
            FilterPolicy::Strict => Err(HcmsError::invalid_filter(field, value)),
            FilterPolicy::Lenient => {
                tracing::debug!(field, value, "Ignoring malformed report filter");
                parsed.ignored.push(IgnoredFilter {
                    field: field.to_string(),
                    value: value.to_string(),
                });
                Ok(())
            }
        };

        if let Some(raw) = present(&self.date_from) {
            match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
                Ok(date) => parsed.date_from = Some(date),
                Err(_) => reject("date_from", raw, &mut parsed)?,
            }
        }
        if let Some(raw) = present(&self.date_to) {
            match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
                Ok(date) => parsed.date_to = Some(date),
                Err(_) => reject("date_to", raw, &mut parsed)?,
            }
        }
        if let Some(raw) = present(&self.point_type) {
            match raw.parse::<i32>().ok().and_then(|code| LedgerKind::from_code(code).ok()) {
                Some(kind) => parsed.kind = Some(kind),
                None => reject("point_type", raw, &mut parsed)?,
            }
        }

        Ok(parsed)
    }
}

impl ParsedFilters {
    fn window_contains(&self, entry: &PointLedgerEntry) -> bool {
        if let Some(from) = self.date_from {
            if entry.occurred_at < start_of_day(from) {
                return false;
            }
        }
        if let Some(to) = self.date_to {
            if let Some(next_day) = to.checked_add_days(Days::new(1)) {
                if entry.occurred_at >= start_of_day(next_day) {
                    return false;
                }
            }
        }
        true
    }
}

/// Presentation row of a ledger entry
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryItem {
    pub id: EntryId,
    /// `YYYY-MM-DD HH:MM:SS`
    pub occurred_at: String,
    pub content: String,
    pub kind: LedgerKind,
    /// Absolute point value
    pub point: u64,
    pub state: ExecutionState,
    pub worker_type: Option<i32>,
    pub ticket_title: String,
}

/// Ledger rows and their reporting context
#[derive(Clone, Copy, Debug)]
pub struct HistorySource<'a> {
    pub entries: &'a [PointLedgerEntry],
    pub ticket_titles: &'a HashMap<TicketId, String>,
    pub comments: &'a [MaintenanceComment],
}

fn ticket_title<'a>(titles: &'a HashMap<TicketId, String>, entry: &PointLedgerEntry) -> &'a str {
    entry
        .ticket_id
        .and_then(|id| titles.get(&id))
        .map(String::as_str)
        .unwrap_or("")
}

/// Filtered, newest-first page of all entries of `scope` inside `window`.
///
/// All kinds and execution states are listed unless `filters` narrows them.
/// Search matches the entry content or the linked ticket title, case
/// insensitive. Equal timestamps order by id, newest first.
pub fn usage_history_page(
    source: HistorySource<'_>,
    scope: LedgerScope,
    window: DateTimeRange,
    filters: &ParsedFilters,
    pagination: Pagination,
) -> Page<HistoryItem> {
    let mut base = LedgerFilter::for_scope(scope).with_window(window);
    base.kind = filters.kind;

    let title_of = |entry: &PointLedgerEntry| ticket_title(source.ticket_titles, entry);

    let mut matched: Vec<&PointLedgerEntry> = source
        .entries
        .iter()
        .filter(|entry| base.matches(entry))
        .filter(|entry| filters.window_contains(entry))
        .filter(|entry| match &filters.search_text {
            Some(needle) => {
                entry.content.to_lowercase().contains(needle.as_str())
                    || title_of(*entry).to_lowercase().contains(needle.as_str())
            }
            None => true,
        })
        .collect();

    matched.sort_by(|a, b| {
        b.occurred_at
            .cmp(&a.occurred_at)
            .then_with(|| b.id.cmp(&a.id))
    });

    let page = Page::from_ordered(matched, pagination);
    let latest = latest_point_comments(source.comments);

    Page {
        items: page
            .items
            .into_iter()
            .map(|entry| {
                let comment = entry
                    .ticket_id
                    .and_then(|id| latest.get(&id).copied());
                HistoryItem {
                    id: entry.id,
                    occurred_at: entry.occurred_at.format("%Y-%m-%d %H:%M:%S").to_string(),
                    content: entry.content.clone(),
                    kind: entry.kind,
                    point: entry.magnitude(),
                    state: entry.state,
                    worker_type: effective_worker_type(entry, comment),
                    ticket_title: title_of(entry).to_string(),
                }
            })
            .collect(),
        total: page.total,
        page: page.page,
        per_page: page.per_page,
        total_pages: page.total_pages,
    }
}
