//! Application State
//!
//! Shared state for the HCMS API service.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, Utc};
use hcms_core::{BalanceCalculator, FilterPolicy, MonthArithmeticKind};
use hcms_store::{Fixture, MemoryStore, PointsService};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::auth::AuthConfig;
use crate::error::ApiError;

/// Application configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Service name
    pub service_name: String,
    /// Service version
    pub version: String,
    /// Listen address
    pub listen_addr: String,
    /// Enable CORS
    pub enable_cors: bool,
    /// Request timeout (seconds)
    pub request_timeout_secs: u64,
    /// Month addition used for cycle boundaries
    pub month_arithmetic: MonthArithmeticKind,
    /// Handling of malformed report filters
    pub filter_policy: FilterPolicy,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            service_name: "hcms-api".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            listen_addr: format!("0.0.0.0:{}", crate::DEFAULT_PORT),
            enable_cors: true,
            request_timeout_secs: 30,
            month_arithmetic: MonthArithmeticKind::Calendar,
            filter_policy: FilterPolicy::Lenient,
        }
    }
}

impl ApiConfig {
    /// Create from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let listen_addr = std::env::var("HCMS_LISTEN_ADDR").unwrap_or(defaults.listen_addr);

        let enable_cors = std::env::var("HCMS_ENABLE_CORS")
            .map(|v| v.to_lowercase() == "true" || v == "1")
            .unwrap_or(defaults.enable_cors);

        let request_timeout_secs = std::env::var("HCMS_REQUEST_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.request_timeout_secs);

        let month_arithmetic = match std::env::var("HCMS_MONTH_ARITHMETIC") {
            Ok(raw) => MonthArithmeticKind::from_str(&raw).unwrap_or_else(|| {
                tracing::warn!(value = %raw, "Unknown HCMS_MONTH_ARITHMETIC, using calendar");
                MonthArithmeticKind::Calendar
            }),
            Err(_) => defaults.month_arithmetic,
        };

        let filter_policy = match std::env::var("HCMS_REPORT_FILTER_POLICY") {
            Ok(raw) => FilterPolicy::from_str(&raw).unwrap_or_else(|| {
                tracing::warn!(value = %raw, "Unknown HCMS_REPORT_FILTER_POLICY, using lenient");
                FilterPolicy::Lenient
            }),
            Err(_) => defaults.filter_policy,
        };

        Self {
            listen_addr,
            enable_cors,
            request_timeout_secs,
            month_arithmetic,
            filter_policy,
            ..defaults
        }
    }
}

/// Source of "today" for balance queries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Clock {
    /// Local wall clock
    System,
    /// Pinned instant, for fixtures and tests
    Fixed(NaiveDateTime),
}

impl Clock {
    pub fn today(&self) -> NaiveDate {
        match self {
            Clock::System => Local::now().date_naive(),
            Clock::Fixed(at) => at.date(),
        }
    }

    pub fn now(&self) -> NaiveDateTime {
        match self {
            Clock::System => Local::now().naive_local(),
            Clock::Fixed(at) => *at,
        }
    }
}

/// Application state shared across handlers
pub struct AppState {
    /// Configuration
    pub config: ApiConfig,
    /// Authentication configuration
    pub auth_config: AuthConfig,
    /// Points service
    pub points: PointsService,
    /// Clock used for "today"
    pub clock: Clock,
    /// Service start time
    pub started_at: DateTime<Utc>,
    /// Prometheus handle, when metrics are enabled
    pub metrics: Option<PrometheusHandle>,
    /// Requests in flight
    in_flight: AtomicU64,
}

impl AppState {
    /// Create new application state with default config
    pub fn new(points: PointsService) -> Self {
        Self::with_config(ApiConfig::default(), points)
    }

    /// Create with configuration
    pub fn with_config(config: ApiConfig, points: PointsService) -> Self {
        Self {
            config,
            auth_config: AuthConfig::default(),
            points,
            clock: Clock::System,
            started_at: Utc::now(),
            metrics: None,
            in_flight: AtomicU64::new(0),
        }
    }

    /// Set authentication configuration
    pub fn with_auth(mut self, auth_config: AuthConfig) -> Self {
        self.auth_config = auth_config;
        self
    }

    /// Attach the Prometheus handle
    pub fn with_metrics(mut self, handle: Option<PrometheusHandle>) -> Self {
        self.metrics = handle;
        self
    }

    /// Set the clock
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Create application state over an in-memory store seeded from a fixture.
    ///
    /// A fixture carrying `now` pins the clock to that instant.
    pub async fn from_fixture(config: ApiConfig, fixture: Fixture) -> Result<Self, ApiError> {
        let clock = fixture.now.map(Clock::Fixed).unwrap_or(Clock::System);
        let store = MemoryStore::from_fixture(fixture).await?;

        let calculator = BalanceCalculator::with_months(config.month_arithmetic.strategy());
        let points = PointsService::new(Arc::new(store), calculator, config.filter_policy);

        tracing::info!(
            month_arithmetic = config.month_arithmetic.as_str(),
            filter_policy = config.filter_policy.as_str(),
            "Points service initialized"
        );

        Ok(Self::with_config(config, points).with_clock(clock))
    }

    /// Get service uptime in seconds
    pub fn uptime_secs(&self) -> u64 {
        let now = Utc::now();
        (now - self.started_at).num_seconds().max(0) as u64
    }

    /// Count a request in; returns the number in flight
    pub fn begin_request(&self) -> u64 {
        self.in_flight.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Count a request out; returns the number in flight
    pub fn end_request(&self) -> u64 {
        self.in_flight.fetch_sub(1, Ordering::Relaxed).saturating_sub(1)
    }
}

/// Health status of the service
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Service is healthy
    Healthy,
    /// Service is degraded but functional
    Degraded,
    /// Service is unhealthy
    Unhealthy,
}

impl HealthStatus {
    /// Convert to string
    pub fn as_str(&self) -> &'static str {
        match self {
            HealthStatus::Healthy => "healthy",
            HealthStatus::Degraded => "degraded",
            HealthStatus::Unhealthy => "unhealthy",
        }
    }
}

/// Component health check result
#[derive(Debug, Clone)]
pub struct ComponentHealthCheck {
    /// Component name
    pub name: String,
    /// Health status
    pub status: HealthStatus,
    /// Optional message
    pub message: Option<String>,
}

impl ComponentHealthCheck {
    /// Create a healthy result
    pub fn healthy(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: HealthStatus::Healthy,
            message: None,
        }
    }

    /// Create a degraded result
    pub fn degraded(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: HealthStatus::Degraded,
            message: Some(message.into()),
        }
    }

    /// Create an unhealthy result
    pub fn unhealthy(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: HealthStatus::Unhealthy,
            message: Some(message.into()),
        }
    }
}
