//! Health checks
//!
//! `/health` and `/health/live` only say the process is up; `/health/ready`
//! checks the database and the upload directory.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use sqlx::PgPool;
use tokio::sync::RwLock;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        matches!(self, Self::Healthy | Self::Degraded)
    }

    fn worst(self, other: Self) -> Self {
        match (self, other) {
            (Self::Unhealthy, _) | (_, Self::Unhealthy) => Self::Unhealthy,
            (Self::Degraded, _) | (_, Self::Degraded) => Self::Degraded,
            _ => Self::Healthy,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ComponentHealth {
    pub name: &'static str,
    pub status: HealthStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub response_time_ms: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    pub status: HealthStatus,
    pub version: &'static str,
    pub uptime_seconds: u64,
    pub components: Vec<ComponentHealth>,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl HealthReport {
    pub fn http_status(&self) -> StatusCode {
        if self.status.is_healthy() {
            StatusCode::OK
        } else {
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}

#[derive(Debug, Clone)]
pub struct HealthConfig {
    /// Timeout for individual checks
    pub check_timeout: Duration,
    /// How long a report is reused
    pub cache_duration: Duration,
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            check_timeout: Duration::from_secs(3),
            cache_duration: Duration::from_secs(5),
        }
    }
}

struct CachedHealth {
    report: HealthReport,
    cached_at: Instant,
}

pub struct HealthChecker {
    config: HealthConfig,
    start_time: Instant,
    cache: RwLock<Option<CachedHealth>>,
    pool: Option<PgPool>,
    uploads_dir: Option<PathBuf>,
}

impl HealthChecker {
    pub fn new(config: HealthConfig) -> Self {
        Self {
            config,
            start_time: Instant::now(),
            cache: RwLock::new(None),
            pool: None,
            uploads_dir: None,
        }
    }

    pub fn with_pool(mut self, pool: PgPool) -> Self {
        self.pool = Some(pool);
        self
    }

    pub fn with_uploads_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.uploads_dir = Some(dir.into());
        self
    }

    /// Cached report, or a fresh one once the cache has expired
    pub async fn check(&self) -> HealthReport {
        {
            let cache = self.cache.read().await;
            if let Some(ref cached) = *cache {
                if cached.cached_at.elapsed() < self.config.cache_duration {
                    debug!("Returning cached health report");
                    return cached.report.clone();
                }
            }
        }

        let report = self.perform_checks().await;

        *self.cache.write().await = Some(CachedHealth {
            report: report.clone(),
            cached_at: Instant::now(),
        });
        report
    }

    async fn perform_checks(&self) -> HealthReport {
        let mut components = Vec::new();

        if let Some(ref pool) = self.pool {
            components.push(self.check_database(pool).await);
        }
        if let Some(ref dir) = self.uploads_dir {
            components.push(check_uploads_dir(dir).await);
        }

        let status = components
            .iter()
            .fold(HealthStatus::Healthy, |acc, c| acc.worst(c.status));
        if !status.is_healthy() {
            warn!(?status, "Health check failed");
        }

        HealthReport {
            status,
            version: env!("CARGO_PKG_VERSION"),
            uptime_seconds: self.start_time.elapsed().as_secs(),
            components,
            timestamp: chrono::Utc::now(),
        }
    }

    async fn check_database(&self, pool: &PgPool) -> ComponentHealth {
        let start = Instant::now();
        let ping = sqlx::query("SELECT 1").execute(pool);

        let (status, message) = match tokio::time::timeout(self.config.check_timeout, ping).await {
            Ok(Ok(_)) => (HealthStatus::Healthy, None),
            Ok(Err(e)) => (HealthStatus::Unhealthy, Some(e.to_string())),
            Err(_) => (HealthStatus::Unhealthy, Some("timed out".to_string())),
        };

        ComponentHealth {
            name: "database",
            status,
            message,
            response_time_ms: start.elapsed().as_millis() as u64,
        }
    }
}

/// A missing upload directory only degrades the service; it is created on
/// the first upload
async fn check_uploads_dir(dir: &PathBuf) -> ComponentHealth {
    let start = Instant::now();
    let (status, message) = match tokio::fs::metadata(dir).await {
        Ok(meta) if meta.is_dir() => (HealthStatus::Healthy, None),
        Ok(_) => (
            HealthStatus::Unhealthy,
            Some(format!("{} is not a directory", dir.display())),
        ),
        Err(e) => (
            HealthStatus::Degraded,
            Some(format!("{}: {}", dir.display(), e)),
        ),
    };

    ComponentHealth {
        name: "uploads",
        status,
        message,
        response_time_ms: start.elapsed().as_millis() as u64,
    }
}

/// GET /health and /health/live
pub async fn liveness() -> &'static str {
    "OK"
}

/// GET /health/ready
pub async fn readiness(
    State(checker): State<Arc<HealthChecker>>,
) -> (StatusCode, Json<HealthReport>) {
    let report = checker.check().await;
    (report.http_status(), Json(report))
}
