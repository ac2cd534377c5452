//! Health checks
//!
//! `GET /health` reports the document store and the attachment gateway the
//! process is running with.

use std::sync::Arc;
use std::time::Instant;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use clinic_db::Stores;
use serde::Serialize;
use tracing::warn;

/// Health check status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

/// Individual component health
#[derive(Debug, Clone, Serialize)]
pub struct ComponentHealth {
    pub name: String,
    pub status: HealthStatus,
    pub backend: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub response_time_ms: u64,
}

/// Overall health report
#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    pub status: HealthStatus,
    pub version: String,
    pub uptime_seconds: u64,
    pub components: Vec<ComponentHealth>,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl HealthReport {
    pub fn http_status(&self) -> StatusCode {
        match self.status {
            HealthStatus::Healthy | HealthStatus::Degraded => StatusCode::OK,
            HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

/// Health checker service
pub struct HealthChecker {
    stores: Stores,
    gateway: String,
    start_time: Instant,
}

impl HealthChecker {
    pub fn new(stores: Stores, gateway: impl Into<String>) -> Self {
        Self {
            stores,
            gateway: gateway.into(),
            start_time: Instant::now(),
        }
    }

    pub async fn check(&self) -> HealthReport {
        let store = self.check_store().await;
        let gateway = self.check_gateway();

        let status = if store.status == HealthStatus::Unhealthy {
            HealthStatus::Unhealthy
        } else if store.status == HealthStatus::Degraded || gateway.status == HealthStatus::Degraded
        {
            HealthStatus::Degraded
        } else {
            HealthStatus::Healthy
        };

        HealthReport {
            status,
            version: env!("CARGO_PKG_VERSION").to_string(),
            uptime_seconds: self.start_time.elapsed().as_secs(),
            components: vec![store, gateway],
            timestamp: chrono::Utc::now(),
        }
    }

    async fn check_store(&self) -> ComponentHealth {
        let start = Instant::now();
        let backend = self.stores.backend_name();

        let (status, message) = match self.stores.ping().await {
            Ok(()) if backend == "memory" => (
                HealthStatus::Degraded,
                Some("Documents are kept in memory".to_string()),
            ),
            Ok(()) => (HealthStatus::Healthy, None),
            Err(e) => {
                warn!(error = %e, "Document store ping failed");
                (HealthStatus::Unhealthy, Some(e.to_string()))
            }
        };

        ComponentHealth {
            name: "document_store".to_string(),
            status,
            backend: backend.to_string(),
            message,
            response_time_ms: start.elapsed().as_millis() as u64,
        }
    }

    fn check_gateway(&self) -> ComponentHealth {
        let (status, message) = if self.gateway == "memory" {
            (
                HealthStatus::Degraded,
                Some("Attachments are kept in memory".to_string()),
            )
        } else {
            (HealthStatus::Healthy, None)
        };

        ComponentHealth {
            name: "attachment_gateway".to_string(),
            status,
            backend: self.gateway.clone(),
            message,
            response_time_ms: 0,
        }
    }
}

/// Liveness text
pub async fn liveness() -> &'static str {
    "Server is running"
}

/// Full health report
pub async fn health(State(checker): State<Arc<HealthChecker>>) -> (StatusCode, Json<HealthReport>) {
    let report = checker.check().await;
    (report.http_status(), Json(report))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_backends_are_degraded() {
        let checker = HealthChecker::new(Stores::memory(), "memory");
        let report = checker.check().await;

        assert_eq!(report.status, HealthStatus::Degraded);
        assert_eq!(report.http_status(), StatusCode::OK);
        assert_eq!(report.components.len(), 2);
        assert_eq!(report.components[0].backend, "memory");
    }

    #[test]
    fn test_unhealthy_is_unavailable() {
        let report = HealthReport {
            status: HealthStatus::Unhealthy,
            version: "0.1.0".to_string(),
            uptime_seconds: 1,
            components: vec![],
            timestamp: chrono::Utc::now(),
        };
        assert_eq!(report.http_status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
