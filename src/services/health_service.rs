use crate::config::HealthConfig;
use crate::storage::UserRepository;
use opentelemetry::{KeyValue, global, metrics::Gauge};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;

#[derive(Clone, Debug)]
pub struct Metrics {
    pub status: Gauge<i64>,
}

impl Metrics {
    #[must_use]
    pub(crate) fn new() -> Self {
        let meter = global::meter("user-service");
        Self {
            status: meter
                .i64_gauge("user_store_health_status")
                .with_description("Status of the user store health check (1 for ok, 0 for error)")
                .build(),
        }
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone, Debug)]
pub struct HealthService {
    repo: Arc<dyn UserRepository>,
    config: HealthConfig,
    metrics: Metrics,
}

impl HealthService {
    #[must_use]
    pub fn new(repo: Arc<dyn UserRepository>, config: HealthConfig) -> Self {
        Self { repo, config, metrics: Metrics::new() }
    }

    /// Checks that the user store answers within the configured timeout.
    ///
    /// # Errors
    /// Returns a string describing the failure if the store is unreachable or slow.
    pub async fn check_store(&self) -> Result<(), String> {
        let store_timeout = Duration::from_millis(self.config.store_timeout_ms);
        let component = [KeyValue::new("component", "store")];

        match timeout(store_timeout, self.repo.ping()).await {
            Ok(Ok(())) => {
                self.metrics.status.record(1, &component);
                Ok(())
            }
            Ok(Err(e)) => {
                self.metrics.status.record(0, &component);
                Err(format!("User store check failed: {e}"))
            }
            Err(_) => {
                self.metrics.status.record(0, &component);
                Err("User store check timed out".to_string())
            }
        }
    }
}
