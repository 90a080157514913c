use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub components: ComponentHealth,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ComponentHealth {
    pub order_store: bool,
    pub http_api: bool,
}

impl ComponentHealth {
    pub fn get(&self, key: &str) -> Option<bool> {
        match key {
            "order_store" => Some(self.order_store),
            "http_api" => Some(self.http_api),
            _ => None,
        }
    }

    fn all_healthy(&self) -> bool {
        self.order_store && self.http_api
    }
}

#[derive(Clone)]
pub struct HealthChecker {
    start_time: std::time::Instant,
    status: Arc<RwLock<ComponentHealth>>,
}

impl Default for HealthChecker {
    fn default() -> Self {
        Self::new()
    }
}

impl HealthChecker {
    pub fn new() -> Self {
        Self {
            start_time: std::time::Instant::now(),
            status: Arc::new(RwLock::new(ComponentHealth::default())),
        }
    }

    pub async fn get_status(&self) -> HealthStatus {
        let components = self.status.read().await.clone();

        HealthStatus {
            status: if components.all_healthy() {
                "healthy".to_string()
            } else {
                "degraded".to_string()
            },
            version: env!("CARGO_PKG_VERSION").to_string(),
            uptime_seconds: self.start_time.elapsed().as_secs(),
            components,
        }
    }

    pub async fn update_component(&self, component: &str, healthy: bool) {
        let mut status = self.status.write().await;
        match component {
            "order_store" => status.order_store = healthy,
            "http_api" => status.http_api = healthy,
            other => tracing::warn!("Ignoring health update for unknown component {}", other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_starts_degraded() {
        let checker = HealthChecker::new();
        let status = checker.get_status().await;
        assert_eq!(status.status, "degraded");
        assert_eq!(status.components.get("order_store"), Some(false));
    }

    #[tokio::test]
    async fn test_healthy_once_all_components_up() {
        let checker = HealthChecker::new();
        checker.update_component("order_store", true).await;
        assert_eq!(checker.get_status().await.status, "degraded");

        checker.update_component("http_api", true).await;
        let status = checker.get_status().await;
        assert_eq!(status.status, "healthy");
        assert_eq!(status.version, env!("CARGO_PKG_VERSION"));
    }

    #[tokio::test]
    async fn test_unknown_component_ignored() {
        let checker = HealthChecker::new();
        checker.update_component("redis", true).await;
        assert_eq!(checker.get_status().await.components.get("redis"), None);
    }
}
