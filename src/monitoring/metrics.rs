//! Per-route request metrics.
//!
//! Paths carry trader ids, so they are collapsed to a fixed set of route
//! patterns before being used as labels. Anything that matches no known route
//! is reported as `/..`.

use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder,
};
use std::time::Duration;

#[derive(Clone, Debug)]
pub struct ApiMetrics {
    registry: Registry,
    requests_total: IntCounterVec,
    request_duration_seconds: HistogramVec,
}

impl ApiMetrics {
    pub fn new() -> prometheus::Result<Self> {
        let registry = Registry::new();

        let requests_total = IntCounterVec::new(
            Opts::new("http_requests_total", "Number of completed API requests."),
            &["route", "method", "status"],
        )?;
        let request_duration_seconds = HistogramVec::new(
            HistogramOpts::new(
                "http_request_duration_seconds",
                "Execution time for each API request.",
            ),
            &["route", "method"],
        )?;

        registry.register(Box::new(requests_total.clone()))?;
        registry.register(Box::new(request_duration_seconds.clone()))?;

        Ok(Self {
            registry,
            requests_total,
            request_duration_seconds,
        })
    }

    pub fn record(&self, path: &str, method: &str, status: u16, elapsed: Duration) {
        let route = route_label(path);
        self.requests_total
            .with_label_values(&[route, method, &status.to_string()])
            .inc();
        self.request_duration_seconds
            .with_label_values(&[route, method])
            .observe(elapsed.as_secs_f64());
    }

    pub fn requests_total(&self, route: &str, method: &str, status: u16) -> u64 {
        self.requests_total
            .with_label_values(&[route, method, &status.to_string()])
            .get()
    }

    /// Renders all metrics in the Prometheus text format.
    pub fn export(&self) -> prometheus::Result<String> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|err| prometheus::Error::Msg(err.to_string()))
    }
}

pub fn route_label(path: &str) -> &'static str {
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    match segments.as_slice() {
        ["orders"] => "/orders",
        ["traders"] => "/traders",
        ["traders", _, "orders"] => "/traders/*/orders",
        ["health"] => "/health",
        ["metrics"] => "/metrics",
        _ => "/..",
    }
}
