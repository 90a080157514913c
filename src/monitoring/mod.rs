pub mod metrics;

pub use metrics::{route_label, ApiMetrics};
