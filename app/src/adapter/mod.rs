pub mod http;
pub mod metrics_export;
