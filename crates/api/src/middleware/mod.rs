//! HTTP middleware.

pub mod metrics;
pub mod request_id;

pub use metrics::{ErrorKind, MetricsLabels, track_request};
pub use request_id::{REQUEST_ID_HEADER, request_id_middleware};
