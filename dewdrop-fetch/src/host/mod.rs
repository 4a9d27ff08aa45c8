//! Host APIs for system interactions.
//!
//! - [`http`] - HTTP client with tracing, timeouts and JSON decoding

pub mod http;

pub use http::{HttpClient, JsonResponse};
