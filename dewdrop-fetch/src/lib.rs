// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # `DewDrop` Fetch
//!
//! HTTP plumbing, auth probing and endpoint discovery for `DewDrop`.
//!
//! This crate knows how to talk to a JSON API whose auth scheme and
//! resource layout are not known in advance. It includes:
//!
//! ## Host APIs
//!
//! - [`host::http`] - HTTP client with tracing, timeouts and JSON decoding
//!
//! ## Discovery
//!
//! - [`auth::AuthProbe`] - Finds the accepted auth scheme
//! - [`discovery::EndpointDiscoverer`] - Sweeps candidate paths
//! - [`shape`] - Payload shape classification
//!
//! ## Fetch Pipeline
//!
//! The fetch pipeline executes multiple strategies in priority order:
//!
//! - [`strategy::FetchStrategy`] - Trait for fetch implementations
//! - [`pipeline::FetchPipeline`] - Executes strategies in order
//! - [`context::FetchContext`] - Provides access to host APIs
//!
//! ## Example
//!
//! ```ignore
//! use dewdrop_fetch::{AuthProbe, EndpointDiscoverer, FetchContext};
//!
//! let ctx = FetchContext::new("https://api.meetstream.ai", api_key)?;
//!
//! let (scheme, confirmed) = AuthProbe::from_context(&ctx).resolve_or_default(&ctx).await;
//! let results = EndpointDiscoverer::new().sweep(&ctx, scheme).await;
//! let report = results.to_report(confirmed);
//! ```

// Core modules
pub mod auth;
pub mod context;
pub mod discovery;
pub mod error;
pub mod host;
pub mod pipeline;
pub mod shape;
pub mod strategy;

// Re-export key types at crate root

// Errors
pub use error::{FetchError, HttpError};

// Host APIs
pub use host::http::{HttpClient, JsonResponse};

// Discovery
pub use auth::{ApiKey, AuthProbe, auth_headers};
pub use discovery::{
    CANDIDATE_ENDPOINTS, EndpointDiscoverer, EndpointSpec, ExpectedShape, Outcome, SweepEntry,
    SweepResults,
};

// Strategy & Pipeline
pub use context::{
    DEFAULT_BASE_URL, DEFAULT_CONCURRENCY, DEFAULT_PROBE_PATH, FetchContext, FetchContextBuilder,
    FetchSettings, is_absolute_url,
};
pub use pipeline::{FetchAttempt, FetchOutcome, FetchPipeline};
pub use strategy::{FetchKind, FetchResult, FetchStrategy};
