// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # `DewDrop` Store
//!
//! State management and orchestration for the `DewDrop` client.
//!
//! This crate provides:
//!
//! - **Orchestrator**: runs discovery cycles and answers session and
//!   transcript queries, falling back to synthetic data
//! - **SessionStore**: published state with watch-channel notifications
//! - **Config**: JSON configuration with environment overrides
//! - **Persistence**: File I/O helpers for JSON data
//!
//! ## Usage
//!
//! ```ignore
//! use dewdrop_core::SessionKind;
//! use dewdrop_store::{Config, Orchestrator};
//!
//! let mut config = Config::load_from(&Config::default_path()).await?;
//! config.apply_env();
//!
//! let orchestrator = Orchestrator::from_config(&config)?;
//! for session in orchestrator.list_sessions(SessionKind::Recent).await {
//!     println!("{} {}", session.id, session.display_name);
//! }
//!
//! // Subscribe to changes
//! let mut rx = orchestrator.subscribe();
//! while rx.changed().await.is_ok() {
//!     println!("Sessions updated!");
//! }
//! ```

pub mod config;
pub mod error;
pub mod orchestrator;
pub mod persistence;
pub mod session_store;

pub use config::{
    API_KEY_ENV, API_KEY_PREFIX, ApiConfig, BASE_URL_ENV, Config, DEFAULT_RECENT_LIMIT,
    DiscoveryConfig, GeneralConfig, MAX_DETAIL_LIMIT, has_expected_key_format,
};
pub use error::StoreError;
pub use orchestrator::{Orchestrator, TranscriptView};

// Carried by transcript views
pub use dewdrop_fetch::{FetchAttempt, FetchKind};
pub use persistence::{default_config_dir, default_config_path, load_json, save_json};
pub use session_store::{Publication, SessionStore};
