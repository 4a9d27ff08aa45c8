// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # `DewDrop` MeetStream
//!
//! MeetStream-specific logic for the `DewDrop` client.
//!
//! The generic discovery machinery lives in `dewdrop-fetch`; this crate
//! turns what it finds into sessions and transcripts:
//!
//! - **Parser**: extracts and normalizes session records from sweep results
//! - **Transcript**: formats transcript payloads of any known shape
//! - **Strategies**: direct, detail and guessed transcript lookups
//! - **Resolver**: runs the strategies in order
//! - **Fallback**: deterministic synthetic sessions and transcript
//! - **Source**: the [`SessionSource`] seam and the live [`MeetStreamSource`]
//!
//! ## Usage
//!
//! ```ignore
//! use dewdrop_fetch::FetchContext;
//! use dewdrop_meetstream::{MeetStreamSource, SessionSource};
//!
//! let ctx = FetchContext::new("https://api.meetstream.ai", api_key)?;
//! let source = MeetStreamSource::new(ctx);
//!
//! let discovery = source.discover().await;
//! for session in &discovery.sessions {
//!     println!("{} {}", session.id, session.display_name);
//! }
//! ```

pub mod enrich;
pub mod fallback;
pub mod parser;
pub mod resolver;
pub mod source;
pub mod strategies;
pub mod transcript;


// Re-export key types
pub use fallback::{
    SYNTHETIC_SOURCE, synthetic_formatted_transcript, synthetic_sessions,
    synthetic_transcript, synthetic_transcript_lines,
};
pub use enrich::DetailEnricher;
pub use parser::{extract_sessions, merge_detail, normalize_record, parse_timestamp};
pub use resolver::{ResolvedTranscript, TranscriptResolver};
pub use source::{Discovery, MeetStreamSource, SessionSource};
pub use strategies::{DetailLookupStrategy, DirectRefStrategy, GuessedPathStrategy};
pub use transcript::{find_transcript_ref, format_transcript, is_usable, transcript_lines};
