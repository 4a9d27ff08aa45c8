//! Output formatting for CLI.

mod json;
mod text;

pub use json::{DiscoverOutput, JsonFormatter, SessionsOutput, StatusOutput};
pub use text::TextFormatter;
#[cfg(test)]
mod tests;
