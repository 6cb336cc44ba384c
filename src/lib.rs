//! xstatus - typed statuses from Twitter-style REST payloads
//!
//! This library decodes the status JSON served by timeline and search
//! endpoints into immutable [`Status`] values: HTML-decoded text, author stub,
//! retweet link, location, place and typed entities.
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface definitions
//! - [`error`] - Custom error types with rich context
//! - [`model`] - Status, author, place and entity types
//! - [`parser`] - Payload decoding for single statuses, timelines and search
//! - [`mentions`] - `@mention` scanning
//! - [`config`] - Layered configuration
//!
//! ```rust
//! let json = r#"{"id_str":"1","text":"hi &amp; bye @Bob",
//!     "created_at":"Sun Nov 01 00:00:00 +0000 2009","source":"web"}"#;
//! let status = xstatus::parse_status(json).unwrap();
//! assert_eq!(status.text(), "hi & bye @Bob");
//! assert_eq!(status.mentions(), ["bob"]);
//! ```

pub mod cli;
pub mod config;
pub mod date_parser;
pub mod display;
pub mod entities;
pub mod error;
pub mod html;
pub mod id;
pub mod location;
pub mod logging;
pub mod mentions;
pub mod model;
pub mod parser;
pub mod place;
pub mod user;

pub use cli::*;
pub use config::{Config, VALID_CONFIG_KEYS};
pub use error::{
    LookupFailure, Result, XstatusError, find_closest_match, format_error,
    format_unknown_value_error,
};
pub use id::{StatusId, UserId};
pub use model::*;
pub use parser::{StatusParser, parse_search, parse_status, parse_timeline};
pub use user::UserLoader;

/// Standard width for content dividers in CLI output
pub const CONTENT_DIVIDER_WIDTH: usize = 60;

/// Format a long identifier as a short token (e.g., 1234...6789).
#[must_use]
pub fn format_short_id(id: &str) -> String {
    let chars: Vec<char> = id.chars().collect();
    if chars.len() <= 10 {
        return id.to_string();
    }
    let start: String = chars.iter().take(4).collect();
    let end: String = chars.iter().rev().take(4).rev().collect();
    format!("{start}...{end}")
}

/// Format a retweet count, spelling out the unknown sentinel.
#[must_use]
pub fn format_retweet_count(count: i32) -> String {
    if count == UNKNOWN_RETWEET_COUNT {
        "unknown".to_string()
    } else {
        count.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::{format_retweet_count, format_short_id};

    #[test]
    fn format_short_id_truncates_long_ids() {
        assert_eq!(format_short_id("short"), "short");
        assert_eq!(format_short_id("1234567890123"), "1234...0123");
    }

    #[test]
    fn format_retweet_count_sentinel() {
        assert_eq!(format_retweet_count(-1), "unknown");
        assert_eq!(format_retweet_count(0), "0");
        assert_eq!(format_retweet_count(42), "42");
    }
}
