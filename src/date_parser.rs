//! Server date parsing.
//!
//! Timeline payloads use `Sun Nov 01 00:00:00 +0000 2009`; the older search
//! API uses the RFC-822 form `Sun, 01 Nov 2009 00:00:00 +0000`. Both resolve to
//! an instant in UTC.

use chrono::{DateTime, Utc};
use tracing::trace;

use crate::error::{Result, XstatusError};

/// Timeline format: "Fri Jan 09 15:12:21 +0000 2026"
const TIMELINE_FORMAT: &str = "%a %b %d %H:%M:%S %z %Y";

/// Search format: "Fri, 09 Jan 2026 15:12:21 +0000"
const SEARCH_FORMAT: &str = "%a, %d %b %Y %H:%M:%S %z";

/// Parse a server `created_at` value.
///
/// # Errors
/// Returns [`XstatusError::InvalidDate`] when neither server format matches.
pub fn parse_server_date(input: &str) -> Result<DateTime<Utc>> {
    let trimmed = input.trim();
    try_parse_timeline(trimmed)
        .or_else(|| try_parse_search(trimmed))
        .ok_or_else(|| XstatusError::invalid_date(input))
}

fn try_parse_timeline(input: &str) -> Option<DateTime<Utc>> {
    let parsed = DateTime::parse_from_str(input, TIMELINE_FORMAT).ok()?;
    trace!(input = input, "Parsed timeline date");
    Some(parsed.with_timezone(&Utc))
}

fn try_parse_search(input: &str) -> Option<DateTime<Utc>> {
    let parsed = DateTime::parse_from_str(input, SEARCH_FORMAT)
        .or_else(|_| DateTime::parse_from_rfc2822(input))
        .ok()?;
    trace!(input = input, "Parsed search date");
    Some(parsed.with_timezone(&Utc))
}
