//! Custom error types for xstatus.
//!
//! Provides structured error handling with enough context to diagnose a bad
//! server payload: every parse failure carries the raw text that caused it.

use std::path::PathBuf;
use thiserror::Error;

use crate::id::StatusId;

/// Primary error type for xstatus operations.
#[derive(Error, Debug)]
pub enum XstatusError {
    // =========================================================================
    // Payload Errors
    // =========================================================================
    /// A status (or batch of statuses) could not be decoded.
    ///
    /// `raw` holds the offending payload text.
    #[error("Failed to parse status payload: {reason}")]
    Parse {
        raw: String,
        reason: String,
        #[source]
        cause: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A field every status must carry was absent or of the wrong type.
    #[error("Missing required field '{field}'")]
    MissingField { field: &'static str },

    /// The server date could not be understood.
    #[error("Invalid date format '{value}'")]
    InvalidDate { value: String },

    /// An id was not a non-negative decimal integer.
    #[error("Invalid status ID: {id}")]
    InvalidStatusId { id: String },

    // =========================================================================
    // IO / Configuration Errors
    // =========================================================================
    /// File read/write error.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Configuration file parsing error.
    #[error("Invalid configuration in '{path}': {reason}")]
    ConfigError { path: PathBuf, reason: String },

    /// Unknown or malformed configuration key.
    #[error("Invalid configuration key '{key}': {reason}")]
    InvalidConfigKey { key: String, reason: String },
}

/// Result type alias for xstatus operations.
pub type Result<T> = std::result::Result<T, XstatusError>;

impl XstatusError {
    /// Create a parse error with no underlying cause.
    pub fn parse_error(raw: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Parse {
            raw: raw.into(),
            reason: reason.into(),
            cause: None,
        }
    }

    /// Wrap any error raised while decoding `raw` into a [`XstatusError::Parse`].
    ///
    /// An error that is already a `Parse` is passed through untouched so the
    /// innermost raw text survives (a failed nested retweet keeps its own
    /// payload for diagnosis).
    pub fn while_parsing(raw: impl Into<String>, err: Self) -> Self {
        match err {
            parse @ Self::Parse { .. } => parse,
            other => Self::Parse {
                raw: raw.into(),
                reason: other.to_string(),
                cause: Some(Box::new(other)),
            },
        }
    }

    /// Create a missing field error.
    pub const fn missing_field(field: &'static str) -> Self {
        Self::MissingField { field }
    }

    /// Create an invalid date error.
    pub fn invalid_date(value: impl Into<String>) -> Self {
        Self::InvalidDate {
            value: value.into(),
        }
    }

    /// Create an invalid status ID error.
    pub fn invalid_status_id(id: impl Into<String>) -> Self {
        Self::InvalidStatusId { id: id.into() }
    }

    /// The raw payload text that failed to parse, if this is a parse error.
    #[must_use]
    pub fn raw_text(&self) -> Option<&str> {
        match self {
            Self::Parse { raw, .. } => Some(raw),
            _ => None,
        }
    }

    /// Get a suggestion for how to fix this error, if applicable.
    #[must_use]
    pub const fn suggestion(&self) -> Option<&'static str> {
        match self {
            Self::Parse { .. } => Some(
                "Check that the input is a timeline array, or pass --search for a {\"results\": [...]} payload.",
            ),
            Self::ConfigError { .. } => {
                Some("Run 'xstatus config --init' to write a fresh configuration file.")
            }
            Self::InvalidConfigKey { .. } => {
                Some("Run 'xstatus config --show' to list the known configuration keys.")
            }
            _ => None,
        }
    }
}

/// Failure of the side-channel author lookup.
///
/// Only ever produced by a [`crate::user::UserLoader`]; the parser logs and
/// discards it, leaving the status without an author.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Lookup of user {id} failed: {reason}")]
pub struct LookupFailure {
    pub id: StatusId,
    pub reason: String,
}

impl LookupFailure {
    pub fn new(id: StatusId, reason: impl Into<String>) -> Self {
        Self {
            id,
            reason: reason.into(),
        }
    }
}

// =============================================================================
// CLI Error Formatting Utilities
// =============================================================================

use colored::Colorize;

/// Format a structured CLI error with explanation and suggestions.
#[must_use]
pub fn format_error(title: &str, explanation: &str, suggestions: &[&str]) -> String {
    use std::fmt::Write;

    let mut output = format!("{} {}", "✗".red().bold(), title.bold());

    if !explanation.is_empty() {
        let _ = write!(output, "\n\n   {explanation}");
    }

    if !suggestions.is_empty() {
        output.push_str("\n\n   ");
        if suggestions.len() == 1 {
            let _ = write!(output, "{} {}", "Hint:".cyan(), suggestions[0]);
        } else {
            let _ = write!(output, "{}:", "Try".cyan());
            for suggestion in suggestions {
                let _ = write!(output, "\n     {} {}", "•".dimmed(), suggestion);
            }
        }
    }

    output
}

/// Edit distance between two strings, used for "did you mean?" hints.
#[must_use]
pub fn levenshtein_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

/// Closest candidate within `max_distance` edits (default 2), ignoring case.
///
/// Exact matches are not returned; there is nothing to suggest.
#[must_use]
pub fn find_closest_match<'a>(
    input: &str,
    candidates: &[&'a str],
    max_distance: Option<usize>,
) -> Option<&'a str> {
    let max_dist = max_distance.unwrap_or(2);
    let input = input.to_lowercase();

    candidates
        .iter()
        .map(|&candidate| (candidate, levenshtein_distance(&input, &candidate.to_lowercase())))
        .filter(|(_, distance)| *distance <= max_dist && *distance > 0)
        .min_by_key(|(_, distance)| *distance)
        .map(|(candidate, _)| candidate)
}

/// Format an error for an unknown value with "did you mean?" support.
#[must_use]
pub fn format_unknown_value_error(kind: &str, input: &str, valid_options: &[&str]) -> String {
    let title = format!("Unknown {kind}: '{input}'");

    let mut suggestions = Vec::new();
    if let Some(closest) = find_closest_match(input, valid_options, None) {
        suggestions.push(format!("Did you mean '{}'?", closest.green()));
    }
    if valid_options.len() <= 8 {
        suggestions.push(format!("Valid {kind}s: {}", valid_options.join(", ")));
    }

    let suggestion_refs: Vec<&str> = suggestions.iter().map(String::as_str).collect();
    format_error(&title, "", &suggestion_refs)
}
