//! `@name` extraction from status text.
//!
//! Screen names are lowercased unless case-sensitive screen names are switched
//! on. The switch is either passed explicitly in a [`MentionScanner`] or set
//! once per process with [`set_case_sensitive_screen_names`] before parsing
//! starts.

use once_cell::sync::{Lazy, OnceCell};
use regex::Regex;
use tracing::debug;

static MENTION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"@(\w+)").expect("mention pattern is valid"));

static CASE_SENSITIVE_SCREEN_NAMES: OnceCell<bool> = OnceCell::new();

/// Install the process-wide case-sensitivity setting.
///
/// Only the first call has any effect; returns `false` if the setting was
/// already installed.
pub fn set_case_sensitive_screen_names(enabled: bool) -> bool {
    let installed = CASE_SENSITIVE_SCREEN_NAMES.set(enabled).is_ok();
    if !installed {
        debug!(enabled, "Case-sensitivity already installed; ignoring");
    }
    installed
}

/// The process-wide setting (false until installed).
#[must_use]
pub fn case_sensitive_screen_names() -> bool {
    CASE_SENSITIVE_SCREEN_NAMES.get().copied().unwrap_or(false)
}

/// Scans text for `@mentions`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MentionScanner {
    case_sensitive: bool,
}

impl MentionScanner {
    #[must_use]
    pub const fn new(case_sensitive: bool) -> Self {
        Self { case_sensitive }
    }

    /// A scanner following the process-wide setting.
    #[must_use]
    pub fn from_process_setting() -> Self {
        Self::new(case_sensitive_screen_names())
    }

    /// Names mentioned in `text`, in order, duplicates kept.
    ///
    /// A match preceded by a letter or digit (an email address, say) is
    /// skipped.
    #[must_use]
    pub fn scan(&self, text: &str) -> Vec<String> {
        MENTION_RE
            .captures_iter(text)
            .filter_map(|caps| {
                let at = caps.get(0)?.start();
                let preceded_by_word = text[..at]
                    .chars()
                    .next_back()
                    .is_some_and(char::is_alphanumeric);
                if preceded_by_word {
                    return None;
                }
                let name = caps.get(1)?.as_str();
                Some(if self.case_sensitive {
                    name.to_string()
                } else {
                    name.to_lowercase()
                })
            })
            .collect()
    }
}
