//! Status payload parser.
//!
//! Handles the three server shapes a status arrives in:
//!
//! - a timeline array: `[{...status...}, null, {...}]`
//! - a search envelope: `{"results": [{...flat author fields...}]}`
//! - a single status object, possibly wrapping a `retweeted_status`
//!
//! Author, place, location and entities are decoded by their own modules; this
//! one orchestrates them and turns any failure into
//! [`XstatusError::Parse`] carrying the offending raw text.

use rayon::prelude::*;
use serde_json::Value;
use tracing::{debug, info};

use crate::config::ParserConfig;
use crate::date_parser::parse_server_date;
use crate::entities::extract_all;
use crate::error::{Result, XstatusError};
use crate::html;
use crate::id::StatusId;
use crate::location::resolve_location_and_place;
use crate::model::{Status, UNKNOWN_RETWEET_COUNT, UserStub};
use crate::user::{UserLoader, is_degenerate, parse_search_user, parse_user, user_id};

/// Retweets nest exactly one level; anything deeper is ignored.
const MAX_RETWEET_DEPTH: usize = 1;

/// Parser for status payloads.
#[derive(Clone, Copy)]
pub struct StatusParser<'a> {
    loader: Option<&'a (dyn UserLoader + Sync)>,
    lookup_users: bool,
    parallel: bool,
}

impl Default for StatusParser<'_> {
    fn default() -> Self {
        Self {
            loader: None,
            lookup_users: true,
            parallel: true,
        }
    }
}

impl std::fmt::Debug for StatusParser<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatusParser")
            .field("has_loader", &self.loader.is_some())
            .field("lookup_users", &self.lookup_users)
            .field("parallel", &self.parallel)
            .finish()
    }
}

impl<'a> StatusParser<'a> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A parser honouring the `[parser]` configuration section.
    #[must_use]
    pub fn from_config(config: &ParserConfig) -> Self {
        Self::new()
            .lookup_users(config.lookup_degenerate_users)
            .parallel(config.parallel)
    }

    /// Use `loader` to repair id-only author objects.
    #[must_use]
    pub fn with_user_loader(mut self, loader: &'a (dyn UserLoader + Sync)) -> Self {
        self.loader = Some(loader);
        self
    }

    /// Enable or disable the author repair lookup.
    #[must_use]
    pub const fn lookup_users(mut self, enabled: bool) -> Self {
        self.lookup_users = enabled;
        self
    }

    /// Parse batch elements on the rayon pool. Output order is unchanged, and
    /// so is the reported error: the first bad element in input order.
    #[must_use]
    pub const fn parallel(mut self, enabled: bool) -> Self {
        self.parallel = enabled;
        self
    }

    /// Parse a single status object from JSON text.
    ///
    /// # Errors
    /// Returns [`XstatusError::Parse`] for malformed JSON or a bad status.
    pub fn parse_str(&self, json: &str) -> Result<Status> {
        let value = parse_json(json)?;
        self.parse_value(&value, None)
    }

    /// Parse a decoded status object.
    ///
    /// `user` is supplied when the status is nested inside a user payload (or
    /// is a search result); it is used as-is instead of the status's own
    /// `user` field.
    ///
    /// # Errors
    /// Returns [`XstatusError::Parse`] carrying `value` as raw text.
    pub fn parse_value(&self, value: &Value, user: Option<UserStub>) -> Result<Status> {
        self.parse_at_depth(value, user, 0)
    }

    /// Parse a timeline: a top-level JSON array of statuses.
    ///
    /// Blank input yields an empty list. `null` elements are skipped.
    ///
    /// # Errors
    /// Any element failing aborts the whole batch.
    pub fn parse_timeline(&self, json: &str) -> Result<Vec<Status>> {
        if json.trim().is_empty() {
            return Ok(Vec::new());
        }
        let value = parse_json(json)?;
        let items = value
            .as_array()
            .ok_or_else(|| XstatusError::parse_error(json, "expected a JSON array of statuses"))?;

        let skipped = items.iter().filter(|item| item.is_null()).count();
        if skipped > 0 {
            debug!(skipped, "Skipping null timeline elements");
        }

        let items: Vec<&Value> = items.iter().filter(|item| !item.is_null()).collect();
        let statuses = self.parse_batch(&items, |item| self.parse_at_depth(item, None, 0))?;

        info!("Parsed {} timeline statuses", statuses.len());
        Ok(statuses)
    }

    /// Parse a search envelope: `{"results": [...]}`.
    ///
    /// Each result's author is built from its flat `from_user` and
    /// `profile_image_url` fields and carries nothing else.
    ///
    /// # Errors
    /// Any result failing aborts the whole batch.
    pub fn parse_search(&self, json: &str) -> Result<Vec<Status>> {
        let value = parse_json(json)?;
        let results = value["results"]
            .as_array()
            .ok_or_else(|| XstatusError::parse_error(json, "expected a 'results' array"))?;

        let parse = |item: &Value| {
            let user = parse_search_user(item)
                .map_err(|e| XstatusError::while_parsing(item.to_string(), e))?;
            self.parse_at_depth(item, Some(user), 0)
        };
        let results: Vec<&Value> = results.iter().collect();
        let statuses = self.parse_batch(&results, parse)?;

        info!("Parsed {} search results", statuses.len());
        Ok(statuses)
    }

    /// Parse every element, in order. With `parallel` on, elements run on the
    /// rayon pool (and so does the user loader), but every element is parsed
    /// and the error reported is always the first failing one in input order.
    fn parse_batch<F>(&self, items: &[&Value], parse: F) -> Result<Vec<Status>>
    where
        F: Fn(&Value) -> Result<Status> + Sync,
    {
        if self.parallel {
            items
                .par_iter()
                .map(|item| parse(*item))
                .collect::<Vec<_>>()
                .into_iter()
                .collect()
        } else {
            items.iter().map(|item| parse(*item)).collect()
        }
    }

    fn parse_at_depth(&self, value: &Value, user: Option<UserStub>, depth: usize) -> Result<Status> {
        self.build(value, user, depth)
            .map_err(|e| XstatusError::while_parsing(value.to_string(), e))
    }

    fn build(&self, value: &Value, external_user: Option<UserStub>, depth: usize) -> Result<Status> {
        if !value.is_object() {
            return Err(XstatusError::parse_error(
                value.to_string(),
                "expected a status object",
            ));
        }

        let id = status_id(value)?;

        // Entity indices point into the raw text, so keep the offset table.
        let raw_text = value["text"]
            .as_str()
            .or_else(|| value["full_text"].as_str())
            .ok_or_else(|| XstatusError::missing_field("text"))?;
        let decoded = html::decode_with_offsets(raw_text);

        let created_at = value["created_at"]
            .as_str()
            .ok_or_else(|| XstatusError::missing_field("created_at"))
            .and_then(parse_server_date)?;

        // Encoded on search responses, plain on timelines.
        let source = value["source"]
            .as_str()
            .ok_or_else(|| XstatusError::missing_field("source"))?;
        let source = if source.contains("&lt;") {
            html::decode(source)
        } else {
            source.to_string()
        };

        let original = match &value["retweeted_status"] {
            retweeted @ Value::Object(_) if depth < MAX_RETWEET_DEPTH => {
                Some(Box::new(self.parse_at_depth(retweeted, None, depth + 1)?))
            }
            Value::Object(_) => {
                debug!(%id, "Ignoring retweet nested inside a retweet");
                None
            }
            _ => None,
        };

        let in_reply_to_status_id = match reply_to_id(value)? {
            Some(reply_to) => Some(reply_to),
            None => original.as_ref().map(|o| o.id.clone()),
        };

        let user = match external_user {
            Some(user) => Some(user),
            None => self.resolve_user(&value["user"], &id)?,
        };

        let (location, place) = resolve_location_and_place(value)?;

        let entities = match &value["entities"] {
            obj @ Value::Object(_) => Some(extract_all(obj, &decoded)?),
            _ => None,
        };

        Ok(Status {
            id,
            text: decoded.text,
            created_at,
            source,
            user,
            in_reply_to_status_id,
            original,
            retweet_count: retweet_count(&value["retweet_count"]),
            favorited: value["favorited"].as_bool().unwrap_or(false),
            sensitive: value["possibly_sensitive"].as_bool().unwrap_or(false),
            location,
            place,
            entities,
        })
    }

    fn resolve_user(&self, user: &Value, status_id: &StatusId) -> Result<Option<UserStub>> {
        if !user.is_object() {
            return Ok(None);
        }
        if !is_degenerate(user) {
            return parse_user(user, Some(status_id)).map(Some);
        }

        let loader = match self.loader {
            Some(loader) if self.lookup_users => loader,
            _ => {
                debug!(%status_id, "Degenerate author object and no lookup; leaving author unset");
                return Ok(None);
            }
        };
        let uid = match user_id(user) {
            Ok(Some(uid)) => uid,
            Ok(None) | Err(_) => {
                debug!(%status_id, "Degenerate author object without a usable id");
                return Ok(None);
            }
        };

        match loader.lookup_by_id(&uid) {
            Ok(found) => Ok(Some(found)),
            Err(failure) => {
                debug!(%status_id, error = %failure, "Author lookup failed; leaving author unset");
                Ok(None)
            }
        }
    }
}

/// Parse one status object with default settings.
///
/// # Errors
/// See [`StatusParser::parse_str`].
pub fn parse_status(json: &str) -> Result<Status> {
    StatusParser::new().parse_str(json)
}

/// Parse a timeline array with default settings.
///
/// # Errors
/// See [`StatusParser::parse_timeline`].
pub fn parse_timeline(json: &str) -> Result<Vec<Status>> {
    StatusParser::new().parse_timeline(json)
}

/// Parse a search envelope with default settings.
///
/// # Errors
/// See [`StatusParser::parse_search`].
pub fn parse_search(json: &str) -> Result<Vec<Status>> {
    StatusParser::new().parse_search(json)
}

fn parse_json(json: &str) -> Result<Value> {
    serde_json::from_str(json).map_err(|e| XstatusError::Parse {
        raw: json.to_string(),
        reason: e.to_string(),
        cause: Some(Box::new(e)),
    })
}

/// `id_str` when present and non-empty, otherwise `id`.
fn status_id(value: &Value) -> Result<StatusId> {
    match value["id_str"].as_str().filter(|s| !s.is_empty()) {
        Some(id) => id.parse(),
        None if value["id"].is_null() => Err(XstatusError::missing_field("id")),
        None => StatusId::from_json(&value["id"]),
    }
}

fn reply_to_id(value: &Value) -> Result<Option<StatusId>> {
    if let Some(id) = value["in_reply_to_status_id_str"]
        .as_str()
        .filter(|s| !s.is_empty())
    {
        return id.parse().map(Some);
    }
    match &value["in_reply_to_status_id"] {
        Value::Null => Ok(None),
        Value::String(id) if id.is_empty() => Ok(None),
        id => StatusId::from_json(id).map(Some),
    }
}

/// Missing or non-numeric counts (the server sometimes sends `"100+"`) are
/// unknown; anything below -1 is clamped.
fn retweet_count(value: &Value) -> i32 {
    value
        .as_i64()
        .or_else(|| value.as_str().and_then(|s| s.parse().ok()))
        .map_or(UNKNOWN_RETWEET_COUNT, |n| {
            i32::try_from(n.max(i64::from(UNKNOWN_RETWEET_COUNT))).unwrap_or(i32::MAX)
        })
}
