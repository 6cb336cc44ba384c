//! Author decoding.
//!
//! Authors arrive as a full `user` object on timelines, as flat
//! `from_user` / `profile_image_url` fields on search results, or (rarely) as
//! a degenerate object holding nothing but an id. The last case can be
//! repaired through a [`UserLoader`].

use serde_json::Value;

use crate::error::{LookupFailure, Result, XstatusError};
use crate::id::{StatusId, UserId};
use crate::model::UserStub;

/// Objects with fewer fields than this are treated as id-only stubs.
pub const DEGENERATE_USER_FIELDS: usize = 3;

/// Side channel for fetching an author by id.
///
/// Called at most once per status, synchronously. Implementations may block;
/// any timeout is theirs to enforce. Failures are discarded by the parser.
///
/// A parallel batch parse calls the loader from rayon pool threads, which is
/// why [`StatusParser::with_user_loader`](crate::StatusParser::with_user_loader)
/// asks for `Sync`.
pub trait UserLoader {
    /// Fetch the author with the given id.
    ///
    /// # Errors
    /// Returns a [`LookupFailure`] if the user cannot be fetched.
    fn lookup_by_id(&self, id: &UserId) -> std::result::Result<UserStub, LookupFailure>;
}

impl<F> UserLoader for F
where
    F: Fn(&UserId) -> std::result::Result<UserStub, LookupFailure>,
{
    fn lookup_by_id(&self, id: &UserId) -> std::result::Result<UserStub, LookupFailure> {
        self(id)
    }
}

/// Decode a full author object.
///
/// `status_id` becomes the stub's `latest_status_id` back-reference.
///
/// # Errors
/// Fails when `screen_name` is missing or the id is malformed.
pub fn parse_user(value: &Value, status_id: Option<&StatusId>) -> Result<UserStub> {
    let screen_name = value["screen_name"]
        .as_str()
        .ok_or_else(|| XstatusError::missing_field("screen_name"))?;

    Ok(UserStub {
        id: user_id(value)?,
        screen_name: screen_name.to_string(),
        name: value["name"].as_str().map(String::from),
        profile_image_url: value["profile_image_url_https"]
            .as_str()
            .or_else(|| value["profile_image_url"].as_str())
            .map(String::from),
        latest_status_id: status_id.cloned(),
    })
}

/// Build the partial author of a search result from its flat fields.
///
/// # Errors
/// Fails when `from_user` is missing.
pub fn parse_search_user(result: &Value) -> Result<UserStub> {
    let screen_name = result["from_user"]
        .as_str()
        .ok_or_else(|| XstatusError::missing_field("from_user"))?;
    let mut user = UserStub::new(screen_name);
    if let Some(url) = result["profile_image_url"].as_str() {
        user = user.with_profile_image_url(url);
    }
    Ok(user)
}

/// Whether a `user` object is an id-only stub.
#[must_use]
pub fn is_degenerate(value: &Value) -> bool {
    value
        .as_object()
        .is_some_and(|obj| obj.len() < DEGENERATE_USER_FIELDS)
}

/// Id of a user object: `id_str` first, then `id`. Absent if neither is set.
///
/// # Errors
/// Fails when a present id is not a non-negative integer.
pub fn user_id(value: &Value) -> Result<Option<UserId>> {
    match value["id_str"].as_str().filter(|s| !s.is_empty()) {
        Some(id) => id.parse().map(Some),
        None if value["id"].is_null() => Ok(None),
        None => StatusId::from_json(&value["id"]).map(Some),
    }
}
