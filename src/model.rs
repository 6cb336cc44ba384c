//! Data models for status payloads.
//!
//! A [`Status`] is built once (by [`crate::parser::StatusParser`] or as a
//! local fake via [`Status::fake`]) and never changed afterwards. All fields are
//! read through accessors.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::display;
use crate::id::{StatusId, UserId};
use crate::mentions::MentionScanner;

/// Source string marking a locally constructed status.
pub const FAKE_SOURCE: &str = "fake";

/// Sentinel retweet count meaning "not reported".
pub const UNKNOWN_RETWEET_COUNT: i32 = -1;

/// A posted status.
///
/// Identity, equality and hashing use the id only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Status {
    pub(crate) id: StatusId,
    pub(crate) text: String,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) source: String,
    pub(crate) user: Option<UserStub>,
    pub(crate) in_reply_to_status_id: Option<StatusId>,
    pub(crate) original: Option<Box<Status>>,
    pub(crate) retweet_count: i32,
    pub(crate) favorited: bool,
    pub(crate) sensitive: bool,
    pub(crate) location: Option<Location>,
    pub(crate) place: Option<Place>,
    pub(crate) entities: Option<BTreeMap<EntityType, Vec<TweetEntity>>>,
}

impl Status {
    /// Build a fake status that did not come from the server.
    ///
    /// The result has `source == "fake"`, no entities, no location and an
    /// unknown retweet count. It must never be posted back.
    pub fn fake(
        user: Option<UserStub>,
        text: impl Into<String>,
        id: StatusId,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            text: text.into(),
            created_at,
            source: FAKE_SOURCE.to_string(),
            user,
            in_reply_to_status_id: None,
            original: None,
            retweet_count: UNKNOWN_RETWEET_COUNT,
            favorited: false,
            sensitive: false,
            location: None,
            place: None,
            entities: None,
        }
    }

    #[must_use]
    pub const fn id(&self) -> &StatusId {
        &self.id
    }

    /// The status text, HTML-decoded. Also returned by `to_string()`.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Originating client, e.g. `web`. `fake` for local stubs.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    #[must_use]
    pub fn is_fake(&self) -> bool {
        self.source == FAKE_SOURCE
    }

    /// Author. Partial (screen name and image only) for search results.
    #[must_use]
    pub const fn user(&self) -> Option<&UserStub> {
        self.user.as_ref()
    }

    /// The reply target as reported, or the original's id for a retweet
    /// whose payload did not say.
    #[must_use]
    pub const fn in_reply_to_status_id(&self) -> Option<&StatusId> {
        self.in_reply_to_status_id.as_ref()
    }

    /// The retweeted status, for official retweets. Never itself a retweet.
    #[must_use]
    pub fn original(&self) -> Option<&Self> {
        self.original.as_deref()
    }

    #[must_use]
    pub const fn is_retweet(&self) -> bool {
        self.original.is_some()
    }

    /// New-style retweet count; -1 if unknown.
    #[must_use]
    pub const fn retweet_count(&self) -> i32 {
        self.retweet_count
    }

    /// Whether the viewing user has favorited this status.
    #[must_use]
    pub const fn is_favorite(&self) -> bool {
        self.favorited
    }

    /// Author-applied sensitive content label.
    #[must_use]
    pub const fn is_sensitive(&self) -> bool {
        self.sensitive
    }

    /// Location as a string: free text, a place's printable form, or `lat,lon`.
    #[must_use]
    pub fn location(&self) -> Option<String> {
        self.location.as_ref().map(ToString::to_string)
    }

    /// Location as resolved, keeping the place variant intact.
    #[must_use]
    pub const fn resolved_location(&self) -> Option<&Location> {
        self.location.as_ref()
    }

    #[must_use]
    pub const fn place(&self) -> Option<&Place> {
        self.place.as_ref()
    }

    /// Entities of one type.
    ///
    /// `None` means the payload carried no `entities` object at all;
    /// `Some(&[])` means it did and there were none of this type.
    #[must_use]
    pub fn tweet_entities(&self, kind: EntityType) -> Option<&[TweetEntity]> {
        self.entities
            .as_ref()
            .map(|all| all.get(&kind).map_or(&[][..], Vec::as_slice))
    }

    #[must_use]
    pub const fn has_entities(&self) -> bool {
        self.entities.is_some()
    }

    /// `@mentions` in the text, honouring the process-wide case setting.
    #[must_use]
    pub fn mentions(&self) -> Vec<String> {
        MentionScanner::from_process_setting().scan(&self.text)
    }

    /// `@mentions` in the text using an explicit scanner.
    #[must_use]
    pub fn mentions_with(&self, scanner: &MentionScanner) -> Vec<String> {
        scanner.scan(&self.text)
    }

    /// Text with each shortened URL replaced by its display form.
    ///
    /// Short links from other services are not resolved.
    #[must_use]
    pub fn display_text(&self) -> String {
        display::display_text(&self.text, self.tweet_entities(EntityType::Url))
    }
}

impl PartialEq for Status {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Status {}

impl Hash for Status {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Minimal author identity.
///
/// Equality is by id when both sides have one, otherwise by screen name
/// (ignoring ASCII case).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserStub {
    pub id: Option<UserId>,
    pub screen_name: String,
    pub name: Option<String>,
    pub profile_image_url: Option<String>,
    /// Id of the status this stub was parsed from, when it came from a full
    /// author object. A lookup key only.
    pub latest_status_id: Option<StatusId>,
}

impl UserStub {
    /// A stub known only by screen name.
    pub fn new(screen_name: impl Into<String>) -> Self {
        Self {
            id: None,
            screen_name: screen_name.into(),
            name: None,
            profile_image_url: None,
            latest_status_id: None,
        }
    }

    #[must_use]
    pub fn with_id(mut self, id: UserId) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub fn with_profile_image_url(mut self, url: impl Into<String>) -> Self {
        self.profile_image_url = Some(url.into());
        self
    }
}

impl PartialEq for UserStub {
    fn eq(&self, other: &Self) -> bool {
        match (&self.id, &other.id) {
            (Some(a), Some(b)) => a == b,
            _ => self.screen_name.eq_ignore_ascii_case(&other.screen_name),
        }
    }
}

impl fmt::Display for UserStub {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.screen_name)
    }
}

/// A named geographic region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub id: String,
    pub name: String,
    pub full_name: String,
    pub place_type: Option<String>,
    pub country: Option<String>,
    pub country_code: Option<String>,
    pub url: Option<String>,
    pub bounding_box: Option<BoundingBox>,
}

impl Place {
    /// `full_name`, or `name` when the full name is blank.
    #[must_use]
    pub fn printable_name(&self) -> &str {
        if self.full_name.trim().is_empty() {
            &self.name
        } else {
            &self.full_name
        }
    }
}

impl fmt::Display for Place {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.printable_name())
    }
}

/// Coarse polygon around a place, as `(lon, lat)` pairs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub kind: Option<String>,
    pub points: Vec<(f64, f64)>,
}

/// Where a status was posted from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Location {
    /// Free-text location, or `lat,lon` from geo coordinates.
    Text(String),
    Place(Place),
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Place(place) => place.fmt(f),
        }
    }
}

/// Kinds of entity the server annotates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    Url,
    UserMention,
    Hashtag,
    Media,
}

impl EntityType {
    pub const ALL: [Self; 4] = [Self::Url, Self::UserMention, Self::Hashtag, Self::Media];

    /// Key of this entity list inside the `entities` object.
    #[must_use]
    pub const fn json_key(self) -> &'static str {
        match self {
            Self::Url => "urls",
            Self::UserMention => "user_mentions",
            Self::Hashtag => "hashtags",
            Self::Media => "media",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Url => write!(f, "url"),
            Self::UserMention => write!(f, "mention"),
            Self::Hashtag => write!(f, "hashtag"),
            Self::Media => write!(f, "media"),
        }
    }
}

/// A span of status text annotated by the server.
///
/// `start..end` is a half-open range of code-point positions in the decoded
/// [`Status::text`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TweetEntity {
    pub start: usize,
    pub end: usize,
    pub payload: EntityPayload,
}

/// Type-specific entity data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EntityPayload {
    Url {
        url: String,
        display_url: Option<String>,
        expanded_url: Option<String>,
    },
    UserMention {
        screen_name: String,
        user_id: Option<UserId>,
        name: Option<String>,
    },
    Hashtag {
        tag: String,
    },
    Media {
        url: String,
        media_url: String,
        media_type: String,
        display_url: Option<String>,
        expanded_url: Option<String>,
    },
}

impl TweetEntity {
    #[must_use]
    pub const fn kind(&self) -> EntityType {
        match self.payload {
            EntityPayload::Url { .. } => EntityType::Url,
            EntityPayload::UserMention { .. } => EntityType::UserMention,
            EntityPayload::Hashtag { .. } => EntityType::Hashtag,
            EntityPayload::Media { .. } => EntityType::Media,
        }
    }

    /// Human-readable form used in place of the covered text.
    #[must_use]
    pub fn display_form(&self) -> String {
        match &self.payload {
            EntityPayload::Url {
                url,
                display_url,
                expanded_url,
            } => display_url
                .as_deref()
                .or(expanded_url.as_deref())
                .unwrap_or(url)
                .to_string(),
            EntityPayload::Media {
                url, display_url, ..
            } => display_url.as_deref().unwrap_or(url).to_string(),
            EntityPayload::UserMention { screen_name, .. } => format!("@{screen_name}"),
            EntityPayload::Hashtag { tag } => format!("#{tag}"),
        }
    }

    /// Number of code points covered.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.end - self.start
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::collections::HashSet;

    fn when() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2009, 11, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn fake_status_is_marked() {
        let status = Status::fake(None, "local echo", StatusId::from(1), when());
        assert!(status.is_fake());
        assert_eq!(status.source(), "fake");
        assert_eq!(status.retweet_count(), UNKNOWN_RETWEET_COUNT);
        assert!(status.tweet_entities(EntityType::Url).is_none());
        assert_eq!(status.to_string(), "local echo");
    }

    #[test]
    fn status_identity_is_id_only() {
        let a = Status::fake(None, "one", StatusId::from(5), when());
        let b = Status::fake(Some(UserStub::new("bob")), "two", StatusId::from(5), when());
        let c = Status::fake(None, "one", StatusId::from(6), when());
        assert_eq!(a, b);
        assert_ne!(a, c);
        let set: HashSet<Status> = [a, b, c].into_iter().collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn user_equality_prefers_id() {
        let a = UserStub::new("alice").with_id(StatusId::from(1));
        let renamed = UserStub::new("alice2").with_id(StatusId::from(1));
        let other = UserStub::new("alice").with_id(StatusId::from(2));
        assert_eq!(a, renamed);
        assert_ne!(a, other);
        assert_eq!(UserStub::new("Alice"), UserStub::new("alice"));
    }

    #[test]
    fn place_printable_name_falls_back() {
        let mut place = Place {
            id: "abc".into(),
            name: "Soho".into(),
            full_name: "Soho, London".into(),
            place_type: None,
            country: None,
            country_code: None,
            url: None,
            bounding_box: None,
        };
        assert_eq!(Location::Place(place.clone()).to_string(), "Soho, London");
        place.full_name = String::new();
        assert_eq!(place.to_string(), "Soho");
    }

    #[test]
    fn entity_display_forms() {
        let url = TweetEntity {
            start: 0,
            end: 4,
            payload: EntityPayload::Url {
                url: "http://t.co/x".into(),
                display_url: None,
                expanded_url: Some("http://example.com/x".into()),
            },
        };
        assert_eq!(url.display_form(), "http://example.com/x");
        assert_eq!(url.kind(), EntityType::Url);
        assert_eq!(url.len(), 4);

        let tag = TweetEntity {
            start: 0,
            end: 5,
            payload: EntityPayload::Hashtag { tag: "rust".into() },
        };
        assert_eq!(tag.display_form(), "#rust");
    }

    #[test]
    fn entity_type_keys() {
        let keys: Vec<_> = EntityType::ALL.iter().map(|t| t.json_key()).collect();
        assert_eq!(keys, ["urls", "user_mentions", "hashtags", "media"]);
    }
}
