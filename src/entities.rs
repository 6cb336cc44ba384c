//! Entity extraction from the `entities` sub-object.
//!
//! Server indices count code points in the *raw* (still HTML-encoded) text.
//! They are translated here into code-point positions in the decoded text, so
//! every [`TweetEntity`] range can be used directly against
//! [`crate::model::Status::text`]. Translated ranges are clamped to the text,
//! sorted by start, and any entity overlapping an earlier one is dropped.

use serde_json::Value;
use std::collections::BTreeMap;
use tracing::debug;

use crate::error::{Result, XstatusError};
use crate::html::Decoded;
use crate::id::StatusId;
use crate::model::{EntityPayload, EntityType, TweetEntity};

/// Extract every known entity type. Types absent from the object get an empty
/// list, so "known empty" stays distinct from "not requested".
///
/// # Errors
/// Fails when an entity lacks its indices or a required field.
pub fn extract_all(
    entities: &Value,
    text: &Decoded,
) -> Result<BTreeMap<EntityType, Vec<TweetEntity>>> {
    EntityType::ALL
        .iter()
        .map(|&kind| extract_entities(entities, kind, text).map(|list| (kind, list)))
        .collect()
}

/// Extract the entities of one type, ordered by start.
///
/// # Errors
/// Fails when an entity lacks its indices or a required field.
pub fn extract_entities(
    entities: &Value,
    kind: EntityType,
    text: &Decoded,
) -> Result<Vec<TweetEntity>> {
    let Some(items) = entities[kind.json_key()].as_array() else {
        return Ok(Vec::new());
    };

    let mut list = items
        .iter()
        .map(|item| parse_entity(item, kind, text))
        .collect::<Result<Vec<_>>>()?;

    list.sort_by_key(|entity| entity.start);
    let before = list.len();
    let mut last_end = 0;
    list.retain(|entity| {
        let keep = entity.start >= last_end;
        if keep {
            last_end = entity.end;
        }
        keep
    });
    if list.len() < before {
        debug!(kind = %kind, dropped = before - list.len(), "Dropped overlapping entities");
    }

    Ok(list)
}

fn parse_entity(item: &Value, kind: EntityType, text: &Decoded) -> Result<TweetEntity> {
    let (raw_start, raw_end) = indices(item)?;
    let start = text.translate(raw_start);
    let end = text.translate(raw_end).max(start);

    let payload = match kind {
        EntityType::Url => EntityPayload::Url {
            url: required(item, "url")?,
            display_url: optional(item, "display_url"),
            expanded_url: optional(item, "expanded_url"),
        },
        EntityType::UserMention => EntityPayload::UserMention {
            screen_name: required(item, "screen_name")?,
            user_id: user_id(item),
            name: optional(item, "name"),
        },
        EntityType::Hashtag => EntityPayload::Hashtag {
            tag: required(item, "text")?,
        },
        EntityType::Media => EntityPayload::Media {
            url: required(item, "url")?,
            media_url: item["media_url_https"]
                .as_str()
                .or_else(|| item["media_url"].as_str())
                .map(String::from)
                .ok_or_else(|| XstatusError::missing_field("media_url"))?,
            media_type: optional(item, "type").unwrap_or_else(|| "photo".to_string()),
            display_url: optional(item, "display_url"),
            expanded_url: optional(item, "expanded_url"),
        },
    };

    Ok(TweetEntity {
        start,
        end,
        payload,
    })
}

fn indices(item: &Value) -> Result<(usize, usize)> {
    let pair = item["indices"]
        .as_array()
        .filter(|pair| pair.len() >= 2)
        .ok_or_else(|| XstatusError::missing_field("indices"))?;
    let index = |v: &Value| {
        v.as_u64()
            .and_then(|n| usize::try_from(n).ok())
            .ok_or_else(|| XstatusError::missing_field("indices"))
    };
    Ok((index(&pair[0])?, index(&pair[1])?))
}

fn user_id(item: &Value) -> Option<StatusId> {
    item["id_str"]
        .as_str()
        .and_then(|s| s.parse().ok())
        .or_else(|| StatusId::from_json(&item["id"]).ok())
}

fn required(item: &Value, field: &'static str) -> Result<String> {
    item[field]
        .as_str()
        .map(String::from)
        .ok_or_else(|| XstatusError::missing_field(field))
}

fn optional(item: &Value, field: &str) -> Option<String> {
    item[field].as_str().map(String::from)
}
