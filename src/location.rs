//! Location resolution for a status payload.
//!
//! Priority: explicit `location` string, then `place`, then
//! `geo.coordinates`. Client-tagged strings such as `iPhone: 37.7,-122.4`
//! are normalised to `37.7,-122.4`.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::error::Result;
use crate::model::{Location, Place};
use crate::place::parse_place;

static LAT_LONG_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\S+:)?\s*(-?[\d.]+)\s*,\s*(-?[\d.]+)$").expect("lat/long pattern is valid")
});

/// Resolve the single location value for a status.
///
/// # Errors
/// Fails if a `place` object is present but malformed.
pub fn resolve_location(status: &Value) -> Result<Option<Location>> {
    resolve_location_and_place(status).map(|(location, _)| location)
}

/// Resolve the location and, independently, the place.
///
/// The place is decoded whenever the payload carries one, even if a location
/// string takes priority for [`Location`].
pub(crate) fn resolve_location_and_place(
    status: &Value,
) -> Result<(Option<Location>, Option<Place>)> {
    let place = match &status["place"] {
        obj @ Value::Object(_) => Some(parse_place(obj)?),
        _ => None,
    };

    if let Some(text) = status["location"].as_str().filter(|s| !s.is_empty()) {
        return Ok((Some(Location::Text(normalise_lat_long(text))), place));
    }

    if let Some(place) = place {
        return Ok((Some(Location::Place(place.clone())), Some(place)));
    }

    Ok((geo_coordinates(&status["geo"]).map(Location::Text), None))
}

fn normalise_lat_long(text: &str) -> String {
    LAT_LONG_RE.captures(text).map_or_else(
        || text.to_string(),
        |caps| format!("{},{}", &caps[2], &caps[3]),
    )
}

fn geo_coordinates(geo: &Value) -> Option<String> {
    let coords = geo["coordinates"].as_array()?;
    let lat = coordinate(coords.first()?)?;
    let lon = coordinate(coords.get(1)?)?;
    Some(format!("{lat},{lon}"))
}

fn coordinate(value: &Value) -> Option<String> {
    match value {
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) => Some(s.clone()),
        _ => None,
    }
}
