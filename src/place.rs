//! Place sub-object decoding.

use serde_json::Value;

use crate::error::{Result, XstatusError};
use crate::model::{BoundingBox, Place};

/// Decode a `place` object. `id`, `name` and `full_name` are required.
///
/// # Errors
/// Returns [`XstatusError::MissingField`] when a required field is absent.
pub fn parse_place(value: &Value) -> Result<Place> {
    let required = |field: &'static str| {
        value[field]
            .as_str()
            .map(String::from)
            .ok_or_else(|| XstatusError::missing_field(field))
    };
    let optional = |field: &str| value[field].as_str().map(String::from);

    Ok(Place {
        id: required("id")?,
        name: required("name")?,
        full_name: required("full_name")?,
        place_type: optional("place_type"),
        country: optional("country"),
        country_code: optional("country_code").filter(|code| !code.is_empty()),
        url: optional("url"),
        bounding_box: parse_bounding_box(&value["bounding_box"]),
    })
}

/// `coordinates` is `[[[lon, lat], ...]]` for polygons; a flat ring is also
/// accepted. Points that are not number pairs are dropped.
fn parse_bounding_box(value: &Value) -> Option<BoundingBox> {
    let coordinates = value["coordinates"].as_array()?;
    let ring = match coordinates.first() {
        Some(Value::Array(inner)) if inner.first().is_some_and(Value::is_array) => inner,
        _ => coordinates,
    };

    let points: Vec<(f64, f64)> = ring
        .iter()
        .filter_map(|point| Some((point[0].as_f64()?, point[1].as_f64()?)))
        .collect();

    if points.is_empty() {
        return None;
    }
    Some(BoundingBox {
        kind: value["type"].as_str().map(String::from),
        points,
    })
}
