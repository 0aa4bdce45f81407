//! Fixed-width integer encoding of geographic coordinates.
//!
//! Degrees are mapped with `round(value * SCALE)` where `SCALE = 2^32 / 360`,
//! so latitude lands in `[-2^30, 2^30]` and longitude in `[-2^31, 2^31]`.
//! The mapping is monotonic: if `a <= b` then `encode(a) <= encode(b)`, which
//! lets every range comparison happen on integers. One encoded unit is about
//! 8.4e-8 degrees (under a centimetre at the equator); distinct inputs closer
//! than that may share an encoded value.

use crate::error::{BkdError, Result};
use crate::types::BoundingBox;
use spatio_bkd_types::LatLonRect;

/// Encoded units per degree.
pub const SCALE: f64 = 4_294_967_296.0 / 360.0;

pub const MIN_LATITUDE: f64 = -90.0;
pub const MAX_LATITUDE: f64 = 90.0;
pub const MIN_LONGITUDE: f64 = -180.0;
pub const MAX_LONGITUDE: f64 = 180.0;

/// Largest encoded latitude magnitude (`encode(90.0)`).
pub const MAX_ENCODED_LATITUDE: i64 = 1 << 30;
/// Largest encoded longitude magnitude (`encode(180.0)`).
pub const MAX_ENCODED_LONGITUDE: i64 = 1 << 31;

/// Encode a latitude in degrees.
///
/// # Examples
///
/// ```
/// use spatio_bkd::encoding::{decode_latitude, encode_latitude, MAX_ENCODED_LATITUDE};
///
/// assert_eq!(encode_latitude(90.0).unwrap(), MAX_ENCODED_LATITUDE);
/// assert!(encode_latitude(90.5).is_err());
/// assert!((decode_latitude(encode_latitude(51.5074).unwrap()) - 51.5074).abs() < 1e-7);
/// ```
pub fn encode_latitude(lat: f64) -> Result<i64> {
    if !lat.is_finite() {
        return Err(BkdError::Encoding(format!(
            "Latitude must be finite, got: {}",
            lat
        )));
    }
    if !(MIN_LATITUDE..=MAX_LATITUDE).contains(&lat) {
        return Err(BkdError::Encoding(format!(
            "Latitude out of range [-90.0, 90.0]: {}",
            lat
        )));
    }
    Ok((lat * SCALE).round() as i64)
}

/// Encode a longitude in degrees.
pub fn encode_longitude(lon: f64) -> Result<i64> {
    if !lon.is_finite() {
        return Err(BkdError::Encoding(format!(
            "Longitude must be finite, got: {}",
            lon
        )));
    }
    if !(MIN_LONGITUDE..=MAX_LONGITUDE).contains(&lon) {
        return Err(BkdError::Encoding(format!(
            "Longitude out of range [-180.0, 180.0]: {}",
            lon
        )));
    }
    Ok((lon * SCALE).round() as i64)
}

/// Encode a `(lat, lon)` pair into `(x, y)`.
pub fn encode_lat_lon(lat: f64, lon: f64) -> Result<(i64, i64)> {
    Ok((encode_latitude(lat)?, encode_longitude(lon)?))
}

pub fn decode_latitude(x: i64) -> f64 {
    x as f64 / SCALE
}

pub fn decode_longitude(y: i64) -> f64 {
    y as f64 / SCALE
}

/// Check that an already-encoded coordinate pair lies in the encoded domain.
pub fn validate_encoded(x: i64, y: i64) -> Result<()> {
    if !(-MAX_ENCODED_LATITUDE..=MAX_ENCODED_LATITUDE).contains(&x) {
        return Err(BkdError::Encoding(format!(
            "Encoded latitude out of range: {}",
            x
        )));
    }
    if !(-MAX_ENCODED_LONGITUDE..=MAX_ENCODED_LONGITUDE).contains(&y) {
        return Err(BkdError::Encoding(format!(
            "Encoded longitude out of range: {}",
            y
        )));
    }
    Ok(())
}

/// Encode a query rectangle.
///
/// Bounds must be finite and in range. An inverted rectangle stays inverted
/// and therefore encodes to an empty box.
pub fn encode_rect(rect: &LatLonRect) -> Result<BoundingBox> {
    let min_x = encode_latitude(rect.min_lat)?;
    let max_x = encode_latitude(rect.max_lat)?;
    let min_y = encode_longitude(rect.min_lon)?;
    let max_y = encode_longitude(rect.max_lon)?;
    Ok(BoundingBox::new(min_x, max_x, min_y, max_y))
}
