//! Coercion of optional field nodes into typed values.
//!
//! Each helper maps an absent node to `Ok(None)` and a present node whose
//! text does not read as the target type to [`TcxError::MalformedField`].
//! Nothing is ever defaulted.

use crate::TcxError;
use crate::xmltree::Element;
use time::format_description::well_known::Iso8601;
use time::{OffsetDateTime, PrimitiveDateTime};

pub fn timestamp(
    field: &'static str,
    node: Option<&Element>,
) -> Result<Option<OffsetDateTime>, TcxError> {
    coerce(field, node, parse_timestamp)
}

pub fn float(field: &'static str, node: Option<&Element>) -> Result<Option<f64>, TcxError> {
    coerce(field, node, |text| {
        let value: f64 = text
            .parse()
            .map_err(|e: std::num::ParseFloatError| e.to_string())?;
        if value.is_finite() {
            Ok(value)
        } else {
            Err("not a finite number".to_string())
        }
    })
}

pub fn integer(field: &'static str, node: Option<&Element>) -> Result<Option<u16>, TcxError> {
    coerce(field, node, |text| {
        text.parse()
            .map_err(|e: std::num::ParseIntError| e.to_string())
    })
}

fn coerce<T>(
    field: &'static str,
    node: Option<&Element>,
    parse: impl FnOnce(&str) -> Result<T, String>,
) -> Result<Option<T>, TcxError> {
    let Some(node) = node else {
        return Ok(None);
    };

    let text = node.text();
    parse(text)
        .map(Some)
        .map_err(|reason| TcxError::MalformedField {
            field,
            value: text.to_string(),
            reason,
        })
}

/// Parses an ISO 8601 timestamp. Values without a UTC offset are taken as UTC.
pub fn parse_timestamp(text: &str) -> Result<OffsetDateTime, String> {
    match OffsetDateTime::parse(text, &Iso8601::DEFAULT) {
        Ok(parsed) => Ok(parsed),
        Err(offset_err) => PrimitiveDateTime::parse(text, &Iso8601::DEFAULT)
            .map(PrimitiveDateTime::assume_utc)
            .map_err(|_| offset_err.to_string()),
    }
}
