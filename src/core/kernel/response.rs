//! Response normalization.
//!
//! Parsing and numeric coercion are separate passes: the body is parsed into
//! a plain `serde_json::Value`, then [`coerce_numbers`] rewrites numeric
//! string leaves, then [`check_exchange_error`] looks for an `error` marker.

use crate::core::errors::ExchangeError;
use crate::core::kernel::rest::RawResponse;
use serde::de::DeserializeOwned;
use serde_json::{Number, Value};

/// Normalized response payload
#[derive(Debug, Clone, PartialEq)]
pub enum Envelope {
    /// JSON body after numeric coercion
    Json(Value),
    /// `text/plain` body
    Text(String),
    /// Any other content type, passed through untouched
    Raw(RawResponse),
}

impl Envelope {
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Self::Json(value) => Some(value),
            _ => None,
        }
    }

    pub fn into_json(self) -> Result<Value, ExchangeError> {
        match self {
            Self::Json(value) => Ok(value),
            Self::Text(text) => Err(ExchangeError::DeserializationError(format!(
                "expected JSON response, got text: {}",
                text
            ))),
            Self::Raw(raw) => Err(ExchangeError::DeserializationError(format!(
                "expected JSON response, got {}",
                raw.content_type.as_deref().unwrap_or("no content type")
            ))),
        }
    }

    /// Deserialize a JSON payload into `T`
    pub fn deserialize<T: DeserializeOwned>(self) -> Result<T, ExchangeError> {
        let value = self.into_json()?;
        serde_json::from_value(value).map_err(|e| {
            ExchangeError::DeserializationError(format!("Failed to deserialize JSON: {}", e))
        })
    }

    /// Body as text, for `text/plain` and raw responses
    pub fn into_text(self) -> String {
        match self {
            Self::Json(value) => value.to_string(),
            Self::Text(text) => text,
            Self::Raw(raw) => raw.text(),
        }
    }
}

/// Parse a string leaf as a number if the whole string is a finite
/// numeric literal. Integers stay integers when they fit in 64 bits.
fn parse_numeric(s: &str) -> Option<Number> {
    if s.is_empty() {
        return None;
    }
    if let Ok(i) = s.parse::<i64>() {
        return Some(i.into());
    }
    if let Ok(u) = s.parse::<u64>() {
        return Some(u.into());
    }
    // f64 parsing also accepts "inf" and "NaN"; from_f64 rejects both
    s.parse::<f64>().ok().and_then(Number::from_f64)
}

/// Replace every numeric-looking string leaf with its numeric value.
///
/// Structure is preserved: objects keep their keys, arrays their length, and
/// empty arrays pass through as empty arrays. Applying this twice is the
/// same as applying it once.
pub fn coerce_numbers(value: Value) -> Value {
    match value {
        Value::String(s) => match parse_numeric(&s) {
            Some(n) => Value::Number(n),
            None => Value::String(s),
        },
        Value::Array(items) => Value::Array(items.into_iter().map(coerce_numbers).collect()),
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(key, value)| (key, coerce_numbers(value)))
                .collect(),
        ),
        other => other,
    }
}

fn error_entries(field: &Value) -> Vec<String> {
    let entry = |v: &Value| match v {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };

    match field {
        Value::Null | Value::Bool(false) => Vec::new(),
        Value::Object(map) if map.is_empty() => Vec::new(),
        Value::Array(items) => items.iter().map(entry).collect(),
        other => vec![entry(other)],
    }
    .into_iter()
    .filter(|e| !e.is_empty())
    .collect()
}

/// Fail if `payload` carries a non-empty `error` field.
///
/// Entries prefixed with `E` become [`ExchangeError::ExchangeApi`] codes with
/// the prefix removed; when none carry the prefix the result is
/// [`ExchangeError::UnknownExchange`].
pub fn check_exchange_error(
    payload: &Value,
    method: &str,
    request_body: &str,
) -> Result<(), ExchangeError> {
    let Some(field) = payload.get("error") else {
        return Ok(());
    };

    let entries = error_entries(field);
    if entries.is_empty() {
        return Ok(());
    }

    let codes: Vec<String> = entries
        .iter()
        .filter_map(|e| e.strip_prefix('E'))
        .map(str::to_string)
        .collect();

    if codes.is_empty() {
        Err(ExchangeError::UnknownExchange {
            errors: entries,
            method: method.to_string(),
            request_body: request_body.to_string(),
        })
    } else {
        Err(ExchangeError::ExchangeApi {
            codes,
            method: method.to_string(),
            request_body: request_body.to_string(),
        })
    }
}

/// Turn a successful HTTP response into an [`Envelope`].
///
/// `method` and `request_body` are only used to annotate exchange errors.
pub fn normalize(
    raw: RawResponse,
    method: &str,
    request_body: &str,
) -> Result<Envelope, ExchangeError> {
    let media_type = raw.media_type().unwrap_or_default();

    if media_type == "application/json" || media_type.ends_with("+json") {
        if raw.body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Envelope::Json(Value::Null));
        }
        let parsed: Value = serde_json::from_slice(&raw.body)?;
        let payload = coerce_numbers(parsed);
        check_exchange_error(&payload, method, request_body)?;
        Ok(Envelope::Json(payload))
    } else if media_type == "text/plain" {
        Ok(Envelope::Text(raw.text()))
    } else {
        Ok(Envelope::Raw(raw))
    }
}
