use crate::core::errors::ExchangeError;
use rust_decimal::Decimal;
use serde::{Serialize, Serializer};
use serde_json::{Map, Number, Value};
use std::collections::BTreeMap;
use std::fmt;

/// Scalar value of a request parameter
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    String(String),
    Number(Number),
    Bool(bool),
}

impl ParamValue {
    /// Float parameter; rejects NaN and infinities
    pub fn float(value: f64) -> Result<Self, ExchangeError> {
        Number::from_f64(value).map(Self::Number).ok_or_else(|| {
            ExchangeError::SerializationError(format!("{} is not a finite number", value))
        })
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => f.write_str(s),
            Self::Number(n) => write!(f, "{}", n),
            Self::Bool(b) => write!(f, "{}", b),
        }
    }
}

impl Serialize for ParamValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::String(s) => serializer.serialize_str(s),
            Self::Number(n) => n.serialize(serializer),
            Self::Bool(b) => serializer.serialize_bool(*b),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        Self::Number(value.into())
    }
}

impl From<u64> for ParamValue {
    fn from(value: u64) -> Self {
        Self::Number(value.into())
    }
}

impl From<u32> for ParamValue {
    fn from(value: u32) -> Self {
        Self::Number(value.into())
    }
}

// Decimals travel as strings so no precision is lost on the wire.
impl From<Decimal> for ParamValue {
    fn from(value: Decimal) -> Self {
        Self::String(value.normalize().to_string())
    }
}

/// Request parameters for one call.
///
/// Keys are kept in byte-wise ascending order, which is the order the
/// canonical signing message requires.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Params(BTreeMap<String, ParamValue>);

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Adds the parameter only when a value is present
    #[must_use]
    pub fn with_opt<V: Into<ParamValue>>(mut self, key: impl Into<String>, value: Option<V>) -> Self {
        if let Some(value) = value {
            self.insert(key, value);
        }
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ParamValue>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.0.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterates in ascending key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Key/value pairs rendered as strings, in ascending key order
    pub fn to_pairs(&self) -> Vec<(&str, String)> {
        self.iter().map(|(k, v)| (k, v.to_string())).collect()
    }

    /// Build parameters from a JSON object whose values are scalars.
    /// Nulls are skipped.
    pub fn from_json(value: &Value) -> Result<Self, ExchangeError> {
        let object: &Map<String, Value> = value.as_object().ok_or_else(|| {
            ExchangeError::SerializationError("parameters must be a JSON object".to_string())
        })?;

        let mut params = Self::new();
        for (key, value) in object {
            match value {
                Value::Null => {}
                Value::String(s) => params.insert(key.clone(), s.clone()),
                Value::Number(n) => params.insert(key.clone(), ParamValue::Number(n.clone())),
                Value::Bool(b) => params.insert(key.clone(), *b),
                Value::Array(_) | Value::Object(_) => {
                    return Err(ExchangeError::SerializationError(format!(
                        "parameter '{}' is not a scalar",
                        key
                    )))
                }
            }
        }
        Ok(params)
    }
}

impl<K: Into<String>, V: Into<ParamValue>> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Self::new();
        for (k, v) in iter {
            params.insert(k, v);
        }
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_keys_iterate_sorted() {
        let params = Params::new()
            .with("symbol", "SOL_USDC")
            .with("quantity", "1.5")
            .with("orderType", "Limit");
        let keys: Vec<&str> = params.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["orderType", "quantity", "symbol"]);
    }

    #[test]
    fn test_json_body_keeps_scalar_types() {
        let params = Params::new()
            .with("limit", 100_u32)
            .with("postOnly", true)
            .with("symbol", "SOL_USDC");
        let body = serde_json::to_string(&params).unwrap();
        assert_eq!(body, r#"{"limit":100,"postOnly":true,"symbol":"SOL_USDC"}"#);
    }

    #[test]
    fn test_decimal_is_sent_as_string() {
        let params = Params::new().with("price", Decimal::from_str("25.5000").unwrap());
        assert_eq!(params.get("price"), Some(&ParamValue::String("25.5".to_string())));
    }

    #[test]
    fn test_float_rejects_nan() {
        assert!(ParamValue::float(f64::NAN).is_err());
        assert_eq!(ParamValue::float(0.25).unwrap().to_string(), "0.25");
    }

    #[test]
    fn test_from_json_skips_nulls_and_rejects_nested() {
        let params =
            Params::from_json(&serde_json::json!({"symbol": "BTC_USDC", "orderId": null})).unwrap();
        assert_eq!(params.len(), 1);

        assert!(Params::from_json(&serde_json::json!({"bad": [1]})).is_err());
    }
}
