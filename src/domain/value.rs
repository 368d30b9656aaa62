//! Primitive value shapes accepted by the cache

use std::fmt;

use serde::{Deserialize, Serialize};

/// A value the cache can store: text, raw bytes, integer or float.
///
/// Values are encoded to bytes the way redis encodes primitives: numbers
/// become their decimal text form, text becomes its UTF-8 bytes, raw bytes
/// pass through unchanged. Callers decode on read via the typed getters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheValue {
    Text(String),
    Bytes(Vec<u8>),
    Int(i64),
    Float(f64),
}

impl CacheValue {
    /// Encodes the value to the byte form written to the store
    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            Self::Text(s) => s.as_bytes().to_vec(),
            Self::Bytes(b) => b.clone(),
            Self::Int(n) => n.to_string().into_bytes(),
            Self::Float(f) => f.to_string().into_bytes(),
        }
    }
}

impl fmt::Display for CacheValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => write!(f, "'{}'", s),
            Self::Bytes(b) => write!(f, "b'{}'", String::from_utf8_lossy(b)),
            Self::Int(n) => write!(f, "{}", n),
            Self::Float(x) => write!(f, "{}", x),
        }
    }
}

impl From<&str> for CacheValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for CacheValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Vec<u8>> for CacheValue {
    fn from(value: Vec<u8>) -> Self {
        Self::Bytes(value)
    }
}

impl From<i64> for CacheValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for CacheValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_to_bytes() {
        let value = CacheValue::from("hello");
        assert_eq!(value.to_bytes(), b"hello");
    }

    #[test]
    fn test_int_to_bytes() {
        let value = CacheValue::from(42i64);
        assert_eq!(value.to_bytes(), b"42");
    }

    #[test]
    fn test_float_to_bytes() {
        let value = CacheValue::from(2.5f64);
        assert_eq!(value.to_bytes(), b"2.5");
    }

    #[test]
    fn test_bytes_pass_through() {
        let value = CacheValue::from(vec![0u8, 159, 146]);
        assert_eq!(value.to_bytes(), vec![0u8, 159, 146]);
    }

    #[test]
    fn test_display_text() {
        let value = CacheValue::from("hello");
        assert_eq!(value.to_string(), "'hello'");
    }

    #[test]
    fn test_display_int() {
        let value = CacheValue::from(42i64);
        assert_eq!(value.to_string(), "42");
    }

    #[test]
    fn test_serde_round_trip() {
        let value = CacheValue::from("hello");
        let json = serde_json::to_string(&value).unwrap();
        let back: CacheValue = serde_json::from_str(&json).unwrap();
        assert_eq!(back, value);
    }
}
