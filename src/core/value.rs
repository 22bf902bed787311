//! Database value types
//!
//! This module defines the typed cell values a driver reads from a result
//! set, and how each one is rendered as text for the tabular result.

use serde::{Deserialize, Serialize};

/// A single cell read from a result set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DatabaseValue {
    /// SQL NULL
    Null,
    /// 64-bit integer
    Integer(i64),
    /// 64-bit floating point
    Real(f64),
    /// Text value
    Text(String),
    /// Binary data
    Blob(Vec<u8>),
}

impl DatabaseValue {
    /// Render the value as text, the way a generic display or export tool sees it
    ///
    /// NULL has no text form and yields `None`. Integral reals keep a trailing
    /// `.0` so they stay distinguishable from integers, and blobs are rendered
    /// as lowercase hex.
    pub fn to_text(&self) -> Option<String> {
        match self {
            DatabaseValue::Null => None,
            DatabaseValue::Integer(v) => Some(v.to_string()),
            DatabaseValue::Real(v) => Some(format_real(*v)),
            DatabaseValue::Text(s) => Some(s.clone()),
            DatabaseValue::Blob(b) => {
                Some(b.iter().map(|byte| format!("{:02x}", byte)).collect())
            }
        }
    }

    /// Get the value as an i64
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            DatabaseValue::Integer(v) => Some(*v),
            DatabaseValue::Real(v) if v.fract() == 0.0 => Some(*v as i64),
            DatabaseValue::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Get the value as an f64
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            DatabaseValue::Real(v) => Some(*v),
            DatabaseValue::Integer(v) => Some(*v as f64),
            DatabaseValue::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Check if the value is null
    pub fn is_null(&self) -> bool {
        matches!(self, DatabaseValue::Null)
    }
}

fn format_real(v: f64) -> String {
    if v.is_finite() && v.fract() == 0.0 && v.abs() < 1e16 {
        format!("{:.1}", v)
    } else {
        v.to_string()
    }
}

impl From<bool> for DatabaseValue {
    fn from(v: bool) -> Self {
        DatabaseValue::Integer(v as i64)
    }
}

impl From<i32> for DatabaseValue {
    fn from(v: i32) -> Self {
        DatabaseValue::Integer(v as i64)
    }
}

impl From<i64> for DatabaseValue {
    fn from(v: i64) -> Self {
        DatabaseValue::Integer(v)
    }
}

impl From<f64> for DatabaseValue {
    fn from(v: f64) -> Self {
        DatabaseValue::Real(v)
    }
}

impl From<String> for DatabaseValue {
    fn from(v: String) -> Self {
        DatabaseValue::Text(v)
    }
}

impl From<&str> for DatabaseValue {
    fn from(v: &str) -> Self {
        DatabaseValue::Text(v.to_string())
    }
}

impl From<Vec<u8>> for DatabaseValue {
    fn from(v: Vec<u8>) -> Self {
        DatabaseValue::Blob(v)
    }
}

impl<T: Into<DatabaseValue>> From<Option<T>> for DatabaseValue {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(val) => val.into(),
            None => DatabaseValue::Null,
        }
    }
}
