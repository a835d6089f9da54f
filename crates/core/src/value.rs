use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Date formats accepted when coercing text to a date, tried in order.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y", "%m/%d/%Y", "%Y/%m/%d"];

/// A single cell value. Columns may mix types; absent cells are `Null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Null,
    Number(f64),
    Text(String),
    Date(NaiveDate),
}

impl Default for Value {
    fn default() -> Self {
        Value::Null
    }
}

impl Value {
    /// Infer a typed value from raw text input (CSV fields, string cells).
    pub fn from_input(input: &str) -> Self {
        let trimmed = input.trim();

        if trimmed.is_empty() {
            return Value::Null;
        }

        if let Ok(num) = trimmed.parse::<f64>() {
            return Value::Number(num);
        }

        if let Some(date) = parse_date(trimmed) {
            return Value::Date(date);
        }

        Value::Text(trimmed.to_string())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Numeric view. Only `Number` qualifies; text is never coerced here.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Date view, coercing text through the accepted formats.
    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Value::Date(d) => Some(*d),
            Value::Text(s) => parse_date(s),
            _ => None,
        }
    }

    /// Equality used by filters: numbers compare numerically, text exactly,
    /// and a numeric literal matches a text cell holding the same number.
    pub fn matches(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::Text(a), Value::Text(b)) => a == b,
            (Value::Date(a), Value::Date(b)) => a == b,
            (Value::Text(s), Value::Number(n)) | (Value::Number(n), Value::Text(s)) => {
                s.trim().parse::<f64>().map(|p| p == *n).unwrap_or(false)
            }
            (Value::Date(d), Value::Text(s)) | (Value::Text(s), Value::Date(d)) => {
                parse_date(s).map(|p| p == *d).unwrap_or(false)
            }
            _ => false,
        }
    }

    /// JSON shape: null, number (integral numbers without a fraction),
    /// string, or "YYYY-MM-DD". NaN cannot exist in JSON and maps to null.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Null => serde_json::Value::Null,
            Value::Number(n) => {
                if n.is_nan() {
                    serde_json::Value::Null
                } else if n.fract() == 0.0 && n.abs() < 1e15 {
                    serde_json::Value::from(*n as i64)
                } else {
                    serde_json::Value::from(*n)
                }
            }
            Value::Text(s) => serde_json::Value::String(s.clone()),
            Value::Date(d) => serde_json::Value::String(d.format("%Y-%m-%d").to_string()),
        }
    }

    /// Canonical string form, used as a grouping/join key.
    pub fn key_string(&self) -> String {
        match self {
            Value::Null => String::new(),
            Value::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    format!("{}", *n as i64)
                } else {
                    format!("{}", n)
                }
            }
            Value::Text(s) => s.clone(),
            Value::Date(d) => d.format("%Y-%m-%d").to_string(),
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key_string())
    }
}

/// Parse a date string against the accepted formats.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    // Trim a time component if present ("2024-01-15 00:00:00")
    let date_part = s.split_whitespace().next().unwrap_or(s);
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(date_part, fmt) {
            return Some(d);
        }
    }
    None
}
