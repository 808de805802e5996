//! Donation domain type.
//!
//! A `Donation` only exists once both fields passed the presence rule:
//! a field is absent when it is missing, `null`, `false`, `0` or `""`.
//! Nothing beyond presence is checked; the gateway is the authority on
//! whether a phone number or amount is acceptable.

use serde::Serialize;
use serde_json::{Number, Value};

use crate::error::ValidationError;

/// Subscriber phone number, kept in the form the caller supplied it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Log-safe form: keeps the first four and last two characters.
    pub fn masked(&self) -> String {
        let chars: Vec<char> = self.0.chars().collect();
        let len = chars.len();
        if len <= 6 {
            return "*".repeat(len);
        }
        chars
            .iter()
            .enumerate()
            .map(|(i, c)| if i < 4 || i >= len - 2 { *c } else { '*' })
            .collect()
    }
}

impl std::fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.masked())
    }
}

/// Donation amount, relayed to the gateway exactly as supplied.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Amount {
    Number(Number),
    Text(String),
}

impl std::fmt::Display for Amount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Amount::Number(n) => write!(f, "{}", n),
            Amount::Text(s) => f.write_str(s),
        }
    }
}

/// A validated donation request.
#[derive(Debug, Clone, PartialEq)]
pub struct Donation {
    pub phone: PhoneNumber,
    pub amount: Amount,
}

impl Donation {
    /// Builds a donation from the loosely-typed request fields.
    pub fn from_fields(
        phone: Option<Value>,
        amount: Option<Value>,
    ) -> Result<Self, ValidationError> {
        let (Some(phone), Some(amount)) = (
            phone.filter(is_present),
            amount.filter(is_present),
        ) else {
            return Err(ValidationError::MissingFields);
        };

        let phone = match phone {
            Value::String(s) => PhoneNumber(s),
            Value::Number(n) => PhoneNumber(n.to_string()),
            _ => return Err(ValidationError::UnsupportedType("phone")),
        };

        let amount = match amount {
            Value::Number(n) => Amount::Number(n),
            Value::String(s) => Amount::Text(s),
            _ => return Err(ValidationError::UnsupportedType("amount")),
        };

        Ok(Self { phone, amount })
    }
}

fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
