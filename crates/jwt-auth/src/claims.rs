//! Claim model.
//!
//! A token's claim set is an ordered `Vec<Claim>`. Claim types may repeat
//! (several `role` claims, for instance), which a plain map would lose, so
//! lookups go through [`ClaimsExt`] instead.
//!
//! On the wire a claim set becomes a flat JSON object: claims are grouped by
//! type, a single claim becomes a scalar and a repeated type becomes an
//! array. The `value_type` of a claim picks the
//! JSON scalar form (see [`value_types`]).

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

/// Registered and commonly used claim type names.
pub mod claim_types {
    /// Subject
    pub const SUB: &str = "sub";
    /// Unique token identifier
    pub const JTI: &str = "jti";
    /// Issued-at (Unix seconds)
    pub const IAT: &str = "iat";
    /// Not-before (Unix seconds)
    pub const NBF: &str = "nbf";
    /// Expiry (Unix seconds)
    pub const EXP: &str = "exp";
    /// Issuer
    pub const ISS: &str = "iss";
    /// Audience
    pub const AUD: &str = "aud";
    /// Display name of the user; the default name claim type of an identity
    pub const NAME: &str = "name";
    pub const GIVEN_NAME: &str = "given_name";
    pub const SURNAME: &str = "family_name";
    pub const EMAIL: &str = "email";
    pub const ROLE: &str = "role";
}

/// Claim value type names.
pub mod value_types {
    pub const STRING: &str = "string";
    pub const INTEGER64: &str = "integer64";
    pub const DOUBLE: &str = "double";
    pub const BOOLEAN: &str = "boolean";
    /// Value is raw JSON text (objects, nested arrays)
    pub const JSON: &str = "json";
}

/// A typed assertion about the subject of a token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claim {
    /// Claim type, e.g. `sub` or `given_name`
    pub claim_type: String,
    pub value: String,
    /// Value type name from [`value_types`]; `None` means string
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_type: Option<String>,
}

impl Claim {
    /// Creates a string-valued claim.
    #[must_use]
    pub fn new(claim_type: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            claim_type: claim_type.into(),
            value: value.into(),
            value_type: None,
        }
    }

    /// Creates a claim with an explicit value type.
    #[must_use]
    pub fn with_value_type(
        claim_type: impl Into<String>,
        value: impl Into<String>,
        value_type: impl Into<String>,
    ) -> Self {
        Self {
            claim_type: claim_type.into(),
            value: value.into(),
            value_type: Some(value_type.into()),
        }
    }

    /// Converts a JSON payload entry into claims.
    ///
    /// Arrays expand into one claim per element so repeated claim types
    /// survive a round trip through the payload.
    #[must_use]
    pub fn from_json(claim_type: &str, value: &Value) -> Vec<Claim> {
        match value {
            Value::Array(items) => items
                .iter()
                .map(|item| Self::from_json_scalar(claim_type, item))
                .collect(),
            other => vec![Self::from_json_scalar(claim_type, other)],
        }
    }

    fn from_json_scalar(claim_type: &str, value: &Value) -> Claim {
        match value {
            Value::String(s) => Claim::with_value_type(claim_type, s.clone(), value_types::STRING),
            Value::Number(n) if n.is_i64() || n.is_u64() => {
                Claim::with_value_type(claim_type, n.to_string(), value_types::INTEGER64)
            }
            Value::Number(n) => {
                Claim::with_value_type(claim_type, n.to_string(), value_types::DOUBLE)
            }
            Value::Bool(b) => {
                Claim::with_value_type(claim_type, b.to_string(), value_types::BOOLEAN)
            }
            Value::Null => Claim::with_value_type(claim_type, String::new(), value_types::STRING),
            other => Claim::with_value_type(claim_type, other.to_string(), value_types::JSON),
        }
    }

    /// JSON form of this claim's value, chosen by its value type.
    #[must_use]
    pub fn to_json(&self) -> Value {
        match self.value_type.as_deref() {
            Some(value_types::INTEGER64) => self
                .value
                .parse::<i64>()
                .map_or_else(|_| Value::String(self.value.clone()), Value::from),
            Some(value_types::DOUBLE) => self
                .value
                .parse::<f64>()
                .ok()
                .and_then(Number::from_f64)
                .map_or_else(|| Value::String(self.value.clone()), Value::Number),
            Some(value_types::BOOLEAN) => match self.value.as_str() {
                "true" => Value::Bool(true),
                "false" => Value::Bool(false),
                _ => Value::String(self.value.clone()),
            },
            Some(value_types::JSON) => serde_json::from_str(&self.value)
                .unwrap_or_else(|_| Value::String(self.value.clone())),
            _ => Value::String(self.value.clone()),
        }
    }
}

/// Lookup helpers over a claim sequence.
pub trait ClaimsExt {
    /// First claim of the given type.
    fn find_first(&self, claim_type: &str) -> Option<&Claim>;

    /// All claims of the given type, in order.
    fn find_all<'a>(&'a self, claim_type: &'a str) -> Box<dyn Iterator<Item = &'a Claim> + 'a>;

    /// Value of the first claim of the given type.
    fn claim_value(&self, claim_type: &str) -> Option<&str> {
        self.find_first(claim_type).map(|c| c.value.as_str())
    }
}

impl ClaimsExt for [Claim] {
    fn find_first(&self, claim_type: &str) -> Option<&Claim> {
        self.iter().find(|c| c.claim_type == claim_type)
    }

    fn find_all<'a>(&'a self, claim_type: &'a str) -> Box<dyn Iterator<Item = &'a Claim> + 'a> {
        Box::new(self.iter().filter(move |c| c.claim_type == claim_type))
    }
}

/// Builds the flat JSON payload object for a claim set.
#[must_use]
pub fn to_payload(claims: &[Claim]) -> Map<String, Value> {
    let mut grouped: Vec<(&str, Vec<Value>)> = Vec::new();
    for claim in claims {
        let value = claim.to_json();
        match grouped.iter_mut().find(|(t, _)| *t == claim.claim_type) {
            Some((_, values)) => values.push(value),
            None => grouped.push((claim.claim_type.as_str(), vec![value])),
        }
    }

    grouped
        .into_iter()
        .map(|(claim_type, mut values)| {
            let value = if values.len() == 1 {
                values.pop().unwrap_or(Value::Null)
            } else {
                Value::Array(values)
            };
            (claim_type.to_string(), value)
        })
        .collect()
}
