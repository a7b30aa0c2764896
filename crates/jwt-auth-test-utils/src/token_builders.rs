//! Builder patterns for test data construction
//!
//! `TestTokenBuilder` signs tokens directly with `jsonwebtoken`, bypassing
//! the generator, so tests can produce tokens the generator never would.

use crate::crypto_fixtures::{TEST_AUDIENCE, TEST_ISSUER, TEST_SIGNING_KEY};
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde_json::{Map, Value};

/// Builder for forged test JWTs
///
/// # Example
/// ```rust,ignore
/// let token = TestTokenBuilder::new()
///     .for_user("alice")
///     .with_algorithm(Algorithm::HS384)
///     .expires_in(3600)
///     .build();
/// ```
pub struct TestTokenBuilder {
    sub: String,
    issuer: Option<String>,
    audience: Option<String>,
    key: Vec<u8>,
    algorithm: Algorithm,
    iat: i64,
    nbf: Option<i64>,
    exp: Option<i64>,
    extra: Map<String, Value>,
}

impl TestTokenBuilder {
    /// Create a builder for a token the fixture options accept
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            sub: "test-subject".to_string(),
            issuer: Some(TEST_ISSUER.to_string()),
            audience: Some(TEST_AUDIENCE.to_string()),
            key: TEST_SIGNING_KEY.to_vec(),
            algorithm: Algorithm::HS256,
            iat: now.timestamp(),
            nbf: Some(now.timestamp()),
            exp: Some((now + Duration::minutes(5)).timestamp()),
            extra: Map::new(),
        }
    }

    /// Set the subject (also used as `name`)
    pub fn for_user(mut self, subject: &str) -> Self {
        self.sub = subject.to_string();
        self
    }

    pub fn with_issuer(mut self, issuer: &str) -> Self {
        self.issuer = Some(issuer.to_string());
        self
    }

    pub fn without_issuer(mut self) -> Self {
        self.issuer = None;
        self
    }

    pub fn with_audience(mut self, audience: &str) -> Self {
        self.audience = Some(audience.to_string());
        self
    }

    pub fn signed_with_key(mut self, key: &[u8]) -> Self {
        self.key = key.to_vec();
        self
    }

    /// Sign with an HMAC algorithm other than HS256
    pub fn with_algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Set expiration in seconds from now (negative for the past)
    pub fn expires_in(mut self, seconds: i64) -> Self {
        self.exp = Some((Utc::now() + Duration::seconds(seconds)).timestamp());
        self
    }

    /// Expired one minute ago
    pub fn expired(self) -> Self {
        self.expires_in(-60)
    }

    pub fn without_expiry(mut self) -> Self {
        self.exp = None;
        self
    }

    /// Set not-before in seconds from now
    pub fn not_before_in(mut self, seconds: i64) -> Self {
        self.nbf = Some((Utc::now() + Duration::seconds(seconds)).timestamp());
        self
    }

    pub fn with_claim(mut self, claim_type: &str, value: impl Into<Value>) -> Self {
        self.extra.insert(claim_type.to_string(), value.into());
        self
    }

    /// Build the claims as a JSON object
    pub fn claims(&self) -> Map<String, Value> {
        let mut claims = self.extra.clone();
        claims.insert("sub".to_string(), Value::from(self.sub.clone()));
        claims.insert("name".to_string(), Value::from(self.sub.clone()));
        claims.insert("iat".to_string(), Value::from(self.iat));
        if let Some(issuer) = &self.issuer {
            claims.insert("iss".to_string(), Value::from(issuer.clone()));
        }
        if let Some(audience) = &self.audience {
            claims.insert("aud".to_string(), Value::from(audience.clone()));
        }
        if let Some(nbf) = self.nbf {
            claims.insert("nbf".to_string(), Value::from(nbf));
        }
        if let Some(exp) = self.exp {
            claims.insert("exp".to_string(), Value::from(exp));
        }
        claims
    }

    /// Sign and encode the token
    pub fn build(self) -> String {
        encode(
            &Header::new(self.algorithm),
            &self.claims(),
            &EncodingKey::from_secret(&self.key),
        )
        .expect("test token signing should not fail")
    }
}

impl Default for TestTokenBuilder {
    fn default() -> Self {
        Self::new()
    }
}
