//! Claims identities and principals.
//!
//! [`create_principal`] is a trust boundary: it marks the identity as
//! authenticated without checking anything, so it must only be fed claims
//! taken from a token that has already been validated (or that this process
//! just signed).

use crate::claims::{claim_types, Claim, ClaimsExt};
use serde::{Deserialize, Serialize};

/// Authentication type used when none is supplied.
pub const DEFAULT_AUTHENTICATION_TYPE: &str = "Password";

/// Role claim type used when none is supplied.
pub const DEFAULT_ROLE_CLAIM_TYPE: &str = "Recipient";

/// A set of claims describing one authenticated (or anonymous) identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimsIdentity {
    claims: Vec<Claim>,
    authentication_type: Option<String>,
    name_claim_type: String,
    role_claim_type: String,
}

impl ClaimsIdentity {
    #[must_use]
    pub fn new(
        claims: Vec<Claim>,
        authentication_type: Option<String>,
        name_claim_type: impl Into<String>,
        role_claim_type: impl Into<String>,
    ) -> Self {
        Self {
            claims,
            authentication_type,
            name_claim_type: name_claim_type.into(),
            role_claim_type: role_claim_type.into(),
        }
    }

    #[must_use]
    pub fn claims(&self) -> &[Claim] {
        &self.claims
    }

    #[must_use]
    pub fn authentication_type(&self) -> Option<&str> {
        self.authentication_type.as_deref()
    }

    #[must_use]
    pub fn name_claim_type(&self) -> &str {
        &self.name_claim_type
    }

    #[must_use]
    pub fn role_claim_type(&self) -> &str {
        &self.role_claim_type
    }

    /// An identity is authenticated iff it carries a non-empty authentication
    /// type.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.authentication_type
            .as_deref()
            .is_some_and(|t| !t.is_empty())
    }

    /// Value of the first claim of the name claim type.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.claims.claim_value(&self.name_claim_type)
    }

    #[must_use]
    pub fn is_in_role(&self, role: &str) -> bool {
        self.claims
            .find_all(&self.role_claim_type)
            .any(|c| c.value == role)
    }
}

/// A principal holding one or more identities.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ClaimsPrincipal {
    identities: Vec<ClaimsIdentity>,
}

impl ClaimsPrincipal {
    #[must_use]
    pub fn new(identity: ClaimsIdentity) -> Self {
        Self {
            identities: vec![identity],
        }
    }

    pub fn add_identity(&mut self, identity: ClaimsIdentity) {
        self.identities.push(identity);
    }

    #[must_use]
    pub fn identities(&self) -> &[ClaimsIdentity] {
        &self.identities
    }

    /// The primary (first) identity.
    #[must_use]
    pub fn identity(&self) -> Option<&ClaimsIdentity> {
        self.identities.first()
    }

    /// Claims of all identities, in identity order.
    pub fn claims(&self) -> impl Iterator<Item = &Claim> {
        self.identities.iter().flat_map(|i| i.claims.iter())
    }

    #[must_use]
    pub fn find_first(&self, claim_type: &str) -> Option<&Claim> {
        self.claims().find(|c| c.claim_type == claim_type)
    }

    pub fn find_all<'a>(&'a self, claim_type: &'a str) -> impl Iterator<Item = &'a Claim> {
        self.claims().filter(move |c| c.claim_type == claim_type)
    }

    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.identity().and_then(ClaimsIdentity::name)
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.identity().is_some_and(ClaimsIdentity::is_authenticated)
    }

    #[must_use]
    pub fn is_in_role(&self, role: &str) -> bool {
        self.identities.iter().any(|i| i.is_in_role(role))
    }
}

/// Wrap `claims` into an authenticated principal.
///
/// Blank or absent labels fall back to [`DEFAULT_AUTHENTICATION_TYPE`] and
/// [`DEFAULT_ROLE_CLAIM_TYPE`]. The name claim type is always
/// [`claim_types::NAME`].
#[must_use]
pub fn create_principal(
    claims: Vec<Claim>,
    authentication_type: Option<&str>,
    role_claim_type: Option<&str>,
) -> ClaimsPrincipal {
    let authentication_type = non_blank(authentication_type).unwrap_or(DEFAULT_AUTHENTICATION_TYPE);
    let role_claim_type = non_blank(role_claim_type).unwrap_or(DEFAULT_ROLE_CLAIM_TYPE);

    ClaimsPrincipal::new(ClaimsIdentity::new(
        claims,
        Some(authentication_type.to_string()),
        claim_types::NAME,
        role_claim_type,
    ))
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}
