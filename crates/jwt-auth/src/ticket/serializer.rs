//! Ticket serialization.

use super::AuthenticationTicket;
use crate::errors::AuthError;
use serde::{Deserialize, Serialize};

/// Current serialized ticket format.
pub const TICKET_FORMAT_VERSION: u32 = 1;

/// Converts tickets to and from bytes for the protector.
pub trait TicketSerializer: Send + Sync {
    /// # Errors
    ///
    /// Returns `AuthError::Serialization` if the ticket cannot be encoded.
    fn serialize(&self, ticket: &AuthenticationTicket) -> Result<Vec<u8>, AuthError>;

    /// # Errors
    ///
    /// Returns `AuthError::Serialization` if the bytes are not a ticket of a
    /// supported format version.
    fn deserialize(&self, data: &[u8]) -> Result<AuthenticationTicket, AuthError>;
}

/// JSON serializer with a format version field.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonTicketSerializer;

impl JsonTicketSerializer {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[derive(Serialize)]
struct VersionedTicketRef<'a> {
    version: u32,
    ticket: &'a AuthenticationTicket,
}

#[derive(Deserialize)]
struct VersionedTicket {
    version: u32,
    ticket: AuthenticationTicket,
}

impl TicketSerializer for JsonTicketSerializer {
    fn serialize(&self, ticket: &AuthenticationTicket) -> Result<Vec<u8>, AuthError> {
        serde_json::to_vec(&VersionedTicketRef {
            version: TICKET_FORMAT_VERSION,
            ticket,
        })
        .map_err(|e| AuthError::Serialization(format!("Failed to serialize ticket: {e}")))
    }

    fn deserialize(&self, data: &[u8]) -> Result<AuthenticationTicket, AuthError> {
        let versioned: VersionedTicket = serde_json::from_slice(data)
            .map_err(|e| AuthError::Serialization(format!("Failed to deserialize ticket: {e}")))?;

        if versioned.version != TICKET_FORMAT_VERSION {
            return Err(AuthError::Serialization(format!(
                "Unsupported ticket format version: {}",
                versioned.version
            )));
        }

        Ok(versioned.ticket)
    }
}
