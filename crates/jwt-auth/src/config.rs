use crate::options::{TokenOptions, DEFAULT_TOKEN_EXPIRY_MINUTES};
use crate::secret::{secret_bytes, ExposeSecret, SecretBox, SecretString};
use crate::ticket::protector::MASTER_KEY_LEN;
use crate::ticket::{AesGcmDataProtector, JsonTicketSerializer, JwtTicketFormat};
use base64::{engine::general_purpose, Engine as _};
use std::collections::HashMap;
use std::env;
use std::sync::Arc;
use thiserror::Error;

/// Application name used when `TICKET_APPLICATION_NAME` is unset.
pub const DEFAULT_APPLICATION_NAME: &str = "jwt-auth";

#[derive(Debug)]
pub struct Config {
    pub token: Arc<TokenOptions>,
    /// Cookie ticket master key, present only when cookie mode is configured
    pub ticket_master_key: Option<SecretBox<Vec<u8>>>,
    pub application_name: String,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),

    #[error("Base64 decode error: {0}")]
    Base64Error(#[from] base64::DecodeError),
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// See [`Config::from_vars`].
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(&env::vars().collect())
    }

    /// Load configuration from a `HashMap` (for testing)
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a required variable is missing or a value
    /// fails to parse.
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let issuer = required(vars, "JWT_ISSUER")?;
        let audience = required(vars, "JWT_AUDIENCE")?;
        let signing_key = SecretString::from(required(vars, "JWT_SIGNING_KEY")?.to_string());

        let token_expiry_minutes = match vars.get("JWT_EXPIRY_MINUTES") {
            Some(value_str) => {
                let value: u32 = value_str.trim().parse().map_err(|e| {
                    ConfigError::InvalidValue(format!(
                        "JWT_EXPIRY_MINUTES must be a positive integer, got '{value_str}': {e}"
                    ))
                })?;
                value
            }
            None => DEFAULT_TOKEN_EXPIRY_MINUTES,
        };

        let token = TokenOptions::with_expiry(
            issuer,
            audience,
            signing_key.expose_secret().as_bytes(),
            token_expiry_minutes,
        )
        .map_err(|e| ConfigError::InvalidValue(e.to_string()))?;

        let ticket_master_key = match vars.get("TICKET_MASTER_KEY") {
            Some(encoded) => {
                let master_key = general_purpose::STANDARD
                    .decode(encoded.trim())
                    .map_err(ConfigError::Base64Error)?;

                if master_key.len() != MASTER_KEY_LEN {
                    return Err(ConfigError::InvalidValue(format!(
                        "TICKET_MASTER_KEY: expected {MASTER_KEY_LEN} bytes, got {}",
                        master_key.len()
                    )));
                }

                Some(secret_bytes(&master_key))
            }
            None => None,
        };

        let application_name = vars
            .get("TICKET_APPLICATION_NAME")
            .filter(|name| !name.trim().is_empty())
            .cloned()
            .unwrap_or_else(|| DEFAULT_APPLICATION_NAME.to_string());

        Ok(Config {
            token: Arc::new(token),
            ticket_master_key,
            application_name,
        })
    }

    /// Protector purpose for authentication cookies.
    #[must_use]
    pub fn ticket_purpose(&self) -> String {
        format!("{}-Auth1", self.application_name)
    }

    /// Build the cookie ticket codec.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingEnvVar` if no ticket master key is
    /// configured.
    pub fn ticket_format(
        &self,
    ) -> Result<JwtTicketFormat<AesGcmDataProtector, JsonTicketSerializer>, ConfigError> {
        let master_key = self
            .ticket_master_key
            .as_ref()
            .ok_or_else(|| ConfigError::MissingEnvVar("TICKET_MASTER_KEY".to_string()))?;

        let purpose = self.ticket_purpose();
        let protector = AesGcmDataProtector::new(
            master_key.expose_secret(),
            &self.application_name,
            &[purpose.as_str()],
        )
        .map_err(|e| ConfigError::InvalidValue(e.to_string()))?;

        Ok(JwtTicketFormat::new(
            self.token.to_validation_parameters(),
            JsonTicketSerializer::new(),
            protector,
        ))
    }
}

fn required<'a>(vars: &'a HashMap<String, String>, name: &str) -> Result<&'a str, ConfigError> {
    vars.get(name)
        .map(String::as_str)
        .ok_or_else(|| ConfigError::MissingEnvVar(name.to_string()))
}
