//! `jwt-tool`: issue, validate and inspect access tokens from the shell.
//!
//! Reads the same environment as [`jwt_auth::config::Config`] and prints
//! JSON on stdout. Logs go to stderr.

use clap::{Parser, Subcommand};
use jwt_auth::config::Config;
use jwt_auth::parser::get_claims;
use jwt_auth::ticket::DEFAULT_AUTHENTICATION_SCHEME;
use jwt_auth::{
    Claim, DefaultTokenValidator, JwtTokenGenerator, SecureDataFormat, TokenGenerator,
    TokenValidator,
};
use serde_json::json;
use std::io;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Issue, validate and inspect HS256 access tokens
#[derive(Parser)]
#[command(name = "jwt-tool")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Sign a token for a user
    Issue {
        /// User name, stored as `name` and `sub`
        #[arg(long)]
        user: String,

        /// Extra claim as `type=value`; may be repeated
        #[arg(long = "claim", value_parser = parse_claim)]
        claims: Vec<Claim>,
    },

    /// Validate a token against the configured issuer, audience and key
    Validate {
        jwt: String,
    },

    /// Print a token's claims without verifying it
    Inspect {
        jwt: String,
    },
}

fn parse_claim(raw: &str) -> Result<Claim, String> {
    let (claim_type, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected type=value, got '{raw}'"))?;

    if claim_type.trim().is_empty() {
        return Err("claim type cannot be empty".to_string());
    }

    Ok(Claim::new(claim_type.trim(), value))
}

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "jwt_auth=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Inspect { jwt } => {
            let claims = get_claims(&jwt)?;
            println!("{}", serde_json::to_string_pretty(&claims)?);
            Ok(ExitCode::SUCCESS)
        }
        Command::Issue { user, claims } => {
            let config = load_config()?;
            let generator = JwtTokenGenerator::new(Arc::clone(&config.token));
            let generated = generator.generate_access_token_with_principal(&user, &claims)?;

            let cookie = if config.ticket_master_key.is_some() {
                let format = config.ticket_format()?;
                let ticket = generated.clone().into_ticket(DEFAULT_AUTHENTICATION_SCHEME);
                Some(format.protect(&ticket)?)
            } else {
                None
            };

            info!(
                expiry_minutes = config.token.token_expiry_minutes(),
                cookie = cookie.is_some(),
                "Token issued"
            );

            let output = json!({
                "access_token": generated.access_token,
                "expires_in_minutes": config.token.token_expiry_minutes(),
                "cookie": cookie,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
            Ok(ExitCode::SUCCESS)
        }
        Command::Validate { jwt } => {
            let config = load_config()?;
            let validator = DefaultTokenValidator::new();
            let result = validator.validate(&jwt, Some(config.token.as_ref()));
            println!("{}", serde_json::to_string_pretty(&result)?);

            if result.is_valid() {
                Ok(ExitCode::SUCCESS)
            } else {
                Ok(ExitCode::FAILURE)
            }
        }
    }
}

fn load_config() -> Result<Config, Box<dyn std::error::Error>> {
    let config = Config::from_env().map_err(|e| {
        error!("Failed to load configuration: {}", e);
        e
    })?;
    Ok(config)
}
