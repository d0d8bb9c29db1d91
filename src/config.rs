//! Account and IMAP connection configuration

use crate::error::{Error, Result};
use std::env;

/// Connection settings for the one configured account.
///
/// The account address doubles as the IMAP login name, which is how
/// most consumer providers authenticate.
#[derive(Debug, Clone)]
pub struct ImapConfig {
    pub address: String,
    pub password: String,
    pub host: String,
    pub port: u16,
    /// Implicit TLS when set (the usual port-993 mode); STARTTLS
    /// upgrade on a plain connection otherwise.
    pub tls: bool,
}

impl ImapConfig {
    /// Load configuration from environment variables.
    ///
    /// Reads from `.env` if present. Required variables:
    /// - `EMAIL_ADDRESS`
    /// - `EMAIL_PASSWORD`
    ///
    /// Optional (with defaults):
    /// - `IMAP_HOST` (default: `127.0.0.1`)
    /// - `IMAP_PORT` (default: `993`)
    /// - `IMAP_TLS` (default: `true`)
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] when a required variable is missing
    /// or a value fails to parse. Callers treat this as fatal at
    /// startup.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            address: env::var("EMAIL_ADDRESS")
                .map_err(|_| Error::Config("EMAIL_ADDRESS not set".into()))?,
            password: env::var("EMAIL_PASSWORD")
                .map_err(|_| Error::Config("EMAIL_PASSWORD not set".into()))?,
            host: env::var("IMAP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env::var("IMAP_PORT")
                .unwrap_or_else(|_| "993".to_string())
                .parse()
                .map_err(|e| Error::Config(format!("Invalid IMAP_PORT: {e}")))?,
            tls: parse_bool(
                &env::var("IMAP_TLS").unwrap_or_else(|_| "true".to_string()),
            )
            .ok_or_else(|| Error::Config("Invalid IMAP_TLS: expected true or false".into()))?,
        })
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" => Some(true),
        "false" | "0" => Some(false),
        _ => None,
    }
}
