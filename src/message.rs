//! Message records and raw-message decoding
//!
//! Fetched messages arrive as raw RFC 2822 bytes plus protocol flags.
//! [`mail_parser`] turns the bytes into structured fields; the flags
//! become the `seen` and `flagged` booleans.

use crate::error::{Error, Result};
use mail_parser::MessageParser;
use serde::{Deserialize, Serialize};

/// One decoded message as the tool surface reports it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Mailbox-assigned identifier, unique within `folder` only.
    pub uid: u32,
    pub subject: String,
    /// Sender display string, e.g. `Alice <alice@example.com>`.
    pub from: String,
    /// Recipient addresses, deduplicated, empty entries removed.
    pub to: Vec<String>,
    /// ISO-8601 date string; empty when the header is unparseable.
    pub date: String,
    /// Plain-text body, falling back to HTML when no text part exists.
    pub body: String,
    /// Folder path the message was fetched from.
    pub folder: String,
    pub seen: bool,
    pub flagged: bool,
}

impl Message {
    /// Decode one raw message.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Decode`] when the raw bytes cannot be parsed
    /// as a message at all. Missing individual headers are not errors;
    /// the corresponding fields come back empty.
    pub fn decode(uid: u32, folder: &str, raw: &[u8], seen: bool, flagged: bool) -> Result<Self> {
        let parsed = MessageParser::default()
            .parse(raw)
            .ok_or_else(|| Error::Decode(format!("unparseable message for uid {uid}")))?;

        let subject = parsed.subject().unwrap_or_default().to_string();

        let from = parsed
            .from()
            .and_then(|addrs| addrs.first())
            .map(|addr| {
                let name = addr.name.as_deref().unwrap_or_default();
                let address = addr.address.as_deref().unwrap_or_default();
                if name.is_empty() {
                    address.to_string()
                } else if address.is_empty() {
                    name.to_string()
                } else {
                    format!("{name} <{address}>")
                }
            })
            .unwrap_or_default();

        let mut to: Vec<String> = Vec::new();
        if let Some(addrs) = parsed.to() {
            for addr in addrs.iter() {
                if let Some(address) = addr.address.as_deref() {
                    if !address.is_empty() && !to.iter().any(|a| a == address) {
                        to.push(address.to_string());
                    }
                }
            }
        }

        let date = parsed.date().map(mail_parser::DateTime::to_rfc3339).unwrap_or_default();

        let body = parsed
            .body_text(0)
            .or_else(|| parsed.body_html(0))
            .map(|text| text.to_string())
            .unwrap_or_default();

        Ok(Self {
            uid,
            subject,
            from,
            to,
            date,
            body,
            folder: folder.to_string(),
            seen,
            flagged,
        })
    }
}
