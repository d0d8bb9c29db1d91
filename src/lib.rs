//! Typed tool layer over a single IMAP account
//!
//! Exposes a fixed set of remote-callable tools -- search, folder
//! management, read/flag mutation, deletion, and account statistics --
//! backed by one lifecycle-managed IMAP connection. The crate is a
//! protocol adapter: tool invocations become protocol-correct command
//! sequences, and streamed mailbox responses become structured
//! [`Message`], [`Folder`], and [`AccountStats`] values.
//!
//! Entry points: [`tools::dispatch`] for name-plus-JSON invocation, or
//! [`MailClient`] directly for typed calls.
//!
//! Security note: peer TLS certificates are deliberately not verified
//! (see [`MailClient::connect`]); the targeted providers routinely
//! present self-signed certificates.

mod client;
mod config;
mod error;
mod flag;
mod folder;
mod message;
mod search;
mod session;
mod stats;
pub mod tools;

pub use client::MailClient;
pub use config::ImapConfig;
pub use error::{Error, Result};
pub use flag::Flag;
pub use folder::Folder;
pub use message::Message;
pub use search::SearchQuery;
pub use session::MailSession;
pub use stats::{AccountStats, FolderStats, SenderCount};
