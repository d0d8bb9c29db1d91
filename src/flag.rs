//! IMAP message flags used by the mutation operations
//!
//! Only the system flags this crate actually stores or clears are
//! modeled: `\Seen` for read/unread state and `\Deleted` for the
//! delete-then-expunge sequence. `\Flagged` exists because search
//! results report it.

use std::fmt;

/// A system flag on a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Flag {
    /// Message has been read (`\Seen`).
    Seen,
    /// Message is flagged for attention (`\Flagged`).
    Flagged,
    /// Message is marked for deletion (`\Deleted`).
    Deleted,
}

impl Flag {
    /// The IMAP wire representation, including the leading backslash.
    #[must_use]
    pub const fn as_imap_str(self) -> &'static str {
        match self {
            Self::Seen => "\\Seen",
            Self::Flagged => "\\Flagged",
            Self::Deleted => "\\Deleted",
        }
    }

    /// STORE query that adds this flag: `+FLAGS (\Seen)`.
    #[must_use]
    pub fn store_add(self) -> String {
        format!("+FLAGS ({})", self.as_imap_str())
    }

    /// STORE query that removes this flag: `-FLAGS (\Seen)`.
    #[must_use]
    pub fn store_remove(self) -> String {
        format!("-FLAGS ({})", self.as_imap_str())
    }
}

impl fmt::Display for Flag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_imap_str())
    }
}
