//! Search predicates and IMAP criteria building

use chrono::NaiveDate;
use serde::Deserialize;

/// A set of optional search predicates against one folder.
///
/// All predicates absent means "every message in the folder".
/// Deserializes directly from `search_emails` tool arguments, with the
/// folder defaulting to `INBOX` and the result cap to 50.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SearchQuery {
    #[serde(default = "default_folder")]
    pub folder: String,
    #[serde(default)]
    pub from: Option<String>,
    #[serde(default)]
    pub to: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    /// Matches messages dated on or after this day (IMAP SINCE).
    #[serde(default)]
    pub since: Option<NaiveDate>,
    /// Matches messages dated strictly before this day (IMAP BEFORE).
    #[serde(default)]
    pub before: Option<NaiveDate>,
    #[serde(default)]
    pub seen: Option<bool>,
    #[serde(default)]
    pub flagged: Option<bool>,
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_folder() -> String {
    "INBOX".to_string()
}

const fn default_limit() -> usize {
    50
}

impl Default for SearchQuery {
    fn default() -> Self {
        Self {
            folder: default_folder(),
            from: None,
            to: None,
            subject: None,
            body: None,
            since: None,
            before: None,
            seen: None,
            flagged: None,
            limit: default_limit(),
        }
    }
}

impl SearchQuery {
    /// Build the UID SEARCH criteria string.
    ///
    /// Present predicates are emitted in a fixed order (from, to,
    /// subject, body, since, before, seen, flagged); with none present
    /// the criteria is the single `ALL` sentinel.
    #[must_use]
    pub fn criteria(&self) -> String {
        let mut parts: Vec<String> = Vec::new();

        if let Some(from) = &self.from {
            parts.push(format!("FROM {}", quote(from)));
        }
        if let Some(to) = &self.to {
            parts.push(format!("TO {}", quote(to)));
        }
        if let Some(subject) = &self.subject {
            parts.push(format!("SUBJECT {}", quote(subject)));
        }
        if let Some(body) = &self.body {
            parts.push(format!("BODY {}", quote(body)));
        }
        if let Some(since) = self.since {
            parts.push(format!("SINCE {}", imap_date(since)));
        }
        if let Some(before) = self.before {
            parts.push(format!("BEFORE {}", imap_date(before)));
        }
        match self.seen {
            Some(true) => parts.push("SEEN".to_string()),
            Some(false) => parts.push("UNSEEN".to_string()),
            None => {}
        }
        match self.flagged {
            Some(true) => parts.push("FLAGGED".to_string()),
            Some(false) => parts.push("UNFLAGGED".to_string()),
            None => {}
        }

        if parts.is_empty() {
            "ALL".to_string()
        } else {
            parts.join(" ")
        }
    }
}

/// Format a date the way RFC 3501 search keys expect: `1-Jan-2024`.
fn imap_date(date: NaiveDate) -> String {
    date.format("%-d-%b-%Y").to_string()
}

/// Quote a search string, escaping backslashes and double quotes.
fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        if c == '"' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
    out
}
