//! Test data model for the fake IMAP server
//!
//! Builder-style construction of mailbox state:
//!
//! ```ignore
//! let mailbox = MailboxBuilder::new()
//!     .folder("INBOX")
//!         .email(1, false, raw_rfc2822_bytes)
//!     .folder("Trash")
//!     .build();
//! ```
//!
//! The `Mailbox` is shared with the server behind a mutex so mutation
//! commands (STORE, EXPUNGE, CREATE, DELETE, MOVE) are observable from
//! the test after the client call returns.

/// All folders the fake account contains.
#[derive(Debug, Clone)]
pub struct Mailbox {
    pub folders: Vec<TestFolder>,
}

impl Mailbox {
    pub fn get_folder(&self, name: &str) -> Option<&TestFolder> {
        self.folders.iter().find(|f| f.name == name)
    }

    pub fn get_folder_mut(&mut self, name: &str) -> Option<&mut TestFolder> {
        self.folders.iter_mut().find(|f| f.name == name)
    }
}

/// One folder. `broken` folders appear in LIST but refuse to open,
/// which is how tests exercise per-folder failure tolerance.
#[derive(Debug, Clone)]
pub struct TestFolder {
    pub name: String,
    pub broken: bool,
    pub emails: Vec<TestEmail>,
}

/// One stored message: a per-folder UID, flag state, and the complete
/// raw RFC 2822 bytes returned by FETCH BODY[].
#[derive(Debug, Clone)]
pub struct TestEmail {
    pub uid: u32,
    pub seen: bool,
    pub flagged: bool,
    pub deleted: bool,
    pub raw: Vec<u8>,
}

/// Builder for `Mailbox`. `.folder(name)` starts a folder; subsequent
/// `.email(...)` calls append to it.
pub struct MailboxBuilder {
    folders: Vec<TestFolder>,
}

impl MailboxBuilder {
    pub fn new() -> Self {
        Self {
            folders: Vec::new(),
        }
    }

    pub fn folder(mut self, name: &str) -> Self {
        self.folders.push(TestFolder {
            name: name.to_string(),
            broken: false,
            emails: Vec::new(),
        });
        self
    }

    /// A folder that is listed but fails to SELECT/EXAMINE.
    pub fn broken_folder(mut self, name: &str) -> Self {
        self.folders.push(TestFolder {
            name: name.to_string(),
            broken: true,
            emails: Vec::new(),
        });
        self
    }

    /// Add an email to the most recently added folder.
    ///
    /// # Panics
    ///
    /// Panics if called before any `.folder()` call.
    pub fn email(self, uid: u32, seen: bool, raw: &[u8]) -> Self {
        self.email_with_flags(uid, seen, false, raw)
    }

    pub fn email_with_flags(mut self, uid: u32, seen: bool, flagged: bool, raw: &[u8]) -> Self {
        self.folders
            .last_mut()
            .expect("call .folder() before .email()")
            .emails
            .push(TestEmail {
                uid,
                seen,
                flagged,
                deleted: false,
                raw: raw.to_vec(),
            });
        self
    }

    pub fn build(self) -> Mailbox {
        Mailbox {
            folders: self.folders,
        }
    }
}
