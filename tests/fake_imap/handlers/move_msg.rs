//! UID MOVE command handler (RFC 6851).
//!
//! MOVE is an extension command, so the line is parsed by hand from
//! the raw text instead of going through the command codec. The
//! semantics are copy-then-remove as a single server-side step: the
//! message leaves the source folder and appears in the destination.

use crate::fake_imap::io::write_line;
use crate::fake_imap::mailbox::Mailbox;
use std::sync::Mutex;
use tokio::io::{AsyncRead, AsyncWrite, BufReader};

/// Try to parse `<tag> UID MOVE <set> "<dest>"` from a raw command
/// line. Returns `None` if the line is some other command.
pub fn parse_uid_move(line: &str) -> Option<(String, Vec<u32>, String)> {
    let mut parts = line.trim().splitn(4, ' ');
    let tag = parts.next()?;
    let uid_kw = parts.next()?;
    let move_kw = parts.next()?;
    if !uid_kw.eq_ignore_ascii_case("UID") || !move_kw.eq_ignore_ascii_case("MOVE") {
        return None;
    }
    let rest = parts.next()?;
    let (set, dest) = rest.split_once(' ')?;
    let dest = dest.trim().trim_matches('"');
    if dest.is_empty() {
        return None;
    }
    Some((tag.to_string(), parse_uid_set(set), dest.to_string()))
}

/// Parse a textual UID set: `1,2,3` or `4:7` or a mix.
fn parse_uid_set(set: &str) -> Vec<u32> {
    let mut uids = Vec::new();
    for part in set.split(',') {
        if let Some((lo, hi)) = part.split_once(':') {
            if let (Ok(lo), Ok(hi)) = (lo.parse::<u32>(), hi.parse::<u32>()) {
                uids.extend(lo.min(hi)..=lo.max(hi));
            }
        } else if let Ok(uid) = part.parse::<u32>() {
            uids.push(uid);
        }
    }
    uids
}

pub async fn handle_uid_move<S: AsyncRead + AsyncWrite + Unpin>(
    tag: &str,
    uids: &[u32],
    dest_folder: &str,
    mailbox: &Mutex<Mailbox>,
    selected_folder: Option<&str>,
    stream: &mut BufReader<S>,
) {
    let Some(folder_name) = selected_folder else {
        let resp = format!("{tag} BAD No folder selected\r\n");
        let _ = write_line(stream, &resp).await;
        return;
    };

    // Validate both ends, then move under one lock (no await inside).
    let resp = {
        let mut mb = mailbox.lock().unwrap();
        if mb.get_folder(folder_name).is_none() {
            format!("{tag} BAD Source folder not found\r\n")
        } else if mb.get_folder(dest_folder).is_none() {
            format!("{tag} NO [TRYCREATE] Destination folder not found\r\n")
        } else {
            let source = mb.get_folder_mut(folder_name).unwrap();
            let mut taken = Vec::new();
            let mut i = 0;
            while i < source.emails.len() {
                if uids.contains(&source.emails[i].uid) {
                    taken.push(source.emails.remove(i));
                } else {
                    i += 1;
                }
            }

            let dest = mb.get_folder_mut(dest_folder).unwrap();
            let moved = taken.len();
            dest.emails.extend(taken);
            format!("{tag} OK MOVE completed ({moved} moved)\r\n")
        }
    };
    let _ = write_line(stream, &resp).await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake_imap::mailbox::MailboxBuilder;
    use tokio::io::BufReader;

    fn raw() -> Vec<u8> {
        b"From: a@b.com\r\nSubject: Test\r\n\r\nBody".to_vec()
    }

    async fn run(uids: &[u32], dest: &str, mailbox: &Mutex<Mailbox>, selected: Option<&str>) -> String {
        let (client, server) = tokio::io::duplex(4096);
        let mut stream = BufReader::new(server);

        handle_uid_move("A1", uids, dest, mailbox, selected, &mut stream).await;
        drop(stream);

        let mut buf = Vec::new();
        tokio::io::AsyncReadExt::read_to_end(&mut BufReader::new(client), &mut buf)
            .await
            .unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn parses_single_uid_and_quoted_dest() {
        let parsed = parse_uid_move("A7 UID MOVE 42 \"Archive\"\r\n");
        assert_eq!(
            parsed,
            Some(("A7".to_string(), vec![42], "Archive".to_string()))
        );
    }

    #[test]
    fn parses_sets_and_ranges() {
        let parsed = parse_uid_move("A7 uid move 1,3:5 Work");
        assert_eq!(
            parsed,
            Some(("A7".to_string(), vec![1, 3, 4, 5], "Work".to_string()))
        );
    }

    #[test]
    fn rejects_other_commands() {
        assert!(parse_uid_move("A7 UID FETCH 1 (FLAGS)").is_none());
        assert!(parse_uid_move("A7 SELECT INBOX").is_none());
    }

    #[tokio::test]
    #[allow(clippy::significant_drop_tightening)]
    async fn moves_email_out_of_source() {
        let raw = raw();
        let mb = Mutex::new(
            MailboxBuilder::new()
                .folder("INBOX")
                .email(1, false, &raw)
                .email(2, false, &raw)
                .folder("Archive")
                .build(),
        );

        let output = run(&[1], "Archive", &mb, Some("INBOX")).await;

        assert!(output.contains("A1 OK MOVE completed"));

        let locked = mb.lock().unwrap();
        assert_eq!(locked.get_folder("INBOX").unwrap().emails.len(), 1);
        let archive = locked.get_folder("Archive").unwrap();
        assert_eq!(archive.emails.len(), 1);
        assert_eq!(archive.emails[0].uid, 1);
    }

    #[tokio::test]
    async fn missing_dest_returns_trycreate() {
        let raw = raw();
        let mb = Mutex::new(
            MailboxBuilder::new()
                .folder("INBOX")
                .email(1, false, &raw)
                .build(),
        );

        let output = run(&[1], "NoSuch", &mb, Some("INBOX")).await;

        assert!(output.contains("TRYCREATE"));
    }

    #[tokio::test]
    async fn no_folder_selected_returns_bad() {
        let mb = Mutex::new(MailboxBuilder::new().folder("INBOX").build());
        let output = run(&[1], "Trash", &mb, None).await;
        assert!(output.contains("A1 BAD No folder selected"));
    }
}
