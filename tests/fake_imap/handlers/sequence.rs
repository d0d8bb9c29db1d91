//! UID set helpers shared by the UID-variant handlers.

use imap_codec::imap_types::sequence::{SeqOrUid, Sequence, SequenceSet};

/// Expand a `SequenceSet` into concrete UIDs. `*` resolves to
/// `max_uid`.
pub fn extract_uids(seq_set: &SequenceSet, max_uid: u32) -> Vec<u32> {
    let mut uids = Vec::new();
    for seq in seq_set.0.as_ref() {
        match seq {
            Sequence::Single(SeqOrUid::Value(v)) => uids.push(v.get()),
            Sequence::Single(SeqOrUid::Asterisk) => uids.push(max_uid),
            Sequence::Range(a, b) => {
                let lo = match a {
                    SeqOrUid::Value(v) => v.get(),
                    SeqOrUid::Asterisk => max_uid,
                };
                let hi = match b {
                    SeqOrUid::Value(v) => v.get(),
                    SeqOrUid::Asterisk => max_uid,
                };
                let (lo, hi) = if lo <= hi { (lo, hi) } else { (hi, lo) };
                for uid in lo..=hi {
                    uids.push(uid);
                }
            }
        }
    }
    uids
}

/// Render UIDs the way a client writes a set: `1,2,3`.
pub fn format_uids(uids: &[u32]) -> String {
    uids.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::num::NonZeroU32;

    fn single(uid: u32) -> Sequence {
        Sequence::Single(SeqOrUid::Value(NonZeroU32::new(uid).unwrap()))
    }

    #[test]
    fn extracts_singles() {
        let set = SequenceSet(vec![single(3), single(7)].try_into().unwrap());
        assert_eq!(extract_uids(&set, 10), vec![3, 7]);
    }

    #[test]
    fn expands_ranges() {
        let set = SequenceSet(
            vec![Sequence::Range(
                SeqOrUid::Value(NonZeroU32::new(2).unwrap()),
                SeqOrUid::Value(NonZeroU32::new(4).unwrap()),
            )]
            .try_into()
            .unwrap(),
        );
        assert_eq!(extract_uids(&set, 10), vec![2, 3, 4]);
    }

    #[test]
    fn asterisk_resolves_to_max() {
        let set = SequenceSet(
            vec![Sequence::Range(
                SeqOrUid::Value(NonZeroU32::new(8).unwrap()),
                SeqOrUid::Asterisk,
            )]
            .try_into()
            .unwrap(),
        );
        assert_eq!(extract_uids(&set, 10), vec![8, 9, 10]);
    }

    #[test]
    fn formats_comma_separated() {
        assert_eq!(format_uids(&[1, 2, 3]), "1,2,3");
        assert_eq!(format_uids(&[]), "");
    }
}
