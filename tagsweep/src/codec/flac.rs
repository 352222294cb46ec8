//! Vorbis comment access for FLAC files, via `metaflac`.
//!
//! Comments are read and written exactly as stored: a `TRACKNUMBER` of
//! `3/12` stays one field, nothing is split into `TRACKTOTAL`.
//!
//! Keys are case-insensitive in Vorbis comments; they are reported
//! lowercased so they line up with the MP3 common view (`title`,
//! `tracknumber`, ...). Repeated keys become one multi-valued entry.

use std::collections::HashMap;
use std::path::Path;

use metaflac::block::VorbisComment;
use metaflac::Tag;

use crate::error::CodecError;
use crate::models::{RawTags, TagValue};

/// Vorbis comment field that stores "track/total".
pub const TRACK_KEY: &str = "TRACKNUMBER";

pub fn read(path: &Path) -> Result<RawTags, CodecError> {
    let tag = Tag::read_from_path(path)?;
    let comments = tag
        .vorbis_comments()
        .map(|vc| group_pairs(comment_pairs(vc)))
        .unwrap_or_default();

    Ok(RawTags::Flac { comments })
}

/// Replace every `TRACKNUMBER` entry (any key case, scalar or repeated)
/// with `track`. Other metadata blocks are written back untouched.
pub fn write_track(path: &Path, track: &str) -> Result<(), CodecError> {
    let mut tag = Tag::read_from_path(path)?;
    set_track(tag.vorbis_comments_mut(), track);
    tag.save()?;
    Ok(())
}

fn set_track(vc: &mut VorbisComment, track: &str) {
    // keys are stored with their original case
    vc.comments.retain(|key, _| !key.eq_ignore_ascii_case(TRACK_KEY));
    vc.comments.insert(TRACK_KEY.to_string(), vec![track.to_string()]);
}

/// Stored pairs, ordered by key so grouping is deterministic.
fn comment_pairs(vc: &VorbisComment) -> Vec<(&str, &str)> {
    let mut keys: Vec<&String> = vc.comments.keys().collect();
    keys.sort();
    keys.into_iter()
        .flat_map(|key| {
            vc.comments[key]
                .iter()
                .map(move |value| (key.as_str(), value.as_str()))
        })
        .collect()
}

/// Group raw `(key, value)` pairs by lowercased key, keeping first-seen order.
pub(crate) fn group_pairs<'a>(
    items: impl IntoIterator<Item = (&'a str, &'a str)>,
) -> Vec<(String, TagValue)> {
    let mut grouped: Vec<(String, TagValue)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for (key, value) in items {
        let key = key.to_ascii_lowercase();
        match index.get(&key) {
            Some(&i) => grouped[i].1.push(value.to_string()),
            None => {
                index.insert(key.clone(), grouped.len());
                grouped.push((key, TagValue::Text(value.to_string())));
            }
        }
    }

    grouped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_pairs_merges_repeated_keys() {
        let pairs = [
            ("TITLE", "Song"),
            ("GENRE", "Rock"),
            ("genre", "Pop"),
            ("ARTIST", "Someone"),
        ];
        let grouped = group_pairs(pairs);

        assert_eq!(
            grouped,
            vec![
                ("title".to_string(), TagValue::Text("Song".into())),
                ("genre".to_string(), TagValue::List(vec!["Rock".into(), "Pop".into()])),
                ("artist".to_string(), TagValue::Text("Someone".into())),
            ]
        );
    }

    #[test]
    fn test_group_pairs_empty() {
        assert!(group_pairs(std::iter::empty()).is_empty());
    }

    #[test]
    fn test_set_track_replaces_every_case_variant() {
        let mut vc = VorbisComment::new();
        vc.comments.insert("TRACKNUMBER".into(), vec!["9/12".into(), "09".into()]);
        vc.comments.insert("tracknumber".into(), vec!["9".into()]);
        vc.comments.insert("TRACKTOTAL".into(), vec!["12".into()]);

        set_track(&mut vc, "1/2");

        let tracks: Vec<_> = vc
            .comments
            .keys()
            .filter(|k| k.eq_ignore_ascii_case(TRACK_KEY))
            .collect();
        assert_eq!(tracks, vec!["TRACKNUMBER"]);
        assert_eq!(vc.comments["TRACKNUMBER"], vec!["1/2".to_string()]);
        // unrelated fields are left alone
        assert_eq!(vc.comments["TRACKTOTAL"], vec!["12".to_string()]);
    }

    #[test]
    fn test_comment_pairs_keep_slash_values_whole() {
        let mut vc = VorbisComment::new();
        vc.comments.insert("TRACKNUMBER".into(), vec!["9/12".into()]);
        vc.comments.insert("GENRE".into(), vec!["Rock".into(), "Pop".into()]);

        assert_eq!(
            group_pairs(comment_pairs(&vc)),
            vec![
                ("genre".to_string(), TagValue::List(vec!["Rock".into(), "Pop".into()])),
                ("tracknumber".to_string(), TagValue::Text("9/12".into())),
            ]
        );
    }

    #[test]
    fn test_read_rejects_non_flac_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.flac");
        std::fs::write(&path, b"definitely not a flac stream").unwrap();

        assert!(read(&path).is_err());
    }
}
