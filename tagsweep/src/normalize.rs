//! Tag normalization: codec views in, one flat [`TagRecord`] out.
//!
//! ```text
//! MP3:  common view ──┐
//!       frame view ───┼──▶ key/value map ──▶ TagRecord (+ file_path last)
//! FLAC: comments ─────┘
//! ```
//!
//! Rules:
//! - a frame with a sub-identifier becomes `"{id}:{sub}"` (`TXXX:MOOD`),
//!   otherwise its raw id
//! - lists flatten with `", "`, scalars are taken as-is
//! - MP3 common entries go in first, frame entries overwrite on collision
//! - `file_path` is set last and cannot be shadowed

use std::collections::BTreeMap;
use std::path::Path;

use crate::codec::TagCodec;
use crate::error::{CodecError, ReadResult, TagReadError};
use crate::models::{AudioFormat, FrameEntry, FramePayload, RawTags, TagRecord};

/// Column name for a frame.
pub fn composite_key(id: &str, sub_id: Option<&str>) -> String {
    match sub_id {
        Some(sub) if !sub.is_empty() => format!("{id}:{sub}"),
        _ => id.to_string(),
    }
}

fn frame_value(frame: &FrameEntry) -> String {
    match &frame.payload {
        FramePayload::Text(value) => value.flatten(),
        FramePayload::Opaque(repr) => repr.clone(),
    }
}

/// Merge raw codec views into a record for `path`.
pub fn normalize(path: &Path, raw: RawTags) -> TagRecord {
    let mut tags: BTreeMap<String, String> = BTreeMap::new();

    match raw {
        RawTags::Mp3 { common, frames } => {
            for (key, value) in common {
                tags.insert(key, value.flatten());
            }
            for frame in &frames {
                let key = composite_key(&frame.id, frame.sub_id.as_deref());
                tags.insert(key, frame_value(frame));
            }
        }
        RawTags::Flac { comments } => {
            for (key, value) in comments {
                tags.insert(key, value.flatten());
            }
        }
    }

    TagRecord::new(path.to_string_lossy().into_owned(), tags)
}

/// Read and normalize one file. The format comes from the extension.
pub fn read_record<C: TagCodec + ?Sized>(codec: &C, path: &Path) -> ReadResult<TagRecord> {
    let format = AudioFormat::from_path(path).ok_or_else(|| {
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().into_owned())
            .unwrap_or_default();
        TagReadError::new(path, CodecError::UnsupportedFormat(ext))
    })?;

    let raw = codec.read(path, format)?;
    Ok(normalize(path, raw))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{TagValue, FILE_PATH_KEY};

    fn mp3(common: Vec<(&str, TagValue)>, frames: Vec<FrameEntry>) -> RawTags {
        RawTags::Mp3 {
            common: common.into_iter().map(|(k, v)| (k.to_string(), v)).collect(),
            frames,
        }
    }

    #[test]
    fn test_composite_key() {
        assert_eq!(composite_key("TXXX", Some("MOOD")), "TXXX:MOOD");
        assert_eq!(composite_key("TIT2", None), "TIT2");
        assert_eq!(composite_key("COMM", Some("")), "COMM");
    }

    #[test]
    fn test_list_value_flattened() {
        let raw = RawTags::Flac {
            comments: vec![(
                "genre".to_string(),
                TagValue::List(vec!["Rock".into(), "Pop".into()]),
            )],
        };
        let record = normalize(Path::new("/m/a.flac"), raw);
        assert_eq!(record.get("genre"), Some("Rock, Pop"));
    }

    #[test]
    fn test_mp3_merges_common_and_frames() {
        let raw = mp3(
            vec![("title", "Song".into()), ("artist", "Band".into())],
            vec![
                FrameEntry::text("TIT2", "Song"),
                FrameEntry::text("TXXX", "calm").with_sub_id("MOOD"),
                FrameEntry {
                    id: "APIC".into(),
                    sub_id: Some("cover".into()),
                    payload: FramePayload::Opaque("FrontCover image/jpeg (10 bytes)".into()),
                },
            ],
        );
        let record = normalize(Path::new("/m/a.mp3"), raw);

        assert_eq!(record.get("title"), Some("Song"));
        assert_eq!(record.get("artist"), Some("Band"));
        assert_eq!(record.get("TIT2"), Some("Song"));
        assert_eq!(record.get("TXXX:MOOD"), Some("calm"));
        assert_eq!(record.get("APIC:cover"), Some("FrontCover image/jpeg (10 bytes)"));
    }

    #[test]
    fn test_frame_wins_on_collision() {
        let raw = mp3(
            vec![("mood", "old".into())],
            vec![FrameEntry::text("mood", "new")],
        );
        let record = normalize(Path::new("/m/a.mp3"), raw);
        assert_eq!(record.get("mood"), Some("new"));
    }

    #[test]
    fn test_file_path_tag_cannot_overwrite_path() {
        let raw = mp3(
            vec![(FILE_PATH_KEY, "from-common".into())],
            vec![FrameEntry::text(FILE_PATH_KEY, "from-frame")],
        );
        let record = normalize(Path::new("/m/real.mp3"), raw);
        assert_eq!(record.get(FILE_PATH_KEY), Some("/m/real.mp3"));
        assert_eq!(record.tag_count(), 0);
    }

    #[test]
    fn test_unsupported_extension_is_read_error() {
        struct NeverCalled;
        impl TagCodec for NeverCalled {
            fn read(&self, _: &Path, _: AudioFormat) -> ReadResult<RawTags> {
                unreachable!("format check happens first")
            }
            fn write_track(&self, _: &Path, _: AudioFormat, _: &str) -> crate::error::WriteResult<()> {
                unreachable!()
            }
        }

        let err = read_record(&NeverCalled, Path::new("/m/cover.jpg")).unwrap_err();
        assert!(matches!(err.cause, CodecError::UnsupportedFormat(ref e) if e == "jpg"));
    }
}
