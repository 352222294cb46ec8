//! ID3v2 access for MP3 files.
//!
//! Produces two views of one tag:
//! - the common view: a fixed set of friendly field names mapped onto
//!   their text frames (`title` -> `TIT2`, `tracknumber` -> `TRCK`, ...)
//! - the frame view: every frame in the tag, with its sub-identifier
//!   (description / owner) split out

use std::path::Path;

use id3::frame::Content;
use id3::{ErrorKind, Frame, Tag, TagLike, Version};

use crate::error::CodecError;
use crate::logs::log_info_indent;
use crate::models::{FrameEntry, FramePayload, RawTags, TagValue};

/// Frame that stores "track/total".
pub const TRACK_FRAME: &str = "TRCK";

/// Common field name -> candidate frames, first present wins.
const COMMON_FIELDS: &[(&str, &[&str])] = &[
    ("album", &["TALB"]),
    ("albumartist", &["TPE2"]),
    ("albumartistsort", &["TSO2"]),
    ("albumsort", &["TSOA"]),
    ("arranger", &["TPE4"]),
    ("artist", &["TPE1"]),
    ("artistsort", &["TSOP"]),
    ("bpm", &["TBPM"]),
    ("compilation", &["TCMP"]),
    ("composer", &["TCOM"]),
    ("composersort", &["TSOC"]),
    ("conductor", &["TPE3"]),
    ("copyright", &["TCOP"]),
    ("date", &["TDRC", "TYER"]),
    ("discnumber", &["TPOS"]),
    ("discsubtitle", &["TSST"]),
    ("encodedby", &["TENC"]),
    ("genre", &["TCON"]),
    ("grouping", &["TIT1"]),
    ("isrc", &["TSRC"]),
    ("language", &["TLAN"]),
    ("length", &["TLEN"]),
    ("lyricist", &["TEXT"]),
    ("media", &["TMED"]),
    ("mood", &["TMOO"]),
    ("organization", &["TPUB"]),
    ("originaldate", &["TDOR", "TORY"]),
    ("title", &["TIT2"]),
    ("titlesort", &["TSOT"]),
    ("tracknumber", &[TRACK_FRAME]),
    ("version", &["TIT3"]),
];

pub fn read(path: &Path) -> Result<RawTags, CodecError> {
    let tag = Tag::read_from_path(path).map_err(|e| match e.kind {
        ErrorKind::NoTag => CodecError::NoTag,
        _ => CodecError::Id3(e),
    })?;

    Ok(RawTags::Mp3 {
        common: common_view(&tag),
        frames: tag.frames().map(frame_entry).collect(),
    })
}

/// Set `TRCK`, creating an ID3v2.4 tag when the file has none.
pub fn write_track(path: &Path, track: &str) -> Result<(), CodecError> {
    let mut tag = match Tag::read_from_path(path) {
        Ok(tag) => tag,
        Err(e) if matches!(e.kind, ErrorKind::NoTag) => {
            log_info_indent(format!("No ID3 header in {}, creating one", path.display()), 1);
            Tag::new()
        }
        Err(e) => return Err(e.into()),
    };

    tag.set_text(TRACK_FRAME, track);
    tag.write_to_path(path, Version::Id3v24)?;
    Ok(())
}

fn common_view(tag: &Tag) -> Vec<(String, TagValue)> {
    COMMON_FIELDS
        .iter()
        .filter_map(|(name, ids)| {
            ids.iter()
                .find_map(|id| tag.get(id).and_then(|f| frame_text(f.content())))
                .map(|value| (name.to_string(), value))
        })
        .collect()
}

fn frame_text(content: &Content) -> Option<TagValue> {
    match content {
        Content::Text(s) => Some(split_multi(s)),
        Content::Link(s) => Some(TagValue::Text(s.clone())),
        _ => None,
    }
}

/// ID3v2.4 separates multiple values of a text frame with NUL.
fn split_multi(raw: &str) -> TagValue {
    let mut parts: Vec<String> = raw
        .split('\0')
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
        .collect();

    match parts.len() {
        0 => TagValue::Text(String::new()),
        1 => TagValue::Text(parts.remove(0)),
        _ => TagValue::List(parts),
    }
}

/// `COMM` and `USLT` may repeat per language, so the language is part of
/// the key: `"{description}:{lang}"` (`COMM::eng` for an empty description).
fn lang_sub_id(description: &str, lang: &str) -> String {
    format!("{description}:{lang}")
}

fn frame_entry(frame: &Frame) -> FrameEntry {
    let (sub_id, payload) = match frame.content() {
        Content::Text(s) => (None, FramePayload::Text(split_multi(s))),
        Content::Link(s) => (None, FramePayload::Text(TagValue::Text(s.clone()))),
        Content::ExtendedText(et) => (
            Some(et.description.clone()),
            FramePayload::Text(split_multi(&et.value)),
        ),
        Content::ExtendedLink(el) => (
            Some(el.description.clone()),
            FramePayload::Text(TagValue::Text(el.link.clone())),
        ),
        Content::Comment(c) => (
            Some(lang_sub_id(&c.description, &c.lang)),
            FramePayload::Text(TagValue::Text(c.text.clone())),
        ),
        Content::Lyrics(l) => (
            Some(lang_sub_id(&l.description, &l.lang)),
            FramePayload::Text(TagValue::Text(l.text.clone())),
        ),
        Content::Popularimeter(p) => (
            Some(p.user.clone()),
            FramePayload::Opaque(format!("rating={} count={}", p.rating, p.counter)),
        ),
        Content::Picture(p) => (
            Some(p.description.clone()),
            FramePayload::Opaque(format!(
                "{:?} {} ({} bytes)",
                p.picture_type,
                p.mime_type,
                p.data.len()
            )),
        ),
        Content::Unknown(u) => (None, FramePayload::Opaque(format!("<{} bytes>", u.data.len()))),
        other => (None, FramePayload::Opaque(format!("{other:?}"))),
    };

    FrameEntry {
        id: frame.id().to_string(),
        sub_id,
        payload,
    }
}
