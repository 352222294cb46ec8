//! Real audio fixtures for integration tests.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use id3::frame::ExtendedText;
use id3::{Tag, TagLike, Version};

/// `fLaC` marker, STREAMINFO, then a final PADDING block. No audio frames.
const MINIMAL_FLAC: [u8; 50] = [
    b'f', b'L', b'a', b'C', //
    0x00, 0x00, 0x00, 0x22, // STREAMINFO, 34 bytes, more blocks follow
    0x10, 0x00, 0x10, 0x00, // min/max block size 4096
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // min/max frame size unknown
    0x0A, 0xC4, 0x42, 0xF0, // 44100 Hz, 2 channels, 16 bits
    0x00, 0x00, 0x00, 0x00, // total samples
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // md5
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x81, 0x00, 0x00, 0x04, // last block, PADDING, 4 bytes
    0x00, 0x00, 0x00, 0x00,
];

/// Some bytes that stand in for MPEG audio; ID3 does not look at them.
const FAKE_MPEG: &[u8] = &[0xFF, 0xFB, 0x90, 0x64, 0x00, 0x00, 0x00, 0x00];

pub fn mp3(dir: &Path, name: &str, frames: &[(&str, &str)]) -> PathBuf {
    fs::create_dir_all(dir).unwrap();
    let path = dir.join(name);
    fs::write(&path, FAKE_MPEG).unwrap();

    if !frames.is_empty() {
        let mut tag = Tag::new();
        for (id, value) in frames {
            tag.set_text(*id, *value);
        }
        tag.write_to_path(&path, Version::Id3v24).unwrap();
    }
    path
}

pub fn add_txxx(path: &Path, description: &str, value: &str) {
    let mut tag = Tag::read_from_path(path).unwrap();
    tag.add_frame(ExtendedText {
        description: description.to_string(),
        value: value.to_string(),
    });
    tag.write_to_path(path, Version::Id3v24).unwrap();
}

pub fn mp3_text(path: &Path, id: &str) -> Option<String> {
    let tag = Tag::read_from_path(path).ok()?;
    tag.get(id)?.content().text().map(str::to_owned)
}

/// Minimal FLAC whose Vorbis comment block holds exactly `comments`.
pub fn flac(dir: &Path, name: &str, comments: &[(&str, &str)]) -> PathBuf {
    fs::create_dir_all(dir).unwrap();
    let path = dir.join(name);
    fs::write(&path, MINIMAL_FLAC).unwrap();

    if !comments.is_empty() {
        let mut tag = metaflac::Tag::read_from_path(&path).unwrap();
        let vc = tag.vorbis_comments_mut();
        for (key, value) in comments {
            vc.comments
                .entry(key.to_string())
                .or_default()
                .push(value.to_string());
        }
        tag.save().unwrap();
    }
    path
}

/// Every stored value of `key` (any key case), exactly as on disk.
pub fn flac_values(path: &Path, key: &str) -> Vec<String> {
    let tag = metaflac::Tag::read_from_path(path).unwrap();
    let Some(vc) = tag.vorbis_comments() else {
        return Vec::new();
    };
    vc.comments
        .iter()
        .filter(|(k, _)| k.eq_ignore_ascii_case(key))
        .flat_map(|(_, values)| values.iter().cloned())
        .collect()
}

/// Whether the raw file bytes contain `needle` (e.g. `TRACKNUMBER=1/2`).
pub fn file_contains(path: &Path, needle: &str) -> bool {
    let bytes = fs::read(path).unwrap();
    bytes
        .windows(needle.len())
        .any(|window| window == needle.as_bytes())
}
