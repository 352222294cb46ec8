//! Domain models shared by both pipelines.
//!
//! - [`AudioFormat`] - closed set of supported formats
//! - [`TagValue`] - scalar or multi-valued tag payload
//! - [`FrameEntry`] - one ID3v2 frame as seen by the normalizer
//! - [`RawTags`] - what the codec hands to the normalizer
//! - [`TagRecord`] - one normalized output row
//! - [`RunStats`] / [`RunState`] / [`ProgressEvent`] - run bookkeeping

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Column name that always holds the source file path.
pub const FILE_PATH_KEY: &str = "file_path";

/// Separator used when a multi-valued tag is flattened.
pub const VALUE_SEPARATOR: &str = ", ";

// =============================================================================
// Audio Format
// =============================================================================

/// Supported audio container formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioFormat {
    Mp3,
    Flac,
}

impl AudioFormat {
    /// Infer the format from the file extension (case-insensitive).
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?;
        Self::from_extension(ext)
    }

    /// Parse a bare extension such as `"MP3"` or `"flac"`.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "mp3" => Some(Self::Mp3),
            "flac" => Some(Self::Flac),
            _ => None,
        }
    }

    /// Canonical lowercase extension.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Mp3 => "mp3",
            Self::Flac => "flac",
        }
    }
}

impl fmt::Display for AudioFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

// =============================================================================
// Tag Values
// =============================================================================

/// A tag payload as exposed by a codec view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TagValue {
    Text(String),
    List(Vec<String>),
}

impl TagValue {
    /// Collapse to the single string written to a CSV cell.
    ///
    /// Lists join with `", "`; no escaping happens here.
    pub fn flatten(&self) -> String {
        match self {
            TagValue::Text(s) => s.clone(),
            TagValue::List(items) => items.join(VALUE_SEPARATOR),
        }
    }

    /// Append a value, promoting a scalar to a list.
    pub fn push(&mut self, value: String) {
        match self {
            TagValue::Text(existing) => {
                let first = std::mem::take(existing);
                *self = TagValue::List(vec![first, value]);
            }
            TagValue::List(items) => items.push(value),
        }
    }
}

impl From<String> for TagValue {
    fn from(s: String) -> Self {
        TagValue::Text(s)
    }
}

impl From<&str> for TagValue {
    fn from(s: &str) -> Self {
        TagValue::Text(s.to_string())
    }
}

impl From<Vec<String>> for TagValue {
    fn from(items: Vec<String>) -> Self {
        TagValue::List(items)
    }
}

// =============================================================================
// Codec Views
// =============================================================================

/// Payload of one ID3v2 frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FramePayload {
    /// Frame exposes text (text, URL, comment, lyrics, user text...).
    Text(TagValue),
    /// Binary or structured frame, already rendered to a string.
    Opaque(String),
}

/// One ID3v2 frame: 4-character id plus an optional sub-identifier
/// (the description of `TXXX`, `WXXX`, `COMM`, `APIC`...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameEntry {
    pub id: String,
    pub sub_id: Option<String>,
    pub payload: FramePayload,
}

impl FrameEntry {
    pub fn text(id: impl Into<String>, value: impl Into<TagValue>) -> Self {
        Self {
            id: id.into(),
            sub_id: None,
            payload: FramePayload::Text(value.into()),
        }
    }

    pub fn with_sub_id(mut self, sub_id: impl Into<String>) -> Self {
        self.sub_id = Some(sub_id.into());
        self
    }
}

/// Everything a codec read from one file, before normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawTags {
    /// Common-field view first, then the full frame list.
    Mp3 {
        common: Vec<(String, TagValue)>,
        frames: Vec<FrameEntry>,
    },
    /// Native Vorbis comments, repeated keys already grouped.
    Flac { comments: Vec<(String, TagValue)> },
}

// =============================================================================
// Tag Record
// =============================================================================

/// One normalized output row.
///
/// `file_path` lives outside the tag map so no tag can shadow it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagRecord {
    file_path: String,
    #[serde(flatten)]
    tags: BTreeMap<String, String>,
}

impl TagRecord {
    /// Build a record, discarding any tag literally named `file_path`.
    pub fn new(file_path: impl Into<String>, mut tags: BTreeMap<String, String>) -> Self {
        tags.remove(FILE_PATH_KEY);
        Self {
            file_path: file_path.into(),
            tags,
        }
    }

    pub fn file_path(&self) -> &str {
        &self.file_path
    }

    /// Look up a column value, `file_path` included.
    pub fn get(&self, key: &str) -> Option<&str> {
        if key == FILE_PATH_KEY {
            Some(&self.file_path)
        } else {
            self.tags.get(key).map(String::as_str)
        }
    }

    /// Tag names, excluding `file_path`.
    pub fn tag_keys(&self) -> impl Iterator<Item = &str> {
        self.tags.keys().map(String::as_str)
    }

    pub fn tag_count(&self) -> usize {
        self.tags.len()
    }
}

// =============================================================================
// Run Bookkeeping
// =============================================================================

/// Run lifecycle: `Idle -> Scanning -> Processing* -> Flushing -> Done`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RunState {
    Idle,
    Scanning,
    Processing,
    Flushing,
    Done,
}

/// Counters for a whole run, reported once at the end.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunStats {
    /// Files whose tags were read and accumulated.
    pub processed: usize,
    /// Files skipped because of a read (or write) error.
    pub errors: usize,
    /// Paths reached twice through overlapping roots.
    pub duplicates: usize,
    /// Roots that did not exist.
    pub roots_skipped: usize,
    /// Chunk files fully written, in order.
    pub chunks: Vec<PathBuf>,
}

/// Progress notifications for a console reporter.
#[derive(Debug, Clone, Copy)]
pub enum ProgressEvent<'a> {
    StateChanged(RunState),
    RootSkipped { root: &'a Path },
    FileProcessed { path: &'a Path, processed: usize },
    FileFailed { path: &'a Path, errors: usize },
    ChunkWritten { path: &'a Path, index: usize, rows: usize },
    Finished { stats: &'a RunStats },
}
