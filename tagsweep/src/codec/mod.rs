//! Tag codec adapters.
//!
//! [`TagCodec`] is the seam between the pipelines and the on-disk tag
//! formats. [`FileCodec`] is the real implementation and dispatches on
//! [`AudioFormat`]:
//!
//! - MP3: ID3v2 via the `id3` crate ([`mp3`])
//! - FLAC: Vorbis comments via `metaflac` ([`flac`])

pub mod flac;
pub mod mp3;

use std::path::Path;

use crate::error::{ReadResult, TagReadError, TagWriteError, WriteResult};
use crate::models::{AudioFormat, RawTags};

/// Reads raw tag views and writes track numbers.
pub trait TagCodec {
    /// Read every tag the format exposes, without normalizing.
    fn read(&self, path: &Path, format: AudioFormat) -> ReadResult<RawTags>;

    /// Replace the track-number tag with `track` (e.g. `"2/9"`), creating
    /// a tag header when the file has none.
    fn write_track(&self, path: &Path, format: AudioFormat, track: &str) -> WriteResult<()>;
}

/// Codec backed by the files on disk.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileCodec;

impl TagCodec for FileCodec {
    fn read(&self, path: &Path, format: AudioFormat) -> ReadResult<RawTags> {
        let raw = match format {
            AudioFormat::Mp3 => mp3::read(path),
            AudioFormat::Flac => flac::read(path),
        };
        raw.map_err(|cause| TagReadError::new(path, cause))
    }

    fn write_track(&self, path: &Path, format: AudioFormat, track: &str) -> WriteResult<()> {
        let written = match format {
            AudioFormat::Mp3 => mp3::write_track(path, track),
            AudioFormat::Flac => flac::write_track(path, track),
        };
        written.map_err(|cause| TagWriteError::new(path, cause))
    }
}
