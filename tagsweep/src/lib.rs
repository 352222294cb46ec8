//! # Tagsweep - batch tag maintenance for MP3 and FLAC libraries
//!
//! Two jobs over a music library on disk:
//!
//! - **Renumber**: give every track of an album `i/N` as its track number,
//!   ordered by file name across both formats.
//! - **Extract**: read every tag of every file into flat records and write
//!   them to chunked CSV files (`{base}_{YYYYMMDD_HHMMSS}_{n}.csv`).
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌──────────────┐     ┌─────────────┐     ┌─────────────┐
//! │   Scanner   │────▶│    Codec     │────▶│  Normalize  │────▶│ Chunked CSV │
//! │  (walkdir)  │     │(id3/metaflac)│     │ (flat rows) │     │  (export)   │
//! └─────────────┘     └──────────────┘     └─────────────┘     └─────────────┘
//!        │                   ▲
//!        └──── Renumber ─────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use tagsweep::{extract_tags, renumber_album, ExtractOptions, FileCodec, RenumberOptions};
//!
//! renumber_album(&FileCodec, "music/Album1".as_ref(), &RenumberOptions::default())?;
//!
//! let stats = extract_tags(&ExtractOptions {
//!     roots: vec!["music".into()],
//!     ..Default::default()
//! })?;
//! println!("{} files, {} errors", stats.processed, stats.errors);
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Error types per stage
//! - [`models`] - Formats, raw tag views, records, run statistics
//! - [`config`] - Defaults and run options
//! - [`codec`] - ID3v2 and Vorbis comment adapters
//! - [`normalize`] - Raw tags to flat records
//! - [`scanner`] - Directory traversal
//! - [`export`] - Record buffering and CSV chunk files
//! - [`pipeline`] - Extraction run
//! - [`renumber`] - Album renumbering
//! - [`logs`] - Log broadcasting

// Core modules
pub mod config;
pub mod error;
pub mod models;

// Tag I/O
pub mod codec;
pub mod normalize;
pub mod scanner;

// Jobs
pub mod export;
pub mod pipeline;
pub mod renumber;

// Logging
pub mod logs;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{
    CodecError,
    ConfigError,
    ExtractError,
    OutputError,
    RenumberError,
    ScanError,
    TagReadError,
    TagWriteError,
};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{
    AudioFormat,
    FrameEntry,
    FramePayload,
    ProgressEvent,
    RawTags,
    RunState,
    RunStats,
    TagRecord,
    TagValue,
};

// =============================================================================
// Re-exports - Configuration
// =============================================================================

pub use config::{ExtractOptions, KeyScope, RenumberOptions};

// =============================================================================
// Re-exports - Codec
// =============================================================================

pub use codec::{FileCodec, TagCodec};
pub use normalize::{normalize, read_record};

// =============================================================================
// Re-exports - Extraction
// =============================================================================

pub use export::{Accumulator, Chunk, ChunkWriter, RunTimestamp};
pub use pipeline::{extract_tags, extract_tags_with};

// =============================================================================
// Re-exports - Renumbering
// =============================================================================

pub use renumber::{
    apply_plan,
    plan_album,
    renumber_album,
    renumber_root,
    track_label,
    AlbumPlan,
    AlbumReport,
    RenumberSummary,
    TrackAssignment,
};
