//! Error types for the tagsweep pipelines.
//!
//! Errors are split by the stage that raises them:
//!
//! - [`CodecError`] - what the tag codec reported for a single file
//! - [`TagReadError`] / [`TagWriteError`] - per-file failures (recoverable)
//! - [`ScanError`] - missing or unreadable directories (warning)
//! - [`RenumberError`] - album-level renumbering outcomes
//! - [`OutputError`] - chunk output failures (fatal)
//! - [`ConfigError`] - invalid options
//! - [`ExtractError`] - top-level extraction run errors
//!
//! Per-file errors are caught at the file boundary and counted. Only
//! [`ExtractError`] ever aborts a run.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::models::RunStats;

// =============================================================================
// Codec Errors
// =============================================================================

/// Failure reported by the underlying tag codec.
#[derive(Debug, Error)]
pub enum CodecError {
    /// Extension is neither mp3 nor flac.
    #[error("unsupported audio format: {0}")]
    UnsupportedFormat(String),

    /// The file carries no tag header at all.
    #[error("no tag header found")]
    NoTag,

    /// ID3v2 parse or write failure.
    #[error("id3: {0}")]
    Id3(#[from] id3::Error),

    /// FLAC metadata block failure.
    #[error("flac: {0}")]
    Flac(#[from] metaflac::Error),

    /// Raw I/O failure while opening the file.
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    /// Anything else the codec could not make sense of.
    #[error("malformed metadata: {0}")]
    Malformed(String),
}

// =============================================================================
// Per-file Errors
// =============================================================================

/// Tags of a single file could not be read. Recoverable.
#[derive(Debug, Error)]
#[error("Failed to read tags from {}: {cause}", path.display())]
pub struct TagReadError {
    pub path: PathBuf,
    #[source]
    pub cause: CodecError,
}

impl TagReadError {
    pub fn new(path: impl AsRef<Path>, cause: impl Into<CodecError>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            cause: cause.into(),
        }
    }
}

/// Track number of a single file could not be written. Recoverable.
#[derive(Debug, Error)]
#[error("Failed to write tags to {}: {cause}", path.display())]
pub struct TagWriteError {
    pub path: PathBuf,
    #[source]
    pub cause: CodecError,
}

impl TagWriteError {
    pub fn new(path: impl AsRef<Path>, cause: impl Into<CodecError>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            cause: cause.into(),
        }
    }
}

// =============================================================================
// Directory Errors
// =============================================================================

/// Errors while listing or walking directories.
#[derive(Debug, Error)]
pub enum ScanError {
    /// Root or album directory does not exist.
    #[error("Directory not found: {}", .0.display())]
    DirectoryNotFound(PathBuf),

    /// Path exists but is not a directory.
    #[error("Not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    /// Directory listing failed.
    #[error("Cannot list {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Album-level renumbering outcomes that stop one album but not the run.
#[derive(Debug, Error)]
pub enum RenumberError {
    /// Album directory missing or unreadable.
    #[error(transparent)]
    Scan(#[from] ScanError),

    /// No audio files in the album directory. Informational.
    #[error("No audio files found in {}", .0.display())]
    EmptyAlbum(PathBuf),
}

// =============================================================================
// Output Errors
// =============================================================================

/// Chunk output failures. Always fatal to an extraction run.
#[derive(Debug, Error)]
pub enum OutputError {
    /// Output directory could not be created.
    #[error("Cannot create output directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Chunk file could not be created (exists already, permissions...).
    #[error("Cannot create chunk {}: {source}", path.display())]
    CreateFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A row could not be serialized into the chunk file.
    #[error("Cannot write chunk {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// Chunk file could not be flushed to disk.
    #[error("Cannot flush chunk {}: {source}", path.display())]
    Flush {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

// =============================================================================
// Configuration Errors
// =============================================================================

/// Invalid run options.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Chunk threshold must be at least one record.
    #[error("Chunk size must be greater than zero")]
    InvalidChunkSize,

    /// Environment override could not be parsed.
    #[error("Invalid value for {var}: {value:?}")]
    InvalidEnv { var: String, value: String },

    /// Base name would produce an unusable file name.
    #[error("Invalid base name: {0:?}")]
    InvalidBaseName(String),
}

// =============================================================================
// Extraction Errors (top-level)
// =============================================================================

/// Top-level extraction run errors.
///
/// This is the error type returned by [`crate::pipeline::extract_tags`].
/// An output failure carries the statistics gathered up to that point,
/// including every chunk that was completely written before the failure.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// Options rejected before the run started.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Output stage failed; the run was aborted.
    #[error("Output error after {} chunk(s): {source}", stats.chunks.len())]
    Output {
        #[source]
        source: OutputError,
        stats: RunStats,
    },
}

impl ExtractError {
    /// Statistics gathered before the run stopped, if it got that far.
    pub fn partial_stats(&self) -> Option<&RunStats> {
        match self {
            ExtractError::Output { stats, .. } => Some(stats),
            ExtractError::Config(_) => None,
        }
    }
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for per-file tag reads.
pub type ReadResult<T> = Result<T, TagReadError>;

/// Result type for per-file tag writes.
pub type WriteResult<T> = Result<T, TagWriteError>;

/// Result type for directory operations.
pub type ScanResult<T> = Result<T, ScanError>;

/// Result type for chunk output.
pub type OutputResult<T> = Result<T, OutputError>;

/// Result type for extraction runs.
pub type ExtractResult<T> = Result<T, ExtractError>;
