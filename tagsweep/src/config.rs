//! Run configuration.
//!
//! Defaults live here as constants. Options can be overridden from the
//! environment (a `.env` file is loaded by the binary) and then from CLI
//! flags.

use std::env;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Records per output chunk.
pub const DEFAULT_CHUNK_SIZE: usize = 100_000;

/// Base name of chunk files.
pub const DEFAULT_BASE_NAME: &str = "current_tags";

/// Directory chunk files are written to.
pub const DEFAULT_OUTPUT_DIR: &str = ".";

/// Extensions recognized as audio, lowercase.
pub const AUDIO_EXTENSIONS: &[&str] = &["mp3", "flac"];

/// Run timestamp format embedded in chunk names.
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

pub const ENV_OUTPUT_DIR: &str = "TAGSWEEP_OUTPUT_DIR";
pub const ENV_BASE_NAME: &str = "TAGSWEEP_BASE_NAME";
pub const ENV_CHUNK_SIZE: &str = "TAGSWEEP_CHUNK_SIZE";

/// Which keys make up a chunk's CSV header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum KeyScope {
    /// Header reflects only the records of that chunk.
    #[default]
    PerChunk,
    /// Keys seen in earlier chunks stay in later headers.
    Carried,
}

/// Options for the tag extraction pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractOptions {
    /// Root directories to walk, in order
    pub roots: Vec<PathBuf>,

    /// Where chunk files go
    pub output_dir: PathBuf,

    /// Chunk file prefix
    pub base_name: String,

    /// Flush threshold in records
    pub chunk_size: usize,

    /// Header key policy
    pub key_scope: KeyScope,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            roots: Vec::new(),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            base_name: DEFAULT_BASE_NAME.to_string(),
            chunk_size: DEFAULT_CHUNK_SIZE,
            key_scope: KeyScope::default(),
        }
    }
}

impl ExtractOptions {
    /// Defaults with `TAGSWEEP_*` environment overrides applied.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut options = Self::default();

        if let Ok(dir) = env::var(ENV_OUTPUT_DIR) {
            options.output_dir = PathBuf::from(dir);
        }
        if let Ok(base) = env::var(ENV_BASE_NAME) {
            options.base_name = base;
        }
        if let Ok(raw) = env::var(ENV_CHUNK_SIZE) {
            options.chunk_size = raw.trim().parse().map_err(|_| ConfigError::InvalidEnv {
                var: ENV_CHUNK_SIZE.to_string(),
                value: raw.clone(),
            })?;
        }

        Ok(options)
    }

    /// Reject options that could never produce a valid run.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.chunk_size == 0 {
            return Err(ConfigError::InvalidChunkSize);
        }
        let base = self.base_name.trim();
        if base.is_empty() || base.contains(['/', '\\']) {
            return Err(ConfigError::InvalidBaseName(self.base_name.clone()));
        }
        Ok(())
    }
}

/// Options for the track renumbering pipeline
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RenumberOptions {
    /// Compute and report the plan without touching any file
    pub dry_run: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let opts = ExtractOptions::default();
        assert_eq!(opts.chunk_size, 100_000);
        assert_eq!(opts.base_name, "current_tags");
        assert_eq!(opts.key_scope, KeyScope::PerChunk);
        assert!(opts.validate().is_ok());
    }

    #[test]
    fn test_zero_chunk_size_rejected() {
        let opts = ExtractOptions { chunk_size: 0, ..Default::default() };
        assert!(matches!(opts.validate(), Err(ConfigError::InvalidChunkSize)));
    }

    #[test]
    fn test_base_name_with_separator_rejected() {
        let opts = ExtractOptions { base_name: "../tags".into(), ..Default::default() };
        assert!(matches!(opts.validate(), Err(ConfigError::InvalidBaseName(_))));
    }

    #[test]
    fn test_key_scope_serde_names() {
        let json = serde_json::to_string(&KeyScope::Carried).unwrap();
        assert_eq!(json, "\"carried\"");
    }
}
