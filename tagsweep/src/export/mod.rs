//! Chunked CSV export.
//!
//! - [`Accumulator`] buffers records and tracks the header key set
//! - [`ChunkWriter`] turns a full buffer into `{base}_{timestamp}_{n}.csv`
//! - [`RunTimestamp`] is captured once per run and shared by every chunk

pub mod accumulator;
pub mod writer;

use std::fmt;

use chrono::{Local, NaiveDateTime};

use crate::config::TIMESTAMP_FORMAT;

pub use accumulator::{Accumulator, Chunk};
pub use writer::ChunkWriter;

/// `YYYYMMDD_HHMMSS` string fixed at run start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunTimestamp(String);

impl RunTimestamp {
    pub fn now() -> Self {
        Self(Local::now().format(TIMESTAMP_FORMAT).to_string())
    }

    pub fn from_datetime(at: NaiveDateTime) -> Self {
        Self(at.format(TIMESTAMP_FORMAT).to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RunTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// File name for the `index`-th chunk (1-based).
pub fn chunk_file_name(base_name: &str, timestamp: &RunTimestamp, index: usize) -> String {
    format!("{base_name}_{timestamp}_{index}.csv")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_timestamp_format() {
        let at = NaiveDate::from_ymd_opt(2024, 3, 9)
            .unwrap()
            .and_hms_opt(7, 5, 1)
            .unwrap();
        assert_eq!(RunTimestamp::from_datetime(at).as_str(), "20240309_070501");
    }

    #[test]
    fn test_chunk_file_name() {
        let ts = RunTimestamp("20240309_070501".into());
        assert_eq!(
            chunk_file_name("current_tags", &ts, 1),
            "current_tags_20240309_070501_1.csv"
        );
    }

    #[test]
    fn test_now_has_expected_shape() {
        let ts = RunTimestamp::now();
        assert_eq!(ts.as_str().len(), 15);
        assert_eq!(ts.as_str().as_bytes()[8], b'_');
    }
}
