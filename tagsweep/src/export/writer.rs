//! Chunk files on disk.

use std::fs::{self, OpenOptions};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use crate::error::{OutputError, OutputResult};
use crate::export::{chunk_file_name, Chunk, RunTimestamp};

/// Writes chunks as `{base}_{timestamp}_{n}.csv` into one directory.
#[derive(Debug)]
pub struct ChunkWriter {
    output_dir: PathBuf,
    base_name: String,
    timestamp: RunTimestamp,
    next_index: usize,
}

impl ChunkWriter {
    /// Create the output directory (and parents) up front.
    pub fn create(
        output_dir: impl AsRef<Path>,
        base_name: impl Into<String>,
        timestamp: RunTimestamp,
    ) -> OutputResult<Self> {
        let output_dir = output_dir.as_ref().to_path_buf();
        fs::create_dir_all(&output_dir).map_err(|source| OutputError::CreateDir {
            path: output_dir.clone(),
            source,
        })?;

        Ok(Self {
            output_dir,
            base_name: base_name.into(),
            timestamp,
            next_index: 1,
        })
    }

    /// Index the next written chunk will get.
    pub fn next_index(&self) -> usize {
        self.next_index
    }

    /// Path the next chunk will be written to.
    pub fn next_path(&self) -> PathBuf {
        self.output_dir
            .join(chunk_file_name(&self.base_name, &self.timestamp, self.next_index))
    }

    /// Write one chunk. On failure the partial file is removed.
    ///
    /// Existing files are never overwritten.
    pub fn write(&mut self, chunk: &Chunk) -> OutputResult<PathBuf> {
        let path = self.next_path();

        let file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .map_err(|source| OutputError::CreateFile {
                path: path.clone(),
                source,
            })?;

        if let Err(e) = write_rows(BufWriter::new(file), chunk, &path) {
            let _ = fs::remove_file(&path);
            return Err(e);
        }

        self.next_index += 1;
        Ok(path)
    }
}

fn write_rows<W: std::io::Write>(out: W, chunk: &Chunk, path: &Path) -> OutputResult<()> {
    let write_err = |source: csv::Error| OutputError::Write {
        path: path.to_path_buf(),
        source,
    };

    let mut wtr = csv::Writer::from_writer(out);
    wtr.write_record(&chunk.header).map_err(write_err)?;

    for record in &chunk.records {
        let row = chunk
            .header
            .iter()
            .map(|key| record.get(key).unwrap_or(""));
        wtr.write_record(row).map_err(write_err)?;
    }

    wtr.flush().map_err(|source| OutputError::Flush {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TagRecord;
    use std::collections::BTreeMap;
    use tempfile::tempdir;

    fn ts() -> RunTimestamp {
        let at = chrono::NaiveDate::from_ymd_opt(2024, 1, 2)
            .unwrap()
            .and_hms_opt(3, 4, 5)
            .unwrap();
        RunTimestamp::from_datetime(at)
    }

    fn chunk(rows: &[(&str, &[(&str, &str)])]) -> Chunk {
        let records: Vec<TagRecord> = rows
            .iter()
            .map(|(path, tags)| {
                let map: BTreeMap<String, String> = tags
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect();
                TagRecord::new(*path, map)
            })
            .collect();
        Chunk {
            header: vec!["file_path".into(), "artist".into(), "title".into()],
            records,
        }
    }

    #[test]
    fn test_writes_header_and_rows_with_quoting() {
        let dir = tempdir().unwrap();
        let mut writer = ChunkWriter::create(dir.path(), "tags", ts()).unwrap();

        let path = writer
            .write(&chunk(&[
                ("/m/a.mp3", &[("title", "Hello, World"), ("ignored", "x")]),
                ("/m/b.flac", &[("artist", "Line\nBreak")]),
            ]))
            .unwrap();

        assert_eq!(path, dir.path().join("tags_20240102_030405_1.csv"));
        let mut rdr = csv::Reader::from_path(&path).unwrap();
        let header: Vec<String> = rdr.headers().unwrap().iter().map(str::to_owned).collect();
        assert_eq!(header, vec!["file_path", "artist", "title"]);

        let rows: Vec<Vec<String>> = rdr
            .records()
            .map(|r| r.unwrap().iter().map(str::to_owned).collect())
            .collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], vec!["/m/a.mp3", "", "Hello, World"]);
        assert_eq!(rows[1], vec!["/m/b.flac", "Line\nBreak", ""]);
    }

    #[test]
    fn test_index_increments_per_chunk() {
        let dir = tempdir().unwrap();
        let mut writer = ChunkWriter::create(dir.path().join("nested/out"), "tags", ts()).unwrap();

        let first = writer.write(&chunk(&[("/a", &[])])).unwrap();
        let second = writer.write(&chunk(&[("/b", &[])])).unwrap();

        assert!(first.ends_with("tags_20240102_030405_1.csv"));
        assert!(second.ends_with("tags_20240102_030405_2.csv"));
        assert_eq!(writer.next_index(), 3);
    }

    #[test]
    fn test_existing_chunk_is_not_overwritten() {
        let dir = tempdir().unwrap();
        let mut writer = ChunkWriter::create(dir.path(), "tags", ts()).unwrap();
        fs::write(writer.next_path(), "keep me").unwrap();

        let err = writer.write(&chunk(&[("/a", &[])])).unwrap_err();
        assert!(matches!(err, OutputError::CreateFile { .. }));
        assert_eq!(
            fs::read_to_string(dir.path().join("tags_20240102_030405_1.csv")).unwrap(),
            "keep me"
        );
    }

    #[test]
    fn test_output_dir_under_a_file_fails() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "").unwrap();

        let err = ChunkWriter::create(blocker.join("out"), "tags", ts()).unwrap_err();
        assert!(matches!(err, OutputError::CreateDir { .. }));
    }
}
