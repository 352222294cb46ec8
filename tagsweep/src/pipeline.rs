//! Tag extraction pipeline.
//!
//! ```text
//! roots ─▶ walk ─▶ read + normalize ─▶ Accumulator ─▶ ChunkWriter ─▶ *.csv
//!            │            │
//!            │            └─ TagReadError: count, log, next file
//!            └─ missing root: warn, next root
//! ```
//!
//! One file at a time, on the calling thread. Per-file failures never stop
//! the run; output failures always do.
//!
//! With more than one root, a file reached through two roots is read once.
//! That check canonicalizes every path and keeps one entry per file for the
//! whole run, so a single-root run skips it.
//!
//! # Example
//!
//! ```rust,ignore
//! use tagsweep::{extract_tags, ExtractOptions};
//!
//! let options = ExtractOptions {
//!     roots: vec!["/music".into()],
//!     output_dir: "exports".into(),
//!     ..Default::default()
//! };
//! let stats = extract_tags(&options)?;
//! println!("{} files in {} chunk(s)", stats.processed, stats.chunks.len());
//! ```

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::codec::{FileCodec, TagCodec};
use crate::config::ExtractOptions;
use crate::error::{ExtractError, ExtractResult, OutputError};
use crate::export::{Accumulator, ChunkWriter, RunTimestamp};
use crate::logs::{log_error, log_error_indent, log_info, log_success, log_warning};
use crate::models::{ProgressEvent, RunState, RunStats};
use crate::normalize::read_record;
use crate::scanner::walk_audio_files;

/// Run the extractor against the real files with a fresh timestamp.
pub fn extract_tags(options: &ExtractOptions) -> ExtractResult<RunStats> {
    extract_tags_with(&FileCodec, options, RunTimestamp::now(), |_| {})
}

/// Run the extractor with an explicit codec, timestamp and progress observer.
pub fn extract_tags_with<C, F>(
    codec: &C,
    options: &ExtractOptions,
    timestamp: RunTimestamp,
    observer: F,
) -> ExtractResult<RunStats>
where
    C: TagCodec + ?Sized,
    F: FnMut(ProgressEvent<'_>),
{
    options.validate()?;

    let mut run = Run::new(observer);
    run.transition(RunState::Scanning);

    log_info(format!("Writing chunks to {}", options.output_dir.display()));
    let mut writer = ChunkWriter::create(&options.output_dir, &options.base_name, timestamp)
        .map_err(|source| run.fail(source))?;
    let mut acc = Accumulator::new(options.chunk_size, options.key_scope);
    // only overlapping roots can yield the same file twice
    let mut seen: Option<HashSet<PathBuf>> = (options.roots.len() > 1).then(HashSet::new);

    for root in &options.roots {
        let files = match walk_audio_files(root) {
            Ok(files) => files,
            Err(e) => {
                log_warning(format!("{e}, skipping root"));
                run.stats.roots_skipped += 1;
                (run.observer)(ProgressEvent::RootSkipped { root });
                continue;
            }
        };

        log_info(format!("Scanning {}", root.display()));
        for path in files {
            run.transition(RunState::Processing);

            if seen.as_mut().is_some_and(|seen| !seen.insert(identity(&path))) {
                run.stats.duplicates += 1;
                log_warning(format!("Already processed {}, skipping", path.display()));
                continue;
            }

            match read_record(codec, &path) {
                Ok(record) => {
                    run.stats.processed += 1;
                    (run.observer)(ProgressEvent::FileProcessed {
                        path: &path,
                        processed: run.stats.processed,
                    });
                    if acc.push(record) {
                        run.flush(&mut acc, &mut writer)?;
                        run.transition(RunState::Scanning);
                    }
                }
                Err(e) => {
                    run.stats.errors += 1;
                    log_error_indent(e.to_string(), 1);
                    (run.observer)(ProgressEvent::FileFailed {
                        path: &path,
                        errors: run.stats.errors,
                    });
                }
            }
        }
    }

    run.flush(&mut acc, &mut writer)?;
    run.transition(RunState::Done);

    log_success(format!(
        "Processed {} file(s), {} error(s), {} chunk(s)",
        run.stats.processed,
        run.stats.errors,
        run.stats.chunks.len()
    ));
    (run.observer)(ProgressEvent::Finished { stats: &run.stats });

    Ok(run.stats)
}

/// Key used to spot the same file reached through overlapping roots.
fn identity(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

/// Mutable run bookkeeping: counters, lifecycle state, observer.
struct Run<F> {
    stats: RunStats,
    state: RunState,
    observer: F,
}

impl<F: FnMut(ProgressEvent<'_>)> Run<F> {
    fn new(observer: F) -> Self {
        Self {
            stats: RunStats::default(),
            state: RunState::Idle,
            observer,
        }
    }

    fn transition(&mut self, next: RunState) {
        if self.state != next {
            tracing::debug!(from = ?self.state, to = ?next, "run state");
            self.state = next;
            (self.observer)(ProgressEvent::StateChanged(next));
        }
    }

    fn fail(&self, source: OutputError) -> ExtractError {
        log_error(format!(
            "{source}; aborting after {} chunk(s)",
            self.stats.chunks.len()
        ));
        ExtractError::Output {
            source,
            stats: self.stats.clone(),
        }
    }

    /// Write whatever is buffered; a no-op for an empty buffer.
    fn flush(&mut self, acc: &mut Accumulator, writer: &mut ChunkWriter) -> ExtractResult<()> {
        let Some(chunk) = acc.take_chunk() else {
            return Ok(());
        };

        self.transition(RunState::Flushing);
        let index = writer.next_index();
        let path = writer.write(&chunk).map_err(|source| self.fail(source))?;

        log_success(format!("Wrote {} record(s) to {}", chunk.len(), path.display()));
        self.stats.chunks.push(path);
        if let Some(path) = self.stats.chunks.last() {
            (self.observer)(ProgressEvent::ChunkWritten {
                path,
                index,
                rows: chunk.len(),
            });
        }
        Ok(())
    }
}
