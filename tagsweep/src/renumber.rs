//! Album track renumbering.
//!
//! Every audio file directly inside an album directory gets `i/N` as its
//! track number, where files are ordered by file name and `N` counts both
//! formats together. Planning is pure; applying writes one file at a time
//! and keeps going past per-file failures.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::codec::TagCodec;
use crate::config::RenumberOptions;
use crate::error::{RenumberError, ScanError, TagWriteError};
use crate::logs::{log_error_indent, log_info, log_info_indent, log_success, log_warning};
use crate::models::AudioFormat;
use crate::scanner::{list_album_dirs, list_album_tracks};

/// `"{position}/{total}"` for the zero-based `index`.
pub fn track_label(index: usize, total: usize) -> String {
    format!("{}/{}", index + 1, total)
}

/// Track number one file is going to get.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrackAssignment {
    pub path: PathBuf,
    pub format: AudioFormat,
    pub track: String,
}

/// Full set of assignments for one album, in file-name order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AlbumPlan {
    pub album: PathBuf,
    pub assignments: Vec<TrackAssignment>,
}

impl AlbumPlan {
    pub fn total(&self) -> usize {
        self.assignments.len()
    }
}

/// What happened when a plan was applied.
#[derive(Debug, Default)]
pub struct AlbumReport {
    pub updated: usize,
    pub failures: Vec<TagWriteError>,
}

/// Totals over a root of album directories.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RenumberSummary {
    pub albums: usize,
    pub empty_albums: usize,
    pub skipped_albums: usize,
    pub updated: usize,
    pub errors: usize,
}

/// List the album's tracks and assign `1/N..N/N` by file name.
pub fn plan_album(dir: &Path) -> Result<AlbumPlan, RenumberError> {
    let tracks = list_album_tracks(dir)?;
    if tracks.is_empty() {
        return Err(RenumberError::EmptyAlbum(dir.to_path_buf()));
    }

    let total = tracks.len();
    let assignments = tracks
        .into_iter()
        .enumerate()
        .filter_map(|(i, path)| {
            // listing only yields supported extensions
            let format = AudioFormat::from_path(&path)?;
            Some(TrackAssignment {
                path,
                format,
                track: track_label(i, total),
            })
        })
        .collect();

    Ok(AlbumPlan {
        album: dir.to_path_buf(),
        assignments,
    })
}

/// Write every assignment; failures are logged and collected.
pub fn apply_plan<C: TagCodec + ?Sized>(codec: &C, plan: &AlbumPlan) -> AlbumReport {
    let mut report = AlbumReport::default();

    for assignment in &plan.assignments {
        match codec.write_track(&assignment.path, assignment.format, &assignment.track) {
            Ok(()) => {
                report.updated += 1;
                log_info_indent(
                    format!("{} -> {}", file_name(&assignment.path), assignment.track),
                    1,
                );
            }
            Err(e) => {
                log_error_indent(e.to_string(), 1);
                report.failures.push(e);
            }
        }
    }

    report
}

/// Plan and (unless `dry_run`) apply one album.
pub fn renumber_album<C: TagCodec + ?Sized>(
    codec: &C,
    dir: &Path,
    options: &RenumberOptions,
) -> Result<AlbumReport, RenumberError> {
    let plan = plan_album(dir)?;
    log_info(format!(
        "Renumbering {} ({} track(s))",
        dir.display(),
        plan.total()
    ));

    if options.dry_run {
        for a in &plan.assignments {
            log_info_indent(format!("{} -> {} (dry run)", file_name(&a.path), a.track), 1);
        }
        return Ok(AlbumReport::default());
    }

    let report = apply_plan(codec, &plan);
    if report.failures.is_empty() {
        log_success(format!("{} track(s) updated", report.updated));
    } else {
        log_warning(format!(
            "{} track(s) updated, {} failed",
            report.updated,
            report.failures.len()
        ));
    }
    Ok(report)
}

/// Treat every immediate subdirectory of `root` as an album.
///
/// Only a missing or unreadable `root` is an error; album-level problems
/// are counted in the summary.
pub fn renumber_root<C: TagCodec + ?Sized>(
    codec: &C,
    root: &Path,
    options: &RenumberOptions,
) -> Result<RenumberSummary, ScanError> {
    let mut summary = RenumberSummary::default();

    for album in list_album_dirs(root)? {
        match renumber_album(codec, &album, options) {
            Ok(report) => {
                summary.albums += 1;
                summary.updated += report.updated;
                summary.errors += report.failures.len();
            }
            Err(RenumberError::EmptyAlbum(dir)) => {
                summary.empty_albums += 1;
                log_info(format!("No audio files in {}, nothing to do", dir.display()));
            }
            Err(RenumberError::Scan(e)) => {
                summary.skipped_albums += 1;
                log_warning(format!("{e}, skipping album"));
            }
        }
    }

    Ok(summary)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
