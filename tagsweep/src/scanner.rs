//! Directory traversal.
//!
//! All listings are sorted by file name so runs over the same tree visit
//! files in the same order.

use std::path::{Path, PathBuf};

use walkdir::{DirEntry, WalkDir};

use crate::error::{ScanError, ScanResult};
use crate::logs::log_warning;
use crate::models::AudioFormat;

fn ensure_dir(path: &Path) -> ScanResult<()> {
    if !path.exists() {
        return Err(ScanError::DirectoryNotFound(path.to_path_buf()));
    }
    if !path.is_dir() {
        return Err(ScanError::NotADirectory(path.to_path_buf()));
    }
    Ok(())
}

fn is_audio_file(entry: &DirEntry) -> bool {
    // `Path::is_file` follows symlinks, so linked tracks are kept
    entry.path().is_file() && AudioFormat::from_path(entry.path()).is_some()
}

/// Lazily walk `root` recursively, yielding audio files.
///
/// Entries that cannot be read mid-walk are logged and skipped.
pub fn walk_audio_files(root: &Path) -> ScanResult<impl Iterator<Item = PathBuf>> {
    ensure_dir(root)?;

    let walker = WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                log_warning(format!("Skipping unreadable entry: {e}"));
                None
            }
        })
        .filter(is_audio_file)
        .map(DirEntry::into_path);

    Ok(walker)
}

/// Immediate audio files of an album directory, sorted by file name.
pub fn list_album_tracks(dir: &Path) -> ScanResult<Vec<PathBuf>> {
    ensure_dir(dir)?;

    let mut tracks = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1).sort_by_file_name() {
        let entry = entry.map_err(|e| walk_error(dir, e))?;
        if is_audio_file(&entry) {
            tracks.push(entry.into_path());
        }
    }
    Ok(tracks)
}

/// Immediate subdirectories of `root`, sorted by name. Each is an album.
pub fn list_album_dirs(root: &Path) -> ScanResult<Vec<PathBuf>> {
    ensure_dir(root)?;

    let mut albums = Vec::new();
    for entry in WalkDir::new(root).min_depth(1).max_depth(1).sort_by_file_name() {
        let entry = entry.map_err(|e| walk_error(root, e))?;
        if entry.path().is_dir() {
            albums.push(entry.into_path());
        }
    }
    Ok(albums)
}

fn walk_error(dir: &Path, err: walkdir::Error) -> ScanError {
    let path = err.path().map(Path::to_path_buf).unwrap_or_else(|| dir.to_path_buf());
    let source = err
        .into_io_error()
        .unwrap_or_else(|| std::io::Error::other("filesystem loop"));
    ScanError::Io { path, source }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn touch(path: &Path) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, b"").unwrap();
    }

    #[test]
    fn test_album_tracks_sorted_and_filtered() {
        let dir = tempdir().unwrap();
        for name in ["b.mp3", "a.flac", "c.MP3", "cover.jpg", "notes.txt"] {
            touch(&dir.path().join(name));
        }
        fs::create_dir(dir.path().join("sub.mp3")).unwrap();

        let tracks = list_album_tracks(dir.path()).unwrap();
        let names: Vec<_> = tracks
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.flac", "b.mp3", "c.MP3"]);
    }

    #[test]
    fn test_album_tracks_not_recursive() {
        let dir = tempdir().unwrap();
        touch(&dir.path().join("a.mp3"));
        touch(&dir.path().join("disc2/b.mp3"));

        assert_eq!(list_album_tracks(dir.path()).unwrap().len(), 1);
    }

    #[test]
    fn test_walk_is_recursive_and_ordered() {
        let dir = tempdir().unwrap();
        touch(&dir.path().join("z/1.mp3"));
        touch(&dir.path().join("a/2.flac"));
        touch(&dir.path().join("a/skip.m4a"));
        touch(&dir.path().join("top.mp3"));

        let found: Vec<_> = walk_audio_files(dir.path())
            .unwrap()
            .map(|p| p.strip_prefix(dir.path()).unwrap().to_path_buf())
            .collect();
        assert_eq!(
            found,
            vec![
                PathBuf::from("a/2.flac"),
                PathBuf::from("top.mp3"),
                PathBuf::from("z/1.mp3"),
            ]
        );
    }

    #[test]
    fn test_missing_directory() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("nope");
        assert!(matches!(
            walk_audio_files(&missing).err(),
            Some(ScanError::DirectoryNotFound(_))
        ));
        assert!(matches!(
            list_album_tracks(&missing),
            Err(ScanError::DirectoryNotFound(_))
        ));
    }

    #[test]
    fn test_file_is_not_a_directory() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("a.mp3");
        touch(&file);
        assert!(matches!(list_album_dirs(&file), Err(ScanError::NotADirectory(_))));
    }

    #[test]
    fn test_album_dirs_sorted() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("B")).unwrap();
        fs::create_dir(dir.path().join("A")).unwrap();
        touch(&dir.path().join("loose.mp3"));

        let albums = list_album_dirs(dir.path()).unwrap();
        assert_eq!(albums, vec![dir.path().join("A"), dir.path().join("B")]);
    }
}
