//! Directory scanner module.
//!
//! Walks the library and the unorganized download folder, collecting the
//! names the reconciler compares against wanted episodes.

use crate::models::media::Candidate;
use crate::utils::fs::{ensure_directory, is_sample, is_video_file};
use crate::Result;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// A top-level folder in the unorganized directory, one per download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseDir {
    pub path: PathBuf,
    /// Folder name, usually the release title.
    pub name: String,
    /// Video files anywhere beneath the folder, samples excluded.
    pub videos: Vec<PathBuf>,
}

/// Result of scanning the unorganized directory.
#[derive(Debug, Default)]
pub struct ScanResult {
    pub releases: Vec<ReleaseDir>,
    /// Video files lying directly in the scanned root.
    pub loose_videos: Vec<PathBuf>,
    /// Sample clips found (never organized).
    pub samples: Vec<PathBuf>,
    /// Total files scanned.
    pub total_files_scanned: usize,
    /// Total directories scanned.
    pub total_dirs_scanned: usize,
}

impl ScanResult {
    /// Names usable as existence evidence: release folder names and loose
    /// video filenames.
    pub fn candidates(&self) -> Vec<Candidate> {
        let folders = self.releases.iter().map(|r| Candidate::folder(r.name.clone()));
        let files = self.loose_videos.iter().filter_map(|p| file_name(p)).map(Candidate::file);
        folders.chain(files).collect()
    }

    /// Total video count (excluding samples).
    pub fn total_videos(&self) -> usize {
        self.releases.iter().map(|r| r.videos.len()).sum::<usize>() + self.loose_videos.len()
    }
}

fn file_name(path: &Path) -> Option<String> {
    path.file_name().map(|n| n.to_string_lossy().to_string())
}

/// Scan the unorganized download folder.
///
/// Every direct subdirectory becomes a [`ReleaseDir`], even when it holds no
/// video yet (a download still being unpacked still counts as present).
pub fn scan_unorganized(path: &Path) -> Result<ScanResult> {
    ensure_directory(path)?;

    let mut result = ScanResult::default();
    let mut releases: BTreeMap<PathBuf, Vec<PathBuf>> = BTreeMap::new();

    for entry in WalkDir::new(path)
        .min_depth(1)
        .follow_links(false)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let entry_path = entry.path();

        if entry.file_type().is_dir() {
            result.total_dirs_scanned += 1;
            if entry.depth() == 1 {
                releases.entry(entry_path.to_path_buf()).or_default();
            }
            continue;
        }
        if !entry.file_type().is_file() {
            continue;
        }

        result.total_files_scanned += 1;
        if !is_video_file(entry_path) {
            continue;
        }
        if is_sample(entry_path) {
            tracing::debug!("Sample file skipped: {}", entry_path.display());
            result.samples.push(entry_path.to_path_buf());
            continue;
        }

        match top_level_dir(path, entry_path) {
            Some(dir) => releases.entry(dir).or_default().push(entry_path.to_path_buf()),
            None => result.loose_videos.push(entry_path.to_path_buf()),
        }
    }

    result.releases = releases
        .into_iter()
        .map(|(dir, mut videos)| {
            videos.sort();
            ReleaseDir {
                name: file_name(&dir).unwrap_or_default(),
                path: dir,
                videos,
            }
        })
        .collect();
    result.loose_videos.sort();
    result.samples.sort();

    tracing::info!(
        "Scanned {} files in {} directories: {} releases, {} videos, {} samples",
        result.total_files_scanned,
        result.total_dirs_scanned,
        result.releases.len(),
        result.total_videos(),
        result.samples.len()
    );

    Ok(result)
}

/// The direct child of `root` that contains `path`, if `path` is nested.
fn top_level_dir(root: &Path, path: &Path) -> Option<PathBuf> {
    let relative = path.strip_prefix(root).ok()?;
    let mut components = relative.components();
    let first = components.next()?;
    components.next()?;
    Some(root.join(first))
}

/// Every video file in the library, samples excluded.
pub fn scan_library(path: &Path) -> Result<Vec<PathBuf>> {
    ensure_directory(path)?;

    let mut videos: Vec<PathBuf> = WalkDir::new(path)
        .follow_links(false)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| is_video_file(p) && !is_sample(p))
        .collect();
    videos.sort();

    tracing::debug!("Library {} holds {} videos", path.display(), videos.len());
    Ok(videos)
}

/// Library filenames as candidates.
pub fn library_candidates(path: &Path) -> Result<Vec<Candidate>> {
    Ok(scan_library(path)?
        .iter()
        .filter_map(|p| file_name(p))
        .map(Candidate::file)
        .collect())
}
