//! Library organizer.
//!
//! Moves finished downloads from the unorganized folder into
//! `{library}/{Show}/Season XX/{Show}.SxxEyy[.Title].ext` and removes the
//! release folders it emptied.

use super::parser::{parse_release, ReleaseName};
use super::reconcile::Reconciler;
use super::scanner::{scan_unorganized, ReleaseDir};
use crate::generators::filename::generate_episode_filename;
use crate::generators::folder::{
    generate_catalog_show_folder, generate_season_folder, generate_show_folder,
};
use crate::models::config::PathsConfig;
use crate::models::media::ShowRef;
use crate::utils::fs::{get_extension, move_file};
use crate::Result;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// A planned or completed move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovedFile {
    pub from: PathBuf,
    pub to: PathBuf,
}

/// Something the organizer left in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedItem {
    pub path: PathBuf,
    pub reason: String,
}

/// Outcome of an organize run. In dry-run it lists what would happen.
#[derive(Debug, Default)]
pub struct OrganizeReport {
    pub moved: Vec<MovedFile>,
    pub skipped: Vec<SkippedItem>,
    pub removed_dirs: Vec<PathBuf>,
}

impl OrganizeReport {
    fn skip(&mut self, path: &Path, reason: impl Into<String>) {
        let reason = reason.into();
        tracing::info!("Skipping {}: {}", path.display(), reason);
        self.skipped.push(SkippedItem {
            path: path.to_path_buf(),
            reason,
        });
    }
}

/// Organizes the unorganized folder into the library.
pub struct Organizer {
    library: PathBuf,
    unorganized: PathBuf,
    reconciler: Reconciler,
    catalog: Vec<ShowRef>,
    dry_run: bool,
}

impl Organizer {
    pub fn new(paths: &PathsConfig, reconciler: Reconciler) -> Self {
        Self {
            library: paths.library.clone(),
            unorganized: paths.unorganized.clone(),
            reconciler,
            catalog: Vec::new(),
            dry_run: false,
        }
    }

    /// Resolve show names against a catalog so folders use canonical titles.
    pub fn with_catalog(mut self, catalog: Vec<ShowRef>) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Organize everything currently in the unorganized folder.
    pub fn run(&self) -> Result<OrganizeReport> {
        tracing::info!("Organizing {}", self.unorganized.display());
        let scan = scan_unorganized(&self.unorganized)?;
        let mut report = OrganizeReport::default();
        let mut planned: HashSet<PathBuf> = HashSet::new();

        for release in &scan.releases {
            self.organize_release(release, &mut planned, &mut report);
        }
        for video in &scan.loose_videos {
            if let Some(dest) = self.destination_for(video, None, &mut planned, &mut report) {
                self.apply_move(video, dest, &mut report);
            }
        }

        tracing::info!(
            "Organize complete: {} moved, {} skipped, {} folders removed",
            report.moved.len(),
            report.skipped.len(),
            report.removed_dirs.len()
        );
        Ok(report)
    }

    fn organize_release(
        &self,
        release: &ReleaseDir,
        planned: &mut HashSet<PathBuf>,
        report: &mut OrganizeReport,
    ) {
        if release.videos.is_empty() {
            report.skip(&release.path, "no video files");
            return;
        }

        // A single-video folder is named after its release; with several
        // videos each file has to carry its own episode marker.
        let folder_hint = (release.videos.len() == 1).then_some(release.name.as_str());

        let mut complete = true;
        for video in &release.videos {
            match self.destination_for(video, folder_hint, planned, report) {
                Some(dest) => complete &= self.apply_move(video, dest, report),
                None => complete = false,
            }
        }

        if !complete {
            tracing::debug!("Keeping {}: not every video was placed", release.path.display());
            return;
        }
        if !self.dry_run {
            if let Err(e) = std::fs::remove_dir_all(&release.path) {
                tracing::warn!("Failed to remove {}: {}", release.path.display(), e);
                return;
            }
        }
        tracing::info!("Removed {}", release.path.display());
        report.removed_dirs.push(release.path.clone());
    }

    /// Library path for `video`, or `None` (recorded as skipped).
    fn destination_for(
        &self,
        video: &Path,
        folder_hint: Option<&str>,
        planned: &mut HashSet<PathBuf>,
        report: &mut OrganizeReport,
    ) -> Option<PathBuf> {
        let filename = video.file_name().map(|n| n.to_string_lossy().to_string())?;
        let parsed = folder_hint
            .and_then(parse_release)
            .or_else(|| parse_release(&filename));
        let Some(parsed) = parsed else {
            report.skip(video, "no episode marker in name");
            return None;
        };

        let dest = self.plan_destination(&parsed, video);
        if dest.exists() || !planned.insert(dest.clone()) {
            report.skip(video, format!("{} already exists", dest.display()));
            return None;
        }
        Some(dest)
    }

    /// Build the library path for a parsed release name.
    pub fn plan_destination(&self, parsed: &ReleaseName, video: &Path) -> PathBuf {
        let identity = &parsed.identity;
        let show_folder = match self.resolve_show(&identity.show_name_raw, parsed.year) {
            Some(show) => generate_catalog_show_folder(show),
            None => generate_show_folder(&identity.show_name_raw, None),
        };
        let extension = get_extension(video).unwrap_or_else(|| "mkv".to_string());
        let filename = generate_episode_filename(
            &show_folder,
            identity.key,
            parsed.episode_title.as_deref(),
            &extension,
        );

        self.library
            .join(&show_folder)
            .join(generate_season_folder(identity.key.season))
            .join(filename)
    }

    fn resolve_show(&self, show_name: &str, year: Option<u16>) -> Option<&ShowRef> {
        if self.catalog.is_empty() {
            return None;
        }
        let candidate = match year {
            Some(year) => format!("{} ({})", show_name, year),
            None => show_name.to_string(),
        };
        let resolved = self.reconciler.resolve_best(&candidate, &self.catalog);
        match resolved {
            Some(show) => tracing::debug!("'{}' resolved to {}", show_name, show.title),
            None => tracing::debug!("'{}' not in catalog", show_name),
        }
        resolved
    }

    fn apply_move(&self, from: &Path, to: PathBuf, report: &mut OrganizeReport) -> bool {
        if self.dry_run {
            tracing::info!("Would move {} -> {}", from.display(), to.display());
        } else {
            if let Err(e) = move_file(from, &to) {
                report.skip(from, format!("move failed: {}", e));
                return false;
            }
            tracing::info!("Moved {} -> {}", from.display(), to.display());
        }
        report.moved.push(MovedFile {
            from: from.to_path_buf(),
            to,
        });
        true
    }
}
