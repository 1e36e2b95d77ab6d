//! File system utilities.

use crate::Result;
use std::path::Path;

/// Extensions treated as episode video files.
pub const VIDEO_EXTENSIONS: &[&str] = &[
    "mkv", "mp4", "avi", "mov", "wmv", "m4v", "ts", "m2ts", "webm", "mpg", "mpeg",
];

/// Check if a path exists and is a directory.
pub fn ensure_directory(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(crate::Error::PathNotFound(path.display().to_string()));
    }
    if !path.is_dir() {
        return Err(crate::Error::NotADirectory(path.display().to_string()));
    }
    Ok(())
}

/// Move a file from one location to another, creating the target directory.
pub fn move_file(from: &Path, to: &Path) -> Result<()> {
    if let Some(parent) = to.parent() {
        std::fs::create_dir_all(parent)?;
    }

    // Try rename first (fast, same filesystem)
    if std::fs::rename(from, to).is_ok() {
        return Ok(());
    }

    // Fall back to copy + delete (cross filesystem)
    std::fs::copy(from, to)?;
    std::fs::remove_file(from)?;
    Ok(())
}

/// Get file extension in lowercase.
pub fn get_extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
}

/// Check if a file is a video file based on extension.
pub fn is_video_file(path: &Path) -> bool {
    get_extension(path)
        .map(|ext| VIDEO_EXTENSIONS.contains(&ext.as_str()))
        .unwrap_or(false)
}

/// Check if a filename looks like a sample clip.
pub fn is_sample(path: &Path) -> bool {
    path.file_name()
        .map(|n| n.to_string_lossy().to_lowercase())
        .is_some_and(|name| name.contains("sample") && !name.contains("sampler"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[test]
    fn test_is_video_file() {
        assert!(is_video_file(&PathBuf::from("episode.mkv")));
        assert!(is_video_file(&PathBuf::from("episode.MP4")));
        assert!(!is_video_file(&PathBuf::from("episode.nfo")));
        assert!(!is_video_file(&PathBuf::from("episode.srt")));
    }

    #[test]
    fn test_is_sample() {
        assert!(is_sample(&PathBuf::from("/dl/Show.S01E01/show-sample.mkv")));
        assert!(is_sample(&PathBuf::from("/dl/Sample.mkv")));
        assert!(!is_sample(&PathBuf::from("/dl/Show.S01E01/show.mkv")));
        assert!(!is_sample(&PathBuf::from("/dl/The.Sampler.S01E01.mkv")));
    }

    #[test]
    fn test_move_file_creates_parent() {
        let temp = TempDir::new().unwrap();
        let from = temp.path().join("a.mkv");
        std::fs::write(&from, "video").unwrap();
        let to = temp.path().join("Show").join("Season 01").join("b.mkv");

        move_file(&from, &to).unwrap();
        assert!(!from.exists());
        assert_eq!(std::fs::read_to_string(&to).unwrap(), "video");
    }

    #[test]
    fn test_ensure_directory() {
        let temp = TempDir::new().unwrap();
        assert!(ensure_directory(temp.path()).is_ok());

        let file = temp.path().join("file.txt");
        std::fs::write(&file, "x").unwrap();
        assert!(matches!(ensure_directory(&file), Err(crate::Error::NotADirectory(_))));
        assert!(matches!(
            ensure_directory(&temp.path().join("missing")),
            Err(crate::Error::PathNotFound(_))
        ));
    }
}
