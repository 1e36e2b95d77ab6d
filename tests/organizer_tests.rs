//! Integration tests for the organizer.

use showfetch::core::organizer::Organizer;
use showfetch::core::Reconciler;
use showfetch::models::config::PathsConfig;
use showfetch::models::media::ShowRef;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

struct Fixture {
    _temp: TempDir,
    paths: PathsConfig,
}

fn fixture() -> Fixture {
    let temp = TempDir::new().unwrap();
    let library = temp.path().join("library");
    let unorganized = temp.path().join("unorganized");
    fs::create_dir(&library).unwrap();
    fs::create_dir(&unorganized).unwrap();
    Fixture {
        paths: PathsConfig { library, unorganized },
        _temp: temp,
    }
}

fn add_release(root: &Path, folder: &str, files: &[&str]) {
    let dir = root.join(folder);
    fs::create_dir_all(&dir).unwrap();
    for file in files {
        fs::write(dir.join(file), "fake content").unwrap();
    }
}

#[test]
fn test_moves_video_and_removes_release_folder() {
    let fx = fixture();
    add_release(
        &fx.paths.unorganized,
        "Foo.Bar.S01E03.The.Pilot.1080p.WEB-DL.x264-GRP",
        &["a1b2c3.mkv", "a1b2c3.nfo", "a1b2c3-sample.mkv"],
    );

    let report = Organizer::new(&fx.paths, Reconciler::default()).run().unwrap();

    let expected = fx
        .paths
        .library
        .join("Foo Bar")
        .join("Season 01")
        .join("Foo Bar.S01E03.The.Pilot.mkv");
    assert!(expected.is_file());
    assert_eq!(report.moved.len(), 1);
    assert_eq!(report.moved[0].to, expected);
    assert_eq!(report.removed_dirs.len(), 1);
    assert!(!fx
        .paths
        .unorganized
        .join("Foo.Bar.S01E03.The.Pilot.1080p.WEB-DL.x264-GRP")
        .exists());
}

#[test]
fn test_falls_back_to_filename() {
    let fx = fixture();
    add_release(&fx.paths.unorganized, "download-4711", &["Foo.S02E05.720p.HDTV.mkv"]);

    let report = Organizer::new(&fx.paths, Reconciler::default()).run().unwrap();

    assert_eq!(report.moved.len(), 1);
    assert!(fx
        .paths
        .library
        .join("Foo")
        .join("Season 02")
        .join("Foo.S02E05.mkv")
        .is_file());
}

#[test]
fn test_skips_unparseable_folder() {
    let fx = fixture();
    add_release(&fx.paths.unorganized, "random stuff", &["movie.mkv"]);

    let report = Organizer::new(&fx.paths, Reconciler::default()).run().unwrap();

    assert!(report.moved.is_empty());
    assert!(report.removed_dirs.is_empty());
    assert_eq!(report.skipped.len(), 1);
    assert!(fx.paths.unorganized.join("random stuff").join("movie.mkv").is_file());
}

#[test]
fn test_keeps_folder_without_videos() {
    let fx = fixture();
    add_release(&fx.paths.unorganized, "Foo.S01E01.1080p", &["foo.part01.rar"]);

    let report = Organizer::new(&fx.paths, Reconciler::default()).run().unwrap();

    assert!(report.moved.is_empty());
    assert!(fx.paths.unorganized.join("Foo.S01E01.1080p").is_dir());
}

#[test]
fn test_dry_run_touches_nothing() {
    let fx = fixture();
    add_release(&fx.paths.unorganized, "Foo.S01E01.1080p", &["foo.mkv"]);

    let report = Organizer::new(&fx.paths, Reconciler::default())
        .dry_run(true)
        .run()
        .unwrap();

    assert_eq!(report.moved.len(), 1);
    assert_eq!(report.removed_dirs.len(), 1);
    assert!(fx.paths.unorganized.join("Foo.S01E01.1080p").join("foo.mkv").is_file());
    assert!(fs::read_dir(&fx.paths.library).unwrap().next().is_none());
}

#[test]
fn test_existing_destination_is_not_overwritten() {
    let fx = fixture();
    let season = fx.paths.library.join("Foo").join("Season 01");
    fs::create_dir_all(&season).unwrap();
    fs::write(season.join("Foo.S01E01.mkv"), "original").unwrap();
    add_release(&fx.paths.unorganized, "Foo.S01E01.1080p", &["foo.mkv"]);

    let report = Organizer::new(&fx.paths, Reconciler::default()).run().unwrap();

    assert!(report.moved.is_empty());
    assert_eq!(fs::read_to_string(season.join("Foo.S01E01.mkv")).unwrap(), "original");
    assert!(fx.paths.unorganized.join("Foo.S01E01.1080p").is_dir());
}

#[test]
fn test_season_pack_uses_file_names() {
    let fx = fixture();
    add_release(
        &fx.paths.unorganized,
        "Foo.S01.1080p.WEB-DL",
        &["Foo.S01E01.1080p.mkv", "Foo.S01E02.1080p.mkv"],
    );

    let report = Organizer::new(&fx.paths, Reconciler::default()).run().unwrap();

    assert_eq!(report.moved.len(), 2);
    let season = fx.paths.library.join("Foo").join("Season 01");
    assert!(season.join("Foo.S01E01.mkv").is_file());
    assert!(season.join("Foo.S01E02.mkv").is_file());
    assert_eq!(report.removed_dirs.len(), 1);
}

#[test]
fn test_catalog_gives_canonical_folder() {
    let fx = fixture();
    add_release(&fx.paths.unorganized, "foo.bar.S01E01.720p.HDTV", &["x.mkv"]);

    let catalog = vec![ShowRef::new("Foo Bar", Some(2019), "foo-bar")];
    Organizer::new(&fx.paths, Reconciler::default())
        .with_catalog(catalog)
        .run()
        .unwrap();

    assert!(fx
        .paths
        .library
        .join("Foo Bar (2019)")
        .join("Season 01")
        .join("Foo Bar (2019).S01E01.mkv")
        .is_file());
}

#[test]
fn test_missing_unorganized_dir_is_an_error() {
    let fx = fixture();
    let paths = PathsConfig {
        library: fx.paths.library.clone(),
        unorganized: fx.paths.unorganized.join("missing"),
    };
    assert!(Organizer::new(&paths, Reconciler::default()).run().is_err());
}
