//! Integration tests for folder scanning and duplicate grouping.

mod common;

use common::{write_file, write_photo, PARIS};
use picplace::core::scanner::{FolderScanner, ScanConfig};
use picplace::events::{Event, EventChannel, ScanEvent};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn scanner() -> FolderScanner {
    FolderScanner::new(ScanConfig::default())
}

#[test]
fn extensions_match_case_insensitively() {
    let temp = TempDir::new().unwrap();
    write_file(temp.path(), "a.JPG", b"a");
    write_file(temp.path(), "b.Jpeg", b"b");
    write_file(temp.path(), "c.PNG", b"c");
    write_file(temp.path(), "d.tiff", b"d");
    write_file(temp.path(), "e.bmp", b"e");
    write_file(temp.path(), "f.gif", b"f");
    write_file(temp.path(), "g.heic", b"g");
    write_file(temp.path(), "h.tif", b"h");
    write_file(temp.path(), "README", b"i");

    let outcome = scanner().scan(temp.path()).unwrap();

    let mut names: Vec<String> = outcome.candidates.iter().map(|c| c.file_name()).collect();
    names.sort();
    assert_eq!(names, vec!["a.JPG", "b.Jpeg", "c.PNG", "d.tiff", "e.bmp", "f.gif"]);
}

#[test]
fn duplicates_across_folders_keep_smallest_path() {
    let temp = TempDir::new().unwrap();
    let original = write_photo(temp.path(), "trip/day1/eiffel.jpg", Some("2023:07:15 10:30:00"), Some(PARIS));
    let copy = temp.path().join("backup").join("eiffel.jpg");
    fs::create_dir_all(copy.parent().unwrap()).unwrap();
    fs::copy(&original, &copy).unwrap();
    let renamed = temp.path().join("zz_renamed.jpg");
    fs::copy(&original, &renamed).unwrap();
    write_file(temp.path(), "trip/other.png", b"another picture");

    let outcome = scanner().scan(temp.path()).unwrap();

    assert_eq!(outcome.candidates.len(), 2);
    assert_eq!(outcome.duplicate_groups.len(), 1);

    let group = &outcome.duplicate_groups[0];
    assert_eq!(group.canonical(), copy.as_path());
    assert_eq!(group.redundant(), &[original.clone(), renamed.clone()][..]);

    let candidate_paths: Vec<PathBuf> = outcome.candidates.iter().map(|c| c.path.clone()).collect();
    assert!(candidate_paths.contains(&copy));
    assert!(!candidate_paths.contains(&original));
    assert!(!candidate_paths.contains(&renamed));
}

#[test]
fn same_name_different_content_is_not_a_duplicate() {
    let temp = TempDir::new().unwrap();
    write_file(temp.path(), "2019/IMG_0001.jpg", b"first camera");
    write_file(temp.path(), "2020/IMG_0001.jpg", b"second camera");

    let outcome = scanner().scan(temp.path()).unwrap();

    assert_eq!(outcome.candidates.len(), 2);
    assert!(outcome.duplicate_groups.is_empty());
}

#[test]
fn candidates_come_out_in_path_order() {
    let temp = TempDir::new().unwrap();
    write_file(temp.path(), "c.jpg", b"c");
    write_file(temp.path(), "a/z.jpg", b"az");
    write_file(temp.path(), "b.jpg", b"b");

    let outcome = scanner().scan(temp.path()).unwrap();

    let paths: Vec<PathBuf> = outcome.candidates.iter().map(|c| c.path.clone()).collect();
    assert_eq!(
        paths,
        vec![
            temp.path().join("a").join("z.jpg"),
            temp.path().join("b.jpg"),
            temp.path().join("c.jpg"),
        ]
    );
}

#[test]
fn scan_reports_events() {
    let temp = TempDir::new().unwrap();
    write_file(temp.path(), "a.jpg", b"same");
    write_file(temp.path(), "b.jpg", b"same");
    write_file(temp.path(), "notes.txt", b"skip");

    let (sender, receiver) = EventChannel::new();
    scanner().scan_with_events(temp.path(), &sender).unwrap();
    drop(sender);

    let events: Vec<Event> = receiver.iter().collect();
    let found = events
        .iter()
        .filter(|e| matches!(e, Event::Scan(ScanEvent::PhotoFound { .. })))
        .count();
    assert_eq!(found, 2);
    assert!(matches!(events.first(), Some(Event::Scan(ScanEvent::Started { .. }))));
    assert!(matches!(
        events.last(),
        Some(Event::Scan(ScanEvent::Completed {
            candidates: 1,
            duplicate_groups: 1
        }))
    ));
}
