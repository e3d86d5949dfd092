//! The organize run: scan, place, transfer, relocate duplicates.

use super::executor::{is_same_file, OrganizeExecutor};
use super::planner::PathPlanner;
use super::types::{
    FileFailure, OrganizeRequest, RunResult, DUPLICATES_BUCKET, NO_METADATA_BUCKET,
};
use crate::core::cache::{InMemoryCache, PlaceCache};
use crate::core::geo::{GeoResolver, NominatimGeocoder, OfflineGeocoder, ReverseGeocoder, UNKNOWN_PLACE};
use crate::core::metadata::extract_metadata;
use crate::core::scanner::{FolderScanner, ScanConfig, ScanOutcome};
use crate::error::{Result, TransferError};
use crate::events::{null_sender, Event, EventSender, OrganizeEvent, ProgressSink, StatusSink};
use std::fs;
use std::path::Path;
use std::time::Instant;
use tracing::{info, warn};

/// Builder for [`OrganizeEngine`]
pub struct OrganizeEngineBuilder {
    scan_config: ScanConfig,
    geocoder: Option<Box<dyn ReverseGeocoder>>,
    cache: Option<Box<dyn PlaceCache>>,
    flush_on_miss: bool,
}

impl OrganizeEngineBuilder {
    pub fn new() -> Self {
        Self {
            scan_config: ScanConfig::default(),
            geocoder: None,
            cache: None,
            flush_on_miss: false,
        }
    }

    /// Set scanner configuration
    pub fn scan_config(mut self, config: ScanConfig) -> Self {
        self.scan_config = config;
        self
    }

    /// Set the reverse geocoder (defaults to Nominatim)
    pub fn geocoder(mut self, geocoder: Box<dyn ReverseGeocoder>) -> Self {
        self.geocoder = Some(geocoder);
        self
    }

    /// Set the place cache (defaults to in-memory)
    pub fn cache(mut self, cache: Box<dyn PlaceCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Persist the cache after every new place instead of once per run
    pub fn flush_on_miss(mut self, flush: bool) -> Self {
        self.flush_on_miss = flush;
        self
    }

    pub fn build(self) -> OrganizeEngine {
        let geocoder = self.geocoder.unwrap_or_else(|| match NominatimGeocoder::new() {
            Ok(geocoder) => Box::new(geocoder),
            Err(e) => {
                warn!(error = %e, "geocoding client unavailable, places will be Unknown");
                Box::new(OfflineGeocoder)
            }
        });
        let cache = self
            .cache
            .unwrap_or_else(|| Box::new(InMemoryCache::new()));

        OrganizeEngine {
            scanner: FolderScanner::new(self.scan_config),
            resolver: GeoResolver::new(geocoder, cache).with_flush_on_miss(self.flush_on_miss),
        }
    }
}

impl Default for OrganizeEngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Organizes a photo collection into place/date folders
pub struct OrganizeEngine {
    scanner: FolderScanner,
    resolver: GeoResolver,
}

impl OrganizeEngine {
    pub fn builder() -> OrganizeEngineBuilder {
        OrganizeEngineBuilder::new()
    }

    /// The place resolver, and through it the cache
    pub fn resolver(&self) -> &GeoResolver {
        &self.resolver
    }

    /// Scan `source` without transferring anything
    pub fn scan(&self, source: &Path) -> Result<ScanOutcome> {
        Ok(self.scanner.scan(source)?)
    }

    /// Run with every report going to `events`, ending with [`OrganizeEvent::Completed`]
    pub fn organize_with_events(
        &self,
        request: &OrganizeRequest,
        events: &EventSender,
    ) -> Result<RunResult> {
        let result = self.run(request, events, events, events)?;
        events.send(Event::Organize(OrganizeEvent::Completed {
            result: result.clone(),
        }));
        Ok(result)
    }

    /// Organize `request.source` into `request.destination`.
    ///
    /// Fails only when the source cannot be scanned or the destination root cannot
    /// be created. Every per-file problem is counted in the returned [`RunResult`].
    pub fn organize(
        &self,
        request: &OrganizeRequest,
        progress: &dyn ProgressSink,
        status: &dyn StatusSink,
    ) -> Result<RunResult> {
        self.run(request, progress, status, &null_sender())
    }

    fn run(
        &self,
        request: &OrganizeRequest,
        progress: &dyn ProgressSink,
        status: &dyn StatusSink,
        scan_events: &EventSender,
    ) -> Result<RunResult> {
        let start = Instant::now();
        let source = request.source.as_path();
        let destination = request.destination.as_path();

        status.report("Scanning photos...");
        let outcome = self.scanner.scan_with_events(source, scan_events)?;

        fs::create_dir_all(destination).map_err(|e| TransferError::CreateDir {
            path: destination.to_path_buf(),
            source: e,
        })?;

        let total = outcome.candidates.len();
        status.report(&format!(
            "Found {} photos ({} duplicates)",
            total,
            outcome.duplicate_groups.len()
        ));

        let mut result = RunResult {
            total,
            duplicate_groups: outcome.duplicate_groups.len(),
            unreadable: outcome.unreadable.len(),
            ..Default::default()
        };

        // Organizing in place would sweep the duplicates bucket back into the tree
        let relocate_duplicates =
            !outcome.duplicate_groups.is_empty() && !is_same_file(source, destination);
        let duplicates_dir = destination.join(DUPLICATES_BUCKET);
        if relocate_duplicates {
            if let Err(e) = fs::create_dir_all(&duplicates_dir) {
                warn!(path = %duplicates_dir.display(), error = %e, "could not create duplicates folder");
            }
        }

        for (index, mut record) in outcome.candidates.into_iter().enumerate() {
            status.report(&format!("Processing: {}", record.file_name()));

            record.metadata = extract_metadata(&record.path);
            let target_dir = match &record.metadata {
                None => destination.join(NO_METADATA_BUCKET),
                Some(metadata) => {
                    let place = match metadata.coordinates {
                        Some(coords) => self.resolver.resolve(coords),
                        None => UNKNOWN_PLACE.to_string(),
                    };
                    let (year, month) = PathPlanner::date_labels(metadata.date_taken);
                    let folder = PathPlanner::folder(
                        destination,
                        &request.structure,
                        &year,
                        &month,
                        &place,
                    );
                    record.place = Some(place);
                    folder
                }
            };

            match OrganizeExecutor::transfer(&record.path, &target_dir, request.mode) {
                Ok(_) => {
                    result.organized += 1;
                    if record.metadata.is_none() {
                        result.no_metadata += 1;
                    }
                }
                Err(e) => {
                    warn!(path = %record.path.display(), error = %e, "failed to organize photo");
                    result.errors += 1;
                    result.failures.push(FileFailure {
                        path: record.path.clone(),
                        reason: e.to_string(),
                    });
                }
            }

            progress.report(index + 1, total);
        }

        if relocate_duplicates {
            for group in &outcome.duplicate_groups {
                for path in group.redundant() {
                    match OrganizeExecutor::transfer(path, &duplicates_dir, request.mode) {
                        Ok(_) => result.duplicates_transferred += 1,
                        Err(e) => {
                            warn!(path = %path.display(), error = %e, "failed to relocate duplicate")
                        }
                    }
                }
            }
        }

        if let Err(e) = self.resolver.flush() {
            warn!(error = %e, "failed to persist geocode cache");
        }

        result.duration_ms = start.elapsed().as_millis() as u64;

        info!(
            total = result.total,
            organized = result.organized,
            errors = result.errors,
            duplicate_groups = result.duplicate_groups,
            no_metadata = result.no_metadata,
            duration_ms = result.duration_ms,
            "organize complete"
        );

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::metadata::Coordinates;
    use crate::core::organize::{FolderStructure, TransferMode};
    use crate::error::{GeocodeError, PicPlaceError, ScanError};
    use crate::events::{EventChannel, NullSink, ScanEvent};
    use std::cell::RefCell;
    use std::io::Write;
    use std::path::PathBuf;
    use tempfile::TempDir;

    struct NeverCalled;

    impl ReverseGeocoder for NeverCalled {
        fn reverse(&self, _coords: Coordinates) -> std::result::Result<Option<String>, GeocodeError> {
            panic!("no photo in these tests carries GPS");
        }
    }

    fn engine() -> OrganizeEngine {
        OrganizeEngine::builder()
            .geocoder(Box::new(NeverCalled))
            .build()
    }

    fn create_file(dir: &Path, name: &str, content: &[u8]) -> PathBuf {
        let path = dir.join(name);
        let mut f = fs::File::create(&path).unwrap();
        f.write_all(content).unwrap();
        path
    }

    fn request(src: &Path, dst: &Path) -> OrganizeRequest {
        OrganizeRequest::new(src, dst, FolderStructure::PlaceYearMonth, TransferMode::Copy)
    }

    #[test]
    fn files_without_exif_go_to_no_metadata_bucket() {
        let src = TempDir::new().unwrap();
        let dst = TempDir::new().unwrap();
        create_file(src.path(), "a.jpg", b"not really a jpeg");
        create_file(src.path(), "b.png", b"not really a png");

        let result = engine()
            .organize(&request(src.path(), dst.path()), &NullSink, &NullSink)
            .unwrap();

        assert_eq!(result.total, 2);
        assert_eq!(result.organized, 2);
        assert_eq!(result.no_metadata, 2);
        assert!(dst.path().join(NO_METADATA_BUCKET).join("a.jpg").exists());
        assert!(dst.path().join(NO_METADATA_BUCKET).join("b.png").exists());
    }

    #[test]
    fn progress_and_status_are_reported() {
        let src = TempDir::new().unwrap();
        let dst = TempDir::new().unwrap();
        create_file(src.path(), "a.jpg", b"one");
        create_file(src.path(), "b.jpg", b"two");
        create_file(src.path(), "c.jpg", b"two");

        let ticks = RefCell::new(Vec::new());
        let lines = RefCell::new(Vec::new());
        let progress = |current: usize, total: usize| ticks.borrow_mut().push((current, total));
        let status = |message: &str| lines.borrow_mut().push(message.to_string());

        let result = engine()
            .organize(&request(src.path(), dst.path()), &progress, &status)
            .unwrap();

        assert_eq!(*ticks.borrow(), vec![(1, 2), (2, 2)]);
        let lines = lines.borrow();
        assert_eq!(lines[0], "Scanning photos...");
        assert_eq!(lines[1], "Found 2 photos (1 duplicates)");
        assert_eq!(lines[2], "Processing: a.jpg");
        assert_eq!(result.duplicate_groups, 1);
        assert_eq!(result.duplicates_transferred, 1);
        assert!(dst.path().join(DUPLICATES_BUCKET).join("c.jpg").exists());
    }

    #[test]
    fn duplicates_stay_put_when_organizing_in_place() {
        let dir = TempDir::new().unwrap();
        create_file(dir.path(), "a.jpg", b"same");
        create_file(dir.path(), "b.jpg", b"same");

        let result = engine()
            .organize(&request(dir.path(), dir.path()), &NullSink, &NullSink)
            .unwrap();

        assert_eq!(result.duplicate_groups, 1);
        assert_eq!(result.duplicates_transferred, 0);
        assert!(!dir.path().join(DUPLICATES_BUCKET).exists());
        assert!(dir.path().join("b.jpg").exists());
    }

    #[test]
    fn scan_previews_without_transferring() {
        let src = TempDir::new().unwrap();
        create_file(src.path(), "a.jpg", b"same");
        create_file(src.path(), "b.jpg", b"same");
        create_file(src.path(), "c.png", b"other");

        let outcome = engine().scan(src.path()).unwrap();

        assert_eq!(outcome.candidates.len(), 2);
        assert_eq!(outcome.duplicate_groups.len(), 1);
        assert!(src.path().join("a.jpg").exists());
        assert!(src.path().join("b.jpg").exists());
        assert!(!src.path().join(DUPLICATES_BUCKET).exists());
    }

    #[test]
    fn scan_of_missing_folder_is_an_error() {
        let result = engine().scan(Path::new("/nonexistent/picplace/source"));

        assert!(matches!(
            result,
            Err(PicPlaceError::Scan(ScanError::DirectoryNotFound { .. }))
        ));
    }

    #[test]
    fn invalid_source_fails_before_touching_destination() {
        let dst = TempDir::new().unwrap();
        let target = dst.path().join("out");

        let result = engine().organize(
            &request(Path::new("/nonexistent/photos/12345"), &target),
            &NullSink,
            &NullSink,
        );

        assert!(matches!(
            result,
            Err(PicPlaceError::Scan(ScanError::DirectoryNotFound { .. }))
        ));
        assert!(!target.exists());
    }

    #[test]
    fn events_end_with_completed() {
        let src = TempDir::new().unwrap();
        let dst = TempDir::new().unwrap();
        create_file(src.path(), "a.jpg", b"one");

        let (sender, receiver) = EventChannel::new();
        let result = engine()
            .organize_with_events(&request(src.path(), dst.path()), &sender)
            .unwrap();
        drop(sender);

        let events: Vec<Event> = receiver.iter().collect();
        assert!(events
            .iter()
            .any(|e| matches!(e, Event::Scan(ScanEvent::Completed { .. }))));
        match events.last() {
            Some(Event::Organize(OrganizeEvent::Completed { result: sent })) => {
                assert_eq!(sent.organized, result.organized);
            }
            other => panic!("Unexpected last event: {:?}", other),
        }
    }
}
