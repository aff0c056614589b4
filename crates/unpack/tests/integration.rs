//! End-to-end acquisition tests with fake fetch and extract collaborators

use async_trait::async_trait;
use rtdist_config::Config;
use rtdist_errors::{Error, NetworkError, PlatformError, UnpackError};
use rtdist_events::{channel, AcquisitionEvent, AppEvent, EventReceiver};
use rtdist_net::{ArchiveFetcher, FetchOptions};
use rtdist_platform::implementations::native::filesystem::NativeFilesystemOperations;
use rtdist_platform::implementations::native::process::NativeProcessOperations;
use rtdist_platform::{
    CopyOptions, FilesystemOperations, HardLinkPolicy, Platform, PlatformContext,
};
use rtdist_unpack::{ArchiveExtractor, Packager, Unpacker};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

#[derive(Default)]
struct FakeFetcher {
    archive: PathBuf,
    fail: bool,
    calls: AtomicUsize,
    seen: Mutex<Vec<FetchOptions>>,
}

#[async_trait]
impl ArchiveFetcher for FakeFetcher {
    async fn fetch(&self, options: &FetchOptions) -> Result<PathBuf, Error> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().unwrap().push(options.clone());
        if self.fail {
            return Err(NetworkError::HttpError {
                status: 404,
                url: "https://mirror.example/v1.2.3/dist.zip".to_string(),
            }
            .into());
        }
        Ok(self.archive.clone())
    }
}

#[derive(Default)]
struct FakeExtractor {
    fail: bool,
    calls: Mutex<Vec<(PathBuf, PathBuf, bool)>>,
}

#[async_trait]
impl ArchiveExtractor for FakeExtractor {
    async fn extract(&self, archive: &Path, out: &Path) -> Result<(), Error> {
        let out_was_empty = std::fs::read_dir(out).unwrap().next().is_none();
        self.calls
            .lock()
            .unwrap()
            .push((archive.to_path_buf(), out.to_path_buf(), out_was_empty));
        if self.fail {
            return Err(UnpackError::ExtractionFailed {
                archive: archive.display().to_string(),
                exit_code: Some(2),
                stderr: "Can not open the file as archive".to_string(),
            }
            .into());
        }
        write_distribution(out);
        Ok(())
    }
}

/// Delegates to the native filesystem and records copy calls
#[derive(Default)]
struct RecordingFilesystem {
    inner: NativeFilesystemOperations,
    copies: Mutex<Vec<HardLinkPolicy>>,
}

#[async_trait]
impl FilesystemOperations for RecordingFilesystem {
    async fn ensure_empty_dir(
        &self,
        ctx: &PlatformContext,
        path: &Path,
    ) -> Result<(), PlatformError> {
        self.inner.ensure_empty_dir(ctx, path).await
    }

    async fn copy_directory(
        &self,
        ctx: &PlatformContext,
        src: &Path,
        dst: &Path,
        options: &CopyOptions,
    ) -> Result<(), PlatformError> {
        self.copies.lock().unwrap().push(options.hard_links);
        self.inner.copy_directory(ctx, src, dst, options).await
    }

    async fn set_permissions(
        &self,
        ctx: &PlatformContext,
        path: &Path,
        mode: u32,
    ) -> Result<(), PlatformError> {
        self.inner.set_permissions(ctx, path, mode).await
    }

    async fn is_dir(&self, ctx: &PlatformContext, path: &Path) -> bool {
        self.inner.is_dir(ctx, path).await
    }
}

struct Harness {
    temp: TempDir,
    fetcher: Arc<FakeFetcher>,
    extractor: Arc<FakeExtractor>,
    filesystem: Arc<RecordingFilesystem>,
    unpacker: Unpacker,
    rx: EventReceiver,
}

impl Harness {
    fn new() -> Self {
        Self::with(FakeFetcher::default(), FakeExtractor::default())
    }

    fn with(mut fetcher: FakeFetcher, extractor: FakeExtractor) -> Self {
        let temp = TempDir::new().unwrap();
        if fetcher.archive.as_os_str().is_empty() {
            fetcher.archive = temp.path().join("cache/electron-v1.2.3-linux-x64.zip");
        }
        let fetcher = Arc::new(fetcher);
        let extractor = Arc::new(extractor);
        let filesystem = Arc::new(RecordingFilesystem::default());
        let platform = Platform::new(filesystem.clone(), Arc::new(NativeProcessOperations::new()));
        let (tx, rx) = channel();
        let unpacker =
            Unpacker::new(fetcher.clone(), extractor.clone(), platform).with_event_sender(tx);

        Self {
            temp,
            fetcher,
            extractor,
            filesystem,
            unpacker,
            rx,
        }
    }

    fn out(&self) -> PathBuf {
        self.temp.path().join("out")
    }

    fn packager(&self, config: Config, platform: &str) -> Packager {
        Packager::new(config, self.temp.path(), platform)
    }

    /// Config pointing `dist-dir` at a local distribution under the project
    fn local_config(&self) -> Config {
        let dist = self.temp.path().join("dist");
        write_distribution(&dist);
        Config {
            dist_dir: Some(PathBuf::from("dist")),
            ..Config::default()
        }
    }

    fn events(&mut self) -> Vec<AcquisitionEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.rx.try_recv() {
            if let AppEvent::Acquisition(event) = event {
                events.push(event);
            }
        }
        events
    }
}

fn write_distribution(root: &Path) {
    std::fs::create_dir_all(root.join("locales")).unwrap();
    std::fs::create_dir_all(root.join("resources")).unwrap();
    std::fs::write(root.join("electron"), "binary").unwrap();
    std::fs::write(root.join("locales/en-US.pak"), "pak").unwrap();
    std::fs::write(root.join("resources/default_app.asar"), "asar").unwrap();
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        for dir in ["locales", "resources"] {
            std::fs::set_permissions(root.join(dir), std::fs::Permissions::from_mode(0o700))
                .unwrap();
        }
    }
}

fn listing(root: &Path) -> Vec<(PathBuf, Option<Vec<u8>>)> {
    fn walk(root: &Path, dir: &Path, acc: &mut Vec<(PathBuf, Option<Vec<u8>>)>) {
        for entry in std::fs::read_dir(dir).unwrap() {
            let path = entry.unwrap().path();
            let rel = path.strip_prefix(root).unwrap().to_path_buf();
            if path.is_dir() {
                acc.push((rel, None));
                walk(root, &path, acc);
            } else {
                acc.push((rel, Some(std::fs::read(&path).unwrap())));
            }
        }
    }
    let mut acc = Vec::new();
    walk(root, root, &mut acc);
    acc.sort();
    acc
}

#[cfg(unix)]
fn mode_of(path: &Path) -> u32 {
    use std::os::unix::fs::PermissionsExt;
    std::fs::metadata(path).unwrap().permissions().mode() & 0o7777
}

#[tokio::test]
async fn local_source_copies_without_fetching() {
    let mut h = Harness::new();
    let packager = h.packager(h.local_config(), "linux");

    h.unpacker
        .unpack_standard(&packager, &h.out(), "linux", "x64", "1.2.3")
        .await
        .unwrap();

    assert_eq!(h.fetcher.calls.load(Ordering::SeqCst), 0);
    assert!(h.extractor.calls.lock().unwrap().is_empty());
    assert_eq!(
        *h.filesystem.copies.lock().unwrap(),
        vec![HardLinkPolicy::Disabled]
    );
    assert_eq!(
        std::fs::read_to_string(h.out().join("resources/default_app.asar")).unwrap(),
        "asar"
    );

    let source = h.temp.path().join("dist");
    let out = h.out();
    assert!(h.events().iter().any(|event| matches!(
        event,
        AcquisitionEvent::CopyStarted { source: s, destination: d } if *s == source && *d == out
    )));
}

#[tokio::test]
async fn download_extracts_fetched_archive_into_cleared_out() {
    let mut h = Harness::new();
    std::fs::create_dir_all(h.out()).unwrap();
    std::fs::write(h.out().join("stale.txt"), "old").unwrap();
    let packager = h.packager(Config::default(), "linux");

    h.unpacker
        .unpack_standard(&packager, &h.out(), "linux", "x64", "1.2.3")
        .await
        .unwrap();

    assert_eq!(h.fetcher.calls.load(Ordering::SeqCst), 1);
    assert!(h.filesystem.copies.lock().unwrap().is_empty());
    let calls = h.extractor.calls.lock().unwrap().clone();
    assert_eq!(calls, vec![(h.fetcher.archive.clone(), h.out(), true)]);
    assert!(!h.out().join("stale.txt").exists());

    let events = h.events();
    assert!(matches!(events.first(), Some(AcquisitionEvent::Started { .. })));
    assert!(matches!(events.last(), Some(AcquisitionEvent::Completed { .. })));
}

#[tokio::test]
async fn repeated_runs_leave_equivalent_tree() {
    let h = Harness::new();
    let packager = h.packager(h.local_config(), "win32");

    h.unpacker
        .unpack_standard(&packager, &h.out(), "win32", "x64", "1.2.3")
        .await
        .unwrap();
    let first = listing(&h.out());

    std::fs::write(h.out().join("leftover.log"), "x").unwrap();
    h.unpacker
        .unpack_standard(&packager, &h.out(), "win32", "x64", "1.2.3")
        .await
        .unwrap();

    assert_eq!(listing(&h.out()), first);
}

#[cfg(unix)]
#[tokio::test]
async fn linux_directories_become_world_readable() {
    let h = Harness::new();
    let packager = h.packager(Config::default(), "linux");

    h.unpacker
        .unpack_standard(&packager, &h.out(), "linux", "x64", "1.2.3")
        .await
        .unwrap();

    assert_eq!(mode_of(&h.out().join("locales")), 0o755);
    assert_eq!(mode_of(&h.out().join("resources")), 0o755);
}

#[cfg(unix)]
#[tokio::test]
async fn other_platforms_keep_extracted_permissions() {
    let h = Harness::new();
    let packager = h.packager(Config::default(), "darwin");

    h.unpacker
        .unpack_standard(&packager, &h.out(), "darwin", "arm64", "1.2.3")
        .await
        .unwrap();

    assert_eq!(mode_of(&h.out().join("locales")), 0o700);
    assert_eq!(mode_of(&h.out().join("resources")), 0o700);
}

#[tokio::test]
async fn missing_resources_fails_permission_fix() {
    let h = Harness::new();
    let dist = h.temp.path().join("dist");
    std::fs::create_dir_all(dist.join("locales")).unwrap();
    let config = Config {
        dist_dir: Some(dist),
        ..Config::default()
    };
    let packager = h.packager(config, "linux");

    let err = h
        .unpacker
        .unpack_standard(&packager, &h.out(), "linux", "x64", "1.2.3")
        .await
        .unwrap_err();

    match err {
        Error::Platform(PlatformError::FilesystemOperationFailed { operation, message }) => {
            assert_eq!(operation, "set_permissions");
            assert!(message.contains("resources"), "{message}");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(mode_of(&h.out().join("locales")), 0o755);
}

#[tokio::test]
async fn fetch_failure_skips_extraction_and_leaves_out_empty() {
    let mut h = Harness::with(
        FakeFetcher {
            fail: true,
            ..FakeFetcher::default()
        },
        FakeExtractor::default(),
    );
    let packager = h.packager(Config::default(), "linux");
    std::fs::create_dir_all(h.out().join("nested")).unwrap();
    std::fs::write(h.out().join("stale.txt"), "old").unwrap();

    let err = h
        .unpacker
        .unpack_standard(&packager, &h.out(), "linux", "x64", "1.2.3")
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        Error::Network(NetworkError::HttpError { status: 404, .. })
    ));
    assert!(h.extractor.calls.lock().unwrap().is_empty());
    assert!(h.out().is_dir());
    assert_eq!(std::fs::read_dir(h.out()).unwrap().count(), 0);
    assert!(matches!(
        h.events().last(),
        Some(AcquisitionEvent::Failed { .. })
    ));
}

#[tokio::test]
async fn extraction_failure_propagates() {
    let h = Harness::with(
        FakeFetcher::default(),
        FakeExtractor {
            fail: true,
            ..FakeExtractor::default()
        },
    );
    let packager = h.packager(Config::default(), "linux");

    let err = h
        .unpacker
        .unpack_standard(&packager, &h.out(), "linux", "x64", "1.2.3")
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        Error::Unpack(UnpackError::ExtractionFailed {
            exit_code: Some(2),
            ..
        })
    ));
}

#[tokio::test]
async fn missing_local_source_keeps_out_untouched() {
    let h = Harness::new();
    std::fs::create_dir_all(h.out()).unwrap();
    std::fs::write(h.out().join("keep.txt"), "k").unwrap();
    let config = Config {
        dist_dir: Some(PathBuf::from("does-not-exist")),
        ..Config::default()
    };
    let packager = h.packager(config, "linux");

    let err = h
        .unpacker
        .unpack_standard(&packager, &h.out(), "linux", "x64", "1.2.3")
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        Error::Unpack(UnpackError::SourceNotFound { .. })
    ));
    assert!(h.out().join("keep.txt").exists());
}

#[tokio::test]
async fn fork_and_standard_hand_different_options_to_fetcher() {
    let h = Harness::new();
    let packager = h.packager(Config::default(), "linux");

    h.unpacker
        .unpack_fork(&packager, &h.out(), "linux", "x64", "1.2.3")
        .await
        .unwrap();
    h.unpacker
        .unpack_standard(&packager, &h.out(), "linux", "x64", "1.2.3")
        .await
        .unwrap();

    let seen = h.fetcher.seen.lock().unwrap().clone();
    assert_eq!(seen.len(), 2);

    let fork = &seen[0];
    assert!(fork.mirror.as_deref().unwrap().ends_with("/v"));
    assert_eq!(
        fork.custom_filename.as_deref(),
        Some("brave-v1.2.3-linux-x64.zip")
    );
    assert_eq!(fork.verify_checksum, Some(false));

    let standard = &seen[1];
    assert_eq!(standard.mirror, None);
    assert_eq!(standard.custom_filename, None);
    assert_eq!(standard.verify_checksum, None);
    assert_eq!(standard.platform.as_deref(), Some("linux"));
}

#[tokio::test]
async fn local_source_still_reports_config_warnings() {
    let mut h = Harness::new();
    let mut config = h.local_config();
    config.download = Some(FetchOptions {
        arch: Some("ia32".to_string()),
        ..FetchOptions::default()
    });
    let packager = h.packager(config, "win32");

    h.unpacker
        .unpack_standard(&packager, &h.out(), "win32", "x64", "1.2.3")
        .await
        .unwrap();

    let mut warnings = Vec::new();
    while let Ok(event) = h.rx.try_recv() {
        if let AppEvent::Config(event) = event {
            warnings.push(event.message());
        }
    }
    assert_eq!(
        warnings,
        vec![
            "\"download\" is deprecated, please use \"dist-download\" instead".to_string(),
            "download.arch will be inferred from the main options".to_string(),
        ]
    );
    assert_eq!(h.fetcher.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn fetch_failure_still_creates_missing_out() {
    let h = Harness::with(
        FakeFetcher {
            fail: true,
            ..FakeFetcher::default()
        },
        FakeExtractor::default(),
    );
    let packager = h.packager(Config::default(), "linux");
    assert!(!h.out().exists());

    let result = h
        .unpacker
        .unpack_standard(&packager, &h.out(), "linux", "x64", "1.2.3")
        .await;

    assert!(result.is_err());
    assert!(h.out().is_dir());
    assert_eq!(std::fs::read_dir(h.out()).unwrap().count(), 0);
}
