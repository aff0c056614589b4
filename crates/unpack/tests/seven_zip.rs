//! `SevenZipExtractor` against stand-in executables

#![cfg(unix)]

use rtdist_errors::{Error, PlatformError, UnpackError};
use rtdist_platform::Platform;
use rtdist_unpack::{ArchiveExtractor, SevenZipExtractor};
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn script(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
}

// Write every script before the first spawn (ETXTBSY).
#[tokio::test]
async fn runs_program_with_expected_arguments_and_reports_failures() {
    let temp = TempDir::new().unwrap();
    let args_file = temp.path().join("args.txt");
    let ok = script(
        temp.path(),
        "fake-7za",
        &format!("printf '%s\\n' \"$@\" > '{}'", args_file.display()),
    );
    let failing = script(
        temp.path(),
        "broken-7za",
        "echo 'ERROR: Can not open the file as archive' >&2\nexit 2",
    );
    let archive = temp.path().join("dist.zip");
    let out = temp.path().join("out");

    SevenZipExtractor::new(Platform::current(), &ok, true)
        .extract(&archive, &out)
        .await
        .unwrap();
    let recorded = std::fs::read_to_string(&args_file).unwrap();
    assert_eq!(
        recorded.lines().collect::<Vec<_>>(),
        vec![
            "x".to_string(),
            "-bd".to_string(),
            "-bb3".to_string(),
            archive.display().to_string(),
            format!("-o{}", out.display()),
        ]
    );

    let err = SevenZipExtractor::new(Platform::current(), &failing, false)
        .extract(&archive, &out)
        .await
        .unwrap_err();
    match err {
        Error::Unpack(UnpackError::ExtractionFailed {
            exit_code, stderr, ..
        }) => {
            assert_eq!(exit_code, Some(2));
            assert_eq!(stderr, "ERROR: Can not open the file as archive");
        }
        other => panic!("unexpected error: {other:?}"),
    }

    let err = SevenZipExtractor::new(Platform::current(), temp.path().join("missing-7za"), false)
        .extract(&archive, &out)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        Error::Platform(PlatformError::CommandNotFound { .. })
    ));
}
