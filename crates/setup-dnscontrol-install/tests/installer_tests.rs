//! Installer state machine without the verifier.

use mockito::Server;
use setup_dnscontrol_core::{SetupConfig, SetupError};
use setup_dnscontrol_install::cache::{DisabledCache, LocalDirCache};
use setup_dnscontrol_install::install::{Arch, Installer, Os, PlatformTarget};
use setup_dnscontrol_install::{InstallSource, SearchPath};
use setup_dnscontrol_testkit::{
    is_executable, mock_asset, scratch_dir, stub_binary, tar_gz_with_entry, zip_with_entry,
};
use std::fs;
use std::path::Path;
use std::sync::{Arc, Barrier};
use std::thread;

fn config_for(server_url: &str, root: &Path) -> SetupConfig {
    let mut config = SetupConfig::new("unused");
    config.endpoints.github = server_url.to_string();
    config.install_root = root.join("runner-temp");
    config.cache.dir = root.join("cache");
    config
}

#[test]
fn test_windows_zip_places_exe() {
    let mut server = Server::new();
    let temp = scratch_dir();
    let asset = mock_asset(
        &mut server,
        "3.16.0",
        "dnscontrol_3.16.0_windows_arm64.zip",
        &zip_with_entry("dnscontrol.exe", &stub_binary(0)),
    );

    let config = config_for(&server.url(), temp.path());
    let target = PlatformTarget::new(Os::Windows, Arch::Arm64);
    let mut search_path = SearchPath::new(Vec::new(), None);

    let report = Installer::new(&config, &DisabledCache)
        .install("3.16.0", &target, &mut search_path)
        .unwrap();

    asset.assert();
    let binary = report.install_dir.join("dnscontrol.exe");
    assert!(binary.is_file());
    assert!(is_executable(&binary));
    assert!(report.install_dir.ends_with("dnscontrol-3.16.0-win32-arm64"));
    assert_eq!(search_path.entries()[0], report.install_dir);
}

#[test]
fn test_darwin_uses_universal_archive() {
    let mut server = Server::new();
    let temp = scratch_dir();
    let asset = mock_asset(
        &mut server,
        "3.16.0",
        "dnscontrol_3.16.0_darwin_all.tar.gz",
        &tar_gz_with_entry("dnscontrol", &stub_binary(0)),
    )
    .expect(2);

    let config = config_for(&server.url(), temp.path());
    let installer = Installer::new(&config, &DisabledCache);

    for arch in [Arch::Amd64, Arch::Arm64] {
        let mut search_path = SearchPath::default();
        installer
            .install("3.16.0", &PlatformTarget::new(Os::Darwin, arch), &mut search_path)
            .unwrap();
    }

    asset.assert();
}

#[test]
fn test_nested_archive_entry_is_found() {
    let mut server = Server::new();
    let temp = scratch_dir();
    mock_asset(
        &mut server,
        "3.16.0",
        "dnscontrol_3.16.0_linux_arm64.tar.gz",
        &tar_gz_with_entry("dnscontrol_3.16.0/dnscontrol", b"bin"),
    );

    let config = config_for(&server.url(), temp.path());
    let report = Installer::new(&config, &DisabledCache)
        .install(
            "3.16.0",
            &PlatformTarget::new(Os::Linux, Arch::Arm64),
            &mut SearchPath::default(),
        )
        .unwrap();

    assert_eq!(fs::read(report.install_dir.join("dnscontrol")).unwrap(), b"bin");
}

#[test]
fn test_archive_without_binary_is_fatal() {
    let mut server = Server::new();
    let temp = scratch_dir();
    mock_asset(
        &mut server,
        "3.16.0",
        "dnscontrol_3.16.0_linux_amd64.tar.gz",
        &tar_gz_with_entry("README.md", b"docs"),
    );

    let config = config_for(&server.url(), temp.path());
    let err = Installer::new(&config, &DisabledCache)
        .install(
            "3.16.0",
            &PlatformTarget::new(Os::Linux, Arch::Amd64),
            &mut SearchPath::default(),
        )
        .unwrap_err();

    assert!(matches!(err, SetupError::BinaryNotInArchive { .. }), "got: {err}");
}

#[test]
fn test_download_leftovers_are_removed() {
    let mut server = Server::new();
    let temp = scratch_dir();
    mock_asset(
        &mut server,
        "3.16.0",
        "dnscontrol_3.16.0_linux_amd64.tar.gz",
        &tar_gz_with_entry("dnscontrol", b"bin"),
    );

    let config = config_for(&server.url(), temp.path());
    let report = Installer::new(&config, &DisabledCache)
        .install(
            "3.16.0",
            &PlatformTarget::new(Os::Linux, Arch::Amd64),
            &mut SearchPath::default(),
        )
        .unwrap();

    assert!(report.warnings.is_empty(), "{:?}", report.warnings);
    let mut names: Vec<String> = fs::read_dir(&config.install_root)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    assert_eq!(
        names,
        vec![
            "dnscontrol-3.16.0-linux-x64".to_string(),
            "dnscontrol-3.16.0-linux-x64.lock".to_string(),
        ]
    );
    let installed: Vec<_> = fs::read_dir(&report.install_dir).unwrap().collect();
    assert_eq!(installed.len(), 1);
}

#[test]
fn test_parallel_installs_of_same_version() {
    let mut server = Server::new();
    let temp = scratch_dir();
    mock_asset(
        &mut server,
        "3.16.0",
        "dnscontrol_3.16.0_linux_amd64.tar.gz",
        &tar_gz_with_entry("dnscontrol", &stub_binary(0)),
    );

    let config = Arc::new(config_for(&server.url(), temp.path()));
    let barrier = Arc::new(Barrier::new(4));

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let config = Arc::clone(&config);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                let cache = LocalDirCache::new(&config.cache.dir);
                barrier.wait();
                Installer::new(&config, &cache).install(
                    "3.16.0",
                    &PlatformTarget::new(Os::Linux, Arch::Amd64),
                    &mut SearchPath::default(),
                )
            })
        })
        .collect();

    let reports: Vec<_> = handles
        .into_iter()
        .map(|h| h.join().unwrap().unwrap())
        .collect();

    // The lock serialises the runs: one downloads, the rest find the cache.
    let downloads = reports
        .iter()
        .filter(|r| r.source == InstallSource::Download)
        .count();
    assert_eq!(downloads, 1);
    assert_eq!(
        fs::read(reports[0].install_dir.join("dnscontrol")).unwrap(),
        stub_binary(0)
    );
}

#[test]
fn test_unsupported_arch_writes_nothing() {
    let temp = scratch_dir();
    let config = config_for("http://127.0.0.1:9", temp.path());
    let cache = LocalDirCache::new(&config.cache.dir);

    let err = Installer::new(&config, &cache)
        .install(
            "3.16.0",
            &PlatformTarget::new(Os::Linux, Arch::parse("x/../../y")),
            &mut SearchPath::default(),
        )
        .unwrap_err();

    assert!(matches!(err, SetupError::UnsupportedArch { .. }), "got: {err}");
    let entries: Vec<_> = fs::read_dir(temp.path()).unwrap().collect();
    assert!(entries.is_empty(), "unexpected files: {entries:?}");
}

#[test]
fn test_rotten_cache_entry_is_rewritten_by_next_download() {
    let mut server = Server::new();
    let temp = scratch_dir();
    let asset = mock_asset(
        &mut server,
        "3.16.0",
        "dnscontrol_3.16.0_linux_amd64.tar.gz",
        &tar_gz_with_entry("dnscontrol", &stub_binary(0)),
    )
    .expect(2);

    let target = PlatformTarget::new(Os::Linux, Arch::Amd64);
    let cache = LocalDirCache::new(temp.path().join("cache"));
    let install_into = |root: &str| {
        let mut config = config_for(&server.url(), temp.path());
        config.install_root = temp.path().join(root);
        Installer::new(&config, &cache)
            .install("3.16.0", &target, &mut SearchPath::default())
            .unwrap()
    };

    assert_eq!(install_into("first").source, InstallSource::Download);
    let entry = temp.path().join("cache/dnscontrol-cache-3.16.0-linux-x64");
    fs::write(entry.join("dnscontrol"), b"rot").unwrap();

    let repaired = install_into("second");
    assert_eq!(repaired.source, InstallSource::Download);
    assert_eq!(repaired.warnings.len(), 1, "{:?}", repaired.warnings);

    let third = install_into("third");
    assert_eq!(third.source, InstallSource::Cache);
    assert!(third.warnings.is_empty(), "{:?}", third.warnings);
    assert_eq!(
        fs::read(third.install_dir.join("dnscontrol")).unwrap(),
        stub_binary(0)
    );

    asset.assert();
}
