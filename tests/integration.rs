//! Integration tests for `hostblock`.
//!
//! All tests run against tempdir hosts files; nothing touches the real
//! system hosts file.

use chrono::{TimeDelta, Utc};
use hostblock::{backup, Blocker, BlockerConfig};

fn config_in(dir: &std::path::Path) -> BlockerConfig {
    BlockerConfig::new(dir.join("hosts"))
}

#[test]
fn full_lifecycle() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());
    let mut blocker = Blocker::open(&config).unwrap();

    assert_eq!(blocker.list_blocked().count(), 0);

    blocker.block("facebook.com", None).unwrap();
    blocker.block("youtube.com", None).unwrap();

    assert!(blocker.is_blocked("facebook.com"));
    assert_eq!(
        blocker.list_blocked().collect::<Vec<_>>(),
        ["facebook.com", "youtube.com"]
    );

    blocker.unblock("facebook.com").unwrap();
    assert!(!blocker.is_blocked("facebook.com"));
    assert!(blocker.is_blocked("youtube.com"));

    blocker.unblock("youtube.com").unwrap();
    assert_eq!(blocker.list_blocked().count(), 0);
    assert_eq!(std::fs::read_to_string(&config.hosts_path).unwrap(), "");
}

#[test]
fn unrelated_lines_survive_reconciliation() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());
    std::fs::write(
        &config.hosts_path,
        "10.0.0.1 printer.local\n127.0.0.1 ads.example.com  # blocked by hostblock\n",
    )
    .unwrap();

    let mut blocker = Blocker::open(&config).unwrap();
    assert_eq!(
        blocker.list_blocked().collect::<Vec<_>>(),
        ["ads.example.com"]
    );

    blocker.block("tracker.io", None).unwrap();

    let written = std::fs::read_to_string(&config.hosts_path).unwrap();
    assert_eq!(
        written,
        "10.0.0.1 printer.local\n\
         127.0.0.1 ads.example.com  # blocked by hostblock\n\
         127.0.0.1 tracker.io  # blocked by hostblock\n"
    );
}

#[test]
fn external_edits_between_operations_are_kept() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());
    let mut blocker = Blocker::open(&config).unwrap();
    blocker.block("facebook.com", None).unwrap();

    // Another tool appends a line behind our back.
    let mut content = std::fs::read_to_string(&config.hosts_path).unwrap();
    content.push_str("192.168.0.5 nas.home\n");
    std::fs::write(&config.hosts_path, content).unwrap();

    blocker.block("youtube.com", None).unwrap();

    let written = std::fs::read_to_string(&config.hosts_path).unwrap();
    assert!(written.contains("192.168.0.5 nas.home\n"));
    assert!(written.contains("127.0.0.1 facebook.com"));
    assert!(written.contains("127.0.0.1 youtube.com"));
}

#[test]
fn temporary_block_expires_and_is_swept() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());
    let mut blocker = Blocker::open(&config).unwrap();

    blocker.block("a.com", Some(TimeDelta::zero())).unwrap();
    blocker.block("b.com", Some(TimeDelta::hours(1))).unwrap();

    // The expired entry is excluded from listing before any sweep, but its
    // managed line is still on disk.
    assert_eq!(blocker.list_blocked().collect::<Vec<_>>(), ["b.com"]);
    assert!(std::fs::read_to_string(&config.hosts_path)
        .unwrap()
        .contains("a.com"));

    let removed = blocker.expire_due(Utc::now()).unwrap();
    assert_eq!(removed, ["a.com"]);

    let written = std::fs::read_to_string(&config.hosts_path).unwrap();
    assert!(!written.contains("a.com"));
    assert!(written.contains("b.com"));
}

#[test]
fn temporary_expiry_survives_restart_via_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());

    let mut blocker = Blocker::open(&config).unwrap();
    blocker
        .block("news.example.com", Some(TimeDelta::minutes(30)))
        .unwrap();
    let expiry = blocker
        .store()
        .get("news.example.com")
        .unwrap()
        .unblock_at()
        .unwrap();
    drop(blocker);

    let snapshot = std::fs::read_to_string(&config.snapshot_path).unwrap();
    assert!(snapshot.contains("temporarily_blocked"));
    assert!(snapshot.contains("news.example.com"));

    let reopened = Blocker::open(&config).unwrap();
    let reloaded = reopened
        .store()
        .get("news.example.com")
        .unwrap()
        .unblock_at()
        .unwrap();
    assert_eq!(reloaded.timestamp(), expiry.timestamp());
}

#[test]
fn unblock_all_twice_is_a_noop_the_second_time() {
    let dir = tempfile::tempdir().unwrap();
    let mut blocker = Blocker::open(&config_in(dir.path())).unwrap();

    blocker.block("a.com", None).unwrap();
    blocker.block("b.com", None).unwrap();
    assert_eq!(blocker.unblock_all().unwrap(), 2);
    assert_eq!(blocker.unblock_all().unwrap(), 0);
}

#[test]
fn reopen_after_restore_starts_empty() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());
    std::fs::write(&config.hosts_path, "127.0.0.1 localhost\n").unwrap();
    assert!(backup::create(&config.hosts_path, &config.backup_path).unwrap());

    let mut blocker = Blocker::open(&config).unwrap();
    blocker.block("facebook.com", None).unwrap();
    drop(blocker);

    backup::restore(&config.hosts_path, &config.backup_path).unwrap();
    std::fs::remove_file(&config.snapshot_path).unwrap();

    let blocker = Blocker::open(&config).unwrap();
    assert_eq!(blocker.list_blocked().count(), 0);
    assert_eq!(
        std::fs::read_to_string(&config.hosts_path).unwrap(),
        "127.0.0.1 localhost\n"
    );
}

#[test]
fn custom_redirect_address_is_used_consistently() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path()).with_redirect("0.0.0.0");

    let mut blocker = Blocker::open(&config).unwrap();
    blocker.block("ads.example.com", None).unwrap();
    drop(blocker);

    let written = std::fs::read_to_string(&config.hosts_path).unwrap();
    assert!(written.starts_with("0.0.0.0 ads.example.com"));

    let reopened = Blocker::open(&config).unwrap();
    assert!(reopened.is_blocked("ads.example.com"));
}

#[test]
fn missing_hosts_file_is_created_on_first_block() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());
    assert!(!config.hosts_path.exists());

    let mut blocker = Blocker::open(&config).unwrap();
    blocker.block("facebook.com", None).unwrap();

    assert_eq!(
        std::fs::read_to_string(&config.hosts_path).unwrap(),
        "127.0.0.1 facebook.com  # blocked by hostblock\n"
    );
}
