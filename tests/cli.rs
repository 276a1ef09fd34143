/*!
 * Integration tests driving the mediabrowse binary
 */

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use std::process::{Command, Output};

use tempfile::tempdir;

fn mediabrowse(media: &Path, data: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_mediabrowse"))
        .arg("--media-root")
        .arg(media)
        .arg("--data-dir")
        .arg(data)
        .arg("--log-level")
        .arg("off")
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

fn setup() -> (tempfile::TempDir, std::path::PathBuf, std::path::PathBuf) {
    let temp_dir = tempdir().unwrap();
    let media = temp_dir.path().join("media");
    let data = temp_dir.path().join("data");

    let season = media.join("Show").join("Season 1");
    fs::create_dir_all(&season).unwrap();
    for i in [1, 2, 9, 10] {
        let mut file = File::create(season.join(format!("Episode {}.mp4", i))).unwrap();
        file.write_all(&[0u8; 512]).unwrap();
    }

    let status = mediabrowse(&media, &data, &["settings", "init"]);
    assert!(status.status.success());

    (temp_dir, media, data)
}

#[test]
fn test_browse_json() {
    let (_temp_dir, media, data) = setup();
    let output = mediabrowse(&media, &data, &["--format", "json", "browse", "Show/Season 1"]);
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let names: Vec<&str> = value["page"]["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["name"].as_str().unwrap())
        .collect();

    assert_eq!(
        names,
        vec!["Episode 1.mp4", "Episode 10.mp4", "Episode 2.mp4", "Episode 9.mp4"]
    );
    assert_eq!(value["parent"], "Show");
}

#[test]
fn test_watch_json() {
    let (_temp_dir, media, data) = setup();
    let output = mediabrowse(
        &media,
        &data,
        &["--format", "json", "watch", "Show/Season 1/Episode 9.mp4"],
    );
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["next_video"], "Show/Season 1/Episode 10.mp4");
}

#[test]
fn test_escape_is_rejected() {
    let (_temp_dir, media, data) = setup();
    let output = mediabrowse(&media, &data, &["browse", "../"]);

    assert_eq!(output.status.code(), Some(3));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Access denied"));
    assert!(!stderr.contains(&*media.to_string_lossy()));
}

#[test]
fn test_settings_validation() {
    let (_temp_dir, media, data) = setup();

    let output = mediabrowse(&media, &data, &["settings", "set", "DEFAULT_PER_PAGE", "500"]);
    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("DEFAULT_PER_PAGE must be <= 200"));

    let output = mediabrowse(
        &media,
        &data,
        &["--format", "json", "settings", "set", "DEFAULT_PER_PAGE", "2"],
    );
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["DEFAULT_PER_PAGE"], 2);

    let output = mediabrowse(
        &media,
        &data,
        &["--format", "json", "browse", "Show/Season 1", "--page", "-1"],
    );
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["page"]["page"], 1);
    assert_eq!(value["page"]["page_count"], 2);
}

#[test]
fn test_delete_and_size() {
    let (_temp_dir, media, data) = setup();

    let output = mediabrowse(&media, &data, &["--format", "json", "size"]);
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert!(value["record"].is_null());

    let output = mediabrowse(&media, &data, &["--format", "json", "size", "--recalculate"]);
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["record"]["bytes"], 2048);
    assert_eq!(value["formatted"], "2.00 KB");

    let output = mediabrowse(
        &media,
        &data,
        &["--format", "json", "delete", "Show/Season 1/Episode 1.mp4"],
    );
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["deleted"], true);
    assert_eq!(value["redirect"], "Show/Season 1");
    assert!(!media.join("Show/Season 1/Episode 1.mp4").exists());

    // The cached size is stale until recalculated
    let output = mediabrowse(&media, &data, &["--format", "json", "size"]);
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["record"]["bytes"], 2048);
}

#[test]
fn test_missing_media_root() {
    let temp_dir = tempdir().unwrap();
    let output = mediabrowse(
        &temp_dir.path().join("absent"),
        temp_dir.path(),
        &["browse"],
    );
    assert_eq!(output.status.code(), Some(78));
}
