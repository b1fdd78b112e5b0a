use std::time::Duration;

use tempfile::tempdir;

use super::*;

fn write_config(dir: &std::path::Path, content: &str) -> std::path::PathBuf {
    let path = dir.join("reclaim.toml");
    std::fs::write(&path, content).unwrap();
    path
}

#[test]
fn default_values_are_loaded() {
    let dir = tempdir().unwrap();
    let path = write_config(dir.path(), "");

    let (config, warnings) = load_with_warnings(&path).unwrap();

    assert_eq!(config.deletion.parent_for_deleted_projects, "Deleted-Projects");
    assert!(config.deletion.allow_deletion_of_repos_with_tags);
    assert!(!config.deletion.hide_project_on_preserve);
    assert!(config.deletion.enable_preserve_option);
    assert!(!config.archive.enabled);
    assert_eq!(config.archive.retention(), DEFAULT_RETENTION);
    assert_eq!(config.sweep.max_allowed_time, 3600);
    assert!(warnings.is_empty());
}

#[test]
fn custom_values_are_loaded() {
    let dir = tempdir().unwrap();
    let path = write_config(
        dir.path(),
        r#"
[deletion]
parent_for_deleted_projects = "Attic"
allow_deletion_of_repos_with_tags = false
hide_project_on_preserve = true
protected_projects = ["^infra/.*"]

[archive]
enabled = true
delete_archived_repos_after = "30d"

[sweep]
max_allowed_time = 120
"#,
    );

    let (config, warnings) = load_with_warnings(&path).unwrap();

    assert_eq!(config.deletion.parent_for_deleted_projects, "Attic");
    assert!(!config.deletion.allow_deletion_of_repos_with_tags);
    assert!(config.deletion.hide_project_on_preserve);
    assert_eq!(config.deletion.protected_projects, vec!["^infra/.*"]);
    assert!(config.archive.enabled);
    assert_eq!(
        config.archive.retention(),
        Duration::from_secs(30 * 24 * 60 * 60)
    );
    assert_eq!(config.sweep.budget(), Duration::from_secs(120));
    assert!(warnings.is_empty());
}

#[test]
fn malformed_duration_warns_and_falls_back() {
    let dir = tempdir().unwrap();
    let path = write_config(
        dir.path(),
        r#"
[archive]
delete_archived_repos_after = "180weeks180years"
"#,
    );

    let (config, warnings) = load_with_warnings(&path).unwrap();

    assert_eq!(config.archive.retention(), DEFAULT_RETENTION);
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].key, "archive.delete_archived_repos_after");
}

#[test]
fn unknown_keys_are_reported() {
    let dir = tempdir().unwrap();
    let path = write_config(
        dir.path(),
        r#"
[deletion]
allow_deleting_tags = true
"#,
    );

    let (_, warnings) = load_with_warnings(&path).unwrap();

    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].key, "deletion.allow_deleting_tags");
}

#[test]
fn parse_duration_units() {
    assert_eq!(parse_duration("45"), Some(Duration::from_secs(45)));
    assert_eq!(parse_duration("45s"), Some(Duration::from_secs(45)));
    assert_eq!(parse_duration("2m"), Some(Duration::from_secs(120)));
    assert_eq!(parse_duration("3h"), Some(Duration::from_secs(3 * 3600)));
    assert_eq!(parse_duration("180d"), Some(Duration::from_secs(180 * 86400)));
    assert_eq!(parse_duration("2w"), Some(Duration::from_secs(14 * 86400)));
    assert_eq!(parse_duration(""), None);
    assert_eq!(parse_duration("d"), None);
    assert_eq!(parse_duration("10 years"), None);
    assert_eq!(parse_duration("1y"), None);
}

#[test]
fn invalid_archive_folder_falls_back_to_data_dir() {
    let dir = tempdir().unwrap();
    let data_dir = dir.path().join("data");
    let blocker = dir.path().join("blocker");
    std::fs::write(&blocker, "not a directory").unwrap();

    let mut config = Config::default();
    config.archive.folder = Some(blocker.join("archive"));

    let mut warnings = Vec::new();
    let resolved = resolve_archive_folder(&config, &data_dir, &mut warnings);

    assert_eq!(resolved, data_dir);
    assert!(data_dir.is_dir());
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].key, "archive.folder");
}

#[test]
fn archive_folder_is_created_when_missing() {
    let dir = tempdir().unwrap();
    let target = dir.path().join("archive");

    let mut config = Config::default();
    config.archive.folder = Some(target.clone());

    let mut warnings = Vec::new();
    let resolved = resolve_archive_folder(&config, &dir.path().join("data"), &mut warnings);

    assert_eq!(resolved, target);
    assert!(target.is_dir());
    assert!(warnings.is_empty());
}
