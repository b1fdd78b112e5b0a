//! End-to-end tests for the filesystem lifecycle: rename, delete,
//! archive, ancestor pruning, and the deletion notification.

mod common;

use std::path::Path;
use std::sync::{Arc, Mutex};

use chrono::{TimeZone, Utc};
use tempfile::tempdir;

use reclaim::events::{ListenerSet, Notify, ProjectDeletedListener, RepoDeletedEvent};
use reclaim::fs::is_trash_folder_name;
use reclaim::store::LocalGitStore;
use reclaim::{Clock, DeleteError, FixedClock, ProjectName, RepositoryRemover};

use common::mk_bare_repo;

struct RecordingListener {
    events: Arc<Mutex<Vec<RepoDeletedEvent>>>,
}

impl ProjectDeletedListener for RecordingListener {
    fn on_project_deleted(
        &self,
        event: &RepoDeletedEvent,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.events.lock().unwrap().push(event.clone());
        Ok(())
    }
}

fn recording_listeners() -> (ListenerSet, Arc<Mutex<Vec<RepoDeletedEvent>>>) {
    let events = Arc::new(Mutex::new(Vec::new()));
    let mut listeners = ListenerSet::new();
    listeners.add(Box::new(RecordingListener {
        events: events.clone(),
    }));
    (listeners, events)
}

fn test_clock() -> FixedClock {
    FixedClock::at(Utc.with_ymd_and_hms(2018, 10, 10, 12, 1, 1).unwrap())
}

/// Directory names under `dir`, for marker-leak assertions.
fn dir_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

/// Every file below `dir` with its contents, for byte-identity assertions.
fn snapshot(dir: &Path) -> Vec<(String, Vec<u8>)> {
    fn walk(root: &Path, dir: &Path, out: &mut Vec<(String, Vec<u8>)>) {
        for entry in std::fs::read_dir(dir).unwrap() {
            let path = entry.unwrap().path();
            if path.is_dir() {
                walk(root, &path, out);
            } else {
                let rel = path.strip_prefix(root).unwrap().to_string_lossy().into_owned();
                out.push((rel, std::fs::read(&path).unwrap()));
            }
        }
    }
    let mut out = Vec::new();
    walk(dir, dir, &mut out);
    out.sort();
    out
}

#[test]
fn delete_removes_directory_and_fires_one_suppressed_event() {
    let dir = tempdir().unwrap();
    mk_bare_repo(dir.path(), "proj1");

    let store = LocalGitStore::new(dir.path());
    let clock = test_clock();
    let (listeners, events) = recording_listeners();
    let remover = RepositoryRemover::new(&store, &clock, &listeners);

    remover
        .remove(&ProjectName::new("proj1").unwrap(), false)
        .unwrap();

    assert!(!dir.path().join("proj1.git").exists());
    assert!(dir_names(dir.path()).is_empty(), "no marker may remain");

    let events = events.lock().unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].project, "proj1");
    assert_eq!(events[0].notify, Notify::None);
}

#[test]
fn delete_of_missing_repository_is_not_found() {
    let dir = tempdir().unwrap();
    let store = LocalGitStore::new(dir.path());
    let clock = test_clock();
    let (listeners, events) = recording_listeners();
    let remover = RepositoryRemover::new(&store, &clock, &listeners);

    let err = remover
        .remove(&ProjectName::new("ghost").unwrap(), false)
        .unwrap_err();

    assert!(matches!(err, DeleteError::NotFound(_)));
    assert!(events.lock().unwrap().is_empty());
}

#[test]
fn preserve_leaves_the_repository_byte_identical() {
    let dir = tempdir().unwrap();
    let repo = mk_bare_repo(dir.path(), "proj1");
    std::fs::write(repo.join("config"), "[core]\n\tbare = true\n").unwrap();
    let before = snapshot(dir.path());

    let store = LocalGitStore::new(dir.path());
    let clock = test_clock();
    let (listeners, events) = recording_listeners();
    let remover = RepositoryRemover::new(&store, &clock, &listeners);

    remover
        .remove(&ProjectName::new("proj1").unwrap(), true)
        .unwrap();

    assert_eq!(snapshot(dir.path()), before);
    assert!(events.lock().unwrap().is_empty(), "preserve fires no event");
}

#[test]
fn archive_round_trip_moves_exactly_one_copy() {
    let dir = tempdir().unwrap();
    let base = dir.path().join("git");
    let archive = dir.path().join("archive");
    std::fs::create_dir_all(&base).unwrap();
    std::fs::create_dir_all(&archive).unwrap();
    let repo = mk_bare_repo(&base, "tools/build");
    std::fs::write(repo.join("config"), "[core]\n\tbare = true\n").unwrap();

    let store = LocalGitStore::new(&base);
    let clock = test_clock();
    let (listeners, events) = recording_listeners();
    let remover = RepositoryRemover::new(&store, &clock, &listeners).with_archive(&archive);

    remover
        .remove(&ProjectName::new("tools/build").unwrap(), false)
        .unwrap();

    // Live directory gone, no marker left under the base path.
    assert!(!base.join("tools/build.git").exists());
    assert!(!base.join("tools").exists(), "empty ancestors are pruned");

    // Exactly one copy under the archive, mirroring the relative path.
    let copies = dir_names(&archive.join("tools"));
    assert_eq!(copies.len(), 1);
    assert_eq!(
        copies[0],
        "build.20181010120101.%archived%.git"
    );
    let copy = archive.join("tools").join(&copies[0]);
    assert_eq!(
        std::fs::read_to_string(copy.join("config")).unwrap(),
        "[core]\n\tbare = true\n"
    );
    assert_eq!(
        std::fs::read_to_string(copy.join("refs/heads/main")).unwrap(),
        "deadbeef\n"
    );

    assert_eq!(events.lock().unwrap().len(), 1);
}

#[test]
fn pruning_stops_at_a_populated_ancestor() {
    let dir = tempdir().unwrap();
    mk_bare_repo(dir.path(), "a/b/c");
    mk_bare_repo(dir.path(), "a/b/e");

    let store = LocalGitStore::new(dir.path());
    let clock = test_clock();
    let (listeners, _) = recording_listeners();
    let remover = RepositoryRemover::new(&store, &clock, &listeners);

    remover
        .remove(&ProjectName::new("a/b/c").unwrap(), false)
        .unwrap();

    assert!(!dir.path().join("a/b/c.git").exists());
    assert!(dir.path().join("a/b/e.git").exists());
    assert!(dir.path().join("a/b").exists());
}

#[test]
fn pruning_removes_the_whole_empty_chain_but_not_the_base() {
    let dir = tempdir().unwrap();
    mk_bare_repo(dir.path(), "a/b/c/d");

    let store = LocalGitStore::new(dir.path());
    let clock = test_clock();
    let (listeners, _) = recording_listeners();
    let remover = RepositoryRemover::new(&store, &clock, &listeners);

    remover
        .remove(&ProjectName::new("a/b/c/d").unwrap(), false)
        .unwrap();

    assert!(!dir.path().join("a").exists());
    assert!(dir.path().exists());
}

#[test]
fn successive_deletions_produce_distinct_marker_names() {
    let dir = tempdir().unwrap();
    let base = dir.path().join("git");
    let archive = dir.path().join("archive");
    std::fs::create_dir_all(&base).unwrap();
    std::fs::create_dir_all(&archive).unwrap();

    let store = LocalGitStore::new(&base);
    let clock = test_clock();
    let (listeners, _) = recording_listeners();
    // Archive mode keeps the marked name around as the archived copy, so
    // successive names are observable.
    let remover = RepositoryRemover::new(&store, &clock, &listeners).with_archive(&archive);
    let name = ProjectName::new("proj1").unwrap();

    mk_bare_repo(&base, "proj1");
    remover.remove(&name, false).unwrap();

    clock.advance(chrono::Duration::seconds(1));
    mk_bare_repo(&base, "proj1");
    remover.remove(&name, false).unwrap();

    let copies = dir_names(&archive);
    assert_eq!(copies.len(), 2);
    assert!(copies[0] < copies[1], "markers sort by timestamp: {copies:?}");
    assert!(copies.iter().all(|c| is_trash_folder_name(c)));
}

#[test]
fn marked_directories_are_recognized_by_the_sweeper_grammar() {
    // A crash between rename and delete leaves the marked name behind;
    // the sweeper must recognize exactly that name.
    let clock = test_clock();
    let stamp = clock.now().format(reclaim::fs::TIMESTAMP_FORMAT);
    assert!(is_trash_folder_name(&format!("proj1.{stamp}.%deleted%.git")));
    assert!(is_trash_folder_name(&format!("b.{stamp}.%archived%.git")));
    assert!(!is_trash_folder_name("proj1.git"));
}
