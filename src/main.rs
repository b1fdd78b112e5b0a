//! reclaim CLI - safe deletion and reclamation of hosted git repositories
//!
//! Usage: reclaim <COMMAND>
//!
//! Commands:
//!   delete     Delete a project's repository (preconditions apply)
//!   sweep      Remove orphaned trash folders left by crashed deletions
//!   reap       Remove archived repositories past retention
//!   housekeep  Run sweep and reap on their schedule in the foreground

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};

use reclaim::config::{self, Config, ConfigWarning};
use reclaim::store::{
    AdminPermissions, GitStore, HandlerRegistry, LocalGitStore, NoChangeIndex, NoProjectCache,
    NoSubscriptions, NullMetadataHandler, ProjectConfigStore, StoreError,
};
use reclaim::{
    ArchiveReaper, DeleteError, DeleteLog, DeleteOptions, DeletePreconditions, DeleteProject,
    HideProject, ListenerSet, NoopDeleteLog, ProjectName, ProtectedProjects, RepositoryRemover,
    Scheduler, SystemClock, TextDeleteLog, TrashSweeper,
};

/// reclaim - safe deletion and reclamation of hosted git repositories
#[derive(Parser, Debug)]
#[command(name = "reclaim")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// NDJSON output for CI
    #[arg(long, default_value = "false")]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Delete a project's repository (preconditions apply)
    Delete {
        /// Project to delete
        project: String,

        /// Repository base path
        #[arg(short, long, default_value = ".")]
        base: PathBuf,

        /// Delete the project even if it has open changes
        #[arg(long)]
        force: bool,

        /// Don't delete the repository directory
        #[arg(long)]
        preserve_repo: bool,

        /// Confirmation to delete the project
        #[arg(long)]
        yes_really_delete: bool,
    },

    /// Remove orphaned trash folders left by crashed deletions
    Sweep {
        /// Repository base path
        #[arg(short, long, default_value = ".")]
        base: PathBuf,
    },

    /// Remove archived repositories past retention
    Reap {
        /// Repository base path
        #[arg(short, long, default_value = ".")]
        base: PathBuf,
    },

    /// Run sweep and reap on their schedule in the foreground
    Housekeep {
        /// Repository base path
        #[arg(short, long, default_value = ".")]
        base: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Delete {
            project,
            base,
            force,
            preserve_repo,
            yes_really_delete,
        } => cmd_delete(
            &project,
            &base,
            DeleteOptions {
                force,
                preserve: preserve_repo,
            },
            yes_really_delete,
            cli.json,
        ),
        Commands::Sweep { base } => cmd_sweep(&base, cli.json),
        Commands::Reap { base } => cmd_reap(&base, cli.json),
        Commands::Housekeep { base } => cmd_housekeep(&base),
    }
}

fn load_config(base: &std::path::Path) -> Config {
    let (config, warnings) = config::load_or_default(&base.join("reclaim.toml"));
    report_warnings(&warnings);
    config
}

fn report_warnings(warnings: &[ConfigWarning]) {
    for warning in warnings {
        eprintln!(
            "warning: {}: {}: {}",
            warning.file.display(),
            warning.key,
            warning.message
        );
    }
}

/// Project records for a standalone site are repository directories; no
/// separate config store exists, so hiding is unavailable.
struct NoConfigStore;

impl ProjectConfigStore for NoConfigStore {
    fn exists(&self, _project: &ProjectName) -> bool {
        false
    }

    fn create(&self, _project: &ProjectName) -> Result<(), StoreError> {
        Err(StoreError::Invalid(
            "this site has no project config store".to_string(),
        ))
    }

    fn hide(&self, _project: &ProjectName, _new_parent: &ProjectName) -> Result<(), StoreError> {
        Err(StoreError::Invalid(
            "this site has no project config store".to_string(),
        ))
    }
}

fn cmd_delete(
    project: &str,
    base: &std::path::Path,
    options: DeleteOptions,
    yes_really_delete: bool,
    json: bool,
) -> Result<()> {
    let config = load_config(base);
    let project = ProjectName::new(project).map_err(|e| anyhow::anyhow!("{e}"))?;

    if options.preserve && !config.deletion.enable_preserve_option {
        anyhow::bail!("the preserve option is disabled on this site");
    }

    let store = LocalGitStore::new(base);
    let clock = SystemClock;
    let listeners = ListenerSet::new();
    let protected = ProtectedProjects::new(Vec::new(), &config);
    let permissions = AdminPermissions;
    let changes = NoChangeIndex;
    let subscriptions = NoSubscriptions;
    let cache = NoProjectCache;
    let config_store = NoConfigStore;
    let dispatcher = reclaim::events::NoopDispatcher;
    let delete_log = open_delete_log(base);

    // Selected once at startup; a site with an unknown schema would fail
    // here, not at delete time.
    let mut registry = HandlerRegistry::new();
    registry.register(0, Box::new(NullMetadataHandler));
    let metadata = registry.select(0).map_err(|e| anyhow::anyhow!("{e}"))?;

    let preconditions = DeletePreconditions::new(
        &config,
        &protected,
        &store,
        &changes,
        &store,
        &subscriptions,
        &permissions,
    );
    let mut remover = RepositoryRemover::new(&store, &clock, &listeners);
    let mut warnings = Vec::new();
    if config.archive.enabled {
        let archive_root =
            config::resolve_archive_folder(&config, &config::default_data_dir(), &mut warnings);
        report_warnings(&warnings);
        remover = remover.with_archive(archive_root);
    }
    let hide = HideProject::new(
        &config_store,
        &cache,
        ProjectName::new(config.deletion.parent_for_deleted_projects.clone())
            .map_err(|e| anyhow::anyhow!("invalid parent_for_deleted_projects: {e}"))?,
    );
    let delete = DeleteProject::new(
        &preconditions,
        metadata,
        &remover,
        &cache,
        &hide,
        &config,
        &dispatcher,
        delete_log.as_ref(),
        &clock,
    );

    let user = std::env::var("USER").unwrap_or_else(|_| "admin".to_string());
    preconditions.assert_delete_permission(&user, &project)?;
    if let Err(e) = preconditions.assert_can_delete(&project, &options) {
        return Err(render_conflict(e));
    }

    if !yes_really_delete {
        anyhow::bail!(
            "Really delete {project}?\n\
             This is an operation which permanently deletes data. \
             This cannot be undone!\n\
             If you are sure you wish to delete this project, re-run\n\
             with the --yes-really-delete flag."
        );
    }

    if !options.force {
        let warnings = delete.warnings(&project);
        if !warnings.is_empty() {
            let mut message = format!("There are warnings against deleting {project}:\n");
            for warning in &warnings {
                message.push_str(&format!(" * {warning}\n"));
            }
            message.push_str(&format!("To really delete {project}, re-run with the --force flag."));
            anyhow::bail!(message);
        }
    }

    match delete.apply(&user, &project, &options) {
        Ok(()) => {
            if json {
                println!(
                    "{}",
                    serde_json::json!({
                        "event": "delete",
                        "project": project.as_str(),
                        "status": "ok",
                    })
                );
            }
            Ok(())
        }
        Err(e) => Err(render_conflict(e)),
    }
}

/// Audit sink writing to `<base>/logs/delete_log`; a site where the log
/// cannot be created still deletes, it just does not record.
fn open_delete_log(base: &std::path::Path) -> Box<dyn DeleteLog> {
    let log_dir = base.join("logs");
    let open = std::fs::create_dir_all(&log_dir).and_then(|()| {
        std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_dir.join("delete_log"))
    });
    match open {
        Ok(file) => Box::new(TextDeleteLog::new(file)),
        Err(e) => {
            eprintln!("warning: cannot open delete log in {}: {e}", log_dir.display());
            Box::new(NoopDeleteLog)
        }
    }
}

/// Conflicts are rendered one reason per line so an operator can resolve
/// each blocker without guesswork.
fn render_conflict(err: DeleteError) -> anyhow::Error {
    match err {
        DeleteError::Conflict { project, reasons } => {
            let mut message = format!("Cannot delete {project}:\n");
            for reason in &reasons {
                message.push_str(&format!(" * {reason}\n"));
            }
            anyhow::anyhow!(message.trim_end().to_string())
        }
        other => other.into(),
    }
}

fn cmd_sweep(base: &std::path::Path, json: bool) -> Result<()> {
    let config = load_config(base);
    let store = LocalGitStore::new(base);

    let mut roots = store.base_paths();
    if let Some(extra) = &config.sweep.trash_folder {
        roots.push(extra.clone());
    }

    let sweeper = TrashSweeper::new(roots, config.sweep.budget(), Arc::new(SystemClock));
    let report = sweeper.sweep();

    if json {
        println!(
            "{}",
            serde_json::json!({
                "event": "sweep",
                "deleted": report.deleted.len(),
                "errors": report.errors.len(),
                "timed_out": report.timed_out,
            })
        );
    } else {
        for path in &report.deleted {
            println!("deleted {}", path.display());
        }
        for error in &report.errors {
            eprintln!("warning: {error}");
        }
        println!(
            "Sweep: {} trash folders deleted, {} errors",
            report.deleted.len(),
            report.errors.len()
        );
    }
    Ok(())
}

fn cmd_reap(base: &std::path::Path, json: bool) -> Result<()> {
    let config = load_config(base);
    let mut warnings = Vec::new();
    let archive_root =
        config::resolve_archive_folder(&config, &config::default_data_dir(), &mut warnings);
    report_warnings(&warnings);

    let reaper = ArchiveReaper::new(
        archive_root,
        config.archive.retention(),
        Arc::new(SystemClock),
    );
    let report = reaper.reap();

    if json {
        println!(
            "{}",
            serde_json::json!({
                "event": "reap",
                "deleted": report.deleted.len(),
                "errors": report.errors.len(),
            })
        );
    } else {
        for path in &report.deleted {
            println!("deleted {}", path.display());
        }
        for error in &report.errors {
            eprintln!("warning: {error}");
        }
        println!(
            "Reap: {} archived repositories deleted, {} errors",
            report.deleted.len(),
            report.errors.len()
        );
    }
    Ok(())
}

fn cmd_housekeep(base: &std::path::Path) -> Result<()> {
    use std::sync::atomic::{AtomicBool, Ordering};

    let config = load_config(base);
    let store = LocalGitStore::new(base);
    let clock = Arc::new(SystemClock);

    let mut warnings = Vec::new();
    let archive_root =
        config::resolve_archive_folder(&config, &config::default_data_dir(), &mut warnings);
    report_warnings(&warnings);

    let mut roots = store.base_paths();
    if let Some(extra) = &config.sweep.trash_folder {
        roots.push(extra.clone());
    }

    let mut scheduler = Scheduler::new();
    scheduler.every(
        config.tasks.initial_delay(),
        config.tasks.interval(),
        ArchiveReaper::new(archive_root, config.archive.retention(), clock.clone()),
    )?;
    scheduler.every(
        config.tasks.initial_delay(),
        config.tasks.interval(),
        TrashSweeper::new(roots, config.sweep.budget(), clock),
    )?;

    let running = Arc::new(AtomicBool::new(true));
    let running_clone = running.clone();
    ctrlc::set_handler(move || {
        running_clone.store(false, Ordering::SeqCst);
    })
    .expect("Error setting Ctrl+C handler");

    println!("Housekeeping {}", base.display());
    println!("Tasks: {}", scheduler.task_names().join(", "));
    println!("Press Ctrl+C to stop");

    while running.load(Ordering::SeqCst) {
        std::thread::sleep(std::time::Duration::from_millis(200));
    }

    println!("Shutting down...");
    scheduler.shutdown();
    Ok(())
}
