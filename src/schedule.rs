//! Periodic background task scheduling
//!
//! One worker thread per task: a run always finishes before the next
//! firing, so a task never overlaps itself. Sleeps are interruptible so
//! shutdown does not wait out a daily interval. Tasks run independently;
//! there is no shared lock between them.

use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread::JoinHandle;
use std::time::Duration;

/// A recurring unit of work
pub trait Task: Send {
    fn name(&self) -> &str;
    fn run(&mut self);
}

struct ScheduledTask {
    name: String,
    stop: mpsc::Sender<()>,
    worker: JoinHandle<()>,
}

/// Runs tasks at fixed intervals on dedicated worker threads.
#[derive(Default)]
pub struct Scheduler {
    tasks: Vec<ScheduledTask>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `task` to run every `interval`, starting after
    /// `initial_delay`.
    pub fn every(
        &mut self,
        initial_delay: Duration,
        interval: Duration,
        mut task: impl Task + 'static,
    ) -> std::io::Result<()> {
        let name = task.name().to_string();
        let (stop, wakeup) = mpsc::channel::<()>();
        let worker = std::thread::Builder::new()
            .name(name.clone())
            .spawn(move || {
                match wakeup.recv_timeout(initial_delay) {
                    Err(RecvTimeoutError::Timeout) => {}
                    // Stop requested (or the scheduler is gone) before the
                    // first run.
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => return,
                }
                loop {
                    task.run();
                    match wakeup.recv_timeout(interval) {
                        Err(RecvTimeoutError::Timeout) => {}
                        Ok(()) | Err(RecvTimeoutError::Disconnected) => return,
                    }
                }
            })?;
        self.tasks.push(ScheduledTask { name, stop, worker });
        Ok(())
    }

    pub fn task_names(&self) -> Vec<&str> {
        self.tasks.iter().map(|t| t.name.as_str()).collect()
    }

    /// Stop all tasks and wait for in-flight runs to finish. A sleeping
    /// task wakes immediately; a running task completes its current run.
    pub fn shutdown(self) {
        for task in &self.tasks {
            let _ = task.stop.send(());
        }
        for task in self.tasks {
            if task.worker.join().is_err() {
                eprintln!("warning: task '{}' panicked", task.name);
            }
        }
    }
}
