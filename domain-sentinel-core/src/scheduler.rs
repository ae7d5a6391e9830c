//! Dynamic cron task scheduling.
//!
//! Each registered task owns one tokio loop that sleeps until the next cron
//! fire, runs its job, and records the outcome. Registration under an
//! existing ID atomically replaces the old task; an invalid expression is
//! rejected before the old task is touched, so it keeps running unchanged.

use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use cron::Schedule;
use serde::Serialize;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use crate::error::{CoreError, CoreResult};

/// A unit of scheduled work.
///
/// Implementations return a short human-readable outcome on success; errors
/// are recorded on the task and logged, never propagated out of the loop.
#[async_trait]
pub trait ScheduledJob: Send + Sync {
    async fn run(&self) -> CoreResult<String>;
}

/// Bookkeeping for one registered task, readable via [`Scheduler::status`].
#[derive(Debug, Clone, Serialize)]
pub struct TaskStatus {
    /// Normalized six-field cron expression.
    #[serde(rename = "cronExpression")]
    pub cron_expression: String,
    /// When the job last started, if it has fired at all.
    #[serde(rename = "lastRun")]
    pub last_run: Option<DateTime<Utc>>,
    /// Error message of the most recent run, cleared on success.
    #[serde(rename = "lastError")]
    pub last_error: Option<String>,
}

struct TaskEntry {
    cron_expression: String,
    handle: JoinHandle<()>,
    state: Arc<Mutex<TaskState>>,
}

#[derive(Default)]
struct TaskState {
    last_run: Option<DateTime<Utc>>,
    last_error: Option<String>,
}

/// Registry of running cron tasks, keyed by caller-chosen ID.
#[derive(Default)]
pub struct Scheduler {
    tasks: Mutex<HashMap<String, TaskEntry>>,
}

impl Scheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers (or replaces) a task.
    ///
    /// The expression is validated first; on rejection an existing task
    /// under the same ID is left running unchanged. Replacement aborts the
    /// old loop under the registry lock, so the two never run side by side.
    pub async fn register(
        &self,
        id: &str,
        cron_expression: &str,
        job: Arc<dyn ScheduledJob>,
    ) -> CoreResult<()> {
        let normalized = normalize_cron(cron_expression);
        let schedule =
            Schedule::from_str(&normalized).map_err(|e| CoreError::InvalidSchedule {
                expression: cron_expression.to_string(),
                detail: e.to_string(),
            })?;

        // The old loop must be dead before the new one exists, so the whole
        // swap happens under the registry lock.
        let mut tasks = self.tasks.lock().await;
        let replaced = match tasks.remove(id) {
            Some(old) => {
                old.handle.abort();
                true
            }
            None => false,
        };

        let state = Arc::new(Mutex::new(TaskState::default()));
        let handle = spawn_task_loop(id.to_string(), schedule, job, Arc::clone(&state));
        tasks.insert(
            id.to_string(),
            TaskEntry {
                cron_expression: normalized.clone(),
                handle,
                state,
            },
        );
        if replaced {
            log::info!("[scheduler] Replaced task {id} with schedule '{normalized}'");
        } else {
            log::info!("[scheduler] Registered task {id} with schedule '{normalized}'");
        }
        Ok(())
    }

    /// Stops and removes one task.
    pub async fn stop(&self, id: &str) -> CoreResult<()> {
        let mut tasks = self.tasks.lock().await;
        let entry = tasks
            .remove(id)
            .ok_or_else(|| CoreError::TaskNotFound(id.to_string()))?;
        entry.handle.abort();
        log::info!("[scheduler] Stopped task {id}");
        Ok(())
    }

    /// Stops every task. The registry is reusable afterwards.
    pub async fn shutdown(&self) {
        let mut tasks = self.tasks.lock().await;
        let count = tasks.len();
        for (_, entry) in tasks.drain() {
            entry.handle.abort();
        }
        log::info!("[scheduler] Shut down {count} tasks");
    }

    /// Bookkeeping snapshot for one task, `None` when unknown.
    pub async fn status(&self, id: &str) -> Option<TaskStatus> {
        let tasks = self.tasks.lock().await;
        let entry = tasks.get(id)?;
        let state = entry.state.lock().await;
        Some(TaskStatus {
            cron_expression: entry.cron_expression.clone(),
            last_run: state.last_run,
            last_error: state.last_error.clone(),
        })
    }

    /// IDs of all registered tasks, unordered.
    pub async fn task_ids(&self) -> Vec<String> {
        self.tasks.lock().await.keys().cloned().collect()
    }
}

/// Accepts both six-field (with seconds) and five-field crontab expressions;
/// the latter get a `0` seconds field prefixed.
fn normalize_cron(expression: &str) -> String {
    let trimmed = expression.trim();
    if trimmed.split_whitespace().count() == 5 {
        format!("0 {trimmed}")
    } else {
        trimmed.to_string()
    }
}

/// One task's run loop. Fires are strictly sequential, so a slow job never
/// overlaps itself; a missed fire is simply skipped.
fn spawn_task_loop(
    id: String,
    schedule: Schedule,
    job: Arc<dyn ScheduledJob>,
    state: Arc<Mutex<TaskState>>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            let now = Utc::now();
            let Some(next) = schedule.upcoming(Utc).next() else {
                log::warn!("[scheduler] Task {id} has no upcoming fire, exiting loop");
                break;
            };
            let wait = (next - now).to_std().unwrap_or(Duration::ZERO);
            tokio::time::sleep(wait).await;

            {
                let mut state = state.lock().await;
                state.last_run = Some(Utc::now());
            }
            match job.run().await {
                Ok(outcome) => {
                    log::info!("[scheduler] Task {id} completed: {outcome}");
                    state.lock().await.last_error = None;
                }
                Err(e) => {
                    if e.is_expected() {
                        log::warn!("[scheduler] Task {id} failed: {e}");
                    } else {
                        log::error!("[scheduler] Task {id} failed: {e}");
                    }
                    state.lock().await.last_error = Some(e.to_string());
                }
            }
        }
    })
}
