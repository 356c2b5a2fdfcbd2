//! Bounded worker pool with a per-task wall-clock watchdog, built on
//! `tokio` primitives (a semaphore for concurrency, `spawn_blocking` for
//! the compile/run step, `timeout` for the watchdog) instead of a process
//! pool.

use crate::config::ServiceConfig;
use crate::store::TokenStore;
use crate::task::{TaskId, TaskIdAllocator, TaskStatus};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::{RwLock, Semaphore};

pub struct Executor {
    config: ServiceConfig,
    ids: TaskIdAllocator,
    tokens: Arc<dyn TokenStore>,
    semaphore: Arc<Semaphore>,
    statuses: Mutex<HashMap<TaskId, Arc<RwLock<TaskStatus>>>>,
}

impl Executor {
    pub fn new(config: ServiceConfig, tokens: Arc<dyn TokenStore>) -> Self {
        let semaphore = Arc::new(Semaphore::new(config.capacity));
        Executor {
            config,
            ids: TaskIdAllocator::new(),
            tokens,
            semaphore,
            statuses: Mutex::new(HashMap::new()),
        }
    }

    pub fn tokens(&self) -> &Arc<dyn TokenStore> {
        &self.tokens
    }

    /// Accepts a task, records it as `Running`, and returns its id
    /// immediately; the actual translate/compile/run pipeline runs in a
    /// detached background task gated by the worker-pool semaphore.
    pub fn submit(self: &Arc<Self>, source: String, stdin: String, token: String) -> TaskId {
        let id = self.ids.allocate();
        self.tokens.put(id, token);

        let status = Arc::new(RwLock::new(TaskStatus::Running));
        self.statuses
            .lock()
            .expect("status map mutex poisoned")
            .insert(id, status.clone());

        let executor = Arc::clone(self);
        tokio::spawn(async move {
            let _permit = executor
                .semaphore
                .clone()
                .acquire_owned()
                .await
                .expect("worker-pool semaphore is never closed");

            let workdir = executor.config.tasks_dir.clone();
            let compile_config = executor.config.compile_config();
            let name = id.to_string();

            let work = tokio::task::spawn_blocking(move || {
                std::fs::create_dir_all(&workdir)?;
                vta::translate_compile_run(&source, &stdin, &workdir, &name, &compile_config)
            });

            let outcome = tokio::time::timeout(executor.config.task_timeout(), work).await;

            let new_status = match outcome {
                Ok(Ok(Ok(stdout))) => TaskStatus::Done { stdout },
                Ok(Ok(Err(run_err))) => TaskStatus::Error { message: run_err.task_message() },
                Ok(Err(join_err)) => TaskStatus::Error {
                    message: format!("internal error: {join_err}"),
                },
                // Deadline exceeded: the detached `spawn_blocking` task is
                // left to finish on its own; its eventual result is
                // discarded.
                Err(_) => TaskStatus::Error {
                    message: "Task was killed by timeout".to_string(),
                },
            };
            *status.write().await = new_status;
        });

        id
    }

    pub async fn status(&self, id: TaskId) -> Option<TaskStatus> {
        let slot = {
            let statuses = self.statuses.lock().expect("status map mutex poisoned");
            statuses.get(&id)?.clone()
        };
        Some(slot.read().await.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryTokenStore;

    #[tokio::test]
    async fn unknown_task_has_no_status() {
        let executor = Arc::new(Executor::new(ServiceConfig::default(), Arc::new(InMemoryTokenStore::new())));
        assert!(executor.status(999).await.is_none());
    }

    #[tokio::test]
    async fn submitted_task_starts_running() {
        let dir = tempfile::tempdir().unwrap();
        let config = ServiceConfig {
            tasks_dir: dir.path().to_path_buf(),
            ..ServiceConfig::default()
        };
        let executor = Arc::new(Executor::new(config, Arc::new(InMemoryTokenStore::new())));
        let id = executor.submit("x = 1\nnull = print(x)".to_string(), String::new(), "tok".to_string());
        assert!(executor.tokens().check(id, "tok") == Some(true));
    }
}
