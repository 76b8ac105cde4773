//! SQLite persistence for preference records and capture snapshots.
//!
//! One connection per database file, owned by a dedicated worker thread.
//! Callers send typed requests and await the reply, so the sampling and
//! render loops never block on SQLite.

use std::{
    path::{Path, PathBuf},
    sync::{mpsc, Arc, Mutex},
    thread::{self, JoinHandle},
};

use anyhow::{anyhow, Context, Result};
use rusqlite::Connection;
use tokio::sync::oneshot;

use crate::models::{CaptureSnapshot, PreferenceRecord};

mod backend;
pub mod helpers;
mod repositories;
mod schema;
mod worker;

pub use backend::SqliteBackend;

use worker::{DbRequest, Reply};

const ENABLE_LOGS: bool = true;

use crate::{log_error, log_info};

struct WorkerHandle {
    // dropped before the join so the worker sees the channel close
    sender: Mutex<Option<mpsc::Sender<DbRequest>>>,
    thread: Mutex<Option<JoinHandle<()>>>,
}

impl WorkerHandle {
    fn sender(&self) -> Result<mpsc::Sender<DbRequest>> {
        let guard = self.sender.lock().unwrap_or_else(|p| p.into_inner());
        guard
            .clone()
            .ok_or_else(|| anyhow!("database worker already stopped"))
    }
}

impl Drop for WorkerHandle {
    fn drop(&mut self) {
        self.sender.get_mut().unwrap_or_else(|p| p.into_inner()).take();
        let thread = self.thread.get_mut().unwrap_or_else(|p| p.into_inner()).take();
        if let Some(thread) = thread {
            if thread.join().is_err() {
                log_error!("database worker panicked");
            }
        }
    }
}

/// Handle to the preference database. Clones share one worker.
#[derive(Clone)]
pub struct Database {
    worker: Arc<WorkerHandle>,
    path: Arc<PathBuf>,
}

impl Database {
    /// Open (or create) the file, bring the schema up to date, then hand the
    /// connection to the worker thread.
    pub fn new(path: PathBuf) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("failed to create database directory {}", parent.display())
            })?;
        }

        let mut conn = Connection::open(&path)
            .with_context(|| format!("failed to open {}", path.display()))?;
        if let Err(err) = conn.pragma_update(None, "journal_mode", "WAL") {
            log_error!("failed to enable WAL mode: {err}");
        }
        schema::migrate(&mut conn)?;

        let (sender, requests) = mpsc::channel();
        let thread = thread::Builder::new()
            .name("scenetune-db".into())
            .spawn(move || worker::run(conn, requests))
            .context("failed to spawn database worker thread")?;

        log_info!("preference database ready at {}", path.display());

        Ok(Self {
            worker: Arc::new(WorkerHandle {
                sender: Mutex::new(Some(sender)),
                thread: Mutex::new(Some(thread)),
            }),
            path: Arc::new(path),
        })
    }

    pub fn path(&self) -> &Path {
        self.path.as_path()
    }

    async fn request<T>(&self, build: impl FnOnce(Reply<T>) -> DbRequest) -> Result<T> {
        let (reply, response) = oneshot::channel();
        self.worker
            .sender()?
            .send(build(reply))
            .map_err(|_| anyhow!("database worker is gone"))?;
        response
            .await
            .map_err(|_| anyhow!("database worker dropped the request"))?
    }

    /// Every record stored for `user_id`, strongest first.
    pub async fn load_preferences(&self, user_id: &str) -> Result<Vec<PreferenceRecord>> {
        let user_id = user_id.to_string();
        self.request(|reply| DbRequest::LoadPreferences { user_id, reply })
            .await
    }

    /// Replace the full record set for `user_id` in one transaction.
    pub async fn replace_preferences(
        &self,
        user_id: &str,
        records: Vec<PreferenceRecord>,
    ) -> Result<()> {
        let user_id = user_id.to_string();
        self.request(|reply| DbRequest::ReplacePreferences {
            user_id,
            records,
            reply,
        })
        .await
    }

    pub async fn count_preferences(&self, user_id: &str) -> Result<usize> {
        let user_id = user_id.to_string();
        self.request(|reply| DbRequest::CountPreferences { user_id, reply })
            .await
    }

    pub async fn insert_capture(&self, user_id: &str, snapshot: CaptureSnapshot) -> Result<()> {
        let user_id = user_id.to_string();
        self.request(|reply| DbRequest::InsertCapture {
            user_id,
            snapshot,
            reply,
        })
        .await
    }

    /// Captures taken during one session, oldest first.
    pub async fn captures_for_session(&self, session_id: &str) -> Result<Vec<CaptureSnapshot>> {
        let session_id = session_id.to_string();
        self.request(|reply| DbRequest::SessionCaptures { session_id, reply })
            .await
    }
}
