use std::sync::mpsc;

use anyhow::Result;
use rusqlite::Connection;
use tokio::sync::oneshot;

use crate::models::{CaptureSnapshot, PreferenceRecord};

use super::repositories::{captures, preferences};

const ENABLE_LOGS: bool = true;

use crate::{log_debug, log_warn};

pub(super) type Reply<T> = oneshot::Sender<Result<T>>;

pub(super) enum DbRequest {
    LoadPreferences {
        user_id: String,
        reply: Reply<Vec<PreferenceRecord>>,
    },
    ReplacePreferences {
        user_id: String,
        records: Vec<PreferenceRecord>,
        reply: Reply<()>,
    },
    CountPreferences {
        user_id: String,
        reply: Reply<usize>,
    },
    InsertCapture {
        user_id: String,
        snapshot: CaptureSnapshot,
        reply: Reply<()>,
    },
    SessionCaptures {
        session_id: String,
        reply: Reply<Vec<CaptureSnapshot>>,
    },
}

/// Serve requests until every sender is gone.
pub(super) fn run(mut conn: Connection, requests: mpsc::Receiver<DbRequest>) {
    while let Ok(request) = requests.recv() {
        match request {
            DbRequest::LoadPreferences { user_id, reply } => {
                respond(reply, preferences::load(&conn, &user_id));
            }
            DbRequest::ReplacePreferences {
                user_id,
                records,
                reply,
            } => {
                respond(reply, preferences::replace(&mut conn, &user_id, &records));
            }
            DbRequest::CountPreferences { user_id, reply } => {
                respond(reply, preferences::count(&conn, &user_id));
            }
            DbRequest::InsertCapture {
                user_id,
                snapshot,
                reply,
            } => {
                respond(reply, captures::insert(&conn, &user_id, &snapshot));
            }
            DbRequest::SessionCaptures { session_id, reply } => {
                respond(reply, captures::for_session(&conn, &session_id));
            }
        }
    }
    log_debug!("database worker exiting");
}

fn respond<T>(reply: Reply<T>, result: Result<T>) {
    if reply.send(result).is_err() {
        log_warn!("database caller went away before the reply");
    }
}
