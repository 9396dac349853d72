//! Lazily spawned session workers keyed by session id.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use game_core::{CombatCommand, SessionId};

use super::session::{Command, SessionWorker};
use super::{Resolution, WorkerContext};
use crate::api::{Result, RuntimeError};

struct WorkerSlot {
    tx: mpsc::Sender<Command>,
    task: JoinHandle<()>,
}

pub(crate) struct WorkerPool {
    ctx: Arc<WorkerContext>,
    workers: Mutex<HashMap<SessionId, WorkerSlot>>,
}

impl WorkerPool {
    pub fn new(ctx: Arc<WorkerContext>) -> Self {
        Self {
            ctx,
            workers: Mutex::new(HashMap::new()),
        }
    }

    pub fn context(&self) -> &Arc<WorkerContext> {
        &self.ctx
    }

    /// Returns the queue of `id`, spawning its worker if none is running.
    async fn sender(&self, id: SessionId) -> mpsc::Sender<Command> {
        let mut workers = self.workers.lock().await;
        if let Some(slot) = workers.get(&id) {
            if !slot.tx.is_closed() {
                return slot.tx.clone();
            }
        }

        let (tx, rx) = mpsc::channel(self.ctx.config.session_queue_depth);
        let worker = SessionWorker::new(id, Arc::clone(&self.ctx), rx);
        let task = tokio::spawn(worker.run());
        debug!(target: "runtime::worker", session = %id, "spawned session worker");
        workers.insert(
            id,
            WorkerSlot {
                tx: tx.clone(),
                task,
            },
        );
        tx
    }

    /// Queues `command` on the session's worker and waits for the result.
    ///
    /// Fails with [`RuntimeError::SessionBusy`] instead of waiting when the
    /// queue is already full.
    pub async fn dispatch(&self, id: SessionId, command: CombatCommand) -> Result<Resolution> {
        let tx = self.sender(id).await;
        let (reply, reply_rx) = oneshot::channel();
        tx.try_send(Command { command, reply }).map_err(|error| match error {
            mpsc::error::TrySendError::Full(_) => RuntimeError::SessionBusy(id),
            mpsc::error::TrySendError::Closed(_) => RuntimeError::CommandChannelClosed,
        })?;
        let result = reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)?;
        self.retire_if_closed(id).await;
        result
    }

    /// Drops the slot of a worker that closed its queue after its session settled.
    async fn retire_if_closed(&self, id: SessionId) {
        let mut workers = self.workers.lock().await;
        if workers.get(&id).is_some_and(|slot| slot.tx.is_closed()) {
            workers.remove(&id);
            debug!(target: "runtime::worker", session = %id, "retired settled session worker");
        }
    }

    /// Number of session workers currently held.
    pub async fn len(&self) -> usize {
        self.workers.lock().await.len()
    }

    /// Stops the worker of `id` once its queue drains.
    pub async fn discard(&self, id: SessionId) {
        if self.workers.lock().await.remove(&id).is_some() {
            debug!(target: "runtime::worker", session = %id, "discarded session worker");
        }
    }

    /// Closes every queue and waits for the workers to finish.
    pub async fn shutdown(&self) -> Result<()> {
        let slots: Vec<(SessionId, WorkerSlot)> = self.workers.lock().await.drain().collect();
        let mut first_error = None;
        for (id, WorkerSlot { tx, task }) in slots {
            drop(tx);
            if let Err(error) = task.await {
                warn!(target: "runtime::worker", session = %id, "session worker panicked: {error}");
                first_error.get_or_insert(RuntimeError::WorkerJoin(error));
            }
        }
        first_error.map_or(Ok(()), Err)
    }
}
