//! Deferred engine work and shared access for multi-threaded hosts.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use futures::channel::mpsc::{self, UnboundedReceiver, UnboundedSender};
use futures::{FutureExt, StreamExt};
use parking_lot::{Mutex, MutexGuard};

use crate::engine::DrawingEngine;

/// Work posted to the engine to run later, against whatever state the engine
/// has at that point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineTask {
    /// Replay the whole history into the render cache
    FullRedraw,
}

/// Queue of pending tasks, drained by the engine between events.
#[derive(Debug)]
pub(crate) struct TaskQueue {
    sender: UnboundedSender<EngineTask>,
    receiver: UnboundedReceiver<EngineTask>,
    /// Set whenever a task is posted, cleared by `drain`
    pending: Arc<AtomicBool>,
}

impl TaskQueue {
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::unbounded();
        Self {
            sender,
            receiver,
            pending: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn handle(&self) -> RedrawHandle {
        RedrawHandle {
            sender: self.sender.clone(),
            pending: self.pending.clone(),
        }
    }

    pub fn post(&self, task: EngineTask) {
        // The receiver lives as long as the queue, so this cannot fail.
        let _ = self.sender.unbounded_send(task);
        self.pending.store(true, Ordering::Release);
    }

    /// Whether tasks were posted since the last `drain`
    pub fn has_pending(&self) -> bool {
        self.pending.load(Ordering::Acquire)
    }

    /// Take every task posted so far
    pub fn drain(&mut self) -> Vec<EngineTask> {
        self.pending.store(false, Ordering::Release);
        let mut tasks = Vec::new();
        while let Some(Some(task)) = self.receiver.next().now_or_never() {
            tasks.push(task);
        }
        tasks
    }
}

/// Requests a full redraw from any thread.
#[derive(Debug, Clone)]
pub struct RedrawHandle {
    sender: UnboundedSender<EngineTask>,
    pending: Arc<AtomicBool>,
}

impl RedrawHandle {
    /// Queue a full redraw. Returns false if the engine has been dropped.
    pub fn request(&self) -> bool {
        let sent = self.sender.unbounded_send(EngineTask::FullRedraw).is_ok();
        if sent {
            self.pending.store(true, Ordering::Release);
        }
        sent
    }
}

/// A drawing engine behind a mutex. Every operation runs inside one
/// exclusive section.
#[derive(Debug, Clone)]
pub struct SharedEngine {
    inner: Arc<Mutex<DrawingEngine>>,
}

impl SharedEngine {
    pub fn new(engine: DrawingEngine) -> Self {
        Self {
            inner: Arc::new(Mutex::new(engine)),
        }
    }

    pub fn lock(&self) -> MutexGuard<'_, DrawingEngine> {
        self.inner.lock()
    }

    pub fn with<R>(&self, f: impl FnOnce(&mut DrawingEngine) -> R) -> R {
        f(&mut self.inner.lock())
    }

    /// Rebuild the render cache from the history as it is when the future is
    /// first polled, not when it is created.
    pub fn full_redraw(&self) -> impl Future<Output = ()> + Send + 'static {
        let inner = self.inner.clone();
        async move {
            inner.lock().rebuild_cache();
        }
    }
}
