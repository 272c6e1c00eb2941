use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use orion_common::ObjectId;

use crate::object_store::ObjectStore;
use crate::task::Task;
use crate::worker::Worker;

/// Tracks pending tasks and dispatches only those whose dependencies are
/// already satisfied in the store, round-robining admissions across
/// workers.
pub struct Scheduler {
    store: Arc<ObjectStore>,
    workers: Vec<Arc<Worker>>,
    pending: Mutex<VecDeque<Task>>,
    next_worker: AtomicUsize,
}

impl Scheduler {
    pub fn new(workers: Vec<Arc<Worker>>, store: Arc<ObjectStore>) -> Self {
        Scheduler {
            store,
            workers,
            pending: Mutex::new(VecDeque::new()),
            next_worker: AtomicUsize::new(0),
        }
    }

    pub fn submit(&self, task: Task) {
        self.pending.lock().unwrap().push_back(task);
    }

    /// Completion notification: re-runs a scheduling pass, since a task
    /// that just finished may have unblocked a pending dependent.
    pub fn on_object_created(&self, _id: &ObjectId) {
        self.schedule();
    }

    /// One pass that dispatches every currently-runnable pending task,
    /// leaving the rest pending in their original relative order.
    pub fn schedule(&self) {
        if self.workers.is_empty() {
            return;
        }

        let mut pending = self.pending.lock().unwrap();
        let mut still_pending = VecDeque::with_capacity(pending.len());

        while let Some(task) = pending.pop_front() {
            if self.is_runnable(&task) {
                let worker_index = self.next_worker.fetch_add(1, Ordering::SeqCst) % self.workers.len();
                self.workers[worker_index].submit(task);
            } else {
                still_pending.push_back(task);
            }
        }

        *pending = still_pending;
    }

    fn is_runnable(&self, task: &Task) -> bool {
        task.deps.iter().all(|dep| self.store.get(&dep.id).is_some())
    }

    #[cfg(test)]
    pub(crate) fn pending_len(&self) -> usize {
        self.pending.lock().unwrap().len()
    }
}
