use std::collections::VecDeque;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex, OnceLock};
use std::thread::{self, JoinHandle};

use orion_common::{ObjectId, ObjectRef};

use crate::object_store::ObjectStore;
use crate::task::Task;

type CompletionHook = Box<dyn Fn(&ObjectId) + Send + Sync>;

/// Owns a FIFO queue of pending tasks and one execution thread.
///
/// This file contains zero scheduling logic; it only executes what the
/// scheduler hands it, resolving each task's dependency values from the
/// shared store before invoking the task's closure.
pub struct Worker {
    store: Arc<ObjectStore>,
    queue: Mutex<VecDeque<(Task, ObjectRef)>>,
    queue_non_empty: Condvar,
    shutdown: AtomicBool,
    handle: Mutex<Option<JoinHandle<()>>>,
    on_object_created: OnceLock<CompletionHook>,
}

impl Worker {
    pub fn new(store: Arc<ObjectStore>) -> Arc<Self> {
        Arc::new(Worker {
            store,
            queue: Mutex::new(VecDeque::new()),
            queue_non_empty: Condvar::new(),
            shutdown: AtomicBool::new(false),
            handle: Mutex::new(None),
            on_object_created: OnceLock::new(),
        })
    }

    /// Registers a callback invoked (off the calling thread) after every
    /// successful publish, so the scheduler can re-run a scheduling pass
    /// when a dependent task may have just become runnable. Set once, by
    /// the `Runtime` that owns this worker.
    pub fn set_on_object_created(&self, hook: impl Fn(&ObjectId) + Send + Sync + 'static) {
        let _ = self.on_object_created.set(Box::new(hook));
    }

    /// Enqueues `task`, returning an `ObjectRef` whose id equals `task.id`.
    pub fn submit(self: &Arc<Self>, task: Task) -> ObjectRef {
        let out_ref = ObjectRef::new(task.id.clone());
        {
            let mut queue = self.queue.lock().unwrap();
            queue.push_back((task, out_ref.clone()));
        }
        self.queue_non_empty.notify_one();
        out_ref
    }

    pub fn start(self: &Arc<Self>) {
        let this = Arc::clone(self);
        let handle = thread::spawn(move || this.run());
        *self.handle.lock().unwrap() = Some(handle);
    }

    /// Signals this worker to exit once its current queue has drained, and
    /// joins its thread.
    pub fn stop(&self) {
        self.shutdown.store(true, Ordering::SeqCst);
        self.queue_non_empty.notify_all();
        if let Some(handle) = self.handle.lock().unwrap().take() {
            let _ = handle.join();
        }
    }

    fn run(self: Arc<Self>) {
        loop {
            let item = {
                let mut queue = self.queue.lock().unwrap();
                loop {
                    if let Some(item) = queue.pop_front() {
                        break Some(item);
                    }
                    if self.shutdown.load(Ordering::SeqCst) {
                        break None;
                    }
                    queue = self.queue_non_empty.wait(queue).unwrap();
                }
            };

            match item {
                Some((task, out_ref)) => self.execute(task, out_ref),
                None => return,
            }
        }
    }

    fn execute(&self, task: Task, out_ref: ObjectRef) {
        let mut dep_values = Vec::with_capacity(task.deps.len());
        for dep in &task.deps {
            dep_values.push(self.store.get_blocking(&dep.id));
        }

        let Some(work) = task.work.clone() else {
            tracing::error!(
                task_id = %task.id,
                "task has no local closure to execute; its object will never be published"
            );
            return;
        };

        match catch_unwind(AssertUnwindSafe(|| work(dep_values))) {
            Ok(value) => {
                self.store.put(out_ref.id.clone(), value);
                if let Some(hook) = self.on_object_created.get() {
                    hook(&out_ref.id);
                }
            }
            Err(_) => {
                tracing::error!(
                    task_id = %task.id,
                    "task closure panicked; its object will never be published"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use test_r::test;

    use orion_common::Value;

    use super::*;

    #[test]
    fn executes_queued_task_and_publishes_result() {
        let store = Arc::new(ObjectStore::new());
        let worker = Worker::new(store.clone());
        worker.start();

        let task = Task::leaf("a", || Value::new(2i32));
        let out = worker.submit(task);

        let value = store.get_blocking(&out.id);
        assert_eq!(value.downcast_ref::<i32>(), Some(&2));

        worker.stop();
    }

    #[test]
    fn dep_values_are_presented_in_declared_order() {
        let store = Arc::new(ObjectStore::new());
        store.put("x".to_string(), Value::new(10i32));
        store.put("y".to_string(), Value::new(20i32));

        let worker = Worker::new(store.clone());
        worker.start();

        let task = Task::new(
            "z",
            vec![ObjectRef::new("x"), ObjectRef::new("y")],
            |deps| {
                let a = *deps[0].downcast_ref::<i32>().unwrap();
                let b = *deps[1].downcast_ref::<i32>().unwrap();
                Value::new(a - b)
            },
        );
        let out = worker.submit(task);

        let value = store.get_blocking(&out.id);
        assert_eq!(value.downcast_ref::<i32>(), Some(&-10));

        worker.stop();
    }

    #[test]
    fn panicking_closure_never_publishes_but_does_not_kill_the_worker() {
        let store = Arc::new(ObjectStore::new());
        let worker = Worker::new(store.clone());
        worker.start();

        worker.submit(Task::leaf("boom", || panic!("deliberate")));
        // The worker thread survives and keeps draining its queue.
        let out = worker.submit(Task::leaf("ok", || Value::new(1i32)));
        let value = store.get_blocking(&out.id);
        assert_eq!(value.downcast_ref::<i32>(), Some(&1));

        worker.stop();
    }
}
