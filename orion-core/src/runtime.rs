use std::sync::Arc;

use orion_common::{ObjectRef, Value};

use crate::object_store::ObjectStore;
use crate::scheduler::Scheduler;
use crate::task::Task;
use crate::worker::Worker;

/// Composes a store, N workers and a scheduler into one single-node runtime.
pub struct Runtime {
    store: Arc<ObjectStore>,
    workers: Vec<Arc<Worker>>,
    scheduler: Arc<Scheduler>,
}

impl Runtime {
    pub fn new(num_workers: usize) -> Self {
        let store = Arc::new(ObjectStore::new());
        let workers: Vec<Arc<Worker>> = (0..num_workers).map(|_| Worker::new(store.clone())).collect();
        let scheduler = Arc::new(Scheduler::new(workers.clone(), store.clone()));

        // Completion notifications flow worker -> scheduler via a weak
        // handle so the two don't form a reference cycle.
        let weak_scheduler = Arc::downgrade(&scheduler);
        for worker in &workers {
            let weak_scheduler = weak_scheduler.clone();
            worker.set_on_object_created(move |id| {
                if let Some(scheduler) = weak_scheduler.upgrade() {
                    scheduler.on_object_created(id);
                }
            });
        }

        for worker in &workers {
            worker.start();
        }

        Runtime {
            store,
            workers,
            scheduler,
        }
    }

    /// Submits `task`, forwarding it to the scheduler and triggering one
    /// scheduling pass. Returns an `ObjectRef` whose id equals `task.id`.
    pub fn submit(&self, task: Task) -> ObjectRef {
        let id = task.id.clone();
        self.scheduler.submit(task);
        self.scheduler.schedule();
        ObjectRef::new(id)
    }

    /// Blocks until `reference`'s object has been published.
    pub fn wait(&self, reference: &ObjectRef) {
        self.store.get_blocking(&reference.id);
    }

    /// Blocks until `reference`'s object has been published, then returns it.
    pub fn get(&self, reference: &ObjectRef) -> Value {
        self.store.get_blocking(&reference.id)
    }

    /// Signals every worker to exit after draining its current queue, and
    /// joins them.
    pub fn shutdown(&self) {
        for worker in &self.workers {
            worker.stop();
        }
    }

    pub fn store(&self) -> &Arc<ObjectStore> {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use test_r::test;

    use super::*;

    #[test]
    fn single_task_with_no_deps() {
        let runtime = Runtime::new(2);
        let a = runtime.submit(Task::leaf("A", || Value::new(2i32)));

        runtime.wait(&a);
        let value = runtime.get(&a);
        assert_eq!(value.downcast_ref::<i32>(), Some(&2));

        runtime.shutdown();
    }

    #[test]
    fn dependency_chain_waits_for_producer() {
        let runtime = Runtime::new(2);
        let a = runtime.submit(Task::leaf("A", || Value::new(10i32)));
        let b = runtime.submit(Task::new("B", vec![a], |deps| {
            Value::new(*deps[0].downcast_ref::<i32>().unwrap() + 32)
        }));

        let value = runtime.get(&b);
        assert_eq!(value.downcast_ref::<i32>(), Some(&42));

        runtime.shutdown();
    }

    /// Independent runnable tasks execute concurrently across workers
    /// rather than being globally serialized.
    #[test]
    fn independent_tasks_run_concurrently_across_workers() {
        use std::sync::atomic::{AtomicUsize, Ordering};
        use std::sync::Barrier;

        let runtime = Runtime::new(2);
        let barrier = Arc::new(Barrier::new(2));
        let concurrent_count = Arc::new(AtomicUsize::new(0));

        let make_task = |id: &str, barrier: Arc<Barrier>, counter: Arc<AtomicUsize>| {
            Task::leaf(id, move || {
                counter.fetch_add(1, Ordering::SeqCst);
                barrier.wait();
                Value::new(1i32)
            })
        };

        let a = runtime.submit(make_task("A", barrier.clone(), concurrent_count.clone()));
        let b = runtime.submit(make_task("B", barrier.clone(), concurrent_count.clone()));

        runtime.wait(&a);
        runtime.wait(&b);
        assert_eq!(concurrent_count.load(Ordering::SeqCst), 2);

        runtime.shutdown();
    }
}
