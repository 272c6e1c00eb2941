use std::collections::HashMap;
use std::sync::{Condvar, Mutex};

use orion_common::{ObjectId, Value};

/// Thread-safe, write-once-per-id mapping of object id to opaque value.
///
/// Publishing twice under the same id is a caller bug; this implementation
/// overwrites and logs a warning rather than rejecting, since a silent
/// accept-without-trace would hide the bug and a hard error would turn it
/// into a new failure mode callers have to handle.
#[derive(Default)]
pub struct ObjectStore {
    state: Mutex<HashMap<ObjectId, Value>>,
    published: Condvar,
}

impl ObjectStore {
    pub fn new() -> Self {
        ObjectStore {
            state: Mutex::new(HashMap::new()),
            published: Condvar::new(),
        }
    }

    /// Publishes `value` under `id`. Wakes every thread blocked in
    /// `get_blocking` for this id (and any other id, since they simply
    /// re-check their own condition on wakeup).
    pub fn put(&self, id: ObjectId, value: Value) {
        let mut guard = self.state.lock().unwrap();
        if guard.contains_key(&id) {
            tracing::warn!(object_id = %id, "overwriting a previously published object");
        }
        guard.insert(id, value);
        self.published.notify_all();
    }

    /// Non-blocking read.
    pub fn get(&self, id: &str) -> Option<Value> {
        self.state.lock().unwrap().get(id).cloned()
    }

    /// Blocks the calling thread until `id` has been published.
    pub fn get_blocking(&self, id: &str) -> Value {
        let mut guard = self.state.lock().unwrap();
        loop {
            if let Some(value) = guard.get(id) {
                return value.clone();
            }
            guard = self.published.wait(guard).unwrap();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    use test_r::test;

    use super::*;

    #[test]
    fn get_returns_none_before_publish_and_some_after() {
        let store = ObjectStore::new();
        assert!(store.get("x").is_none());
        store.put("x".to_string(), Value::new(1i32));
        assert_eq!(store.get("x").unwrap().downcast_ref::<i32>(), Some(&1));
    }

    /// Every waiter blocked on an id before it's published must still
    /// observe the value once it is.
    #[test]
    fn get_blocking_unblocks_all_waiters_on_publish() {
        let store = Arc::new(ObjectStore::new());
        let mut handles = Vec::new();
        for _ in 0..4 {
            let store = store.clone();
            handles.push(thread::spawn(move || {
                let value = store.get_blocking("x");
                *value.downcast_ref::<i32>().unwrap()
            }));
        }

        thread::sleep(Duration::from_millis(20));
        store.put("x".to_string(), Value::new(7i32));

        for handle in handles {
            assert_eq!(handle.join().unwrap(), 7);
        }
    }
}
