use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// A type-erased, cheaply-clonable holder for whatever a task's closure
/// returns. The store is uniform over this type; callers downcast to the
/// concrete type they expect back.
#[derive(Clone)]
pub struct Value(Arc<dyn Any + Send + Sync>);

impl Value {
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Value(Arc::new(value))
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.downcast_ref::<T>()
    }

    pub fn downcast<T: Any + Send + Sync>(self) -> Result<Arc<T>, Value> {
        match Arc::downcast::<T>(self.0) {
            Ok(v) => Ok(v),
            Err(erased) => Err(Value(erased)),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Value").field(&"<opaque>").finish()
    }
}

#[cfg(test)]
mod tests {
    use test_r::test;

    use super::*;

    #[test]
    fn round_trips_through_downcast() {
        let v = Value::new(42i32);
        assert_eq!(v.downcast_ref::<i32>(), Some(&42));
        assert_eq!(v.downcast_ref::<String>(), None);
    }

    #[test]
    fn owned_downcast_recovers_type() {
        let v = Value::new("hello".to_string());
        let recovered = v.downcast::<String>().expect("type matches");
        assert_eq!(*recovered, "hello");
    }
}
