use std::fmt;

/// Opaque identifier for an object (and, by convention, for the task that
/// produces it). Globally unique within a single runtime.
pub type ObjectId = String;

/// A handle to a task's output. `id` always equals the id of the task that
/// will eventually (or already has) published it.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ObjectRef {
    pub id: ObjectId,
}

impl ObjectRef {
    pub fn new(id: impl Into<ObjectId>) -> Self {
        ObjectRef { id: id.into() }
    }
}

impl fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectRef({})", self.id)
    }
}

impl From<&str> for ObjectRef {
    fn from(id: &str) -> Self {
        ObjectRef::new(id)
    }
}

impl From<String> for ObjectRef {
    fn from(id: String) -> Self {
        ObjectRef::new(id)
    }
}
