use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use orion_common::Value;

pub type Func = Arc<dyn Fn(Vec<Value>) -> Value + Send + Sync>;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum FunctionRegistryError {
    #[error("function not registered: {0}")]
    UnknownFunction(String),
}

/// Process-wide, wire-safe function-name -> closure table used to resolve
/// `Task::function_name` into something executable at the node that
/// received it. Populated at startup and treated as read-only afterward;
/// the `RwLock` only exists to let a node register builtins plus any
/// application-specific functions before serving traffic.
#[derive(Default)]
pub struct FunctionRegistry {
    functions: RwLock<HashMap<String, Func>>,
}

impl FunctionRegistry {
    pub fn new() -> Self {
        FunctionRegistry::default()
    }

    pub fn register(&self, name: impl Into<String>, f: impl Fn(Vec<Value>) -> Value + Send + Sync + 'static) {
        self.functions.write().unwrap().insert(name.into(), Arc::new(f));
    }

    pub fn exists(&self, name: &str) -> bool {
        self.functions.read().unwrap().contains_key(name)
    }

    pub fn invoke(&self, name: &str, args: Vec<Value>) -> Result<Value, FunctionRegistryError> {
        let func = self
            .functions
            .read()
            .unwrap()
            .get(name)
            .cloned()
            .ok_or_else(|| FunctionRegistryError::UnknownFunction(name.to_string()))?;
        Ok(func(args))
    }
}

#[cfg(test)]
mod tests {
    use test_r::test;

    use super::*;

    #[test]
    fn invoke_unknown_function_fails() {
        let registry = FunctionRegistry::new();
        let err = registry.invoke("nope", vec![]).unwrap_err();
        assert_eq!(err, FunctionRegistryError::UnknownFunction("nope".to_string()));
    }

    #[test]
    fn registered_function_is_invocable() {
        let registry = FunctionRegistry::new();
        assert!(!registry.exists("double"));
        registry.register("double", |args| {
            Value::new(*args[0].downcast_ref::<i32>().unwrap() * 2)
        });
        assert!(registry.exists("double"));

        let result = registry.invoke("double", vec![Value::new(21i32)]).unwrap();
        assert_eq!(result.downcast_ref::<i32>(), Some(&42));
    }
}
