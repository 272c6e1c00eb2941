use orion_common::Value;

use crate::function_registry::FunctionRegistry;

/// Registers the builtin functions a fresh node brings up by default.
pub fn register_builtins(registry: &FunctionRegistry) {
    registry.register("add", |args| {
        let a = *args[0].downcast_ref::<i32>().expect("add: arg 0 must be i32");
        let b = *args[1].downcast_ref::<i32>().expect("add: arg 1 must be i32");
        Value::new(a + b)
    });

    registry.register("mul", |args| {
        let a = *args[0].downcast_ref::<i32>().expect("mul: arg 0 must be i32");
        let b = *args[1].downcast_ref::<i32>().expect("mul: arg 1 must be i32");
        Value::new(a * b)
    });
}

#[cfg(test)]
mod tests {
    use test_r::test;

    use super::*;

    #[test]
    fn add_and_mul_builtins() {
        let registry = FunctionRegistry::new();
        register_builtins(&registry);

        let sum = registry
            .invoke("add", vec![Value::new(3i32), Value::new(7i32)])
            .unwrap();
        assert_eq!(sum.downcast_ref::<i32>(), Some(&10));

        let product = registry
            .invoke("mul", vec![Value::new(6i32), Value::new(7i32)])
            .unwrap();
        assert_eq!(product.downcast_ref::<i32>(), Some(&42));
    }
}
