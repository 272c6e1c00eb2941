use orion_core::encode_i32_arg;
use orion_rpc::TaskRequest;

#[cfg(test)]
test_r::enable!();

/// The two canonical smoke-test tasks: `task-A = add(3, 7)` and
/// `task-B = mul(6, 7)`. Factored out of `main` so it can be exercised
/// without a running head.
pub fn canonical_requests() -> Vec<TaskRequest> {
    vec![
        TaskRequest {
            task_id: "task-A".to_string(),
            function_name: "add".to_string(),
            dep_ids: Vec::new(),
            args: vec![encode_i32_arg(3), encode_i32_arg(7)],
        },
        TaskRequest {
            task_id: "task-B".to_string(),
            function_name: "mul".to_string(),
            dep_ids: Vec::new(),
            args: vec![encode_i32_arg(6), encode_i32_arg(7)],
        },
    ]
}

#[cfg(test)]
mod tests {
    use test_r::test;

    use super::*;

    #[test]
    fn canonical_requests_cover_add_and_mul() {
        let requests = canonical_requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].task_id, "task-A");
        assert_eq!(requests[0].function_name, "add");
        assert_eq!(requests[0].args.len(), 2);
        assert_eq!(requests[1].task_id, "task-B");
        assert_eq!(requests[1].function_name, "mul");
    }
}
