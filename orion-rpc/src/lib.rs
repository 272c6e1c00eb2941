//! Generated protobuf/tonic types for the Orion head/node RPC contract.
//!
//! The message and service definitions live in `proto/orion.proto`; nothing
//! in this crate carries behavior beyond field-level conversions used by
//! `orion-cluster` and the `orion-head` / `orion-node` binaries.

tonic_prost::include_proto!("orion");

#[cfg(test)]
test_r::enable!();

#[cfg(test)]
mod tests {
    use test_r::test;

    use super::*;

    /// Wire encoding of `TaskRequest` round-trips fields exactly, including
    /// byte identity of `args`.
    #[test]
    fn task_request_round_trips_through_prost_bytes() {
        use prost::Message;

        let original = TaskRequest {
            task_id: "task-A".to_string(),
            function_name: "add".to_string(),
            dep_ids: vec!["X".to_string(), "Y".to_string()],
            args: vec![vec![3, 0, 0, 0], vec![7, 0, 0, 0]],
        };

        let mut buf = Vec::new();
        original.encode(&mut buf).expect("encode succeeds");
        let decoded = TaskRequest::decode(buf.as_slice()).expect("decode succeeds");

        assert_eq!(decoded, original);
        assert_eq!(decoded.args, original.args);
    }
}
