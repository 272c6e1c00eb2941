use std::collections::HashMap;
use std::sync::Mutex;

/// `{node_id, address, available_workers, alive}`, created at registration
/// and mutated by heartbeat/removal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NodeInfo {
    pub node_id: String,
    pub address: String,
    pub available_workers: i32,
    pub alive: bool,
}

struct State {
    nodes: HashMap<String, NodeInfo>,
    round_robin_cursor: usize,
}

/// Thread-safe mapping of node_id -> NodeInfo with round-robin selection
/// over the currently-alive subset.
pub struct NodeRegistry {
    state: Mutex<State>,
}

impl Default for NodeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl NodeRegistry {
    pub fn new() -> Self {
        NodeRegistry {
            state: Mutex::new(State {
                nodes: HashMap::new(),
                round_robin_cursor: 0,
            }),
        }
    }

    pub fn register_node(&self, info: NodeInfo) {
        self.state.lock().unwrap().nodes.insert(info.node_id.clone(), info);
    }

    pub fn remove_node(&self, node_id: &str) {
        self.state.lock().unwrap().nodes.remove(node_id);
    }

    pub fn heartbeat(&self, node_id: &str) {
        if let Some(node) = self.state.lock().unwrap().nodes.get_mut(node_id) {
            node.alive = true;
        }
    }

    /// Snapshot of currently-alive nodes.
    pub fn nodes(&self) -> Vec<NodeInfo> {
        self.state
            .lock()
            .unwrap()
            .nodes
            .values()
            .filter(|node| node.alive)
            .cloned()
            .collect()
    }

    /// Round-robin over the alive subset, tie-broken by lexicographic
    /// node_id order before indexing. The cursor always advances, even if
    /// the alive set shrinks or grows between calls.
    pub fn pick_node(&self) -> Option<NodeInfo> {
        let mut state = self.state.lock().unwrap();
        let mut alive: Vec<NodeInfo> = state.nodes.values().filter(|n| n.alive).cloned().collect();
        if alive.is_empty() {
            return None;
        }
        alive.sort_by(|a, b| a.node_id.cmp(&b.node_id));

        let chosen = alive[state.round_robin_cursor % alive.len()].clone();
        state.round_robin_cursor = state.round_robin_cursor.wrapping_add(1);
        Some(chosen)
    }
}
