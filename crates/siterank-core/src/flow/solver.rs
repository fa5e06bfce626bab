//! Edmonds–Karp maximum flow.
//!
//! BFS over the residual graph finds the shortest augmenting path from
//! SOURCE to SINK; the bottleneck capacity is pushed along it, reverse
//! residual edges absorb cancellations, and the loop ends when no path
//! remains. Integer capacities guarantee each augmentation adds at least 1,
//! so termination is bounded by O(V·E) augmentations.

use std::collections::{BTreeMap, VecDeque};

use crate::flow::network::FlowNetwork;
use crate::types::{SINK, SOURCE};

/// Solved flow: the maximum value plus the per-edge assignment.
#[derive(Debug, Clone, Default)]
pub struct MaxFlowSolution {
    pub max_flow: u64,
    /// (from, to) → routed flow. Only edges that actually carry flow appear.
    pub flows: BTreeMap<(String, String), u64>,
}

impl MaxFlowSolution {
    pub fn flow(&self, from: &str, to: &str) -> u64 {
        self.flows
            .get(&(from.to_string(), to.to_string()))
            .copied()
            .unwrap_or(0)
    }
}

/// Compute the maximum SOURCE→SINK flow. Consumes the network; the residual
/// state is spent by the time the solution is returned.
pub fn solve_max_flow(mut network: FlowNetwork) -> MaxFlowSolution {
    let mut solution = MaxFlowSolution::default();

    while let Some(path) = shortest_augmenting_path(&network) {
        let bottleneck = path
            .windows(2)
            .map(|edge| network.residual_capacity(&edge[0], &edge[1]))
            .min()
            .unwrap_or(0);
        if bottleneck == 0 {
            break;
        }

        for edge in path.windows(2) {
            let (u, v) = (&edge[0], &edge[1]);
            network.adjust_residual(u, v, -(bottleneck as i64));
            network.adjust_residual(v, u, bottleneck as i64);

            // Cancel against opposing flow before recording new flow.
            let key_rev = (v.clone(), u.clone());
            let opposing = solution.flows.get(&key_rev).copied().unwrap_or(0);
            if opposing >= bottleneck {
                let remaining = opposing - bottleneck;
                if remaining == 0 {
                    solution.flows.remove(&key_rev);
                } else {
                    solution.flows.insert(key_rev, remaining);
                }
            } else {
                if opposing > 0 {
                    solution.flows.remove(&key_rev);
                }
                *solution.flows.entry((u.clone(), v.clone())).or_insert(0) +=
                    bottleneck - opposing;
            }
        }

        solution.max_flow += bottleneck;
    }

    solution
}

/// BFS for the fewest-edges augmenting path with positive residual capacity.
fn shortest_augmenting_path(network: &FlowNetwork) -> Option<Vec<String>> {
    let mut parent: BTreeMap<String, String> = BTreeMap::new();
    let mut queue = VecDeque::new();
    queue.push_back(SOURCE.to_string());

    while let Some(u) = queue.pop_front() {
        for (v, residual) in network.residual_neighbors(&u) {
            if residual == 0 || v == SOURCE || parent.contains_key(v) {
                continue;
            }
            parent.insert(v.to_string(), u.clone());
            if v == SINK {
                let mut path = vec![SINK.to_string()];
                let mut cursor = SINK.to_string();
                while let Some(prev) = parent.get(&cursor) {
                    path.push(prev.clone());
                    cursor = prev.clone();
                }
                path.reverse();
                return Some(path);
            }
            queue.push_back(v.to_string());
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn two_disjoint_paths_sum_their_capacities() {
        let mut network = FlowNetwork::new();
        network.add_edge(SOURCE, "A", 10);
        network.add_edge("A", SINK, 10);
        network.add_edge(SOURCE, "B", 5);
        network.add_edge("B", SINK, 5);

        let solution = solve_max_flow(network);
        assert_eq!(solution.max_flow, 15);
        assert_eq!(solution.flow(SOURCE, "A"), 10);
        assert_eq!(solution.flow("B", SINK), 5);
    }

    #[test]
    fn bottleneck_limits_path_flow() {
        let mut network = FlowNetwork::new();
        network.add_edge(SOURCE, "A", 100);
        network.add_edge("A", "B", 3);
        network.add_edge("B", SINK, 100);

        let solution = solve_max_flow(network);
        assert_eq!(solution.max_flow, 3);
        assert_eq!(solution.flow("A", "B"), 3);
    }

    #[test]
    fn dense_diamond_reaches_full_capacity() {
        let mut network = FlowNetwork::new();
        network.add_edge(SOURCE, "A", 10);
        network.add_edge(SOURCE, "B", 10);
        network.add_edge("A", "B", 10);
        network.add_edge("A", SINK, 10);
        network.add_edge("B", SINK, 10);

        let solution = solve_max_flow(network);
        assert_eq!(solution.max_flow, 20);
    }

    #[test]
    fn empty_network_solves_to_zero() {
        let solution = solve_max_flow(FlowNetwork::new());
        assert_eq!(solution.max_flow, 0);
        assert!(solution.flows.is_empty());
    }

    #[test]
    fn disconnected_sink_solves_to_zero() {
        let mut network = FlowNetwork::new();
        network.add_edge(SOURCE, "A", 10);
        let solution = solve_max_flow(network);
        assert_eq!(solution.max_flow, 0);
    }

    #[test]
    fn flow_respects_capacities_and_conservation() {
        let mut network = FlowNetwork::new();
        network.add_edge(SOURCE, "A", 8);
        network.add_edge(SOURCE, "B", 6);
        network.add_edge("A", "B", 3);
        network.add_edge("A", SINK, 5);
        network.add_edge("B", SINK, 9);
        let capacities = network.clone();

        let solution = solve_max_flow(network);
        assert_eq!(solution.max_flow, 14);

        for ((from, to), flow) in &solution.flows {
            assert!(
                *flow <= capacities.capacity(from, to),
                "{}→{} overflows",
                from,
                to
            );
        }
        for node in ["A", "B"] {
            let inflow: u64 = solution
                .flows
                .iter()
                .filter(|((_, to), _)| to == node)
                .map(|(_, f)| *f)
                .sum();
            let outflow: u64 = solution
                .flows
                .iter()
                .filter(|((from, _), _)| from == node)
                .map(|(_, f)| *f)
                .sum();
            assert_eq!(inflow, outflow, "conservation violated at {}", node);
        }
    }
}
