pub mod analysis;
pub mod network;
pub mod solver;

pub use analysis::{analyze_flow, FlowMetrics};
pub use network::{FlowNetwork, NetworkBuilder, NetworkInfo};
pub use solver::{solve_max_flow, MaxFlowSolution};
