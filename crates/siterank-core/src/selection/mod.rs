pub mod filters;
pub mod pareto;
pub mod rank;

pub use filters::{FilterChain, FilterKind, FilterOutcome};
pub use pareto::{dominates, pareto_front};
pub use rank::{rank_candidates, RankedCandidate};
