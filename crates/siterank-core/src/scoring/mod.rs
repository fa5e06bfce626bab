pub mod normalize;
pub mod objectives;
pub mod target_match;

pub use normalize::normalize_objectives;
pub use objectives::{
    LocationObjectives, Objective, ObjectiveCalculator, ObjectiveVector, SubScores,
};
pub use target_match::target_match_score;
