pub mod engine;
pub mod normalize;
pub mod strategy;

#[cfg(test)]
mod engine_tests;

pub use engine::{score, sub_scores, SubScores};
pub use normalize::*;
pub use strategy::{ScoreWeights, ScoringStrategy, StopLossRule};
