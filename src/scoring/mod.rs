pub mod engine;
pub mod rubric;

pub use engine::{
    classify, score_predictions, ClassifiedGuess, MatchReport, ParticipantTotal, ScoreCell,
    Scoreboard,
};
pub use rubric::{score_cell, Tier};
