pub mod draw;
pub mod engine;
pub mod rules;
pub mod summary;

pub use draw::{FixedDraw, OutcomeDraw, RngDraw};
pub use engine::BettingEngine;
pub use rules::{Precondition, BET_PRECONDITIONS};
pub use summary::{BetSummary, SummaryAggregator};
