use crate::errors::{CasinoError, CasinoResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Catalog identifier of a game
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct GameId(pub u64);

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for GameId {
    fn from(id: u64) -> Self {
        GameId(id)
    }
}

/// House-defined betting rules for one game
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Game {
    pub id: GameId,
    pub name: String,
    /// Probability of a win, in [0, 1]
    pub chance_of_winning: f64,
    /// Payout factor applied to the stake on a win
    pub winning_multiplier: f64,
    pub min_bet: f64,
    pub max_bet: f64,
}

impl Game {
    pub fn new(
        id: impl Into<GameId>,
        name: impl Into<String>,
        chance_of_winning: f64,
        winning_multiplier: f64,
        min_bet: f64,
        max_bet: f64,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            chance_of_winning,
            winning_multiplier,
            min_bet,
            max_bet,
        }
    }

    /// Check the rule ranges. NaN fails every comparison and is rejected.
    pub fn validate(&self) -> CasinoResult<()> {
        if !(0.0..=1.0).contains(&self.chance_of_winning) {
            return Err(self.invalid(format!(
                "chance_of_winning {} outside [0, 1]",
                self.chance_of_winning
            )));
        }
        if !(self.winning_multiplier >= 0.0) || !self.winning_multiplier.is_finite() {
            return Err(self.invalid(format!(
                "winning_multiplier {} must be a finite value >= 0",
                self.winning_multiplier
            )));
        }
        if !(self.min_bet >= 0.0 && self.min_bet <= self.max_bet) || !self.max_bet.is_finite() {
            return Err(self.invalid(format!(
                "bet limits [{}, {}] must satisfy 0 <= min_bet <= max_bet",
                self.min_bet, self.max_bet
            )));
        }
        Ok(())
    }

    /// Whether a stake lies within `[min_bet, max_bet]` inclusive
    pub fn accepts_stake(&self, amount: f64) -> bool {
        amount >= self.min_bet && amount <= self.max_bet
    }

    /// Payout credited on a win
    pub fn payout(&self, amount: f64) -> f64 {
        amount * self.winning_multiplier
    }

    fn invalid(&self, reason: String) -> CasinoError {
        CasinoError::InvalidArgument(format!("game {}: {}", self.id, reason))
    }
}
