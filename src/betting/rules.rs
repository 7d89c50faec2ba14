//! Ordered bet preconditions.
//!
//! [`BET_PRECONDITIONS`] is evaluated front to back and the first failure is
//! returned. Every check is read-only; nothing is mutated until all pass.

use crate::errors::{CasinoError, CasinoResult};
use crate::games::{Game, GameId};
use crate::users::User;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Precondition {
    /// The user is registered
    UserExists,
    /// The stake is strictly positive
    PositiveStake,
    /// The balance covers the stake
    SufficientFunds,
    /// The game is in the catalog
    GameExists,
    /// The stake lies within the game's `[min_bet, max_bet]`
    WithinLimits,
}

pub const BET_PRECONDITIONS: [Precondition; 5] = [
    Precondition::UserExists,
    Precondition::PositiveStake,
    Precondition::SufficientFunds,
    Precondition::GameExists,
    Precondition::WithinLimits,
];

/// Everything a bet is checked against. `user` is borrowed from inside the
/// user's critical section.
pub(crate) struct BetContext<'a> {
    pub(crate) username: &'a str,
    pub(crate) game_id: GameId,
    pub(crate) amount: f64,
    pub(crate) user: Option<&'a mut User>,
    pub(crate) game: Option<Arc<Game>>,
}

/// A bet that passed every precondition, ready to commit
pub(crate) struct AdmittedBet<'a> {
    pub(crate) user: &'a mut User,
    pub(crate) game: Arc<Game>,
    pub(crate) amount: f64,
}

impl Precondition {
    pub(crate) fn check(&self, ctx: &BetContext<'_>) -> CasinoResult<()> {
        match self {
            Precondition::UserExists => match ctx.user {
                Some(_) => Ok(()),
                None => Err(CasinoError::user_not_found(ctx.username)),
            },
            Precondition::PositiveStake => {
                // NaN fails this comparison too
                if ctx.amount > 0.0 {
                    Ok(())
                } else {
                    Err(CasinoError::InvalidArgument(format!(
                        "bet amount {} must be greater than 0",
                        ctx.amount
                    )))
                }
            }
            Precondition::SufficientFunds => {
                let balance = ctx.user.as_deref().map_or(0.0, User::balance);
                if balance >= ctx.amount {
                    Ok(())
                } else {
                    Err(CasinoError::InsufficientFunds {
                        balance,
                        requested: ctx.amount,
                    })
                }
            }
            Precondition::GameExists => match ctx.game {
                Some(_) => Ok(()),
                None => Err(game_not_found(ctx.game_id)),
            },
            Precondition::WithinLimits => match ctx.game.as_deref() {
                Some(game) if game.accepts_stake(ctx.amount) => Ok(()),
                Some(game) => Err(CasinoError::InvalidArgument(format!(
                    "bet {} not within game {} limits [{}, {}]",
                    ctx.amount, game.id, game.min_bet, game.max_bet
                ))),
                None => Err(game_not_found(ctx.game_id)),
            },
        }
    }
}

/// Run [`BET_PRECONDITIONS`] in order and hand back the checked parts
pub(crate) fn admit(ctx: BetContext<'_>) -> CasinoResult<AdmittedBet<'_>> {
    for precondition in BET_PRECONDITIONS {
        precondition.check(&ctx)?;
    }

    match (ctx.user, ctx.game) {
        (Some(user), Some(game)) => Ok(AdmittedBet {
            user,
            game,
            amount: ctx.amount,
        }),
        (None, _) => Err(CasinoError::user_not_found(ctx.username)),
        (_, None) => Err(game_not_found(ctx.game_id)),
    }
}

fn game_not_found(game_id: GameId) -> CasinoError {
    CasinoError::NotFound(format!("game {}", game_id))
}
