use crate::betting::draw::OutcomeDraw;
use crate::betting::rules::{self, AdmittedBet, BetContext};
use crate::config::EngineConfig;
use crate::errors::{CasinoError, CasinoResult};
use crate::games::{GameCatalog, GameId};
use crate::users::{BetRecord, UserStore};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Validates, resolves and commits bets.
///
/// A bet holds its user's lock from validation through commit, so bets,
/// deposits and summaries for one user are serialized while other users
/// proceed independently.
pub struct BettingEngine {
    users: Arc<UserStore>,
    catalog: Arc<dyn GameCatalog>,
    draw: Arc<dyn OutcomeDraw>,
    settle_delay: Duration,
    bet_timeout: Duration,
}

impl BettingEngine {
    pub fn new(
        users: Arc<UserStore>,
        catalog: Arc<dyn GameCatalog>,
        draw: Arc<dyn OutcomeDraw>,
        config: &EngineConfig,
    ) -> Self {
        Self {
            users,
            catalog,
            draw,
            settle_delay: config.settle_delay(),
            bet_timeout: config.bet_timeout(),
        }
    }

    pub fn users(&self) -> &Arc<UserStore> {
        &self.users
    }

    pub fn catalog(&self) -> &Arc<dyn GameCatalog> {
        &self.catalog
    }

    /// Place a bet and return its settled record.
    ///
    /// Queues behind any in-flight operation on the same user. Fails without
    /// touching any state when a precondition fails or when the processing
    /// delay outlasts the configured timeout. Dropping the returned future
    /// before it resolves also leaves state unchanged.
    pub async fn place_bet(
        &self,
        username: &str,
        game_id: GameId,
        bet_amount: f64,
    ) -> CasinoResult<BetRecord> {
        let account = self.users.account(username);
        let mut guard = match account {
            Some(ref account) => Some(account.lock().await),
            None => None,
        };

        let bet = rules::admit(BetContext {
            username,
            game_id,
            amount: bet_amount,
            user: guard.as_deref_mut(),
            game: self.catalog.get(game_id),
        })?;

        self.await_settlement(username, game_id, bet_amount).await?;

        // No await points past here: a bet is committed entirely or not at all
        Ok(self.commit(bet))
    }

    /// Processing latency between validation and commit. Only this step is
    /// bounded; waiting for the user's lock is not.
    async fn await_settlement(
        &self,
        username: &str,
        game_id: GameId,
        bet_amount: f64,
    ) -> CasinoResult<()> {
        if self.settle_delay.is_zero() {
            return Ok(());
        }

        tokio::time::timeout(self.bet_timeout, tokio::time::sleep(self.settle_delay))
            .await
            .map_err(|_| {
                debug!(username, %game_id, bet_amount, "Bet timed out before commit");
                CasinoError::Timeout {
                    username: username.to_string(),
                    after: self.bet_timeout,
                }
            })
    }

    fn commit(&self, bet: AdmittedBet<'_>) -> BetRecord {
        let AdmittedBet { user, game, amount } = bet;

        user.debit(amount);
        let win = self.draw.draw() < game.chance_of_winning;
        let amount_won = if win { game.payout(amount) } else { 0.0 };
        if win {
            user.credit(amount_won);
        }

        let record = BetRecord {
            game_id: game.id,
            amount_bet: amount,
            amount_won,
            win,
        };
        user.record_bet(record);

        debug!(
            username = %user.username,
            game_id = %game.id,
            amount_bet = amount,
            amount_won,
            win,
            balance = user.balance(),
            "Bet settled"
        );
        record
    }
}
