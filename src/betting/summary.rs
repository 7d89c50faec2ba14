use crate::errors::{CasinoError, CasinoResult};
use crate::users::{BetRecord, UserStore};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Aggregate counters over a user's bet history
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct BetSummary {
    pub number_of_bets: usize,
    pub total_bet: f64,
    pub total_won: f64,
}

impl BetSummary {
    pub fn from_history(history: &[BetRecord]) -> Self {
        history.iter().fold(Self::default(), |acc, record| Self {
            number_of_bets: acc.number_of_bets + 1,
            total_bet: acc.total_bet + record.amount_bet,
            total_won: acc.total_won + record.amount_won,
        })
    }
}

/// Read-only folds over user histories
pub struct SummaryAggregator {
    users: Arc<UserStore>,
}

impl SummaryAggregator {
    pub fn new(users: Arc<UserStore>) -> Self {
        Self { users }
    }

    /// Summarize a user's history. Waits for any in-flight bet of that user
    /// to commit or abort first.
    pub async fn bet_summary(&self, username: &str) -> CasinoResult<BetSummary> {
        let account = self
            .users
            .account(username)
            .ok_or_else(|| CasinoError::user_not_found(username))?;
        let user = account.lock().await;
        Ok(BetSummary::from_history(user.bet_history()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;
    use crate::games::GameId;
    use crate::users::NewUser;
    use chrono::NaiveDate;

    #[test]
    fn test_empty_history() {
        assert_eq!(
            BetSummary::from_history(&[]),
            BetSummary {
                number_of_bets: 0,
                total_bet: 0.0,
                total_won: 0.0
            }
        );
    }

    #[test]
    fn test_sums_match_history() {
        let history = [
            BetRecord { game_id: GameId(1), amount_bet: 10.0, amount_won: 50.0, win: true },
            BetRecord { game_id: GameId(2), amount_bet: 4.0, amount_won: 0.0, win: false },
            BetRecord { game_id: GameId(3), amount_bet: 6.0, amount_won: 12.0, win: true },
        ];
        let summary = BetSummary::from_history(&history);
        assert_eq!(summary.number_of_bets, 3);
        assert_eq!(summary.total_bet, 20.0);
        assert_eq!(summary.total_won, 62.0);
    }

    #[tokio::test]
    async fn test_summary_for_new_and_unknown_users() {
        let users = Arc::new(UserStore::default());
        users
            .register_on(
                NewUser::new("Bo", "bo123", NaiveDate::from_ymd_opt(2000, 1, 1).unwrap()),
                NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            )
            .unwrap();
        let aggregator = SummaryAggregator::new(users);

        assert_eq!(
            aggregator.bet_summary("bo123").await.unwrap(),
            BetSummary::default()
        );
        assert_eq!(
            aggregator.bet_summary("ghost").await.unwrap_err().kind(),
            ErrorKind::NotFound
        );
    }
}
