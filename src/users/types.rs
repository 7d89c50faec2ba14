use crate::games::GameId;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Outcome of one settled bet. Immutable once created.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct BetRecord {
    pub game_id: GameId,
    pub amount_bet: f64,
    /// Zero unless `win`
    pub amount_won: f64,
    pub win: bool,
}

/// Registration request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewUser {
    pub name: String,
    pub username: String,
    pub birthdate: Option<NaiveDate>,
    /// Opening balance
    #[serde(default)]
    pub balance: f64,
}

impl NewUser {
    pub fn new(name: impl Into<String>, username: impl Into<String>, birthdate: NaiveDate) -> Self {
        Self {
            name: name.into(),
            username: username.into(),
            birthdate: Some(birthdate),
            balance: 0.0,
        }
    }

    pub fn with_balance(mut self, balance: f64) -> Self {
        self.balance = balance;
        self
    }
}

/// Registered player. Balance and history only change through the store's
/// per-user lock.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub name: String,
    pub username: String,
    pub birthdate: NaiveDate,
    balance: f64,
    bet_history: Vec<BetRecord>,
}

impl User {
    pub(crate) fn new(name: String, username: String, birthdate: NaiveDate, balance: f64) -> Self {
        Self {
            name,
            username,
            birthdate,
            balance,
            bet_history: Vec::new(),
        }
    }

    pub fn balance(&self) -> f64 {
        self.balance
    }

    /// Settled bets, oldest first
    pub fn bet_history(&self) -> &[BetRecord] {
        &self.bet_history
    }

    pub(crate) fn debit(&mut self, amount: f64) {
        self.balance -= amount;
    }

    pub(crate) fn credit(&mut self, amount: f64) {
        self.balance += amount;
    }

    pub(crate) fn record_bet(&mut self, record: BetRecord) {
        self.bet_history.push(record);
    }
}
