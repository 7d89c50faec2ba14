//! User store: username → user record behind a per-user lock.
//!
//! The map itself is sharded; its shard lock is only held long enough to
//! clone a user's `Arc`. All balance and history access goes through the
//! user's own async mutex, so operations on different users never wait on
//! each other.

use crate::config::RegistrationConfig;
use crate::errors::{CasinoError, CasinoResult};
use crate::users::types::{NewUser, User};
use chrono::{Local, Months, NaiveDate};
use dashmap::{mapref::entry::Entry, DashMap};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};

/// Shared handle to one user's critical section
pub(crate) type Account = Arc<Mutex<User>>;

pub struct UserStore {
    users: DashMap<String, Account>,
    minimum_age: u32,
}

impl UserStore {
    pub fn new(config: &RegistrationConfig) -> Self {
        Self {
            users: DashMap::new(),
            minimum_age: config.minimum_age,
        }
    }

    /// Register a user, checking age against today's local date
    pub fn register(&self, new_user: NewUser) -> CasinoResult<User> {
        self.register_on(new_user, Local::now().date_naive())
    }

    /// Register a user, checking age against `today`.
    ///
    /// Checks run in order: required fields, opening balance, username
    /// uniqueness, minimum age.
    pub fn register_on(&self, new_user: NewUser, today: NaiveDate) -> CasinoResult<User> {
        let NewUser {
            name,
            username,
            birthdate,
            balance,
        } = new_user;

        let (Some(birthdate), false, false) =
            (birthdate, name.trim().is_empty(), username.trim().is_empty())
        else {
            return Err(CasinoError::InvalidArgument(
                "name, username and birthdate are required".to_string(),
            ));
        };

        if !(balance >= 0.0) || !balance.is_finite() {
            return Err(CasinoError::InvalidArgument(format!(
                "opening balance {} must be a finite value >= 0",
                balance
            )));
        }

        match self.users.entry(username.clone()) {
            Entry::Occupied(_) => Err(CasinoError::AlreadyExists(format!(
                "username '{}'",
                username
            ))),
            Entry::Vacant(slot) => {
                if !self.is_old_enough(birthdate, today) {
                    return Err(CasinoError::NotPermitted(format!(
                        "user must be at least {} years old",
                        self.minimum_age
                    )));
                }

                let user = User::new(name, username, birthdate, balance);
                slot.insert(Arc::new(Mutex::new(user.clone())));
                info!(username = %user.username, "Registered user");
                Ok(user)
            }
        }
    }

    fn is_old_enough(&self, birthdate: NaiveDate, today: NaiveDate) -> bool {
        today
            .checked_sub_months(Months::new(self.minimum_age.saturating_mul(12)))
            .map_or(false, |cutoff| birthdate <= cutoff)
    }

    /// Add funds and return the new balance
    pub async fn deposit(&self, username: &str, amount: f64) -> CasinoResult<f64> {
        let account = self
            .account(username)
            .ok_or_else(|| CasinoError::user_not_found(username))?;

        if !(amount > 0.0) || !amount.is_finite() {
            return Err(CasinoError::InvalidArgument(format!(
                "deposit amount {} must be positive",
                amount
            )));
        }

        let mut user = account.lock().await;
        if !(user.balance() + amount).is_finite() {
            return Err(CasinoError::InvalidArgument(format!(
                "deposit amount {} would overflow balance {}",
                amount,
                user.balance()
            )));
        }
        user.credit(amount);
        debug!(username, amount, balance = user.balance(), "Deposit applied");
        Ok(user.balance())
    }

    /// Snapshot of a user's current state
    pub async fn get(&self, username: &str) -> CasinoResult<User> {
        let account = self
            .account(username)
            .ok_or_else(|| CasinoError::user_not_found(username))?;
        let user = account.lock().await;
        Ok(user.clone())
    }

    pub async fn balance(&self, username: &str) -> CasinoResult<f64> {
        let account = self
            .account(username)
            .ok_or_else(|| CasinoError::user_not_found(username))?;
        let balance = account.lock().await.balance();
        Ok(balance)
    }

    /// Snapshots of all users, ordered by username
    pub async fn list(&self) -> Vec<User> {
        // Collect handles first so no shard lock is held across an await
        let accounts: Vec<Account> = self
            .users
            .iter()
            .map(|entry| Arc::clone(entry.value()))
            .collect();

        let mut users = Vec::with_capacity(accounts.len());
        for account in accounts {
            users.push(account.lock().await.clone());
        }
        users.sort_by(|a, b| a.username.cmp(&b.username));
        users
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    pub(crate) fn account(&self, username: &str) -> Option<Account> {
        self.users.get(username).map(|entry| Arc::clone(entry.value()))
    }
}

impl Default for UserStore {
    fn default() -> Self {
        Self::new(&RegistrationConfig::default())
    }
}
