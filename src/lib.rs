//! Minicasino - in-process wagering core
//!
//! Users hold a balance and an append-only bet history. Games define a win
//! probability, a payout multiplier and stake limits. Bets are validated
//! against an ordered list of preconditions, resolved by an injected outcome
//! source and committed atomically under the owning user's lock.

pub mod betting;
pub mod config;
pub mod errors;
pub mod games;
pub mod services;
pub mod telemetry;
pub mod users;

pub use betting::{
    BetSummary, BettingEngine, FixedDraw, OutcomeDraw, Precondition, RngDraw, SummaryAggregator,
    BET_PRECONDITIONS,
};
pub use config::{CasinoConfig, ConfigLoader};
pub use errors::{CasinoError, CasinoResult, ConfigurationError, ErrorKind};
pub use games::{Game, GameCatalog, GameId, MemoryCatalog};
pub use services::{ServiceBuilder, ServiceContainer};
pub use users::{BetRecord, NewUser, User, UserStore};
