//! Service wiring: builds the stores and the betting core from configuration
//! and injects them into each other.

use crate::{
    betting::{BetSummary, BettingEngine, OutcomeDraw, RngDraw, SummaryAggregator},
    config::{CasinoConfig, ConfigLoader},
    errors::CasinoResult,
    games::{GameCatalog, GameId, MemoryCatalog},
    users::{BetRecord, UserStore},
};
use std::sync::Arc;

/// Service container for dependency injection
pub struct ServiceContainer {
    config: CasinoConfig,
    users: Arc<UserStore>,
    catalog: Arc<dyn GameCatalog>,
    engine: BettingEngine,
    summaries: SummaryAggregator,
}

impl ServiceContainer {
    /// Create a container with a catalog seeded per configuration and an
    /// outcome generator seeded per `engine.rng_seed`
    pub fn new(config: CasinoConfig) -> CasinoResult<Self> {
        let catalog: Arc<dyn GameCatalog> = Arc::new(MemoryCatalog::from_config(&config.catalog)?);
        let draw: Arc<dyn OutcomeDraw> = Arc::new(RngDraw::from_seed(config.engine.rng_seed));
        Ok(Self::assemble(config, catalog, draw))
    }

    fn assemble(
        config: CasinoConfig,
        catalog: Arc<dyn GameCatalog>,
        draw: Arc<dyn OutcomeDraw>,
    ) -> Self {
        let users = Arc::new(UserStore::new(&config.registration));
        let engine = BettingEngine::new(
            Arc::clone(&users),
            Arc::clone(&catalog),
            draw,
            &config.engine,
        );
        let summaries = SummaryAggregator::new(Arc::clone(&users));

        Self {
            config,
            users,
            catalog,
            engine,
            summaries,
        }
    }

    pub fn config(&self) -> &CasinoConfig {
        &self.config
    }

    pub fn users(&self) -> &UserStore {
        &self.users
    }

    pub fn catalog(&self) -> &dyn GameCatalog {
        self.catalog.as_ref()
    }

    pub fn engine(&self) -> &BettingEngine {
        &self.engine
    }

    pub async fn place_bet(
        &self,
        username: &str,
        game_id: GameId,
        bet_amount: f64,
    ) -> CasinoResult<BetRecord> {
        self.engine.place_bet(username, game_id, bet_amount).await
    }

    pub async fn bet_summary(&self, username: &str) -> CasinoResult<BetSummary> {
        self.summaries.bet_summary(username).await
    }
}

/// Service builder for creating configured service containers
#[derive(Default)]
pub struct ServiceBuilder {
    config_path: Option<String>,
    config_override: Option<CasinoConfig>,
    catalog_override: Option<Arc<dyn GameCatalog>>,
    draw_override: Option<Arc<dyn OutcomeDraw>>,
}

impl ServiceBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from this TOML file (plus environment overrides)
    pub fn with_config_path(mut self, path: impl Into<String>) -> Self {
        self.config_path = Some(path.into());
        self
    }

    /// Use this configuration as-is, skipping file and environment
    pub fn with_config(mut self, config: CasinoConfig) -> Self {
        self.config_override = Some(config);
        self
    }

    /// Override the catalog implementation (useful for testing)
    pub fn with_catalog(mut self, catalog: Arc<dyn GameCatalog>) -> Self {
        self.catalog_override = Some(catalog);
        self
    }

    /// Override the outcome source (useful for testing)
    pub fn with_draw(mut self, draw: Arc<dyn OutcomeDraw>) -> Self {
        self.draw_override = Some(draw);
        self
    }

    pub fn build(self) -> CasinoResult<ServiceContainer> {
        let config = match (self.config_override, self.config_path) {
            (Some(config), _) => {
                ConfigLoader::validate(&config)?;
                config
            }
            (None, Some(path)) => ConfigLoader::new().with_path(path).load()?,
            (None, None) => ConfigLoader::new().load()?,
        };

        let catalog = match self.catalog_override {
            Some(catalog) => catalog,
            None => Arc::new(MemoryCatalog::from_config(&config.catalog)?),
        };
        let draw = self
            .draw_override
            .unwrap_or_else(|| Arc::new(RngDraw::from_seed(config.engine.rng_seed)));

        Ok(ServiceContainer::assemble(config, catalog, draw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::betting::FixedDraw;
    use crate::games::Game;

    #[test]
    fn test_service_container_creation() {
        let container = ServiceContainer::new(CasinoConfig::instant(1)).unwrap();
        assert_eq!(container.catalog().list().len(), 3);
        assert!(container.users().is_empty());
    }

    #[test]
    fn test_builder_rejects_invalid_config() {
        let mut config = CasinoConfig::instant(1);
        config.engine.bet_timeout_ms = 0;
        assert!(ServiceBuilder::new().with_config(config).build().is_err());
    }

    #[test]
    fn test_builder_loads_config_path() {
        use std::io::Write;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[engine]\nsettle_delay_ms = 0\n\n[registration]\nminimum_age = 21").unwrap();

        let container = ServiceBuilder::new()
            .with_config_path(file.path().to_string_lossy())
            .build()
            .unwrap();
        assert_eq!(container.config().registration.minimum_age, 21);
        assert_eq!(container.config().engine.settle_delay_ms, 0);
    }

    #[tokio::test]
    async fn test_service_builder_overrides() {
        let catalog = Arc::new(MemoryCatalog::new());
        catalog.put(Game::new(4, "Lucky Spin", 0.5, 2.0, 5.0, 100.0)).unwrap();

        let container = ServiceBuilder::new()
            .with_config(CasinoConfig::instant(1))
            .with_catalog(catalog)
            .with_draw(Arc::new(FixedDraw(0.1)))
            .build()
            .unwrap();

        container
            .users()
            .register(crate::users::NewUser::new(
                "Bo",
                "bo123",
                chrono::NaiveDate::from_ymd_opt(1990, 1, 1).unwrap(),
            ))
            .unwrap();
        container.users().deposit("bo123", 100.0).await.unwrap();

        let record = container.place_bet("bo123", GameId(4), 10.0).await.unwrap();
        assert!(record.win);

        let summary = container.bet_summary("bo123").await.unwrap();
        assert_eq!(summary.number_of_bets, 1);
        assert_eq!(summary.total_won, 20.0);
    }
}
