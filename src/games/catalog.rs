//! Game catalog: read-mostly mapping from game id to betting rules.

use crate::config::CatalogConfig;
use crate::errors::{CasinoResult, ConfigurationError};
use crate::games::types::{Game, GameId};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

/// Lookup and upsert of game rules.
///
/// Readers get an `Arc` snapshot, so a concurrent replace is never observed
/// half-applied.
pub trait GameCatalog: Send + Sync {
    /// Look up a game by identifier
    fn get(&self, id: GameId) -> Option<Arc<Game>>;

    /// Validate and insert or replace a game by identifier
    fn put(&self, game: Game) -> CasinoResult<Arc<Game>>;

    /// All games, ordered by identifier
    fn list(&self) -> Vec<Arc<Game>>;

    /// Validate every game, then upsert them all. Nothing is inserted when
    /// any game is invalid. Returns the number of games written.
    fn put_all(&self, games: Vec<Game>) -> CasinoResult<usize> {
        for game in &games {
            game.validate()?;
        }
        let count = games.len();
        for game in games {
            self.put(game)?;
        }
        Ok(count)
    }
}

/// In-memory catalog backed by a sharded map
#[derive(Default)]
pub struct MemoryCatalog {
    games: DashMap<GameId, Arc<Game>>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self {
            games: DashMap::new(),
        }
    }

    /// Catalog preloaded with [`default_games`]
    pub fn with_defaults() -> Self {
        let catalog = Self::new();
        for game in default_games() {
            catalog.games.insert(game.id, Arc::new(game));
        }
        catalog
    }

    /// Seed a catalog from configuration.
    ///
    /// A configured file that cannot be read or parsed falls back to the
    /// built-in games with a warning; invalid game definitions are an error.
    pub fn from_config(config: &CatalogConfig) -> CasinoResult<Self> {
        let Some(ref path) = config.games_file else {
            info!("No games file configured, loading default games");
            return Ok(Self::with_defaults());
        };

        match load_games_file(path) {
            Ok(games) => {
                let catalog = Self::new();
                let count = catalog.put_all(games)?;
                info!(path = %path, count, "Loaded games from file");
                Ok(catalog)
            }
            Err(e) => {
                warn!(path = %path, error = %e, "Failed to load games file, falling back to default games");
                Ok(Self::with_defaults())
            }
        }
    }

    pub fn len(&self) -> usize {
        self.games.len()
    }

    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }
}

impl GameCatalog for MemoryCatalog {
    fn get(&self, id: GameId) -> Option<Arc<Game>> {
        self.games.get(&id).map(|entry| Arc::clone(entry.value()))
    }

    fn put(&self, game: Game) -> CasinoResult<Arc<Game>> {
        game.validate()?;
        let game = Arc::new(game);
        self.games.insert(game.id, Arc::clone(&game));
        Ok(game)
    }

    fn list(&self) -> Vec<Arc<Game>> {
        let mut games: Vec<Arc<Game>> = self
            .games
            .iter()
            .map(|entry| Arc::clone(entry.value()))
            .collect();
        games.sort_by_key(|game| game.id);
        games
    }
}

/// Built-in games used when no catalog file is configured
pub fn default_games() -> Vec<Game> {
    vec![
        Game::new(1, "Slot Machine", 0.2, 5.0, 1.0, 100.0),
        Game::new(2, "Roulette", 0.4, 2.5, 2.0, 50.0),
        Game::new(3, "Blackjack", 0.5, 2.0, 5.0, 200.0),
    ]
}

/// On-disk catalog layout: a list of `[[games]]` tables
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct GameList {
    #[serde(default)]
    pub games: Vec<Game>,
}

/// Parse a catalog document
pub fn parse_games(content: &str) -> CasinoResult<Vec<Game>> {
    let list: GameList = toml::from_str(content)?;
    Ok(list.games)
}

/// Read and parse a catalog file without validating the games
pub fn load_games_file<P: AsRef<Path>>(path: P) -> CasinoResult<Vec<Game>> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| {
        ConfigurationError::LoadFailed(format!("Failed to read {}: {}", path.display(), e))
    })?;
    parse_games(&content)
}
