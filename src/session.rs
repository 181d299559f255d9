// Per-game state and the process-wide registry of running games
//
// A session owns the maze and tour built at `/start`. Both are immutable
// afterwards; only the last seen board is refreshed, for the end-of-game dump.

use log::info;
use parking_lot::{Mutex, RwLock};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use crate::error::HamiltonError;
use crate::maze::{GridDimensions, Maze};
use crate::tour::TourBuilder;
use crate::tour_index::TourIndex;
use crate::types::Board;

#[derive(Debug)]
pub struct Session {
    game_id: String,
    seed: u64,
    dimensions: GridDimensions,
    maze: Maze,
    tour: TourIndex,
    last_board: Mutex<Option<Board>>,
}

impl Session {
    /// Generates the maze and tour for a new game.
    /// The same `(seed, dimensions)` always produces the same tour.
    pub fn build(
        game_id: &str,
        dimensions: GridDimensions,
        seed: u64,
    ) -> Result<Self, HamiltonError> {
        let started = Instant::now();
        let mut rng = StdRng::seed_from_u64(seed);
        let maze = Maze::generate(dimensions, &mut rng)?;
        let tour = TourBuilder::build(&maze)?;

        info!(
            "Game {}: built {}x{} tour (seed {}) in {}us",
            game_id,
            dimensions.width(),
            dimensions.height(),
            seed,
            started.elapsed().as_micros()
        );

        Ok(Session {
            game_id: game_id.to_string(),
            seed,
            dimensions,
            maze,
            tour,
            last_board: Mutex::new(None),
        })
    }

    pub fn game_id(&self) -> &str {
        &self.game_id
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn dimensions(&self) -> GridDimensions {
        self.dimensions
    }

    pub fn maze(&self) -> &Maze {
        &self.maze
    }

    pub fn tour(&self) -> &TourIndex {
        &self.tour
    }

    /// Remembers the latest board for diagnostics
    pub fn record_board(&self, board: &Board) {
        *self.last_board.lock() = Some(board.clone());
    }

    pub fn last_board(&self) -> Option<Board> {
        self.last_board.lock().clone()
    }
}

/// Registry of running games keyed by game id.
/// One coarse lock around the map; per-turn work happens outside it.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<String, Arc<Session>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        SessionStore::default()
    }

    /// Installs a session, returning the one it replaced (same game id started twice)
    pub fn insert(&self, session: Session) -> Option<Arc<Session>> {
        self.sessions
            .write()
            .insert(session.game_id.clone(), Arc::new(session))
    }

    pub fn get(&self, game_id: &str) -> Result<Arc<Session>, HamiltonError> {
        self.sessions
            .read()
            .get(game_id)
            .cloned()
            .ok_or_else(|| HamiltonError::UnknownSession(game_id.to_string()))
    }

    pub fn remove(&self, game_id: &str) -> Result<Arc<Session>, HamiltonError> {
        self.sessions
            .write()
            .remove(game_id)
            .ok_or_else(|| HamiltonError::UnknownSession(game_id.to_string()))
    }

    pub fn len(&self) -> usize {
        self.sessions.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.read().is_empty()
    }
}
