// Welcome to
// __________         __    __  .__                               __
// \______   \_____ _/  |__/  |_|  |   ____   ______ ____ _____  |  | __ ____
//  |    |  _/\__  \\   __\   __\  | _/ __ \ /  ___//    \\__  \ |  |/ // __ \
//  |    |   \ / __ \|  |  |  | |  |_\  ___/ \___ \|   |  \/ __ \|    <\  ___/
//  |________/(______/__|  |__| |____/\_____>______>___|__(______/__|__\\_____>
//
// The bot follows a Hamiltonian tour built from a random maze at game start,
// so it can never trap itself, and takes bounded shortcuts toward food.

use log::{info, warn};
use serde_json::{json, Value};

use crate::config::Config;
use crate::debug_logger::{DebugLogger, MoveLogEntry};
use crate::error::HamiltonError;
use crate::maze::GridDimensions;
use crate::move_selector::MoveSelector;
use crate::session::{Session, SessionStore};
use crate::types::{EndRequest, GameState};

/// Battlesnake Bot with OOP-style API
/// Owns the session registry and exposes methods corresponding to API endpoints
pub struct Bot {
    config: Config,
    sessions: SessionStore,
    logger: DebugLogger,
}

impl Bot {
    /// Creates a new Bot instance with diagnostics disabled
    ///
    /// # Arguments
    /// * `config` - Static configuration that does not change during the bot's lifetime
    pub fn new(config: Config) -> Self {
        Bot::with_logger(config, DebugLogger::disabled())
    }

    pub fn with_logger(config: Config, logger: DebugLogger) -> Self {
        Bot {
            config,
            sessions: SessionStore::new(),
            logger,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    /// Returns bot metadata and appearance
    /// Corresponds to GET / endpoint
    pub fn info(&self) -> Value {
        let appearance = &self.config.appearance;
        json!({
            "apiversion": appearance.apiversion,
            "author": appearance.author,
            "color": appearance.color,
            "head": appearance.head,
            "tail": appearance.tail,
        })
    }

    /// Builds the maze and tour for a new game and registers the session
    /// Corresponds to POST /start endpoint
    pub fn start(&self, state: &GameState) -> Result<Value, HamiltonError> {
        let dimensions = GridDimensions::new(state.board.width, state.board.height)?;
        let seed = self.config.maze.seed.unwrap_or_else(rand::random);

        let session = Session::build(&state.game.id, dimensions, seed)?;
        if self.sessions.insert(session).is_some() {
            warn!("Game {} started twice, previous session replaced", state.game.id);
        }

        info!("GAME START {} ({} active)", state.game.id, self.sessions.len());

        let appearance = &self.config.appearance;
        Ok(json!({
            "color": appearance.color,
            "headType": appearance.head,
            "tailType": appearance.tail,
        }))
    }

    /// Computes the next move along the game's tour
    /// Corresponds to POST /move endpoint
    pub fn get_move(&self, state: &GameState) -> Result<Value, HamiltonError> {
        let session = self.sessions.get(&state.game.id)?;
        session.record_board(&state.board);

        let selector = MoveSelector::new(session.tour(), &self.config.heuristic);
        let decision = selector.select_move(&state.board, &state.you);

        if decision.trapped {
            warn!(
                "Game {} turn {}: no safe move, sending {}",
                state.game.id,
                state.turn,
                decision.direction.as_str()
            );
        }
        info!(
            "Game {} turn {}: {} (budget: {}, shortcut: {:?}, trapped: {})",
            state.game.id,
            state.turn,
            decision.direction.as_str(),
            decision.cutting_budget,
            decision.shortcut,
            decision.trapped
        );

        self.logger.log_move(MoveLogEntry::new(
            &session,
            state.turn,
            &state.board,
            &state.you,
            decision.direction,
        ));

        Ok(json!({ "move": decision.direction.as_str() }))
    }

    /// Drops the session, dumping its maze and tour first when diagnostics are on
    /// Corresponds to POST /end endpoint
    pub fn end(&self, request: &EndRequest) -> Result<(), HamiltonError> {
        let session = self.sessions.remove(&request.game.id)?;
        self.logger.dump_session(&session);

        info!(
            "GAME OVER {} after turn {} (last board seen: {})",
            request.game.id,
            request.turn,
            session.last_board().is_some()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Battlesnake, Board, Coord, Game};

    fn state(id: &str, width: i32, height: i32, body: Vec<Coord>) -> GameState {
        let you = Battlesnake {
            id: "me".to_string(),
            body,
            ..Default::default()
        };
        GameState {
            game: Game {
                id: id.to_string(),
                ruleset: Default::default(),
                timeout: 500,
            },
            turn: 0,
            board: Board {
                width,
                height,
                food: vec![],
                snakes: vec![you.clone()],
                hazards: vec![],
            },
            you,
        }
    }

    #[test]
    fn test_start_rejects_odd_board() {
        let bot = Bot::new(Config::default_hardcoded());
        let result = bot.start(&state("odd", 11, 11, vec![Coord::new(1, 1)]));
        assert_eq!(
            result.unwrap_err(),
            HamiltonError::InvalidBoardDimensions { width: 11, height: 11 }
        );
        assert!(bot.sessions().is_empty());
    }

    #[test]
    fn test_start_move_end_lifecycle() {
        let bot = Bot::new(Config::default_hardcoded());
        let game = state("g", 8, 8, vec![Coord::new(3, 3), Coord::new(3, 4), Coord::new(3, 5)]);

        let start = bot.start(&game).unwrap();
        assert_eq!(start["color"], "#DFFF00");
        assert_eq!(bot.sessions().len(), 1);

        let response = bot.get_move(&game).unwrap();
        let chosen = response["move"].as_str().unwrap();
        assert!(["up", "down", "left", "right"].contains(&chosen));

        let end = EndRequest {
            game: game.game.clone(),
            turn: 1,
        };
        bot.end(&end).unwrap();
        assert!(bot.sessions().is_empty());
        assert!(matches!(bot.end(&end), Err(HamiltonError::UnknownSession(_))));
    }

    #[test]
    fn test_move_for_unknown_game_is_an_error() {
        let bot = Bot::new(Config::default_hardcoded());
        let result = bot.get_move(&state("nope", 8, 8, vec![Coord::new(0, 0)]));
        assert_eq!(
            result.unwrap_err(),
            HamiltonError::UnknownSession("nope".to_string())
        );
    }

    #[test]
    fn test_fixed_seed_gives_identical_tours() {
        let mut config = Config::default_hardcoded();
        config.maze.seed = Some(1234);
        let bot = Bot::new(config);
        bot.start(&state("a", 10, 8, vec![Coord::new(0, 0)])).unwrap();
        bot.start(&state("b", 10, 8, vec![Coord::new(0, 0)])).unwrap();
        let a = bot.sessions().get("a").unwrap();
        let b = bot.sessions().get("b").unwrap();
        assert_eq!(a.tour(), b.tour());
    }
}
