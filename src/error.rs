// Error taxonomy for session setup and lookup
//
// Per-turn edge cases (no food, no safe move, ties) are never errors; they are
// resolved inside the move selector with deterministic fallbacks.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HamiltonError {
    /// Width or height is odd or smaller than two
    #[error("invalid board dimensions {width}x{height}: both must be even and at least 2")]
    InvalidBoardDimensions { width: i32, height: i32 },

    /// Maze generation or the tour walk broke a structural invariant
    #[error("maze invariant violated: {0}")]
    MazeInvariantViolation(String),

    /// `/move` or `/end` for a game that was never started (or already ended)
    #[error("unknown session '{0}'")]
    UnknownSession(String),
}
