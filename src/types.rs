// Battlesnake API Types
// See https://docs.battlesnake.com/api
//
// Rows grow downward on this board: "up" decrements y.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Game metadata including ID, ruleset, and timeout
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct Game {
    pub id: String,
    #[serde(default)]
    pub ruleset: HashMap<String, Value>,
    #[serde(default)]
    pub timeout: u32,
}

/// Board state including dimensions, food, snakes, and hazards
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct Board {
    pub height: i32,
    pub width: i32,
    #[serde(default)]
    pub food: Vec<Coord>,
    #[serde(default)]
    pub snakes: Vec<Battlesnake>,
    #[serde(default)]
    pub hazards: Vec<Coord>,
}

impl Board {
    /// Returns true if the coordinate lies on the board
    pub fn contains(&self, coord: &Coord) -> bool {
        coord.x >= 0 && coord.x < self.width && coord.y >= 0 && coord.y < self.height
    }

    /// Total number of cells on the board, widened so oversized boards cannot overflow
    pub fn area(&self) -> i64 {
        i64::from(self.width.max(0)) * i64::from(self.height.max(0))
    }
}

/// Snake representation with all state information
#[derive(Deserialize, Serialize, Debug, Clone, Default)]
pub struct Battlesnake {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub health: i32,
    pub body: Vec<Coord>,
    #[serde(default)]
    pub latency: String,
    #[serde(default)]
    pub shout: Option<String>,
}

impl Battlesnake {
    pub fn head(&self) -> Option<Coord> {
        self.body.first().copied()
    }

    pub fn tail(&self) -> Option<Coord> {
        self.body.last().copied()
    }
}

/// 2D coordinate on the board
#[derive(Deserialize, Serialize, Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct Coord {
    pub x: i32,
    pub y: i32,
}

impl Coord {
    pub fn new(x: i32, y: i32) -> Self {
        Coord { x, y }
    }

    /// Calculates Manhattan distance between two coordinates
    pub fn manhattan(&self, other: &Coord) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }
}

/// Represents the four possible movement directions for a Battlesnake
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// Next-direction preference for each heading while tracing the maze walls.
/// Indexed by `Direction::slot`: counter-clockwise turn, straight, clockwise turn, reverse.
const TURN_PRIORITY: [[Direction; 4]; 4] = [
    // Up
    [Direction::Left, Direction::Up, Direction::Right, Direction::Down],
    // Down
    [Direction::Right, Direction::Down, Direction::Left, Direction::Up],
    // Left
    [Direction::Down, Direction::Left, Direction::Up, Direction::Right],
    // Right
    [Direction::Up, Direction::Right, Direction::Down, Direction::Left],
];

impl Direction {
    /// Returns all possible directions
    pub fn all() -> [Direction; 4] {
        [Direction::Up, Direction::Down, Direction::Left, Direction::Right]
    }

    /// Order used when every neighbour is lethal and a move must still be sent
    pub fn fallback_order() -> [Direction; 4] {
        [Direction::Up, Direction::Left, Direction::Right, Direction::Down]
    }

    /// Converts direction to string representation for API response
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }

    /// Parses a move string as sent by the game host (case-insensitive)
    pub fn parse(s: &str) -> Result<Direction, String> {
        match s.to_lowercase().as_str() {
            "up" => Ok(Direction::Up),
            "down" => Ok(Direction::Down),
            "left" => Ok(Direction::Left),
            "right" => Ok(Direction::Right),
            _ => Err(format!("Invalid direction: {}", s)),
        }
    }

    /// Calculates the next coordinate when moving in this direction
    pub fn apply(&self, coord: &Coord) -> Coord {
        match self {
            Direction::Up => Coord { x: coord.x, y: coord.y - 1 },
            Direction::Down => Coord { x: coord.x, y: coord.y + 1 },
            Direction::Left => Coord { x: coord.x - 1, y: coord.y },
            Direction::Right => Coord { x: coord.x + 1, y: coord.y },
        }
    }

    pub fn opposite(&self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// Quarter turn with the board interior on the walker's right
    pub fn clockwise(&self) -> Direction {
        match self {
            Direction::Up => Direction::Right,
            Direction::Right => Direction::Down,
            Direction::Down => Direction::Left,
            Direction::Left => Direction::Up,
        }
    }

    pub fn counter_clockwise(&self) -> Direction {
        self.clockwise().opposite()
    }

    /// Candidate next headings for the wall follower, most preferred first
    pub fn turn_priority(&self) -> &'static [Direction; 4] {
        &TURN_PRIORITY[self.slot()]
    }

    fn slot(&self) -> usize {
        match self {
            Direction::Up => 0,
            Direction::Down => 1,
            Direction::Left => 2,
            Direction::Right => 3,
        }
    }
}

/// Complete game state received from the API
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct GameState {
    pub game: Game,
    #[serde(default)]
    pub turn: i32,
    pub board: Board,
    pub you: Battlesnake,
}

/// Body of `/end`; only the game id is required
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct EndRequest {
    pub game: Game,
    #[serde(default)]
    pub turn: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_turn_priority_prefers_counter_clockwise_turn() {
        for heading in Direction::all() {
            let priority = heading.turn_priority();
            assert_eq!(priority[0], heading.counter_clockwise());
            assert_eq!(priority[1], heading);
            assert_eq!(priority[2], heading.clockwise());
            assert_eq!(priority[3], heading.opposite());
        }
    }

    #[test]
    fn test_turn_priority_table_for_right() {
        assert_eq!(
            Direction::Right.turn_priority(),
            &[Direction::Up, Direction::Right, Direction::Down, Direction::Left]
        );
    }

    #[test]
    fn test_apply_uses_downward_rows() {
        let origin = Coord::new(2, 2);
        assert_eq!(Direction::Up.apply(&origin), Coord::new(2, 1));
        assert_eq!(Direction::Down.apply(&origin), Coord::new(2, 3));
        assert_eq!(Direction::Left.apply(&origin), Coord::new(1, 2));
        assert_eq!(Direction::Right.apply(&origin), Coord::new(3, 2));
    }

    #[test]
    fn test_area_of_oversized_board_does_not_overflow() {
        let board = Board {
            width: 100_000,
            height: 100_000,
            food: vec![],
            snakes: vec![],
            hazards: vec![],
        };
        assert_eq!(board.area(), 10_000_000_000);

        let negative = Board { width: -4, ..board };
        assert_eq!(negative.area(), 0);
    }

    #[test]
    fn test_parse_direction() {
        assert_eq!(Direction::parse("UP").unwrap(), Direction::Up);
        assert_eq!(Direction::parse("left").unwrap(), Direction::Left);
        assert!(Direction::parse("north").is_err());
    }

    #[test]
    fn test_move_request_without_optional_fields_parses() {
        let raw = r#"{
            "game": {"id": "g1"},
            "board": {"width": 4, "height": 4, "food": [{"x": 1, "y": 1}],
                      "snakes": [{"id": "me", "body": [{"x": 0, "y": 0}]}]},
            "you": {"id": "me", "body": [{"x": 0, "y": 0}]}
        }"#;
        let state: GameState = serde_json::from_str(raw).unwrap();
        assert_eq!(state.game.id, "g1");
        assert_eq!(state.turn, 0);
        assert_eq!(state.board.snakes[0].body.len(), 1);
        assert_eq!(state.you.head(), Some(Coord::new(0, 0)));
    }
}
