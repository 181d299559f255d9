// Per-turn safety check for candidate cells
//
// Built fresh from each board snapshot. Nothing is cached: the board is small
// and every query re-reads the snapshot.

use crate::types::{Battlesnake, Board, Coord};

pub struct CollisionOracle<'a> {
    board: &'a Board,
    you: &'a Battlesnake,
}

impl<'a> CollisionOracle<'a> {
    pub fn new(board: &'a Board, you: &'a Battlesnake) -> Self {
        CollisionOracle { board, you }
    }

    /// A cell is unsafe if it is off the board, on any snake's body, or next to
    /// the head of an opponent at least as long as us (we would lose the head-on).
    pub fn is_unsafe(&self, coord: &Coord) -> bool {
        if !self.board.contains(coord) {
            return true;
        }
        if self.you.body.contains(coord) {
            return true;
        }
        self.opponents().any(|snake| {
            if snake.body.contains(coord) {
                return true;
            }
            match snake.head() {
                Some(head) => {
                    snake.body.len() >= self.you.body.len() && head.manhattan(coord) == 1
                }
                None => false,
            }
        })
    }

    /// Every snake on the board other than our own
    fn opponents(&self) -> impl Iterator<Item = &'a Battlesnake> + 'a {
        let board: &'a Board = self.board;
        let you_id: &'a str = self.you.id.as_str();
        board.snakes.iter().filter(move |snake| snake.id != you_id)
    }
}
