// Per-turn move selection
//
// The snake follows the tour by default. When the board is roomy it may skip
// ahead along the tour ("cut") toward the nearest food, but never further than
// the cutting budget allows: the budget keeps a margin between the head and
// our own tail so the remaining tour is always free to follow.

use log::warn;

use crate::collision::CollisionOracle;
use crate::config::HeuristicConfig;
use crate::tour_index::TourIndex;
use crate::types::{Battlesnake, Board, Coord, Direction};

/// Outcome of one selection, with the numbers that drove it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveDecision {
    pub direction: Direction,
    pub cutting_budget: usize,
    /// Tour distance skipped by the chosen move (0 = plain tour step), `None` when trapped
    pub shortcut: Option<usize>,
    /// Every neighbour was unsafe
    pub trapped: bool,
}

/// Board measurements the budget is computed from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BudgetInputs {
    pub distance_to_food: Option<usize>,
    pub distance_to_tail: usize,
    pub body_length: usize,
    pub free_cells: i64,
    pub total_cells: i64,
}

pub struct MoveSelector<'a> {
    tour: &'a TourIndex,
    tuning: &'a HeuristicConfig,
}

impl<'a> MoveSelector<'a> {
    pub fn new(tour: &'a TourIndex, tuning: &'a HeuristicConfig) -> Self {
        MoveSelector { tour, tuning }
    }

    /// Picks the next move for `you` on `board`.
    ///
    /// Never fails: malformed snakes and fully boxed-in heads resolve to a
    /// deterministic fallback direction.
    pub fn select_move(&self, board: &Board, you: &Battlesnake) -> MoveDecision {
        let Some(head) = you.head() else {
            warn!("Snake '{}' has an empty body, sending fallback move", you.id);
            return Self::trapped(board, None, 0);
        };
        let Some(head_index) = self.tour.index_of(&head) else {
            warn!("Head {:?} is not on the tour, sending fallback move", head);
            return Self::trapped(board, Some(head), 0);
        };

        let distance_to_food = self
            .closest_food(board, &head)
            .and_then(|food| self.tour.index_of(&food))
            .map(|food_index| self.tour.circular_distance(head_index, food_index));
        let distance_to_tail = you
            .tail()
            .and_then(|tail| self.tour.index_of(&tail))
            .map(|tail_index| self.tour.circular_distance(head_index, tail_index))
            .unwrap_or(0);

        let budget = self.cutting_budget(BudgetInputs {
            distance_to_food,
            distance_to_tail,
            body_length: you.body.len(),
            free_cells: Self::free_cells(board, you),
            total_cells: board.area(),
        });

        let oracle = CollisionOracle::new(board, you);
        let candidates: Vec<(Direction, usize)> = Direction::all()
            .iter()
            .filter_map(|&dir| {
                let next = dir.apply(&head);
                if oracle.is_unsafe(&next) {
                    return None;
                }
                let index = self.tour.index_of(&next)?;
                Some((dir, self.tour.circular_distance(head_index, index)))
            })
            .collect();

        // Largest skip that fits the budget, otherwise the closest step along the tour.
        let chosen = candidates
            .iter()
            .filter(|&&(_, distance)| distance <= budget)
            .max_by_key(|&&(_, distance)| distance)
            .or_else(|| candidates.iter().min_by_key(|&&(_, distance)| distance))
            .copied();

        match chosen {
            Some((direction, distance)) => MoveDecision {
                direction,
                cutting_budget: budget,
                shortcut: Some(distance),
                trapped: false,
            },
            None => Self::trapped(board, Some(head), budget),
        }
    }

    /// Maximum tour distance the next move may skip.
    ///
    /// Starts from the tail gap minus body length and safety margin, drops to 0
    /// on a crowded board or when there is no food to chase, is tightened when
    /// food lies before the tail, and never exceeds the distance to that food.
    pub fn cutting_budget(&self, inputs: BudgetInputs) -> usize {
        let Some(distance_to_food) = inputs.distance_to_food else {
            return 0;
        };

        if (inputs.free_cells as f64) < inputs.total_cells as f64 * self.tuning.crowding_fraction {
            return 0;
        }

        let mut budget = inputs.distance_to_tail as i64
            - inputs.body_length as i64
            - i64::from(self.tuning.safety_margin);

        if distance_to_food < inputs.distance_to_tail {
            budget -= i64::from(self.tuning.food_growth_allowance);

            let gap = (inputs.distance_to_tail - distance_to_food) as f64;
            let allowed = inputs.free_cells.max(0) as f64 * self.tuning.gap_penalty_fraction;
            if gap > allowed {
                budget -= (gap - allowed).ceil() as i64;
            }
        }

        budget.max(0).min(distance_to_food as i64) as usize
    }

    /// Nearest on-board food by Manhattan distance; the first listed wins ties
    fn closest_food(&self, board: &Board, head: &Coord) -> Option<Coord> {
        board
            .food
            .iter()
            .filter(|food| self.tour.index_of(food).is_some())
            .min_by_key(|food| head.manhattan(food))
            .copied()
    }

    /// Cells not covered by a snake segment or food
    fn free_cells(board: &Board, you: &Battlesnake) -> i64 {
        let mut segments: usize = board.snakes.iter().map(|snake| snake.body.len()).sum();
        if !board.snakes.iter().any(|snake| snake.id == you.id) {
            segments += you.body.len();
        }
        let food = board.food.iter().filter(|food| board.contains(food)).count();
        board.area() - segments as i64 - food as i64
    }

    /// No safe neighbour: first of up, left, right, down that at least stays on the board
    fn trapped(board: &Board, head: Option<Coord>, budget: usize) -> MoveDecision {
        let direction = head
            .and_then(|head| {
                Direction::fallback_order()
                    .iter()
                    .copied()
                    .find(|dir| board.contains(&dir.apply(&head)))
            })
            .unwrap_or(Direction::Up);

        MoveDecision {
            direction,
            cutting_budget: budget,
            shortcut: None,
            trapped: true,
        }
    }
}
