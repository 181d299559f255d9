// Hamiltonian tour construction
//
// Walks the maze walls once, starting at half-cell (0, 0), always preferring the
// counter-clockwise turn. Each half-cell is a 2x2 block of board cells, traced
// clockwise from the corner the walker entered by. Only the corners passed
// before leaving the block are numbered on that step; the rest are numbered
// when the walk comes back around.

use log::debug;

use crate::error::HamiltonError;
use crate::maze::Maze;
use crate::tour_index::TourIndex;
use crate::types::Direction;

/// Walk steps allowed per board cell before the maze is declared malformed
const MAX_STEPS_PER_CELL: usize = 4;

/// Block corners in the order they are passed for a given heading, starting at the entry corner.
/// Offsets are `(dx, dy)` inside the 2x2 block.
fn entry_corners(heading: Direction) -> [(usize, usize); 4] {
    match heading {
        Direction::Right => [(0, 0), (1, 0), (1, 1), (0, 1)],
        Direction::Down => [(1, 0), (1, 1), (0, 1), (0, 0)],
        Direction::Left => [(1, 1), (0, 1), (0, 0), (1, 0)],
        Direction::Up => [(0, 1), (0, 0), (1, 0), (1, 1)],
    }
}

/// Corners passed before leaving the block heading `next`
fn corners_passed(heading: Direction, next: Direction) -> usize {
    if next == heading.counter_clockwise() {
        1
    } else if next == heading {
        2
    } else if next == heading.clockwise() {
        3
    } else {
        4
    }
}

pub struct TourBuilder;

impl TourBuilder {
    /// Traces the tour around `maze`.
    ///
    /// Fails with `MazeInvariantViolation` if the walk leaves the half-grid,
    /// runs past its step cap, or produces something other than a closed cycle.
    /// The build is deterministic: the same maze always yields the same tour.
    pub fn build(maze: &Maze) -> Result<TourIndex, HamiltonError> {
        let dims = maze.dimensions();
        let (width, cells) = (dims.width(), dims.cell_count());
        let max_steps = cells * MAX_STEPS_PER_CELL;

        let mut assignment: Vec<Option<usize>> = vec![None; cells];
        let mut assigned = 0;
        let (mut x, mut y) = (0usize, 0usize);
        let mut heading = if maze.can_go(0, 0, Direction::Down) {
            Direction::Down
        } else {
            Direction::Left
        };
        let mut steps = 0;

        while assigned < cells {
            steps += 1;
            if steps > max_steps {
                return Err(HamiltonError::MazeInvariantViolation(format!(
                    "tour walk exceeded {} steps with {} of {} cells numbered",
                    max_steps, assigned, cells
                )));
            }

            let next = heading
                .turn_priority()
                .iter()
                .copied()
                .find(|&dir| maze.can_go(x, y, dir))
                .unwrap_or_else(|| heading.opposite());

            for &(dx, dy) in entry_corners(heading)
                .iter()
                .take(corners_passed(heading, next))
            {
                let slot = (2 * x + dx) + (2 * y + dy) * width;
                if assignment[slot].is_none() {
                    assignment[slot] = Some(assigned);
                    assigned += 1;
                }
            }

            heading = next;
            if assigned == cells {
                break;
            }

            (x, y) = match next {
                Direction::Left if x > 0 => (x - 1, y),
                Direction::Right if x + 1 < maze.half_width() => (x + 1, y),
                Direction::Up if y > 0 => (x, y - 1),
                Direction::Down if y + 1 < maze.half_height() => (x, y + 1),
                _ => {
                    return Err(HamiltonError::MazeInvariantViolation(format!(
                        "tour walk left the half-grid at ({}, {}) heading {}",
                        x,
                        y,
                        next.as_str()
                    )))
                }
            };
        }

        debug!("Tour traced in {} steps over {} cells", steps, cells);

        let indices = assignment.into_iter().flatten().collect();
        let tour = TourIndex::new(width, dims.height(), indices)?;
        if !tour.is_closed_cycle() {
            return Err(HamiltonError::MazeInvariantViolation(
                "tour does not close into a single cycle".to_string(),
            ));
        }
        Ok(tour)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maze::GridDimensions;
    use crate::types::Coord;

    #[test]
    fn test_smallest_board_is_a_square_loop() {
        let dims = GridDimensions::new(2, 2).unwrap();
        let tour = TourBuilder::build(&Maze::closed(dims)).unwrap();
        // Start heading left with nowhere to go: reverse, numbering all four corners from bottom-right.
        assert_eq!(tour.index_of(&Coord::new(1, 1)), Some(0));
        assert_eq!(tour.index_of(&Coord::new(0, 1)), Some(1));
        assert_eq!(tour.index_of(&Coord::new(0, 0)), Some(2));
        assert_eq!(tour.index_of(&Coord::new(1, 0)), Some(3));
        assert!(tour.is_closed_cycle());
    }

    #[test]
    fn test_two_blocks_side_by_side() {
        let dims = GridDimensions::new(4, 2).unwrap();
        let maze = Maze::with_passages(dims, vec![(0, 0, Direction::Right)]);
        let tour = TourBuilder::build(&maze).unwrap();
        // Row 0: 2 3 4 5 / Row 1: 1 0 7 6
        let expected = [[2, 3, 4, 5], [1, 0, 7, 6]];
        for (y, row) in expected.iter().enumerate() {
            for (x, &index) in row.iter().enumerate() {
                assert_eq!(
                    tour.index_of(&Coord::new(x as i32, y as i32)),
                    Some(index),
                    "cell ({}, {})",
                    x,
                    y
                );
            }
        }
        assert!(tour.is_closed_cycle());
    }

    #[test]
    fn test_disconnected_maze_is_rejected() {
        let dims = GridDimensions::new(4, 4).unwrap();
        let result = TourBuilder::build(&Maze::closed(dims));
        assert!(matches!(
            result,
            Err(HamiltonError::MazeInvariantViolation(_))
        ));
    }

    #[test]
    fn test_corners_passed_per_turn() {
        assert_eq!(corners_passed(Direction::Right, Direction::Up), 1);
        assert_eq!(corners_passed(Direction::Right, Direction::Right), 2);
        assert_eq!(corners_passed(Direction::Right, Direction::Down), 3);
        assert_eq!(corners_passed(Direction::Right, Direction::Left), 4);
    }
}
