// Read-only lookup over a completed Hamiltonian tour
//
// Every board cell carries its position on the tour. Distances are measured
// forward only, wrapping from the last index back to 0.

use std::fmt::Write as _;

use crate::error::HamiltonError;
use crate::types::Coord;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TourIndex {
    width: usize,
    height: usize,
    /// Tour position of each cell, indexed `x + y * width`
    indices: Vec<usize>,
    /// Inverse mapping: cell at each tour position
    cells: Vec<Coord>,
}

impl TourIndex {
    /// Wraps a complete cell-to-position assignment.
    /// Fails unless the assignment is a bijection onto `0..width * height`.
    pub fn new(width: usize, height: usize, indices: Vec<usize>) -> Result<Self, HamiltonError> {
        let n = width * height;
        if indices.len() != n {
            return Err(HamiltonError::MazeInvariantViolation(format!(
                "tour covers {} cells, board has {}",
                indices.len(),
                n
            )));
        }

        let mut cells: Vec<Option<Coord>> = vec![None; n];
        for (slot, &index) in indices.iter().enumerate() {
            let coord = Coord::new((slot % width) as i32, (slot / width) as i32);
            let Some(entry) = cells.get_mut(index) else {
                return Err(HamiltonError::MazeInvariantViolation(format!(
                    "tour index {} out of range for {} cells",
                    index, n
                )));
            };
            if let Some(previous) = *entry {
                return Err(HamiltonError::MazeInvariantViolation(format!(
                    "tour index {} assigned to both {:?} and {:?}",
                    index, previous, coord
                )));
            }
            *entry = Some(coord);
        }

        // A length-n vector with no duplicates and no out-of-range entries covers every index.
        let cells = cells.into_iter().flatten().collect();

        Ok(TourIndex {
            width,
            height,
            indices,
            cells,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of cells on the tour
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Tour position of a board cell, `None` when off the board
    pub fn index_of(&self, coord: &Coord) -> Option<usize> {
        if coord.x < 0 || coord.y < 0 {
            return None;
        }
        let (x, y) = (coord.x as usize, coord.y as usize);
        if x >= self.width || y >= self.height {
            return None;
        }
        self.indices.get(x + y * self.width).copied()
    }

    /// Board cell at a tour position
    pub fn coord_at(&self, index: usize) -> Option<Coord> {
        self.cells.get(index).copied()
    }

    /// Number of cells strictly between `from` and `to` walking forward along the tour.
    ///
    /// The immediate successor is at distance 0 and `circular_distance(i, i)` is
    /// `len() - 1`. Both arguments must be valid tour positions.
    pub fn circular_distance(&self, from: usize, to: usize) -> usize {
        debug_assert!(from < self.len() && to < self.len());
        if from < to {
            to - from - 1
        } else {
            to + self.len() - from - 1
        }
    }

    /// Position that follows `index` on the closed tour
    pub fn successor(&self, index: usize) -> usize {
        (index + 1) % self.len()
    }

    /// Checks that consecutive positions, including the wrap, are grid-adjacent
    pub fn is_closed_cycle(&self) -> bool {
        if self.cells.is_empty() {
            return false;
        }
        (0..self.len()).all(|i| {
            let a = self.cells[i];
            let b = self.cells[self.successor(i)];
            a.manhattan(&b) == 1
        })
    }

    /// Index grid, one line per board row. Indices are zero-padded to the widest
    /// one (at least two digits) and written back to back, so columns stay aligned.
    pub fn grid_string(&self) -> String {
        let pad = self.len().saturating_sub(1).to_string().len().max(2);
        let mut out = String::new();
        for y in 0..self.height {
            for x in 0..self.width {
                let _ = write!(out, "{:0pad$}", self.indices[x + y * self.width], pad = pad);
            }
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 2x2 board walked clockwise from the top-left corner
    fn square() -> TourIndex {
        TourIndex::new(2, 2, vec![0, 1, 3, 2]).unwrap()
    }

    #[test]
    fn test_index_of_and_inverse() {
        let tour = square();
        assert_eq!(tour.index_of(&Coord::new(0, 0)), Some(0));
        assert_eq!(tour.index_of(&Coord::new(1, 0)), Some(1));
        assert_eq!(tour.index_of(&Coord::new(1, 1)), Some(2));
        assert_eq!(tour.index_of(&Coord::new(0, 1)), Some(3));
        assert_eq!(tour.coord_at(2), Some(Coord::new(1, 1)));
        assert_eq!(tour.index_of(&Coord::new(-1, 0)), None);
        assert_eq!(tour.index_of(&Coord::new(0, 2)), None);
        assert!(tour.is_closed_cycle());
    }

    #[test]
    fn test_circular_distance_convention() {
        let tour = square();
        assert_eq!(tour.circular_distance(0, 1), 0);
        assert_eq!(tour.circular_distance(0, 3), 2);
        assert_eq!(tour.circular_distance(3, 0), 0);
        assert_eq!(tour.circular_distance(2, 1), 2);
        for i in 0..4 {
            assert_eq!(tour.circular_distance(i, i), 3);
        }
    }

    #[test]
    fn test_duplicate_index_rejected() {
        let result = TourIndex::new(2, 2, vec![0, 1, 1, 2]);
        assert!(matches!(result, Err(HamiltonError::MazeInvariantViolation(_))));
    }

    #[test]
    fn test_out_of_range_index_rejected() {
        assert!(TourIndex::new(2, 2, vec![0, 1, 2, 4]).is_err());
        assert!(TourIndex::new(2, 2, vec![0, 1, 2]).is_err());
    }

    #[test]
    fn test_open_path_is_not_a_cycle() {
        let tour = TourIndex::new(4, 1, vec![0, 1, 2, 3]).unwrap();
        assert!(!tour.is_closed_cycle());
    }

    #[test]
    fn test_grid_string_pads_indices() {
        assert_eq!(square().grid_string(), "0001\n0302\n");
    }

    #[test]
    fn test_grid_string_widens_past_two_digits() {
        // 10x10 board: the largest index is 99, so two digits still suffice.
        let indices: Vec<usize> = (0..100).collect();
        let grid = TourIndex::new(10, 10, indices).unwrap().grid_string();
        assert_eq!(grid.lines().next(), Some("00010203040506070809"));

        // 12x10 board: index 119 needs three digits everywhere.
        let indices: Vec<usize> = (0..120).collect();
        let grid = TourIndex::new(12, 10, indices).unwrap().grid_string();
        let first = grid.lines().next().unwrap();
        assert_eq!(first.len(), 36);
        assert!(first.starts_with("000001002"));
        assert!(grid.lines().all(|line| line.len() == 36));
    }
}
