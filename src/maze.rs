// Half-resolution maze generation
//
// The maze lives on a grid half the width and half the height of the board.
// Every half-cell later expands into a 2x2 block of board cells, and the
// Hamiltonian tour is traced around the walls of this maze.

use rand::Rng;
use std::collections::VecDeque;
use std::fmt::Write as _;

use crate::error::HamiltonError;
use crate::types::Direction;

/// Neighbour order used by the traversal: left, right, up, down
const NEIGHBOUR_ORDER: [Direction; 4] = [
    Direction::Left,
    Direction::Right,
    Direction::Up,
    Direction::Down,
];

/// Largest accepted board side. The maze and tour are built inside the `/start`
/// request, so their size has to stay bounded.
pub const MAX_SIDE: i32 = 2 * u8::MAX as i32;

/// Validated board dimensions (both even, both between 2 and `MAX_SIDE`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridDimensions {
    width: usize,
    height: usize,
}

impl GridDimensions {
    pub fn new(width: i32, height: i32) -> Result<Self, HamiltonError> {
        let in_range = |side: i32| (2..=MAX_SIDE).contains(&side) && side % 2 == 0;
        if !in_range(width) || !in_range(height) {
            return Err(HamiltonError::InvalidBoardDimensions { width, height });
        }
        Ok(GridDimensions {
            width: width as usize,
            height: height as usize,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn cell_count(&self) -> usize {
        self.width * self.height
    }

    pub fn half_width(&self) -> usize {
        self.width / 2
    }

    pub fn half_height(&self) -> usize {
        self.height / 2
    }
}

/// One half-grid cell. Left and up passability are read from the neighbours.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MazeNode {
    pub visited: bool,
    pub can_go_right: bool,
    pub can_go_down: bool,
}

/// Pending neighbour visits for one half-cell of the depth-first traversal.
/// Two random picks come first, then all four neighbours in fixed order;
/// repeats are absorbed by the visited check.
struct Frame {
    x: usize,
    y: usize,
    targets: [Direction; 6],
    next: usize,
}

impl Frame {
    fn new<R: Rng + ?Sized>(x: usize, y: usize, rng: &mut R) -> Self {
        let first = NEIGHBOUR_ORDER[rng.random_range(0..4)];
        let second = NEIGHBOUR_ORDER[rng.random_range(0..4)];
        Frame {
            x,
            y,
            targets: [
                first,
                second,
                NEIGHBOUR_ORDER[0],
                NEIGHBOUR_ORDER[1],
                NEIGHBOUR_ORDER[2],
                NEIGHBOUR_ORDER[3],
            ],
            next: 0,
        }
    }

    fn advance(&mut self) -> Option<Direction> {
        let dir = self.targets.get(self.next).copied()?;
        self.next += 1;
        Some(dir)
    }
}

/// Spanning tree over the half-grid, stored as a flat arena indexed `x + y * half_width`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Maze {
    dimensions: GridDimensions,
    nodes: Vec<MazeNode>,
}

impl Maze {
    /// Maze with every passage closed
    pub fn closed(dimensions: GridDimensions) -> Self {
        Maze {
            dimensions,
            nodes: vec![MazeNode::default(); dimensions.half_width() * dimensions.half_height()],
        }
    }

    /// Builds a maze from an explicit passage list. Each entry opens the wall
    /// between `(x, y)` and its neighbour in the given direction; entries that
    /// point off the half-grid are ignored.
    pub fn with_passages<I>(dimensions: GridDimensions, passages: I) -> Self
    where
        I: IntoIterator<Item = (usize, usize, Direction)>,
    {
        let mut maze = Maze::closed(dimensions);
        for (x, y, dir) in passages {
            if maze.neighbour(x, y, dir).is_some() {
                maze.open_passage(x, y, dir);
            }
        }
        maze
    }

    /// Generates a random spanning-tree maze by depth-first traversal from half-cell (0, 0).
    ///
    /// The traversal uses an explicit stack so its depth is bounded by the heap,
    /// not the thread stack, on large boards.
    pub fn generate<R: Rng + ?Sized>(
        dimensions: GridDimensions,
        rng: &mut R,
    ) -> Result<Self, HamiltonError> {
        let mut maze = Maze::closed(dimensions);
        if maze.nodes.is_empty() {
            return Ok(maze);
        }

        // The root is entered from nowhere, so it opens no passage back.
        maze.nodes[0].visited = true;
        let mut stack = vec![Frame::new(0, 0, rng)];

        while let Some(frame) = stack.last_mut() {
            let Some(dir) = frame.advance() else {
                stack.pop();
                continue;
            };
            let (x, y) = (frame.x, frame.y);

            let Some((nx, ny)) = maze.neighbour(x, y, dir) else {
                continue;
            };
            let target = maze.slot(nx, ny);
            if maze.nodes[target].visited {
                continue;
            }

            maze.nodes[target].visited = true;
            maze.open_passage(x, y, dir);
            stack.push(Frame::new(nx, ny, rng));
        }

        if let Some(unvisited) = maze.nodes.iter().position(|node| !node.visited) {
            return Err(HamiltonError::MazeInvariantViolation(format!(
                "half-cell {} was never visited",
                unvisited
            )));
        }
        if !maze.is_spanning_tree() {
            return Err(HamiltonError::MazeInvariantViolation(format!(
                "maze has {} passages, expected {}",
                maze.passage_count(),
                maze.nodes.len() - 1
            )));
        }

        Ok(maze)
    }

    pub fn dimensions(&self) -> GridDimensions {
        self.dimensions
    }

    pub fn half_width(&self) -> usize {
        self.dimensions.half_width()
    }

    pub fn half_height(&self) -> usize {
        self.dimensions.half_height()
    }

    pub fn node(&self, x: usize, y: usize) -> Option<&MazeNode> {
        if x >= self.half_width() || y >= self.half_height() {
            return None;
        }
        self.nodes.get(self.slot(x, y))
    }

    /// Whether the maze allows stepping from half-cell `(x, y)` in `dir`
    pub fn can_go(&self, x: usize, y: usize, dir: Direction) -> bool {
        let Some((nx, ny)) = self.neighbour(x, y, dir) else {
            return false;
        };
        match dir {
            Direction::Right => self.nodes[self.slot(x, y)].can_go_right,
            Direction::Down => self.nodes[self.slot(x, y)].can_go_down,
            Direction::Left => self.nodes[self.slot(nx, ny)].can_go_right,
            Direction::Up => self.nodes[self.slot(nx, ny)].can_go_down,
        }
    }

    /// Number of open passages
    pub fn passage_count(&self) -> usize {
        self.nodes
            .iter()
            .map(|node| node.can_go_right as usize + node.can_go_down as usize)
            .sum()
    }

    /// Connected and acyclic: every half-cell reachable with exactly `cells - 1` passages
    pub fn is_spanning_tree(&self) -> bool {
        let cells = self.nodes.len();
        if cells == 0 {
            return false;
        }
        if self.passage_count() != cells - 1 {
            return false;
        }

        let mut seen = vec![false; cells];
        let mut queue = VecDeque::new();
        seen[0] = true;
        queue.push_back((0, 0));
        let mut reached = 1;

        while let Some((x, y)) = queue.pop_front() {
            for dir in Direction::all() {
                if !self.can_go(x, y, dir) {
                    continue;
                }
                if let Some((nx, ny)) = self.neighbour(x, y, dir) {
                    let slot = self.slot(nx, ny);
                    if !seen[slot] {
                        seen[slot] = true;
                        reached += 1;
                        queue.push_back((nx, ny));
                    }
                }
            }
        }

        reached == cells
    }

    /// Text rendering, one line per half-grid row: `#` then per cell
    /// `+` (right and down), `-` (right), `|` (down) or a space.
    pub fn layout_string(&self) -> String {
        let mut out = String::new();
        for y in 0..self.half_height() {
            out.push('#');
            for x in 0..self.half_width() {
                let right = self.can_go(x, y, Direction::Right);
                let down = self.can_go(x, y, Direction::Down);
                out.push(match (right, down) {
                    (true, true) => '+',
                    (true, false) => '-',
                    (false, true) => '|',
                    (false, false) => ' ',
                });
            }
            let _ = writeln!(out);
        }
        out
    }

    fn slot(&self, x: usize, y: usize) -> usize {
        x + y * self.half_width()
    }

    fn neighbour(&self, x: usize, y: usize, dir: Direction) -> Option<(usize, usize)> {
        let (nx, ny) = match dir {
            Direction::Left => (x.checked_sub(1)?, y),
            Direction::Right => (x + 1, y),
            Direction::Up => (x, y.checked_sub(1)?),
            Direction::Down => (x, y + 1),
        };
        if nx >= self.half_width() || ny >= self.half_height() {
            return None;
        }
        Some((nx, ny))
    }

    /// Opens the wall between `(x, y)` and its neighbour in `dir`.
    /// Only right/down flags are stored, so left/up land on the neighbour.
    fn open_passage(&mut self, x: usize, y: usize, dir: Direction) {
        let Some((nx, ny)) = self.neighbour(x, y, dir) else {
            return;
        };
        let from = self.slot(x, y);
        let to = self.slot(nx, ny);
        match dir {
            Direction::Right => self.nodes[from].can_go_right = true,
            Direction::Down => self.nodes[from].can_go_down = true,
            Direction::Left => self.nodes[to].can_go_right = true,
            Direction::Up => self.nodes[to].can_go_down = true,
        }
    }
}
