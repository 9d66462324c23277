use crate::MazeError;

use serde::{Deserialize, Serialize};

use std::collections::VecDeque;
use std::fmt;
use std::str::FromStr;

/// The kinds of cells a maze is made of.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    Empty,
    Wall,
    Start,
    Goal,
}

impl Cell {
    /// Returns the character representing
    /// the cell in the textual maze format.
    pub fn symbol(self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::Wall => '#',
            Cell::Start => 'S',
            Cell::Goal => 'G',
        }
    }

    /// Returns the cell represented by `symbol`, if any.
    pub fn from_symbol(symbol: char) -> Option<Cell> {
        match symbol {
            '.' => Some(Cell::Empty),
            '#' => Some(Cell::Wall),
            'S' => Some(Cell::Start),
            'G' => Some(Cell::Goal),
            _ => None,
        }
    }

    /// Returns whether the cell can be walked on.
    pub fn is_open(self) -> bool {
        self != Cell::Wall
    }
}

/// A cell's coordinates. `x` grows rightwards,
/// `y` grows downwards from the top row.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: usize,
    pub y: usize,
}

impl Position {
    pub const fn new(x: usize, y: usize) -> Position {
        Position { x, y }
    }

    /// Returns the taxicab distance between two positions.
    ///
    /// # Examples
    /// ```
    /// use nnt_maze::maze::Position;
    ///
    /// assert_eq!(Position::new(1, 4).manhattan(Position::new(3, 0)), 6);
    /// ```
    pub fn manhattan(self, other: Position) -> usize {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// A move between orthogonally adjacent cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Right,
    Down,
    Left,
}

impl Direction {
    /// All directions, clockwise from `Up`. Mazers
    /// sense and decide in this order.
    pub const ALL: [Direction; 4] = [Direction::Up, Direction::Right, Direction::Down, Direction::Left];
}

/// A rectangular maze with exactly one start
/// cell and exactly one goal cell.
///
/// Mazes are immutable; edit a [`Grid`] and convert
/// it to change one.
///
/// [`Grid`]: crate::grid::Grid
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Maze {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
    start: Position,
    goal: Position,
}

impl Maze {
    /// Builds a maze from its cells, listed row by row
    /// from the top-left corner.
    ///
    /// # Errors
    /// Returns an error if the dimensions are zero or
    /// don't match the number of cells, or if there isn't
    /// exactly one start cell and exactly one goal cell.
    ///
    /// # Examples
    /// ```
    /// use nnt_maze::maze::{Cell, Maze, Position};
    /// use nnt_maze::MazeError;
    ///
    /// let maze = Maze::new(3, 1, vec![Cell::Start, Cell::Empty, Cell::Goal]).unwrap();
    /// assert_eq!(maze.goal(), Position::new(2, 0));
    ///
    /// let missing = Maze::new(2, 1, vec![Cell::Start, Cell::Empty]);
    /// assert_eq!(missing, Err(MazeError::MissingGoal));
    /// ```
    pub fn new(width: usize, height: usize, cells: Vec<Cell>) -> Result<Maze, MazeError> {
        let (start, goal) = locate_endpoints(width, height, &cells)?;
        Ok(Maze {
            width,
            height,
            cells,
            start,
            goal,
        })
    }

    /// Checks that the maze's endpoints are where its
    /// cells say they are. Always succeeds for mazes built
    /// by [`Maze::new`]; deserialized mazes may fail.
    pub fn validate(&self) -> Result<(), MazeError> {
        let (start, goal) = locate_endpoints(self.width, self.height, &self.cells)?;
        if start != self.start {
            Err(MazeError::MisplacedStart {
                recorded: self.start,
                actual: start,
            })
        } else if goal != self.goal {
            Err(MazeError::MisplacedGoal {
                recorded: self.goal,
                actual: goal,
            })
        } else {
            Ok(())
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn start(&self) -> Position {
        self.start
    }

    pub fn goal(&self) -> Position {
        self.goal
    }

    /// Returns the cell at `position`, or `None`
    /// if it lies outside the maze.
    pub fn cell(&self, position: Position) -> Option<Cell> {
        self.index(position).map(|i| self.cells[i])
    }

    /// Returns the maze's rows, top first.
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks(self.width)
    }

    /// Returns whether `position` lies inside
    /// the maze and isn't a wall.
    pub fn is_open(&self, position: Position) -> bool {
        self.cell(position).map_or(false, Cell::is_open)
    }

    /// Returns the position adjacent to `position` in
    /// `direction`, if it lies inside the maze.
    pub fn neighbor(&self, position: Position, direction: Direction) -> Option<Position> {
        let Position { x, y } = position;
        let (x, y) = match direction {
            Direction::Up => (x, y.checked_sub(1)?),
            Direction::Right => (x + 1, y),
            Direction::Down => (x, y + 1),
            Direction::Left => (x.checked_sub(1)?, y),
        };
        (x < self.width && y < self.height).then(|| Position::new(x, y))
    }

    /// Returns where a move from `position` in `direction`
    /// ends. Moving into a wall or off the maze leaves the
    /// mover in place.
    ///
    /// # Examples
    /// ```
    /// use nnt_maze::maze::{Direction, Maze, Position};
    ///
    /// let maze: Maze = "S.#G".parse().unwrap();
    /// let start = maze.start();
    /// assert_eq!(maze.step(start, Direction::Right), Position::new(1, 0));
    /// assert_eq!(maze.step(start, Direction::Up), start);
    /// assert_eq!(maze.step(Position::new(1, 0), Direction::Right), Position::new(1, 0));
    /// ```
    pub fn step(&self, position: Position, direction: Direction) -> Position {
        self.neighbor(position, direction)
            .filter(|&p| self.is_open(p))
            .unwrap_or(position)
    }

    /// Computes every cell's shortest walking
    /// distance to the goal.
    pub fn goal_distances(&self) -> GoalDistances {
        let mut distances = vec![None; self.cells.len()];
        let mut queue = VecDeque::new();
        distances[self.width * self.goal.y + self.goal.x] = Some(0);
        queue.push_back((self.goal, 0));

        while let Some((position, distance)) = queue.pop_front() {
            for direction in Direction::ALL {
                let next = match self.neighbor(position, direction) {
                    Some(next) if self.is_open(next) => next,
                    _ => continue,
                };
                let slot = &mut distances[self.width * next.y + next.x];
                if slot.is_none() {
                    *slot = Some(distance + 1);
                    queue.push_back((next, distance + 1));
                }
            }
        }

        GoalDistances {
            width: self.width,
            distances,
        }
    }

    /// Renders the maze in its textual format, with `@`
    /// marking `agent`'s position.
    pub fn render_with(&self, agent: Position) -> String {
        let mut out = String::with_capacity((self.width + 1) * self.height);
        for (y, row) in self.rows().enumerate() {
            for (x, cell) in row.iter().enumerate() {
                if agent == Position::new(x, y) {
                    out.push('@');
                } else {
                    out.push(cell.symbol());
                }
            }
            out.push('\n');
        }
        out
    }

    fn index(&self, position: Position) -> Option<usize> {
        (position.x < self.width && position.y < self.height).then(|| self.width * position.y + position.x)
    }
}

impl FromStr for Maze {
    type Err = MazeError;

    fn from_str(s: &str) -> Result<Maze, MazeError> {
        s.parse::<crate::grid::Grid>()?.to_maze()
    }
}

impl fmt::Display for Maze {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows() {
            for cell in row {
                write!(f, "{}", cell.symbol())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Shortest walking distances to a maze's goal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GoalDistances {
    width: usize,
    distances: Vec<Option<usize>>,
}

impl GoalDistances {
    /// Returns the distance from `position` to the goal,
    /// or `None` if the goal can't be reached from it.
    pub fn get(&self, position: Position) -> Option<usize> {
        if position.x >= self.width {
            return None;
        }
        self.distances
            .get(self.width * position.y + position.x)
            .copied()
            .flatten()
    }
}

/// Finds the single start cell and single goal cell.
pub(crate) fn locate_endpoints(
    width: usize,
    height: usize,
    cells: &[Cell],
) -> Result<(Position, Position), MazeError> {
    if width == 0 || height == 0 {
        return Err(MazeError::EmptyGrid);
    }
    if cells.len() != width * height {
        return Err(MazeError::RaggedRows {
            row: cells.len() / width,
        });
    }
    let start = locate_unique(width, cells, Cell::Start, MazeError::DuplicateStart)?;
    let goal = locate_unique(width, cells, Cell::Goal, MazeError::DuplicateGoal)?;
    Ok((start.ok_or(MazeError::MissingStart)?, goal.ok_or(MazeError::MissingGoal)?))
}

fn locate_unique(
    width: usize,
    cells: &[Cell],
    kind: Cell,
    duplicate: MazeError,
) -> Result<Option<Position>, MazeError> {
    let mut found = cells
        .iter()
        .enumerate()
        .filter(|&(_, &cell)| cell == kind)
        .map(|(i, _)| Position::new(i % width, i / width));
    let first = found.next();
    match found.next() {
        Some(_) => Err(duplicate),
        None => Ok(first),
    }
}
