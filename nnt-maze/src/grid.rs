use crate::maze::{self, Cell, Maze, Position};
use crate::MazeError;

use std::fmt;
use std::str::FromStr;

/// An editable grid of cells, from which [`Maze`]s are built.
///
/// Unlike a maze, a grid may be in any state: it may lack
/// endpoints, or have several of them.
///
/// # Textual format
/// One line per row, top first, with one character per
/// cell: `.` empty, `#` wall, `S` start, `G` goal. Blank
/// lines and trailing whitespace are ignored.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
    next_endpoint: Cell,
}

impl Grid {
    /// Returns a grid of empty cells.
    pub fn new(width: usize, height: usize) -> Grid {
        Grid {
            width,
            height,
            cells: vec![Cell::Empty; width * height],
            next_endpoint: Cell::Start,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the cell at `position`, or `None`
    /// if it lies outside the grid.
    pub fn cell(&self, position: Position) -> Option<Cell> {
        self.index(position).ok().map(|i| self.cells[i])
    }

    /// Overwrites the cell at `position`.
    pub fn set(&mut self, position: Position, cell: Cell) -> Result<(), MazeError> {
        let i = self.index(position)?;
        self.cells[i] = cell;
        Ok(())
    }

    /// Turns an empty cell into a wall and a wall into an
    /// empty cell, and returns the cell's new kind.
    /// Endpoints are left untouched.
    pub fn toggle_wall(&mut self, position: Position) -> Result<Cell, MazeError> {
        let i = self.index(position)?;
        self.cells[i] = match self.cells[i] {
            Cell::Empty => Cell::Wall,
            Cell::Wall => Cell::Empty,
            endpoint => endpoint,
        };
        Ok(self.cells[i])
    }

    /// Places endpoints in turn: a start, then a goal.
    ///
    /// Once the grid holds a goal, the next placement
    /// clears both endpoints instead. Only empty cells
    /// receive endpoints. Returns the kind of endpoint
    /// placed, if any.
    ///
    /// # Examples
    /// ```
    /// use nnt_maze::grid::Grid;
    /// use nnt_maze::maze::{Cell, Position};
    ///
    /// let mut grid = Grid::new(3, 1);
    /// assert_eq!(grid.place_endpoint(Position::new(0, 0)), Ok(Some(Cell::Start)));
    /// assert_eq!(grid.place_endpoint(Position::new(2, 0)), Ok(Some(Cell::Goal)));
    /// assert!(grid.is_valid());
    ///
    /// assert_eq!(grid.place_endpoint(Position::new(1, 0)), Ok(None));
    /// assert_eq!(grid.to_string(), "...\n");
    /// ```
    pub fn place_endpoint(&mut self, position: Position) -> Result<Option<Cell>, MazeError> {
        let i = self.index(position)?;
        if self.cells.contains(&Cell::Goal) {
            self.clear_endpoints();
            return Ok(None);
        }
        if self.cells[i] != Cell::Empty {
            return Ok(None);
        }
        let placed = self.next_endpoint;
        self.cells[i] = placed;
        self.next_endpoint = match placed {
            Cell::Start => Cell::Goal,
            _ => Cell::Start,
        };
        Ok(Some(placed))
    }

    /// Empties every start and goal cell.
    pub fn clear_endpoints(&mut self) {
        for cell in self.cells.iter_mut() {
            if matches!(cell, Cell::Start | Cell::Goal) {
                *cell = Cell::Empty;
            }
        }
        self.next_endpoint = Cell::Start;
    }

    /// Replaces the grid's contents with empty
    /// cells of the new dimensions.
    pub fn resize(&mut self, width: usize, height: usize) {
        *self = Grid::new(width, height);
    }

    /// Returns whether the grid can be turned into a maze.
    pub fn is_valid(&self) -> bool {
        maze::locate_endpoints(self.width, self.height, &self.cells).is_ok()
    }

    /// Builds a maze from the grid's current contents.
    ///
    /// # Errors
    /// Returns an error if the grid is empty, or doesn't have
    /// exactly one start cell and exactly one goal cell.
    pub fn to_maze(&self) -> Result<Maze, MazeError> {
        Maze::new(self.width, self.height, self.cells.clone())
    }

    fn index(&self, position: Position) -> Result<usize, MazeError> {
        if position.x < self.width && position.y < self.height {
            Ok(self.width * position.y + position.x)
        } else {
            Err(MazeError::OutOfBounds {
                position,
                width: self.width,
                height: self.height,
            })
        }
    }
}

impl From<&Maze> for Grid {
    fn from(maze: &Maze) -> Grid {
        Grid {
            width: maze.width(),
            height: maze.height(),
            cells: maze.rows().flatten().copied().collect(),
            next_endpoint: Cell::Start,
        }
    }
}

impl FromStr for Grid {
    type Err = MazeError;

    fn from_str(s: &str) -> Result<Grid, MazeError> {
        let mut width = None;
        let mut cells = vec![];
        let rows = s.lines().map(str::trim_end).filter(|l| !l.is_empty());
        for (row, line) in rows.enumerate() {
            let start = cells.len();
            for (column, symbol) in line.chars().enumerate() {
                let cell = Cell::from_symbol(symbol).ok_or(MazeError::UnknownCell { symbol, row, column })?;
                cells.push(cell);
            }
            let len = cells.len() - start;
            if *width.get_or_insert(len) != len {
                return Err(MazeError::RaggedRows { row });
            }
        }
        match width {
            Some(width) => Ok(Grid {
                width,
                height: cells.len() / width,
                cells,
                next_endpoint: Cell::Start,
            }),
            None => Err(MazeError::EmptyGrid),
        }
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells.chunks(self.width.max(1)) {
            for cell in row {
                write!(f, "{}", cell.symbol())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse() {
        let grid: Grid = "\nS.#  \n\n.#G\n\n".parse().unwrap();
        assert_eq!((grid.width(), grid.height()), (3, 2));
        assert_eq!(grid.cell(Position::new(2, 1)), Some(Cell::Goal));
        assert_eq!(grid.to_string(), "S.#\n.#G\n");
    }

    #[test]
    fn parse_errors() {
        assert_eq!("".parse::<Grid>(), Err(MazeError::EmptyGrid));
        assert_eq!("\n  \n".parse::<Grid>(), Err(MazeError::EmptyGrid));
        assert_eq!("S..\n.G".parse::<Grid>(), Err(MazeError::RaggedRows { row: 1 }));
        assert_eq!(
            "S..\n.xG".parse::<Grid>(),
            Err(MazeError::UnknownCell {
                symbol: 'x',
                row: 1,
                column: 1
            })
        );
    }

    #[test]
    fn edit() {
        let mut grid = Grid::new(3, 2);
        assert!(!grid.is_valid());
        assert_eq!(grid.toggle_wall(Position::new(1, 0)), Ok(Cell::Wall));
        assert_eq!(grid.toggle_wall(Position::new(1, 1)), Ok(Cell::Wall));
        assert_eq!(grid.toggle_wall(Position::new(1, 1)), Ok(Cell::Empty));
        grid.set(Position::new(0, 1), Cell::Start).unwrap();
        assert_eq!(grid.toggle_wall(Position::new(0, 1)), Ok(Cell::Start));
        grid.set(Position::new(2, 1), Cell::Goal).unwrap();
        assert!(grid.is_valid());
        assert_eq!(grid.to_string(), ".#.\nS.G\n");

        let error = grid.set(Position::new(3, 0), Cell::Wall).unwrap_err();
        assert_eq!(
            error,
            MazeError::OutOfBounds {
                position: Position::new(3, 0),
                width: 3,
                height: 2
            }
        );
        assert!(grid.toggle_wall(Position::new(0, 2)).is_err());
    }

    #[test]
    fn place_endpoints() {
        let mut grid = Grid::new(4, 1);
        grid.toggle_wall(Position::new(1, 0)).unwrap();
        // Walls don't receive endpoints, nor advance the alternation.
        assert_eq!(grid.place_endpoint(Position::new(1, 0)), Ok(None));
        assert_eq!(grid.place_endpoint(Position::new(0, 0)), Ok(Some(Cell::Start)));
        assert!(!grid.is_valid());
        assert_eq!(grid.place_endpoint(Position::new(3, 0)), Ok(Some(Cell::Goal)));
        assert!(grid.is_valid());

        assert_eq!(grid.place_endpoint(Position::new(2, 0)), Ok(None));
        assert_eq!(grid.to_string(), ".#..\n");
        assert_eq!(grid.place_endpoint(Position::new(2, 0)), Ok(Some(Cell::Start)));
    }

    #[test]
    fn duplicate_endpoints_are_invalid() {
        let mut grid: Grid = "S.G".parse().unwrap();
        grid.set(Position::new(1, 0), Cell::Start).unwrap();
        assert!(!grid.is_valid());
        assert_eq!(grid.to_maze(), Err(MazeError::DuplicateStart));
        grid.clear_endpoints();
        assert_eq!(grid.to_string(), "...\n");
    }

    #[test]
    fn resize() {
        let mut grid: Grid = "S#G".parse().unwrap();
        grid.resize(2, 3);
        assert_eq!(grid, Grid::new(2, 3));
        assert_eq!(grid.to_string(), "..\n..\n..\n");
    }

    #[test]
    fn maze_conversion() {
        let grid: Grid = "S.#\n..G".parse().unwrap();
        let maze = grid.to_maze().unwrap();
        assert_eq!(Grid::from(&maze), grid);
        assert_eq!(maze.to_string(), grid.to_string());
    }
}
