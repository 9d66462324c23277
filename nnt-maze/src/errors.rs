use crate::maze::Position;

use std::error::Error;
use std::fmt;

/// An error type indicating a maze that
/// can't be parsed, edited, or navigated.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MazeError {
    /// The maze has no start cell.
    MissingStart,
    /// The maze has no goal cell.
    MissingGoal,
    /// The maze has more than one start cell.
    DuplicateStart,
    /// The maze has more than one goal cell.
    DuplicateGoal,
    /// The maze has no rows or no columns.
    EmptyGrid,
    /// A row's length differs from the first row's.
    RaggedRows { row: usize },
    /// A character doesn't name any cell kind.
    UnknownCell { symbol: char, row: usize, column: usize },
    /// A maze's recorded start isn't its start cell.
    MisplacedStart { recorded: Position, actual: Position },
    /// A maze's recorded goal isn't its goal cell.
    MisplacedGoal { recorded: Position, actual: Position },
    /// A position lies outside the maze.
    OutOfBounds { position: Position, width: usize, height: usize },
}

impl fmt::Display for MazeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingStart => write!(f, "maze has no start cell"),
            Self::MissingGoal => write!(f, "maze has no goal cell"),
            Self::DuplicateStart => write!(f, "maze has more than one start cell"),
            Self::DuplicateGoal => write!(f, "maze has more than one goal cell"),
            Self::EmptyGrid => write!(f, "maze has no cells"),
            Self::RaggedRows { row } => write!(f, "row {} differs in length from the first row", row),
            Self::UnknownCell { symbol, row, column } => write!(
                f,
                "unknown cell symbol {:?} at row {}, column {}",
                symbol, row, column
            ),
            Self::MisplacedStart { recorded, actual } => {
                write!(f, "maze records its start at {}, but the start cell is at {}", recorded, actual)
            }
            Self::MisplacedGoal { recorded, actual } => {
                write!(f, "maze records its goal at {}, but the goal cell is at {}", recorded, actual)
            }
            Self::OutOfBounds {
                position,
                width,
                height,
            } => write!(f, "position {} is outside the {}x{} maze", position, width, height),
        }
    }
}

impl Error for MazeError {}
