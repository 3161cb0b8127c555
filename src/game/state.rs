use serde::{Deserialize, Serialize};

use super::action::Direction;

/// A position on the game grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub col: i32,
    pub row: i32,
}

impl Position {
    pub fn new(col: i32, row: i32) -> Self {
        Self { col, row }
    }

    /// Move position by delta
    pub fn moved_by(&self, dcol: i32, drow: i32) -> Self {
        Self {
            col: self.col + dcol,
            row: self.row + drow,
        }
    }

    /// Move position in a direction
    pub fn moved_in_direction(&self, direction: Direction) -> Self {
        let (dcol, drow) = direction.delta();
        self.moved_by(dcol, drow)
    }

    /// Direction of a single orthogonal step from self to other
    pub fn direction_to(&self, other: Position) -> Option<Direction> {
        Direction::from_delta(other.col - self.col, other.row - self.row)
    }

    /// True when the two positions share an edge
    pub fn is_adjacent(&self, other: Position) -> bool {
        self.direction_to(other).is_some()
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.col, self.row)
    }
}

/// Why a trial ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TerminalCause {
    /// Snake hit a wall
    Wall,
    /// Snake hit itself
    SelfCollision,
    /// No food eaten within the stall limit
    Stalled,
    /// The snake covers every cell, no room left for food
    GridFilled,
}

impl TerminalCause {
    pub const ALL: [TerminalCause; 4] = [
        TerminalCause::Wall,
        TerminalCause::SelfCollision,
        TerminalCause::Stalled,
        TerminalCause::GridFilled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TerminalCause::Wall => "wall",
            TerminalCause::SelfCollision => "self",
            TerminalCause::Stalled => "stalled",
            TerminalCause::GridFilled => "filled",
        }
    }
}

/// Life cycle of the orchestrator between ticks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// A trial is running
    Playing,
    /// The trial just ended; the next tick resets or finishes the run
    Terminal(TerminalCause),
    /// Grid cleared, the next tick spawns a fresh snake and food
    Resetting,
    /// Configured number of trials reached
    Finished,
}

/// Outcome of one completed trial
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialRecord {
    /// Zero-based trial index
    pub trial: usize,
    /// Snake length at termination
    pub score: usize,
    /// Ticks the trial lasted
    pub ticks: usize,
    pub cause: TerminalCause,
}
