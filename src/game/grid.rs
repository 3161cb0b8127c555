//! Square occupancy grid
//!
//! The grid owns every cell in a flat arena indexed by `row * size + col`.
//! Everything else in the crate refers to cells by [`Position`]. Content is
//! only ever changed through [`Grid::set_content`].

use serde::Serialize;

use super::action::Direction;
use super::state::Position;
use crate::search::SearchFields;

/// What occupies a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum CellContent {
    #[default]
    Empty,
    Head,
    Body,
    Food,
    /// Transient marker for the most recent planned path
    PathMarker,
}

impl CellContent {
    /// Cells the planner may route through
    pub fn is_passable(self) -> bool {
        !matches!(self, CellContent::Body)
    }

    /// Cells the fallback policy may step onto without a plan
    pub fn is_safe(self) -> bool {
        matches!(self, CellContent::Empty | CellContent::PathMarker)
    }
}

/// One grid position with its occupancy and the current search episode's fields
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    position: Position,
    content: CellContent,
    pub search: SearchFields,
}

impl Cell {
    fn new(position: Position) -> Self {
        Self {
            position,
            content: CellContent::Empty,
            search: SearchFields::default(),
        }
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn content(&self) -> CellContent {
        self.content
    }
}

/// Fixed-size N x N lattice of cells
#[derive(Debug, Clone)]
pub struct Grid {
    size: usize,
    cells: Vec<Cell>,
}

impl Grid {
    /// Create an empty grid with `size` columns and `size` rows
    pub fn new(size: usize) -> Self {
        let cells = (0..size * size)
            .map(|index| {
                let col = (index % size) as i32;
                let row = (index / size) as i32;
                Cell::new(Position::new(col, row))
            })
            .collect();

        Self { size, cells }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of cells in the grid
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Check if a position is within the grid bounds
    pub fn contains(&self, pos: Position) -> bool {
        pos.col >= 0
            && pos.row >= 0
            && (pos.col as usize) < self.size
            && (pos.row as usize) < self.size
    }

    fn index(&self, pos: Position) -> Option<usize> {
        self.contains(pos)
            .then(|| pos.row as usize * self.size + pos.col as usize)
    }

    pub fn cell(&self, pos: Position) -> Option<&Cell> {
        self.index(pos).map(|index| &self.cells[index])
    }

    /// Content at `pos`, or `None` outside the grid
    pub fn content(&self, pos: Position) -> Option<CellContent> {
        self.cell(pos).map(Cell::content)
    }

    /// The single entry point for changing what occupies a cell
    pub fn set_content(&mut self, pos: Position, content: CellContent) {
        debug_assert!(self.contains(pos), "set_content outside grid: {pos}");
        if let Some(index) = self.index(pos) {
            self.cells[index].content = content;
        }
    }

    pub fn search_fields(&self, pos: Position) -> Option<&SearchFields> {
        self.cell(pos).map(|cell| &cell.search)
    }

    pub fn search_fields_mut(&mut self, pos: Position) -> Option<&mut SearchFields> {
        let index = self.index(pos)?;
        Some(&mut self.cells[index].search)
    }

    /// In-bounds orthogonal neighbors, in [`Direction::ALL`] order
    pub fn neighbors(&self, pos: Position) -> impl Iterator<Item = Position> + '_ {
        Direction::ALL
            .into_iter()
            .map(move |direction| pos.moved_in_direction(direction))
            .filter(move |neighbor| self.contains(*neighbor))
    }

    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }

    /// Mutable access for search bookkeeping; content stays private to this module
    pub fn cells_mut(&mut self) -> impl Iterator<Item = &mut Cell> {
        self.cells.iter_mut()
    }

    /// Positions whose content equals `content`
    pub fn cells_with(&self, content: CellContent) -> impl Iterator<Item = Position> + '_ {
        self.cells
            .iter()
            .filter(move |cell| cell.content == content)
            .map(Cell::position)
    }

    /// Set every cell back to Empty
    pub fn reset(&mut self) {
        for cell in &mut self.cells {
            cell.content = CellContent::Empty;
        }
    }

    /// Revert path markers left over from the previous search
    pub fn clear_path_markers(&mut self) {
        for cell in &mut self.cells {
            if cell.content == CellContent::PathMarker {
                cell.content = CellContent::Empty;
            }
        }
    }

    /// Read-only copy of the occupancy for rendering
    pub fn snapshot(&self) -> GridSnapshot {
        GridSnapshot {
            size: self.size,
            contents: self.cells.iter().map(Cell::content).collect(),
        }
    }
}

/// Occupancy of every cell at one instant, detached from the live grid
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GridSnapshot {
    size: usize,
    contents: Vec<CellContent>,
}

impl GridSnapshot {
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn content(&self, pos: Position) -> CellContent {
        if pos.col < 0
            || pos.row < 0
            || pos.col as usize >= self.size
            || pos.row as usize >= self.size
        {
            return CellContent::Empty;
        }
        self.contents[pos.row as usize * self.size + pos.col as usize]
    }

    /// Rows top to bottom, each a slice of contents left to right
    pub fn rows(&self) -> impl Iterator<Item = &[CellContent]> {
        self.contents.chunks(self.size.max(1))
    }

    pub fn count(&self, content: CellContent) -> usize {
        self.contents.iter().filter(|c| **c == content).count()
    }
}
