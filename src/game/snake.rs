use rand::Rng;
use rand::seq::SliceRandom;

use super::action::Direction;
use super::grid::{CellContent, Grid};
use super::state::Position;
use crate::search::Path;

/// What a single move did to the snake
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// Direction would fold the head back onto the neck; nothing changed
    Rejected,
    /// Head advanced, tail followed
    Moved,
    /// Head advanced onto food and the tail was kept
    Grew,
    /// Target lies outside the grid; nothing changed
    HitWall,
}

impl MoveOutcome {
    pub fn grew(&self) -> bool {
        matches!(self, MoveOutcome::Grew)
    }
}

/// The snake in the game
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    /// Body segments, with head at index 0
    pub body: Vec<Position>,
    /// Direction of the last accepted move
    pub direction: Direction,
}

impl Snake {
    /// Create a new snake heading in `direction` with `length - 1` segments trailing behind
    pub fn new(head: Position, direction: Direction, length: usize) -> Self {
        let mut body = vec![head];

        let back = direction.opposite();
        for i in 1..length {
            let prev = body[i - 1];
            body.push(prev.moved_in_direction(back));
        }

        Self { body, direction }
    }

    /// Write the snake's cells onto the grid
    pub fn place(&self, grid: &mut Grid) {
        for (i, &segment) in self.body.iter().enumerate() {
            let content = if i == 0 {
                CellContent::Head
            } else {
                CellContent::Body
            };
            grid.set_content(segment, content);
        }
    }

    /// Get the head position
    pub fn head(&self) -> Position {
        self.body[0]
    }

    /// Get the tail position (last segment)
    pub fn tail(&self) -> Position {
        self.body[self.body.len() - 1]
    }

    /// Get body segments (excluding head)
    pub fn body_segments(&self) -> &[Position] {
        &self.body[1..]
    }

    /// Check if position collides with snake body (excluding head)
    pub fn collides_with_body(&self, pos: Position) -> bool {
        self.body_segments().contains(&pos)
    }

    /// True when any segment, head included, sits on `pos`
    pub fn occupies(&self, pos: Position) -> bool {
        self.body.contains(&pos)
    }

    /// Some non-head segment shares the head's cell
    pub fn has_self_collision(&self) -> bool {
        self.collides_with_body(self.head())
    }

    /// A direction is invalid when it would land exactly on the second segment
    pub fn is_valid_direction(&self, direction: Direction) -> bool {
        match self.body.get(1) {
            Some(&neck) => self.head().moved_in_direction(direction) != neck,
            None => true,
        }
    }

    /// Move the head one cell in `direction`, updating the grid.
    ///
    /// The tail cell is vacated before the target is written, so following
    /// the tail into the cell it leaves is legal. Moving onto `Food` keeps the
    /// tail and grows the snake by one.
    pub fn step(&mut self, grid: &mut Grid, direction: Direction) -> MoveOutcome {
        if !self.is_valid_direction(direction) {
            return MoveOutcome::Rejected;
        }

        let target = self.head().moved_in_direction(direction);
        let Some(target_content) = grid.content(target) else {
            return MoveOutcome::HitWall;
        };
        let grows = target_content == CellContent::Food;

        grid.set_content(self.head(), CellContent::Body);
        if !grows {
            if let Some(tail) = self.body.pop() {
                grid.set_content(tail, CellContent::Empty);
            }
        }

        grid.set_content(target, CellContent::Head);
        self.body.insert(0, target);
        self.direction = direction;

        if grows {
            MoveOutcome::Grew
        } else {
            MoveOutcome::Moved
        }
    }

    /// Take the path's next hop.
    ///
    /// Returns `None` without moving when the path is empty or does not start
    /// next to the head.
    pub fn advance_along(&mut self, grid: &mut Grid, path: &Path) -> Option<MoveOutcome> {
        let hop = path.next_hop()?;
        let direction = self.head().direction_to(hop)?;
        Some(self.step(grid, direction))
    }

    /// Best-effort move when no path exists.
    ///
    /// Steps onto the first Empty or path-marked neighbor. With none, picks a
    /// random non-reversing direction, which may well be fatal.
    pub fn fallback_move<R: Rng + ?Sized>(&mut self, grid: &mut Grid, rng: &mut R) -> MoveOutcome {
        let head = self.head();
        let safe = grid
            .neighbors(head)
            .find(|neighbor| grid.content(*neighbor).is_some_and(CellContent::is_safe));

        let direction = match safe.and_then(|target| head.direction_to(target)) {
            Some(direction) => direction,
            None => {
                let options: Vec<Direction> = Direction::ALL
                    .into_iter()
                    .filter(|d| self.is_valid_direction(*d))
                    .collect();
                options.choose(rng).copied().unwrap_or(self.direction)
            }
        };

        self.step(grid, direction)
    }

    /// Get the length of the snake
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Check if the snake is empty (should never happen in practice)
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}
