//! Cost model for one search episode
//!
//! Every cell carries `g` (steps from the start), `h` (straight-line distance
//! to the goal), `f = g + h` and a parent link. All of it is wiped and `h` is
//! recomputed for the whole grid before each search.

use crate::game::{Grid, Position};

/// Search state attached to a cell for the duration of one episode
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SearchFields {
    /// Steps from the search start
    pub g: u32,
    /// Euclidean distance to the goal
    pub h: f64,
    /// `g + h`
    pub f: f64,
    /// Predecessor on the best known route, if any
    pub parent: Option<Position>,
}

/// Straight-line distance between two cells.
///
/// Not Manhattan: the planner's optimality on ties depends on this choice.
pub fn euclidean(a: Position, b: Position) -> f64 {
    let dcol = f64::from(a.col - b.col);
    let drow = f64::from(a.row - b.row);
    (dcol * dcol + drow * drow).sqrt()
}

/// Clear `g`, `f` and `parent` on every cell and compute `h` against `goal`
pub fn prepare(grid: &mut Grid, goal: Position) {
    for cell in grid.cells_mut() {
        let h = euclidean(cell.position(), goal);
        cell.search = SearchFields {
            g: 0,
            h,
            f: 0.0,
            parent: None,
        };
    }
}

/// Record that `cell` is reached through `parent`
pub fn set_cost(grid: &mut Grid, cell: Position, parent: Position) {
    let parent_g = grid.search_fields(parent).map_or(0, |fields| fields.g);
    if let Some(fields) = grid.search_fields_mut(cell) {
        fields.g = parent_g + 1;
        fields.f = f64::from(fields.g) + fields.h;
        fields.parent = Some(parent);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_euclidean_distance() {
        assert_eq!(euclidean(Position::new(0, 0), Position::new(3, 4)), 5.0);
        assert_eq!(euclidean(Position::new(2, 2), Position::new(2, 2)), 0.0);
        assert!((euclidean(Position::new(0, 0), Position::new(1, 1)) - 2f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_prepare_resets_and_computes_heuristic() {
        let mut grid = Grid::new(5);
        let goal = Position::new(4, 4);

        set_cost(&mut grid, Position::new(1, 0), Position::new(0, 0));
        prepare(&mut grid, goal);

        for cell in grid.cells() {
            assert_eq!(cell.search.g, 0);
            assert_eq!(cell.search.f, 0.0);
            assert_eq!(cell.search.parent, None);
            assert_eq!(cell.search.h, euclidean(cell.position(), goal));
        }
    }

    #[test]
    fn test_set_cost_chains_from_parent() {
        let mut grid = Grid::new(5);
        prepare(&mut grid, Position::new(4, 0));

        set_cost(&mut grid, Position::new(1, 0), Position::new(0, 0));
        set_cost(&mut grid, Position::new(2, 0), Position::new(1, 0));

        let fields = grid.search_fields(Position::new(2, 0)).copied().unwrap();
        assert_eq!(fields.g, 2);
        assert_eq!(fields.h, 2.0);
        assert_eq!(fields.f, 4.0);
        assert_eq!(fields.parent, Some(Position::new(1, 0)));
    }
}
