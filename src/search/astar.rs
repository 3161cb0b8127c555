//! Frontier search from the snake's head to the food
//!
//! The frontier is a plain FIFO queue. Expansion pops the front; a neighbor is
//! only admitted when its current `f` is strictly below the `f` of whatever
//! sits at the front of the queue at that moment (all neighbors are admitted
//! when the queue is empty). Visited cells and `Body` cells are never
//! admitted. Cells that were never costed in this episode have `f == 0`, so
//! they always pass the admission test; already-queued cells only get
//! re-parented when they look better than the queue head.
//!
//! The expansion order decides which path wins among equal-length routes, so
//! it must stay exactly as described above.

use std::collections::{HashSet, VecDeque};

use super::cost;
use crate::game::{CellContent, Grid, Position};

/// Ordered cells from the goal back to the cell next to the start
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Path {
    cells: Vec<Position>,
}

impl Path {
    pub fn new(cells: Vec<Position>) -> Self {
        Self { cells }
    }

    /// Goal-first cells
    pub fn cells(&self) -> &[Position] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    #[cfg(test)]
    pub(crate) fn goal(&self) -> Option<Position> {
        self.cells.first().copied()
    }

    /// The hop to take next: the element adjacent to the start
    pub fn next_hop(&self) -> Option<Position> {
        self.cells.last().copied()
    }
}

/// Counters for one search episode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SearchStats {
    /// Frontier pops that were expanded
    pub expanded: usize,
    /// Cells appended to the frontier
    pub pushed: usize,
}

/// Result of one search episode
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SearchOutcome {
    /// `None` when the frontier ran dry before reaching the goal
    pub path: Option<Path>,
    pub stats: SearchStats,
}

/// Plan a path from `start` to `goal`.
///
/// Returns `None` when the goal is unreachable, which happens routinely once
/// the snake's own body walls the food off.
pub fn find_path(grid: &mut Grid, start: Position, goal: Position) -> Option<Path> {
    search(grid, start, goal).path
}

/// [`find_path`] plus the episode's counters.
///
/// Empty cells on a returned path are tagged [`CellContent::PathMarker`];
/// the caller clears them before the next search.
pub fn search(grid: &mut Grid, start: Position, goal: Position) -> SearchOutcome {
    cost::prepare(grid, goal);

    let mut frontier = VecDeque::from([start]);
    let mut visited = HashSet::new();
    let mut stats = SearchStats::default();

    while let Some(current) = frontier.pop_front() {
        if current == goal {
            let path = reconstruct(grid, start, current);
            mark_path(grid, &path);
            return SearchOutcome {
                path: Some(path),
                stats,
            };
        }

        visited.insert(current);
        stats.expanded += 1;

        let threshold = frontier
            .front()
            .and_then(|first| grid.search_fields(*first))
            .map(|fields| fields.f);

        let admitted: Vec<Position> = grid
            .neighbors(current)
            .filter(|neighbor| match threshold {
                Some(limit) => f_of(grid, *neighbor) < limit,
                None => true,
            })
            .filter(|neighbor| !visited.contains(neighbor))
            .filter(|neighbor| grid.content(*neighbor).is_some_and(CellContent::is_passable))
            .collect();

        for neighbor in admitted {
            cost::set_cost(grid, neighbor, current);
            frontier.push_back(neighbor);
            stats.pushed += 1;
        }
    }

    SearchOutcome { path: None, stats }
}

fn f_of(grid: &Grid, pos: Position) -> f64 {
    grid.search_fields(pos).map_or(f64::INFINITY, |fields| fields.f)
}

/// Follow parent links from `end` back to, but excluding, `start`
fn reconstruct(grid: &Grid, start: Position, end: Position) -> Path {
    let mut cells = Vec::new();
    let mut cursor = end;

    // Parent chains are acyclic, the length cap only guards against corrupt fields
    while cursor != start && cells.len() < grid.len() {
        cells.push(cursor);
        match grid.search_fields(cursor).and_then(|fields| fields.parent) {
            Some(parent) => cursor = parent,
            None => break,
        }
    }

    Path::new(cells)
}

fn mark_path(grid: &mut Grid, path: &Path) {
    for &pos in path.cells() {
        if grid.content(pos) == Some(CellContent::Empty) {
            grid.set_content(pos, CellContent::PathMarker);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn place_snake(grid: &mut Grid, segments: &[(i32, i32)]) {
        for (i, &(col, row)) in segments.iter().enumerate() {
            let content = if i == 0 {
                CellContent::Head
            } else {
                CellContent::Body
            };
            grid.set_content(Position::new(col, row), content);
        }
    }

    /// Plain breadth-first distance through non-Body cells
    fn bfs_distance(grid: &Grid, start: Position, goal: Position) -> Option<usize> {
        let mut seen = HashSet::from([start]);
        let mut queue = VecDeque::from([(start, 0usize)]);
        while let Some((pos, dist)) = queue.pop_front() {
            if pos == goal {
                return Some(dist);
            }
            for next in grid.neighbors(pos) {
                let passable = grid.content(next).is_some_and(CellContent::is_passable);
                if passable && seen.insert(next) {
                    queue.push_back((next, dist + 1));
                }
            }
        }
        None
    }

    fn assert_well_formed(path: &Path, start: Position, goal: Position) {
        assert_eq!(path.goal(), Some(goal));
        let hop = path.next_hop().unwrap();
        assert!(hop.is_adjacent(start), "{hop} not next to {start}");
        for pair in path.cells().windows(2) {
            assert!(pair[0].is_adjacent(pair[1]), "{} -> {}", pair[0], pair[1]);
        }
    }

    #[test]
    fn test_straight_line_from_starting_position() {
        let mut grid = Grid::new(15);
        place_snake(&mut grid, &[(5, 3), (4, 3), (3, 3), (2, 3), (1, 3)]);
        grid.set_content(Position::new(10, 3), CellContent::Food);

        let path = find_path(&mut grid, Position::new(5, 3), Position::new(10, 3)).unwrap();

        let expected: Vec<Position> = [(10, 3), (9, 3), (8, 3), (7, 3), (6, 3)]
            .iter()
            .map(|&(c, r)| Position::new(c, r))
            .collect();
        assert_eq!(path.cells(), expected.as_slice());
        assert_eq!(path.next_hop(), Some(Position::new(6, 3)));
    }

    #[test]
    fn test_path_marks_empty_cells_only() {
        let mut grid = Grid::new(15);
        place_snake(&mut grid, &[(5, 3), (4, 3), (3, 3), (2, 3), (1, 3)]);
        grid.set_content(Position::new(10, 3), CellContent::Food);

        find_path(&mut grid, Position::new(5, 3), Position::new(10, 3)).unwrap();

        assert_eq!(grid.cells_with(CellContent::PathMarker).count(), 4);
        assert_eq!(grid.content(Position::new(10, 3)), Some(CellContent::Food));
        assert_eq!(grid.content(Position::new(5, 3)), Some(CellContent::Head));
    }

    #[test]
    fn test_enclosed_goal_is_unreachable() {
        let mut grid = Grid::new(6);
        for (col, row) in [(2, 1), (2, 3), (1, 2), (3, 2)] {
            grid.set_content(Position::new(col, row), CellContent::Body);
        }
        grid.set_content(Position::new(5, 5), CellContent::Head);

        let outcome = search(&mut grid, Position::new(5, 5), Position::new(2, 2));

        assert!(outcome.path.is_none());
        assert!(outcome.stats.expanded > 0);
        assert_eq!(grid.cells_with(CellContent::PathMarker).count(), 0);
    }

    #[test]
    fn test_routes_around_body() {
        let mut grid = Grid::new(8);
        // Vertical wall of body with a gap at the bottom
        for row in 0..7 {
            grid.set_content(Position::new(4, row), CellContent::Body);
        }
        let start = Position::new(1, 1);
        let goal = Position::new(6, 1);

        let path = find_path(&mut grid, start, goal).unwrap();

        assert_well_formed(&path, start, goal);
        assert!(path.cells().contains(&Position::new(4, 7)));
        assert_eq!(Some(path.len()), bfs_distance(&grid, start, goal));
    }

    #[test]
    fn test_paths_are_adjacent_chains_on_open_grids() {
        for size in 4..=7 {
            let mut grid = Grid::new(size);
            let n = size as i32;
            for start_index in 0..n * n {
                let start = Position::new(start_index % n, start_index / n);
                let goal = Position::new(n - 1 - start.col, (start.row + 2) % n);
                if goal == start {
                    continue;
                }

                let path = find_path(&mut grid, start, goal).unwrap();

                assert_well_formed(&path, start, goal);
                assert_eq!(Some(path.len()), bfs_distance(&grid, start, goal));
                grid.clear_path_markers();
            }
        }
    }

    #[test]
    fn test_found_iff_reachable_with_obstacles() {
        let mut grid = Grid::new(6);
        for (col, row) in [
            (1, 0),
            (1, 1),
            (1, 2),
            (3, 3),
            (4, 3),
            (5, 3),
            (3, 4),
            (4, 4),
            (4, 5),
        ] {
            grid.set_content(Position::new(col, row), CellContent::Body);
        }
        let start = Position::new(0, 0);
        assert_eq!(bfs_distance(&grid, start, Position::new(5, 5)), None);

        for row in 0..6 {
            for col in 0..6 {
                let goal = Position::new(col, row);
                if goal == start || grid.content(goal) == Some(CellContent::Body) {
                    continue;
                }
                let expected = bfs_distance(&grid, start, goal);
                let path = find_path(&mut grid, start, goal);
                assert_eq!(path.as_ref().map(Path::len), expected, "goal {goal}");
                if let Some(path) = path {
                    assert_well_formed(&path, start, goal);
                }
                grid.clear_path_markers();
            }
        }
    }

    #[test]
    fn test_goal_equal_to_start_gives_empty_path() {
        let mut grid = Grid::new(4);
        let path = find_path(&mut grid, Position::new(1, 1), Position::new(1, 1)).unwrap();
        assert!(path.is_empty());
        assert_eq!(path.next_hop(), None);
    }
}
