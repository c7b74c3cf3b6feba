use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::grid::{Grid, Position};

/// Ordered cells from (excluding) the start to (including) the end
pub type Path = Vec<Position>;

/// How the distance-from-start term of a cell is computed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CostModel {
    /// `g` is the Manhattan distance from the search start, recomputed every
    /// time a cell is reached. Detours around obstacles are not accounted for.
    #[default]
    StraightLine,
    /// `g` is the step count along the best route found so far.
    Accumulated,
}

/// Scratch state of one cell during one search
#[derive(Debug, Clone, Copy, Default)]
struct Node {
    g_cost: u64,
    h_cost: u64,
    predecessor: Option<usize>,
    open: bool,
    closed: bool,
}

impl Node {
    fn f_cost(&self) -> u64 {
        self.g_cost + self.h_cost
    }
}

/// Orthogonal path search over a [`Grid`]
#[derive(Debug, Clone, Copy, Default)]
pub struct PathFinder {
    cost_model: CostModel,
}

impl PathFinder {
    pub fn new(cost_model: CostModel) -> Self {
        PathFinder { cost_model }
    }

    pub fn cost_model(&self) -> CostModel {
        self.cost_model
    }

    /// Find a path from `start` to `end`.
    ///
    /// Returns an empty path when `start == end`, when either end is not a
    /// walkable cell, or when `end` cannot be reached.
    pub fn find_path(&self, grid: &Grid, start: Position, end: Position) -> Path {
        let (Some(start_cell), Some(end_cell)) = (grid.cell(start), grid.cell(end)) else {
            debug!(?start, ?end, "path endpoint outside the grid");
            return Path::new();
        };

        let mut nodes = vec![Node::default(); grid.len()];
        // Insertion ordered; the first minimum wins ties.
        let mut open: Vec<usize> = vec![start_cell.index];
        nodes[start_cell.index].open = true;

        let mut iterations = 0;
        while !open.is_empty() {
            iterations += 1;

            let mut best = 0;
            for (slot, &index) in open.iter().enumerate().skip(1) {
                if nodes[index].f_cost() < nodes[open[best]].f_cost() {
                    best = slot;
                }
            }
            let current = open.remove(best);
            nodes[current].open = false;
            nodes[current].closed = true;

            if current == end_cell.index {
                let path = trace_back(grid, &nodes, start_cell.index, end_cell.index);
                debug!(?start, ?end, iterations, steps = path.len(), "found path");
                return path;
            }

            let Some(current_pos) = grid.position_at(current) else {
                continue;
            };
            trace!(iteration = iterations, x = current_pos.x, y = current_pos.y, "expanding");

            for neighbour in grid.neighbours(current_pos) {
                if nodes[neighbour.index].closed {
                    continue;
                }

                let g_cost = match self.cost_model {
                    CostModel::StraightLine => start.manhattan_distance(&neighbour.position),
                    CostModel::Accumulated => {
                        let g_cost = nodes[current].g_cost + 1;
                        if nodes[neighbour.index].open && g_cost >= nodes[neighbour.index].g_cost {
                            continue;
                        }
                        g_cost
                    }
                };

                let node = &mut nodes[neighbour.index];
                node.g_cost = g_cost;
                node.h_cost = end.manhattan_distance(&neighbour.position);
                node.predecessor = Some(current);
                if !node.open {
                    node.open = true;
                    open.push(neighbour.index);
                }
            }
        }

        debug!(?start, ?end, iterations, "no path found");
        Path::new()
    }
}

/// Follow predecessor links from `end` back to (but excluding) `start`
fn trace_back(grid: &Grid, nodes: &[Node], start: usize, end: usize) -> Path {
    let mut path = Path::new();
    let mut current = end;
    while current != start {
        let Some(position) = grid.position_at(current) else {
            break;
        };
        path.push(position);
        match nodes[current].predecessor {
            Some(previous) => current = previous,
            None => break,
        }
    }
    path.reverse();
    path
}

/// Convenience wrapper using the default cost model
pub fn find_path(grid: &Grid, start: Position, end: Position) -> Path {
    PathFinder::default().find_path(grid, start, end)
}

/// Format path for display
pub fn format_path(path: &[Position]) -> String {
    if path.is_empty() {
        return "No path".to_string();
    }

    let mut result = String::new();
    for (i, pos) in path.iter().enumerate() {
        if i > 0 {
            result.push_str(" -> ");
        }
        result.push_str(&format!("({},{})", pos.x, pos.y));
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plus_grid() -> Grid {
        Grid::from_walkable([(0, 0), (1, 0), (2, 0), (0, 1), (1, 1)]).unwrap()
    }

    fn p(x: i32, y: i32) -> Position {
        Position::new(x, y)
    }

    #[test]
    fn test_plus_shape_path() {
        let grid = plus_grid();
        assert_eq!(find_path(&grid, p(0, 0), p(2, 0)), vec![p(1, 0), p(2, 0)]);
    }

    #[test]
    fn test_same_cell_is_empty() {
        let grid = plus_grid();
        assert!(find_path(&grid, p(1, 1), p(1, 1)).is_empty());
    }

    #[test]
    fn test_isolated_cell_unreachable() {
        let mut cells = vec![(0, 0), (1, 0), (2, 0), (0, 1), (1, 1)];
        cells.push((5, 5));
        let grid = Grid::from_walkable(cells).unwrap();
        assert!(find_path(&grid, p(0, 0), p(5, 5)).is_empty());
    }

    #[test]
    fn test_endpoint_outside_grid() {
        let grid = plus_grid();
        assert!(find_path(&grid, p(0, 0), p(9, 9)).is_empty());
        assert!(find_path(&grid, p(9, 9), p(0, 0)).is_empty());
    }

    #[test]
    fn test_later_expansion_overwrites_predecessor() {
        // 2x2 square: both routes to the far corner cost the same. (0,1) is
        // expanded first but (1,0) is expanded last and wins the goal.
        let grid = Grid::from_walkable([(0, 0), (1, 0), (0, 1), (1, 1)]).unwrap();
        assert_eq!(find_path(&grid, p(0, 0), p(1, 1)), vec![p(1, 0), p(1, 1)]);
    }

    fn walled_grid() -> Grid {
        // 5x3 room with a wall at x=2 covering the two lower rows
        let mut cells = Vec::new();
        for y in 0..3 {
            for x in 0..5 {
                if x == 2 && y < 2 {
                    continue;
                }
                cells.push((x, y));
            }
        }
        Grid::from_walkable(cells).unwrap()
    }

    #[test]
    fn test_accumulated_cost_finds_shortest_detour() {
        let grid = walled_grid();
        let finder = PathFinder::new(CostModel::Accumulated);
        let path = finder.find_path(&grid, p(0, 0), p(4, 0));
        assert_eq!(path.len(), 8);
        assert_eq!(path.last(), Some(&p(4, 0)));
    }

    #[test]
    fn test_straight_line_detour_is_connected() {
        let grid = walled_grid();
        let path = find_path(&grid, p(0, 0), p(4, 0));
        assert_eq!(path.last(), Some(&p(4, 0)));
        assert_eq!(path[0].manhattan_distance(&p(0, 0)), 1);
        for pair in path.windows(2) {
            assert_eq!(pair[0].manhattan_distance(&pair[1]), 1);
        }
    }

    #[test]
    fn test_format_path() {
        assert_eq!(format_path(&[]), "No path");
        assert_eq!(format_path(&[p(1, 0), p(2, 0)]), "(1,0) -> (2,0)");
    }
}
