#![allow(dead_code)]

use tilewalk::layout::parse_layout;
use tilewalk::{Grid, Position};

/// The walkable plus used throughout the scenarios
pub fn plus_grid() -> Grid {
    Grid::from_walkable([(0, 0), (1, 0), (2, 0), (0, 1), (1, 1)]).unwrap()
}

/// Plus shape with an isolated cell at (5, 5)
pub fn plus_with_island() -> Grid {
    Grid::from_walkable([(0, 0), (1, 0), (2, 0), (0, 1), (1, 1), (5, 5)]).unwrap()
}

/// Fully walkable `cols` x `rows` rectangle anchored at the origin
pub fn open_room(cols: i32, rows: i32) -> Grid {
    let mut cells = Vec::new();
    for y in 0..rows {
        for x in 0..cols {
            cells.push((x, y));
        }
    }
    Grid::from_walkable(cells).unwrap()
}

/// Build a grid from layout text
pub fn grid_from(text: &str) -> Grid {
    parse_layout(text).unwrap().grid
}

/// Check that every step of `path` moves exactly one cell, starting next to `start`
pub fn assert_connected(grid: &Grid, start: Position, path: &[Position]) {
    let mut previous = start;
    for &step in path {
        assert!(grid.contains(step), "path leaves the grid at ({},{})", step.x, step.y);
        assert_eq!(
            previous.manhattan_distance(&step),
            1,
            "({},{}) -> ({},{}) is not one orthogonal step",
            previous.x,
            previous.y,
            step.x,
            step.y
        );
        previous = step;
    }
}

/// Visualize a path on a grid, top row first
pub fn visualize_path(grid: &Grid, path: &[Position], start: Position) -> String {
    let (min, max) = grid.bounds();
    let mut result = String::new();
    for y in (min.y..=max.y).rev() {
        for x in min.x..=max.x {
            let pos = Position::new(x, y);
            let symbol = if pos == start {
                'S'
            } else if path.last() == Some(&pos) {
                'D'
            } else if path.contains(&pos) {
                '*'
            } else if grid.contains(pos) {
                '.'
            } else {
                '█'
            };
            result.push(symbol);
        }
        result.push('\n');
    }
    result
}
