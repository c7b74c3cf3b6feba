//! Movement range flood fill and the tile overlay built on top of it.

use std::collections::HashSet;

use tracing::debug;

use crate::grid::{Grid, Position};

/// Cells reachable from an origin within a step budget, origin included
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReachableSet {
    cells: HashSet<Position>,
}

impl ReachableSet {
    pub fn contains(&self, position: Position) -> bool {
        self.cells.contains(&position)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn is_subset(&self, other: &ReachableSet) -> bool {
        self.cells.is_subset(&other.cells)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Position> {
        self.cells.iter()
    }

    /// Members in (y, x) order, for deterministic rendering and logs
    pub fn sorted(&self) -> Vec<Position> {
        let mut cells: Vec<Position> = self.cells.iter().copied().collect();
        cells.sort_by_key(|p| (p.y, p.x));
        cells
    }
}

/// Flood fill `budget` steps out from `origin`.
///
/// Every step expands the whole previous frontier, even cells that were
/// already reached by a shorter route, so membership is what this
/// guarantees, not distance layering.
pub fn find_reachable(grid: &Grid, origin: Position, budget: u32) -> ReachableSet {
    let mut result = HashSet::new();
    result.insert(origin);
    if !grid.contains(origin) {
        return ReachableSet { cells: result };
    }
    let mut frontier = vec![origin];

    for _ in 0..budget {
        let mut seen = HashSet::new();
        let mut next = Vec::new();
        for &cell in &frontier {
            for neighbour in grid.neighbours(cell) {
                if seen.insert(neighbour.position) {
                    next.push(neighbour.position);
                }
            }
        }
        result.extend(next.iter().copied());
        if next.is_empty() {
            break;
        }
        frontier = next;
    }

    ReachableSet { cells: result }
}

/// How a shown tile should be drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileHighlight {
    Near,
    /// Only reachable with the full budget
    Far,
}

/// Tiles the renderer must hide and show after an overlay refresh
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OverlayChange {
    pub hidden: Vec<Position>,
    pub shown: Vec<(Position, TileHighlight)>,
}

/// Currently displayed movement range
#[derive(Debug, Default)]
pub struct MoveOverlay {
    reachable: ReachableSet,
    tiles: Vec<(Position, TileHighlight)>,
}

impl MoveOverlay {
    pub fn new() -> Self {
        MoveOverlay::default()
    }

    pub fn reachable(&self) -> &ReachableSet {
        &self.reachable
    }

    /// Shown tiles in (y, x) order
    pub fn tiles(&self) -> &[(Position, TileHighlight)] {
        &self.tiles
    }

    /// Replace the displayed range with the one around `origin`
    pub fn show_surrounding_tiles(&mut self, grid: &Grid, origin: Position, budget: u32) -> OverlayChange {
        let hidden = self.clear();

        let reachable = find_reachable(grid, origin, budget);
        let close = find_reachable(grid, origin, budget.saturating_sub(1));

        let shown: Vec<(Position, TileHighlight)> = reachable
            .sorted()
            .into_iter()
            .map(|p| {
                let highlight = if close.contains(p) { TileHighlight::Near } else { TileHighlight::Far };
                (p, highlight)
            })
            .collect();

        debug!(
            origin_x = origin.x,
            origin_y = origin.y,
            budget,
            tiles = reachable.len(),
            "refreshed move overlay"
        );

        self.reachable = reachable;
        self.tiles = shown.clone();
        OverlayChange { hidden, shown }
    }

    /// Drop the displayed range, returning the tiles to hide
    pub fn clear(&mut self) -> Vec<Position> {
        self.reachable = ReachableSet::default();
        self.tiles.drain(..).map(|(p, _)| p).collect()
    }
}
