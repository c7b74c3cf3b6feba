use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::BuildError;

/// A position on the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Position { x, y }
    }

    /// Sum of absolute coordinate differences
    pub fn manhattan_distance(&self, other: &Position) -> u64 {
        u64::from(self.x.abs_diff(other.x)) + u64::from(self.y.abs_diff(other.y))
    }

    /// Cells one step away, in lookup order: up, down, right, left. Steps
    /// past the edge of the coordinate range are skipped.
    pub fn orthogonal(&self) -> impl Iterator<Item = Position> {
        let Position { x, y } = *self;
        [
            y.checked_add(1).map(|y| Position::new(x, y)),
            y.checked_sub(1).map(|y| Position::new(x, y)),
            x.checked_add(1).map(|x| Position::new(x, y)),
            x.checked_sub(1).map(|x| Position::new(x, y)),
        ]
        .into_iter()
        .flatten()
    }
}

impl From<(i32, i32)> for Position {
    fn from((x, y): (i32, i32)) -> Self {
        Position::new(x, y)
    }
}

/// A single walkable tile.
///
/// `index` is the cell's slot in the grid's arena (build order); search
/// scratch state is stored in vectors indexed by it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub position: Position,
    pub index: usize,
}

/// Walkable cells keyed by position
#[derive(Debug, Clone)]
pub struct Grid {
    cells: HashMap<Position, Cell>,
    order: Vec<Position>,
}

impl Grid {
    /// Build a grid from walkable coordinates. Duplicates are ignored, the
    /// first occurrence keeps its arena slot.
    pub fn from_walkable<I, P>(walkable: I) -> Result<Self, BuildError>
    where
        I: IntoIterator<Item = P>,
        P: Into<Position>,
    {
        let mut cells = HashMap::new();
        let mut order = Vec::new();

        for position in walkable {
            let position = position.into();
            if cells.contains_key(&position) {
                continue;
            }
            let index = order.len();
            cells.insert(position, Cell { position, index });
            order.push(position);
        }

        if order.is_empty() {
            return Err(BuildError::Empty);
        }

        debug!(cells = order.len(), "built grid");
        Ok(Grid { cells, order })
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn contains(&self, position: Position) -> bool {
        self.cells.contains_key(&position)
    }

    pub fn cell(&self, position: Position) -> Option<&Cell> {
        self.cells.get(&position)
    }

    /// Position stored in the given arena slot
    pub fn position_at(&self, index: usize) -> Option<Position> {
        self.order.get(index).copied()
    }

    /// All walkable positions in build order
    pub fn positions(&self) -> &[Position] {
        &self.order
    }

    /// First cell handed to the builder, used as the default spawn point
    pub fn first(&self) -> Position {
        // from_walkable refuses empty input
        self.order[0]
    }

    /// Lowest and highest corners of the bounding box
    pub fn bounds(&self) -> (Position, Position) {
        let mut min = self.order[0];
        let mut max = self.order[0];
        for p in &self.order {
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
        }
        (min, max)
    }

    /// Walkable neighbours of `position`: up, down, right, left
    pub fn neighbours(&self, position: Position) -> impl Iterator<Item = &Cell> + '_ {
        position
            .orthogonal()
            .filter_map(move |candidate| self.cells.get(&candidate))
    }
}
