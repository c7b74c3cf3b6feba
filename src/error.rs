use thiserror::Error;

use crate::grid::Position;

/// Grid construction failures
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BuildError {
    #[error("no walkable cells to build a grid from")]
    Empty,
}

/// Reasons a destination selection was ignored
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SelectError {
    #[error("destination ({}, {}) is outside the movement range", .0.x, .0.y)]
    InvalidDestination(Position),
    #[error("unit is still moving")]
    UnitBusy,
}

/// Layout loading failures
#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("failed to read layout: {0}")]
    Io(#[from] std::io::Error),
    #[error("unknown glyph {glyph:?} at line {line}, column {column}")]
    UnknownGlyph { glyph: char, line: usize, column: usize },
    #[error(transparent)]
    Build(#[from] BuildError),
}

/// Configuration file failures
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),
}
