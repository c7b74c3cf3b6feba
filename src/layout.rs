//! Text tilemaps.
//!
//! One line per row, the top line holds the highest `y`. Glyphs:
//! - `.` `□` `o` `+` walkable tile
//! - `s` `@` walkable tile where the unit spawns
//! - `#` `■` blocked tile, ` ` no tile
//!
//! Rows may have different lengths.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use tracing::info;

use crate::error::LayoutError;
use crate::grid::{Grid, Position};
use crate::overlay::TileHighlight;

/// A parsed tilemap
#[derive(Debug, Clone)]
pub struct Layout {
    pub grid: Grid,
    /// Spawn marker, if the layout has one
    pub spawn: Option<Position>,
}

impl Layout {
    /// Spawn cell: the marker if present, otherwise the first built cell
    pub fn spawn_or_first(&self) -> Position {
        self.spawn.unwrap_or_else(|| self.grid.first())
    }
}

/// Parse a layout. Cells are handed to the grid bottom row first, left to
/// right, so the first cell is the bottom-left walkable tile.
pub fn parse_layout(text: &str) -> Result<Layout, LayoutError> {
    let lines: Vec<&str> = text.lines().collect();
    let rows = lines.len() as i32;

    let mut walkable = Vec::new();
    let mut spawn = None;

    for (line_index, line) in lines.iter().enumerate().rev() {
        let y = rows - 1 - line_index as i32;
        for (column, ch) in line.chars().enumerate() {
            let position = Position::new(column as i32, y);
            match ch {
                '.' | '□' | 'o' | '+' => walkable.push(position),
                's' | '@' => {
                    walkable.push(position);
                    spawn = Some(position);
                }
                '#' | '■' | ' ' | '\r' => {}
                _ => {
                    return Err(LayoutError::UnknownGlyph {
                        glyph: ch,
                        line: line_index + 1,
                        column: column + 1,
                    })
                }
            }
        }
    }

    let grid = Grid::from_walkable(walkable)?;
    Ok(Layout { grid, spawn })
}

/// Read and parse a layout file
pub fn load_layout(path: impl AsRef<Path>) -> Result<Layout, LayoutError> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;
    let layout = parse_layout(&contents)?;
    info!(path = %path.display(), cells = layout.grid.len(), "loaded layout");
    Ok(layout)
}

/// Render a grid back to text: `@` unit, `o` near overlay tile, `+` far
/// overlay tile, `.` other walkable tile. Coordinates are shifted so the
/// bounding box starts at column 0.
pub fn format_layout(grid: &Grid, overlay: &[(Position, TileHighlight)], unit: Option<Position>) -> String {
    let highlights: HashMap<Position, TileHighlight> = overlay.iter().copied().collect();
    let (min, max) = grid.bounds();

    let mut result = String::new();
    for y in (min.y..=max.y).rev() {
        let mut line = String::new();
        for x in min.x..=max.x {
            let position = Position::new(x, y);
            let symbol = if Some(position) == unit {
                '@'
            } else if !grid.contains(position) {
                ' '
            } else {
                match highlights.get(&position) {
                    Some(TileHighlight::Near) => 'o',
                    Some(TileHighlight::Far) => '+',
                    None => '.',
                }
            };
            line.push(symbol);
        }
        result.push_str(line.trim_end());
        result.push('\n');
    }
    result
}
