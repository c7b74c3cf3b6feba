pub mod action_log;
pub mod config;
pub mod error;
pub mod grid;
pub mod layout;
pub mod overlay;
pub mod pathfinding;
pub mod session;
pub mod unit;

pub use error::{BuildError, ConfigError, LayoutError, SelectError};
pub use grid::{Cell, Grid, Position};
pub use overlay::{find_reachable, MoveOverlay, OverlayChange, ReachableSet, TileHighlight};
pub use pathfinding::{find_path, CostModel, Path, PathFinder};
pub use session::{Event, Selection, Session, SessionSettings, TickReport};
pub use unit::{CellMetrics, Facing, MovementState, Unit};
