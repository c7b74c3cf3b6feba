//! Owns the grid, the move overlay, the path finder and the unit, and ties
//! destination selection and per-frame movement together.

use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::SelectError;
use crate::grid::{Grid, Position};
use crate::overlay::{MoveOverlay, OverlayChange};
use crate::pathfinding::{CostModel, Path, PathFinder};
use crate::unit::{CellMetrics, Facing, Unit};

/// Tunables for a session
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SessionSettings {
    pub move_range: u32,
    pub movement_speed: f32,
    pub arrival_epsilon: f32,
    pub metrics: CellMetrics,
    pub cost_model: CostModel,
}

impl SessionSettings {
    /// Replace values that would keep the unit from ever arriving with the
    /// defaults
    pub fn validated(self) -> Self {
        let defaults = SessionSettings::from(&Config::default());
        let mut settings = self;
        if !(settings.movement_speed.is_finite() && settings.movement_speed > 0.0) {
            warn!(speed = settings.movement_speed, "movement speed must be positive, using default");
            settings.movement_speed = defaults.movement_speed;
        }
        if !(settings.arrival_epsilon.is_finite() && settings.arrival_epsilon >= 0.0) {
            warn!(epsilon = settings.arrival_epsilon, "arrival epsilon must not be negative, using default");
            settings.arrival_epsilon = defaults.arrival_epsilon;
        }
        let CellMetrics { cell_width, cell_height } = settings.metrics;
        if !(cell_width.is_finite() && cell_width > 0.0 && cell_height.is_finite() && cell_height > 0.0) {
            warn!(cell_width, cell_height, "cell size must be positive, using default");
            settings.metrics = defaults.metrics;
        }
        settings
    }
}

impl Default for SessionSettings {
    fn default() -> Self {
        SessionSettings::from(&Config::default())
    }
}

impl From<&Config> for SessionSettings {
    fn from(config: &Config) -> Self {
        SessionSettings {
            move_range: config.unit.move_range,
            movement_speed: config.unit.movement_speed,
            arrival_epsilon: config.unit.arrival_epsilon,
            metrics: CellMetrics::new(config.grid.cell_width, config.grid.cell_height),
            cost_model: config.pathfinding.cost_model,
        }
    }
}

/// Notifications for whoever drives the session
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    DestinationSelected { destination: Position, path: Path },
    MovementCompleted { cell: Position },
}

/// Result of an accepted destination
#[derive(Clone, Debug, PartialEq)]
pub struct Selection {
    pub destination: Position,
    /// Empty when the destination is the unit's own cell or unreachable
    pub path: Path,
    /// Overlay tiles the renderer should fade out; the destination stays
    pub fade_out: Vec<Position>,
    pub event: Event,
}

/// What happened during one frame
#[derive(Clone, Debug, PartialEq)]
pub struct TickReport {
    pub cell: Position,
    pub moving: bool,
    pub displacement: (f32, f32),
    pub facing: Option<Facing>,
    pub arrived: Vec<Position>,
    /// Refreshed move overlay after the unit came to rest
    pub overlay: Option<OverlayChange>,
    pub events: Vec<Event>,
}

pub struct Session {
    grid: Grid,
    overlay: MoveOverlay,
    path_finder: PathFinder,
    unit: Unit,
    move_range: u32,
}

impl Session {
    /// Spawn the unit on `spawn` (or the first grid cell if `spawn` is not
    /// walkable) and show its movement range.
    pub fn new(grid: Grid, spawn: Position, settings: SessionSettings) -> Self {
        let settings = settings.validated();
        let spawn = if grid.contains(spawn) {
            spawn
        } else {
            warn!(x = spawn.x, y = spawn.y, "spawn cell is not walkable, using first cell");
            grid.first()
        };

        let unit = Unit::new(spawn, settings.movement_speed, settings.arrival_epsilon, settings.metrics);
        let mut session = Session {
            grid,
            overlay: MoveOverlay::new(),
            path_finder: PathFinder::new(settings.cost_model),
            unit,
            move_range: settings.move_range,
        };
        session.refresh_overlay();
        info!(x = spawn.x, y = spawn.y, range = settings.move_range, "unit spawned");
        session
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn overlay(&self) -> &MoveOverlay {
        &self.overlay
    }

    pub fn unit(&self) -> &Unit {
        &self.unit
    }

    pub fn move_range(&self) -> u32 {
        self.move_range
    }

    fn refresh_overlay(&mut self) -> OverlayChange {
        self.overlay
            .show_surrounding_tiles(&self.grid, self.unit.cell(), self.move_range)
    }

    /// Validate a clicked cell against the movement range and start moving
    /// toward it.
    pub fn select_destination(&mut self, destination: Position) -> Result<Selection, SelectError> {
        if self.unit.is_moving() {
            debug!(x = destination.x, y = destination.y, "ignoring destination while moving");
            return Err(SelectError::UnitBusy);
        }
        if !self.overlay.reachable().contains(destination) {
            debug!(x = destination.x, y = destination.y, "destination outside movement range");
            return Err(SelectError::InvalidDestination(destination));
        }

        let path = self
            .path_finder
            .find_path(&self.grid, self.unit.cell(), destination);

        let fade_out = if path.is_empty() {
            Vec::new()
        } else {
            self.overlay
                .tiles()
                .iter()
                .map(|(p, _)| *p)
                .filter(|p| *p != destination)
                .collect()
        };

        self.unit.follow(path.clone());
        info!(x = destination.x, y = destination.y, steps = path.len(), "destination selected");

        Ok(Selection {
            destination,
            event: Event::DestinationSelected { destination, path: path.clone() },
            path,
            fade_out,
        })
    }

    /// Advance the unit by `delta_time` seconds
    pub fn tick(&mut self, delta_time: f32) -> TickReport {
        let was_moving = self.unit.is_moving();
        let movement = self.unit.update(delta_time);

        let mut overlay = None;
        let mut events = Vec::new();
        if was_moving && movement.completed {
            let cell = self.unit.cell();
            overlay = Some(self.refresh_overlay());
            events.push(Event::MovementCompleted { cell });
            info!(x = cell.x, y = cell.y, "movement completed");
        }

        TickReport {
            cell: self.unit.cell(),
            moving: self.unit.is_moving(),
            displacement: movement.displacement,
            facing: movement.facing,
            arrived: movement.arrived,
            overlay,
            events,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::overlay::TileHighlight;

    fn plus_session() -> Session {
        let grid = Grid::from_walkable([(0, 0), (1, 0), (2, 0), (0, 1), (1, 1)]).unwrap();
        let settings = SessionSettings {
            move_range: 1,
            ..SessionSettings::default()
        };
        Session::new(grid, Position::new(0, 0), settings)
    }

    #[test]
    fn test_spawn_shows_range() {
        let session = plus_session();
        assert_eq!(session.unit().cell(), Position::new(0, 0));
        assert_eq!(session.overlay().reachable().len(), 3);
    }

    #[test]
    fn test_bad_spawn_falls_back_to_first_cell() {
        let grid = Grid::from_walkable([(4, 4), (5, 4)]).unwrap();
        let session = Session::new(grid, Position::new(0, 0), SessionSettings::default());
        assert_eq!(session.unit().cell(), Position::new(4, 4));
    }

    #[test]
    fn test_rejects_out_of_range() {
        let mut session = plus_session();
        let err = session.select_destination(Position::new(2, 0)).unwrap_err();
        assert_eq!(err, SelectError::InvalidDestination(Position::new(2, 0)));
        assert!(!session.unit().is_moving());
    }

    #[test]
    fn test_own_cell_is_a_no_op() {
        let mut session = plus_session();
        let selection = session.select_destination(Position::new(0, 0)).unwrap();
        assert!(selection.path.is_empty());
        assert!(selection.fade_out.is_empty());
        assert!(!session.unit().is_moving());
    }

    #[test]
    fn test_move_and_refresh() {
        let mut session = plus_session();
        let selection = session.select_destination(Position::new(1, 0)).unwrap();
        assert_eq!(selection.path, vec![Position::new(1, 0)]);
        assert_eq!(selection.fade_out, vec![Position::new(0, 0), Position::new(0, 1)]);
        assert_eq!(session.select_destination(Position::new(0, 1)), Err(SelectError::UnitBusy));

        let report = session.tick(1.0);
        assert_eq!(report.cell, Position::new(1, 0));
        assert!(!report.moving);
        assert_eq!(report.events, vec![Event::MovementCompleted { cell: Position::new(1, 0) }]);

        let overlay = report.overlay.unwrap();
        assert_eq!(overlay.hidden.len(), 3);
        assert!(overlay.shown.contains(&(Position::new(2, 0), TileHighlight::Far)));
        assert!(session.overlay().reachable().contains(Position::new(1, 1)));
    }

    #[test]
    fn test_bad_speed_and_epsilon_fall_back() {
        let settings = SessionSettings {
            movement_speed: 0.0,
            arrival_epsilon: -1.0,
            metrics: CellMetrics::new(0.0, 1.0),
            ..SessionSettings::default()
        }
        .validated();
        let defaults = SessionSettings::default();
        assert_eq!(settings.movement_speed, defaults.movement_speed);
        assert_eq!(settings.arrival_epsilon, defaults.arrival_epsilon);
        assert_eq!(settings.metrics, defaults.metrics);

        let zero_epsilon = SessionSettings { arrival_epsilon: 0.0, ..defaults }.validated();
        assert_eq!(zero_epsilon.arrival_epsilon, 0.0);
    }

    #[test]
    fn test_idle_tick_reports_nothing() {
        let mut session = plus_session();
        let report = session.tick(0.5);
        assert!(report.events.is_empty());
        assert!(report.overlay.is_none());
        assert_eq!(report.displacement, (0.0, 0.0));
    }
}
