use std::collections::VecDeque;

use crate::grid::Position;

/// Horizontal displacement smaller than this does not change facing
const FACING_DEAD_ZONE: f32 = 0.01;

/// Mapping between grid positions and world space
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CellMetrics {
    pub cell_width: f32,
    pub cell_height: f32,
}

impl CellMetrics {
    pub fn new(cell_width: f32, cell_height: f32) -> Self {
        CellMetrics { cell_width, cell_height }
    }

    /// World-space center of a cell
    pub fn cell_center(&self, position: Position) -> (f32, f32) {
        (
            position.x as f32 * self.cell_width + self.cell_width / 2.0,
            position.y as f32 * self.cell_height + self.cell_height / 2.0,
        )
    }

    /// Cell containing a world-space point
    pub fn cell_at(&self, fpos_x: f32, fpos_y: f32) -> Position {
        Position::new(
            (fpos_x / self.cell_width).floor() as i32,
            (fpos_y / self.cell_height).floor() as i32,
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MovementState {
    Idle,
    Moving,
}

/// Which way the sprite should look
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Facing {
    Left,
    Right,
}

/// Progress made during one tick
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MovementTick {
    /// World-space displacement applied this tick
    pub displacement: (f32, f32),
    /// Set when the head cell is noticeably left or right of the unit
    pub facing: Option<Facing>,
    /// Cells the unit snapped onto this tick
    pub arrived: Vec<Position>,
    /// The path ran out this tick
    pub completed: bool,
}

/// The controllable unit
#[derive(Clone, Debug)]
pub struct Unit {
    cell: Position,
    /// World position of the unit's center
    pub fpos_x: f32,
    pub fpos_y: f32,
    /// World units travelled per second
    pub speed: f32,
    /// Snap distance when approaching a cell center
    pub arrival_epsilon: f32,
    metrics: CellMetrics,
    path: VecDeque<Position>,
    state: MovementState,
}

impl Unit {
    /// Spawn a unit centered on `cell`
    pub fn new(cell: Position, speed: f32, arrival_epsilon: f32, metrics: CellMetrics) -> Self {
        let (fpos_x, fpos_y) = metrics.cell_center(cell);
        Unit {
            cell,
            fpos_x,
            fpos_y,
            speed,
            arrival_epsilon,
            metrics,
            path: VecDeque::new(),
            state: MovementState::Idle,
        }
    }

    /// Cell the unit currently stands on
    pub fn cell(&self) -> Position {
        self.cell
    }

    pub fn state(&self) -> MovementState {
        self.state
    }

    pub fn is_moving(&self) -> bool {
        self.state == MovementState::Moving
    }

    /// Cells still ahead of the unit
    pub fn remaining_path(&self) -> impl Iterator<Item = &Position> {
        self.path.iter()
    }

    pub fn metrics(&self) -> CellMetrics {
        self.metrics
    }

    /// Start following `path`. Returns false if the unit is already moving
    /// or the path is empty.
    pub fn follow(&mut self, path: Vec<Position>) -> bool {
        if self.is_moving() || path.is_empty() {
            return false;
        }
        self.path = path.into();
        self.state = MovementState::Moving;
        true
    }

    /// Advance toward the head of the path (call once per frame)
    pub fn update(&mut self, delta_time: f32) -> MovementTick {
        let mut tick = MovementTick::default();
        let Some(&head) = self.path.front() else {
            return tick;
        };

        let (dest_x, dest_y) = self.metrics.cell_center(head);
        let dx = dest_x - self.fpos_x;
        let dy = dest_y - self.fpos_y;
        let distance = (dx * dx + dy * dy).sqrt();

        let step = self.speed * delta_time;
        let (move_x, move_y) = if distance <= step || distance == 0.0 {
            (dx, dy)
        } else {
            (dx / distance * step, dy / distance * step)
        };
        self.fpos_x += move_x;
        self.fpos_y += move_y;
        tick.displacement = (move_x, move_y);

        if dx > FACING_DEAD_ZONE {
            tick.facing = Some(Facing::Right);
        } else if dx < -FACING_DEAD_ZONE {
            tick.facing = Some(Facing::Left);
        }

        let rx = dest_x - self.fpos_x;
        let ry = dest_y - self.fpos_y;
        if (rx * rx + ry * ry).sqrt() <= self.arrival_epsilon {
            self.fpos_x = dest_x;
            self.fpos_y = dest_y;
            self.cell = head;
            self.path.pop_front();
            tick.arrived.push(head);
        }

        if self.path.is_empty() {
            self.state = MovementState::Idle;
            tick.completed = true;
        }

        tick
    }

    /// Left, top, right, bottom of a square of `size` around the unit
    pub fn get_bounds(&self, size: f32) -> (f32, f32, f32, f32) {
        let half_size = size / 2.0;
        (
            self.fpos_x - half_size,
            self.fpos_y - half_size,
            self.fpos_x + half_size,
            self.fpos_y + half_size,
        )
    }
}
