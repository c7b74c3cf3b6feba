use std::collections::HashMap;
use std::path::Path;
use std::sync::OnceLock;

use arboard::Clipboard;
use macroquad::prelude::*;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use tilewalk::action_log::{Action, ActionLog};
use tilewalk::config::{Config, CONFIG_PATH};
use tilewalk::layout::{format_layout, load_layout, parse_layout, Layout};
use tilewalk::{ConfigError, Facing, OverlayChange, Position, Session, SessionSettings, TileHighlight};

/// Used when the configured layout file can't be loaded
const FALLBACK_LAYOUT: &str = concat!(
    "  .......\n",
    " ..##.....\n",
    ".....#....\n",
    "s....#...\n",
    " .........\n",
);

/// Read once, before the window opens; logged after tracing is installed
static STARTUP_CONFIG: OnceLock<Result<Config, ConfigError>> = OnceLock::new();

const MARGIN: f32 = 40.0;
const CURSOR_MIN_SCALE: f32 = 0.75;
const CURSOR_MAX_SCALE: f32 = 1.0;

/// Overlay tile as currently drawn
struct TileView {
    alpha: f32,
    fading_out: bool,
    highlight: TileHighlight,
}

/// Pulsing square that follows the hovered tile
struct Cursor {
    scale: f32,
    shrinking: bool,
}

impl Cursor {
    fn pulse(&mut self, speed: f32, dt: f32) {
        if self.scale <= CURSOR_MIN_SCALE {
            self.shrinking = false;
        }
        if self.scale >= CURSOR_MAX_SCALE {
            self.shrinking = true;
        }
        let delta = speed * dt;
        self.scale += if self.shrinking { -delta } else { delta };
    }
}

/// Everything the host owns besides the session
struct VisState {
    session: Session,
    tiles: HashMap<Position, TileView>,
    cursor: Cursor,
    hovered: Option<Position>,
    facing: Facing,
    action_log: ActionLog,
    pixels_per_unit: f32,
    fade_speed: f32,
    pulse_speed: f32,
    background: Color,
}

impl VisState {
    fn new(config: &Config, layout: Layout) -> Self {
        let spawn = layout.spawn_or_first();
        let session = Session::new(layout.grid, spawn, SessionSettings::from(config));

        let mut action_log = ActionLog::new();
        action_log.log_finish(Action::spawn(session.unit().cell()));

        let mut state = VisState {
            session,
            tiles: HashMap::new(),
            cursor: Cursor { scale: CURSOR_MAX_SCALE, shrinking: true },
            hovered: None,
            facing: Facing::Right,
            action_log,
            pixels_per_unit: config.visual.pixels_per_unit,
            fade_speed: config.visual.fade_speed,
            pulse_speed: config.visual.pulse_speed,
            background: Color::from_rgba(
                config.visual.background_r,
                config.visual.background_g,
                config.visual.background_b,
                255,
            ),
        };
        let initial = OverlayChange {
            hidden: Vec::new(),
            shown: state.session.overlay().tiles().to_vec(),
        };
        state.apply_overlay(&initial);
        state
    }

    /// World-space origin of the drawing area
    fn world_min(&self) -> (f32, f32) {
        let metrics = self.session.unit().metrics();
        let (min, _) = self.session.grid().bounds();
        (min.x as f32 * metrics.cell_width, min.y as f32 * metrics.cell_height)
    }

    /// World y grows upward, screen y grows downward
    fn world_to_screen(&self, fx: f32, fy: f32) -> (f32, f32) {
        let (min_x, min_y) = self.world_min();
        (
            MARGIN + (fx - min_x) * self.pixels_per_unit,
            screen_height() - MARGIN - (fy - min_y) * self.pixels_per_unit,
        )
    }

    fn screen_to_cell(&self, sx: f32, sy: f32) -> Position {
        let (min_x, min_y) = self.world_min();
        let fx = (sx - MARGIN) / self.pixels_per_unit + min_x;
        let fy = (screen_height() - MARGIN - sy) / self.pixels_per_unit + min_y;
        self.session.unit().metrics().cell_at(fx, fy)
    }

    fn apply_overlay(&mut self, change: &OverlayChange) {
        for position in &change.hidden {
            self.tiles.remove(position);
        }
        for &(position, highlight) in &change.shown {
            self.tiles.insert(position, TileView { alpha: 1.0, fading_out: false, highlight });
        }
    }

    fn handle_click(&mut self, mouse_x: f32, mouse_y: f32) {
        let cell = self.screen_to_cell(mouse_x, mouse_y);
        if !self.session.grid().contains(cell) {
            return;
        }

        match self.session.select_destination(cell) {
            Ok(selection) => {
                self.action_log.log_start(Action::select(cell, selection.path.len()));
                if selection.path.is_empty() {
                    self.action_log.finish_pending();
                }
                for position in &selection.fade_out {
                    if let Some(tile) = self.tiles.get_mut(position) {
                        tile.fading_out = true;
                    }
                }
            }
            Err(e) => {
                info!(error = %e, "destination ignored");
                self.action_log.log_finish(Action::reject(cell));
            }
        }
    }

    fn update(&mut self, dt: f32) {
        self.cursor.pulse(self.pulse_speed, dt);

        let (mouse_x, mouse_y) = mouse_position();
        let hovered = self.screen_to_cell(mouse_x, mouse_y);
        self.hovered = self.session.grid().contains(hovered).then_some(hovered);

        for tile in self.tiles.values_mut() {
            if tile.fading_out {
                tile.alpha = (tile.alpha - self.fade_speed * dt).max(0.0);
                if tile.alpha <= 0.0 {
                    tile.fading_out = false;
                }
            }
        }

        let report = self.session.tick(dt);
        if let Some(facing) = report.facing {
            self.facing = facing;
        }
        if let Some(change) = &report.overlay {
            self.apply_overlay(change);
            self.action_log.finish_pending();
            self.action_log.log_finish(Action::completed(report.cell));
        }
    }

    fn copy_to_clipboard(&self) {
        let text = format_layout(
            self.session.grid(),
            self.session.overlay().tiles(),
            Some(self.session.unit().cell()),
        );
        match Clipboard::new() {
            Ok(mut clipboard) => {
                if let Err(e) = clipboard.set_text(text) {
                    warn!(error = %e, "failed to copy to clipboard");
                } else {
                    info!("layout copied to clipboard");
                    // Keep clipboard alive for a moment so clipboard managers can capture it
                    std::thread::sleep(std::time::Duration::from_millis(100));
                }
            }
            Err(e) => warn!(error = %e, "failed to access clipboard"),
        }
    }

    fn draw_cell(&self, position: Position, inset: f32, color: Color) {
        let metrics = self.session.unit().metrics();
        let (cx, cy) = metrics.cell_center(position);
        let (sx, sy) = self.world_to_screen(cx, cy);
        let w = metrics.cell_width * self.pixels_per_unit * inset;
        let h = metrics.cell_height * self.pixels_per_unit * inset;
        draw_rectangle(sx - w / 2.0, sy - h / 2.0, w, h, color);
    }

    fn draw(&self) {
        clear_background(self.background);

        for &position in self.session.grid().positions() {
            self.draw_cell(position, 0.95, Color::from_rgba(70, 90, 70, 255));
        }

        for (&position, tile) in &self.tiles {
            let base = match tile.highlight {
                TileHighlight::Near => WHITE,
                TileHighlight::Far => YELLOW,
            };
            let color = Color::new(base.r, base.g, base.b, tile.alpha * 0.45);
            self.draw_cell(position, 0.85, color);
        }

        if let Some(hovered) = self.hovered {
            self.draw_cell(hovered, self.cursor.scale, Color::from_rgba(120, 180, 255, 110));
        }

        let unit = self.session.unit();
        let (sx, sy) = self.world_to_screen(unit.fpos_x, unit.fpos_y);
        let size = unit.metrics().cell_width * self.pixels_per_unit * 0.6;
        let (left, top, _, _) = unit.get_bounds(size);
        let (left, top) = (left - unit.fpos_x + sx, top - unit.fpos_y + sy);
        draw_rectangle(left, top, size, size, BLUE);
        let eye_x = match self.facing {
            Facing::Right => sx + size / 4.0,
            Facing::Left => sx - size / 4.0,
        };
        draw_circle(eye_x, sy - size / 6.0, size / 8.0, WHITE);

        let info = format!(
            "Unit: ({}, {})  Range: {}  Reachable: {}",
            unit.cell().x,
            unit.cell().y,
            self.session.move_range(),
            self.session.overlay().reachable().len(),
        );
        draw_text(&info, 10.0, 20.0, 20.0, WHITE);
        draw_text("Left click: move   C: copy layout   Esc: quit", 10.0, 40.0, 20.0, WHITE);
    }
}

fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn startup_config() -> &'static Result<Config, ConfigError> {
    STARTUP_CONFIG.get_or_init(|| Config::read_from(CONFIG_PATH))
}

fn window_conf() -> Conf {
    let window_title = match startup_config() {
        Ok(config) => config.visual.window_title.clone(),
        Err(_) => Config::default().visual.window_title,
    };
    Conf {
        window_title,
        ..Default::default()
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    let config = match startup_config() {
        Ok(config) => config.clone(),
        Err(_) => Config::default(),
    };
    init_tracing(&config);
    Config::report(Path::new(CONFIG_PATH), startup_config());

    let layout = match load_layout(&config.grid.layout_path) {
        Ok(layout) => layout,
        Err(e) => {
            warn!(path = %config.grid.layout_path, error = %e, "using built-in layout");
            match parse_layout(FALLBACK_LAYOUT) {
                Ok(layout) => layout,
                Err(e) => {
                    error!(error = %e, "built-in layout is invalid");
                    return;
                }
            }
        }
    };

    let mut state = VisState::new(&config, layout);

    loop {
        if is_mouse_button_pressed(MouseButton::Left) {
            let (mouse_x, mouse_y) = mouse_position();
            state.handle_click(mouse_x, mouse_y);
        }

        if is_key_pressed(KeyCode::C) {
            state.copy_to_clipboard();
        }

        if is_key_pressed(KeyCode::Escape) {
            break;
        }

        state.update(get_frame_time());
        state.draw();

        next_frame().await
    }

    if config.logging.enable_action_log {
        state.action_log.print();
        info!("{}", state.action_log.summary());
        if let Err(e) = state.action_log.save_to_file(&config.logging.action_log_path) {
            error!(error = %e, "failed to save action log");
        }
    }
}
