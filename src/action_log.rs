use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::grid::Position;

/// Action phase - whether the action is starting or finishing
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionPhase {
    Start,
    Finish,
}

/// Things the player did and how the session answered
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    /// Unit placed on its spawn cell
    SpawnUnit { x: i32, y: i32 },
    /// Accepted destination and the number of steps to get there
    SelectDestination { x: i32, y: i32, steps: usize },
    /// Destination ignored (outside range or unit busy)
    RejectDestination { x: i32, y: i32 },
    /// Unit came to rest
    MovementCompleted { x: i32, y: i32 },
}

impl Action {
    pub fn spawn(at: Position) -> Self {
        Action::SpawnUnit { x: at.x, y: at.y }
    }

    pub fn select(at: Position, steps: usize) -> Self {
        Action::SelectDestination { x: at.x, y: at.y, steps }
    }

    pub fn reject(at: Position) -> Self {
        Action::RejectDestination { x: at.x, y: at.y }
    }

    pub fn completed(at: Position) -> Self {
        Action::MovementCompleted { x: at.x, y: at.y }
    }
}

/// Logged action with timestamp and phase
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LoggedAction {
    /// Milliseconds since start
    pub timestamp_ms: u64,
    pub action: Action,
    pub phase: ActionPhase,
}

/// Action logger
pub struct ActionLog {
    start_time: Instant,
    actions: Vec<LoggedAction>,
    /// Started action waiting for its finish entry
    pending: Option<Action>,
}

impl Default for ActionLog {
    fn default() -> Self {
        Self::new()
    }
}

impl ActionLog {
    pub fn new() -> Self {
        ActionLog {
            start_time: Instant::now(),
            actions: Vec::new(),
            pending: None,
        }
    }

    /// Log an action with current timestamp and phase
    pub fn log(&mut self, action: Action, phase: ActionPhase) {
        let timestamp_ms = self.start_time.elapsed().as_millis() as u64;

        self.actions.push(LoggedAction {
            timestamp_ms,
            action,
            phase,
        });
    }

    /// Log the start of an action that finishes later through `finish_pending`
    pub fn log_start(&mut self, action: Action) {
        self.pending = Some(action.clone());
        self.log(action, ActionPhase::Start);
    }

    /// Log the finish of the last started action, if any
    pub fn finish_pending(&mut self) {
        if let Some(action) = self.pending.take() {
            self.log(action, ActionPhase::Finish);
        }
    }

    pub fn log_finish(&mut self, action: Action) {
        self.log(action, ActionPhase::Finish);
    }

    pub fn get_actions(&self) -> &[LoggedAction] {
        &self.actions
    }

    /// Save log to JSON file
    pub fn save_to_file(&self, path: &str) -> Result<(), Box<dyn std::error::Error>> {
        let json = serde_json::to_string_pretty(&self.actions)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Emit the log through tracing
    pub fn print(&self) {
        info!(events = self.actions.len(), "action log");
        for (i, logged) in self.actions.iter().enumerate() {
            let phase_str = match logged.phase {
                ActionPhase::Start => "START ",
                ActionPhase::Finish => "FINISH",
            };
            info!("[{:6}ms] #{:3} {} {:?}", logged.timestamp_ms, i + 1, phase_str, logged.action);
        }
    }

    /// Get summary statistics
    pub fn summary(&self) -> String {
        let mut selections = 0;
        let mut rejections = 0;
        let mut completions = 0;
        let mut steps_taken = 0;

        // Only count finish events to get actual completed action counts
        for logged in &self.actions {
            if logged.phase != ActionPhase::Finish {
                continue;
            }
            match &logged.action {
                Action::SelectDestination { steps, .. } => {
                    selections += 1;
                    steps_taken += steps;
                }
                Action::RejectDestination { .. } => rejections += 1,
                Action::MovementCompleted { .. } => completions += 1,
                Action::SpawnUnit { .. } => {}
            }
        }

        let duration = self.actions.last().map_or(0, |last| last.timestamp_ms);

        format!(
            "Session Duration: {}ms\n\
             Total Events: {}\n\
             Destinations: {} selected ({} steps), {} rejected\n\
             Moves Completed: {}",
            duration,
            self.actions.len(),
            selections,
            steps_taken,
            rejections,
            completions
        )
    }
}
