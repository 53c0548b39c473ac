/// Session: one run through one maze.
///
/// Owns the grid and camera. `update` applies one frame of input, then
/// checks the goal; `render_into` draws the current view. Once the run is
/// finished (goal reached or quit) the state is frozen.

use crate::config::{CameraConfig, GameConfig};
use crate::domain::camera::Camera;
use crate::domain::grid::Grid;
use crate::domain::movement::{apply_intent, sanitize_dt, MovementIntent};
use crate::error::SessionError;
use crate::sim::event::GameEvent;
use crate::sim::frame::{render_frame, FrameReport};
use crate::sim::level::{self, MapSource};
use crate::sim::surface::Surface;

pub struct Session {
    name: String,
    grid: Grid,
    camera: Camera,
    elapsed: f64,
    /// Path length walked so far, in cells.
    walked: f64,
    finished: bool,
    won: bool,
}

impl Session {
    /// Session with the camera at the grid's spawn.
    pub fn new(name: impl Into<String>, grid: Grid, cfg: &CameraConfig) -> Self {
        let camera = Camera::at_spawn(grid.spawn(), cfg);
        Session {
            name: name.into(),
            grid,
            camera,
            elapsed: 0.0,
            walked: 0.0,
            finished: false,
            won: false,
        }
    }

    pub fn from_source(source: &MapSource, config: &GameConfig) -> Result<Self, SessionError> {
        let map = level::load(source, &config.general.maps_dir)?;
        Ok(Session::new(map.name, map.grid, &config.camera))
    }

    /// Advance by `dt` seconds.
    pub fn update(&mut self, intent: &MovementIntent, dt: f64) -> Vec<GameEvent> {
        let mut events = vec![];
        if self.finished {
            return events;
        }

        if intent.quit {
            self.finished = true;
            events.push(GameEvent::QuitRequested);
            return events;
        }

        let dt = sanitize_dt(dt);
        let before = self.camera.position;
        apply_intent(&mut self.camera, &self.grid, intent, dt);
        self.walked += before.distance(self.camera.position);
        self.elapsed += dt;

        let (col, row) = self.camera.cell();
        if self.grid.cell(col, row).map_or(false, |c| c.is_goal()) {
            self.finished = true;
            self.won = true;
            tracing::info!(map = %self.name, elapsed = self.elapsed, walked = self.walked, "goal reached");
            events.push(GameEvent::GoalReached { elapsed: self.elapsed });
        }

        events
    }

    /// Render a fresh `width × height` frame.
    pub fn render(&self, width: usize, height: usize) -> Surface {
        let mut surface = Surface::new(width, height);
        self.render_into(&mut surface);
        surface
    }

    pub fn render_into(&self, surface: &mut Surface) -> FrameReport {
        render_frame(&self.grid, &self.camera, surface)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn is_won(&self) -> bool {
        self.won
    }

    /// Seconds played so far; fixed once the run finishes.
    pub fn elapsed_clear_time(&self) -> f64 {
        self.elapsed
    }
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════
