/// Keyboard state tracker.
///
/// Tracks which keys are currently held down so movement continues while a
/// key is held, and turns the held set into a `MovementIntent` each frame.
///
/// Key map:
///   w / s          forward / back
///   a / d          strafe left / right
///   j / l, ← / →   rotate left / right
///   i / k, ↑ / ↓   look up / down
///   Esc / q / ^C   quit
///
/// Uses crossterm's keyboard enhancement for Release events when available.
/// Falls back to timeout-based release detection on terminals that don't support it.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crossterm::event::{self, poll, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::domain::movement::MovementIntent;

/// After this duration without a Press/Repeat event, consider the key released.
/// Only used when the terminal doesn't report Release events.
const HOLD_TIMEOUT: Duration = Duration::from_millis(160);

const FORWARD: &[KeyCode] = &[KeyCode::Char('w'), KeyCode::Char('W')];
const BACKWARD: &[KeyCode] = &[KeyCode::Char('s'), KeyCode::Char('S')];
const STRAFE_LEFT: &[KeyCode] = &[KeyCode::Char('a'), KeyCode::Char('A')];
const STRAFE_RIGHT: &[KeyCode] = &[KeyCode::Char('d'), KeyCode::Char('D')];
const ROTATE_LEFT: &[KeyCode] = &[KeyCode::Char('j'), KeyCode::Char('J'), KeyCode::Left];
const ROTATE_RIGHT: &[KeyCode] = &[KeyCode::Char('l'), KeyCode::Char('L'), KeyCode::Right];
const LOOK_UP: &[KeyCode] = &[KeyCode::Char('i'), KeyCode::Char('I'), KeyCode::Up];
const LOOK_DOWN: &[KeyCode] = &[KeyCode::Char('k'), KeyCode::Char('K'), KeyCode::Down];
const QUIT: &[KeyCode] = &[KeyCode::Esc, KeyCode::Char('q'), KeyCode::Char('Q')];

pub struct InputState {
    /// Timestamp of last Press/Repeat event for each key.
    last_active: HashMap<KeyCode, Instant>,

    /// Keys that went from "not held" to "held" during the last drain.
    fresh_presses: Vec<KeyCode>,

    /// Raw key events collected during drain, for modifier checks.
    raw_events: Vec<KeyEvent>,

    /// Whether to honor Release events. Only true when keyboard
    /// enhancement is confirmed working.
    pub honor_release: bool,
}

impl InputState {
    pub fn new() -> Self {
        InputState {
            last_active: HashMap::with_capacity(16),
            fresh_presses: Vec::with_capacity(8),
            raw_events: Vec::with_capacity(8),
            honor_release: false,
        }
    }

    /// Drain all pending terminal events and update key states.
    /// Call this once per frame, before the session update.
    pub fn drain_events(&mut self) {
        self.fresh_presses.clear();
        self.raw_events.clear();

        while poll(Duration::ZERO).unwrap_or(false) {
            if let Ok(Event::Key(key)) = event::read() {
                self.record(key, Instant::now());
            }
        }

        let now = Instant::now();
        self.last_active.retain(|_, t| now.duration_since(*t) < HOLD_TIMEOUT);
    }

    fn record(&mut self, key: KeyEvent, at: Instant) {
        self.raw_events.push(key);
        match key.kind {
            KeyEventKind::Release if self.honor_release => {
                self.last_active.remove(&key.code);
            }
            // Without enhancement, release comes from the timeout.
            KeyEventKind::Release => {}
            _ => {
                let was_held = self.is_held(key.code);
                self.last_active.insert(key.code, at);
                if !was_held {
                    self.fresh_presses.push(key.code);
                }
            }
        }
    }

    pub fn is_held(&self, code: KeyCode) -> bool {
        self.last_active
            .get(&code)
            .map(|t| t.elapsed() < HOLD_TIMEOUT)
            .unwrap_or(false)
    }

    pub fn any_held(&self, codes: &[KeyCode]) -> bool {
        codes.iter().any(|c| self.is_held(*c))
    }

    /// Was any of these keys freshly pressed this frame? (edge trigger)
    pub fn any_pressed(&self, codes: &[KeyCode]) -> bool {
        codes.iter().any(|c| self.fresh_presses.contains(c))
    }

    pub fn ctrl_c_pressed(&self) -> bool {
        self.raw_events.iter().any(|k| {
            k.modifiers.contains(KeyModifiers::CONTROL)
                && (k.code == KeyCode::Char('c') || k.code == KeyCode::Char('C'))
        })
    }

    /// Current held keys as a movement intent.
    pub fn intent(&self) -> MovementIntent {
        MovementIntent {
            forward: self.any_held(FORWARD),
            backward: self.any_held(BACKWARD),
            strafe_left: self.any_held(STRAFE_LEFT),
            strafe_right: self.any_held(STRAFE_RIGHT),
            rotate_left: self.any_held(ROTATE_LEFT),
            rotate_right: self.any_held(ROTATE_RIGHT),
            look_up: self.any_held(LOOK_UP),
            look_down: self.any_held(LOOK_DOWN),
            quit: self.any_pressed(QUIT) || self.ctrl_c_pressed(),
        }
    }
}
