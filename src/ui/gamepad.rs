/// Gamepad input tracker using gilrs.
///
/// Button mapping is loaded from config.toml via `load_button_config()`.
/// Default mapping:
///   D-pad / Left Stick    →  Move (up/down) and strafe (left/right)
///   L1 / R1               →  Rotate left / right
///   Y / A                 →  Look up / down
///   Select                →  Quit

#[cfg(feature = "gamepad")]
use gilrs::{Axis, Button, EventType, Gilrs};

use crate::config::GamepadConfig;
use crate::domain::movement::MovementIntent;

const STICK_DEADZONE: f32 = 0.25;

/// Logical button identifiers (one per physical button).
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Btn {
    A,       // South
    B,       // East
    X,       // West
    Y,       // North
    L1,      // LeftTrigger
    R1,      // RightTrigger
    L2,      // LeftTrigger2
    R2,      // RightTrigger2
    Start,
    Select,
}

impl Btn {
    fn from_name(s: &str) -> Option<Btn> {
        match s.to_uppercase().as_str() {
            "A" | "SOUTH"  => Some(Btn::A),
            "B" | "EAST"   => Some(Btn::B),
            "X" | "WEST"   => Some(Btn::X),
            "Y" | "NORTH"  => Some(Btn::Y),
            "L1" | "LB" | "LEFTTRIGGER"  => Some(Btn::L1),
            "R1" | "RB" | "RIGHTTRIGGER" => Some(Btn::R1),
            "L2" | "LT" | "LEFTTRIGGER2"  => Some(Btn::L2),
            "R2" | "RT" | "RIGHTTRIGGER2" => Some(Btn::R2),
            "START" => Some(Btn::Start),
            "SELECT" | "BACK" => Some(Btn::Select),
            _ => None,
        }
    }

    #[cfg(feature = "gamepad")]
    fn from_gilrs(btn: Button) -> Option<Btn> {
        match btn {
            Button::South     => Some(Btn::A),
            Button::East      => Some(Btn::B),
            Button::West      => Some(Btn::X),
            Button::North     => Some(Btn::Y),
            Button::LeftTrigger  => Some(Btn::L1),
            Button::RightTrigger => Some(Btn::R1),
            Button::LeftTrigger2  => Some(Btn::L2),
            Button::RightTrigger2 => Some(Btn::R2),
            Button::Start     => Some(Btn::Start),
            Button::Select    => Some(Btn::Select),
            _ => None,
        }
    }
}

/// Action-to-button mapping (loaded from config).
struct ActionMap {
    rotate_left: Vec<Btn>,
    rotate_right: Vec<Btn>,
    look_up: Vec<Btn>,
    look_down: Vec<Btn>,
    quit: Vec<Btn>,
}

impl Default for ActionMap {
    fn default() -> Self {
        ActionMap {
            rotate_left:  vec![Btn::L1],
            rotate_right: vec![Btn::R1],
            look_up:      vec![Btn::Y],
            look_down:    vec![Btn::A],
            quit:         vec![Btn::Select],
        }
    }
}

#[derive(Clone, Copy, Debug, Default)]
struct Dpad {
    up: bool,
    down: bool,
    left: bool,
    right: bool,
}

pub struct GamepadState {
    #[cfg(feature = "gamepad")]
    gilrs: Option<Gilrs>,

    /// Held state per button, indexed by `Btn as usize`.
    buttons: [bool; 10],
    /// Buttons pressed since the last update.
    just_pressed: [bool; 10],

    dpad: Dpad,
    stick_x: f32,
    stick_y: f32,

    action_map: ActionMap,
}

impl GamepadState {
    pub fn new() -> Self {
        #[cfg(feature = "gamepad")]
        let gilrs_opt = match Gilrs::new() {
            Ok(g) => {
                if g.gamepads().next().is_some() {
                    tracing::info!("gamepad connected");
                }
                Some(g)
            }
            Err(e) => {
                tracing::warn!(error = %e, "gamepad support unavailable");
                None
            }
        };

        GamepadState {
            #[cfg(feature = "gamepad")]
            gilrs: gilrs_opt,
            buttons: [false; 10],
            just_pressed: [false; 10],
            dpad: Dpad::default(),
            stick_x: 0.0,
            stick_y: 0.0,
            action_map: ActionMap::default(),
        }
    }

    /// Load button mapping from config. Empty or unrecognised lists keep the default.
    pub fn load_button_config(&mut self, cfg: &GamepadConfig) {
        fn apply(target: &mut Vec<Btn>, names: &[String]) {
            let parsed: Vec<Btn> = names.iter().filter_map(|s| Btn::from_name(s)).collect();
            if !parsed.is_empty() {
                *target = parsed;
            }
        }
        let map = &mut self.action_map;
        apply(&mut map.rotate_left, &cfg.rotate_left);
        apply(&mut map.rotate_right, &cfg.rotate_right);
        apply(&mut map.look_up, &cfg.look_up);
        apply(&mut map.look_down, &cfg.look_down);
        apply(&mut map.quit, &cfg.quit);
    }

    pub fn update(&mut self) {
        self.just_pressed = [false; 10];

        #[cfg(feature = "gamepad")]
        self.poll_gilrs();
    }

    #[cfg(feature = "gamepad")]
    fn poll_gilrs(&mut self) {
        let gilrs = match &mut self.gilrs {
            Some(g) => g,
            None => return,
        };

        let events: Vec<_> = std::iter::from_fn(|| gilrs.next_event()).collect();

        for event in events {
            match event.event {
                EventType::ButtonPressed(btn, _) => self.set_button(btn, true),
                EventType::ButtonReleased(btn, _) => self.set_button(btn, false),
                EventType::AxisChanged(axis, value, _) => match axis {
                    Axis::LeftStickX => self.stick_x = value,
                    Axis::LeftStickY => self.stick_y = value,
                    _ => {}
                },
                EventType::Connected => tracing::info!("gamepad connected"),
                EventType::Disconnected => {
                    self.release_all();
                    tracing::info!("gamepad disconnected");
                }
                _ => {}
            }
        }
    }

    #[cfg(feature = "gamepad")]
    fn set_button(&mut self, gilrs_btn: Button, held: bool) {
        match gilrs_btn {
            Button::DPadUp    => self.dpad.up = held,
            Button::DPadDown  => self.dpad.down = held,
            Button::DPadLeft  => self.dpad.left = held,
            Button::DPadRight => self.dpad.right = held,
            other => {
                if let Some(btn) = Btn::from_gilrs(other) {
                    self.press(btn, held);
                }
            }
        }
    }

    #[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
    fn press(&mut self, btn: Btn, held: bool) {
        let idx = btn as usize;
        if held && !self.buttons[idx] {
            self.just_pressed[idx] = true;
        }
        self.buttons[idx] = held;
    }

    fn any_held(&self, btns: &[Btn]) -> bool {
        btns.iter().any(|&b| self.buttons[b as usize])
    }

    fn any_just_pressed(&self, btns: &[Btn]) -> bool {
        btns.iter().any(|&b| self.just_pressed[b as usize])
    }

    /// Current pad state as a movement intent.
    pub fn intent(&self) -> MovementIntent {
        let map = &self.action_map;
        MovementIntent {
            // gilrs reports stick Y positive = up
            forward: self.dpad.up || self.stick_y > STICK_DEADZONE,
            backward: self.dpad.down || self.stick_y < -STICK_DEADZONE,
            strafe_left: self.dpad.left || self.stick_x < -STICK_DEADZONE,
            strafe_right: self.dpad.right || self.stick_x > STICK_DEADZONE,
            rotate_left: self.any_held(&map.rotate_left),
            rotate_right: self.any_held(&map.rotate_right),
            look_up: self.any_held(&map.look_up),
            look_down: self.any_held(&map.look_down),
            quit: self.any_just_pressed(&map.quit),
        }
    }

    #[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
    fn release_all(&mut self) {
        self.buttons = [false; 10];
        self.dpad = Dpad::default();
        self.stick_x = 0.0;
        self.stick_y = 0.0;
    }
}
