//! Control signals
//!
//! Every control source (keyboard or AI) reduces to one `Action` per tick.
//! `ControlLatch` turns that level signal into a `TickInput`: duck stays
//! active while asserted, jump fires once per assertion.

use serde::{Deserialize, Serialize};

use crate::sim::TickInput;

/// One control action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    #[default]
    None,
    Jump,
    Duck,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::None => "none",
            Action::Jump => "jump",
            Action::Duck => "duck",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "none" | "" => Some(Action::None),
            "jump" => Some(Action::Jump),
            "duck" => Some(Action::Duck),
            _ => None,
        }
    }
}

/// Edge detector for the jump signal
#[derive(Debug, Clone, Default)]
pub struct ControlLatch {
    jump_asserted: bool,
}

impl ControlLatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Convert this tick's action into simulation input
    pub fn sample(&mut self, action: Action) -> TickInput {
        let jump = action == Action::Jump;
        let input = TickInput {
            jump: jump && !self.jump_asserted,
            duck: action == Action::Duck,
        };
        self.jump_asserted = jump;
        input
    }

    pub fn reset(&mut self) {
        self.jump_asserted = false;
    }
}

/// What a key press meant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyEffect {
    /// Jump/duck key, folded into the next sampled action
    Control,
    TogglePause,
    Restart,
    Ignored,
}

/// Held-key tracker for keyboard play
#[derive(Debug, Clone, Default)]
pub struct Keyboard {
    jump_held: bool,
    duck_held: bool,
    /// Jump pressed since the last sample (catches taps shorter than a frame)
    jump_tapped: bool,
}

impl Keyboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle a key press (`KeyboardEvent.code`)
    pub fn key_down(&mut self, code: &str) -> KeyEffect {
        match code {
            "Space" | "ArrowUp" => {
                if !self.jump_held {
                    self.jump_tapped = true;
                }
                self.jump_held = true;
                KeyEffect::Control
            }
            "ArrowDown" => {
                self.duck_held = true;
                KeyEffect::Control
            }
            "KeyP" => KeyEffect::TogglePause,
            "KeyR" | "Enter" => KeyEffect::Restart,
            _ => KeyEffect::Ignored,
        }
    }

    pub fn key_up(&mut self, code: &str) {
        match code {
            "Space" | "ArrowUp" => self.jump_held = false,
            "ArrowDown" => self.duck_held = false,
            _ => {}
        }
    }

    /// Current action; jump wins over duck
    pub fn take_action(&mut self) -> Action {
        let tapped = std::mem::take(&mut self.jump_tapped);
        if self.jump_held || tapped {
            Action::Jump
        } else if self.duck_held {
            Action::Duck
        } else {
            Action::None
        }
    }

    /// Release everything (window blur)
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
