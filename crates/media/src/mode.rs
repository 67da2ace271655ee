//! Transmit mode of the outgoing video feed.
//!
//! Pure domain logic - no I/O, no platform dependencies.

use serde::{Deserialize, Serialize};

/// Which source the outgoing video feed currently carries.
///
/// Exactly one mode is active at any time; it changes only when a switch
/// hands a freshly acquired stream off to the session layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Transmitting the camera feed.
    #[default]
    Camera,
    /// Transmitting a captured-screen feed.
    Screen,
}

impl Mode {
    /// The mode a toggle moves to from `self`.
    pub fn toggled(self) -> Mode {
        match self {
            Mode::Camera => Mode::Screen,
            Mode::Screen => Mode::Camera,
        }
    }

    /// Returns a human-readable label for the mode.
    pub fn label(&self) -> &'static str {
        match self {
            Mode::Camera => "Camera",
            Mode::Screen => "Screen",
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}
