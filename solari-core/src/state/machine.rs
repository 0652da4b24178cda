//! State machine definition

use super::events::Event;

/// Session states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum State {
    /// Powered up, position unknown, no homing attempted yet
    Boot,
    /// Homing run in progress
    Homing {
        /// First homing after boot; failure ends the session
        startup: bool,
    },
    /// Homed, position trusted, coils released
    Ready,
    /// Stepping toward a target flap
    Moving {
        /// Position was trusted when the move started
        reliable: bool,
    },
    /// A re-home failed; the believed position may be wrong
    Unreliable,
    /// Startup failed; no further commands are executed
    Halted,
}

impl State {
    /// Check if display commands may move the drum
    pub fn accepts_moves(&self) -> bool {
        matches!(self, State::Ready | State::Unreliable)
    }

    /// Check if the believed position is backed by a successful homing
    pub fn position_trusted(&self) -> bool {
        matches!(self, State::Ready | State::Moving { reliable: true })
    }

    pub fn is_halted(&self) -> bool {
        matches!(self, State::Halted)
    }

    /// Process an event and return the next state
    pub fn transition(self, event: Event) -> Self {
        use Event::*;
        use State::*;

        match (self, event) {
            // Boot transitions
            (Boot, HomingStarted) => Homing { startup: true },

            // Homing transitions
            (Homing { .. }, HomingSucceeded) => Ready,
            (Homing { startup: true }, HomingFailed) => Halted,
            (Homing { startup: false }, HomingFailed) => Unreliable,

            // Ready transitions
            (Ready, HomingStarted) => Homing { startup: false },
            (Ready, MoveStarted) => Moving { reliable: true },

            // Unreliable transitions
            (Unreliable, HomingStarted) => Homing { startup: false },
            (Unreliable, MoveStarted) => Moving { reliable: false },

            // Moving transitions
            (Moving { reliable: true }, MoveFinished) => Ready,
            (Moving { reliable: false }, MoveFinished) => Unreliable,

            // Halted is terminal; everything else leaves the state unchanged
            _ => self,
        }
    }
}
