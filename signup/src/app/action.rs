use crossterm::event::KeyEvent;
use signup_core::{sync, AttemptId, RegistrationResult};

/// Things that can happen to this app
#[derive(Debug)]
pub enum Action {
    /// The user did something on the keyboard
    Key(KeyEvent),

    /// Something bad happened; display it to the user
    Problem(String),

    /// The server answered a registration attempt (or we gave up waiting)
    Registered {
        /// Which attempt this is the outcome for
        attempt: AttemptId,

        /// What happened
        outcome: sync::error::Result<RegistrationResult>,
    },
}
