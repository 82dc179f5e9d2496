//! The registration form at the heart of every signup client: field state,
//! validation, and the submission state machine.

/// The values a user types into the form.
pub mod input;
pub use input::{FieldUpdate, RegistrationInput};

/// Per-field validation rules.
pub mod validation;
pub use validation::{validate, Field, FieldError, ValidationErrors};

/// Identifiers for individual submission attempts.
pub mod attempt_id;
pub use attempt_id::AttemptId;

/// The submission state machine.
pub mod flow;
pub use flow::{
    Attempt, FailureCause, Gate, Navigator, RegistrationFlow, RegistrationResult, Resolution,
    SubmissionState, Submitter,
};

/// Talk to the registration server.
pub mod sync;

#[cfg(test)]
mod test;
