use crate::attempt_id::AttemptId;
use crate::input::{FieldUpdate, RegistrationInput};
use crate::sync::{self, register};
use crate::validation::{validate, ValidationErrors};
use chrono::{DateTime, Utc};
use std::future::Future;

/// What the server told us about a registration.
pub type RegistrationResult = register::Resp;

/// Shown when someone tries to register without agreeing to the terms.
pub const MUST_AGREE: &str = "Please agree to the terms of use first!";

/// Shown when we couldn't get an answer out of the server.
pub const SUBMIT_FAILED: &str = "Registration failed. Check your connection and try again.";

/// Shown when the server took too long to answer.
pub const TIMED_OUT: &str = "The server took too long to answer. Please try again.";

/// Something that can deliver a registration to the server.
pub trait Submitter {
    /// Send the registration and wait for the server's verdict.
    fn submit(
        &self,
        input: &RegistrationInput,
    ) -> impl Future<Output = sync::error::Result<RegistrationResult>> + Send;
}

/// Something that can take the user to the login page once they've
/// registered. Fire-and-forget.
pub trait Navigator {
    /// Go to the login destination.
    fn to_login(&mut self);
}

/// Why the last submission failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureCause {
    /// The server answered, and the answer was no
    Rejected,

    /// We couldn't get an answer out of the server
    Transport,

    /// The server didn't answer in time
    Timeout,
}

/// Where the form is in its submission lifecycle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SubmissionState {
    /// Nothing has been sent yet
    #[default]
    Idle,

    /// A registration is in flight
    Submitting {
        /// The attempt we're waiting on
        attempt: AttemptId,

        /// When we sent it
        started_at: DateTime<Utc>,
    },

    /// The server accepted the registration. Nothing more happens after this.
    Succeeded {
        /// What the server said
        response: RegistrationResult,
    },

    /// The last attempt didn't work out. The user can fix things up and try
    /// again.
    Failed {
        /// What we told the user
        message: String,

        /// What went wrong
        cause: FailureCause,
    },
}

/// A registration that has passed every check and should be sent.
#[derive(Debug, Clone)]
pub struct Attempt {
    /// Hand this back to `RegistrationFlow::resolve` with the outcome.
    pub id: AttemptId,

    /// What to send.
    pub req: register::Req,
}

/// The result of trying to start a submission.
#[derive(Debug)]
pub enum Gate {
    /// Everything checks out; send this.
    Dispatch(Attempt),

    /// The user hasn't agreed to the terms. The banner says so.
    NotAgreed,

    /// Some fields need fixing.
    Invalid(ValidationErrors),

    /// We're already waiting on the server.
    Busy,

    /// Registration already succeeded.
    Finished,
}

/// What happened when an attempt's outcome came back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// The account was created and we navigated away
    Succeeded,

    /// The server said no
    Rejected,

    /// We couldn't talk to the server
    Failed,

    /// The outcome was for an attempt we're not waiting on, so we ignored it
    Stale,
}

/// The registration form's state: what the user typed, how submission is
/// going, and any banner error to show.
#[derive(Debug)]
pub struct RegistrationFlow {
    /// Current field values
    input: RegistrationInput,

    /// Submission lifecycle
    state: SubmissionState,

    /// Submission-level error to show above the form
    banner: Option<String>,

    /// The ID the next dispatched attempt will get
    next_attempt: AttemptId,
}

impl RegistrationFlow {
    /// Start a flow with an empty form.
    pub fn new() -> Self {
        Self {
            input: RegistrationInput::default(),
            state: SubmissionState::Idle,
            banner: None,
            next_attempt: AttemptId::first(AttemptId::new_flow()),
        }
    }

    /// What the user has typed so far.
    pub fn input(&self) -> &RegistrationInput {
        &self.input
    }

    /// Where we are in the submission lifecycle.
    pub fn state(&self) -> &SubmissionState {
        &self.state
    }

    /// The banner error, if there's anything to show.
    pub fn banner(&self) -> Option<&str> {
        self.banner.as_deref().filter(|message| !message.is_empty())
    }

    /// Field errors for the current input.
    pub fn errors(&self) -> ValidationErrors {
        validate(&self.input)
    }

    /// Are we waiting on the server?
    pub fn is_submitting(&self) -> bool {
        matches!(self.state, SubmissionState::Submitting { .. })
    }

    /// Has registration succeeded?
    pub fn is_finished(&self) -> bool {
        matches!(self.state, SubmissionState::Succeeded { .. })
    }

    /// Should the submit control accept presses right now?
    pub fn can_submit(&self) -> bool {
        !self.is_submitting() && !self.is_finished()
    }

    /// What the submit control should say.
    pub fn submit_label(&self) -> &'static str {
        if self.is_submitting() {
            "loading"
        } else {
            "Register"
        }
    }

    /// Change one field. This is fine to do while a submission is in flight
    /// (it won't affect what was sent) but does nothing once registration has
    /// succeeded.
    pub fn update_field(&mut self, update: FieldUpdate) {
        if self.is_finished() {
            tracing::debug!(?update, "ignoring edit after registration finished");
            return;
        }

        self.input.apply(update);
    }

    /// Hide the banner error. Field errors and submission state stay as they
    /// are.
    pub fn dismiss_error(&mut self) {
        self.banner = None;
    }

    /// Check whether the form can be sent and, if so, move to `Submitting`
    /// and hand back the attempt to send.
    pub fn begin_submit(&mut self) -> Gate {
        match self.state {
            SubmissionState::Submitting { .. } => return Gate::Busy,
            SubmissionState::Succeeded { .. } => return Gate::Finished,
            SubmissionState::Idle | SubmissionState::Failed { .. } => (),
        }

        if !self.input.agree {
            self.banner = Some(MUST_AGREE.to_string());
            return Gate::NotAgreed;
        }

        let errors = validate(&self.input);
        if !errors.is_empty() {
            tracing::debug!(?errors, "not submitting invalid form");
            return Gate::Invalid(errors);
        }

        let id = self.next_attempt;
        self.next_attempt = id.next();

        self.state = SubmissionState::Submitting {
            attempt: id,
            started_at: Utc::now(),
        };

        tracing::info!(attempt = %id, "submitting registration");

        Gate::Dispatch(Attempt {
            id,
            req: self.input.clone(),
        })
    }

    /// Apply the outcome of an attempt. Outcomes for anything other than the
    /// attempt currently in flight are ignored.
    pub fn resolve<N: Navigator>(
        &mut self,
        id: AttemptId,
        outcome: sync::error::Result<RegistrationResult>,
        navigator: &mut N,
    ) -> Resolution {
        let started_at = match &self.state {
            SubmissionState::Submitting {
                attempt,
                started_at,
            } if *attempt == id => *started_at,
            _ => {
                tracing::debug!(attempt = %id, "ignoring outcome for attempt not in flight");
                return Resolution::Stale;
            }
        };

        let elapsed_ms = (Utc::now() - started_at).num_milliseconds();

        match outcome {
            Ok(response) if response.success => {
                tracing::info!(attempt = %id, elapsed_ms, "registered");

                self.banner = None;
                self.input = RegistrationInput::default();
                self.state = SubmissionState::Succeeded { response };
                navigator.to_login();

                Resolution::Succeeded
            }
            Ok(response) => {
                tracing::info!(attempt = %id, elapsed_ms, message = %response.message, "registration rejected");

                self.fail(response.message, FailureCause::Rejected);

                Resolution::Rejected
            }
            Err(sync::Error::Timeout) => {
                tracing::warn!(attempt = %id, elapsed_ms, "registration timed out");

                self.fail(TIMED_OUT.to_string(), FailureCause::Timeout);

                Resolution::Failed
            }
            Err(problem) => {
                tracing::error!(attempt = %id, ?problem, "problem submitting registration");

                self.fail(SUBMIT_FAILED.to_string(), FailureCause::Transport);

                Resolution::Failed
            }
        }
    }

    /// Submit and wait for the outcome in one go. Returns whatever the server
    /// said, or `None` if nothing was sent or no answer came back.
    pub async fn submit<S, N>(
        &mut self,
        submitter: &S,
        navigator: &mut N,
    ) -> Option<RegistrationResult>
    where
        S: Submitter,
        N: Navigator,
    {
        let Gate::Dispatch(attempt) = self.begin_submit() else {
            return None;
        };

        let outcome = submitter.submit(&attempt.req).await;
        let response = outcome.as_ref().ok().cloned();

        self.resolve(attempt.id, outcome, navigator);

        response
    }

    fn fail(&mut self, message: String, cause: FailureCause) {
        self.banner = Some(message.clone());
        self.state = SubmissionState::Failed { message, cause };
    }
}

impl Default for RegistrationFlow {
    fn default() -> Self {
        Self::new()
    }
}
