use super::Action;
use crate::config::Config;
use signup_core::{sync::Client, Attempt};

/// Connections to external services that effects use. We keep these around to
/// have some level of connection sharing for the app as a whole.
pub struct EffectContext {
    /// The registration server
    client: Client,
}

impl EffectContext {
    /// Get a new `EffectContext` talking to the configured server
    pub fn new(config: &Config) -> Self {
        Self {
            client: config.client(),
        }
    }
}

/// Things that can happen as a result of user input. Side effects!
#[derive(Debug)]
pub enum Effect {
    /// Send a registration to the server
    Register(Attempt),
}

impl Effect {
    /// Perform the side-effectful portions of this effect, returning the next
    /// `Action` the application needs to handle
    pub async fn run(self, conn: &EffectContext) -> Option<Action> {
        match self {
            Self::Register(attempt) => {
                tracing::info!(attempt = %attempt.id, "registering");

                // Failures are part of the outcome; the flow decides what the
                // user sees.
                let outcome = conn.client.register(&attempt.req).await;

                Some(Action::Registered {
                    attempt: attempt.id,
                    outcome,
                })
            }
        }
    }
}
