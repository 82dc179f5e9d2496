use crate::flow::{RegistrationResult, Submitter};
use crate::input::{FieldUpdate, RegistrationInput};
use crate::sync;
use proptest::prelude::*;
use std::future::Future;
use std::sync::Mutex;

/// A canned server answer.
#[derive(Debug, Clone)]
pub enum Reply {
    Accepted,
    Rejected(String),
    ServerError,
    Timeout,
}

impl Reply {
    pub fn into_result(self) -> sync::error::Result<RegistrationResult> {
        match self {
            Self::Accepted => Ok(RegistrationResult::accepted()),
            Self::Rejected(message) => Ok(RegistrationResult::rejected(message)),
            Self::ServerError => Err(sync::Error::Server),
            Self::Timeout => Err(sync::Error::Timeout),
        }
    }
}

/// Answers every submission the same way and remembers what it was sent.
#[derive(Debug)]
pub struct ScriptedSubmitter {
    reply: Reply,
    calls: Mutex<Vec<RegistrationInput>>,
}

impl ScriptedSubmitter {
    pub fn new(reply: Reply) -> Self {
        Self {
            reply,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<RegistrationInput> {
        self.calls.lock().unwrap().clone()
    }
}

impl Submitter for ScriptedSubmitter {
    fn submit(
        &self,
        input: &RegistrationInput,
    ) -> impl Future<Output = sync::error::Result<RegistrationResult>> + Send {
        self.calls.lock().unwrap().push(input.clone());

        let reply = self.reply.clone();
        async move { reply.into_result() }
    }
}

/// A mix of good, bad, and empty email addresses.
pub fn email() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        Just("bad".to_string()),
        Just("a@b.c".to_string()),
        "[a-z]{1,5}@[a-z]{1,5}\\.[a-z]{2,3}",
        "[a-z@.]{1,8}",
    ]
}

/// A mix of passwords on either side of the length limits.
pub fn password() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        "[a-z]{1,5}",
        "[a-z0-9]{6,20}",
        "[a-z]{21,25}",
    ]
}

pub fn field_update() -> impl Strategy<Value = FieldUpdate> {
    prop_oneof![
        email().prop_map(FieldUpdate::Email),
        password().prop_map(FieldUpdate::Password),
        any::<bool>().prop_map(FieldUpdate::Agree),
    ]
}
