use crate::input::RegistrationInput;
use serde::{Deserialize, Serialize};

/// The request to register a new account.
pub type Req = RegistrationInput;

/// What the server thinks of our registration. A well-formed "no" comes back
/// as `success: false` with a reason in `message`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resp {
    /// Was the account created?
    pub success: bool,

    /// Human-readable explanation, mostly useful when `success` is false.
    #[serde(default)]
    pub message: String,
}

impl Resp {
    /// A successful registration with no message.
    pub fn accepted() -> Self {
        Self {
            success: true,
            message: String::new(),
        }
    }

    /// A rejected registration with the reason the server gave.
    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// Where the register endpoint lives by default.
pub const PATH: &str = "/api/auth/register";
