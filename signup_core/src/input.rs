use core::fmt::{self, Debug, Formatter};
use serde::{Deserialize, Serialize};

/// Everything the user has entered into the registration form. This is also
/// the JSON body we send to the server.
#[derive(Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationInput {
    /// Email to use for contact and login.
    pub email: String,

    /// Plaintext password to use for login.
    pub password: String,

    /// Did the user agree to the terms of use?
    pub agree: bool,
}

impl RegistrationInput {
    /// Set one field to a new value.
    pub fn apply(&mut self, update: FieldUpdate) {
        match update {
            FieldUpdate::Email(email) => self.email = email,
            FieldUpdate::Password(password) => self.password = password,
            FieldUpdate::Agree(agree) => self.agree = agree,
        }
    }
}

impl Debug for RegistrationInput {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.debug_struct("RegistrationInput")
            .field("email", &self.email)
            .field("password", &"*".repeat(self.password.chars().count()))
            .field("agree", &self.agree)
            .finish()
    }
}

/// A change to a single form field.
#[derive(Clone, PartialEq, Eq)]
pub enum FieldUpdate {
    /// The email field changed
    Email(String),

    /// The password field changed
    Password(String),

    /// The terms checkbox was toggled
    Agree(bool),
}

impl Debug for FieldUpdate {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Self::Email(email) => f.debug_tuple("Email").field(email).finish(),
            Self::Password(password) => f
                .debug_tuple("Password")
                .field(&"*".repeat(password.chars().count()))
                .finish(),
            Self::Agree(agree) => f.debug_tuple("Agree").field(agree).finish(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn apply_only_touches_one_field() {
        let mut input = RegistrationInput::default();

        input.apply(FieldUpdate::Email("a@b.c".to_string()));
        input.apply(FieldUpdate::Agree(true));

        assert_eq!(
            input,
            RegistrationInput {
                email: "a@b.c".to_string(),
                password: String::new(),
                agree: true,
            }
        );
    }

    #[test]
    fn debug_masks_password() {
        let input = RegistrationInput {
            email: "a@b.c".to_string(),
            password: "secret".to_string(),
            agree: true,
        };

        let debugged = format!("{input:?}");

        assert!(!debugged.contains("secret"), "{debugged}");
        assert!(debugged.contains("******"), "{debugged}");
    }

    #[test]
    fn debug_masks_password_updates() {
        let debugged = format!("{:?}", FieldUpdate::Password("hunter22".to_string()));

        assert_eq!(debugged, r#"Password("********")"#);
    }

    #[test]
    fn serializes_as_form_body() {
        let input = RegistrationInput {
            email: "a@b.c".to_string(),
            password: "secret".to_string(),
            agree: true,
        };

        assert_eq!(
            serde_json::to_value(&input).unwrap(),
            serde_json::json!({"email": "a@b.c", "password": "secret", "agree": true})
        );
    }
}
