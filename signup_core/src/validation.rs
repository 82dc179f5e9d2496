use crate::input::RegistrationInput;
use std::collections::{btree_map, BTreeMap};
use std::fmt::{self, Display};
use std::ops::RangeInclusive;

/// How long a password may be, in UTF-16 code units (the way browsers
/// measure `minlength` and `maxlength`.)
pub const PASSWORD_LENGTH: RangeInclusive<usize> = 6..=20;

/// The fields that carry per-field validation. (Agreeing to the terms is
/// checked at submit time instead.)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    /// The email field
    Email,

    /// The password field
    Password,
}

impl Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Email => write!(f, "email"),
            Self::Password => write!(f, "password"),
        }
    }
}

/// Why a field failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldError {
    /// Nothing was entered
    Required,

    /// The value doesn't look like it should (e.g. an email without a domain)
    PatternMismatch,

    /// The value is too short or too long
    LengthOutOfRange,
}

impl FieldError {
    /// The message to show underneath the field. Password problems are all
    /// shown the same way, even though we know which rule failed.
    pub fn message(self, field: Field) -> &'static str {
        match (field, self) {
            (Field::Email, Self::Required) => "Email is required",
            (Field::Email, _) => "Email is invalid",
            (Field::Password, _) => "Password is required",
        }
    }
}

/// The result of a validation pass: at most one error per field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(BTreeMap<Field, FieldError>);

impl ValidationErrors {
    /// No errors at all.
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Get the error for a field, if it has one.
    pub fn get(&self, field: Field) -> Option<FieldError> {
        self.0.get(&field).copied()
    }

    /// Did every field pass?
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// How many fields failed?
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterate over failing fields in a stable order.
    pub fn iter(&self) -> btree_map::Iter<'_, Field, FieldError> {
        self.0.iter()
    }

    fn insert(&mut self, field: Field, error: FieldError) {
        self.0.insert(field, error);
    }
}

impl<'a> IntoIterator for &'a ValidationErrors {
    type IntoIter = btree_map::Iter<'a, Field, FieldError>;
    type Item = (&'a Field, &'a FieldError);

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Check every field of the input. This never looks at `agree`.
pub fn validate(input: &RegistrationInput) -> ValidationErrors {
    let mut errors = ValidationErrors::new();

    if input.email.is_empty() {
        errors.insert(Field::Email, FieldError::Required);
    } else if !looks_like_email(&input.email) {
        errors.insert(Field::Email, FieldError::PatternMismatch);
    }

    if input.password.is_empty() {
        errors.insert(Field::Password, FieldError::Required);
    } else if !PASSWORD_LENGTH.contains(&input.password.encode_utf16().count()) {
        errors.insert(Field::Password, FieldError::LengthOutOfRange);
    }

    errors
}

/// `local@domain.tld`, with at least one character in each part. The TLD is
/// whatever follows the last dot.
fn looks_like_email(email: &str) -> bool {
    let Some((head, tld)) = email.rsplit_once('.') else {
        return false;
    };

    match head.split_once('@') {
        Some((local, domain)) => !local.is_empty() && !domain.is_empty() && !tld.is_empty(),
        None => false,
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use proptest::prelude::*;

    fn input(email: &str, password: &str) -> RegistrationInput {
        RegistrationInput {
            email: email.to_string(),
            password: password.to_string(),
            agree: false,
        }
    }

    #[test]
    fn shortest_valid_input() {
        assert_eq!(validate(&input("a@b.c", "secret")), ValidationErrors::new());
    }

    #[test]
    fn bad_email_is_pattern_mismatch() {
        let errors = validate(&input("bad", "secret"));

        assert_eq!(errors.get(Field::Email), Some(FieldError::PatternMismatch));
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn email_needs_every_part() {
        for email in ["@b.c", "a@.c", "a@b.", "a.b@c", "a@b"] {
            assert_eq!(
                validate(&input(email, "secret")).get(Field::Email),
                Some(FieldError::PatternMismatch),
                "{email}"
            );
        }
    }

    #[test]
    fn tld_is_after_last_dot() {
        let errors = validate(&input("first.last@mail.example.com", "secret"));

        assert_eq!(errors.get(Field::Email), None);
    }

    #[test]
    fn empty_form_reports_required_for_both() {
        let errors = validate(&RegistrationInput::default());

        assert_eq!(errors.get(Field::Email), Some(FieldError::Required));
        assert_eq!(errors.get(Field::Password), Some(FieldError::Required));
    }

    #[test]
    fn password_length_is_counted_in_utf16_units() {
        // two units each
        assert_eq!(validate(&input("a@b.c", "😀😀😀")).get(Field::Password), None);
        assert_eq!(
            validate(&input("a@b.c", &"😀".repeat(11))).get(Field::Password),
            Some(FieldError::LengthOutOfRange)
        );

        // one unit each, but more than one byte
        assert_eq!(validate(&input("a@b.c", "pässwö")).get(Field::Password), None);
    }

    #[test]
    fn all_password_errors_read_the_same() {
        assert_eq!(
            FieldError::Required.message(Field::Password),
            FieldError::LengthOutOfRange.message(Field::Password)
        );
        assert_ne!(
            FieldError::Required.message(Field::Email),
            FieldError::PatternMismatch.message(Field::Email)
        );
    }

    proptest! {
        #[test]
        fn empty_email_is_required(password in ".{0,25}") {
            prop_assert_eq!(
                validate(&input("", &password)).get(Field::Email),
                Some(FieldError::Required)
            );
        }

        #[test]
        fn email_without_at_is_mismatch(email in "[a-z.]{1,20}") {
            prop_assert_eq!(
                validate(&input(&email, "secret")).get(Field::Email),
                Some(FieldError::PatternMismatch)
            );
        }

        #[test]
        fn email_without_dot_after_at_is_mismatch(email in "[a-z.]{0,8}@[a-z]{0,8}") {
            prop_assert_eq!(
                validate(&input(&email, "secret")).get(Field::Email),
                Some(FieldError::PatternMismatch)
            );
        }

        #[test]
        fn well_formed_email_passes(email in "[a-z0-9]{1,8}@[a-z0-9]{1,8}\\.[a-z]{1,4}") {
            prop_assert_eq!(validate(&input(&email, "secret")).get(Field::Email), None);
        }

        #[test]
        fn password_in_range_passes(password in "[a-zA-Z0-9]{6,20}") {
            prop_assert_eq!(validate(&input("a@b.c", &password)).get(Field::Password), None);
        }

        #[test]
        fn password_just_outside_range_is_out_of_range(
            password in prop_oneof!["[a-z]{5}", "[a-z]{21}"]
        ) {
            prop_assert_eq!(
                validate(&input("a@b.c", &password)).get(Field::Password),
                Some(FieldError::LengthOutOfRange)
            );
        }

        #[test]
        fn validation_ignores_agree(email in ".{0,10}", password in ".{0,25}") {
            let mut agreed = input(&email, &password);
            agreed.agree = true;

            prop_assert_eq!(validate(&agreed), validate(&input(&email, &password)));
        }
    }
}
