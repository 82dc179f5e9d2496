use signup_core::{FieldUpdate, Navigator, RegistrationFlow, RegistrationInput, Submitter};

/// Follows the login link by remembering that we should tell the user where
/// to go. There's no screen to switch to.
struct LoginLink<'a> {
    /// Where to log in
    url: &'a str,

    /// Did the flow send us there?
    followed: bool,
}

impl Navigator for LoginLink<'_> {
    fn to_login(&mut self) {
        tracing::info!(url = self.url, "registered; sending user to login");
        self.followed = true;
    }
}

/// Run one registration without the form. On success, returns the line to
/// show the user. On failure, returns every problem (field errors first, then
/// the banner) so the user can fix their arguments and try again.
pub async fn register<S: Submitter>(
    submitter: &S,
    input: RegistrationInput,
    login_url: &str,
) -> Result<String, Vec<String>> {
    let mut flow = RegistrationFlow::new();
    flow.update_field(FieldUpdate::Email(input.email));
    flow.update_field(FieldUpdate::Password(input.password));
    flow.update_field(FieldUpdate::Agree(input.agree));

    let mut link = LoginLink {
        url: login_url,
        followed: false,
    };

    flow.submit(submitter, &mut link).await;

    if link.followed {
        return Ok(format!("Registered! Log in at {login_url}"));
    }

    let mut problems: Vec<String> = flow
        .errors()
        .iter()
        .map(|(field, error)| format!("{field}: {}", error.message(*field)))
        .collect();

    if let Some(banner) = flow.banner() {
        problems.push(banner.to_string());
    }

    Err(problems)
}
