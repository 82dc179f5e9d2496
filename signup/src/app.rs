/// Things that can happen to the app
mod action;
pub use action::Action;

/// Side effects the app asks the shell to perform
mod effect;
pub use effect::{Effect, EffectContext};

/// The registration form itself
mod register_form;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    layout::{Alignment, Constraint, Flex, Layout},
    style::{Color, Style},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};
use register_form::{FormEvent, RegisterForm};
use signup_core::{Navigator, Resolution};
use std::process::ExitCode;

/// The "functional core" of the app.
pub struct App {
    /// Status to display (visible at the bottom of the screen)
    status_line: Option<String>,

    /// What the user is looking at
    screen: Screen,

    /// Where people go to log in
    login_url: String,

    /// Where the terms of use live
    terms_url: String,
}

impl App {
    /// Create a new instance of the app, starting on an empty form
    pub fn new(login_url: String, terms_url: String) -> Self {
        Self {
            status_line: None,
            screen: Screen::Registering(Box::default()),
            login_url,
            terms_url,
        }
    }

    /// Render the app's UI to the screen
    pub fn render(&mut self, frame: &mut Frame) {
        let vertical = Layout::vertical([Constraint::Min(0), Constraint::Length(1)]);
        let [body_area, status_area] = vertical.areas(frame.area());

        match &self.screen {
            Screen::Registering(form) => form.render(body_area, &self.terms_url, frame),
            Screen::LoggingIn { registered } => {
                let popup_vert = Layout::vertical([Constraint::Length(5)]).flex(Flex::Center);
                let popup_horiz =
                    Layout::horizontal([Constraint::Percentage(50)]).flex(Flex::Center);

                let [popup_area] = popup_vert.areas(body_area);
                let [popup_area] = popup_horiz.areas(popup_area);

                let heading = if *registered {
                    "Your account is ready!"
                } else {
                    "Welcome back!"
                };

                let popup = Paragraph::new(format!(
                    "{heading}\nLog in at {}\n(q to quit)",
                    self.login_url
                ))
                .alignment(Alignment::Center)
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .title("Log in")
                        .border_style(Style::default().fg(Color::Blue)),
                );

                frame.render_widget(Clear, popup_area);
                frame.render_widget(popup, popup_area);
            }
            Screen::Exiting(_) => frame.render_widget(Paragraph::new("Exiting…"), body_area),
        }

        let status = Paragraph::new(match &self.status_line {
            Some(line) => line.as_str(),
            None => "tab: next field · space: toggle · enter: register · esc: back",
        });

        frame.render_widget(status, status_area);
    }

    /// Handle an `Action`, updating the app's state and producing some side effect(s)
    pub fn handle(&mut self, action: Action) -> Vec<Effect> {
        match action {
            Action::Key(key) => self.handle_key(key),
            Action::Problem(problem) => {
                self.status_line = Some(problem);

                vec![]
            }
            Action::Registered { attempt, outcome } => {
                let Screen::Registering(form) = &mut self.screen else {
                    // The form is gone, so there's nothing left to update.
                    tracing::debug!(%attempt, "ignoring registration outcome after leaving the form");
                    return vec![];
                };

                let mut router = Router::default();
                let resolution = form.flow_mut().resolve(attempt, outcome, &mut router);

                self.status_line = match resolution {
                    Resolution::Succeeded => Some("Registered!".to_owned()),
                    Resolution::Rejected | Resolution::Failed => {
                        Some("Registration didn't go through".to_owned())
                    }
                    Resolution::Stale => self.status_line.take(),
                };

                if router.login_requested {
                    self.screen = Screen::LoggingIn { registered: true };
                }

                vec![]
            }
        }
    }

    /// Handle a key press on whatever screen we're on
    fn handle_key(&mut self, key: KeyEvent) -> Vec<Effect> {
        if key.kind != KeyEventKind::Press {
            return vec![];
        }

        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.screen = Screen::Exiting(ExitCode::SUCCESS);
            return vec![];
        }

        match &mut self.screen {
            Screen::Registering(form) => match form.handle_key(key) {
                FormEvent::Nothing => vec![],
                FormEvent::Dispatch(attempt) => {
                    self.status_line = Some("Registering…".to_owned());

                    vec![Effect::Register(attempt)]
                }
                FormEvent::Leave => {
                    // Dropping the form drops its flow, so anything still in
                    // flight gets ignored when it comes back.
                    self.screen = Screen::Exiting(ExitCode::SUCCESS);

                    vec![]
                }
                FormEvent::FollowLoginLink => {
                    self.screen = Screen::LoggingIn { registered: false };

                    vec![]
                }
            },
            Screen::LoggingIn { .. } => {
                if matches!(key.code, KeyCode::Char('q') | KeyCode::Esc) {
                    self.screen = Screen::Exiting(ExitCode::SUCCESS);
                }

                vec![]
            }
            Screen::Exiting(_) => vec![],
        }
    }

    /// Let the TUI manager know whether we're all wrapped up and can exit.
    pub fn should_exit(&self) -> Option<ExitCode> {
        if let Screen::Exiting(code) = &self.screen {
            Some(*code)
        } else {
            None
        }
    }
}

/// What the user is looking at
#[derive(Debug)]
enum Screen {
    /// Filling out the registration form
    Registering(Box<RegisterForm>),

    /// Done here; go log in
    LoggingIn {
        /// Did we get here by registering (as opposed to following the link)?
        registered: bool,
    },

    /// We're done and want the following exit code
    Exiting(ExitCode),
}

/// Records navigation requests so the app can switch screens once the flow
/// is done with its update.
#[derive(Debug, Default)]
struct Router {
    /// Should we show the login screen?
    login_requested: bool,
}

impl Navigator for Router {
    fn to_login(&mut self) {
        self.login_requested = true;
    }
}
