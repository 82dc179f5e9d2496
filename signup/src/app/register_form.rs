use crate::focus_ring;
use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Alignment, Constraint, Flex, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};
use signup_core::{Attempt, Field, FieldUpdate, Gate, RegistrationFlow, ValidationErrors};
use tui_input::{backend::crossterm::EventHandler, Input};

/// A form for registering a new account
#[derive(Debug, Default)]
pub struct RegisterForm {
    /// Which element has focus
    focus: Focus,

    /// What's your email?
    email: Input,

    /// What's your password? (Will be masked)
    password: Input,

    /// Field values and submission state
    flow: RegistrationFlow,

    /// Field errors only show up once someone has tried to submit
    show_errors: bool,
}

focus_ring!(Focus, Email, Password, Agree, Submit);

/// What the app needs to do after the form handled a key
#[derive(Debug)]
pub enum FormEvent {
    /// Nothing; the form took care of it
    Nothing,

    /// Send this registration
    Dispatch(Attempt),

    /// The user wants to leave the form
    Leave,

    /// The user followed the "already have an account" link
    FollowLoginLink,
}

impl RegisterForm {
    /// The flow behind this form
    pub fn flow(&self) -> &RegistrationFlow {
        &self.flow
    }

    /// The flow behind this form, for applying submission outcomes
    pub fn flow_mut(&mut self) -> &mut RegistrationFlow {
        &mut self.flow
    }

    /// Handle a key press.
    pub fn handle_key(&mut self, key: KeyEvent) -> FormEvent {
        match key.code {
            KeyCode::Tab | KeyCode::Down => {
                self.focus = self.focus.next();
                FormEvent::Nothing
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.focus = self.focus.prev();
                FormEvent::Nothing
            }
            KeyCode::Enter => self.submit(),
            KeyCode::Esc => {
                if self.flow.banner().is_some() {
                    self.flow.dismiss_error();
                    FormEvent::Nothing
                } else {
                    FormEvent::Leave
                }
            }
            KeyCode::Char('l') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                FormEvent::FollowLoginLink
            }
            KeyCode::Char(' ') if self.focus == Focus::Agree => {
                let agree = !self.flow.input().agree;
                self.flow.update_field(FieldUpdate::Agree(agree));
                FormEvent::Nothing
            }
            KeyCode::Char(' ') if self.focus == Focus::Submit => self.submit(),
            _ => {
                let event = Event::Key(key);

                match self.focus {
                    Focus::Email => {
                        self.email.handle_event(&event);
                        self.flow
                            .update_field(FieldUpdate::Email(self.email.value().to_string()));
                    }
                    Focus::Password => {
                        self.password.handle_event(&event);
                        self.flow
                            .update_field(FieldUpdate::Password(self.password.value().to_string()));
                    }
                    Focus::Agree | Focus::Submit => (),
                }

                FormEvent::Nothing
            }
        }
    }

    /// Try to submit. Anything that stops the submission shows up in the form
    /// (field errors, the banner, or the disabled submit button.)
    fn submit(&mut self) -> FormEvent {
        self.show_errors = true;

        match self.flow.begin_submit() {
            Gate::Dispatch(attempt) => FormEvent::Dispatch(attempt),
            Gate::NotAgreed | Gate::Invalid(_) | Gate::Busy | Gate::Finished => {
                FormEvent::Nothing
            }
        }
    }

    /// Render the form in the middle of `body_area`.
    pub fn render(&self, body_area: Rect, terms_url: &str, frame: &mut Frame<'_>) {
        let banner = self.flow.banner();
        let banner_height = if banner.is_some() { 3 } else { 0 };

        let popup_vert =
            Layout::vertical([Constraint::Length(16 + banner_height)]).flex(Flex::Center);
        let popup_horiz = Layout::horizontal([Constraint::Percentage(50)]).flex(Flex::Center);

        let [popup_area] = popup_vert.areas(body_area);
        let [popup_area] = popup_horiz.areas(popup_area);
        frame.render_widget(Clear, popup_area);

        let outer = Block::default()
            .borders(Borders::ALL)
            .title("Register")
            .border_style(Style::default().fg(Color::Blue));
        let inner = outer.inner(popup_area);
        frame.render_widget(outer, popup_area);

        let fields = Layout::vertical(Constraint::from_lengths([
            banner_height,
            3,
            1,
            3,
            1,
            1,
            1,
            3,
            1,
        ]));
        let [banner_area, email_area, email_error_area, password_area, password_error_area, agree_area, terms_area, submit_area, link_area] =
            fields.areas(inner);

        let errors = if self.show_errors {
            self.flow.errors()
        } else {
            ValidationErrors::new()
        };

        // BANNER
        if let Some(message) = banner {
            let banner_widget = Paragraph::new(format!("{message} (esc to dismiss)"))
                .style(Style::default().fg(Color::Red))
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_style(Style::default().fg(Color::Red)),
                );

            frame.render_widget(banner_widget, banner_area);
        }

        // EMAIL
        self.render_input(
            frame,
            email_area,
            "Email",
            self.email.value().to_string(),
            &self.email,
            self.focus == Focus::Email,
        );
        render_field_error(frame, email_error_area, &errors, Field::Email);

        // PASSWORD
        self.render_input(
            frame,
            password_area,
            "Password",
            "*".repeat(self.password.value().chars().count()),
            &self.password,
            self.focus == Focus::Password,
        );
        render_field_error(frame, password_error_area, &errors, Field::Password);

        // AGREE
        {
            let check = if self.flow.input().agree { "x" } else { " " };
            let mut style = Style::default();
            if self.focus == Focus::Agree {
                style = style.add_modifier(Modifier::BOLD);
            }

            frame.render_widget(
                Paragraph::new(format!("[{check}] I agree to the terms of use")).style(style),
                agree_area,
            );
            frame.render_widget(
                Paragraph::new(format!("    Terms: {terms_url}"))
                    .style(Style::default().fg(Color::DarkGray)),
                terms_area,
            );
        }

        // SUBMIT
        {
            let mut border_style = Style::default().fg(Color::Blue);
            let mut text_style = Style::default();
            if !self.flow.can_submit() {
                text_style = text_style.fg(Color::DarkGray);
                border_style = border_style.fg(Color::DarkGray);
            }
            if self.focus == Focus::Submit {
                text_style = text_style.add_modifier(Modifier::BOLD);
            }

            let submit = Paragraph::new(self.flow.submit_label())
                .alignment(Alignment::Center)
                .style(text_style)
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_style(border_style),
                );

            frame.render_widget(submit, submit_area);
        }

        // LINK
        frame.render_widget(
            Paragraph::new("Already have an account? Log in (ctrl-l)")
                .style(Style::default().fg(Color::Blue)),
            link_area,
        );
    }

    /// Render a bordered text input, placing the cursor in it if it's focused.
    #[expect(clippy::cast_possible_truncation)]
    fn render_input(
        &self,
        frame: &mut Frame<'_>,
        area: Rect,
        title: &str,
        shown: String,
        input: &Input,
        focused: bool,
    ) {
        let width = area.width.saturating_sub(2 + 1); // -2 for the border, -1 for the cursor
        let scroll = input.visual_scroll(width as usize);

        let border_style = if focused {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::Blue)
        };

        let field = Paragraph::new(shown)
            .scroll((0, scroll as u16))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(title.to_string())
                    .border_style(border_style),
            );

        frame.render_widget(field, area);

        if focused && !self.flow.is_finished() {
            frame.set_cursor_position((
                area.x
                    + (input.visual_cursor().max(scroll) - scroll) as u16 // current end of text
                    + 1, // just past the border
                area.y + 1, // +1 row for the border/title
            ));
        }
    }
}

/// Show the error for a field underneath it, if there is one.
fn render_field_error(frame: &mut Frame<'_>, area: Rect, errors: &ValidationErrors, field: Field) {
    if let Some(error) = errors.get(field) {
        frame.render_widget(
            Paragraph::new(error.message(field)).style(Style::default().fg(Color::Red)),
            area,
        );
    }
}
