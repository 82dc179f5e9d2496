//! A terminal registration form for account servers

/// The "functional core" to the main module's "imperative shell"
mod app;

/// Configuration and argument parsing
mod config;

/// Tab-order helpers for forms
mod form_fields;

/// Registering straight from the command line
mod headless;

/// Where logs go
mod logging;

use app::{App, EffectContext};
use clap::Parser;
use crossterm::event::{Event, EventStream};
use futures::StreamExt;
use ratatui::DefaultTerminal;
use signup_core::RegistrationInput;
use std::{io, process::ExitCode, sync::Arc};
use tokio::{
    sync::mpsc::{unbounded_channel, UnboundedSender},
    task::JoinHandle,
};

#[tokio::main]
async fn main() -> io::Result<ExitCode> {
    let config = config::Config::parse();

    if let Some(email) = config.email.clone() {
        logging::init_stderr();
        return Ok(run_headless(&config, email).await);
    }

    let _log_guard = logging::init_file(&config.data_dir())?;
    tracing::info!(server = %config.server, "starting");

    let mut terminal = ratatui::init();
    terminal.clear()?;
    let res = run(
        terminal,
        Arc::new(EffectContext::new(&config)),
        App::new(config.login_url(), config.terms_url()),
    )
    .await;
    ratatui::restore();
    res
}

/// Register once using command-line arguments and report how it went.
async fn run_headless(config: &config::Config, email: String) -> ExitCode {
    let Some(password) = config.password.clone() else {
        eprintln!("--password (or SIGNUP_PASSWORD) is required with --email");
        return ExitCode::from(2);
    };

    let input = RegistrationInput {
        email,
        password,
        agree: config.agree,
    };

    match headless::register(&config.client(), input, &config.login_url()).await {
        Ok(line) => {
            println!("{line}");
            ExitCode::SUCCESS
        }
        Err(problems) => {
            for problem in problems {
                eprintln!("{problem}");
            }
            ExitCode::FAILURE
        }
    }
}

/// Manage the lifecycle of the app
async fn run(
    mut terminal: DefaultTerminal,
    conn: Arc<EffectContext>,
    mut app: App,
) -> io::Result<ExitCode> {
    // We expect side-effectful behaviors (here, talking to the server) to take
    // place via async tasks. Once those tasks are done, we read their results
    // off of a channel. We keep track of outstanding effects so we can clean
    // up on exit.
    let (effect_tx, mut effect_rx) = unbounded_channel();
    let mut outstanding_effects: Vec<JoinHandle<()>> = Vec::with_capacity(1);

    terminal.draw(|frame| app.render(frame))?;

    let mut event_stream = EventStream::new();

    // Start our event loop!
    loop {
        // First thing we do is wait for an event. This can be either external
        // input or the async result of an effect. This is an `Option<_>`
        // because we don't need to pay attention to every piece of external
        // input (but we still redraw, e.g. after a resize.)
        let next_action_opt = tokio::select! {
            event_opt = event_stream.next() => {
                match event_opt {
                    Some(Ok(Event::Key(key_event))) => Some(app::Action::Key(key_event)),
                    Some(Err(err)) => Some(app::Action::Problem(err.to_string())),
                    _ => None,
                }
            },

            effect_opt = effect_rx.recv() => effect_opt,
        };

        if let Some(action) = next_action_opt {
            for effect in app.handle(action) {
                outstanding_effects.push(spawn_effect_task(
                    effect_tx.clone(),
                    Arc::clone(&conn),
                    effect,
                ));
            }
        }

        terminal.draw(|frame| app.render(frame))?;

        // This list should never be long (the form only allows one submission
        // at a time) so a full scan is fine.
        outstanding_effects.retain(|handle| !handle.is_finished());

        // Once the app wants to exit, the form (and its flow) is gone, so
        // nothing in flight has anywhere to report back to. Stop waiting.
        if let Some(code) = app.should_exit() {
            for effect in outstanding_effects.drain(..) {
                effect.abort();
            }

            return Ok(code);
        }
    }
}

/// Spawn a task to run an effect and send the next action to the app.
fn spawn_effect_task(
    effect_tx: UnboundedSender<app::Action>,
    conn: Arc<EffectContext>,
    effect: app::Effect,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        if let Some(next_action) = effect.run(&conn).await {
            // If the channel is closed we're shutting down and nobody needs
            // the result.
            if effect_tx.send(next_action).is_err() {
                tracing::debug!("dropping effect result during shutdown");
            }
        }
    })
}
