use clap::Parser;
use signup_core::sync::{register, Client};
use std::{path::PathBuf, time::Duration};
use url::Url;

/// Register a new account from the terminal
#[derive(Debug, Parser)]
#[clap(version)]
pub struct Config {
    /// The registration server, e.g. `https://accounts.example.com`
    #[clap(long, env = "SIGNUP_SERVER", default_value = "http://localhost:3000")]
    pub server: String,

    /// Where registrations are sent on the server
    #[clap(long, env = "SIGNUP_REGISTER_PATH", default_value = register::PATH)]
    pub register_path: String,

    /// Where to send people once they've registered (and where the "already
    /// have an account" link goes)
    #[clap(long, env = "SIGNUP_LOGIN_PATH", default_value = "/login")]
    pub login_path: String,

    /// Where the terms of use are published on the server
    #[clap(long, env = "SIGNUP_TERMS_PATH", default_value = "/terms")]
    pub terms_path: String,

    /// How long to wait for the server, in whole seconds (at least 1)
    #[clap(long, env = "SIGNUP_TIMEOUT", default_value = "30", value_parser = duration_parser)]
    pub timeout: Duration,

    /// Where should we write logs?
    #[clap(long)]
    data_dir: Option<PathBuf>,

    /// Register without the interactive form, using this email
    #[clap(long)]
    pub email: Option<String>,

    /// Password to use with `--email`
    #[clap(long, env = "SIGNUP_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Agree to the terms of use (with `--email`)
    #[clap(long)]
    pub agree: bool,
}

fn duration_parser(s: &str) -> Result<Duration, String> {
    match s.parse::<u64>() {
        Ok(0) => Err("a timeout of 0 would fail every request".to_string()),
        Ok(secs) => Ok(Duration::from_secs(secs)),
        Err(err) => Err(err.to_string()),
    }
}

impl Config {
    /// Get either the configured or a default data directory. If no data
    /// directory can be found (e.g. because `$HOME` is unset) we will use the
    /// current directory.
    pub fn data_dir(&self) -> PathBuf {
        self.data_dir
            .clone()
            .or_else(|| {
                directories::ProjectDirs::from("zone", "bytes", "signup")
                    .map(|dirs| dirs.data_local_dir().to_owned())
            })
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// The full login destination.
    pub fn login_url(&self) -> String {
        self.url_for(&self.login_path)
    }

    /// The full terms of use location.
    pub fn terms_url(&self) -> String {
        self.url_for(&self.terms_path)
    }

    /// Put a path on the server. If the server isn't a valid URL we glue the
    /// strings together and let the user sort it out.
    fn url_for(&self, path: &str) -> String {
        Url::parse(&self.server)
            .and_then(|server| server.join(path))
            .map(String::from)
            .unwrap_or_else(|_| format!("{}{path}", self.server.trim_end_matches('/')))
    }

    /// A client for the configured server.
    pub fn client(&self) -> Client {
        Client::new(self.server.clone())
            .with_register_path(self.register_path.clone())
            .with_timeout(self.timeout)
    }
}
