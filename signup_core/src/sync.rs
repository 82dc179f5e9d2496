/// Things that can go wrong talking to the server
pub mod error;
pub use error::Error;

/// The registration endpoint
pub mod register;

/// HTTP client for the registration server
pub mod client;
pub use client::Client;
