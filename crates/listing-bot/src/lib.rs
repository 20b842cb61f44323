//! An out-of-the-box listing chat bot talking to the listing HTTP API.
//!
//! The crate includes a CLI tool for chatting in the terminal. And you can
//! also use it as a library to embed the conversation into your own host
//! apps.

#![deny(missing_docs)]

#[macro_use]
extern crate tracing;

mod config;
mod session;

pub use config::{AppConfig, ConfigError};
pub use session::{Session, SessionBuilder, load_catalog};

/// Re-exports of [`listing_bot_core`] crate.
pub mod core {
    pub use listing_bot_core::*;
}
