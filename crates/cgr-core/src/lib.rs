//! Core domain + application logic for the ChatGPT relay bot.
//!
//! This crate is intentionally framework-agnostic. Telegram / ChatGPT live
//! behind ports (traits) implemented in adapter crates.

pub mod command;
pub mod config;
pub mod domain;
pub mod errors;
pub mod logging;
pub mod messaging;
pub mod model;
pub mod relay;
pub mod session;
pub mod streaming;

pub use errors::{Error, Result};
