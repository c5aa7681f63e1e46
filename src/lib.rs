//! AI Intel Hub - a daily RSS/Atom digest generator
//!
//! This crate fetches feeds from a registry of sources, keeps the entries
//! inside a rolling time window, highlights keyword matches, sorts sources
//! into topical columns and renders everything as a dated markdown report.

pub mod alert;
pub mod categorize;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod highlight;
pub mod inbox;
pub mod index;
pub mod model;
pub mod normalize;
pub mod pipeline;
pub mod report;
pub mod settings;
pub mod time;

pub use error::{Error, FetchError, Result};
pub use settings::Settings;
