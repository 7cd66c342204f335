//! Browser automation engine for the ALEPE search interface.
//!
//! Provides headless Chromium control behind the [`BrowserActions`] trait so
//! the pagination logic can run against a real page or an in-memory fake.

pub mod actions;
pub mod engine;
pub mod error;

pub use actions::BrowserActions;
pub use engine::BrowserEngine;
pub use error::{BrowserError, Result};
