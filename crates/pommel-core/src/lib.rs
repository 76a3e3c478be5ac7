//! Core of the pommel UI test harness.
//!
//! The pieces compose explicitly: [`config::resolve`] freezes a
//! [`config::RunConfig`] once, a [`session::TestSession`] owns the browser
//! page for one test, an [`interactor::Interactor`] performs logged,
//! deadline-bounded page work, and the [`runner::SuiteRunner`] drives tagged
//! scenarios and writes the report. Browser access goes through the traits in
//! [`driver`]; [`testing`] provides a scripted in-memory engine for tests.

pub mod artifacts;
pub mod config;
pub mod driver;
pub mod error;
pub mod interactor;
pub mod logging;
pub mod report;
pub mod runner;
pub mod session;
pub mod testing;

pub use error::{ConfigError, PommelError, Result};
