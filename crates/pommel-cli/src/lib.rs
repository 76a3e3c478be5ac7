//! Suite runner for the practice storefront.
//!
//! The binary wires the built-in scenario suite to the CDP engine; the
//! page objects and step workflows here are the reference consumers of
//! `pommel-core`.

pub mod cli;
pub mod commands;
pub mod pages;
pub mod scenarios;
pub mod steps;
