//! Step workflows: business-level flows composed from page objects. Each
//! workflow boundary lands one STEP record in the action log, then delegates
//! and propagates.

pub mod login;
pub mod search;
