//! DevTools-protocol browser engine.
//!
//! [`CdpEngine`] implements the engine seam from `pommel-core` by driving a
//! Chromium over the Chrome DevTools Protocol: it launches a local executable
//! (located by [`finder::BrowserFinder`]) or attaches to an already-running
//! browser via its CDP endpoint.

pub mod element;
pub mod engine;
pub mod finder;
pub mod page;

pub use engine::CdpEngine;

use pommel_core::error::PommelError;

pub(crate) fn engine_err(err: chromiumoxide::error::CdpError) -> PommelError {
    PommelError::Engine(err.to_string())
}
