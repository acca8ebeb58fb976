#![warn(missing_docs)]
//! Deterministic test surfaces for the form engine: a recording
//! [`TraceSurface`] with scripted interactions, a canned [`StaticHost`],
//! and the shared showcase fixtures.

mod fixtures;
mod host;
mod trace;

pub use fixtures::{showcase, Showcase};
pub use host::StaticHost;
pub use trace::{SurfaceOp, TraceSurface};
