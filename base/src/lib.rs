//! Small utilities shared across the workspace.
//!
//! Kept deliberately narrow: epsilon-aware float comparison (used by the
//! time algebra for rescale/arithmetic round-trips) and tracing helpers.
//! Everything else that used to live here was specific to the REAPER/audio
//! host this workspace was extracted from and had no bearing on this crate.

mod approx_f64;
pub use approx_f64::*;

#[macro_use]
pub mod tracing_util;
