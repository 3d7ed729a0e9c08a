//! Verification utilities for texfill
//!
//! This crate reads filled textures back to the host and counts texels that
//! differ from the expected fill value. It also hosts the fill harness shared
//! by the command-line tools.

pub mod compare;
mod error;
pub mod harness;
mod readback;
mod verify;

pub use error::VerifyError;
pub use verify::{SliceReport, count_mismatched_texels, verify_all_slices, verify_slice};
