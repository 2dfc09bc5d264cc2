//! Engine Module - Block registry and lifecycle.

mod registry;

pub use registry::*;
