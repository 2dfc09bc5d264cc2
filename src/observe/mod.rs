//! Observe Module - Visibility detection.
//!
//! - **intersection** - Pure intersection-ratio math
//! - **observer** - One-shot in-view signal registry

mod intersection;
mod observer;

pub use intersection::*;
pub use observer::*;
