//! Umbrella crate: re-exports the page controllers and the selector engine.

pub use pagecss;
pub use pagefx::*;
