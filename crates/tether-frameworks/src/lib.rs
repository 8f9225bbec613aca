//! Tether Frameworks - web framework detection
//!
//! Each [`FrameworkConfig`] carries a predicate over a loaded
//! [`tether_core::Config`] and the framework's conventional web output
//! directory. The [`FrameworkDetector`] checks them in ascending priority
//! and falls back to a default framework when none matches.

pub mod detection;
pub mod framework;

pub use detection::FrameworkDetector;
pub use framework::{depends_on, FrameworkConfig, MatchFn, UNKNOWN_FRAMEWORK};
