//! Configuration system for Tether

pub mod defaults;
mod external;
mod loader;
mod options;
mod package;
mod paths;
mod types;
pub mod validation;

pub use external::*;
pub use loader::*;
pub use options::*;
pub use package::*;
pub use paths::*;
pub use types::*;
pub use validation::*;
