//! Exit codes for the CLI

/// Configuration could not be loaded
pub const CONFIG_ERROR: i32 = 2;

/// Configuration loaded but failed validation
pub const VALIDATION_ERROR: i32 = 5;
