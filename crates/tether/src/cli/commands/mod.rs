//! CLI commands

mod config;
mod doctor;
mod init;
mod resolve;
mod validate;

pub use config::ConfigCommand;
pub use doctor::DoctorCommand;
pub use init::InitCommand;
pub use validate::ValidateCommand;
