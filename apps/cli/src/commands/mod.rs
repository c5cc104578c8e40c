//! 命令定义和实现

pub mod config;
pub mod station;

pub use config::ConfigCommand;
pub use station::StationCommand;
