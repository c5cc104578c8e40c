//! Prelude - 常用类型的便捷导入
//!
//! ```rust
//! use tcs_sdk::prelude::*;
//! ```

pub use crate::client::StationDriver;
pub use crate::client::types::*;

pub use crate::driver::{Session, SessionBuilder, SessionConfig, SessionState};
pub use crate::protocol::{CoordinateSystem, Position};
pub use crate::transport::LineTransport;

// 错误类型
pub use crate::control::{BatchError, ConfigError};
pub use crate::driver::{CommandError, CommandResult, DriverError, FailureKind};
pub use crate::protocol::ProtocolError;
pub use crate::transport::TransportError;
