//! 驱动层模块
//!
//! 本模块提供 TCS 控制器的会话管理，包括：
//! - attach / release / shutdown 生命周期
//! - 请求编码、应答解码与失败分类
//! - 会话状态机（非 `Attached` 状态下拒绝发送）
//!
//! # 使用场景
//!
//! 适用于需要直接发送原始命令的场景。
//! 大多数用户应该使用 `tcs-client` 提供的 `StationDriver`。

mod builder;
mod error;
mod session;
pub mod state;

pub use builder::SessionBuilder;
pub use error::{CommandError, CommandResult, DriverError, FailureKind};
pub use session::{Session, SessionConfig};
pub use state::SessionState;
