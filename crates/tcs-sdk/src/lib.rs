//! TCS SDK - TCS 机械臂控制器 Rust SDK
//!
//! 通过控制器的行式 ASCII 协议（默认 TCP 23 端口）完成工位设置、运动与托盘搬运。
//!
//! # 架构设计
//!
//! 本 SDK 采用分层架构，从底层到高层：
//!
//! - **协议层** (`protocol`): 命令编码、应答解码
//! - **传输层** (`transport`): 按行读写的传输抽象，TCP 实现
//! - **驱动层** (`driver`): 会话生命周期、失败分类
//! - **客户端层** (`client`): 工位级操作
//! - **控制层** (`control`): 批量加载、配置文件
//!
//! # 快速开始
//!
//! ```rust,no_run
//! use tcs_sdk::prelude::*;
//!
//! tcs_sdk::init_logger();
//! let session = SessionBuilder::new().address("192.168.0.1").build()?;
//! let mut arm = StationDriver::new(session);
//! arm.move_plate(2, 5, GripOptions::default())?;
//! arm.shutdown()?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub use tcs_client as client;
pub use tcs_control as control;
pub use tcs_driver as driver;
pub use tcs_protocol as protocol;
pub use tcs_transport as transport;

mod logging;
pub mod prelude;

pub use logging::init_logger;

// --- 用户以此为界 ---

pub use tcs_client::{GripOptions, ProfileIndex, StationDriver, StationIndex};
pub use tcs_driver::{
    CommandError, CommandResult, DriverError, FailureKind, Session, SessionBuilder, SessionState,
};
pub use tcs_protocol::{CoordinateSystem, Position, ProtocolError};
pub use tcs_transport::{LineTransport, TransportError};

/// 基于 TCP 的工位驱动
pub type TcpStationDriver = StationDriver<tcs_transport::TcpTransport>;
