//! 客户端接口模块
//!
//! 本模块提供 TCS 机械臂的工位级接口，包括：
//! - 工位坐标设置（笛卡尔 / 关节）
//! - 按运动参数移动到工位，查询当前与目标位置
//! - 托盘示教、抓取、放置与组合搬运
//!
//! # 使用场景
//!
//! 这是大多数用户应该使用的模块。
//! 如果需要发送任意原始命令，可以使用 `tcs-driver` 的 [`Session`](tcs_driver::Session)。

pub mod station;
pub mod types;

pub use station::StationDriver;
pub use types::*;
