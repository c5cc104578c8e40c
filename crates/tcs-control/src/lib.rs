//! 上层工作流
//!
//! - [`batch`]：从 CSV 批量设置工位
//! - [`config`]：控制器连接配置（TOML）

pub mod batch;
pub mod config;

pub use batch::{
    BatchError, StationRecord, apply_records, load_csv, read_records, read_records_from_path,
};
pub use config::{ConfigError, ControllerConfig};
