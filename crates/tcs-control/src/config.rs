//! # 控制器配置
//!
//! 以 TOML 文件保存控制器地址、超时与默认坐标系。

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tcs_driver::SessionBuilder;
use tcs_protocol::CoordinateSystem;
use tcs_transport::tcp::{DEFAULT_ADDRESS, DEFAULT_PORT};
use thiserror::Error;

/// 配置文件读写错误
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to access config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// 控制器连接配置
///
/// ```toml
/// address = "192.168.0.1"
/// port = 23
/// read_timeout_ms = 5000
/// default_coordinates = "joint"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    pub address: String,
    pub port: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connect_timeout_ms: Option<u64>,
    /// 未设置时读取无限等待
    #[serde(skip_serializing_if = "Option::is_none")]
    pub read_timeout_ms: Option<u64>,
    pub default_coordinates: CoordinateSystem,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            address: DEFAULT_ADDRESS.to_string(),
            port: DEFAULT_PORT,
            connect_timeout_ms: None,
            read_timeout_ms: None,
            default_coordinates: CoordinateSystem::Cartesian,
        }
    }
}

impl ControllerConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// 从文件加载配置
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// 保存配置到文件（必要时创建父目录）
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let io_err = |source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        fs::write(path, self.to_toml_string()?).map_err(io_err)
    }

    pub fn connect_timeout(&self) -> Option<Duration> {
        self.connect_timeout_ms.map(Duration::from_millis)
    }

    pub fn read_timeout(&self) -> Option<Duration> {
        self.read_timeout_ms.map(Duration::from_millis)
    }

    /// 转换为 [`SessionBuilder`]
    pub fn into_builder(self) -> SessionBuilder {
        let mut builder = SessionBuilder::new()
            .port(self.port)
            .default_coordinates(self.default_coordinates);
        if let Some(timeout) = self.connect_timeout() {
            builder = builder.connect_timeout(timeout);
        }
        if let Some(timeout) = self.read_timeout() {
            builder = builder.read_timeout(timeout);
        }
        builder.address(self.address)
    }
}
