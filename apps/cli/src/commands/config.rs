//! 配置管理命令
//!
//! 用于管理 CLI 配置（控制器地址、端口、超时、默认坐标系）

use std::path::Path;

use anyhow::{Context, Result};
use clap::{Subcommand, ValueEnum};
use tcs_sdk::control::ControllerConfig;
use tcs_sdk::protocol::CoordinateSystem;

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoordinatesArg {
    Cartesian,
    Joint,
}

impl From<CoordinatesArg> for CoordinateSystem {
    fn from(arg: CoordinatesArg) -> Self {
        match arg {
            CoordinatesArg::Cartesian => CoordinateSystem::Cartesian,
            CoordinatesArg::Joint => CoordinateSystem::Joint,
        }
    }
}

/// 配置命令
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// 设置配置项
    Set {
        /// 控制器地址
        #[arg(long)]
        address: Option<String>,

        /// 控制器端口（与全局 --port 区分）
        #[arg(long = "controller-port")]
        controller_port: Option<u16>,

        /// 连接超时（毫秒）
        #[arg(long)]
        connect_timeout_ms: Option<u64>,

        /// 读取超时（毫秒）
        #[arg(long)]
        read_timeout_ms: Option<u64>,

        /// 默认坐标系
        #[arg(long, value_enum)]
        coordinates: Option<CoordinatesArg>,
    },

    /// 获取配置项
    Get {
        /// 配置项名称（address / port / connect_timeout_ms / read_timeout_ms / default_coordinates）
        #[arg(default_value = "all")]
        key: String,
    },

    /// 检查配置
    Check,
}

impl ConfigCommand {
    pub fn execute(self, path: &Path) -> Result<()> {
        match self {
            ConfigCommand::Set {
                address,
                controller_port,
                connect_timeout_ms,
                read_timeout_ms,
                coordinates,
            } => {
                let mut config = load_or_default(path)?;

                if let Some(address) = address {
                    println!("✅ 设置控制器地址: {address}");
                    config.address = address;
                }
                if let Some(port) = controller_port {
                    println!("✅ 设置控制器端口: {port}");
                    config.port = port;
                }
                if let Some(ms) = connect_timeout_ms {
                    println!("✅ 设置连接超时: {ms} ms");
                    config.connect_timeout_ms = Some(ms);
                }
                if let Some(ms) = read_timeout_ms {
                    println!("✅ 设置读取超时: {ms} ms");
                    config.read_timeout_ms = Some(ms);
                }
                if let Some(coordinates) = coordinates {
                    config.default_coordinates = coordinates.into();
                    println!("✅ 设置默认坐标系: {}", config.default_coordinates);
                }

                config
                    .save(path)
                    .with_context(|| format!("写入配置文件失败: {}", path.display()))
            },

            ConfigCommand::Get { key } => {
                let config = load_or_default(path)?;
                let optional = |v: Option<u64>| v.map_or("(未设置)".to_string(), |v| v.to_string());

                match key.as_str() {
                    "address" => println!("{}", config.address),
                    "port" => println!("{}", config.port),
                    "connect_timeout_ms" => println!("{}", optional(config.connect_timeout_ms)),
                    "read_timeout_ms" => println!("{}", optional(config.read_timeout_ms)),
                    "default_coordinates" => println!("{}", config.default_coordinates),
                    "all" => print!("{}", config.to_toml_string()?),
                    other => anyhow::bail!("未知配置项: {other}"),
                }
                Ok(())
            },

            ConfigCommand::Check => {
                println!("配置文件: {}", path.display());
                if !path.exists() {
                    println!("  (不存在，使用默认值)");
                    return Ok(());
                }

                let config = ControllerConfig::load(path)
                    .with_context(|| format!("配置文件无效: {}", path.display()))?;
                println!("  控制器: {}:{}", config.address, config.port);
                println!("  默认坐标系: {}", config.default_coordinates);
                println!("✅ 配置有效");
                Ok(())
            },
        }
    }
}

fn load_or_default(path: &Path) -> Result<ControllerConfig> {
    if !path.exists() {
        return Ok(ControllerConfig::default());
    }
    ControllerConfig::load(path).with_context(|| format!("读取配置文件失败: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        ConfigCommand::Set {
            address: Some("10.0.0.9".to_string()),
            controller_port: Some(2323),
            connect_timeout_ms: None,
            read_timeout_ms: Some(800),
            coordinates: Some(CoordinatesArg::Joint),
        }
        .execute(&path)
        .unwrap();

        let config = ControllerConfig::load(&path).unwrap();
        assert_eq!(config.address, "10.0.0.9");
        assert_eq!(config.port, 2323);
        assert_eq!(config.read_timeout_ms, Some(800));
        assert_eq!(config.default_coordinates, CoordinateSystem::Joint);
    }

    #[test]
    fn test_get_unknown_key() {
        let dir = tempfile::tempdir().unwrap();
        let err = ConfigCommand::Get {
            key: "interface".to_string(),
        }
        .execute(&dir.path().join("config.toml"))
        .unwrap_err();
        assert!(err.to_string().contains("interface"));
    }
}
