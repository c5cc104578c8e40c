//! 连接参数与会话建立
//!
//! 命令行参数优先于配置文件。`--sim` 时连接进程内的模拟器。

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use tcs_sdk::client::StationDriver;
use tcs_sdk::control::ControllerConfig;
use tcs_sdk::driver::SessionConfig;
use tcs_sdk::transport::{LineTransport, TcpTransport};
use tcs_sdk::transport::mock::Simulator;
use tracing::{debug, info};

/// 类型擦除后的工位驱动（TCP 或模拟器）
pub type Arm = StationDriver<Box<dyn LineTransport>>;

/// 全局连接参数
#[derive(Args, Debug, Clone, Default)]
pub struct ConnectionArgs {
    /// 控制器地址（覆盖配置）
    #[arg(long, global = true)]
    pub addr: Option<String>,

    /// 控制器端口（覆盖配置）
    #[arg(long, global = true)]
    pub port: Option<u16>,

    /// 使用进程内模拟器代替真实控制器
    #[arg(long, global = true)]
    pub sim: bool,

    /// 配置文件路径（默认 `<config_dir>/tcs/config.toml`）
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

impl ConnectionArgs {
    pub fn config_path(&self) -> Result<PathBuf> {
        match &self.config {
            Some(path) => Ok(path.clone()),
            None => default_config_path(),
        }
    }

    /// 读取配置文件（不存在时使用默认值）并应用命令行覆盖
    pub fn resolve(&self) -> Result<ControllerConfig> {
        let path = self.config_path()?;
        let mut config = if path.exists() {
            ControllerConfig::load(&path)
                .with_context(|| format!("读取配置文件失败: {}", path.display()))?
        } else {
            debug!("No config file at {}, using defaults", path.display());
            ControllerConfig::default()
        };

        if let Some(addr) = &self.addr {
            config.address = addr.clone();
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        Ok(config)
    }

    /// 建立会话（含初始 attach）
    pub fn connect(&self) -> Result<Arm> {
        let config = self.resolve()?;

        if self.sim {
            info!("Using in-process simulator");
            let session_config = SessionConfig {
                default_coordinates: config.default_coordinates,
            };
            let transport: Box<dyn LineTransport> = Box::new(Simulator::new());
            return StationDriver::open(transport, session_config).context("模拟器 attach 失败");
        }

        let builder = config.into_builder();
        let tcp = builder.tcp();
        info!("Connecting to {}:{}", tcp.address, tcp.port);
        let transport = TcpTransport::connect(tcp)
            .with_context(|| format!("无法连接控制器 {}:{}", tcp.address, tcp.port))?;
        debug!("Connected to {}", transport.peer_addr());

        // 擦除传输类型，与模拟器共用同一套命令实现
        let transport: Box<dyn LineTransport> = Box::new(transport);
        let session = builder.build_with(transport).context("attach 失败")?;
        Ok(StationDriver::new(session))
    }
}

/// `<config_dir>/tcs/config.toml`
pub fn default_config_path() -> Result<PathBuf> {
    let mut path = dirs::config_dir().ok_or_else(|| anyhow::anyhow!("无法确定配置目录"))?;
    path.push("tcs");
    path.push("config.toml");
    Ok(path)
}
