//! Builder 模式实现
//!
//! 提供链式构造 `Session` 实例的便捷方式。

use std::time::Duration;

use tcs_protocol::CoordinateSystem;
use tcs_transport::{LineTransport, TcpConfig, TcpTransport};
use tracing::info;

use crate::error::DriverError;
use crate::session::{Session, SessionConfig};

/// Session Builder（链式构造）
///
/// # Example
///
/// ```no_run
/// use std::time::Duration;
/// use tcs_driver::SessionBuilder;
/// use tcs_protocol::CoordinateSystem;
///
/// let session = SessionBuilder::new()
///     .address("192.168.0.1")
///     .connect_timeout(Duration::from_secs(3))
///     .default_coordinates(CoordinateSystem::Joint)
///     .build()
///     .unwrap();
/// ```
#[derive(Debug, Clone, Default)]
pub struct SessionBuilder {
    tcp: TcpConfig,
    session: SessionConfig,
}

impl SessionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// 控制器主机名或 IP（默认 `192.168.0.1`）
    pub fn address(mut self, address: impl Into<String>) -> Self {
        self.tcp.address = address.into();
        self
    }

    /// 控制台端口（默认 23）
    pub fn port(mut self, port: u16) -> Self {
        self.tcp.port = port;
        self
    }

    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.tcp.connect_timeout = Some(timeout);
        self
    }

    /// 设置读取超时（可选，默认无限等待）
    ///
    /// 超时会表现为传输故障，会话随即失效。
    pub fn read_timeout(mut self, timeout: Duration) -> Self {
        self.tcp.read_timeout = Some(timeout);
        self
    }

    /// 整体替换 TCP 配置
    pub fn tcp_config(mut self, config: TcpConfig) -> Self {
        self.tcp = config;
        self
    }

    /// 默认坐标系（默认笛卡尔），Session 建立后不可修改
    pub fn default_coordinates(mut self, system: CoordinateSystem) -> Self {
        self.session.default_coordinates = system;
        self
    }

    pub fn session_config(&self) -> &SessionConfig {
        &self.session
    }

    pub fn tcp(&self) -> &TcpConfig {
        &self.tcp
    }

    /// 连接控制器并执行初始 attach
    ///
    /// # Errors
    /// - `DriverError::Transport`: 连接失败
    /// - `DriverError::AttachFailed`: attach 被拒绝或应答异常
    pub fn build(self) -> Result<Session<TcpTransport>, DriverError> {
        info!(
            "Connecting to TCS controller at {}:{}",
            self.tcp.address, self.tcp.port
        );
        let transport = TcpTransport::connect(&self.tcp)?;
        Session::open(transport, self.session)
    }

    /// 在给定的传输上建立会话（忽略 TCP 配置）
    pub fn build_with<T: LineTransport>(self, transport: T) -> Result<Session<T>, DriverError> {
        Session::open(transport, self.session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::SessionState;
    use tcs_transport::mock::ScriptedTransport;

    #[test]
    fn test_builder_defaults() {
        let builder = SessionBuilder::new();
        assert_eq!(builder.tcp().address, "192.168.0.1");
        assert_eq!(builder.tcp().port, 23);
        assert_eq!(
            builder.session_config().default_coordinates,
            CoordinateSystem::Cartesian
        );
    }

    #[test]
    fn test_builder_chain() {
        let builder = SessionBuilder::new()
            .address("10.0.0.5")
            .port(10100)
            .read_timeout(Duration::from_millis(500))
            .default_coordinates(CoordinateSystem::Joint);
        assert_eq!(builder.tcp().address, "10.0.0.5");
        assert_eq!(builder.tcp().port, 10100);
        assert_eq!(builder.tcp().read_timeout, Some(Duration::from_millis(500)));
        assert_eq!(
            builder.session_config().default_coordinates,
            CoordinateSystem::Joint
        );
    }

    #[test]
    fn test_build_with_transport() {
        let session = SessionBuilder::new()
            .default_coordinates(CoordinateSystem::Joint)
            .build_with(ScriptedTransport::with_replies(["0"]))
            .unwrap();
        assert_eq!(session.state(), SessionState::Attached);
        assert_eq!(session.default_coordinates(), CoordinateSystem::Joint);
    }

    #[test]
    fn test_build_connection_refused() {
        // 绑定后立即释放，得到一个大概率无人监听的端口
        let port = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();
        let result = SessionBuilder::new()
            .address("127.0.0.1")
            .port(port)
            .connect_timeout(Duration::from_millis(200))
            .build();
        assert!(matches!(result, Err(DriverError::Transport(_))));
    }
}
