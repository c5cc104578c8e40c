//! Session：请求/应答引擎
//!
//! 独占持有传输句柄，一次只有一条未完成的请求：写入一行后阻塞等待恰好一行应答，
//! 再按状态码分类。没有内部锁，多调用方并发访问需要由上层保证互斥。

use tcs_protocol::{Command, CoordinateSystem, RawResponse, command, decode, encode};
use tcs_transport::{LineTransport, TransportError};
use tracing::{debug, error, info, trace, warn};

use crate::error::{CommandError, CommandResult, DriverError};
use crate::state::SessionState;

/// Session 配置
///
/// 构造后不可修改。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SessionConfig {
    /// 未显式指定坐标系时使用的默认值
    pub default_coordinates: CoordinateSystem,
}

/// 已 attach 的控制器会话
///
/// 只能通过 [`Session::open`]（或 [`SessionBuilder`](crate::SessionBuilder)）创建，
/// 构造时自动发送 `attach 1`；失败则不产生任何 Session。
///
/// # Example
///
/// ```rust,no_run
/// use tcs_driver::{Session, SessionConfig};
/// use tcs_transport::{TcpConfig, TcpTransport};
///
/// let transport = TcpTransport::connect(&TcpConfig::default())?;
/// let mut session = Session::open(transport, SessionConfig::default())?;
/// let fields = session.send(tcs_protocol::command::station_move(1, 1))?;
/// session.shutdown()?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct Session<T: LineTransport> {
    transport: T,
    state: SessionState,
    config: SessionConfig,
}

impl<T: LineTransport> Session<T> {
    /// 接管传输并执行初始 attach
    ///
    /// # Errors
    ///
    /// - `DriverError::AttachFailed`: `attach 1` 未成功（传输保持失败时的状态，不重试）
    pub fn open(transport: T, config: SessionConfig) -> Result<Self, DriverError> {
        let mut session = Session {
            transport,
            state: SessionState::Uninitialized,
            config,
        };

        match session.attach() {
            Ok(_) => Ok(session),
            Err(e) => {
                warn!("Initial attach failed: {}", e);
                Err(DriverError::AttachFailed(e))
            },
        }
    }

    /// 发送 `attach 1`
    ///
    /// 已 attach 时重复发送是允许的；终态下直接失败。
    pub fn attach(&mut self) -> CommandResult {
        let cmd = command::attach(true);
        match self.state {
            SessionState::Uninitialized | SessionState::Attached => {},
            state => return Err(CommandError::InvalidSessionState { command: cmd, state }),
        }

        let fields = self.exchange(cmd)?;
        self.state = SessionState::Attached;
        info!("Attached to TCS controller");
        Ok(fields)
    }

    /// 发送 `attach 0`，成功后进入 `Released`
    pub fn release(&mut self) -> CommandResult {
        let fields = self.send(command::attach(false))?;
        self.state = SessionState::Released;
        info!("Released TCS controller");
        Ok(fields)
    }

    /// 释放控制权后发送 `exit`
    ///
    /// 释放失败时立即返回该失败，不会发送 `exit`。已处于 `Released` 时只发送 `exit`。
    pub fn shutdown(&mut self) -> CommandResult {
        match self.state {
            SessionState::Attached => {
                self.release()?;
            },
            SessionState::Released => {},
            state => {
                return Err(CommandError::InvalidSessionState {
                    command: command::exit(),
                    state,
                });
            },
        }

        let fields = self.exchange(command::exit())?;
        self.state = SessionState::ShutDown;
        info!("TCS session shut down");
        Ok(fields)
    }

    /// 发送一条命令并分类应答
    ///
    /// 要求会话处于 `Attached`，否则不发送并返回 `InvalidSessionState`。
    /// 成功时返回状态码之后的剩余 token。
    pub fn send(&mut self, command: Command) -> CommandResult {
        self.request(command).map(RawResponse::into_fields)
    }

    /// 与 [`send`](Self::send) 相同，但成功时保留完整应答
    pub fn request(&mut self, command: Command) -> CommandResult<RawResponse> {
        if self.state != SessionState::Attached {
            return Err(CommandError::InvalidSessionState {
                command,
                state: self.state,
            });
        }
        self.round_trip(command)
    }

    fn exchange(&mut self, command: Command) -> CommandResult {
        self.round_trip(command).map(RawResponse::into_fields)
    }

    fn round_trip(&mut self, command: Command) -> CommandResult<RawResponse> {
        let line = encode(&command);
        debug!("-> {}", line);

        if let Err(source) = self.transport.write_line(&line) {
            return Err(self.fault(command, source));
        }

        let reply = match self.transport.read_line() {
            Ok(reply) => reply,
            Err(source) => return Err(self.fault(command, source)),
        };
        trace!("<- {}", reply);

        classify(command, reply)
    }

    fn fault(&mut self, command: Command, source: TransportError) -> CommandError {
        error!("Transport fault on `{}`: {}", command, source);
        self.state = SessionState::Faulted;
        CommandError::TransportFault { command, source }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_attached(&self) -> bool {
        self.state.is_attached()
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn default_coordinates(&self) -> CoordinateSystem {
        self.config.default_coordinates
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// 交还传输句柄（不发送任何命令）
    pub fn into_transport(self) -> T {
        self.transport
    }
}

/// 状态码 0 → 成功；其他 → `ControllerRejected`；解析失败 → `MalformedResponse`
fn classify(command: Command, line: String) -> CommandResult<RawResponse> {
    match decode(&line) {
        Ok(response) if response.status().is_success() => Ok(response),
        Ok(response) => {
            warn!("`{}` rejected with status {}", command, response.status());
            Err(CommandError::ControllerRejected { command, response })
        },
        Err(reason) => {
            warn!("Malformed reply to `{}`: {:?} ({})", command, line, reason);
            Err(CommandError::MalformedResponse {
                command,
                raw: line,
                reason,
            })
        },
    }
}
