//! 驱动层错误类型定义

use tcs_protocol::{Command, ProtocolError, RawResponse, Status};
use tcs_transport::TransportError;
use thiserror::Error;

use crate::state::SessionState;

/// 单条命令的结果
///
/// 成功时携带状态码之后的剩余 token。
pub type CommandResult<T = Vec<String>> = Result<T, CommandError>;

/// 失败分类标签
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    ControllerRejected,
    MalformedResponse,
    TransportFault,
    InvalidSessionState,
}

/// 命令失败
///
/// 每个变体都携带发起失败的命令，便于上层报告。控制器拒绝不会被自动重试：
/// 物理系统可能需要人工处理。
#[derive(Error, Debug)]
pub enum CommandError {
    /// 应答格式正确，但状态码非 0
    #[error("Controller rejected `{command}`: {response}")]
    ControllerRejected {
        command: Command,
        response: RawResponse,
    },

    /// 应答无法按预期格式解析（非数字状态码、空行、坐标无效）
    #[error("Malformed response to `{command}` ({raw:?}): {reason}")]
    MalformedResponse {
        command: Command,
        raw: String,
        #[source]
        reason: ProtocolError,
    },

    /// 传输层读写失败，会话随之失效
    #[error("Transport fault on `{command}`: {source}")]
    TransportFault {
        command: Command,
        source: TransportError,
    },

    /// 会话不处于允许该操作的状态，命令未发送
    #[error("Session is {state}, cannot send `{command}`")]
    InvalidSessionState {
        command: Command,
        state: SessionState,
    },
}

impl CommandError {
    pub fn kind(&self) -> FailureKind {
        match self {
            CommandError::ControllerRejected { .. } => FailureKind::ControllerRejected,
            CommandError::MalformedResponse { .. } => FailureKind::MalformedResponse,
            CommandError::TransportFault { .. } => FailureKind::TransportFault,
            CommandError::InvalidSessionState { .. } => FailureKind::InvalidSessionState,
        }
    }

    /// 发起失败的命令
    pub fn command(&self) -> &Command {
        match self {
            CommandError::ControllerRejected { command, .. }
            | CommandError::MalformedResponse { command, .. }
            | CommandError::TransportFault { command, .. }
            | CommandError::InvalidSessionState { command, .. } => command,
        }
    }

    /// 收到的原始应答（传输故障和状态错误时没有）
    pub fn raw(&self) -> Option<&str> {
        match self {
            CommandError::ControllerRejected { response, .. } => Some(response.line()),
            CommandError::MalformedResponse { raw, .. } => Some(raw.as_str()),
            _ => None,
        }
    }

    /// 控制器状态码（仅 `ControllerRejected`）
    pub fn status(&self) -> Option<Status> {
        match self {
            CommandError::ControllerRejected { response, .. } => Some(response.status()),
            _ => None,
        }
    }

    /// 传输故障对会话是致命的
    pub fn is_fatal(&self) -> bool {
        self.kind() == FailureKind::TransportFault
    }
}

/// 建立会话时的错误
///
/// 返回此错误时不存在任何 Session 实例。
#[derive(Error, Debug)]
pub enum DriverError {
    /// 无法建立传输连接
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// 初始 `attach 1` 未成功
    #[error("Unable to attach: {0}")]
    AttachFailed(#[source] CommandError),
}
