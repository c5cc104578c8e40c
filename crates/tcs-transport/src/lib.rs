//! # TCS Transport Layer
//!
//! 行式传输抽象：一条命令一行，一条应答一行，严格有序。
//!
//! - [`TcpTransport`]: 通过 TCP 连接控制器的控制台端口
//! - [`mock::ScriptedTransport`] / [`mock::Simulator`]: 内存中的测试替身（`mock` feature）
//!
//! 上层（Session）只依赖 [`LineTransport`] trait。

use thiserror::Error;

pub mod tcp;

#[cfg(feature = "mock")]
pub mod mock;

pub use tcp::{TcpConfig, TcpTransport};

/// 传输层统一错误类型
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),
    /// 对端关闭连接（读到 EOF）
    #[error("Connection closed by peer")]
    Closed,
    /// 行格式错误（嵌入换行、非 ASCII、未终止的行）
    #[error("Framing error: {0}")]
    Framing(String),
    #[error("Read timeout")]
    Timeout,
}

impl TransportError {
    /// 超时与 IO 层的 `WouldBlock`/`TimedOut` 统一归类
    pub(crate) fn from_read_error(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::WouldBlock | std::io::ErrorKind::TimedOut => TransportError::Timeout,
            std::io::ErrorKind::UnexpectedEof => TransportError::Closed,
            _ => TransportError::Io(err),
        }
    }
}

/// 行式双工通道
///
/// 实现方负责换行符的添加与剥离：`write_line` 的参数不含换行，
/// `read_line` 返回的行也不含行尾的 `\n` / `\r\n`。
/// `read_line` 阻塞直到收到完整一行。
pub trait LineTransport {
    fn write_line(&mut self, line: &str) -> Result<(), TransportError>;
    fn read_line(&mut self) -> Result<String, TransportError>;
}

impl<T: LineTransport + ?Sized> LineTransport for Box<T> {
    fn write_line(&mut self, line: &str) -> Result<(), TransportError> {
        (**self).write_line(line)
    }

    fn read_line(&mut self) -> Result<String, TransportError> {
        (**self).read_line()
    }
}

impl<T: LineTransport + ?Sized> LineTransport for &mut T {
    fn write_line(&mut self, line: &str) -> Result<(), TransportError> {
        (**self).write_line(line)
    }

    fn read_line(&mut self) -> Result<String, TransportError> {
        (**self).read_line()
    }
}

/// 校验待发送的一行：不得包含换行，且必须是 ASCII
pub fn check_outgoing(line: &str) -> Result<(), TransportError> {
    if line.contains(['\n', '\r']) {
        return Err(TransportError::Framing(format!(
            "outgoing line contains a line terminator: {line:?}"
        )));
    }
    if !line.is_ascii() {
        return Err(TransportError::Framing(format!(
            "outgoing line is not ASCII: {line:?}"
        )));
    }
    Ok(())
}

/// 剥离行尾的 `\n` 或 `\r\n`
pub fn strip_terminator(line: &str) -> &str {
    let line = line.strip_suffix('\n').unwrap_or(line);
    line.strip_suffix('\r').unwrap_or(line)
}
