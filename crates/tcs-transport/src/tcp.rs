//! TCP 控制台传输
//!
//! 控制器在 telnet 端口上提供行式控制台。读取端使用 `BufReader` 按行切分，
//! 写入端使用 `try_clone` 得到的同一连接。

use std::io::{BufRead, BufReader, Write};
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::time::Duration;

use tracing::{debug, trace};

use crate::{LineTransport, TransportError, check_outgoing, strip_terminator};

/// 默认控制器地址
pub const DEFAULT_ADDRESS: &str = "192.168.0.1";

/// 默认控制台端口（telnet）
pub const DEFAULT_PORT: u16 = 23;

/// TCP 连接配置
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TcpConfig {
    /// 控制器主机名或 IP
    pub address: String,
    /// 控制台端口
    pub port: u16,
    /// 连接超时，`None` 使用系统默认
    pub connect_timeout: Option<Duration>,
    /// 读取超时，`None` 表示无限阻塞等待应答
    pub read_timeout: Option<Duration>,
}

impl Default for TcpConfig {
    fn default() -> Self {
        Self {
            address: DEFAULT_ADDRESS.to_string(),
            port: DEFAULT_PORT,
            connect_timeout: None,
            read_timeout: None,
        }
    }
}

/// TCP 行式传输
pub struct TcpTransport {
    reader: BufReader<TcpStream>,
    writer: TcpStream,
    peer: SocketAddr,
}

impl TcpTransport {
    /// 按配置建立连接
    pub fn connect(config: &TcpConfig) -> Result<Self, TransportError> {
        let target = (config.address.as_str(), config.port);
        let stream = match config.connect_timeout {
            Some(timeout) => {
                let addrs: Vec<SocketAddr> = target.to_socket_addrs()?.collect();
                connect_any(&addrs, timeout)?
            },
            None => TcpStream::connect(target)?,
        };

        Self::from_stream(stream, config.read_timeout)
    }

    /// 包装一个已建立的连接
    pub fn from_stream(
        stream: TcpStream,
        read_timeout: Option<Duration>,
    ) -> Result<Self, TransportError> {
        stream.set_nodelay(true)?;
        stream.set_read_timeout(read_timeout)?;
        let peer = stream.peer_addr()?;
        let writer = stream.try_clone()?;

        debug!("Connected to TCS controller at {}", peer);

        Ok(Self {
            reader: BufReader::new(stream),
            writer,
            peer,
        })
    }

    /// 对端地址
    pub fn peer_addr(&self) -> SocketAddr {
        self.peer
    }
}

fn connect_any(addrs: &[SocketAddr], timeout: Duration) -> Result<TcpStream, TransportError> {
    let mut last_err = None;
    for addr in addrs {
        match TcpStream::connect_timeout(addr, timeout) {
            Ok(stream) => return Ok(stream),
            Err(e) => last_err = Some(e),
        }
    }
    Err(match last_err {
        Some(e) => TransportError::Io(e),
        None => TransportError::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "address resolved to no socket addresses",
        )),
    })
}

impl LineTransport for TcpTransport {
    fn write_line(&mut self, line: &str) -> Result<(), TransportError> {
        check_outgoing(line)?;

        let mut buf = Vec::with_capacity(line.len() + 1);
        buf.extend_from_slice(line.as_bytes());
        buf.push(b'\n');

        self.writer.write_all(&buf)?;
        self.writer.flush()?;
        Ok(())
    }

    fn read_line(&mut self) -> Result<String, TransportError> {
        let mut buf = Vec::new();
        let n = self
            .reader
            .read_until(b'\n', &mut buf)
            .map_err(TransportError::from_read_error)?;

        if n == 0 {
            return Err(TransportError::Closed);
        }
        if buf.last() != Some(&b'\n') {
            return Err(TransportError::Framing(format!(
                "connection closed mid-line after {n} bytes"
            )));
        }
        if !buf.is_ascii() {
            return Err(TransportError::Framing("reply is not ASCII".to_string()));
        }

        // ASCII 已校验，不会失败
        let text = String::from_utf8_lossy(&buf);
        let line = strip_terminator(&text).to_string();
        trace!("<- {}: {:?}", self.peer, line);
        Ok(line)
    }
}
