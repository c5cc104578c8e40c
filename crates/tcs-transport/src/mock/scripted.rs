use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use super::lock;
use crate::{LineTransport, TransportError, check_outgoing};

#[derive(Debug, Default)]
struct Script {
    replies: VecDeque<String>,
    sent: Vec<String>,
    fail_writes: bool,
}

/// 预设应答的传输
///
/// 每次 `read_line` 弹出队首应答；队列为空时返回 [`TransportError::Closed`]，
/// 与对端断开的表现一致。
#[derive(Debug, Clone, Default)]
pub struct ScriptedTransport {
    script: Arc<Mutex<Script>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// 以一组应答创建
    pub fn with_replies<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let transport = Self::new();
        for reply in replies {
            transport.push_reply(reply);
        }
        transport
    }

    pub fn push_reply(&self, reply: impl Into<String>) {
        lock(&self.script).replies.push_back(reply.into());
    }

    /// 已发送的所有行（不清空）
    pub fn sent_lines(&self) -> Vec<String> {
        lock(&self.script).sent.clone()
    }

    /// 取出并清空已发送的行
    pub fn take_sent_lines(&self) -> Vec<String> {
        std::mem::take(&mut lock(&self.script).sent)
    }

    /// 尚未被读取的应答数量
    pub fn pending_replies(&self) -> usize {
        lock(&self.script).replies.len()
    }

    /// 令后续写入全部失败（模拟断线）
    pub fn set_fail_writes(&self, fail: bool) {
        lock(&self.script).fail_writes = fail;
    }
}

impl LineTransport for ScriptedTransport {
    fn write_line(&mut self, line: &str) -> Result<(), TransportError> {
        let mut script = lock(&self.script);
        if script.fail_writes {
            return Err(TransportError::Io(std::io::Error::from(
                std::io::ErrorKind::BrokenPipe,
            )));
        }
        check_outgoing(line)?;
        script.sent.push(line.to_string());
        Ok(())
    }

    fn read_line(&mut self) -> Result<String, TransportError> {
        lock(&self.script).replies.pop_front().ok_or(TransportError::Closed)
    }
}
