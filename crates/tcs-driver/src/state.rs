//! Session 状态定义
//!
//! ```text
//! Uninitialized ──attach──▶ Attached ──release──▶ Released ──exit──▶ ShutDown
//!                              │                                        ▲
//!                              └──────────────shutdown──────────────────┘
//!          (任何状态下的传输故障) ──▶ Faulted
//! ```
//!
//! `Released`、`ShutDown`、`Faulted` 对当前 Session 实例都是终态，
//! 需要新的 Session（重新 attach）才能继续操作。

use std::fmt;

/// Session 状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    /// 仅在构造期间存在，调用方不可见
    #[default]
    Uninitialized,

    /// 已获取控制权，可以发送命令
    Attached,

    /// 已释放控制权（`attach 0` 成功）
    Released,

    /// 已释放并发送 `exit`
    ShutDown,

    /// 传输层故障后，会话不再可用
    Faulted,
}

impl SessionState {
    /// 是否为终态
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            SessionState::Released | SessionState::ShutDown | SessionState::Faulted
        )
    }

    pub fn is_attached(self) -> bool {
        self == SessionState::Attached
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SessionState::Uninitialized => "uninitialized",
            SessionState::Attached => "attached",
            SessionState::Released => "released",
            SessionState::ShutDown => "shut down",
            SessionState::Faulted => "faulted",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_states() {
        assert!(!SessionState::Uninitialized.is_terminal());
        assert!(!SessionState::Attached.is_terminal());
        assert!(SessionState::Released.is_terminal());
        assert!(SessionState::ShutDown.is_terminal());
        assert!(SessionState::Faulted.is_terminal());
    }

    #[test]
    fn test_display() {
        assert_eq!(SessionState::ShutDown.to_string(), "shut down");
        assert_eq!(SessionState::default(), SessionState::Uninitialized);
    }
}
