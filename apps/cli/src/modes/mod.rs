//! 运行模式
//!
//! 支持两种模式：
//! - One-shot 模式：每次命令独立连接、attach、release
//! - REPL 模式：交互式 Shell，多条命令共用一个会话

pub mod oneshot;
pub mod repl;
