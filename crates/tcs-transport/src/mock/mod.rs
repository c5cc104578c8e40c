//! 测试替身（`mock` feature）
//!
//! - [`ScriptedTransport`]: 按顺序回放预设应答，记录所有发出的行
//! - [`Simulator`]: 有状态的控制器模拟，支持完整指令集
//!
//! 两者都是 `Clone` 的共享句柄：把一个克隆交给 Session 之后，
//! 测试仍可以通过另一个克隆检查发送记录和内部状态。

mod scripted;
mod simulator;

pub use scripted::ScriptedTransport;
pub use simulator::{SimStation, Simulator};

use std::sync::{Mutex, MutexGuard, PoisonError};

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}
