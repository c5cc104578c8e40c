//! One-shot 模式
//!
//! 每个命令独立执行：
//! 1. 读取配置
//! 2. 连接并 attach
//! 3. 执行操作
//! 4. release

use anyhow::Result;
use tracing::warn;

use crate::commands::StationCommand;
use crate::connection::{Arm, ConnectionArgs};

/// One-shot 模式
pub struct OneShotMode {
    arm: Arm,
}

impl OneShotMode {
    /// 连接控制器
    pub fn connect(args: &ConnectionArgs) -> Result<Self> {
        Ok(Self {
            arm: args.connect()?,
        })
    }

    /// 执行一条命令后释放控制权
    ///
    /// 命令失败时仍尝试释放（会话已失效时跳过），返回命令本身的错误。
    pub fn run(mut self, command: &StationCommand) -> Result<()> {
        let outcome = command.execute(&mut self.arm);

        if self.arm.session().is_attached()
            && let Err(e) = self.arm.release()
        {
            warn!("Release after command failed: {}", e);
            if outcome.is_ok() {
                return Err(e.into());
            }
        }
        outcome
    }

    /// 释放控制权并发送 `exit`
    pub fn shutdown(mut self) -> Result<()> {
        self.arm.shutdown()?;
        println!("✅ 控制器会话已关闭");
        Ok(())
    }
}
