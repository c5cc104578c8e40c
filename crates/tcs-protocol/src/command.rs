//! 命令构建
//!
//! [`Command`] 是一次请求的名称加有序参数，构建后不可变。
//! 本模块同时提供控制器指令集的构造函数，索引类参数不在本地校验，
//! 合法性由控制器应答决定。

use std::fmt;

use smallvec::SmallVec;

use crate::names;
use crate::position::{CoordinateSystem, Position};

/// 单条请求命令
///
/// # Example
///
/// ```rust
/// use tcs_protocol::Command;
///
/// let cmd = Command::new("TeachPlate").arg(2).arg(50);
/// assert_eq!(cmd.to_string(), "TeachPlate 2 50");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Command {
    name: String,
    args: SmallVec<[String; 8]>,
}

impl Command {
    /// 创建不带参数的命令
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        debug_assert!(is_token(&name), "command name must be a single token: {name:?}");
        Self {
            name,
            args: SmallVec::new(),
        }
    }

    /// 追加一个参数（使用 `Display` 形式）
    pub fn arg(mut self, value: impl fmt::Display) -> Self {
        let token = value.to_string();
        debug_assert!(is_token(&token), "argument must be a single token: {token:?}");
        self.args.push(token);
        self
    }

    /// 追加多个参数
    pub fn args<I>(self, values: I) -> Self
    where
        I: IntoIterator,
        I::Item: fmt::Display,
    {
        values.into_iter().fold(self, |cmd, value| cmd.arg(value))
    }

    /// 追加布尔标志，编码为 `0` / `1`
    pub fn flag(self, value: bool) -> Self {
        self.arg(u8::from(value))
    }

    /// 命令名称
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 位置参数（已转换为字符串）
    pub fn arguments(&self) -> &[String] {
        &self.args
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::encode(self))
    }
}

fn is_token(s: &str) -> bool {
    !s.is_empty() && !s.chars().any(char::is_whitespace)
}

// ============================================================================
// 指令集
// ============================================================================

/// `attach 1` 获取控制权，`attach 0` 释放
pub fn attach(enable: bool) -> Command {
    Command::new(names::ATTACH).flag(enable)
}

/// `exit`
pub fn exit() -> Command {
    Command::new(names::EXIT)
}

/// `locXyz` / `locAngles`，由坐标系决定
pub fn set_location(system: CoordinateSystem, station: i32, position: &Position) -> Command {
    Command::new(system.location_command())
        .arg(station)
        .args(position.iter())
}

/// `Move <ix> <profile>`
pub fn station_move(station: i32, profile: i32) -> Command {
    Command::new(names::MOVE).arg(station).arg(profile)
}

/// `wherec` / `wherej`
pub fn current_location(system: CoordinateSystem) -> Command {
    Command::new(system.where_command())
}

/// `DestC` / `DestJ`
pub fn goal_location(system: CoordinateSystem) -> Command {
    Command::new(system.dest_command())
}

/// `TeachPlate <ix> <z_clearance>`
pub fn teach_plate(station: i32, z_clearance: i32) -> Command {
    Command::new(names::TEACH_PLATE).arg(station).arg(z_clearance)
}

/// `PickPlate <ix> <0|1> <comp_torque>`
pub fn pick_plate(station: i32, horizontal_compliance: bool, compliance_torque: i32) -> Command {
    Command::new(names::PICK_PLATE)
        .arg(station)
        .flag(horizontal_compliance)
        .arg(compliance_torque)
}

/// `PlacePlate <ix> <0|1> <comp_torque>`
pub fn place_plate(station: i32, horizontal_compliance: bool, compliance_torque: i32) -> Command {
    Command::new(names::PLACE_PLATE)
        .arg(station)
        .flag(horizontal_compliance)
        .arg(compliance_torque)
}
