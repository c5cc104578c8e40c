//! 工位与托盘操作命令
//!
//! One-shot 模式与 REPL 共用同一组命令定义。

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use tcs_sdk::client::{DEFAULT_Z_CLEARANCE, GripOptions, StationDriver};
use tcs_sdk::protocol::{CoordinateSystem, Position};
use tcs_sdk::transport::LineTransport;

/// 坐标系选择（都不指定时使用配置中的默认坐标系）
#[derive(Args, Debug, Clone, Copy, Default)]
pub struct CoordinateArgs {
    /// 使用关节坐标
    #[arg(long, conflicts_with = "cartesian")]
    pub joint: bool,

    /// 使用笛卡尔坐标
    #[arg(long)]
    pub cartesian: bool,
}

impl CoordinateArgs {
    pub fn system(&self) -> Option<CoordinateSystem> {
        match (self.joint, self.cartesian) {
            (true, _) => Some(CoordinateSystem::Joint),
            (_, true) => Some(CoordinateSystem::Cartesian),
            _ => None,
        }
    }
}

/// 抓取参数
#[derive(Args, Debug, Clone, Copy, Default)]
pub struct GripArgs {
    /// 开启水平柔顺
    #[arg(long)]
    pub compliance: bool,

    /// 柔顺保持力矩（百分比）
    #[arg(long, default_value_t = 0)]
    pub torque: i32,
}

impl From<GripArgs> for GripOptions {
    fn from(args: GripArgs) -> Self {
        GripOptions::new(args.compliance, args.torque)
    }
}

/// 需要已 attach 会话的命令
#[derive(Subcommand, Debug, Clone)]
pub enum StationCommand {
    /// 查询当前位置
    Where {
        #[command(flatten)]
        coords: CoordinateArgs,
    },

    /// 查询目标位置
    Dest {
        #[command(flatten)]
        coords: CoordinateArgs,
    },

    /// 设置工位坐标
    SetStation {
        /// 工位索引
        index: i32,

        /// 坐标值（空格分隔）
        #[arg(required = true, num_args = 1.., allow_negative_numbers = true)]
        values: Vec<f64>,

        #[command(flatten)]
        coords: CoordinateArgs,
    },

    /// 按运动参数移动到工位
    Move {
        index: i32,
        profile: i32,
    },

    /// 示教托盘
    Teach {
        index: i32,

        /// Z 向安全高度
        #[arg(long, default_value_t = DEFAULT_Z_CLEARANCE)]
        clearance: i32,
    },

    /// 抓取托盘
    Pick {
        index: i32,
        #[command(flatten)]
        grip: GripArgs,
    },

    /// 放置托盘
    Place {
        index: i32,
        #[command(flatten)]
        grip: GripArgs,
    },

    /// 从一个工位搬运托盘到另一个工位（无回滚）
    MovePlate {
        from: i32,
        to: i32,
        #[command(flatten)]
        grip: GripArgs,
    },

    /// 从 CSV 批量设置工位（每行 `index,c1,c2,...`）
    Load {
        path: PathBuf,
        #[command(flatten)]
        coords: CoordinateArgs,
    },
}

impl StationCommand {
    pub fn execute<T: LineTransport>(&self, arm: &mut StationDriver<T>) -> Result<()> {
        match self {
            StationCommand::Where { coords } => {
                let position = arm.get_current_location(coords.system())?;
                println!("{position}");
            },

            StationCommand::Dest { coords } => {
                let position = arm.get_goal_location(coords.system())?;
                println!("{position}");
            },

            StationCommand::SetStation {
                index,
                values,
                coords,
            } => {
                let position = Position::from(values.as_slice());
                arm.set_station(*index, &position, coords.system())?;
                println!("✅ 工位 {index} 已设置为 {position}");
            },

            StationCommand::Move { index, profile } => {
                arm.station_move(*index, *profile)?;
                println!("✅ 已移动到工位 {index}");
            },

            StationCommand::Teach { index, clearance } => {
                arm.teach_plate_with_clearance(*index, *clearance)?;
                println!("✅ 工位 {index} 托盘已示教");
            },

            StationCommand::Pick { index, grip } => {
                arm.pick_plate(*index, (*grip).into())?;
                println!("✅ 已从工位 {index} 抓取托盘");
            },

            StationCommand::Place { index, grip } => {
                arm.place_plate(*index, (*grip).into())?;
                println!("✅ 已放置托盘到工位 {index}");
            },

            StationCommand::MovePlate { from, to, grip } => {
                arm.move_plate(*from, *to, (*grip).into())?;
                println!("✅ 托盘已从工位 {from} 搬运到 {to}");
            },

            StationCommand::Load { path, coords } => {
                let applied = tcs_sdk::control::load_csv(arm, path, coords.system())
                    .with_context(|| format!("加载 {} 失败", path.display()))?;
                println!("✅ 已加载 {applied} 个工位");
            },
        }
        Ok(())
    }
}
