//! 命令名称常量
//!
//! 控制器区分大小写，名称必须与固件完全一致。

/// 获取 / 释放机械臂控制权：`attach <0|1>`
pub const ATTACH: &str = "attach";

/// 关闭控制台会话：`exit`
pub const EXIT: &str = "exit";

/// 以笛卡尔坐标设置工位：`locXyz <ix> <x> <y> <z> <yaw> <pitch> <roll>`
pub const LOC_XYZ: &str = "locXyz";

/// 以关节角设置工位：`locAngles <ix> <joints...>`
pub const LOC_ANGLES: &str = "locAngles";

/// 运动到工位：`Move <ix> <profile>`
pub const MOVE: &str = "Move";

/// 当前位置（笛卡尔）
pub const WHERE_C: &str = "wherec";

/// 当前位置（关节）
pub const WHERE_J: &str = "wherej";

/// 目标位置（笛卡尔）
pub const DEST_C: &str = "DestC";

/// 目标位置（关节）
pub const DEST_J: &str = "DestJ";

/// 示教托盘位置：`TeachPlate <ix> <z_clearance>`
pub const TEACH_PLATE: &str = "TeachPlate";

/// 抓取托盘：`PickPlate <ix> <0|1> <comp_torque>`
pub const PICK_PLATE: &str = "PickPlate";

/// 放置托盘：`PlacePlate <ix> <0|1> <comp_torque>`
pub const PLACE_PLATE: &str = "PlacePlate";
