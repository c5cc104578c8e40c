//! 托盘抓取参数

/// `TeachPlate` 默认 Z 向安全高度
pub const DEFAULT_Z_CLEARANCE: i32 = 50;

/// 抓取 / 放置托盘时的柔顺参数
///
/// 水平柔顺开启时，控制器允许夹爪沿水平方向有限让位，
/// `compliance_torque` 为保持力矩百分比。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GripOptions {
    pub horizontal_compliance: bool,
    pub compliance_torque: i32,
}

impl GripOptions {
    pub fn new(horizontal_compliance: bool, compliance_torque: i32) -> Self {
        Self {
            horizontal_compliance,
            compliance_torque,
        }
    }

    /// 开启水平柔顺
    pub fn compliant(compliance_torque: i32) -> Self {
        Self::new(true, compliance_torque)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_rigid() {
        let grip = GripOptions::default();
        assert!(!grip.horizontal_compliance);
        assert_eq!(grip.compliance_torque, 0);
        assert_eq!(GripOptions::compliant(30), GripOptions::new(true, 30));
    }
}
