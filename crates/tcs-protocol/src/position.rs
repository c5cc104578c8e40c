//! 坐标类型
//!
//! 同一组空格分隔的数字既可以表示笛卡尔位姿，也可以表示关节角，
//! 二者只由包裹它的命令名区分。因此 [`CoordinateSystem`] 必须随每次调用显式传递，
//! 不能从数值本身推断。

use std::fmt;

use smallvec::SmallVec;

use crate::{ProtocolError, names};

/// 笛卡尔位姿的坐标个数 (x, y, z, yaw, pitch, roll)
pub const CARTESIAN_AXES: usize = 6;

/// 坐标系
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum CoordinateSystem {
    /// 笛卡尔空间 (x, y, z, yaw, pitch, roll)
    #[default]
    Cartesian,
    /// 关节空间
    Joint,
}

impl CoordinateSystem {
    /// 设置工位使用的命令
    pub fn location_command(self) -> &'static str {
        match self {
            CoordinateSystem::Cartesian => names::LOC_XYZ,
            CoordinateSystem::Joint => names::LOC_ANGLES,
        }
    }

    /// 查询当前位置使用的命令
    pub fn where_command(self) -> &'static str {
        match self {
            CoordinateSystem::Cartesian => names::WHERE_C,
            CoordinateSystem::Joint => names::WHERE_J,
        }
    }

    /// 查询目标位置使用的命令
    pub fn dest_command(self) -> &'static str {
        match self {
            CoordinateSystem::Cartesian => names::DEST_C,
            CoordinateSystem::Joint => names::DEST_J,
        }
    }

    pub fn from_cartesian_flag(cartesian: bool) -> Self {
        if cartesian {
            CoordinateSystem::Cartesian
        } else {
            CoordinateSystem::Joint
        }
    }

    pub fn is_cartesian(self) -> bool {
        self == CoordinateSystem::Cartesian
    }

    /// 位置应答应携带的坐标个数；关节数取决于机型，不做限制
    pub fn expected_len(self) -> Option<usize> {
        match self {
            CoordinateSystem::Cartesian => Some(CARTESIAN_AXES),
            CoordinateSystem::Joint => None,
        }
    }
}

impl fmt::Display for CoordinateSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoordinateSystem::Cartesian => f.write_str("cartesian"),
            CoordinateSystem::Joint => f.write_str("joint"),
        }
    }
}

/// 有序坐标元组
///
/// 坐标使用 `f64` 保存；整数值编码时不带小数点（`4.0` → `"4"`）。
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position(SmallVec<[f64; 6]>);

impl Position {
    pub fn new(coords: impl IntoIterator<Item = f64>) -> Self {
        Self(coords.into_iter().collect())
    }

    /// 从应答中的剩余 token 解析坐标
    ///
    /// 任何非数字（或非有限）的 token 都是协议错误，即使控制器报告成功。
    pub fn from_tokens<S: AsRef<str>>(tokens: &[S]) -> Result<Self, ProtocolError> {
        if tokens.is_empty() {
            return Err(ProtocolError::EmptyPosition);
        }

        tokens
            .iter()
            .enumerate()
            .map(|(index, token)| {
                let token = token.as_ref();
                token
                    .parse::<f64>()
                    .ok()
                    .filter(|v| v.is_finite())
                    .ok_or_else(|| ProtocolError::InvalidCoordinate {
                        index,
                        token: token.to_string(),
                    })
            })
            .collect::<Result<SmallVec<_>, _>>()
            .map(Position)
    }

    /// 解析位置查询应答，并按坐标系检查坐标个数
    pub fn from_reply<S: AsRef<str>>(
        system: CoordinateSystem,
        tokens: &[S],
    ) -> Result<Self, ProtocolError> {
        if let Some(expected) = system.expected_len()
            && tokens.len() != expected
        {
            return Err(ProtocolError::CoordinateCount {
                expected,
                found: tokens.len(),
            });
        }
        Self::from_tokens(tokens)
    }

    pub fn coords(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.0.iter().copied()
    }
}

impl<const N: usize> From<[f64; N]> for Position {
    fn from(coords: [f64; N]) -> Self {
        Self::new(coords)
    }
}

impl From<Vec<f64>> for Position {
    fn from(coords: Vec<f64>) -> Self {
        Self::new(coords)
    }
}

impl From<&[f64]> for Position {
    fn from(coords: &[f64]) -> Self {
        Self::new(coords.iter().copied())
    }
}

impl FromIterator<f64> for Position {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        Self::new(iter)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        for (i, v) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{v}")?;
        }
        f.write_str(")")
    }
}
