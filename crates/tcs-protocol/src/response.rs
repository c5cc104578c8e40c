//! 应答解析
//!
//! 一条应答是一行以空白分隔的 token，首个 token 为整数状态码。

use std::fmt;

/// 控制器状态码
///
/// `0` 表示成功，任何其他值（包括负数）表示控制器上报的失败。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Status(pub i64);

impl Status {
    pub const SUCCESS: Status = Status(0);

    pub fn is_success(self) -> bool {
        self.0 == 0
    }

    pub fn code(self) -> i64 {
        self.0
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 已切分的应答
///
/// 仅由 [`decode`](crate::decode) 产生，保留原始行用于错误报告。
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RawResponse {
    line: String,
    status: Status,
    fields: Vec<String>,
}

impl RawResponse {
    pub(crate) fn new(line: String, status: Status, fields: Vec<String>) -> Self {
        Self {
            line,
            status,
            fields,
        }
    }

    pub fn status(&self) -> Status {
        self.status
    }

    /// 状态码之后的剩余 token
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn into_fields(self) -> Vec<String> {
        self.fields
    }

    /// 收到的原始行
    pub fn line(&self) -> &str {
        &self.line
    }
}

impl fmt::Display for RawResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.line)
    }
}
