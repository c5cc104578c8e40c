//! # TCS Protocol
//!
//! TCS 控制器文本协议定义（无硬件依赖）
//!
//! ## 模块
//!
//! - `names`: 命令名称常量
//! - `command`: 命令构建（[`Command`] 以及各条指令的构造函数）
//! - `response`: 应答解析（[`RawResponse`]、[`Status`]）
//! - `position`: 坐标类型（[`Position`]、[`CoordinateSystem`]）
//!
//! ## 线路格式
//!
//! ```text
//! 请求:  <name> <arg1> <arg2> ...\n
//! 应答:  <status> <field1> <field2> ...\n
//! ```
//!
//! 单个空格分隔，不做转义；`status == 0` 表示成功，其余值（包括负数）
//! 均为控制器上报的失败。
//!
//! ```rust
//! use tcs_protocol::{Command, decode, encode};
//!
//! let cmd = Command::new("Move").arg(3).arg(1);
//! assert_eq!(encode(&cmd), "Move 3 1");
//!
//! let reply = decode("0 12 7").unwrap();
//! assert!(reply.status().is_success());
//! assert_eq!(reply.fields(), ["12", "7"]);
//! ```

pub mod command;
pub mod names;
pub mod position;
pub mod response;

pub use command::Command;
pub use position::{CARTESIAN_AXES, CoordinateSystem, Position};
pub use response::{RawResponse, Status};

use thiserror::Error;

/// 协议解析错误类型
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    #[error("Empty response line")]
    EmptyResponse,

    #[error("Invalid status token: {token:?}")]
    InvalidStatus { token: String },

    #[error("Invalid coordinate #{index}: {token:?}")]
    InvalidCoordinate { index: usize, token: String },

    #[error("Location reply carried no coordinates")]
    EmptyPosition,

    #[error("Expected {expected} coordinates, found {found}")]
    CoordinateCount { expected: usize, found: usize },
}

/// 将命令编码为一行文本（不含换行符）
///
/// 名称与各参数之间以单个空格连接。参数本身不得包含空白或换行，
/// 这是调用方的责任。
pub fn encode(command: &Command) -> String {
    let mut line = String::with_capacity(command.name().len() + command.arguments().len() * 4);
    line.push_str(command.name());
    for arg in command.arguments() {
        line.push(' ');
        line.push_str(arg);
    }
    line
}

/// 将一行应答解码为 [`RawResponse`]
///
/// 按空白切分；空行或首个 token 不是整数时返回错误。
/// 任何整数都是合法状态码，超出 `i64` 范围的按符号饱和（仍为非零）。
pub fn decode(line: &str) -> Result<RawResponse, ProtocolError> {
    let mut tokens = line.split_whitespace();
    let first = tokens.next().ok_or(ProtocolError::EmptyResponse)?;
    let status = parse_status(first).ok_or_else(|| ProtocolError::InvalidStatus {
        token: first.to_string(),
    })?;

    Ok(RawResponse::new(
        line.to_string(),
        Status(status),
        tokens.map(str::to_string).collect(),
    ))
}

fn parse_status(token: &str) -> Option<i64> {
    if let Ok(status) = token.parse::<i64>() {
        return Some(status);
    }

    let (negative, digits) = match token.as_bytes().first() {
        Some(b'-') => (true, &token[1..]),
        Some(b'+') => (false, &token[1..]),
        _ => (false, token),
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(if negative { i64::MIN } else { i64::MAX })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_joins_with_single_spaces() {
        let cmd = Command::new("locAngles").arg(1).arg(4).arg(8).arg(4);
        assert_eq!(encode(&cmd), "locAngles 1 4 8 4");
    }

    #[test]
    fn test_encode_without_arguments() {
        assert_eq!(encode(&Command::new("wherec")), "wherec");
    }

    #[test]
    fn test_encode_flag_renders_zero_one() {
        let cmd = Command::new("PickPlate").arg(2).flag(true).arg(30);
        assert_eq!(encode(&cmd), "PickPlate 2 1 30");
        let cmd = Command::new("PickPlate").arg(2).flag(false).arg(0);
        assert_eq!(encode(&cmd), "PickPlate 2 0 0");
    }

    #[test]
    fn test_decode_success_with_fields() {
        let reply = decode("0 0 0 0 1 4 3").unwrap();
        assert_eq!(reply.status(), Status(0));
        assert_eq!(reply.fields(), ["0", "0", "0", "1", "4", "3"]);
    }

    #[test]
    fn test_decode_negative_status() {
        let reply = decode("-1").unwrap();
        assert_eq!(reply.status(), Status(-1));
        assert!(!reply.status().is_success());
        assert!(reply.fields().is_empty());
    }

    #[test]
    fn test_decode_tolerates_extra_whitespace() {
        let reply = decode("  0   5\t6 \r").unwrap();
        assert!(reply.status().is_success());
        assert_eq!(reply.fields(), ["5", "6"]);
    }

    #[test]
    fn test_decode_empty_line() {
        assert_eq!(decode(""), Err(ProtocolError::EmptyResponse));
        assert_eq!(decode("   "), Err(ProtocolError::EmptyResponse));
    }

    #[test]
    fn test_decode_non_numeric_status() {
        assert_eq!(
            decode("abc 1 2"),
            Err(ProtocolError::InvalidStatus {
                token: "abc".to_string()
            })
        );
    }

    #[test]
    fn test_decode_status_beyond_i32() {
        let reply = decode("-2147483649").unwrap();
        assert_eq!(reply.status(), Status(-2_147_483_649));
        assert!(!reply.status().is_success());
    }

    #[test]
    fn test_decode_status_beyond_i64_saturates() {
        let reply = decode("-99999999999999999999999 x").unwrap();
        assert_eq!(reply.status(), Status(i64::MIN));
        assert_eq!(reply.fields(), ["x"]);
        assert_eq!(decode("123456789012345678901234").unwrap().status(), Status(i64::MAX));
        assert!(decode("-").is_err());
        assert!(decode("12a").is_err());
    }

    #[test]
    fn test_decode_keeps_raw_line() {
        let reply = decode("-1 bad station").unwrap();
        assert_eq!(reply.line(), "-1 bad station");
    }
}
