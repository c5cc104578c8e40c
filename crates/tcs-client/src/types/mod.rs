//! 基础类型系统
//!
//! 提供索引 newtype 与抓取参数。

pub mod grip;
pub mod index;

pub use grip::*;
pub use index::*;
