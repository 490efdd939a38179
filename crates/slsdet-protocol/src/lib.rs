//! # slsdet Protocol
//!
//! 探测器 DAC 数据模型定义（无硬件依赖）
//!
//! ## 模块
//!
//! - `descriptor`: DAC 描述符（名称、寄存器、上下限、默认值）
//! - `convert`: DAC 数值与毫伏之间的换算
//! - `mythen3`: Mythen3 探测器的 DAC 表
//!
//! ## 寄存器标识
//!
//! 寄存器编号对本层是不透明的，只由 Detector Handle 解释。
//! 本层只负责携带它，不做任何编码。

pub mod convert;
pub mod descriptor;
pub mod mythen3;

// 重新导出常用类型
pub use convert::*;
pub use descriptor::*;
pub use mythen3::*;

use std::fmt;
use thiserror::Error;

/// DAC 寄存器标识
///
/// 对应探测器固件中的 DAC 索引。不同探测器类型的编号各不相同，
/// 本层不对其做任何假设。
///
/// ```rust
/// use slsdet_protocol::RegisterId;
///
/// let reg = RegisterId::new(6);
/// assert_eq!(reg.raw(), 6);
/// assert_eq!(reg.to_string(), "reg#6");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct RegisterId(pub u16);

impl RegisterId {
    /// 创建寄存器标识
    pub const fn new(raw: u16) -> Self {
        Self(raw)
    }

    /// 原始编号
    pub const fn raw(self) -> u16 {
        self.0
    }
}

impl From<u16> for RegisterId {
    fn from(raw: u16) -> Self {
        Self(raw)
    }
}

impl fmt::Display for RegisterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "reg#{}", self.0)
    }
}

/// DAC 数值单位
///
/// - **Raw**: DAC 原始步数（默认）
/// - **Millivolt**: 毫伏
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DacUnit {
    /// DAC 原始步数
    #[default]
    Raw,
    /// 毫伏
    Millivolt,
}

impl DacUnit {
    /// 是否为毫伏
    pub fn is_millivolt(self) -> bool {
        self == Self::Millivolt
    }
}

/// 协议层错误类型
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    #[error("Value {value} outside bounds ({min} to {max})")]
    ValueOutOfRange { value: i32, min: i32, max: i32 },

    #[error("Unknown DAC register: {0}")]
    UnknownRegister(u16),

    #[error("Invalid converter range: {0}")]
    InvalidConverter(String),
}
