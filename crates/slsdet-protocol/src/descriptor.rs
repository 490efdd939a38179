//! DAC 描述符
//!
//! 描述一个命名 DAC 的静态信息：名称、寄存器、上下限和默认值。

use crate::RegisterId;

/// DAC 描述符
///
/// 构造后不可变。`min_value`/`max_value` 只用于展示和检查提示，
/// 写入时不会被强制执行。
///
/// # 示例
///
/// ```rust
/// use slsdet_protocol::{DacDescriptor, RegisterId};
///
/// let vth1 = DacDescriptor::new("vth1", RegisterId::new(6), 0, 4095, 2800);
/// assert_eq!(vth1.name(), "vth1");
/// assert!(vth1.contains(4095));
/// assert!(!vth1.contains(4096));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DacDescriptor {
    name: String,

    register: RegisterId,

    #[cfg_attr(feature = "serde", serde(rename = "min"))]
    min_value: i32,

    #[cfg_attr(feature = "serde", serde(rename = "max"))]
    max_value: i32,

    #[cfg_attr(feature = "serde", serde(rename = "default"))]
    default_value: i32,
}

impl DacDescriptor {
    /// 创建描述符
    pub fn new(
        name: impl Into<String>,
        register: RegisterId,
        min_value: i32,
        max_value: i32,
        default_value: i32,
    ) -> Self {
        Self {
            name: name.into(),
            register,
            min_value,
            max_value,
            default_value,
        }
    }

    /// DAC 名称（集合内唯一）
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 寄存器标识
    pub fn register(&self) -> RegisterId {
        self.register
    }

    /// 下限（仅描述）
    pub fn min_value(&self) -> i32 {
        self.min_value
    }

    /// 上限（仅描述）
    pub fn max_value(&self) -> i32 {
        self.max_value
    }

    /// 默认值
    pub fn default_value(&self) -> i32 {
        self.default_value
    }

    /// 数值是否落在描述的范围内（闭区间）
    pub fn contains(&self, value: i32) -> bool {
        value >= self.min_value && value <= self.max_value
    }
}
