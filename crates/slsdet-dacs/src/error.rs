//! DAC 层错误类型定义

use crate::config::ConfigError;
use slsdet_handle::{HandleError, ModuleIndex};
use thiserror::Error;

/// DAC 层错误类型
#[derive(Error, Debug)]
pub enum DacError {
    /// 名称未注册
    #[error("Dac not found: {0}")]
    UnknownDac(String),

    /// 重复注册同名 DAC（配置错误）
    #[error("Duplicate dac name: {0}")]
    DuplicateDac(String),

    /// 数组/序列长度或行列数不匹配
    #[error("Shape mismatch for {what}: expected {expected}, got {actual}")]
    ShapeMismatch {
        what: String,
        expected: usize,
        actual: usize,
    },

    /// 模块序号超出当前模块数
    #[error("Module {module} out of range (detector has {count} modules)")]
    ModuleOutOfRange { module: ModuleIndex, count: usize },

    /// 底层通信失败（不重试，直接上抛）
    #[error("Communication error: {0}")]
    Communication(#[from] HandleError),

    /// DAC 表配置错误
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

impl DacError {
    pub(crate) fn shape(what: impl Into<String>, expected: usize, actual: usize) -> Self {
        Self::ShapeMismatch {
            what: what.into(),
            expected,
            actual,
        }
    }
}
