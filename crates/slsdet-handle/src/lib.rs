//! # slsdet Detector Handle
//!
//! 探测器会话抽象层。DAC 层只通过 [`DetectorHandle`] 访问模块，
//! 传输方式（TCP 控制端口、共享内存等）由具体实现负责。
//!
//! # 调用约定
//!
//! - 所有调用都是同步阻塞的，直到模块通信完成或失败
//! - 超时与重试属于实现方的职责，本层不处理
//! - `modules` 参数是已校验、按模块序号升序排列的模块列表

use slsdet_protocol::{DacUnit, ProtocolError, RegisterId};
use std::sync::Arc;
use thiserror::Error;

// 重新导出协议层类型
pub use slsdet_protocol;

#[cfg(feature = "mock")]
pub mod mock;

#[cfg(feature = "mock")]
pub use mock::MockDetector;

/// 模块序号
pub type ModuleIndex = usize;

/// Detector Handle 统一错误类型
#[derive(Error, Debug)]
pub enum HandleError {
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Module {module} error: {message}")]
    Module { module: ModuleIndex, message: String },
    #[error("Operation timeout")]
    Timeout,
    #[error("Invalid response: expected {expected} values, got {actual}")]
    InvalidResponse { expected: usize, actual: usize },
    #[error("Detector disconnected")]
    Disconnected,
    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),
}

impl HandleError {
    /// 创建模块错误
    pub fn module(module: ModuleIndex, message: impl Into<String>) -> Self {
        Self::Module {
            module,
            message: message.into(),
        }
    }

    /// 出错的模块（如果可知）
    pub fn failed_module(&self) -> Option<ModuleIndex> {
        match self {
            Self::Module { module, .. } => Some(*module),
            _ => None,
        }
    }
}

/// 探测器会话能力
///
/// 对应多模块探测器会话提供的 DAC 原语。
///
/// # 实现要求
///
/// - `get_dac` 必须按 `modules` 的顺序为每个模块返回一个值
/// - `set_dac` 把同一个值写入 `modules` 中的每个模块
/// - `module_count` 每次调用都反映当前模块数（可能在两次调用之间变化）
pub trait DetectorHandle: Send + Sync {
    /// 读取一个 DAC 在指定模块上的值
    fn get_dac(
        &self,
        register: RegisterId,
        unit: DacUnit,
        modules: &[ModuleIndex],
    ) -> Result<Vec<i32>, HandleError>;

    /// 向指定模块写入同一个 DAC 值
    fn set_dac(
        &self,
        register: RegisterId,
        value: i32,
        unit: DacUnit,
        modules: &[ModuleIndex],
    ) -> Result<(), HandleError>;

    /// 当前模块数
    fn module_count(&self) -> usize;
}

impl<H: DetectorHandle + ?Sized> DetectorHandle for Arc<H> {
    fn get_dac(
        &self,
        register: RegisterId,
        unit: DacUnit,
        modules: &[ModuleIndex],
    ) -> Result<Vec<i32>, HandleError> {
        (**self).get_dac(register, unit, modules)
    }

    fn set_dac(
        &self,
        register: RegisterId,
        value: i32,
        unit: DacUnit,
        modules: &[ModuleIndex],
    ) -> Result<(), HandleError> {
        (**self).set_dac(register, value, unit, modules)
    }

    fn module_count(&self) -> usize {
        (**self).module_count()
    }
}

impl<H: DetectorHandle + ?Sized> DetectorHandle for Box<H> {
    fn get_dac(
        &self,
        register: RegisterId,
        unit: DacUnit,
        modules: &[ModuleIndex],
    ) -> Result<Vec<i32>, HandleError> {
        (**self).get_dac(register, unit, modules)
    }

    fn set_dac(
        &self,
        register: RegisterId,
        value: i32,
        unit: DacUnit,
        modules: &[ModuleIndex],
    ) -> Result<(), HandleError> {
        (**self).set_dac(register, value, unit, modules)
    }

    fn module_count(&self) -> usize {
        (**self).module_count()
    }
}
