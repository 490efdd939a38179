//! # slsdet DACs
//!
//! 多模块探测器的 DAC 管理层，包括：
//! - 通用的按模块属性访问器（[`DetectorProperty`]）
//! - 单个命名 DAC（[`Dac`]）：读写、恢复默认值、毫伏读写
//! - DAC 集合（[`DetectorDacs`]）：按名称访问、有序迭代、矩阵导入导出
//! - TOML 格式的 DAC 表（[`DacTableConfig`]）
//!
//! # 架构
//!
//! ```text
//! DetectorDacs (集合，注册顺序固定)
//!     ↓ 每个描述符一个
//! Dac (描述符 + 属性访问器)
//!     ↓ DacBackend 绑定寄存器
//! DetectorProperty (通用读写、形状检查)
//!     ↓
//! DetectorHandle (slsdet-handle，探测器会话)
//! ```
//!
//! 上下限只用于展示，写入时不做钳位。批量操作不是原子的。

pub mod collection;
pub mod config;
pub mod dac;
mod error;
pub mod property;
pub mod selector;

pub use collection::{DACS_HEADER, DetectorDacs};
pub use config::{ConfigError, DacTableConfig};
pub use dac::{Dac, DacBackend};
pub use error::DacError;
pub use property::{DetectorProperty, FnBackend, PropertyBackend, format_row};
pub use selector::{DacValues, ModuleList, ModuleSelector};
