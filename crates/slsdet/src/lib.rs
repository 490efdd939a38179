//! slsdet - SLS 多模块探测器 DAC 控制
//!
//! # 架构设计
//!
//! 本 SDK 采用分层架构，从底层到高层：
//!
//! - **协议层** (`protocol`): 寄存器标识、DAC 描述符、毫伏换算、Mythen3 DAC 表
//! - **会话层** (`handle`): Detector Handle 抽象与内存模拟探测器
//! - **DAC 层** (`dacs`): 属性访问器、命名 DAC、DAC 集合、DAC 表配置
//!
//! # 快速开始
//!
//! ```rust
//! use slsdet::prelude::*;
//! use std::sync::Arc;
//!
//! let det = Arc::new(MockDetector::with_defaults(2, &mythen3_dacs()));
//! let dacs = DetectorDacs::mythen3(det)?;
//!
//! dacs.set("vth1", 1500)?;
//! assert_eq!(dacs.get("vth1")?.get()?, vec![1500, 1500]);
//!
//! let m = dacs.to_matrix()?;
//! assert_eq!(m.shape(), (16, 2));
//! # Ok::<(), DacError>(())
//! ```

pub use slsdet_dacs as dacs;
pub use slsdet_handle as handle;
pub use slsdet_protocol as protocol;

pub mod logging;
pub mod prelude;

// --- 常用类型 ---

pub use dacs::{
    ConfigError, Dac, DacError, DacTableConfig, DacValues, DetectorDacs, DetectorProperty,
    ModuleSelector,
};
pub use handle::{DetectorHandle, HandleError, ModuleIndex};
pub use logging::{LoggerError, init_logger};
pub use protocol::{DacConverter, DacDescriptor, DacUnit, Mythen3Dac, ProtocolError, RegisterId};

#[cfg(feature = "mock")]
pub use handle::MockDetector;

/// DAC 矩阵类型：`[DAC 数, 模块数]`
pub type DacMatrix = nalgebra::DMatrix<i32>;
