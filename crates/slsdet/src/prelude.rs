//! Prelude 模块
//!
//! 常用类型的一次性导入：
//!
//! ```rust
//! use slsdet::prelude::*;
//! ```

pub use crate::DacMatrix;
pub use crate::dacs::{
    Dac, DacError, DacTableConfig, DacValues, DetectorDacs, DetectorProperty, ModuleSelector,
};
pub use crate::handle::{DetectorHandle, HandleError};
pub use crate::protocol::{DacDescriptor, DacUnit, RegisterId, mythen3_dacs};

#[cfg(feature = "mock")]
pub use crate::handle::MockDetector;
