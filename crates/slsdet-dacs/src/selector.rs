//! 模块选择与写入数据

use crate::error::DacError;
use slsdet_handle::ModuleIndex;
use smallvec::SmallVec;

/// 解析后的模块列表（内联 8 个模块）
pub type ModuleList = SmallVec<[ModuleIndex; 8]>;

/// 模块选择器
///
/// - **All**: 所有模块（默认）
/// - **Modules**: 指定的模块序号
///
/// 解析时会排序并去重，因此读回的值总是按模块序号排列。
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ModuleSelector {
    #[default]
    All,
    Modules(Vec<ModuleIndex>),
}

impl ModuleSelector {
    /// 单个模块
    pub fn module(module: ModuleIndex) -> Self {
        Self::Modules(vec![module])
    }

    /// 按当前模块数解析为模块列表
    pub fn resolve(&self, module_count: usize) -> Result<ModuleList, DacError> {
        match self {
            Self::All => Ok((0..module_count).collect()),
            Self::Modules(modules) => {
                let mut list: ModuleList = modules.iter().copied().collect();
                list.sort_unstable();
                list.dedup();
                if let Some(&module) = list.iter().find(|&&m| m >= module_count) {
                    return Err(DacError::ModuleOutOfRange {
                        module,
                        count: module_count,
                    });
                }
                Ok(list)
            },
        }
    }
}

impl From<ModuleIndex> for ModuleSelector {
    fn from(module: ModuleIndex) -> Self {
        Self::module(module)
    }
}

impl From<Vec<ModuleIndex>> for ModuleSelector {
    fn from(modules: Vec<ModuleIndex>) -> Self {
        Self::Modules(modules)
    }
}

impl From<&[ModuleIndex]> for ModuleSelector {
    fn from(modules: &[ModuleIndex]) -> Self {
        Self::Modules(modules.to_vec())
    }
}

/// 写入数据
///
/// 标量会广播到所有选中模块；序列的长度必须等于选中的模块数。
///
/// ```rust
/// use slsdet_dacs::DacValues;
///
/// assert_eq!(DacValues::from(1200), DacValues::Scalar(1200));
/// assert_eq!(DacValues::from([1, 2, 3]), DacValues::PerModule(vec![1, 2, 3]));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DacValues {
    Scalar(i32),
    PerModule(Vec<i32>),
}

impl DacValues {
    /// 写入数据中出现的全部数值（标量只有一个）
    pub fn as_slice(&self) -> &[i32] {
        match self {
            Self::Scalar(value) => std::slice::from_ref(value),
            Self::PerModule(values) => values.as_slice(),
        }
    }
}

impl From<i32> for DacValues {
    fn from(value: i32) -> Self {
        Self::Scalar(value)
    }
}

impl From<Vec<i32>> for DacValues {
    fn from(values: Vec<i32>) -> Self {
        Self::PerModule(values)
    }
}

impl From<&[i32]> for DacValues {
    fn from(values: &[i32]) -> Self {
        Self::PerModule(values.to_vec())
    }
}

impl From<&Vec<i32>> for DacValues {
    fn from(values: &Vec<i32>) -> Self {
        Self::PerModule(values.clone())
    }
}

impl<const N: usize> From<[i32; N]> for DacValues {
    fn from(values: [i32; N]) -> Self {
        Self::PerModule(values.to_vec())
    }
}
