//! 通用模块属性访问器
//!
//! 把一个命名属性映射到一对读写能力和一个模块数来源上，
//! DAC 和其他按模块设置的参数共用同一套读写逻辑。
//!
//! # 读写约定
//!
//! - 读：每个选中模块返回一个值，按模块序号排列；任何模块失败则整次调用失败
//! - 写标量：一次批量调用写入所有选中模块
//! - 写序列：长度必须等于选中模块数，逐模块调用

use crate::error::DacError;
use crate::selector::{DacValues, ModuleSelector};
use slsdet_handle::{HandleError, ModuleIndex};
use std::fmt;
use tracing::debug;

/// 名称列宽
pub const NAME_WIDTH: usize = 15;

/// 数值列宽
pub const VALUE_WIDTH: usize = 5;

/// 属性读写能力
pub trait PropertyBackend {
    /// 读取指定模块的值（按 `modules` 顺序）
    fn read(&self, modules: &[ModuleIndex]) -> Result<Vec<i32>, HandleError>;

    /// 向指定模块写入同一个值
    fn write(&self, value: i32, modules: &[ModuleIndex]) -> Result<(), HandleError>;

    /// 当前模块数
    fn module_count(&self) -> usize;
}

/// 由闭包组成的属性后端
///
/// 用于 DAC 之外的按模块设置参数。
pub struct FnBackend<G, S, C> {
    getter: G,
    setter: S,
    counter: C,
}

impl<G, S, C> FnBackend<G, S, C> {
    pub fn new(getter: G, setter: S, counter: C) -> Self
    where
        G: Fn(&[ModuleIndex]) -> Result<Vec<i32>, HandleError>,
        S: Fn(i32, &[ModuleIndex]) -> Result<(), HandleError>,
        C: Fn() -> usize,
    {
        Self {
            getter,
            setter,
            counter,
        }
    }
}

impl<G, S, C> PropertyBackend for FnBackend<G, S, C>
where
    G: Fn(&[ModuleIndex]) -> Result<Vec<i32>, HandleError>,
    S: Fn(i32, &[ModuleIndex]) -> Result<(), HandleError>,
    C: Fn() -> usize,
{
    fn read(&self, modules: &[ModuleIndex]) -> Result<Vec<i32>, HandleError> {
        (self.getter)(modules)
    }

    fn write(&self, value: i32, modules: &[ModuleIndex]) -> Result<(), HandleError> {
        (self.setter)(value, modules)
    }

    fn module_count(&self) -> usize {
        (self.counter)()
    }
}

/// 按模块读写的命名属性
///
/// # 示例
///
/// ```rust
/// use slsdet_dacs::{DetectorProperty, ModuleSelector};
/// use std::cell::RefCell;
///
/// let store = RefCell::new(vec![0, 0]);
/// let prop = DetectorProperty::from_fns(
///     "counter",
///     |modules| Ok(modules.iter().map(|&m| store.borrow()[m]).collect()),
///     |value, modules| {
///         for &m in modules {
///             store.borrow_mut()[m] = value;
///         }
///         Ok(())
///     },
///     || 2,
/// );
///
/// prop.write(&ModuleSelector::All, 7).unwrap();
/// assert_eq!(prop.read(&ModuleSelector::All).unwrap(), vec![7, 7]);
/// assert_eq!(prop.render(&ModuleSelector::All).unwrap(), "counter        :    7    7");
/// ```
pub struct DetectorProperty<B> {
    name: String,
    backend: B,
}

impl<G, S, C> DetectorProperty<FnBackend<G, S, C>> {
    /// 由读、写、模块数三个闭包构造
    pub fn from_fns(name: impl Into<String>, getter: G, setter: S, counter: C) -> Self
    where
        G: Fn(&[ModuleIndex]) -> Result<Vec<i32>, HandleError>,
        S: Fn(i32, &[ModuleIndex]) -> Result<(), HandleError>,
        C: Fn() -> usize,
    {
        Self::new(name, FnBackend::new(getter, setter, counter))
    }
}

impl<B: PropertyBackend> DetectorProperty<B> {
    pub fn new(name: impl Into<String>, backend: B) -> Self {
        Self {
            name: name.into(),
            backend,
        }
    }

    /// 属性名称
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 底层读写能力
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// 当前模块数（每次调用都重新询问后端）
    pub fn module_count(&self) -> usize {
        self.backend.module_count()
    }

    /// 读取选中模块的值
    pub fn read(&self, selector: &ModuleSelector) -> Result<Vec<i32>, DacError> {
        let modules = selector.resolve(self.module_count())?;
        if modules.is_empty() {
            return Ok(Vec::new());
        }

        let values = self.backend.read(&modules)?;
        if values.len() != modules.len() {
            return Err(HandleError::InvalidResponse {
                expected: modules.len(),
                actual: values.len(),
            }
            .into());
        }

        debug!(property = %self.name, ?modules, ?values, "read");
        Ok(values)
    }

    /// 写入选中模块
    pub fn write(
        &self,
        selector: &ModuleSelector,
        values: impl Into<DacValues>,
    ) -> Result<(), DacError> {
        let modules = selector.resolve(self.module_count())?;
        match values.into() {
            DacValues::Scalar(value) => {
                if !modules.is_empty() {
                    self.backend.write(value, &modules)?;
                }
                debug!(property = %self.name, ?modules, value, "write (broadcast)");
            },
            DacValues::PerModule(values) => {
                if values.len() != modules.len() {
                    return Err(DacError::shape(
                        format!("values of '{}'", self.name),
                        modules.len(),
                        values.len(),
                    ));
                }
                for (&module, &value) in modules.iter().zip(&values) {
                    self.backend.write(value, &[module])?;
                }
                debug!(property = %self.name, ?modules, ?values, "write (per module)");
            },
        }
        Ok(())
    }

    /// 渲染为定宽行
    pub fn render(&self, selector: &ModuleSelector) -> Result<String, DacError> {
        Ok(format_row(&self.name, &self.read(selector)?))
    }
}

impl<B> fmt::Debug for DetectorProperty<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DetectorProperty")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// 格式化一行：名称左对齐 15 列，每个值右对齐 5 列
pub fn format_row(name: &str, values: &[i32]) -> String {
    let mut row = format!("{name:<NAME_WIDTH$}:");
    for value in values {
        row.push_str(&format!("{value:>VALUE_WIDTH$}"));
    }
    row
}
