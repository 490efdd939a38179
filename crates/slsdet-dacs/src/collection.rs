//! DAC 集合
//!
//! 一个探测器会话的全部命名 DAC。注册顺序即迭代、矩阵行和展示顺序，
//! 构造后不再改变。
//!
//! # 批量操作
//!
//! `from_matrix`、`from_rows` 和 `reset_all_to_default` 都不是原子的：
//! 中途失败时，之前的 DAC 已经写入，之后的保持原值，不做回滚。
//! 调用方需要自行核对状态。

use crate::config::DacTableConfig;
use crate::dac::Dac;
use crate::error::DacError;
use crate::selector::DacValues;
use nalgebra::DMatrix;
use slsdet_handle::DetectorHandle;
use slsdet_protocol::{DacDescriptor, mythen3_dacs};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// 展示时的标题行
pub const DACS_HEADER: &str = "========== DACS =========";

/// 多模块探测器的命名 DAC 集合
///
/// # 示例
///
/// ```rust
/// use slsdet_dacs::DetectorDacs;
/// use slsdet_handle::MockDetector;
/// use slsdet_protocol::{DacDescriptor, RegisterId};
/// use std::sync::Arc;
///
/// let descriptors = vec![
///     DacDescriptor::new("vth1", RegisterId::new(0), 0, 4000, 1200),
///     DacDescriptor::new("vth2", RegisterId::new(1), 0, 4000, 1000),
/// ];
/// let det = Arc::new(MockDetector::with_defaults(3, &descriptors));
/// let dacs = DetectorDacs::new(descriptors, det).unwrap();
///
/// dacs.set("vth1", 1500).unwrap();
/// let m = dacs.to_matrix().unwrap();
/// assert_eq!(m.row(0).iter().copied().collect::<Vec<_>>(), vec![1500, 1500, 1500]);
/// assert_eq!(m.row(1).iter().copied().collect::<Vec<_>>(), vec![1000, 1000, 1000]);
/// ```
pub struct DetectorDacs<H: ?Sized> {
    handle: Arc<H>,
    dacs: Vec<Dac<H>>,
    index: HashMap<String, usize>,
}

impl<H: DetectorHandle + ?Sized> DetectorDacs<H> {
    /// 按描述符顺序构造，每个描述符一个 DAC
    ///
    /// 同名描述符返回 [`DacError::DuplicateDac`]。
    pub fn new(
        descriptors: impl IntoIterator<Item = DacDescriptor>,
        handle: Arc<H>,
    ) -> Result<Self, DacError> {
        let mut dacs = Vec::new();
        let mut index = HashMap::new();

        for descriptor in descriptors {
            if index.contains_key(descriptor.name()) {
                return Err(DacError::DuplicateDac(descriptor.name().to_string()));
            }
            index.insert(descriptor.name().to_string(), dacs.len());
            dacs.push(Dac::new(descriptor, Arc::clone(&handle)));
        }

        debug!(dacs = dacs.len(), "dac collection created");
        Ok(Self {
            handle,
            dacs,
            index,
        })
    }

    /// Mythen3 的 16 个 DAC
    pub fn mythen3(handle: Arc<H>) -> Result<Self, DacError> {
        Self::new(mythen3_dacs(), handle)
    }

    /// 从 DAC 表配置构造
    pub fn from_config(config: &DacTableConfig, handle: Arc<H>) -> Result<Self, DacError> {
        config.validate()?;
        Self::new(config.dacs.iter().cloned(), handle)
    }

    /// 探测器会话
    pub fn handle(&self) -> &Arc<H> {
        &self.handle
    }

    /// 当前模块数
    pub fn module_count(&self) -> usize {
        self.handle.module_count()
    }

    /// DAC 数量
    pub fn len(&self) -> usize {
        self.dacs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dacs.is_empty()
    }

    /// 是否注册了该名称
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// 按名称查找
    pub fn get(&self, name: &str) -> Result<&Dac<H>, DacError> {
        self.index
            .get(name)
            .map(|&i| &self.dacs[i])
            .ok_or_else(|| DacError::UnknownDac(name.to_string()))
    }

    /// 按名称写入
    ///
    /// 未注册的名称是硬错误，不会被忽略。
    pub fn set(&self, name: &str, values: impl Into<DacValues>) -> Result<(), DacError> {
        self.get(name)?.set(values)
    }

    /// 按注册顺序迭代
    ///
    /// 每次调用都返回独立的迭代器，可以重复或嵌套迭代。
    pub fn iter(&self) -> std::slice::Iter<'_, Dac<H>> {
        self.dacs.iter()
    }

    /// 注册顺序的名称
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.dacs.iter().map(Dac::name)
    }

    /// 注册顺序的描述符
    pub fn descriptors(&self) -> impl Iterator<Item = &DacDescriptor> + '_ {
        self.dacs.iter().map(Dac::descriptor)
    }

    /// 读出为 `[DAC 数, 模块数]` 矩阵
    ///
    /// 每行独立读取，行与行之间没有快照隔离。
    pub fn to_matrix(&self) -> Result<DMatrix<i32>, DacError> {
        let rows = self.to_rows()?;
        let modules = rows.first().map_or_else(|| self.module_count(), Vec::len);
        let data: Vec<i32> = rows.into_iter().flatten().collect();
        Ok(DMatrix::from_row_slice(self.dacs.len(), modules, &data))
    }

    /// 读出为每个 DAC 一行
    pub fn to_rows(&self) -> Result<Vec<Vec<i32>>, DacError> {
        let modules = self.module_count();
        let mut rows = Vec::with_capacity(self.dacs.len());

        for (i, dac) in self.dacs.iter().enumerate() {
            let row = dac.get()?;
            if row.len() != modules {
                return Err(DacError::shape(
                    format!("row {i} ('{}')", dac.name()),
                    modules,
                    row.len(),
                ));
            }
            rows.push(row);
        }
        Ok(rows)
    }

    /// 从 `[DAC 数, 模块数]` 矩阵写入
    pub fn from_matrix(&self, matrix: &DMatrix<i32>) -> Result<(), DacError> {
        self.check_row_count(matrix.nrows())?;
        for (i, dac) in self.dacs.iter().enumerate() {
            let row: Vec<i32> = matrix.row(i).iter().copied().collect();
            self.write_row(i, dac, &row)?;
        }
        info!(dacs = self.dacs.len(), "dacs set from matrix");
        Ok(())
    }

    /// 从逐行数据写入（允许各行长度不同，错误在对应行报告）
    pub fn from_rows<R: AsRef<[i32]>>(&self, rows: &[R]) -> Result<(), DacError> {
        self.check_row_count(rows.len())?;
        for (i, (dac, row)) in self.dacs.iter().zip(rows).enumerate() {
            self.write_row(i, dac, row.as_ref())?;
        }
        info!(dacs = self.dacs.len(), "dacs set from rows");
        Ok(())
    }

    /// 所有 DAC 恢复默认值（注册顺序，非原子）
    pub fn reset_all_to_default(&self) -> Result<(), DacError> {
        for dac in &self.dacs {
            dac.reset_to_default().inspect_err(|e| {
                warn!(dac = dac.name(), error = %e, "reset to default aborted");
            })?;
        }
        info!(dacs = self.dacs.len(), "all dacs reset to default");
        Ok(())
    }

    /// 渲染为标题加每个 DAC 一行
    pub fn render(&self) -> Result<String, DacError> {
        let mut lines = vec![DACS_HEADER.to_string()];
        for dac in &self.dacs {
            lines.push(dac.render()?);
        }
        Ok(lines.join("\n"))
    }

    fn check_row_count(&self, rows: usize) -> Result<(), DacError> {
        if rows != self.dacs.len() {
            return Err(DacError::shape("matrix rows", self.dacs.len(), rows));
        }
        Ok(())
    }

    fn write_row(&self, i: usize, dac: &Dac<H>, row: &[i32]) -> Result<(), DacError> {
        let modules = self.module_count();
        if row.len() != modules {
            return Err(DacError::shape(
                format!("row {i} ('{}')", dac.name()),
                modules,
                row.len(),
            ));
        }
        dac.set(row)
    }
}

impl<'a, H: DetectorHandle + ?Sized> IntoIterator for &'a DetectorDacs<H> {
    type Item = &'a Dac<H>;
    type IntoIter = std::slice::Iter<'a, Dac<H>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<H: ?Sized> fmt::Debug for DetectorDacs<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DetectorDacs")
            .field("dacs", &self.dacs)
            .finish_non_exhaustive()
    }
}
