//! 单个命名 DAC
//!
//! 一个 [`Dac`] 代表多模块探测器上所有同名 DAC：读写都按模块展开。

use crate::error::DacError;
use crate::property::{DetectorProperty, PropertyBackend};
use crate::selector::{DacValues, ModuleSelector};
use slsdet_handle::{DetectorHandle, HandleError, ModuleIndex};
use slsdet_protocol::{DacDescriptor, DacUnit, RegisterId};
use std::fmt;
use std::sync::Arc;
use tracing::warn;

/// 绑定到某个寄存器的 Detector Handle 读写能力
pub struct DacBackend<H: ?Sized> {
    handle: Arc<H>,
    register: RegisterId,
    unit: DacUnit,
}

impl<H: DetectorHandle + ?Sized> DacBackend<H> {
    pub fn new(handle: Arc<H>, register: RegisterId, unit: DacUnit) -> Self {
        Self {
            handle,
            register,
            unit,
        }
    }

    /// 寄存器标识
    pub fn register(&self) -> RegisterId {
        self.register
    }

    /// 读写单位
    pub fn unit(&self) -> DacUnit {
        self.unit
    }
}

impl<H: DetectorHandle + ?Sized> PropertyBackend for DacBackend<H> {
    fn read(&self, modules: &[ModuleIndex]) -> Result<Vec<i32>, HandleError> {
        self.handle.get_dac(self.register, self.unit, modules)
    }

    fn write(&self, value: i32, modules: &[ModuleIndex]) -> Result<(), HandleError> {
        self.handle.set_dac(self.register, value, self.unit, modules)
    }

    fn module_count(&self) -> usize {
        self.handle.module_count()
    }
}

impl<H: ?Sized> fmt::Debug for DacBackend<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DacBackend")
            .field("register", &self.register)
            .field("unit", &self.unit)
            .finish_non_exhaustive()
    }
}

/// 命名 DAC
///
/// 上下限只用于展示：写入超出范围的值会记录警告，但仍然照常写入。
///
/// # 示例
///
/// ```rust
/// use slsdet_dacs::Dac;
/// use slsdet_handle::MockDetector;
/// use slsdet_protocol::{DacDescriptor, RegisterId};
/// use std::sync::Arc;
///
/// let det = Arc::new(MockDetector::new(2));
/// let vth1 = Dac::new(DacDescriptor::new("vth1", RegisterId::new(6), 0, 4095, 2800), det);
///
/// vth1.set(1500).unwrap();
/// assert_eq!(vth1.get().unwrap(), vec![1500, 1500]);
///
/// vth1.reset_to_default().unwrap();
/// assert_eq!(vth1.get().unwrap(), vec![2800, 2800]);
/// ```
pub struct Dac<H: ?Sized> {
    descriptor: DacDescriptor,
    raw: DetectorProperty<DacBackend<H>>,
    millivolt: DetectorProperty<DacBackend<H>>,
}

impl<H: DetectorHandle + ?Sized> Dac<H> {
    /// 绑定描述符和探测器会话
    pub fn new(descriptor: DacDescriptor, handle: Arc<H>) -> Self {
        let register = descriptor.register();
        let raw = DetectorProperty::new(
            descriptor.name(),
            DacBackend::new(Arc::clone(&handle), register, DacUnit::Raw),
        );
        let millivolt = DetectorProperty::new(
            descriptor.name(),
            DacBackend::new(handle, register, DacUnit::Millivolt),
        );
        Self {
            descriptor,
            raw,
            millivolt,
        }
    }

    /// 描述符
    pub fn descriptor(&self) -> &DacDescriptor {
        &self.descriptor
    }

    /// 名称
    pub fn name(&self) -> &str {
        self.descriptor.name()
    }

    /// 寄存器标识
    pub fn register(&self) -> RegisterId {
        self.descriptor.register()
    }

    pub fn min_value(&self) -> i32 {
        self.descriptor.min_value()
    }

    pub fn max_value(&self) -> i32 {
        self.descriptor.max_value()
    }

    pub fn default_value(&self) -> i32 {
        self.descriptor.default_value()
    }

    /// 底层属性访问器（DAC 单位）
    pub fn property(&self) -> &DetectorProperty<DacBackend<H>> {
        &self.raw
    }

    /// 当前模块数
    pub fn module_count(&self) -> usize {
        self.raw.module_count()
    }

    /// 读取所有模块
    pub fn get(&self) -> Result<Vec<i32>, DacError> {
        self.raw.read(&ModuleSelector::All)
    }

    /// 读取选中模块
    pub fn get_modules(&self, selector: &ModuleSelector) -> Result<Vec<i32>, DacError> {
        self.raw.read(selector)
    }

    /// 写入所有模块（标量广播或每模块一个值）
    pub fn set(&self, values: impl Into<DacValues>) -> Result<(), DacError> {
        self.set_modules(&ModuleSelector::All, values)
    }

    /// 写入选中模块
    pub fn set_modules(
        &self,
        selector: &ModuleSelector,
        values: impl Into<DacValues>,
    ) -> Result<(), DacError> {
        let values = values.into();
        self.warn_out_of_range(&values);
        self.raw.write(selector, values)
    }

    /// 所有模块恢复默认值
    pub fn reset_to_default(&self) -> Result<(), DacError> {
        self.raw.write(&ModuleSelector::All, self.default_value())
    }

    /// 以毫伏读取所有模块
    pub fn get_mv(&self) -> Result<Vec<i32>, DacError> {
        self.millivolt.read(&ModuleSelector::All)
    }

    /// 以毫伏写入所有模块
    ///
    /// 毫伏到 DAC 数值的换算由探测器会话完成，上下限检查不适用。
    pub fn set_mv(&self, values: impl Into<DacValues>) -> Result<(), DacError> {
        self.millivolt.write(&ModuleSelector::All, values)
    }

    /// 渲染为定宽行（读取所有模块）
    pub fn render(&self) -> Result<String, DacError> {
        self.raw.render(&ModuleSelector::All)
    }

    /// 超出描述范围的写入值
    fn out_of_range(&self, values: &DacValues) -> Vec<i32> {
        values
            .as_slice()
            .iter()
            .copied()
            .filter(|&v| !self.descriptor.contains(v))
            .collect()
    }

    fn warn_out_of_range(&self, values: &DacValues) {
        let outside = self.out_of_range(values);
        if !outside.is_empty() {
            warn!(
                dac = self.name(),
                ?outside,
                min = self.min_value(),
                max = self.max_value(),
                "writing dac value outside descriptive range"
            );
        }
    }
}

impl<H: ?Sized> fmt::Debug for Dac<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dac")
            .field("descriptor", &self.descriptor)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slsdet_handle::MockDetector;

    fn vth1(modules: usize) -> (Arc<MockDetector>, Dac<MockDetector>) {
        let det = Arc::new(MockDetector::new(modules));
        let dac = Dac::new(
            DacDescriptor::new("vth1", RegisterId::new(6), 0, 4000, 1200),
            Arc::clone(&det),
        );
        (det, dac)
    }

    #[test]
    fn test_no_clamping() {
        let (_det, dac) = vth1(2);
        dac.set(9000).unwrap();
        assert_eq!(dac.get().unwrap(), vec![9000, 9000]);
        dac.set(-5).unwrap();
        assert_eq!(dac.get().unwrap(), vec![-5, -5]);
    }

    #[test]
    fn test_scalar_equals_broadcast_sequence() {
        let (det, dac) = vth1(3);
        dac.set(1500).unwrap();
        let scalar = det.values(RegisterId::new(6));
        dac.set(vec![0, 0, 0]).unwrap();
        dac.set(vec![1500; 3]).unwrap();
        assert_eq!(det.values(RegisterId::new(6)), scalar);
    }

    #[test]
    fn test_reset_to_default_is_one_batched_write() {
        let (det, dac) = vth1(4);
        dac.set([1, 2, 3, 4]).unwrap();
        det.reset_counters();
        dac.reset_to_default().unwrap();
        assert_eq!(det.write_calls(), 1);
        assert_eq!(dac.get().unwrap(), vec![1200; 4]);
    }

    #[test]
    fn test_set_modules_subset() {
        let (_det, dac) = vth1(3);
        dac.set(100).unwrap();
        dac.set_modules(&ModuleSelector::module(1), 200).unwrap();
        assert_eq!(dac.get().unwrap(), vec![100, 200, 100]);
        assert_eq!(
            dac.get_modules(&ModuleSelector::from(vec![1, 2])).unwrap(),
            vec![200, 100]
        );
    }

    #[test]
    fn test_millivolt_roundtrip() {
        let (det, dac) = vth1(2);
        dac.set_mv(1024).unwrap();
        assert_eq!(det.values(RegisterId::new(6)), vec![2048, 2048]);
        assert_eq!(dac.get_mv().unwrap(), vec![1024, 1024]);
    }

    #[test]
    fn test_communication_failure() {
        let (det, dac) = vth1(3);
        det.fail_module(Some(1));
        assert!(matches!(dac.get(), Err(DacError::Communication(_))));
        assert!(matches!(dac.set(1), Err(DacError::Communication(_))));
    }

    #[test]
    fn test_render() {
        let (_det, dac) = vth1(3);
        dac.set([1200, 35, 4000]).unwrap();
        assert_eq!(dac.render().unwrap(), "vth1           : 1200   35 4000");
    }

    #[test]
    fn test_out_of_range_values() {
        let (_det, dac) = vth1(3);
        assert!(dac.out_of_range(&DacValues::from(4000)).is_empty());
        assert_eq!(dac.out_of_range(&DacValues::from(4001)), vec![4001]);
        assert_eq!(
            dac.out_of_range(&DacValues::from([-1, 2000, 9000])),
            vec![-1, 9000]
        );
    }

    #[test]
    fn test_metadata() {
        let (_det, dac) = vth1(1);
        assert_eq!(dac.name(), "vth1");
        assert_eq!(dac.register(), RegisterId::new(6));
        assert_eq!(dac.min_value(), 0);
        assert_eq!(dac.max_value(), 4000);
        assert_eq!(dac.default_value(), 1200);
        assert_eq!(dac.module_count(), 1);
    }

    #[test]
    fn test_dyn_handle() {
        let det: Arc<dyn DetectorHandle> = Arc::new(MockDetector::new(2));
        let dac = Dac::new(DacDescriptor::new("vth2", RegisterId::new(1), 0, 4000, 1000), det);
        dac.reset_to_default().unwrap();
        assert_eq!(dac.get().unwrap(), vec![1000, 1000]);
    }
}
