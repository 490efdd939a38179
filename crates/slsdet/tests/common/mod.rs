//! 测试辅助
//!
//! 构造带默认值的模拟探测器和 DAC 集合。

#![allow(dead_code)]

use slsdet::prelude::*;
use std::sync::Arc;

/// 两个阈值 DAC：vth1 默认 1200，vth2 默认 1000
pub fn threshold_descriptors() -> Vec<DacDescriptor> {
    vec![
        DacDescriptor::new("vth1", RegisterId::new(0), 0, 4000, 1200),
        DacDescriptor::new("vth2", RegisterId::new(1), 0, 4000, 1000),
    ]
}

/// 以描述符默认值初始化的模拟探测器及其 DAC 集合
pub fn setup(
    descriptors: Vec<DacDescriptor>,
    modules: usize,
) -> (Arc<MockDetector>, DetectorDacs<MockDetector>) {
    let det = Arc::new(MockDetector::with_defaults(modules, &descriptors));
    let dacs = DetectorDacs::new(descriptors, Arc::clone(&det)).unwrap();
    (det, dacs)
}

/// Mythen3 全部 DAC
pub fn mythen3(modules: usize) -> (Arc<MockDetector>, DetectorDacs<MockDetector>) {
    setup(mythen3_dacs(), modules)
}

/// 矩阵按行展开
pub fn rows(m: &DacMatrix) -> Vec<Vec<i32>> {
    (0..m.nrows())
        .map(|i| m.row(i).iter().copied().collect())
        .collect()
}
