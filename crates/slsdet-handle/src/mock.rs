//! Mock 探测器
//!
//! 内存中的多模块探测器，用于测试和演示，不需要任何硬件。
//!
//! # 功能
//!
//! - 每个寄存器、每个模块保存一个原始 DAC 值（未写过的寄存器读为默认值或 0）
//! - 由描述符构造时只接受已登记的寄存器，其余返回 [`ProtocolError::UnknownRegister`]
//! - 通过 [`DacConverter`] 支持毫伏读写
//! - 故障注入：指定模块失败、N 次写入后失败
//! - 运行时修改模块数（模拟模块增减）
//! - 调用计数，用于验证批量写入行为

use crate::{DetectorHandle, HandleError, ModuleIndex};
use parking_lot::Mutex;
use slsdet_protocol::{DacConverter, DacDescriptor, DacUnit, ProtocolError, RegisterId};
use std::collections::HashMap;
use tracing::trace;

#[derive(Debug, Default)]
struct MockState {
    module_count: usize,
    registers: HashMap<RegisterId, Vec<i32>>,
    defaults: HashMap<RegisterId, i32>,
    known_registers_only: bool,
    failing_module: Option<ModuleIndex>,
    writes_before_failure: Option<usize>,
    read_calls: usize,
    write_calls: usize,
}

impl MockState {
    fn check_register(&self, register: RegisterId) -> Result<(), HandleError> {
        if self.known_registers_only && !self.defaults.contains_key(&register) {
            return Err(ProtocolError::UnknownRegister(register.raw()).into());
        }
        Ok(())
    }

    fn check_modules(&self, modules: &[ModuleIndex]) -> Result<(), HandleError> {
        for &module in modules {
            if module >= self.module_count {
                return Err(HandleError::module(
                    module,
                    format!("no such module (detector has {})", self.module_count),
                ));
            }
            if self.failing_module == Some(module) {
                return Err(HandleError::module(module, "simulated communication failure"));
            }
        }
        Ok(())
    }

    fn register_mut(&mut self, register: RegisterId) -> &mut Vec<i32> {
        let count = self.module_count;
        let default = self.defaults.get(&register).copied().unwrap_or(0);
        let values = self
            .registers
            .entry(register)
            .or_insert_with(|| vec![default; count]);
        values.resize(count, default);
        values
    }

    fn raw_value(&self, register: RegisterId, module: ModuleIndex) -> i32 {
        self.registers
            .get(&register)
            .and_then(|values| values.get(module).copied())
            .or_else(|| self.defaults.get(&register).copied())
            .unwrap_or(0)
    }
}

/// 内存模拟探测器
///
/// # 示例
///
/// ```rust
/// use slsdet_handle::{DetectorHandle, MockDetector};
/// use slsdet_handle::slsdet_protocol::{DacUnit, RegisterId};
///
/// let det = MockDetector::new(3);
/// let reg = RegisterId::new(6);
/// det.set_dac(reg, 1500, DacUnit::Raw, &[0, 2]).unwrap();
/// assert_eq!(det.get_dac(reg, DacUnit::Raw, &[0, 1, 2]).unwrap(), vec![1500, 0, 1500]);
/// ```
#[derive(Debug)]
pub struct MockDetector {
    state: Mutex<MockState>,
    converter: DacConverter,
}

impl MockDetector {
    /// 创建指定模块数的模拟探测器
    pub fn new(module_count: usize) -> Self {
        Self {
            state: Mutex::new(MockState {
                module_count,
                ..MockState::default()
            }),
            converter: DacConverter::default(),
        }
    }

    /// 以描述符的默认值初始化寄存器
    ///
    /// 之后只接受这些描述符中的寄存器。
    pub fn with_defaults(module_count: usize, descriptors: &[DacDescriptor]) -> Self {
        let det = Self::new(module_count);
        {
            let mut state = det.state.lock();
            state.known_registers_only = true;
            for d in descriptors {
                state.defaults.insert(d.register(), d.default_value());
            }
        }
        det
    }

    /// 替换毫伏换算器
    pub fn with_converter(mut self, converter: DacConverter) -> Self {
        self.converter = converter;
        self
    }

    /// 毫伏换算器
    pub fn converter(&self) -> DacConverter {
        self.converter
    }

    /// 修改模块数
    ///
    /// 新增模块的寄存器取默认值；减少时截断。
    pub fn set_module_count(&self, module_count: usize) {
        let mut state = self.state.lock();
        state.module_count = module_count;
        let registers: Vec<RegisterId> = state.registers.keys().copied().collect();
        for register in registers {
            state.register_mut(register);
        }
    }

    /// 让指定模块的所有访问失败（`None` 恢复）
    pub fn fail_module(&self, module: Option<ModuleIndex>) {
        self.state.lock().failing_module = module;
    }

    /// 允许再成功写入 `writes` 次，之后的写入全部失败（`None` 恢复）
    pub fn fail_after_writes(&self, writes: Option<usize>) {
        self.state.lock().writes_before_failure = writes;
    }

    /// 直接查看某寄存器在所有模块上的原始值（不计入调用次数）
    pub fn values(&self, register: RegisterId) -> Vec<i32> {
        let state = self.state.lock();
        (0..state.module_count)
            .map(|module| state.raw_value(register, module))
            .collect()
    }

    /// `get_dac` 调用次数
    pub fn read_calls(&self) -> usize {
        self.state.lock().read_calls
    }

    /// `set_dac` 成功调用次数
    pub fn write_calls(&self) -> usize {
        self.state.lock().write_calls
    }

    /// 清零调用计数
    pub fn reset_counters(&self) {
        let mut state = self.state.lock();
        state.read_calls = 0;
        state.write_calls = 0;
    }
}

impl DetectorHandle for MockDetector {
    fn get_dac(
        &self,
        register: RegisterId,
        unit: DacUnit,
        modules: &[ModuleIndex],
    ) -> Result<Vec<i32>, HandleError> {
        let mut state = self.state.lock();
        state.read_calls += 1;
        state.check_modules(modules)?;
        state.check_register(register)?;

        let values = modules
            .iter()
            .map(|&module| -> Result<i32, HandleError> {
                let raw = state.raw_value(register, module);
                match unit {
                    DacUnit::Raw => Ok(raw),
                    DacUnit::Millivolt => Ok(self.converter.to_millivolts(raw)?),
                }
            })
            .collect::<Result<Vec<_>, _>>()?;

        trace!(%register, ?unit, ?modules, ?values, "mock get_dac");
        Ok(values)
    }

    fn set_dac(
        &self,
        register: RegisterId,
        value: i32,
        unit: DacUnit,
        modules: &[ModuleIndex],
    ) -> Result<(), HandleError> {
        let mut state = self.state.lock();
        state.check_modules(modules)?;
        state.check_register(register)?;

        let raw = match unit {
            DacUnit::Raw => value,
            DacUnit::Millivolt => self.converter.to_dac(value)?,
        };

        // 只有能成功的写入才消耗故障预算
        if let Some(remaining) = state.writes_before_failure.as_mut() {
            if *remaining == 0 {
                return Err(HandleError::Timeout);
            }
            *remaining -= 1;
        }

        let values = state.register_mut(register);
        for &module in modules {
            values[module] = raw;
        }
        state.write_calls += 1;

        trace!(%register, ?unit, value, raw, ?modules, "mock set_dac");
        Ok(())
    }

    fn module_count(&self) -> usize {
        self.state.lock().module_count
    }
}
