//! DAC 与毫伏换算
//!
//! 与探测器服务端的线性区间映射保持一致：
//!
//! ```text
//! out = (in - in_min) * (out_max - out_min) / (in_max - in_min) + out_min
//! ```
//!
//! 输入超出源区间时返回错误；结果的小数部分大于 0.0001 时四舍五入，
//! 否则直接截断。

use crate::ProtocolError;

/// LTC2620 为 12 位 DAC
pub const LTC2620_MAX_STEPS: i32 = 4096;

/// LTC2620 最小输出电压（mV）
pub const LTC2620_MIN_MV: i32 = 0;

/// Mythen3 DAC 最大输出电压（mV）
pub const MYTHEN3_DAC_MAX_MV: i32 = 2048;

/// 线性区间映射
///
/// `in_min` 可以大于 `in_max`（反向映射），此时边界检查按较小/较大值进行。
pub fn convert_to_different_range(
    in_min: i32,
    in_max: i32,
    out_min: i32,
    out_max: i32,
    value: i32,
) -> Result<i32, ProtocolError> {
    let (smaller, bigger) = if in_min > in_max {
        (in_max, in_min)
    } else {
        (in_min, in_max)
    };
    if value < smaller || value > bigger {
        return Err(ProtocolError::ValueOutOfRange {
            value,
            min: smaller,
            max: bigger,
        });
    }
    if in_min == in_max {
        return Err(ProtocolError::InvalidConverter(format!(
            "empty input range ({in_min} to {in_max})"
        )));
    }

    // 差值在 f64 中计算，跨度可以超过 i32
    let mut out = (f64::from(value) - f64::from(in_min)) * (f64::from(out_max) - f64::from(out_min))
        / (f64::from(in_max) - f64::from(in_min))
        + f64::from(out_min);

    if out - out.trunc() > 0.0001 {
        out += 0.5;
    }
    Ok(out as i32)
}

/// DAC 换算器
///
/// 描述一颗 DAC 芯片的步数与输出电压范围。
///
/// ```rust
/// use slsdet_protocol::DacConverter;
///
/// let conv = DacConverter::mythen3();
/// assert_eq!(conv.to_millivolts(0).unwrap(), 0);
/// assert_eq!(conv.to_millivolts(4095).unwrap(), 2048);
/// assert_eq!(conv.to_dac(2048).unwrap(), 4095);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DacConverter {
    /// 最小输出电压（mV）
    pub min_mv: i32,
    /// 最大输出电压（mV）
    pub max_mv: i32,
    /// DAC 步数（12 位 = 4096）
    pub steps: i32,
}

impl DacConverter {
    /// 创建换算器
    pub fn new(min_mv: i32, max_mv: i32, steps: i32) -> Result<Self, ProtocolError> {
        if steps < 2 {
            return Err(ProtocolError::InvalidConverter(format!(
                "steps must be at least 2, got {steps}"
            )));
        }
        if min_mv >= max_mv {
            return Err(ProtocolError::InvalidConverter(format!(
                "min_mv ({min_mv}) must be below max_mv ({max_mv})"
            )));
        }
        Ok(Self {
            min_mv,
            max_mv,
            steps,
        })
    }

    /// LTC2620 换算器（12 位，0 mV 起）
    pub fn ltc2620(max_mv: i32) -> Result<Self, ProtocolError> {
        Self::new(LTC2620_MIN_MV, max_mv, LTC2620_MAX_STEPS)
    }

    /// Mythen3 板载 DAC（LTC2620，最大 2048 mV）
    pub const fn mythen3() -> Self {
        Self {
            min_mv: LTC2620_MIN_MV,
            max_mv: MYTHEN3_DAC_MAX_MV,
            steps: LTC2620_MAX_STEPS,
        }
    }

    /// 最大 DAC 数值
    pub fn max_dac(&self) -> i32 {
        self.steps - 1
    }

    /// DAC 数值 → 毫伏
    pub fn to_millivolts(&self, dac: i32) -> Result<i32, ProtocolError> {
        convert_to_different_range(0, self.max_dac(), self.min_mv, self.max_mv, dac)
    }

    /// 毫伏 → DAC 数值
    pub fn to_dac(&self, millivolts: i32) -> Result<i32, ProtocolError> {
        convert_to_different_range(self.min_mv, self.max_mv, 0, self.max_dac(), millivolts)
    }
}

impl Default for DacConverter {
    fn default() -> Self {
        Self::mythen3()
    }
}
