//! Mythen3 DAC 表
//!
//! 16 个片上 DAC，寄存器编号与探测器服务端的 DAC 索引一一对应。

use crate::{DacDescriptor, RegisterId};
use num_enum::{IntoPrimitive, TryFromPrimitive};

/// Mythen3 DAC 上限（12 位）
pub const MYTHEN3_DAC_MAX: i32 = 4095;

/// Mythen3 DAC 下限
pub const MYTHEN3_DAC_MIN: i32 = 0;

/// Mythen3 DAC 索引
///
/// ```rust
/// use slsdet_protocol::Mythen3Dac;
///
/// let dac = Mythen3Dac::try_from(6u16).unwrap();
/// assert_eq!(dac, Mythen3Dac::Vth1);
/// assert_eq!(dac.name(), "vth1");
/// assert_eq!(dac.default_value(), 2800);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoPrimitive, TryFromPrimitive)]
#[repr(u16)]
pub enum Mythen3Dac {
    Cassh = 0,
    Vth2 = 1,
    Vrfsh = 2,
    VrfshNpol = 3,
    VipreOut = 4,
    Vth3 = 5,
    Vth1 = 6,
    Vicin = 7,
    Cas = 8,
    Vrf = 9,
    Vph = 10,
    Vipre = 11,
    Viinsh = 12,
    Vpl = 13,
    Vtrim = 14,
    Vdcsh = 15,
}

impl Mythen3Dac {
    /// 按寄存器顺序排列的全部 DAC
    pub const ALL: [Mythen3Dac; 16] = [
        Self::Cassh,
        Self::Vth2,
        Self::Vrfsh,
        Self::VrfshNpol,
        Self::VipreOut,
        Self::Vth3,
        Self::Vth1,
        Self::Vicin,
        Self::Cas,
        Self::Vrf,
        Self::Vph,
        Self::Vipre,
        Self::Viinsh,
        Self::Vpl,
        Self::Vtrim,
        Self::Vdcsh,
    ];

    /// 用户可见的 DAC 名称
    pub const fn name(self) -> &'static str {
        match self {
            Self::Cassh => "vcassh",
            Self::Vth2 => "vth2",
            Self::Vrfsh => "vshaper",
            Self::VrfshNpol => "vshaperneg",
            Self::VipreOut => "vipre_out",
            Self::Vth3 => "vth3",
            Self::Vth1 => "vth1",
            Self::Vicin => "vicin",
            Self::Cas => "vcas",
            Self::Vrf => "vpreamp",
            Self::Vph => "vph",
            Self::Vipre => "vipre",
            Self::Viinsh => "viinsh",
            Self::Vpl => "vpl",
            Self::Vtrim => "vtrim",
            Self::Vdcsh => "vdcsh",
        }
    }

    /// 上电默认值（DAC 单位）
    pub const fn default_value(self) -> i32 {
        match self {
            Self::Cassh => 1200,
            Self::Vth2 => 2800,
            Self::Vrfsh => 1280,
            Self::VrfshNpol => 2800,
            Self::VipreOut => 1220,
            Self::Vth3 => 2800,
            Self::Vth1 => 2800,
            Self::Vicin => 1708,
            Self::Cas => 1800,
            Self::Vrf => 1100,
            Self::Vph => 1712,
            Self::Vipre => 2624,
            Self::Viinsh => 1708,
            Self::Vpl => 1100,
            Self::Vtrim => 2800,
            Self::Vdcsh => 800,
        }
    }

    /// 寄存器标识
    pub fn register(self) -> RegisterId {
        RegisterId::new(self.into())
    }

    /// 按名称查找
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|dac| dac.name() == name)
    }

    /// 转换为描述符
    pub fn descriptor(self) -> DacDescriptor {
        DacDescriptor::new(
            self.name(),
            self.register(),
            MYTHEN3_DAC_MIN,
            MYTHEN3_DAC_MAX,
            self.default_value(),
        )
    }
}

/// Mythen3 全部 DAC 描述符（寄存器顺序）
pub fn mythen3_dacs() -> Vec<DacDescriptor> {
    Mythen3Dac::ALL.into_iter().map(Mythen3Dac::descriptor).collect()
}
