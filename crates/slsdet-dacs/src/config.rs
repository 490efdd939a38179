//! # DAC 表配置
//!
//! DAC 表以 TOML 文件描述，每个 DAC 一个 `[[dacs]]` 表项：
//!
//! ```toml
//! detector = "mythen3"
//!
//! [[dacs]]
//! name = "vth1"
//! register = 6
//! min = 0
//! max = 4095
//! default = 2800
//! ```
//!
//! 表项顺序即集合的注册顺序。

use serde::{Deserialize, Serialize};
use slsdet_protocol::{DacDescriptor, mythen3_dacs};
use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::Path;
use thiserror::Error;

/// 配置错误
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO Error: {0}")]
    Io(#[from] io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Dac table is empty")]
    Empty,

    #[error("Duplicate dac name in table: {0}")]
    DuplicateName(String),
}

/// DAC 表
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DacTableConfig {
    /// 探测器类型（仅作说明）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detector: Option<String>,

    /// 按注册顺序排列的 DAC
    pub dacs: Vec<DacDescriptor>,
}

impl DacTableConfig {
    pub fn new(dacs: Vec<DacDescriptor>) -> Self {
        Self {
            detector: None,
            dacs,
        }
    }

    /// Mythen3 内置表
    pub fn mythen3() -> Self {
        Self {
            detector: Some("mythen3".to_string()),
            dacs: mythen3_dacs(),
        }
    }

    /// 从 TOML 文本解析并校验
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// 从文件加载
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// 序列化为 TOML 文本
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string(self)?)
    }

    /// 保存到文件
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        fs::write(path, self.to_toml_string()?)?;
        Ok(())
    }

    /// 校验：非空且名称唯一
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.dacs.is_empty() {
            return Err(ConfigError::Empty);
        }
        let mut seen = HashSet::new();
        for dac in &self.dacs {
            if !seen.insert(dac.name()) {
                return Err(ConfigError::DuplicateName(dac.name().to_string()));
            }
        }
        Ok(())
    }
}
