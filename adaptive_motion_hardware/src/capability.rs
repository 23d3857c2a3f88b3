/// 设备能力数据模型

use serde::{Deserialize, Serialize};
use std::fmt;

/// 未提供核心数时的默认值
pub const DEFAULT_LOGICAL_CORES: u32 = 4;

/// 默认的电量充足阈值（电量高于30%视为充足）
pub const DEFAULT_POWER_THRESHOLD: f32 = 0.30;

/// 网络连接等级
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NetworkClass {
    Wifi,
    #[serde(rename = "4g")]
    FourG,
    #[serde(rename = "3g")]
    ThreeG,
    #[serde(rename = "2g")]
    TwoG,
    Unknown,
}

impl NetworkClass {
    /// 从平台的有效连接类型字符串解析
    ///
    /// 无法识别的值一律视为 `Unknown`。
    pub fn from_effective_type(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "wifi" | "ethernet" => NetworkClass::Wifi,
            "4g" => NetworkClass::FourG,
            "3g" => NetworkClass::ThreeG,
            "2g" | "slow-2g" => NetworkClass::TwoG,
            _ => NetworkClass::Unknown,
        }
    }
}

impl Default for NetworkClass {
    fn default() -> Self {
        NetworkClass::Unknown
    }
}

impl fmt::Display for NetworkClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NetworkClass::Wifi => "wifi",
            NetworkClass::FourG => "4g",
            NetworkClass::ThreeG => "3g",
            NetworkClass::TwoG => "2g",
            NetworkClass::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

/// 电池状态
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BatteryStatus {
    /// 是否正在充电
    pub charging: bool,
    /// 电量，0.0-1.0
    pub level: f32,
}

impl BatteryStatus {
    /// 正在充电或电量高于阈值
    pub fn is_sufficient(&self, threshold: f32) -> bool {
        self.charging || self.level > threshold
    }
}

/// 设备能力
///
/// 每个会话探测一次。每个字段都有确定的回退值，缺失的平台接口
/// 只会让结果更保守，不会产生错误。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceCapabilities {
    pub has_graphics_acceleration: bool,
    #[serde(rename = "memoryEstimateGB")]
    pub memory_estimate_gb: f32,
    pub logical_cores: u32,
    pub network_class: NetworkClass,
    pub has_sufficient_power: bool,
}

impl DeviceCapabilities {
    /// 所有探测都失败时的结果
    pub fn conservative() -> Self {
        Self {
            has_graphics_acceleration: false,
            memory_estimate_gb: 4.0,
            logical_cores: DEFAULT_LOGICAL_CORES,
            network_class: NetworkClass::Unknown,
            has_sufficient_power: true,
        }
    }
}

impl Default for DeviceCapabilities {
    fn default() -> Self {
        Self::conservative()
    }
}
