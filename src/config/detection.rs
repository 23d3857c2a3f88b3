use super::{ConfigError, ConfigResult};
use crate::impl_default;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// 设备探测配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    /// 是否执行设备探测；关闭时使用默认的中等设备报告
    pub enabled: bool,

    /// 电池探测超时（毫秒）
    pub battery_timeout_ms: u64,

    /// 电量充足阈值（0.0-1.0）
    pub power_threshold: f32,

    /// 原生平台上的系统"减少动态效果"设置
    pub system_reduced_motion: bool,
}

impl_default!(DetectionConfig {
    enabled: true,
    battery_timeout_ms: 500,
    power_threshold: 0.30,
    system_reduced_motion: false,
});

impl DetectionConfig {
    pub fn battery_timeout(&self) -> Duration {
        Duration::from_millis(self.battery_timeout_ms)
    }

    /// 验证配置
    pub fn validate(&self) -> ConfigResult<()> {
        if !(0.0..=1.0).contains(&self.power_threshold) {
            return Err(ConfigError::ValidationError(
                "detection.power_threshold must be within 0.0..=1.0".to_string(),
            ));
        }
        if self.battery_timeout_ms == 0 {
            return Err(ConfigError::ValidationError(
                "detection.battery_timeout_ms must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
