use super::{ConfigError, ConfigResult};
use crate::impl_default;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// 运行时自适应配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AdaptiveConfig {
    /// 是否启用帧率监控
    pub enabled: bool,

    /// 移动平均的初始帧率
    pub initial_fps: f32,

    /// 移动平均中新采样的权重
    pub smoothing: f32,

    /// 低于该帧率的采样记为一次掉帧
    pub drop_fps: f32,

    /// 平均帧率低于该值进入 reduced
    pub reduced_fps: f32,

    /// 平均帧率低于该值进入 minimal
    pub minimal_fps: f32,

    /// 掉帧数超过该值进入 reduced
    pub reduced_drops: u32,

    /// 掉帧数超过该值进入 minimal
    pub minimal_drops: u32,

    /// 掉帧计数每隔多少秒衰减一次
    pub drop_decay_secs: u64,

    /// 恢复前需要连续多少次较好的采样
    pub recovery_ticks: u32,

    /// 降级持续多少次采样后写入偏好
    pub sustained_ticks: u32,
}

impl_default!(AdaptiveConfig {
    enabled: true,
    initial_fps: 60.0,
    smoothing: 0.1,
    drop_fps: 50.0,
    reduced_fps: 45.0,
    minimal_fps: 30.0,
    reduced_drops: 2,
    minimal_drops: 5,
    drop_decay_secs: 5,
    recovery_ticks: 5,
    sustained_ticks: 10,
});

impl AdaptiveConfig {
    pub fn drop_decay_interval(&self) -> Duration {
        Duration::from_secs(self.drop_decay_secs)
    }

    /// 验证配置
    pub fn validate(&self) -> ConfigResult<()> {
        if !(self.smoothing > 0.0 && self.smoothing <= 1.0) {
            return Err(ConfigError::ValidationError(
                "adaptive.smoothing must be within (0.0, 1.0]".to_string(),
            ));
        }
        if self.minimal_fps > self.reduced_fps {
            return Err(ConfigError::ValidationError(
                "adaptive.minimal_fps must not exceed adaptive.reduced_fps".to_string(),
            ));
        }
        if self.minimal_drops < self.reduced_drops {
            return Err(ConfigError::ValidationError(
                "adaptive.minimal_drops must not be below adaptive.reduced_drops".to_string(),
            ));
        }
        if self.recovery_ticks == 0 || self.sustained_ticks == 0 {
            return Err(ConfigError::ValidationError(
                "adaptive tick windows must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
