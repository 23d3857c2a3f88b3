/// 动画策略推荐
///
/// 每个性能等级对应一行固定配置，不做插值，也不做迟滞。

use super::mode::PerformanceMode;
use super::tier::PerformanceTier;
use adaptive_motion_hardware::DeviceCapabilities;
use serde::{Deserialize, Serialize};

/// 动画策略
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnimationPolicy {
    pub enable_particles: bool,
    pub enable_parallax: bool,
    pub enable_complex_animations: bool,
    pub animation_duration_multiplier: f32,
    pub performance_mode: PerformanceMode,
}

impl AnimationPolicy {
    /// 根据性能等级生成推荐策略
    pub fn recommend(tier: PerformanceTier, caps: &DeviceCapabilities) -> Self {
        match tier {
            PerformanceTier::High => Self {
                enable_particles: true,
                enable_parallax: true,
                enable_complex_animations: true,
                animation_duration_multiplier: 1.0,
                performance_mode: PerformanceMode::High,
            },
            PerformanceTier::Medium => Self {
                // 只有硬件加速时才开启粒子
                enable_particles: caps.has_graphics_acceleration,
                enable_parallax: true,
                enable_complex_animations: true,
                animation_duration_multiplier: 0.8,
                performance_mode: PerformanceMode::Balanced,
            },
            PerformanceTier::Low => Self {
                enable_particles: false,
                enable_parallax: false,
                enable_complex_animations: false,
                animation_duration_multiplier: 0.6,
                performance_mode: PerformanceMode::Minimal,
            },
        }
    }

    /// 未进行探测时使用的默认策略：平衡模式，动画开启
    pub fn fallback() -> Self {
        Self {
            enable_particles: true,
            enable_parallax: true,
            enable_complex_animations: true,
            animation_duration_multiplier: 1.0,
            performance_mode: PerformanceMode::Balanced,
        }
    }
}
