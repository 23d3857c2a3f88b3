//! 用户动画偏好
//!
//! 偏好对象、配置状态机、键值存储后端以及系统"减少动态效果"信号。
//! 偏好以 camelCase JSON 持久化，缺失或未知的字段回退为默认值。

pub mod signal;
pub mod state;
pub mod storage;
pub mod store;
#[cfg(target_arch = "wasm32")]
pub mod web_storage;

pub use signal::{MotionSignalSender, SystemMotionSignal};
pub use state::ConfigurationState;
pub use storage::{FileStorage, KeyValueStorage, MemoryStorage};
pub use store::{ListenerId, PreferenceStore};
#[cfg(target_arch = "wasm32")]
pub use web_storage::WebStorage;

use crate::impl_default;
use crate::performance::{AnimationPolicy, PerformanceMode};
use serde::{Deserialize, Serialize};

/// 用户动画偏好
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UserPreferences {
    pub reduced_motion: bool,
    pub performance_mode: PerformanceMode,
    pub enable_parallax: bool,
    pub enable_particles: bool,
    pub animation_duration_multiplier: f32,
}

impl_default!(UserPreferences {
    reduced_motion: false,
    performance_mode: PerformanceMode::Balanced,
    enable_parallax: true,
    enable_particles: true,
    animation_duration_multiplier: 1.0,
});

impl UserPreferences {
    /// 由推荐策略生成偏好，保留现有的 reduced_motion
    pub fn from_policy(policy: &AnimationPolicy, reduced_motion: bool) -> Self {
        Self {
            reduced_motion,
            performance_mode: policy.performance_mode,
            enable_parallax: policy.enable_parallax,
            enable_particles: policy.enable_particles,
            animation_duration_multiplier: policy.animation_duration_multiplier,
        }
    }

    /// 浅合并部分更新
    pub fn merge(&mut self, update: &PreferenceUpdate) {
        if let Some(reduced_motion) = update.reduced_motion {
            self.reduced_motion = reduced_motion;
        }
        if let Some(mode) = update.performance_mode {
            self.performance_mode = mode;
        }
        if let Some(enable_parallax) = update.enable_parallax {
            self.enable_parallax = enable_parallax;
        }
        if let Some(enable_particles) = update.enable_particles {
            self.enable_particles = enable_particles;
        }
        if let Some(multiplier) = update.animation_duration_multiplier {
            self.animation_duration_multiplier = multiplier;
        }
    }

    /// 修正无法使用的时长倍率（负数、NaN、无穷）
    pub fn sanitized(mut self) -> Self {
        let multiplier = self.animation_duration_multiplier;
        if !multiplier.is_finite() || multiplier < 0.0 {
            tracing::warn!(target: "preferences",
                "Discarding invalid duration multiplier {}", multiplier);
            self.animation_duration_multiplier = 1.0;
        }
        self
    }
}

/// 偏好的部分更新，`None` 字段保持不变
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PreferenceUpdate {
    pub reduced_motion: Option<bool>,
    pub performance_mode: Option<PerformanceMode>,
    pub enable_parallax: Option<bool>,
    pub enable_particles: Option<bool>,
    pub animation_duration_multiplier: Option<f32>,
}

impl PreferenceUpdate {
    pub fn reduced_motion(value: bool) -> Self {
        Self {
            reduced_motion: Some(value),
            ..Self::default()
        }
    }

    pub fn performance_mode(mode: PerformanceMode) -> Self {
        Self {
            performance_mode: Some(mode),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
