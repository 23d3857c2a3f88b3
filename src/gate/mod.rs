//! 动画门控
//!
//! [`AnimationGate`] 是偏好和自适应模式的值快照，回答"这个动画要不要播、
//! 播多久"。构造开销很小，每帧重新创建即可。
//!
//! 有效模式永远不会高于用户配置的模式：
//!
//! | 自适应模式 | 有效模式 |
//! |-----------|---------|
//! | optimal   | 用户配置 |
//! | reduced   | min(用户配置, balanced)，并标记为降级 |
//! | minimal   | minimal |

pub mod motion;

pub use motion::{Easing, Motion, Transition};

use crate::adaptive::AdaptiveMode;
use crate::performance::PerformanceMode;
use crate::preferences::UserPreferences;
use motion::scale;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// 动画重要程度
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnimationWeight {
    /// 传达状态，必须可见（减少动态效果时直接跳到终态）
    Essential,
    /// 装饰性
    Decorative,
    /// 粒子、视差等开销较大的效果
    Complex,
}

/// 门控结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationDecision {
    /// 以给定时长播放
    Animate { duration: Duration },
    /// 直接应用终态，不做插值
    Instant,
    /// 不播放
    Skip,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationGate {
    preferences: UserPreferences,
    adaptive_mode: AdaptiveMode,
    effective_mode: PerformanceMode,
    degraded: bool,
}

impl AnimationGate {
    pub fn new(preferences: &UserPreferences, adaptive_mode: AdaptiveMode) -> Self {
        let configured = preferences.performance_mode;
        let (effective_mode, degraded) = match adaptive_mode {
            AdaptiveMode::Optimal => (configured, false),
            AdaptiveMode::Reduced => (configured.min(PerformanceMode::Balanced), true),
            AdaptiveMode::Minimal => (PerformanceMode::Minimal, true),
        };

        Self {
            preferences: *preferences,
            adaptive_mode,
            effective_mode,
            degraded,
        }
    }

    pub fn effective_mode(&self) -> PerformanceMode {
        self.effective_mode
    }

    pub fn adaptive_mode(&self) -> AdaptiveMode {
        self.adaptive_mode
    }

    pub fn is_degraded(&self) -> bool {
        self.degraded
    }

    pub fn reduced_motion(&self) -> bool {
        self.preferences.reduced_motion
    }

    pub fn should_animate(&self, weight: AnimationWeight) -> bool {
        let reduced = self.preferences.reduced_motion;
        match weight {
            AnimationWeight::Essential => true,
            AnimationWeight::Decorative => {
                !reduced && self.effective_mode != PerformanceMode::Minimal
            }
            AnimationWeight::Complex => {
                !reduced
                    && match self.effective_mode {
                        PerformanceMode::High => true,
                        PerformanceMode::Balanced => !self.degraded,
                        PerformanceMode::Minimal => false,
                    }
            }
        }
    }

    /// 按用户倍率和有效模式缩放时长；减少动态效果时为0
    pub fn scale_duration(&self, base: Duration) -> Duration {
        if self.preferences.reduced_motion {
            return Duration::ZERO;
        }
        let factor = self.preferences.animation_duration_multiplier as f64
            * self.effective_mode.duration_multiplier() as f64;
        scale(base, factor)
    }

    pub fn decide(&self, weight: AnimationWeight, base: Duration) -> AnimationDecision {
        if !self.should_animate(weight) {
            return AnimationDecision::Skip;
        }
        let duration = self.scale_duration(base);
        if duration.is_zero() {
            AnimationDecision::Instant
        } else {
            AnimationDecision::Animate { duration }
        }
    }

    pub fn particles_enabled(&self) -> bool {
        self.preferences.enable_particles && self.should_animate(AnimationWeight::Complex)
    }

    pub fn parallax_enabled(&self) -> bool {
        self.preferences.enable_parallax && self.should_animate(AnimationWeight::Decorative)
    }

    /// 交互反馈使用的运动方式
    pub fn spring(&self) -> Motion {
        if self.preferences.reduced_motion {
            return Motion::INSTANT_TWEEN;
        }
        match self.effective_mode {
            PerformanceMode::Minimal => Motion::MINIMAL_TWEEN,
            PerformanceMode::Balanced => Motion::BALANCED_SPRING,
            PerformanceMode::High => Motion::HIGH_SPRING,
        }
    }

    /// 按当前模式选择过渡版本，再应用用户倍率
    pub fn transition(&self, base: Transition) -> Transition {
        let selected = if self.preferences.reduced_motion
            || self.effective_mode == PerformanceMode::Minimal
        {
            Transition::minimal()
        } else if self.degraded {
            base.reduced()
        } else {
            base
        };

        let multiplier = self.preferences.animation_duration_multiplier as f64;
        Transition {
            duration: scale(selected.duration, multiplier),
            delay: scale(selected.delay, multiplier),
            easing: selected.easing,
        }
    }

    /// 列表项依次出现的间隔
    pub fn scale_stagger(&self, base: Duration) -> Duration {
        if self.preferences.reduced_motion {
            return Duration::ZERO;
        }
        let mode_factor = match self.adaptive_mode {
            AdaptiveMode::Minimal => 0.3,
            AdaptiveMode::Reduced => 0.6,
            AdaptiveMode::Optimal => 1.0,
        };
        scale(base, mode_factor * self.preferences.animation_duration_multiplier as f64)
    }
}
