/// 动画参数
///
/// 弹簧/补间参数和过渡配置，按当前模式给出不同强度的版本。

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// 缓动曲线
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Easing {
    Linear,
    EaseIn,
    EaseOut,
    EaseInOut,
}

/// 运动方式
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Motion {
    Spring {
        stiffness: f32,
        damping: f32,
        mass: f32,
    },
    Tween {
        duration: Duration,
        easing: Easing,
    },
}

impl Motion {
    pub const BALANCED_SPRING: Motion = Motion::Spring {
        stiffness: 300.0,
        damping: 30.0,
        mass: 1.0,
    };

    pub const HIGH_SPRING: Motion = Motion::Spring {
        stiffness: 400.0,
        damping: 25.0,
        mass: 0.8,
    };

    pub const MINIMAL_TWEEN: Motion = Motion::Tween {
        duration: Duration::from_millis(200),
        easing: Easing::EaseOut,
    };

    pub const INSTANT_TWEEN: Motion = Motion::Tween {
        duration: Duration::from_millis(10),
        easing: Easing::Linear,
    };

    pub fn is_spring(&self) -> bool {
        matches!(self, Motion::Spring { .. })
    }
}

/// 过渡配置
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    pub duration: Duration,
    pub delay: Duration,
    pub easing: Easing,
}

impl Transition {
    /// 未指定时长时使用的默认值
    pub const DEFAULT_DURATION: Duration = Duration::from_millis(300);

    pub fn new(duration: Duration, easing: Easing) -> Self {
        Self {
            duration,
            delay: Duration::ZERO,
            easing,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// 性能降低时的版本：时长 ×0.6，ease-out
    pub fn reduced(&self) -> Self {
        Self {
            duration: scale(self.duration, 0.6),
            delay: self.delay,
            easing: Easing::EaseOut,
        }
    }

    /// 最低限度的版本：10ms 线性，无延迟
    pub fn minimal() -> Self {
        Self::new(Duration::from_millis(10), Easing::Linear)
    }
}

impl Default for Transition {
    fn default() -> Self {
        Self::new(Self::DEFAULT_DURATION, Easing::EaseInOut)
    }
}

/// 按倍率缩放时长，四舍五入到纳秒，溢出时取最大值
pub(crate) fn scale(base: Duration, factor: f64) -> Duration {
    if !(factor.is_finite() && factor > 0.0) {
        return Duration::ZERO;
    }
    let nanos = (base.as_nanos() as f64 * factor).round();
    if nanos >= u64::MAX as f64 {
        return Duration::MAX;
    }
    Duration::from_nanos(nanos as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reduced_transition() {
        let base = Transition::new(Duration::from_millis(500), Easing::EaseInOut)
            .with_delay(Duration::from_millis(100));
        let reduced = base.reduced();

        assert_eq!(reduced.duration, Duration::from_millis(300));
        assert_eq!(reduced.delay, Duration::from_millis(100));
        assert_eq!(reduced.easing, Easing::EaseOut);
    }

    #[test]
    fn test_scale() {
        assert_eq!(scale(Duration::from_secs(1), 0.5), Duration::from_millis(500));
        assert_eq!(scale(Duration::from_secs(1), 0.0), Duration::ZERO);
        assert_eq!(scale(Duration::from_secs(1), f64::NAN), Duration::ZERO);
        assert_eq!(scale(Duration::MAX, 2.0), Duration::MAX);
    }

    #[test]
    fn test_motion_serialization() {
        let json = serde_json::to_value(Motion::HIGH_SPRING).unwrap();
        assert_eq!(json["type"], "spring");
        assert_eq!(json["stiffness"], 400.0);
    }
}
