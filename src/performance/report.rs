/// 设备性能检测流水线
///
/// 能力探测 → 评分 → 分级 → 策略。探测完全结束后才计算并发布结果。

use super::policy::AnimationPolicy;
use super::score::ScoreBreakdown;
use super::tier::PerformanceTier;
use adaptive_motion_hardware::{CapabilityProber, DeviceCapabilities, NetworkClass, Signal};
use serde::{Deserialize, Serialize};

/// 设备性能报告
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceReport {
    pub capabilities: DeviceCapabilities,
    pub breakdown: ScoreBreakdown,
    pub score: u8,
    pub tier: PerformanceTier,
    pub policy: AnimationPolicy,
    /// 使用了回退值的信号
    #[serde(default)]
    pub fallbacks: Vec<Signal>,
}

impl PerformanceReport {
    /// 由已探测的能力计算报告
    pub fn evaluate(capabilities: DeviceCapabilities) -> Self {
        let breakdown = ScoreBreakdown::evaluate(&capabilities);
        let score = breakdown.total();
        let tier = PerformanceTier::classify(score);
        let policy = AnimationPolicy::recommend(tier, &capabilities);

        Self {
            capabilities,
            breakdown,
            score,
            tier,
            policy,
            fallbacks: Vec::new(),
        }
    }

    /// 执行探测并生成报告
    pub async fn detect(prober: &CapabilityProber) -> Self {
        let probe = prober.probe_with_report().await;
        let mut report = Self::evaluate(probe.capabilities);
        report.fallbacks = probe.fallbacks;

        tracing::info!(target: "motion",
            "Device performance: score {} -> {} tier, {} mode",
            report.score, report.tier, report.policy.performance_mode);

        report
    }

    /// 关闭探测时使用的默认报告（中等设备，平衡模式，动画开启）
    ///
    /// 能力取一台典型的中等设备，分项合计恰好为60分
    pub fn fallback() -> Self {
        let capabilities = DeviceCapabilities {
            has_graphics_acceleration: false,
            memory_estimate_gb: 8.0,
            logical_cores: 4,
            network_class: NetworkClass::ThreeG,
            has_sufficient_power: true,
        };
        let breakdown = ScoreBreakdown::evaluate(&capabilities);
        let score = breakdown.total();

        Self {
            capabilities,
            breakdown,
            score,
            tier: PerformanceTier::classify(score),
            policy: AnimationPolicy::fallback(),
            fallbacks: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::performance::PerformanceMode;
    use adaptive_motion_hardware::NullSignals;

    #[test]
    fn test_budget_device_is_medium_without_particles() {
        let report = PerformanceReport::evaluate(DeviceCapabilities {
            has_graphics_acceleration: false,
            memory_estimate_gb: 4.0,
            logical_cores: 2,
            network_class: NetworkClass::ThreeG,
            has_sufficient_power: true,
        });

        assert_eq!(report.score, 45);
        assert_eq!(report.tier, PerformanceTier::Medium);
        assert_eq!(report.policy.performance_mode, PerformanceMode::Balanced);
        assert!(!report.policy.enable_particles);
    }

    #[test]
    fn test_flagship_device_is_high() {
        let report = PerformanceReport::evaluate(DeviceCapabilities {
            has_graphics_acceleration: true,
            memory_estimate_gb: 16.0,
            logical_cores: 8,
            network_class: NetworkClass::Wifi,
            has_sufficient_power: true,
        });

        assert_eq!(report.score, 100);
        assert_eq!(report.tier, PerformanceTier::High);
        assert_eq!(report.policy.performance_mode, PerformanceMode::High);
        assert!(report.policy.enable_particles);
        assert_eq!(report.policy.animation_duration_multiplier, 1.0);
    }

    #[tokio::test]
    async fn test_total_probe_failure_behaves_as_medium() {
        let prober = CapabilityProber::new(Box::new(NullSignals));
        let report = PerformanceReport::detect(&prober).await;

        assert_eq!(report.tier, PerformanceTier::Medium);
        assert_eq!(report.policy.performance_mode, PerformanceMode::Balanced);
        assert!(report.policy.enable_parallax);
        assert!(!report.fallbacks.is_empty());
    }

    #[test]
    fn test_fallback_report() {
        let report = PerformanceReport::fallback();
        assert_eq!(report.score, 60);
        assert_eq!(report.breakdown.total(), report.score);
        assert_eq!(report.breakdown, ScoreBreakdown::evaluate(&report.capabilities));
        assert_eq!(report.tier, PerformanceTier::Medium);
        assert_eq!(report.policy, AnimationPolicy::fallback());
    }
}
