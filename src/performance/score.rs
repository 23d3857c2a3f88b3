/// 性能评分
///
/// 把设备能力映射为 0-100 的加权评分。权重：图形加速30、内存25、
/// CPU核心20、网络15、电源10。满分恰好为100。

use adaptive_motion_hardware::{DeviceCapabilities, NetworkClass};
use serde::{Deserialize, Serialize};

pub const MAX_SCORE: u8 = 100;

/// 各维度得分
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub graphics: u8,
    pub memory: u8,
    pub cores: u8,
    pub network: u8,
    pub power: u8,
}

impl ScoreBreakdown {
    pub fn evaluate(caps: &DeviceCapabilities) -> Self {
        Self {
            graphics: graphics_points(caps.has_graphics_acceleration),
            memory: memory_points(caps.memory_estimate_gb),
            cores: core_points(caps.logical_cores),
            network: network_points(caps.network_class),
            power: power_points(caps.has_sufficient_power),
        }
    }

    /// 总分，截断到 [0, 100]
    pub fn total(&self) -> u8 {
        let sum = self.graphics as u16
            + self.memory as u16
            + self.cores as u16
            + self.network as u16
            + self.power as u16;
        sum.min(MAX_SCORE as u16) as u8
    }
}

/// 计算性能评分
pub fn performance_score(caps: &DeviceCapabilities) -> u8 {
    ScoreBreakdown::evaluate(caps).total()
}

fn graphics_points(accelerated: bool) -> u8 {
    if accelerated {
        30
    } else {
        0
    }
}

fn memory_points(gb: f32) -> u8 {
    if gb >= 8.0 {
        25
    } else if gb >= 6.0 {
        20
    } else if gb >= 4.0 {
        15
    } else {
        10
    }
}

fn core_points(cores: u32) -> u8 {
    match cores {
        8.. => 20,
        4..=7 => 15,
        2..=3 => 10,
        _ => 5,
    }
}

fn network_points(network: NetworkClass) -> u8 {
    match network {
        NetworkClass::Wifi | NetworkClass::FourG => 15,
        NetworkClass::ThreeG => 10,
        NetworkClass::TwoG => 5,
        // 未知连接按良好处理
        NetworkClass::Unknown => 12,
    }
}

fn power_points(sufficient: bool) -> u8 {
    if sufficient {
        10
    } else {
        5
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn caps(gpu: bool, memory: f32, cores: u32, network: NetworkClass, power: bool) -> DeviceCapabilities {
        DeviceCapabilities {
            has_graphics_acceleration: gpu,
            memory_estimate_gb: memory,
            logical_cores: cores,
            network_class: network,
            has_sufficient_power: power,
        }
    }

    fn network_strategy() -> impl Strategy<Value = NetworkClass> {
        prop_oneof![
            Just(NetworkClass::Wifi),
            Just(NetworkClass::FourG),
            Just(NetworkClass::ThreeG),
            Just(NetworkClass::TwoG),
            Just(NetworkClass::Unknown),
        ]
    }

    #[test]
    fn test_low_end_device() {
        let breakdown = ScoreBreakdown::evaluate(&caps(false, 4.0, 2, NetworkClass::ThreeG, true));
        assert_eq!(breakdown.graphics, 0);
        assert_eq!(breakdown.memory, 15);
        assert_eq!(breakdown.cores, 10);
        assert_eq!(breakdown.network, 10);
        assert_eq!(breakdown.power, 10);
        assert_eq!(breakdown.total(), 45);
    }

    #[test]
    fn test_flagship_device() {
        assert_eq!(performance_score(&caps(true, 16.0, 8, NetworkClass::Wifi, true)), 100);
    }

    #[test]
    fn test_worst_device() {
        assert_eq!(performance_score(&caps(false, 1.0, 1, NetworkClass::TwoG, false)), 25);
    }

    #[test]
    fn test_unknown_network_is_optimistic() {
        let unknown = performance_score(&caps(true, 8.0, 8, NetworkClass::Unknown, true));
        let three_g = performance_score(&caps(true, 8.0, 8, NetworkClass::ThreeG, true));
        assert_eq!(unknown, 97);
        assert!(unknown > three_g);
    }

    #[test]
    fn test_conservative_capabilities_score_medium() {
        assert_eq!(performance_score(&DeviceCapabilities::conservative()), 52);
    }

    proptest! {
        #[test]
        fn score_stays_in_range(
            gpu in any::<bool>(),
            memory in 0.0f32..64.0,
            cores in 0u32..256,
            network in network_strategy(),
            power in any::<bool>(),
        ) {
            let score = performance_score(&caps(gpu, memory, cores, network, power));
            prop_assert!(score <= MAX_SCORE);
            prop_assert!(score >= 25);
        }

        #[test]
        fn score_monotonic_in_memory(
            gpu in any::<bool>(),
            low in 0.0f32..32.0,
            extra in 0.0f32..32.0,
            cores in 0u32..64,
            network in network_strategy(),
            power in any::<bool>(),
        ) {
            let base = performance_score(&caps(gpu, low, cores, network, power));
            let more = performance_score(&caps(gpu, low + extra, cores, network, power));
            prop_assert!(more >= base);
        }

        #[test]
        fn score_monotonic_in_cores(
            gpu in any::<bool>(),
            memory in 0.0f32..32.0,
            low in 0u32..64,
            extra in 0u32..64,
            network in network_strategy(),
            power in any::<bool>(),
        ) {
            let base = performance_score(&caps(gpu, memory, low, network, power));
            let more = performance_score(&caps(gpu, memory, low + extra, network, power));
            prop_assert!(more >= base);
        }

        #[test]
        fn score_monotonic_in_flags(
            memory in 0.0f32..32.0,
            cores in 0u32..64,
            network in network_strategy(),
        ) {
            let without = performance_score(&caps(false, memory, cores, network, false));
            let gpu_only = performance_score(&caps(true, memory, cores, network, false));
            let power_only = performance_score(&caps(false, memory, cores, network, true));
            prop_assert!(gpu_only >= without);
            prop_assert!(power_only >= without);
        }
    }
}
