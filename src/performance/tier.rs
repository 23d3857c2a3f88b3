/// 性能等级划分

use serde::{Deserialize, Serialize};
use std::fmt;

/// 高性能等级的最低分（含）
pub const HIGH_TIER_MIN_SCORE: u8 = 75;
/// 中等性能等级的最低分（含）
pub const MEDIUM_TIER_MIN_SCORE: u8 = 45;

/// 性能等级
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PerformanceTier {
    Low,
    Medium,
    High,
}

impl PerformanceTier {
    /// 按评分分级，边界值归入较高的等级
    pub fn classify(score: u8) -> Self {
        if score >= HIGH_TIER_MIN_SCORE {
            PerformanceTier::High
        } else if score >= MEDIUM_TIER_MIN_SCORE {
            PerformanceTier::Medium
        } else {
            PerformanceTier::Low
        }
    }
}

impl fmt::Display for PerformanceTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PerformanceTier::Low => "low",
            PerformanceTier::Medium => "medium",
            PerformanceTier::High => "high",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boundaries_resolve_upward() {
        assert_eq!(PerformanceTier::classify(75), PerformanceTier::High);
        assert_eq!(PerformanceTier::classify(74), PerformanceTier::Medium);
        assert_eq!(PerformanceTier::classify(45), PerformanceTier::Medium);
        assert_eq!(PerformanceTier::classify(44), PerformanceTier::Low);
        assert_eq!(PerformanceTier::classify(0), PerformanceTier::Low);
        assert_eq!(PerformanceTier::classify(100), PerformanceTier::High);
    }

    #[test]
    fn test_classification_is_monotonic() {
        let tiers: Vec<_> = (0..=100u8).map(PerformanceTier::classify).collect();
        assert!(tiers.windows(2).all(|pair| pair[0] <= pair[1]));

        // 每个等级都是连续区间
        let changes = tiers.windows(2).filter(|pair| pair[0] != pair[1]).count();
        assert_eq!(changes, 2);
    }
}
