/// 动画性能模式

use super::tier::PerformanceTier;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 性能模式，按动画强度从低到高排序
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PerformanceMode {
    Minimal,
    Balanced,
    High,
}

impl PerformanceMode {
    /// 时长倍率：minimal 0.5，balanced 1.0，high 1.2
    pub fn duration_multiplier(self) -> f32 {
        match self {
            PerformanceMode::Minimal => 0.5,
            PerformanceMode::Balanced => 1.0,
            PerformanceMode::High => 1.2,
        }
    }

    /// 在 minimal 与 balanced 之间切换；high 视为开启，切到 minimal
    pub fn toggled(self) -> Self {
        match self {
            PerformanceMode::Minimal => PerformanceMode::Balanced,
            PerformanceMode::Balanced | PerformanceMode::High => PerformanceMode::Minimal,
        }
    }
}

impl Default for PerformanceMode {
    fn default() -> Self {
        PerformanceMode::Balanced
    }
}

impl From<PerformanceTier> for PerformanceMode {
    fn from(tier: PerformanceTier) -> Self {
        match tier {
            PerformanceTier::High => PerformanceMode::High,
            PerformanceTier::Medium => PerformanceMode::Balanced,
            PerformanceTier::Low => PerformanceMode::Minimal,
        }
    }
}

impl fmt::Display for PerformanceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PerformanceMode::Minimal => "minimal",
            PerformanceMode::Balanced => "balanced",
            PerformanceMode::High => "high",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle() {
        assert_eq!(PerformanceMode::Minimal.toggled(), PerformanceMode::Balanced);
        assert_eq!(PerformanceMode::Balanced.toggled(), PerformanceMode::Minimal);
        assert_eq!(PerformanceMode::High.toggled(), PerformanceMode::Minimal);
    }

    #[test]
    fn test_serialized_names() {
        assert_eq!(serde_json::to_string(&PerformanceMode::Balanced).unwrap(), "\"balanced\"");
        let mode: PerformanceMode = serde_json::from_str("\"minimal\"").unwrap();
        assert_eq!(mode, PerformanceMode::Minimal);
    }
}
