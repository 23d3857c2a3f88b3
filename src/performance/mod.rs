/// 设备性能评估
///
/// 评分、分级和动画策略推荐

pub mod mode;
pub mod policy;
pub mod report;
pub mod score;
pub mod tier;

pub use mode::PerformanceMode;
pub use policy::AnimationPolicy;
pub use report::PerformanceReport;
pub use score::{performance_score, ScoreBreakdown, MAX_SCORE};
pub use tier::{PerformanceTier, HIGH_TIER_MIN_SCORE, MEDIUM_TIER_MIN_SCORE};
