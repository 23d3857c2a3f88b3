//! 设备能力探测模块
//!
//! 读取图形加速、内存、CPU核心数、网络类型和电池状态等尽力而为的
//! 环境信号。任何信号缺失都会退化为保守的默认值，探测永远不会失败。

pub mod capability;
pub mod error;
pub mod probe;
pub mod utils;

// Re-export public API
pub use capability::{
    BatteryStatus, DeviceCapabilities, NetworkClass, DEFAULT_LOGICAL_CORES,
    DEFAULT_POWER_THRESHOLD,
};
pub use error::{ProbeContext, ProbeError, ProbeResult, Signal};
pub use probe::{
    estimate_memory_gb, platform_signals, CapabilityProber, DeviceInfo, NullSignals,
    PlatformSignals, ProbeReport, StaticSignals, DEFAULT_BATTERY_TIMEOUT,
};
pub use utils::RingBuffer;

/// 用当前平台的默认信号来源探测一次设备能力
pub async fn detect_capabilities() -> DeviceCapabilities {
    CapabilityProber::for_platform().probe().await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_platform_detection_never_fails() {
        let caps = detect_capabilities().await;
        assert!(caps.logical_cores >= 1);
        assert!(caps.memory_estimate_gb > 0.0);
    }

    #[test]
    fn test_platform_detection_on_plain_executor() {
        let caps = futures::executor::block_on(detect_capabilities());
        assert!(caps.logical_cores >= 1);
    }
}
