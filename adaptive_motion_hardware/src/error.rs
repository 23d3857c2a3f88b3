/// 能力探测错误处理
///
/// 单个信号探测失败时的错误类型。探测错误只在探测器内部流转，
/// 由 `CapabilityProber` 就地替换为默认值，永远不会抛给调用方。

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// 被探测的环境信号
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Signal {
    /// 硬件加速渲染上下文
    GraphicsAcceleration,
    /// 设备内存提示
    DeviceMemory,
    /// 逻辑处理器数量
    LogicalCores,
    /// 网络有效连接类型
    NetworkClass,
    /// 电池状态
    Battery,
    /// 屏幕尺寸
    ScreenSize,
    /// 移动设备判定
    MobileClass,
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Signal::GraphicsAcceleration => "graphics-acceleration",
            Signal::DeviceMemory => "device-memory",
            Signal::LogicalCores => "logical-cores",
            Signal::NetworkClass => "network-class",
            Signal::Battery => "battery",
            Signal::ScreenSize => "screen-size",
            Signal::MobileClass => "mobile-class",
        };
        f.write_str(name)
    }
}

/// 能力探测错误类型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProbeError {
    /// 平台未暴露该信号
    #[error("signal {signal} is not exposed by this platform")]
    Unavailable { signal: Signal },

    /// 探测过程中出错（权限被拒绝、解析失败等）
    #[error("probing {signal} failed: {reason}")]
    Failed { signal: Signal, reason: String },

    /// 异步探测超时
    #[error("probing {signal} timed out after {timeout_ms}ms")]
    Timeout { signal: Signal, timeout_ms: u64 },
}

impl ProbeError {
    pub fn unavailable(signal: Signal) -> Self {
        ProbeError::Unavailable { signal }
    }

    pub fn failed(signal: Signal, reason: impl Into<String>) -> Self {
        ProbeError::Failed {
            signal,
            reason: reason.into(),
        }
    }

    /// 出错的信号
    pub fn signal(&self) -> Signal {
        match self {
            ProbeError::Unavailable { signal }
            | ProbeError::Failed { signal, .. }
            | ProbeError::Timeout { signal, .. } => *signal,
        }
    }
}

/// 能力探测结果类型
pub type ProbeResult<T> = Result<T, ProbeError>;

/// 错误上下文扩展
pub trait ProbeContext<T> {
    /// 把任意错误转换为指定信号的探测失败
    fn probe_context(self, signal: Signal) -> ProbeResult<T>;
}

impl<T, E: std::error::Error + 'static> ProbeContext<T> for Result<T, E> {
    fn probe_context(self, signal: Signal) -> ProbeResult<T> {
        self.map_err(|e| ProbeError::failed(signal, e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = ProbeError::Timeout {
            signal: Signal::Battery,
            timeout_ms: 500,
        };
        assert_eq!(error.to_string(), "probing battery timed out after 500ms");
        assert_eq!(error.signal(), Signal::Battery);
    }

    #[test]
    fn test_probe_context() {
        let result: Result<u64, std::num::ParseIntError> = "eight".parse::<u64>();
        let err = result.probe_context(Signal::DeviceMemory).unwrap_err();

        assert_eq!(err.signal(), Signal::DeviceMemory);
        assert!(err.to_string().starts_with("probing device-memory failed"));
    }
}
