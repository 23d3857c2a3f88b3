//! 设备能力探测
//!
//! 每个平台提供一个 [`PlatformSignals`] 实现，启动时选择一次。
//! [`CapabilityProber`] 逐个读取信号，任何一个信号缺失或出错都只会
//! 替换为该信号的默认值，探测本身永远不会失败。

mod memory;
mod null;
#[cfg(not(target_arch = "wasm32"))]
mod native;
#[cfg(target_arch = "wasm32")]
mod web;

pub use memory::estimate_memory_gb;
pub use null::{NullSignals, StaticSignals};
#[cfg(not(target_arch = "wasm32"))]
pub use native::NativeSignals;
#[cfg(target_arch = "wasm32")]
pub use web::WebSignals;

use crate::capability::{
    BatteryStatus, DeviceCapabilities, NetworkClass, DEFAULT_LOGICAL_CORES,
    DEFAULT_POWER_THRESHOLD,
};
use crate::error::{ProbeError, ProbeResult, Signal};
use futures::future::LocalBoxFuture;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// 默认的电池探测超时
pub const DEFAULT_BATTERY_TIMEOUT: Duration = Duration::from_millis(500);

/// 平台信号来源
///
/// 每个方法对应一个可选的平台接口。平台不提供时返回
/// [`ProbeError::Unavailable`]，由探测器决定回退值。
pub trait PlatformSignals {
    /// 尝试创建硬件加速渲染上下文
    ///
    /// 实现必须在返回前释放为检测而创建的任何资源。
    fn graphics_acceleration(&self) -> ProbeResult<bool>;

    /// 平台直接提供的设备内存（GB）
    fn device_memory_gb(&self) -> ProbeResult<f32>;

    /// 逻辑处理器数量
    fn logical_cores(&self) -> ProbeResult<u32>;

    /// 有效连接类型，例如 `"4g"`
    fn effective_connection_type(&self) -> ProbeResult<String>;

    /// 电池状态，需要异步句柄
    fn battery_status(&self) -> LocalBoxFuture<'_, ProbeResult<BatteryStatus>>;

    /// 屏幕像素尺寸
    fn screen_size(&self) -> ProbeResult<(u32, u32)>;

    /// 是否为移动设备
    fn is_mobile(&self) -> ProbeResult<bool>;
}

/// 选择当前平台的默认信号来源
#[cfg(not(target_arch = "wasm32"))]
pub fn platform_signals() -> Box<dyn PlatformSignals> {
    Box::new(NativeSignals::new())
}

/// 选择当前平台的默认信号来源
#[cfg(target_arch = "wasm32")]
pub fn platform_signals() -> Box<dyn PlatformSignals> {
    match WebSignals::new() {
        Some(signals) => Box::new(signals),
        None => Box::new(NullSignals),
    }
}

/// 一次完整探测的结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbeReport {
    pub capabilities: DeviceCapabilities,
    /// 使用了回退值的信号
    pub fallbacks: Vec<Signal>,
}

impl ProbeReport {
    /// 所有信号是否都来自平台
    pub fn is_complete(&self) -> bool {
        self.fallbacks.is_empty()
    }
}

/// 设备信息摘要（调试用，不含个人信息）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceInfo {
    pub screen: Option<String>,
    pub is_mobile: Option<bool>,
    pub logical_cores: Option<u32>,
}

/// 能力探测器
pub struct CapabilityProber {
    signals: Box<dyn PlatformSignals>,
    #[cfg_attr(target_arch = "wasm32", allow(dead_code))]
    battery_timeout: Duration,
    power_threshold: f32,
}

impl CapabilityProber {
    pub fn new(signals: Box<dyn PlatformSignals>) -> Self {
        Self {
            signals,
            battery_timeout: DEFAULT_BATTERY_TIMEOUT,
            power_threshold: DEFAULT_POWER_THRESHOLD,
        }
    }

    /// 使用当前平台的默认信号来源
    pub fn for_platform() -> Self {
        Self::new(platform_signals())
    }

    pub fn with_battery_timeout(mut self, timeout: Duration) -> Self {
        self.battery_timeout = timeout;
        self
    }

    pub fn with_power_threshold(mut self, threshold: f32) -> Self {
        self.power_threshold = threshold;
        self
    }

    /// 探测设备能力，永远返回可用结果
    pub async fn probe(&self) -> DeviceCapabilities {
        self.probe_with_report().await.capabilities
    }

    /// 探测设备能力，并记录哪些信号使用了回退值
    pub async fn probe_with_report(&self) -> ProbeReport {
        let mut fallbacks = Vec::new();

        let has_graphics_acceleration =
            fallback(self.signals.graphics_acceleration(), false, &mut fallbacks);

        let memory_estimate_gb = match self.signals.device_memory_gb() {
            Ok(gb) if gb > 0.0 => gb,
            Ok(gb) => {
                let err = ProbeError::failed(Signal::DeviceMemory, format!("implausible value {gb}"));
                record(&err, &mut fallbacks);
                self.estimate_memory()
            }
            Err(err) => {
                record(&err, &mut fallbacks);
                self.estimate_memory()
            }
        };

        let logical_cores = match self.signals.logical_cores() {
            Ok(0) => {
                let err = ProbeError::failed(Signal::LogicalCores, "reported zero cores");
                record(&err, &mut fallbacks);
                DEFAULT_LOGICAL_CORES
            }
            other => fallback(other, DEFAULT_LOGICAL_CORES, &mut fallbacks),
        };

        let network_class = self
            .signals
            .effective_connection_type()
            .map(|value| NetworkClass::from_effective_type(&value));
        let network_class = fallback(network_class, NetworkClass::Unknown, &mut fallbacks);

        let battery = self.probe_battery().await;
        let has_sufficient_power = match battery {
            Ok(status) => status.is_sufficient(self.power_threshold),
            Err(err) => {
                record(&err, &mut fallbacks);
                true
            }
        };

        let capabilities = DeviceCapabilities {
            has_graphics_acceleration,
            memory_estimate_gb,
            logical_cores,
            network_class,
            has_sufficient_power,
        };

        tracing::debug!(target: "probe",
            "Probed capabilities: {:?} ({} fallbacks)", capabilities, fallbacks.len());

        ProbeReport {
            capabilities,
            fallbacks,
        }
    }

    /// 调试用设备摘要
    pub fn device_info(&self) -> DeviceInfo {
        DeviceInfo {
            screen: self
                .signals
                .screen_size()
                .ok()
                .map(|(w, h)| format!("{w}x{h}")),
            is_mobile: self.signals.is_mobile().ok(),
            logical_cores: self.signals.logical_cores().ok(),
        }
    }

    fn estimate_memory(&self) -> f32 {
        let (width, height) = self.signals.screen_size().unwrap_or((0, 0));
        let is_mobile = self.signals.is_mobile().unwrap_or(false);
        estimate_memory_gb(width, height, is_mobile)
    }

    // 只有在tokio运行时中才能使用计时器，其他执行器直接等待
    #[cfg(not(target_arch = "wasm32"))]
    async fn probe_battery(&self) -> ProbeResult<BatteryStatus> {
        if tokio::runtime::Handle::try_current().is_err() {
            tracing::debug!(target: "probe", "No tokio runtime, battery probe runs without timeout");
            return self.signals.battery_status().await;
        }

        match tokio::time::timeout(self.battery_timeout, self.signals.battery_status()).await {
            Ok(result) => result,
            Err(_) => Err(ProbeError::Timeout {
                signal: Signal::Battery,
                timeout_ms: self.battery_timeout.as_millis() as u64,
            }),
        }
    }

    // 浏览器端没有tokio计时器，getBattery自身会很快resolve或reject
    #[cfg(target_arch = "wasm32")]
    async fn probe_battery(&self) -> ProbeResult<BatteryStatus> {
        self.signals.battery_status().await
    }
}

fn fallback<T>(result: ProbeResult<T>, default: T, fallbacks: &mut Vec<Signal>) -> T {
    match result {
        Ok(value) => value,
        Err(err) => {
            record(&err, fallbacks);
            default
        }
    }
}

fn record(err: &ProbeError, fallbacks: &mut Vec<Signal>) {
    match err {
        ProbeError::Unavailable { .. } => {
            tracing::debug!(target: "probe", "{}, using default", err);
        }
        _ => {
            tracing::warn!(target: "probe", "{}, using default", err);
        }
    }
    fallbacks.push(err.signal());
}
