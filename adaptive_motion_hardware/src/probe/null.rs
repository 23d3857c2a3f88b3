/// 无平台接口时的信号来源

use super::PlatformSignals;
use crate::capability::BatteryStatus;
use crate::error::{ProbeError, ProbeResult, Signal};
use futures::future::{self, FutureExt, LocalBoxFuture};

/// 不提供任何信号的平台
///
/// 探测结果等同于 [`DeviceCapabilities::conservative`](crate::DeviceCapabilities::conservative)。
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSignals;

impl PlatformSignals for NullSignals {
    fn graphics_acceleration(&self) -> ProbeResult<bool> {
        Err(ProbeError::unavailable(Signal::GraphicsAcceleration))
    }

    fn device_memory_gb(&self) -> ProbeResult<f32> {
        Err(ProbeError::unavailable(Signal::DeviceMemory))
    }

    fn logical_cores(&self) -> ProbeResult<u32> {
        Err(ProbeError::unavailable(Signal::LogicalCores))
    }

    fn effective_connection_type(&self) -> ProbeResult<String> {
        Err(ProbeError::unavailable(Signal::NetworkClass))
    }

    fn battery_status(&self) -> LocalBoxFuture<'_, ProbeResult<BatteryStatus>> {
        future::ready(Err(ProbeError::unavailable(Signal::Battery))).boxed_local()
    }

    fn screen_size(&self) -> ProbeResult<(u32, u32)> {
        Err(ProbeError::unavailable(Signal::ScreenSize))
    }

    fn is_mobile(&self) -> ProbeResult<bool> {
        Err(ProbeError::unavailable(Signal::MobileClass))
    }
}

/// 由宿主直接给出的信号
///
/// 适用于从其他渠道得知设备信息的宿主（例如由前端上报），`None`
/// 表示平台未提供该信号。
#[derive(Debug, Clone, Default)]
pub struct StaticSignals {
    pub graphics_acceleration: Option<bool>,
    pub device_memory_gb: Option<f32>,
    pub logical_cores: Option<u32>,
    pub connection_type: Option<String>,
    pub battery: Option<BatteryStatus>,
    /// 电池接口存在但查询失败（例如权限被拒绝）
    pub battery_error: Option<String>,
    pub screen_size: Option<(u32, u32)>,
    pub is_mobile: Option<bool>,
}

fn present<T>(value: Option<T>, signal: Signal) -> ProbeResult<T> {
    value.ok_or(ProbeError::unavailable(signal))
}

impl PlatformSignals for StaticSignals {
    fn graphics_acceleration(&self) -> ProbeResult<bool> {
        present(self.graphics_acceleration, Signal::GraphicsAcceleration)
    }

    fn device_memory_gb(&self) -> ProbeResult<f32> {
        present(self.device_memory_gb, Signal::DeviceMemory)
    }

    fn logical_cores(&self) -> ProbeResult<u32> {
        present(self.logical_cores, Signal::LogicalCores)
    }

    fn effective_connection_type(&self) -> ProbeResult<String> {
        present(self.connection_type.clone(), Signal::NetworkClass)
    }

    fn battery_status(&self) -> LocalBoxFuture<'_, ProbeResult<BatteryStatus>> {
        let result = match &self.battery_error {
            Some(reason) => Err(ProbeError::failed(Signal::Battery, reason.clone())),
            None => present(self.battery, Signal::Battery),
        };
        future::ready(result).boxed_local()
    }

    fn screen_size(&self) -> ProbeResult<(u32, u32)> {
        present(self.screen_size, Signal::ScreenSize)
    }

    fn is_mobile(&self) -> ProbeResult<bool> {
        present(self.is_mobile, Signal::MobileClass)
    }
}
