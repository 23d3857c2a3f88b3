/// 桌面/移动原生平台的信号来源

use super::PlatformSignals;
use crate::capability::BatteryStatus;
use crate::error::{ProbeContext, ProbeError, ProbeResult, Signal};
use futures::future::{self, FutureExt, LocalBoxFuture};

/// 原生平台信号
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeSignals;

impl NativeSignals {
    pub fn new() -> Self {
        Self
    }
}

impl PlatformSignals for NativeSignals {
    #[cfg(feature = "wgpu")]
    fn graphics_acceleration(&self) -> ProbeResult<bool> {
        use wgpu::{Backends, DeviceType, Instance};

        // 实例和适配器只在此作用域内存活
        let instance = Instance::new(wgpu::InstanceDescriptor {
            backends: Backends::all(),
            ..Default::default()
        });
        let accelerated = instance
            .enumerate_adapters(Backends::all())
            .iter()
            .any(|adapter| adapter.get_info().device_type != DeviceType::Cpu);

        Ok(accelerated)
    }

    #[cfg(not(feature = "wgpu"))]
    fn graphics_acceleration(&self) -> ProbeResult<bool> {
        detect_render_node()
    }

    fn device_memory_gb(&self) -> ProbeResult<f32> {
        system_memory_gb()
    }

    fn logical_cores(&self) -> ProbeResult<u32> {
        Ok(num_cpus::get() as u32)
    }

    fn effective_connection_type(&self) -> ProbeResult<String> {
        Err(ProbeError::unavailable(Signal::NetworkClass))
    }

    fn battery_status(&self) -> LocalBoxFuture<'_, ProbeResult<BatteryStatus>> {
        future::ready(read_battery()).boxed_local()
    }

    fn screen_size(&self) -> ProbeResult<(u32, u32)> {
        Err(ProbeError::unavailable(Signal::ScreenSize))
    }

    fn is_mobile(&self) -> ProbeResult<bool> {
        Ok(cfg!(any(target_os = "android", target_os = "ios")))
    }
}

#[cfg(all(not(feature = "wgpu"), target_os = "linux"))]
fn detect_render_node() -> ProbeResult<bool> {
    let entries = std::fs::read_dir("/dev/dri").probe_context(Signal::GraphicsAcceleration)?;
    let found = entries
        .filter_map(Result::ok)
        .any(|entry| entry.file_name().to_string_lossy().starts_with("renderD"));
    Ok(found)
}

#[cfg(all(not(feature = "wgpu"), any(target_os = "macos", target_os = "ios")))]
fn detect_render_node() -> ProbeResult<bool> {
    // 受支持的Apple系统都带Metal
    Ok(true)
}

#[cfg(all(
    not(feature = "wgpu"),
    not(any(target_os = "linux", target_os = "macos", target_os = "ios"))
))]
fn detect_render_node() -> ProbeResult<bool> {
    Err(ProbeError::unavailable(Signal::GraphicsAcceleration))
}

#[cfg(target_os = "linux")]
fn system_memory_gb() -> ProbeResult<f32> {
    let content = std::fs::read_to_string("/proc/meminfo").probe_context(Signal::DeviceMemory)?;
    parse_meminfo(&content)
}

#[cfg(target_os = "macos")]
fn system_memory_gb() -> ProbeResult<f32> {
    use std::process::Command;

    let output = Command::new("sysctl")
        .arg("-n")
        .arg("hw.memsize")
        .output()
        .probe_context(Signal::DeviceMemory)?;
    let text = String::from_utf8(output.stdout).probe_context(Signal::DeviceMemory)?;
    let bytes = text.trim().parse::<u64>().probe_context(Signal::DeviceMemory)?;
    Ok(bytes as f32 / (1024.0 * 1024.0 * 1024.0))
}

#[cfg(not(any(target_os = "linux", target_os = "macos")))]
fn system_memory_gb() -> ProbeResult<f32> {
    Err(ProbeError::unavailable(Signal::DeviceMemory))
}

#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
fn parse_meminfo(content: &str) -> ProbeResult<f32> {
    let line = content
        .lines()
        .find(|line| line.starts_with("MemTotal:"))
        .ok_or_else(|| ProbeError::failed(Signal::DeviceMemory, "MemTotal missing"))?;
    let kb = line
        .split_whitespace()
        .nth(1)
        .ok_or_else(|| ProbeError::failed(Signal::DeviceMemory, "MemTotal has no value"))?
        .parse::<u64>()
        .probe_context(Signal::DeviceMemory)?;
    Ok(bucket_memory_gb(kb as f32 / (1024.0 * 1024.0)))
}

/// 内核保留的部分内存不计入MemTotal，按整数GiB取整
///
/// 不足1 GiB时按0.25 GiB取整，与浏览器`deviceMemory`的粒度一致
#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
fn bucket_memory_gb(raw_gb: f32) -> f32 {
    if raw_gb >= 1.0 {
        raw_gb.round()
    } else {
        ((raw_gb * 4.0).round() / 4.0).max(0.25)
    }
}

#[cfg(target_os = "linux")]
fn read_battery() -> ProbeResult<BatteryStatus> {
    use std::fs;

    let supplies = fs::read_dir("/sys/class/power_supply").probe_context(Signal::Battery)?;
    for entry in supplies.filter_map(Result::ok) {
        let path = entry.path();
        let kind = fs::read_to_string(path.join("type")).unwrap_or_default();
        if kind.trim() != "Battery" {
            continue;
        }

        let percent = fs::read_to_string(path.join("capacity"))
            .probe_context(Signal::Battery)?
            .trim()
            .parse::<f32>()
            .probe_context(Signal::Battery)?;
        let status = fs::read_to_string(path.join("status")).unwrap_or_default();
        return Ok(battery_from_sysfs(percent, status.trim()));
    }

    // 台式机没有电池
    Err(ProbeError::unavailable(Signal::Battery))
}

#[cfg(not(target_os = "linux"))]
fn read_battery() -> ProbeResult<BatteryStatus> {
    Err(ProbeError::unavailable(Signal::Battery))
}

#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
fn battery_from_sysfs(percent: f32, status: &str) -> BatteryStatus {
    BatteryStatus {
        charging: matches!(status, "Charging" | "Full"),
        level: (percent / 100.0).clamp(0.0, 1.0),
    }
}
