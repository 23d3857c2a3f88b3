/// 浏览器平台的信号来源
///
/// 仅使用公开的浏览器接口，不收集任何个人信息。非标准接口
/// （deviceMemory、connection、getBattery）通过反射读取。

use super::PlatformSignals;
use crate::capability::BatteryStatus;
use crate::error::{ProbeError, ProbeResult, Signal};
use futures::future::{FutureExt, LocalBoxFuture};
use js_sys::{Function, Promise, Reflect};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{HtmlCanvasElement, Navigator, Window};

const MOBILE_MARKERS: [&str; 4] = ["Mobile", "Android", "iPhone", "iPad"];

/// 浏览器信号
pub struct WebSignals {
    window: Window,
}

impl WebSignals {
    /// 没有 `window` 对象时（例如 worker 中）返回 `None`
    pub fn new() -> Option<Self> {
        web_sys::window().map(|window| Self { window })
    }

    fn navigator(&self) -> Navigator {
        self.window.navigator()
    }
}

fn property(target: &JsValue, name: &str) -> Option<JsValue> {
    let value = Reflect::get(target, &JsValue::from_str(name)).ok()?;
    if value.is_undefined() || value.is_null() {
        None
    } else {
        Some(value)
    }
}

fn js_reason(value: JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{:?}", value))
}

impl PlatformSignals for WebSignals {
    fn graphics_acceleration(&self) -> ProbeResult<bool> {
        let document = self
            .window
            .document()
            .ok_or_else(|| ProbeError::unavailable(Signal::GraphicsAcceleration))?;
        let canvas: HtmlCanvasElement = document
            .create_element("canvas")
            .map_err(|e| ProbeError::failed(Signal::GraphicsAcceleration, js_reason(e)))?
            .dyn_into()
            .map_err(|_| ProbeError::failed(Signal::GraphicsAcceleration, "not a canvas"))?;

        let has_context = ["webgl", "experimental-webgl"]
            .iter()
            .any(|kind| matches!(canvas.get_context(kind), Ok(Some(_))));

        canvas.remove();
        Ok(has_context)
    }

    fn device_memory_gb(&self) -> ProbeResult<f32> {
        property(self.navigator().as_ref(), "deviceMemory")
            .and_then(|value| value.as_f64())
            .map(|gb| gb as f32)
            .ok_or_else(|| ProbeError::unavailable(Signal::DeviceMemory))
    }

    fn logical_cores(&self) -> ProbeResult<u32> {
        let cores = self.navigator().hardware_concurrency();
        if cores.is_finite() && cores >= 1.0 {
            Ok(cores as u32)
        } else {
            Err(ProbeError::unavailable(Signal::LogicalCores))
        }
    }

    fn effective_connection_type(&self) -> ProbeResult<String> {
        let navigator = self.navigator();
        let connection = ["connection", "mozConnection", "webkitConnection"]
            .iter()
            .find_map(|name| property(navigator.as_ref(), name))
            .ok_or_else(|| ProbeError::unavailable(Signal::NetworkClass))?;

        property(&connection, "effectiveType")
            .or_else(|| property(&connection, "type"))
            .and_then(|value| value.as_string())
            .ok_or_else(|| ProbeError::unavailable(Signal::NetworkClass))
    }

    fn battery_status(&self) -> LocalBoxFuture<'_, ProbeResult<BatteryStatus>> {
        let navigator = self.navigator();
        async move {
            let get_battery: Function = property(navigator.as_ref(), "getBattery")
                .and_then(|value| value.dyn_into().ok())
                .ok_or_else(|| ProbeError::unavailable(Signal::Battery))?;

            let promise: Promise = get_battery
                .call0(navigator.as_ref())
                .map_err(|e| ProbeError::failed(Signal::Battery, js_reason(e)))?
                .dyn_into()
                .map_err(|_| ProbeError::failed(Signal::Battery, "getBattery did not return a promise"))?;

            let battery = JsFuture::from(promise)
                .await
                .map_err(|e| ProbeError::failed(Signal::Battery, js_reason(e)))?;

            let charging = property(&battery, "charging")
                .and_then(|value| value.as_bool())
                .unwrap_or(false);
            let level = property(&battery, "level")
                .and_then(|value| value.as_f64())
                .unwrap_or(1.0);

            Ok(BatteryStatus {
                charging,
                level: level as f32,
            })
        }
        .boxed_local()
    }

    fn screen_size(&self) -> ProbeResult<(u32, u32)> {
        let screen = self
            .window
            .screen()
            .map_err(|e| ProbeError::failed(Signal::ScreenSize, js_reason(e)))?;
        let width = screen
            .width()
            .map_err(|e| ProbeError::failed(Signal::ScreenSize, js_reason(e)))?;
        let height = screen
            .height()
            .map_err(|e| ProbeError::failed(Signal::ScreenSize, js_reason(e)))?;
        Ok((width.max(0) as u32, height.max(0) as u32))
    }

    fn is_mobile(&self) -> ProbeResult<bool> {
        let user_agent = self
            .navigator()
            .user_agent()
            .map_err(|e| ProbeError::failed(Signal::MobileClass, js_reason(e)))?;
        Ok(MOBILE_MARKERS.iter().any(|marker| user_agent.contains(marker)))
    }
}
