/// 单调时钟
///
/// 返回自创建以来经过的时间。浏览器端没有 `Instant`，使用 `Date.now()`。

use std::time::Duration;

#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Clone, Copy)]
pub struct Clock {
    origin: std::time::Instant,
}

#[cfg(not(target_arch = "wasm32"))]
impl Clock {
    pub fn new() -> Self {
        Self {
            origin: std::time::Instant::now(),
        }
    }

    pub fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone, Copy)]
pub struct Clock {
    origin_ms: f64,
}

#[cfg(target_arch = "wasm32")]
impl Clock {
    pub fn new() -> Self {
        Self {
            origin_ms: js_sys::Date::now(),
        }
    }

    pub fn now(&self) -> Duration {
        let elapsed = (js_sys::Date::now() - self.origin_ms).max(0.0);
        Duration::from_secs_f64(elapsed / 1000.0)
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_is_monotonic() {
        let clock = Clock::new();
        let first = clock.now();
        let second = clock.now();
        assert!(second >= first);
    }
}
