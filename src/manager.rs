//! 动画管理器
//!
//! 把探测、偏好、自适应和门控串起来。构造是同步的：先用已保存的偏好
//! 渲染第一帧，设备探测完成后再做一次性的自动配置。

use crate::adaptive::{AdaptiveEvent, AdaptiveMode, AdaptiveMonitor, AdaptiveStats, Clock, FrameRateMeter};
use crate::config::{MotionConfig, StorageBackend, StorageConfig};
use crate::gate::{AnimationDecision, AnimationGate, AnimationWeight};
use crate::performance::{PerformanceMode, PerformanceReport, PerformanceTier};
use crate::preferences::{
    FileStorage, KeyValueStorage, ListenerId, MemoryStorage, MotionSignalSender, PreferenceStore,
    PreferenceUpdate, SystemMotionSignal, UserPreferences,
};
use adaptive_motion_hardware::CapabilityProber;
use std::time::Duration;

pub struct MotionManager {
    config: MotionConfig,
    store: PreferenceStore,
    monitor: AdaptiveMonitor,
    meter: FrameRateMeter,
    clock: Clock,
    signal: SystemMotionSignal,
    #[cfg(target_arch = "wasm32")]
    watcher: Option<crate::preferences::signal::ReducedMotionWatcher>,
    report: Option<PerformanceReport>,
}

impl MotionManager {
    /// 创建管理器并读取已保存的偏好
    pub fn new(
        config: MotionConfig,
        storage: Box<dyn KeyValueStorage>,
        system_reduced_motion: bool,
    ) -> Self {
        let system_reduced_motion =
            system_reduced_motion || config.detection.system_reduced_motion;
        let mut store =
            PreferenceStore::from_config(storage, system_reduced_motion, &config.storage);
        store.load();

        Self {
            monitor: AdaptiveMonitor::new(config.adaptive.clone()),
            meter: FrameRateMeter::new(),
            clock: Clock::new(),
            signal: SystemMotionSignal::new(),
            #[cfg(target_arch = "wasm32")]
            watcher: None,
            report: None,
            store,
            config,
        }
    }

    /// 按配置打开存储后端，并接入平台的系统设置
    ///
    /// 浏览器中读取 `prefers-reduced-motion` 并监听它的变化，
    /// 变化在 [`pump_system_events`](Self::pump_system_events) 时生效。
    pub fn with_config(config: MotionConfig) -> Self {
        let storage = open_storage(&config.storage);
        let mut manager = Self::new(config, storage, platform_reduced_motion());
        manager.watch_platform_signal();
        manager
    }

    pub fn config(&self) -> &MotionConfig {
        &self.config
    }

    /// 按配置创建当前平台的探测器
    pub fn prober(&self) -> CapabilityProber {
        CapabilityProber::for_platform()
            .with_battery_timeout(self.config.detection.battery_timeout())
            .with_power_threshold(self.config.detection.power_threshold)
    }

    /// 探测设备性能，首次运行时据此写入偏好
    pub async fn detect(&mut self, prober: &CapabilityProber) -> &PerformanceReport {
        let report = if self.config.detection.enabled {
            let report = PerformanceReport::detect(prober).await;
            self.store.auto_configure(&report.policy);
            report
        } else {
            tracing::info!(target: "motion", "Device detection disabled, assuming a medium device");
            PerformanceReport::fallback()
        };
        self.report.insert(report)
    }

    pub fn report(&self) -> Option<&PerformanceReport> {
        self.report.as_ref()
    }

    pub fn detected_tier(&self) -> Option<PerformanceTier> {
        self.report.as_ref().map(|report| report.tier)
    }

    pub fn detected_score(&self) -> Option<u8> {
        self.report.as_ref().map(|report| report.score)
    }

    /// 当前偏好和自适应模式的门控快照
    pub fn gate(&self) -> AnimationGate {
        AnimationGate::new(self.store.current(), self.monitor.mode())
    }

    pub fn should_animate(&self, weight: AnimationWeight) -> bool {
        self.gate().should_animate(weight)
    }

    pub fn scale_duration(&self, base: Duration) -> Duration {
        self.gate().scale_duration(base)
    }

    pub fn decide(&self, weight: AnimationWeight, base: Duration) -> AnimationDecision {
        self.gate().decide(weight, base)
    }

    pub fn current_preferences(&self) -> &UserPreferences {
        self.store.current()
    }

    pub fn preferences(&self) -> &PreferenceStore {
        &self.store
    }

    pub fn update_preferences(&mut self, update: PreferenceUpdate) -> &UserPreferences {
        self.store.update(update)
    }

    pub fn reset_preferences(&mut self) -> &UserPreferences {
        self.monitor.reset();
        self.store.reset()
    }

    /// 在 minimal 与 balanced 之间切换，返回新的模式
    pub fn toggle_animations(&mut self) -> PerformanceMode {
        let mode = self.store.user_preferences().performance_mode.toggled();
        self.store.update(PreferenceUpdate::performance_mode(mode));
        mode
    }

    pub fn subscribe<F>(&mut self, listener: F) -> ListenerId
    where
        F: FnMut(&UserPreferences) + 'static,
    {
        self.store.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.store.unsubscribe(id)
    }

    /// 逐帧调用，每秒产生一个帧率采样
    pub fn record_frame(&mut self) -> AdaptiveMode {
        let now = self.clock.now();
        self.record_frame_at(now)
    }

    pub fn record_frame_at(&mut self, now: Duration) -> AdaptiveMode {
        if let Some(fps) = self.meter.record_frame(now) {
            self.record_frame_rate_at(fps, now);
        }
        self.monitor.mode()
    }

    /// 直接喂入一次帧率采样
    pub fn record_frame_rate(&mut self, fps: f32) -> AdaptiveMode {
        let now = self.clock.now();
        self.record_frame_rate_at(fps, now)
    }

    pub fn record_frame_rate_at(&mut self, fps: f32, now: Duration) -> AdaptiveMode {
        for event in self.monitor.record_sample(fps, now) {
            if let AdaptiveEvent::SustainedDegradation(mode) = event {
                self.persist_degradation(mode);
            }
        }
        self.monitor.mode()
    }

    pub fn adaptive_mode(&self) -> AdaptiveMode {
        self.monitor.mode()
    }

    pub fn adaptive_stats(&self) -> AdaptiveStats {
        self.monitor.stats()
    }

    pub fn frame_meter(&self) -> &FrameRateMeter {
        &self.meter
    }

    pub fn set_system_reduced_motion(&mut self, reduced_motion: bool) {
        self.store.set_system_reduced_motion(reduced_motion);
    }

    /// 供系统监听器使用的发送端
    pub fn system_signal(&self) -> MotionSignalSender {
        self.signal.sender()
    }

    /// 应用系统监听器推送的最新值，返回是否有更新
    pub fn pump_system_events(&mut self) -> bool {
        match self.signal.drain_latest() {
            Some(reduced_motion) => {
                self.store.set_system_reduced_motion(reduced_motion);
                true
            }
            None => false,
        }
    }

    #[cfg(target_arch = "wasm32")]
    fn watch_platform_signal(&mut self) {
        use crate::preferences::signal::ReducedMotionWatcher;

        self.watcher = ReducedMotionWatcher::attach(self.signal.sender());
        if self.watcher.is_none() {
            tracing::debug!(target: "preferences", "Reduced-motion media query unavailable");
        }
    }

    // 原生平台的系统设置来自配置和 MOTION_REDUCED
    #[cfg(not(target_arch = "wasm32"))]
    fn watch_platform_signal(&mut self) {}

    /// 持续降级时把更低的模式写入偏好
    fn persist_degradation(&mut self, mode: AdaptiveMode) {
        let configured = self.store.user_preferences().performance_mode;
        let demoted = match mode {
            AdaptiveMode::Minimal if configured != PerformanceMode::Minimal => {
                Some(PerformanceMode::Minimal)
            }
            AdaptiveMode::Reduced if configured == PerformanceMode::High => {
                Some(PerformanceMode::Balanced)
            }
            _ => None,
        };

        if let Some(demoted) = demoted {
            self.store.apply_adaptive_demotion(demoted);
        }
    }
}

/// 按配置打开存储后端，不可用时退回进程内存储
pub fn open_storage(config: &StorageConfig) -> Box<dyn KeyValueStorage> {
    match config.backend {
        StorageBackend::Memory => Box::new(MemoryStorage::new()),
        StorageBackend::File => {
            let storage = match &config.path {
                Some(path) => Ok(FileStorage::new(path)),
                None => FileStorage::open_default(),
            };
            match storage {
                Ok(storage) => {
                    tracing::debug!(target: "preferences", "Using preference file {:?}", storage.path());
                    Box::new(storage)
                }
                Err(e) => {
                    tracing::warn!(target: "preferences", "{}, preferences will not persist", e);
                    Box::new(MemoryStorage::new())
                }
            }
        }
        StorageBackend::Web => open_web_storage(),
    }
}

#[cfg(target_arch = "wasm32")]
fn platform_reduced_motion() -> bool {
    crate::preferences::signal::query_reduced_motion().unwrap_or(false)
}

#[cfg(not(target_arch = "wasm32"))]
fn platform_reduced_motion() -> bool {
    false
}

#[cfg(target_arch = "wasm32")]
fn open_web_storage() -> Box<dyn KeyValueStorage> {
    match crate::preferences::WebStorage::local() {
        Ok(storage) => Box::new(storage),
        Err(e) => {
            tracing::warn!(target: "preferences", "{}, preferences will not persist", e);
            Box::new(MemoryStorage::new())
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn open_web_storage() -> Box<dyn KeyValueStorage> {
    tracing::warn!(target: "preferences",
        "Web storage is only available in the browser, preferences will not persist");
    Box::new(MemoryStorage::new())
}
