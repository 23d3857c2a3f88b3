//! 运行时自适应
//!
//! 每个采样周期（通常一秒）喂入一次帧率，维护移动平均和掉帧计数，
//! 根据阈值给出当前的自适应模式。降级立即生效；恢复需要连续若干个
//! 较好的采样，并且每次只提升一级。

pub mod clock;
pub mod frame_rate;

pub use clock::Clock;
pub use frame_rate::FrameRateMeter;

use crate::config::AdaptiveConfig;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// 自适应模式，按动画质量从低到高排序
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdaptiveMode {
    Minimal,
    Reduced,
    Optimal,
}

impl AdaptiveMode {
    pub fn is_degraded(self) -> bool {
        self != AdaptiveMode::Optimal
    }

    /// 向上一级
    pub fn promoted(self) -> Self {
        match self {
            AdaptiveMode::Minimal => AdaptiveMode::Reduced,
            AdaptiveMode::Reduced | AdaptiveMode::Optimal => AdaptiveMode::Optimal,
        }
    }
}

impl Default for AdaptiveMode {
    fn default() -> Self {
        AdaptiveMode::Optimal
    }
}

impl fmt::Display for AdaptiveMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AdaptiveMode::Minimal => "minimal",
            AdaptiveMode::Reduced => "reduced",
            AdaptiveMode::Optimal => "optimal",
        };
        f.write_str(name)
    }
}

/// 自适应事件
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdaptiveEvent {
    ModeChanged { from: AdaptiveMode, to: AdaptiveMode },
    /// 在同一降级模式下停留了足够长的时间，每段降级只发出一次
    SustainedDegradation(AdaptiveMode),
}

/// 自适应统计快照
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AdaptiveStats {
    pub average_fps: f32,
    pub drop_count: u32,
    pub mode: AdaptiveMode,
    pub ticks: u64,
    pub degraded_ticks: u32,
}

/// 帧率监控器
#[derive(Debug, Clone)]
pub struct AdaptiveMonitor {
    config: AdaptiveConfig,
    average_fps: f32,
    drop_count: u32,
    mode: AdaptiveMode,
    last_decay: Option<Duration>,
    recovery_streak: u32,
    clean_ticks: u32,
    degraded_ticks: u32,
    degradation_reported: bool,
    ticks: u64,
}

impl AdaptiveMonitor {
    pub fn new(config: AdaptiveConfig) -> Self {
        let average_fps = config.initial_fps;
        Self {
            config,
            average_fps,
            drop_count: 0,
            mode: AdaptiveMode::Optimal,
            last_decay: None,
            recovery_streak: 0,
            clean_ticks: 0,
            degraded_ticks: 0,
            degradation_reported: false,
            ticks: 0,
        }
    }

    pub fn mode(&self) -> AdaptiveMode {
        self.mode
    }

    pub fn average_fps(&self) -> f32 {
        self.average_fps
    }

    pub fn drop_count(&self) -> u32 {
        self.drop_count
    }

    pub fn stats(&self) -> AdaptiveStats {
        AdaptiveStats {
            average_fps: self.average_fps,
            drop_count: self.drop_count,
            mode: self.mode,
            ticks: self.ticks,
            degraded_ticks: self.degraded_ticks,
        }
    }

    /// 阈值判定的目标模式
    pub fn target_mode(&self) -> AdaptiveMode {
        let config = &self.config;
        if self.average_fps < config.minimal_fps || self.drop_count > config.minimal_drops {
            AdaptiveMode::Minimal
        } else if self.average_fps < config.reduced_fps || self.drop_count > config.reduced_drops {
            AdaptiveMode::Reduced
        } else {
            AdaptiveMode::Optimal
        }
    }

    /// 记录一次帧率采样
    ///
    /// `now` 是单调时钟读数，只用于掉帧计数的衰减。
    pub fn record_sample(&mut self, fps: f32, now: Duration) -> Vec<AdaptiveEvent> {
        let mut events = Vec::new();
        if !self.config.enabled {
            return events;
        }
        if !fps.is_finite() || fps < 0.0 {
            tracing::debug!(target: "adaptive", "Ignoring invalid frame rate sample {}", fps);
            return events;
        }

        self.ticks += 1;
        let alpha = self.config.smoothing;
        self.average_fps = self.average_fps * (1.0 - alpha) + fps * alpha;

        self.decay_drops(now);
        if fps < self.config.drop_fps {
            self.drop_count += 1;
            self.clean_ticks = 0;
        } else {
            self.clean_ticks += 1;
            if self.clean_ticks >= self.config.recovery_ticks {
                self.drop_count = 0;
            }
        }

        let target = self.target_mode();
        let previous = self.mode;

        if target < self.mode {
            self.mode = target;
            self.recovery_streak = 0;
            // 降得更低时重新开始计算这一段降级
            self.degraded_ticks = 0;
            self.degradation_reported = false;
        } else if target > self.mode {
            self.recovery_streak += 1;
            if self.recovery_streak >= self.config.recovery_ticks {
                self.mode = self.mode.promoted();
                self.recovery_streak = 0;
            }
        } else {
            self.recovery_streak = 0;
        }

        if self.mode != previous {
            if self.mode < previous {
                tracing::warn!(target: "adaptive",
                    "Frame rate {:.1} (avg {:.1}, {} drops): {} -> {}",
                    fps, self.average_fps, self.drop_count, previous, self.mode);
            } else {
                tracing::info!(target: "adaptive",
                    "Performance recovered (avg {:.1}): {} -> {}",
                    self.average_fps, previous, self.mode);
            }
            events.push(AdaptiveEvent::ModeChanged {
                from: previous,
                to: self.mode,
            });
        }

        if self.mode.is_degraded() {
            self.degraded_ticks += 1;
            if self.degraded_ticks >= self.config.sustained_ticks && !self.degradation_reported {
                self.degradation_reported = true;
                tracing::info!(target: "adaptive",
                    "Sustained degradation in {} mode for {} samples", self.mode, self.degraded_ticks);
                events.push(AdaptiveEvent::SustainedDegradation(self.mode));
            }
        } else {
            self.degraded_ticks = 0;
            self.degradation_reported = false;
        }

        events
    }

    /// 清空状态，回到 optimal
    pub fn reset(&mut self) {
        *self = Self::new(self.config.clone());
    }

    fn decay_drops(&mut self, now: Duration) {
        let interval = self.config.drop_decay_interval();
        let last = match self.last_decay {
            Some(last) => last,
            None => {
                self.last_decay = Some(now);
                return;
            }
        };
        if interval.is_zero() || now <= last {
            return;
        }

        let elapsed_intervals = ((now - last).as_secs_f64() / interval.as_secs_f64()) as u32;
        if elapsed_intervals == 0 {
            return;
        }
        self.drop_count = self.drop_count.saturating_sub(elapsed_intervals);
        self.last_decay = Some(last + interval * elapsed_intervals);
    }
}

impl Default for AdaptiveMonitor {
    fn default() -> Self {
        Self::new(AdaptiveConfig::default())
    }
}
