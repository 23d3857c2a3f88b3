/// 帧率计量
///
/// 把逐帧时间戳汇总成每秒一个帧率采样，同时保留最近的帧时间。

use adaptive_motion_hardware::RingBuffer;
use std::time::Duration;

const SAMPLE_WINDOW: Duration = Duration::from_secs(1);

#[derive(Debug, Clone)]
pub struct FrameRateMeter {
    frame_times_ms: RingBuffer<f32>,
    window: Duration,
    window_start: Option<Duration>,
    last_frame: Option<Duration>,
    frames_in_window: u32,
    last_fps: Option<f32>,
}

impl FrameRateMeter {
    pub fn new() -> Self {
        Self::with_window(SAMPLE_WINDOW)
    }

    pub fn with_window(window: Duration) -> Self {
        Self {
            frame_times_ms: RingBuffer::default(),
            window: window.max(Duration::from_millis(1)),
            window_start: None,
            last_frame: None,
            frames_in_window: 0,
            last_fps: None,
        }
    }

    /// 记录一帧，窗口结束时返回该窗口的平均帧率
    pub fn record_frame(&mut self, now: Duration) -> Option<f32> {
        if let Some(last) = self.last_frame {
            if now < last {
                // 时钟回退，重新开始
                self.window_start = None;
            } else {
                let frame_ms = (now - last).as_secs_f32() * 1000.0;
                self.frame_times_ms.push(frame_ms);
            }
        }
        self.last_frame = Some(now);

        let start = match self.window_start {
            Some(start) => start,
            None => {
                self.window_start = Some(now);
                self.frames_in_window = 0;
                return None;
            }
        };

        self.frames_in_window += 1;
        let elapsed = now - start;
        if elapsed < self.window {
            return None;
        }

        let fps = self.frames_in_window as f32 / elapsed.as_secs_f32();
        self.window_start = Some(now);
        self.frames_in_window = 0;
        self.last_fps = Some(fps);
        Some(fps)
    }

    pub fn last_fps(&self) -> Option<f32> {
        self.last_fps
    }

    pub fn average_frame_time_ms(&self) -> f32 {
        self.frame_times_ms.average()
    }

    /// 最近最慢的一帧
    pub fn worst_frame_time_ms(&self) -> Option<f32> {
        self.frame_times_ms.max()
    }

    pub fn reset(&mut self) {
        *self = Self::with_window(self.window);
    }
}

impl Default for FrameRateMeter {
    fn default() -> Self {
        Self::new()
    }
}
