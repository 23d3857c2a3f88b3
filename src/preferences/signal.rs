/// 系统"减少动态效果"信号
///
/// 系统监听器可能运行在其他线程上，通过 [`MotionSignalSender`] 推送新值；
/// 管理器在自己的线程上调用 [`SystemMotionSignal::drain_latest`] 取出最新值。

use crossbeam_channel::{unbounded, Receiver, Sender};

/// 信号接收端
pub struct SystemMotionSignal {
    sender: Sender<bool>,
    receiver: Receiver<bool>,
}

impl SystemMotionSignal {
    pub fn new() -> Self {
        let (sender, receiver) = unbounded();
        Self { sender, receiver }
    }

    pub fn sender(&self) -> MotionSignalSender {
        MotionSignalSender {
            sender: self.sender.clone(),
        }
    }

    /// 取出所有待处理的变化，只返回最后一个
    pub fn drain_latest(&self) -> Option<bool> {
        self.receiver.try_iter().last()
    }
}

impl Default for SystemMotionSignal {
    fn default() -> Self {
        Self::new()
    }
}

/// 信号发送端，可跨线程克隆
#[derive(Clone)]
pub struct MotionSignalSender {
    sender: Sender<bool>,
}

impl MotionSignalSender {
    /// 接收端已释放时返回 `false`
    pub fn notify(&self, reduced_motion: bool) -> bool {
        self.sender.send(reduced_motion).is_ok()
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::{query_reduced_motion, ReducedMotionWatcher};

#[cfg(target_arch = "wasm32")]
mod web {
    use super::MotionSignalSender;
    use wasm_bindgen::closure::Closure;
    use wasm_bindgen::JsCast;
    use web_sys::{MediaQueryList, MediaQueryListEvent};

    const REDUCED_MOTION_QUERY: &str = "(prefers-reduced-motion: reduce)";

    fn media_query() -> Option<MediaQueryList> {
        web_sys::window()?.match_media(REDUCED_MOTION_QUERY).ok()?
    }

    /// 当前的系统设置，浏览器不支持该查询时返回 `None`
    pub fn query_reduced_motion() -> Option<bool> {
        media_query().map(|list| list.matches())
    }

    /// 监听系统设置变化，释放时移除监听器
    pub struct ReducedMotionWatcher {
        list: MediaQueryList,
        callback: Closure<dyn FnMut(MediaQueryListEvent)>,
    }

    impl ReducedMotionWatcher {
        pub fn attach(sender: MotionSignalSender) -> Option<Self> {
            let list = media_query()?;
            let callback = Closure::<dyn FnMut(MediaQueryListEvent)>::new(
                move |event: MediaQueryListEvent| {
                    sender.notify(event.matches());
                },
            );

            if let Err(e) = list
                .add_event_listener_with_callback("change", callback.as_ref().unchecked_ref())
            {
                tracing::warn!(target: "preferences",
                    "Failed to watch reduced-motion changes: {:?}", e);
                return None;
            }

            Some(Self { list, callback })
        }
    }

    impl Drop for ReducedMotionWatcher {
        fn drop(&mut self) {
            let _ = self
                .list
                .remove_event_listener_with_callback("change", self.callback.as_ref().unchecked_ref());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_latest_value_wins() {
        let signal = SystemMotionSignal::new();
        assert_eq!(signal.drain_latest(), None);

        let sender = signal.sender();
        sender.notify(true);
        sender.notify(false);
        sender.notify(true);

        assert_eq!(signal.drain_latest(), Some(true));
        assert_eq!(signal.drain_latest(), None);
    }

    #[test]
    fn test_sender_on_other_thread() {
        let signal = SystemMotionSignal::new();
        let sender = signal.sender();

        thread::spawn(move || {
            assert!(sender.notify(true));
        })
        .join()
        .unwrap();

        assert_eq!(signal.drain_latest(), Some(true));
    }

    #[test]
    fn test_dropped_receiver() {
        let sender = SystemMotionSignal::new().sender();
        assert!(!sender.notify(true));
    }
}
