//! 通用宏定义

/// 为配置结构体实现 `Default`
///
/// 使用示例:
/// ```rust
/// use adaptive_motion::impl_default;
///
/// struct Thresholds {
///     minimal_fps: f32,
///     reduced_fps: f32,
/// }
///
/// impl_default!(Thresholds {
///     minimal_fps: 30.0,
///     reduced_fps: 45.0,
/// });
///
/// assert_eq!(Thresholds::default().minimal_fps, 30.0);
/// ```
#[macro_export]
macro_rules! impl_default {
    ($struct_name:ident {
        $($field:ident: $value:expr),* $(,)?
    }) => {
        impl Default for $struct_name {
            fn default() -> Self {
                Self {
                    $($field: $value),*
                }
            }
        }
    };
}

#[cfg(test)]
mod tests {
    struct Window {
        ticks: u32,
        label: String,
    }

    impl_default!(Window {
        ticks: 5,
        label: "recovery".to_string(),
    });

    #[test]
    fn test_impl_default() {
        let window = Window::default();
        assert_eq!(window.ticks, 5);
        assert_eq!(window.label, "recovery");
    }
}
