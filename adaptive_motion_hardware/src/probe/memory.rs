/// 从屏幕分辨率和设备类别估算内存（GB）
///
/// 仅在平台没有直接提供设备内存时使用。高分屏设备通常配有更多内存。
pub fn estimate_memory_gb(width: u32, height: u32, is_mobile: bool) -> f32 {
    let pixel_count = width as u64 * height as u64;

    if is_mobile {
        if pixel_count > 2_000_000 {
            6.0
        } else {
            4.0
        }
    } else if pixel_count > 8_000_000 {
        16.0 // 4K+
    } else if pixel_count > 4_000_000 {
        8.0 // 2K+
    } else {
        4.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mobile_breakpoints() {
        assert_eq!(estimate_memory_gb(1170, 2532, true), 6.0);
        assert_eq!(estimate_memory_gb(750, 1334, true), 4.0);
        // 恰好2,000,000像素不算高分屏
        assert_eq!(estimate_memory_gb(1000, 2000, true), 4.0);
    }

    #[test]
    fn test_desktop_breakpoints() {
        assert_eq!(estimate_memory_gb(3840, 2160, false), 16.0);
        assert_eq!(estimate_memory_gb(2560, 1600, false), 8.0);
        assert_eq!(estimate_memory_gb(1920, 1080, false), 4.0);
        assert_eq!(estimate_memory_gb(0, 0, false), 4.0);
    }
}
