/// 统一配置系统
///
/// 提供TOML/JSON配置文件、环境变量覆盖和配置验证
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub mod adaptive;
pub mod detection;
pub mod storage;

pub use adaptive::AdaptiveConfig;
pub use detection::DetectionConfig;
pub use storage::{StorageBackend, StorageConfig};

use crate::impl_default;

/// 配置错误
#[derive(Error, Debug)]
pub enum ConfigError {
    /// 文件读取错误
    #[error("Config file error: {0}")]
    FileError(#[from] std::io::Error),
    /// 解析错误
    #[error("Config parse error: {0}")]
    ParseError(String),
    /// 验证错误
    #[error("Config validation error: {0}")]
    ValidationError(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// 主配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MotionConfig {
    /// 设备探测
    #[serde(default)]
    pub detection: DetectionConfig,

    /// 运行时自适应
    #[serde(default)]
    pub adaptive: AdaptiveConfig,

    /// 偏好存储
    #[serde(default)]
    pub storage: StorageConfig,

    /// 日志
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl MotionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// 从TOML文件加载配置
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// 从TOML字符串解析配置
    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// 从JSON文件加载配置
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// 从JSON字符串解析配置
    pub fn from_json_str(content: &str) -> ConfigResult<Self> {
        serde_json::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// 按扩展名加载配置文件
    pub fn from_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let path = path.as_ref();
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json_file(path),
            _ => Self::from_toml_file(path),
        }
    }

    /// 保存为TOML文件
    pub fn save_toml<P: AsRef<Path>>(&self, path: P) -> ConfigResult<()> {
        let content =
            toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        fs::write(path, content).map_err(ConfigError::FileError)
    }

    /// 保存为JSON文件
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> ConfigResult<()> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;
        fs::write(path, content).map_err(ConfigError::FileError)
    }

    /// 从环境变量覆盖配置
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| env::var(key).ok());
    }

    fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(val) = lookup("MOTION_DETECTION_ENABLED") {
            self.detection.enabled = val.parse().unwrap_or(self.detection.enabled);
        }
        if let Some(val) = lookup("MOTION_BATTERY_TIMEOUT_MS") {
            if let Ok(timeout) = val.parse() {
                self.detection.battery_timeout_ms = timeout;
            }
        }
        if let Some(val) = lookup("MOTION_REDUCED") {
            self.detection.system_reduced_motion =
                val.parse().unwrap_or(self.detection.system_reduced_motion);
        }
        if let Some(val) = lookup("MOTION_ADAPTIVE_ENABLED") {
            self.adaptive.enabled = val.parse().unwrap_or(self.adaptive.enabled);
        }
        if let Some(val) = lookup("MOTION_STORAGE_BACKEND") {
            match val.to_ascii_lowercase().as_str() {
                "memory" => self.storage.backend = StorageBackend::Memory,
                "file" => self.storage.backend = StorageBackend::File,
                "web" => self.storage.backend = StorageBackend::Web,
                other => {
                    tracing::warn!(target: "config", "Ignoring unknown storage backend {:?}", other);
                }
            }
        }
        if let Some(val) = lookup("MOTION_STORAGE_PATH") {
            self.storage.path = Some(PathBuf::from(val));
        }
        if let Some(val) = lookup("MOTION_LOG_LEVEL") {
            if let Some(level) = LogLevel::parse(&val) {
                self.logging.level = level;
            }
        }
    }

    /// 验证配置
    pub fn validate(&self) -> ConfigResult<()> {
        self.detection.validate()?;
        self.adaptive.validate()?;
        self.storage.validate()?;
        Ok(())
    }

    /// 配置文件的查找顺序
    ///
    /// 1. ./motion.toml
    /// 2. ./motion.json
    /// 3. ~/.config/adaptive_motion/motion.toml
    pub fn candidate_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from("motion.toml"), PathBuf::from("motion.json")];
        if let Some(dir) = dirs::config_dir() {
            paths.push(dir.join("adaptive_motion").join("motion.toml"));
        }
        paths
    }

    /// 自动查找并加载配置文件，返回配置及其来源
    pub fn load_with_source() -> (Self, Option<PathBuf>) {
        for path in Self::candidate_paths() {
            if !path.exists() {
                continue;
            }
            match Self::from_file(&path) {
                Ok(config) => return (config, Some(path)),
                Err(e) => {
                    tracing::warn!(target: "config", "Skipping {:?}: {}", path, e);
                }
            }
        }
        (Self::default(), None)
    }

    /// 自动查找并加载配置文件，找不到时使用默认配置
    pub fn load_or_default() -> Self {
        Self::load_with_source().0
    }
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// 日志级别（`RUST_LOG` 优先）
    pub level: LogLevel,

    /// 是否输出到控制台
    pub log_to_console: bool,
}

impl_default!(LoggingConfig {
    level: LogLevel::Info,
    log_to_console: true,
});

/// 日志级别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "trace" => Some(LogLevel::Trace),
            "debug" => Some(LogLevel::Debug),
            "info" => Some(LogLevel::Info),
            "warn" | "warning" => Some(LogLevel::Warn),
            "error" => Some(LogLevel::Error),
            _ => None,
        }
    }

    /// `EnvFilter` 指令
    pub fn as_directive(self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = MotionConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.storage.preferences_key, "animationPreferences");
        assert_eq!(config.adaptive.reduced_fps, 45.0);
    }

    #[test]
    fn test_partial_toml() {
        let config = MotionConfig::from_toml_str(
            r#"
            [detection]
            enabled = false

            [adaptive]
            recovery_ticks = 8

            [storage]
            backend = "memory"
            "#,
        )
        .unwrap();

        assert!(!config.detection.enabled);
        assert_eq!(config.detection.battery_timeout_ms, 500);
        assert_eq!(config.adaptive.recovery_ticks, 8);
        assert_eq!(config.adaptive.sustained_ticks, 10);
        assert_eq!(config.storage.backend, StorageBackend::Memory);
        assert_eq!(config.logging.level, LogLevel::Info);
    }

    #[test]
    fn test_json_serialization() {
        let config = MotionConfig::default();
        let json_str = serde_json::to_string(&config).unwrap();
        let parsed = MotionConfig::from_json_str(&json_str).unwrap();
        assert_eq!(config.adaptive.minimal_fps, parsed.adaptive.minimal_fps);
    }

    #[test]
    fn test_invalid_toml_is_parse_error() {
        let err = MotionConfig::from_toml_str("[detection\nenabled = ").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn test_validation_rejects_inverted_thresholds() {
        let mut config = MotionConfig::default();
        config.adaptive.minimal_fps = 50.0;
        assert!(matches!(config.validate(), Err(ConfigError::ValidationError(_))));

        let mut config = MotionConfig::default();
        config.detection.power_threshold = 1.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [
            ("MOTION_REDUCED", "true"),
            ("MOTION_STORAGE_BACKEND", "Memory"),
            ("MOTION_BATTERY_TIMEOUT_MS", "250"),
            ("MOTION_LOG_LEVEL", "debug"),
            ("MOTION_ADAPTIVE_ENABLED", "not-a-bool"),
        ]
        .into_iter()
        .collect();

        let mut config = MotionConfig::default();
        config.apply_overrides(|key| vars.get(key).map(|v| v.to_string()));

        assert!(config.detection.system_reduced_motion);
        assert_eq!(config.storage.backend, StorageBackend::Memory);
        assert_eq!(config.detection.battery_timeout_ms, 250);
        assert_eq!(config.logging.level, LogLevel::Debug);
        // 无法解析的值保持原样
        assert!(config.adaptive.enabled);
    }

    #[test]
    fn test_save_and_reload_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("motion.toml");

        let mut config = MotionConfig::default();
        config.adaptive.sustained_ticks = 20;
        config.save_toml(&path).unwrap();

        let loaded = MotionConfig::from_file(&path).unwrap();
        assert_eq!(loaded.adaptive.sustained_ticks, 20);
    }
}
