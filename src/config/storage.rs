use super::{ConfigError, ConfigResult};
use crate::impl_default;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// 偏好存储后端
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// 仅在进程内保存
    Memory,
    /// 本地JSON文件
    File,
    /// 浏览器 localStorage
    Web,
}

/// 偏好存储配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackend,

    /// 文件后端路径，缺省为用户配置目录
    pub path: Option<PathBuf>,

    /// 偏好对象的键
    pub preferences_key: String,

    /// 配置状态的键
    pub state_key: String,
}

impl_default!(StorageConfig {
    backend: StorageBackend::File,
    path: None,
    preferences_key: "animationPreferences".to_string(),
    state_key: "animationConfigurationState".to_string(),
});

impl StorageConfig {
    /// 验证配置
    pub fn validate(&self) -> ConfigResult<()> {
        if self.preferences_key.is_empty() || self.state_key.is_empty() {
            return Err(ConfigError::ValidationError(
                "storage keys must not be empty".to_string(),
            ));
        }
        if self.preferences_key == self.state_key {
            return Err(ConfigError::ValidationError(
                "storage.preferences_key and storage.state_key must differ".to_string(),
            ));
        }
        Ok(())
    }
}
