//! 统一错误处理模块
//!
//! 探测和存储错误都在各自的边界内恢复；只有配置加载会把错误返回给调用方。

use crate::config::ConfigError;
use thiserror::Error;

/// 偏好存储错误
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Storage IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Storage backend unavailable: {0}")]
    Unavailable(String),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// 顶层错误类型
#[derive(Error, Debug)]
pub enum MotionError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

pub type MotionResult<T> = Result<T, MotionError>;
