//! 核心模块
//!
//! - `error` - 错误类型定义
//! - `macros` - 通用宏

pub mod error;
#[macro_use]
pub mod macros;

pub use error::{MotionError, MotionResult, StorageError, StorageResult};
