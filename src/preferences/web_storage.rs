/// 浏览器 localStorage 后端

use super::storage::KeyValueStorage;
use crate::core::error::{StorageError, StorageResult};
use wasm_bindgen::JsValue;
use web_sys::Storage;

pub struct WebStorage {
    storage: Storage,
}

fn js_error(value: JsValue) -> StorageError {
    StorageError::Unavailable(value.as_string().unwrap_or_else(|| format!("{:?}", value)))
}

impl WebStorage {
    /// 隐私模式或禁用存储时返回 `Unavailable`
    pub fn local() -> StorageResult<Self> {
        let window = web_sys::window()
            .ok_or_else(|| StorageError::Unavailable("no window".to_string()))?;
        let storage = window
            .local_storage()
            .map_err(js_error)?
            .ok_or_else(|| StorageError::Unavailable("localStorage disabled".to_string()))?;
        Ok(Self { storage })
    }
}

impl KeyValueStorage for WebStorage {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        self.storage.get_item(key).map_err(js_error)
    }

    fn set(&mut self, key: &str, value: &str) -> StorageResult<()> {
        self.storage.set_item(key, value).map_err(js_error)
    }

    fn remove(&mut self, key: &str) -> StorageResult<()> {
        self.storage.remove_item(key).map_err(js_error)
    }
}
