/// 字符串键值存储后端
///
/// 语义与浏览器 localStorage 相同：键和值都是字符串。

use crate::core::error::{StorageError, StorageResult};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// 键值存储
pub trait KeyValueStorage {
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    fn set(&mut self, key: &str, value: &str) -> StorageResult<()>;

    fn remove(&mut self, key: &str) -> StorageResult<()>;
}

/// 进程内存储
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: BTreeMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> StorageResult<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> StorageResult<()> {
        self.entries.remove(key);
        Ok(())
    }
}

/// 单个JSON对象文件
///
/// 每次写入都重写整个文件。文件损坏时写入会从空对象重新开始。
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    /// `<config_dir>/adaptive_motion/preferences.json`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("adaptive_motion").join("preferences.json"))
    }

    /// 使用默认路径；找不到用户配置目录时返回 `Unavailable`
    pub fn open_default() -> StorageResult<Self> {
        Self::default_path()
            .map(Self::new)
            .ok_or_else(|| StorageError::Unavailable("no user config directory".to_string()))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(&self) -> StorageResult<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        Ok(serde_json::from_str(&content)?)
    }

    fn entries_for_write(&self) -> BTreeMap<String, String> {
        self.read_entries().unwrap_or_else(|e| {
            tracing::warn!(target: "preferences",
                "Discarding unreadable storage file {:?}: {}", self.path, e);
            BTreeMap::new()
        })
    }

    fn write_entries(&self, entries: &BTreeMap<String, String>) -> StorageResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let content = serde_json::to_string_pretty(entries)?;
        fs::write(&self.path, content)?;
        Ok(())
    }
}

impl KeyValueStorage for FileStorage {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.read_entries()?.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> StorageResult<()> {
        let mut entries = self.entries_for_write();
        entries.insert(key.to_string(), value.to_string());
        self.write_entries(&entries)
    }

    fn remove(&mut self, key: &str) -> StorageResult<()> {
        if !self.path.exists() {
            return Ok(());
        }
        let mut entries = self.entries_for_write();
        if entries.remove(key).is_some() {
            self.write_entries(&entries)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_memory_storage() {
        let mut storage = MemoryStorage::new();
        assert_eq!(storage.get("a").unwrap(), None);

        storage.set("a", "1").unwrap();
        assert_eq!(storage.get("a").unwrap().as_deref(), Some("1"));

        storage.remove("a").unwrap();
        assert!(storage.is_empty());
    }

    #[test]
    fn test_file_storage_persists_across_instances() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("preferences.json");

        let mut storage = FileStorage::new(&path);
        storage.set("animationPreferences", r#"{"reducedMotion":true}"#).unwrap();
        storage.set("animationConfigurationState", "\"userConfigured\"").unwrap();

        let reopened = FileStorage::new(&path);
        assert_eq!(
            reopened.get("animationPreferences").unwrap().as_deref(),
            Some(r#"{"reducedMotion":true}"#)
        );
        assert_eq!(reopened.get("missing").unwrap(), None);
    }

    #[test]
    fn test_file_storage_remove() {
        let dir = tempdir().unwrap();
        let mut storage = FileStorage::new(dir.path().join("prefs.json"));

        // 文件不存在时删除不报错
        storage.remove("a").unwrap();

        storage.set("a", "1").unwrap();
        storage.set("b", "2").unwrap();
        storage.remove("a").unwrap();

        assert_eq!(storage.get("a").unwrap(), None);
        assert_eq!(storage.get("b").unwrap().as_deref(), Some("2"));
    }

    #[test]
    fn test_corrupt_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("prefs.json");
        fs::write(&path, "{not json").unwrap();

        let mut storage = FileStorage::new(&path);
        assert!(matches!(storage.get("a"), Err(StorageError::Serialization(_))));

        storage.set("a", "1").unwrap();
        assert_eq!(storage.get("a").unwrap().as_deref(), Some("1"));
    }
}
