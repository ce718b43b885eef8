//! 键值存储封装模块
//!
//! 使用 `web_sys::Storage` 提供浏览器 LocalStorage 访问，
//! 并通过 `KeyValueStore` trait 与会话逻辑解耦，测试时可替换为内存实现。

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// 持久化键值存储抽象
///
/// 写入 / 删除返回是否成功，失败不视为致命错误。
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> bool;
    fn delete(&self, key: &str) -> bool;
}

/// 会话等组件共享的存储句柄
pub type SharedStore = Arc<dyn KeyValueStore>;

/// 浏览器 LocalStorage
///
/// 每次操作时重新获取 `Storage` 实例，本身不持有任何 JS 对象。
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStorage;

impl LocalStorage {
    /// 获取 LocalStorage 实例
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()?.local_storage().ok()?
    }

    /// 当前环境是否可用 LocalStorage（隐私模式等情况下可能不可用）
    pub fn is_available() -> bool {
        Self::storage().is_some()
    }
}

impl KeyValueStore for LocalStorage {
    fn get(&self, key: &str) -> Option<String> {
        Self::storage()?.get_item(key).ok()?
    }

    fn set(&self, key: &str, value: &str) -> bool {
        Self::storage()
            .and_then(|s| s.set_item(key, value).ok())
            .is_some()
    }

    fn delete(&self, key: &str) -> bool {
        Self::storage()
            .and_then(|s| s.remove_item(key).ok())
            .is_some()
    }
}

/// 内存存储
///
/// 用于测试，以及 LocalStorage 不可用时的降级（此时会话不跨刷新保留）。
/// 克隆后共享同一份数据，可用来模拟"进程重启后重新读取"。
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> bool {
        match self.entries.lock() {
            Ok(mut entries) => {
                entries.insert(key.to_string(), value.to_string());
                true
            }
            Err(_) => false,
        }
    }

    fn delete(&self, key: &str) -> bool {
        match self.entries.lock() {
            Ok(mut entries) => {
                entries.remove(key);
                true
            }
            Err(_) => false,
        }
    }
}

/// 选择运行环境下可用的存储实现
pub fn default_store() -> SharedStore {
    if LocalStorage::is_available() {
        Arc::new(LocalStorage)
    } else {
        log::warn!("[Storage] LocalStorage unavailable, session will not survive a reload");
        Arc::new(MemoryStorage::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_storage_roundtrip() {
        let store = MemoryStorage::new();
        assert_eq!(store.get("k"), None);
        assert!(store.set("k", "v"));
        assert_eq!(store.get("k").as_deref(), Some("v"));
        assert!(store.delete("k"));
        assert_eq!(store.get("k"), None);
    }

    #[test]
    fn test_memory_storage_clones_share_entries() {
        let store = MemoryStorage::new();
        let other = store.clone();
        store.set("jwtToken", "abc");
        assert_eq!(other.get("jwtToken").as_deref(), Some("abc"));
    }
}
