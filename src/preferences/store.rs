/// 偏好存储
///
/// 会话内以内存状态为准：存储读写失败只记录日志，不会中断调用方。
/// 用户自己的 reduced_motion 与系统信号分开保存，对外提供两者合并后的视图。

use super::state::{ConfigurationState, LEGACY_AUTO_CONFIGURED_KEY, LEGACY_USER_CONFIGURED_KEY};
use super::storage::KeyValueStorage;
use super::{PreferenceUpdate, UserPreferences};
use crate::config::StorageConfig;
use crate::performance::{AnimationPolicy, PerformanceMode};
use serde::de::DeserializeOwned;

/// 订阅句柄
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener = Box<dyn FnMut(&UserPreferences)>;

pub struct PreferenceStore {
    storage: Box<dyn KeyValueStorage>,
    preferences_key: String,
    state_key: String,
    /// 用户偏好（持久化的部分）
    stored: UserPreferences,
    system_reduced_motion: bool,
    /// 对外视图
    effective: UserPreferences,
    state: ConfigurationState,
    /// 自动配置之前已持久化的降级，自动配置不会高于它
    prior_demotion: Option<PerformanceMode>,
    listeners: Vec<(ListenerId, Listener)>,
    next_listener: u64,
}

impl PreferenceStore {
    /// 创建存储；调用 [`load`](Self::load) 之前使用默认偏好
    pub fn open(storage: Box<dyn KeyValueStorage>, system_reduced_motion: bool) -> Self {
        let defaults = StorageConfig::default();
        Self::with_keys(
            storage,
            system_reduced_motion,
            defaults.preferences_key,
            defaults.state_key,
        )
    }

    pub fn from_config(
        storage: Box<dyn KeyValueStorage>,
        system_reduced_motion: bool,
        config: &StorageConfig,
    ) -> Self {
        Self::with_keys(
            storage,
            system_reduced_motion,
            config.preferences_key.clone(),
            config.state_key.clone(),
        )
    }

    fn with_keys(
        storage: Box<dyn KeyValueStorage>,
        system_reduced_motion: bool,
        preferences_key: String,
        state_key: String,
    ) -> Self {
        let stored = UserPreferences::default();
        Self {
            storage,
            preferences_key,
            state_key,
            stored,
            system_reduced_motion,
            effective: merge_system(stored, system_reduced_motion),
            state: ConfigurationState::NeverConfigured,
            prior_demotion: None,
            listeners: Vec::new(),
            next_listener: 0,
        }
    }

    /// 读取持久化的偏好和配置状态
    ///
    /// 只读不写，可以重复调用。
    pub fn load(&mut self) -> &UserPreferences {
        let persisted: Option<UserPreferences> = self.read_json(&self.preferences_key);
        let state = self.read_state();

        self.state = match state {
            ConfigurationState::AutoConfigured if persisted.is_none() => {
                tracing::debug!(target: "preferences",
                    "Auto-configured flag without preferences, will configure again");
                ConfigurationState::NeverConfigured
            }
            other => other,
        };
        // 从未配置却有持久化偏好，说明探测之前已经记录过降级
        self.prior_demotion = match (&persisted, self.state) {
            (Some(prefs), ConfigurationState::NeverConfigured) => Some(prefs.performance_mode),
            _ => None,
        };
        self.stored = persisted.map(UserPreferences::sanitized).unwrap_or_default();

        tracing::debug!(target: "preferences",
            "Loaded preferences ({}): {:?}", self.state, self.stored);

        self.refresh();
        &self.effective
    }

    /// 合并了系统信号的当前偏好
    pub fn current(&self) -> &UserPreferences {
        &self.effective
    }

    /// 用户自己的偏好，不含系统信号
    pub fn user_preferences(&self) -> &UserPreferences {
        &self.stored
    }

    pub fn state(&self) -> ConfigurationState {
        self.state
    }

    pub fn system_reduced_motion(&self) -> bool {
        self.system_reduced_motion
    }

    /// 用户修改偏好
    pub fn update(&mut self, update: PreferenceUpdate) -> &UserPreferences {
        self.stored.merge(&update);
        self.stored = self.stored.sanitized();
        self.persist_preferences();
        self.set_state(ConfigurationState::UserConfigured);

        tracing::info!(target: "preferences", "Preferences updated: {:?}", self.stored);

        self.refresh();
        &self.effective
    }

    /// 首次探测后的一次性自动配置
    ///
    /// 只在从未配置过时生效，返回是否写入了偏好。
    /// 探测之前已持久化的降级会限制推荐的模式。
    pub fn auto_configure(&mut self, policy: &AnimationPolicy) -> bool {
        if !self.state.allows_auto_configure() {
            tracing::debug!(target: "preferences",
                "Skipping auto-configuration, state is {}", self.state);
            return false;
        }

        let mut configured = UserPreferences::from_policy(policy, self.stored.reduced_motion);
        if let Some(demoted) = self.prior_demotion.take() {
            if demoted < configured.performance_mode {
                tracing::debug!(target: "preferences",
                    "Keeping earlier adaptive demotion to {} over {}",
                    demoted, configured.performance_mode);
                configured.performance_mode = demoted;
            }
        }
        self.stored = configured;
        self.persist_preferences();
        self.set_state(ConfigurationState::AutoConfigured);

        tracing::info!(target: "preferences",
            "Auto-configured {} mode from device performance", policy.performance_mode);

        self.refresh();
        true
    }

    /// 持久化运行时的持续降级，不改变配置状态
    pub fn apply_adaptive_demotion(&mut self, mode: PerformanceMode) -> bool {
        if self.stored.performance_mode == mode {
            return false;
        }

        tracing::info!(target: "preferences",
            "Persisting adaptive demotion {} -> {}", self.stored.performance_mode, mode);

        self.stored.performance_mode = mode;
        if self.state == ConfigurationState::NeverConfigured {
            self.prior_demotion = Some(mode);
        }
        self.persist_preferences();
        self.refresh();
        true
    }

    /// 系统设置变化；不持久化，也不覆盖用户自己的设置
    pub fn set_system_reduced_motion(&mut self, reduced_motion: bool) {
        if self.system_reduced_motion == reduced_motion {
            return;
        }
        tracing::debug!(target: "preferences", "System reduced motion: {}", reduced_motion);
        self.system_reduced_motion = reduced_motion;
        self.refresh();
    }

    /// 恢复默认偏好并清除持久化数据
    pub fn reset(&mut self) -> &UserPreferences {
        self.stored = UserPreferences::default();
        self.state = ConfigurationState::NeverConfigured;
        self.prior_demotion = None;

        let keys = [
            self.preferences_key.clone(),
            self.state_key.clone(),
            LEGACY_USER_CONFIGURED_KEY.to_string(),
            LEGACY_AUTO_CONFIGURED_KEY.to_string(),
        ];
        for key in &keys {
            if let Err(e) = self.storage.remove(key) {
                tracing::warn!(target: "preferences", "Failed to remove {}: {}", key, e);
            }
        }

        tracing::info!(target: "preferences", "Preferences reset to defaults");

        self.refresh();
        &self.effective
    }

    /// 订阅偏好变化，回调收到新的合并视图
    pub fn subscribe<F>(&mut self, listener: F) -> ListenerId
    where
        F: FnMut(&UserPreferences) + 'static,
    {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() != before
    }

    /// 重新计算对外视图，变化时通知订阅者
    fn refresh(&mut self) {
        let effective = merge_system(self.stored, self.system_reduced_motion);
        if effective == self.effective {
            return;
        }
        self.effective = effective;
        for (_, listener) in self.listeners.iter_mut() {
            listener(&effective);
        }
    }

    fn set_state(&mut self, state: ConfigurationState) {
        self.state = state;
        match serde_json::to_string(&state) {
            Ok(value) => self.write(&self.state_key.clone(), &value),
            Err(e) => {
                tracing::warn!(target: "preferences", "Failed to serialize state: {}", e);
            }
        }
    }

    fn persist_preferences(&mut self) {
        match serde_json::to_string(&self.stored) {
            Ok(value) => self.write(&self.preferences_key.clone(), &value),
            Err(e) => {
                tracing::warn!(target: "preferences", "Failed to serialize preferences: {}", e);
            }
        }
    }

    fn write(&mut self, key: &str, value: &str) {
        if let Err(e) = self.storage.set(key, value) {
            tracing::warn!(target: "preferences",
                "Failed to persist {}: {}, keeping in-memory value", key, e);
        }
    }

    fn read_raw(&self, key: &str) -> Option<String> {
        match self.storage.get(key) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(target: "preferences", "Failed to read {}: {}", key, e);
                None
            }
        }
    }

    fn read_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.read_raw(key)?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(target: "preferences",
                    "Ignoring corrupt value under {}: {}", key, e);
                None
            }
        }
    }

    fn read_state(&self) -> ConfigurationState {
        if let Some(state) = self.read_json(&self.state_key) {
            return state;
        }
        let user = self.read_raw(LEGACY_USER_CONFIGURED_KEY);
        let auto = self.read_raw(LEGACY_AUTO_CONFIGURED_KEY);
        ConfigurationState::from_legacy_flags(user.as_deref(), auto.as_deref())
    }
}

fn merge_system(stored: UserPreferences, system_reduced_motion: bool) -> UserPreferences {
    UserPreferences {
        reduced_motion: stored.reduced_motion || system_reduced_motion,
        ..stored
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::{StorageError, StorageResult};
    use crate::performance::PerformanceTier;
    use crate::preferences::MemoryStorage;
    use adaptive_motion_hardware::DeviceCapabilities;
    use std::cell::RefCell;
    use std::collections::BTreeMap;
    use std::rc::Rc;

    /// 多个存储实例共享同一份数据，模拟应用重启
    #[derive(Clone, Default)]
    struct SharedStorage(Rc<RefCell<BTreeMap<String, String>>>);

    impl KeyValueStorage for SharedStorage {
        fn get(&self, key: &str) -> StorageResult<Option<String>> {
            Ok(self.0.borrow().get(key).cloned())
        }

        fn set(&mut self, key: &str, value: &str) -> StorageResult<()> {
            self.0.borrow_mut().insert(key.to_string(), value.to_string());
            Ok(())
        }

        fn remove(&mut self, key: &str) -> StorageResult<()> {
            self.0.borrow_mut().remove(key);
            Ok(())
        }
    }

    struct BrokenStorage;

    impl KeyValueStorage for BrokenStorage {
        fn get(&self, _key: &str) -> StorageResult<Option<String>> {
            Err(StorageError::Unavailable("quota".to_string()))
        }

        fn set(&mut self, _key: &str, _value: &str) -> StorageResult<()> {
            Err(StorageError::Unavailable("quota".to_string()))
        }

        fn remove(&mut self, _key: &str) -> StorageResult<()> {
            Err(StorageError::Unavailable("quota".to_string()))
        }
    }

    fn policy(tier: PerformanceTier) -> AnimationPolicy {
        AnimationPolicy::recommend(tier, &DeviceCapabilities::conservative())
    }

    #[test]
    fn test_load_defaults_when_empty() {
        let mut store = PreferenceStore::open(Box::new(MemoryStorage::new()), false);
        assert_eq!(*store.load(), UserPreferences::default());
        assert_eq!(store.state(), ConfigurationState::NeverConfigured);
    }

    #[test]
    fn test_load_is_idempotent() {
        let shared = SharedStorage::default();
        let mut store = PreferenceStore::open(Box::new(shared.clone()), false);
        store.update(PreferenceUpdate::performance_mode(PerformanceMode::High));

        let first = *store.load();
        let snapshot = shared.0.borrow().clone();
        let second = *store.load();

        assert_eq!(first, second);
        assert_eq!(*shared.0.borrow(), snapshot);
    }

    #[test]
    fn test_auto_configure_only_once_across_restarts() {
        let shared = SharedStorage::default();

        let mut store = PreferenceStore::open(Box::new(shared.clone()), false);
        store.load();
        assert!(store.auto_configure(&policy(PerformanceTier::Low)));
        assert_eq!(store.current().performance_mode, PerformanceMode::Minimal);

        let mut restarted = PreferenceStore::open(Box::new(shared), false);
        restarted.load();
        assert_eq!(restarted.state(), ConfigurationState::AutoConfigured);
        assert!(!restarted.auto_configure(&policy(PerformanceTier::High)));
        assert_eq!(restarted.current().performance_mode, PerformanceMode::Minimal);
    }

    #[test]
    fn test_user_configuration_blocks_auto() {
        let mut store = PreferenceStore::open(Box::new(MemoryStorage::new()), false);
        store.load();
        store.update(PreferenceUpdate {
            enable_particles: Some(false),
            ..PreferenceUpdate::default()
        });

        assert_eq!(store.state(), ConfigurationState::UserConfigured);
        assert!(!store.auto_configure(&policy(PerformanceTier::High)));
        assert!(!store.current().enable_particles);
    }

    #[test]
    fn test_auto_flag_without_preferences_reconfigures() {
        let mut storage = MemoryStorage::new();
        storage
            .set("animationConfigurationState", "\"autoConfigured\"")
            .unwrap();

        let mut store = PreferenceStore::open(Box::new(storage), false);
        store.load();
        assert_eq!(store.state(), ConfigurationState::NeverConfigured);
        assert!(store.auto_configure(&policy(PerformanceTier::Medium)));
    }

    #[test]
    fn test_legacy_flags_are_honoured() {
        let mut storage = MemoryStorage::new();
        storage.set(LEGACY_USER_CONFIGURED_KEY, "true").unwrap();
        storage
            .set("animationPreferences", r#"{"performanceMode":"high"}"#)
            .unwrap();

        let mut store = PreferenceStore::open(Box::new(storage), false);
        store.load();
        assert_eq!(store.state(), ConfigurationState::UserConfigured);
        assert_eq!(store.current().performance_mode, PerformanceMode::High);
    }

    #[test]
    fn test_corrupt_preferences_fall_back_to_defaults() {
        let mut storage = MemoryStorage::new();
        storage.set("animationPreferences", "{oops").unwrap();

        let mut store = PreferenceStore::open(Box::new(storage), false);
        assert_eq!(*store.load(), UserPreferences::default());
    }

    #[test]
    fn test_system_signal_is_merged_not_persisted() {
        let shared = SharedStorage::default();
        let mut store = PreferenceStore::open(Box::new(shared.clone()), true);
        store.load();

        assert!(store.current().reduced_motion);
        assert!(!store.user_preferences().reduced_motion);

        // 用户关闭自己的设置，系统信号仍然生效
        store.update(PreferenceUpdate::reduced_motion(false));
        assert!(store.current().reduced_motion);

        store.set_system_reduced_motion(false);
        assert!(!store.current().reduced_motion);

        let persisted = shared.0.borrow().get("animationPreferences").cloned().unwrap();
        let persisted: UserPreferences = serde_json::from_str(&persisted).unwrap();
        assert!(!persisted.reduced_motion);
    }

    #[test]
    fn test_user_reduced_motion_survives_system_change() {
        let mut store = PreferenceStore::open(Box::new(MemoryStorage::new()), false);
        store.load();
        store.update(PreferenceUpdate::reduced_motion(true));

        store.set_system_reduced_motion(true);
        store.set_system_reduced_motion(false);
        assert!(store.current().reduced_motion);
    }

    #[test]
    fn test_adaptive_demotion_keeps_state() {
        let mut store = PreferenceStore::open(Box::new(MemoryStorage::new()), false);
        store.load();
        store.auto_configure(&policy(PerformanceTier::High));

        assert!(store.apply_adaptive_demotion(PerformanceMode::Minimal));
        assert!(!store.apply_adaptive_demotion(PerformanceMode::Minimal));
        assert_eq!(store.state(), ConfigurationState::AutoConfigured);
        assert_eq!(store.current().performance_mode, PerformanceMode::Minimal);
    }

    #[test]
    fn test_demotion_before_detection_caps_auto_configuration() {
        let shared = SharedStorage::default();

        let mut store = PreferenceStore::open(Box::new(shared.clone()), false);
        store.load();
        assert!(store.apply_adaptive_demotion(PerformanceMode::Minimal));
        assert_eq!(store.state(), ConfigurationState::NeverConfigured);

        assert!(store.auto_configure(&policy(PerformanceTier::High)));
        assert_eq!(store.current().performance_mode, PerformanceMode::Minimal);
        assert!(store.current().enable_particles);
        assert_eq!(store.state(), ConfigurationState::AutoConfigured);

        // 降级写入后重启，首次探测仍然保留它
        let restart_storage = SharedStorage::default();
        let mut first = PreferenceStore::open(Box::new(restart_storage.clone()), false);
        first.load();
        first.apply_adaptive_demotion(PerformanceMode::Minimal);

        let mut restarted = PreferenceStore::open(Box::new(restart_storage), false);
        restarted.load();
        assert!(restarted.auto_configure(&policy(PerformanceTier::Medium)));
        assert_eq!(restarted.current().performance_mode, PerformanceMode::Minimal);
    }

    #[test]
    fn test_reset_forgets_earlier_demotion() {
        let mut store = PreferenceStore::open(Box::new(MemoryStorage::new()), false);
        store.load();
        assert!(store.apply_adaptive_demotion(PerformanceMode::Minimal));
        store.reset();

        assert!(store.auto_configure(&policy(PerformanceTier::High)));
        assert_eq!(store.current().performance_mode, PerformanceMode::High);
    }

    #[test]
    fn test_reset_clears_storage() {
        let shared = SharedStorage::default();
        let mut store = PreferenceStore::open(Box::new(shared.clone()), false);
        store.load();
        store.update(PreferenceUpdate::performance_mode(PerformanceMode::Minimal));

        assert_eq!(*store.reset(), UserPreferences::default());
        assert_eq!(store.state(), ConfigurationState::NeverConfigured);
        assert!(shared.0.borrow().is_empty());
    }

    #[test]
    fn test_listeners_see_effective_preferences() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut store = PreferenceStore::open(Box::new(MemoryStorage::new()), false);
        store.load();

        let sink = Rc::clone(&seen);
        let id = store.subscribe(move |prefs| sink.borrow_mut().push(prefs.reduced_motion));

        store.set_system_reduced_motion(true);
        store.update(PreferenceUpdate::performance_mode(PerformanceMode::High));
        // 没有变化时不通知
        store.set_system_reduced_motion(true);

        assert_eq!(*seen.borrow(), vec![true, true]);

        assert!(store.unsubscribe(id));
        store.set_system_reduced_motion(false);
        assert_eq!(seen.borrow().len(), 2);
    }

    #[test]
    fn test_storage_failures_do_not_propagate() {
        let mut store = PreferenceStore::open(Box::new(BrokenStorage), false);
        store.load();
        store.update(PreferenceUpdate::performance_mode(PerformanceMode::High));

        assert_eq!(store.current().performance_mode, PerformanceMode::High);
        assert_eq!(store.state(), ConfigurationState::UserConfigured);
        store.reset();
        assert_eq!(*store.current(), UserPreferences::default());
    }
}
