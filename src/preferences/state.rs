/// 偏好配置状态机
///
/// NeverConfigured → AutoConfigured（仅一次）；任意状态 → UserConfigured；
/// 重置回到 NeverConfigured。

use serde::{Deserialize, Serialize};
use std::fmt;

/// 旧版本使用的两个布尔标记
pub const LEGACY_USER_CONFIGURED_KEY: &str = "animation-user-configured";
pub const LEGACY_AUTO_CONFIGURED_KEY: &str = "animation-auto-configured";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ConfigurationState {
    #[default]
    NeverConfigured,
    AutoConfigured,
    UserConfigured,
}

impl ConfigurationState {
    /// 是否允许一次性的自动配置
    pub fn allows_auto_configure(self) -> bool {
        self == ConfigurationState::NeverConfigured
    }

    /// 由旧版标记推导状态，用户标记优先
    pub fn from_legacy_flags(user: Option<&str>, auto: Option<&str>) -> Self {
        if user == Some("true") {
            ConfigurationState::UserConfigured
        } else if auto == Some("true") {
            ConfigurationState::AutoConfigured
        } else {
            ConfigurationState::NeverConfigured
        }
    }
}

impl fmt::Display for ConfigurationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ConfigurationState::NeverConfigured => "never-configured",
            ConfigurationState::AutoConfigured => "auto-configured",
            ConfigurationState::UserConfigured => "user-configured",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_never_configured_allows_auto() {
        assert!(ConfigurationState::NeverConfigured.allows_auto_configure());
        assert!(!ConfigurationState::AutoConfigured.allows_auto_configure());
        assert!(!ConfigurationState::UserConfigured.allows_auto_configure());
    }

    #[test]
    fn test_legacy_flags() {
        assert_eq!(
            ConfigurationState::from_legacy_flags(Some("true"), Some("true")),
            ConfigurationState::UserConfigured
        );
        assert_eq!(
            ConfigurationState::from_legacy_flags(None, Some("true")),
            ConfigurationState::AutoConfigured
        );
        assert_eq!(
            ConfigurationState::from_legacy_flags(Some("false"), None),
            ConfigurationState::NeverConfigured
        );
    }

    #[test]
    fn test_serialized_form() {
        let json = serde_json::to_string(&ConfigurationState::AutoConfigured).unwrap();
        assert_eq!(json, "\"autoConfigured\"");
    }
}
