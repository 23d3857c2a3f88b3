//! # Adaptive Motion
//!
//! Device-aware animation policy: decides which animations run, and for how
//! long, based on the device's capabilities, the user's stored preferences,
//! the system "reduce motion" setting and the live frame rate.
//!
//! ## Pipeline
//!
//! - **Probe**: best-effort environment signals (graphics acceleration, memory,
//!   cores, network, battery) with conservative fallbacks
//! - **Score / Tier / Policy**: a 0-100 score, a low/medium/high tier and a
//!   recommended animation policy
//! - **Preferences**: persisted user choices, auto-populated once from the policy
//! - **Adaptive**: frame-rate monitoring that temporarily degrades animations
//! - **Gate**: the per-animation decision consumed by the UI layer
//!
//! ### Example
//!
//! ```ignore
//! use adaptive_motion::{AnimationWeight, MotionConfig, MotionManager};
//! use std::time::Duration;
//!
//! let mut manager = MotionManager::with_config(MotionConfig::load_or_default());
//! let prober = manager.prober();
//! manager.detect(&prober).await;
//!
//! if manager.should_animate(AnimationWeight::Decorative) {
//!     let duration = manager.scale_duration(Duration::from_millis(300));
//! }
//! ```
//!
//! ## Modules
//!
//! - [`performance`]: scoring, tiers and policy
//! - [`preferences`]: user preferences and storage
//! - [`adaptive`]: live frame-rate adaptation
//! - [`gate`]: animation decisions
//! - [`manager`]: orchestration

/// Core error types and macros
pub mod core;
/// Configuration system
pub mod config;
/// Device performance scoring, tiers and animation policy
pub mod performance;
/// User preferences, persistence and the system reduced-motion signal
pub mod preferences;
/// Frame-rate driven adaptation
pub mod adaptive;
/// Per-animation gating decisions
pub mod gate;
/// Orchestration of detection, preferences and adaptation
pub mod manager;

/// Device capability probing
pub use adaptive_motion_hardware as hardware;

pub use adaptive::{AdaptiveEvent, AdaptiveMode, AdaptiveMonitor, AdaptiveStats, FrameRateMeter};
pub use config::{ConfigError, ConfigResult, MotionConfig};
pub use crate::core::{MotionError, MotionResult, StorageError, StorageResult};
pub use gate::{AnimationDecision, AnimationGate, AnimationWeight, Easing, Motion, Transition};
pub use adaptive_motion_hardware::{CapabilityProber, DeviceCapabilities, NetworkClass};
pub use manager::{open_storage, MotionManager};
pub use performance::{
    performance_score, AnimationPolicy, PerformanceMode, PerformanceReport, PerformanceTier,
};
pub use preferences::{
    ConfigurationState, KeyValueStorage, PreferenceStore, PreferenceUpdate, UserPreferences,
};
