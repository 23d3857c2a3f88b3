#[cfg(not(target_arch = "wasm32"))]
use adaptive_motion::{
    config::LoggingConfig, AnimationWeight, MotionConfig, MotionManager, MotionResult,
};
#[cfg(not(target_arch = "wasm32"))]
use std::time::Duration;

#[cfg(not(target_arch = "wasm32"))]
#[tokio::main(flavor = "current_thread")]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("adaptive_motion failed: {}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {}

/// 初始化日志，`RUST_LOG` 优先于配置中的级别
#[cfg(not(target_arch = "wasm32"))]
fn initialize_logging(config: &LoggingConfig) {
    if !config.log_to_console {
        return;
    }
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(config.level.as_directive()));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

#[cfg(not(target_arch = "wasm32"))]
async fn run() -> MotionResult<()> {
    let (mut config, source) = match std::env::args().nth(1) {
        Some(path) => (MotionConfig::from_file(&path)?, Some(path.into())),
        None => MotionConfig::load_with_source(),
    };
    config.apply_env_overrides();
    config.validate()?;

    initialize_logging(&config.logging);
    match &source {
        Some(path) => tracing::info!(target: "config", "Loaded configuration from {:?}", path),
        None => tracing::info!(target: "config", "Using default configuration"),
    }

    let mut manager = MotionManager::with_config(config);
    let prober = manager.prober();
    tracing::debug!(target: "probe", "Device: {:?}", prober.device_info());

    let report = manager.detect(&prober).await;
    match serde_json::to_string_pretty(report) {
        Ok(json) => println!("{}", json),
        Err(e) => tracing::warn!(target: "motion", "Failed to format report: {}", e),
    }

    let gate = manager.gate();
    let base = Duration::from_millis(300);
    println!();
    println!("preferences: {:?}", manager.current_preferences());
    println!("state:       {}", manager.preferences().state());
    for weight in [
        AnimationWeight::Essential,
        AnimationWeight::Decorative,
        AnimationWeight::Complex,
    ] {
        println!("{:<12} {:?}", format!("{:?}:", weight), gate.decide(weight, base));
    }
    println!("spring:      {:?}", gate.spring());

    Ok(())
}
