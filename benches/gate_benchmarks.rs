//! 动画门控性能基准测试
//!
//! 门控每帧都会被多次调用，评分和自适应采样也在热路径上

use adaptive_motion::hardware::DeviceCapabilities;
use adaptive_motion::{
    performance_score, AdaptiveMode, AdaptiveMonitor, AnimationGate, AnimationWeight,
    PerformanceMode, UserPreferences,
};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::time::Duration;

fn bench_gate_decisions(c: &mut Criterion) {
    let mut group = c.benchmark_group("gate_decisions");
    let base = Duration::from_millis(300);

    for adaptive in [AdaptiveMode::Optimal, AdaptiveMode::Reduced, AdaptiveMode::Minimal] {
        let prefs = UserPreferences {
            performance_mode: PerformanceMode::High,
            ..UserPreferences::default()
        };

        group.bench_with_input(
            BenchmarkId::new("decide", adaptive),
            &adaptive,
            |b, &adaptive| {
                b.iter(|| {
                    let gate = AnimationGate::new(black_box(&prefs), adaptive);
                    black_box(gate.decide(AnimationWeight::Complex, base))
                });
            },
        );
    }

    let gate = AnimationGate::new(&UserPreferences::default(), AdaptiveMode::Optimal);
    group.bench_function("scale_duration", |b| {
        b.iter(|| black_box(gate.scale_duration(black_box(base))));
    });

    group.bench_function("transition", |b| {
        b.iter(|| black_box(gate.transition(black_box(Default::default()))));
    });

    group.finish();
}

fn bench_scoring(c: &mut Criterion) {
    let caps = DeviceCapabilities::conservative();
    c.bench_function("performance_score", |b| {
        b.iter(|| black_box(performance_score(black_box(&caps))));
    });
}

fn bench_adaptive_samples(c: &mut Criterion) {
    c.bench_function("adaptive_record_sample", |b| {
        let mut monitor = AdaptiveMonitor::default();
        let mut tick = 0u64;
        b.iter(|| {
            tick += 1;
            let fps = if tick % 7 == 0 { 28.0 } else { 58.0 };
            black_box(monitor.record_sample(fps, Duration::from_secs(tick)))
        });
    });
}

criterion_group!(benches, bench_gate_decisions, bench_scoring, bench_adaptive_samples);
criterion_main!(benches);
