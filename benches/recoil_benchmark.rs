//! Benchmark for recoil envelope performance.

use bevy_recoil_dynamics::components::RecoilState;
use bevy_recoil_dynamics::resources::{RecoilConfig, WeaponProfile};
use bevy_recoil_dynamics::systems::recoil;
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

fn benchmark_envelope_tick(c: &mut Criterion) {
    let config = RecoilConfig::default();
    let profiles = [
        WeaponProfile::pistol(),
        WeaponProfile::sniper(),
        WeaponProfile::rifle(),
    ];

    let mut group = c.benchmark_group("Envelope Tick");

    // A 1 kHz haptic loop gives the whole simulation a 1 ms budget; the
    // envelope math itself should be nanoseconds.
    for tick_count in [100, 1000, 10000].iter() {
        group.bench_with_input(
            BenchmarkId::from_parameter(tick_count),
            tick_count,
            |b, &count| {
                b.iter(|| {
                    for profile in &profiles {
                        let mut state = RecoilState::default();
                        recoil::begin_discharge(&mut state, profile, &config, 42, 0);
                        for _ in 0..count {
                            recoil::advance(&mut state, profile, 0.001);
                        }
                    }
                });
            },
        );
    }

    group.finish();
}

fn benchmark_discharge_start(c: &mut Criterion) {
    let config = RecoilConfig::default();
    let profile = WeaponProfile::rifle();

    c.bench_function("Begin Discharge", |b| {
        let mut state = RecoilState::default();
        let mut seed = 0u64;
        b.iter(|| {
            seed = seed.wrapping_add(1);
            recoil::begin_discharge(&mut state, &profile, &config, seed, 0);
        });
    });

    c.bench_function("Force Sample", |b| {
        let peak = recoil::peak_force(&profile, &config, 0);
        b.iter(|| recoil::force_at(&profile, peak, 0.035));
    });
}

criterion_group!(benches, benchmark_envelope_tick, benchmark_discharge_start);
criterion_main!(benches);
