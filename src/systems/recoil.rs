//! Recoil engine - two-phase force/torque/rotation envelope synthesis.
//!
//! One parameterized code path serves every weapon; all per-weapon
//! differences come from [`WeaponProfile`] data. The force model is a
//! momentum-transfer analog, not a literal physics solve: it produces a
//! force proportional to the momentum transfer rate, scaled to feel right
//! on a force-feedback device rather than to match real recoil newtons.

use bevy::prelude::*;
use rand::prelude::*;
use rand_distr::{Distribution, Normal};

use crate::components::{RecoilState, WeaponRig};
use crate::resources::{RecoilConfig, WeaponProfile, WeaponProfiles};
use crate::types::TriggerPhase;

/// Burst ramp saturation: a held burst never grows force beyond this
/// factor of the single-shot peak.
const MAX_BURST_RAMP_FACTOR: f32 = 1.5;

/// Free recoil velocity of the firearm (m/s).
///
/// Momentum conservation: bullet momentum divided by firearm mass.
///
/// # Arguments
/// * `profile` - Weapon physical constants
///
/// # Returns
/// The rearward velocity the firearm would acquire from one shot
pub fn free_recoil_velocity(profile: &WeaponProfile) -> f32 {
    profile.bullet_mass * profile.muzzle_velocity / profile.mass
}

/// Peak force F0 for one discharge.
///
/// `F0 = k * v_free / t_c`, the momentum transfer rate scaled into
/// haptic range, plus the full-auto burst ramp (saturating).
///
/// # Arguments
/// * `profile` - Weapon physical constants
/// * `config` - Global tuning (provides k)
/// * `burst_index` - Position within the current held burst (0 = first shot)
///
/// # Returns
/// The force magnitude the envelope decays from
pub fn peak_force(profile: &WeaponProfile, config: &RecoilConfig, burst_index: u32) -> f32 {
    let base = config.force_scale * free_recoil_velocity(profile) / profile.base_force_time_constant;
    let ramp =
        (1.0 + profile.burst_force_ramp * burst_index as f32).min(MAX_BURST_RAMP_FACTOR);
    base * ramp
}

/// Lever attenuation converting linear force into torque about the grip.
///
/// `(arm * m_bullet * barrel) / (arm² * m_firearm)` - a simplified
/// rigid-body lever approximation, not a full inertia-tensor simulation.
pub fn deviation_angle(profile: &WeaponProfile) -> f32 {
    let moment_of_inertia =
        profile.recoil_arm_length * profile.recoil_arm_length * profile.mass;
    (profile.recoil_arm_length * profile.bullet_mass * profile.barrel_length) / moment_of_inertia
}

/// Sample the push direction for one discharge.
///
/// Forward-biased `(1, j, 0.3 + j)` axis with center-weighted Gaussian
/// jitter clamped to ±`jitter`, normalized. Sampled once per discharge so
/// the push is stable through one shot but varies shot-to-shot.
///
/// # Arguments
/// * `jitter` - Maximum lateral jitter fraction
/// * `rng` - Seeded per-discharge RNG
///
/// # Returns
/// A unit direction vector
pub fn sample_impulse_direction(jitter: f32, rng: &mut StdRng) -> Vec3 {
    let normal =
        Normal::new(0.0, (jitter / 2.0) as f64).unwrap_or(Normal::new(0.0, 0.01).unwrap());

    let lateral = (normal.sample(rng) as f32).clamp(-jitter, jitter);
    let vertical = (normal.sample(rng) as f32).clamp(-jitter, jitter);
    let forward = 1.0 + (normal.sample(rng) as f32).clamp(-jitter, jitter);
    Vec3::new(forward, lateral, 0.3 + vertical).normalize()
}

/// Sample the muzzle-rise amplitude for one discharge (radians).
///
/// Uniform in `[base, 1.5 * base]`, so every shot kicks the sights a
/// visibly different amount.
pub fn sample_rise_amplitude(profile: &WeaponProfile, rng: &mut StdRng) -> f32 {
    let base = profile.muzzle_rise_degrees;
    rng.random_range(base..base * 1.5).to_radians()
}

/// Signed force magnitude at `elapsed` seconds into a discharge.
///
/// Positive values push along the impulse direction (recoil phase),
/// negative values push against it (recovery phase). Elapsed time before
/// zero clamps to zero; elapsed time at or past the pulse end yields
/// exactly zero, never an extrapolated envelope value.
///
/// # Arguments
/// * `profile` - Weapon envelope tuning
/// * `peak` - F0 for this discharge
/// * `elapsed` - Seconds since discharge start
///
/// # Returns
/// Signed magnitude; `|result| <= peak` during recoil and
/// `|result| <= peak * κ` during recovery
pub fn force_at(profile: &WeaponProfile, peak: f32, elapsed: f32) -> f32 {
    let t = elapsed.max(0.0);
    if t < profile.recoil_phase_seconds {
        peak * (-profile.recoil_decay * t / profile.recoil_phase_seconds).exp()
    } else if t < profile.pulse_duration() {
        let progress = (t - profile.recoil_phase_seconds) / profile.recovery_phase_seconds;
        -peak * profile.recovery_fraction * (-profile.recovery_decay * progress).exp()
    } else {
        0.0
    }
}

/// Muzzle-rise angle at `elapsed` seconds into a discharge (radians).
///
/// Rise-then-settle shape `(1 - p) * sin(p * π)` over the whole pulse:
/// zero at discharge start, peaking early, settled back to zero by pulse
/// end. Full-auto weapons use a small amplitude so overlapping discharges
/// read as one continuous climb; single-action weapons use a dramatic one.
pub fn muzzle_rise_angle(pulse_duration: f32, amplitude: f32, elapsed: f32) -> f32 {
    if pulse_duration <= 0.0 {
        return 0.0;
    }
    let progress = (elapsed / pulse_duration).clamp(0.0, 1.0);
    amplitude * (1.0 - progress) * (progress * std::f32::consts::PI).sin()
}

/// Start a discharge on a weapon's recoil state.
///
/// Called exactly once per permitted trigger pull. Samples the jitter
/// direction and rise amplitude from the seed, fixes the pulse length and
/// F0, and computes the outputs for elapsed time zero so the very first
/// published frame carries the full peak force.
///
/// # Arguments
/// * `state` - The weapon's recoil state
/// * `profile` - The weapon's profile
/// * `config` - Global tuning
/// * `seed` - Per-discharge RNG seed
/// * `burst_index` - Position within the current held burst
pub fn begin_discharge(
    state: &mut RecoilState,
    profile: &WeaponProfile,
    config: &RecoilConfig,
    seed: u64,
    burst_index: u32,
) {
    let mut rng = StdRng::seed_from_u64(seed);

    state.phase = TriggerPhase::Firing;
    state.elapsed = 0.0;
    state.pulse_duration = profile.pulse_duration();
    state.peak_force = peak_force(profile, config, burst_index);
    state.impulse_direction = sample_impulse_direction(config.direction_jitter, &mut rng);
    state.rise_amplitude = sample_rise_amplitude(profile, &mut rng);
    state.shots_fired += 1;

    refresh_outputs(state, profile);
}

/// Advance a weapon's recoil state by one simulation step.
///
/// Negative `dt` (non-monotonic clock) clamps to zero. A step that lands
/// at or beyond the pulse end clamps to the terminal state: exact zero
/// force and torque, identity rotation, and the phase machine moves on to
/// Cooldown (or straight to Idle when the cooldown has already elapsed).
pub fn advance(state: &mut RecoilState, profile: &WeaponProfile, dt: f32) {
    let dt = dt.max(0.0);
    match state.phase {
        TriggerPhase::Idle => {}
        TriggerPhase::Firing => {
            state.elapsed += dt;
            if state.elapsed >= state.pulse_duration {
                finish_pulse(state, profile);
            } else {
                refresh_outputs(state, profile);
            }
        }
        TriggerPhase::Cooldown => {
            state.elapsed += dt;
            if state.elapsed >= profile.cooldown_seconds {
                state.reset();
            }
        }
    }
}

/// Recompute the output vectors for the state's current elapsed time.
fn refresh_outputs(state: &mut RecoilState, profile: &WeaponProfile) {
    let magnitude = force_at(profile, state.peak_force, state.elapsed);
    state.current_force = state.impulse_direction * magnitude;
    state.current_torque = state.impulse_direction
        * (magnitude * profile.recoil_arm_length * deviation_angle(profile));

    let angle = muzzle_rise_angle(state.pulse_duration, state.rise_amplitude, state.elapsed);
    state.rotation_offset = Quat::from_axis_angle(Vec3::X, angle);
}

/// End the pulse: zero outputs and move to Cooldown or Idle.
fn finish_pulse(state: &mut RecoilState, profile: &WeaponProfile) {
    state.current_force = Vec3::ZERO;
    state.current_torque = Vec3::ZERO;
    state.rotation_offset = Quat::IDENTITY;
    if state.elapsed >= profile.cooldown_seconds {
        state.reset();
    } else {
        state.phase = TriggerPhase::Cooldown;
    }
}

/// Advance every weapon's recoil state each fixed tick.
///
/// Runs in FixedUpdate for deterministic simulation, before the trigger
/// controller so a pulse that completes this tick can immediately unlock
/// a full-auto re-fire on the same tick.
///
/// # Arguments
/// * `time` - Bevy fixed-step clock
/// * `profiles` - Weapon profile table
/// * `query` - All weapon rigs with their recoil states
pub fn advance_recoil(
    time: Res<Time<Fixed>>,
    profiles: Res<WeaponProfiles>,
    mut query: Query<(&WeaponRig, &mut RecoilState)>,
) {
    let dt = time.delta_secs();
    for (rig, mut state) in query.iter_mut() {
        let profile = profiles.get(rig.kind);
        advance(&mut state, profile, dt);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pistol() -> WeaponProfile {
        WeaponProfile::pistol()
    }

    fn config() -> RecoilConfig {
        RecoilConfig::default()
    }

    #[test]
    fn test_idle_state_has_zero_outputs() {
        let mut state = RecoilState::default();
        advance(&mut state, &pistol(), 0.001);
        assert_eq!(state.current_force, Vec3::ZERO);
        assert_eq!(state.current_torque, Vec3::ZERO);
        assert!(!state.firing());
    }

    #[test]
    fn test_recoil_phase_bounded_by_peak() {
        let profile = pistol();
        let peak = peak_force(&profile, &config(), 0);

        let mut t = 0.0;
        while t < profile.recoil_phase_seconds {
            let f = force_at(&profile, peak, t);
            assert!(f >= 0.0, "recoil phase must push forward at t={t}");
            assert!(f <= peak, "recoil phase exceeded F0 at t={t}");
            t += 0.001;
        }
    }

    #[test]
    fn test_recovery_phase_bounded_by_kappa() {
        let profile = pistol();
        let peak = peak_force(&profile, &config(), 0);
        let cap = peak * profile.recovery_fraction;

        let mut t = profile.recoil_phase_seconds;
        while t < profile.pulse_duration() {
            let f = force_at(&profile, peak, t);
            assert!(f <= 0.0, "recovery phase must push backward at t={t}");
            assert!(f.abs() <= cap, "recovery phase exceeded F0*κ at t={t}");
            t += 0.001;
        }
    }

    #[test]
    fn test_recoil_phase_decays_monotonically() {
        let profile = pistol();
        let peak = peak_force(&profile, &config(), 0);

        let mut previous = f32::INFINITY;
        let mut t = 0.0;
        while t < profile.recoil_phase_seconds {
            let magnitude = force_at(&profile, peak, t).abs();
            assert!(magnitude <= previous, "recoil force increased at t={t}");
            previous = magnitude;
            t += 0.001;
        }
    }

    #[test]
    fn test_envelope_terminates_at_pulse_end() {
        let profile = pistol();
        let peak = peak_force(&profile, &config(), 0);

        assert_eq!(force_at(&profile, peak, profile.pulse_duration()), 0.0);
        assert_eq!(force_at(&profile, peak, profile.pulse_duration() + 1.0), 0.0);
    }

    #[test]
    fn test_negative_elapsed_clamps_to_start() {
        let profile = pistol();
        let peak = peak_force(&profile, &config(), 0);
        assert_eq!(force_at(&profile, peak, -0.5), peak);
    }

    #[test]
    fn test_advance_past_pulse_zeroes_and_stops_firing() {
        let profile = pistol();
        let mut state = RecoilState::default();
        begin_discharge(&mut state, &profile, &config(), 7, 0);
        assert!(state.firing());
        assert!(state.current_force.length() > 0.0);

        // One oversized step, as if updates were missed for a second.
        advance(&mut state, &profile, 1.0);
        assert!(!state.firing());
        assert_eq!(state.current_force, Vec3::ZERO);
        assert_eq!(state.current_torque, Vec3::ZERO);
        assert_eq!(state.rotation_offset, Quat::IDENTITY);
    }

    #[test]
    fn test_discharge_outputs_peak_at_start() {
        let profile = pistol();
        let cfg = config();
        let mut state = RecoilState::default();
        begin_discharge(&mut state, &profile, &cfg, 99, 0);

        let expected = peak_force(&profile, &cfg, 0);
        let got = state.current_force.length();
        assert!(
            (got - expected).abs() < expected * 1e-4,
            "first frame should carry F0: got {got}, expected {expected}"
        );
    }

    #[test]
    fn test_same_seed_reproduces_jitter() {
        let profile = pistol();
        let cfg = config();

        let mut a = RecoilState::default();
        let mut b = RecoilState::default();
        begin_discharge(&mut a, &profile, &cfg, 12345, 0);
        begin_discharge(&mut b, &profile, &cfg, 12345, 0);

        assert_eq!(a.impulse_direction, b.impulse_direction);
        assert_eq!(a.rise_amplitude, b.rise_amplitude);
    }

    #[test]
    fn test_different_seeds_vary_jitter() {
        let profile = pistol();
        let cfg = config();

        let mut a = RecoilState::default();
        let mut b = RecoilState::default();
        begin_discharge(&mut a, &profile, &cfg, 1, 0);
        begin_discharge(&mut b, &profile, &cfg, 2, 0);

        assert_ne!(a.impulse_direction, b.impulse_direction);
    }

    #[test]
    fn test_impulse_direction_is_forward_biased_unit() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..100 {
            let dir = sample_impulse_direction(0.10, &mut rng);
            assert!((dir.length() - 1.0).abs() < 1e-5);
            assert!(dir.x > 0.0, "push must stay forward-biased");
            // Lateral jitter stays a small fraction of the forward push.
            assert!(dir.y.abs() < dir.x * 0.15);
        }
    }

    #[test]
    fn test_burst_ramp_grows_and_saturates() {
        let profile = WeaponProfile::rifle();
        let cfg = config();

        let first = peak_force(&profile, &cfg, 0);
        let third = peak_force(&profile, &cfg, 2);
        let huge = peak_force(&profile, &cfg, 1000);
        assert!(third > first);
        assert!((huge / first - MAX_BURST_RAMP_FACTOR).abs() < 1e-5);
    }

    #[test]
    fn test_torque_follows_lever_approximation() {
        let profile = pistol();
        let cfg = config();
        let mut state = RecoilState::default();
        begin_discharge(&mut state, &profile, &cfg, 5, 0);

        let expected = state.current_force.length()
            * profile.recoil_arm_length
            * deviation_angle(&profile);
        assert!((state.current_torque.length() - expected).abs() < expected * 1e-4);
    }

    #[test]
    fn test_rotation_rises_then_settles() {
        let pulse = 0.15;
        let amplitude = 0.1;

        assert_eq!(muzzle_rise_angle(pulse, amplitude, 0.0), 0.0);
        let early = muzzle_rise_angle(pulse, amplitude, pulse * 0.25);
        let late = muzzle_rise_angle(pulse, amplitude, pulse * 0.9);
        assert!(early > 0.0);
        assert!(late < early);
        assert!(muzzle_rise_angle(pulse, amplitude, pulse).abs() < 1e-6);
        assert!(muzzle_rise_angle(pulse, amplitude, pulse * 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_cooldown_follows_pulse_completion() {
        // Sniper cooldown (1.0s) far exceeds its pulse (0.42s), so the
        // state machine must pass through Cooldown before Idle.
        let profile = WeaponProfile::sniper();
        let cfg = config();
        let mut state = RecoilState::default();
        begin_discharge(&mut state, &profile, &cfg, 3, 0);

        advance(&mut state, &profile, profile.pulse_duration() + 0.01);
        assert_eq!(state.phase, TriggerPhase::Cooldown);
        assert_eq!(state.current_force, Vec3::ZERO);

        advance(&mut state, &profile, 1.0);
        assert!(state.ready());
    }
}
