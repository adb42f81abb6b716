//! Trigger controller - edge detection and fire-mode gating.
//!
//! The state machine itself is the debouncer: discharges are started only
//! on stable per-tick edges (or held state for full-auto), never from ad
//! hoc timers at call sites. Release during an in-flight pulse lets the
//! decay tail finish; it only resets burst bookkeeping and blocks new
//! discharges until the next press edge.

use bevy::ecs::message::MessageWriter;
use bevy::prelude::*;

use crate::components::{RecoilState, WeaponRig};
use crate::events::DischargeEvent;
use crate::resources::{ActiveWeapon, DeviceInput, RecoilConfig, TriggerState, WeaponProfiles};
use crate::systems::recoil;
use crate::types::FireMode;

/// Seed mixing constant (64-bit golden ratio) so consecutive shot indices
/// produce uncorrelated jitter streams.
const SEED_MIX: u64 = 0x9E37_79B9_7F4A_7C15;

/// Whether this tick's trigger state permits starting a discharge.
///
/// Per-press modes fire on the rising edge only; full-auto fires whenever
/// the trigger is held. Readiness (pulse complete, cooldown elapsed) is
/// checked separately against the weapon's recoil state.
///
/// # Arguments
/// * `mode` - The weapon's fire mode
/// * `pressed` - Debounced trigger-down state this tick
/// * `pressed_edge` - True only on the press transition tick
///
/// # Returns
/// True if the fire mode wants a discharge this tick
pub fn wants_discharge(mode: FireMode, pressed: bool, pressed_edge: bool) -> bool {
    match mode {
        FireMode::SemiAuto | FireMode::BoltAction => pressed_edge,
        FireMode::FullAuto => pressed,
    }
}

/// Derive the jitter seed for a discharge.
///
/// Deterministic given the configured base seed and the monotonic shot
/// index, so a session (or a single replayed shot) reproduces exactly.
pub fn discharge_seed(base: u64, shot_index: u64) -> u64 {
    base ^ shot_index.wrapping_mul(SEED_MIX)
}

/// Edge-detect the trigger and start discharges permitted by the active
/// weapon's fire mode.
///
/// Runs every fixed tick, after the recoil engine has advanced (so a
/// pulse finishing this tick can unlock an immediate full-auto re-fire)
/// and before the output stage publishes.
///
/// # Arguments
/// * `time` - Bevy fixed-step clock
/// * `input` - Per-tick device switch states
/// * `config` - Global tuning (seed base)
/// * `profiles` - Weapon profile table
/// * `active` - Exclusive weapon selection
/// * `trigger` - Device-wide trigger state
/// * `query` - Weapon rigs with their recoil states
/// * `discharges` - Message writer for discharge notifications
pub fn update_trigger(
    time: Res<Time<Fixed>>,
    input: Res<DeviceInput>,
    config: Res<RecoilConfig>,
    profiles: Res<WeaponProfiles>,
    active: Res<ActiveWeapon>,
    mut trigger: ResMut<TriggerState>,
    mut query: Query<(&WeaponRig, &mut RecoilState)>,
    mut discharges: MessageWriter<DischargeEvent>,
) {
    let now = time.elapsed_secs_f64();
    let pressed = input.trigger;
    let pressed_edge = pressed && !trigger.pressed;
    let released_edge = !pressed && trigger.pressed;

    if pressed_edge {
        trigger.press_start = now;
    }
    if released_edge {
        trigger.burst_count = 0;
    }
    trigger.pressed = pressed;

    if !pressed {
        return;
    }

    for (rig, mut state) in query.iter_mut() {
        if !active.is(rig.kind) {
            continue;
        }
        let profile = profiles.get(rig.kind);

        if !wants_discharge(profile.fire_mode, pressed, pressed_edge) {
            continue;
        }
        if !state.ready() {
            if config.debug_log && pressed_edge {
                debug!(
                    "{}: fire rate not met, {:.0} ms until ready",
                    profile.display_name,
                    ((profile.cooldown_seconds - state.elapsed).max(0.0) * 1000.0)
                );
            }
            continue;
        }

        let burst_index = trigger.burst_count;
        let seed = discharge_seed(config.jitter_seed, trigger.shot_counter);
        recoil::begin_discharge(&mut state, profile, &config, seed, burst_index);

        discharges.write(
            DischargeEvent::new(rig.kind, seed)
                .with_burst_index(burst_index)
                .with_peak_force(state.peak_force)
                .with_timestamp(now),
        );

        trigger.shot_counter += 1;
        if profile.fire_mode.refires_while_held() {
            trigger.burst_count += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::WeaponProfile;

    /// Drive the gating logic the way the system does, without an App:
    /// one call per simulated tick.
    fn step(
        state: &mut RecoilState,
        trigger: &mut TriggerState,
        profile: &WeaponProfile,
        config: &RecoilConfig,
        pressed: bool,
        dt: f32,
    ) -> bool {
        recoil::advance(state, profile, dt);

        let pressed_edge = pressed && !trigger.pressed;
        let released_edge = !pressed && trigger.pressed;
        if released_edge {
            trigger.burst_count = 0;
        }
        trigger.pressed = pressed;

        if pressed
            && wants_discharge(profile.fire_mode, pressed, pressed_edge)
            && state.ready()
        {
            let seed = discharge_seed(config.jitter_seed, trigger.shot_counter);
            recoil::begin_discharge(state, profile, config, seed, trigger.burst_count);
            trigger.shot_counter += 1;
            if profile.fire_mode.refires_while_held() {
                trigger.burst_count += 1;
            }
            return true;
        }
        false
    }

    #[test]
    fn test_semi_auto_requires_release_then_press() {
        let profile = WeaponProfile::pistol();
        let config = RecoilConfig::default();
        let mut state = RecoilState::default();
        let mut trigger = TriggerState::default();

        assert!(step(&mut state, &mut trigger, &profile, &config, true, 0.001));

        // Hold well past pulse and cooldown: no second discharge.
        let mut fired_while_held = 0;
        for _ in 0..1000 {
            if step(&mut state, &mut trigger, &profile, &config, true, 0.001) {
                fired_while_held += 1;
            }
        }
        assert_eq!(fired_while_held, 0, "held semi-auto must not re-fire");

        // Release, then press again: second discharge accepted.
        assert!(!step(&mut state, &mut trigger, &profile, &config, false, 0.001));
        assert!(step(&mut state, &mut trigger, &profile, &config, true, 0.001));
    }

    #[test]
    fn test_bolt_action_press_during_cooldown_is_rejected() {
        let profile = WeaponProfile::sniper();
        let config = RecoilConfig::default();
        let mut state = RecoilState::default();
        let mut trigger = TriggerState::default();

        assert!(step(&mut state, &mut trigger, &profile, &config, true, 0.001));
        assert!(!step(&mut state, &mut trigger, &profile, &config, false, 0.001));

        // Re-press 200 ms in: pulse may still be playing and the 1 s
        // cooldown certainly has not elapsed, so the press is consumed
        // without firing.
        for _ in 0..200 {
            step(&mut state, &mut trigger, &profile, &config, false, 0.001);
        }
        assert!(!step(&mut state, &mut trigger, &profile, &config, true, 0.001));
    }

    #[test]
    fn test_full_auto_refires_while_held() {
        let profile = WeaponProfile::rifle();
        let config = RecoilConfig::default();
        let mut state = RecoilState::default();
        let mut trigger = TriggerState::default();

        let mut discharge_ticks = Vec::new();
        for tick in 0..290 {
            if step(&mut state, &mut trigger, &profile, &config, true, 0.001) {
                discharge_ticks.push(tick);
            }
        }

        // 120 ms cycle (pulse == cooldown == 0.12 s): discharges begin at
        // ~0, ~120 and ~240 ms; the first two complete inside the window.
        assert_eq!(discharge_ticks.len(), 3);
        assert_eq!(discharge_ticks[0], 0);
        assert!((119..=123).contains(&discharge_ticks[1]));
        assert!((239..=245).contains(&discharge_ticks[2]));
    }

    #[test]
    fn test_full_auto_burst_count_resets_on_release() {
        let profile = WeaponProfile::rifle();
        let config = RecoilConfig::default();
        let mut state = RecoilState::default();
        let mut trigger = TriggerState::default();

        for _ in 0..290 {
            step(&mut state, &mut trigger, &profile, &config, true, 0.001);
        }
        assert_eq!(trigger.burst_count, 3);

        step(&mut state, &mut trigger, &profile, &config, false, 0.001);
        assert_eq!(trigger.burst_count, 0);
    }

    #[test]
    fn test_release_lets_pulse_tail_finish() {
        let profile = WeaponProfile::pistol();
        let config = RecoilConfig::default();
        let mut state = RecoilState::default();
        let mut trigger = TriggerState::default();

        assert!(step(&mut state, &mut trigger, &profile, &config, true, 0.001));

        // Release 10 ms in, mid recoil phase: the pulse keeps decaying.
        for _ in 0..9 {
            step(&mut state, &mut trigger, &profile, &config, true, 0.001);
        }
        step(&mut state, &mut trigger, &profile, &config, false, 0.001);
        assert!(state.firing());
        assert!(state.current_force.length() > 0.0);

        // ...and still terminates at zero on schedule.
        for _ in 0..150 {
            step(&mut state, &mut trigger, &profile, &config, false, 0.001);
        }
        assert!(!state.firing());
        assert_eq!(state.current_force, Vec3::ZERO);
    }

    #[test]
    fn test_seed_derivation_is_deterministic_and_distinct() {
        let a = discharge_seed(1, 0);
        let b = discharge_seed(1, 0);
        let c = discharge_seed(1, 1);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
