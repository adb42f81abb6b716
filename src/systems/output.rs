//! Output stage - haptic command publishing and weapon pose composition.
//!
//! `publish_haptic_command` is the last FixedUpdate link: it folds the
//! active weapon's engine outputs into the shared snapshot, applies the
//! device protection clamps and forwards the frame to the device sink.
//! `apply_weapon_rotation` runs at render rate and only reads state the
//! simulation produced.

use bevy::prelude::*;

use crate::components::{RecoilState, WeaponRig};
use crate::resources::{ActiveWeapon, DeviceInput, HapticCommand, HapticDevice, RecoilConfig};

/// Clamp a vector's magnitude, preserving direction.
///
/// # Arguments
/// * `v` - Vector to clamp
/// * `limit` - Maximum magnitude
///
/// # Returns
/// The vector, rescaled if it exceeded the limit
pub fn clamp_magnitude(v: Vec3, limit: f32) -> Vec3 {
    let length = v.length();
    if length > limit {
        v * (limit / length)
    } else {
        v
    }
}

/// Publish the active weapon's force/torque for this tick.
///
/// The command always reflects the most recently computed engine output:
/// an idle weapon publishes the exact zero vector, and the clamps keep a
/// mis-tuned profile from overdriving the device.
///
/// # Arguments
/// * `config` - Global tuning (device clamps)
/// * `active` - Exclusive weapon selection
/// * `command` - Shared haptic command snapshot
/// * `device` - Optional device sink to forward the frame to
/// * `query` - Weapon rigs with their recoil states
pub fn publish_haptic_command(
    config: Res<RecoilConfig>,
    active: Res<ActiveWeapon>,
    mut command: ResMut<HapticCommand>,
    device: Option<ResMut<HapticDevice>>,
    query: Query<(&WeaponRig, &RecoilState)>,
) {
    let mut force = Vec3::ZERO;
    let mut torque = Vec3::ZERO;
    let mut source = None;

    for (rig, state) in query.iter() {
        if active.is(rig.kind) && state.firing() {
            force = state.current_force;
            torque = state.current_torque;
            source = Some(rig.kind);
        }
    }

    let clamped_force = clamp_magnitude(force, config.max_force);
    if config.debug_log && clamped_force != force {
        warn!(
            "force clamped from {:.1} to {:.1}",
            force.length(),
            config.max_force
        );
    }

    command.force = clamped_force;
    command.torque = clamp_magnitude(torque, config.max_torque);
    command.source = source;
    command.sequence += 1;

    if let Some(mut device) = device {
        device.write_frame(command.force, command.torque);
    }
}

/// Compose each weapon's visual orientation at render rate.
///
/// `device_rotation * base_orientation * muzzle_rise`: the model follows
/// the user's hand, keeps its resting pose, and kicks with the live
/// recoil offset. Rotation is composed onto the resting orientation, not
/// substituted for it.
///
/// # Arguments
/// * `input` - Per-tick device input (provides the handle rotation)
/// * `query` - Weapon rigs with recoil states and transforms
pub fn apply_weapon_rotation(
    input: Res<DeviceInput>,
    mut query: Query<(&WeaponRig, &RecoilState, &mut Transform)>,
) {
    let device_rotation = input.rotation.unwrap_or(Quat::IDENTITY);
    for (rig, state, mut transform) in query.iter_mut() {
        transform.rotation = device_rotation * rig.base_orientation * state.rotation_offset;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_magnitude_preserves_direction() {
        let v = Vec3::new(30.0, 0.0, 40.0); // length 50
        let clamped = clamp_magnitude(v, 25.0);
        assert!((clamped.length() - 25.0).abs() < 1e-4);
        assert!((clamped.normalize() - v.normalize()).length() < 1e-5);
    }

    #[test]
    fn test_clamp_magnitude_leaves_small_vectors_alone() {
        let v = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(clamp_magnitude(v, 25.0), v);
        assert_eq!(clamp_magnitude(Vec3::ZERO, 25.0), Vec3::ZERO);
    }
}
