//! Weapon selector - exclusive single-active-weapon switching.
//!
//! Switching while a pulse is mid-flight must never leave the device
//! under a superseded discharge's load: both the outgoing and incoming
//! recoil states are reset and the shared haptic command is zeroed in the
//! same system invocation, before the output stage runs this tick.

use bevy::ecs::message::MessageWriter;
use bevy::prelude::*;

use crate::components::{RecoilState, WeaponRig};
use crate::events::WeaponSwitchEvent;
use crate::resources::{ActiveWeapon, DeviceInput, HapticCommand, RecoilConfig};

/// Apply the weapon-select switches.
///
/// Idempotent when the requested weapon is already active. On an actual
/// switch: reset outgoing and incoming recoil states to idle/zero, zero
/// the published haptic command synchronously, update the selection and
/// notify observers.
///
/// # Arguments
/// * `input` - Per-tick device switch states
/// * `config` - Global tuning (debug logging)
/// * `active` - Exclusive weapon selection
/// * `command` - Shared haptic command snapshot
/// * `query` - Weapon rigs with their recoil states
/// * `switches` - Message writer for switch notifications
pub fn apply_weapon_switch(
    input: Res<DeviceInput>,
    config: Res<RecoilConfig>,
    mut active: ResMut<ActiveWeapon>,
    mut command: ResMut<HapticCommand>,
    mut query: Query<(&WeaponRig, &mut RecoilState)>,
    mut switches: MessageWriter<WeaponSwitchEvent>,
) {
    let Some(requested) = input.selected_weapon() else {
        return;
    };
    if active.is(requested) {
        return;
    }

    let previous = active.kind();
    for (rig, mut state) in query.iter_mut() {
        if rig.kind == previous || rig.kind == requested {
            state.reset();
        }
    }
    command.clear();
    active.set(requested);

    if config.debug_log {
        debug!("weapon switch: {:?} -> {:?}", previous, requested);
    }
    switches.write(WeaponSwitchEvent {
        from: previous,
        to: requested,
    });
}
