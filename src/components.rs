//! Core components for the recoil system.

use bevy::prelude::*;

use crate::types::{TriggerPhase, WeaponKind};

/// Scene data for one weapon model driven by the haptic device.
///
/// One rig entity exists per [`WeaponKind`]. The rig carries the weapon's
/// resting orientation; the render-side system composes the device
/// rotation and the live muzzle-rise offset onto it every frame, so the
/// model follows the user's hand and kicks when a shot is fired.
///
/// # Fields
/// * `kind` - Which weapon this rig represents
/// * `base_orientation` - Resting model orientation in the device frame
///
/// # Example
/// ```
/// use bevy::prelude::*;
/// use bevy_recoil_dynamics::components::WeaponRig;
/// use bevy_recoil_dynamics::types::WeaponKind;
///
/// let rig = WeaponRig::new(WeaponKind::Rifle)
///     .with_base_orientation(Quat::from_rotation_y(std::f32::consts::FRAC_PI_2));
/// ```
#[derive(Component, Reflect, Clone, Default)]
#[reflect(Component)]
pub struct WeaponRig {
    /// Which weapon this rig represents
    pub kind: WeaponKind,
    /// Resting model orientation in the device frame
    pub base_orientation: Quat,
}

impl WeaponRig {
    /// Creates a rig for the given weapon kind with an identity resting
    /// orientation.
    ///
    /// # Arguments
    /// * `kind` - Weapon kind the rig represents
    ///
    /// # Returns
    /// A new WeaponRig instance
    pub fn new(kind: WeaponKind) -> Self {
        Self {
            kind,
            base_orientation: Quat::IDENTITY,
        }
    }

    /// Builder pattern: set the resting orientation.
    ///
    /// # Arguments
    /// * `orientation` - Resting model orientation in the device frame
    ///
    /// # Returns
    /// The modified WeaponRig instance for method chaining
    pub fn with_base_orientation(mut self, orientation: Quat) -> Self {
        self.base_orientation = orientation;
        self
    }
}

/// Live discharge state for one weapon.
///
/// This component is the recoil engine's working memory: the discharge
/// phase machine, the per-discharge sampled values (push direction, peak
/// force, rise amplitude) and the last computed outputs. One instance
/// lives on each weapon rig entity for the process lifetime.
///
/// # Fields
/// * `phase` - Idle / Firing / Cooldown state
/// * `elapsed` - Seconds since the current discharge began
/// * `pulse_duration` - Recoil + recovery phase length for this discharge
/// * `peak_force` - F0 for this discharge, burst ramp included
/// * `impulse_direction` - Unit push direction, sampled once per discharge
/// * `rise_amplitude` - Sampled muzzle-rise amplitude (radians)
/// * `current_force` - Last computed force output vector
/// * `current_torque` - Last computed torque output vector
/// * `rotation_offset` - Muzzle-rise rotation composed onto the resting
///   orientation by the render side
/// * `shots_fired` - Lifetime discharge count for this weapon
///
/// # Example
/// ```
/// use bevy_recoil_dynamics::components::RecoilState;
///
/// let state = RecoilState::default();
/// assert!(!state.firing());
/// assert!(state.ready());
/// ```
#[derive(Component, Reflect, Clone)]
#[reflect(Component)]
pub struct RecoilState {
    /// Idle / Firing / Cooldown
    pub phase: TriggerPhase,
    /// Seconds since the current discharge began
    pub elapsed: f32,
    /// Total envelope length for this discharge (seconds)
    pub pulse_duration: f32,
    /// F0 for this discharge
    pub peak_force: f32,
    /// Unit push direction, stable through one discharge
    pub impulse_direction: Vec3,
    /// Muzzle-rise amplitude for this discharge (radians)
    pub rise_amplitude: f32,
    /// Last computed force output
    pub current_force: Vec3,
    /// Last computed torque output
    pub current_torque: Vec3,
    /// Muzzle-rise rotation offset
    pub rotation_offset: Quat,
    /// Lifetime discharge count
    pub shots_fired: u64,
}

impl Default for RecoilState {
    /// Creates an idle state with zero outputs and an identity rotation.
    fn default() -> Self {
        Self {
            phase: TriggerPhase::Idle,
            elapsed: 0.0,
            pulse_duration: 0.0,
            peak_force: 0.0,
            impulse_direction: Vec3::X,
            rise_amplitude: 0.0,
            current_force: Vec3::ZERO,
            current_torque: Vec3::ZERO,
            rotation_offset: Quat::IDENTITY,
            shots_fired: 0,
        }
    }
}

impl RecoilState {
    /// True while a discharge's force/rotation pulse is still playing out.
    pub fn firing(&self) -> bool {
        self.phase == TriggerPhase::Firing
    }

    /// True when the weapon may accept a new discharge.
    pub fn ready(&self) -> bool {
        self.phase == TriggerPhase::Idle
    }

    /// Return to idle with zero outputs.
    ///
    /// Used at the end of every pulse and when the weapon is switched out
    /// mid-pulse; the device must never be left under sustained load.
    pub fn reset(&mut self) {
        self.phase = TriggerPhase::Idle;
        self.elapsed = 0.0;
        self.pulse_duration = 0.0;
        self.peak_force = 0.0;
        self.current_force = Vec3::ZERO;
        self.current_torque = Vec3::ZERO;
        self.rotation_offset = Quat::IDENTITY;
    }
}
