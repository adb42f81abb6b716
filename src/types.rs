//! Common types and enums for the recoil system.

use bevy::prelude::*;

/// The weapon kinds known to the simulator.
///
/// Each kind has exactly one [`crate::resources::WeaponProfile`] entry and
/// one live [`crate::components::RecoilState`]. The set is fixed: the
/// simulator models a handgun, a designated-marksman rifle and an assault
/// rifle, matching the three select switches on the haptic device.
///
/// # Example
/// ```
/// use bevy_recoil_dynamics::types::WeaponKind;
///
/// let kind = WeaponKind::Pistol;
/// assert_eq!(kind.index(), 0);
/// ```
#[derive(
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Debug,
    Default,
    Reflect,
    serde::Serialize,
    serde::Deserialize,
)]
pub enum WeaponKind {
    #[default]
    /// Semi-automatic handgun (M1911 pattern)
    Pistol,
    /// Bolt-action style marksman rifle (Dragunov pattern)
    Sniper,
    /// Full-automatic assault rifle (AK pattern)
    Rifle,
}

impl WeaponKind {
    /// All kinds, in profile-table order.
    pub const ALL: [WeaponKind; 3] = [WeaponKind::Pistol, WeaponKind::Sniper, WeaponKind::Rifle];

    /// Dense index into per-kind tables.
    pub fn index(self) -> usize {
        match self {
            WeaponKind::Pistol => 0,
            WeaponKind::Sniper => 1,
            WeaponKind::Rifle => 2,
        }
    }
}

/// Policy governing how repeated discharges are gated.
///
/// # Variants
/// * `SemiAuto` - One discharge per physical trigger press; a new shot
///   requires release-then-press.
/// * `BoltAction` - Same per-press rule as `SemiAuto` with a long cycling
///   cooldown between shots.
/// * `FullAuto` - Re-fires while the trigger is held, once the previous
///   pulse has completed and the cooldown has elapsed.
///
/// # Example
/// ```
/// use bevy_recoil_dynamics::types::FireMode;
///
/// let mode = FireMode::FullAuto;
/// assert!(mode.refires_while_held());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Reflect, serde::Serialize, serde::Deserialize)]
pub enum FireMode {
    #[default]
    /// One shot per trigger press
    SemiAuto,
    /// One shot per trigger press, long cycling cooldown
    BoltAction,
    /// Continuous fire while the trigger is held
    FullAuto,
}

impl FireMode {
    /// Whether holding the trigger keeps discharging without a new press.
    pub fn refires_while_held(self) -> bool {
        matches!(self, FireMode::FullAuto)
    }
}

/// Discharge state machine phase for a single weapon.
///
/// Transitions are driven by the trigger controller and the recoil engine:
/// `Idle -> Firing` on a permitted trigger event, `Firing -> Cooldown`
/// when the force envelope has fully played out, `Cooldown -> Idle` once
/// the weapon's cooldown (measured from discharge start) has elapsed.
///
/// # Example
/// ```
/// use bevy_recoil_dynamics::types::TriggerPhase;
///
/// let phase = TriggerPhase::Idle;
/// assert_eq!(phase, TriggerPhase::default());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Reflect)]
pub enum TriggerPhase {
    #[default]
    /// Ready to accept a discharge
    Idle,
    /// A discharge's force/rotation pulse is playing out
    Firing,
    /// Pulse complete, waiting out the fire-rate cooldown
    Cooldown,
}

/// Haptic device abstraction for force-feedback hardware.
///
/// This trait is the boundary between the recoil core and the physical
/// device driver. The simulation writes one frame per fixed tick; the
/// implementation is expected to be non-blocking (a missed frame produces
/// one fewer force update, never a stall).
///
/// # Example
/// ```
/// use bevy::prelude::*;
/// use bevy_recoil_dynamics::types::HapticSink;
///
/// struct NullDevice;
///
/// impl HapticSink for NullDevice {
///     fn write_frame(&mut self, _force: Vec3, _torque: Vec3) {}
/// }
/// ```
pub trait HapticSink: Send + Sync {
    /// Push one force/torque frame to the device, in device-native units.
    ///
    /// # Arguments
    /// * `force` - Linear force vector (N-scale)
    /// * `torque` - Torque vector about the grip (N·m-scale)
    fn write_frame(&mut self, force: Vec3, torque: Vec3);
}

/// Validation failure for a [`crate::resources::WeaponProfile`].
///
/// Profiles are rejected at configuration time so the runtime tick path
/// never sees non-positive masses or inverted envelopes.
#[derive(Debug, Clone, PartialEq)]
pub enum ProfileError {
    /// A physical quantity that must be strictly positive was not.
    NonPositive {
        /// Name of the offending field
        field: &'static str,
        /// The rejected value
        value: f32,
    },
    /// The recovery-push fraction κ was outside its tuned range.
    RecoveryFractionOutOfRange(f32),
}

impl std::fmt::Display for ProfileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProfileError::NonPositive { field, value } => {
                write!(f, "weapon profile field `{field}` must be > 0, got {value}")
            }
            ProfileError::RecoveryFractionOutOfRange(v) => {
                write!(f, "recovery fraction must be within [0.05, 0.3], got {v}")
            }
        }
    }
}

impl std::error::Error for ProfileError {}
