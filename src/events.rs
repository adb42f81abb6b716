//! Events for the recoil system.
//!
//! Note: In Bevy 0.18, buffered events use the `Message` trait instead of `Event`.

use bevy::ecs::message::Message;

use crate::types::WeaponKind;

/// Event fired when a weapon discharge begins.
///
/// Sent once per permitted trigger pull, at the moment the recoil engine
/// starts the force/rotation pulse. Hosts use it to drive muzzle flash,
/// audio, ammunition counters or scoring; the debug plugin logs it.
///
/// # Fields
/// * `kind` - Which weapon discharged
/// * `seed` - RNG seed used for this discharge's jitter (replaying the
///   seed reproduces the exact push direction and rise amplitude)
/// * `burst_index` - Position within the current held burst (0 for the
///   first shot; always 0 for per-press fire modes)
/// * `peak_force` - F0 the envelope will decay from
/// * `timestamp` - Simulation time at discharge start (seconds)
///
/// # Example
/// ```
/// use bevy_recoil_dynamics::events::DischargeEvent;
/// use bevy_recoil_dynamics::types::WeaponKind;
///
/// let event = DischargeEvent::new(WeaponKind::Rifle, 42)
///     .with_burst_index(2);
/// assert_eq!(event.burst_index, 2);
/// ```
#[derive(Message, Clone)]
pub struct DischargeEvent {
    /// Weapon that discharged
    pub kind: WeaponKind,
    /// Jitter seed for this discharge
    pub seed: u64,
    /// Shot position within the current burst
    pub burst_index: u32,
    /// Peak force the envelope decays from
    pub peak_force: f32,
    /// Simulation time at discharge start (seconds)
    pub timestamp: f64,
}

impl DischargeEvent {
    /// Creates a new DischargeEvent for the given weapon and seed.
    ///
    /// # Arguments
    /// * `kind` - Weapon that discharged
    /// * `seed` - Jitter seed used for the discharge
    ///
    /// # Returns
    /// A new DischargeEvent instance
    pub fn new(kind: WeaponKind, seed: u64) -> Self {
        Self {
            kind,
            seed,
            burst_index: 0,
            peak_force: 0.0,
            timestamp: 0.0,
        }
    }

    /// Sets the position within the current burst.
    pub fn with_burst_index(mut self, burst_index: u32) -> Self {
        self.burst_index = burst_index;
        self
    }

    /// Sets the peak force of the discharge envelope.
    pub fn with_peak_force(mut self, peak_force: f32) -> Self {
        self.peak_force = peak_force;
        self
    }

    /// Sets the simulation timestamp of the discharge.
    pub fn with_timestamp(mut self, timestamp: f64) -> Self {
        self.timestamp = timestamp;
        self
    }
}

/// Event fired when the active weapon changes.
///
/// Sent by the selector after the outgoing weapon's recoil state has been
/// reset and the shared haptic command has been zeroed. Hosts react by
/// swapping the visible model and any HUD labels.
///
/// # Fields
/// * `from` - Previously active weapon
/// * `to` - Newly active weapon
///
/// # Example
/// ```
/// use bevy_recoil_dynamics::events::WeaponSwitchEvent;
/// use bevy_recoil_dynamics::types::WeaponKind;
///
/// let event = WeaponSwitchEvent {
///     from: WeaponKind::Pistol,
///     to: WeaponKind::Sniper,
/// };
/// assert_ne!(event.from, event.to);
/// ```
#[derive(Message, Clone)]
pub struct WeaponSwitchEvent {
    /// Previously active weapon
    pub from: WeaponKind,
    /// Newly active weapon
    pub to: WeaponKind,
}
