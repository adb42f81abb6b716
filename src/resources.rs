//! Global resources for the recoil system.

use bevy::prelude::*;

use crate::types::{FireMode, HapticSink, ProfileError, WeaponKind};

/// Static physical constants and envelope tuning for one weapon kind.
///
/// Pure data: the recoil engine is a single parameterized code path and
/// every per-weapon difference lives here. The defaults mirror measured
/// constants for an M1911 pistol, a Dragunov-pattern marksman rifle and
/// an AK-pattern assault rifle.
///
/// # Fields
/// * `kind` - Weapon kind this profile describes
/// * `display_name` - Human-readable name for HUD labels
/// * `mass` - Firearm mass in kilograms
/// * `muzzle_velocity` - Bullet muzzle velocity in m/s
/// * `bullet_mass` - Bullet mass in kilograms
/// * `barrel_length` - Barrel length in meters
/// * `recoil_arm_length` - Effective lever length from grip to bore axis (m)
/// * `base_force_time_constant` - Characteristic recoil pulse duration (s)
/// * `fire_mode` - Discharge gating policy
/// * `cooldown_seconds` - Minimum time between discharges, measured from
///   discharge start; the burst interval for full-auto
/// * `recoil_phase_seconds` / `recovery_phase_seconds` - Envelope phase lengths
/// * `recovery_fraction` - κ, recovery push magnitude as a fraction of F0
/// * `recoil_decay` / `recovery_decay` - Exponential decay rates per phase
/// * `muzzle_rise_degrees` - Peak visual rotation amplitude
/// * `burst_force_ramp` - Per-shot force growth during a held burst
///
/// # Example
/// ```
/// use bevy_recoil_dynamics::resources::WeaponProfiles;
/// use bevy_recoil_dynamics::types::WeaponKind;
///
/// let profiles = WeaponProfiles::with_defaults();
/// let pistol = profiles.get(WeaponKind::Pistol);
/// assert!(pistol.mass > 0.0);
/// ```
#[derive(Clone, Reflect, serde::Serialize, serde::Deserialize)]
pub struct WeaponProfile {
    pub kind: WeaponKind,
    pub display_name: String,
    /// Firearm mass (kg)
    pub mass: f32,
    /// Bullet muzzle velocity (m/s)
    pub muzzle_velocity: f32,
    /// Bullet mass (kg)
    pub bullet_mass: f32,
    /// Barrel length (m)
    pub barrel_length: f32,
    /// Lever length from grip to bore axis (m)
    pub recoil_arm_length: f32,
    /// Characteristic recoil pulse duration (s)
    pub base_force_time_constant: f32,
    /// Discharge gating policy
    pub fire_mode: FireMode,
    /// Minimum time between discharges, from discharge start (s)
    pub cooldown_seconds: f32,
    /// High-force phase length (s)
    pub recoil_phase_seconds: f32,
    /// Settle-back phase length (s)
    pub recovery_phase_seconds: f32,
    /// κ: recovery push as a fraction of F0
    pub recovery_fraction: f32,
    /// λ for the recoil phase
    pub recoil_decay: f32,
    /// λ for the recovery phase
    pub recovery_decay: f32,
    /// Peak muzzle-rise amplitude (degrees)
    pub muzzle_rise_degrees: f32,
    /// Per-shot force growth while a burst is held (full-auto)
    pub burst_force_ramp: f32,
}

impl Default for WeaponProfile {
    /// Creates the default pistol profile.
    fn default() -> Self {
        Self::pistol()
    }
}

impl WeaponProfile {
    /// M1911-pattern semi-automatic handgun.
    pub fn pistol() -> Self {
        Self {
            kind: WeaponKind::Pistol,
            display_name: "M1911".to_string(),
            mass: 1.1,
            muzzle_velocity: 292.0,
            bullet_mass: 0.015,
            barrel_length: 0.127,
            recoil_arm_length: 0.0678,
            base_force_time_constant: 0.003,
            fire_mode: FireMode::SemiAuto,
            cooldown_seconds: 0.3,
            recoil_phase_seconds: 0.050,
            recovery_phase_seconds: 0.100,
            recovery_fraction: 0.12,
            recoil_decay: 3.0,
            recovery_decay: 4.0,
            muzzle_rise_degrees: 6.0,
            burst_force_ramp: 0.0,
        }
    }

    /// Dragunov-pattern marksman rifle, treated as bolt-action.
    pub fn sniper() -> Self {
        Self {
            kind: WeaponKind::Sniper,
            display_name: "DRAGUNOV".to_string(),
            mass: 4.3,
            muzzle_velocity: 830.0,
            bullet_mass: 0.0113,
            barrel_length: 0.62,
            recoil_arm_length: 0.045,
            base_force_time_constant: 0.01,
            fire_mode: FireMode::BoltAction,
            cooldown_seconds: 1.0,
            recoil_phase_seconds: 0.120,
            recovery_phase_seconds: 0.300,
            recovery_fraction: 0.25,
            recoil_decay: 3.5,
            recovery_decay: 2.0,
            muzzle_rise_degrees: 9.0,
            burst_force_ramp: 0.0,
        }
    }

    /// AK-pattern full-automatic assault rifle.
    pub fn rifle() -> Self {
        Self {
            kind: WeaponKind::Rifle,
            display_name: "AK47".to_string(),
            mass: 3.9,
            muzzle_velocity: 715.0,
            bullet_mass: 0.0079,
            barrel_length: 0.415,
            recoil_arm_length: 0.065,
            base_force_time_constant: 0.06,
            fire_mode: FireMode::FullAuto,
            cooldown_seconds: 0.120,
            recoil_phase_seconds: 0.060,
            recovery_phase_seconds: 0.060,
            recovery_fraction: 0.08,
            recoil_decay: 2.5,
            recovery_decay: 3.0,
            muzzle_rise_degrees: 2.5,
            burst_force_ramp: 0.1,
        }
    }

    /// Total envelope length of one discharge (seconds).
    pub fn pulse_duration(&self) -> f32 {
        self.recoil_phase_seconds + self.recovery_phase_seconds
    }

    /// Validate the physical constants.
    ///
    /// Rejecting bad profiles here keeps NaN and inverted envelopes out of
    /// the 1 kHz tick path entirely.
    ///
    /// # Returns
    /// `Ok(())` if every constant is usable, otherwise the first
    /// [`ProfileError`] found
    pub fn validate(&self) -> Result<(), ProfileError> {
        fn positive(field: &'static str, value: f32) -> Result<(), ProfileError> {
            if value > 0.0 {
                Ok(())
            } else {
                Err(ProfileError::NonPositive { field, value })
            }
        }

        positive("mass", self.mass)?;
        positive("muzzle_velocity", self.muzzle_velocity)?;
        positive("bullet_mass", self.bullet_mass)?;
        positive("barrel_length", self.barrel_length)?;
        positive("recoil_arm_length", self.recoil_arm_length)?;
        positive("base_force_time_constant", self.base_force_time_constant)?;
        positive("cooldown_seconds", self.cooldown_seconds)?;
        positive("recoil_phase_seconds", self.recoil_phase_seconds)?;
        positive("recovery_phase_seconds", self.recovery_phase_seconds)?;
        positive("recoil_decay", self.recoil_decay)?;
        positive("recovery_decay", self.recovery_decay)?;
        positive("muzzle_rise_degrees", self.muzzle_rise_degrees)?;
        if !(0.05..=0.3).contains(&self.recovery_fraction) {
            return Err(ProfileError::RecoveryFractionOutOfRange(self.recovery_fraction));
        }
        Ok(())
    }
}

/// Weapon profile table resource.
///
/// Dense per-kind storage, so lookup cannot fail once the table is
/// constructed. Replacing an entry re-validates it.
///
/// # Example
/// ```
/// use bevy_recoil_dynamics::resources::{WeaponProfile, WeaponProfiles};
/// use bevy_recoil_dynamics::types::WeaponKind;
///
/// let mut profiles = WeaponProfiles::with_defaults();
/// let mut hot_pistol = WeaponProfile::pistol();
/// hot_pistol.muzzle_velocity = 320.0;
/// profiles.insert(hot_pistol).unwrap();
/// assert_eq!(profiles.get(WeaponKind::Pistol).muzzle_velocity, 320.0);
/// ```
#[derive(Resource, Clone)]
pub struct WeaponProfiles {
    profiles: [WeaponProfile; 3],
}

impl Default for WeaponProfiles {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl WeaponProfiles {
    /// Creates the table with the built-in pistol/sniper/rifle profiles.
    pub fn with_defaults() -> Self {
        Self {
            profiles: [
                WeaponProfile::pistol(),
                WeaponProfile::sniper(),
                WeaponProfile::rifle(),
            ],
        }
    }

    /// Look up the profile for a weapon kind.
    pub fn get(&self, kind: WeaponKind) -> &WeaponProfile {
        &self.profiles[kind.index()]
    }

    /// Replace the profile for its kind after validating it.
    ///
    /// # Arguments
    /// * `profile` - The replacement profile; its `kind` field selects the slot
    ///
    /// # Returns
    /// `Ok(())` on success, or the validation error (table unchanged)
    pub fn insert(&mut self, profile: WeaponProfile) -> Result<(), ProfileError> {
        profile.validate()?;
        let idx = profile.kind.index();
        self.profiles[idx] = profile;
        Ok(())
    }
}

/// Global tuning for the recoil engine and its device output.
///
/// # Fields
/// * `force_scale` - k, converting the momentum-transfer analog into a
///   haptic-scale force (dimensionless, ~0.15-0.2)
/// * `direction_jitter` - Maximum lateral/vertical jitter on the push
///   direction, as a fraction of the forward component
/// * `max_force` / `max_torque` - Device protection clamps applied at the
///   output stage (device-native units)
/// * `jitter_seed` - Base seed mixed into every per-discharge RNG seed;
///   fixing it makes whole sessions reproducible
/// * `debug_log` - Enables discharge/clamp logging
///
/// # Example
/// ```
/// use bevy_recoil_dynamics::resources::RecoilConfig;
///
/// let config = RecoilConfig {
///     force_scale: 0.2,
///     ..Default::default()
/// };
/// assert!(config.max_force > 0.0);
/// ```
#[derive(Resource, Reflect, Clone, serde::Serialize, serde::Deserialize)]
#[reflect(Resource)]
pub struct RecoilConfig {
    /// Momentum-to-force conversion scalar (k)
    pub force_scale: f32,
    /// Max lateral jitter fraction of the forward push component
    pub direction_jitter: f32,
    /// Device force clamp (output stage)
    pub max_force: f32,
    /// Device torque clamp (output stage)
    pub max_torque: f32,
    /// Base seed for per-discharge jitter
    pub jitter_seed: u64,
    /// Log discharges and clamp events
    pub debug_log: bool,
}

impl Default for RecoilConfig {
    /// Creates a default RecoilConfig with the tuned haptic-scale values.
    ///
    /// Default values:
    /// - 0.15 force scale
    /// - 10% direction jitter
    /// - 25.0 N force clamp, 5.0 N·m torque clamp
    /// - Fixed base seed (sessions reproducible by default)
    /// - Logging disabled
    fn default() -> Self {
        Self {
            force_scale: 0.15,
            direction_jitter: 0.10,
            max_force: 25.0,
            max_torque: 5.0,
            jitter_seed: 0x5EED_CA55E77E,
            debug_log: false,
        }
    }
}

/// Per-tick boundary input from the haptic device.
///
/// The host's device bridge writes this resource once per simulation tick
/// (four switch states plus an optional device rotation); the recoil core
/// only ever reads it. No wire format is implied.
///
/// # Fields
/// * `trigger` - Trigger switch state
/// * `select_pistol` / `select_rifle` / `select_sniper` - Weapon select switches
/// * `rotation` - Device handle rotation for orientation blending, if the
///   device reports one
///
/// # Example
/// ```
/// use bevy_recoil_dynamics::resources::DeviceInput;
/// use bevy_recoil_dynamics::types::WeaponKind;
///
/// let input = DeviceInput {
///     select_rifle: true,
///     ..Default::default()
/// };
/// assert_eq!(input.selected_weapon(), Some(WeaponKind::Rifle));
/// ```
#[derive(Resource, Reflect, Clone, Default)]
#[reflect(Resource)]
pub struct DeviceInput {
    /// Trigger switch
    pub trigger: bool,
    /// Pistol select switch
    pub select_pistol: bool,
    /// Rifle select switch
    pub select_rifle: bool,
    /// Sniper select switch
    pub select_sniper: bool,
    /// Device handle rotation, if reported
    pub rotation: Option<Quat>,
}

impl DeviceInput {
    /// The weapon requested by the select switches this tick, if any.
    ///
    /// When several switches are held at once the pistol wins, then the
    /// rifle, matching the device's button numbering.
    pub fn selected_weapon(&self) -> Option<WeaponKind> {
        if self.select_pistol {
            Some(WeaponKind::Pistol)
        } else if self.select_rifle {
            Some(WeaponKind::Rifle)
        } else if self.select_sniper {
            Some(WeaponKind::Sniper)
        } else {
            None
        }
    }
}

/// Debounced trigger state for the single connected device.
///
/// The trigger controller edge-detects the raw switch into this resource;
/// transitions happen only on stable per-tick edges, which is the whole
/// debouncing strategy (no ad hoc timers).
///
/// # Fields
/// * `pressed` - Debounced trigger-down state
/// * `press_start` - Simulation time of the current press (seconds)
/// * `burst_count` - Shots fired in the current held burst
/// * `shot_counter` - Monotonic discharge index, mixed into jitter seeds
///
/// # Example
/// ```
/// use bevy_recoil_dynamics::resources::TriggerState;
///
/// let state = TriggerState::default();
/// assert!(!state.pressed);
/// assert_eq!(state.burst_count, 0);
/// ```
#[derive(Resource, Reflect, Clone, Default)]
#[reflect(Resource)]
pub struct TriggerState {
    /// Debounced trigger-down state
    pub pressed: bool,
    /// Simulation time of the current press (seconds)
    pub press_start: f64,
    /// Shots fired in the current held burst
    pub burst_count: u32,
    /// Monotonic discharge index
    pub shot_counter: u64,
}

/// Exclusive current weapon selection.
///
/// # Example
/// ```
/// use bevy_recoil_dynamics::resources::ActiveWeapon;
/// use bevy_recoil_dynamics::types::WeaponKind;
///
/// let active = ActiveWeapon::default();
/// assert!(active.is(WeaponKind::Pistol));
/// ```
#[derive(Resource, Reflect, Clone, Default)]
#[reflect(Resource)]
pub struct ActiveWeapon(WeaponKind);

impl ActiveWeapon {
    /// The currently active weapon.
    pub fn kind(&self) -> WeaponKind {
        self.0
    }

    /// Whether the given weapon is the active one.
    pub fn is(&self, kind: WeaponKind) -> bool {
        self.0 == kind
    }

    /// Make the given weapon active.
    pub fn set(&mut self, kind: WeaponKind) {
        self.0 = kind;
    }
}

/// Latest force/torque command, written once per simulation tick.
///
/// This is the single shared snapshot between the 1 kHz simulation chain
/// and the render-rate readers: the output system overwrites it atomically
/// at the end of every tick, and the selector zeroes it synchronously on a
/// weapon switch so a superseded discharge's force is never published.
/// `sequence` increments on every write so readers can detect staleness.
///
/// # Fields
/// * `force` - Force vector for the device (clamped, device-native units)
/// * `torque` - Torque vector for the device
/// * `source` - Weapon the command originates from, `None` when idle
/// * `sequence` - Monotonic write counter
///
/// # Example
/// ```
/// use bevy::prelude::*;
/// use bevy_recoil_dynamics::resources::HapticCommand;
///
/// let command = HapticCommand::default();
/// assert_eq!(command.force, Vec3::ZERO);
/// assert!(command.source.is_none());
/// ```
#[derive(Resource, Reflect, Clone, Default)]
#[reflect(Resource)]
pub struct HapticCommand {
    /// Force vector for the device
    pub force: Vec3,
    /// Torque vector for the device
    pub torque: Vec3,
    /// Weapon the command originates from
    pub source: Option<WeaponKind>,
    /// Monotonic write counter
    pub sequence: u64,
}

impl HapticCommand {
    /// Zero the command immediately.
    ///
    /// Counts as a write: the sequence advances so device bridges treat
    /// the zero as a fresh command, not a stale frame.
    pub fn clear(&mut self) {
        self.force = Vec3::ZERO;
        self.torque = Vec3::ZERO;
        self.source = None;
        self.sequence += 1;
    }
}

/// The connected haptic device, as a boxed [`HapticSink`].
///
/// Optional: when absent, the output stage still maintains
/// [`HapticCommand`] and hosts may poll the snapshot themselves.
///
/// # Example
/// ```
/// use bevy::prelude::*;
/// use bevy_recoil_dynamics::resources::HapticDevice;
/// use bevy_recoil_dynamics::types::HapticSink;
///
/// struct NullDevice;
/// impl HapticSink for NullDevice {
///     fn write_frame(&mut self, _force: Vec3, _torque: Vec3) {}
/// }
///
/// let device = HapticDevice::new(NullDevice);
/// # let _ = device;
/// ```
#[derive(Resource)]
pub struct HapticDevice(Box<dyn HapticSink>);

impl HapticDevice {
    /// Wrap a device driver for the output stage.
    pub fn new(sink: impl HapticSink + 'static) -> Self {
        Self(Box::new(sink))
    }

    /// Forward one frame to the device.
    pub fn write_frame(&mut self, force: Vec3, torque: Vec3) {
        self.0.write_frame(force, torque);
    }
}
