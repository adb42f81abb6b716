//! # Bevy Recoil Dynamics
//!
//! Haptic recoil synthesis plugin for Bevy 0.18.
//!
//! ## Features
//! - Two-phase (recoil + recovery) force/torque envelope per discharge
//! - Multiple weapon types: pistol, bolt-action sniper, full-auto rifle
//! - Fire-mode gating: per-press, cooldown and held-burst policies
//! - Deterministic per-shot jitter from seeded RNG
//! - Muzzle-rise rotation composed onto the weapon's resting pose
//! - Device boundary via a non-blocking `HapticSink` trait
//!
//! ## Quick Start
//! ```rust,no_run
//! use bevy::prelude::*;
//! use bevy_recoil_dynamics::prelude::*;
//!
//! fn main() {
//!     App::new()
//!         .add_plugins(DefaultPlugins)
//!         .add_plugins(RecoilPluginGroup)
//!         .run();
//! }
//! ```

pub mod components;
pub mod events;
pub mod resources;
pub mod systems;
pub mod types;


pub mod prelude {
    pub use crate::components::*;
    pub use crate::events::*;
    pub use crate::resources::*;
    pub use crate::types::*;
    pub use crate::RecoilPluginGroup;
    pub use crate::{RecoilCorePlugin, RecoilDebugPlugin, RecoilOutputPlugin};
}

use bevy::prelude::*;

/// Fixed simulation rate for the haptic loop (Hz).
///
/// Force-feedback devices expect close to 1 kHz updates for stable
/// rendering of sharp transients like a recoil impulse.
pub const HAPTIC_RATE_HZ: f64 = 1000.0;

/// Main plugin group that includes all recoil subsystems.
///
/// This plugin group bundles together the full recoil pipeline:
/// - Trigger gating and envelope synthesis (core)
/// - Haptic command publishing and render-rate pose composition (output)
/// - Discharge logging (debug)
///
/// # Example
/// ```rust,no_run
/// use bevy::prelude::*;
/// use bevy_recoil_dynamics::prelude::*;
///
/// fn main() {
///     App::new()
///         .add_plugins(DefaultPlugins)
///         .add_plugins(RecoilPluginGroup)
///         .run();
/// }
/// ```
#[derive(Default)]
pub struct RecoilPluginGroup;

impl PluginGroup for RecoilPluginGroup {
    /// Builds the plugin group by adding all recoil plugins.
    fn build(self) -> bevy::app::PluginGroupBuilder {
        bevy::app::PluginGroupBuilder::start::<Self>()
            .add(RecoilCorePlugin)
            .add(RecoilOutputPlugin)
            .add(RecoilDebugPlugin)
    }
}

/// Core simulation plugin (trigger gating, envelope synthesis).
///
/// Registers the recoil components and resources, adds the discharge and
/// switch messages, raises the fixed timestep to the haptic rate and
/// schedules the simulation chain. Order within a tick matters and is
/// fixed: selector first (a switch must zero force before anything else
/// runs), then the recoil engine advance, then the trigger controller (so
/// a pulse completing this tick can unlock a same-tick full-auto
/// re-fire), then the output publish.
///
/// # Systems
/// - `apply_weapon_switch` - Exclusive weapon selection, synchronous zero-force
/// - `advance_recoil` - Envelope advance for every weapon
/// - `update_trigger` - Edge detection and fire-mode gating
/// - `publish_haptic_command` - Snapshot write, clamping, device forward
pub struct RecoilCorePlugin;

impl Plugin for RecoilCorePlugin {
    /// Builds the core plugin by registering components and adding systems.
    fn build(&self, app: &mut App) {
        app.register_type::<components::WeaponRig>()
            .register_type::<components::RecoilState>()
            .init_resource::<resources::WeaponProfiles>()
            .init_resource::<resources::RecoilConfig>()
            .init_resource::<resources::DeviceInput>()
            .init_resource::<resources::TriggerState>()
            .init_resource::<resources::ActiveWeapon>()
            .init_resource::<resources::HapticCommand>()
            .add_message::<events::DischargeEvent>()
            .add_message::<events::WeaponSwitchEvent>()
            .insert_resource(Time::<Fixed>::from_hz(HAPTIC_RATE_HZ))
            .add_systems(
                FixedUpdate,
                (
                    systems::selector::apply_weapon_switch,
                    systems::recoil::advance_recoil,
                    systems::trigger::update_trigger,
                    systems::output::publish_haptic_command,
                )
                    .chain(),
            );
    }
}

/// Render-side plugin (weapon pose composition).
///
/// Runs at render rate, reading only state the fixed-rate simulation
/// produced: the device rotation from the input snapshot, the rig's
/// resting orientation and the live muzzle-rise offset.
///
/// # Systems
/// - `apply_weapon_rotation` - Composes the visual weapon orientation
pub struct RecoilOutputPlugin;

impl Plugin for RecoilOutputPlugin {
    /// Builds the output plugin by adding the render-rate systems.
    fn build(&self, app: &mut App) {
        app.add_systems(Update, systems::output::apply_weapon_rotation);
    }
}

/// Debug plugin for recoil tracing.
pub struct RecoilDebugPlugin;

impl Plugin for RecoilDebugPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, systems::debug::log_discharges);
    }
}

/// Spawn one rig entity per weapon kind with idle recoil state.
///
/// Convenience for hosts (and the headless demos): rigs carry identity
/// resting orientations; applications with real models set their own via
/// [`components::WeaponRig::with_base_orientation`].
pub fn spawn_default_weapon_rigs(commands: &mut Commands) {
    for kind in types::WeaponKind::ALL {
        commands.spawn((
            components::WeaponRig::new(kind),
            components::RecoilState::default(),
            Transform::default(),
        ));
    }
}
