use bevy::ecs::message::MessageReader;
use bevy::prelude::*;

use crate::events::DischargeEvent;
use crate::resources::RecoilConfig;

/// Log discharge events for tuning sessions.
///
/// Gated by `RecoilConfig::debug_log`; the reader is drained either way
/// so messages never pile up while logging is off.
pub fn log_discharges(config: Res<RecoilConfig>, mut discharges: MessageReader<DischargeEvent>) {
    if !config.debug_log {
        discharges.clear();
        return;
    }

    for discharge in discharges.read() {
        debug!(
            "discharge {:?} t={:.3}s burst={} F0={:.1} seed={:#x}",
            discharge.kind,
            discharge.timestamp,
            discharge.burst_index,
            discharge.peak_force,
            discharge.seed,
        );
    }
}
