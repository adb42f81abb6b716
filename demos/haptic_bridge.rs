//! Wiring a custom device driver into the output stage.
//!
//! The bridge here just prints frames; a real driver would hand them to
//! the vendor SDK. The sink is called once per 1 kHz simulation tick and
//! must not block.

use bevy::app::ScheduleRunnerPlugin;
use bevy::prelude::*;
use bevy_recoil_dynamics::prelude::*;
use std::time::Duration;

/// Console stand-in for a force-feedback device driver.
struct ConsoleBridge {
    frames_written: u64,
}

impl HapticSink for ConsoleBridge {
    fn write_frame(&mut self, force: Vec3, torque: Vec3) {
        self.frames_written += 1;
        // Only voice the interesting frames; the idle stream is zeros.
        if force != Vec3::ZERO && self.frames_written % 10 == 0 {
            println!(
                "[DEVICE] force=({:+6.2}, {:+6.2}, {:+6.2})  torque=({:+5.3}, {:+5.3}, {:+5.3})",
                force.x, force.y, force.z, torque.x, torque.y, torque.z
            );
        }
    }
}

fn main() {
    println!("Starting Haptic Bridge Demo...");

    App::new()
        .add_plugins(MinimalPlugins.set(ScheduleRunnerPlugin::run_loop(Duration::from_secs_f64(
            1.0 / 60.0,
        ))))
        .add_plugins(RecoilCorePlugin)
        .insert_resource(HapticDevice::new(ConsoleBridge { frames_written: 0 }))
        .add_systems(Startup, setup)
        .add_systems(Update, drive_script)
        .run();
}

fn setup(mut commands: Commands) {
    bevy_recoil_dynamics::spawn_default_weapon_rigs(&mut commands);
}

fn drive_script(time: Res<Time>, mut input: ResMut<DeviceInput>) {
    let t = time.elapsed_secs();

    // Two pistol shots, release between them.
    input.trigger = (0.5..0.55).contains(&t) || (1.5..1.55).contains(&t);

    if t > 2.5 {
        println!("[FINISHED] Bridge demo complete.");
        std::process::exit(0);
    }
}
