use bevy::app::ScheduleRunnerPlugin;
use bevy::ecs::message::MessageReader;
use bevy::prelude::*;
use bevy_recoil_dynamics::prelude::*;
use std::time::Duration;

fn main() {
    println!("Starting Headless Recoil Simulation...");
    println!("Scripted session: pistol shot, full-auto burst, sniper shot (approx 4 seconds)...");

    App::new()
        .add_plugins(MinimalPlugins.set(ScheduleRunnerPlugin::run_loop(Duration::from_secs_f64(
            1.0 / 60.0,
        ))))
        .add_plugins(RecoilCorePlugin)
        // Skip output and debug plugins (headless, no transforms to pose)
        .add_systems(Startup, setup_simulation)
        .add_systems(Update, (drive_script, report_discharges, report_switches))
        .run();
}

fn setup_simulation(mut commands: Commands) {
    println!("\n[SETUP] Spawning weapon rigs...");
    bevy_recoil_dynamics::spawn_default_weapon_rigs(&mut commands);
}

/// Scripted device input: what a user would do with the real handle.
fn drive_script(time: Res<Time>, mut input: ResMut<DeviceInput>) {
    let t = time.elapsed_secs();

    // One pistol shot at 0.5s.
    input.trigger = (0.5..0.55).contains(&t)
        || (1.2..1.6).contains(&t) // full-auto burst on the rifle
        || (2.4..2.45).contains(&t); // one sniper shot

    // Weapon switches between the firing windows.
    input.select_rifle = (1.0..1.05).contains(&t);
    input.select_sniper = (2.0..2.05).contains(&t);

    if t > 4.0 {
        println!("[FINISHED] Simulation complete.");
        std::process::exit(0);
    }
}

fn report_discharges(mut discharges: MessageReader<DischargeEvent>, command: Res<HapticCommand>) {
    for discharge in discharges.read() {
        println!(
            "[SHOT] {:?} at t={:.3}s burst={} F0={:.1} | published force {:.1}",
            discharge.kind,
            discharge.timestamp,
            discharge.burst_index,
            discharge.peak_force,
            command.force.length(),
        );
    }
}

fn report_switches(mut switches: MessageReader<WeaponSwitchEvent>) {
    for switch in switches.read() {
        println!("[SWITCH] {:?} -> {:?}", switch.from, switch.to);
    }
}
