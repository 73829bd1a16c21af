use std::time::Duration;

use bevy::app::ScheduleRunnerPlugin;
use bevy::log::LogPlugin;
use bevy::prelude::*;

use simulation::config::RAIL_Z_POSITION;
use simulation::history::RunningMaxima;
use simulation::inspection::{ActiveInspection, InspectEvent, InspectionReadout};
use simulation::stress::SurfaceKind;
use simulation::{SimTime, SimulationPlugin};

mod train;

use train::TrainConsist;

/// When the demo moves the probe from the rail to a sleeper, seconds.
const SLEEPER_SWAP_AT: f64 = 25.0;
/// Total demo length, seconds.
const DEMO_DURATION: f64 = 40.0;
/// Telemetry cadence, seconds.
const REPORT_INTERVAL: f64 = 1.0;

fn main() {
    let mut app = App::new();

    app.add_plugins(
        MinimalPlugins.set(ScheduleRunnerPlugin::run_loop(Duration::from_secs_f64(
            1.0 / 60.0,
        ))),
    )
    .add_plugins(LogPlugin {
        filter: "info".into(),
        ..default()
    })
    .add_plugins(SimulationPlugin)
    .init_resource::<TrainConsist>()
    .init_resource::<DemoScript>()
    .insert_resource(OutputMode {
        // JSON-lines mode for piping telemetry into other tools
        json: std::env::var("RAILBED_JSON").is_ok(),
    })
    .add_systems(Startup, open_initial_inspection)
    .add_systems(
        Update,
        (
            (train::drive_train, train::feed_wheel_snapshot)
                .chain()
                .before(simulation::advance_sim_time),
            swap_to_sleeper_midway,
            (report_telemetry, finish_demo)
                .chain()
                .after(simulation::inspection::step_inspection),
        ),
    );

    app.run();
}

/// One-shot cue tracker for the scripted demo.
#[derive(Resource, Default)]
struct DemoScript {
    swapped_to_sleeper: bool,
}

#[derive(Resource)]
struct OutputMode {
    json: bool,
}

fn open_initial_inspection(mut picks: EventWriter<InspectEvent>) {
    picks.send(InspectEvent {
        position: Vec3::new(0.0, 0.0, RAIL_Z_POSITION),
        surface: SurfaceKind::Rail,
    });
    info!("demo: inspecting the near rail at x=0");
}

fn swap_to_sleeper_midway(
    time: Res<SimTime>,
    mut script: ResMut<DemoScript>,
    mut picks: EventWriter<InspectEvent>,
) {
    if script.swapped_to_sleeper || time.now < SLEEPER_SWAP_AT {
        return;
    }
    script.swapped_to_sleeper = true;
    picks.send(InspectEvent {
        position: Vec3::new(0.0, 0.0, 1.5),
        surface: SurfaceKind::Sleeper,
    });
    info!("demo: moving the probe to a sleeper at x=0, z=1.5");
}

fn report_telemetry(
    time: Res<SimTime>,
    mode: Res<OutputMode>,
    active: Res<ActiveInspection>,
    readout: Res<InspectionReadout>,
    maxima: Res<RunningMaxima>,
    train: Res<TrainConsist>,
    mut last_report: Local<f64>,
) {
    if time.now - *last_report < REPORT_INTERVAL {
        return;
    }
    *last_report = time.now;

    if !readout.active {
        return;
    }

    if mode.json {
        let line = serde_json::json!({
            "t": time.now,
            "train_head_x": train.head_x,
            "point": active.0,
            "readout": *readout,
            "maxima": *maxima,
        });
        println!("{line}");
    } else {
        info!(
            "t={:5.1}s head={:7.1}m stress={:11.1} Pa V={:9.4} I={:.3e} A P={:.3e} W E={:.3e} J",
            time.now,
            train.head_x,
            readout.raw_stress,
            readout.voltage,
            readout.current,
            readout.power,
            readout.cumulative_energy
        );
    }
}

fn finish_demo(
    time: Res<SimTime>,
    readout: Res<InspectionReadout>,
    maxima: Res<RunningMaxima>,
    mut exit: EventWriter<AppExit>,
) {
    if time.now < DEMO_DURATION {
        return;
    }
    info!(
        "demo complete: peak stress {:.0} Pa, peak power {:.3e} W, harvested {:.3e} J",
        maxima.stress, maxima.power, readout.cumulative_energy
    );
    exit.send(AppExit::Success);
}
