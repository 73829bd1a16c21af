use bevy::prelude::*;

pub mod config;
pub mod heatmap;
pub mod history;
pub mod inspection;
pub mod piezo;
pub mod stress;
pub mod wheel_loads;

#[cfg(any(test, feature = "bench"))]
pub mod test_harness;

use config::{CHARACTERISTIC_LENGTH, DEFAULT_STRESS_SCALE, WHEEL_LOAD};
use history::{ChannelHistories, RunningMaxima};
use inspection::{ActiveInspection, ClearInspectionEvent, InspectEvent, InspectionReadout};
use piezo::{PiezoParams, PiezoState};
use wheel_loads::WheelSnapshot;

// ---------------------------------------------------------------------------
// Core resources
// ---------------------------------------------------------------------------

/// Simulation clock in seconds, read by the piezo differentiator and chart
/// timestamps.
///
/// Normally mirrors `Time::elapsed_secs_f64` each tick. Hosts that need a
/// deterministic clock (tests, replay tooling) insert [`ManualClock`] and
/// write `now` themselves.
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct SimTime {
    pub now: f64,
}

/// Marker resource: while present, `advance_sim_time` leaves [`SimTime`]
/// untouched.
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct ManualClock;

/// Global tick counter incremented each Update, used for throttling the chart
/// recorder.
#[derive(Resource, Default)]
pub struct TickCounter(pub u64);

/// Beam-on-elastic-foundation parameters shared by every stress query.
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct StressParams {
    /// Characteristic length of the rail/foundation system, m.
    pub l_char: f32,
    /// Static load per wheel, N.
    pub load_p: f32,
    /// Pa-to-unit-intensity factor feeding the heatmap.
    pub stress_scale: f32,
}

impl Default for StressParams {
    fn default() -> Self {
        Self {
            l_char: CHARACTERISTIC_LENGTH,
            load_p: WHEEL_LOAD,
            stress_scale: DEFAULT_STRESS_SCALE,
        }
    }
}

impl StressParams {
    /// Panics on parameters the stress model cannot work with.
    pub fn validate(&self) {
        assert!(self.l_char > 0.0, "characteristic length must be positive");
        assert!(self.load_p > 0.0, "wheel load must be positive");
        assert!(self.stress_scale > 0.0, "stress scale must be positive");
    }
}

// ---------------------------------------------------------------------------
// Core systems
// ---------------------------------------------------------------------------

fn validate_params(stress: Res<StressParams>, piezo: Res<PiezoParams>) {
    stress.validate();
    piezo.validate();
}

/// Mirror the engine clock into [`SimTime`] unless a host drives it manually.
pub fn advance_sim_time(
    time: Res<Time>,
    manual: Option<Res<ManualClock>>,
    mut sim: ResMut<SimTime>,
) {
    if manual.is_some() {
        return;
    }
    sim.now = time.elapsed_secs_f64();
}

pub fn count_tick(mut tick: ResMut<TickCounter>) {
    tick.0 = tick.0.wrapping_add(1);
}

// ---------------------------------------------------------------------------
// Plugin
// ---------------------------------------------------------------------------

pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SimTime>()
            .init_resource::<TickCounter>()
            .init_resource::<WheelSnapshot>()
            .init_resource::<StressParams>()
            .init_resource::<PiezoParams>()
            .init_resource::<PiezoState>()
            .init_resource::<ActiveInspection>()
            .init_resource::<InspectionReadout>()
            .init_resource::<RunningMaxima>()
            .init_resource::<ChannelHistories>()
            .add_event::<InspectEvent>()
            .add_event::<ClearInspectionEvent>()
            .add_systems(Startup, validate_params)
            .add_systems(
                Update,
                (
                    advance_sim_time,
                    count_tick,
                    inspection::apply_inspection_events,
                    inspection::step_inspection,
                )
                    .chain(),
            );
    }
}

#[cfg(test)]
mod plugin_tests {
    use super::*;

    fn plugin_app() -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins).add_plugins(SimulationPlugin);
        app
    }

    #[test]
    fn test_plugin_initializes_all_resources() {
        let mut app = plugin_app();
        app.update();

        let world = app.world();
        assert!(world.contains_resource::<WheelSnapshot>());
        assert!(world.contains_resource::<StressParams>());
        assert!(world.contains_resource::<PiezoParams>());
        assert!(world.contains_resource::<ChannelHistories>());
        assert!(
            !world.resource::<InspectionReadout>().active,
            "no session should be open at startup"
        );
    }

    #[test]
    fn test_tick_counter_advances_each_update() {
        let mut app = plugin_app();
        app.update();
        app.update();
        app.update();
        assert_eq!(app.world().resource::<TickCounter>().0, 3);
    }

    #[test]
    fn test_sim_time_follows_engine_clock() {
        let mut app = plugin_app();
        app.update();
        app.update();

        let world = app.world();
        let engine = world.resource::<Time>().elapsed_secs_f64();
        assert_eq!(world.resource::<SimTime>().now, engine);
    }

    #[test]
    fn test_manual_clock_freezes_sim_time() {
        let mut app = plugin_app();
        app.insert_resource(ManualClock);
        app.world_mut().resource_mut::<SimTime>().now = 42.5;

        app.update();
        app.update();

        assert_eq!(
            app.world().resource::<SimTime>().now,
            42.5,
            "manual clock hosts own the sim time"
        );
    }

    #[test]
    fn test_default_params_pass_validation() {
        StressParams::default().validate();
    }

    #[test]
    #[should_panic(expected = "characteristic length must be positive")]
    fn test_zero_characteristic_length_is_rejected() {
        StressParams {
            l_char: 0.0,
            ..Default::default()
        }
        .validate();
    }
}
