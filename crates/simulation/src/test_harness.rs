//! # TestTrack: headless integration test harness for the railbed core
//!
//! Provides a fluent builder that wraps `bevy::app::App` + `SimulationPlugin`
//! for running inspection sessions without a window or renderer.

use bevy::app::App;
use bevy::prelude::*;

use crate::config::RAIL_Z_POSITION;
use crate::history::{ChannelHistories, RunningMaxima};
use crate::inspection::{
    ActiveInspection, ClearInspectionEvent, InspectEvent, InspectionPoint, InspectionReadout,
};
use crate::piezo::PiezoState;
use crate::stress::SurfaceKind;
use crate::wheel_loads::WheelSnapshot;
use crate::{ManualClock, SimTime, SimulationPlugin, StressParams};

/// A headless Bevy App wrapping `SimulationPlugin` for integration testing.
///
/// The harness owns the clock: it inserts [`ManualClock`] so `SimTime` only
/// moves when a `tick_*` method says so, which keeps the piezo differentiator
/// deterministic. Use builder methods to lay out wheels, open a session with
/// `inspect_*`, then tick and assert on the published state.
pub struct TestTrack {
    app: App,
    now: f64,
}

impl TestTrack {
    // -----------------------------------------------------------------------
    // Constructors
    // -----------------------------------------------------------------------

    /// Create an empty track: no wheels, no open session, clock at zero.
    pub fn new() -> Self {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);

        // Insert the marker BEFORE SimulationPlugin so advance_sim_time
        // defers to the harness clock.
        app.insert_resource(ManualClock);
        app.add_plugins(SimulationPlugin);

        // Run one update so Startup validation executes.
        app.update();

        Self { app, now: 0.0 }
    }

    // -----------------------------------------------------------------------
    // Setup (builder pattern, consumes and returns Self)
    // -----------------------------------------------------------------------

    /// Park a wheel at (x, z) at axle height.
    pub fn with_wheel(mut self, x: f32, z: f32) -> Self {
        self.app
            .world_mut()
            .resource_mut::<WheelSnapshot>()
            .push(Vec3::new(x, 1.0, z));
        self
    }

    /// Park a wheel at an exact position.
    pub fn with_wheel_at(mut self, position: Vec3) -> Self {
        self.app
            .world_mut()
            .resource_mut::<WheelSnapshot>()
            .push(position);
        self
    }

    /// Override the heatmap stress scale.
    pub fn with_stress_scale(mut self, scale: f32) -> Self {
        self.app
            .world_mut()
            .resource_mut::<StressParams>()
            .stress_scale = scale;
        self
    }

    // -----------------------------------------------------------------------
    // Session control
    // -----------------------------------------------------------------------

    /// Open (or move) an inspection session at an arbitrary point.
    /// Takes effect on the next tick.
    pub fn inspect_at(&mut self, position: Vec3, surface: SurfaceKind) {
        self.app
            .world_mut()
            .send_event(InspectEvent { position, surface });
    }

    /// Inspect the near rail at the given x.
    pub fn inspect_rail(&mut self, x: f32) {
        self.inspect_at(Vec3::new(x, 0.0, RAIL_Z_POSITION), SurfaceKind::Rail);
    }

    /// Inspect a sleeper point at (x, z).
    pub fn inspect_sleeper(&mut self, x: f32, z: f32) {
        self.inspect_at(Vec3::new(x, 0.0, z), SurfaceKind::Sleeper);
    }

    /// End the current session. Takes effect on the next tick.
    pub fn clear_inspection(&mut self) {
        self.app.world_mut().send_event(ClearInspectionEvent);
    }

    /// Replace the whole wheel layout, e.g. to move a train between ticks.
    pub fn move_wheels(&mut self, positions: impl IntoIterator<Item = Vec3>) {
        self.app
            .world_mut()
            .resource_mut::<WheelSnapshot>()
            .set_from(positions);
    }

    // -----------------------------------------------------------------------
    // Simulation
    // -----------------------------------------------------------------------

    /// Advance the harness clock to an absolute time and run one update.
    pub fn tick_at(&mut self, now: f64) {
        self.now = now;
        self.app.world_mut().resource_mut::<SimTime>().now = now;
        self.app.update();
    }

    /// Advance the harness clock by `dt` seconds and run one update.
    pub fn tick_dt(&mut self, dt: f64) {
        self.tick_at(self.now + dt);
    }

    /// Run N ticks of 100ms each.
    pub fn tick(&mut self, n: u32) {
        for _ in 0..n {
            self.tick_dt(0.1);
        }
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// Access the ECS world mutably (needed for queries in Bevy).
    pub fn world_mut(&mut self) -> &mut World {
        self.app.world_mut()
    }

    /// Current harness clock, seconds.
    pub fn now(&self) -> f64 {
        self.now
    }

    /// The published per-tick readout.
    pub fn readout(&self) -> &InspectionReadout {
        self.app.world().resource::<InspectionReadout>()
    }

    /// The piezo integrator state.
    pub fn piezo(&self) -> &PiezoState {
        self.app.world().resource::<PiezoState>()
    }

    /// Session peaks across all four channels.
    pub fn maxima(&self) -> &RunningMaxima {
        self.app.world().resource::<RunningMaxima>()
    }

    /// Chart sample buffers.
    pub fn histories(&self) -> &ChannelHistories {
        self.app.world().resource::<ChannelHistories>()
    }

    /// The point currently under inspection, if a session is open.
    pub fn active_point(&self) -> Option<InspectionPoint> {
        self.app.world().resource::<ActiveInspection>().0
    }

    /// Get a reference to any resource.
    pub fn resource<T: Resource>(&self) -> &T {
        self.app.world().resource::<T>()
    }

    // -----------------------------------------------------------------------
    // Assertions
    // -----------------------------------------------------------------------

    /// Assert a session is open and publishing.
    pub fn assert_session_open(&self) {
        assert!(
            self.readout().active,
            "Expected an open inspection session, found none"
        );
    }

    /// Assert no session is open.
    pub fn assert_session_closed(&self) {
        assert!(
            !self.readout().active,
            "Expected no inspection session, found one at {:?}",
            self.active_point()
        );
    }

    /// Assert the published stress is within tolerance of the expected value.
    pub fn assert_stress_near(&self, expected: f32, tolerance: f32) {
        let actual = self.readout().raw_stress;
        assert!(
            (actual - expected).abs() <= tolerance,
            "Expected stress ~{expected} (±{tolerance}), got {actual}"
        );
    }

    /// Assert harvested energy has passed a threshold.
    pub fn assert_energy_above(&self, min: f64) {
        let energy = self.piezo().cumulative_energy;
        assert!(energy > min, "Expected energy > {min} J, got {energy} J");
    }

    /// Assert a resource has been initialized (exists in the world).
    pub fn assert_resource_exists<T: Resource>(&self) {
        assert!(
            self.app.world().get_resource::<T>().is_some(),
            "Expected resource {} to exist",
            std::any::type_name::<T>()
        );
    }
}
