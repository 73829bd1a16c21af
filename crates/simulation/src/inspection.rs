//! Inspection sessions: which track point is being probed, and the per-tick
//! readout pipeline for it.
//!
//! A pick (from a viewer's raycast, the demo script, or a test) starts a
//! session at one query point. Every tick while the session is active the
//! core aggregates stress from the current wheel snapshot, runs the piezo
//! chain, refreshes the running maxima, and publishes an `InspectionReadout`
//! for dashboards to display. Chart samples are appended on the recording
//! interval rather than every tick.
//!
//! Picking a new point (or clearing) resets the piezo state, the maxima, and
//! the readout in a single system pass, so no tick can observe voltage
//! memory from one point paired with stress from another.

use bevy::prelude::*;
use serde::Serialize;

use crate::config::HISTORY_RECORD_INTERVAL;
use crate::heatmap::{rgb_array, surface_color};
use crate::history::{ChannelHistories, RunningMaxima};
use crate::piezo::{self, PiezoParams, PiezoState};
use crate::stress::{surface_stress, SurfaceKind};
use crate::wheel_loads::WheelSnapshot;
use crate::{SimTime, StressParams, TickCounter};

// =============================================================================
// Resources and events
// =============================================================================

/// A probed location on the track.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct InspectionPoint {
    pub position: Vec3,
    pub surface: SurfaceKind,
}

/// The currently inspected point, if any.
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct ActiveInspection(pub Option<InspectionPoint>);

/// Start (or move) an inspection session at the given point.
#[derive(Event, Debug, Clone, Copy)]
pub struct InspectEvent {
    pub position: Vec3,
    pub surface: SurfaceKind,
}

/// End the current inspection session.
#[derive(Event, Debug, Clone, Copy, Default)]
pub struct ClearInspectionEvent;

/// Published output of the inspection pipeline, refreshed every tick while a
/// session is active. Display collaborators read this instead of re-deriving
/// any of the model.
#[derive(Resource, Debug, Clone, Copy, Default, Serialize)]
pub struct InspectionReadout {
    pub active: bool,
    /// Aggregate stress at the point, Pa (negative = relief).
    pub raw_stress: f32,
    /// Piezo open-circuit voltage, V.
    pub voltage: f32,
    /// Displacement current, A.
    pub current: f32,
    /// Instantaneous power, W.
    pub power: f32,
    /// Rectified harvested energy since the session started, J.
    pub cumulative_energy: f64,
    /// Heatmap swatch for the point, sRGB.
    pub color: [f32; 3],
}

// =============================================================================
// Systems
// =============================================================================

/// Consume pick/clear events. The newest pick in a tick wins; a pick in the
/// same tick as a clear re-opens the session.
pub fn apply_inspection_events(
    mut picks: EventReader<InspectEvent>,
    mut clears: EventReader<ClearInspectionEvent>,
    mut active: ResMut<ActiveInspection>,
    mut piezo: ResMut<PiezoState>,
    mut maxima: ResMut<RunningMaxima>,
    mut readout: ResMut<InspectionReadout>,
) {
    let cleared = !clears.is_empty();
    clears.clear();
    let picked = picks.read().last().copied();

    if !cleared && picked.is_none() {
        return;
    }

    // Differentiator memory, energy integral, session peaks, and the
    // published readout all belong to the old session. They swap out in the
    // same pass as the point itself.
    *piezo = PiezoState::default();
    maxima.reset();
    *readout = InspectionReadout::default();

    match picked {
        Some(pick) => {
            active.0 = Some(InspectionPoint {
                position: pick.position,
                surface: pick.surface,
            });
            info!(
                "inspecting {} point at ({:.1}, {:.1}, {:.1})",
                pick.surface.label(),
                pick.position.x,
                pick.position.y,
                pick.position.z
            );
        }
        None => {
            active.0 = None;
            info!("inspection cleared");
        }
    }
}

/// Run one inspection tick: stress aggregation, piezo chain, maxima, chart
/// recording, readout publishing. No-op while no point is inspected.
#[allow(clippy::too_many_arguments)]
pub fn step_inspection(
    time: Res<SimTime>,
    tick: Res<TickCounter>,
    active: Res<ActiveInspection>,
    snapshot: Res<WheelSnapshot>,
    stress_params: Res<StressParams>,
    piezo_params: Res<PiezoParams>,
    mut piezo_state: ResMut<PiezoState>,
    mut maxima: ResMut<RunningMaxima>,
    mut histories: ResMut<ChannelHistories>,
    mut readout: ResMut<InspectionReadout>,
) {
    let Some(point) = active.0 else {
        return;
    };

    let raw = surface_stress(
        point.position,
        point.surface,
        snapshot.active(),
        stress_params.l_char,
        stress_params.load_p,
    );
    let reading = piezo::step(&mut piezo_state, &piezo_params, raw, time.now);
    let color = surface_color(raw, point.surface, stress_params.stress_scale);

    maxima.observe(raw, reading.voltage, reading.current, reading.power);
    if tick.0.is_multiple_of(HISTORY_RECORD_INTERVAL) {
        histories.record(time.now, raw, reading.voltage, reading.current, reading.power);
    }

    *readout = InspectionReadout {
        active: true,
        raw_stress: raw,
        voltage: reading.voltage,
        current: reading.current,
        power: reading.power,
        cumulative_energy: piezo_state.cumulative_energy,
        color: rgb_array(color),
    };
}

// =============================================================================
// Tests
// =============================================================================
