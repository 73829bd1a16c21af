//! Piezoelectric transducer under the inspected point.
//!
//! The element converts the aggregate stress into an open-circuit voltage
//! (`V = sigma * t * g33`), differentiates the voltage across samples into a
//! displacement current (`I = C * dV/dt * gain`), and integrates rectified
//! power into harvested energy. The capacitance is the parallel-plate value
//! for the ceramic, times a demo gain that keeps the readings in a range the
//! dashboard can show.
//!
//! The differentiator needs two samples: the first sample after a reset
//! carries zero current and adds no energy, it only primes the memory.

use bevy::prelude::*;

use crate::config::{
    PIEZO_CAPACITANCE, PIEZO_CURRENT_MULTIPLIER, PIEZO_THICKNESS, PIEZO_VOLTAGE_CONSTANT,
};

/// Electrical parameters of the transducer element.
#[derive(Resource, Debug, Clone)]
pub struct PiezoParams {
    /// Element thickness in meters.
    pub thickness: f32,
    /// Piezoelectric voltage constant g33 (V*m/N).
    pub voltage_constant: f32,
    /// Plate capacitance in farads, demo gain included.
    pub capacitance: f32,
    /// Demo gain on the displacement current.
    pub current_multiplier: f32,
}

impl Default for PiezoParams {
    fn default() -> Self {
        Self {
            thickness: PIEZO_THICKNESS,
            voltage_constant: PIEZO_VOLTAGE_CONSTANT,
            capacitance: PIEZO_CAPACITANCE,
            current_multiplier: PIEZO_CURRENT_MULTIPLIER,
        }
    }
}

impl PiezoParams {
    /// Open-circuit voltage for a given raw stress.
    pub fn voltage(&self, raw_stress: f32) -> f32 {
        raw_stress * self.thickness * self.voltage_constant
    }

    /// Panics if any parameter is non-positive. Run once at startup.
    pub fn validate(&self) {
        assert!(self.thickness > 0.0, "piezo thickness must be positive");
        assert!(
            self.voltage_constant > 0.0,
            "piezo voltage constant must be positive"
        );
        assert!(self.capacitance > 0.0, "piezo capacitance must be positive");
        assert!(
            self.current_multiplier > 0.0,
            "piezo current multiplier must be positive"
        );
    }
}

/// Per-session transducer state: differentiator memory plus the energy
/// integral. Reset whenever the inspected point changes.
#[derive(Resource, Debug, Clone, Default)]
pub struct PiezoState {
    /// Voltage seen on the previous sample.
    pub previous_voltage: f32,
    /// Timestamp of the previous sample in seconds; 0.0 until the first sample lands.
    pub last_sample_time: f64,
    /// Rectified harvested energy in joules.
    pub cumulative_energy: f64,
}

/// One sample of the transducer output.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PiezoReading {
    pub voltage: f32,
    pub current: f32,
    pub power: f32,
}

/// Advance the transducer one sample at timestamp `now` (seconds).
///
/// A zero or negative elapsed time (first sample, duplicate timestamp, clock
/// oddity) yields zero current and power and leaves the energy untouched; the
/// voltage memory and timestamp are still updated so the next sample has a
/// clean baseline.
pub fn step(
    state: &mut PiezoState,
    params: &PiezoParams,
    raw_stress: f32,
    now: f64,
) -> PiezoReading {
    let voltage = params.voltage(raw_stress);

    let dt = if state.last_sample_time > 0.0 {
        (now - state.last_sample_time) as f32
    } else {
        0.0
    };

    let current = if dt > 0.0 {
        params.capacitance * ((voltage - state.previous_voltage) / dt) * params.current_multiplier
    } else {
        0.0
    };
    let power = voltage * current;

    if dt > 0.0 {
        state.cumulative_energy += f64::from((power * dt).abs());
    }

    state.previous_voltage = voltage;
    state.last_sample_time = now;

    PiezoReading {
        voltage,
        current,
        power,
    }
}
