//! Rolling sample buffers and running maxima for the dashboard channels.
//!
//! Four channels are tracked while a point is inspected: raw stress, piezo
//! voltage, current, and power. Each keeps a fixed-length FIFO of timestamped
//! samples for trend sparklines (O(1) eviction via VecDeque) plus a running
//! absolute maximum for the session peak display.
//!
//! The buffers deliberately survive a re-pick so the trend charts keep
//! scrolling through an inspection change; only the maxima reset with the
//! session.

use std::collections::VecDeque;

use bevy::prelude::*;
use serde::Serialize;

use crate::config::HISTORY_CAPACITY;

// ---------------------------------------------------------------------------
// Sample buffer
// ---------------------------------------------------------------------------

/// One recorded sample: timestamp in seconds plus the channel value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub time: f64,
    pub value: f32,
}

/// Fixed-capacity FIFO: pushing past capacity evicts the oldest sample.
#[derive(Debug, Clone)]
pub struct SampleHistory {
    samples: VecDeque<Sample>,
    capacity: usize,
}

impl SampleHistory {
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "sample history needs at least one slot");
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, time: f64, value: f32) {
        if self.samples.len() >= self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(Sample { time, value });
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn latest(&self) -> Option<Sample> {
        self.samples.back().copied()
    }

    pub fn oldest(&self) -> Option<Sample> {
        self.samples.front().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Sample> {
        self.samples.iter()
    }

    /// Channel values oldest-first, the shape sparkline drawing wants.
    pub fn values(&self) -> Vec<f32> {
        self.samples.iter().map(|s| s.value).collect()
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }
}

// ---------------------------------------------------------------------------
// Resources
// ---------------------------------------------------------------------------

/// Rolling histories for the four dashboard channels.
#[derive(Resource, Debug, Clone)]
pub struct ChannelHistories {
    pub stress: SampleHistory,
    pub voltage: SampleHistory,
    pub current: SampleHistory,
    pub power: SampleHistory,
}

impl Default for ChannelHistories {
    fn default() -> Self {
        Self {
            stress: SampleHistory::new(HISTORY_CAPACITY),
            voltage: SampleHistory::new(HISTORY_CAPACITY),
            current: SampleHistory::new(HISTORY_CAPACITY),
            power: SampleHistory::new(HISTORY_CAPACITY),
        }
    }
}

impl ChannelHistories {
    /// Append one sample to every channel at a common timestamp.
    pub fn record(&mut self, time: f64, stress: f32, voltage: f32, current: f32, power: f32) {
        self.stress.push(time, stress);
        self.voltage.push(time, voltage);
        self.current.push(time, current);
        self.power.push(time, power);
    }
}

/// Largest absolute value seen per channel since the inspection session
/// started. Monotone within a session; reset on a new pick.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct RunningMaxima {
    pub stress: f32,
    pub voltage: f32,
    pub current: f32,
    pub power: f32,
}

impl RunningMaxima {
    pub fn observe(&mut self, stress: f32, voltage: f32, current: f32, power: f32) {
        self.stress = self.stress.max(stress.abs());
        self.voltage = self.voltage.max(voltage.abs());
        self.current = self.current.max(current.abs());
        self.power = self.power.max(power.abs());
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
