//! Per-tick snapshot of wheel positions.
//!
//! The motion collaborator (demo consist, replay, or a future physics crate)
//! writes the full wheel set into `WheelSnapshot` once per tick, before the
//! stress systems run. The core only ever reads the snapshot, so one tick
//! sees one consistent set of positions.
//!
//! Storage is a fixed array of `MAX_WHEELS` slots; unused slots hold
//! `WHEEL_SENTINEL`, which fails every stress gate. Consumers that need a
//! fixed-size buffer (GPU uniform uploads) take `padded()`, everyone else
//! iterates `active()`; both views produce the same aggregate stress.

use bevy::prelude::*;

use crate::config::{MAX_WHEELS, WHEEL_SENTINEL};

#[derive(Resource, Debug, Clone)]
pub struct WheelSnapshot {
    positions: [Vec3; MAX_WHEELS],
    count: usize,
}

impl Default for WheelSnapshot {
    fn default() -> Self {
        Self {
            positions: [WHEEL_SENTINEL; MAX_WHEELS],
            count: 0,
        }
    }
}

impl WheelSnapshot {
    /// Drop all wheels and restore sentinel padding.
    pub fn clear(&mut self) {
        self.positions = [WHEEL_SENTINEL; MAX_WHEELS];
        self.count = 0;
    }

    /// Record one wheel. Reports past the slot limit are dropped.
    pub fn push(&mut self, position: Vec3) {
        if self.count >= MAX_WHEELS {
            warn!("WheelSnapshot: dropping wheel report past the {MAX_WHEELS}-slot limit");
            return;
        }
        self.positions[self.count] = position;
        self.count += 1;
    }

    /// Replace the whole snapshot in one call.
    pub fn set_from<I: IntoIterator<Item = Vec3>>(&mut self, wheels: I) {
        self.clear();
        for wheel in wheels {
            self.push(wheel);
        }
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// The live wheels only.
    pub fn active(&self) -> &[Vec3] {
        &self.positions[..self.count]
    }

    /// Every slot, sentinel padding included.
    pub fn padded(&self) -> &[Vec3; MAX_WHEELS] {
        &self.positions
    }
}
