//! Stress-to-color mapping for the track heatmap.
//!
//! One code path colors both the numeric readout and any mesh overlay a
//! viewer builds on top of it, so the dashboard swatch and the per-vertex
//! gradient can never drift apart.
//!
//! Compression (positive stress) runs through a six-stop gradient from deep
//! blue through cyan/green/yellow/red into a brownish saturation color, with
//! uneven segment widths tuned so the interesting mid-range gets the most
//! hue resolution. Relief (negative stress) uses a separate dark-to-blue
//! blend on both surfaces.

use bevy::prelude::*;

use crate::stress::SurfaceKind;

// ---------------------------------------------------------------------------
// Gradient tables
// ---------------------------------------------------------------------------

/// Compression gradient stops as `[r, g, b]` in sRGB.
pub const HEAT_STOPS: [[f32; 3]; 6] = [
    [0.0, 0.0, 0.502], // 0    - deep blue (idle track)
    [0.0, 1.0, 1.0],   // 0.15 - cyan
    [0.0, 1.0, 0.0],   // 0.3  - green
    [1.0, 1.0, 0.0],   // 0.45 - yellow
    [1.0, 0.0, 0.0],   // 0.6  - red
    [0.4, 0.1, 0.0],   // 0.8+ - brownish red (saturated)
];

/// Upper intensity bound of each gradient segment; above the last bound the
/// color saturates at the terminal stop.
pub const HEAT_THRESHOLDS: [f32; 5] = [0.15, 0.3, 0.45, 0.6, 0.8];

const RELIEF_DARK: [f32; 3] = [0.05, 0.05, 0.05];
const RELIEF_BLUE: [f32; 3] = [0.0, 0.5, 1.0];

/// Relief lobes are an order of magnitude weaker than the compression peak,
/// so their intensity gets boosted before clamping.
pub const RELIEF_INTENSITY_GAIN: f32 = 2.0;

/// Sleepers see the wheel load through the fastening, damped relative to the
/// rail head, and get a contrast boost on the display scale.
pub const SLEEPER_STRESS_FACTOR: f32 = 0.6;
pub const SLEEPER_SCALE_FACTOR: f32 = 1.5;

fn lerp3(a: [f32; 3], b: [f32; 3], t: f32) -> [f32; 3] {
    [
        a[0] + (b[0] - a[0]) * t,
        a[1] + (b[1] - a[1]) * t,
        a[2] + (b[2] - a[2]) * t,
    ]
}

// ---------------------------------------------------------------------------
// Color functions
// ---------------------------------------------------------------------------

/// Map a compression intensity (raw stress times display scale) onto the
/// heat gradient. Intensities at or above the last threshold return the
/// terminal stop.
pub fn heat_color(intensity: f32) -> Color {
    let intensity = intensity.max(0.0);
    let mut lo = 0.0_f32;
    for (i, &hi) in HEAT_THRESHOLDS.iter().enumerate() {
        if intensity < hi {
            let t = (intensity - lo) / (hi - lo);
            let c = lerp3(HEAT_STOPS[i], HEAT_STOPS[i + 1], t);
            return Color::srgb(c[0], c[1], c[2]);
        }
        lo = hi;
    }
    let c = HEAT_STOPS[5];
    Color::srgb(c[0], c[1], c[2])
}

/// Color for relief (negative) stress: dark gray blending into blue as the
/// uplift strengthens. Shared by both surfaces.
pub fn relief_color(raw_stress: f32, stress_scale: f32) -> Color {
    let t = (raw_stress.abs() * stress_scale * RELIEF_INTENSITY_GAIN).clamp(0.0, 1.0);
    let c = lerp3(RELIEF_DARK, RELIEF_BLUE, t);
    Color::srgb(c[0], c[1], c[2])
}

/// Heatmap color for a rail point.
pub fn rail_color(raw_stress: f32, stress_scale: f32) -> Color {
    if raw_stress < 0.0 {
        relief_color(raw_stress, stress_scale)
    } else {
        heat_color(raw_stress * stress_scale)
    }
}

/// Heatmap color for a sleeper point.
pub fn sleeper_color(raw_stress: f32, stress_scale: f32) -> Color {
    if raw_stress < 0.0 {
        relief_color(raw_stress, stress_scale)
    } else {
        heat_color(raw_stress * SLEEPER_STRESS_FACTOR * stress_scale * SLEEPER_SCALE_FACTOR)
    }
}

/// Heatmap color for either surface.
pub fn surface_color(raw_stress: f32, kind: SurfaceKind, stress_scale: f32) -> Color {
    match kind {
        SurfaceKind::Rail => rail_color(raw_stress, stress_scale),
        SurfaceKind::Sleeper => sleeper_color(raw_stress, stress_scale),
    }
}

/// Extract sRGB components for readout publishing.
pub fn rgb_array(color: Color) -> [f32; 3] {
    let s = color.to_srgba();
    [s.red, s.green, s.blue]
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
