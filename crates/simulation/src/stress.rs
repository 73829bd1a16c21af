//! Closed-form wheel-load stress field for the track surfaces.
//!
//! A wheel resting on the rail is modeled as a point load P on an infinite
//! beam on an elastic foundation (Winkler/Zimmermann). The bending stress a
//! distance x along the track from the load decays as
//!
//!   sigma(x) = -0.25 * P * L * exp(-x/L) * (sin(x/L) - cos(x/L))
//!
//! with L the characteristic length of the rail/foundation system. The sign
//! is flipped so compression under the wheel is positive; the oscillatory
//! term produces small negative (relief/uplift) lobes either side of the
//! load, which the heatmap renders as a distinct relief tint.
//!
//! A query point sees the superposition of every wheel that passes the
//! relevant gates: rail points only count wheels running on their own rail,
//! sleeper points split wheels by rail side and keep the dominant side.

use bevy::math::Vec3;
use serde::Serialize;

use crate::config::{
    LOAD_INFLUENCE_RADIUS, RAIL_CONTACT_GATE, RAIL_Z_POSITION, SLEEPER_FALLOFF_INNER,
    SLEEPER_FALLOFF_OUTER,
};

// =============================================================================
// Surface kinds
// =============================================================================

/// Which track surface a query point sits on. The two surfaces aggregate
/// wheel loads differently and use different heatmap intensity multipliers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SurfaceKind {
    Rail,
    Sleeper,
}

impl SurfaceKind {
    pub fn label(&self) -> &'static str {
        match self {
            SurfaceKind::Rail => "rail",
            SurfaceKind::Sleeper => "sleeper",
        }
    }
}

// =============================================================================
// Kernels
// =============================================================================

/// Bending stress at signed along-track distance `distance` from a point load
/// `p`, for characteristic length `l`. Even in `distance`; peaks at
/// `0.25 * p * l` directly under the load.
#[inline]
pub fn bending_stress(distance: f32, l: f32, p: f32) -> f32 {
    let x = distance.abs() / l;
    let decay = (-x).exp();
    -0.25 * p * l * decay * (x.sin() - x.cos())
}

/// Cubic Hermite step: 0 for `x <= edge0`, 1 for `x >= edge1`, smooth in
/// between. Matches the GLSL builtin.
#[inline]
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

// =============================================================================
// Surface aggregation
// =============================================================================

/// Total stress at a point on a rail: superposition of every wheel running on
/// that rail (lateral gate) within the along-track influence radius.
pub fn rail_stress(point: Vec3, wheels: &[Vec3], l: f32, p: f32) -> f32 {
    let mut total = 0.0_f32;
    for wheel in wheels {
        if (wheel.z - point.z).abs() >= RAIL_CONTACT_GATE {
            continue;
        }
        let dist_x = point.x - wheel.x;
        if dist_x.abs() >= LOAD_INFLUENCE_RADIUS {
            continue;
        }
        total += bending_stress(dist_x, l, p);
    }
    total
}

/// Total stress at a point on a sleeper.
///
/// Wheels are split by rail side (z > 0 is the left rail), each side summed
/// under the along-track gate; the side with the larger magnitude wins. The
/// result then falls off laterally with distance to the nearest rail line,
/// with a wider spread between the rails than on the overhang outside them.
pub fn sleeper_stress(point: Vec3, wheels: &[Vec3], l: f32, p: f32) -> f32 {
    let mut stress_left = 0.0_f32;
    let mut stress_right = 0.0_f32;
    for wheel in wheels {
        let dist_x = point.x - wheel.x;
        if dist_x.abs() >= LOAD_INFLUENCE_RADIUS {
            continue;
        }
        let s = bending_stress(dist_x, l, p);
        if wheel.z > 0.0 {
            stress_left += s;
        } else {
            stress_right += s;
        }
    }

    let base = if stress_left.abs() > stress_right.abs() {
        stress_left
    } else {
        stress_right
    };

    let dist_to_rail = (point.z - RAIL_Z_POSITION)
        .abs()
        .min((point.z + RAIL_Z_POSITION).abs());
    let spread = if point.z.abs() < RAIL_Z_POSITION {
        SLEEPER_FALLOFF_INNER
    } else {
        SLEEPER_FALLOFF_OUTER
    };
    let falloff = 1.0 - smoothstep(0.0, spread, dist_to_rail);

    base * falloff
}

/// Stress at a query point on either surface.
pub fn surface_stress(point: Vec3, kind: SurfaceKind, wheels: &[Vec3], l: f32, p: f32) -> f32 {
    match kind {
        SurfaceKind::Rail => rail_stress(point, wheels, l, p),
        SurfaceKind::Sleeper => sleeper_stress(point, wheels, l, p),
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CHARACTERISTIC_LENGTH, WHEEL_LOAD};

    const L: f32 = CHARACTERISTIC_LENGTH;
    const P: f32 = WHEEL_LOAD;

    fn approx_eq(a: f32, b: f32, tol: f32) -> bool {
        (a - b).abs() <= tol * b.abs().max(1.0)
    }

    #[test]
    fn bending_stress_peaks_under_the_load() {
        let peak = bending_stress(0.0, L, P);
        assert!(
            approx_eq(peak, 0.25 * P * L, 1e-5),
            "peak should be 0.25*P*L = {}, got {}",
            0.25 * P * L,
            peak
        );
    }

    #[test]
    fn bending_stress_is_even_in_distance() {
        for d in [0.5_f32, 3.0, 10.0, 25.0, 49.0] {
            let pos = bending_stress(d, L, P);
            let neg = bending_stress(-d, L, P);
            assert_eq!(pos, neg, "stress should be symmetric at |d| = {d}");
        }
    }

    #[test]
    fn bending_stress_has_relief_lobe() {
        // The sign flips where sin(x/L) = cos(x/L), i.e. x = L*pi/4.
        let flip = L * std::f32::consts::FRAC_PI_4;
        assert!(
            bending_stress(flip - 1.0, L, P) > 0.0,
            "inside the flip point stress is compressive"
        );
        assert!(
            bending_stress(flip + 1.0, L, P) < 0.0,
            "past the flip point stress goes into relief"
        );
    }

    #[test]
    fn bending_stress_decays_along_the_track() {
        let peak = bending_stress(0.0, L, P);
        let mid = bending_stress(L, L, P).abs();
        let far = bending_stress(49.0, L, P).abs();
        assert!(mid < peak, "magnitude at x=L should be below the peak");
        assert!(
            far < 0.03 * peak,
            "at the influence radius the tail should be negligible, got {far}"
        );
    }

    #[test]
    fn smoothstep_endpoints_and_midpoint() {
        assert_eq!(smoothstep(0.0, 6.0, -1.0), 0.0);
        assert_eq!(smoothstep(0.0, 6.0, 0.0), 0.0);
        assert_eq!(smoothstep(0.0, 6.0, 6.0), 1.0);
        assert_eq!(smoothstep(0.0, 6.0, 10.0), 1.0);
        assert!((smoothstep(0.0, 6.0, 3.0) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn smoothstep_is_monotonic() {
        let mut prev = 0.0_f32;
        for i in 0..=60 {
            let x = i as f32 * 0.1;
            let v = smoothstep(0.0, 6.0, x);
            assert!(v >= prev, "smoothstep should not decrease at x={x}");
            prev = v;
        }
    }

    #[test]
    fn rail_stress_ignores_the_other_rail() {
        let point = Vec3::new(0.0, 0.0, RAIL_Z_POSITION);
        let same_rail = [Vec3::new(0.0, 1.0, RAIL_Z_POSITION)];
        let other_rail = [Vec3::new(0.0, 1.0, -RAIL_Z_POSITION)];

        assert!(rail_stress(point, &same_rail, L, P) > 0.0);
        assert_eq!(
            rail_stress(point, &other_rail, L, P),
            0.0,
            "a wheel on the opposite rail must contribute exactly zero"
        );
    }

    #[test]
    fn rail_stress_gate_is_strict_at_the_influence_radius() {
        let point = Vec3::new(0.0, 0.0, RAIL_Z_POSITION);
        let at_edge = [Vec3::new(LOAD_INFLUENCE_RADIUS, 1.0, RAIL_Z_POSITION)];
        let inside = [Vec3::new(LOAD_INFLUENCE_RADIUS - 0.1, 1.0, RAIL_Z_POSITION)];

        assert_eq!(rail_stress(point, &at_edge, L, P), 0.0);
        assert_ne!(rail_stress(point, &inside, L, P), 0.0);
    }

    #[test]
    fn rail_stress_superposes_wheels() {
        let point = Vec3::new(0.0, 0.0, RAIL_Z_POSITION);
        let a = Vec3::new(-4.0, 1.0, RAIL_Z_POSITION);
        let b = Vec3::new(7.0, 1.0, RAIL_Z_POSITION);

        let combined = rail_stress(point, &[a, b], L, P);
        let separate = rail_stress(point, &[a], L, P) + rail_stress(point, &[b], L, P);
        assert!(
            (combined - separate).abs() < 1e-3,
            "two wheels should sum: {combined} vs {separate}"
        );
    }

    #[test]
    fn rail_stress_empty_wheels_is_zero() {
        let point = Vec3::new(12.0, 0.0, RAIL_Z_POSITION);
        assert_eq!(rail_stress(point, &[], L, P), 0.0);
    }

    #[test]
    fn sleeper_stress_takes_the_dominant_side() {
        // Two wheels on the left rail, one on the right: left side dominates.
        let wheels = [
            Vec3::new(0.0, 1.0, 2.5),
            Vec3::new(1.0, 1.0, 2.5),
            Vec3::new(0.0, 1.0, -2.5),
        ];
        // Query on the left rail line so the lateral falloff is 1.
        let point = Vec3::new(0.0, 0.0, RAIL_Z_POSITION);

        let left_only = rail_stress(point, &wheels[..2], L, P);
        let got = sleeper_stress(point, &wheels, L, P);
        assert!(
            (got - left_only).abs() < 1e-3,
            "dominant left side should pass through unscaled: {got} vs {left_only}"
        );
    }

    #[test]
    fn sleeper_stress_falls_off_toward_the_centerline() {
        let wheels = [Vec3::new(0.0, 1.0, 2.5)];
        let on_rail = sleeper_stress(Vec3::new(0.0, 0.0, RAIL_Z_POSITION), &wheels, L, P);
        let center = sleeper_stress(Vec3::new(0.0, 0.0, 0.0), &wheels, L, P);

        // Center sits 3 units from either rail; with the inner spread of 6
        // that is exactly the half-way point of the smoothstep.
        assert!(
            (center - on_rail * 0.5).abs() < on_rail * 1e-4,
            "centerline stress should be half the on-rail value: {center} vs {on_rail}"
        );
    }

    #[test]
    fn sleeper_stress_dies_on_the_far_overhang() {
        let wheels = [Vec3::new(0.0, 1.0, 2.5)];
        // 6 units past the rail line, outer spread is 4: falloff saturates to 0.
        let got = sleeper_stress(Vec3::new(0.0, 0.0, 9.0), &wheels, L, P);
        assert_eq!(got, 0.0, "beyond the outer spread the stress must vanish");
    }

    #[test]
    fn sleeper_stress_gates_only_on_along_track_distance() {
        // A wheel far down the track contributes nothing even though the
        // sleeper has no lateral gate.
        let wheels = [Vec3::new(LOAD_INFLUENCE_RADIUS + 1.0, 1.0, 2.5)];
        let got = sleeper_stress(Vec3::new(0.0, 0.0, RAIL_Z_POSITION), &wheels, L, P);
        assert_eq!(got, 0.0);
    }

    #[test]
    fn surface_stress_dispatches_by_kind() {
        let wheels = [Vec3::new(0.0, 1.0, 2.5)];
        let point = Vec3::new(0.0, 0.0, RAIL_Z_POSITION);

        let rail = surface_stress(point, SurfaceKind::Rail, &wheels, L, P);
        let sleeper = surface_stress(point, SurfaceKind::Sleeper, &wheels, L, P);
        assert_eq!(rail, rail_stress(point, &wheels, L, P));
        assert_eq!(sleeper, sleeper_stress(point, &wheels, L, P));
    }

    #[test]
    fn surface_kind_labels() {
        assert_eq!(SurfaceKind::Rail.label(), "rail");
        assert_eq!(SurfaceKind::Sleeper.label(), "sleeper");
    }
}
