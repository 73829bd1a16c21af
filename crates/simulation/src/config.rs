use bevy::math::Vec3;

// Track geometry. The track runs along the X axis; the two rails sit at
// z = +RAIL_Z_POSITION and z = -RAIL_Z_POSITION.
pub const RAIL_Z_POSITION: f32 = 3.0;

/// Lateral gate for rail points: a wheel only loads a rail point when it runs
/// on that rail (|wheel.z - point.z| below this).
pub const RAIL_CONTACT_GATE: f32 = 2.0;

/// Along-track cutoff: wheels further than this in X contribute nothing.
/// At x = 50 with L = 13 the decay term is exp(-3.85) ~ 0.02, so the cutoff
/// truncates well into the negligible tail.
pub const LOAD_INFLUENCE_RADIUS: f32 = 50.0;

/// Sleeper lateral falloff spread between the rails (|z| < RAIL_Z_POSITION).
pub const SLEEPER_FALLOFF_INNER: f32 = 6.0;
/// Sleeper lateral falloff spread outside the rails (the overhang decays faster).
pub const SLEEPER_FALLOFF_OUTER: f32 = 4.0;

// Beam-on-elastic-foundation parameters.

/// Characteristic length L of the rail/foundation system, in world units.
pub const CHARACTERISTIC_LENGTH: f32 = 13.0;
/// Static load per wheel, in newtons.
pub const WHEEL_LOAD: f32 = 125_000.0;
/// Default scale mapping raw stress (Pa) to heatmap intensity [0, 1].
/// 1e-6 puts the single-wheel peak (0.25 * P * L = 406 250) mid-gradient.
pub const DEFAULT_STRESS_SCALE: f32 = 1.0e-6;

// Piezoelectric transducer material constants.

/// Element thickness in meters.
pub const PIEZO_THICKNESS: f32 = 0.1;
/// Piezoelectric voltage constant g33 (V*m/N).
pub const PIEZO_VOLTAGE_CONSTANT: f32 = 0.02;
/// Relative permittivity of the ceramic.
pub const PIEZO_EPSILON_R: f32 = 1300.0;
/// Vacuum permittivity (F/m).
pub const PIEZO_EPSILON_0: f32 = 8.854e-12;
/// Electrode area in square meters.
pub const PIEZO_AREA: f32 = 0.01;
/// Demo gain applied to the parallel-plate capacitance.
pub const PIEZO_CAPACITANCE_MULTIPLIER: f32 = 25.0;
/// Demo gain applied to the displacement current.
pub const PIEZO_CURRENT_MULTIPLIER: f32 = 25.0;

/// Derived plate capacitance including the demo gain, in farads.
pub const PIEZO_CAPACITANCE: f32 =
    PIEZO_EPSILON_R * PIEZO_EPSILON_0 * PIEZO_AREA / PIEZO_THICKNESS * PIEZO_CAPACITANCE_MULTIPLIER;

// Wheel snapshot buffer.

/// Fixed wheel slot count: collaborators may report at most this many wheels.
pub const MAX_WHEELS: usize = 80;

/// Padding position for unused wheel slots. Every component is far outside
/// every gate, so a padded slot can never contribute stress.
pub const WHEEL_SENTINEL: Vec3 = Vec3::new(-1.0e6, -1000.0, -1.0e6);

// Sample recording.

/// Rolling sample buffer length per channel.
pub const HISTORY_CAPACITY: usize = 100;
/// Chart samples are appended every Nth tick; maxima and energy update every tick.
pub const HISTORY_RECORD_INTERVAL: u64 = 5;
