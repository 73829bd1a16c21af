//! The demo consist: a 10-cart freight train and the systems that roll it
//! down the track and publish its axles into the shared wheel snapshot.

use bevy::prelude::*;

use simulation::wheel_loads::WheelSnapshot;

pub const CART_COUNT: usize = 10;
pub const CART_SPACING: f32 = 30.0;
/// Axle x offsets within one cart, two bogies of two axles each.
const AXLE_OFFSETS: [f32; 4] = [7.0, 4.0, -4.0, -7.0];
/// Wheels ride just inside the rails.
const WHEEL_HALF_GAUGE: f32 = 2.5;

const START_X: f32 = -200.0;
const CRUISE_SPEED: f32 = 18.0; // m/s
const ACCELERATION: f32 = 1.5; // m/s^2

/// Position and speed of the consist's lead cart. Carts trail behind the
/// head at fixed spacing.
#[derive(Resource)]
pub struct TrainConsist {
    pub head_x: f32,
    pub speed: f32,
}

impl Default for TrainConsist {
    fn default() -> Self {
        Self {
            head_x: START_X,
            speed: 0.0,
        }
    }
}

impl TrainConsist {
    /// All wheel positions for the current head position, both rails.
    pub fn wheel_positions(&self) -> impl Iterator<Item = Vec3> + '_ {
        (0..CART_COUNT).flat_map(move |cart| {
            let cart_x = self.head_x - cart as f32 * CART_SPACING;
            AXLE_OFFSETS.iter().flat_map(move |&offset| {
                let x = cart_x + offset;
                [
                    Vec3::new(x, 1.0, WHEEL_HALF_GAUGE),
                    Vec3::new(x, 1.0, -WHEEL_HALF_GAUGE),
                ]
            })
        })
    }
}

/// Accelerate to cruise speed and roll forward.
pub fn drive_train(time: Res<Time>, mut train: ResMut<TrainConsist>) {
    let dt = time.delta_secs();
    train.speed = (train.speed + ACCELERATION * dt).min(CRUISE_SPEED);
    train.head_x += train.speed * dt;
}

/// Publish the consist's axle layout into the wheel snapshot the stress
/// model aggregates from.
pub fn feed_wheel_snapshot(train: Res<TrainConsist>, mut snapshot: ResMut<WheelSnapshot>) {
    snapshot.set_from(train.wheel_positions());
}
