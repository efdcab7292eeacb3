//! Math utilities: smoothing filters and 2-D vector helpers
//!
//! Vectors are nalgebra's `Vector2<f64>`; all signal math runs in double
//! precision so identical input sequences give identical output.

mod filter;

pub use filter::{Filter, JointFilter, JointSample, LowPassFilter};

/// Type alias for 2D vectors
pub type Vector2 = nalgebra::Vector2<f64>;

/// Snap each component with magnitude below `epsilon` to exactly zero
#[inline]
pub fn apply_deadzone(v: Vector2, epsilon: f64) -> Vector2 {
    v.map(|c| if c.abs() < epsilon { 0.0 } else { c })
}

/// Rescale `v` to `max_magnitude` if it is longer, preserving direction
#[inline]
pub fn clamp_magnitude(v: Vector2, max_magnitude: f64) -> Vector2 {
    let mag = v.norm();
    if mag > max_magnitude && mag > 0.0 {
        v * (max_magnitude / mag)
    } else {
        v
    }
}
