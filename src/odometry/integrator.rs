// Differential-drive pose integration
//
// Converts accumulated tick deltas into a forward translation plus a
// yaw rotation about the axle midpoint:
//   forward = (left + right) / 2
//   yaw     = (right - left) / axle_length

use std::f32::consts::PI;

use thiserror::Error;

use crate::messages::PoseDelta;

/// Default rig geometry
pub const WHEEL_RADIUS_M: f32 = 0.3;
pub const AXLE_LENGTH_M: f32 = 0.5;
pub const TICKS_PER_REVOLUTION: f32 = 30.0;

#[derive(Debug, Clone, Copy)]
pub struct VehicleGeometry {
    pub wheel_radius_m: f32,
    pub axle_length_m: f32,
    pub ticks_per_revolution: f32,
    // Encoder wiring may reverse polarity independently per wheel
    pub invert_left: bool,
    pub invert_right: bool,
}

impl Default for VehicleGeometry {
    fn default() -> Self {
        Self {
            wheel_radius_m: WHEEL_RADIUS_M,
            axle_length_m: AXLE_LENGTH_M,
            ticks_per_revolution: TICKS_PER_REVOLUTION,
            invert_left: false,
            invert_right: false,
        }
    }
}

#[derive(Debug, Clone, Error)]
pub enum ConfigurationError {
    #[error("{name} must be a positive finite value, got {value}")]
    NonPositive { name: &'static str, value: f32 },
}

pub struct OdometryIntegrator {
    geometry: VehicleGeometry,
}

impl OdometryIntegrator {
    /// Validate the geometry up front; a zero axle length or tick
    /// resolution would otherwise surface as NaN poses at runtime.
    pub fn new(geometry: VehicleGeometry) -> Result<Self, ConfigurationError> {
        for (name, value) in [
            ("wheel_radius_m", geometry.wheel_radius_m),
            ("axle_length_m", geometry.axle_length_m),
            ("ticks_per_revolution", geometry.ticks_per_revolution),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigurationError::NonPositive { name, value });
            }
        }
        Ok(Self { geometry })
    }

    pub fn geometry(&self) -> &VehicleGeometry {
        &self.geometry
    }

    /// Integrate one step of accumulated deltas.
    ///
    /// Returns `None` when neither wheel moved, so an idle vehicle
    /// produces no updates rather than a stream of zero-motion poses.
    pub fn integrate(&self, delta_left: i32, delta_right: i32) -> Option<PoseDelta> {
        if delta_left == 0 && delta_right == 0 {
            return None;
        }

        let left = self.wheel_distance(delta_left, self.geometry.invert_left);
        let right = self.wheel_distance(delta_right, self.geometry.invert_right);

        Some(PoseDelta {
            forward_distance_m: (left + right) / 2.0,
            yaw_delta_rad: (right - left) / self.geometry.axle_length_m,
        })
    }

    fn wheel_distance(&self, delta_ticks: i32, invert: bool) -> f32 {
        let revolutions = delta_ticks as f32 / self.geometry.ticks_per_revolution;
        let distance = 2.0 * PI * self.geometry.wheel_radius_m * revolutions;
        if invert { -distance } else { distance }
    }
}

/// Per-wheel spin in degrees for the host renderer. Cosmetic only,
/// independent of the pose integration.
pub fn wheel_rotation_degrees(delta_ticks: i32, ticks_per_revolution: f32) -> f32 {
    delta_ticks as f32 / ticks_per_revolution * 360.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn integrator() -> OdometryIntegrator {
        OdometryIntegrator::new(VehicleGeometry::default()).unwrap()
    }

    #[test]
    fn test_straight_line_motion() {
        // 100 ticks on each wheel: 100/30 revolutions of a 0.3 m wheel
        let pose = integrator().integrate(100, 100).unwrap();
        let expected = 2.0 * PI * 0.3 * (100.0 / 30.0);
        assert!((pose.forward_distance_m - expected).abs() < 1e-4);
        assert_eq!(pose.yaw_delta_rad, 0.0);
    }

    #[test]
    fn test_pure_rotation() {
        // Right forward, left backward: spin in place, CCW positive
        let pose = integrator().integrate(-100, 100).unwrap();
        assert_eq!(pose.forward_distance_m, 0.0);
        assert!(pose.yaw_delta_rad > 0.0);

        let pose = integrator().integrate(100, -100).unwrap();
        assert!(pose.yaw_delta_rad < 0.0);
    }

    #[test]
    fn test_zero_delta_skipped() {
        assert!(integrator().integrate(0, 0).is_none());
    }

    #[test]
    fn test_invert_flags() {
        let geometry = VehicleGeometry {
            invert_left: true,
            invert_right: true,
            ..VehicleGeometry::default()
        };
        let inverted = OdometryIntegrator::new(geometry).unwrap();

        let pose = inverted.integrate(100, 100).unwrap();
        let reference = integrator().integrate(100, 100).unwrap();
        assert_eq!(pose.forward_distance_m, -reference.forward_distance_m);
    }

    #[test]
    fn test_invalid_geometry_rejected() {
        for geometry in [
            VehicleGeometry {
                ticks_per_revolution: 0.0,
                ..VehicleGeometry::default()
            },
            VehicleGeometry {
                axle_length_m: 0.0,
                ..VehicleGeometry::default()
            },
            VehicleGeometry {
                wheel_radius_m: -0.3,
                ..VehicleGeometry::default()
            },
            VehicleGeometry {
                axle_length_m: f32::NAN,
                ..VehicleGeometry::default()
            },
        ] {
            assert!(OdometryIntegrator::new(geometry).is_err());
        }
    }

    #[test]
    fn test_wheel_rotation_degrees() {
        // 30 ticks per revolution: 15 ticks is half a turn
        assert_eq!(wheel_rotation_degrees(15, 30.0), 180.0);
        assert_eq!(wheel_rotation_degrees(-30, 30.0), -360.0);
    }
}
