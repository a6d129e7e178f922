// Ramp climb estimation
//
// Maps the averaged contact-surface normal to a signed ramp angle and
// a motor effort percentage for the host UI. Uphill along the forward
// reference is positive, downhill negative.

use glam::Vec3;

use crate::messages::RampEstimate;

// Angle magnitudes below this are treated as flat ground
const DEAD_ZONE_DEG: f32 = 2.0;
// Effort ramps linearly up to this slope; anything steeper gets no drive
const MAX_SLOPE_DEG: f32 = 30.0;
// PWM floor keeps the motors above their stall threshold
const PWM_FLOOR: f32 = 16.0;
const PWM_MAX: f32 = 255.0;

/// Estimate the ramp angle and motor effort from one batch of contact
/// normals.
///
/// Returns `None` for an empty batch, or for a degenerate one whose
/// normals cancel out; the caller keeps its previous estimate.
pub fn estimate(normals: &[Vec3], forward: Vec3) -> Option<RampEstimate> {
    if normals.is_empty() {
        return None;
    }

    let sum: Vec3 = normals.iter().copied().sum();
    let normal = (sum / normals.len() as f32).try_normalize()?;

    let ramp_angle_deg = signed_ramp_angle(normal, forward);
    let pwm = slope_to_pwm(ramp_angle_deg);

    Some(RampEstimate {
        ramp_angle_deg,
        effort_percent: effort_percent(pwm),
    })
}

/// Signed angle in degrees between the surface normal and world up,
/// rounded to one decimal and clamped to zero inside the dead-zone.
/// The sign is taken about the `up x forward` axis, so tilting the
/// surface toward the vehicle's nose flips it.
fn signed_ramp_angle(normal: Vec3, forward: Vec3) -> f32 {
    let axis = Vec3::Y.cross(forward).normalize_or_zero();
    let sine = Vec3::Y.cross(normal).dot(axis);
    let cosine = Vec3::Y.dot(normal);
    let degrees = sine.atan2(cosine).to_degrees();

    // One-decimal rounding stabilizes jitter from noisy contact points
    let rounded = (degrees * 10.0).round() / 10.0;
    if rounded.abs() < DEAD_ZONE_DEG {
        0.0
    } else {
        rounded
    }
}

/// Map a ramp angle onto a signed PWM command. The interpolation is
/// anchored at the dead-zone boundary, so a barely-detectable slope
/// lands on the floor value rather than jumping partway up the range.
fn slope_to_pwm(angle_deg: f32) -> i16 {
    let magnitude = angle_deg.abs();
    if magnitude == 0.0 || magnitude > MAX_SLOPE_DEG {
        return 0;
    }

    let t = (magnitude - DEAD_ZONE_DEG) / (MAX_SLOPE_DEG - DEAD_ZONE_DEG);
    let pwm = (PWM_FLOOR + (PWM_MAX - PWM_FLOOR) * t).round() as i16;
    if angle_deg < 0.0 { -pwm } else { pwm }
}

fn effort_percent(pwm: i16) -> u8 {
    let percent = ((pwm.abs() as f32 - 15.0) / 240.0 * 100.0).round();
    percent.clamp(0.0, 100.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Quat;

    // A batch of identical normals for a surface tilted `deg` about the
    // up x forward axis (forward = +Z, so the axis is +X)
    fn tilted_normals(deg: f32) -> Vec<Vec3> {
        let normal = Quat::from_axis_angle(Vec3::X, deg.to_radians()) * Vec3::Y;
        vec![normal; 3]
    }

    #[test]
    fn test_empty_batch_yields_nothing() {
        assert!(estimate(&[], Vec3::Z).is_none());
    }

    #[test]
    fn test_flat_ground() {
        let est = estimate(&tilted_normals(0.0), Vec3::Z).unwrap();
        assert_eq!(est.ramp_angle_deg, 0.0);
        assert_eq!(est.effort_percent, 0);
    }

    #[test]
    fn test_dead_zone_clamps_small_angles() {
        let est = estimate(&tilted_normals(1.5), Vec3::Z).unwrap();
        assert_eq!(est.ramp_angle_deg, 0.0);
        assert_eq!(est.effort_percent, 0);
    }

    #[test]
    fn test_just_past_dead_zone_is_minimum_effort() {
        // 2.1 degrees lands on the PWM floor, which converts to ~0%
        let est = estimate(&tilted_normals(2.1), Vec3::Z).unwrap();
        assert_eq!(est.ramp_angle_deg, 2.1);
        assert!(est.effort_percent <= 1);
    }

    #[test]
    fn test_max_slope_is_full_effort() {
        let est = estimate(&tilted_normals(30.0), Vec3::Z).unwrap();
        assert_eq!(est.ramp_angle_deg, 30.0);
        assert_eq!(est.effort_percent, 100);
    }

    #[test]
    fn test_steeper_than_max_gets_no_drive() {
        let est = estimate(&tilted_normals(45.0), Vec3::Z).unwrap();
        assert_eq!(est.effort_percent, 0);
    }

    #[test]
    fn test_uphill_and_downhill_have_opposite_signs() {
        let uphill = estimate(&tilted_normals(10.0), Vec3::Z).unwrap();
        let downhill = estimate(&tilted_normals(-10.0), Vec3::Z).unwrap();
        assert!(uphill.ramp_angle_deg > 0.0);
        assert!(downhill.ramp_angle_deg < 0.0);
        assert_eq!(uphill.ramp_angle_deg, -downhill.ramp_angle_deg);
        // Effort magnitude does not depend on direction
        assert_eq!(uphill.effort_percent, downhill.effort_percent);
    }

    #[test]
    fn test_noisy_normals_average_out() {
        // Jittered around 10 degrees; the average lands close enough
        // that one-decimal rounding still reads a stable slope
        let normals = vec![
            Quat::from_axis_angle(Vec3::X, 9.8_f32.to_radians()) * Vec3::Y,
            Quat::from_axis_angle(Vec3::X, 10.2_f32.to_radians()) * Vec3::Y,
            Quat::from_axis_angle(Vec3::X, 10.0_f32.to_radians()) * Vec3::Y,
        ];
        let est = estimate(&normals, Vec3::Z).unwrap();
        assert!((est.ramp_angle_deg - 10.0).abs() < 0.11);
    }

    #[test]
    fn test_degenerate_batch_yields_nothing() {
        // Opposing normals cancel to zero length
        assert!(estimate(&[Vec3::Y, Vec3::NEG_Y], Vec3::Z).is_none());
    }

    #[test]
    fn test_slope_to_pwm_endpoints() {
        assert_eq!(slope_to_pwm(0.0), 0);
        assert_eq!(slope_to_pwm(2.0), 16);
        assert_eq!(slope_to_pwm(30.0), 255);
        assert_eq!(slope_to_pwm(-30.0), -255);
        assert_eq!(slope_to_pwm(30.1), 0);
    }

    #[test]
    fn test_effort_percent_range() {
        assert_eq!(effort_percent(0), 0);
        assert_eq!(effort_percent(16), 0);
        assert_eq!(effort_percent(-255), 100);
    }
}
