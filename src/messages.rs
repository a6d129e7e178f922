// Message types exchanged with the host engine

use glam::Vec3;
use serde::{Deserialize, Serialize};

// Pose change over one integration step, runtime -> host physics.
// Applied by composition on the host side, never as an absolute overwrite.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PoseDelta {
    pub forward_distance_m: f32,
    pub yaw_delta_rad: f32,
}

// Per-wheel spin for the host renderer, degrees per step (cosmetic only)
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct WheelRotation {
    pub left_deg: f32,
    pub right_deg: f32,
}

// Ramp climb estimate, runtime -> host UI ("Motor Force: {p}%")
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RampEstimate {
    pub ramp_angle_deg: f32,
    pub effort_percent: u8,
}

// Contact surface normals from the host, one batch per contact event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactBatch {
    pub normals: Vec<Vec3>,
    pub forward: Vec3,
}

/// Health status published by the runtime
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum RuntimeHealth {
    Ok,
    EncoderStale,
    SerialLost,
}
