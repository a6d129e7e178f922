// Encoder odometry module
//
// Provides:
// - Line decoding for the encoder wire format ("L: <n>, R: <n>")
// - Tick delta accumulation between integration steps
// - Differential-drive pose integration

mod accumulator;
mod decoder;
mod integrator;

pub use accumulator::EncoderAccumulator;
pub use decoder::{decode_line, DecodeError, EncoderSample};
pub use integrator::{
    wheel_rotation_degrees, ConfigurationError, OdometryIntegrator, VehicleGeometry,
};
