// Differential-drive odometry runtime
//
// Reads wheel-encoder tick counts as text lines from a serial link,
// integrates them into rigid-body pose deltas at a fixed rate, and
// publishes pose, wheel spin, ramp-climb effort and health over Zenoh
// for the host engine to consume.

pub mod config;
pub mod messages;
pub mod odometry;
pub mod ramp;
pub mod runtime;
pub mod transport;
