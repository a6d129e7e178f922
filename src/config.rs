// Timeouts, topics, serial configuration
use std::time::Duration;

// Runtime loop frequency
pub const LOOP_HZ: u64 = 50;

// Encoder data counts as stale after this long without a decoded sample
pub const ENCODER_TIMEOUT: Duration = Duration::from_millis(500);

// Zenoh topics
pub const TOPIC_POSE: &str = "diffdrive/rt/pose"; // pose deltas
pub const TOPIC_WHEELS: &str = "diffdrive/rt/wheels"; // cosmetic wheel spin
pub const TOPIC_EFFORT: &str = "diffdrive/rt/effort"; // ramp climb estimate
pub const TOPIC_HEALTH: &str = "diffdrive/state/health"; // health status
pub const TOPIC_CONTACTS: &str = "diffdrive/host/contacts"; // contact normals from host

// Serial link to the encoder board
pub const SERIAL_PORT: &str = "/dev/ttyUSB0";
pub const SERIAL_BAUD: u32 = 115_200;
