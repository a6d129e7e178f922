// Encoder monitor: read-only diagnostic for the serial encoder link
//
// Polls the port, shows every decoded sample plus the integrated pose
// once per second. Run this before the full runtime to verify wiring
// and tick polarity.
//
// Usage: cargo run --example encoder_monitor -- [port]
// Example: cargo run --example encoder_monitor -- /dev/ttyUSB0

use std::thread::sleep;
use std::time::{Duration, Instant};

use diffdrive_runtime::config::{SERIAL_BAUD, SERIAL_PORT};
use diffdrive_runtime::odometry::{
    decode_line, DecodeError, EncoderAccumulator, OdometryIntegrator, VehicleGeometry,
};
use diffdrive_runtime::transport::LineTransport;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Setup logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("info".parse().unwrap()),
        )
        .init();

    // Get port from args or use default
    let port = std::env::args()
        .nth(1)
        .unwrap_or_else(|| SERIAL_PORT.to_string());

    println!("Encoder monitor (read-only)");
    println!("Serial port: {} at {} baud", port, SERIAL_BAUD);
    println!("Press Ctrl+C to quit.");
    println!();

    let mut transport = LineTransport::open(&port, SERIAL_BAUD)?;
    let mut accumulator = EncoderAccumulator::new();
    let integrator = OdometryIntegrator::new(VehicleGeometry::default())?;

    let mut total_records = 0u64;
    let mut rejected_records = 0u64;
    let mut last_report = Instant::now();

    loop {
        for line in transport.poll_lines()? {
            total_records += 1;
            match decode_line(&line) {
                Ok(sample) => {
                    println!(
                        "  sample: L={} R={}",
                        sample.left_ticks, sample.right_ticks
                    );
                    accumulator.observe(sample);
                }
                Err(DecodeError::NoEncoderFields) => {
                    // Boot chatter; counted but not shown
                    rejected_records += 1;
                }
                Err(e) => {
                    rejected_records += 1;
                    println!("  rejected {:?}: {}", line, e);
                }
            }
        }

        // Integrate once per second so slow rigs still show motion
        if last_report.elapsed() >= Duration::from_secs(1) {
            let (delta_left, delta_right) = accumulator.drain();
            match integrator.integrate(delta_left, delta_right) {
                Some(pose) => println!(
                    "pose: forward={:.4} m, yaw={:.4} rad (ticks L={} R={})",
                    pose.forward_distance_m, pose.yaw_delta_rad, delta_left, delta_right
                ),
                None => println!(
                    "pose: no motion ({} records, {} rejected)",
                    total_records, rejected_records
                ),
            }
            last_report = Instant::now();
        }

        sleep(Duration::from_millis(20));
    }
}
