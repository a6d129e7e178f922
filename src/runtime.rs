// 50 Hz odometry loop with a staleness watchdog
//
// Each tick drains the serial line stream into the accumulator, then
// integrates whatever ticks piled up and publishes the results. The
// watchdog flags the encoder link as stale when no decodable sample
// has arrived for a while, so the host can tell "standing still" from
// "sensor gone quiet".

use std::time::{Duration, Instant};

use tokio::time::interval;
use tracing::{debug, error, info, warn};

use crate::config::{
    ENCODER_TIMEOUT, LOOP_HZ, SERIAL_BAUD, SERIAL_PORT, TOPIC_CONTACTS, TOPIC_EFFORT,
    TOPIC_HEALTH, TOPIC_POSE, TOPIC_WHEELS,
};
use crate::messages::{ContactBatch, PoseDelta, RuntimeHealth, WheelRotation};
use crate::odometry::{
    decode_line, wheel_rotation_degrees, DecodeError, EncoderAccumulator, OdometryIntegrator,
    VehicleGeometry,
};
use crate::ramp;
use crate::transport::LineTransport;

#[derive(Debug, Clone)]
pub struct RuntimeOptions {
    pub port: String,
    pub baudrate: u32,
    pub geometry: VehicleGeometry,
}

impl Default for RuntimeOptions {
    fn default() -> Self {
        Self {
            port: SERIAL_PORT.to_string(),
            baudrate: SERIAL_BAUD,
            geometry: VehicleGeometry::default(),
        }
    }
}

pub struct Runtime {
    accumulator: EncoderAccumulator,
    integrator: OdometryIntegrator,
    last_sample_at: Instant,
    serial_ok: bool,
    health: RuntimeHealth,
}

impl Runtime {
    pub fn new(integrator: OdometryIntegrator) -> Self {
        Self {
            accumulator: EncoderAccumulator::new(),
            integrator,
            last_sample_at: Instant::now(),
            serial_ok: true,
            health: RuntimeHealth::EncoderStale, // Start stale until first sample
        }
    }

    /// Feed one raw serial record through the decoder into the
    /// accumulator. Decode failures leave the accumulator untouched.
    fn on_line(&mut self, line: &str) {
        match decode_line(line) {
            Ok(sample) => {
                self.accumulator.observe(sample);
                self.last_sample_at = Instant::now();
            }
            Err(DecodeError::NoEncoderFields) => {
                // Boot chatter and partial lines are routine on this link
                debug!("Ignoring non-encoder record: {:?}", line);
            }
            Err(e) => warn!("Rejected encoder record {:?}: {}", line, e),
        }
    }

    /// Integrate the ticks accumulated since the previous step.
    /// Returns `None` when the vehicle did not move.
    fn step(&mut self) -> Option<(PoseDelta, WheelRotation)> {
        let (delta_left, delta_right) = self.accumulator.drain();
        let pose = self.integrator.integrate(delta_left, delta_right)?;

        let ticks_per_revolution = self.integrator.geometry().ticks_per_revolution;
        let wheels = WheelRotation {
            left_deg: wheel_rotation_degrees(delta_left, ticks_per_revolution),
            right_deg: wheel_rotation_degrees(delta_right, ticks_per_revolution),
        };
        Some((pose, wheels))
    }

    fn mark_serial_lost(&mut self) {
        self.serial_ok = false;
    }

    fn update_health(&mut self) -> RuntimeHealth {
        let next = if !self.serial_ok {
            RuntimeHealth::SerialLost
        } else if self.last_sample_at.elapsed() > ENCODER_TIMEOUT {
            RuntimeHealth::EncoderStale
        } else {
            RuntimeHealth::Ok
        };

        if next == RuntimeHealth::EncoderStale && self.health == RuntimeHealth::Ok {
            warn!(
                "No encoder sample for {:?}, marking stale",
                self.last_sample_at.elapsed()
            );
        }
        self.health = next;
        next
    }
}

pub async fn run(opts: RuntimeOptions) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let integrator = OdometryIntegrator::new(opts.geometry)?;

    info!("Opening Zenoh session...");
    let session = zenoh::open(zenoh::Config::default()).await?;

    info!("Setting up publishers and subscribers...");
    let contacts = session.declare_subscriber(TOPIC_CONTACTS).await?;
    let pub_pose = session.declare_publisher(TOPIC_POSE).await?;
    let pub_wheels = session.declare_publisher(TOPIC_WHEELS).await?;
    let pub_effort = session.declare_publisher(TOPIC_EFFORT).await?;
    let pub_health = session.declare_publisher(TOPIC_HEALTH).await?;

    let mut transport = LineTransport::open(&opts.port, opts.baudrate)?;
    let mut runtime = Runtime::new(integrator);
    let mut tick = interval(Duration::from_millis(1000 / LOOP_HZ));

    info!(
        "Runtime started: {}Hz loop, encoder link on {}",
        LOOP_HZ, opts.port
    );
    info!("Subscribed to: {}", TOPIC_CONTACTS);
    info!(
        "Publishing to: {}, {}, {}, {}",
        TOPIC_POSE, TOPIC_WHEELS, TOPIC_EFFORT, TOPIC_HEALTH
    );

    loop {
        tokio::select! {
            _ = tick.tick() => {}
            _ = tokio::signal::ctrl_c() => {
                info!("Shutting down, sending stop command");
                transport.send_stop();
                return Ok(());
            }
        }

        // 1. Drain all buffered serial records into the accumulator
        if runtime.serial_ok {
            match transport.poll_lines() {
                Ok(lines) => {
                    for line in &lines {
                        runtime.on_line(line);
                    }
                }
                Err(e) => {
                    // Hard transport failure; the loop keeps running so
                    // the host still sees health updates
                    error!("Encoder link lost: {}", e);
                    runtime.mark_serial_lost();
                }
            }
        }

        // 2. Drain pending contact batches (non-blocking), keep latest
        let mut latest_batch: Option<ContactBatch> = None;
        while let Ok(Some(sample)) = contacts.try_recv() {
            let payload = sample.payload().to_bytes();
            match serde_json::from_slice::<ContactBatch>(&payload) {
                Ok(batch) => latest_batch = Some(batch),
                Err(e) => {
                    warn!("Failed to parse contact batch: {}", e);
                }
            }
        }

        // 3. Integrate and publish pose + wheel spin, skipped when idle
        if let Some((pose, wheels)) = runtime.step() {
            pub_pose.put(serde_json::to_string(&pose)?).await?;
            pub_wheels.put(serde_json::to_string(&wheels)?).await?;
        }

        // 4. Ramp effort from the newest contact batch
        if let Some(batch) = latest_batch {
            if let Some(estimate) = ramp::estimate(&batch.normals, batch.forward) {
                pub_effort.put(serde_json::to_string(&estimate)?).await?;
            }
        }

        // 5. Publish health
        let health = runtime.update_health();
        pub_health.put(serde_json::to_string(&health)?).await?;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn runtime() -> Runtime {
        Runtime::new(OdometryIntegrator::new(VehicleGeometry::default()).unwrap())
    }

    #[test]
    fn test_lines_flow_into_step() {
        let mut rt = runtime();
        rt.on_line("L: 0, R: 0");
        rt.on_line("L: 30, R: 30");

        let (pose, wheels) = rt.step().expect("motion should produce a pose");
        assert!(pose.forward_distance_m > 0.0);
        assert_eq!(pose.yaw_delta_rad, 0.0);
        assert_eq!(wheels.left_deg, 360.0);
        assert_eq!(wheels.right_deg, 360.0);

        // Everything was drained; the next step is idle
        assert!(rt.step().is_none());
    }

    #[test]
    fn test_rejected_record_leaves_accumulator_untouched() {
        let mut rt = runtime();
        rt.on_line("L: 10, R: 10");
        rt.step();

        rt.on_line("L: abc, R: 3");
        rt.on_line("garbage");
        assert!(rt.step().is_none());
    }

    #[test]
    fn test_health_transitions() {
        let mut rt = runtime();
        assert_eq!(rt.update_health(), RuntimeHealth::EncoderStale);

        rt.on_line("L: 1, R: 2");
        assert_eq!(rt.update_health(), RuntimeHealth::Ok);

        rt.last_sample_at = Instant::now() - ENCODER_TIMEOUT - Duration::from_millis(1);
        assert_eq!(rt.update_health(), RuntimeHealth::EncoderStale);

        rt.mark_serial_lost();
        assert_eq!(rt.update_health(), RuntimeHealth::SerialLost);
    }
}
