// Keyboard contact publisher: W/S tilt the virtual ramp, F flat, Q quit
//
// Publishes synthetic ContactBatch messages so the ramp effort pipeline
// can be exercised without the host engine running.
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    terminal::{disable_raw_mode, enable_raw_mode},
};
use glam::{Quat, Vec3};
use serde_json::json;
use std::time::Duration;
use tracing::info;

use diffdrive_runtime::config::TOPIC_CONTACTS;

const ANGLE_STEP_DEG: f32 = 0.5;
const MAX_ANGLE_DEG: f32 = 45.0;
// Contact points per batch; mimics a few wheel/surface contacts
const NORMALS_PER_BATCH: usize = 3;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    info!("Opening Zenoh session...");
    let session = zenoh::open(zenoh::Config::default()).await?;
    let publisher = session.declare_publisher(TOPIC_CONTACTS).await?;

    info!("Controls: W/S=tilt up/down, F=flat, Q=quit");
    info!("Ramp angle: 0.0 deg");

    enable_raw_mode()?;
    let result = run_publisher(&publisher).await;
    disable_raw_mode()?;

    result
}

async fn run_publisher(
    publisher: &zenoh::pubsub::Publisher<'_>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let mut angle_deg: f32 = 0.0;

    loop {
        // Poll for key with 20ms timeout (50Hz effective rate)
        if event::poll(Duration::from_millis(20))? {
            if let Event::Key(KeyEvent { code, kind, .. }) = event::read()? {
                let pressed = kind == KeyEventKind::Press || kind == KeyEventKind::Repeat;

                match code {
                    KeyCode::Char('w') if pressed => {
                        angle_deg = (angle_deg + ANGLE_STEP_DEG).min(MAX_ANGLE_DEG);
                        info!("Ramp angle: {:.1} deg", angle_deg);
                    }
                    KeyCode::Char('s') if pressed => {
                        angle_deg = (angle_deg - ANGLE_STEP_DEG).max(-MAX_ANGLE_DEG);
                        info!("Ramp angle: {:.1} deg", angle_deg);
                    }
                    KeyCode::Char('f') if pressed => {
                        angle_deg = 0.0;
                        info!("Ramp angle: 0.0 deg");
                    }

                    // Quit
                    KeyCode::Char('q') | KeyCode::Esc if pressed => break,

                    _ => {}
                }
            }
        }

        // Surface normal for the chosen slope, tilted about up x forward
        let normal = Quat::from_axis_angle(Vec3::X, angle_deg.to_radians()) * Vec3::Y;
        let normals = vec![normal.to_array(); NORMALS_PER_BATCH];

        let batch = json!({
            "normals": normals,
            "forward": [0.0, 0.0, 1.0]
        });
        publisher.put(batch.to_string()).await?;
    }

    Ok(())
}
