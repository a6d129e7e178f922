use clap::Parser;
use tracing_subscriber::EnvFilter;

use diffdrive_runtime::config::{SERIAL_BAUD, SERIAL_PORT};
use diffdrive_runtime::odometry::VehicleGeometry;
use diffdrive_runtime::runtime::{self, RuntimeOptions};

/// Differential-drive odometry runtime
#[derive(Parser, Debug)]
struct Args {
    /// Serial port of the encoder board
    #[arg(long, default_value = SERIAL_PORT)]
    port: String,

    /// Serial baud rate
    #[arg(long, default_value_t = SERIAL_BAUD)]
    baud: u32,
}

#[tokio::main]
async fn main() {
    // Setup logging (set RUST_LOG=info or debug)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse().unwrap()))
        .init(); // installs the subscriber globally

    let args = Args::parse();
    let opts = RuntimeOptions {
        port: args.port,
        baudrate: args.baud,
        geometry: VehicleGeometry::default(),
    };

    if let Err(e) = runtime::run(opts).await {
        eprintln!("Runtime error: {}", e);
        std::process::exit(1);
    }
}
