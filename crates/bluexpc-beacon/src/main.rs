//! Identifier beacon advertiser
//!
//! Advertises an iBeacon with the given UUID, major, minor and measured power
//! for a fixed duration, then stops.

use bluexpc::{Ble, LogTransport, Uuid};
use clap::Parser;
use log::info;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "bluexpc-beacon")]
#[command(about = "Advertise an identifier beacon through the Bluetooth daemon")]
struct Cli {
    /// Beacon proximity UUID
    #[arg(long, default_value = "1BEAC099-BEAC-BEAC-BEAC-BEAC09BEAC09")]
    uuid: Uuid,

    /// Beacon major value
    #[arg(long, default_value_t = 0)]
    major: u16,

    /// Beacon minor value
    #[arg(long, default_value_t = 0)]
    minor: u16,

    /// Measured power at one metre, in dBm
    #[arg(long, default_value_t = -57, allow_negative_numbers = true)]
    power: i8,

    /// Advertising duration in seconds
    #[arg(short, long, default_value_t = 60)]
    duration: u64,

    /// Dump all events and messages
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "trace" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let ble = Ble::new(Arc::new(LogTransport));
    ble.set_verbose(cli.verbose);
    ble.subscribe(|event| info!("event: {}", event.name()));
    ble.init()?;

    thread::sleep(Duration::from_secs(1));

    info!(
        "Start Advertising {} {} {} {}",
        cli.uuid.hyphenated(),
        cli.major,
        cli.minor,
        cli.power
    );
    ble.start_advertising_ibeacon(cli.uuid, cli.major, cli.minor, cli.power)?;

    thread::sleep(Duration::from_secs(cli.duration));

    info!("Stop Advertising");
    ble.stop_advertising()?;

    Ok(())
}
