//! Samples an MCP3208 on a Raspberry Pi.
//!
//! Calibrates the driver, reports the achievable sample rate, then waits for channel 0 to cross
//! half scale and captures a rate limited burst after every crossing.

#[cfg(feature = "raspberry_pi")]
mod imports {
    pub use std::time::Duration;
    pub use tracing::info;
    pub use tracing_subscriber::filter::{EnvFilter, LevelFilter};
    pub use mcp320x::mcp3208::{Channel, Mcp3208};
    pub use mcp320x::{StdClock, MAX_RAW};
    pub use rppal::gpio::Gpio;
    pub use rppal::spi::{Bus, Mode, SlaveSelect, Spi};
}

#[cfg(feature = "raspberry_pi")]
use imports::*;

#[cfg(feature = "raspberry_pi")]
const CHIP_SELECT_PIN: u8 = 24;

#[cfg(feature = "raspberry_pi")]
const VREF_MV: u16 = 3300;

#[cfg(feature = "raspberry_pi")]
const BURST_FREQUENCY_HZ: u32 = 10_000;

/// Logs to stdout, filtering according to `RUST_LOG` with INFO as the default level.
///
/// Records the driver emits through `log` are forwarded to the same subscriber.
#[cfg(feature = "raspberry_pi")]
fn init_tracing() -> Result<(), anyhow::Error> {
    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .try_init()
        .map_err(anyhow::Error::msg)
}

#[cfg(feature = "raspberry_pi")]
fn main() -> Result<(), anyhow::Error> {
    init_tracing()?;

    let gpio = Gpio::new()?;

    let mut spi = Spi::new(Bus::Spi0, SlaveSelect::Ss0, 1_000_000, Mode::Mode0)?;

    let cs = gpio.get(CHIP_SELECT_PIN)?.into_output_high();

    let mut mcp = Mcp3208::new(&mut spi, cs, StdClock::new(), VREF_MV);

    mcp.calibrate(Channel::Single0)?;

    info!(
        "{} ns per sample, {} uV per count",
        mcp.sample_speed_ns(),
        mcp.analog_resolution_uv()
    );

    info!(
        "{} ns per sample when limited to {} Hz",
        mcp.test_speed_at(Channel::Single0, 256, BURST_FREQUENCY_HZ)?,
        BURST_FREQUENCY_HZ
    );

    for ch in Channel::all().filter(|ch| ch.is_single_ended()) {
        let millivolts = mcp.read_analog(ch)?;
        info!("{ch:?}: {millivolts} mV");
    }

    let mut burst = [0; 256];

    loop {
        // wait for a rising crossing
        mcp.read_if(Channel::Single0, &mut [], |raw| raw < MAX_RAW / 2)?;
        mcp.read_if_at(Channel::Single0, &mut burst, BURST_FREQUENCY_HZ, |raw| {
            raw >= MAX_RAW / 2
        })?;

        let min = burst.iter().copied().min().unwrap_or_default();
        let max = burst.iter().copied().max().unwrap_or_default();

        info!(
            "triggered: {} - {} mV",
            mcp.to_analog(min),
            mcp.to_analog(max)
        );

        std::thread::sleep(Duration::from_millis(500));
    }
}

#[cfg(not(feature = "raspberry_pi"))]
fn main() {
    const _: () = panic!("Raspberry Pi feature must be enabled");
}
