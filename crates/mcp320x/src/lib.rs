//! Provides a driver for the Microchip MCP3201/3202/3204/3208 12-bit ADCs via the `embedded-hal` ecosystem.
//!
//! All four chips share one transfer engine, [`Mcp320x`], parameterized by the channel type of the
//! variant (see [`mcp3201`], [`mcp3202`], [`mcp3204`] and [`mcp3208`]). The driver clocks the
//! conversion out byte by byte on an [`SpiBus`](embedded_hal::spi::SpiBus) and toggles the chip
//! select line itself, so several chips can share one bus as long as the caller serializes access.
//!
//! ```ignore
//! use mcp320x::mcp3208::{Channel, Mcp3208};
//!
//! let mut adc = Mcp3208::new(spi, cs, timer, 3300);
//!
//! let raw = adc.read(Channel::Single0)?;
//! let millivolts = adc.to_analog(raw);
//!
//! // 128 samples at 10 kHz
//! let mut samples = [0; 128];
//! adc.read_many_at(Channel::Single0, &mut samples, 10_000)?;
//! ```

#![cfg_attr(not(test), no_std)]
#![forbid(unsafe_code)]

#[cfg(all(feature = "std", not(test)))]
extern crate std;

use core::fmt;

mod command;
mod convert;
mod device;

#[cfg(feature = "std")]
mod std_clock;

#[cfg(test)]
mod mock;

#[cfg(feature = "mcp3201")]
pub mod mcp3201;

#[cfg(feature = "mcp3202")]
pub mod mcp3202;

#[cfg(feature = "mcp3204")]
pub mod mcp3204;

#[cfg(feature = "mcp3208")]
pub mod mcp3208;

pub use command::{Command, Frame};
pub use convert::{analog_resolution_uv, to_analog, to_digital};
pub use device::Mcp320x;

#[cfg(feature = "std")]
pub use std_clock::StdClock;

/// ADC resolution in bits.
pub const RESOLUTION_BITS: u8 = 12;

/// Largest raw value the ADC can return.
pub const MAX_RAW: u16 = (1 << RESOLUTION_BITS) - 1;

/// Number of reads used by [`Mcp320x::calibrate`].
pub const CALIBRATION_SAMPLES: u16 = 256;

/// Number of reads used by [`Mcp320x::test_speed`].
pub const SPEED_TEST_SAMPLES: u16 = 64;

/// Monotonic microsecond time source used to measure sampling throughput.
///
/// The counter is allowed to wrap; elapsed times are computed with wrapping subtraction, so a
/// single measurement must not span more than `u32::MAX` microseconds.
pub trait Clock {
    /// Current time in microseconds.
    fn now_us(&mut self) -> u32;
}

impl<T: Clock + ?Sized> Clock for &mut T {
    fn now_us(&mut self) -> u32 {
        T::now_us(self)
    }
}

mod sealed {
    pub trait Sealed {}
}

/// Channel selector of one chip variant.
///
/// Implemented by the `Channel` enum of every variant module; the set is closed, so any value of
/// an implementing type is a valid selection for its chip.
pub trait ChannelSelect: Copy + fmt::Debug + sealed::Sealed {
    /// Part number, used in log output.
    const PART: &'static str;

    /// Command frame layout shared by every channel of the chip.
    const FRAME: Frame;

    /// Channel configuration bits, as laid out in the datasheet.
    fn bits(self) -> u8;
}

/// Errors returned by the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error<SpiE, PinE> {
    /// The SPI bus failed to exchange a byte.
    Spi(SpiE),
    /// The chip select pin could not be driven.
    Pin(PinE),
    /// A sample frequency of 0 Hz was requested.
    InvalidFrequency,
    /// [`Mcp320x::try_read_if`] ran out of polls before its predicate held.
    TriggerTimeout,
}

impl<SpiE: fmt::Debug, PinE: fmt::Debug> fmt::Display for Error<SpiE, PinE> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Spi(e) => write!(f, "SPI transfer failed: {e:?}"),
            Error::Pin(e) => write!(f, "chip select failed: {e:?}"),
            Error::InvalidFrequency => write!(f, "sample frequency must be non-zero"),
            Error::TriggerTimeout => write!(f, "trigger condition never met"),
        }
    }
}

impl<SpiE: fmt::Debug, PinE: fmt::Debug> core::error::Error for Error<SpiE, PinE> {}
