//! MCP3201: one pseudo-differential input and no command byte.
//!
//! The conversion starts when chip select goes low, so the driver only clocks in two bytes and
//! realigns the 12 result bits that follow the null bit.

use crate::{sealed, ChannelSelect, Frame, Mcp320x};

/// MCP3201 driver
pub type Mcp3201<SPI, CS, TIMER> = Mcp320x<Channel, SPI, CS, TIMER>;

/// Channel list for MCP3201
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Channel {
    /// The only input, IN+ against IN-.
    Single0 = 0b0,
}

impl Channel {
    /// Iterate over all channels.
    pub fn all() -> impl Iterator<Item = Self> {
        [Self::Single0].into_iter()
    }
}

impl sealed::Sealed for Channel {}

impl ChannelSelect for Channel {
    const PART: &'static str = "MCP3201";
    const FRAME: Frame = Frame::NoCommand;

    fn bits(self) -> u8 {
        self as u8
    }
}
