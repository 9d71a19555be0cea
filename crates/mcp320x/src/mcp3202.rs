//! MCP3202: two inputs, usable as two single-ended channels or one differential pair.

use crate::{sealed, ChannelSelect, Frame, Mcp320x};

/// MCP3202 driver
pub type Mcp3202<SPI, CS, TIMER> = Mcp320x<Channel, SPI, CS, TIMER>;

/// Channel list for MCP3202
///
/// bits|  1  | 0
/// :--:|:---:|:-:
///  -  |type |ch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Channel {
    /// CH0 against ground.
    Single0 = 0b10,
    /// CH1 against ground.
    Single1 = 0b11,
    /// CH0 as IN+, CH1 as IN-.
    Diff01 = 0b00,
    /// CH1 as IN+, CH0 as IN-.
    Diff10 = 0b01,
}

impl Channel {
    /// Iterate over all channels.
    pub fn all() -> impl Iterator<Item = Self> {
        [Self::Single0, Self::Single1, Self::Diff01, Self::Diff10].into_iter()
    }

    /// Whether the channel is measured against analog ground.
    pub fn is_single_ended(self) -> bool {
        self as u8 & 0b10 != 0
    }
}

impl sealed::Sealed for Channel {}

impl ChannelSelect for Channel {
    const PART: &'static str = "MCP3202";

    // 0b0000_0001_cc10_0000: start bit, channel config, MSB first
    const FRAME: Frame = Frame::Command { base: 0x0120 };

    fn bits(self) -> u8 {
        self as u8
    }
}
