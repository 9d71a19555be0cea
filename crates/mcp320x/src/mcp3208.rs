//! MCP3208: eight inputs, usable as eight single-ended channels or four differential pairs.

use crate::{sealed, ChannelSelect, Frame, Mcp320x};

/// MCP3208 driver
pub type Mcp3208<SPI, CS, TIMER> = Mcp320x<Channel, SPI, CS, TIMER>;

/// Channel list for MCP3208
///
/// bits|  3  | 2 | 1 | 0
/// :--:|:---:|:-:|:-:|:-:
///  -  |type |ch |ch |ch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Channel {
    /// CH0 against ground.
    Single0 = 0b1000,
    /// CH1 against ground.
    Single1 = 0b1001,
    /// CH2 against ground.
    Single2 = 0b1010,
    /// CH3 against ground.
    Single3 = 0b1011,
    /// CH4 against ground.
    Single4 = 0b1100,
    /// CH5 against ground.
    Single5 = 0b1101,
    /// CH6 against ground.
    Single6 = 0b1110,
    /// CH7 against ground.
    Single7 = 0b1111,
    /// CH0 as IN+, CH1 as IN-.
    Diff01 = 0b0000,
    /// CH1 as IN+, CH0 as IN-.
    Diff10 = 0b0001,
    /// CH2 as IN+, CH3 as IN-.
    Diff23 = 0b0010,
    /// CH3 as IN+, CH2 as IN-.
    Diff32 = 0b0011,
    /// CH4 as IN+, CH5 as IN-.
    Diff45 = 0b0100,
    /// CH5 as IN+, CH4 as IN-.
    Diff54 = 0b0101,
    /// CH6 as IN+, CH7 as IN-.
    Diff67 = 0b0110,
    /// CH7 as IN+, CH6 as IN-.
    Diff76 = 0b0111,
}

impl Channel {
    /// Iterate over all channels.
    pub fn all() -> impl Iterator<Item = Self> {
        [
            Self::Single0,
            Self::Single1,
            Self::Single2,
            Self::Single3,
            Self::Single4,
            Self::Single5,
            Self::Single6,
            Self::Single7,
            Self::Diff01,
            Self::Diff10,
            Self::Diff23,
            Self::Diff32,
            Self::Diff45,
            Self::Diff54,
            Self::Diff67,
            Self::Diff76,
        ]
        .into_iter()
    }

    /// Whether the channel is measured against analog ground.
    pub fn is_single_ended(self) -> bool {
        self as u8 & 0b1000 != 0
    }
}

impl sealed::Sealed for Channel {}

impl ChannelSelect for Channel {
    const PART: &'static str = "MCP3208";

    // 0b0000_01cc_cc00_0000: start bit, channel config
    const FRAME: Frame = Frame::Command { base: 0x0400 };

    fn bits(self) -> u8 {
        self as u8
    }
}
