//! MCP3204: four inputs, usable as four single-ended channels or two differential pairs.

use crate::{sealed, ChannelSelect, Frame, Mcp320x};

/// MCP3204 driver
pub type Mcp3204<SPI, CS, TIMER> = Mcp320x<Channel, SPI, CS, TIMER>;

/// Channel list for MCP3204
///
/// bits|  3  | 2 | 1 | 0
/// :--:|:---:|:-:|:-:|:-:
///  -  |type | x |ch |ch
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
    /// CH0 as IN+, CH1 as IN-.
    Diff01 = 0b0000,
    /// CH1 as IN+, CH0 as IN-.
    Diff10 = 0b0001,
    /// CH2 as IN+, CH3 as IN-.
    Diff23 = 0b0010,
    /// CH3 as IN+, CH2 as IN-.
    Diff32 = 0b0011,
}

impl Channel {
    /// Iterate over all channels.
    pub fn all() -> impl Iterator<Item = Self> {
        [
            Self::Single0,
            Self::Single1,
            Self::Single2,
            Self::Single3,
            Self::Diff01,
            Self::Diff10,
            Self::Diff23,
            Self::Diff32,
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
    const PART: &'static str = "MCP3204";

    // 0b0000_01cx_cc00_0000: start bit, channel config
    const FRAME: Frame = Frame::Command { base: 0x0400 };

    fn bits(self) -> u8 {
        self as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{PinLog, ScriptedBus, StepTimer};
    use crate::Command;

    #[test]
    fn commands() {
        for ch in Channel::all() {
            let command = Command::encode(ch).map(Command::value);
            assert_eq!(command, Some(0x0400 | (ch as u16) << 6));
            // the bit between type and channel stays clear
            assert_eq!(command.map(|c| c & 0b0000_0001_0000_0000), Some(0));
        }

        assert_eq!(Command::encode(Channel::Single3).map(Command::bytes), Some([0x06, 0xC0]));
        assert_eq!(Command::encode(Channel::Diff10).map(Command::bytes), Some([0x04, 0x40]));
    }

    #[test]
    fn mock_spi() {
        // one conversion per channel, each answering with its own index in the low byte
        let replies: Vec<u8> = Channel::all()
            .enumerate()
            .flat_map(|(index, _)| [0x00, 0x00, 100 + index as u8])
            .collect();

        let mut mcp = Mcp3204::new(
            ScriptedBus::replying(&replies),
            PinLog::default(),
            StepTimer::default(),
            3300,
        );

        for (index, ch) in Channel::all().enumerate() {
            assert_eq!(mcp.read(ch), Ok(100 + index as u16));
        }

        let (bus, cs, _) = mcp.release();
        assert_eq!(&bus.sent[..3], [0x06, 0x00, 0x00]);
        assert_eq!(cs.pulses(), 8);
    }
}
