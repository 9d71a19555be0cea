use crate::ChannelSelect;

/// Shape of the command a chip expects before it clocks out its conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Frame {
    /// No command is sent. The conversion starts when chip select is asserted and the result is
    /// read with two dummy bytes.
    NoCommand,
    /// A 16-bit command `base | (bits << 6)` is clocked out as two bytes, the second of which
    /// already returns the top four result bits.
    Command {
        /// Start bit and fixed option bits.
        base: u16,
    },
}

/// Command frame for a single conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Command(u16);

impl Command {
    /// Builds the command selecting `channel`, or `None` for chips that take no command.
    pub fn encode<CH: ChannelSelect>(channel: CH) -> Option<Self> {
        match CH::FRAME {
            Frame::NoCommand => None,
            Frame::Command { base } => Some(Self(base | (u16::from(channel.bits()) << 6))),
        }
    }

    /// The raw 16-bit frame.
    pub const fn value(self) -> u16 {
        self.0
    }

    /// The frame in transmission order, high byte first.
    pub const fn bytes(self) -> [u8; 2] {
        self.0.to_be_bytes()
    }
}

/// Assembles the result of a command transfer.
///
/// `high` is the byte received while the second command byte was sent:
/// `|x|x|x|null|11|10|9|8|`
pub(crate) fn decode_command(high: u8, low: u8) -> u16 {
    u16::from_be_bytes([high & 0x0F, low])
}

/// Assembles the result of a command-less transfer.
///
/// The first result bit follows a null bit, so the 13 captured bits are shifted right by one:
/// `|x|x|x|11|10|9|8|7| |6|5|4|3|2|1|0|1|`
pub(crate) fn decode_free(high: u8, low: u8) -> u16 {
    u16::from_be_bytes([high & 0x1F, low]) >> 1
}
