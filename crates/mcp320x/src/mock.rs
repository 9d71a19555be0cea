//! Hand-written `embedded-hal` doubles shared by the unit tests.

use std::collections::VecDeque;
use std::convert::Infallible;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{self, OutputPin};
use embedded_hal::spi::{self, ErrorKind, SpiBus};

use crate::Clock;

/// SPI bus that records every byte sent and answers from a script, then with zeros.
#[derive(Debug, Default)]
pub struct ScriptedBus {
    pub sent: Vec<u8>,
    pub replies: VecDeque<u8>,
    pub flushes: usize,
    /// Fail the exchange with this index.
    pub fail_at: Option<usize>,
}

impl ScriptedBus {
    pub fn replying(replies: &[u8]) -> Self {
        Self {
            replies: replies.iter().copied().collect(),
            ..Self::default()
        }
    }

    /// Repeats one conversion reply `times` times.
    pub fn repeating(reply: &[u8], times: usize) -> Self {
        Self::replying(&reply.repeat(times))
    }

    fn exchange(&mut self, byte: u8) -> Result<u8, BusFault> {
        if self.fail_at == Some(self.sent.len()) {
            return Err(BusFault);
        }
        self.sent.push(byte);
        Ok(self.replies.pop_front().unwrap_or(0))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusFault;

impl spi::Error for BusFault {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

impl spi::ErrorType for ScriptedBus {
    type Error = BusFault;
}

impl SpiBus for ScriptedBus {
    fn read(&mut self, words: &mut [u8]) -> Result<(), Self::Error> {
        for word in words {
            *word = self.exchange(0)?;
        }
        Ok(())
    }

    fn write(&mut self, words: &[u8]) -> Result<(), Self::Error> {
        for word in words {
            self.exchange(*word)?;
        }
        Ok(())
    }

    fn transfer(&mut self, read: &mut [u8], write: &[u8]) -> Result<(), Self::Error> {
        for (i, word) in write.iter().enumerate() {
            let reply = self.exchange(*word)?;
            if let Some(slot) = read.get_mut(i) {
                *slot = reply;
            }
        }
        Ok(())
    }

    fn transfer_in_place(&mut self, words: &mut [u8]) -> Result<(), Self::Error> {
        for word in words {
            *word = self.exchange(*word)?;
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        self.flushes += 1;
        Ok(())
    }
}

/// Chip select pin recording every level it was driven to, `true` being high.
#[derive(Debug, Default)]
pub struct PinLog {
    pub levels: Vec<bool>,
}

impl PinLog {
    /// Number of complete low-high pulses.
    pub fn pulses(&self) -> usize {
        self.levels.chunks(2).filter(|pair| pair == &[false, true]).count()
    }
}

impl digital::ErrorType for PinLog {
    type Error = Infallible;
}

impl OutputPin for PinLog {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.levels.push(false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.levels.push(true);
        Ok(())
    }
}

/// Timer advancing by `step_us` on every reading and by the requested amount on every delay.
#[derive(Debug, Default)]
pub struct StepTimer {
    pub now: u32,
    pub step_us: u32,
    pub delays: Vec<u32>,
}

impl StepTimer {
    pub fn stepping(step_us: u32) -> Self {
        Self {
            step_us,
            ..Self::default()
        }
    }

    pub fn starting_at(now: u32, step_us: u32) -> Self {
        Self {
            now,
            step_us,
            ..Self::default()
        }
    }
}

impl Clock for StepTimer {
    fn now_us(&mut self) -> u32 {
        let now = self.now;
        self.now = self.now.wrapping_add(self.step_us);
        now
    }
}

impl DelayNs for StepTimer {
    fn delay_ns(&mut self, ns: u32) {
        self.delay_us(ns / 1000);
    }

    fn delay_us(&mut self, us: u32) {
        self.delays.push(us);
        self.now = self.now.wrapping_add(us);
    }
}
