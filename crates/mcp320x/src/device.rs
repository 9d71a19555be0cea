use core::marker::PhantomData;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use embedded_hal::spi::SpiBus;
use log::{debug, trace};

use crate::command::{decode_command, decode_free, Command};
use crate::{convert, ChannelSelect, Clock, Error, CALIBRATION_SAMPLES, SPEED_TEST_SAMPLES};

/// Generic MCP320x driver.
///
/// Use the per-chip aliases such as [`Mcp3208`](crate::mcp3208::Mcp3208) rather than naming the
/// channel type directly.
///
/// The driver does not configure the bus or the chip select pin; both must be ready before the
/// first read. Pass `&mut` references to keep ownership of the bus, pin and timer on the caller's
/// side.
pub struct Mcp320x<CH, SPI, CS, TIMER> {
    spi: SPI,
    cs: CS,
    timer: TIMER,
    vref_mv: u16,
    /// Measured time per sample in ns, 0 until calibrated.
    sample_speed_ns: u32,
    _channel: PhantomData<CH>,
}

impl<CH, SPI, CS, TIMER> Mcp320x<CH, SPI, CS, TIMER>
where
    CH: ChannelSelect,
    SPI: SpiBus,
    CS: OutputPin,
    TIMER: Clock + DelayNs,
{
    /// Creates a new driver.
    ///
    /// Please ensure the SPI bus is in SPI mode 0 or 3 and `cs` is already configured as an output.
    /// `vref_mv` is the reference voltage in millivolts and must be non-zero.
    pub fn new(spi: SPI, cs: CS, timer: TIMER, vref_mv: u16) -> Self {
        debug_assert!(vref_mv > 0, "reference voltage must be non-zero");

        Self {
            spi,
            cs,
            timer,
            vref_mv,
            sample_speed_ns: 0,
            _channel: PhantomData,
        }
    }

    /// Releases the bus, chip select pin and timer.
    pub fn release(self) -> (SPI, CS, TIMER) {
        (self.spi, self.cs, self.timer)
    }

    /// Read a channel and return the 12 bit value as a [`u16`].
    pub fn read(&mut self, ch: CH) -> Result<u16, Error<SPI::Error, CS::Error>> {
        self.execute(Command::encode(ch))
    }

    /// Read a channel and return the value in millivolts.
    pub fn read_analog(&mut self, ch: CH) -> Result<u16, Error<SPI::Error, CS::Error>> {
        let raw = self.read(ch)?;
        Ok(self.to_analog(raw))
    }

    /// Fills `data` with consecutive reads of a channel, as fast as the bus allows.
    pub fn read_many(
        &mut self,
        ch: CH,
        data: &mut [u16],
    ) -> Result<(), Error<SPI::Error, CS::Error>> {
        self.execute_into(Command::encode(ch), data, None)
    }

    /// Fills `data` with reads of a channel limited to `spl_freq` Hz.
    ///
    /// The limit is enforced in software with a delay after every sample and has a low precision.
    /// The first rate limited read calibrates the driver if [`calibrate`](Self::calibrate) was
    /// never called.
    pub fn read_many_at(
        &mut self,
        ch: CH,
        data: &mut [u16],
        spl_freq: u32,
    ) -> Result<(), Error<SPI::Error, CS::Error>> {
        let delay = self.sample_delay_us(ch, spl_freq)?;
        self.execute_into(Command::encode(ch), data, Some(delay))
    }

    /// Fills `data` with consecutive reads once `predicate` accepts a sample.
    ///
    /// Samples are taken and discarded until the predicate returns `true`; the accepted sample
    /// itself is not stored. There is no timeout: a predicate that never holds blocks forever. Use
    /// [`try_read_if`](Self::try_read_if) to bound the wait.
    pub fn read_if<P>(
        &mut self,
        ch: CH,
        data: &mut [u16],
        predicate: P,
    ) -> Result<(), Error<SPI::Error, CS::Error>>
    where
        P: FnMut(u16) -> bool,
    {
        let command = Command::encode(ch);
        self.wait_for(command, None, predicate)?;
        self.execute_into(command, data, None)
    }

    /// Rate limited form of [`read_if`](Self::read_if).
    ///
    /// The delay is computed before polling starts, so a lazy calibration never runs between the
    /// trigger and the capture.
    pub fn read_if_at<P>(
        &mut self,
        ch: CH,
        data: &mut [u16],
        spl_freq: u32,
        predicate: P,
    ) -> Result<(), Error<SPI::Error, CS::Error>>
    where
        P: FnMut(u16) -> bool,
    {
        let delay = self.sample_delay_us(ch, spl_freq)?;
        let command = Command::encode(ch);
        self.wait_for(command, None, predicate)?;
        self.execute_into(command, data, Some(delay))
    }

    /// Like [`read_if`](Self::read_if), but gives up after `max_polls` rejected samples.
    ///
    /// Returns [`Error::TriggerTimeout`] if the predicate never held; `data` is left untouched.
    pub fn try_read_if<P>(
        &mut self,
        ch: CH,
        data: &mut [u16],
        max_polls: u32,
        predicate: P,
    ) -> Result<(), Error<SPI::Error, CS::Error>>
    where
        P: FnMut(u16) -> bool,
    {
        let command = Command::encode(ch);
        self.wait_for(command, Some(max_polls), predicate)?;
        self.execute_into(command, data, None)
    }

    /// Measures the time per sample and caches it for rate limited reads.
    ///
    /// Calibrate again after changing the bus clock or anything else that affects transfer time;
    /// the cached value is never invalidated on its own.
    pub fn calibrate(&mut self, ch: CH) -> Result<(), Error<SPI::Error, CS::Error>> {
        self.sample_speed_ns = self.test_speed_n(ch, CALIBRATION_SAMPLES)?;
        debug!("{} calibrated: {} ns per sample", CH::PART, self.sample_speed_ns);
        Ok(())
    }

    /// Cached time per sample in ns, or 0 if the driver is uncalibrated.
    pub fn sample_speed_ns(&self) -> u32 {
        self.sample_speed_ns
    }

    /// Performs a sampling speed test over 64 reads.
    ///
    /// Returns the average time needed for one sample in ns.
    pub fn test_speed(&mut self, ch: CH) -> Result<u32, Error<SPI::Error, CS::Error>> {
        self.test_speed_n(ch, SPEED_TEST_SAMPLES)
    }

    /// Performs a sampling speed test over `num` reads.
    ///
    /// Returns the average time needed for one sample in ns.
    pub fn test_speed_n(&mut self, ch: CH, num: u16) -> Result<u32, Error<SPI::Error, CS::Error>> {
        let command = Command::encode(ch);

        let start = self.timer.now_us();
        for _ in 0..num {
            self.execute(command)?;
        }
        let stop = self.timer.now_us();

        Ok(average_ns(stop.wrapping_sub(start), num))
    }

    /// Performs a sampling speed test over `num` reads limited to `spl_freq` Hz.
    ///
    /// Returns the average time needed for one sample in ns. The result is not cached.
    pub fn test_speed_at(
        &mut self,
        ch: CH,
        num: u16,
        spl_freq: u32,
    ) -> Result<u32, Error<SPI::Error, CS::Error>> {
        let delay = self.sample_delay_us(ch, spl_freq)?;
        let command = Command::encode(ch);

        let start = self.timer.now_us();
        for _ in 0..num {
            self.execute(command)?;
            self.timer.delay_us(delay);
        }
        let stop = self.timer.now_us();

        Ok(average_ns(stop.wrapping_sub(start), num))
    }

    /// Delay in µs to insert after each sample to sample at `spl_freq` Hz.
    ///
    /// Calibrates first if the driver is uncalibrated. Returns 0 when the requested rate is faster
    /// than the chip can be read.
    pub fn sample_delay_us(
        &mut self,
        ch: CH,
        spl_freq: u32,
    ) -> Result<u32, Error<SPI::Error, CS::Error>> {
        if spl_freq == 0 {
            return Err(Error::InvalidFrequency);
        }

        if self.sample_speed_ns == 0 {
            self.calibrate(ch)?;
        }

        let period_ns = div_round(1_000_000_000, spl_freq);
        let delay = period_ns.saturating_sub(self.sample_speed_ns) / 1000;

        debug!("{} sampling at {} Hz: {} us delay", CH::PART, spl_freq, delay);

        Ok(delay)
    }

    /// Reference voltage in mV.
    pub fn vref_mv(&self) -> u16 {
        self.vref_mv
    }

    /// Voltage of one count in µV.
    pub fn analog_resolution_uv(&self) -> u16 {
        convert::analog_resolution_uv(self.vref_mv)
    }

    /// Converts a raw value to mV.
    pub fn to_analog(&self, raw: u16) -> u16 {
        convert::to_analog(raw, self.vref_mv)
    }

    /// Converts mV to a raw value.
    pub fn to_digital(&self, millivolts: u16) -> u16 {
        convert::to_digital(millivolts, self.vref_mv)
    }

    fn wait_for<P>(
        &mut self,
        command: Option<Command>,
        max_polls: Option<u32>,
        mut predicate: P,
    ) -> Result<(), Error<SPI::Error, CS::Error>>
    where
        P: FnMut(u16) -> bool,
    {
        let mut polls = 0u32;
        loop {
            if max_polls.is_some_and(|max| polls >= max) {
                debug!("{} trigger not met after {} polls", CH::PART, polls);
                return Err(Error::TriggerTimeout);
            }

            if predicate(self.execute(command)?) {
                return Ok(());
            }

            polls = polls.wrapping_add(1);
        }
    }

    fn execute_into(
        &mut self,
        command: Option<Command>,
        data: &mut [u16],
        delay_us: Option<u32>,
    ) -> Result<(), Error<SPI::Error, CS::Error>> {
        for sample in data.iter_mut() {
            *sample = self.execute(command)?;

            if let Some(delay) = delay_us {
                self.timer.delay_us(delay);
            }
        }

        Ok(())
    }

    /// Runs one conversion with chip select held low for the whole exchange.
    fn execute(&mut self, command: Option<Command>) -> Result<u16, Error<SPI::Error, CS::Error>> {
        self.cs.set_low().map_err(Error::Pin)?;

        let result = self.transfer(command);

        // Release the chip even if the bus failed, then report the first error.
        let released = self.cs.set_high().map_err(Error::Pin);
        let raw = result?;
        released?;

        trace!("{} {:?}: {:#05x}", CH::PART, command, raw);

        Ok(raw)
    }

    fn transfer(&mut self, command: Option<Command>) -> Result<u16, Error<SPI::Error, CS::Error>> {
        let raw = match command {
            Some(command) => {
                let [high, low] = command.bytes();

                // Send start bit and the leading channel bits
                self.exchange(high)?;
                // Send the remaining channel bits and read B11 - B8
                let msb = self.exchange(low)?;
                // Read B7 - B0
                let lsb = self.exchange(0x00)?;

                decode_command(msb, lsb)
            }
            None => {
                // Read B11 - B7
                let msb = self.exchange(0x00)?;
                // Read B6 - B0
                let lsb = self.exchange(0x00)?;

                decode_free(msb, lsb)
            }
        };

        self.spi.flush().map_err(Error::Spi)?;

        Ok(raw)
    }

    fn exchange(&mut self, byte: u8) -> Result<u8, Error<SPI::Error, CS::Error>> {
        let mut word = [byte];
        self.spi.transfer_in_place(&mut word).map_err(Error::Spi)?;
        Ok(word[0])
    }
}

/// Divides `n` by `d`, rounding half up. `d` must be non-zero.
fn div_round(n: u32, d: u32) -> u32 {
    ((u64::from(n) + u64::from(d / 2)) / u64::from(d)) as u32
}

/// Average time per sample in ns for `num` samples taken in `elapsed_us`.
fn average_ns(elapsed_us: u32, num: u16) -> u32 {
    if num == 0 {
        return 0;
    }

    let num = u64::from(num);
    let total_ns = u64::from(elapsed_us) * 1000;
    u32::try_from((total_ns + num / 2) / num).unwrap_or(u32::MAX)
}
