//! Bit-banged command/response exchanges with the sensor.
//!
//! The SHT71 has no standard bus interface; every exchange is driven by
//! toggling the clock line in software while shifting bits over the shared
//! data line. The sequence is rigid: a protocol-specific start condition, an
//! 8-bit command frame (MSB first), an acknowledgment release, a conversion
//! wait, then MSB-first response bytes each followed by a host ACK pulse,
//! closed by a bit-reversed CRC byte. Any deviation produces silently wrong
//! readings rather than a framing error, so the transition order below is
//! deliberately literal.

use embedded_hal::delay::DelayNs;

use crate::crc::Crc8;
use crate::error::Error;
use crate::gpio::{Direction, Gpio, GpioLine, Level};

/// Fixed wait before polling for readiness, covering command turnaround.
const MEASUREMENT_DELAY_MS: u32 = 50;

/// Pause between ready polls.
const POLL_INTERVAL_MS: u32 = 1;

/// Settling time after a soft reset, per datasheet.
const SOFT_RESET_DELAY_MS: u32 = 11;

/// Default bound on the ready wait. The worst-case 14-bit conversion takes
/// 320 ms; this leaves generous margin on top of the fixed delay.
pub const DEFAULT_READY_TIMEOUT_MS: u32 = 720;

/// Commands understood by the sensor.
///
/// Opcodes are 5 bits wide but always transmitted MSB-first inside an 8-bit
/// frame; the upper three bits are zero on the wire.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    ReadStatusRegister,
    MeasureTemperature,
    MeasureRelativeHumidity,
    SoftReset,
}

impl Command {
    /// The opcode as shifted onto the wire.
    pub const fn opcode(self) -> u8 {
        match self {
            Command::MeasureTemperature => 0b00011,
            Command::MeasureRelativeHumidity => 0b00101,
            Command::ReadStatusRegister => 0b00111,
            Command::SoftReset => 0b11110,
        }
    }

    /// Payload bytes the sensor answers with, checksum excluded.
    pub(crate) const fn response_len(self) -> usize {
        match self {
            Command::ReadStatusRegister => 1,
            Command::MeasureTemperature | Command::MeasureRelativeHumidity => 2,
            Command::SoftReset => 0,
        }
    }
}

/// Per-deployment wiring and timing configuration.
///
/// The clock and data line IDs are fixed per deployment and must be supplied
/// by the caller; nothing is hardcoded.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    /// GPIO line driving the sensor clock.
    pub clock_id: u32,
    /// GPIO line shared for command and response data.
    pub data_id: u32,
    /// Upper bound on the ready wait, in 1 ms polls after the fixed
    /// conversion delay. Exceeding it yields [`Error::Timeout`].
    pub ready_timeout_ms: u32,
}

impl Config {
    /// Configuration for the given line pair with the default ready timeout.
    pub const fn new(clock_id: u32, data_id: u32) -> Self {
        Config {
            clock_id,
            data_id,
            ready_timeout_ms: DEFAULT_READY_TIMEOUT_MS,
        }
    }
}

/// Drives one clock/data line pair through complete exchanges.
///
/// Owns both lines exclusively for its lifetime; dropping the engine
/// releases them. Fully synchronous, no internal retry, not cancellable
/// mid-exchange.
pub struct ProtocolEngine<G: Gpio, D> {
    clk: GpioLine<G>,
    data: GpioLine<G>,
    delay: D,
    ready_timeout_ms: u32,
}

impl<G, D> ProtocolEngine<G, D>
where
    G: Gpio,
    D: DelayNs,
{
    /// Acquires the two lines named by `config`.
    ///
    /// The capability handle is cloned so each line owns its own; both
    /// start out as inputs until an exchange reconfigures them.
    pub fn new(gpio: G, config: Config, delay: D) -> Result<Self, Error<G::Error>>
    where
        G: Clone,
    {
        let clk = GpioLine::new(gpio.clone(), config.clock_id, Direction::Input)?;
        let data = GpioLine::new(gpio, config.data_id, Direction::Input)?;
        Ok(ProtocolEngine {
            clk,
            data,
            delay,
            ready_timeout_ms: config.ready_timeout_ms,
        })
    }

    /// Runs one full command/response exchange and returns the raw word.
    ///
    /// Response bytes are assembled MSB-first: two bytes for measurements,
    /// one zero-extended byte for the status register. On a checksum
    /// mismatch the assembled word is still handed back inside
    /// [`Error::ChecksumMismatch`]; whether to trust it is the caller's
    /// call. `SoftReset` answers nothing, use [`reset`](Self::reset).
    pub fn exchange(&mut self, command: Command) -> Result<u16, Error<G::Error>> {
        self.send_command(command)?;
        self.wait_for_ready()?;

        let mut crc = Crc8::new();
        crc.add(command.opcode());

        let mut word: u16 = 0;
        for _ in 0..command.response_len() {
            let byte = self.read_byte()?;
            word = word << 8 | u16::from(byte);
            crc.add(byte);
        }

        let transmitted = self.read_byte()?;
        self.idle_bus()?;

        if crc.reversed() == transmitted {
            Ok(word)
        } else {
            Err(Error::ChecksumMismatch { word })
        }
    }

    /// Transmits a soft reset and waits out the settling time.
    ///
    /// Clears the status register to its defaults on the sensor side. No
    /// response bytes are exchanged.
    pub fn reset(&mut self) -> Result<(), Error<G::Error>> {
        self.send_command(Command::SoftReset)?;
        self.idle_bus()?;
        self.delay.delay_ms(SOFT_RESET_DELAY_MS);
        Ok(())
    }

    /// Steps 1-4 of an exchange: bus setup, start condition, command
    /// shift-out, acknowledgment release.
    fn send_command(&mut self, command: Command) -> Result<(), Error<G::Error>> {
        self.clk.set_direction(Direction::Output)?;
        self.data.set_direction(Direction::Output)?;
        self.clk.set_level(Level::Low)?;
        self.data.set_level(Level::High)?;

        self.start_condition()?;

        let opcode = command.opcode();
        for i in 0..8 {
            let mask = 0x80 >> i;
            self.write_bit(opcode & mask != 0)?;
        }

        // Hand the data line to the sensor and clock once so it can ack.
        self.data.set_direction(Direction::Input)?;
        self.clock_pulse()?;

        Ok(())
    }

    /// The protocol-specific transmission-start pattern. The sensor keys on
    /// this exact transition sequence to tell a new exchange from noise.
    fn start_condition(&mut self) -> Result<(), Error<G::Error>> {
        self.clk.set_level(Level::High)?;
        self.data.set_level(Level::Low)?;
        self.clk.set_level(Level::Low)?;
        self.clk.set_level(Level::High)?;
        self.data.set_level(Level::High)?;
        self.clk.set_level(Level::Low)?;
        self.data.set_level(Level::Low)?;
        Ok(())
    }

    fn clock_pulse(&mut self) -> Result<(), Error<G::Error>> {
        self.clk.set_level(Level::High)?;
        self.clk.set_level(Level::Low)?;
        Ok(())
    }

    fn write_bit(&mut self, bit: bool) -> Result<(), Error<G::Error>> {
        let level = if bit { Level::High } else { Level::Low };
        self.data.set_level(level)?;
        self.clock_pulse()
    }

    /// Waits for the sensor to pull the data line low, signalling that the
    /// measurement finished. The line stays high while the sensor is busy.
    fn wait_for_ready(&mut self) -> Result<(), Error<G::Error>> {
        self.delay.delay_ms(MEASUREMENT_DELAY_MS);

        for _ in 0..self.ready_timeout_ms {
            if self.data.is_low()? {
                return Ok(());
            }
            self.delay.delay_ms(POLL_INTERVAL_MS);
        }
        Err(Error::Timeout)
    }

    /// Shifts in one byte MSB-first, then acknowledges it with a host-driven
    /// low pulse. The ACK runs after every byte, the checksum byte included.
    fn read_byte(&mut self) -> Result<u8, Error<G::Error>> {
        let mut byte: u8 = 0;

        for _ in 0..8 {
            self.clk.set_level(Level::High)?;
            byte <<= 1;
            if self.data.is_high()? {
                byte |= 1;
            }
            self.clk.set_level(Level::Low)?;
        }

        self.data.set_direction(Direction::Output)?;
        self.data.set_level(Level::Low)?;
        self.clock_pulse()?;
        self.data.set_direction(Direction::Input)?;

        Ok(byte)
    }

    /// Leaves the bus idle with the data line driven high.
    fn idle_bus(&mut self) -> Result<(), Error<G::Error>> {
        self.data.set_direction(Direction::Output)?;
        self.data.set_level(Level::High)?;
        Ok(())
    }
}
