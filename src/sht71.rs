//! High-level sensor facade.

use embedded_hal::delay::DelayNs;

use crate::convert;
use crate::error::Error;
use crate::gpio::Gpio;
use crate::protocol::{Command, Config, ProtocolEngine};

/// A complete reading returned by [`Sht71::read`].
///
/// Only ever produced when all three exchanges validated; there is no
/// partially populated variant.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Measurement {
    /// Sensor status register.
    pub status: u8,
    /// Raw temperature word.
    pub so_t: u16,
    /// Raw relative-humidity word.
    pub so_rh: u16,
    /// Temperature in degrees Celsius.
    pub temperature: f64,
    /// Linear relative humidity in percent.
    pub rh_linear: f64,
    /// Temperature-compensated relative humidity in percent.
    pub rh_true: f64,
}

/// Driver for the SHT71 temperature and humidity sensor.
///
/// Owns the clock and data lines for its whole lifetime; no other code may
/// touch those line IDs while it exists.
pub struct Sht71<G: Gpio, D> {
    link: ProtocolEngine<G, D>,
}

impl<G, D> Sht71<G, D>
where
    G: Gpio + Clone,
    D: DelayNs,
{
    /// Creates a new driver on the line pair named by `config`.
    ///
    /// # Arguments
    ///
    /// * `gpio` - The GPIO capability to acquire both lines from.
    /// * `config` - Clock/data line IDs and the ready timeout.
    /// * `delay` - A delay provider implementing the `DelayNs` trait.
    pub fn new(gpio: G, config: Config, delay: D) -> Result<Self, Error<G::Error>> {
        Ok(Sht71 {
            link: ProtocolEngine::new(gpio, config, delay)?,
        })
    }

    /// Reads status register, temperature and relative humidity in one go.
    ///
    /// The three exchanges run strictly in sequence and short-circuit: the
    /// first failure is returned as-is and the remaining exchanges are not
    /// attempted. Conversions are applied only on full success.
    pub fn read(&mut self) -> Result<Measurement, Error<G::Error>> {
        let status = self.link.exchange(Command::ReadStatusRegister)? as u8;
        let so_t = self.link.exchange(Command::MeasureTemperature)?;
        let so_rh = self.link.exchange(Command::MeasureRelativeHumidity)?;

        let temperature = convert::temperature(so_t);
        let rh_linear = convert::rh_linear(so_rh);
        let rh_true = convert::rh_true(temperature, so_rh);

        Ok(Measurement {
            status,
            so_t,
            so_rh,
            temperature,
            rh_linear,
            rh_true,
        })
    }

    /// Measures temperature only, in degrees Celsius.
    pub fn read_temperature(&mut self) -> Result<f64, Error<G::Error>> {
        let so_t = self.link.exchange(Command::MeasureTemperature)?;
        Ok(convert::temperature(so_t))
    }

    /// Measures relative humidity only, in percent (linear conversion).
    pub fn read_relative_humidity(&mut self) -> Result<f64, Error<G::Error>> {
        let so_rh = self.link.exchange(Command::MeasureRelativeHumidity)?;
        Ok(convert::rh_linear(so_rh))
    }

    /// Resets the sensor interface and status register to defaults.
    pub fn soft_reset(&mut self) -> Result<(), Error<G::Error>> {
        self.link.reset()
    }
}
