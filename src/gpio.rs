//! GPIO capability boundary and scoped line ownership.
//!
//! The driver does not talk to hardware registers directly; it goes through
//! the [`Gpio`] trait, which models an OS-level GPIO facility in the style of
//! the Linux sysfs interface: lines are acquired by numeric ID, configured
//! for a direction, and read or written one level at a time. The `std`
//! feature provides [`SysfsGpio`](crate::sysfs::SysfsGpio) as the production
//! implementation.

use crate::error::Error;

/// Transfer direction of a GPIO line.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Output,
    Input,
}

/// Electrical level of a GPIO line.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Level {
    Low,
    High,
}

/// An OS-level GPIO capability.
///
/// Implementations hand out lines by numeric ID. All methods are blocking.
/// The capability itself is expected to be a cheap handle (`Clone` where
/// several lines share one backend); exclusivity of a given line is enforced
/// by [`GpioLine`], which holds the export for its whole lifetime.
pub trait Gpio {
    /// Transport error produced by the backend.
    type Error;

    /// Acquires a line. Fails if the line is in use or inaccessible.
    fn export(&mut self, id: u32) -> Result<(), Self::Error>;

    /// Releases a previously exported line.
    fn unexport(&mut self, id: u32) -> Result<(), Self::Error>;

    /// Sets the transfer direction of a line.
    fn set_direction(&mut self, id: u32, direction: Direction) -> Result<(), Self::Error>;

    /// Drives a line to the given level. Valid only for output lines.
    fn set_level(&mut self, id: u32, level: Level) -> Result<(), Self::Error>;

    /// Samples the current level of a line. Valid only for input lines.
    fn get_level(&mut self, id: u32) -> Result<Level, Self::Error>;
}

/// Scoped ownership of one GPIO line.
///
/// Construction exports the line exactly once; dropping the value unexports
/// it exactly once, on every exit path, including when an operation in
/// between failed. Direction is tracked so that level operations can assert
/// they are used on a line configured the right way.
#[derive(Debug)]
pub struct GpioLine<G: Gpio> {
    gpio: G,
    id: u32,
    direction: Direction,
}

impl<G: Gpio> GpioLine<G> {
    /// Exports line `id` and configures its initial direction.
    ///
    /// An export failure maps to [`Error::HardwareUnavailable`]; if the
    /// subsequent direction write fails the line is unexported again before
    /// the error is returned.
    pub fn new(mut gpio: G, id: u32, direction: Direction) -> Result<Self, Error<G::Error>> {
        gpio.export(id).map_err(Error::HardwareUnavailable)?;

        // From here on Drop owns the unexport.
        let mut line = GpioLine {
            gpio,
            id,
            direction,
        };
        line.set_direction(direction)?;

        Ok(line)
    }

    /// The numeric ID this line was exported under.
    pub fn id(&self) -> u32 {
        self.id
    }

    /// Reconfigures the transfer direction.
    pub fn set_direction(&mut self, direction: Direction) -> Result<(), Error<G::Error>> {
        self.gpio.set_direction(self.id, direction)?;
        self.direction = direction;
        Ok(())
    }

    /// Drives the line to `level`. The line must be configured as output.
    pub fn set_level(&mut self, level: Level) -> Result<(), Error<G::Error>> {
        debug_assert_eq!(self.direction, Direction::Output);
        self.gpio.set_level(self.id, level)?;
        Ok(())
    }

    /// Samples the line. The line must be configured as input.
    pub fn level(&mut self) -> Result<Level, Error<G::Error>> {
        debug_assert_eq!(self.direction, Direction::Input);
        Ok(self.gpio.get_level(self.id)?)
    }

    /// Returns whether the line currently reads high.
    pub fn is_high(&mut self) -> Result<bool, Error<G::Error>> {
        Ok(self.level()? == Level::High)
    }

    /// Returns whether the line currently reads low.
    pub fn is_low(&mut self) -> Result<bool, Error<G::Error>> {
        Ok(self.level()? == Level::Low)
    }
}

impl<G: Gpio> Drop for GpioLine<G> {
    fn drop(&mut self) {
        // Release unconditionally; there is nobody left to report to.
        let _ = self.gpio.unexport(self.id);
    }
}
