//! Linux sysfs GPIO backend.
//!
//! Implements the [`Gpio`] capability over `/sys/class/gpio`: lines are
//! acquired by writing their number to the `export` control file, direction
//! and level go through the per-line `direction` and `value` files, and a
//! level read takes the first character of `value` (`'0'` is low, anything
//! else high).
//!
//! Requires the `std` feature. Deprecated in recent kernels in favor of the
//! character-device interface, but still widely available.

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use crate::gpio::{Direction, Gpio, Level};

const DEFAULT_BASE: &str = "/sys/class/gpio";

/// Handle to the sysfs GPIO tree.
///
/// Stateless apart from the base path; clones are equivalent, so the clock
/// and data lines of one sensor can each hold their own.
#[derive(Clone, Debug)]
pub struct SysfsGpio {
    base: PathBuf,
}

impl SysfsGpio {
    /// Handle rooted at `/sys/class/gpio`.
    pub fn new() -> Self {
        Self::with_base(DEFAULT_BASE)
    }

    /// Handle rooted at an arbitrary directory. Mainly for tests.
    pub fn with_base(base: impl Into<PathBuf>) -> Self {
        SysfsGpio { base: base.into() }
    }

    fn line_file(&self, id: u32, name: &str) -> PathBuf {
        self.base.join(format!("gpio{id}")).join(name)
    }
}

impl Default for SysfsGpio {
    fn default() -> Self {
        Self::new()
    }
}

impl Gpio for SysfsGpio {
    type Error = io::Error;

    fn export(&mut self, id: u32) -> io::Result<()> {
        fs::write(self.base.join("export"), id.to_string())
    }

    fn unexport(&mut self, id: u32) -> io::Result<()> {
        fs::write(self.base.join("unexport"), id.to_string())
    }

    fn set_direction(&mut self, id: u32, direction: Direction) -> io::Result<()> {
        let value = match direction {
            Direction::Output => "out",
            Direction::Input => "in",
        };
        fs::write(self.line_file(id, "direction"), value)
    }

    fn set_level(&mut self, id: u32, level: Level) -> io::Result<()> {
        let value = match level {
            Level::Low => "0",
            Level::High => "1",
        };
        fs::write(self.line_file(id, "value"), value)
    }

    fn get_level(&mut self, id: u32) -> io::Result<Level> {
        let mut buf = [0u8; 1];
        fs::File::open(self.line_file(id, "value"))?.read_exact(&mut buf)?;
        Ok(if buf[0] == b'0' {
            Level::Low
        } else {
            Level::High
        })
    }
}
