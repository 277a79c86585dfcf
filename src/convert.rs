//! Conversion of raw sensor words into physical units.
//!
//! Coefficients are taken from the SHT71 datasheet and must not be altered.
//! All functions are pure and defined over the full `u16` range, even though
//! physically meaningful readings occupy a narrower band.

/// Temperature conversion offset for a 14-bit reading at 3 V supply.
pub const D1: f64 = -39.60;
/// Temperature conversion slope for a 14-bit reading.
pub const D2: f64 = 0.01;

/// Humidity conversion coefficients for a 12-bit reading.
pub const C1: f64 = -2.0468;
pub const C2: f64 = 0.0367;
pub const C3: f64 = -1.5955e-6;

/// Temperature-compensation coefficients for a 12-bit humidity reading.
pub const T1: f64 = 0.01;
pub const T2: f64 = 0.00008;

/// Temperature in degrees Celsius from the raw temperature word.
pub fn temperature(so_t: u16) -> f64 {
    D1 + D2 * f64::from(so_t)
}

/// Linear relative humidity in percent from the raw humidity word.
pub fn rh_linear(so_rh: u16) -> f64 {
    let so_rh = f64::from(so_rh);
    C1 + C2 * so_rh + C3 * so_rh * so_rh
}

/// Temperature-compensated relative humidity in percent.
///
/// `temperature` is the converted reading in degrees Celsius, `so_rh` the
/// raw humidity word from the same measurement cycle.
pub fn rh_true(temperature: f64, so_rh: u16) -> f64 {
    (temperature - 25.0) * (T1 + T2 * f64::from(so_rh)) + rh_linear(so_rh)
}
