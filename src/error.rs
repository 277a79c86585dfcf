use thiserror::Error;

/// Possible errors from the SHT71 driver.
///
/// `E` is the error type of the underlying [`Gpio`](crate::Gpio) capability.
#[derive(Debug, PartialEq, Eq, Error)]
pub enum Error<E> {
    /// The GPIO line could not be acquired from the platform.
    ///
    /// Raised at construction time only, e.g. when the line is already
    /// exported by another process or inaccessible. Not recoverable by the
    /// driver.
    #[error("gpio line could not be acquired")]
    HardwareUnavailable(E),
    /// A line read or write failed mid-exchange.
    ///
    /// The exchange is aborted and the bus is left in an unspecified
    /// electrical state; the driver never retries on its own.
    #[error("gpio transport error")]
    Io(#[from] E),
    /// The sensor did not pull the data line low within the configured
    /// ready timeout.
    #[error("timed out waiting for the sensor to signal ready")]
    Timeout,
    /// The checksum transmitted by the sensor did not match the one
    /// computed over the exchange.
    ///
    /// Expected to occur occasionally under electrical noise. The raw word
    /// assembled from the received bytes rides along so the caller can
    /// still inspect (or knowingly use) the suspect payload. Retrying the
    /// exchange is the caller's decision.
    #[error("checksum mismatch (raw word {word:#06x})")]
    ChecksumMismatch {
        /// The payload word as received, unvalidated.
        word: u16,
    },
}
