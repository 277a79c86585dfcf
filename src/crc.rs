//! CRC-8 checksum as computed by the SHT1x/SHT7x sensor family.
//!
//! The sensor appends an 8-bit CRC (polynomial `x^8 + x^5 + x^4 + 1`) to
//! every response, computed over the command byte and all payload bytes in
//! transmission order. The sensor shifts the checksum out in reverse bit
//! order relative to the algorithm's natural result, so validation compares
//! against [`Crc8::reversed`] rather than [`Crc8::value`].

/// Datasheet polynomial, MSB-first representation (x^8 implicit).
const POLYNOMIAL: u8 = 0x31;

/// Substitution table for a byte-at-a-time update, built at compile time.
const TABLE: [u8; 256] = build_table();

const fn build_table() -> [u8; 256] {
    let mut table = [0u8; 256];
    let mut byte = 0usize;
    while byte < 256 {
        let mut crc = byte as u8;
        let mut bit = 0;
        while bit < 8 {
            crc = if crc & 0x80 != 0 {
                (crc << 1) ^ POLYNOMIAL
            } else {
                crc << 1
            };
            bit += 1;
        }
        table[byte] = crc;
        byte += 1;
    }
    table
}

/// Running CRC-8 accumulator.
///
/// Starts at zero; bytes are injected with [`add`](Crc8::add) and the order
/// of injection is significant.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Crc8 {
    crc: u8,
}

impl Crc8 {
    /// A fresh accumulator with value zero.
    pub const fn new() -> Self {
        Crc8 { crc: 0 }
    }

    /// Folds one byte into the accumulator. Chainable.
    pub fn add(&mut self, byte: u8) -> &mut Self {
        self.crc = TABLE[(self.crc ^ byte) as usize];
        self
    }

    /// The current accumulator value.
    pub const fn value(&self) -> u8 {
        self.crc
    }

    /// The accumulator with its bit order reversed (bit 7 ↔ bit 0, …).
    ///
    /// This is the form the sensor transmits on the wire.
    pub const fn reversed(&self) -> u8 {
        self.crc.reverse_bits()
    }
}
