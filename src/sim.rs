//! Scripted [`Gpio`] double for tests, in the transaction style of
//! `embedded-hal-mock`: tests enqueue the exact operations they expect, the
//! double checks each call against the queue, and [`SimGpio::done`] asserts
//! the queue was drained. Clones share the queue so several lines can run
//! against one script.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use crate::gpio::{Direction, Gpio, Level};

/// Error injected by a scripted transaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SimError(pub &'static str);

/// One expected GPIO operation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Operation {
    Export(u32),
    Unexport(u32),
    SetDirection(u32, Direction),
    SetLevel(u32, Level),
    GetLevel(u32),
}

/// An expected operation plus its scripted outcome.
#[derive(Clone, Debug)]
pub struct Transaction {
    operation: Operation,
    level: Option<Level>,
    error: Option<SimError>,
}

impl Transaction {
    fn new(operation: Operation) -> Self {
        Transaction {
            operation,
            level: None,
            error: None,
        }
    }

    pub fn export(id: u32) -> Self {
        Self::new(Operation::Export(id))
    }

    pub fn unexport(id: u32) -> Self {
        Self::new(Operation::Unexport(id))
    }

    pub fn set_direction(id: u32, direction: Direction) -> Self {
        Self::new(Operation::SetDirection(id, direction))
    }

    pub fn set_level(id: u32, level: Level) -> Self {
        Self::new(Operation::SetLevel(id, level))
    }

    /// Expects a sample of line `id` and scripts the level it reports.
    pub fn get_level(id: u32, level: Level) -> Self {
        Transaction {
            level: Some(level),
            ..Self::new(Operation::GetLevel(id))
        }
    }

    /// Makes this transaction fail with `error` instead of succeeding.
    pub fn with_error(mut self, error: SimError) -> Self {
        self.error = Some(error);
        self
    }
}

/// Shared-handle scripted GPIO capability.
#[derive(Clone, Debug)]
pub struct SimGpio {
    expected: Rc<RefCell<VecDeque<Transaction>>>,
}

impl SimGpio {
    pub fn new(expected: &[Transaction]) -> Self {
        SimGpio {
            expected: Rc::new(RefCell::new(expected.iter().cloned().collect())),
        }
    }

    /// Asserts that every scripted transaction was consumed.
    pub fn done(&self) {
        let remaining = self.expected.borrow().len();
        assert_eq!(remaining, 0, "{remaining} scripted gpio transactions left over");
    }

    fn consume(&mut self, operation: Operation) -> Result<Option<Level>, SimError> {
        let tx = self
            .expected
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| panic!("unexpected gpio operation {operation:?}"));
        assert_eq!(tx.operation, operation, "gpio operation out of order");
        match tx.error {
            Some(error) => Err(error),
            None => Ok(tx.level),
        }
    }
}

/// Builders for the transaction scripts a full exchange produces.
///
/// Mirrors the driver's wire behavior transition for transition; tests
/// compose these instead of hand-writing hundreds of transactions.
pub mod script {
    use super::Transaction as Tx;
    use crate::crc::Crc8;
    use crate::gpio::{Direction, Level};

    /// Line acquisition performed by `ProtocolEngine::new`.
    pub fn acquire(clk: u32, data: u32) -> Vec<Tx> {
        vec![
            Tx::export(clk),
            Tx::set_direction(clk, Direction::Input),
            Tx::export(data),
            Tx::set_direction(data, Direction::Input),
        ]
    }

    /// Line release performed on drop, clock line first (field order).
    pub fn release(clk: u32, data: u32) -> Vec<Tx> {
        vec![Tx::unexport(clk), Tx::unexport(data)]
    }

    /// Bus setup, start condition, command shift-out and ack release.
    pub fn command_frame(clk: u32, data: u32, opcode: u8) -> Vec<Tx> {
        let mut txs = vec![
            // setup
            Tx::set_direction(clk, Direction::Output),
            Tx::set_direction(data, Direction::Output),
            Tx::set_level(clk, Level::Low),
            Tx::set_level(data, Level::High),
            // start condition
            Tx::set_level(clk, Level::High),
            Tx::set_level(data, Level::Low),
            Tx::set_level(clk, Level::Low),
            Tx::set_level(clk, Level::High),
            Tx::set_level(data, Level::High),
            Tx::set_level(clk, Level::Low),
            Tx::set_level(data, Level::Low),
        ];
        for i in 0..8 {
            let bit = opcode & (0x80 >> i) != 0;
            txs.push(Tx::set_level(
                data,
                if bit { Level::High } else { Level::Low },
            ));
            txs.push(Tx::set_level(clk, Level::High));
            txs.push(Tx::set_level(clk, Level::Low));
        }
        // ack release
        txs.push(Tx::set_direction(data, Direction::Input));
        txs.push(Tx::set_level(clk, Level::High));
        txs.push(Tx::set_level(clk, Level::Low));
        txs
    }

    /// One byte shifted in MSB-first, followed by the host ACK pulse.
    pub fn incoming_byte(clk: u32, data: u32, byte: u8) -> Vec<Tx> {
        let mut txs = Vec::new();
        for i in 0..8 {
            let bit = byte & (0x80 >> i) != 0;
            txs.push(Tx::set_level(clk, Level::High));
            txs.push(Tx::get_level(
                data,
                if bit { Level::High } else { Level::Low },
            ));
            txs.push(Tx::set_level(clk, Level::Low));
        }
        txs.extend([
            Tx::set_direction(data, Direction::Output),
            Tx::set_level(data, Level::Low),
            Tx::set_level(clk, Level::High),
            Tx::set_level(clk, Level::Low),
            Tx::set_direction(data, Direction::Input),
        ]);
        txs
    }

    /// Final bus state after an exchange: data driven high.
    pub fn bus_idle(data: u32) -> Vec<Tx> {
        vec![
            Tx::set_direction(data, Direction::Output),
            Tx::set_level(data, Level::High),
        ]
    }

    /// The checksum byte the sensor would transmit for this exchange.
    pub fn sensor_checksum(opcode: u8, payload: &[u8]) -> u8 {
        let mut crc = Crc8::new();
        crc.add(opcode);
        for &byte in payload {
            crc.add(byte);
        }
        crc.reversed()
    }

    /// A full exchange: `busy_polls` High reads before ready, the payload
    /// and checksum bytes, then the idle state.
    pub fn exchange(
        clk: u32,
        data: u32,
        opcode: u8,
        payload: &[u8],
        checksum: u8,
        busy_polls: usize,
    ) -> Vec<Tx> {
        let mut txs = command_frame(clk, data, opcode);
        for _ in 0..busy_polls {
            txs.push(Tx::get_level(data, Level::High));
        }
        txs.push(Tx::get_level(data, Level::Low));
        for &byte in payload {
            txs.extend(incoming_byte(clk, data, byte));
        }
        txs.extend(incoming_byte(clk, data, checksum));
        txs.extend(bus_idle(data));
        txs
    }
}

impl Gpio for SimGpio {
    type Error = SimError;

    fn export(&mut self, id: u32) -> Result<(), SimError> {
        self.consume(Operation::Export(id)).map(drop)
    }

    fn unexport(&mut self, id: u32) -> Result<(), SimError> {
        self.consume(Operation::Unexport(id)).map(drop)
    }

    fn set_direction(&mut self, id: u32, direction: Direction) -> Result<(), SimError> {
        self.consume(Operation::SetDirection(id, direction)).map(drop)
    }

    fn set_level(&mut self, id: u32, level: Level) -> Result<(), SimError> {
        self.consume(Operation::SetLevel(id, level)).map(drop)
    }

    fn get_level(&mut self, id: u32) -> Result<Level, SimError> {
        let level = self.consume(Operation::GetLevel(id))?;
        Ok(level.expect("get_level transaction scripted without a level"))
    }
}
