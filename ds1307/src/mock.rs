//! Simulated DS1307 for tests
//!
//! [`FakeDs1307`] implements [`embedded_hal::i2c::I2c`] over a 64-byte register
//! file. Like the chip, the first byte of a write sets the register pointer,
//! further bytes are stored with auto-increment, and reads continue from the
//! pointer, wrapping from 0x3F to 0x00.

use embedded_hal::i2c::{ErrorKind, ErrorType, I2c, NoAcknowledgeSource, Operation};
use heapless::Vec;

use crate::DEVICE_ADDRESS;

const SIZE: usize = 64;

#[derive(Debug, Clone)]
pub struct FakeDs1307 {
    memory: [u8; SIZE],
    pointer: u8,
    fail_next: bool,
    transactions: u32,
    writes: Vec<(u8, u8), 64>,
}

impl Default for FakeDs1307 {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeDs1307 {
    /// A chip with all registers cleared and the oscillator running.
    pub fn new() -> Self {
        FakeDs1307 {
            memory: [0; SIZE],
            pointer: 0,
            fail_next: false,
            transactions: 0,
            writes: Vec::new(),
        }
    }

    /// A chip whose every byte holds `value`, e.g. 0xFF for unprogrammed RAM.
    pub fn filled(value: u8) -> Self {
        let mut chip = Self::new();
        chip.memory = [value; SIZE];
        chip
    }

    /// Register content, bypassing the bus.
    pub fn raw(&self, address: u8) -> u8 {
        self.memory[usize::from(address) % SIZE]
    }

    /// Set register content, bypassing the bus.
    pub fn set_raw(&mut self, address: u8, value: u8) {
        self.memory[usize::from(address) % SIZE] = value;
    }

    /// Make the next bus transaction fail with a bus error.
    pub fn fail_next(&mut self) {
        self.fail_next = true;
    }

    /// Number of bus transactions seen so far, failed ones included.
    pub fn transactions(&self) -> u32 {
        self.transactions
    }

    /// `(register, value)` for every data byte written over the bus.
    ///
    /// Holds at most 64 entries; a write past that panics.
    pub fn writes(&self) -> &[(u8, u8)] {
        &self.writes
    }

    fn store(&mut self, value: u8) {
        let address = self.pointer;
        self.memory[usize::from(address)] = value;
        if self.writes.push((address, value)).is_err() {
            panic!("FakeDs1307 write log full ({} entries)", self.writes.len());
        }
        self.advance();
    }

    fn load(&mut self) -> u8 {
        let value = self.memory[usize::from(self.pointer)];
        self.advance();
        value
    }

    fn advance(&mut self) {
        self.pointer = (self.pointer + 1) % SIZE as u8;
    }
}

impl ErrorType for FakeDs1307 {
    type Error = ErrorKind;
}

impl I2c for FakeDs1307 {
    fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        self.transactions += 1;
        if core::mem::take(&mut self.fail_next) {
            return Err(ErrorKind::Bus);
        }
        if address != DEVICE_ADDRESS {
            return Err(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address));
        }

        let mut pointer_set = false;
        for operation in operations {
            match operation {
                Operation::Write(bytes) => {
                    let mut bytes = bytes.iter();
                    if !pointer_set {
                        if let Some(&register) = bytes.next() {
                            if usize::from(register) >= SIZE {
                                return Err(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Data));
                            }
                            self.pointer = register;
                            pointer_set = true;
                        }
                    }
                    for &byte in bytes {
                        self.store(byte);
                    }
                }
                Operation::Read(buffer) => {
                    for byte in buffer.iter_mut() {
                        *byte = self.load();
                    }
                }
            }
        }
        Ok(())
    }
}
